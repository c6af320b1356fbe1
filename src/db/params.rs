//! Parameter binder - maps host (value, type tag) pairs onto positional slots

use rusqlite::Statement;

use crate::error::{Error, Result};
use crate::models::{BindType, ScriptValue};

/// Bind `params` onto the statement's positional slots, left to right.
///
/// Values and declared tags are consumed in lock-step; the first non-integer
/// tag, unknown tag or runtime type mismatch aborts the remaining
/// parameters. Slots bound before the abort stay bound on the doomed
/// statement, which the caller must not execute. Text values are copied into
/// the statement, so the source string stays caller-owned.
pub(crate) fn bind_params(
    stmt: &mut Statement<'_>,
    params: &[ScriptValue],
    types: &[ScriptValue],
) -> Result<()> {
    if params.len() != types.len() {
        return Err(Error::BindArityMismatch {
            params: params.len(),
            types: types.len(),
        });
    }

    for (i, (value, tag)) in params.iter().zip(types).enumerate() {
        // sqlite slots are 1-based
        let slot = i + 1;

        let tag = match tag {
            ScriptValue::Int(tag) => *tag,
            _ => return Err(Error::BadTypeTag { position: i }),
        };
        let declared = BindType::from_tag(tag).ok_or(Error::InvalidTypeTag { tag, position: i })?;

        match (declared, value) {
            (BindType::Double, ScriptValue::Real(v)) => stmt.raw_bind_parameter(slot, v)?,
            (BindType::Int, ScriptValue::Int(v)) => stmt.raw_bind_parameter(slot, v)?,
            (BindType::Text, ScriptValue::Text(v)) => stmt.raw_bind_parameter(slot, v.as_str())?,
            (declared, value) => {
                return Err(Error::BindTypeMismatch {
                    position: i,
                    declared: declared.as_str(),
                    actual: value.type_name(),
                });
            }
        }
    }

    Ok(())
}
