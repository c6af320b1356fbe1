//! Row materializer - converts one result row into a keyed record

use rusqlite::types::ValueRef;
use serde_json::{Number, Value};

use crate::models::{Record, ResultMode};

/// Materialize the statement's current row into a record.
///
/// Integer, floating-point and text storage classes convert to record
/// values; null, blob and anything unrecognized is left out of the record
/// entirely rather than defaulted. `mode` selects the key layout only, never
/// the values.
pub(crate) fn parse_row(row: &rusqlite::Row<'_>, columns: &[String], mode: ResultMode) -> Record {
    let mut record = Record::new();

    for (i, name) in columns.iter().enumerate() {
        let value = match row.get_ref(i) {
            Ok(ValueRef::Integer(v)) => Value::Number(v.into()),
            Ok(ValueRef::Real(v)) => {
                Value::Number(Number::from_f64(v).unwrap_or_else(|| Number::from(0)))
            }
            Ok(ValueRef::Text(v)) => Value::String(String::from_utf8_lossy(v).into_owned()),
            _ => continue,
        };

        match mode {
            ResultMode::ByIndex => {
                record.insert(i.to_string(), value);
            }
            ResultMode::ByName => {
                record.insert(name.clone(), value);
            }
            ResultMode::Both => {
                record.insert(i.to_string(), value.clone());
                record.insert(name.clone(), value);
            }
        }
    }

    record
}
