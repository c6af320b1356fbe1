use serde::Serialize;

/// A value crossing the scripting-runtime boundary.
///
/// Models the subset of the host's variant type that parameter binding and
/// row materialization deal in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ScriptValue {
    Int(i64),
    Real(f64),
    Text(String),
}

impl ScriptValue {
    /// Runtime type name, used in binding diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            ScriptValue::Int(_) => "int",
            ScriptValue::Real(_) => "real",
            ScriptValue::Text(_) => "text",
        }
    }
}

impl From<i64> for ScriptValue {
    fn from(v: i64) -> Self {
        ScriptValue::Int(v)
    }
}

impl From<f64> for ScriptValue {
    fn from(v: f64) -> Self {
        ScriptValue::Real(v)
    }
}

impl From<&str> for ScriptValue {
    fn from(v: &str) -> Self {
        ScriptValue::Text(v.to_string())
    }
}

impl From<String> for ScriptValue {
    fn from(v: String) -> Self {
        ScriptValue::Text(v)
    }
}

/// Declared parameter type tag.
///
/// The host transmits these as bare integers, so the ordinal values are part
/// of the contract and must not be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindType {
    Double = 0,
    Int = 1,
    Text = 2,
}

impl BindType {
    /// Decode a tag received from the host.
    pub fn from_tag(tag: i64) -> Option<BindType> {
        match tag {
            0 => Some(BindType::Double),
            1 => Some(BindType::Int),
            2 => Some(BindType::Text),
            _ => None,
        }
    }

    /// The wire ordinal for this tag.
    pub fn tag(self) -> i64 {
        self as i64
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BindType::Double => "DOUBLE",
            BindType::Int => "INT",
            BindType::Text => "TEXT",
        }
    }
}

/// How a materialized row is keyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultMode {
    /// Each value inserted under both its column index and its column name.
    Both = 0,
    /// Keyed by zero-based column index only.
    ByIndex = 1,
    /// Keyed by column name only.
    ByName = 2,
}

/// One result row: keys to values, in column order.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// An accumulated result set.
pub type Rows = Vec<Record>;
