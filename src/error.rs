use thiserror::Error as ThisError;

/// Failures raised by the binding's internal phases.
///
/// The public façade reduces these to the contract's boolean or empty-result
/// returns and logs them; nothing here crosses the scripting boundary.
#[derive(Debug, ThisError)]
pub enum Error {
    #[error("database is not opened")]
    NotOpened,

    #[error("statement text is empty")]
    EmptyStatement,

    #[error("param and type list size mismatch ({params} params, {types} types)")]
    BindArityMismatch { params: usize, types: usize },

    #[error("type tag at position {position} is not an integer")]
    BadTypeTag { position: usize },

    #[error("invalid type tag {tag} at position {position}")]
    InvalidTypeTag { tag: i64, position: usize },

    #[error("parameter at position {position} is {actual}, declared {declared}")]
    BindTypeMismatch {
        position: usize,
        declared: &'static str,
        actual: &'static str,
    },

    #[error("cannot allocate database image copy")]
    NoMem,

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
