//! SQLite bound to a game-engine scripting runtime, as a plain testable core.
//!
//! [`Database`] implements the binding contract (`open`, `open_buffered`,
//! `run`, `fetch_array`, `fetch_assoc`, `close`), with values crossing the
//! boundary as [`ScriptValue`] variants and result rows as ordered key/value
//! records. An engine-side shim is expected to wrap this API one-to-one.

pub mod db;
mod error;
mod models;

pub use db::Database;
pub use error::Error;
pub use models::{BindType, Record, ResultMode, Rows, ScriptValue};

/// Version string of the wrapped SQLite engine.
pub fn sqlite_version() -> &'static str {
    rusqlite::version()
}
