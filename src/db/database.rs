//! Database - the connection handle and the query façade over SQLite

use std::path::{Path, PathBuf};
use std::ptr::NonNull;

use rusqlite::serialize::OwnedData;
use rusqlite::{ffi, Connection, Statement, MAIN_DB};
use tracing::{debug, error};

use crate::db::params::bind_params;
use crate::db::row::parse_row;
use crate::error::{Error, Result};
use crate::models::{ResultMode, Rows, ScriptValue};

/// The active database resource. At most one mode is ever open; `Closed` is
/// the reset state after [`Database::close`].
enum Handle {
    Closed,
    File(Connection),
    Buffer(Connection),
}

impl Handle {
    fn connection(&self) -> Option<&Connection> {
        match self {
            Handle::Closed => None,
            Handle::File(conn) | Handle::Buffer(conn) => Some(conn),
        }
    }
}

type Bindings<'a> = Option<(&'a [ScriptValue], &'a [ScriptValue])>;

/// A single scripting-side database connection.
///
/// Every operation is synchronous and runs to completion on the caller's
/// thread. The host runtime is expected to serialize calls onto one
/// instance; exclusive ownership is enforced by the borrow checker.
///
/// Failures never escape as errors: each operation reports through its
/// return value (a boolean or an empty result set) and logs a diagnostic
/// naming the failing phase.
pub struct Database {
    handle: Handle,
    project_root: Option<PathBuf>,
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl Database {
    /// Create a closed connection. Paths passed to [`open`](Self::open) are
    /// used as given.
    pub fn new() -> Self {
        Database {
            handle: Handle::Closed,
            project_root: None,
        }
    }

    /// Create a closed connection that resolves relative paths against the
    /// host's project root.
    pub fn with_project_root(root: impl Into<PathBuf>) -> Self {
        Database {
            handle: Handle::Closed,
            project_root: Some(root.into()),
        }
    }

    /// Whether a file- or buffer-backed resource is currently open.
    pub fn is_open(&self) -> bool {
        self.handle.connection().is_some()
    }

    /// Open a file-backed database.
    ///
    /// Returns false on a blank path or an engine open failure. Opening over
    /// an already-open resource replaces it.
    pub fn open(&mut self, path: &str) -> bool {
        let trimmed = path.trim();
        if trimmed.is_empty() {
            return false;
        }

        let real_path = self.resolve_path(trimmed);
        match Connection::open(&real_path) {
            Ok(conn) => {
                self.handle = Handle::File(conn);
                true
            }
            Err(e) => {
                error!(path = %real_path.display(), error = %e, "cannot open database");
                false
            }
        }
    }

    /// Open a buffer-backed database over a private copy of the first
    /// `size` bytes of `bytes`.
    ///
    /// Returns false on a blank name, an empty source buffer, a zero size,
    /// a `size` past the end of the source, or an engine failure. The copy
    /// is owned by the engine and freed when the resource closes; the
    /// caller's buffer may be dropped as soon as this returns.
    pub fn open_buffered(&mut self, name: &str, bytes: &[u8], size: usize) -> bool {
        if name.trim().is_empty() {
            return false;
        }
        if bytes.is_empty() || size == 0 || size > bytes.len() {
            return false;
        }

        match open_image(bytes, size) {
            Ok(conn) => {
                self.handle = Handle::Buffer(conn);
                true
            }
            Err(e) => {
                error!(name, error = %e, "cannot open buffered database");
                false
            }
        }
    }

    /// Close whichever resource is active. Idempotent.
    ///
    /// The handle is always cleared: if the engine reports a close failure
    /// it is logged and the connection is torn down regardless, so the
    /// connection can be reopened afterwards either way.
    pub fn close(&mut self) {
        match std::mem::replace(&mut self.handle, Handle::Closed) {
            Handle::Closed => {}
            Handle::File(conn) | Handle::Buffer(conn) => {
                if let Err((_, e)) = conn.close() {
                    error!(error = %e, "cannot close database");
                }
            }
        }
    }

    /// Execute one statement without parameters, discarding any result rows.
    pub fn run(&self, sql: &str) -> bool {
        report(self.exec(sql, None), sql)
    }

    /// Execute one statement with bound parameters, discarding any result
    /// rows. `types` carries one declared type tag per value in `params`.
    pub fn run_with(&self, sql: &str, params: &[ScriptValue], types: &[ScriptValue]) -> bool {
        report(self.exec(sql, Some((params, types))), sql)
    }

    /// Fetch all rows, each keyed by both column index and column name.
    pub fn fetch_array(&self, sql: &str) -> Rows {
        self.collect(sql, None, ResultMode::Both)
    }

    /// [`fetch_array`](Self::fetch_array) with bound parameters.
    pub fn fetch_array_with(
        &self,
        sql: &str,
        params: &[ScriptValue],
        types: &[ScriptValue],
    ) -> Rows {
        self.collect(sql, Some((params, types)), ResultMode::Both)
    }

    /// Fetch all rows, each keyed by column name only.
    pub fn fetch_assoc(&self, sql: &str) -> Rows {
        self.collect(sql, None, ResultMode::ByName)
    }

    /// [`fetch_assoc`](Self::fetch_assoc) with bound parameters.
    pub fn fetch_assoc_with(
        &self,
        sql: &str,
        params: &[ScriptValue],
        types: &[ScriptValue],
    ) -> Rows {
        self.collect(sql, Some((params, types)), ResultMode::ByName)
    }

    fn resolve_path(&self, path: &str) -> PathBuf {
        match &self.project_root {
            Some(root) if Path::new(path).is_relative() => root.join(path),
            _ => PathBuf::from(path),
        }
    }

    /// Compile one statement against the active handle.
    fn prepare(&self, sql: &str) -> Result<Statement<'_>> {
        let conn = self.handle.connection().ok_or(Error::NotOpened)?;
        debug!(sql, "preparing statement");
        Ok(conn.prepare(sql)?)
    }

    /// prepare → bind → step to completion. The statement is finalized on
    /// drop, on success and failure alike.
    fn exec(&self, sql: &str, bindings: Bindings<'_>) -> Result<()> {
        let sql = sql.trim();
        if sql.is_empty() {
            return Err(Error::EmptyStatement);
        }

        let mut stmt = self.prepare(sql)?;
        if let Some((params, types)) = bindings {
            bind_params(&mut stmt, params, types)?;
        }

        let mut rows = stmt.raw_query();
        while rows.next()?.is_some() {}
        Ok(())
    }

    fn collect(&self, sql: &str, bindings: Bindings<'_>, mode: ResultMode) -> Rows {
        match self.materialize(sql, bindings, mode) {
            Ok(rows) => rows,
            Err(e) => {
                error!(error = %e, sql, "fetch failed");
                Rows::new()
            }
        }
    }

    fn materialize(&self, sql: &str, bindings: Bindings<'_>, mode: ResultMode) -> Result<Rows> {
        let sql = sql.trim();
        if sql.is_empty() {
            return Err(Error::EmptyStatement);
        }

        let mut stmt = self.prepare(sql)?;
        if let Some((params, types)) = bindings {
            bind_params(&mut stmt, params, types)?;
        }

        let columns: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();
        let mut rows = stmt.raw_query();
        let mut out = Rows::new();
        while let Some(row) = rows.next()? {
            out.push(parse_row(row, &columns, mode));
        }
        Ok(out)
    }
}

fn report(result: Result<()>, sql: &str) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            error!(error = %e, sql, "query failed");
            false
        }
    }
}

/// Copy `size` bytes of `bytes` into an engine-owned allocation of
/// `size + 1` bytes with a trailing NUL sentinel, then open an in-memory
/// database over the copy. The engine frees the copy when the connection
/// closes.
fn open_image(bytes: &[u8], size: usize) -> Result<Connection> {
    let mut conn = Connection::open_in_memory()?;

    let data = unsafe {
        let ptr = ffi::sqlite3_malloc64(size as u64 + 1) as *mut u8;
        let ptr = NonNull::new(ptr).ok_or(Error::NoMem)?;
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), ptr.as_ptr(), size);
        *ptr.as_ptr().add(size) = 0;
        // the sentinel byte sits past the declared image size
        OwnedData::from_raw_nonnull(ptr, size)
    };

    conn.deserialize(MAIN_DB, data, false)?;
    Ok(conn)
}
