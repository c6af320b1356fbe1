//! Database module - connection handle, parameter binder and row materializer

mod database;
mod params;
mod row;

pub use database::Database;
