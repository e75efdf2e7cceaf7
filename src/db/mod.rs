//! Database module: connection provider, SQL repositories and row encoding.
//!
//! - `repo`: pool construction plus one function per SQL statement the API runs.
//! - `row`: column-driven conversion of result rows into JSON values.
//!
//! Callers import from `registry_api::db`; the repository API is re-exported here.

pub mod repo;
pub mod row;

pub use repo::*;
pub use row::row_to_json;
