//! Database access layer
//!
//! The SQLite pool is the single store handle; it owns all persisted
//! state. Schema creation is idempotent and runs on every startup.

pub mod init;

pub use init::{create_schema, init_database};
