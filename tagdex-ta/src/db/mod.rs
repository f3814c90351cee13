//! Database access for tagdex-ta
//!
//! All queries run against the shared SQLite pool. The store is the sole
//! owner of persisted state; nothing in this crate holds mutable state
//! besides the analytics cache.

pub mod analytics;
pub mod associations;
pub mod media;
pub mod votes;
