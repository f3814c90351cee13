//! Time helpers
//!
//! All persisted timestamps are milliseconds since the Unix epoch.

use chrono::Utc;

/// Milliseconds in one day, for day-span arithmetic
pub const MS_PER_DAY: f64 = 86_400_000.0;

/// Current wall-clock time as milliseconds since the Unix epoch
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
