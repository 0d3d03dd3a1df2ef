pub mod auth;
pub mod error;
pub mod forum;
pub mod middleware;
pub mod plants;
pub mod routes;
pub mod species;

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;
use uuid::Uuid;

/// Parse a timestamp read back from SQLite. Rust-written values are RFC 3339;
/// columns filled by the `datetime('now')` default are "YYYY-MM-DD HH:MM:SS"
/// without a timezone and are taken as UTC.
pub(crate) fn parse_db_time(raw: &str, what: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt timestamp '{}' on {}: {}", raw, what, e);
            DateTime::default()
        })
}

pub(crate) fn parse_id(raw: &str) -> Uuid {
    raw.parse().unwrap_or_else(|e| {
        warn!("Corrupt id '{}': {}", raw, e);
        Uuid::default()
    })
}
