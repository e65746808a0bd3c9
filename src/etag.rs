//! Optimistic-concurrency tokens.
//!
//! A token is the base64 SHA-256 digest of a row's `updated_at`, rendered at
//! microsecond precision so that a value survives a round trip through any of
//! the supported databases unchanged.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use sha2::{Digest, Sha256};

/// Generates the token for a last-modified timestamp.
pub fn generate(updated_at: DateTime<Utc>) -> String {
    let rendered = updated_at
        .trunc_subsecs(6)
        .to_rfc3339_opts(SecondsFormat::Micros, true);
    let digest = Sha256::digest(rendered.as_bytes());
    STANDARD.encode(digest)
}

/// Returns true when `supplied` was generated from `updated_at`.
pub fn matches(supplied: &str, updated_at: DateTime<Utc>) -> bool {
    generate(updated_at) == supplied
}

/// Timestamp to stamp on a row that was last modified at `previous`.
///
/// Always strictly later than `previous` so that every write yields a new
/// token, even when two writes land within the same clock tick.
pub fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now().trunc_subsecs(6);
    let floor = previous.trunc_subsecs(6) + chrono::Duration::microseconds(1);
    if now > floor {
        now
    } else {
        floor
    }
}

/// Current time at the precision stored by the database.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
