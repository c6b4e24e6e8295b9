//! Human-facing application identifiers.

use std::fmt;

use chrono::{DateTime, Utc};
use rand::RngExt;
use serde::{Deserialize, Serialize};

/// Prefix of every application number.
pub const APPLICATION_NUMBER_PREFIX: &str = "VT";

/// Length of the random suffix appended after the timestamp.
pub const APPLICATION_NUMBER_SUFFIX_LEN: usize = 4;

const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Applicant-facing reference, e.g. `VT1718000000000K3ZQ`.
///
/// Uniqueness is enforced by the store; the timestamp plus random suffix
/// keeps collisions rare enough that a retry is never needed in practice.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationNumber(pub String);

impl ApplicationNumber {
    pub fn generate(now: DateTime<Utc>) -> Self {
        let mut rng = rand::rng();
        let suffix: String = (0..APPLICATION_NUMBER_SUFFIX_LEN)
            .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
            .collect();
        Self(format!(
            "{APPLICATION_NUMBER_PREFIX}{}{suffix}",
            now.timestamp_millis()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApplicationNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
