//! Phone number normalization.
//!
//! Every path that stores or looks up a phone number goes through
//! [`PhonePlan::normalize`], so `0244123456`, `233244123456` and
//! `+233244123456` all resolve to the same user.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default country calling code (Ghana).
pub const DEFAULT_COUNTRY_CODE: &str = "233";

/// Local trunk prefix replaced by the country calling code.
pub const TRUNK_PREFIX: char = '0';

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PhoneError {
    #[error("invalid phone number format")]
    InvalidFormat,
}

/// Numbering plan used to canonicalize raw phone input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhonePlan {
    country_code: String,
}

impl Default for PhonePlan {
    fn default() -> Self {
        Self {
            country_code: DEFAULT_COUNTRY_CODE.to_owned(),
        }
    }
}

impl PhonePlan {
    /// `country_code` is the bare calling code without `+` (e.g. `"233"`).
    pub fn new(country_code: impl Into<String>) -> Self {
        Self {
            country_code: country_code.into(),
        }
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    /// Canonicalize `raw` into `+<country code><subscriber digits>`.
    pub fn normalize(&self, raw: &str) -> Result<PhoneNumber, PhoneError> {
        let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        let prefixed = format!("+{}", self.country_code);

        let canonical = if let Some(rest) = compact.strip_prefix(TRUNK_PREFIX) {
            format!("{prefixed}{rest}")
        } else if compact.starts_with(self.country_code.as_str()) {
            format!("+{compact}")
        } else if compact.starts_with(prefixed.as_str()) {
            compact
        } else {
            return Err(PhoneError::InvalidFormat);
        };

        let subscriber = &canonical[prefixed.len()..];
        if subscriber.is_empty() || !subscriber.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PhoneError::InvalidFormat);
        }
        Ok(PhoneNumber(canonical))
    }
}

/// A phone number in canonical `+<country code>…` form.
///
/// Only constructed by [`PhonePlan::normalize`] or when reading back a value
/// that was stored canonical.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Wrap a value already stored in canonical form.
    pub fn from_canonical(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
