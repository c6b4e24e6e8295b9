pub mod application;
pub mod document;
pub mod draft;
pub mod health;
pub mod otp;
pub mod user;

use axum::extract::FromRequest;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::PortalError;

/// `axum::Json` whose rejections render as a [`PortalError`] envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(PortalError))]
pub(crate) struct JsonBody<T>(pub T);

/// Parse a path segment that must be a UUID.
pub(crate) fn parse_id(raw: &str, field: &str) -> Result<Uuid, PortalError> {
    raw.trim()
        .parse::<Uuid>()
        .map_err(|_| PortalError::InvalidInput(format!("{field} must be a UUID")))
}

/// Decode a raw query string; an absent query yields the default.
pub(crate) fn parse_query<Q>(raw_query: Option<String>) -> Result<Q, PortalError>
where
    Q: DeserializeOwned + Default,
{
    raw_query
        .as_deref()
        .map(serde_qs::from_str)
        .transpose()
        .map_err(|e| PortalError::InvalidInput(format!("invalid query string: {e}")))
        .map(Option::unwrap_or_default)
}
