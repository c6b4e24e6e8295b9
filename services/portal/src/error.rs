use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use admissions_domain::application::UnknownVariant;
use admissions_domain::phone::PhoneError;

/// Portal service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    #[error("invalid phone number format")]
    InvalidPhoneFormat,
    #[error("{0}")]
    MissingData(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error("user not found")]
    UserNotFound,
    #[error("user is not verified")]
    UserNotVerified,
    #[error("no active otp, request a new code")]
    NoActiveOtp,
    #[error("otp has expired, request a new code")]
    OtpExpired,
    #[error("invalid otp code")]
    InvalidCode,
    #[error("otp verification failed")]
    VerificationFailed,
    #[error("application not found")]
    ApplicationNotFound,
    #[error("draft not found")]
    DraftNotFound,
    #[error("submitted applications can only be changed by an administrator")]
    Forbidden,
    #[error("cannot move application from {from} to {to}")]
    InvalidTransition { from: String, to: String },
    #[error("file exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: u64 },
    #[error("unsupported file type: {0}")]
    UnsupportedMediaType(String),
    #[error("sms provider error")]
    Provider(String),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl PortalError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidPhoneFormat => "INVALID_PHONE_FORMAT",
            Self::MissingData(_) => "MISSING_DATA",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::UserNotVerified => "USER_NOT_VERIFIED",
            Self::NoActiveOtp => "NO_ACTIVE_OTP",
            Self::OtpExpired => "OTP_EXPIRED",
            Self::InvalidCode => "INVALID_CODE",
            Self::VerificationFailed => "VERIFICATION_FAILED",
            Self::ApplicationNotFound => "APPLICATION_NOT_FOUND",
            Self::DraftNotFound => "DRAFT_NOT_FOUND",
            Self::Forbidden => "FORBIDDEN",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
            Self::UnsupportedMediaType(_) => "UNSUPPORTED_MEDIA_TYPE",
            Self::Provider(_) => "PROVIDER_ERROR",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidPhoneFormat
            | Self::MissingData(_)
            | Self::InvalidInput(_)
            | Self::UserNotVerified
            | Self::NoActiveOtp
            | Self::OtpExpired
            | Self::InvalidCode
            | Self::VerificationFailed => StatusCode::BAD_REQUEST,
            Self::UserNotFound | Self::ApplicationNotFound | Self::DraftNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::InvalidTransition { .. } => StatusCode::CONFLICT,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::Provider(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PhoneError> for PortalError {
    fn from(_: PhoneError) -> Self {
        Self::InvalidPhoneFormat
    }
}

impl From<UnknownVariant> for PortalError {
    fn from(e: UnknownVariant) -> Self {
        Self::InvalidInput(e.to_string())
    }
}

impl From<JsonRejection> for PortalError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidInput(rejection.body_text())
    }
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let status = self.status();
        // TraceLayer already records every request; only failures on our side
        // or the gateway's carry detail worth logging here.
        match &self {
            Self::Internal(e) => {
                tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
            }
            Self::Provider(detail) => {
                tracing::error!(error = %detail, kind = "PROVIDER_ERROR", "sms provider error");
            }
            _ => {}
        }
        let body = serde_json::json!({
            "success": false,
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
