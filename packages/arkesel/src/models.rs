use serde::{Deserialize, Deserializer, Serialize};

/// Placeholder Arkesel substitutes with the generated code.
pub const OTP_CODE_PLACEHOLDER: &str = "%otp_code%";
/// Placeholder Arkesel substitutes with the expiry in minutes.
pub const EXPIRY_PLACEHOLDER: &str = "%expiry%";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OtpMedium {
    Sms,
    Voice,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OtpKind {
    Numeric,
    Alphanumeric,
}

/// Body of `POST /api/otp/generate`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateOtpRequest {
    /// Minutes until the code expires.
    pub expiry: u32,
    pub length: u32,
    pub medium: OtpMedium,
    /// Template containing [`OTP_CODE_PLACEHOLDER`] and optionally [`EXPIRY_PLACEHOLDER`].
    pub message: String,
    pub number: String,
    pub sender_id: String,
    #[serde(rename = "type")]
    pub kind: OtpKind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateOtpResponse {
    #[serde(default, deserialize_with = "string_or_number")]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `POST /api/otp/verify`.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyOtpRequest {
    pub code: String,
    pub number: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyOtpResponse {
    #[serde(default, deserialize_with = "string_or_number")]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl VerifyOtpResponse {
    pub fn result(&self) -> VerifyResultCode {
        self.code
            .as_deref()
            .map(VerifyResultCode::from_code)
            .unwrap_or(VerifyResultCode::Other)
    }
}

/// Outcome of an OTP verification as reported by Arkesel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyResultCode {
    /// `1100`
    Verified,
    /// `1104`
    InvalidCode,
    /// `1105`
    Expired,
    /// `1102` / `1103`
    InvalidPhoneNumber,
    Other,
}

impl VerifyResultCode {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "1100" => Self::Verified,
            "1104" => Self::InvalidCode,
            "1105" => Self::Expired,
            "1102" | "1103" => Self::InvalidPhoneNumber,
            _ => Self::Other,
        }
    }
}

/// Body of `POST /api/v2/sms/send`.
#[derive(Debug, Clone, Serialize)]
pub struct SendSmsRequest {
    pub sender: String,
    pub message: String,
    pub recipients: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SendSmsResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl SendSmsResponse {
    pub fn is_success(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("success"))
    }
}

/// Arkesel returns result codes as strings on some endpoints and as numbers on others.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
