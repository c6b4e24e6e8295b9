use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use admissions_domain::application::{ApplicationStatus, EducationLevel, Gender, ProgramType};
use admissions_domain::document::DocumentType;
use admissions_domain::id::ApplicationNumber;
use admissions_domain::phone::PhoneNumber;

use crate::domain::sections::ApplicationSections;

/// OTP length in digits.
pub const OTP_LENGTH: u32 = 6;

/// OTP time-to-live in minutes.
pub const OTP_TTL_MINUTES: u32 = 5;

/// Wrong guesses after which a locally checked code is burned.
pub const OTP_MAX_ATTEMPTS: i32 = 5;

pub const OTP_CODE_PLACEHOLDER: &str = "%otp_code%";
pub const OTP_EXPIRY_PLACEHOLDER: &str = "%expiry%";

/// SMS template. The gateway fills both placeholders itself when it owns the
/// code; locally generated codes are substituted before sending.
pub const OTP_MESSAGE_TEMPLATE: &str =
    "Your VisionTech verification code is %otp_code%. Code expires in %expiry% minutes.";

/// Which side decides whether an entered code is valid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OtpAuthority {
    /// Code generated here, stored hashed, checked here.
    #[default]
    Local,
    /// Code generated and checked by the SMS gateway.
    Provider,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub phone_number: PhoneNumber,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct OtpCode {
    pub id: Uuid,
    pub user_id: Uuid,
    /// `None` when the gateway generated the code.
    pub code_hash: Option<String>,
    pub code_salt: Option<String>,
    pub phone_number: PhoneNumber,
    pub is_used: bool,
    pub failed_attempts: i32,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl OtpCode {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Result of asking the gateway to check a code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderVerdict {
    Verified,
    InvalidCode,
    Expired,
    InvalidPhoneNumber,
    Failed(Option<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalInfo {
    pub first_name: String,
    pub surname: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub email: String,
    pub telephone: String,
    pub nationality: String,
    pub address: String,
    pub gps_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardianInfo {
    pub guardian_name: String,
    pub guardian_occupation: String,
    pub guardian_telephone: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EducationInfo {
    pub highest_education: EducationLevel,
    pub year_completed: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramInfo {
    pub program_type: ProgramType,
    pub specific_program: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    pub id: Uuid,
    pub user_id: Uuid,
    pub application_number: ApplicationNumber,
    pub personal: PersonalInfo,
    pub guardian: GuardianInfo,
    pub education: EducationInfo,
    pub program: ProgramInfo,
    pub status: ApplicationStatus,
    pub submitted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Owner fields shown next to an application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicantSummary {
    pub phone_number: PhoneNumber,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for ApplicantSummary {
    fn from(user: &User) -> Self {
        Self {
            phone_number: user.phone_number.clone(),
            is_verified: user.is_verified,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: Uuid,
    pub application_id: Uuid,
    pub document_type: DocumentType,
    pub file_name: String,
    pub original_name: String,
    pub file_size: i64,
    pub mime_type: String,
    pub file_url: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Application joined with its owner and documents.
#[derive(Debug, Clone)]
pub struct ApplicationDetails {
    pub application: Application,
    pub owner: ApplicantSummary,
    pub documents: Vec<Document>,
}

#[derive(Debug, Clone, Default)]
pub struct ApplicationFilter {
    pub status: Option<ApplicationStatus>,
    /// Case-insensitive substring over first name, surname, email and
    /// application number.
    pub search: Option<String>,
}

/// Server-side wizard state for one user.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub user_id: Uuid,
    pub sections: ApplicationSections,
    pub updated_at: DateTime<Utc>,
}

/// File received from a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_name: String,
    pub mime_type: String,
    pub bytes: bytes::Bytes,
}
