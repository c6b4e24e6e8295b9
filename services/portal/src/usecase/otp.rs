use chrono::{Duration, Utc};
use rand::RngExt;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use uuid::Uuid;

use admissions_domain::phone::{PhoneNumber, PhonePlan};

use crate::domain::repository::{OtpCodeRepository, OtpProvider, UserRepository};
use crate::domain::types::{
    OTP_CODE_PLACEHOLDER, OTP_EXPIRY_PLACEHOLDER, OTP_LENGTH, OTP_MAX_ATTEMPTS,
    OTP_MESSAGE_TEMPLATE, OTP_TTL_MINUTES, OtpAuthority, OtpCode, ProviderVerdict,
};
use crate::error::PortalError;

pub fn generate_numeric_code() -> String {
    let mut rng = rand::rng();
    (0..OTP_LENGTH)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

/// Hex SHA-256 of `salt || code`.
pub fn hash_code(salt: &str, code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(code.as_bytes());
    hex::encode(hasher.finalize())
}

fn code_matches(stored_hash: &str, salt: &str, code: &str) -> bool {
    let candidate = hash_code(salt, code);
    candidate.as_bytes().ct_eq(stored_hash.as_bytes()).into()
}

pub fn render_message(template: &str, code: &str) -> String {
    template
        .replace(OTP_CODE_PLACEHOLDER, code)
        .replace(OTP_EXPIRY_PLACEHOLDER, &OTP_TTL_MINUTES.to_string())
}

fn required_text(value: &str, field: &str) -> Result<(), PortalError> {
    if value.trim().is_empty() {
        return Err(PortalError::MissingData(format!("{field} is required")));
    }
    Ok(())
}

// ── RequestOtp ───────────────────────────────────────────────────────────────

pub struct RequestOtpInput {
    pub phone_number: String,
}

#[derive(Debug)]
pub struct RequestOtpOutput {
    pub phone_number: PhoneNumber,
}

pub struct RequestOtpUseCase<U, O, P>
where
    U: UserRepository,
    O: OtpCodeRepository,
    P: OtpProvider,
{
    pub users: U,
    pub otp_codes: O,
    pub provider: P,
    pub phone_plan: PhonePlan,
    pub authority: OtpAuthority,
}

impl<U, O, P> RequestOtpUseCase<U, O, P>
where
    U: UserRepository,
    O: OtpCodeRepository,
    P: OtpProvider,
{
    pub async fn execute(&self, input: RequestOtpInput) -> Result<RequestOtpOutput, PortalError> {
        required_text(&input.phone_number, "phoneNumber")?;
        let phone = self.phone_plan.normalize(&input.phone_number)?;
        let user = self.users.find_or_create(&phone).await?;

        // Dispatch before touching the ledger: a gateway failure leaves the
        // previous code usable.
        let (code_hash, code_salt) = match self.authority {
            OtpAuthority::Local => {
                let code = generate_numeric_code();
                let salt = Uuid::new_v4().simple().to_string();
                self.provider
                    .send_sms(&phone, &render_message(OTP_MESSAGE_TEMPLATE, &code))
                    .await?;
                (Some(hash_code(&salt, &code)), Some(salt))
            }
            OtpAuthority::Provider => {
                self.provider.generate(&phone, OTP_MESSAGE_TEMPLATE).await?;
                (None, None)
            }
        };

        let now = Utc::now();
        let otp = OtpCode {
            id: Uuid::new_v4(),
            user_id: user.id,
            code_hash,
            code_salt,
            phone_number: phone.clone(),
            is_used: false,
            failed_attempts: 0,
            expires_at: now + Duration::minutes(i64::from(OTP_TTL_MINUTES)),
            created_at: now,
        };
        let invalidated = self.otp_codes.issue(&otp).await?;
        tracing::info!(user_id = %user.id, otp_id = %otp.id, invalidated, "otp issued");

        Ok(RequestOtpOutput {
            phone_number: phone,
        })
    }
}

// ── VerifyOtp ────────────────────────────────────────────────────────────────

pub struct VerifyOtpInput {
    pub phone_number: String,
    pub code: String,
}

#[derive(Debug)]
pub struct VerifyOtpOutput {
    pub user_id: Uuid,
    pub phone_number: PhoneNumber,
}

pub struct VerifyOtpUseCase<U, O, P>
where
    U: UserRepository,
    O: OtpCodeRepository,
    P: OtpProvider,
{
    pub users: U,
    pub otp_codes: O,
    pub provider: P,
    pub phone_plan: PhonePlan,
    pub authority: OtpAuthority,
}

impl<U, O, P> VerifyOtpUseCase<U, O, P>
where
    U: UserRepository,
    O: OtpCodeRepository,
    P: OtpProvider,
{
    pub async fn execute(&self, input: VerifyOtpInput) -> Result<VerifyOtpOutput, PortalError> {
        required_text(&input.phone_number, "phoneNumber")?;
        required_text(&input.code, "code")?;
        let code = input.code.trim();
        let phone = self.phone_plan.normalize(&input.phone_number)?;

        let user = self
            .users
            .find_by_phone(&phone)
            .await?
            .ok_or(PortalError::UserNotFound)?;

        let otp = self
            .otp_codes
            .find_latest_unused(user.id)
            .await?
            .ok_or(PortalError::NoActiveOtp)?;

        match self.authority {
            OtpAuthority::Local => {
                if otp.is_expired(Utc::now()) {
                    return Err(PortalError::OtpExpired);
                }
                // A code issued while the gateway was the authority has no hash.
                let (Some(hash), Some(salt)) = (&otp.code_hash, &otp.code_salt) else {
                    return Err(PortalError::NoActiveOtp);
                };
                if !code_matches(hash, salt, code) {
                    if self
                        .otp_codes
                        .record_failure(otp.id, OTP_MAX_ATTEMPTS)
                        .await?
                    {
                        tracing::warn!(
                            user_id = %user.id,
                            otp_id = %otp.id,
                            "otp burned after repeated wrong codes"
                        );
                    }
                    return Err(PortalError::InvalidCode);
                }
            }
            OtpAuthority::Provider => match self.provider.verify(&phone, code).await? {
                ProviderVerdict::Verified => {}
                ProviderVerdict::InvalidCode => return Err(PortalError::InvalidCode),
                ProviderVerdict::Expired => return Err(PortalError::OtpExpired),
                ProviderVerdict::InvalidPhoneNumber => {
                    return Err(PortalError::InvalidPhoneFormat);
                }
                ProviderVerdict::Failed(message) => {
                    tracing::warn!(user_id = %user.id, ?message, "gateway rejected otp");
                    return Err(PortalError::VerificationFailed);
                }
            },
        }

        if !self.otp_codes.consume(otp.id, user.id).await? {
            return Err(PortalError::InvalidCode);
        }
        tracing::info!(user_id = %user.id, otp_id = %otp.id, "user verified");

        Ok(VerifyOtpOutput {
            user_id: user.id,
            phone_number: phone,
        })
    }
}
