use arkesel::models::{GenerateOtpRequest, OtpKind, OtpMedium, VerifyOtpRequest, VerifyResultCode};
use arkesel::{ArkeselClient, ArkeselError};

use admissions_domain::phone::PhoneNumber;

use crate::domain::repository::OtpProvider;
use crate::domain::types::{OTP_LENGTH, OTP_TTL_MINUTES, ProviderVerdict};
use crate::error::PortalError;

/// [`OtpProvider`] backed by the Arkesel gateway.
#[derive(Clone)]
pub struct ArkeselOtpProvider {
    pub client: ArkeselClient,
}

impl OtpProvider for ArkeselOtpProvider {
    async fn send_sms(&self, phone: &PhoneNumber, message: &str) -> Result<(), PortalError> {
        self.client
            .send_sms(vec![phone.to_string()], message)
            .await
            .map_err(provider_error)?;
        Ok(())
    }

    async fn generate(&self, phone: &PhoneNumber, template: &str) -> Result<(), PortalError> {
        let request = GenerateOtpRequest {
            expiry: OTP_TTL_MINUTES,
            length: OTP_LENGTH,
            medium: OtpMedium::Sms,
            message: template.to_owned(),
            number: phone.to_string(),
            sender_id: self.client.sender_id().to_owned(),
            kind: OtpKind::Numeric,
        };
        self.client
            .generate_otp(&request)
            .await
            .map_err(provider_error)?;
        Ok(())
    }

    async fn verify(
        &self,
        phone: &PhoneNumber,
        code: &str,
    ) -> Result<ProviderVerdict, PortalError> {
        let response = self
            .client
            .verify_otp(&VerifyOtpRequest {
                code: code.to_owned(),
                number: phone.to_string(),
            })
            .await
            .map_err(provider_error)?;
        Ok(match response.result() {
            VerifyResultCode::Verified => ProviderVerdict::Verified,
            VerifyResultCode::InvalidCode => ProviderVerdict::InvalidCode,
            VerifyResultCode::Expired => ProviderVerdict::Expired,
            VerifyResultCode::InvalidPhoneNumber => ProviderVerdict::InvalidPhoneNumber,
            VerifyResultCode::Other => ProviderVerdict::Failed(response.message),
        })
    }
}

fn provider_error(e: ArkeselError) -> PortalError {
    PortalError::Provider(e.to_string())
}
