//! Async client for the Arkesel SMS/OTP gateway.
//!
//! Only the three endpoints the admissions portal needs are covered:
//! OTP generation, OTP verification and plain SMS delivery. Every call is a
//! single attempt; retry policy belongs to the caller.

mod error;
pub mod models;

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub use crate::error::ArkeselError;
use crate::models::{
    GenerateOtpRequest, GenerateOtpResponse, SendSmsRequest, SendSmsResponse, VerifyOtpRequest,
    VerifyOtpResponse,
};

pub const DEFAULT_BASE_URL: &str = "https://sms.arkesel.com";

const API_KEY_HEADER: &str = "api-key";
const GENERATE_OTP_PATH: &str = "/api/otp/generate";
const VERIFY_OTP_PATH: &str = "/api/otp/verify";
const SEND_SMS_PATH: &str = "/api/v2/sms/send";

#[derive(Debug, Clone)]
pub struct ArkeselOptions {
    pub api_key: String,
    /// Registered sender id shown on the handset (max 11 chars).
    pub sender_id: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl ArkeselOptions {
    pub fn new(api_key: impl Into<String>, sender_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            sender_id: sender_id.into(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArkeselClient {
    http: Client,
    options: ArkeselOptions,
}

impl ArkeselClient {
    pub fn new(options: ArkeselOptions) -> Result<Self, ArkeselError> {
        let http = Client::builder()
            .timeout(options.timeout)
            .build()
            .map_err(ArkeselError::Client)?;
        Ok(Self { http, options })
    }

    pub fn sender_id(&self) -> &str {
        &self.options.sender_id
    }

    /// Ask Arkesel to generate and deliver a code to `request.number`.
    pub async fn generate_otp(
        &self,
        request: &GenerateOtpRequest,
    ) -> Result<GenerateOtpResponse, ArkeselError> {
        let response = self.post(GENERATE_OTP_PATH, request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(rejected(GENERATE_OTP_PATH, status, response).await);
        }
        decode(GENERATE_OTP_PATH, response).await
    }

    /// Check a code against the one Arkesel generated.
    ///
    /// Arkesel reports wrong and expired codes through the result code in the
    /// body, so the body is decoded whatever the HTTP status. Inspect
    /// [`VerifyOtpResponse::result`] for the verdict.
    pub async fn verify_otp(
        &self,
        request: &VerifyOtpRequest,
    ) -> Result<VerifyOtpResponse, ArkeselError> {
        let response = self.post(VERIFY_OTP_PATH, request).await?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(|source| ArkeselError::Http {
            endpoint: VERIFY_OTP_PATH,
            source,
        })?;
        match serde_json::from_slice::<VerifyOtpResponse>(&bytes) {
            Ok(body) => Ok(body),
            Err(_) => Err(ArkeselError::Rejected {
                endpoint: VERIFY_OTP_PATH,
                status: status.as_u16(),
                message: String::from_utf8_lossy(&bytes).into_owned(),
            }),
        }
    }

    /// Send a plain SMS from the configured sender id.
    pub async fn send_sms(
        &self,
        recipients: Vec<String>,
        message: impl Into<String>,
    ) -> Result<SendSmsResponse, ArkeselError> {
        let request = SendSmsRequest {
            sender: self.options.sender_id.clone(),
            message: message.into(),
            recipients,
        };
        let response = self.post(SEND_SMS_PATH, &request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(rejected(SEND_SMS_PATH, status, response).await);
        }
        let body: SendSmsResponse = decode(SEND_SMS_PATH, response).await?;
        if !body.is_success() {
            return Err(ArkeselError::Rejected {
                endpoint: SEND_SMS_PATH,
                status: status.as_u16(),
                message: body.message.unwrap_or_else(|| "sms not accepted".to_owned()),
            });
        }
        Ok(body)
    }

    async fn post<T: Serialize>(
        &self,
        endpoint: &'static str,
        body: &T,
    ) -> Result<Response, ArkeselError> {
        let url = format!("{}{endpoint}", self.options.base_url.trim_end_matches('/'));
        tracing::debug!(endpoint, "calling arkesel");
        self.http
            .post(url)
            .header(API_KEY_HEADER, &self.options.api_key)
            .json(body)
            .send()
            .await
            .map_err(|source| ArkeselError::Http { endpoint, source })
    }
}

async fn decode<T: DeserializeOwned>(
    endpoint: &'static str,
    response: Response,
) -> Result<T, ArkeselError> {
    response
        .json::<T>()
        .await
        .map_err(|source| ArkeselError::Decode { endpoint, source })
}

async fn rejected(endpoint: &'static str, status: StatusCode, response: Response) -> ArkeselError {
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_owned))
        .unwrap_or(body);
    ArkeselError::Rejected {
        endpoint,
        status: status.as_u16(),
        message,
    }
}
