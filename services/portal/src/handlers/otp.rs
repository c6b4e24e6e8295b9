use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::error::PortalError;
use crate::handlers::JsonBody;
use crate::state::AppState;
use crate::usecase::otp::{RequestOtpInput, RequestOtpUseCase, VerifyOtpInput, VerifyOtpUseCase};

// ── POST /otp/request ────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOtpRequest {
    #[serde(default)]
    pub phone_number: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOtpResponse {
    pub success: bool,
    pub message: &'static str,
    pub phone_number: String,
}

pub async fn request_otp(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RequestOtpRequest>,
) -> Result<Json<RequestOtpResponse>, PortalError> {
    let usecase = RequestOtpUseCase {
        users: state.user_repo(),
        otp_codes: state.otp_code_repo(),
        provider: state.otp_provider(),
        phone_plan: state.phone_plan.clone(),
        authority: state.otp_authority,
    };
    let output = usecase
        .execute(RequestOtpInput {
            phone_number: body.phone_number,
        })
        .await?;
    Ok(Json(RequestOtpResponse {
        success: true,
        message: "OTP sent successfully",
        phone_number: output.phone_number.into_inner(),
    }))
}

// ── POST /otp/verify ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub code: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpResponse {
    pub success: bool,
    pub message: &'static str,
    pub user_id: String,
    pub phone_number: String,
}

pub async fn verify_otp(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<VerifyOtpRequest>,
) -> Result<Json<VerifyOtpResponse>, PortalError> {
    let usecase = VerifyOtpUseCase {
        users: state.user_repo(),
        otp_codes: state.otp_code_repo(),
        provider: state.otp_provider(),
        phone_plan: state.phone_plan.clone(),
        authority: state.otp_authority,
    };
    let output = usecase
        .execute(VerifyOtpInput {
            phone_number: body.phone_number,
            code: body.code,
        })
        .await?;
    Ok(Json(VerifyOtpResponse {
        success: true,
        message: "Phone number verified successfully",
        user_id: output.user_id.to_string(),
        phone_number: output.phone_number.into_inner(),
    }))
}
