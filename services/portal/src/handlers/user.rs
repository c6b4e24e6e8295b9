use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::domain::types::User;
use crate::error::PortalError;
use crate::handlers::JsonBody;
use crate::state::AppState;
use crate::usecase::user::LookupUserByPhoneUseCase;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub phone_number: String,
    pub is_verified: bool,
    #[serde(serialize_with = "admissions_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            phone_number: user.phone_number.into_inner(),
            is_verified: user.is_verified,
            created_at: user.created_at,
        }
    }
}

// ── POST /users/lookup-by-phone ──────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupByPhoneRequest {
    #[serde(default)]
    pub phone_number: String,
}

#[derive(Serialize)]
pub struct LookupByPhoneResponse {
    pub success: bool,
    pub data: UserResponse,
}

pub async fn lookup_by_phone(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LookupByPhoneRequest>,
) -> Result<Json<LookupByPhoneResponse>, PortalError> {
    let usecase = LookupUserByPhoneUseCase {
        users: state.user_repo(),
        phone_plan: state.phone_plan.clone(),
    };
    let user = usecase.execute(&body.phone_number).await?;
    Ok(Json(LookupByPhoneResponse {
        success: true,
        data: user.into(),
    }))
}
