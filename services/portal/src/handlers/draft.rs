use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;

use crate::domain::sections::ApplicationSections;
use crate::domain::types::Draft;
use crate::error::PortalError;
use crate::handlers::application::{
    ApplicationResponse, DataResponse, MessageDataResponse, MessageResponse,
};
use crate::handlers::{JsonBody, parse_id};
use crate::state::AppState;
use crate::usecase::draft::{
    DiscardDraftUseCase, FinalizeDraftUseCase, GetDraftUseCase, SaveDraftInput, SaveDraftUseCase,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftResponse {
    pub user_id: String,
    #[serde(flatten)]
    pub sections: ApplicationSections,
    #[serde(serialize_with = "admissions_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Draft> for DraftResponse {
    fn from(draft: Draft) -> Self {
        Self {
            user_id: draft.user_id.to_string(),
            sections: draft.sections,
            updated_at: draft.updated_at,
        }
    }
}

// ── GET /drafts/{user_id} ────────────────────────────────────────────────────

pub async fn get_draft(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<DataResponse<DraftResponse>>, PortalError> {
    let user_id = parse_id(&user_id, "userId")?;
    let usecase = GetDraftUseCase {
        drafts: state.draft_repo(),
    };
    let draft = usecase.execute(user_id).await?;
    Ok(Json(DataResponse {
        success: true,
        data: draft.into(),
    }))
}

// ── PUT /drafts/{user_id} ────────────────────────────────────────────────────

pub async fn save_draft(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    JsonBody(sections): JsonBody<ApplicationSections>,
) -> Result<Json<DataResponse<DraftResponse>>, PortalError> {
    let user_id = parse_id(&user_id, "userId")?;
    let usecase = SaveDraftUseCase {
        users: state.user_repo(),
        drafts: state.draft_repo(),
    };
    let draft = usecase.execute(SaveDraftInput { user_id, sections }).await?;
    Ok(Json(DataResponse {
        success: true,
        data: draft.into(),
    }))
}

// ── DELETE /drafts/{user_id} ─────────────────────────────────────────────────

pub async fn discard_draft(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<MessageResponse>, PortalError> {
    let user_id = parse_id(&user_id, "userId")?;
    let usecase = DiscardDraftUseCase {
        drafts: state.draft_repo(),
    };
    usecase.execute(user_id).await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Draft discarded",
    }))
}

// ── POST /drafts/{user_id}/finalize ──────────────────────────────────────────

pub async fn finalize_draft(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<(StatusCode, Json<MessageDataResponse<ApplicationResponse>>), PortalError> {
    let user_id = parse_id(&user_id, "userId")?;
    let usecase = FinalizeDraftUseCase {
        users: state.user_repo(),
        applications: state.application_repo(),
        drafts: state.draft_repo(),
    };
    let application = usecase.execute(user_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageDataResponse {
            success: true,
            message: "Application created successfully",
            data: application.into(),
        }),
    ))
}
