use axum::{
    Json,
    extract::{Multipart, RawQuery, State, multipart::MultipartError},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::domain::types::{Document, UploadedFile};
use crate::error::PortalError;
use crate::handlers::application::{DataResponse, MessageDataResponse};
use crate::handlers::parse_query;
use crate::state::AppState;
use crate::usecase::document::{ListDocumentsUseCase, UploadDocumentInput, UploadDocumentUseCase};

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    pub id: String,
    pub application_id: String,
    pub document_type: &'static str,
    pub file_name: String,
    pub original_name: String,
    pub file_size: i64,
    pub mime_type: String,
    pub file_url: String,
    #[serde(serialize_with = "admissions_core::serde::to_rfc3339_ms")]
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}

impl From<Document> for DocumentResponse {
    fn from(doc: Document) -> Self {
        Self {
            id: doc.id.to_string(),
            application_id: doc.application_id.to_string(),
            document_type: doc.document_type.as_str(),
            file_name: doc.file_name,
            original_name: doc.original_name,
            file_size: doc.file_size,
            mime_type: doc.mime_type,
            file_url: doc.file_url,
            uploaded_at: doc.uploaded_at,
        }
    }
}

fn multipart_error(err: MultipartError, limit: usize) -> PortalError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        PortalError::PayloadTooLarge {
            limit: limit as u64,
        }
    } else {
        PortalError::InvalidInput(err.body_text())
    }
}

// ── POST /documents ──────────────────────────────────────────────────────────

pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<MessageDataResponse<DocumentResponse>>), PortalError> {
    let limit = state.max_upload_bytes;
    let mut input = UploadDocumentInput::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("applicationId") => {
                input.application_id =
                    Some(field.text().await.map_err(|e| multipart_error(e, limit))?);
            }
            Some("documentType") => {
                input.document_type =
                    Some(field.text().await.map_err(|e| multipart_error(e, limit))?);
            }
            Some("file") => {
                let original_name = field.file_name().unwrap_or_default().to_owned();
                let mime_type = field
                    .content_type()
                    .unwrap_or(FALLBACK_CONTENT_TYPE)
                    .to_owned();
                let bytes = field.bytes().await.map_err(|e| multipart_error(e, limit))?;
                input.file = Some(UploadedFile {
                    original_name,
                    mime_type,
                    bytes,
                });
            }
            _ => {}
        }
    }

    let usecase = UploadDocumentUseCase {
        applications: state.application_repo(),
        documents: state.document_repo(),
        storage: state.document_storage(),
    };
    let document = usecase.execute(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageDataResponse {
            success: true,
            message: "Document uploaded successfully",
            data: document.into(),
        }),
    ))
}

// ── GET /documents ───────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListDocumentsQuery {
    pub application_id: Option<String>,
}

pub async fn list_documents(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<DataResponse<Vec<DocumentResponse>>>, PortalError> {
    let query: ListDocumentsQuery = parse_query(raw_query)?;
    let usecase = ListDocumentsUseCase {
        documents: state.document_repo(),
    };
    let documents = usecase.execute(query.application_id.as_deref()).await?;
    Ok(Json(DataResponse {
        success: true,
        data: documents.into_iter().map(Into::into).collect(),
    }))
}
