use chrono::Utc;
use uuid::Uuid;

use admissions_domain::document::{DocumentType, extension_for_mime};

use crate::domain::repository::{ApplicationRepository, DocumentRepository, DocumentStorage};
use crate::domain::types::{Document, UploadedFile};
use crate::error::PortalError;

/// Public URL prefix the upload directory is served under.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

fn parse_application_id(raw: &str) -> Result<Uuid, PortalError> {
    raw.trim()
        .parse::<Uuid>()
        .map_err(|_| PortalError::InvalidInput("applicationId must be a UUID".to_owned()))
}

// ── UploadDocument ───────────────────────────────────────────────────────────

/// Raw multipart fields; every one of them is optional on the wire.
#[derive(Default)]
pub struct UploadDocumentInput {
    pub application_id: Option<String>,
    pub document_type: Option<String>,
    pub file: Option<UploadedFile>,
}

pub struct UploadDocumentUseCase<A, D, S>
where
    A: ApplicationRepository,
    D: DocumentRepository,
    S: DocumentStorage,
{
    pub applications: A,
    pub documents: D,
    pub storage: S,
}

impl<A, D, S> UploadDocumentUseCase<A, D, S>
where
    A: ApplicationRepository,
    D: DocumentRepository,
    S: DocumentStorage,
{
    pub async fn execute(&self, input: UploadDocumentInput) -> Result<Document, PortalError> {
        let (Some(raw_app_id), Some(raw_type), Some(file)) =
            (input.application_id, input.document_type, input.file)
        else {
            return Err(PortalError::MissingData(
                "file, applicationId and documentType are required".to_owned(),
            ));
        };

        let document_type: DocumentType = raw_type.parse()?;
        let application_id = parse_application_id(&raw_app_id)?;

        let size = file.bytes.len() as u64;
        if size > document_type.max_bytes() {
            return Err(PortalError::PayloadTooLarge {
                limit: document_type.max_bytes(),
            });
        }
        if !document_type.accepts_mime_type(&file.mime_type) {
            return Err(PortalError::UnsupportedMediaType(file.mime_type));
        }

        self.applications
            .find_by_id(application_id)
            .await?
            .ok_or(PortalError::ApplicationNotFound)?;

        // Extension follows the accepted content type, never the client's file name.
        let extension = extension_for_mime(&file.mime_type)
            .ok_or_else(|| PortalError::UnsupportedMediaType(file.mime_type.clone()))?;
        let file_name = format!(
            "{}_{}.{extension}",
            document_type.file_prefix(),
            Uuid::now_v7().simple()
        );

        self.storage
            .store(application_id, &file_name, &file.bytes)
            .await?;

        let document = Document {
            id: Uuid::new_v4(),
            application_id,
            document_type,
            file_url: format!("{UPLOADS_URL_PREFIX}/{application_id}/{file_name}"),
            file_name,
            original_name: file.original_name,
            file_size: i64::try_from(size).unwrap_or(i64::MAX),
            mime_type: file.mime_type.trim().to_ascii_lowercase(),
            uploaded_at: Utc::now(),
        };

        if let Err(e) = self.documents.create(&document).await {
            if let Err(cleanup) = self.storage.remove(application_id, &document.file_name).await {
                tracing::warn!(
                    application_id = %application_id,
                    file_name = %document.file_name,
                    error = %cleanup,
                    "failed to remove orphaned upload"
                );
            }
            return Err(e);
        }

        tracing::info!(
            document_id = %document.id,
            application_id = %application_id,
            document_type = %document.document_type,
            size,
            "document uploaded"
        );
        Ok(document)
    }
}

// ── ListDocuments ────────────────────────────────────────────────────────────

pub struct ListDocumentsUseCase<D: DocumentRepository> {
    pub documents: D,
}

impl<D: DocumentRepository> ListDocumentsUseCase<D> {
    pub async fn execute(&self, application_id: Option<&str>) -> Result<Vec<Document>, PortalError> {
        let raw = application_id
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| PortalError::MissingData("applicationId is required".to_owned()))?;
        let application_id = parse_application_id(raw)?;
        self.documents.list_by_application(application_id).await
    }
}
