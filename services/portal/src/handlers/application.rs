use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use admissions_domain::application::ApplicationStatus;
use admissions_domain::pagination::{PageInfo, PageRequest};

use crate::domain::sections::{
    ApplicationSections, EducationInfoInput, GuardianInfoInput, PersonalInfoInput,
    ProgramInfoInput,
};
use crate::domain::types::{ApplicantSummary, Application, ApplicationDetails, ApplicationFilter};
use crate::error::PortalError;
use crate::handlers::document::DocumentResponse;
use crate::handlers::{JsonBody, parse_id, parse_query};
use crate::state::AppState;
use crate::usecase::application::{
    CreateApplicationInput, CreateApplicationUseCase, DeleteApplicationInput,
    DeleteApplicationUseCase, GetApplicationUseCase, ListApplicationsInput,
    ListApplicationsUseCase, UpdateApplicationInput, UpdateApplicationUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

/// Flat application record as the admin dashboard consumes it.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationResponse {
    pub id: String,
    pub user_id: String,
    pub application_number: String,
    pub first_name: String,
    pub surname: String,
    pub gender: &'static str,
    pub date_of_birth: chrono::NaiveDate,
    pub email: String,
    pub telephone: String,
    pub nationality: String,
    pub address: String,
    pub gps_address: Option<String>,
    pub guardian_name: String,
    pub guardian_occupation: String,
    pub guardian_telephone: String,
    pub highest_education: &'static str,
    pub year_completed: i32,
    pub program_type: &'static str,
    pub specific_program: String,
    pub status: &'static str,
    #[serde(serialize_with = "admissions_core::serde::to_rfc3339_ms_opt")]
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(serialize_with = "admissions_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "admissions_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Application> for ApplicationResponse {
    fn from(app: Application) -> Self {
        Self {
            id: app.id.to_string(),
            user_id: app.user_id.to_string(),
            application_number: app.application_number.0,
            first_name: app.personal.first_name,
            surname: app.personal.surname,
            gender: app.personal.gender.as_str(),
            date_of_birth: app.personal.date_of_birth,
            email: app.personal.email,
            telephone: app.personal.telephone,
            nationality: app.personal.nationality,
            address: app.personal.address,
            gps_address: app.personal.gps_address,
            guardian_name: app.guardian.guardian_name,
            guardian_occupation: app.guardian.guardian_occupation,
            guardian_telephone: app.guardian.guardian_telephone,
            highest_education: app.education.highest_education.as_str(),
            year_completed: app.education.year_completed,
            program_type: app.program.program_type.as_str(),
            specific_program: app.program.specific_program,
            status: app.status.as_str(),
            submitted_at: app.submitted_at,
            created_at: app.created_at,
            updated_at: app.updated_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantResponse {
    pub phone_number: String,
    pub is_verified: bool,
    #[serde(serialize_with = "admissions_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<ApplicantSummary> for ApplicantResponse {
    fn from(owner: ApplicantSummary) -> Self {
        Self {
            phone_number: owner.phone_number.into_inner(),
            is_verified: owner.is_verified,
            created_at: owner.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct ApplicationDetailsResponse {
    #[serde(flatten)]
    pub application: ApplicationResponse,
    pub user: ApplicantResponse,
    pub documents: Vec<DocumentResponse>,
}

impl From<ApplicationDetails> for ApplicationDetailsResponse {
    fn from(details: ApplicationDetails) -> Self {
        Self {
            application: details.application.into(),
            user: details.owner.into(),
            documents: details.documents.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Serialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct MessageDataResponse<T> {
    pub success: bool,
    pub message: &'static str,
    pub data: T,
}

// ── GET /applications ────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListApplicationsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
    pub search: Option<String>,
}

impl ListApplicationsQuery {
    fn into_input(self) -> Result<ListApplicationsInput, PortalError> {
        let status = self
            .status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse::<ApplicationStatus>)
            .transpose()?;
        let search = self
            .search
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty());
        let defaults = PageRequest::default();
        Ok(ListApplicationsInput {
            filter: ApplicationFilter { status, search },
            page: PageRequest {
                page: self.page.unwrap_or(defaults.page),
                limit: self.limit.unwrap_or(defaults.limit),
            }
            .clamped(),
        })
    }
}

#[derive(Serialize)]
pub struct ListApplicationsResponse {
    pub success: bool,
    pub data: Vec<ApplicationDetailsResponse>,
    pub pagination: PageInfo,
}

pub async fn list_applications(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<ListApplicationsResponse>, PortalError> {
    let query: ListApplicationsQuery = parse_query(raw_query)?;
    let usecase = ListApplicationsUseCase {
        users: state.user_repo(),
        applications: state.application_repo(),
        documents: state.document_repo(),
    };
    let output = usecase.execute(query.into_input()?).await?;
    Ok(Json(ListApplicationsResponse {
        success: true,
        data: output.items.into_iter().map(Into::into).collect(),
        pagination: output.page,
    }))
}

// ── POST /applications ───────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationRequest {
    pub user_id: Option<String>,
    pub personal_info: Option<PersonalInfoInput>,
    pub guardian_info: Option<GuardianInfoInput>,
    pub education_info: Option<EducationInfoInput>,
    pub program_info: Option<ProgramInfoInput>,
}

pub async fn create_application(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateApplicationRequest>,
) -> Result<(StatusCode, Json<MessageDataResponse<ApplicationResponse>>), PortalError> {
    let raw_user_id = body
        .user_id
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| PortalError::MissingData("userId is required".to_owned()))?;
    let user_id = parse_id(&raw_user_id, "userId")?;

    let usecase = CreateApplicationUseCase {
        users: state.user_repo(),
        applications: state.application_repo(),
    };
    let application = usecase
        .execute(CreateApplicationInput {
            user_id,
            sections: ApplicationSections {
                personal_info: body.personal_info,
                guardian_info: body.guardian_info,
                education_info: body.education_info,
                program_info: body.program_info,
            },
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageDataResponse {
            success: true,
            message: "Application created successfully",
            data: application.into(),
        }),
    ))
}

// ── GET /applications/{id} ───────────────────────────────────────────────────

pub async fn get_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<ApplicationDetailsResponse>>, PortalError> {
    let id = parse_id(&id, "id")?;
    let usecase = GetApplicationUseCase {
        users: state.user_repo(),
        applications: state.application_repo(),
        documents: state.document_repo(),
    };
    let details = usecase.execute(id).await?;
    Ok(Json(DataResponse {
        success: true,
        data: details.into(),
    }))
}

// ── PUT /applications/{id} ───────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApplicationRequest {
    pub personal_info: Option<PersonalInfoInput>,
    pub guardian_info: Option<GuardianInfoInput>,
    pub education_info: Option<EducationInfoInput>,
    pub program_info: Option<ProgramInfoInput>,
    pub status: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

pub async fn update_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<UpdateApplicationRequest>,
) -> Result<Json<MessageDataResponse<ApplicationResponse>>, PortalError> {
    let id = parse_id(&id, "id")?;
    let status = body
        .status
        .as_deref()
        .map(str::parse::<ApplicationStatus>)
        .transpose()?;

    let usecase = UpdateApplicationUseCase {
        applications: state.application_repo(),
    };
    let application = usecase
        .execute(UpdateApplicationInput {
            id,
            sections: ApplicationSections {
                personal_info: body.personal_info,
                guardian_info: body.guardian_info,
                education_info: body.education_info,
                program_info: body.program_info,
            },
            status,
            is_admin: body.is_admin,
        })
        .await?;
    Ok(Json(MessageDataResponse {
        success: true,
        message: "Application updated successfully",
        data: application.into(),
    }))
}

// ── DELETE /applications/{id} ────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct DeleteApplicationQuery {
    pub admin: Option<bool>,
}

pub async fn delete_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<MessageResponse>, PortalError> {
    let id = parse_id(&id, "id")?;
    let query: DeleteApplicationQuery = parse_query(raw_query)?;
    let usecase = DeleteApplicationUseCase {
        applications: state.application_repo(),
        storage: state.document_storage(),
    };
    usecase
        .execute(DeleteApplicationInput {
            id,
            is_admin: query.admin.unwrap_or(false),
        })
        .await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Application deleted successfully",
    }))
}
