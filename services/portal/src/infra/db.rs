use anyhow::{Context as _, anyhow};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    sea_query::{Expr, OnConflict},
};
use uuid::Uuid;

use admissions_core::sea_ext::SearchAny;
use admissions_domain::application::ApplicationStatus;
use admissions_domain::id::ApplicationNumber;
use admissions_domain::pagination::PageRequest;
use admissions_domain::phone::PhoneNumber;
use admissions_portal_schema::{application_drafts, applications, documents, otp_codes, users};

use crate::domain::repository::{
    ApplicationRepository, DocumentRepository, DraftRepository, OtpCodeRepository,
    UserRepository,
};
use crate::domain::types::{
    Application, ApplicationFilter, Document, Draft, EducationInfo, GuardianInfo, OtpCode,
    PersonalInfo, ProgramInfo, User,
};
use crate::error::PortalError;

// ── User repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_phone(&self, phone: &PhoneNumber) -> Result<Option<User>, PortalError> {
        let model = users::Entity::find()
            .filter(users::Column::PhoneNumber.eq(phone.as_str()))
            .one(&self.db)
            .await
            .context("find user by phone")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, PortalError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, PortalError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let models = users::Entity::find()
            .filter(users::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .context("find users by ids")?;
        Ok(models.into_iter().map(user_from_model).collect())
    }

    async fn find_or_create(&self, phone: &PhoneNumber) -> Result<User, PortalError> {
        users::Entity::insert(users::ActiveModel {
            id: Set(Uuid::new_v4()),
            phone_number: Set(phone.as_str().to_owned()),
            is_verified: Set(false),
            created_at: Set(Utc::now()),
        })
        .on_conflict(
            OnConflict::column(users::Column::PhoneNumber)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&self.db)
        .await
        .context("insert user if absent")?;

        self.find_by_phone(phone)
            .await?
            .ok_or_else(|| anyhow!("user for {phone} missing after insert").into())
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        phone_number: PhoneNumber::from_canonical(model.phone_number),
        is_verified: model.is_verified,
        created_at: model.created_at,
    }
}

// ── OTP code repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOtpCodeRepository {
    pub db: DatabaseConnection,
}

impl OtpCodeRepository for DbOtpCodeRepository {
    async fn issue(&self, code: &OtpCode) -> Result<u64, PortalError> {
        let invalidated = self
            .db
            .transaction::<_, u64, DbErr>(|txn| {
                let code = code.clone();
                Box::pin(async move {
                    // Serialize issuance per user.
                    users::Entity::find_by_id(code.user_id)
                        .lock_exclusive()
                        .one(txn)
                        .await?;

                    let invalidated = otp_codes::Entity::update_many()
                        .col_expr(otp_codes::Column::IsUsed, Expr::value(true))
                        .filter(otp_codes::Column::UserId.eq(code.user_id))
                        .filter(otp_codes::Column::IsUsed.eq(false))
                        .exec(txn)
                        .await?
                        .rows_affected;

                    otp_codes::ActiveModel {
                        id: Set(code.id),
                        user_id: Set(code.user_id),
                        code_hash: Set(code.code_hash.clone()),
                        code_salt: Set(code.code_salt.clone()),
                        phone_number: Set(code.phone_number.as_str().to_owned()),
                        is_used: Set(false),
                        failed_attempts: Set(0),
                        expires_at: Set(code.expires_at),
                        created_at: Set(code.created_at),
                    }
                    .insert(txn)
                    .await?;
                    Ok(invalidated)
                })
            })
            .await
            .context("issue otp code")?;
        Ok(invalidated)
    }

    async fn find_latest_unused(&self, user_id: Uuid) -> Result<Option<OtpCode>, PortalError> {
        let model = otp_codes::Entity::find()
            .filter(otp_codes::Column::UserId.eq(user_id))
            .filter(otp_codes::Column::IsUsed.eq(false))
            .order_by_desc(otp_codes::Column::CreatedAt)
            .one(&self.db)
            .await
            .context("find latest unused otp code")?;
        Ok(model.map(otp_code_from_model))
    }

    async fn record_failure(&self, code_id: Uuid, max_attempts: i32) -> Result<bool, PortalError> {
        // SET expressions read the pre-update row, so both see the old count.
        let attempts = Expr::col(otp_codes::Column::FailedAttempts).add(1);
        let updated = otp_codes::Entity::update_many()
            .col_expr(otp_codes::Column::FailedAttempts, attempts.clone())
            .col_expr(
                otp_codes::Column::IsUsed,
                Expr::expr(attempts).gte(max_attempts),
            )
            .filter(otp_codes::Column::Id.eq(code_id))
            .filter(otp_codes::Column::IsUsed.eq(false))
            .exec_with_returning(&self.db)
            .await
            .context("record otp failure")?;
        Ok(updated.first().is_some_and(|m| m.is_used))
    }

    async fn consume(&self, code_id: Uuid, user_id: Uuid) -> Result<bool, PortalError> {
        let consumed = self
            .db
            .transaction::<_, bool, DbErr>(|txn| {
                Box::pin(async move {
                    let marked = otp_codes::Entity::update_many()
                        .col_expr(otp_codes::Column::IsUsed, Expr::value(true))
                        .filter(otp_codes::Column::Id.eq(code_id))
                        .filter(otp_codes::Column::IsUsed.eq(false))
                        .exec(txn)
                        .await?;
                    if marked.rows_affected == 0 {
                        return Ok(false);
                    }
                    users::Entity::update_many()
                        .col_expr(users::Column::IsVerified, Expr::value(true))
                        .filter(users::Column::Id.eq(user_id))
                        .exec(txn)
                        .await?;
                    Ok(true)
                })
            })
            .await
            .context("consume otp code")?;
        Ok(consumed)
    }
}

fn otp_code_from_model(model: otp_codes::Model) -> OtpCode {
    OtpCode {
        id: model.id,
        user_id: model.user_id,
        code_hash: model.code_hash,
        code_salt: model.code_salt,
        phone_number: PhoneNumber::from_canonical(model.phone_number),
        is_used: model.is_used,
        failed_attempts: model.failed_attempts,
        expires_at: model.expires_at,
        created_at: model.created_at,
    }
}

// ── Application repository ────────────────────────────────────────────────────

const SEARCH_COLUMNS: [applications::Column; 4] = [
    applications::Column::FirstName,
    applications::Column::Surname,
    applications::Column::Email,
    applications::Column::ApplicationNumber,
];

#[derive(Clone)]
pub struct DbApplicationRepository {
    pub db: DatabaseConnection,
}

impl ApplicationRepository for DbApplicationRepository {
    async fn create(&self, application: &Application) -> Result<(), PortalError> {
        applications::ActiveModel {
            id: Set(application.id),
            user_id: Set(application.user_id),
            application_number: Set(application.application_number.as_str().to_owned()),
            created_at: Set(application.created_at),
            ..application_changes(application)
        }
        .insert(&self.db)
        .await
        .context("create application")?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Application>, PortalError> {
        let model = applications::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find application by id")?;
        Ok(model.map(application_from_model).transpose()?)
    }

    async fn list(
        &self,
        filter: &ApplicationFilter,
        page: PageRequest,
    ) -> Result<(Vec<Application>, u64), PortalError> {
        let mut query = applications::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(applications::Column::Status.eq(status.as_str()));
        }
        if let Some(term) = filter.search.as_deref() {
            query = query.search_any(&SEARCH_COLUMNS, term);
        }

        let total = query
            .clone()
            .count(&self.db)
            .await
            .context("count applications")?;
        let models = query
            .order_by_desc(applications::Column::CreatedAt)
            .offset(page.offset())
            .limit(u64::from(page.clamped().limit))
            .all(&self.db)
            .await
            .context("list applications")?;

        let items = models
            .into_iter()
            .map(application_from_model)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok((items, total))
    }

    async fn update(
        &self,
        application: &Application,
        expected_status: ApplicationStatus,
    ) -> Result<bool, PortalError> {
        let result = applications::Entity::update_many()
            .set(application_changes(application))
            .filter(applications::Column::Id.eq(application.id))
            .filter(applications::Column::Status.eq(expected_status.as_str()))
            .exec(&self.db)
            .await
            .context("update application")?;
        Ok(result.rows_affected > 0)
    }

    async fn delete(
        &self,
        id: Uuid,
        expected_status: Option<ApplicationStatus>,
    ) -> Result<bool, PortalError> {
        let mut stmt = applications::Entity::delete_many().filter(applications::Column::Id.eq(id));
        if let Some(status) = expected_status {
            stmt = stmt.filter(applications::Column::Status.eq(status.as_str()));
        }
        let result = stmt.exec(&self.db).await.context("delete application")?;
        Ok(result.rows_affected > 0)
    }
}

/// Every mutable column; identity columns stay `NotSet`.
fn application_changes(app: &Application) -> applications::ActiveModel {
    let p = &app.personal;
    applications::ActiveModel {
        first_name: Set(p.first_name.clone()),
        surname: Set(p.surname.clone()),
        gender: Set(p.gender.as_str().to_owned()),
        date_of_birth: Set(p.date_of_birth),
        email: Set(p.email.clone()),
        telephone: Set(p.telephone.clone()),
        nationality: Set(p.nationality.clone()),
        address: Set(p.address.clone()),
        gps_address: Set(p.gps_address.clone()),
        guardian_name: Set(app.guardian.guardian_name.clone()),
        guardian_occupation: Set(app.guardian.guardian_occupation.clone()),
        guardian_telephone: Set(app.guardian.guardian_telephone.clone()),
        highest_education: Set(app.education.highest_education.as_str().to_owned()),
        year_completed: Set(app.education.year_completed),
        program_type: Set(app.program.program_type.as_str().to_owned()),
        specific_program: Set(app.program.specific_program.clone()),
        status: Set(app.status.as_str().to_owned()),
        submitted_at: Set(app.submitted_at),
        updated_at: Set(app.updated_at),
        ..Default::default()
    }
}

fn application_from_model(model: applications::Model) -> anyhow::Result<Application> {
    Ok(Application {
        id: model.id,
        user_id: model.user_id,
        application_number: ApplicationNumber(model.application_number),
        personal: PersonalInfo {
            first_name: model.first_name,
            surname: model.surname,
            gender: model.gender.parse()?,
            date_of_birth: model.date_of_birth,
            email: model.email,
            telephone: model.telephone,
            nationality: model.nationality,
            address: model.address,
            gps_address: model.gps_address,
        },
        guardian: GuardianInfo {
            guardian_name: model.guardian_name,
            guardian_occupation: model.guardian_occupation,
            guardian_telephone: model.guardian_telephone,
        },
        education: EducationInfo {
            highest_education: model.highest_education.parse()?,
            year_completed: model.year_completed,
        },
        program: ProgramInfo {
            program_type: model.program_type.parse()?,
            specific_program: model.specific_program,
        },
        status: model.status.parse()?,
        submitted_at: model.submitted_at,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Document repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbDocumentRepository {
    pub db: DatabaseConnection,
}

impl DocumentRepository for DbDocumentRepository {
    async fn create(&self, document: &Document) -> Result<(), PortalError> {
        documents::ActiveModel {
            id: Set(document.id),
            application_id: Set(document.application_id),
            document_type: Set(document.document_type.as_str().to_owned()),
            file_name: Set(document.file_name.clone()),
            original_name: Set(document.original_name.clone()),
            file_size: Set(document.file_size),
            mime_type: Set(document.mime_type.clone()),
            file_url: Set(document.file_url.clone()),
            uploaded_at: Set(document.uploaded_at),
        }
        .insert(&self.db)
        .await
        .context("create document")?;
        Ok(())
    }

    async fn list_by_application(
        &self,
        application_id: Uuid,
    ) -> Result<Vec<Document>, PortalError> {
        self.list_by_applications(&[application_id]).await
    }

    async fn list_by_applications(
        &self,
        application_ids: &[Uuid],
    ) -> Result<Vec<Document>, PortalError> {
        if application_ids.is_empty() {
            return Ok(vec![]);
        }
        let models = documents::Entity::find()
            .filter(documents::Column::ApplicationId.is_in(application_ids.iter().copied()))
            .order_by_desc(documents::Column::UploadedAt)
            .all(&self.db)
            .await
            .context("list documents")?;
        Ok(models
            .into_iter()
            .map(document_from_model)
            .collect::<anyhow::Result<Vec<_>>>()?)
    }
}

fn document_from_model(model: documents::Model) -> anyhow::Result<Document> {
    Ok(Document {
        id: model.id,
        application_id: model.application_id,
        document_type: model.document_type.parse()?,
        file_name: model.file_name,
        original_name: model.original_name,
        file_size: model.file_size,
        mime_type: model.mime_type,
        file_url: model.file_url,
        uploaded_at: model.uploaded_at,
    })
}

// ── Draft repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbDraftRepository {
    pub db: DatabaseConnection,
}

impl DraftRepository for DbDraftRepository {
    async fn find(&self, user_id: Uuid) -> Result<Option<Draft>, PortalError> {
        let model = application_drafts::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .context("find draft")?;
        let Some(model) = model else {
            return Ok(None);
        };
        let sections = serde_json::from_value(model.sections).context("decode draft sections")?;
        Ok(Some(Draft {
            user_id: model.user_id,
            sections,
            updated_at: model.updated_at,
        }))
    }

    async fn upsert(&self, draft: &Draft) -> Result<(), PortalError> {
        let sections = serde_json::to_value(&draft.sections).context("encode draft sections")?;
        application_drafts::Entity::insert(application_drafts::ActiveModel {
            user_id: Set(draft.user_id),
            sections: Set(sections),
            updated_at: Set(draft.updated_at),
        })
        .on_conflict(
            OnConflict::column(application_drafts::Column::UserId)
                .update_columns([
                    application_drafts::Column::Sections,
                    application_drafts::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(&self.db)
        .await
        .context("upsert draft")?;
        Ok(())
    }

    async fn delete(&self, user_id: Uuid) -> Result<bool, PortalError> {
        let result = application_drafts::Entity::delete_by_id(user_id)
            .exec(&self.db)
            .await
            .context("delete draft")?;
        Ok(result.rows_affected > 0)
    }
}
