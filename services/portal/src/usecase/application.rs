use std::collections::{HashMap, HashSet};

use anyhow::anyhow;
use chrono::Utc;
use uuid::Uuid;

use admissions_domain::application::ApplicationStatus;
use admissions_domain::id::ApplicationNumber;
use admissions_domain::pagination::{PageInfo, PageRequest};

use crate::domain::repository::{
    ApplicationRepository, DocumentRepository, DocumentStorage, UserRepository,
};
use crate::domain::sections::ApplicationSections;
use crate::domain::types::{ApplicantSummary, Application, ApplicationDetails, ApplicationFilter};
use crate::error::PortalError;

pub struct CreateApplicationInput {
    pub user_id: Uuid,
    pub sections: ApplicationSections,
}

/// Validate the sections and the owner, and build a new DRAFT application
/// without storing it.
pub(crate) async fn prepare_application<U: UserRepository>(
    users: &U,
    input: CreateApplicationInput,
) -> Result<Application, PortalError> {
    let (personal, guardian, education, program) = input.sections.validate()?;

    let user = users
        .find_by_id(input.user_id)
        .await?
        .ok_or(PortalError::UserNotFound)?;
    if !user.is_verified {
        return Err(PortalError::UserNotVerified);
    }

    let now = Utc::now();
    Ok(Application {
        id: Uuid::new_v4(),
        user_id: user.id,
        application_number: ApplicationNumber::generate(now),
        personal,
        guardian,
        education,
        program,
        status: ApplicationStatus::Draft,
        submitted_at: None,
        created_at: now,
        updated_at: now,
    })
}

/// Store an application built by [`prepare_application`].
pub(crate) async fn store_application<A: ApplicationRepository>(
    applications: &A,
    application: &Application,
) -> Result<(), PortalError> {
    applications.create(application).await?;
    tracing::info!(
        application_id = %application.id,
        application_number = %application.application_number,
        user_id = %application.user_id,
        "application created"
    );
    Ok(())
}

/// Decide what a lost conditional write means by looking at the row again.
/// Only a status change or a deletion can make the write miss.
async fn classify_lost_write<A: ApplicationRepository>(
    applications: &A,
    id: Uuid,
    is_admin: bool,
    attempted: ApplicationStatus,
) -> PortalError {
    match applications.find_by_id(id).await {
        Ok(None) => PortalError::ApplicationNotFound,
        Ok(Some(current)) if current.status == ApplicationStatus::Submitted && !is_admin => {
            PortalError::Forbidden
        }
        Ok(Some(current)) => PortalError::InvalidTransition {
            from: current.status.to_string(),
            to: attempted.to_string(),
        },
        Err(e) => e,
    }
}

// ── CreateApplication ────────────────────────────────────────────────────────

pub struct CreateApplicationUseCase<U, A>
where
    U: UserRepository,
    A: ApplicationRepository,
{
    pub users: U,
    pub applications: A,
}

impl<U, A> CreateApplicationUseCase<U, A>
where
    U: UserRepository,
    A: ApplicationRepository,
{
    pub async fn execute(&self, input: CreateApplicationInput) -> Result<Application, PortalError> {
        let application = prepare_application(&self.users, input).await?;
        store_application(&self.applications, &application).await?;
        Ok(application)
    }
}

// ── GetApplication ───────────────────────────────────────────────────────────

pub struct GetApplicationUseCase<U, A, D>
where
    U: UserRepository,
    A: ApplicationRepository,
    D: DocumentRepository,
{
    pub users: U,
    pub applications: A,
    pub documents: D,
}

impl<U, A, D> GetApplicationUseCase<U, A, D>
where
    U: UserRepository,
    A: ApplicationRepository,
    D: DocumentRepository,
{
    pub async fn execute(&self, id: Uuid) -> Result<ApplicationDetails, PortalError> {
        let application = self
            .applications
            .find_by_id(id)
            .await?
            .ok_or(PortalError::ApplicationNotFound)?;
        let owner = self
            .users
            .find_by_id(application.user_id)
            .await?
            .ok_or_else(|| anyhow!("application {id} has no owner"))?;
        let documents = self.documents.list_by_application(id).await?;
        Ok(ApplicationDetails {
            owner: ApplicantSummary::from(&owner),
            application,
            documents,
        })
    }
}

// ── ListApplications ─────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct ListApplicationsInput {
    pub filter: ApplicationFilter,
    pub page: PageRequest,
}

#[derive(Debug)]
pub struct ListApplicationsOutput {
    pub items: Vec<ApplicationDetails>,
    pub page: PageInfo,
}

pub struct ListApplicationsUseCase<U, A, D>
where
    U: UserRepository,
    A: ApplicationRepository,
    D: DocumentRepository,
{
    pub users: U,
    pub applications: A,
    pub documents: D,
}

impl<U, A, D> ListApplicationsUseCase<U, A, D>
where
    U: UserRepository,
    A: ApplicationRepository,
    D: DocumentRepository,
{
    pub async fn execute(
        &self,
        input: ListApplicationsInput,
    ) -> Result<ListApplicationsOutput, PortalError> {
        let page = input.page.clamped();
        let (applications, total) = self.applications.list(&input.filter, page).await?;

        let user_ids: Vec<Uuid> = applications
            .iter()
            .map(|a| a.user_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let owners: HashMap<Uuid, ApplicantSummary> = self
            .users
            .find_by_ids(&user_ids)
            .await?
            .iter()
            .map(|u| (u.id, ApplicantSummary::from(u)))
            .collect();

        let application_ids: Vec<Uuid> = applications.iter().map(|a| a.id).collect();
        let mut documents_by_app: HashMap<Uuid, Vec<_>> = HashMap::new();
        for doc in self.documents.list_by_applications(&application_ids).await? {
            documents_by_app.entry(doc.application_id).or_default().push(doc);
        }

        let items = applications
            .into_iter()
            .map(|application| {
                let owner = owners
                    .get(&application.user_id)
                    .cloned()
                    .ok_or_else(|| anyhow!("application {} has no owner", application.id))?;
                let documents = documents_by_app.remove(&application.id).unwrap_or_default();
                Ok(ApplicationDetails {
                    application,
                    owner,
                    documents,
                })
            })
            .collect::<Result<Vec<_>, PortalError>>()?;

        Ok(ListApplicationsOutput {
            items,
            page: PageInfo::new(page, total),
        })
    }
}

// ── UpdateApplication ────────────────────────────────────────────────────────

pub struct UpdateApplicationInput {
    pub id: Uuid,
    pub sections: ApplicationSections,
    pub status: Option<ApplicationStatus>,
    pub is_admin: bool,
}

pub struct UpdateApplicationUseCase<A: ApplicationRepository> {
    pub applications: A,
}

impl<A: ApplicationRepository> UpdateApplicationUseCase<A> {
    pub async fn execute(&self, input: UpdateApplicationInput) -> Result<Application, PortalError> {
        let current = self
            .applications
            .find_by_id(input.id)
            .await?
            .ok_or(PortalError::ApplicationNotFound)?;

        if current.status == ApplicationStatus::Submitted && !input.is_admin {
            return Err(PortalError::Forbidden);
        }

        let mut next = current.clone();
        if let Some(target) = input.status {
            if !current.status.can_transition_to(target) {
                return Err(PortalError::InvalidTransition {
                    from: current.status.to_string(),
                    to: target.to_string(),
                });
            }
            next.status = target;
        }

        let sections = &input.sections;
        if let Some(p) = &sections.personal_info {
            p.apply_to(&mut next.personal)?;
        }
        if let Some(g) = &sections.guardian_info {
            g.apply_to(&mut next.guardian)?;
        }
        if let Some(e) = &sections.education_info {
            e.apply_to(&mut next.education)?;
        }
        if let Some(p) = &sections.program_info {
            p.apply_to(&mut next.program)?;
        }

        let now = Utc::now();
        let submitting = current.status == ApplicationStatus::Draft
            && next.status == ApplicationStatus::Submitted;
        if submitting {
            next.submitted_at = Some(now);
        }
        next.updated_at = now;

        if !self.applications.update(&next, current.status).await? {
            let err =
                classify_lost_write(&self.applications, input.id, input.is_admin, next.status)
                    .await;
            return Err(err);
        }

        if submitting {
            tracing::info!(application_id = %next.id, "application submitted");
        }
        Ok(next)
    }
}

// ── DeleteApplication ────────────────────────────────────────────────────────

pub struct DeleteApplicationInput {
    pub id: Uuid,
    pub is_admin: bool,
}

pub struct DeleteApplicationUseCase<A, S>
where
    A: ApplicationRepository,
    S: DocumentStorage,
{
    pub applications: A,
    pub storage: S,
}

impl<A, S> DeleteApplicationUseCase<A, S>
where
    A: ApplicationRepository,
    S: DocumentStorage,
{
    pub async fn execute(&self, input: DeleteApplicationInput) -> Result<(), PortalError> {
        let current = self
            .applications
            .find_by_id(input.id)
            .await?
            .ok_or(PortalError::ApplicationNotFound)?;

        if current.status == ApplicationStatus::Submitted && !input.is_admin {
            return Err(PortalError::Forbidden);
        }

        // Administrators may delete in any state; everyone else only while
        // the row is still a draft.
        let expected = (!input.is_admin).then_some(current.status);
        if !self.applications.delete(input.id, expected).await? {
            let err =
                classify_lost_write(&self.applications, input.id, input.is_admin, current.status)
                    .await;
            return Err(err);
        }
        tracing::info!(application_id = %input.id, "application deleted");

        // Rows are gone; stray files are only a disk-space concern.
        if let Err(e) = self.storage.remove_application(input.id).await {
            tracing::warn!(application_id = %input.id, error = %e, "failed to remove application files");
        }
        Ok(())
    }
}
