use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::{ApplicationRepository, DraftRepository, UserRepository};
use crate::domain::sections::ApplicationSections;
use crate::domain::types::{Application, Draft};
use crate::error::PortalError;
use crate::usecase::application::{
    CreateApplicationInput, prepare_application, store_application,
};

// ── SaveDraft ────────────────────────────────────────────────────────────────

pub struct SaveDraftInput {
    pub user_id: Uuid,
    pub sections: ApplicationSections,
}

pub struct SaveDraftUseCase<U, R>
where
    U: UserRepository,
    R: DraftRepository,
{
    pub users: U,
    pub drafts: R,
}

impl<U, R> SaveDraftUseCase<U, R>
where
    U: UserRepository,
    R: DraftRepository,
{
    pub async fn execute(&self, input: SaveDraftInput) -> Result<Draft, PortalError> {
        let user = self
            .users
            .find_by_id(input.user_id)
            .await?
            .ok_or(PortalError::UserNotFound)?;
        if !user.is_verified {
            return Err(PortalError::UserNotVerified);
        }

        let stored = self
            .drafts
            .find(user.id)
            .await?
            .map(|d| d.sections)
            .unwrap_or_default();
        let draft = Draft {
            user_id: user.id,
            sections: stored.overlay(input.sections),
            updated_at: Utc::now(),
        };
        self.drafts.upsert(&draft).await?;
        Ok(draft)
    }
}

// ── GetDraft ─────────────────────────────────────────────────────────────────

pub struct GetDraftUseCase<R: DraftRepository> {
    pub drafts: R,
}

impl<R: DraftRepository> GetDraftUseCase<R> {
    pub async fn execute(&self, user_id: Uuid) -> Result<Draft, PortalError> {
        self.drafts
            .find(user_id)
            .await?
            .ok_or(PortalError::DraftNotFound)
    }
}

// ── DiscardDraft ─────────────────────────────────────────────────────────────

pub struct DiscardDraftUseCase<R: DraftRepository> {
    pub drafts: R,
}

impl<R: DraftRepository> DiscardDraftUseCase<R> {
    /// Succeeds whether or not a draft existed.
    pub async fn execute(&self, user_id: Uuid) -> Result<(), PortalError> {
        self.drafts.delete(user_id).await?;
        Ok(())
    }
}

// ── FinalizeDraft ────────────────────────────────────────────────────────────

pub struct FinalizeDraftUseCase<U, A, R>
where
    U: UserRepository,
    A: ApplicationRepository,
    R: DraftRepository,
{
    pub users: U,
    pub applications: A,
    pub drafts: R,
}

impl<U, A, R> FinalizeDraftUseCase<U, A, R>
where
    U: UserRepository,
    A: ApplicationRepository,
    R: DraftRepository,
{
    /// Turn a complete draft into a DRAFT-status application and drop the draft.
    ///
    /// The draft is claimed by deleting it before the application is stored,
    /// so of two concurrent calls only the one whose delete matched creates an
    /// application. If storing fails the draft is put back.
    pub async fn execute(&self, user_id: Uuid) -> Result<Application, PortalError> {
        let draft = self
            .drafts
            .find(user_id)
            .await?
            .ok_or(PortalError::DraftNotFound)?;

        let application = prepare_application(
            &self.users,
            CreateApplicationInput {
                user_id,
                sections: draft.sections.clone(),
            },
        )
        .await?;

        if !self.drafts.delete(user_id).await? {
            return Err(PortalError::DraftNotFound);
        }

        if let Err(e) = store_application(&self.applications, &application).await {
            if let Err(restore) = self.drafts.upsert(&draft).await {
                tracing::warn!(user_id = %user_id, error = %restore, "failed to restore draft");
            }
            return Err(e);
        }
        Ok(application)
    }
}
