use sea_orm::DatabaseConnection;

use admissions_domain::phone::PhonePlan;

use crate::domain::types::OtpAuthority;
use crate::infra::db::{
    DbApplicationRepository, DbDocumentRepository, DbDraftRepository, DbOtpCodeRepository,
    DbUserRepository,
};
use crate::infra::sms::ArkeselOtpProvider;
use crate::infra::storage::LocalDocumentStorage;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub sms: ArkeselOtpProvider,
    pub storage: LocalDocumentStorage,
    pub phone_plan: PhonePlan,
    pub otp_authority: OtpAuthority,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn otp_code_repo(&self) -> DbOtpCodeRepository {
        DbOtpCodeRepository {
            db: self.db.clone(),
        }
    }

    pub fn application_repo(&self) -> DbApplicationRepository {
        DbApplicationRepository {
            db: self.db.clone(),
        }
    }

    pub fn document_repo(&self) -> DbDocumentRepository {
        DbDocumentRepository {
            db: self.db.clone(),
        }
    }

    pub fn draft_repo(&self) -> DbDraftRepository {
        DbDraftRepository {
            db: self.db.clone(),
        }
    }

    pub fn otp_provider(&self) -> ArkeselOtpProvider {
        self.sms.clone()
    }

    pub fn document_storage(&self) -> LocalDocumentStorage {
        self.storage.clone()
    }
}
