#![allow(async_fn_in_trait)]

use uuid::Uuid;

use admissions_domain::application::ApplicationStatus;
use admissions_domain::pagination::PageRequest;
use admissions_domain::phone::PhoneNumber;

use crate::domain::types::{
    Application, ApplicationFilter, Document, Draft, OtpCode, ProviderVerdict, User,
};
use crate::error::PortalError;

/// Repository for applicant identities.
pub trait UserRepository: Send + Sync {
    async fn find_by_phone(&self, phone: &PhoneNumber) -> Result<Option<User>, PortalError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, PortalError>;

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, PortalError>;

    /// Return the user for `phone`, inserting an unverified one if absent.
    /// Concurrent calls for the same number converge on one row.
    async fn find_or_create(&self, phone: &PhoneNumber) -> Result<User, PortalError>;
}

/// Repository for issued OTP codes.
pub trait OtpCodeRepository: Send + Sync {
    /// Mark every unused code of `code.user_id` used and insert `code`, in one
    /// transaction. Returns how many codes were invalidated.
    async fn issue(&self, code: &OtpCode) -> Result<u64, PortalError>;

    /// Most recently created unused code of the user, expired or not.
    async fn find_latest_unused(&self, user_id: Uuid) -> Result<Option<OtpCode>, PortalError>;

    /// Count a wrong guess against an unused code, burning it (marking it
    /// used) once `max_attempts` is reached. Returns `true` if it was burned.
    async fn record_failure(&self, code_id: Uuid, max_attempts: i32) -> Result<bool, PortalError>;

    /// Mark the code used and the user verified, in one transaction.
    /// Returns `false` if the code had already been consumed.
    async fn consume(&self, code_id: Uuid, user_id: Uuid) -> Result<bool, PortalError>;
}

/// Repository for applications.
pub trait ApplicationRepository: Send + Sync {
    async fn create(&self, application: &Application) -> Result<(), PortalError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Application>, PortalError>;

    /// One page of applications, newest first, plus the total match count.
    async fn list(
        &self,
        filter: &ApplicationFilter,
        page: PageRequest,
    ) -> Result<(Vec<Application>, u64), PortalError>;

    /// Overwrite the stored row only while its status is still
    /// `expected_status`. Returns `false` if nothing matched.
    async fn update(
        &self,
        application: &Application,
        expected_status: ApplicationStatus,
    ) -> Result<bool, PortalError>;

    /// Delete the row (documents cascade). With `expected_status`, only while
    /// the stored status still equals it. Returns `false` if nothing matched.
    async fn delete(
        &self,
        id: Uuid,
        expected_status: Option<ApplicationStatus>,
    ) -> Result<bool, PortalError>;
}

/// Repository for document metadata.
pub trait DocumentRepository: Send + Sync {
    async fn create(&self, document: &Document) -> Result<(), PortalError>;

    /// Documents of one application, newest first.
    async fn list_by_application(&self, application_id: Uuid)
    -> Result<Vec<Document>, PortalError>;

    async fn list_by_applications(
        &self,
        application_ids: &[Uuid],
    ) -> Result<Vec<Document>, PortalError>;
}

/// Repository for wizard drafts.
pub trait DraftRepository: Send + Sync {
    async fn find(&self, user_id: Uuid) -> Result<Option<Draft>, PortalError>;

    async fn upsert(&self, draft: &Draft) -> Result<(), PortalError>;

    /// Returns `true` if a draft was deleted.
    async fn delete(&self, user_id: Uuid) -> Result<bool, PortalError>;
}

/// Port for the SMS/OTP gateway.
pub trait OtpProvider: Send + Sync {
    /// Deliver a fully rendered message.
    async fn send_sms(&self, phone: &PhoneNumber, message: &str) -> Result<(), PortalError>;

    /// Have the gateway generate and deliver a code using `template`.
    async fn generate(&self, phone: &PhoneNumber, template: &str) -> Result<(), PortalError>;

    /// Ask the gateway whether `code` is the one it generated for `phone`.
    async fn verify(&self, phone: &PhoneNumber, code: &str)
    -> Result<ProviderVerdict, PortalError>;
}

/// Port for uploaded file bytes.
pub trait DocumentStorage: Send + Sync {
    async fn store(
        &self,
        application_id: Uuid,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<(), PortalError>;

    async fn remove(&self, application_id: Uuid, file_name: &str) -> Result<(), PortalError>;

    /// Remove every stored file of an application. Missing directory is not an error.
    async fn remove_application(&self, application_id: Uuid) -> Result<(), PortalError>;
}
