use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use admissions_domain::application::{ApplicationStatus, EducationLevel, Gender, ProgramType};
use admissions_domain::document::DocumentType;
use admissions_domain::id::ApplicationNumber;
use admissions_domain::pagination::PageRequest;
use admissions_domain::phone::PhoneNumber;
use admissions_portal::domain::repository::{
    ApplicationRepository, DocumentRepository, DocumentStorage, DraftRepository,
    OtpCodeRepository, OtpProvider, UserRepository,
};
use admissions_portal::domain::sections::{
    ApplicationSections, EducationInfoInput, GuardianInfoInput, PersonalInfoInput,
    ProgramInfoInput, YearInput,
};
use admissions_portal::domain::types::{
    Application, ApplicationFilter, Document, Draft, EducationInfo, GuardianInfo, OtpCode,
    PersonalInfo, ProgramInfo, ProviderVerdict, User,
};
use admissions_portal::error::PortalError;

// ── MockUserRepo ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<User>>>,
}

impl MockUserRepo {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Shared handle to the user list for post-execution inspection.
    pub fn users_handle(&self) -> Arc<Mutex<Vec<User>>> {
        Arc::clone(&self.users)
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_phone(&self, phone: &PhoneNumber) -> Result<Option<User>, PortalError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| &u.phone_number == phone)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, PortalError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, PortalError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn find_or_create(&self, phone: &PhoneNumber) -> Result<User, PortalError> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter().find(|u| &u.phone_number == phone) {
            return Ok(user.clone());
        }
        let user = User {
            id: Uuid::new_v4(),
            phone_number: phone.clone(),
            is_verified: false,
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }
}

// ── MockOtpCodeRepo ──────────────────────────────────────────────────────────

/// Shares the user list with [`MockUserRepo`] so `consume` can flip
/// `is_verified` the way the real transaction does.
#[derive(Clone)]
pub struct MockOtpCodeRepo {
    pub codes: Arc<Mutex<Vec<OtpCode>>>,
    pub users: Arc<Mutex<Vec<User>>>,
}

impl MockOtpCodeRepo {
    pub fn new(users: Arc<Mutex<Vec<User>>>) -> Self {
        Self {
            codes: Arc::new(Mutex::new(vec![])),
            users,
        }
    }

    pub fn codes_handle(&self) -> Arc<Mutex<Vec<OtpCode>>> {
        Arc::clone(&self.codes)
    }
}

impl OtpCodeRepository for MockOtpCodeRepo {
    async fn issue(&self, code: &OtpCode) -> Result<u64, PortalError> {
        let mut codes = self.codes.lock().unwrap();
        let mut invalidated = 0;
        for c in codes
            .iter_mut()
            .filter(|c| c.user_id == code.user_id && !c.is_used)
        {
            c.is_used = true;
            invalidated += 1;
        }
        codes.push(code.clone());
        Ok(invalidated)
    }

    async fn find_latest_unused(&self, user_id: Uuid) -> Result<Option<OtpCode>, PortalError> {
        Ok(self
            .codes
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.user_id == user_id && !c.is_used)
            .max_by_key(|c| c.created_at)
            .cloned())
    }

    async fn record_failure(&self, code_id: Uuid, max_attempts: i32) -> Result<bool, PortalError> {
        let mut codes = self.codes.lock().unwrap();
        let Some(code) = codes.iter_mut().find(|c| c.id == code_id && !c.is_used) else {
            return Ok(false);
        };
        code.failed_attempts += 1;
        code.is_used = code.failed_attempts >= max_attempts;
        Ok(code.is_used)
    }

    async fn consume(&self, code_id: Uuid, user_id: Uuid) -> Result<bool, PortalError> {
        let mut codes = self.codes.lock().unwrap();
        let Some(code) = codes.iter_mut().find(|c| c.id == code_id && !c.is_used) else {
            return Ok(false);
        };
        code.is_used = true;
        if let Some(user) = self.users.lock().unwrap().iter_mut().find(|u| u.id == user_id) {
            user.is_verified = true;
        }
        Ok(true)
    }
}

// ── MockOtpProvider ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockOtpProvider {
    /// `(phone, message)` pairs delivered through `send_sms`.
    pub sent: Arc<Mutex<Vec<(String, String)>>>,
    /// `(phone, template)` pairs passed to `generate`.
    pub generated: Arc<Mutex<Vec<(String, String)>>>,
    pub verdict: ProviderVerdict,
    pub fail: bool,
}

impl MockOtpProvider {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(vec![])),
            generated: Arc::new(Mutex::new(vec![])),
            verdict: ProviderVerdict::Verified,
            fail: false,
        }
    }

    pub fn with_verdict(verdict: ProviderVerdict) -> Self {
        Self {
            verdict,
            ..Self::new()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn sent_handle(&self) -> Arc<Mutex<Vec<(String, String)>>> {
        Arc::clone(&self.sent)
    }

    pub fn generated_handle(&self) -> Arc<Mutex<Vec<(String, String)>>> {
        Arc::clone(&self.generated)
    }
}

impl OtpProvider for MockOtpProvider {
    async fn send_sms(&self, phone: &PhoneNumber, message: &str) -> Result<(), PortalError> {
        if self.fail {
            return Err(PortalError::Provider("gateway unavailable".to_owned()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((phone.to_string(), message.to_owned()));
        Ok(())
    }

    async fn generate(&self, phone: &PhoneNumber, template: &str) -> Result<(), PortalError> {
        if self.fail {
            return Err(PortalError::Provider("gateway unavailable".to_owned()));
        }
        self.generated
            .lock()
            .unwrap()
            .push((phone.to_string(), template.to_owned()));
        Ok(())
    }

    async fn verify(
        &self,
        _phone: &PhoneNumber,
        _code: &str,
    ) -> Result<ProviderVerdict, PortalError> {
        if self.fail {
            return Err(PortalError::Provider("gateway unavailable".to_owned()));
        }
        Ok(self.verdict.clone())
    }
}

/// Pull the six-digit code out of a rendered OTP message.
pub fn extract_code(message: &str) -> String {
    message
        .split(|c: char| !c.is_ascii_digit())
        .find(|part| part.len() == 6)
        .expect("message should contain a 6-digit code")
        .to_owned()
}

// ── MockApplicationRepo ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockApplicationRepo {
    pub applications: Arc<Mutex<Vec<Application>>>,
}

impl MockApplicationRepo {
    pub fn new(applications: Vec<Application>) -> Self {
        Self {
            applications: Arc::new(Mutex::new(applications)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn applications_handle(&self) -> Arc<Mutex<Vec<Application>>> {
        Arc::clone(&self.applications)
    }
}

fn matches_search(app: &Application, term: &str) -> bool {
    let term = term.to_lowercase();
    [
        app.personal.first_name.as_str(),
        app.personal.surname.as_str(),
        app.personal.email.as_str(),
        app.application_number.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&term))
}

impl ApplicationRepository for MockApplicationRepo {
    async fn create(&self, application: &Application) -> Result<(), PortalError> {
        self.applications.lock().unwrap().push(application.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Application>, PortalError> {
        Ok(self
            .applications
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn list(
        &self,
        filter: &ApplicationFilter,
        page: PageRequest,
    ) -> Result<(Vec<Application>, u64), PortalError> {
        let mut matched: Vec<Application> = self
            .applications
            .lock()
            .unwrap()
            .iter()
            .filter(|a| filter.status.is_none_or(|s| a.status == s))
            .filter(|a| filter.search.as_deref().is_none_or(|t| matches_search(a, t)))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = matched.len() as u64;
        let items = matched
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.clamped().limit as usize)
            .collect();
        Ok((items, total))
    }

    async fn update(
        &self,
        application: &Application,
        expected_status: ApplicationStatus,
    ) -> Result<bool, PortalError> {
        let mut apps = self.applications.lock().unwrap();
        match apps
            .iter_mut()
            .find(|a| a.id == application.id && a.status == expected_status)
        {
            Some(stored) => {
                *stored = application.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(
        &self,
        id: Uuid,
        expected_status: Option<ApplicationStatus>,
    ) -> Result<bool, PortalError> {
        let mut apps = self.applications.lock().unwrap();
        let before = apps.len();
        apps.retain(|a| !(a.id == id && expected_status.is_none_or(|s| a.status == s)));
        Ok(apps.len() < before)
    }
}

// ── MockDocumentRepo ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockDocumentRepo {
    pub documents: Arc<Mutex<Vec<Document>>>,
    pub fail_create: bool,
}

impl MockDocumentRepo {
    pub fn new(documents: Vec<Document>) -> Self {
        Self {
            documents: Arc::new(Mutex::new(documents)),
            fail_create: false,
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn failing() -> Self {
        Self {
            fail_create: true,
            ..Self::empty()
        }
    }

    pub fn documents_handle(&self) -> Arc<Mutex<Vec<Document>>> {
        Arc::clone(&self.documents)
    }
}

impl DocumentRepository for MockDocumentRepo {
    async fn create(&self, document: &Document) -> Result<(), PortalError> {
        if self.fail_create {
            return Err(PortalError::Internal(anyhow::anyhow!("insert failed")));
        }
        self.documents.lock().unwrap().push(document.clone());
        Ok(())
    }

    async fn list_by_application(&self, application_id: Uuid) -> Result<Vec<Document>, PortalError> {
        let mut docs: Vec<Document> = self
            .documents
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.application_id == application_id)
            .cloned()
            .collect();
        docs.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(docs)
    }

    async fn list_by_applications(
        &self,
        application_ids: &[Uuid],
    ) -> Result<Vec<Document>, PortalError> {
        Ok(self
            .documents
            .lock()
            .unwrap()
            .iter()
            .filter(|d| application_ids.contains(&d.application_id))
            .cloned()
            .collect())
    }
}

// ── MockDraftRepo ────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockDraftRepo {
    pub drafts: Arc<Mutex<Vec<Draft>>>,
}

impl MockDraftRepo {
    pub fn new(drafts: Vec<Draft>) -> Self {
        Self {
            drafts: Arc::new(Mutex::new(drafts)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn drafts_handle(&self) -> Arc<Mutex<Vec<Draft>>> {
        Arc::clone(&self.drafts)
    }
}

impl DraftRepository for MockDraftRepo {
    async fn find(&self, user_id: Uuid) -> Result<Option<Draft>, PortalError> {
        Ok(self
            .drafts
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.user_id == user_id)
            .cloned())
    }

    async fn upsert(&self, draft: &Draft) -> Result<(), PortalError> {
        let mut drafts = self.drafts.lock().unwrap();
        drafts.retain(|d| d.user_id != draft.user_id);
        drafts.push(draft.clone());
        Ok(())
    }

    async fn delete(&self, user_id: Uuid) -> Result<bool, PortalError> {
        let mut drafts = self.drafts.lock().unwrap();
        let before = drafts.len();
        drafts.retain(|d| d.user_id != user_id);
        Ok(drafts.len() < before)
    }
}

// ── MockDocumentStorage ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockDocumentStorage {
    /// `(application_id, file_name, size)` of every stored file still present.
    pub files: Arc<Mutex<Vec<(Uuid, String, usize)>>>,
    pub removed_applications: Arc<Mutex<Vec<Uuid>>>,
    pub fail_remove: bool,
}

impl MockDocumentStorage {
    pub fn new() -> Self {
        Self {
            files: Arc::new(Mutex::new(vec![])),
            removed_applications: Arc::new(Mutex::new(vec![])),
            fail_remove: false,
        }
    }

    pub fn failing_remove() -> Self {
        Self {
            fail_remove: true,
            ..Self::new()
        }
    }

    pub fn files_handle(&self) -> Arc<Mutex<Vec<(Uuid, String, usize)>>> {
        Arc::clone(&self.files)
    }

    pub fn removed_handle(&self) -> Arc<Mutex<Vec<Uuid>>> {
        Arc::clone(&self.removed_applications)
    }
}

impl DocumentStorage for MockDocumentStorage {
    async fn store(
        &self,
        application_id: Uuid,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<(), PortalError> {
        self.files
            .lock()
            .unwrap()
            .push((application_id, file_name.to_owned(), bytes.len()));
        Ok(())
    }

    async fn remove(&self, application_id: Uuid, file_name: &str) -> Result<(), PortalError> {
        if self.fail_remove {
            return Err(PortalError::Internal(anyhow::anyhow!("disk error")));
        }
        self.files
            .lock()
            .unwrap()
            .retain(|(app, name, _)| !(*app == application_id && name == file_name));
        Ok(())
    }

    async fn remove_application(&self, application_id: Uuid) -> Result<(), PortalError> {
        if self.fail_remove {
            return Err(PortalError::Internal(anyhow::anyhow!("disk error")));
        }
        self.files
            .lock()
            .unwrap()
            .retain(|(app, _, _)| *app != application_id);
        self.removed_applications.lock().unwrap().push(application_id);
        Ok(())
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn verified_user() -> User {
    User {
        id: Uuid::new_v4(),
        phone_number: PhoneNumber::from_canonical("+233244123456"),
        is_verified: true,
        created_at: Utc::now(),
    }
}

pub fn unverified_user() -> User {
    User {
        is_verified: false,
        ..verified_user()
    }
}

pub fn personal_input() -> PersonalInfoInput {
    PersonalInfoInput {
        first_name: Some("Ama".to_owned()),
        surname: Some("Mensah".to_owned()),
        gender: Some("female".to_owned()),
        date_of_birth: Some("2004-03-15".to_owned()),
        email: Some("ama@example.com".to_owned()),
        telephone: Some("0244123456".to_owned()),
        nationality: Some("Ghanaian".to_owned()),
        address: Some("12 Ring Road, Accra".to_owned()),
        gps_address: Some("GA-123-4567".to_owned()),
    }
}

pub fn complete_sections() -> ApplicationSections {
    ApplicationSections {
        personal_info: Some(personal_input()),
        guardian_info: Some(GuardianInfoInput {
            guardian_name: Some("Kofi Mensah".to_owned()),
            guardian_occupation: Some("Teacher".to_owned()),
            guardian_telephone: Some("0201234567".to_owned()),
        }),
        education_info: Some(EducationInfoInput {
            highest_education: Some("WASSCE".to_owned()),
            year_completed: Some(YearInput::Number(2022)),
        }),
        program_info: Some(ProgramInfoInput {
            program_type: Some("DIPLOMA".to_owned()),
            specific_program: Some("Software Engineering".to_owned()),
        }),
    }
}

pub fn sample_application(user_id: Uuid, status: ApplicationStatus) -> Application {
    let now = Utc::now();
    Application {
        id: Uuid::new_v4(),
        user_id,
        application_number: ApplicationNumber::generate(now),
        personal: PersonalInfo {
            first_name: "Ama".to_owned(),
            surname: "Mensah".to_owned(),
            gender: Gender::Female,
            date_of_birth: NaiveDate::from_ymd_opt(2004, 3, 15).unwrap(),
            email: "ama@example.com".to_owned(),
            telephone: "0244123456".to_owned(),
            nationality: "Ghanaian".to_owned(),
            address: "12 Ring Road, Accra".to_owned(),
            gps_address: None,
        },
        guardian: GuardianInfo {
            guardian_name: "Kofi Mensah".to_owned(),
            guardian_occupation: "Teacher".to_owned(),
            guardian_telephone: "0201234567".to_owned(),
        },
        education: EducationInfo {
            highest_education: EducationLevel::Wassce,
            year_completed: 2022,
        },
        program: ProgramInfo {
            program_type: ProgramType::Diploma,
            specific_program: "Software Engineering".to_owned(),
        },
        status,
        submitted_at: (status == ApplicationStatus::Submitted).then(Utc::now),
        created_at: now,
        updated_at: now,
    }
}

pub fn sample_document(application_id: Uuid) -> Document {
    let file_name = format!("proof_of_education_{}.pdf", Uuid::now_v7().simple());
    Document {
        id: Uuid::new_v4(),
        application_id,
        document_type: DocumentType::ProofOfEducation,
        file_url: format!("/uploads/{application_id}/{file_name}"),
        file_name,
        original_name: "wassce.pdf".to_owned(),
        file_size: 1024,
        mime_type: "application/pdf".to_owned(),
        uploaded_at: Utc::now(),
    }
}
