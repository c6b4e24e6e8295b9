use chrono::{Duration, Utc};
use uuid::Uuid;

use admissions_domain::phone::{PhoneNumber, PhonePlan};
use admissions_portal::domain::types::{
    OTP_MAX_ATTEMPTS, OtpAuthority, OtpCode, ProviderVerdict, User,
};
use admissions_portal::error::PortalError;
use admissions_portal::usecase::otp::{
    RequestOtpInput, RequestOtpUseCase, VerifyOtpInput, VerifyOtpUseCase, hash_code,
};

use crate::helpers::{
    MockOtpCodeRepo, MockOtpProvider, MockUserRepo, extract_code, unverified_user,
};

struct Fixture {
    users: MockUserRepo,
    codes: MockOtpCodeRepo,
    provider: MockOtpProvider,
    authority: OtpAuthority,
}

impl Fixture {
    fn new(users: Vec<User>, provider: MockOtpProvider, authority: OtpAuthority) -> Self {
        let users = MockUserRepo::new(users);
        let codes = MockOtpCodeRepo::new(users.users_handle());
        Self {
            users,
            codes,
            provider,
            authority,
        }
    }

    fn local() -> Self {
        Self::new(vec![], MockOtpProvider::new(), OtpAuthority::Local)
    }

    fn request(&self) -> RequestOtpUseCase<MockUserRepo, MockOtpCodeRepo, MockOtpProvider> {
        RequestOtpUseCase {
            users: self.users.clone(),
            otp_codes: self.codes.clone(),
            provider: self.provider.clone(),
            phone_plan: PhonePlan::default(),
            authority: self.authority,
        }
    }

    fn verify(&self) -> VerifyOtpUseCase<MockUserRepo, MockOtpCodeRepo, MockOtpProvider> {
        VerifyOtpUseCase {
            users: self.users.clone(),
            otp_codes: self.codes.clone(),
            provider: self.provider.clone(),
            phone_plan: PhonePlan::default(),
            authority: self.authority,
        }
    }
}

fn stored_code(user: &User, code: &str, expires_in: Duration) -> OtpCode {
    let now = Utc::now();
    let salt = Uuid::new_v4().simple().to_string();
    OtpCode {
        id: Uuid::new_v4(),
        user_id: user.id,
        code_hash: Some(hash_code(&salt, code)),
        code_salt: Some(salt),
        phone_number: user.phone_number.clone(),
        is_used: false,
        failed_attempts: 0,
        expires_at: now + expires_in,
        created_at: now,
    }
}

fn request_input(phone: &str) -> RequestOtpInput {
    RequestOtpInput {
        phone_number: phone.to_owned(),
    }
}

fn verify_input(phone: &str, code: &str) -> VerifyOtpInput {
    VerifyOtpInput {
        phone_number: phone.to_owned(),
        code: code.to_owned(),
    }
}

// ── RequestOtp ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_normalize_number_and_send_local_code() {
    let fx = Fixture::local();
    let sent = fx.provider.sent_handle();
    let codes = fx.codes.codes_handle();

    let output = fx.request().execute(request_input("0244123456")).await.unwrap();
    assert_eq!(output.phone_number.as_str(), "+233244123456");

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1, "exactly one sms per request");
    assert_eq!(sent[0].0, "+233244123456");
    assert!(sent[0].1.contains("expires in 5 minutes"), "got {}", sent[0].1);
    let code = extract_code(&sent[0].1);

    let codes = codes.lock().unwrap();
    assert_eq!(codes.len(), 1);
    let issued = &codes[0];
    assert!(!issued.is_used);
    let salt = issued.code_salt.as_deref().unwrap();
    assert_eq!(issued.code_hash.as_deref(), Some(hash_code(salt, &code).as_str()));
    let ttl = issued.expires_at - issued.created_at;
    assert_eq!(ttl, Duration::minutes(5));
}

#[tokio::test]
async fn should_create_unverified_user_on_first_request() {
    let fx = Fixture::local();
    let users = fx.users.users_handle();

    fx.request().execute(request_input("233244123456")).await.unwrap();
    fx.request().execute(request_input("+233 24 412 3456")).await.unwrap();

    let users = users.lock().unwrap();
    assert_eq!(users.len(), 1, "all input forms resolve to one user");
    assert!(!users[0].is_verified);
}

#[tokio::test]
async fn should_invalidate_all_prior_unused_codes() {
    let user = unverified_user();
    let fx = Fixture::local();
    fx.users.users_handle().lock().unwrap().push(user.clone());
    {
        let mut codes = fx.codes.codes.lock().unwrap();
        for _ in 0..3 {
            codes.push(stored_code(&user, "111111", Duration::minutes(5)));
        }
    }
    let codes = fx.codes.codes_handle();

    fx.request().execute(request_input("0244123456")).await.unwrap();

    let codes = codes.lock().unwrap();
    assert_eq!(codes.len(), 4);
    assert!(codes[..3].iter().all(|c| c.is_used), "prior codes must be used");
    assert!(!codes[3].is_used, "new code stays active");
    assert_eq!(codes.iter().filter(|c| !c.is_used).count(), 1);
}

#[tokio::test]
async fn should_keep_prior_codes_when_provider_fails() {
    let user = unverified_user();
    let fx = Fixture::new(
        vec![user.clone()],
        MockOtpProvider::failing(),
        OtpAuthority::Local,
    );
    fx.codes
        .codes
        .lock()
        .unwrap()
        .push(stored_code(&user, "222222", Duration::minutes(5)));
    let codes = fx.codes.codes_handle();

    let result = fx.request().execute(request_input("0244123456")).await;

    assert!(
        matches!(result, Err(PortalError::Provider(_))),
        "expected Provider, got {result:?}"
    );
    let codes = codes.lock().unwrap();
    assert_eq!(codes.len(), 1, "nothing persisted on provider failure");
    assert!(!codes[0].is_used, "previous code still usable");
}

#[tokio::test]
async fn should_reject_malformed_phone_number() {
    let fx = Fixture::local();

    let foreign = fx.request().execute(request_input("+14155550100")).await;
    assert!(matches!(foreign, Err(PortalError::InvalidPhoneFormat)));

    let blank = fx.request().execute(request_input("  ")).await;
    assert!(matches!(blank, Err(PortalError::MissingData(_))));

    assert!(fx.provider.sent_handle().lock().unwrap().is_empty());
}

// ── VerifyOtp (local authority) ──────────────────────────────────────────────

#[tokio::test]
async fn should_verify_end_to_end_and_reject_reuse() {
    let fx = Fixture::local();
    let sent = fx.provider.sent_handle();
    let users = fx.users.users_handle();
    let codes = fx.codes.codes_handle();

    let requested = fx.request().execute(request_input("0244123456")).await.unwrap();
    assert_eq!(requested.phone_number.as_str(), "+233244123456");
    let code = extract_code(&sent.lock().unwrap()[0].1);

    let verified = fx
        .verify()
        .execute(verify_input("+233244123456", &code))
        .await
        .unwrap();
    assert_eq!(verified.phone_number, PhoneNumber::from_canonical("+233244123456"));
    {
        let users = users.lock().unwrap();
        assert_eq!(verified.user_id, users[0].id);
        assert!(users[0].is_verified);
    }
    assert!(codes.lock().unwrap()[0].is_used);

    let again = fx.verify().execute(verify_input("0244123456", &code)).await;
    assert!(
        matches!(again, Err(PortalError::NoActiveOtp)),
        "expected NoActiveOtp, got {again:?}"
    );
}

#[tokio::test]
async fn should_reject_wrong_code_and_count_the_attempt() {
    let user = unverified_user();
    let fx = Fixture::new(vec![user.clone()], MockOtpProvider::new(), OtpAuthority::Local);
    fx.codes
        .codes
        .lock()
        .unwrap()
        .push(stored_code(&user, "123456", Duration::minutes(5)));

    let result = fx.verify().execute(verify_input("0244123456", "654321")).await;

    assert!(
        matches!(result, Err(PortalError::InvalidCode)),
        "expected InvalidCode, got {result:?}"
    );
    let codes = fx.codes.codes.lock().unwrap();
    assert!(!codes[0].is_used);
    assert_eq!(codes[0].failed_attempts, 1);
    assert!(!fx.users.users.lock().unwrap()[0].is_verified);
}

#[tokio::test]
async fn should_burn_code_after_max_wrong_attempts() {
    let user = unverified_user();
    let fx = Fixture::new(vec![user.clone()], MockOtpProvider::new(), OtpAuthority::Local);
    fx.codes
        .codes
        .lock()
        .unwrap()
        .push(stored_code(&user, "123456", Duration::minutes(5)));

    for _ in 0..OTP_MAX_ATTEMPTS {
        let result = fx.verify().execute(verify_input("0244123456", "000000")).await;
        assert!(matches!(result, Err(PortalError::InvalidCode)), "got {result:?}");
    }
    assert!(fx.codes.codes.lock().unwrap()[0].is_used);

    // The right code no longer works once the code is burned.
    let result = fx.verify().execute(verify_input("0244123456", "123456")).await;
    assert!(
        matches!(result, Err(PortalError::NoActiveOtp)),
        "expected NoActiveOtp, got {result:?}"
    );
    assert!(!fx.users.users.lock().unwrap()[0].is_verified);
}

#[tokio::test]
async fn should_accept_right_code_before_attempts_run_out() {
    let user = unverified_user();
    let fx = Fixture::new(vec![user.clone()], MockOtpProvider::new(), OtpAuthority::Local);
    fx.codes
        .codes
        .lock()
        .unwrap()
        .push(stored_code(&user, "123456", Duration::minutes(5)));

    for _ in 0..OTP_MAX_ATTEMPTS - 1 {
        let _ = fx.verify().execute(verify_input("0244123456", "000000")).await;
    }
    fx.verify()
        .execute(verify_input("0244123456", "123456"))
        .await
        .unwrap();

    assert!(fx.users.users.lock().unwrap()[0].is_verified);
}

#[tokio::test]
async fn should_fail_with_otp_expired_and_leave_user_unverified() {
    let user = unverified_user();
    let fx = Fixture::new(vec![user.clone()], MockOtpProvider::new(), OtpAuthority::Local);
    fx.codes
        .codes
        .lock()
        .unwrap()
        .push(stored_code(&user, "123456", Duration::seconds(-1)));

    let result = fx.verify().execute(verify_input("0244123456", "123456")).await;

    assert!(
        matches!(result, Err(PortalError::OtpExpired)),
        "expected OtpExpired, got {result:?}"
    );
    assert!(!fx.users.users.lock().unwrap()[0].is_verified);
    assert!(!fx.codes.codes.lock().unwrap()[0].is_used);
}

#[tokio::test]
async fn should_return_user_not_found_for_unknown_number() {
    let fx = Fixture::local();

    let result = fx.verify().execute(verify_input("0244123456", "123456")).await;

    assert!(
        matches!(result, Err(PortalError::UserNotFound)),
        "expected UserNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_return_no_active_otp_when_none_issued() {
    let fx = Fixture::new(
        vec![unverified_user()],
        MockOtpProvider::new(),
        OtpAuthority::Local,
    );

    let result = fx.verify().execute(verify_input("0244123456", "123456")).await;

    assert!(matches!(result, Err(PortalError::NoActiveOtp)));
}

#[tokio::test]
async fn should_require_code() {
    let fx = Fixture::local();

    let result = fx.verify().execute(verify_input("0244123456", " ")).await;

    assert!(matches!(result, Err(PortalError::MissingData(_))));
}

// ── Provider authority ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_delegate_generation_to_provider() {
    let fx = Fixture::new(vec![], MockOtpProvider::new(), OtpAuthority::Provider);
    let generated = fx.provider.generated_handle();
    let sent = fx.provider.sent_handle();
    let codes = fx.codes.codes_handle();

    fx.request().execute(request_input("0244123456")).await.unwrap();

    let generated = generated.lock().unwrap();
    assert_eq!(generated.len(), 1);
    assert_eq!(generated[0].0, "+233244123456");
    assert!(generated[0].1.contains("%otp_code%"));
    assert!(sent.lock().unwrap().is_empty(), "no local sms in provider mode");
    let codes = codes.lock().unwrap();
    assert_eq!(codes.len(), 1);
    assert!(codes[0].code_hash.is_none());
}

#[tokio::test]
async fn should_verify_through_provider_ignoring_local_expiry() {
    let user = unverified_user();
    let fx = Fixture::new(
        vec![user.clone()],
        MockOtpProvider::with_verdict(ProviderVerdict::Verified),
        OtpAuthority::Provider,
    );
    fx.codes
        .codes
        .lock()
        .unwrap()
        .push(stored_code(&user, "123456", Duration::seconds(-30)));

    let output = fx
        .verify()
        .execute(verify_input("0244123456", "999999"))
        .await
        .unwrap();

    assert_eq!(output.user_id, user.id);
    assert!(fx.users.users.lock().unwrap()[0].is_verified);
    assert!(fx.codes.codes.lock().unwrap()[0].is_used);
}

#[tokio::test]
async fn should_map_provider_verdicts_to_errors() {
    let cases = [
        (ProviderVerdict::InvalidCode, "INVALID_CODE"),
        (ProviderVerdict::Expired, "OTP_EXPIRED"),
        (ProviderVerdict::InvalidPhoneNumber, "INVALID_PHONE_FORMAT"),
        (
            ProviderVerdict::Failed(Some("unknown".to_owned())),
            "VERIFICATION_FAILED",
        ),
    ];

    for (verdict, kind) in cases {
        let user = unverified_user();
        let fx = Fixture::new(
            vec![user.clone()],
            MockOtpProvider::with_verdict(verdict.clone()),
            OtpAuthority::Provider,
        );
        fx.codes
            .codes
            .lock()
            .unwrap()
            .push(stored_code(&user, "123456", Duration::minutes(5)));

        let err = fx
            .verify()
            .execute(verify_input("0244123456", "123456"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), kind, "verdict {verdict:?}");
        assert!(!fx.users.users.lock().unwrap()[0].is_verified);
        assert!(!fx.codes.codes.lock().unwrap()[0].is_used);
    }
}

#[tokio::test]
async fn should_surface_provider_transport_failure() {
    let user = unverified_user();
    let fx = Fixture::new(
        vec![user.clone()],
        MockOtpProvider::failing(),
        OtpAuthority::Provider,
    );
    fx.codes
        .codes
        .lock()
        .unwrap()
        .push(stored_code(&user, "123456", Duration::minutes(5)));

    let result = fx.verify().execute(verify_input("0244123456", "123456")).await;

    assert!(matches!(result, Err(PortalError::Provider(_))));
}
