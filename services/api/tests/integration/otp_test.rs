use chrono::Duration;

use manareh_api::error::ApiError;
use manareh_api::infra::password::verify_password;
use manareh_api::usecase::otp::{
    ProfileInput, RequestCodeInput, RequestCodeUseCase, VerifyCodeInput, VerifyCodeOutput,
    VerifyCodeUseCase,
};
use manareh_auth_types::token::validate_access_token;

use crate::helpers::{
    MockPendingRepo, MockSms, MockStore, MockUserRepo, TEST_EMAIL, TEST_JWT_SECRET,
    TEST_PASSWORD, TEST_PHONE, test_profile, test_user,
};

fn request_uc(
    store: &MockStore,
    sms: &MockSms,
    code_ttl: Duration,
) -> RequestCodeUseCase<MockUserRepo, MockPendingRepo, MockSms> {
    RequestCodeUseCase {
        users: store.user_repo(),
        pending: store.pending_repo(),
        sms: sms.clone(),
        code_ttl,
    }
}

fn verify_uc(store: &MockStore) -> VerifyCodeUseCase<MockUserRepo, MockPendingRepo> {
    VerifyCodeUseCase {
        users: store.user_repo(),
        pending: store.pending_repo(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        access_token_ttl_secs: 1800,
    }
}

fn new_registration(profile: ProfileInput) -> RequestCodeInput {
    RequestCodeInput {
        email: profile.email.clone(),
        phone_number: profile.phone_number.clone(),
        profile: Some(profile),
    }
}

fn resend(email: &str, phone_number: &str) -> RequestCodeInput {
    RequestCodeInput {
        email: email.to_owned(),
        phone_number: phone_number.to_owned(),
        profile: None,
    }
}

async fn verify(store: &MockStore, code: &str) -> Result<VerifyCodeOutput, ApiError> {
    verify_uc(store)
        .execute(VerifyCodeInput {
            email: TEST_EMAIL.to_owned(),
            code: code.to_owned(),
        })
        .await
}

// ── RequestCode → VerifyCode ─────────────────────────────────────────────────

#[tokio::test]
async fn should_create_verified_user_from_staged_profile() {
    let store = MockStore::default();
    let sms = MockSms::default();

    request_uc(&store, &sms, Duration::minutes(5))
        .execute(new_registration(test_profile()))
        .await
        .unwrap();

    assert_eq!(sms.sent_count(), 1);
    let code = sms.last_code().unwrap();
    assert_eq!(code.len(), 5);

    let pending = store.pending_for(TEST_EMAIL).unwrap();
    assert_eq!(pending.code, code);
    let staged = pending.profile.expect("new registration stages the profile");
    assert_ne!(staged.password_hash, TEST_PASSWORD, "staged password must be hashed");
    assert!(store.user_by_email(TEST_EMAIL).is_none(), "no user before verification");

    let out = verify(&store, &code).await.unwrap();

    let user = store.user_by_email(TEST_EMAIL).unwrap();
    assert_eq!(user.id, out.user_id);
    assert!(user.is_verified);
    assert_eq!(user.national_id.as_deref(), Some("0012345678"));
    assert!(verify_password(TEST_PASSWORD, &user.password_hash));
    assert!(store.pending_for(TEST_EMAIL).is_none(), "pending row is consumed");

    let info = validate_access_token(&out.access_token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.email, TEST_EMAIL);
    assert_eq!(info.access_token_exp, out.access_token_exp);
}

#[tokio::test]
async fn should_not_accept_the_same_code_twice() {
    let store = MockStore::default();
    let sms = MockSms::default();
    request_uc(&store, &sms, Duration::minutes(5))
        .execute(new_registration(test_profile()))
        .await
        .unwrap();
    let code = sms.last_code().unwrap();

    verify(&store, &code).await.unwrap();
    let again = verify(&store, &code).await;

    assert!(
        matches!(again, Err(ApiError::PendingNotFound)),
        "expected PendingNotFound, got {again:?}"
    );
}

#[tokio::test]
async fn should_keep_pending_row_on_wrong_code() {
    let store = MockStore::default();
    let sms = MockSms::default();
    request_uc(&store, &sms, Duration::minutes(5))
        .execute(new_registration(test_profile()))
        .await
        .unwrap();
    let code = sms.last_code().unwrap();
    let wrong = if code == "10000" { "10001" } else { "10000" };

    let result = verify(&store, wrong).await;

    assert!(
        matches!(result, Err(ApiError::CodeMismatch)),
        "expected CodeMismatch, got {result:?}"
    );
    assert!(store.pending_for(TEST_EMAIL).is_some());
    assert!(store.user_by_email(TEST_EMAIL).is_none());
    verify(&store, &code).await.unwrap();
}

#[tokio::test]
async fn should_expire_code_and_allow_fresh_request() {
    let store = MockStore::default();
    let sms = MockSms::default();
    request_uc(&store, &sms, Duration::seconds(-1))
        .execute(new_registration(test_profile()))
        .await
        .unwrap();
    let stale = sms.last_code().unwrap();

    let result = verify(&store, &stale).await;

    assert!(
        matches!(result, Err(ApiError::CodeExpired)),
        "expected CodeExpired, got {result:?}"
    );
    assert!(store.pending_for(TEST_EMAIL).is_none(), "expired row is removed");
    assert!(store.user_by_email(TEST_EMAIL).is_none());

    request_uc(&store, &sms, Duration::minutes(5))
        .execute(new_registration(test_profile()))
        .await
        .unwrap();
    let fresh = sms.last_code().unwrap();
    verify(&store, &fresh).await.unwrap();
    assert!(store.user_by_email(TEST_EMAIL).unwrap().is_verified);
}

#[tokio::test]
async fn should_supersede_earlier_code() {
    let store = MockStore::default();
    let sms = MockSms::default();
    let uc = request_uc(&store, &sms, Duration::minutes(5));

    uc.execute(new_registration(test_profile())).await.unwrap();
    let first = sms.last_code().unwrap();
    uc.execute(new_registration(test_profile())).await.unwrap();
    let second = sms.last_code().unwrap();

    assert_eq!(store.pending.lock().unwrap().len(), 1, "one pending row per email");
    assert_eq!(store.pending_for(TEST_EMAIL).unwrap().code, second);

    // Two random draws can coincide; only then is the first code still valid.
    if first != second {
        let result = verify(&store, &first).await;
        assert!(
            matches!(result, Err(ApiError::CodeMismatch)),
            "expected CodeMismatch, got {result:?}"
        );
    }
    verify(&store, &second).await.unwrap();
}

#[tokio::test]
async fn should_drop_pending_row_when_sms_fails() {
    let store = MockStore::default();
    let sms = MockSms::failing();

    let result = request_uc(&store, &sms, Duration::minutes(5))
        .execute(new_registration(test_profile()))
        .await;

    assert!(
        matches!(result, Err(ApiError::DeliveryUnavailable)),
        "expected DeliveryUnavailable, got {result:?}"
    );
    assert!(store.pending_for(TEST_EMAIL).is_none());

    let verify_result = verify(&store, "12345").await;
    assert!(
        matches!(verify_result, Err(ApiError::PendingNotFound)),
        "expected PendingNotFound, got {verify_result:?}"
    );
}

// ── Existing accounts ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_request_for_verified_user() {
    let store = MockStore::with_users(vec![test_user(TEST_EMAIL, TEST_PHONE, true)]);
    let sms = MockSms::default();

    let result = request_uc(&store, &sms, Duration::minutes(5))
        .execute(resend(TEST_EMAIL, TEST_PHONE))
        .await;

    assert!(
        matches!(result, Err(ApiError::AlreadyVerified)),
        "expected AlreadyVerified, got {result:?}"
    );
    assert_eq!(sms.sent_count(), 0);
    assert!(store.pending_for(TEST_EMAIL).is_none());
}

#[tokio::test]
async fn should_reject_phone_mismatch_for_unverified_user() {
    let store = MockStore::with_users(vec![test_user(TEST_EMAIL, TEST_PHONE, false)]);
    let sms = MockSms::default();

    let result = request_uc(&store, &sms, Duration::minutes(5))
        .execute(resend(TEST_EMAIL, "09350000000"))
        .await;

    assert!(
        matches!(result, Err(ApiError::PhoneMismatch)),
        "expected PhoneMismatch, got {result:?}"
    );
    assert_eq!(sms.sent_count(), 0);
}

#[tokio::test]
async fn should_verify_existing_unverified_user_in_place() {
    let existing = test_user(TEST_EMAIL, TEST_PHONE, false);
    let store = MockStore::with_users(vec![existing.clone()]);
    let sms = MockSms::default();

    request_uc(&store, &sms, Duration::minutes(5))
        .execute(resend(TEST_EMAIL, TEST_PHONE))
        .await
        .unwrap();
    assert!(
        store.pending_for(TEST_EMAIL).unwrap().profile.is_none(),
        "no profile is staged for an existing account"
    );

    let out = verify(&store, &sms.last_code().unwrap()).await.unwrap();

    assert_eq!(out.user_id, existing.id);
    assert_eq!(store.users.lock().unwrap().len(), 1);
    assert!(store.user_by_email(TEST_EMAIL).unwrap().is_verified);
}

#[tokio::test]
async fn should_reject_verify_when_user_was_verified_meanwhile() {
    let store = MockStore::with_users(vec![test_user(TEST_EMAIL, TEST_PHONE, false)]);
    let sms = MockSms::default();
    request_uc(&store, &sms, Duration::minutes(5))
        .execute(resend(TEST_EMAIL, TEST_PHONE))
        .await
        .unwrap();
    store.users.lock().unwrap()[0].is_verified = true;

    let result = verify(&store, &sms.last_code().unwrap()).await;

    assert!(
        matches!(result, Err(ApiError::AlreadyVerified)),
        "expected AlreadyVerified, got {result:?}"
    );
}

// ── New registrations ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_require_profile_for_unknown_email() {
    let store = MockStore::default();
    let sms = MockSms::default();

    let result = request_uc(&store, &sms, Duration::minutes(5))
        .execute(resend(TEST_EMAIL, TEST_PHONE))
        .await;

    assert!(
        matches!(result, Err(ApiError::MissingProfile)),
        "expected MissingProfile, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_profile_for_a_different_phone() {
    let store = MockStore::default();
    let sms = MockSms::default();

    let result = request_uc(&store, &sms, Duration::minutes(5))
        .execute(RequestCodeInput {
            email: TEST_EMAIL.to_owned(),
            phone_number: "09350000000".to_owned(),
            profile: Some(test_profile()),
        })
        .await;

    assert!(
        matches!(result, Err(ApiError::ProfileMismatch)),
        "expected ProfileMismatch, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_invalid_phone_before_lookup() {
    let store = MockStore::default();
    let sms = MockSms::default();

    let result = request_uc(&store, &sms, Duration::minutes(5))
        .execute(resend(TEST_EMAIL, "9123456789"))
        .await;

    assert!(
        matches!(result, Err(ApiError::InvalidProfile(_))),
        "expected InvalidProfile, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_phone_already_owned_by_another_user() {
    let store = MockStore::with_users(vec![test_user("other@example.com", TEST_PHONE, true)]);
    let sms = MockSms::default();

    let result = request_uc(&store, &sms, Duration::minutes(5))
        .execute(new_registration(test_profile()))
        .await;

    assert!(
        matches!(result, Err(ApiError::DuplicateIdentity("phone number"))),
        "expected DuplicateIdentity(phone number), got {result:?}"
    );
    assert_eq!(sms.sent_count(), 0);
    assert!(store.pending_for(TEST_EMAIL).is_none());
}

#[tokio::test]
async fn should_reject_national_id_already_owned_by_another_user() {
    let mut owner = test_user("other@example.com", "09350000000", true);
    owner.national_id = Some("0012345678".to_owned());
    let store = MockStore::with_users(vec![owner]);
    let sms = MockSms::default();

    let result = request_uc(&store, &sms, Duration::minutes(5))
        .execute(new_registration(test_profile()))
        .await;

    assert!(
        matches!(result, Err(ApiError::DuplicateIdentity("national id"))),
        "expected DuplicateIdentity(national id), got {result:?}"
    );
}

#[tokio::test]
async fn should_report_conflict_when_identity_is_claimed_before_verify() {
    let store = MockStore::default();
    let sms = MockSms::default();
    request_uc(&store, &sms, Duration::minutes(5))
        .execute(new_registration(test_profile()))
        .await
        .unwrap();

    // Another account takes the phone number between request and verify.
    store
        .users
        .lock()
        .unwrap()
        .push(test_user("racer@example.com", TEST_PHONE, true));

    let result = verify(&store, &sms.last_code().unwrap()).await;

    assert!(
        matches!(result, Err(ApiError::ConflictIdentity)),
        "expected ConflictIdentity, got {result:?}"
    );
    assert!(store.user_by_email(TEST_EMAIL).is_none());
}
