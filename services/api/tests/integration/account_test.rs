use chrono::{Datelike, Utc};

use manareh_api::error::ApiError;
use manareh_api::usecase::account::{
    CheckUserInput, CheckUserUseCase, CreateUserUseCase, GetStatsUseCase, LoginInput,
    LoginUseCase, UpdateNationalIdUseCase, current_user,
};
use manareh_api::usecase::otp::ProfileInput;

use crate::helpers::{
    MockStore, TEST_EMAIL, TEST_JWT_SECRET, TEST_PASSWORD, TEST_PHONE, fixed_start,
    test_event, test_profile, test_user,
};

fn login_uc(store: &MockStore) -> LoginUseCase<crate::helpers::MockUserRepo> {
    LoginUseCase {
        users: store.user_repo(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        access_token_ttl_secs: 1800,
    }
}

fn credentials(email: &str, password: &str) -> LoginInput {
    LoginInput {
        email: email.to_owned(),
        password: password.to_owned(),
    }
}

// ── CreateUser ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_unverified_user_that_cannot_log_in() {
    let store = MockStore::default();

    let user = CreateUserUseCase {
        users: store.user_repo(),
    }
    .execute(test_profile())
    .await
    .unwrap();

    assert!(!user.is_verified);
    assert_eq!(store.user_by_email(TEST_EMAIL).unwrap().id, user.id);

    let result = login_uc(&store)
        .execute(credentials(TEST_EMAIL, TEST_PASSWORD))
        .await;
    assert!(
        matches!(result, Err(ApiError::UserNotVerified)),
        "expected UserNotVerified, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_duplicate_email_on_create() {
    let store = MockStore::with_users(vec![test_user(TEST_EMAIL, "09350000000", true)]);

    let result = CreateUserUseCase {
        users: store.user_repo(),
    }
    .execute(test_profile())
    .await;

    assert!(
        matches!(result, Err(ApiError::DuplicateIdentity("email"))),
        "expected DuplicateIdentity(email), got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_unknown_gender_on_create() {
    let store = MockStore::default();

    let result = CreateUserUseCase {
        users: store.user_repo(),
    }
    .execute(ProfileInput {
        gender: "other".to_owned(),
        ..test_profile()
    })
    .await;

    let err = result.unwrap_err();
    assert_eq!(err.kind(), "INVALID_GENDER");
    assert!(store.users.lock().unwrap().is_empty());
}

// ── Login ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_issue_token_for_verified_user() {
    let user = test_user(TEST_EMAIL, TEST_PHONE, true);
    let store = MockStore::with_users(vec![user.clone()]);

    let out = login_uc(&store)
        .execute(credentials(TEST_EMAIL, TEST_PASSWORD))
        .await
        .unwrap();

    assert_eq!(out.user_id, user.id);
    let info =
        manareh_auth_types::token::validate_access_token(&out.access_token, TEST_JWT_SECRET)
            .unwrap();
    assert_eq!(info.email, TEST_EMAIL);
}

#[tokio::test]
async fn should_not_distinguish_unknown_email_from_wrong_password() {
    let store = MockStore::with_users(vec![test_user(TEST_EMAIL, TEST_PHONE, true)]);

    let unknown = login_uc(&store)
        .execute(credentials("nobody@example.com", TEST_PASSWORD))
        .await;
    let wrong = login_uc(&store)
        .execute(credentials(TEST_EMAIL, "wrong-password"))
        .await;

    assert!(matches!(unknown, Err(ApiError::InvalidCredentials)));
    assert!(matches!(wrong, Err(ApiError::InvalidCredentials)));
}

#[tokio::test]
async fn should_check_password_before_verification_state() {
    let store = MockStore::with_users(vec![test_user(TEST_EMAIL, TEST_PHONE, false)]);

    let result = login_uc(&store)
        .execute(credentials(TEST_EMAIL, "wrong-password"))
        .await;

    assert!(
        matches!(result, Err(ApiError::InvalidCredentials)),
        "expected InvalidCredentials, got {result:?}"
    );
}

// ── CheckUser ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_name_first_taken_field() {
    let mut user = test_user(TEST_EMAIL, TEST_PHONE, true);
    user.national_id = Some("1111111111".to_owned());
    let store = MockStore::with_users(vec![user]);
    let uc = CheckUserUseCase {
        users: store.user_repo(),
    };

    let all = uc
        .execute(CheckUserInput {
            email: Some(TEST_EMAIL.to_owned()),
            national_id: Some("1111111111".to_owned()),
            phone_number: Some(TEST_PHONE.to_owned()),
        })
        .await
        .unwrap();
    assert_eq!(all, Some("email"));

    let phone_only = uc
        .execute(CheckUserInput {
            email: Some("new@example.com".to_owned()),
            phone_number: Some(TEST_PHONE.to_owned()),
            ..CheckUserInput::default()
        })
        .await
        .unwrap();
    assert_eq!(phone_only, Some("phone"));

    let none = uc.execute(CheckUserInput::default()).await.unwrap();
    assert_eq!(none, None);
}

// ── Current user / national id ───────────────────────────────────────────────

#[tokio::test]
async fn should_reject_token_for_deleted_account() {
    let store = MockStore::default();

    let result = current_user(&store.user_repo(), TEST_EMAIL).await;

    assert!(matches!(result, Err(ApiError::InvalidToken)));
}

#[tokio::test]
async fn should_store_supplemental_national_id() {
    let user = test_user(TEST_EMAIL, TEST_PHONE, true);
    let store = MockStore::with_users(vec![user.clone()]);

    UpdateNationalIdUseCase {
        users: store.user_repo(),
    }
    .execute(&user, "2222222222")
    .await
    .unwrap();

    assert_eq!(
        store.user_by_email(TEST_EMAIL).unwrap().national_id.as_deref(),
        Some("2222222222")
    );
}

#[tokio::test]
async fn should_reject_national_id_owned_by_someone_else() {
    let user = test_user(TEST_EMAIL, TEST_PHONE, true);
    let mut other = test_user("other@example.com", "09350000000", true);
    other.national_id = Some("2222222222".to_owned());
    let store = MockStore::with_users(vec![user.clone(), other]);
    let uc = UpdateNationalIdUseCase {
        users: store.user_repo(),
    };

    let taken = uc.execute(&user, "2222222222").await;
    let malformed = uc.execute(&user, "22-22").await;

    assert!(matches!(taken, Err(ApiError::DuplicateIdentity("national id"))));
    assert!(matches!(malformed, Err(ApiError::InvalidProfile(_))));
}

// ── Stats ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_count_user_activity() {
    let user = test_user(TEST_EMAIL, TEST_PHONE, true);
    let store = MockStore::with_users(vec![user.clone()]);
    let event = test_event(user.id, 0, fixed_start());
    store.events.lock().unwrap().push(event.clone());
    store
        .events
        .lock()
        .unwrap()
        .push(test_event(uuid::Uuid::now_v7(), 0, fixed_start()));
    store.favorites.lock().unwrap().push((user.id, event.id));

    let stats = GetStatsUseCase {
        events: store.event_repo(),
        notifications: store.notification_repo(),
        favorites: store.favorite_repo(),
    }
    .execute(&user)
    .await
    .unwrap();

    assert_eq!(stats.events_count, 1);
    assert_eq!(stats.favorites_count, 1);
    assert_eq!(stats.notifications_count, 0);
    assert_eq!(stats.join_year, Utc::now().year());
}
