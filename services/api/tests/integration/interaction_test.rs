use uuid::Uuid;

use manareh_api::error::ApiError;
use manareh_api::usecase::comment::{CreateCommentInput, CreateCommentUseCase, ListCommentsUseCase};
use manareh_api::usecase::favorite::{
    AddFavoriteUseCase, ListFavoritesUseCase, RemoveFavoriteUseCase,
};
use manareh_api::usecase::notification::{
    CreateNotificationInput, CreateNotificationUseCase, ListNotificationsUseCase,
    MarkNotificationReadUseCase,
};
use manareh_api::usecase::participant::{JoinEventUseCase, ListParticipantsUseCase};

use crate::helpers::{MockStore, TEST_EMAIL, TEST_PHONE, fixed_start, test_event, test_user};

// ── Comments ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_default_rating_and_attach_author_name() {
    let author = test_user(TEST_EMAIL, TEST_PHONE, true);
    let store = MockStore::default();
    let event = test_event(author.id, 0, fixed_start());
    store.events.lock().unwrap().push(event.clone());

    let comment = CreateCommentUseCase {
        events: store.event_repo(),
        comments: store.comment_repo(),
    }
    .execute(
        &author,
        CreateCommentInput {
            event_id: event.id,
            body: "  Beautiful recitation  ".to_owned(),
            rating: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(comment.rating, 5);
    assert_eq!(comment.body, "Beautiful recitation");
    assert_eq!(comment.user_name, "Sara Ahmadi");

    let listed = ListCommentsUseCase {
        events: store.event_repo(),
        comments: store.comment_repo(),
    }
    .execute(event.id)
    .await
    .unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn should_validate_rating_and_comment_length() {
    let author = test_user(TEST_EMAIL, TEST_PHONE, true);
    let store = MockStore::default();
    let event = test_event(author.id, 0, fixed_start());
    store.events.lock().unwrap().push(event.clone());
    let uc = CreateCommentUseCase {
        events: store.event_repo(),
        comments: store.comment_repo(),
    };

    let zero = uc
        .execute(
            &author,
            CreateCommentInput {
                event_id: event.id,
                body: "ok".to_owned(),
                rating: Some(0),
            },
        )
        .await;
    let six = uc
        .execute(
            &author,
            CreateCommentInput {
                event_id: event.id,
                body: "ok".to_owned(),
                rating: Some(6),
            },
        )
        .await;
    let too_long = uc
        .execute(
            &author,
            CreateCommentInput {
                event_id: event.id,
                body: "ی".repeat(501),
                rating: Some(3),
            },
        )
        .await;
    let at_limit = uc
        .execute(
            &author,
            CreateCommentInput {
                event_id: event.id,
                body: "ی".repeat(500),
                rating: Some(3),
            },
        )
        .await;

    assert!(matches!(zero, Err(ApiError::InvalidRating)));
    assert!(matches!(six, Err(ApiError::InvalidRating)));
    assert!(matches!(too_long, Err(ApiError::InvalidComment)));
    assert!(at_limit.is_ok(), "500 characters is within the limit");
}

#[tokio::test]
async fn should_not_comment_on_inactive_event() {
    let author = test_user(TEST_EMAIL, TEST_PHONE, true);
    let store = MockStore::default();
    let mut event = test_event(author.id, 0, fixed_start());
    event.active = false;
    store.events.lock().unwrap().push(event.clone());

    let result = CreateCommentUseCase {
        events: store.event_repo(),
        comments: store.comment_repo(),
    }
    .execute(
        &author,
        CreateCommentInput {
            event_id: event.id,
            body: "late".to_owned(),
            rating: None,
        },
    )
    .await;

    assert!(matches!(result, Err(ApiError::EventNotFound)));
    assert!(store.comments.lock().unwrap().is_empty());
}

// ── Participants ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_enforce_capacity_and_single_registration() {
    let first = test_user(TEST_EMAIL, TEST_PHONE, true);
    let second = test_user("second@example.com", "09350000000", true);
    let store = MockStore::default();
    let event = test_event(first.id, 1, fixed_start());
    store.events.lock().unwrap().push(event.clone());
    let uc = JoinEventUseCase {
        events: store.event_repo(),
        participants: store.participant_repo(),
    };

    let joined = uc.execute(&first, event.id).await.unwrap();
    let full = uc.execute(&second, event.id).await;

    assert_eq!(joined.user_name, "Sara Ahmadi");
    assert!(!joined.attended);
    assert!(
        matches!(full, Err(ApiError::EventFull)),
        "expected EventFull, got {full:?}"
    );

    let listed = ListParticipantsUseCase {
        events: store.event_repo(),
        participants: store.participant_repo(),
    }
    .execute(event.id)
    .await
    .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].user_id, first.id);
}

#[tokio::test]
async fn should_not_overfill_event_under_concurrent_joins() {
    let creator = test_user(TEST_EMAIL, TEST_PHONE, true);
    let store = MockStore::default();
    let event = test_event(creator.id, 2, fixed_start());
    store.events.lock().unwrap().push(event.clone());
    let users: Vec<_> = (0..5)
        .map(|i| test_user(&format!("guest{i}@example.com"), &format!("0935000000{i}"), true))
        .collect();
    let uc = JoinEventUseCase {
        events: store.event_repo(),
        participants: store.participant_repo(),
    };

    let (a, b, c, d, e) = tokio::join!(
        uc.execute(&users[0], event.id),
        uc.execute(&users[1], event.id),
        uc.execute(&users[2], event.id),
        uc.execute(&users[3], event.id),
        uc.execute(&users[4], event.id),
    );
    let results = [a, b, c, d, e];

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 2);
    assert!(
        results
            .iter()
            .filter(|r| r.is_err())
            .all(|r| matches!(r, Err(ApiError::EventFull)))
    );
    assert_eq!(store.participants.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn should_treat_zero_capacity_as_unlimited() {
    let user = test_user(TEST_EMAIL, TEST_PHONE, true);
    let store = MockStore::default();
    let event = test_event(user.id, 0, fixed_start());
    store.events.lock().unwrap().push(event.clone());
    let uc = JoinEventUseCase {
        events: store.event_repo(),
        participants: store.participant_repo(),
    };

    uc.execute(&user, event.id).await.unwrap();
    let again = uc.execute(&user, event.id).await;

    assert!(
        matches!(again, Err(ApiError::AlreadyParticipating)),
        "expected AlreadyParticipating, got {again:?}"
    );
}

// ── Favorites ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_add_list_and_remove_favorites() {
    let user = test_user(TEST_EMAIL, TEST_PHONE, true);
    let store = MockStore::default();
    let event = test_event(user.id, 0, fixed_start());
    store.events.lock().unwrap().push(event.clone());
    let add = AddFavoriteUseCase {
        events: store.event_repo(),
        favorites: store.favorite_repo(),
    };
    let remove = RemoveFavoriteUseCase {
        favorites: store.favorite_repo(),
    };

    add.execute(user.id, event.id).await.unwrap();
    let duplicate = add.execute(user.id, event.id).await;
    assert!(matches!(duplicate, Err(ApiError::AlreadyFavorite)));

    let listed = ListFavoritesUseCase {
        favorites: store.favorite_repo(),
    }
    .execute(user.id)
    .await
    .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, event.id);

    remove.execute(user.id, event.id).await.unwrap();
    let missing = remove.execute(user.id, event.id).await;
    assert!(matches!(missing, Err(ApiError::FavoriteNotFound)));
}

#[tokio::test]
async fn should_not_favorite_unknown_event() {
    let store = MockStore::default();

    let result = AddFavoriteUseCase {
        events: store.event_repo(),
        favorites: store.favorite_repo(),
    }
    .execute(Uuid::now_v7(), Uuid::now_v7())
    .await;

    assert!(matches!(result, Err(ApiError::EventNotFound)));
}

// ── Notifications ────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_notification_with_default_kind() {
    let user = test_user(TEST_EMAIL, TEST_PHONE, true);
    let store = MockStore::with_users(vec![user.clone()]);

    let created = CreateNotificationUseCase {
        notifications: store.notification_repo(),
    }
    .execute(
        &user,
        CreateNotificationInput {
            user_id: None,
            title: "Reminder".to_owned(),
            message: "Dua Kumayl starts at 18:30".to_owned(),
            kind: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(created.user_id, user.id);
    assert_eq!(created.kind, "info");
    assert!(!created.read);

    let listed = ListNotificationsUseCase {
        notifications: store.notification_repo(),
    }
    .execute(user.id)
    .await
    .unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn should_refuse_notification_for_another_user() {
    let sender = test_user(TEST_EMAIL, TEST_PHONE, true);
    let recipient = test_user("recipient@example.com", "09350000000", true);
    let store = MockStore::with_users(vec![sender.clone(), recipient.clone()]);

    let result = CreateNotificationUseCase {
        notifications: store.notification_repo(),
    }
    .execute(
        &sender,
        CreateNotificationInput {
            user_id: Some(recipient.id),
            title: "Reminder".to_owned(),
            message: "hello".to_owned(),
            kind: Some("event".to_owned()),
        },
    )
    .await;

    assert!(matches!(result, Err(ApiError::Forbidden)));
    assert!(store.notifications.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_only_mark_own_notification_read() {
    let owner = test_user(TEST_EMAIL, TEST_PHONE, true);
    let stranger = test_user("stranger@example.com", "09350000000", true);
    let store = MockStore::with_users(vec![owner.clone(), stranger.clone()]);
    let created = CreateNotificationUseCase {
        notifications: store.notification_repo(),
    }
    .execute(
        &owner,
        CreateNotificationInput {
            user_id: Some(owner.id),
            title: "Reminder".to_owned(),
            message: "hello".to_owned(),
            kind: None,
        },
    )
    .await
    .unwrap();
    let uc = MarkNotificationReadUseCase {
        notifications: store.notification_repo(),
    };

    let foreign = uc.execute(created.id, stranger.id).await;
    assert!(matches!(foreign, Err(ApiError::NotificationNotFound)));

    uc.execute(created.id, owner.id).await.unwrap();
    assert!(store.notifications.lock().unwrap()[0].read);
}
