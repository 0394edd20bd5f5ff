use chrono::Duration;

use manareh_api::error::ApiError;
use manareh_api::usecase::event::{
    CreateEventInput, CreateEventUseCase, GetEventUseCase, ListEventsUseCase,
};
use manareh_domain::pagination::PageRequest;
use manareh_domain::recurrence::{Frequency, RepeatRule};

use crate::helpers::{MockStore, TEST_EMAIL, TEST_PHONE, fixed_start, test_event, test_user};

fn input() -> CreateEventInput {
    CreateEventInput {
        title: "Dua Kumayl".to_owned(),
        starts_at: fixed_start(),
        location: "Jameh mosque".to_owned(),
        latitude: 33.98,
        longitude: 51.43,
        host: None,
        category: None,
        city: None,
        province: None,
        country: None,
        capacity: 100,
        is_free: true,
        price: 0.0,
        repeat: None,
    }
}

// ── CreateEvent ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_single_event_with_creator_defaults() {
    let creator = test_user(TEST_EMAIL, TEST_PHONE, true);
    let store = MockStore::default();

    let out = CreateEventUseCase {
        events: store.event_repo(),
    }
    .execute(&creator, input())
    .await
    .unwrap();

    assert_eq!(out.created_count, 1);
    assert_eq!(out.first.starts_at, fixed_start());
    assert!(out.first.active);
    let d = &out.first.details;
    assert_eq!(d.host, "Sara Ahmadi");
    assert_eq!(d.creator_id, creator.id);
    assert_eq!(d.category, "religious");
    assert_eq!(d.city, "Kashan");
    assert_eq!(d.province, "Isfahan");
    assert_eq!(d.country, "Iran");
    assert_eq!(store.events.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_persist_every_occurrence_of_a_daily_rule() {
    let creator = test_user(TEST_EMAIL, TEST_PHONE, true);
    let store = MockStore::default();
    let rule = RepeatRule {
        occurrences: Some(3),
        ..RepeatRule::new(Frequency::Daily)
    };

    let out = CreateEventUseCase {
        events: store.event_repo(),
    }
    .execute(
        &creator,
        CreateEventInput {
            repeat: Some(rule),
            city: Some("Qom".to_owned()),
            ..input()
        },
    )
    .await
    .unwrap();

    assert_eq!(out.created_count, 3);
    assert_eq!(out.first.starts_at, fixed_start());

    let events = store.events.lock().unwrap();
    let starts: Vec<_> = events.iter().map(|e| e.starts_at).collect();
    assert_eq!(
        starts,
        vec![
            fixed_start(),
            fixed_start() + Duration::days(1),
            fixed_start() + Duration::days(2),
        ]
    );
    assert!(events.iter().all(|e| e.details == out.first.details));
    assert!(events.iter().all(|e| e.details.city == "Qom"));

    let mut ids: Vec<_> = events.iter().map(|e| e.id).collect();
    ids.dedup();
    assert_eq!(ids.len(), 3, "every occurrence is its own row");
}

#[tokio::test]
async fn should_reject_zero_interval_without_inserting() {
    let creator = test_user(TEST_EMAIL, TEST_PHONE, true);
    let store = MockStore::default();
    let rule = RepeatRule {
        interval: 0,
        ..RepeatRule::new(Frequency::Weekly)
    };

    let result = CreateEventUseCase {
        events: store.event_repo(),
    }
    .execute(
        &creator,
        CreateEventInput {
            repeat: Some(rule),
            ..input()
        },
    )
    .await;

    let err = result.unwrap_err();
    assert_eq!(err.kind(), "INVALID_REPEAT_RULE");
    assert!(store.events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_require_title_and_location() {
    let creator = test_user(TEST_EMAIL, TEST_PHONE, true);
    let store = MockStore::default();
    let uc = CreateEventUseCase {
        events: store.event_repo(),
    };

    let no_title = uc
        .execute(
            &creator,
            CreateEventInput {
                title: "  ".to_owned(),
                ..input()
            },
        )
        .await;
    let no_location = uc
        .execute(
            &creator,
            CreateEventInput {
                location: String::new(),
                ..input()
            },
        )
        .await;

    assert!(matches!(no_title, Err(ApiError::MissingData)));
    assert!(matches!(no_location, Err(ApiError::MissingData)));
}

#[tokio::test]
async fn should_reject_negative_capacity_or_price() {
    let creator = test_user(TEST_EMAIL, TEST_PHONE, true);
    let store = MockStore::default();
    let uc = CreateEventUseCase {
        events: store.event_repo(),
    };

    let capacity = uc
        .execute(
            &creator,
            CreateEventInput {
                capacity: -1,
                ..input()
            },
        )
        .await;
    let price = uc
        .execute(
            &creator,
            CreateEventInput {
                is_free: false,
                price: -10.0,
                ..input()
            },
        )
        .await;

    assert!(matches!(capacity, Err(ApiError::InvalidEventData)));
    assert!(matches!(price, Err(ApiError::InvalidEventData)));
}

#[tokio::test]
async fn should_zero_price_of_free_events() {
    let creator = test_user(TEST_EMAIL, TEST_PHONE, true);
    let store = MockStore::default();

    let out = CreateEventUseCase {
        events: store.event_repo(),
    }
    .execute(
        &creator,
        CreateEventInput {
            is_free: true,
            price: 50_000.0,
            ..input()
        },
    )
    .await
    .unwrap();

    assert_eq!(out.first.details.price, 0.0);
}

// ── ListEvents / GetEvent ────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_active_events_by_start_time() {
    let creator = test_user(TEST_EMAIL, TEST_PHONE, true);
    let store = MockStore::default();
    let later = test_event(creator.id, 0, fixed_start() + Duration::days(2));
    let sooner = test_event(creator.id, 0, fixed_start());
    let mut hidden = test_event(creator.id, 0, fixed_start() + Duration::days(1));
    hidden.active = false;
    store
        .events
        .lock()
        .unwrap()
        .extend([later.clone(), hidden, sooner.clone()]);

    let listed = ListEventsUseCase {
        events: store.event_repo(),
    }
    .execute(None, PageRequest::default())
    .await
    .unwrap();

    let ids: Vec<_> = listed.iter().map(|s| s.event.id).collect();
    assert_eq!(ids, vec![sooner.id, later.id]);
    assert!(listed.iter().all(|s| !s.is_favorite));
}

#[tokio::test]
async fn should_report_aggregates_for_viewer() {
    let creator = test_user(TEST_EMAIL, TEST_PHONE, true);
    let viewer = test_user("viewer@example.com", "09350000000", true);
    let store = MockStore::default();
    let event = test_event(creator.id, 0, fixed_start());
    store.events.lock().unwrap().push(event.clone());
    store.favorites.lock().unwrap().push((viewer.id, event.id));
    for rating in [5, 4, 4] {
        store
            .comments
            .lock()
            .unwrap()
            .push(manareh_api::domain::types::Comment {
                id: uuid::Uuid::now_v7(),
                event_id: event.id,
                user_id: viewer.id,
                user_name: viewer.full_name(),
                body: "great".to_owned(),
                rating,
                created_at: fixed_start(),
            });
    }
    let uc = GetEventUseCase {
        events: store.event_repo(),
    };

    let as_viewer = uc.execute(event.id, Some(viewer.id)).await.unwrap();
    let anonymous = uc.execute(event.id, None).await.unwrap();

    assert_eq!(as_viewer.comment_count, 3);
    assert_eq!(as_viewer.average_rating, Some(4.3));
    assert_eq!(as_viewer.current_participants, 0);
    assert!(as_viewer.is_favorite);
    assert!(!anonymous.is_favorite);
}

#[tokio::test]
async fn should_return_not_found_for_unknown_event() {
    let store = MockStore::default();

    let result = GetEventUseCase {
        events: store.event_repo(),
    }
    .execute(uuid::Uuid::now_v7(), None)
    .await;

    assert!(
        matches!(result, Err(ApiError::EventNotFound)),
        "expected EventNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_hide_inactive_event_from_detail() {
    let creator = test_user(TEST_EMAIL, TEST_PHONE, true);
    let store = MockStore::default();
    let mut event = test_event(creator.id, 0, fixed_start());
    event.active = false;
    store.events.lock().unwrap().push(event.clone());

    let result = GetEventUseCase {
        events: store.event_repo(),
    }
    .execute(event.id, Some(creator.id))
    .await;

    assert!(
        matches!(result, Err(ApiError::EventNotFound)),
        "expected EventNotFound, got {result:?}"
    );
}
