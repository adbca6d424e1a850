use crate::helpers::spawn_app;
use chrono::{Duration, TimeZone, Utc};
use claim::{assert_none, assert_ok};
use schedule_notifier::domain::LookaheadWindow;
use schedule_notifier::store::{Clock, EventStore, PgEventStore};

#[tokio::test]
#[ignore = "requires a running Postgres instance"]
async fn due_notifications_covers_the_window_inclusively_and_in_start_order() {
    // arrange
    let mut app = spawn_app().await;
    let store = PgEventStore::connect_lazy(&app.configuration.database);
    let now = Utc.with_ymd_and_hms(2030, 3, 1, 12, 0, 0).unwrap();
    let user = app.create_user();
    app.set_subscription(user.user_id, Some("subscription".into()));
    let later = app.create_event(user.user_id, "At the edge", now + Duration::minutes(5));
    let sooner = app.create_event(user.user_id, "Right now", now);
    app.create_event(
        user.user_id,
        "Too late",
        now + Duration::minutes(5) + Duration::seconds(1),
    );
    app.create_event(user.user_id, "Already started", now - Duration::seconds(1));

    // act
    let window = LookaheadWindow::starting_at(now, Duration::minutes(5));
    let due = assert_ok!(store.due_notifications(&window).await);

    // assert
    let ids: Vec<_> = due.iter().map(|n| n.event_id).collect();
    assert_eq!(ids, vec![sooner, later]);
    assert!(due.iter().all(|n| n.subscription == "subscription"));
    assert_eq!(due[0].title, "Right now");
}

#[tokio::test]
#[ignore = "requires a running Postgres instance"]
async fn due_notifications_ignores_users_without_a_subscription() {
    // arrange
    let mut app = spawn_app().await;
    let store = PgEventStore::connect_lazy(&app.configuration.database);
    let now = Utc.with_ymd_and_hms(2030, 3, 1, 12, 0, 0).unwrap();
    let user = app.create_user();
    app.create_event(user.user_id, "Unsubscribed", now + Duration::minutes(1));

    // act
    let window = LookaheadWindow::starting_at(now, Duration::minutes(5));
    let due = assert_ok!(store.due_notifications(&window).await);

    // assert
    assert!(due.is_empty());
}

#[tokio::test]
#[ignore = "requires a running Postgres instance"]
async fn clear_subscription_nulls_every_matching_user() {
    // arrange
    let mut app = spawn_app().await;
    let store = PgEventStore::connect_lazy(&app.configuration.database);
    let first = app.create_user();
    let second = app.create_user();
    let other = app.create_user();
    app.set_subscription(first.user_id, Some("shared".into()));
    app.set_subscription(second.user_id, Some("shared".into()));
    app.set_subscription(other.user_id, Some("unrelated".into()));

    // act
    let cleared = assert_ok!(store.clear_subscription("shared").await);

    // assert
    assert_eq!(cleared, 2);
    assert_none!(app.subscription_of(first.user_id));
    assert_none!(app.subscription_of(second.user_id));
    assert_eq!(app.subscription_of(other.user_id).as_deref(), Some("unrelated"));
}

#[tokio::test]
#[ignore = "requires a running Postgres instance"]
async fn clearing_an_unknown_subscription_affects_no_rows() {
    // arrange
    let app = spawn_app().await;
    let store = PgEventStore::connect_lazy(&app.configuration.database);

    // act
    let cleared = assert_ok!(store.clear_subscription("nobody has this").await);

    // assert
    assert_eq!(cleared, 0);
}

#[tokio::test]
#[ignore = "requires a running Postgres instance"]
async fn the_database_clock_agrees_with_the_host() {
    // arrange
    let app = spawn_app().await;
    let store = PgEventStore::connect_lazy(&app.configuration.database);

    // act
    let now = assert_ok!(store.now().await);

    // assert
    let skew = (now - Utc::now()).num_seconds().abs();
    assert!(skew < 5, "database clock is {}s away from the host", skew);
}

#[tokio::test]
#[ignore = "requires a running Postgres instance"]
async fn events_are_removed_together_with_their_owner() {
    // arrange
    let mut app = spawn_app().await;
    let store = PgEventStore::connect_lazy(&app.configuration.database);
    let now = Utc.with_ymd_and_hms(2030, 3, 1, 12, 0, 0).unwrap();
    let user = app.create_user();
    app.set_subscription(user.user_id, Some("subscription".into()));
    app.create_event(user.user_id, "Math Exam", now + Duration::minutes(2));
    let events = app.events_of(user.user_id);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].title, "Math Exam");
    assert_eq!(events[0].start_time, now + Duration::minutes(2));

    // act
    app.delete_user(user.user_id);

    // assert
    assert!(app.events_of(user.user_id).is_empty());
    let window = LookaheadWindow::starting_at(now, Duration::minutes(5));
    let due = assert_ok!(store.due_notifications(&window).await);
    assert!(due.is_empty());
}
