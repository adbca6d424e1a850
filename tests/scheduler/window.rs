use crate::helpers::{endpoint, spawn_scheduler};
use chrono::Duration;
use schedule_notifier::scheduler::{TickOutcome, TickReport};

#[tokio::test]
async fn an_event_starting_exactly_at_the_end_of_the_lookahead_is_notified() {
    // arrange
    let app = spawn_scheduler();
    app.subscribed_user_with_event("edge", "Standup", app.now() + Duration::minutes(5));

    // act
    let outcome = app.scheduler.tick().await.unwrap();

    // assert
    assert_eq!(app.push_client.sent_to(&endpoint("edge")), 1);
    assert_eq!(
        outcome,
        TickOutcome::Completed(TickReport {
            due: 1,
            delivered: 1,
            ..TickReport::default()
        })
    );
}

#[tokio::test]
async fn an_event_starting_one_second_after_the_lookahead_is_not_notified() {
    // arrange
    let app = spawn_scheduler();
    app.subscribed_user_with_event(
        "late",
        "Standup",
        app.now() + Duration::minutes(5) + Duration::seconds(1),
    );

    // act
    app.scheduler.tick().await.unwrap();

    // assert
    assert!(app.push_client.sent().is_empty());
}

#[tokio::test]
async fn an_event_starting_right_now_is_notified() {
    // arrange
    let app = spawn_scheduler();
    app.subscribed_user_with_event("now", "Standup", app.now());

    // act
    app.scheduler.tick().await.unwrap();

    // assert
    assert_eq!(app.push_client.sent_to(&endpoint("now")), 1);
}

#[tokio::test]
async fn an_event_that_already_started_is_never_notified() {
    // arrange
    let app = spawn_scheduler();
    app.subscribed_user_with_event("past", "Standup", app.now() - Duration::seconds(1));
    app.subscribed_user_with_event("long-past", "Lunch", app.now() - Duration::hours(3));

    // act
    let outcome = app.scheduler.tick().await.unwrap();

    // assert
    assert!(app.push_client.sent().is_empty());
    assert_eq!(outcome, TickOutcome::Completed(TickReport::default()));
}

#[tokio::test]
async fn a_user_without_a_subscription_never_triggers_a_delivery() {
    // arrange
    let app = spawn_scheduler();
    let user_id = app.calendar.add_user(None);
    app.calendar
        .add_event(user_id, "Math Exam", app.now() + Duration::minutes(3));

    // act
    let outcome = app.scheduler.tick().await.unwrap();

    // assert
    assert!(app.push_client.sent().is_empty());
    assert_eq!(outcome, TickOutcome::Completed(TickReport::default()));
}

#[tokio::test]
async fn events_are_notified_earliest_first() {
    // arrange
    let app = spawn_scheduler();
    app.subscribed_user_with_event("b", "Second", app.now() + Duration::minutes(4));
    app.subscribed_user_with_event("a", "First", app.now() + Duration::minutes(1));

    // act
    app.scheduler.tick().await.unwrap();

    // assert
    let sent = app.push_client.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].endpoint, endpoint("a"));
    assert_eq!(sent[1].endpoint, endpoint("b"));
}
