use crate::helpers::{endpoint, nine_am, spawn_scheduler, subscription_for, FixedClock};
use crate::helpers::{GatedPushClient, InMemoryCalendar};
use chrono::Duration;
use claim::assert_err;
use schedule_notifier::scheduler::{NotificationScheduler, PeriodicTask, TickError, TickOutcome};
use std::sync::atomic::Ordering;
use std::sync::Arc;

#[tokio::test]
async fn a_failed_query_aborts_the_tick_and_the_next_tick_still_runs() {
    // arrange
    let app = spawn_scheduler();
    app.subscribed_user_with_event("phone", "Math Exam", app.now() + Duration::minutes(4));
    app.calendar.fail_queries(true);

    // act
    let failed = app.scheduler.tick().await;
    app.calendar.fail_queries(false);
    let recovered = app.scheduler.tick().await;

    // assert
    assert!(matches!(failed, Err(TickError::Fetch(_))));
    assert!(matches!(recovered, Ok(TickOutcome::Completed(_))));
    assert_eq!(app.push_client.sent_to(&endpoint("phone")), 1);
}

#[tokio::test]
async fn an_unreadable_clock_aborts_the_tick_before_querying() {
    // arrange
    let app = spawn_scheduler();
    app.subscribed_user_with_event("phone", "Math Exam", app.now() + Duration::minutes(4));
    app.clock.fail(true);

    // act
    let outcome = app.scheduler.tick().await;

    // assert
    assert_err!(&outcome);
    assert!(matches!(outcome, Err(TickError::Clock(_))));
    assert!(app.push_client.sent().is_empty());
}

#[tokio::test]
async fn the_tick_error_reports_its_cause() {
    // arrange
    let app = spawn_scheduler();
    app.calendar.fail_queries(true);

    // act
    let error = app.scheduler.tick().await.unwrap_err();

    // assert
    let rendered = format!("{:?}", error);
    assert!(rendered.contains("Failed to fetch the events due for a reminder."));
    assert!(rendered.contains("connection refused"));
}

#[tokio::test]
async fn a_tick_started_while_another_is_running_is_skipped() {
    // arrange
    let calendar = Arc::new(InMemoryCalendar::default());
    let push_client = Arc::new(GatedPushClient::default());
    let user_id = calendar.add_user(Some(subscription_for("phone")));
    calendar.add_event(user_id, "Math Exam", nine_am() + Duration::minutes(2));
    let scheduler = Arc::new(NotificationScheduler::new(
        calendar.clone(),
        Arc::new(FixedClock::at(nine_am())),
        push_client.clone(),
    ));

    // act
    let running = tokio::spawn({
        let scheduler = scheduler.clone();
        async move { scheduler.tick().await }
    });
    push_client.entered.notified().await;
    let overlapping = scheduler.tick().await.unwrap();
    push_client.release.notify_one();
    let finished = running.await.unwrap().unwrap();

    // assert
    assert_eq!(overlapping, TickOutcome::Skipped);
    assert!(matches!(finished, TickOutcome::Completed(report) if report.delivered == 1));
    assert_eq!(push_client.sends.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn the_periodic_task_ticks_every_period_until_stopped() {
    // arrange
    let app = spawn_scheduler();
    app.subscribed_user_with_event("phone", "Math Exam", app.now() + Duration::minutes(5));

    // act
    let task = PeriodicTask::start(app.scheduler.clone(), std::time::Duration::from_secs(60));
    tokio::time::sleep(std::time::Duration::from_secs(90)).await;
    task.stop().await;
    tokio::time::sleep(std::time::Duration::from_secs(600)).await;

    // assert
    // The clock is frozen, so the event stays due and is sent on both ticks.
    assert_eq!(app.push_client.sent_to(&endpoint("phone")), 2);
}
