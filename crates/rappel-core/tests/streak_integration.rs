//! Integration tests for streak tracking over the SQLite store.
//!
//! Tests the full workflow from session recording to streak
//! advancement and monthly stats, against the real database schema.

use chrono::NaiveDate;
use rappel_core::{Database, StreakService};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn test_full_streak_workflow() {
    let service = StreakService::new(Database::open_memory().unwrap());

    // First access lazily creates a zeroed record.
    let streak = service.user_streak_on("alice", day(2025, 3, 10)).await.unwrap();
    assert!(streak.id.is_some());
    assert_eq!(streak.current_streak, 0);
    assert_eq!(streak.longest_streak, 0);
    assert_eq!(streak.last_prayer_date, None);
    assert_eq!(streak.streak_history.len(), 7);
    assert!(streak.streak_history.iter().all(|d| !d.completed));

    // First session ever starts the chain at 1.
    let outcome = service.record_session_on("alice", day(2025, 3, 10)).await.unwrap();
    assert_eq!(outcome.streak.current_streak, 1);
    assert_eq!(outcome.streak.longest_streak, 1);
    assert_eq!(outcome.session.prayer_count, 1);
    assert!(outcome.session.completed);

    // Same-day repeat bumps the count but not the streak.
    let outcome = service.record_session_on("alice", day(2025, 3, 10)).await.unwrap();
    assert_eq!(outcome.streak.current_streak, 1);
    assert_eq!(outcome.session.prayer_count, 2);

    // Next-day sessions extend the chain.
    let outcome = service.record_session_on("alice", day(2025, 3, 11)).await.unwrap();
    assert_eq!(outcome.streak.current_streak, 2);
    let outcome = service.record_session_on("alice", day(2025, 3, 12)).await.unwrap();
    assert_eq!(outcome.streak.current_streak, 3);
    assert_eq!(outcome.streak.longest_streak, 3);

    // A missed day resets the chain but keeps the record.
    let outcome = service.record_session_on("alice", day(2025, 3, 14)).await.unwrap();
    assert_eq!(outcome.streak.current_streak, 1);
    assert_eq!(outcome.streak.longest_streak, 3);
    assert_eq!(outcome.streak.last_prayer_date, Some(day(2025, 3, 14)));
}

#[tokio::test]
async fn test_streak_survives_reload_from_store() {
    let service = StreakService::new(Database::open_memory().unwrap());

    service.record_session_on("bob", day(2025, 6, 1)).await.unwrap();
    service.record_session_on("bob", day(2025, 6, 2)).await.unwrap();

    // A fresh read sees the updated record, not the lazy default.
    let streak = service.user_streak_on("bob", day(2025, 6, 2)).await.unwrap();
    assert_eq!(streak.current_streak, 2);
    assert_eq!(streak.last_prayer_date, Some(day(2025, 6, 2)));
    assert!(streak
        .streak_history
        .iter()
        .any(|d| d.date == day(2025, 6, 1) && d.completed));
}

#[tokio::test]
async fn test_monthly_stats_exclude_previous_month() {
    let service = StreakService::new(Database::open_memory().unwrap());

    // Two sessions in February, three prayers across two March days.
    service.record_session_on("carol", day(2025, 2, 27)).await.unwrap();
    service.record_session_on("carol", day(2025, 2, 28)).await.unwrap();
    service.record_session_on("carol", day(2025, 3, 3)).await.unwrap();
    service.record_session_on("carol", day(2025, 3, 3)).await.unwrap();
    service.record_session_on("carol", day(2025, 3, 5)).await.unwrap();

    let stats = service.streak_stats_on("carol", day(2025, 3, 10)).await.unwrap();
    assert_eq!(stats.total_prayers, 3);
    assert_eq!(stats.sessions_this_month, 2);
    // The streak record itself is not month-scoped.
    assert_eq!(stats.streak.longest_streak, 2);
}

#[tokio::test]
async fn test_users_are_isolated() {
    let service = StreakService::new(Database::open_memory().unwrap());

    service.record_session_on("dina", day(2025, 4, 1)).await.unwrap();
    service.record_session_on("dina", day(2025, 4, 2)).await.unwrap();
    service.record_session_on("emir", day(2025, 4, 2)).await.unwrap();

    let dina = service.user_streak_on("dina", day(2025, 4, 2)).await.unwrap();
    let emir = service.user_streak_on("emir", day(2025, 4, 2)).await.unwrap();
    assert_eq!(dina.current_streak, 2);
    assert_eq!(emir.current_streak, 1);

    let stats = service.streak_stats_on("emir", day(2025, 4, 2)).await.unwrap();
    assert_eq!(stats.total_prayers, 1);
}

#[tokio::test]
async fn test_history_keeps_only_the_last_seven_entries() {
    let service = StreakService::new(Database::open_memory().unwrap());

    for d in 1..=12 {
        service.record_session_on("farid", day(2025, 5, d)).await.unwrap();
    }

    let streak = service.user_streak_on("farid", day(2025, 5, 12)).await.unwrap();
    assert_eq!(streak.current_streak, 12);
    assert_eq!(streak.streak_history.len(), 7);
    // Seeded placeholder days and the earliest sessions were evicted.
    assert_eq!(streak.streak_history.last().unwrap().date, day(2025, 5, 12));
    assert!(streak
        .streak_history
        .iter()
        .all(|e| e.date >= day(2025, 5, 6) && e.completed));
}
