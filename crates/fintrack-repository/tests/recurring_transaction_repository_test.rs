//! Integration tests for MySqlRecurringTransactionRepository.
//!
//! These tests run against a real MySQL database using testcontainers
//! and are ignored by default. Run with `cargo test -- --ignored` on a
//! machine with Docker available.

mod common;

use chrono::NaiveDate;
use common::TestDatabase;
use fintrack_core::{
    Frequency, RecurringTransaction, RecurringTransactionId, TransactionType, UserId,
};
use fintrack_repository::{MySqlRecurringTransactionRepository, RecurringTransactionRepository};
use rust_decimal_macros::dec;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn monthly_rent(user_id: UserId, start: NaiveDate) -> RecurringTransaction {
    RecurringTransaction::new(
        user_id,
        "Rent".to_string(),
        dec!(900.00),
        TransactionType::Expense,
        Frequency::Monthly,
        start,
        None,
    )
}

#[tokio::test]
#[ignore]
async fn test_save_and_find_by_id() {
    let db = TestDatabase::new().await;
    let repo = MySqlRecurringTransactionRepository::new(db.pool());
    let user = db.seed_user("recuser").await;

    let schedule = monthly_rent(user.id, date(2025, 6, 1));
    let saved = repo.save(&schedule).await.expect("Failed to save schedule");

    assert_eq!(saved.description, "Rent");
    assert_eq!(saved.frequency, Frequency::Monthly);
    assert_eq!(saved.next_occurrence, date(2025, 6, 1));
    assert!(saved.is_active);
    assert!(saved.end_date.is_none());

    let found = repo
        .find_by_id(user.id, schedule.id)
        .await
        .expect("Query failed")
        .expect("Schedule not found");
    assert_eq!(found.amount, dec!(900.00));
}

#[tokio::test]
#[ignore]
async fn test_find_due_across_users() {
    let db = TestDatabase::new().await;
    let repo = MySqlRecurringTransactionRepository::new(db.pool());
    let alice = db.seed_user("alice").await;
    let bob = db.seed_user("bob").await;

    // Overdue and due-today schedules fire; future and paused ones wait
    let overdue = monthly_rent(alice.id, date(2025, 6, 1));
    repo.save(&overdue).await.expect("Failed to save");

    let due_today = monthly_rent(bob.id, date(2025, 6, 15));
    repo.save(&due_today).await.expect("Failed to save");

    let future = monthly_rent(alice.id, date(2025, 7, 1));
    repo.save(&future).await.expect("Failed to save");

    let mut paused = monthly_rent(bob.id, date(2025, 6, 1));
    paused.is_active = false;
    repo.save(&paused).await.expect("Failed to save");

    let due = repo.find_due(date(2025, 6, 15)).await.expect("Query failed");

    assert_eq!(due.len(), 2);
    assert_eq!(due[0].id, overdue.id);
    assert_eq!(due[1].id, due_today.id);
}

#[tokio::test]
#[ignore]
async fn test_advance_occurrence_persists() {
    let db = TestDatabase::new().await;
    let repo = MySqlRecurringTransactionRepository::new(db.pool());
    let user = db.seed_user("advancer").await;

    let mut schedule = monthly_rent(user.id, date(2025, 6, 1));
    repo.save(&schedule).await.expect("Failed to save schedule");

    let next = schedule.advance_occurrence().expect("Schedule ended early");
    assert_eq!(next, date(2025, 7, 1));
    repo.update(&schedule).await.expect("Failed to update");

    let found = repo
        .find_by_id(user.id, schedule.id)
        .await
        .expect("Query failed")
        .expect("Schedule not found");
    assert_eq!(found.next_occurrence, date(2025, 7, 1));
    assert!(found.is_active);
}

#[tokio::test]
#[ignore]
async fn test_advance_past_end_date_deactivates() {
    let db = TestDatabase::new().await;
    let repo = MySqlRecurringTransactionRepository::new(db.pool());
    let user = db.seed_user("ender").await;

    let mut schedule = monthly_rent(user.id, date(2025, 6, 1));
    schedule.end_date = Some(date(2025, 6, 30));
    repo.save(&schedule).await.expect("Failed to save schedule");

    // The next step would land past the end date
    assert!(schedule.advance_occurrence().is_none());
    repo.update(&schedule).await.expect("Failed to update");

    let found = repo
        .find_by_id(user.id, schedule.id)
        .await
        .expect("Query failed")
        .expect("Schedule not found");
    assert!(!found.is_active);
    assert_eq!(found.next_occurrence, date(2025, 6, 1));

    let due = repo.find_due(date(2025, 8, 1)).await.expect("Query failed");
    assert!(due.is_empty());
}

#[tokio::test]
#[ignore]
async fn test_delete_scoped_to_user() {
    let db = TestDatabase::new().await;
    let repo = MySqlRecurringTransactionRepository::new(db.pool());
    let owner = db.seed_user("owner").await;
    let other = db.seed_user("other").await;

    let schedule = monthly_rent(owner.id, date(2025, 6, 1));
    repo.save(&schedule).await.expect("Failed to save schedule");

    assert!(!repo
        .delete(other.id, schedule.id)
        .await
        .expect("Query failed"));
    assert!(repo
        .delete(owner.id, schedule.id)
        .await
        .expect("Query failed"));
    assert!(!repo
        .delete(owner.id, RecurringTransactionId::new())
        .await
        .expect("Query failed"));
}
