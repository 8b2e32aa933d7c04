//! Integration tests for MySqlGoalRepository.
//!
//! These tests run against a real MySQL database using testcontainers
//! and are ignored by default. Run with `cargo test -- --ignored` on a
//! machine with Docker available.

mod common;

use chrono::NaiveDate;
use common::TestDatabase;
use fintrack_core::{Goal, GoalId, GoalType, PageRequest, UserId};
use fintrack_repository::{GoalRepository, MySqlGoalRepository};
use rust_decimal_macros::dec;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn savings_goal(user_id: UserId, name: &str, deadline: NaiveDate) -> Goal {
    Goal::new(
        user_id,
        name.to_string(),
        GoalType::Savings,
        dec!(1000.00),
        deadline,
    )
}

#[tokio::test]
#[ignore]
async fn test_save_and_find_by_id() {
    let db = TestDatabase::new().await;
    let repo = MySqlGoalRepository::new(db.pool());
    let user = db.seed_user("goaluser").await;

    let mut goal = savings_goal(user.id, "Vacation", date(2025, 12, 31));
    goal.description = Some("Two weeks in June".to_string());

    let saved = repo.save(&goal).await.expect("Failed to save goal");
    assert_eq!(saved.name, "Vacation");
    assert_eq!(saved.goal_type, GoalType::Savings);
    assert_eq!(saved.target_amount, dec!(1000.00));
    assert_eq!(saved.current_amount, dec!(0));
    assert!(!saved.is_achieved);

    let found = repo
        .find_by_id(user.id, goal.id)
        .await
        .expect("Query failed")
        .expect("Goal not found");
    assert_eq!(found.description.as_deref(), Some("Two weeks in June"));
    assert_eq!(found.target_date, date(2025, 12, 31));
}

#[tokio::test]
#[ignore]
async fn test_find_page_newest_first() {
    let db = TestDatabase::new().await;
    let repo = MySqlGoalRepository::new(db.pool());
    let user = db.seed_user("pageuser").await;

    for name in ["First", "Second", "Third"] {
        let goal = savings_goal(user.id, name, date(2026, 1, 1));
        repo.save(&goal).await.expect("Failed to save goal");
    }

    let page = repo
        .find_page(user.id, PageRequest::new(0, 2))
        .await
        .expect("Query failed");

    assert_eq!(page.content.len(), 2);
    assert_eq!(page.info.total_elements, 3);
    assert_eq!(page.content[0].name, "Third");
    assert_eq!(page.content[1].name, "Second");
}

#[tokio::test]
#[ignore]
async fn test_record_progress_persists_achievement() {
    let db = TestDatabase::new().await;
    let repo = MySqlGoalRepository::new(db.pool());
    let user = db.seed_user("progressuser").await;

    let mut goal = savings_goal(user.id, "Emergency fund", date(2026, 6, 30));
    repo.save(&goal).await.expect("Failed to save goal");

    goal.record_progress(dec!(400.00));
    let updated = repo.update(&goal).await.expect("Failed to update goal");
    assert_eq!(updated.current_amount, dec!(400.00));
    assert!(!updated.is_achieved);

    goal.record_progress(dec!(700.00));
    let updated = repo.update(&goal).await.expect("Failed to update goal");

    // Progress clamps at the target and flips the achieved flag
    assert_eq!(updated.current_amount, dec!(1000.00));
    assert!(updated.is_achieved);
}

#[tokio::test]
#[ignore]
async fn test_find_active_excludes_achieved() {
    let db = TestDatabase::new().await;
    let repo = MySqlGoalRepository::new(db.pool());
    let user = db.seed_user("activeuser").await;

    let later = savings_goal(user.id, "Car", date(2026, 9, 1));
    repo.save(&later).await.expect("Failed to save goal");

    let sooner = savings_goal(user.id, "Laptop", date(2025, 10, 1));
    repo.save(&sooner).await.expect("Failed to save goal");

    let mut done = savings_goal(user.id, "Done already", date(2025, 8, 1));
    done.record_progress(dec!(1000.00));
    repo.save(&done).await.expect("Failed to save goal");

    let active = repo.find_active(user.id).await.expect("Query failed");

    // Ordered by nearest deadline first
    assert_eq!(active.len(), 2);
    assert_eq!(active[0].name, "Laptop");
    assert_eq!(active[1].name, "Car");
}

#[tokio::test]
#[ignore]
async fn test_find_unachieved_with_deadline_between() {
    let db = TestDatabase::new().await;
    let repo = MySqlGoalRepository::new(db.pool());
    let alice = db.seed_user("alice").await;
    let bob = db.seed_user("bob").await;

    let due_soon = savings_goal(alice.id, "Due soon", date(2025, 9, 5));
    repo.save(&due_soon).await.expect("Failed to save goal");

    let bob_due = savings_goal(bob.id, "Also due", date(2025, 9, 10));
    repo.save(&bob_due).await.expect("Failed to save goal");

    let far_out = savings_goal(alice.id, "Far out", date(2026, 3, 1));
    repo.save(&far_out).await.expect("Failed to save goal");

    let mut achieved = savings_goal(bob.id, "Achieved", date(2025, 9, 7));
    achieved.record_progress(dec!(1000.00));
    repo.save(&achieved).await.expect("Failed to save goal");

    let due = repo
        .find_unachieved_with_deadline_between(date(2025, 9, 1), date(2025, 9, 30))
        .await
        .expect("Query failed");

    // Both users' pending goals appear, nearest deadline first
    assert_eq!(due.len(), 2);
    assert_eq!(due[0].name, "Due soon");
    assert_eq!(due[1].name, "Also due");
}

#[tokio::test]
#[ignore]
async fn test_delete_scoped_to_user() {
    let db = TestDatabase::new().await;
    let repo = MySqlGoalRepository::new(db.pool());
    let owner = db.seed_user("owner").await;
    let other = db.seed_user("other").await;

    let goal = savings_goal(owner.id, "Mine", date(2026, 1, 1));
    repo.save(&goal).await.expect("Failed to save goal");

    assert!(!repo.delete(other.id, goal.id).await.expect("Query failed"));
    assert!(repo.delete(owner.id, goal.id).await.expect("Query failed"));
    assert!(!repo.delete(owner.id, GoalId::new()).await.expect("Query failed"));
}
