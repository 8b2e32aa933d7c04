//! Integration tests for MySqlBudgetRepository.
//!
//! These tests run against a real MySQL database using testcontainers
//! and are ignored by default. Run with `cargo test -- --ignored` on a
//! machine with Docker available.

mod common;

use chrono::NaiveDate;
use common::TestDatabase;
use fintrack_core::{
    Budget, BudgetId, BudgetPeriod, Category, CategoryId, PageRequest, Transaction,
    TransactionType, UserId,
};
use fintrack_repository::{
    BudgetRepository, CategoryRepository, MySqlBudgetRepository, MySqlCategoryRepository,
    MySqlTransactionRepository, TransactionRepository,
};
use rust_decimal_macros::dec;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn june_budget(user_id: UserId, category_id: CategoryId, amount: rust_decimal::Decimal) -> Budget {
    Budget::new(
        user_id,
        category_id,
        amount,
        BudgetPeriod::Monthly,
        date(2025, 6, 1),
        date(2025, 6, 30),
    )
}

async fn seed_category(db: &TestDatabase, user_id: UserId, name: &str) -> Category {
    let repo = MySqlCategoryRepository::new(db.pool());
    let category = Category::new(user_id, name.to_string(), None, None);
    repo.save(&category).await.expect("Failed to save category")
}

async fn seed_expense(
    db: &TestDatabase,
    user_id: UserId,
    category_id: Option<CategoryId>,
    amount: rust_decimal::Decimal,
    day: NaiveDate,
) {
    let repo = MySqlTransactionRepository::new(db.pool());
    let mut transaction = Transaction::new(
        user_id,
        "Spend".to_string(),
        amount,
        TransactionType::Expense,
        day,
        None,
    );
    transaction.category_id = category_id;
    repo.save(&transaction)
        .await
        .expect("Failed to save transaction");
}

#[tokio::test]
#[ignore]
async fn test_save_and_find_by_id() {
    let db = TestDatabase::new().await;
    let repo = MySqlBudgetRepository::new(db.pool());
    let user = db.seed_user("budgetuser").await;
    let category = seed_category(&db, user.id, "Groceries").await;

    let budget = june_budget(user.id, category.id, dec!(500.00));
    let saved = repo.save(&budget).await.expect("Failed to save budget");

    assert_eq!(saved.amount, dec!(500.00));
    assert_eq!(saved.period, BudgetPeriod::Monthly);
    assert_eq!(saved.alert_threshold, dec!(80));
    assert!(saved.is_active);

    let found = repo
        .find_by_id(user.id, budget.id)
        .await
        .expect("Query failed")
        .expect("Budget not found");
    assert_eq!(found.category_id, category.id);
    assert_eq!(found.start_date, date(2025, 6, 1));
    assert_eq!(found.end_date, date(2025, 6, 30));
}

#[tokio::test]
#[ignore]
async fn test_find_by_id_with_spent_sums_matching_expenses() {
    let db = TestDatabase::new().await;
    let repo = MySqlBudgetRepository::new(db.pool());
    let user = db.seed_user("spentuser").await;
    let groceries = seed_category(&db, user.id, "Groceries").await;
    let transport = seed_category(&db, user.id, "Transport").await;

    let budget = june_budget(user.id, groceries.id, dec!(400.00));
    repo.save(&budget).await.expect("Failed to save budget");

    // Counted: expenses in the budget's category and window
    seed_expense(&db, user.id, Some(groceries.id), dec!(120.00), date(2025, 6, 5)).await;
    seed_expense(&db, user.id, Some(groceries.id), dec!(60.50), date(2025, 6, 30)).await;
    // Not counted: other category, outside the window, uncategorized
    seed_expense(&db, user.id, Some(transport.id), dec!(45.00), date(2025, 6, 10)).await;
    seed_expense(&db, user.id, Some(groceries.id), dec!(200.00), date(2025, 7, 1)).await;
    seed_expense(&db, user.id, None, dec!(15.00), date(2025, 6, 10)).await;

    let (found, spent) = repo
        .find_by_id_with_spent(user.id, budget.id)
        .await
        .expect("Query failed")
        .expect("Budget not found");

    assert_eq!(found.id, budget.id);
    assert_eq!(spent, dec!(180.50));
}

#[tokio::test]
#[ignore]
async fn test_find_by_id_with_spent_zero_when_no_transactions() {
    let db = TestDatabase::new().await;
    let repo = MySqlBudgetRepository::new(db.pool());
    let user = db.seed_user("zerouser").await;
    let category = seed_category(&db, user.id, "Entertainment").await;

    let budget = june_budget(user.id, category.id, dec!(100.00));
    repo.save(&budget).await.expect("Failed to save budget");

    let (_, spent) = repo
        .find_by_id_with_spent(user.id, budget.id)
        .await
        .expect("Query failed")
        .expect("Budget not found");

    assert_eq!(spent, dec!(0));
}

#[tokio::test]
#[ignore]
async fn test_find_page_with_spent_newest_first() {
    let db = TestDatabase::new().await;
    let repo = MySqlBudgetRepository::new(db.pool());
    let user = db.seed_user("pageuser").await;

    let mut category_ids = Vec::new();
    for name in ["First", "Second", "Third"] {
        let category = seed_category(&db, user.id, name).await;
        let budget = june_budget(user.id, category.id, dec!(100.00));
        repo.save(&budget).await.expect("Failed to save budget");
        category_ids.push(category.id);
    }
    seed_expense(&db, user.id, Some(category_ids[2]), dec!(33.00), date(2025, 6, 2)).await;

    let page = repo
        .find_page_with_spent(user.id, PageRequest::new(0, 2))
        .await
        .expect("Query failed");

    assert_eq!(page.content.len(), 2);
    assert_eq!(page.info.total_elements, 3);
    assert_eq!(page.info.total_pages, 2);
    // Most recently created budget first, with its own spent amount
    assert_eq!(page.content[0].0.category_id, category_ids[2]);
    assert_eq!(page.content[0].1, dec!(33.00));
    assert_eq!(page.content[1].0.category_id, category_ids[1]);
    assert_eq!(page.content[1].1, dec!(0));
}

#[tokio::test]
#[ignore]
async fn test_find_current_with_spent_all_users() {
    let db = TestDatabase::new().await;
    let repo = MySqlBudgetRepository::new(db.pool());
    let alice = db.seed_user("alice").await;
    let bob = db.seed_user("bob").await;

    let alice_cat = seed_category(&db, alice.id, "Groceries").await;
    let bob_cat = seed_category(&db, bob.id, "Dining").await;

    let current_alice = june_budget(alice.id, alice_cat.id, dec!(300.00));
    repo.save(&current_alice).await.expect("Failed to save");

    let current_bob = june_budget(bob.id, bob_cat.id, dec!(200.00));
    repo.save(&current_bob).await.expect("Failed to save");

    // Inactive budget inside the window
    let mut inactive = june_budget(alice.id, alice_cat.id, dec!(50.00));
    inactive.is_active = false;
    repo.save(&inactive).await.expect("Failed to save");

    // Expired window
    let expired = Budget::new(
        bob.id,
        bob_cat.id,
        dec!(75.00),
        BudgetPeriod::Monthly,
        date(2025, 5, 1),
        date(2025, 5, 31),
    );
    repo.save(&expired).await.expect("Failed to save");

    seed_expense(&db, bob.id, Some(bob_cat.id), dec!(90.00), date(2025, 6, 15)).await;

    let current = repo
        .find_current_with_spent_all_users(date(2025, 6, 15))
        .await
        .expect("Query failed");

    assert_eq!(current.len(), 2);
    let bobs = current
        .iter()
        .find(|(b, _)| b.user_id == bob.id)
        .expect("Bob's budget missing");
    assert_eq!(bobs.1, dec!(90.00));
    assert!(current.iter().all(|(b, _)| b.is_active));
}

#[tokio::test]
#[ignore]
async fn test_update_budget() {
    let db = TestDatabase::new().await;
    let repo = MySqlBudgetRepository::new(db.pool());
    let user = db.seed_user("updater").await;
    let category = seed_category(&db, user.id, "Shopping").await;

    let mut budget = june_budget(user.id, category.id, dec!(250.00));
    repo.save(&budget).await.expect("Failed to save budget");

    budget.amount = dec!(300.00);
    budget.alert_threshold = dec!(90);
    budget.is_active = false;
    let updated = repo.update(&budget).await.expect("Failed to update");

    assert_eq!(updated.amount, dec!(300.00));
    assert_eq!(updated.alert_threshold, dec!(90));
    assert!(!updated.is_active);
}

#[tokio::test]
#[ignore]
async fn test_delete_scoped_to_user() {
    let db = TestDatabase::new().await;
    let repo = MySqlBudgetRepository::new(db.pool());
    let owner = db.seed_user("owner").await;
    let other = db.seed_user("other").await;
    let category = seed_category(&db, owner.id, "Misc").await;

    let budget = june_budget(owner.id, category.id, dec!(80.00));
    repo.save(&budget).await.expect("Failed to save budget");

    assert!(!repo.delete(other.id, budget.id).await.expect("Query failed"));
    assert!(repo.delete(owner.id, budget.id).await.expect("Query failed"));
    assert!(!repo.delete(owner.id, BudgetId::new()).await.expect("Query failed"));
}
