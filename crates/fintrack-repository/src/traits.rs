//! Repository trait definitions.
//!
//! Every method is scoped by `user_id` unless it exists for a background
//! job that works across accounts (`find_due`, `user_ids_with_activity`,
//! deadline scans, retention cleanup).

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use fintrack_core::{
    Budget, BudgetId, Category, CategoryId, FintrackResult, Goal, GoalId, Page, PageRequest,
    RecurringTransaction, RecurringTransactionId, Transaction, TransactionId, TransactionType,
    User, UserId, UserProfile,
};
use rust_decimal::Decimal;

/// Filters for transaction listing.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Earliest transaction date (inclusive).
    pub start_date: Option<NaiveDate>,
    /// Latest transaction date (inclusive).
    pub end_date: Option<NaiveDate>,
    /// Restrict to one category.
    pub category_id: Option<CategoryId>,
    /// Restrict to income or expense.
    pub transaction_type: Option<TransactionType>,
}

/// Income/expense totals over a date window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodTotals {
    /// Sum of income amounts; zero when there are none.
    pub income: Decimal,
    /// Sum of expense amounts; zero when there are none.
    pub expenses: Decimal,
    /// Number of transactions in the window.
    pub transaction_count: u64,
}

/// Expense aggregate for one category over a window.
///
/// `category_id` and the display fields are `None` for uncategorized
/// spending.
#[derive(Debug, Clone)]
pub struct CategorySpend {
    /// The category, or `None` for uncategorized transactions.
    pub category_id: Option<CategoryId>,
    /// Category name.
    pub name: Option<String>,
    /// Category color.
    pub color: Option<String>,
    /// Category icon.
    pub icon: Option<String>,
    /// Total spent.
    pub total: Decimal,
    /// Number of expense transactions.
    pub transaction_count: u64,
}

/// Income/expense totals for one calendar month.
#[derive(Debug, Clone, Copy)]
pub struct MonthlyTotals {
    /// Calendar year.
    pub year: i32,
    /// Calendar month (1-12).
    pub month: u32,
    /// Income total for the month.
    pub income: Decimal,
    /// Expense total for the month.
    pub expenses: Decimal,
}

/// Expense aggregate for one day of the week.
#[derive(Debug, Clone, Copy)]
pub struct DayOfWeekSpend {
    /// Day of week, 1 = Sunday through 7 = Saturday (MySQL `DAYOFWEEK`).
    pub weekday: u32,
    /// Total spent on that weekday.
    pub total: Decimal,
    /// Number of expense transactions.
    pub transaction_count: u64,
}

/// User repository trait.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by ID.
    async fn find_by_id(&self, id: UserId) -> FintrackResult<Option<User>>;

    /// Finds a user by username.
    async fn find_by_username(&self, username: &str) -> FintrackResult<Option<User>>;

    /// Finds a user by email.
    async fn find_by_email(&self, email: &str) -> FintrackResult<Option<User>>;

    /// Finds a user by username or email.
    async fn find_by_username_or_email(&self, identifier: &str) -> FintrackResult<Option<User>>;

    /// Checks if a username exists.
    async fn exists_by_username(&self, username: &str) -> FintrackResult<bool>;

    /// Checks if an email exists.
    async fn exists_by_email(&self, email: &str) -> FintrackResult<bool>;

    /// Saves a new user.
    async fn save(&self, user: &User) -> FintrackResult<User>;

    /// Updates an existing user.
    async fn update(&self, user: &User) -> FintrackResult<User>;

    /// Soft-deletes a user by ID.
    async fn delete(&self, id: UserId) -> FintrackResult<bool>;

    /// Counts non-deleted users.
    async fn count(&self) -> FintrackResult<u64>;
}

/// Category repository trait.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Finds a category by ID within a user's account.
    async fn find_by_id(&self, user_id: UserId, id: CategoryId) -> FintrackResult<Option<Category>>;

    /// Lists all of a user's categories ordered by name.
    async fn find_all(&self, user_id: UserId) -> FintrackResult<Vec<Category>>;

    /// Finds a category by name, case-insensitively.
    async fn find_by_name(&self, user_id: UserId, name: &str) -> FintrackResult<Option<Category>>;

    /// Checks if a category name is taken (case-insensitive).
    async fn exists_by_name(&self, user_id: UserId, name: &str) -> FintrackResult<bool>;

    /// Saves a new category.
    async fn save(&self, category: &Category) -> FintrackResult<Category>;

    /// Saves a batch of categories in one transaction (account provisioning).
    async fn save_all(&self, categories: &[Category]) -> FintrackResult<()>;

    /// Updates an existing category.
    async fn update(&self, category: &Category) -> FintrackResult<Category>;

    /// Deletes a category. Transactions referencing it become uncategorized.
    async fn delete(&self, user_id: UserId, id: CategoryId) -> FintrackResult<bool>;
}

/// Transaction repository trait.
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Finds a transaction by ID within a user's account.
    async fn find_by_id(
        &self,
        user_id: UserId,
        id: TransactionId,
    ) -> FintrackResult<Option<Transaction>>;

    /// Lists transactions with filters, ordered date desc then created_at desc.
    async fn find_page(
        &self,
        user_id: UserId,
        filter: &TransactionFilter,
        page: PageRequest,
    ) -> FintrackResult<Page<Transaction>>;

    /// Lists every transaction for a user (data export).
    async fn find_all(&self, user_id: UserId) -> FintrackResult<Vec<Transaction>>;

    /// Returns the most recent transactions, ordered date desc then created_at desc.
    async fn find_recent(&self, user_id: UserId, limit: u32) -> FintrackResult<Vec<Transaction>>;

    /// Saves a new transaction.
    async fn save(&self, transaction: &Transaction) -> FintrackResult<Transaction>;

    /// Updates an existing transaction.
    async fn update(&self, transaction: &Transaction) -> FintrackResult<Transaction>;

    /// Deletes a transaction.
    async fn delete(&self, user_id: UserId, id: TransactionId) -> FintrackResult<bool>;

    /// Income/expense sums and count over an inclusive date window.
    async fn period_totals(
        &self,
        user_id: UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> FintrackResult<PeriodTotals>;

    /// Expense totals grouped by category over a window, ordered total desc.
    async fn expenses_by_category(
        &self,
        user_id: UserId,
        start: NaiveDate,
        end: NaiveDate,
        limit: Option<u32>,
    ) -> FintrackResult<Vec<CategorySpend>>;

    /// Income/expense totals grouped by calendar month over a window.
    async fn monthly_totals(
        &self,
        user_id: UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> FintrackResult<Vec<MonthlyTotals>>;

    /// Expense totals grouped by day of week over a window.
    async fn day_of_week_expenses(
        &self,
        user_id: UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> FintrackResult<Vec<DayOfWeekSpend>>;

    /// IDs of users with at least one transaction in the window.
    async fn user_ids_with_activity(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> FintrackResult<Vec<UserId>>;

    /// Deletes transactions created before the cutoff. Returns rows removed.
    async fn delete_created_before(&self, cutoff: DateTime<Utc>) -> FintrackResult<u64>;
}

/// Budget repository trait.
///
/// The `*_with_spent` methods compute each budget's spent amount in SQL
/// by joining expense transactions in the budget's category and window,
/// so listing N budgets costs one query.
#[async_trait]
pub trait BudgetRepository: Send + Sync {
    /// Finds a budget by ID within a user's account.
    async fn find_by_id(&self, user_id: UserId, id: BudgetId) -> FintrackResult<Option<Budget>>;

    /// Finds a budget with its spent amount.
    async fn find_by_id_with_spent(
        &self,
        user_id: UserId,
        id: BudgetId,
    ) -> FintrackResult<Option<(Budget, Decimal)>>;

    /// Pages a user's budgets with spent amounts, newest first.
    async fn find_page_with_spent(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> FintrackResult<Page<(Budget, Decimal)>>;

    /// Lists all of a user's budgets with spent amounts.
    async fn find_all_with_spent(&self, user_id: UserId)
        -> FintrackResult<Vec<(Budget, Decimal)>>;

    /// Lists every user's budgets that are active and cover `today` (alert job).
    async fn find_current_with_spent_all_users(
        &self,
        today: NaiveDate,
    ) -> FintrackResult<Vec<(Budget, Decimal)>>;

    /// Lists all of a user's budgets without spent amounts (data export).
    async fn find_all(&self, user_id: UserId) -> FintrackResult<Vec<Budget>>;

    /// Saves a new budget.
    async fn save(&self, budget: &Budget) -> FintrackResult<Budget>;

    /// Updates an existing budget.
    async fn update(&self, budget: &Budget) -> FintrackResult<Budget>;

    /// Deletes a budget.
    async fn delete(&self, user_id: UserId, id: BudgetId) -> FintrackResult<bool>;
}

/// Goal repository trait.
#[async_trait]
pub trait GoalRepository: Send + Sync {
    /// Finds a goal by ID within a user's account.
    async fn find_by_id(&self, user_id: UserId, id: GoalId) -> FintrackResult<Option<Goal>>;

    /// Pages a user's goals, newest first.
    async fn find_page(&self, user_id: UserId, page: PageRequest) -> FintrackResult<Page<Goal>>;

    /// Lists all of a user's goals (data export).
    async fn find_all(&self, user_id: UserId) -> FintrackResult<Vec<Goal>>;

    /// Lists a user's unachieved goals.
    async fn find_active(&self, user_id: UserId) -> FintrackResult<Vec<Goal>>;

    /// Lists every user's unachieved goals with deadlines inside the window
    /// (deadline reminder job).
    async fn find_unachieved_with_deadline_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> FintrackResult<Vec<Goal>>;

    /// Saves a new goal.
    async fn save(&self, goal: &Goal) -> FintrackResult<Goal>;

    /// Updates an existing goal.
    async fn update(&self, goal: &Goal) -> FintrackResult<Goal>;

    /// Deletes a goal.
    async fn delete(&self, user_id: UserId, id: GoalId) -> FintrackResult<bool>;
}

/// Recurring transaction repository trait.
#[async_trait]
pub trait RecurringTransactionRepository: Send + Sync {
    /// Finds a schedule by ID within a user's account.
    async fn find_by_id(
        &self,
        user_id: UserId,
        id: RecurringTransactionId,
    ) -> FintrackResult<Option<RecurringTransaction>>;

    /// Pages a user's schedules, newest first.
    async fn find_page(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> FintrackResult<Page<RecurringTransaction>>;

    /// Lists all of a user's schedules (data export).
    async fn find_all(&self, user_id: UserId) -> FintrackResult<Vec<RecurringTransaction>>;

    /// Lists every user's active schedules due on or before `today`
    /// (recurring processor job).
    async fn find_due(&self, today: NaiveDate) -> FintrackResult<Vec<RecurringTransaction>>;

    /// Saves a new schedule.
    async fn save(&self, recurring: &RecurringTransaction) -> FintrackResult<RecurringTransaction>;

    /// Updates an existing schedule.
    async fn update(&self, recurring: &RecurringTransaction)
        -> FintrackResult<RecurringTransaction>;

    /// Deletes a schedule.
    async fn delete(&self, user_id: UserId, id: RecurringTransactionId) -> FintrackResult<bool>;
}

/// User profile repository trait.
#[async_trait]
pub trait UserProfileRepository: Send + Sync {
    /// Finds the profile for a user.
    async fn find_by_user_id(&self, user_id: UserId) -> FintrackResult<Option<UserProfile>>;

    /// Saves a new profile.
    async fn save(&self, profile: &UserProfile) -> FintrackResult<UserProfile>;

    /// Updates an existing profile.
    async fn update(&self, profile: &UserProfile) -> FintrackResult<UserProfile>;
}
