//! In-memory repository implementations shared by service tests.
//!
//! Each mirrors the MySQL repository's observable behavior (ordering,
//! scoping, soft deletes) over a `Mutex<HashMap>`.

use async_trait::async_trait;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use fintrack_core::{
    Budget, BudgetId, Category, CategoryId, FintrackResult, Goal, GoalId, Page, PageRequest,
    RecurringTransaction, RecurringTransactionId, Transaction, TransactionId, User, UserId,
    UserProfile, UserStatus,
};
use fintrack_repository::{
    BudgetRepository, CategoryRepository, CategorySpend, DayOfWeekSpend, GoalRepository,
    MonthlyTotals, PeriodTotals, RecurringTransactionRepository, TransactionFilter,
    TransactionRepository, UserProfileRepository, UserRepository,
};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

fn paginate<T: Clone>(items: Vec<T>, page: PageRequest) -> Page<T> {
    let total = items.len() as u64;
    let content: Vec<T> = items
        .into_iter()
        .skip(page.offset())
        .take(page.limit())
        .collect();
    Page::new(content, page.page, page.size, total)
}

pub(crate) struct InMemoryUserRepository {
    users: Mutex<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub(crate) fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn with_user(user: User) -> Self {
        let repo = Self::new();
        repo.users.lock().unwrap().insert(user.id, user);
        repo
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: UserId) -> FintrackResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> FintrackResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> FintrackResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email.as_str().eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_username_or_email(&self, identifier: &str) -> FintrackResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.username == identifier || u.email.as_str().eq_ignore_ascii_case(identifier))
            .cloned())
    }

    async fn exists_by_username(&self, username: &str) -> FintrackResult<bool> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .any(|u| u.username == username))
    }

    async fn exists_by_email(&self, email: &str) -> FintrackResult<bool> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .any(|u| u.email.as_str().eq_ignore_ascii_case(email)))
    }

    async fn save(&self, user: &User) -> FintrackResult<User> {
        self.users.lock().unwrap().insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn update(&self, user: &User) -> FintrackResult<User> {
        self.users.lock().unwrap().insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn delete(&self, id: UserId) -> FintrackResult<bool> {
        let mut users = self.users.lock().unwrap();
        match users.get_mut(&id) {
            Some(user) => {
                user.status = UserStatus::Deleted;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count(&self) -> FintrackResult<u64> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .filter(|u| u.status != UserStatus::Deleted)
            .count() as u64)
    }
}

pub(crate) struct InMemoryCategoryRepository {
    categories: Mutex<HashMap<CategoryId, Category>>,
}

impl InMemoryCategoryRepository {
    pub(crate) fn new() -> Self {
        Self {
            categories: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn with_category(category: Category) -> Self {
        let repo = Self::new();
        repo.categories
            .lock()
            .unwrap()
            .insert(category.id, category);
        repo
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_by_id(
        &self,
        user_id: UserId,
        id: CategoryId,
    ) -> FintrackResult<Option<Category>> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .get(&id)
            .filter(|c| c.user_id == user_id)
            .cloned())
    }

    async fn find_all(&self, user_id: UserId) -> FintrackResult<Vec<Category>> {
        let mut categories: Vec<Category> = self
            .categories
            .lock()
            .unwrap()
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn find_by_name(&self, user_id: UserId, name: &str) -> FintrackResult<Option<Category>> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .values()
            .find(|c| c.user_id == user_id && c.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    async fn exists_by_name(&self, user_id: UserId, name: &str) -> FintrackResult<bool> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .values()
            .any(|c| c.user_id == user_id && c.name.eq_ignore_ascii_case(name)))
    }

    async fn save(&self, category: &Category) -> FintrackResult<Category> {
        self.categories
            .lock()
            .unwrap()
            .insert(category.id, category.clone());
        Ok(category.clone())
    }

    async fn save_all(&self, categories: &[Category]) -> FintrackResult<()> {
        let mut map = self.categories.lock().unwrap();
        for category in categories {
            map.insert(category.id, category.clone());
        }
        Ok(())
    }

    async fn update(&self, category: &Category) -> FintrackResult<Category> {
        self.categories
            .lock()
            .unwrap()
            .insert(category.id, category.clone());
        Ok(category.clone())
    }

    async fn delete(&self, user_id: UserId, id: CategoryId) -> FintrackResult<bool> {
        let mut categories = self.categories.lock().unwrap();
        if categories.get(&id).map_or(false, |c| c.user_id == user_id) {
            categories.remove(&id);
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

pub(crate) struct InMemoryTransactionRepository {
    transactions: Mutex<HashMap<TransactionId, Transaction>>,
    /// Display info for grouped queries, mirroring the SQL join.
    categories: Mutex<HashMap<CategoryId, Category>>,
}

impl InMemoryTransactionRepository {
    pub(crate) fn new() -> Self {
        Self {
            transactions: Mutex::new(HashMap::new()),
            categories: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn add(&self, transaction: Transaction) {
        self.transactions
            .lock()
            .unwrap()
            .insert(transaction.id, transaction);
    }

    pub(crate) fn add_category(&self, category: Category) {
        self.categories
            .lock()
            .unwrap()
            .insert(category.id, category);
    }

    fn sorted_for_user(&self, user_id: UserId) -> Vec<Transaction> {
        let mut transactions: Vec<Transaction> = self
            .transactions
            .lock()
            .unwrap()
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        transactions
    }

    fn expenses_in_window(&self, user_id: UserId, start: NaiveDate, end: NaiveDate) -> Vec<Transaction> {
        self.transactions
            .lock()
            .unwrap()
            .values()
            .filter(|t| {
                t.user_id == user_id && t.is_expense() && t.date >= start && t.date <= end
            })
            .cloned()
            .collect()
    }
}

fn matches_filter(tx: &Transaction, filter: &TransactionFilter) -> bool {
    filter.start_date.map_or(true, |d| tx.date >= d)
        && filter.end_date.map_or(true, |d| tx.date <= d)
        && filter.category_id.map_or(true, |c| tx.category_id == Some(c))
        && filter
            .transaction_type
            .map_or(true, |t| tx.transaction_type == t)
}

#[async_trait]
impl TransactionRepository for InMemoryTransactionRepository {
    async fn find_by_id(
        &self,
        user_id: UserId,
        id: TransactionId,
    ) -> FintrackResult<Option<Transaction>> {
        Ok(self
            .transactions
            .lock()
            .unwrap()
            .get(&id)
            .filter(|t| t.user_id == user_id)
            .cloned())
    }

    async fn find_page(
        &self,
        user_id: UserId,
        filter: &TransactionFilter,
        page: PageRequest,
    ) -> FintrackResult<Page<Transaction>> {
        let filtered: Vec<Transaction> = self
            .sorted_for_user(user_id)
            .into_iter()
            .filter(|t| matches_filter(t, filter))
            .collect();
        Ok(paginate(filtered, page))
    }

    async fn find_all(&self, user_id: UserId) -> FintrackResult<Vec<Transaction>> {
        Ok(self.sorted_for_user(user_id))
    }

    async fn find_recent(&self, user_id: UserId, limit: u32) -> FintrackResult<Vec<Transaction>> {
        Ok(self
            .sorted_for_user(user_id)
            .into_iter()
            .take(limit as usize)
            .collect())
    }

    async fn save(&self, transaction: &Transaction) -> FintrackResult<Transaction> {
        self.transactions
            .lock()
            .unwrap()
            .insert(transaction.id, transaction.clone());
        Ok(transaction.clone())
    }

    async fn update(&self, transaction: &Transaction) -> FintrackResult<Transaction> {
        self.transactions
            .lock()
            .unwrap()
            .insert(transaction.id, transaction.clone());
        Ok(transaction.clone())
    }

    async fn delete(&self, user_id: UserId, id: TransactionId) -> FintrackResult<bool> {
        let mut transactions = self.transactions.lock().unwrap();
        if transactions
            .get(&id)
            .map_or(false, |t| t.user_id == user_id)
        {
            transactions.remove(&id);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn period_totals(
        &self,
        user_id: UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> FintrackResult<PeriodTotals> {
        let mut totals = PeriodTotals::default();
        for tx in self.transactions.lock().unwrap().values() {
            if tx.user_id != user_id || tx.date < start || tx.date > end {
                continue;
            }
            if tx.is_expense() {
                totals.expenses += tx.amount;
            } else {
                totals.income += tx.amount;
            }
            totals.transaction_count += 1;
        }
        Ok(totals)
    }

    async fn expenses_by_category(
        &self,
        user_id: UserId,
        start: NaiveDate,
        end: NaiveDate,
        limit: Option<u32>,
    ) -> FintrackResult<Vec<CategorySpend>> {
        let mut grouped: HashMap<Option<CategoryId>, (Decimal, u64)> = HashMap::new();
        for tx in self.expenses_in_window(user_id, start, end) {
            let entry = grouped.entry(tx.category_id).or_default();
            entry.0 += tx.amount;
            entry.1 += 1;
        }

        let categories = self.categories.lock().unwrap();
        let mut spends: Vec<CategorySpend> = grouped
            .into_iter()
            .map(|(category_id, (total, transaction_count))| {
                let category = category_id.and_then(|id| categories.get(&id));
                CategorySpend {
                    category_id,
                    name: category.map(|c| c.name.clone()),
                    color: category.map(|c| c.color.clone()),
                    icon: category.map(|c| c.icon.clone()),
                    total,
                    transaction_count,
                }
            })
            .collect();
        spends.sort_by(|a, b| b.total.cmp(&a.total));
        if let Some(limit) = limit {
            spends.truncate(limit as usize);
        }
        Ok(spends)
    }

    async fn monthly_totals(
        &self,
        user_id: UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> FintrackResult<Vec<MonthlyTotals>> {
        let mut grouped: BTreeMap<(i32, u32), (Decimal, Decimal)> = BTreeMap::new();
        for tx in self.transactions.lock().unwrap().values() {
            if tx.user_id != user_id || tx.date < start || tx.date > end {
                continue;
            }
            let entry = grouped
                .entry((tx.date.year(), tx.date.month()))
                .or_default();
            if tx.is_expense() {
                entry.1 += tx.amount;
            } else {
                entry.0 += tx.amount;
            }
        }
        Ok(grouped
            .into_iter()
            .map(|((year, month), (income, expenses))| MonthlyTotals {
                year,
                month,
                income,
                expenses,
            })
            .collect())
    }

    async fn day_of_week_expenses(
        &self,
        user_id: UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> FintrackResult<Vec<DayOfWeekSpend>> {
        let mut grouped: BTreeMap<u32, (Decimal, u64)> = BTreeMap::new();
        for tx in self.expenses_in_window(user_id, start, end) {
            // MySQL DAYOFWEEK: 1 = Sunday through 7 = Saturday.
            let weekday = tx.date.weekday().num_days_from_sunday() + 1;
            let entry = grouped.entry(weekday).or_default();
            entry.0 += tx.amount;
            entry.1 += 1;
        }
        Ok(grouped
            .into_iter()
            .map(|(weekday, (total, transaction_count))| DayOfWeekSpend {
                weekday,
                total,
                transaction_count,
            })
            .collect())
    }

    async fn user_ids_with_activity(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> FintrackResult<Vec<UserId>> {
        let mut user_ids: Vec<UserId> = self
            .transactions
            .lock()
            .unwrap()
            .values()
            .filter(|t| t.date >= start && t.date <= end)
            .map(|t| t.user_id)
            .collect();
        user_ids.sort_unstable();
        user_ids.dedup();
        Ok(user_ids)
    }

    async fn delete_created_before(&self, cutoff: DateTime<Utc>) -> FintrackResult<u64> {
        let mut transactions = self.transactions.lock().unwrap();
        let before = transactions.len();
        transactions.retain(|_, t| t.created_at >= cutoff);
        Ok((before - transactions.len()) as u64)
    }
}

pub(crate) struct InMemoryBudgetRepository {
    budgets: Mutex<HashMap<BudgetId, Budget>>,
    /// Spent amounts the SQL join would compute, set by tests.
    spent_amounts: Mutex<HashMap<BudgetId, Decimal>>,
}

impl InMemoryBudgetRepository {
    pub(crate) fn new() -> Self {
        Self {
            budgets: Mutex::new(HashMap::new()),
            spent_amounts: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn add(&self, budget: Budget) {
        self.budgets.lock().unwrap().insert(budget.id, budget);
    }

    pub(crate) fn set_spent(&self, budget_id: BudgetId, spent: Decimal) {
        self.spent_amounts.lock().unwrap().insert(budget_id, spent);
    }

    fn spent_for(&self, budget_id: BudgetId) -> Decimal {
        self.spent_amounts
            .lock()
            .unwrap()
            .get(&budget_id)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    fn sorted_for_user(&self, user_id: UserId) -> Vec<Budget> {
        let mut budgets: Vec<Budget> = self
            .budgets
            .lock()
            .unwrap()
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        budgets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        budgets
    }
}

#[async_trait]
impl BudgetRepository for InMemoryBudgetRepository {
    async fn find_by_id(&self, user_id: UserId, id: BudgetId) -> FintrackResult<Option<Budget>> {
        Ok(self
            .budgets
            .lock()
            .unwrap()
            .get(&id)
            .filter(|b| b.user_id == user_id)
            .cloned())
    }

    async fn find_by_id_with_spent(
        &self,
        user_id: UserId,
        id: BudgetId,
    ) -> FintrackResult<Option<(Budget, Decimal)>> {
        Ok(self
            .find_by_id(user_id, id)
            .await?
            .map(|b| (b.clone(), self.spent_for(b.id))))
    }

    async fn find_page_with_spent(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> FintrackResult<Page<(Budget, Decimal)>> {
        let budgets: Vec<(Budget, Decimal)> = self
            .sorted_for_user(user_id)
            .into_iter()
            .map(|b| {
                let spent = self.spent_for(b.id);
                (b, spent)
            })
            .collect();
        Ok(paginate(budgets, page))
    }

    async fn find_all_with_spent(
        &self,
        user_id: UserId,
    ) -> FintrackResult<Vec<(Budget, Decimal)>> {
        Ok(self
            .sorted_for_user(user_id)
            .into_iter()
            .map(|b| {
                let spent = self.spent_for(b.id);
                (b, spent)
            })
            .collect())
    }

    async fn find_current_with_spent_all_users(
        &self,
        today: NaiveDate,
    ) -> FintrackResult<Vec<(Budget, Decimal)>> {
        Ok(self
            .budgets
            .lock()
            .unwrap()
            .values()
            .filter(|b| b.is_current(today))
            .map(|b| (b.clone(), self.spent_for(b.id)))
            .collect())
    }

    async fn find_all(&self, user_id: UserId) -> FintrackResult<Vec<Budget>> {
        Ok(self.sorted_for_user(user_id))
    }

    async fn save(&self, budget: &Budget) -> FintrackResult<Budget> {
        self.budgets.lock().unwrap().insert(budget.id, budget.clone());
        Ok(budget.clone())
    }

    async fn update(&self, budget: &Budget) -> FintrackResult<Budget> {
        self.budgets.lock().unwrap().insert(budget.id, budget.clone());
        Ok(budget.clone())
    }

    async fn delete(&self, user_id: UserId, id: BudgetId) -> FintrackResult<bool> {
        let mut budgets = self.budgets.lock().unwrap();
        if budgets.get(&id).map_or(false, |b| b.user_id == user_id) {
            budgets.remove(&id);
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

pub(crate) struct InMemoryGoalRepository {
    goals: Mutex<HashMap<GoalId, Goal>>,
}

impl InMemoryGoalRepository {
    pub(crate) fn new() -> Self {
        Self {
            goals: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn add(&self, goal: Goal) {
        self.goals.lock().unwrap().insert(goal.id, goal);
    }
}

#[async_trait]
impl GoalRepository for InMemoryGoalRepository {
    async fn find_by_id(&self, user_id: UserId, id: GoalId) -> FintrackResult<Option<Goal>> {
        Ok(self
            .goals
            .lock()
            .unwrap()
            .get(&id)
            .filter(|g| g.user_id == user_id)
            .cloned())
    }

    async fn find_page(&self, user_id: UserId, page: PageRequest) -> FintrackResult<Page<Goal>> {
        let mut goals: Vec<Goal> = self
            .goals
            .lock()
            .unwrap()
            .values()
            .filter(|g| g.user_id == user_id)
            .cloned()
            .collect();
        goals.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(goals, page))
    }

    async fn find_all(&self, user_id: UserId) -> FintrackResult<Vec<Goal>> {
        let mut goals: Vec<Goal> = self
            .goals
            .lock()
            .unwrap()
            .values()
            .filter(|g| g.user_id == user_id)
            .cloned()
            .collect();
        goals.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(goals)
    }

    async fn find_active(&self, user_id: UserId) -> FintrackResult<Vec<Goal>> {
        let mut goals: Vec<Goal> = self
            .goals
            .lock()
            .unwrap()
            .values()
            .filter(|g| g.user_id == user_id && !g.is_achieved)
            .cloned()
            .collect();
        goals.sort_by(|a, b| a.target_date.cmp(&b.target_date));
        Ok(goals)
    }

    async fn find_unachieved_with_deadline_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> FintrackResult<Vec<Goal>> {
        let mut goals: Vec<Goal> = self
            .goals
            .lock()
            .unwrap()
            .values()
            .filter(|g| !g.is_achieved && g.target_date >= start && g.target_date <= end)
            .cloned()
            .collect();
        goals.sort_by(|a, b| a.target_date.cmp(&b.target_date));
        Ok(goals)
    }

    async fn save(&self, goal: &Goal) -> FintrackResult<Goal> {
        self.goals.lock().unwrap().insert(goal.id, goal.clone());
        Ok(goal.clone())
    }

    async fn update(&self, goal: &Goal) -> FintrackResult<Goal> {
        self.goals.lock().unwrap().insert(goal.id, goal.clone());
        Ok(goal.clone())
    }

    async fn delete(&self, user_id: UserId, id: GoalId) -> FintrackResult<bool> {
        let mut goals = self.goals.lock().unwrap();
        if goals.get(&id).map_or(false, |g| g.user_id == user_id) {
            goals.remove(&id);
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

pub(crate) struct InMemoryRecurringTransactionRepository {
    schedules: Mutex<HashMap<RecurringTransactionId, RecurringTransaction>>,
}

impl InMemoryRecurringTransactionRepository {
    pub(crate) fn new() -> Self {
        Self {
            schedules: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn add(&self, schedule: RecurringTransaction) {
        self.schedules.lock().unwrap().insert(schedule.id, schedule);
    }
}

#[async_trait]
impl RecurringTransactionRepository for InMemoryRecurringTransactionRepository {
    async fn find_by_id(
        &self,
        user_id: UserId,
        id: RecurringTransactionId,
    ) -> FintrackResult<Option<RecurringTransaction>> {
        Ok(self
            .schedules
            .lock()
            .unwrap()
            .get(&id)
            .filter(|r| r.user_id == user_id)
            .cloned())
    }

    async fn find_page(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> FintrackResult<Page<RecurringTransaction>> {
        let mut schedules: Vec<RecurringTransaction> = self
            .schedules
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        schedules.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(schedules, page))
    }

    async fn find_all(&self, user_id: UserId) -> FintrackResult<Vec<RecurringTransaction>> {
        let mut schedules: Vec<RecurringTransaction> = self
            .schedules
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        schedules.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(schedules)
    }

    async fn find_due(&self, today: NaiveDate) -> FintrackResult<Vec<RecurringTransaction>> {
        let mut due: Vec<RecurringTransaction> = self
            .schedules
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.is_due(today))
            .cloned()
            .collect();
        due.sort_by(|a, b| a.next_occurrence.cmp(&b.next_occurrence));
        Ok(due)
    }

    async fn save(&self, recurring: &RecurringTransaction) -> FintrackResult<RecurringTransaction> {
        self.schedules
            .lock()
            .unwrap()
            .insert(recurring.id, recurring.clone());
        Ok(recurring.clone())
    }

    async fn update(
        &self,
        recurring: &RecurringTransaction,
    ) -> FintrackResult<RecurringTransaction> {
        self.schedules
            .lock()
            .unwrap()
            .insert(recurring.id, recurring.clone());
        Ok(recurring.clone())
    }

    async fn delete(&self, user_id: UserId, id: RecurringTransactionId) -> FintrackResult<bool> {
        let mut schedules = self.schedules.lock().unwrap();
        if schedules.get(&id).map_or(false, |r| r.user_id == user_id) {
            schedules.remove(&id);
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

pub(crate) struct InMemoryUserProfileRepository {
    profiles: Mutex<HashMap<UserId, UserProfile>>,
}

impl InMemoryUserProfileRepository {
    pub(crate) fn new() -> Self {
        Self {
            profiles: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn with_profile(profile: UserProfile) -> Self {
        let repo = Self::new();
        repo.profiles
            .lock()
            .unwrap()
            .insert(profile.user_id, profile);
        repo
    }
}

#[async_trait]
impl UserProfileRepository for InMemoryUserProfileRepository {
    async fn find_by_user_id(&self, user_id: UserId) -> FintrackResult<Option<UserProfile>> {
        Ok(self.profiles.lock().unwrap().get(&user_id).cloned())
    }

    async fn save(&self, profile: &UserProfile) -> FintrackResult<UserProfile> {
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.user_id, profile.clone());
        Ok(profile.clone())
    }

    async fn update(&self, profile: &UserProfile) -> FintrackResult<UserProfile> {
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.user_id, profile.clone());
        Ok(profile.clone())
    }
}

/// Cache over a plain map; entries never expire.
pub(crate) struct InMemoryCache {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryCache {
    pub(crate) fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn stored_json(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl crate::cache::CacheInterface for InMemoryCache {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn get_raw(&self, key: &str) -> FintrackResult<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set_raw(
        &self,
        key: &str,
        value: &str,
        _ttl: std::time::Duration,
    ) -> FintrackResult<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> FintrackResult<bool> {
        Ok(self.entries.lock().unwrap().remove(key).is_some())
    }

    async fn exists(&self, key: &str) -> FintrackResult<bool> {
        Ok(self.entries.lock().unwrap().contains_key(key))
    }
}
