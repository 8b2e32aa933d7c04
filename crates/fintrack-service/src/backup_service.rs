//! Per-user data export written as a JSON backup file.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fintrack_config::BackupConfig;
use fintrack_core::{
    Budget, Category, FintrackError, FintrackResult, Goal, RecurringTransaction, Service,
    Transaction, UserId,
};
use fintrack_repository::{
    BudgetRepository, CategoryRepository, GoalRepository, RecurringTransactionRepository,
    TransactionRepository, UserRepository,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Account fields included in a backup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupUserInfo {
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_joined: DateTime<Utc>,
}

/// Everything a user's backup file contains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupDocument {
    pub user_info: BackupUserInfo,
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
    pub categories: Vec<Category>,
    pub goals: Vec<Goal>,
    pub recurring_transactions: Vec<RecurringTransaction>,
}

/// Backup service trait.
#[async_trait]
pub trait BackupService: Service {
    /// Exports all of a user's data to a JSON file under the backup
    /// directory. Returns the path written.
    async fn backup_user(&self, user_id: UserId) -> FintrackResult<PathBuf>;
}

/// Backup service implementation.
pub struct BackupServiceImpl<U, T, B, C, G, R>
where
    U: UserRepository,
    T: TransactionRepository,
    B: BudgetRepository,
    C: CategoryRepository,
    G: GoalRepository,
    R: RecurringTransactionRepository,
{
    user_repository: Arc<U>,
    transaction_repository: Arc<T>,
    budget_repository: Arc<B>,
    category_repository: Arc<C>,
    goal_repository: Arc<G>,
    recurring_repository: Arc<R>,
    config: Arc<BackupConfig>,
}

impl<U, T, B, C, G, R> BackupServiceImpl<U, T, B, C, G, R>
where
    U: UserRepository,
    T: TransactionRepository,
    B: BudgetRepository,
    C: CategoryRepository,
    G: GoalRepository,
    R: RecurringTransactionRepository,
{
    /// Creates a new backup service.
    pub fn new(
        user_repository: Arc<U>,
        transaction_repository: Arc<T>,
        budget_repository: Arc<B>,
        category_repository: Arc<C>,
        goal_repository: Arc<G>,
        recurring_repository: Arc<R>,
        config: Arc<BackupConfig>,
    ) -> Self {
        Self {
            user_repository,
            transaction_repository,
            budget_repository,
            category_repository,
            goal_repository,
            recurring_repository,
            config,
        }
    }

    fn backup_path(&self, username: &str) -> PathBuf {
        let date = Utc::now().date_naive().format("%Y-%m-%d");
        Path::new(&self.config.directory).join(format!("backup_{username}_{date}.json"))
    }
}

#[async_trait]
impl<U, T, B, C, G, R> BackupService for BackupServiceImpl<U, T, B, C, G, R>
where
    U: UserRepository + 'static,
    T: TransactionRepository + 'static,
    B: BudgetRepository + 'static,
    C: CategoryRepository + 'static,
    G: GoalRepository + 'static,
    R: RecurringTransactionRepository + 'static,
{
    async fn backup_user(&self, user_id: UserId) -> FintrackResult<PathBuf> {
        debug!("Backing up data for user: {}", user_id);

        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| FintrackError::not_found("User", user_id))?;

        let document = BackupDocument {
            user_info: BackupUserInfo {
                username: user.username.clone(),
                email: user.email.to_string(),
                first_name: user.first_name.clone(),
                last_name: user.last_name.clone(),
                date_joined: user.created_at,
            },
            transactions: self.transaction_repository.find_all(user_id).await?,
            budgets: self.budget_repository.find_all(user_id).await?,
            categories: self.category_repository.find_all(user_id).await?,
            goals: self.goal_repository.find_all(user_id).await?,
            recurring_transactions: self.recurring_repository.find_all(user_id).await?,
        };

        let json = serde_json::to_string_pretty(&document)?;

        let path = self.backup_path(&user.username);
        tokio::fs::create_dir_all(&self.config.directory)
            .await
            .map_err(|e| {
                FintrackError::Internal(format!("Failed to create backup directory: {e}"))
            })?;
        tokio::fs::write(&path, json).await.map_err(|e| {
            FintrackError::Internal(format!("Failed to write backup file: {e}"))
        })?;

        info!(
            "Backup written for user {} at {}",
            user.username,
            path.display()
        );
        Ok(path)
    }
}

impl<U, T, B, C, G, R> Service for BackupServiceImpl<U, T, B, C, G, R>
where
    U: UserRepository + 'static,
    T: TransactionRepository + 'static,
    B: BudgetRepository + 'static,
    C: CategoryRepository + 'static,
    G: GoalRepository + 'static,
    R: RecurringTransactionRepository + 'static,
{
}

impl<U, T, B, C, G, R> std::fmt::Debug for BackupServiceImpl<U, T, B, C, G, R>
where
    U: UserRepository,
    T: TransactionRepository,
    B: BudgetRepository,
    C: CategoryRepository,
    G: GoalRepository,
    R: RecurringTransactionRepository,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackupServiceImpl").finish_non_exhaustive()
    }
}
