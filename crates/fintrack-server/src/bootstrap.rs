//! Explicit dependency wiring for the server binary.
//!
//! Repositories are constructed once over the shared MySQL pool, the
//! service layer is assembled on top of them, and everything the REST
//! router and the job handlers need hangs off [`Services`].

use std::sync::Arc;

use deadpool_redis::Pool;
use fintrack_advisor::{Categorizer, GeminiPlanner};
use fintrack_config::AppConfig;
use fintrack_core::FintrackResult;
use fintrack_repository::{
    DatabasePool, MySqlBudgetRepository, MySqlCategoryRepository, MySqlGoalRepository,
    MySqlRecurringTransactionRepository, MySqlTransactionRepository, MySqlUserProfileRepository,
    MySqlUserRepository,
};
use fintrack_security::{PasswordHasher, TokenProvider};
use fintrack_service::{
    AdvisorService, AdvisorServiceImpl, AuthService, AuthServiceImpl, BackupService,
    BackupServiceImpl, BudgetService, BudgetServiceImpl, CacheInterface, CategoryService,
    CategoryServiceImpl, DashboardService, DashboardServiceImpl, GoalService, GoalServiceImpl,
    InsightsService, InsightsServiceImpl, Notifier, ProfileService, ProfileServiceImpl,
    RecurringService, RecurringServiceImpl, RedisCacheService, ReportService, ReportServiceImpl,
    TracingNotifier, TransactionService, TransactionServiceImpl,
};

/// Fully wired service layer shared by the REST router and job handlers.
pub struct Services {
    pub auth: Arc<dyn AuthService>,
    pub categories: Arc<dyn CategoryService>,
    pub transactions: Arc<dyn TransactionService>,
    pub budgets: Arc<dyn BudgetService>,
    pub goals: Arc<dyn GoalService>,
    pub recurring: Arc<dyn RecurringService>,
    pub profile: Arc<dyn ProfileService>,
    pub dashboard: Arc<dyn DashboardService>,
    pub advisor: Arc<dyn AdvisorService>,
    pub insights: Arc<dyn InsightsService>,
    pub reports: Arc<dyn ReportService>,
    pub backup: Arc<dyn BackupService>,
    pub token_provider: Arc<TokenProvider>,
}

impl Services {
    /// Builds every repository and service over the shared pools.
    ///
    /// Without Redis the insights cache degrades to a no-op, so insight
    /// reads recompute instead of hitting cached results.
    pub fn build(config: &AppConfig, db: &DatabasePool, redis: Option<&Pool>) -> FintrackResult<Self> {
        let pool = db.inner().clone();

        let user_repo = Arc::new(MySqlUserRepository::new(pool.clone()));
        let category_repo = Arc::new(MySqlCategoryRepository::new(pool.clone()));
        let transaction_repo = Arc::new(MySqlTransactionRepository::new(pool.clone()));
        let budget_repo = Arc::new(MySqlBudgetRepository::new(pool.clone()));
        let goal_repo = Arc::new(MySqlGoalRepository::new(pool.clone()));
        let recurring_repo = Arc::new(MySqlRecurringTransactionRepository::new(pool.clone()));
        let profile_repo = Arc::new(MySqlUserProfileRepository::new(pool));

        let security_config = Arc::new(config.security.clone());
        let password_hasher = Arc::new(PasswordHasher::from_config(&config.security)?);
        let token_provider = Arc::new(TokenProvider::new(security_config.clone()));

        let cache: Arc<dyn CacheInterface> = match redis {
            Some(pool) => Arc::new(RedisCacheService::new(Arc::new(pool.clone()))),
            None => Arc::new(RedisCacheService::disabled()),
        };
        let notifier: Arc<dyn Notifier> = Arc::new(TracingNotifier);

        let auth: Arc<dyn AuthService> = Arc::new(AuthServiceImpl::new(
            user_repo.clone(),
            category_repo.clone(),
            profile_repo.clone(),
            password_hasher,
            security_config,
        ));
        let categories: Arc<dyn CategoryService> =
            Arc::new(CategoryServiceImpl::new(category_repo.clone()));
        let transactions: Arc<dyn TransactionService> = Arc::new(TransactionServiceImpl::new(
            transaction_repo.clone(),
            category_repo.clone(),
        ));
        let budgets: Arc<dyn BudgetService> = Arc::new(BudgetServiceImpl::new(
            budget_repo.clone(),
            category_repo.clone(),
        ));
        let goals: Arc<dyn GoalService> = Arc::new(GoalServiceImpl::new(goal_repo.clone()));
        let recurring: Arc<dyn RecurringService> = Arc::new(RecurringServiceImpl::new(
            recurring_repo.clone(),
            transaction_repo.clone(),
            category_repo.clone(),
        ));
        let profile: Arc<dyn ProfileService> =
            Arc::new(ProfileServiceImpl::new(profile_repo.clone()));
        let dashboard: Arc<dyn DashboardService> = Arc::new(DashboardServiceImpl::new(
            transaction_repo.clone(),
            budget_repo.clone(),
            goal_repo.clone(),
        ));

        let planner = Arc::new(GeminiPlanner::new(Arc::new(config.advisor.clone())));
        let advisor: Arc<dyn AdvisorService> = Arc::new(AdvisorServiceImpl::new(
            Categorizer::with_seed_corpus(),
            planner,
            transaction_repo.clone(),
            category_repo.clone(),
        ));
        let insights: Arc<dyn InsightsService> =
            Arc::new(InsightsServiceImpl::new(transaction_repo.clone(), cache));
        let reports: Arc<dyn ReportService> = Arc::new(ReportServiceImpl::new(
            user_repo.clone(),
            profile_repo,
            transaction_repo.clone(),
            budget_repo.clone(),
            category_repo.clone(),
            goal_repo.clone(),
            notifier,
        ));
        let backup: Arc<dyn BackupService> = Arc::new(BackupServiceImpl::new(
            user_repo,
            transaction_repo,
            budget_repo,
            category_repo,
            goal_repo,
            recurring_repo,
            Arc::new(config.backup.clone()),
        ));

        Ok(Self {
            auth,
            categories,
            transactions,
            budgets,
            goals,
            recurring,
            profile,
            dashboard,
            advisor,
            insights,
            reports,
            backup,
            token_provider,
        })
    }
}
