//! Canned service doubles for router tests.
//!
//! Router tests exercise routing, auth middleware, and the response
//! envelope only; every stub method a test does not hit answers with an
//! internal error so an unexpected call fails loudly.

use crate::state::AppState;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use fintrack_advisor::SpendingPlan;
use fintrack_config::SecurityConfig;
use fintrack_core::{
    BudgetId, CategoryId, FintrackError, FintrackResult, GoalId, Page, PageRequest,
    RecurringTransactionId, Service, TransactionId, UserId, UserRole,
};
use fintrack_repository::TransactionFilter;
use fintrack_security::{Claims, TokenProvider};
use fintrack_service::{
    AdvisorService, AuthResponse, AuthService, AuthUserInfo, BudgetAlertsResponse,
    BudgetResponse, BudgetService, BulkUploadResponse, CategorizeRequest, CategorizeResponse,
    CategoryAnalysisEntry, CategoryResponse, CategoryService, CreateBudgetRequest,
    CreateCategoryRequest, CreateGoalRequest, CreateRecurringRequest, CreateTransactionRequest,
    DashboardResponse, DashboardService, GoalProgressRequest, GoalResponse, GoalService,
    LoginRequest, PlanRequest, ProfileResponse, ProfileService, RecurringResponse,
    RecurringService, RefreshTokenRequest, RegisterRequest, SummaryPeriod, SummaryResponse,
    TransactionResponse, TransactionService, UpdateBudgetRequest, UpdateCategoryRequest,
    UpdateGoalRequest, UpdateProfileRequest, UpdateRecurringRequest, UpdateTransactionRequest,
};
use std::sync::Arc;

fn unwired() -> FintrackError {
    FintrackError::Internal("service not wired in this test".to_string())
}

/// One struct standing in for every service the router needs.
pub(crate) struct StubServices;

impl Service for StubServices {}

#[async_trait]
impl AuthService for StubServices {
    async fn register(&self, _request: RegisterRequest) -> FintrackResult<AuthResponse> {
        Err(unwired())
    }

    async fn login(&self, _request: LoginRequest) -> FintrackResult<AuthResponse> {
        Err(unwired())
    }

    async fn refresh_token(&self, _request: RefreshTokenRequest) -> FintrackResult<AuthResponse> {
        Err(unwired())
    }

    async fn validate_token(&self, _token: &str) -> FintrackResult<Claims> {
        Err(unwired())
    }

    async fn get_current_user(&self, _claims: &Claims) -> FintrackResult<AuthUserInfo> {
        Err(unwired())
    }
}

#[async_trait]
impl CategoryService for StubServices {
    async fn list_categories(&self, _user_id: UserId) -> FintrackResult<Vec<CategoryResponse>> {
        Ok(Vec::new())
    }

    async fn get_category(
        &self,
        _user_id: UserId,
        _id: CategoryId,
    ) -> FintrackResult<CategoryResponse> {
        Err(unwired())
    }

    async fn create_category(
        &self,
        _user_id: UserId,
        _request: CreateCategoryRequest,
    ) -> FintrackResult<CategoryResponse> {
        Err(unwired())
    }

    async fn update_category(
        &self,
        _user_id: UserId,
        _id: CategoryId,
        _request: UpdateCategoryRequest,
    ) -> FintrackResult<CategoryResponse> {
        Err(unwired())
    }

    async fn delete_category(&self, _user_id: UserId, _id: CategoryId) -> FintrackResult<()> {
        Err(unwired())
    }
}

#[async_trait]
impl TransactionService for StubServices {
    async fn list_transactions(
        &self,
        _user_id: UserId,
        _filter: TransactionFilter,
        _page: PageRequest,
    ) -> FintrackResult<Page<TransactionResponse>> {
        Err(unwired())
    }

    async fn get_transaction(
        &self,
        _user_id: UserId,
        id: TransactionId,
    ) -> FintrackResult<TransactionResponse> {
        Err(FintrackError::not_found("Transaction", id))
    }

    async fn create_transaction(
        &self,
        _user_id: UserId,
        _request: CreateTransactionRequest,
    ) -> FintrackResult<TransactionResponse> {
        Err(unwired())
    }

    async fn update_transaction(
        &self,
        _user_id: UserId,
        _id: TransactionId,
        _request: UpdateTransactionRequest,
    ) -> FintrackResult<TransactionResponse> {
        Err(unwired())
    }

    async fn delete_transaction(
        &self,
        _user_id: UserId,
        _id: TransactionId,
    ) -> FintrackResult<()> {
        Err(unwired())
    }

    async fn summary(
        &self,
        _user_id: UserId,
        _period: SummaryPeriod,
    ) -> FintrackResult<SummaryResponse> {
        Err(unwired())
    }

    async fn category_analysis(
        &self,
        _user_id: UserId,
        _start_date: Option<NaiveDate>,
        _end_date: Option<NaiveDate>,
    ) -> FintrackResult<Vec<CategoryAnalysisEntry>> {
        Err(unwired())
    }

    async fn bulk_upload(
        &self,
        _user_id: UserId,
        _data: &[u8],
    ) -> FintrackResult<BulkUploadResponse> {
        Err(unwired())
    }

    async fn purge_created_before(&self, _cutoff: DateTime<Utc>) -> FintrackResult<u64> {
        Err(unwired())
    }
}

#[async_trait]
impl BudgetService for StubServices {
    async fn list_budgets(
        &self,
        _user_id: UserId,
        _page: PageRequest,
    ) -> FintrackResult<Page<BudgetResponse>> {
        Err(unwired())
    }

    async fn get_budget(&self, _user_id: UserId, _id: BudgetId) -> FintrackResult<BudgetResponse> {
        Err(unwired())
    }

    async fn create_budget(
        &self,
        _user_id: UserId,
        _request: CreateBudgetRequest,
    ) -> FintrackResult<BudgetResponse> {
        Err(unwired())
    }

    async fn update_budget(
        &self,
        _user_id: UserId,
        _id: BudgetId,
        _request: UpdateBudgetRequest,
    ) -> FintrackResult<BudgetResponse> {
        Err(unwired())
    }

    async fn delete_budget(&self, _user_id: UserId, _id: BudgetId) -> FintrackResult<()> {
        Err(unwired())
    }

    async fn alerts(&self, _user_id: UserId) -> FintrackResult<BudgetAlertsResponse> {
        Err(unwired())
    }
}

#[async_trait]
impl GoalService for StubServices {
    async fn list_goals(
        &self,
        _user_id: UserId,
        _page: PageRequest,
    ) -> FintrackResult<Page<GoalResponse>> {
        Err(unwired())
    }

    async fn get_goal(&self, _user_id: UserId, _id: GoalId) -> FintrackResult<GoalResponse> {
        Err(unwired())
    }

    async fn create_goal(
        &self,
        _user_id: UserId,
        _request: CreateGoalRequest,
    ) -> FintrackResult<GoalResponse> {
        Err(unwired())
    }

    async fn update_goal(
        &self,
        _user_id: UserId,
        _id: GoalId,
        _request: UpdateGoalRequest,
    ) -> FintrackResult<GoalResponse> {
        Err(unwired())
    }

    async fn delete_goal(&self, _user_id: UserId, _id: GoalId) -> FintrackResult<()> {
        Err(unwired())
    }

    async fn record_progress(
        &self,
        _user_id: UserId,
        _id: GoalId,
        _request: GoalProgressRequest,
    ) -> FintrackResult<GoalResponse> {
        Err(unwired())
    }
}

#[async_trait]
impl RecurringService for StubServices {
    async fn list_recurring(
        &self,
        _user_id: UserId,
        _page: PageRequest,
    ) -> FintrackResult<Page<RecurringResponse>> {
        Err(unwired())
    }

    async fn get_recurring(
        &self,
        _user_id: UserId,
        _id: RecurringTransactionId,
    ) -> FintrackResult<RecurringResponse> {
        Err(unwired())
    }

    async fn create_recurring(
        &self,
        _user_id: UserId,
        _request: CreateRecurringRequest,
    ) -> FintrackResult<RecurringResponse> {
        Err(unwired())
    }

    async fn update_recurring(
        &self,
        _user_id: UserId,
        _id: RecurringTransactionId,
        _request: UpdateRecurringRequest,
    ) -> FintrackResult<RecurringResponse> {
        Err(unwired())
    }

    async fn delete_recurring(
        &self,
        _user_id: UserId,
        _id: RecurringTransactionId,
    ) -> FintrackResult<()> {
        Err(unwired())
    }

    async fn process_due(&self, _today: NaiveDate) -> FintrackResult<u64> {
        Err(unwired())
    }
}

#[async_trait]
impl ProfileService for StubServices {
    async fn get_profile(&self, _user_id: UserId) -> FintrackResult<ProfileResponse> {
        Err(unwired())
    }

    async fn update_profile(
        &self,
        _user_id: UserId,
        _request: UpdateProfileRequest,
    ) -> FintrackResult<ProfileResponse> {
        Err(unwired())
    }
}

#[async_trait]
impl DashboardService for StubServices {
    async fn dashboard(&self, _user_id: UserId) -> FintrackResult<DashboardResponse> {
        Err(unwired())
    }
}

#[async_trait]
impl AdvisorService for StubServices {
    async fn categorize(
        &self,
        _user_id: UserId,
        _request: CategorizeRequest,
    ) -> FintrackResult<CategorizeResponse> {
        Err(unwired())
    }

    async fn generate_plan(
        &self,
        _user_id: UserId,
        _request: PlanRequest,
    ) -> FintrackResult<SpendingPlan> {
        Err(unwired())
    }
}

/// Builds an [`AppState`] over the stubs, with no job infrastructure.
pub(crate) fn test_state() -> (AppState, Arc<TokenProvider>) {
    let provider = Arc::new(TokenProvider::new(Arc::new(SecurityConfig::default())));
    let services = Arc::new(StubServices);
    let state = AppState {
        auth_service: services.clone(),
        category_service: services.clone(),
        transaction_service: services.clone(),
        budget_service: services.clone(),
        goal_service: services.clone(),
        recurring_service: services.clone(),
        profile_service: services.clone(),
        dashboard_service: services.clone(),
        advisor_service: services,
        job_queue: None,
        scheduler: None,
    };
    (state, provider)
}

/// Signs a bearer header for a fresh user with the given role.
pub(crate) fn bearer_token(provider: &TokenProvider, role: UserRole) -> String {
    let token = provider
        .generate_access_token(UserId::new(), "casey", "casey@example.com", role)
        .expect("token generation should succeed");
    format!("Bearer {token}")
}
