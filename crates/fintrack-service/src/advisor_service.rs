//! Advisor service: category suggestions and generated financial plans.

use crate::dto::{CategorizeRequest, CategorizeResponse, PlanRequest};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use fintrack_advisor::{Categorizer, GeminiPlanner, PlanFigures, SpendingPlan};
use fintrack_core::{FintrackError, FintrackResult, Service, UserId};
use fintrack_repository::{CategoryRepository, TransactionRepository};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info};

/// Days of spending history supplied as context for plan generation.
const SPENDING_CONTEXT_DAYS: i64 = 90;

/// Produces a financial plan from figures and spending context.
///
/// The production implementation is [`GeminiPlanner`]; tests substitute
/// a stub.
#[async_trait]
pub trait PlanGenerator: Send + Sync {
    /// Generates a plan.
    async fn generate_plan(
        &self,
        figures: &PlanFigures,
        spending: &[(String, Decimal)],
    ) -> FintrackResult<SpendingPlan>;
}

#[async_trait]
impl PlanGenerator for GeminiPlanner {
    async fn generate_plan(
        &self,
        figures: &PlanFigures,
        spending: &[(String, Decimal)],
    ) -> FintrackResult<SpendingPlan> {
        GeminiPlanner::generate_plan(self, figures, spending).await
    }
}

/// Advisor service trait.
#[async_trait]
pub trait AdvisorService: Service {
    /// Suggests a category for a transaction description.
    async fn categorize(
        &self,
        user_id: UserId,
        request: CategorizeRequest,
    ) -> FintrackResult<CategorizeResponse>;

    /// Generates a financial plan from the caller's figures and their
    /// recent spending.
    async fn generate_plan(
        &self,
        user_id: UserId,
        request: PlanRequest,
    ) -> FintrackResult<SpendingPlan>;
}

/// Advisor service implementation.
pub struct AdvisorServiceImpl<P, T, C>
where
    P: PlanGenerator,
    T: TransactionRepository,
    C: CategoryRepository,
{
    categorizer: Categorizer,
    planner: Arc<P>,
    transaction_repository: Arc<T>,
    category_repository: Arc<C>,
}

impl<P, T, C> AdvisorServiceImpl<P, T, C>
where
    P: PlanGenerator,
    T: TransactionRepository,
    C: CategoryRepository,
{
    /// Creates a new advisor service.
    pub fn new(
        categorizer: Categorizer,
        planner: Arc<P>,
        transaction_repository: Arc<T>,
        category_repository: Arc<C>,
    ) -> Self {
        Self {
            categorizer,
            planner,
            transaction_repository,
            category_repository,
        }
    }
}

#[async_trait]
impl<P, T, C> AdvisorService for AdvisorServiceImpl<P, T, C>
where
    P: PlanGenerator + 'static,
    T: TransactionRepository + 'static,
    C: CategoryRepository + 'static,
{
    async fn categorize(
        &self,
        user_id: UserId,
        request: CategorizeRequest,
    ) -> FintrackResult<CategorizeResponse> {
        let description = request.description.unwrap_or_default();
        if description.trim().is_empty() {
            return Err(FintrackError::BadRequest(
                "Description is required".to_string(),
            ));
        }

        debug!("Categorizing description for user: {}", user_id);

        let suggested = self.categorizer.predict(&description).to_string();

        // The suggestion maps onto the user's own category when one with
        // that name exists.
        let category_id = self
            .category_repository
            .find_by_name(user_id, &suggested)
            .await?
            .map(|category| category.id);

        Ok(CategorizeResponse {
            description,
            suggested_category: suggested,
            category_id,
        })
    }

    async fn generate_plan(
        &self,
        user_id: UserId,
        request: PlanRequest,
    ) -> FintrackResult<SpendingPlan> {
        let missing = request.missing_fields();
        if !missing.is_empty() {
            return Err(FintrackError::BadRequest(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        debug!("Generating plan for user: {}", user_id);

        let figures = PlanFigures {
            income: request.income.unwrap_or_default(),
            expenses: request.expenses.unwrap_or_default(),
            savings: request.savings.unwrap_or_default(),
            goal: request.goal.unwrap_or_default(),
        };

        let today = Utc::now().date_naive();
        let start = today - Duration::days(SPENDING_CONTEXT_DAYS);
        let spending: Vec<(String, Decimal)> = self
            .transaction_repository
            .expenses_by_category(user_id, start, today, None)
            .await?
            .into_iter()
            .map(|spend| (spend.name.unwrap_or_else(|| "Other".to_string()), spend.total))
            .collect();

        let plan = self.planner.generate_plan(&figures, &spending).await?;

        info!("Plan generated for user: {}", user_id);
        Ok(plan)
    }
}

impl<P, T, C> Service for AdvisorServiceImpl<P, T, C>
where
    P: PlanGenerator + 'static,
    T: TransactionRepository + 'static,
    C: CategoryRepository + 'static,
{
}

impl<P, T, C> std::fmt::Debug for AdvisorServiceImpl<P, T, C>
where
    P: PlanGenerator,
    T: TransactionRepository,
    C: CategoryRepository,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdvisorServiceImpl").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{InMemoryCategoryRepository, InMemoryTransactionRepository};
    use fintrack_advisor::{EmergencyFundPlan, GoalSavingsPlan, InvestmentPlan};
    use fintrack_core::{Category, Transaction, TransactionType};
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    type Captured = (PlanFigures, Vec<(String, Decimal)>);

    struct StubPlanner {
        captured: Mutex<Option<Captured>>,
    }

    impl StubPlanner {
        fn new() -> Self {
            Self {
                captured: Mutex::new(None),
            }
        }

        fn captured(&self) -> Captured {
            self.captured.lock().unwrap().clone().unwrap()
        }
    }

    #[async_trait]
    impl PlanGenerator for StubPlanner {
        async fn generate_plan(
            &self,
            figures: &PlanFigures,
            spending: &[(String, Decimal)],
        ) -> FintrackResult<SpendingPlan> {
            *self.captured.lock().unwrap() = Some((figures.clone(), spending.to_vec()));
            Ok(canned_plan())
        }
    }

    fn canned_plan() -> SpendingPlan {
        SpendingPlan {
            monthly_surplus: dec!(1500),
            emergency_fund: EmergencyFundPlan {
                target_amount: dec!(10500),
                monthly_contribution: dec!(700),
                timeline_months: dec!(15),
                recommendation: "Build this first.".to_string(),
            },
            goal_savings: GoalSavingsPlan {
                goal_name: "House deposit".to_string(),
                monthly_contribution: dec!(500),
                timeline_months: dec!(40),
                recommendation: "Steady progress.".to_string(),
            },
            investment_plan: InvestmentPlan {
                monthly_contribution: dec!(300),
                recommendation: "Index funds.".to_string(),
            },
            summary: "A solid plan.".to_string(),
        }
    }

    struct TestContext {
        service: AdvisorServiceImpl<
            StubPlanner,
            InMemoryTransactionRepository,
            InMemoryCategoryRepository,
        >,
        planner: Arc<StubPlanner>,
        transactions: Arc<InMemoryTransactionRepository>,
        categories: Arc<InMemoryCategoryRepository>,
        user_id: UserId,
    }

    fn create_context() -> TestContext {
        let planner = Arc::new(StubPlanner::new());
        let transactions = Arc::new(InMemoryTransactionRepository::new());
        let categories = Arc::new(InMemoryCategoryRepository::new());
        let service = AdvisorServiceImpl::new(
            Categorizer::with_seed_corpus(),
            Arc::clone(&planner),
            Arc::clone(&transactions),
            Arc::clone(&categories),
        );

        TestContext {
            service,
            planner,
            transactions,
            categories,
            user_id: UserId::new(),
        }
    }

    fn plan_request() -> PlanRequest {
        PlanRequest {
            income: Some(dec!(5000)),
            expenses: Some(dec!(3500)),
            savings: Some(dec!(2000)),
            goal: Some("House deposit".to_string()),
        }
    }

    #[tokio::test]
    async fn test_categorize_requires_description() {
        let ctx = create_context();

        for description in [None, Some(String::new()), Some("   ".to_string())] {
            let result = ctx
                .service
                .categorize(ctx.user_id, CategorizeRequest { description })
                .await;
            match result.unwrap_err() {
                FintrackError::BadRequest(msg) => assert_eq!(msg, "Description is required"),
                other => panic!("Expected BadRequest, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_categorize_resolves_user_category() {
        let ctx = create_context();
        let category = Category::new(ctx.user_id, "Food & Drink".to_string(), None, None);
        let category_id = category.id;
        ctx.categories.save(&category).await.unwrap();

        let response = ctx
            .service
            .categorize(
                ctx.user_id,
                CategorizeRequest {
                    description: Some("morning coffee at the cafe".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(response.suggested_category, "Food & Drink");
        assert_eq!(response.category_id, Some(category_id));
    }

    #[tokio::test]
    async fn test_categorize_without_matching_category() {
        let ctx = create_context();

        let response = ctx
            .service
            .categorize(
                ctx.user_id,
                CategorizeRequest {
                    description: Some("monthly rent payment".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(response.suggested_category, "Housing");
        assert!(response.category_id.is_none());
    }

    #[tokio::test]
    async fn test_generate_plan_reports_missing_fields() {
        let ctx = create_context();

        let result = ctx
            .service
            .generate_plan(
                ctx.user_id,
                PlanRequest {
                    income: Some(dec!(5000)),
                    expenses: None,
                    savings: None,
                    goal: Some("House".to_string()),
                },
            )
            .await;
        match result.unwrap_err() {
            FintrackError::BadRequest(msg) => {
                assert_eq!(msg, "Missing required fields: expenses, savings");
            }
            other => panic!("Expected BadRequest, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_plan_passes_spending_context() {
        let ctx = create_context();
        let today = Utc::now().date_naive();

        let groceries = Category::new(ctx.user_id, "Groceries".to_string(), None, None);
        let groceries_id = groceries.id;
        ctx.transactions.add_category(groceries);

        ctx.transactions.add(Transaction::new(
            ctx.user_id,
            "Weekly shop".to_string(),
            dec!(120),
            TransactionType::Expense,
            today - Duration::days(10),
            Some(groceries_id),
        ));
        ctx.transactions.add(Transaction::new(
            ctx.user_id,
            "Cash withdrawal".to_string(),
            dec!(40),
            TransactionType::Expense,
            today - Duration::days(5),
            None,
        ));
        // Outside the 90-day window.
        ctx.transactions.add(Transaction::new(
            ctx.user_id,
            "Old purchase".to_string(),
            dec!(900),
            TransactionType::Expense,
            today - Duration::days(120),
            Some(groceries_id),
        ));

        let plan = ctx
            .service
            .generate_plan(ctx.user_id, plan_request())
            .await
            .unwrap();
        assert_eq!(plan.monthly_surplus, dec!(1500));

        let (figures, spending) = ctx.planner.captured();
        assert_eq!(figures.income, dec!(5000));
        assert_eq!(figures.goal, "House deposit");
        assert_eq!(
            spending,
            vec![
                ("Groceries".to_string(), dec!(120)),
                ("Other".to_string(), dec!(40)),
            ]
        );
    }
}
