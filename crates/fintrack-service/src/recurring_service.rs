//! Recurring transaction template service implementation.

use crate::dto::{CreateRecurringRequest, RecurringResponse, UpdateRecurringRequest};
use async_trait::async_trait;
use chrono::NaiveDate;
use fintrack_core::{
    FintrackError, FintrackResult, Page, PageRequest, RecurringTransaction,
    RecurringTransactionId, Service, Transaction, UserId, ValidateExt,
};
use fintrack_repository::{CategoryRepository, RecurringTransactionRepository, TransactionRepository};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info};

/// Recurring transaction service trait.
#[async_trait]
pub trait RecurringService: Service {
    /// Pages a user's recurring templates, newest first.
    async fn list_recurring(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> FintrackResult<Page<RecurringResponse>>;

    /// Gets a template by ID.
    async fn get_recurring(
        &self,
        user_id: UserId,
        id: RecurringTransactionId,
    ) -> FintrackResult<RecurringResponse>;

    /// Creates a new template.
    async fn create_recurring(
        &self,
        user_id: UserId,
        request: CreateRecurringRequest,
    ) -> FintrackResult<RecurringResponse>;

    /// Updates an existing template.
    async fn update_recurring(
        &self,
        user_id: UserId,
        id: RecurringTransactionId,
        request: UpdateRecurringRequest,
    ) -> FintrackResult<RecurringResponse>;

    /// Deletes a template.
    async fn delete_recurring(
        &self,
        user_id: UserId,
        id: RecurringTransactionId,
    ) -> FintrackResult<()>;

    /// Materializes transactions for every template due on or before
    /// `today` and advances the schedules. Returns the number of
    /// transactions created.
    ///
    /// Templates that fell behind (missed job runs) are caught up with
    /// one transaction per missed occurrence, each dated at the
    /// occurrence it covers.
    async fn process_due(&self, today: NaiveDate) -> FintrackResult<u64>;
}

/// Recurring transaction service implementation.
pub struct RecurringServiceImpl<R, T, C>
where
    R: RecurringTransactionRepository,
    T: TransactionRepository,
    C: CategoryRepository,
{
    recurring_repository: Arc<R>,
    transaction_repository: Arc<T>,
    category_repository: Arc<C>,
}

impl<R, T, C> RecurringServiceImpl<R, T, C>
where
    R: RecurringTransactionRepository,
    T: TransactionRepository,
    C: CategoryRepository,
{
    /// Creates a new recurring transaction service.
    pub fn new(
        recurring_repository: Arc<R>,
        transaction_repository: Arc<T>,
        category_repository: Arc<C>,
    ) -> Self {
        Self {
            recurring_repository,
            transaction_repository,
            category_repository,
        }
    }

    fn validate_amount(amount: Decimal) -> FintrackResult<()> {
        if amount <= Decimal::ZERO {
            return Err(FintrackError::Validation(
                "Amount must be positive".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_dates(template: &RecurringTransaction) -> FintrackResult<()> {
        if template
            .end_date
            .is_some_and(|end| end < template.start_date)
        {
            return Err(FintrackError::Validation(
                "End date must be on or after start date".to_string(),
            ));
        }
        Ok(())
    }

    async fn validate_category(
        &self,
        user_id: UserId,
        category_id: fintrack_core::CategoryId,
    ) -> FintrackResult<()> {
        if self
            .category_repository
            .find_by_id(user_id, category_id)
            .await?
            .is_none()
        {
            return Err(FintrackError::Validation(format!(
                "Unknown category: {category_id}"
            )));
        }
        Ok(())
    }

    fn materialize(template: &RecurringTransaction, occurrence: NaiveDate) -> Transaction {
        let mut transaction = Transaction::new(
            template.user_id,
            template.description.clone(),
            template.amount,
            template.transaction_type,
            occurrence,
            template.category_id,
        );
        transaction.is_recurring = true;
        transaction.notes = Some(format!(
            "Auto-generated from recurring transaction: {}",
            template.id
        ));
        transaction
    }
}

#[async_trait]
impl<R, T, C> RecurringService for RecurringServiceImpl<R, T, C>
where
    R: RecurringTransactionRepository + 'static,
    T: TransactionRepository + 'static,
    C: CategoryRepository + 'static,
{
    async fn list_recurring(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> FintrackResult<Page<RecurringResponse>> {
        debug!("Listing recurring templates for user: {}", user_id);

        let templates = self.recurring_repository.find_page(user_id, page).await?;
        Ok(templates.map(RecurringResponse::from))
    }

    async fn get_recurring(
        &self,
        user_id: UserId,
        id: RecurringTransactionId,
    ) -> FintrackResult<RecurringResponse> {
        let template = self
            .recurring_repository
            .find_by_id(user_id, id)
            .await?
            .ok_or_else(|| FintrackError::not_found("Recurring transaction", id))?;
        Ok(RecurringResponse::from(template))
    }

    async fn create_recurring(
        &self,
        user_id: UserId,
        request: CreateRecurringRequest,
    ) -> FintrackResult<RecurringResponse> {
        debug!("Creating recurring template for user: {}", user_id);

        request.validate_request()?;
        Self::validate_amount(request.amount)?;
        if let Some(category_id) = request.category_id {
            self.validate_category(user_id, category_id).await?;
        }

        let mut template = RecurringTransaction::new(
            user_id,
            request.description,
            request.amount,
            request.transaction_type,
            request.frequency,
            request.start_date,
            request.category_id,
        );
        template.end_date = request.end_date;
        Self::validate_dates(&template)?;

        let saved = self.recurring_repository.save(&template).await?;

        info!("Recurring template created: {}", saved.id);
        Ok(RecurringResponse::from(saved))
    }

    async fn update_recurring(
        &self,
        user_id: UserId,
        id: RecurringTransactionId,
        request: UpdateRecurringRequest,
    ) -> FintrackResult<RecurringResponse> {
        debug!("Updating recurring template: {}", id);

        request.validate_request()?;

        let mut template = self
            .recurring_repository
            .find_by_id(user_id, id)
            .await?
            .ok_or_else(|| FintrackError::not_found("Recurring transaction", id))?;

        if let Some(description) = request.description {
            template.description = description;
        }
        if let Some(amount) = request.amount {
            Self::validate_amount(amount)?;
            template.amount = amount;
        }
        if let Some(transaction_type) = request.transaction_type {
            template.transaction_type = transaction_type;
        }
        if let Some(frequency) = request.frequency {
            template.frequency = frequency;
        }
        if let Some(end_date) = request.end_date {
            template.end_date = Some(end_date);
        }
        if let Some(category_id) = request.category_id {
            self.validate_category(user_id, category_id).await?;
            template.category_id = Some(category_id);
        }
        if let Some(is_active) = request.is_active {
            template.is_active = is_active;
        }
        Self::validate_dates(&template)?;

        let updated = self.recurring_repository.update(&template).await?;

        info!("Recurring template updated: {}", id);
        Ok(RecurringResponse::from(updated))
    }

    async fn delete_recurring(
        &self,
        user_id: UserId,
        id: RecurringTransactionId,
    ) -> FintrackResult<()> {
        debug!("Deleting recurring template: {}", id);

        let deleted = self.recurring_repository.delete(user_id, id).await?;
        if !deleted {
            return Err(FintrackError::not_found("Recurring transaction", id));
        }

        info!("Recurring template deleted: {}", id);
        Ok(())
    }

    async fn process_due(&self, today: NaiveDate) -> FintrackResult<u64> {
        debug!("Processing recurring templates due on or before {}", today);

        let due = self.recurring_repository.find_due(today).await?;
        let mut created = 0u64;

        for mut template in due {
            while template.is_due(today) {
                let occurrence = template.next_occurrence;
                let transaction = Self::materialize(&template, occurrence);
                self.transaction_repository.save(&transaction).await?;
                created += 1;

                if template.advance_occurrence().is_none() {
                    // Stepping past the end date deactivated the schedule.
                    break;
                }
            }
            self.recurring_repository.update(&template).await?;
        }

        if created > 0 {
            info!("Materialized {} recurring transactions", created);
        }
        Ok(created)
    }
}

impl<R, T, C> Service for RecurringServiceImpl<R, T, C>
where
    R: RecurringTransactionRepository + 'static,
    T: TransactionRepository + 'static,
    C: CategoryRepository + 'static,
{
}

impl<R, T, C> std::fmt::Debug for RecurringServiceImpl<R, T, C>
where
    R: RecurringTransactionRepository,
    T: TransactionRepository,
    C: CategoryRepository,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecurringServiceImpl").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        InMemoryCategoryRepository, InMemoryRecurringTransactionRepository,
        InMemoryTransactionRepository,
    };
    use chrono::{Duration, Utc};
    use fintrack_core::{Category, CategoryId, Frequency, TransactionType};
    use rust_decimal_macros::dec;

    struct TestContext {
        service: RecurringServiceImpl<
            InMemoryRecurringTransactionRepository,
            InMemoryTransactionRepository,
            InMemoryCategoryRepository,
        >,
        transactions: Arc<InMemoryTransactionRepository>,
        user_id: UserId,
        category_id: CategoryId,
    }

    fn create_context() -> TestContext {
        let user_id = UserId::new();
        let category = Category::new(user_id, "Housing".to_string(), None, None);
        let category_id = category.id;

        let recurring = Arc::new(InMemoryRecurringTransactionRepository::new());
        let transactions = Arc::new(InMemoryTransactionRepository::new());
        let categories = Arc::new(InMemoryCategoryRepository::with_category(category));
        let service = RecurringServiceImpl::new(recurring, Arc::clone(&transactions), categories);

        TestContext {
            service,
            transactions,
            user_id,
            category_id,
        }
    }

    fn create_request(ctx: &TestContext, start: NaiveDate) -> CreateRecurringRequest {
        CreateRecurringRequest {
            description: "Rent".to_string(),
            amount: dec!(1500),
            transaction_type: TransactionType::Expense,
            frequency: Frequency::Monthly,
            start_date: start,
            end_date: None,
            category_id: Some(ctx.category_id),
        }
    }

    #[tokio::test]
    async fn test_create_template() {
        let ctx = create_context();
        let start = Utc::now().date_naive() + Duration::days(5);

        let response = ctx
            .service
            .create_recurring(ctx.user_id, create_request(&ctx, start))
            .await
            .unwrap();
        assert_eq!(response.next_occurrence, start);
        assert!(response.is_active);
        assert_eq!(response.category_id, Some(ctx.category_id));
    }

    #[tokio::test]
    async fn test_create_template_unknown_category() {
        let ctx = create_context();

        let mut request = create_request(&ctx, Utc::now().date_naive());
        request.category_id = Some(CategoryId::new());

        let result = ctx.service.create_recurring(ctx.user_id, request).await;
        assert!(matches!(result.unwrap_err(), FintrackError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_template_rejects_end_before_start() {
        let ctx = create_context();
        let start = Utc::now().date_naive();

        let mut request = create_request(&ctx, start);
        request.end_date = Some(start - Duration::days(1));

        let result = ctx.service.create_recurring(ctx.user_id, request).await;
        match result.unwrap_err() {
            FintrackError::Validation(msg) => assert!(msg.contains("End date")),
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_template_deactivates() {
        let ctx = create_context();

        let created = ctx
            .service
            .create_recurring(ctx.user_id, create_request(&ctx, Utc::now().date_naive()))
            .await
            .unwrap();

        let response = ctx
            .service
            .update_recurring(
                ctx.user_id,
                created.id,
                UpdateRecurringRequest {
                    description: None,
                    amount: Some(dec!(1600)),
                    transaction_type: None,
                    frequency: None,
                    end_date: None,
                    category_id: None,
                    is_active: Some(false),
                },
            )
            .await
            .unwrap();
        assert_eq!(response.amount, dec!(1600));
        assert!(!response.is_active);
    }

    #[tokio::test]
    async fn test_process_due_catches_up_missed_occurrences() {
        let ctx = create_context();
        let today = Utc::now().date_naive();

        let mut request = create_request(&ctx, today - Duration::days(2));
        request.frequency = Frequency::Daily;
        let created = ctx
            .service
            .create_recurring(ctx.user_id, request)
            .await
            .unwrap();

        let count = ctx.service.process_due(today).await.unwrap();
        assert_eq!(count, 3);

        let materialized = ctx.transactions.find_all(ctx.user_id).await.unwrap();
        assert_eq!(materialized.len(), 3);
        for transaction in &materialized {
            assert!(transaction.is_recurring);
            assert_eq!(
                transaction.notes.as_deref(),
                Some(format!("Auto-generated from recurring transaction: {}", created.id).as_str())
            );
        }
        // Dates cover each missed day, newest first per repository ordering.
        assert_eq!(materialized[0].date, today);
        assert_eq!(materialized[2].date, today - Duration::days(2));

        // The schedule moved past today, so a second run creates nothing.
        let again = ctx.service.process_due(today).await.unwrap();
        assert_eq!(again, 0);
    }

    #[tokio::test]
    async fn test_process_due_deactivates_past_end_date() {
        let ctx = create_context();
        let today = Utc::now().date_naive();

        let mut request = create_request(&ctx, today - Duration::days(2));
        request.frequency = Frequency::Daily;
        request.end_date = Some(today - Duration::days(1));
        let created = ctx
            .service
            .create_recurring(ctx.user_id, request)
            .await
            .unwrap();

        let count = ctx.service.process_due(today).await.unwrap();
        assert_eq!(count, 2);

        let template = ctx
            .service
            .get_recurring(ctx.user_id, created.id)
            .await
            .unwrap();
        assert!(!template.is_active);
    }

    #[tokio::test]
    async fn test_process_due_skips_inactive_and_future() {
        let ctx = create_context();
        let today = Utc::now().date_naive();

        // Future start date.
        ctx.service
            .create_recurring(ctx.user_id, create_request(&ctx, today + Duration::days(10)))
            .await
            .unwrap();

        // Active but deactivated before processing.
        let inactive = ctx
            .service
            .create_recurring(ctx.user_id, create_request(&ctx, today - Duration::days(1)))
            .await
            .unwrap();
        ctx.service
            .update_recurring(
                ctx.user_id,
                inactive.id,
                UpdateRecurringRequest {
                    description: None,
                    amount: None,
                    transaction_type: None,
                    frequency: None,
                    end_date: None,
                    category_id: None,
                    is_active: Some(false),
                },
            )
            .await
            .unwrap();

        let count = ctx.service.process_due(today).await.unwrap();
        assert_eq!(count, 0);
        assert!(ctx
            .transactions
            .find_all(ctx.user_id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_delete_template_not_found() {
        let ctx = create_context();

        let result = ctx
            .service
            .delete_recurring(ctx.user_id, RecurringTransactionId::new())
            .await;
        assert!(matches!(result.unwrap_err(), FintrackError::NotFound { .. }));
    }
}
