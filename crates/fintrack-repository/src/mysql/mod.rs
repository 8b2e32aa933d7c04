//! MySQL repository implementations.

mod budget_repository;
mod category_repository;
mod goal_repository;
mod recurring_transaction_repository;
mod transaction_repository;
mod user_profile_repository;
mod user_repository;

pub use budget_repository::MySqlBudgetRepository;
pub use category_repository::MySqlCategoryRepository;
pub use goal_repository::MySqlGoalRepository;
pub use recurring_transaction_repository::MySqlRecurringTransactionRepository;
pub use transaction_repository::MySqlTransactionRepository;
pub use user_profile_repository::MySqlUserProfileRepository;
pub use user_repository::MySqlUserRepository;

use fintrack_core::{FintrackError, FintrackResult};
use uuid::Uuid;

/// Parses a CHAR(36) column back into a UUID.
pub(crate) fn parse_uuid(s: &str) -> FintrackResult<Uuid> {
    Uuid::parse_str(s).map_err(|e| FintrackError::Internal(format!("Invalid UUID in database: {e}")))
}
