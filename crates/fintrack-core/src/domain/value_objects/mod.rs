//! Value objects for the fintrack domain.

mod budget_period;
mod email;
mod frequency;
mod goal_type;
mod role;
mod status;
mod transaction_type;

pub use budget_period::BudgetPeriod;
pub use email::{Email, EmailError};
pub use frequency::Frequency;
pub use goal_type::GoalType;
pub use role::UserRole;
pub use status::UserStatus;
pub use transaction_type::TransactionType;
