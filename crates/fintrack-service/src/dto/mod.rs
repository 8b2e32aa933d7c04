//! Data Transfer Objects (DTOs).

mod advisor_dto;
mod auth_dto;
mod budget_dto;
mod category_dto;
mod dashboard_dto;
mod goal_dto;
mod insights_dto;
mod profile_dto;
mod recurring_dto;
mod transaction_dto;

pub use advisor_dto::*;
pub use auth_dto::*;
pub use budget_dto::*;
pub use category_dto::*;
pub use dashboard_dto::*;
pub use goal_dto::*;
pub use insights_dto::*;
pub use profile_dto::*;
pub use recurring_dto::*;
pub use transaction_dto::*;
