//! # Fintrack Service
//!
//! Business logic service layer for fintrack. Each service owns one
//! resource's use cases over the repository traits; the REST layer and
//! the background jobs call into these.

pub mod advisor_service;
pub mod auth_service;
pub mod backup_service;
pub mod budget_service;
pub mod cache;
pub mod category_service;
pub mod dashboard_service;
pub mod dto;
pub mod goal_service;
pub mod insights_service;
pub mod jobs;
pub mod notify;
pub mod profile_service;
pub mod recurring_service;
pub mod report_service;
pub mod transaction_service;

pub use advisor_service::*;
pub use auth_service::*;
pub use backup_service::*;
pub use budget_service::*;
pub use cache::*;
pub use category_service::*;
pub use dashboard_service::*;
pub use dto::*;
pub use goal_service::*;
pub use insights_service::*;
pub use jobs::*;
pub use notify::*;
pub use profile_service::*;
pub use recurring_service::*;
pub use report_service::*;
pub use transaction_service::*;

#[cfg(test)]
pub(crate) mod testing;
