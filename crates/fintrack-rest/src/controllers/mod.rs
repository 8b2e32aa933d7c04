//! REST API controllers.

pub mod advisor_controller;
pub mod auth_controller;
pub mod budget_controller;
pub mod category_controller;
pub mod dashboard_controller;
pub mod goal_controller;
pub mod health_controller;
pub mod jobs_controller;
pub mod profile_controller;
pub mod recurring_controller;
pub mod transaction_controller;

pub use health_controller::*;
