//! Domain entities.

mod budget;
mod category;
mod goal;
mod recurring_transaction;
mod transaction;
mod user;
mod user_profile;

pub use budget::{Budget, DEFAULT_ALERT_THRESHOLD};
pub use category::{Category, DEFAULT_CATEGORIES};
pub use goal::Goal;
pub use recurring_transaction::RecurringTransaction;
pub use transaction::Transaction;
pub use user::User;
pub use user_profile::UserProfile;
