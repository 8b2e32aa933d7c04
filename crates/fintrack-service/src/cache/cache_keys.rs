//! Cache key generators for consistent key naming.

use fintrack_core::UserId;

/// Prefix for all cache keys to namespace them.
const CACHE_PREFIX: &str = "fintrack:cache";

/// Key holding a user's computed spending insights.
#[must_use]
pub fn spending_insights(user_id: UserId) -> String {
    format!("{CACHE_PREFIX}:insights:{user_id}")
}
