//! Category entity.

use crate::{CategoryId, Entity, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// The categories provisioned for every new account: (name, color, icon).
pub const DEFAULT_CATEGORIES: [(&str, &str, &str); 8] = [
    ("Food & Dining", "#EF4444", "\u{1F37D}\u{FE0F}"),
    ("Transportation", "#3B82F6", "\u{1F697}"),
    ("Shopping", "#8B5CF6", "\u{1F6CD}\u{FE0F}"),
    ("Entertainment", "#F59E0B", "\u{1F3AC}"),
    ("Bills & Utilities", "#10B981", "\u{1F4A1}"),
    ("Health & Medical", "#EC4899", "\u{1F3E5}"),
    ("Income", "#059669", "\u{1F4B0}"),
    ("Other", "#6B7280", "\u{1F4CB}"),
];

/// A user-scoped transaction category.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Category {
    /// Unique identifier for the category.
    pub id: CategoryId,

    /// Owning user.
    pub user_id: UserId,

    /// Category name, unique per user.
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    /// Display color as `#RRGGBB`.
    pub color: String,

    /// Short icon string (usually a single emoji).
    #[validate(length(max = 16))]
    pub icon: String,

    /// Whether this category was provisioned at registration.
    pub is_default: bool,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Creates a new category with optional color/icon overrides.
    #[must_use]
    pub fn new(
        user_id: UserId,
        name: String,
        color: Option<String>,
        icon: Option<String>,
    ) -> Self {
        Self {
            id: CategoryId::new(),
            user_id,
            name,
            color: color.unwrap_or_else(|| "#6B7280".to_string()),
            icon: icon.unwrap_or_else(|| "\u{1F4CB}".to_string()),
            is_default: false,
            created_at: Utc::now(),
        }
    }

    /// Builds the default category set for a freshly registered user.
    #[must_use]
    pub fn default_set(user_id: UserId) -> Vec<Self> {
        DEFAULT_CATEGORIES
            .iter()
            .map(|(name, color, icon)| {
                let mut category = Self::new(
                    user_id,
                    (*name).to_string(),
                    Some((*color).to_string()),
                    Some((*icon).to_string()),
                );
                category.is_default = true;
                category
            })
            .collect()
    }
}

impl Entity<CategoryId> for Category {
    fn id(&self) -> &CategoryId {
        &self.id
    }
}
