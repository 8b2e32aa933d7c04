//! Goal type value object.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of financial goal the user is working towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    /// General savings target.
    #[default]
    Savings,
    /// Paying down a debt.
    DebtPayoff,
    /// Building an emergency fund.
    EmergencyFund,
    /// Saving for a specific purchase.
    Purchase,
    /// Building an investment position.
    Investment,
    /// Anything else.
    Other,
}

impl GoalType {
    /// Returns the canonical string form used in storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Savings => "savings",
            Self::DebtPayoff => "debt_payoff",
            Self::EmergencyFund => "emergency_fund",
            Self::Purchase => "purchase",
            Self::Investment => "investment",
            Self::Other => "other",
        }
    }

    /// Parses a goal type from a string.
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "savings" => Some(Self::Savings),
            "debt_payoff" => Some(Self::DebtPayoff),
            "emergency_fund" => Some(Self::EmergencyFund),
            "purchase" => Some(Self::Purchase),
            "investment" => Some(Self::Investment),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    /// All goal types.
    #[must_use]
    pub const fn all() -> [Self; 6] {
        [
            Self::Savings,
            Self::DebtPayoff,
            Self::EmergencyFund,
            Self::Purchase,
            Self::Investment,
            Self::Other,
        ]
    }
}

impl fmt::Display for GoalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        for goal_type in GoalType::all() {
            assert_eq!(GoalType::from_str(goal_type.as_str()), Some(goal_type));
        }
    }

    #[test]
    fn test_serialization() {
        assert_eq!(
            serde_json::to_string(&GoalType::EmergencyFund).unwrap(),
            "\"emergency_fund\""
        );
    }
}
