//! # Fintrack Advisor
//!
//! Analysis engines behind the advisor endpoints: a naive-Bayes
//! transaction categorizer trained on a seed corpus, and a Gemini
//! client that turns a user's figures and recent spending into a
//! structured financial plan.

pub mod categorizer;
pub mod planner;

pub use categorizer::Categorizer;
pub use planner::{
    EmergencyFundPlan, GeminiPlanner, GoalSavingsPlan, InvestmentPlan, PlanFigures, SpendingPlan,
};
