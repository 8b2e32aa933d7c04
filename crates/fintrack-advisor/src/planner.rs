//! Financial plan generation through the Gemini API.
//!
//! Builds a structured prompt from the caller's figures plus their
//! recent spending by category, calls `generateContent`, strips any
//! markdown code fences from the reply, and parses the JSON plan.
//! Upstream calls retry with exponential backoff under an overall
//! deadline.

use fintrack_config::AdvisorConfig;
use fintrack_core::{FintrackError, FintrackResult};
use fintrack_resilience::{with_timeout, RetryPolicy};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{debug, warn};

/// Figures supplied by the caller for plan generation.
#[derive(Debug, Clone)]
pub struct PlanFigures {
    /// Monthly income.
    pub income: Decimal,
    /// Monthly expenses.
    pub expenses: Decimal,
    /// Current savings balance.
    pub savings: Decimal,
    /// Free-text financial goal.
    pub goal: String,
}

/// Emergency fund recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct EmergencyFundPlan {
    pub target_amount: Decimal,
    pub monthly_contribution: Decimal,
    pub timeline_months: Decimal,
    pub recommendation: String,
}

/// Goal savings recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct GoalSavingsPlan {
    pub goal_name: String,
    pub monthly_contribution: Decimal,
    pub timeline_months: Decimal,
    pub recommendation: String,
}

/// Investment recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct InvestmentPlan {
    pub monthly_contribution: Decimal,
    pub recommendation: String,
}

/// A complete generated financial plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SpendingPlan {
    pub monthly_surplus: Decimal,
    pub emergency_fund: EmergencyFundPlan,
    pub goal_savings: GoalSavingsPlan,
    pub investment_plan: InvestmentPlan,
    pub summary: String,
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: String,
}

/// Gemini-backed plan generator.
pub struct GeminiPlanner {
    client: reqwest::Client,
    config: Arc<AdvisorConfig>,
    retry: RetryPolicy,
}

impl GeminiPlanner {
    /// Creates a planner from the advisor configuration.
    #[must_use]
    pub fn new(config: Arc<AdvisorConfig>) -> Self {
        let retry = RetryPolicy::with_max_attempts(config.max_retries.max(1));
        Self {
            client: reqwest::Client::new(),
            config,
            retry,
        }
    }

    /// Generates a financial plan from the caller's figures and their
    /// spending by category over the recent window.
    pub async fn generate_plan(
        &self,
        figures: &PlanFigures,
        spending: &[(String, Decimal)],
    ) -> FintrackResult<SpendingPlan> {
        let api_key = self.config.gemini_api_key.as_deref().ok_or_else(|| {
            FintrackError::Configuration("Gemini API key is not configured".to_string())
        })?;

        let prompt = build_prompt(figures, spending);
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.gemini_api_url.trim_end_matches('/'),
            self.config.gemini_model,
            api_key,
        );

        let text = with_timeout(
            self.config.request_timeout(),
            self.retry.execute(|| self.call_gemini(&url, &prompt)),
        )
        .await?;

        parse_plan(&text)
    }

    async fn call_gemini(&self, url: &str, prompt: &str) -> FintrackResult<String> {
        debug!("Requesting plan from {}", self.config.gemini_model);

        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| FintrackError::external_service("gemini", e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!("Gemini returned {}: {}", status, detail);
            return Err(FintrackError::external_service(
                "gemini",
                format!("upstream status {status}"),
            ));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| FintrackError::external_service("gemini", e.to_string()))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| {
                FintrackError::external_service("gemini", "response contained no candidates")
            })
    }
}

impl std::fmt::Debug for GeminiPlanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiPlanner")
            .field("model", &self.config.gemini_model)
            .finish_non_exhaustive()
    }
}

fn build_prompt(figures: &PlanFigures, spending: &[(String, Decimal)]) -> String {
    let mut context = String::new();
    for (category, total) in spending {
        let _ = writeln!(context, "    - {category}: ${total}");
    }
    if context.is_empty() {
        context.push_str("    (no recent transactions)\n");
    }

    format!(
        r#"You are an expert financial planner AI. Your task is to create a clear, actionable, and personalized financial plan for a user.
Provide the output in a structured JSON format.

Here is the user's financial data:
- Monthly Income: ${income}
- Monthly Expenses: ${expenses}
- Current Savings: ${savings}
- Financial Goal: {goal}

Spending by category over the last 90 days:
{context}
Based on this data, create a plan with the following JSON structure:
{{
  "monthly_surplus": number,
  "emergency_fund": {{
    "target_amount": number,
    "monthly_contribution": number,
    "timeline_months": number,
    "recommendation": "string"
  }},
  "goal_savings": {{
    "goal_name": "string",
    "monthly_contribution": number,
    "timeline_months": number,
    "recommendation": "string"
  }},
  "investment_plan": {{
    "monthly_contribution": number,
    "recommendation": "string describing a simple investment strategy like index funds for long-term growth"
  }},
  "summary": "string providing a brief, encouraging overview of the plan"
}}

Calculate the monthly surplus (income - expenses).
For the emergency fund, target 3-6 months of expenses. Prioritize this first.
For the goal savings, calculate contributions needed to meet the user's goal.
Allocate the remaining surplus to investments.
Ensure all monthly contributions (emergency, goal, investment) add up to the monthly surplus.
The recommendations should be encouraging and easy for a beginner to understand."#,
        income = figures.income,
        expenses = figures.expenses,
        savings = figures.savings,
        goal = figures.goal,
        context = context,
    )
}

/// Strips markdown code fences the model sometimes wraps around JSON.
fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

fn parse_plan(text: &str) -> FintrackResult<SpendingPlan> {
    let cleaned = strip_code_fences(text);
    serde_json::from_str(&cleaned).map_err(|e| {
        warn!("Failed to parse plan response: {}", e);
        FintrackError::external_service("gemini", format!("unparseable plan response: {e}"))
    })
}
