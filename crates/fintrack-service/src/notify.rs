//! Notification composition and dispatch.
//!
//! Services compose subject/body pairs here and hand them to a
//! [`Notifier`]. The shipped implementation logs through tracing;
//! wiring an SMTP relay behind the same trait is a deployment concern.

use async_trait::async_trait;
use chrono::NaiveDate;
use fintrack_core::{Budget, FintrackResult, Goal};
use fintrack_repository::{CategorySpend, PeriodTotals};
use rust_decimal::Decimal;
use std::fmt::Write as _;
use tracing::{debug, info};

/// Delivers composed notifications to a user.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends a message to the recipient address.
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> FintrackResult<()>;
}

/// Notifier that logs composed messages through tracing.
#[derive(Debug, Default, Clone)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> FintrackResult<()> {
        info!("Notification to {}: {}", recipient, subject);
        debug!("Notification body:\n{}", body);
        Ok(())
    }
}

/// Formats an amount as US dollars with thousands separators, e.g.
/// `$1,234.56`.
#[must_use]
pub fn format_usd(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let sign = if rounded.is_sign_negative() { "-" } else { "" };
    let abs = rounded.abs();
    let text = format!("{abs:.2}");
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("${sign}{}.{frac_part}", group_thousands(int_part))
}

fn group_thousands(digits: &str) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let mut out = String::with_capacity(chars.len() + chars.len() / 3);
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*c);
    }
    out
}

/// Composes the over-budget alert for a budget and its spent amount.
#[must_use]
pub fn over_budget_message(
    display_name: &str,
    category_name: &str,
    budget: &Budget,
    spent: Decimal,
) -> (String, String) {
    let subject = format!("\u{26A0}\u{FE0F} Budget Alert: {category_name} Over Budget");
    let body = format!(
        "Hi {display_name},\n\n\
         Your budget for \"{category_name}\" has been exceeded.\n\n\
         Budget Details:\n\
         • Budget Amount: {}\n\
         • Amount Spent: {}\n\
         • Over Budget By: {}\n\
         • Period: {} to {}\n\n\
         Consider reviewing your spending in this category or adjusting your budget.\n\n\
         Best regards,\n\
         Your Financial Management App",
        format_usd(budget.amount),
        format_usd(spent),
        format_usd(spent - budget.amount),
        budget.start_date,
        budget.end_date,
    );
    (subject, body)
}

/// Composes the near-limit alert for a budget and its spent amount.
#[must_use]
pub fn near_limit_message(
    display_name: &str,
    category_name: &str,
    budget: &Budget,
    spent: Decimal,
) -> (String, String) {
    let subject = format!("\u{1F4A1} Budget Alert: {category_name} Approaching Limit");
    let percentage = budget.percentage_used(spent);
    let body = format!(
        "Hi {display_name},\n\n\
         You're approaching your budget limit for \"{category_name}\".\n\n\
         Budget Status:\n\
         • Budget Amount: {}\n\
         • Amount Spent: {}\n\
         • Remaining: {}\n\
         • Usage: {percentage:.1}% of budget used\n\
         • Period: {} to {}\n\n\
         Consider monitoring your spending in this category to stay within budget.\n\n\
         Best regards,\n\
         Your Financial Management App",
        format_usd(budget.amount),
        format_usd(spent),
        format_usd(budget.remaining_amount(spent)),
        budget.start_date,
        budget.end_date,
    );
    (subject, body)
}

/// Composes the monthly financial report for one user.
#[must_use]
pub fn monthly_report_message(
    display_name: &str,
    month_name: &str,
    totals: &PeriodTotals,
    top_categories: &[CategorySpend],
) -> (String, String) {
    let subject = format!("\u{1F4CA} Your Monthly Financial Report - {month_name}");

    let mut categories_text = String::new();
    for spend in top_categories {
        let name = spend.name.as_deref().unwrap_or("Uncategorized");
        let _ = writeln!(categories_text, "• {name}: {}", format_usd(spend.total));
    }
    let categories_text = categories_text.trim_end();

    let body = format!(
        "Hi {display_name},\n\n\
         Here's your financial summary for {month_name}:\n\n\
         \u{1F4B0} INCOME & EXPENSES\n\
         • Total Income: {}\n\
         • Total Expenses: {}\n\
         • Net Amount: {}\n\
         • Transactions: {}\n\n\
         \u{1F4C8} TOP SPENDING CATEGORIES\n\
         {categories_text}\n\n\
         Keep up the great work managing your finances!\n\n\
         Best regards,\n\
         Your Financial Management App",
        format_usd(totals.income),
        format_usd(totals.expenses),
        format_usd(totals.income - totals.expenses),
        totals.transaction_count,
    );
    (subject, body)
}

/// Composes the deadline reminder for an unachieved goal.
#[must_use]
pub fn goal_deadline_message(display_name: &str, goal: &Goal, today: NaiveDate) -> (String, String) {
    let subject = format!("\u{1F3AF} Goal Deadline Approaching: {}", goal.name);
    let progress = goal.progress_percentage();
    let body = format!(
        "Hi {display_name},\n\n\
         Your goal \"{}\" is approaching its deadline.\n\n\
         Goal Details:\n\
         • Target Amount: {}\n\
         • Current Progress: {} ({progress:.1}%)\n\
         • Remaining: {}\n\
         • Days Left: {} days\n\
         • Target Date: {}\n\n\
         Monthly savings needed: {}\n\n\
         Stay focused and keep working towards your goal!\n\n\
         Best regards,\n\
         Your Financial Management App",
        goal.name,
        format_usd(goal.target_amount),
        format_usd(goal.current_amount),
        format_usd(goal.remaining_amount()),
        goal.days_remaining(today),
        goal.target_date,
        format_usd(goal.monthly_savings_needed(today)),
    );
    (subject, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fintrack_core::{BudgetPeriod, CategoryId, GoalType, UserId};
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(dec!(1234.56)), "$1,234.56");
        assert_eq!(format_usd(dec!(1234567.891)), "$1,234,567.89");
        assert_eq!(format_usd(dec!(0)), "$0.00");
        assert_eq!(format_usd(dec!(12.5)), "$12.50");
        assert_eq!(format_usd(dec!(999)), "$999.00");
        assert_eq!(format_usd(dec!(-1234.5)), "$-1,234.50");
    }

    fn sample_budget() -> Budget {
        Budget::new(
            UserId::new(),
            CategoryId::new(),
            dec!(500),
            BudgetPeriod::Monthly,
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
        )
    }

    #[test]
    fn test_over_budget_message_content() {
        let budget = sample_budget();
        let (subject, body) = over_budget_message("Alice", "Groceries", &budget, dec!(650.75));

        assert!(subject.contains("Groceries Over Budget"));
        assert!(body.contains("Hi Alice,"));
        assert!(body.contains("• Budget Amount: $500.00"));
        assert!(body.contains("• Amount Spent: $650.75"));
        assert!(body.contains("• Over Budget By: $150.75"));
        assert!(body.contains("2025-03-01 to 2025-03-31"));
    }

    #[test]
    fn test_near_limit_message_content() {
        let budget = sample_budget();
        let (subject, body) = near_limit_message("Bob", "Transport", &budget, dec!(425));

        assert!(subject.contains("Transport Approaching Limit"));
        assert!(body.contains("• Remaining: $75.00"));
        assert!(body.contains("85.0% of budget used"));
    }

    #[test]
    fn test_monthly_report_message_content() {
        let totals = PeriodTotals {
            income: dec!(4000),
            expenses: dec!(2750.25),
            transaction_count: 31,
        };
        let top = vec![CategorySpend {
            category_id: None,
            name: Some("Food & Dining".to_string()),
            color: None,
            icon: None,
            total: dec!(612.40),
            transaction_count: 12,
        }];

        let (subject, body) = monthly_report_message("Carol", "February 2025", &totals, &top);

        assert!(subject.contains("February 2025"));
        assert!(body.contains("• Total Income: $4,000.00"));
        assert!(body.contains("• Net Amount: $1,249.75"));
        assert!(body.contains("• Transactions: 31"));
        assert!(body.contains("• Food & Dining: $612.40"));
    }

    #[test]
    fn test_goal_deadline_message_content() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let mut goal = Goal::new(
            UserId::new(),
            "Emergency fund".to_string(),
            GoalType::EmergencyFund,
            dec!(10000),
            NaiveDate::from_ymd_opt(2025, 6, 21).unwrap(),
        );
        goal.current_amount = dec!(2500);

        let (subject, body) = goal_deadline_message("Dana", &goal, today);

        assert!(subject.contains("Emergency fund"));
        assert!(body.contains("• Target Amount: $10,000.00"));
        assert!(body.contains("(25.0%)"));
        assert!(body.contains("• Days Left: 20 days"));
        assert!(body.contains("• Target Date: 2025-06-21"));
    }
}
