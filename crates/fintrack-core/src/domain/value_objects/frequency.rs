//! Recurrence frequency value object.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How often a recurring transaction fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Every day.
    Daily,
    /// Every 7 days.
    Weekly,
    /// Every 14 days.
    Biweekly,
    /// Every calendar month, day-of-month clamped to the month's length.
    #[default]
    Monthly,
    /// Every 3 calendar months, day-of-month clamped.
    Quarterly,
    /// Every year; Feb 29 falls back to Feb 28 outside leap years.
    Yearly,
}

impl Frequency {
    /// Returns the canonical string form used in storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }

    /// Parses a frequency from a string.
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "biweekly" => Some(Self::Biweekly),
            "monthly" => Some(Self::Monthly),
            "quarterly" => Some(Self::Quarterly),
            "yearly" => Some(Self::Yearly),
            _ => None,
        }
    }

    /// Computes the occurrence that follows `date`.
    ///
    /// Month-based frequencies keep the day-of-month where possible and
    /// clamp to the last day of shorter months, so a schedule anchored
    /// on Jan 31 fires on Feb 28 (or 29), then Mar 31.
    #[must_use]
    pub fn next_date(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Daily => add_days(date, 1),
            Self::Weekly => add_days(date, 7),
            Self::Biweekly => add_days(date, 14),
            Self::Monthly => add_months_clamped(date, 1),
            Self::Quarterly => add_months_clamped(date, 3),
            Self::Yearly => add_months_clamped(date, 12),
        }
    }

    /// All frequencies.
    #[must_use]
    pub const fn all() -> [Self; 6] {
        [
            Self::Daily,
            Self::Weekly,
            Self::Biweekly,
            Self::Monthly,
            Self::Quarterly,
            Self::Yearly,
        ]
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(date)
}

fn add_months_clamped(date: NaiveDate, months: u32) -> NaiveDate {
    let month0 = date.month0() + months;
    let year = date.year() + i32::try_from(month0 / 12).unwrap_or(0);
    let month = month0 % 12 + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(date)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map_or(28, |last| last.day())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_based_frequencies() {
        assert_eq!(
            Frequency::Daily.next_date(date(2025, 3, 14)),
            date(2025, 3, 15)
        );
        assert_eq!(
            Frequency::Weekly.next_date(date(2025, 12, 29)),
            date(2026, 1, 5)
        );
        assert_eq!(
            Frequency::Biweekly.next_date(date(2025, 6, 20)),
            date(2025, 7, 4)
        );
    }

    #[test]
    fn test_monthly_clamps_to_shorter_months() {
        assert_eq!(
            Frequency::Monthly.next_date(date(2025, 1, 31)),
            date(2025, 2, 28)
        );
        assert_eq!(
            Frequency::Monthly.next_date(date(2024, 1, 31)),
            date(2024, 2, 29)
        );
        assert_eq!(
            Frequency::Monthly.next_date(date(2025, 3, 31)),
            date(2025, 4, 30)
        );
    }

    #[test]
    fn test_monthly_december_wraps() {
        assert_eq!(
            Frequency::Monthly.next_date(date(2025, 12, 15)),
            date(2026, 1, 15)
        );
    }

    #[test]
    fn test_quarterly_year_wrap() {
        assert_eq!(
            Frequency::Quarterly.next_date(date(2025, 11, 30)),
            date(2026, 2, 28)
        );
        assert_eq!(
            Frequency::Quarterly.next_date(date(2025, 1, 31)),
            date(2025, 4, 30)
        );
    }

    #[test]
    fn test_yearly_leap_day_fallback() {
        assert_eq!(
            Frequency::Yearly.next_date(date(2024, 2, 29)),
            date(2025, 2, 28)
        );
        assert_eq!(
            Frequency::Yearly.next_date(date(2025, 7, 4)),
            date(2026, 7, 4)
        );
    }
}
