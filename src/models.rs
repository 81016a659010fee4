// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{LedgerError, Result};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Qualitative expense tag. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CategoryL1 {
    Survival,
    Social,
    Enjoyment,
    Development,
}

impl CategoryL1 {
    pub const ALL: [CategoryL1; 4] = [
        CategoryL1::Survival,
        CategoryL1::Social,
        CategoryL1::Enjoyment,
        CategoryL1::Development,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryL1::Survival => "Survival",
            CategoryL1::Social => "Social",
            CategoryL1::Enjoyment => "Enjoyment",
            CategoryL1::Development => "Development",
        }
    }
}

impl fmt::Display for CategoryL1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryL1 {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        CategoryL1::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                LedgerError::validation(format!(
                    "Unknown category '{}', expected Survival|Social|Enjoyment|Development",
                    s
                ))
            })
    }
}

/// Budget envelope an expense counts against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CategoryL2 {
    Fixed,
    Flexible,
}

impl CategoryL2 {
    pub const ALL: [CategoryL2; 2] = [CategoryL2::Fixed, CategoryL2::Flexible];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryL2::Fixed => "Fixed",
            CategoryL2::Flexible => "Flexible",
        }
    }
}

impl fmt::Display for CategoryL2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryL2 {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        CategoryL2::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                LedgerError::validation(format!("Unknown envelope '{}', expected Fixed|Flexible", s))
            })
    }
}

static PERIOD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(0[1-9]|1[0-2])$").expect("static period regex"));

/// A calendar month, written `YYYY-MM`. Always holds a valid first/last day pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    first: NaiveDate,
    last: NaiveDate,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        let span = || -> Option<(NaiveDate, NaiveDate)> {
            let first = NaiveDate::from_ymd_opt(year, month, 1)?;
            let next = if month == 12 {
                NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
            } else {
                NaiveDate::from_ymd_opt(year, month + 1, 1)?
            };
            Some((first, next.pred_opt()?))
        };
        let (first, last) = span()
            .ok_or_else(|| LedgerError::validation(format!("Invalid month {}-{}", year, month)))?;
        Ok(Self { first, last })
    }

    /// The month a given day falls in.
    pub fn containing(date: NaiveDate) -> Result<Self> {
        Self::new(date.year(), date.month())
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn last_day(&self) -> NaiveDate {
        self.last
    }

    /// Number of calendar days, 28..=31.
    pub fn days(&self) -> u32 {
        (self.last - self.first).num_days() as u32 + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first <= date && date <= self.last
    }

    /// Inclusive date-time range covering the whole month.
    pub fn bounds(&self) -> (NaiveDateTime, NaiveDateTime) {
        (day_bounds(self.first).0, day_bounds(self.last).1)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        self.first.iter_days().take(self.days() as usize)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for Period {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let caps = PERIOD_RE.captures(s).ok_or_else(|| {
            LedgerError::validation(format!("Invalid month '{}', expected YYYY-MM", s))
        })?;
        let year: i32 = caps[1]
            .parse()
            .map_err(|_| LedgerError::validation(format!("Invalid year in '{}'", s)))?;
        let month: u32 = caps[2]
            .parse()
            .map_err(|_| LedgerError::validation(format!("Invalid month in '{}'", s)))?;
        Self::new(year, month)
    }
}

impl TryFrom<String> for Period {
    type Error = LedgerError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Period> for String {
    fn from(p: Period) -> String {
        p.to_string()
    }
}

pub(crate) fn ensure_non_negative(what: &str, amount: Decimal) -> Result<()> {
    if amount < Decimal::ZERO {
        return Err(LedgerError::validation(format!(
            "{} must be non-negative, got {}",
            what, amount
        )));
    }
    Ok(())
}

/// Sum of `amounts`, or [`LedgerError::Overflow`] once the total leaves the decimal range.
pub fn checked_total<I>(what: &'static str, amounts: I) -> Result<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts.into_iter().try_fold(Decimal::ZERO, |acc, a| {
        acc.checked_add(a).ok_or(LedgerError::Overflow { what })
    })
}

/// `[00:00:00.000, 23:59:59.999]` of a calendar day.
pub fn day_bounds(date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = date.and_time(NaiveTime::MIN);
    (start, start + Duration::milliseconds(86_399_999))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Income {
    pub id: i64,
    pub amount: Decimal,
    pub date: NaiveDateTime,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub amount: Decimal,
    pub date: NaiveDateTime,
    pub description: Option<String>,
    pub category_l1: CategoryL1,
    pub category_l2: CategoryL2,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub month: Period,
    pub fixed_budget: Decimal,
    pub flexible_budget: Decimal,
}

impl Budget {
    pub fn total(&self) -> Result<Decimal> {
        checked_total("Total budget", [self.fixed_budget, self.flexible_budget])
    }

    pub fn for_envelope(&self, envelope: CategoryL2) -> Decimal {
        match envelope {
            CategoryL2::Fixed => self.fixed_budget,
            CategoryL2::Flexible => self.flexible_budget,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: i64,
    pub name: String,
    pub amount: Decimal,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Liability {
    pub id: i64,
    pub name: String,
    pub amount: Decimal,
    pub interest_rate: Decimal,
    pub created_at: NaiveDateTime,
}

/// One append-only row of asset or liability history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub owner_id: i64,
    pub amount: Decimal,
    pub recorded_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_parses_and_spans_month() {
        let p: Period = "2024-02".parse().unwrap();
        assert_eq!(p.days(), 29);
        assert_eq!(p.first_day(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(p.last_day(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(p.to_string(), "2024-02");

        let dec: Period = " 2025-12 ".parse().unwrap();
        assert_eq!(dec.days(), 31);
        assert_eq!(dec.dates().count(), 31);
    }

    #[test]
    fn period_rejects_bad_input() {
        for bad in ["2025-13", "2025-00", "2025-1", "25-01", "2025/01", ""] {
            let err = bad.parse::<Period>().unwrap_err();
            assert!(err.is_validation(), "{bad} should be rejected");
        }
    }

    #[test]
    fn period_bounds_cover_last_millisecond() {
        let p: Period = "2025-04".parse().unwrap();
        let (start, end) = p.bounds();
        assert_eq!(start.to_string(), "2025-04-01 00:00:00");
        assert_eq!(
            end.format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
            "2025-04-30 23:59:59.999"
        );
    }

    #[test]
    fn categories_parse_case_insensitively() {
        assert_eq!("survival".parse::<CategoryL1>().unwrap(), CategoryL1::Survival);
        assert_eq!(" FLEXIBLE ".parse::<CategoryL2>().unwrap(), CategoryL2::Flexible);
        assert!("Luxury".parse::<CategoryL1>().unwrap_err().is_validation());
        assert!("Variable".parse::<CategoryL2>().unwrap_err().is_validation());
    }

    #[test]
    fn checked_total_reports_overflow() {
        assert_eq!(checked_total("x", [Decimal::ONE, Decimal::TWO]).unwrap(), Decimal::new(3, 0));
        assert_eq!(checked_total("x", []).unwrap(), Decimal::ZERO);
        assert!(checked_total("x", [Decimal::MAX, Decimal::ONE]).unwrap_err().is_overflow());
    }
}
