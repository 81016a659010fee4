// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Period roll-ups over events, budgets and snapshots.
//!
//! Everything here except [`load_month`] is pure: callers hand in the rows and
//! the current instant, so results never depend on the wall clock.

use crate::budget::{daily_flexible_allowance, get_budget, utilization};
use crate::error::{LedgerError, Result};
use crate::events::{expenses_for_month, incomes_for_month};
use crate::models::{
    checked_total, Asset, Budget, CategoryL1, CategoryL2, Expense, Income, Liability, Period,
};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DayStatus {
    /// No flexible spend that day.
    Neutral,
    OnTrack,
    OverBudget,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    pub month: Period,
    pub total_income: Decimal,
    pub total_budget: Decimal,
    pub fixed_spent: Decimal,
    pub flexible_spent: Decimal,
    pub total_spent: Decimal,
    pub daily_flexible_limit: Decimal,
    /// Zero unless `now` falls inside the month.
    pub remaining_daily_allowance: Decimal,
    pub fixed_utilization: Decimal,
    pub flexible_utilization: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpend {
    pub category: CategoryL1,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub flexible_spent: Decimal,
    pub status: DayStatus,
    pub expenses: Vec<Expense>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceSheet {
    pub total_assets: Decimal,
    pub total_liabilities: Decimal,
    pub net_worth: Decimal,
}

/// Everything a month view needs, read in one go.
#[derive(Debug, Clone, Serialize)]
pub struct MonthReport {
    pub summary: PeriodSummary,
    pub budget: Option<Budget>,
    pub incomes: Vec<Income>,
    pub expenses: Vec<Expense>,
}

fn spent_in(expenses: &[Expense], envelope: CategoryL2) -> Result<Decimal> {
    checked_total(
        "Envelope spend",
        expenses
            .iter()
            .filter(|e| e.category_l2 == envelope)
            .map(|e| e.amount),
    )
}

/// Flexible spend dated on `day`. Fixed expenses never count.
pub fn flexible_spent_on(day: NaiveDate, expenses: &[Expense]) -> Result<Decimal> {
    checked_total(
        "Daily flexible spend",
        expenses
            .iter()
            .filter(|e| e.date.date() == day && e.category_l2 == CategoryL2::Flexible)
            .map(|e| e.amount),
    )
}

pub fn summarize_period(
    month: Period,
    budget: Option<&Budget>,
    incomes: &[Income],
    expenses: &[Expense],
    now: NaiveDateTime,
) -> Result<PeriodSummary> {
    let in_month: Vec<Expense> = expenses
        .iter()
        .filter(|e| month.contains(e.date.date()))
        .cloned()
        .collect();
    let total_income = checked_total(
        "Total income",
        incomes
            .iter()
            .filter(|i| month.contains(i.date.date()))
            .map(|i| i.amount),
    )?;
    let fixed_spent = spent_in(&in_month, CategoryL2::Fixed)?;
    let flexible_spent = spent_in(&in_month, CategoryL2::Flexible)?;

    let (fixed_budget, flexible_budget) = budget
        .map(|b| (b.fixed_budget, b.flexible_budget))
        .unwrap_or((Decimal::ZERO, Decimal::ZERO));
    let total_budget = budget.map(Budget::total).transpose()?.unwrap_or_default();
    let daily_flexible_limit = budget
        .map(|b| daily_flexible_allowance(b, month.days()))
        .unwrap_or(Decimal::ZERO);

    let today = now.date();
    let remaining_daily_allowance = if month.contains(today) {
        // both sides are non-negative, so the difference stays in range
        (daily_flexible_limit - flexible_spent_on(today, &in_month)?).max(Decimal::ZERO)
    } else {
        Decimal::ZERO
    };

    Ok(PeriodSummary {
        month,
        total_income,
        total_budget,
        fixed_spent,
        flexible_spent,
        total_spent: checked_total("Total spend", [fixed_spent, flexible_spent])?,
        daily_flexible_limit,
        remaining_daily_allowance,
        fixed_utilization: utilization(fixed_spent, fixed_budget),
        flexible_utilization: utilization(flexible_spent, flexible_budget),
    })
}

pub fn day_status(
    day: NaiveDate,
    expenses: &[Expense],
    daily_flexible_limit: Decimal,
) -> Result<DayStatus> {
    let spent = flexible_spent_on(day, expenses)?;
    Ok(if spent.is_zero() {
        DayStatus::Neutral
    } else if spent > daily_flexible_limit {
        DayStatus::OverBudget
    } else {
        DayStatus::OnTrack
    })
}

/// One entry per day of the month with its status and the expenses booked on it.
pub fn month_calendar(
    month: Period,
    expenses: &[Expense],
    daily_flexible_limit: Decimal,
) -> Result<Vec<CalendarDay>> {
    month
        .dates()
        .map(|date| -> Result<CalendarDay> {
            Ok(CalendarDay {
                date,
                flexible_spent: flexible_spent_on(date, expenses)?,
                status: day_status(date, expenses, daily_flexible_limit)?,
                expenses: expenses
                    .iter()
                    .filter(|e| e.date.date() == date)
                    .cloned()
                    .collect(),
            })
        })
        .collect()
}

/// Spend per qualitative category, all four present, largest first.
pub fn spend_by_category(expenses: &[Expense]) -> Result<Vec<CategorySpend>> {
    let mut out = CategoryL1::ALL
        .into_iter()
        .map(|category| -> Result<CategorySpend> {
            Ok(CategorySpend {
                category,
                amount: checked_total(
                    "Category spend",
                    expenses
                        .iter()
                        .filter(|e| e.category_l1 == category)
                        .map(|e| e.amount),
                )?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    out.sort_by(|a, b| b.amount.cmp(&a.amount));
    Ok(out)
}

pub fn net_worth(assets: &[Asset], liabilities: &[Liability]) -> Result<Decimal> {
    Ok(balance_sheet(assets, liabilities)?.net_worth)
}

pub fn balance_sheet(assets: &[Asset], liabilities: &[Liability]) -> Result<BalanceSheet> {
    let total_assets = checked_total("Total assets", assets.iter().map(|a| a.amount))?;
    let total_liabilities =
        checked_total("Total liabilities", liabilities.iter().map(|l| l.amount))?;
    let net_worth = total_assets
        .checked_sub(total_liabilities)
        .ok_or(LedgerError::Overflow { what: "Net worth" })?;
    Ok(BalanceSheet {
        total_assets,
        total_liabilities,
        net_worth,
    })
}

pub fn load_month(conn: &Connection, month: Period, now: NaiveDateTime) -> Result<MonthReport> {
    let budget = get_budget(conn, month)?;
    let incomes = incomes_for_month(conn, month)?;
    let expenses = expenses_for_month(conn, month)?;
    let summary = summarize_period(month, budget.as_ref(), &incomes, &expenses, now)?;
    Ok(MonthReport {
        summary,
        budget,
        incomes,
        expenses,
    })
}
