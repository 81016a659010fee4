// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Append-only store for income and expense events.
//!
//! Events are never updated or deleted. Range queries are inclusive on both
//! ends and return newest first.

use crate::db::{decode_decimal, decode_ts, encode_ts, truncate_ms};
use crate::error::{LedgerError, Result};
use crate::models::{day_bounds, ensure_non_negative, CategoryL1, CategoryL2, Expense, Income, Period};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;

fn clean_description(description: Option<&str>) -> Option<String> {
    description
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub fn record_income(
    conn: &Connection,
    amount: Decimal,
    date: NaiveDateTime,
    description: Option<&str>,
) -> Result<Income> {
    ensure_non_negative("Income amount", amount)?;
    let date = truncate_ms(date);
    let description = clean_description(description);
    conn.execute(
        "INSERT INTO incomes(amount, date, description) VALUES (?1, ?2, ?3)",
        params![amount.to_string(), encode_ts(date), description],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(id, %amount, %date, "income recorded");
    Ok(Income {
        id,
        amount,
        date,
        description,
    })
}

pub fn record_expense(
    conn: &Connection,
    amount: Decimal,
    date: NaiveDateTime,
    description: Option<&str>,
    category_l1: CategoryL1,
    category_l2: CategoryL2,
) -> Result<Expense> {
    ensure_non_negative("Expense amount", amount)?;
    let date = truncate_ms(date);
    let description = clean_description(description);
    conn.execute(
        "INSERT INTO expenses(amount, date, description, category_l1, category_l2)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            amount.to_string(),
            encode_ts(date),
            description,
            category_l1.as_str(),
            category_l2.as_str()
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(id, %amount, %date, l1 = %category_l1, l2 = %category_l2, "expense recorded");
    Ok(Expense {
        id,
        amount,
        date,
        description,
        category_l1,
        category_l2,
    })
}

pub fn query_incomes(
    conn: &Connection,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<Vec<Income>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, amount, date, description FROM incomes
         WHERE date >= ?1 AND date <= ?2
         ORDER BY date DESC, id DESC",
    )?;
    let rows = stmt.query_map(params![encode_ts(start), encode_ts(end)], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, Option<String>>(3)?,
        ))
    })?;

    let mut out = Vec::new();
    for row in rows {
        let (id, amount, date, description) = row?;
        out.push(Income {
            id,
            amount: decode_decimal("incomes.amount", amount)?,
            date: decode_ts("incomes.date", date)?,
            description,
        });
    }
    tracing::debug!(%start, %end, rows = out.len(), "incomes queried");
    Ok(out)
}

pub fn query_expenses(
    conn: &Connection,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<Vec<Expense>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, amount, date, description, category_l1, category_l2 FROM expenses
         WHERE date >= ?1 AND date <= ?2
         ORDER BY date DESC, id DESC",
    )?;
    let rows = stmt.query_map(params![encode_ts(start), encode_ts(end)], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, Option<String>>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, String>(5)?,
        ))
    })?;

    let mut out = Vec::new();
    for row in rows {
        let (id, amount, date, description, l1, l2) = row?;
        let category_l1 = l1.parse::<CategoryL1>().map_err(|_| LedgerError::Corrupt {
            column: "expenses.category_l1",
            value: l1.clone(),
        })?;
        let category_l2 = l2.parse::<CategoryL2>().map_err(|_| LedgerError::Corrupt {
            column: "expenses.category_l2",
            value: l2.clone(),
        })?;
        out.push(Expense {
            id,
            amount: decode_decimal("expenses.amount", amount)?,
            date: decode_ts("expenses.date", date)?,
            description,
            category_l1,
            category_l2,
        });
    }
    tracing::debug!(%start, %end, rows = out.len(), "expenses queried");
    Ok(out)
}

/// Every expense dated on the given local calendar day.
pub fn query_expenses_on_day(conn: &Connection, date: NaiveDate) -> Result<Vec<Expense>> {
    let (start, end) = day_bounds(date);
    query_expenses(conn, start, end)
}

pub fn incomes_for_month(conn: &Connection, period: Period) -> Result<Vec<Income>> {
    let (start, end) = period.bounds();
    query_incomes(conn, start, end)
}

pub fn expenses_for_month(conn: &Connection, period: Period) -> Result<Vec<Expense>> {
    let (start, end) = period.bounds();
    query_expenses(conn, start, end)
}
