// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::budget::{get_budget, set_budget, utilization_percent};
use crate::events::expenses_for_month;
use crate::models::{checked_total, CategoryL2, Period};
use crate::utils::{
    fmt_money, get_currency_symbol, maybe_print_json, month_or_current, parse_decimal,
    parse_month, pretty_table,
};
use anyhow::Result;
use chrono::NaiveDateTime;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches, now: NaiveDateTime) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, sub)?,
        Some(("show", sub)) => show(conn, sub, now)?,
        _ => {}
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let fixed = parse_decimal(sub.get_one::<String>("fixed").unwrap())?;
    let flexible = parse_decimal(sub.get_one::<String>("flexible").unwrap())?;
    let budget = set_budget(conn, month, fixed, flexible)?;
    let sym = get_currency_symbol(conn)?;
    println!(
        "Budget set for {}: fixed {} / flexible {}",
        budget.month,
        fmt_money(&budget.fixed_budget, &sym),
        fmt_money(&budget.flexible_budget, &sym)
    );
    Ok(())
}

#[derive(Serialize)]
pub struct EnvelopeRow {
    pub envelope: CategoryL2,
    pub budget: Decimal,
    pub spent: Decimal,
    pub percent: Decimal,
}

pub fn envelope_rows(conn: &Connection, month: Period) -> Result<Vec<EnvelopeRow>> {
    let budget = get_budget(conn, month)?;
    let expenses = expenses_for_month(conn, month)?;
    CategoryL2::ALL
        .into_iter()
        .map(|envelope| -> Result<EnvelopeRow> {
            let allotted = budget
                .as_ref()
                .map(|b| b.for_envelope(envelope))
                .unwrap_or(Decimal::ZERO);
            let spent = checked_total(
                "Envelope spend",
                expenses
                    .iter()
                    .filter(|e| e.category_l2 == envelope)
                    .map(|e| e.amount),
            )?;
            Ok(EnvelopeRow {
                envelope,
                budget: allotted,
                spent,
                percent: utilization_percent(spent, allotted)?,
            })
        })
        .collect()
}

fn show(conn: &Connection, sub: &clap::ArgMatches, now: NaiveDateTime) -> Result<()> {
    let month = month_or_current(sub, now)?;
    let data = envelope_rows(conn, month)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let sym = get_currency_symbol(conn)?;
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.envelope.to_string(),
                    fmt_money(&r.budget, &sym),
                    fmt_money(&r.spent, &sym),
                    format!("{}%", r.percent),
                ]
            })
            .collect();
        println!("{}", month);
        println!(
            "{}",
            pretty_table(&["Envelope", "Budget", "Spent", "Used"], rows)
        );
    }
    Ok(())
}
