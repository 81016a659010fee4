// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::events::{expenses_for_month, query_expenses_on_day, record_expense};
use crate::models::{CategoryL1, CategoryL2, Expense};
use crate::utils::{
    fmt_money, get_currency_symbol, maybe_print_json, month_or_current, parse_date,
    parse_datetime, parse_decimal, pretty_table,
};
use anyhow::Result;
use chrono::NaiveDateTime;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches, now: NaiveDateTime) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub, now)?,
        Some(("list", sub)) => list(conn, sub, now)?,
        Some(("day", sub)) => day(conn, sub, now)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches, now: NaiveDateTime) -> Result<()> {
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let l1 = sub.get_one::<String>("l1").unwrap().parse::<CategoryL1>()?;
    let l2 = sub.get_one::<String>("l2").unwrap().parse::<CategoryL2>()?;
    let date = match sub.get_one::<String>("date") {
        Some(raw) => parse_datetime(raw)?,
        None => now,
    };
    let note = sub.get_one::<String>("note").map(|s| s.as_str());
    let expense = record_expense(conn, amount, date, note, l1, l2)?;
    println!(
        "Recorded expense #{} of {} on {} ({} / {})",
        expense.id,
        fmt_money(&expense.amount, &get_currency_symbol(conn)?),
        expense.date.date(),
        expense.category_l1,
        expense.category_l2
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches, now: NaiveDateTime) -> Result<()> {
    let month = month_or_current(sub, now)?;
    let data = expenses_for_month(conn, month)?;
    render(conn, sub, &data)
}

fn day(conn: &Connection, sub: &clap::ArgMatches, now: NaiveDateTime) -> Result<()> {
    let date = match sub.get_one::<String>("date") {
        Some(raw) => parse_date(raw)?,
        None => now.date(),
    };
    let data = query_expenses_on_day(conn, date)?;
    render(conn, sub, &data)
}

fn render(conn: &Connection, sub: &clap::ArgMatches, data: &[Expense]) -> Result<()> {
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let sym = get_currency_symbol(conn)?;
        println!(
            "{}",
            pretty_table(
                &["Id", "Date", "Amount", "Category", "Envelope", "Note"],
                rows(data, &sym)
            )
        );
    }
    Ok(())
}

pub fn rows(data: &[Expense], sym: &str) -> Vec<Vec<String>> {
    data.iter()
        .map(|e| {
            vec![
                e.id.to_string(),
                e.date.format("%Y-%m-%d %H:%M").to_string(),
                fmt_money(&e.amount, sym),
                e.category_l1.to_string(),
                e.category_l2.to_string(),
                e.description.clone().unwrap_or_default(),
            ]
        })
        .collect()
}
