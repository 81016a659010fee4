// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::events::{incomes_for_month, record_income};
use crate::models::Income;
use crate::utils::{
    fmt_money, get_currency_symbol, maybe_print_json, month_or_current, parse_datetime,
    parse_decimal, pretty_table,
};
use anyhow::Result;
use chrono::NaiveDateTime;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches, now: NaiveDateTime) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub, now)?,
        Some(("list", sub)) => list(conn, sub, now)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches, now: NaiveDateTime) -> Result<()> {
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let date = match sub.get_one::<String>("date") {
        Some(raw) => parse_datetime(raw)?,
        None => now,
    };
    let note = sub.get_one::<String>("note").map(|s| s.as_str());
    let income = record_income(conn, amount, date, note)?;
    println!(
        "Recorded income #{} of {} on {}",
        income.id,
        fmt_money(&income.amount, &get_currency_symbol(conn)?),
        income.date.date()
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches, now: NaiveDateTime) -> Result<()> {
    let month = month_or_current(sub, now)?;
    let data = incomes_for_month(conn, month)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let sym = get_currency_symbol(conn)?;
        println!("{}", pretty_table(&["Id", "Date", "Amount", "Note"], rows(&data, &sym)));
    }
    Ok(())
}

pub fn rows(data: &[Income], sym: &str) -> Vec<Vec<String>> {
    data.iter()
        .map(|i| {
            vec![
                i.id.to_string(),
                i.date.format("%Y-%m-%d %H:%M").to_string(),
                fmt_money(&i.amount, sym),
                i.description.clone().unwrap_or_default(),
            ]
        })
        .collect()
}
