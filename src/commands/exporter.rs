// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::events::{expenses_for_month, incomes_for_month};
use crate::utils::parse_month;
use anyhow::{bail, Result};
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("events", sub)) => export_events(conn, sub),
        _ => Ok(()),
    }
}

fn export_events(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let fmt = sub.get_one::<String>("format").unwrap().trim().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap().trim();

    let incomes = incomes_for_month(conn, month)?;
    let expenses = expenses_for_month(conn, month)?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "kind",
                "id",
                "date",
                "amount",
                "category_l1",
                "category_l2",
                "description",
            ])?;
            for i in &incomes {
                wtr.write_record([
                    "income".to_string(),
                    i.id.to_string(),
                    i.date.format(crate::db::TS_FORMAT).to_string(),
                    i.amount.to_string(),
                    String::new(),
                    String::new(),
                    i.description.clone().unwrap_or_default(),
                ])?;
            }
            for e in &expenses {
                wtr.write_record([
                    "expense".to_string(),
                    e.id.to_string(),
                    e.date.format(crate::db::TS_FORMAT).to_string(),
                    e.amount.to_string(),
                    e.category_l1.to_string(),
                    e.category_l2.to_string(),
                    e.description.clone().unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let doc = json!({
                "month": month.to_string(),
                "incomes": &incomes,
                "expenses": &expenses,
            });
            std::fs::write(out, serde_json::to_string_pretty(&doc)?)?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    tracing::info!(%month, out, incomes = incomes.len(), expenses = expenses.len(), "events exported");
    println!("Exported {} events for {} to {}", incomes.len() + expenses.len(), month, out);
    Ok(())
}
