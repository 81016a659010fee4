// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::snapshots::{
    asset_history, create_asset, create_liability, delete_asset, delete_liability,
    liability_history, list_assets, list_liabilities, update_asset, update_liability,
};
use crate::utils::{
    fmt_money, get_currency_symbol, maybe_print_json, parse_decimal, parse_id, pretty_table,
};
use anyhow::Result;
use rusqlite::Connection;

fn required<'a>(sub: &'a clap::ArgMatches, name: &str) -> &'a str {
    sub.get_one::<String>(name).map(|s| s.as_str()).unwrap()
}

pub fn handle_assets(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    let sym = get_currency_symbol(conn)?;
    match m.subcommand() {
        Some(("add", sub)) => {
            let amount = parse_decimal(required(sub, "amount"))?;
            let a = create_asset(conn, required(sub, "name"), amount)?;
            println!("Added asset #{} '{}' = {}", a.id, a.name, fmt_money(&a.amount, &sym));
        }
        Some(("update", sub)) => {
            let id = parse_id(required(sub, "id"))?;
            let amount = parse_decimal(required(sub, "amount"))?;
            let a = update_asset(conn, id, required(sub, "name"), amount)?;
            println!("Updated asset #{} '{}' = {}", a.id, a.name, fmt_money(&a.amount, &sym));
        }
        Some(("rm", sub)) => {
            let id = parse_id(required(sub, "id"))?;
            delete_asset(conn, id)?;
            println!("Removed asset #{}", id);
        }
        Some(("list", sub)) => {
            let data = list_assets(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|a| {
                        vec![
                            a.id.to_string(),
                            a.name.clone(),
                            fmt_money(&a.amount, &sym),
                            a.created_at.format("%Y-%m-%d %H:%M").to_string(),
                        ]
                    })
                    .collect();
                println!("{}", pretty_table(&["Id", "Name", "Value", "Created"], rows));
            }
        }
        Some(("history", sub)) => {
            let id = parse_id(required(sub, "id"))?;
            let data = asset_history(conn, id)?;
            print_history(sub, &data, &sym)?;
        }
        _ => {}
    }
    Ok(())
}

pub fn handle_liabilities(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    let sym = get_currency_symbol(conn)?;
    match m.subcommand() {
        Some(("add", sub)) => {
            let amount = parse_decimal(required(sub, "amount"))?;
            let rate = parse_decimal(required(sub, "rate"))?;
            let l = create_liability(conn, required(sub, "name"), amount, rate)?;
            println!(
                "Added liability #{} '{}' = {} at {}%",
                l.id,
                l.name,
                fmt_money(&l.amount, &sym),
                l.interest_rate
            );
        }
        Some(("update", sub)) => {
            let id = parse_id(required(sub, "id"))?;
            let amount = parse_decimal(required(sub, "amount"))?;
            let rate = parse_decimal(required(sub, "rate"))?;
            let l = update_liability(conn, id, required(sub, "name"), amount, rate)?;
            println!(
                "Updated liability #{} '{}' = {} at {}%",
                l.id,
                l.name,
                fmt_money(&l.amount, &sym),
                l.interest_rate
            );
        }
        Some(("rm", sub)) => {
            let id = parse_id(required(sub, "id"))?;
            delete_liability(conn, id)?;
            println!("Removed liability #{}", id);
        }
        Some(("list", sub)) => {
            let data = list_liabilities(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|l| {
                        vec![
                            l.id.to_string(),
                            l.name.clone(),
                            fmt_money(&l.amount, &sym),
                            format!("{}%", l.interest_rate),
                            l.created_at.format("%Y-%m-%d %H:%M").to_string(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Id", "Name", "Balance", "Rate", "Created"], rows)
                );
            }
        }
        Some(("history", sub)) => {
            let id = parse_id(required(sub, "id"))?;
            let data = liability_history(conn, id)?;
            print_history(sub, &data, &sym)?;
        }
        _ => {}
    }
    Ok(())
}

fn print_history(
    sub: &clap::ArgMatches,
    data: &[crate::models::HistoryEntry],
    sym: &str,
) -> Result<()> {
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|h| {
                vec![
                    h.recorded_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                    fmt_money(&h.amount, sym),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Recorded", "Value"], rows));
    }
    Ok(())
}
