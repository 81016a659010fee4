// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::budget::{bar_fill_percent, utilization_percent};
use crate::snapshots::{list_assets, list_liabilities};
use crate::summary::{balance_sheet, load_month, month_calendar, spend_by_category, DayStatus};
use crate::utils::{fmt_money, get_currency_symbol, maybe_print_json, month_or_current, pretty_table};
use anyhow::Result;
use chrono::NaiveDateTime;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches, now: NaiveDateTime) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, sub, now)?,
        Some(("calendar", sub)) => calendar(conn, sub, now)?,
        Some(("categories", sub)) => categories(conn, sub, now)?,
        Some(("networth", sub)) => networth(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn summary(conn: &Connection, sub: &clap::ArgMatches, now: NaiveDateTime) -> Result<()> {
    let month = month_or_current(sub, now)?;
    let report = load_month(conn, month, now)?;
    let s = &report.summary;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), s)? {
        return Ok(());
    }
    let sym = get_currency_symbol(conn)?;
    let (fixed_budget, flexible_budget) = report
        .budget
        .as_ref()
        .map(|b| (b.fixed_budget, b.flexible_budget))
        .unwrap_or_default();
    let bar = |spent, budget| -> Result<String> {
        Ok(format!(
            "{}% (bar {}%)",
            utilization_percent(spent, budget)?,
            bar_fill_percent(spent, budget)?
        ))
    };
    let rows = vec![
        vec!["Income".into(), fmt_money(&s.total_income, &sym)],
        vec!["Budget".into(), fmt_money(&s.total_budget, &sym)],
        vec!["Spent".into(), fmt_money(&s.total_spent, &sym)],
        vec![
            "Fixed".into(),
            format!(
                "{} / {} - {}",
                fmt_money(&s.fixed_spent, &sym),
                fmt_money(&fixed_budget, &sym),
                bar(s.fixed_spent, fixed_budget)?
            ),
        ],
        vec![
            "Flexible".into(),
            format!(
                "{} / {} - {}",
                fmt_money(&s.flexible_spent, &sym),
                fmt_money(&flexible_budget, &sym),
                bar(s.flexible_spent, flexible_budget)?
            ),
        ],
        vec![
            "Daily flexible limit".into(),
            fmt_money(&s.daily_flexible_limit, &sym),
        ],
        vec![
            "Left today".into(),
            fmt_money(&s.remaining_daily_allowance, &sym),
        ],
    ];
    println!("{}", month);
    println!("{}", pretty_table(&["Metric", "Value"], rows));
    Ok(())
}

fn calendar(conn: &Connection, sub: &clap::ArgMatches, now: NaiveDateTime) -> Result<()> {
    let month = month_or_current(sub, now)?;
    let report = load_month(conn, month, now)?;
    let days = month_calendar(month, &report.expenses, report.summary.daily_flexible_limit)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &days)? {
        return Ok(());
    }
    let sym = get_currency_symbol(conn)?;
    let rows = days
        .iter()
        .map(|d| {
            let status = match d.status {
                DayStatus::Neutral => "-",
                DayStatus::OnTrack => "on track",
                DayStatus::OverBudget => "OVER",
            };
            vec![
                d.date.format("%a %d").to_string(),
                fmt_money(&d.flexible_spent, &sym),
                status.to_string(),
                d.expenses.len().to_string(),
            ]
        })
        .collect();
    println!(
        "{} (daily limit {})",
        month,
        fmt_money(&report.summary.daily_flexible_limit, &sym)
    );
    println!(
        "{}",
        pretty_table(&["Day", "Flexible", "Status", "Entries"], rows)
    );
    Ok(())
}

fn categories(conn: &Connection, sub: &clap::ArgMatches, now: NaiveDateTime) -> Result<()> {
    let month = month_or_current(sub, now)?;
    let report = load_month(conn, month, now)?;
    let data = spend_by_category(&report.expenses)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let sym = get_currency_symbol(conn)?;
        let rows = data
            .iter()
            .map(|c| vec![c.category.to_string(), fmt_money(&c.amount, &sym)])
            .collect();
        println!("{}", pretty_table(&["Category", "Spent"], rows));
    }
    Ok(())
}

fn networth(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let assets = list_assets(conn)?;
    let liabilities = list_liabilities(conn)?;
    let sheet = balance_sheet(&assets, &liabilities)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &sheet)? {
        let sym = get_currency_symbol(conn)?;
        let rows = vec![
            vec!["Assets".into(), fmt_money(&sheet.total_assets, &sym)],
            vec!["Liabilities".into(), fmt_money(&sheet.total_liabilities, &sym)],
            vec!["Net worth".into(), fmt_money(&sheet.net_worth, &sym)],
        ];
        println!("{}", pretty_table(&["", "Total"], rows));
    }
    Ok(())
}
