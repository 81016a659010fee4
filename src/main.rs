// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use coinpurse::{cli, commands, db, utils};

fn main() -> Result<()> {
    utils::init_tracing();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let mut conn = db::open_or_init()?;
    // The only clock read; everything below receives it explicitly.
    let now = chrono::Local::now().naive_local();

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("income", sub)) => commands::income::handle(&conn, sub, now)?,
        Some(("expense", sub)) => commands::expenses::handle(&conn, sub, now)?,
        Some(("budget", sub)) => commands::budgets::handle(&conn, sub, now)?,
        Some(("asset", sub)) => commands::snapshots::handle_assets(&mut conn, sub)?,
        Some(("liability", sub)) => commands::snapshots::handle_liabilities(&mut conn, sub)?,
        Some(("report", sub)) => commands::reports::handle(&conn, sub, now)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn)?,
        Some(("config", sub)) => commands::settings::handle(&conn, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
