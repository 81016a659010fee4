// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::db_path;
use crate::utils::{get_currency_symbol, pretty_table, set_currency_symbol};
use anyhow::{bail, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => {
            let rows = vec![
                vec!["database".to_string(), db_path()?.display().to_string()],
                vec!["currency_symbol".to_string(), get_currency_symbol(conn)?],
            ];
            println!("{}", pretty_table(&["Setting", "Value"], rows));
        }
        Some(("set-symbol", sub)) => {
            let symbol = sub.get_one::<String>("symbol").unwrap().trim();
            if symbol.is_empty() {
                bail!("Currency symbol must not be empty");
            }
            set_currency_symbol(conn, symbol)?;
            println!("Currency symbol set to {}", symbol);
        }
        _ => {}
    }
    Ok(())
}
