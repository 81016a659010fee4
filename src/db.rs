// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{LedgerError, Result as LedgerResult};
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Coinpurse", "coinpurse"));

/// Overrides the platform data dir when set.
pub const DB_ENV: &str = "COINPURSE_DB";

/// Text layout for every stored date-time; sorts chronologically.
pub const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

pub fn db_path() -> Result<PathBuf> {
    if let Some(p) = std::env::var_os(DB_ENV).filter(|p| !p.is_empty()) {
        let path = PathBuf::from(p);
        if let Some(parent) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        return Ok(path);
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("coinpurse.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let mut conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    tracing::debug!(path = %path.display(), "database opened");
    Ok(conn)
}

pub fn open_in_memory() -> LedgerResult<Connection> {
    let mut conn = Connection::open_in_memory()?;
    init_schema(&mut conn)?;
    Ok(conn)
}

// History tables carry no foreign key: rows outlive a deleted owner.
pub fn init_schema(conn: &mut Connection) -> LedgerResult<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS incomes(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        amount TEXT NOT NULL,
        date TEXT NOT NULL,
        description TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_incomes_date ON incomes(date);

    CREATE TABLE IF NOT EXISTS expenses(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        amount TEXT NOT NULL,
        date TEXT NOT NULL,
        description TEXT,
        category_l1 TEXT NOT NULL
            CHECK(category_l1 IN ('Survival','Social','Enjoyment','Development')),
        category_l2 TEXT NOT NULL CHECK(category_l2 IN ('Fixed','Flexible'))
    );
    CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date);

    CREATE TABLE IF NOT EXISTS budgets(
        month TEXT PRIMARY KEY, -- YYYY-MM
        fixed_budget TEXT NOT NULL,
        flexible_budget TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS assets(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        amount TEXT NOT NULL,
        created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS asset_history(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        asset_id INTEGER NOT NULL,
        amount TEXT NOT NULL,
        recorded_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_asset_history_owner ON asset_history(asset_id);

    CREATE TABLE IF NOT EXISTS liabilities(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        amount TEXT NOT NULL,
        interest_rate TEXT NOT NULL DEFAULT '0',
        created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS liability_history(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        liability_id INTEGER NOT NULL,
        amount TEXT NOT NULL,
        recorded_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_liability_history_owner ON liability_history(liability_id);
    "#,
    )?;
    Ok(())
}

pub(crate) fn encode_ts(ts: NaiveDateTime) -> String {
    ts.format(TS_FORMAT).to_string()
}

pub(crate) fn decode_ts(column: &'static str, raw: String) -> LedgerResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(&raw, TS_FORMAT)
        .map_err(|_| LedgerError::Corrupt { column, value: raw })
}

pub(crate) fn decode_decimal(column: &'static str, raw: String) -> LedgerResult<Decimal> {
    raw.parse::<Decimal>()
        .map_err(|_| LedgerError::Corrupt { column, value: raw })
}

/// Millisecond precision, matching what the store keeps.
pub(crate) fn truncate_ms(ts: NaiveDateTime) -> NaiveDateTime {
    use chrono::Timelike;
    let nanos = ts.nanosecond() % 1_000_000_000;
    ts.with_nanosecond(nanos - nanos % 1_000_000).unwrap_or(ts)
}
