// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Current-value ledger for assets and liabilities.
//!
//! Each create or update writes the entity row and exactly one history row
//! inside a single transaction. History rows are never touched again, and
//! they survive deletion of their owner.

use crate::db::{decode_decimal, decode_ts, encode_ts, truncate_ms};
use crate::error::{LedgerError, Result};
use crate::models::{ensure_non_negative, Asset, HistoryEntry, Liability};
use chrono::{Local, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

/// Table layout shared by the two snapshot books.
struct Book {
    table: &'static str,
    history: &'static str,
    owner: &'static str,
}

const ASSETS: Book = Book {
    table: "assets",
    history: "asset_history",
    owner: "asset_id",
};

const LIABILITIES: Book = Book {
    table: "liabilities",
    history: "liability_history",
    owner: "liability_id",
};

fn validate_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LedgerError::validation("Name must not be empty"));
    }
    Ok(name)
}

fn now() -> NaiveDateTime {
    truncate_ms(Local::now().naive_local())
}

fn append_history(
    conn: &Connection,
    book: &Book,
    owner_id: i64,
    amount: Decimal,
    at: NaiveDateTime,
) -> Result<()> {
    conn.execute(
        &format!(
            "INSERT INTO {}({}, amount, recorded_at) VALUES (?1, ?2, ?3)",
            book.history, book.owner
        ),
        params![owner_id, amount.to_string(), encode_ts(at)],
    )?;
    Ok(())
}

fn history(conn: &Connection, book: &Book, owner_id: i64) -> Result<Vec<HistoryEntry>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT id, {owner}, amount, recorded_at FROM {history}
         WHERE {owner} = ?1 ORDER BY id",
        owner = book.owner,
        history = book.history
    ))?;
    let rows = stmt.query_map(params![owner_id], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, i64>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, owner_id, amount, recorded_at) = row?;
        out.push(HistoryEntry {
            id,
            owner_id,
            amount: decode_decimal("history.amount", amount)?,
            recorded_at: decode_ts("history.recorded_at", recorded_at)?,
        });
    }
    Ok(out)
}

fn delete(conn: &Connection, book: &Book, id: i64) -> Result<bool> {
    let n = conn.execute(
        &format!("DELETE FROM {} WHERE id = ?1", book.table),
        params![id],
    )?;
    Ok(n > 0)
}

// ---- assets ----

pub fn create_asset(conn: &mut Connection, name: &str, amount: Decimal) -> Result<Asset> {
    let name = validate_name(name)?;
    let at = now();
    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO assets(name, amount, created_at) VALUES (?1, ?2, ?3)",
        params![name, amount.to_string(), encode_ts(at)],
    )?;
    let id = tx.last_insert_rowid();
    append_history(&tx, &ASSETS, id, amount, at)?;
    tx.commit()?;
    tracing::info!(id, name, %amount, "asset created");
    Ok(Asset {
        id,
        name: name.to_string(),
        amount,
        created_at: at,
    })
}

pub fn update_asset(conn: &mut Connection, id: i64, name: &str, amount: Decimal) -> Result<Asset> {
    let name = validate_name(name)?;
    let tx = conn.transaction()?;
    let changed = tx.execute(
        "UPDATE assets SET name = ?1, amount = ?2 WHERE id = ?3",
        params![name, amount.to_string(), id],
    )?;
    if changed == 0 {
        return Err(LedgerError::asset_not_found(id));
    }
    append_history(&tx, &ASSETS, id, amount, now())?;
    let asset = get_asset(&tx, id)?.ok_or_else(|| LedgerError::asset_not_found(id))?;
    tx.commit()?;
    tracing::info!(id, name, %amount, "asset updated");
    Ok(asset)
}

pub fn delete_asset(conn: &Connection, id: i64) -> Result<()> {
    if !delete(conn, &ASSETS, id)? {
        return Err(LedgerError::asset_not_found(id));
    }
    tracing::info!(id, "asset deleted");
    Ok(())
}

pub fn get_asset(conn: &Connection, id: i64) -> Result<Option<Asset>> {
    let row = conn
        .query_row(
            "SELECT id, name, amount, created_at FROM assets WHERE id = ?1",
            params![id],
            |r| {
                Ok((
                    r.get::<_, i64>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, String>(3)?,
                ))
            },
        )
        .optional()?;
    row.map(decode_asset).transpose()
}

/// Newest first. Ids follow creation order even when the local clock steps back.
pub fn list_assets(conn: &Connection) -> Result<Vec<Asset>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, name, amount, created_at FROM assets ORDER BY id DESC",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(decode_asset(row?)?);
    }
    Ok(out)
}

/// History of an asset, oldest first. Still readable after the asset is deleted.
pub fn asset_history(conn: &Connection, id: i64) -> Result<Vec<HistoryEntry>> {
    history(conn, &ASSETS, id)
}

fn decode_asset((id, name, amount, created_at): (i64, String, String, String)) -> Result<Asset> {
    Ok(Asset {
        id,
        name,
        amount: decode_decimal("assets.amount", amount)?,
        created_at: decode_ts("assets.created_at", created_at)?,
    })
}

// ---- liabilities ----

pub fn create_liability(
    conn: &mut Connection,
    name: &str,
    amount: Decimal,
    interest_rate: Decimal,
) -> Result<Liability> {
    let name = validate_name(name)?;
    ensure_non_negative("Interest rate", interest_rate)?;
    let at = now();
    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO liabilities(name, amount, interest_rate, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![
            name,
            amount.to_string(),
            interest_rate.to_string(),
            encode_ts(at)
        ],
    )?;
    let id = tx.last_insert_rowid();
    // Only the amount is historized; the rate is current-value only.
    append_history(&tx, &LIABILITIES, id, amount, at)?;
    tx.commit()?;
    tracing::info!(id, name, %amount, %interest_rate, "liability created");
    Ok(Liability {
        id,
        name: name.to_string(),
        amount,
        interest_rate,
        created_at: at,
    })
}

pub fn update_liability(
    conn: &mut Connection,
    id: i64,
    name: &str,
    amount: Decimal,
    interest_rate: Decimal,
) -> Result<Liability> {
    let name = validate_name(name)?;
    ensure_non_negative("Interest rate", interest_rate)?;
    let tx = conn.transaction()?;
    let changed = tx.execute(
        "UPDATE liabilities SET name = ?1, amount = ?2, interest_rate = ?3 WHERE id = ?4",
        params![name, amount.to_string(), interest_rate.to_string(), id],
    )?;
    if changed == 0 {
        return Err(LedgerError::liability_not_found(id));
    }
    append_history(&tx, &LIABILITIES, id, amount, now())?;
    let liability =
        get_liability(&tx, id)?.ok_or_else(|| LedgerError::liability_not_found(id))?;
    tx.commit()?;
    tracing::info!(id, name, %amount, %interest_rate, "liability updated");
    Ok(liability)
}

pub fn delete_liability(conn: &Connection, id: i64) -> Result<()> {
    if !delete(conn, &LIABILITIES, id)? {
        return Err(LedgerError::liability_not_found(id));
    }
    tracing::info!(id, "liability deleted");
    Ok(())
}

pub fn get_liability(conn: &Connection, id: i64) -> Result<Option<Liability>> {
    let row = conn
        .query_row(
            "SELECT id, name, amount, interest_rate, created_at FROM liabilities WHERE id = ?1",
            params![id],
            |r| {
                Ok((
                    r.get::<_, i64>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, String>(3)?,
                    r.get::<_, String>(4)?,
                ))
            },
        )
        .optional()?;
    row.map(decode_liability).transpose()
}

pub fn list_liabilities(conn: &Connection) -> Result<Vec<Liability>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, name, amount, interest_rate, created_at FROM liabilities ORDER BY id DESC",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(decode_liability(row?)?);
    }
    Ok(out)
}

pub fn liability_history(conn: &Connection, id: i64) -> Result<Vec<HistoryEntry>> {
    history(conn, &LIABILITIES, id)
}

fn decode_liability(
    (id, name, amount, interest_rate, created_at): (i64, String, String, String, String),
) -> Result<Liability> {
    Ok(Liability {
        id,
        name,
        amount: decode_decimal("liabilities.amount", amount)?,
        interest_rate: decode_decimal("liabilities.interest_rate", interest_rate)?,
        created_at: decode_ts("liabilities.created_at", created_at)?,
    })
}

/// Owner ids present in a history table whose owner row no longer exists.
pub fn orphaned_history_owners(conn: &Connection) -> Result<Vec<(&'static str, i64)>> {
    let mut out = Vec::new();
    for (label, book) in [("asset", &ASSETS), ("liability", &LIABILITIES)] {
        let mut stmt = conn.prepare(&format!(
            "SELECT DISTINCT h.{owner} FROM {history} h
             LEFT JOIN {table} t ON t.id = h.{owner}
             WHERE t.id IS NULL ORDER BY h.{owner}",
            owner = book.owner,
            history = book.history,
            table = book.table
        ))?;
        let ids = stmt.query_map([], |r| r.get::<_, i64>(0))?;
        for id in ids {
            out.push((label, id?));
        }
    }
    Ok(out)
}
