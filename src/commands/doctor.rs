// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::HistoryEntry;
use crate::snapshots::{
    asset_history, liability_history, list_assets, list_liabilities, orphaned_history_owners,
};
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn check(kind: &str, id: i64, current: Decimal, history: &[HistoryEntry]) -> Option<Vec<String>> {
    match history.last() {
        None => Some(vec![format!("{}_without_history", kind), format!("#{}", id)]),
        Some(last) if last.amount != current => Some(vec![
            format!("{}_history_mismatch", kind),
            format!("#{} current {} vs recorded {}", id, current, last.amount),
        ]),
        Some(_) => None,
    }
}

/// Rows of (issue, detail). Orphaned history is informational: deletes keep it.
pub fn findings(conn: &Connection) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    for a in list_assets(conn)? {
        rows.extend(check("asset", a.id, a.amount, &asset_history(conn, a.id)?));
    }
    for l in list_liabilities(conn)? {
        rows.extend(check("liability", l.id, l.amount, &liability_history(conn, l.id)?));
    }
    for row in &rows {
        tracing::warn!(issue = %row[0], detail = %row[1], "snapshot inconsistency");
    }

    for (kind, id) in orphaned_history_owners(conn)? {
        rows.push(vec!["orphan_history".into(), format!("{} #{}", kind, id)]);
    }
    Ok(rows)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = findings(conn)?;
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
