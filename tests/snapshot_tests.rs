// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use coinpurse::db;
use coinpurse::snapshots::{
    asset_history, create_asset, create_liability, delete_asset, delete_liability, get_asset,
    liability_history, list_assets, list_liabilities, orphaned_history_owners, update_asset,
    update_liability,
};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
        .unwrap()
}

#[test]
fn create_writes_one_history_row_with_same_amount() {
    let mut conn = db::open_in_memory().unwrap();
    let a = create_asset(&mut conn, "Savings", dec("1500.00")).unwrap();
    let h = asset_history(&conn, a.id).unwrap();
    assert_eq!(h.len(), 1);
    assert_eq!(h[0].amount, dec("1500.00"));
    assert_eq!(h[0].owner_id, a.id);
    assert_eq!(h[0].recorded_at, a.created_at);
}

#[test]
fn each_update_appends_exactly_one_row_and_keeps_prior_rows() {
    let mut conn = db::open_in_memory().unwrap();
    let a = create_asset(&mut conn, "Brokerage", dec("100")).unwrap();
    let mut before = asset_history(&conn, a.id).unwrap();
    for v in ["110", "95.5", "120"] {
        let updated = update_asset(&mut conn, a.id, "Brokerage", dec(v)).unwrap();
        assert_eq!(updated.amount, dec(v));
        assert_eq!(updated.created_at, a.created_at);
        let after = asset_history(&conn, a.id).unwrap();
        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(&after[..before.len()], &before[..]);
        assert_eq!(after.last().unwrap().amount, dec(v));
        before = after;
    }
    let current = get_asset(&conn, a.id).unwrap().unwrap();
    assert_eq!(current.amount, dec("120"));
}

#[test]
fn update_can_rename() {
    let mut conn = db::open_in_memory().unwrap();
    let a = create_asset(&mut conn, "Cash", dec("10")).unwrap();
    let renamed = update_asset(&mut conn, a.id, "  Wallet  ", dec("10")).unwrap();
    assert_eq!(renamed.name, "Wallet");
    assert_eq!(asset_history(&conn, a.id).unwrap().len(), 2);
}

#[test]
fn history_fault_rolls_back_asset_create() {
    let mut conn = db::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TRIGGER fail_history BEFORE INSERT ON asset_history
         BEGIN SELECT RAISE(ABORT, 'injected fault'); END;",
    )
    .unwrap();
    let err = create_asset(&mut conn, "Ghost", dec("999")).unwrap_err();
    assert!(err.is_store());
    assert_eq!(count(&conn, "assets"), 0);
    assert_eq!(count(&conn, "asset_history"), 0);
}

#[test]
fn history_fault_rolls_back_asset_update() {
    let mut conn = db::open_in_memory().unwrap();
    let a = create_asset(&mut conn, "House", dec("250000")).unwrap();
    conn.execute_batch(
        "CREATE TRIGGER fail_history BEFORE INSERT ON asset_history
         BEGIN SELECT RAISE(ABORT, 'injected fault'); END;",
    )
    .unwrap();
    let err = update_asset(&mut conn, a.id, "Mansion", dec("300000")).unwrap_err();
    assert!(err.is_store());

    let current = get_asset(&conn, a.id).unwrap().unwrap();
    assert_eq!(current.name, "House");
    assert_eq!(current.amount, dec("250000"));
    assert_eq!(asset_history(&conn, a.id).unwrap().len(), 1);
}

#[test]
fn history_fault_rolls_back_liability_writes() {
    let mut conn = db::open_in_memory().unwrap();
    let l = create_liability(&mut conn, "Card", dec("800"), dec("19.9")).unwrap();
    conn.execute_batch(
        "CREATE TRIGGER fail_history BEFORE INSERT ON liability_history
         BEGIN SELECT RAISE(ABORT, 'injected fault'); END;",
    )
    .unwrap();
    assert!(create_liability(&mut conn, "Loan", dec("5000"), dec("4")).unwrap_err().is_store());
    assert!(update_liability(&mut conn, l.id, "Card", dec("0"), dec("0")).unwrap_err().is_store());

    let all = list_liabilities(&conn).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].amount, dec("800"));
    assert_eq!(all[0].interest_rate, dec("19.9"));
    assert_eq!(liability_history(&conn, l.id).unwrap().len(), 1);
}

#[test]
fn every_current_value_has_a_matching_history_row() {
    let mut conn = db::open_in_memory().unwrap();
    let a = create_asset(&mut conn, "A", dec("1")).unwrap();
    let b = create_asset(&mut conn, "B", dec("2")).unwrap();
    update_asset(&mut conn, a.id, "A", dec("3")).unwrap();
    for asset in list_assets(&conn).unwrap() {
        let h = asset_history(&conn, asset.id).unwrap();
        assert_eq!(h.last().unwrap().amount, asset.amount);
    }
    assert_eq!(asset_history(&conn, b.id).unwrap().len(), 1);
}

#[test]
fn missing_ids_are_not_found() {
    let mut conn = db::open_in_memory().unwrap();
    assert!(update_asset(&mut conn, 42, "x", dec("1")).unwrap_err().is_not_found());
    assert!(delete_asset(&conn, 42).unwrap_err().is_not_found());
    assert!(update_liability(&mut conn, 7, "x", dec("1"), dec("0")).unwrap_err().is_not_found());
    assert!(delete_liability(&conn, 7).unwrap_err().is_not_found());
    assert_eq!(count(&conn, "asset_history"), 0);
    assert_eq!(count(&conn, "liability_history"), 0);
}

#[test]
fn invalid_input_is_rejected() {
    let mut conn = db::open_in_memory().unwrap();
    assert!(create_asset(&mut conn, "   ", dec("1")).unwrap_err().is_validation());
    assert!(create_liability(&mut conn, "Loan", dec("1"), dec("-0.5")).unwrap_err().is_validation());
    let a = create_asset(&mut conn, "Ok", dec("1")).unwrap();
    assert!(update_asset(&mut conn, a.id, "", dec("2")).unwrap_err().is_validation());
    assert_eq!(asset_history(&conn, a.id).unwrap().len(), 1);
}

#[test]
fn delete_keeps_history_as_audit_trail() {
    let mut conn = db::open_in_memory().unwrap();
    let a = create_asset(&mut conn, "Car", dec("12000")).unwrap();
    update_asset(&mut conn, a.id, "Car", dec("11000")).unwrap();
    delete_asset(&conn, a.id).unwrap();

    assert!(get_asset(&conn, a.id).unwrap().is_none());
    assert!(list_assets(&conn).unwrap().is_empty());
    let h = asset_history(&conn, a.id).unwrap();
    assert_eq!(h.len(), 2);
    assert_eq!(orphaned_history_owners(&conn).unwrap(), vec![("asset", a.id)]);
}

#[test]
fn lists_are_newest_first() {
    let mut conn = db::open_in_memory().unwrap();
    let first = create_asset(&mut conn, "first", dec("1")).unwrap();
    let second = create_asset(&mut conn, "second", dec("2")).unwrap();
    let ids: Vec<i64> = list_assets(&conn).unwrap().iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);

    let l1 = create_liability(&mut conn, "l1", dec("1"), dec("0")).unwrap();
    let l2 = create_liability(&mut conn, "l2", dec("1"), dec("0")).unwrap();
    let ids: Vec<i64> = list_liabilities(&conn).unwrap().iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![l2.id, l1.id]);
}

#[test]
fn list_order_survives_clock_stepping_back() {
    let mut conn = db::open_in_memory().unwrap();
    let older = create_asset(&mut conn, "older", dec("1")).unwrap();
    let newer = create_asset(&mut conn, "newer", dec("2")).unwrap();
    // e.g. a DST fall-back between the two writes
    conn.execute(
        "UPDATE assets SET created_at = '2025-10-26 01:30:00.000' WHERE id = ?1",
        [older.id],
    )
    .unwrap();
    conn.execute(
        "UPDATE assets SET created_at = '2025-10-26 01:10:00.000' WHERE id = ?1",
        [newer.id],
    )
    .unwrap();
    let ids: Vec<i64> = list_assets(&conn).unwrap().iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![newer.id, older.id]);

    let l1 = create_liability(&mut conn, "l1", dec("1"), dec("0")).unwrap();
    let l2 = create_liability(&mut conn, "l2", dec("1"), dec("0")).unwrap();
    conn.execute(
        "UPDATE liabilities SET created_at = '2000-01-01 00:00:00.000' WHERE id = ?1",
        [l2.id],
    )
    .unwrap();
    let ids: Vec<i64> = list_liabilities(&conn).unwrap().iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![l2.id, l1.id]);
}

#[test]
fn liability_rate_changes_are_not_historized() {
    let mut conn = db::open_in_memory().unwrap();
    let l = create_liability(&mut conn, "Mortgage", dec("200000"), dec("3.5")).unwrap();
    let updated = update_liability(&mut conn, l.id, "Mortgage", dec("199000"), dec("4.1")).unwrap();
    assert_eq!(updated.interest_rate, dec("4.1"));
    let h = liability_history(&conn, l.id).unwrap();
    let amounts: Vec<Decimal> = h.iter().map(|e| e.amount).collect();
    assert_eq!(amounts, vec![dec("200000"), dec("199000")]);
}
