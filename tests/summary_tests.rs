// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use coinpurse::budget::set_budget;
use coinpurse::db;
use coinpurse::events::{record_expense, record_income};
use coinpurse::models::{Asset, Budget, CategoryL1, CategoryL2, Expense, Liability, Period};
use coinpurse::summary::{
    balance_sheet, day_status, load_month, month_calendar, net_worth, spend_by_category,
    summarize_period, DayStatus,
};
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn dt(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn expense(id: i64, amount: &str, at: &str, l1: CategoryL1, l2: CategoryL2) -> Expense {
    Expense {
        id,
        amount: dec(amount),
        date: dt(at),
        description: None,
        category_l1: l1,
        category_l2: l2,
    }
}

fn asset(amount: &str) -> Asset {
    Asset {
        id: 1,
        name: "A".into(),
        amount: dec(amount),
        created_at: dt("2025-01-01 00:00:00"),
    }
}

fn liability(amount: &str) -> Liability {
    Liability {
        id: 1,
        name: "L".into(),
        amount: dec(amount),
        interest_rate: Decimal::ZERO,
        created_at: dt("2025-01-01 00:00:00"),
    }
}

#[test]
fn net_worth_is_additive_and_signed() {
    assert_eq!(net_worth(&[asset("100")], &[liability("40")]).unwrap(), dec("60"));
    assert_eq!(net_worth(&[], &[liability("50")]).unwrap(), dec("-50"));
    let sheet = balance_sheet(&[asset("10"), asset("5.5")], &[liability("20")]).unwrap();
    assert_eq!(sheet.total_assets, dec("15.5"));
    assert_eq!(sheet.total_liabilities, dec("20"));
    assert_eq!(sheet.net_worth, dec("-4.5"));
}

#[test]
fn day_status_only_counts_flexible_spend() {
    let limit = dec("100");
    let d = day("2025-06-10");
    let fixed = expense(9, "500", "2025-06-10 09:00:00", CategoryL1::Survival, CategoryL2::Fixed);

    assert_eq!(day_status(d, &[], limit).unwrap(), DayStatus::Neutral);
    assert_eq!(day_status(d, &[fixed.clone()], limit).unwrap(), DayStatus::Neutral);

    let small = expense(1, "80", "2025-06-10 12:00:00", CategoryL1::Social, CategoryL2::Flexible);
    assert_eq!(day_status(d, &[small.clone()], limit).unwrap(), DayStatus::OnTrack);
    assert_eq!(day_status(d, &[small, fixed.clone()], limit).unwrap(), DayStatus::OnTrack);

    let big = expense(2, "150", "2025-06-10 18:00:00", CategoryL1::Enjoyment, CategoryL2::Flexible);
    assert_eq!(day_status(d, &[big.clone()], limit).unwrap(), DayStatus::OverBudget);
    assert_eq!(day_status(d, &[big, fixed], limit).unwrap(), DayStatus::OverBudget);

    let exact = expense(3, "100", "2025-06-10 18:00:00", CategoryL1::Social, CategoryL2::Flexible);
    assert_eq!(day_status(d, &[exact], limit).unwrap(), DayStatus::OnTrack);
}

#[test]
fn day_status_ignores_other_days() {
    let e = expense(1, "999", "2025-06-11 00:00:00", CategoryL1::Social, CategoryL2::Flexible);
    assert_eq!(day_status(day("2025-06-10"), &[e], dec("1")).unwrap(), DayStatus::Neutral);
}

fn june_fixture() -> (Period, Budget, Vec<Expense>) {
    let june: Period = "2025-06".parse().unwrap();
    let budget = Budget {
        month: june,
        fixed_budget: dec("1000"),
        flexible_budget: dec("3000"),
    };
    let expenses = vec![
        expense(1, "700", "2025-06-01 08:00:00", CategoryL1::Survival, CategoryL2::Fixed),
        expense(2, "30", "2025-06-15 09:00:00", CategoryL1::Social, CategoryL2::Flexible),
        expense(3, "45", "2025-06-15 20:00:00", CategoryL1::Enjoyment, CategoryL2::Flexible),
        expense(4, "120", "2025-06-20 13:00:00", CategoryL1::Development, CategoryL2::Flexible),
    ];
    (june, budget, expenses)
}

#[test]
fn summary_partitions_spend_by_envelope() {
    let (june, budget, expenses) = june_fixture();
    let incomes = vec![coinpurse::models::Income {
        id: 1,
        amount: dec("5000"),
        date: dt("2025-06-25 09:00:00"),
        description: Some("salary".into()),
    }];
    let s = summarize_period(june, Some(&budget), &incomes, &expenses, dt("2025-06-15 21:00:00")).unwrap();
    assert_eq!(s.total_income, dec("5000"));
    assert_eq!(s.total_budget, dec("4000"));
    assert_eq!(s.fixed_spent, dec("700"));
    assert_eq!(s.flexible_spent, dec("195"));
    assert_eq!(s.total_spent, dec("895"));
    assert_eq!(s.daily_flexible_limit, dec("100"));
    // 100 allowed today, 75 spent today
    assert_eq!(s.remaining_daily_allowance, dec("25"));
    assert_eq!(s.fixed_utilization, dec("0.7"));
    assert_eq!(s.flexible_utilization, dec("0.065"));
}

#[test]
fn remaining_allowance_never_goes_negative() {
    let (june, budget, expenses) = june_fixture();
    let s = summarize_period(june, Some(&budget), &[], &expenses, dt("2025-06-20 23:00:00")).unwrap();
    assert_eq!(s.remaining_daily_allowance, Decimal::ZERO);
    let s = summarize_period(june, Some(&budget), &[], &expenses, dt("2025-06-21 08:00:00")).unwrap();
    assert_eq!(s.remaining_daily_allowance, dec("100"));
}

#[test]
fn remaining_allowance_is_zero_outside_current_month() {
    let (june, budget, expenses) = june_fixture();
    for now in ["2025-07-01 00:00:00", "2025-05-31 23:59:59", "2026-06-15 12:00:00"] {
        let s = summarize_period(june, Some(&budget), &[], &expenses, dt(now)).unwrap();
        assert_eq!(s.remaining_daily_allowance, Decimal::ZERO, "now = {now}");
        assert_eq!(s.daily_flexible_limit, dec("100"));
    }
}

#[test]
fn summary_without_budget_uses_floor_guard() {
    let (june, _, expenses) = june_fixture();
    let s = summarize_period(june, None, &[], &expenses, dt("2025-06-15 12:00:00")).unwrap();
    assert_eq!(s.total_budget, Decimal::ZERO);
    assert_eq!(s.daily_flexible_limit, Decimal::ZERO);
    assert_eq!(s.remaining_daily_allowance, Decimal::ZERO);
    assert_eq!(s.fixed_utilization, dec("700"));
}

#[test]
fn summary_skips_rows_outside_the_month() {
    let (june, budget, mut expenses) = june_fixture();
    expenses.push(expense(5, "1000", "2025-07-01 00:00:00", CategoryL1::Social, CategoryL2::Fixed));
    let s = summarize_period(june, Some(&budget), &[], &expenses, dt("2025-06-02 00:00:00")).unwrap();
    assert_eq!(s.fixed_spent, dec("700"));
}

#[test]
fn calendar_covers_every_day_with_status() {
    let (june, _, expenses) = june_fixture();
    let days = month_calendar(june, &expenses, dec("100")).unwrap();
    assert_eq!(days.len(), 30);
    assert_eq!(days[0].date, day("2025-06-01"));
    assert_eq!(days[0].status, DayStatus::Neutral);
    assert_eq!(days[0].expenses.len(), 1);
    assert_eq!(days[14].status, DayStatus::OnTrack);
    assert_eq!(days[14].flexible_spent, dec("75"));
    assert_eq!(days[19].status, DayStatus::OverBudget);
    assert_eq!(days[29].date, day("2025-06-30"));
}

#[test]
fn spend_by_category_lists_all_categories_largest_first() {
    let (_, _, expenses) = june_fixture();
    let spend = spend_by_category(&expenses).unwrap();
    assert_eq!(spend.len(), 4);
    assert_eq!(spend[0].category, CategoryL1::Survival);
    assert_eq!(spend[0].amount, dec("700"));
    assert_eq!(spend[1].category, CategoryL1::Development);
    assert_eq!(spend[3].category, CategoryL1::Social);
    assert_eq!(spend[3].amount, dec("30"));
}

#[test]
fn load_month_reads_store_and_summarizes() {
    let conn = db::open_in_memory().unwrap();
    let june: Period = "2025-06".parse().unwrap();
    set_budget(&conn, june, dec("1000"), dec("3000")).unwrap();
    record_income(&conn, dec("4200"), dt("2025-06-01 09:00:00"), Some("salary")).unwrap();
    record_income(&conn, dec("10"), dt("2025-07-01 09:00:00"), None).unwrap();
    record_expense(&conn, dec("60"), dt("2025-06-15 10:00:00"), None, CategoryL1::Social, CategoryL2::Flexible).unwrap();
    record_expense(&conn, dec("900"), dt("2025-06-15 11:00:00"), None, CategoryL1::Survival, CategoryL2::Fixed).unwrap();

    let report = load_month(&conn, june, dt("2025-06-15 12:00:00")).unwrap();
    assert_eq!(report.incomes.len(), 1);
    assert_eq!(report.expenses.len(), 2);
    assert_eq!(report.summary.total_income, dec("4200"));
    assert_eq!(report.summary.remaining_daily_allowance, dec("40"));
    assert_eq!(report.summary.fixed_spent, dec("900"));

    let past = load_month(&conn, june, dt("2025-08-01 12:00:00")).unwrap();
    assert_eq!(past.summary.remaining_daily_allowance, Decimal::ZERO);
    assert_eq!(past.summary.flexible_spent, dec("60"));
}

#[test]
fn totals_beyond_decimal_range_fail_cleanly() {
    let conn = db::open_in_memory().unwrap();
    let june: Period = "2025-06".parse().unwrap();
    let huge = dec("50000000000000000000000000000");
    record_income(&conn, huge, dt("2025-06-02 09:00:00"), None).unwrap();
    record_income(&conn, huge, dt("2025-06-03 09:00:00"), None).unwrap();
    let err = load_month(&conn, june, dt("2025-06-15 12:00:00")).unwrap_err();
    assert!(err.is_overflow(), "{err}");

    let big = [
        expense(1, "50000000000000000000000000000", "2025-06-10 09:00:00", CategoryL1::Social, CategoryL2::Flexible),
        expense(2, "50000000000000000000000000000", "2025-06-10 10:00:00", CategoryL1::Social, CategoryL2::Flexible),
    ];
    assert!(spend_by_category(&big).unwrap_err().is_overflow());
    assert!(month_calendar(june, &big, dec("100")).unwrap_err().is_overflow());
    assert!(day_status(day("2025-06-10"), &big, dec("100")).unwrap_err().is_overflow());

    let sheet = balance_sheet(&[asset("50000000000000000000000000000")], &[liability("-50000000000000000000000000000")]);
    assert!(sheet.unwrap_err().is_overflow());
}
