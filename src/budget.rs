// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Monthly Fixed/Flexible envelopes and the arithmetic derived from them.

use crate::db::decode_decimal;
use crate::error::Result;
use crate::error::LedgerError;
use crate::models::{ensure_non_negative, Budget, Period};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

/// Upsert the envelopes for a month. Earlier values are overwritten, not kept.
pub fn set_budget(
    conn: &Connection,
    month: Period,
    fixed_budget: Decimal,
    flexible_budget: Decimal,
) -> Result<Budget> {
    ensure_non_negative("Fixed budget", fixed_budget)?;
    ensure_non_negative("Flexible budget", flexible_budget)?;
    conn.execute(
        "INSERT INTO budgets(month, fixed_budget, flexible_budget) VALUES (?1, ?2, ?3)
         ON CONFLICT(month) DO UPDATE SET
            fixed_budget = excluded.fixed_budget,
            flexible_budget = excluded.flexible_budget",
        params![
            month.to_string(),
            fixed_budget.to_string(),
            flexible_budget.to_string()
        ],
    )?;
    tracing::info!(%month, %fixed_budget, %flexible_budget, "budget set");
    Ok(Budget {
        month,
        fixed_budget,
        flexible_budget,
    })
}

pub fn get_budget(conn: &Connection, month: Period) -> Result<Option<Budget>> {
    let row: Option<(String, String)> = conn
        .query_row(
            "SELECT fixed_budget, flexible_budget FROM budgets WHERE month = ?1",
            params![month.to_string()],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .optional()?;
    match row {
        Some((fixed, flexible)) => Ok(Some(Budget {
            month,
            fixed_budget: decode_decimal("budgets.fixed_budget", fixed)?,
            flexible_budget: decode_decimal("budgets.flexible_budget", flexible)?,
        })),
        None => Ok(None),
    }
}

/// Flexible envelope spread evenly over the days of the period.
pub fn daily_flexible_allowance(budget: &Budget, period_length: u32) -> Decimal {
    budget.flexible_budget / Decimal::from(period_length.max(1))
}

/// Fraction of an envelope used. The denominator never drops below 1, so an
/// unset or zero budget yields the raw spend instead of failing.
pub fn utilization(spent: Decimal, budget: Decimal) -> Decimal {
    spent / budget.max(Decimal::ONE)
}

/// Utilization as a whole percentage.
pub fn utilization_percent(spent: Decimal, budget: Decimal) -> Result<Decimal> {
    utilization(spent, budget)
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|p| p.round())
        .ok_or(LedgerError::Overflow {
            what: "Utilization percent",
        })
}

/// Progress-bar fill, 0..=100.
pub fn bar_fill_percent(spent: Decimal, budget: Decimal) -> Result<Decimal> {
    Ok(utilization_percent(spent, budget)?.min(Decimal::ONE_HUNDRED))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::FromPrimitive;

    fn d(v: i64) -> Decimal {
        Decimal::from_i64(v).unwrap()
    }

    #[test]
    fn allowance_divides_flexible_by_days() {
        let b = Budget {
            month: "2025-06".parse().unwrap(),
            fixed_budget: d(1000),
            flexible_budget: d(3000),
        };
        assert_eq!(daily_flexible_allowance(&b, 30), d(100));
    }

    #[test]
    fn utilization_floors_denominator_at_one() {
        assert_eq!(utilization(d(300), Decimal::ZERO), d(300));
        assert_eq!(utilization(d(50), d(200)), Decimal::new(25, 2));
        assert_eq!(utilization_percent(d(50), d(200)).unwrap(), d(25));
        assert_eq!(bar_fill_percent(d(500), d(200)).unwrap(), d(100));
    }

    #[test]
    fn huge_utilization_is_an_error_not_a_panic() {
        let spent = Decimal::from_i128_with_scale(10i128.pow(27), 0);
        assert!(utilization_percent(spent, Decimal::ZERO).unwrap_err().is_overflow());
        assert!(bar_fill_percent(spent, Decimal::ZERO).unwrap_err().is_overflow());
    }
}
