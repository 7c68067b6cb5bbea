// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::Result;
use crate::models::{Budget, BudgetPatch, Transaction, new_id};
use crate::money;
use rust_decimal::Decimal;

/// Sums `(monthly_amount, spent_this_month)` over the non-total rows.
pub fn totals(budgets: &[Budget]) -> Result<(Decimal, Decimal)> {
    budgets
        .iter()
        .filter(|b| !b.is_total())
        .try_fold((Decimal::ZERO, Decimal::ZERO), |(m, s), b| {
            Ok((
                money::add(m, b.monthly_amount)?,
                money::add(s, b.spent_this_month)?,
            ))
        })
}

/// Rewrites the Total row from scratch. Without a Total row this does
/// nothing; one is never synthesized here. On overflow no row is touched.
pub fn recompute_total(budgets: &mut [Budget]) -> Result<()> {
    let (monthly, spent) = totals(budgets)?;
    for row in budgets.iter_mut().filter(|b| b.is_total()) {
        row.monthly_amount = monthly;
        row.spent_this_month = spent;
    }
    Ok(())
}

/// Merges a patch into a non-total row. Callers recompute the Total row.
pub fn apply_patch(row: &mut Budget, patch: BudgetPatch) {
    if let Some(c) = patch.category {
        row.category = c;
    }
    if let Some(s) = patch.sub_category {
        row.sub_category = Some(s).filter(|s| !s.trim().is_empty());
    }
    if let Some(m) = patch.monthly_amount {
        row.monthly_amount = m;
    }
    if let Some(s) = patch.spent_this_month {
        row.spent_this_month = s;
    }
    if let Some(c) = patch.carry_over {
        row.carry_over = c;
    }
    if let Some(c) = patch.color {
        row.color = Some(c);
    }
    if let Some(n) = patch.notes {
        row.notes = Some(n).filter(|n| !n.trim().is_empty());
    }
}

/// Appends a transaction and adds it to this month's spend. The row is
/// left alone when the new spend total would overflow.
pub fn record_spend(
    row: &mut Budget,
    amount: Decimal,
    date: String,
    note: Option<String>,
) -> Result<Transaction> {
    let spent = money::add(row.spent_this_month, amount)?;
    let tx = Transaction {
        id: new_id(),
        amount,
        date,
        note: note.filter(|n| !n.trim().is_empty()),
    };
    row.spent_this_month = spent;
    row.transactions.push(tx.clone());
    Ok(tx)
}

/// Closes the month: unspent (or overspent) budget moves into carry-over,
/// spend and the transaction log start over. Every carry-over is computed
/// before any row changes.
pub fn rollover(budgets: &mut [Budget]) -> Result<()> {
    let carried = budgets
        .iter()
        .map(|row| {
            if row.is_total() {
                return Ok(row.carry_over);
            }
            let unspent = money::sub(row.monthly_amount, row.spent_this_month)?;
            money::add(row.carry_over, unspent)
        })
        .collect::<Result<Vec<_>>>()?;
    for (row, carry_over) in budgets.iter_mut().zip(carried) {
        if row.is_total() {
            continue;
        }
        row.carry_over = carry_over;
        row.spent_this_month = Decimal::ZERO;
        row.transactions.clear();
    }
    recompute_total(budgets)
}

/// Share of the monthly amount already spent, as a percentage. `None` when
/// there is no monthly amount or the ratio is out of range.
pub fn usage_percent(row: &Budget) -> Option<Decimal> {
    if row.monthly_amount.is_zero() {
        return None;
    }
    let ratio = money::div(row.spent_this_month, row.monthly_amount).ok()?;
    money::mul(ratio, Decimal::ONE_HUNDRED)
        .ok()
        .map(|p| p.round_dp(1))
}
