// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::budget::totals;
use crate::categories::Domain;
use crate::ledger::balances;
use crate::state::AppState;
use crate::utils::{parse_history_date, pretty_table};
use anyhow::Result;
use chrono::NaiveDate;

/// Returns `(issue, detail)` pairs; empty when the state is consistent.
pub fn diagnose(state: &AppState, today: NaiveDate) -> Vec<(String, String)> {
    let mut rows = Vec::new();

    // 1) Records pointing at categories missing from their registry
    for a in &state.assets {
        if !state.has_category(Domain::Asset, &a.category) {
            rows.push(("asset_unknown_category".into(), format!("{} -> {}", a.name, a.category)));
        }
    }
    for b in state.budgets.iter().filter(|b| !b.is_total()) {
        if !state.has_category(Domain::Budget, &b.category) {
            rows.push(("budget_unknown_category".into(), format!("{} ({})", b.category, b.id)));
        }
    }

    // 2) Total row out of sync with the rows it sums
    match totals(&state.budgets) {
        Ok((monthly, spent)) => {
            for t in state.budgets.iter().filter(|b| b.is_total()) {
                if t.monthly_amount != monthly || t.spent_this_month != spent {
                    rows.push((
                        "total_drift".into(),
                        format!(
                            "Total {}/{} vs rows {}/{}",
                            t.monthly_amount, t.spent_this_month, monthly, spent
                        ),
                    ));
                }
            }
        }
        Err(err) => rows.push(("amount_overflow".into(), format!("budgets: {err}"))),
    }
    if let Err(err) = balances(&state.assets, |c| state.is_liability(c)) {
        rows.push(("amount_overflow".into(), format!("assets: {err}")));
    }

    // 3) History problems
    for a in &state.assets {
        if a.history.is_empty() {
            rows.push(("empty_history".into(), a.name.clone()));
        }
        for p in &a.history {
            if parse_history_date(&p.date, today).is_none() {
                rows.push(("bad_history_date".into(), format!("{}: '{}'", a.name, p.date)));
            }
        }
    }

    // 4) Liability flags for categories that no longer exist
    for l in &state.liability_categories {
        if !state.has_category(Domain::Asset, l) {
            rows.push(("liability_unknown_category".into(), l.clone()));
        }
    }

    rows
}

pub fn handle(state: &AppState, today: NaiveDate) -> Result<()> {
    let rows: Vec<Vec<String>> = diagnose(state, today)
        .into_iter()
        .map(|(issue, detail)| vec![issue, detail])
        .collect();
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
