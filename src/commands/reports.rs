// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::budget::totals;
use crate::db::KvStore;
use crate::ledger::Balances;
use crate::store::Store;
use crate::trend::TrendSummary;
use crate::utils::{fmt_money, maybe_print_json_masked, pretty_table};
use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle<K: KvStore>(store: &Store<K>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(store, sub)?,
        Some(("trend", sub)) => trend(store, sub)?,
        Some(("goals", sub)) => goals(store, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    #[serde(flatten)]
    pub balances: Balances,
    pub budgeted: Decimal,
    pub spent: Decimal,
    pub trend: TrendSummary,
}

pub fn build_summary<K: KvStore>(store: &Store<K>) -> crate::error::Result<Summary> {
    let (budgeted, spent) = totals(&store.state().budgets)?;
    Ok(Summary {
        balances: store.balances()?,
        budgeted,
        spent,
        trend: TrendSummary::from_points(&store.net_worth_trend()?)?,
    })
}

fn summary<K: KvStore>(store: &Store<K>, sub: &clap::ArgMatches) -> Result<()> {
    let s = build_summary(store)?;
    let hide = store.state().display.hide_amounts;
    if maybe_print_json_masked(sub.get_flag("json"), sub.get_flag("jsonl"), &s, hide)? {
        return Ok(());
    }
    let date = |d: Option<chrono::NaiveDate>| d.map(|d| d.to_string()).unwrap_or_default();
    let rows = vec![
        vec!["Total assets".into(), fmt_money(&s.balances.total_assets, hide)],
        vec!["Total liabilities".into(), fmt_money(&s.balances.total_liabilities, hide)],
        vec!["Net worth".into(), fmt_money(&s.balances.net_worth, hide)],
        vec!["Budgeted this month".into(), fmt_money(&s.budgeted, hide)],
        vec!["Spent this month".into(), fmt_money(&s.spent, hide)],
        vec!["Trend start".into(), date(s.trend.start_date)],
        vec!["Trend end".into(), date(s.trend.end_date)],
        vec!["Highest net worth".into(), fmt_money(&s.trend.highest, hide)],
        vec!["Lowest net worth".into(), fmt_money(&s.trend.lowest, hide)],
        vec!["Change over trend".into(), fmt_money(&s.trend.change, hide)],
    ];
    println!("{}", pretty_table(&["Metric", "Value"], rows));
    Ok(())
}

fn trend<K: KvStore>(store: &Store<K>, sub: &clap::ArgMatches) -> Result<()> {
    let points = store.net_worth_trend()?;
    let hide = store.state().display.hide_amounts;
    if maybe_print_json_masked(sub.get_flag("json"), sub.get_flag("jsonl"), &points, hide)? {
        return Ok(());
    }
    let rows = points
        .iter()
        .map(|p| vec![p.date.to_string(), fmt_money(&p.value, hide)])
        .collect();
    println!("{}", pretty_table(&["Date", "Net worth"], rows));
    Ok(())
}

fn goals<K: KvStore>(store: &Store<K>, sub: &clap::ArgMatches) -> Result<()> {
    let goals = store.goals()?;
    let hide = store.state().display.hide_amounts;
    if maybe_print_json_masked(sub.get_flag("json"), sub.get_flag("jsonl"), &goals, hide)? {
        return Ok(());
    }
    let rows = goals
        .iter()
        .map(|g| {
            vec![
                g.name.clone(),
                fmt_money(&g.value, hide),
                fmt_money(&g.target_value, hide),
                format!("{}%", g.percent),
                g.monthly_needed
                    .map(|m| fmt_money(&m, hide))
                    .unwrap_or_default(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Asset", "Value", "Target", "Progress", "Monthly needed"], rows)
    );
    Ok(())
}
