// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::budget::usage_percent;
use crate::db::KvStore;
use crate::models::{BudgetPatch, NewBudget};
use crate::store::Store;
use crate::utils::{
    arg_decimal, arg_str, fmt_money, maybe_print_json_masked, parse_date, pretty_table,
    req_str, short_id,
};
use anyhow::{Context, Result, bail};
use rust_decimal::Decimal;

pub fn handle<K: KvStore>(store: &mut Store<K>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("update", sub)) => update(store, sub)?,
        Some(("spend", sub)) => spend(store, sub)?,
        Some(("rm", sub)) => remove(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("transactions", sub)) => transactions(store, sub)?,
        Some(("rollover", sub)) => rollover(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn add<K: KvStore>(store: &mut Store<K>, sub: &clap::ArgMatches) -> Result<()> {
    let input = NewBudget {
        category: req_str(sub, "category")?,
        sub_category: arg_str(sub, "sub"),
        monthly_amount: arg_decimal(sub, "amount")?.context("--amount is required")?,
        carry_over: arg_decimal(sub, "carry")?.unwrap_or(Decimal::ZERO),
        color: arg_str(sub, "color"),
        notes: arg_str(sub, "notes"),
    };
    let category = input.category.clone();
    let amount = input.monthly_amount;
    let id = store.add_budget(input)?;
    println!(
        "Budget set for {} = {} ({})",
        category,
        amount,
        short_id(&id)
    );
    Ok(())
}

fn update<K: KvStore>(store: &mut Store<K>, sub: &clap::ArgMatches) -> Result<()> {
    let id = store.resolve_budget(&req_str(sub, "id")?)?.id.clone();
    let patch = BudgetPatch {
        category: arg_str(sub, "category"),
        sub_category: arg_str(sub, "sub"),
        monthly_amount: arg_decimal(sub, "amount")?,
        spent_this_month: arg_decimal(sub, "spent")?,
        carry_over: arg_decimal(sub, "carry")?,
        color: arg_str(sub, "color"),
        notes: arg_str(sub, "notes"),
    };
    if store.update_budget(&id, patch)? {
        println!("Updated budget {}", short_id(&id));
    }
    Ok(())
}

fn spend<K: KvStore>(store: &mut Store<K>, sub: &clap::ArgMatches) -> Result<()> {
    let id = store.resolve_budget(&req_str(sub, "id")?)?.id.clone();
    let amount = arg_decimal(sub, "amount")?.context("--amount is required")?;
    let date = arg_str(sub, "date").map(|d| parse_date(&d)).transpose()?;
    let note = arg_str(sub, "note");
    let tx = store.record_spend(&id, amount, date, note)?;
    let row = store.budget(&id).context("budget vanished after spend")?;
    println!(
        "Recorded {} on {} for {} (remaining {:.2})",
        tx.amount,
        tx.date,
        row.category,
        row.remaining()?
    );
    Ok(())
}

fn remove<K: KvStore>(store: &mut Store<K>, sub: &clap::ArgMatches) -> Result<()> {
    let row = store.resolve_budget(&req_str(sub, "id")?)?;
    let (id, category) = (row.id.clone(), row.category.clone());
    store.delete_budget(&id)?;
    println!("Removed budget for '{}'", category);
    Ok(())
}

fn list<K: KvStore>(store: &Store<K>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let rows = store.visible_budgets();
    let state = store.state();
    let hide = state.display.hide_amounts;
    if maybe_print_json_masked(json_flag, jsonl_flag, &rows, hide)? {
        return Ok(());
    }
    let data = rows
        .iter()
        .map(|b| {
            Ok(vec![
                short_id(&b.id),
                b.category.clone(),
                b.sub_category.clone().unwrap_or_default(),
                fmt_money(&b.monthly_amount, hide),
                fmt_money(&b.spent_this_month, hide),
                fmt_money(&b.carry_over, hide),
                fmt_money(&b.remaining()?, hide),
                usage_percent(b)
                    .map(|p| format!("{}%", p))
                    .unwrap_or_default(),
                state
                    .category_colors
                    .resolve(b.color.as_deref(), &b.category)
                    .to_string(),
            ])
        })
        .collect::<crate::error::Result<Vec<_>>>()?;
    println!(
        "{}",
        pretty_table(
            &[
                "ID", "Category", "Sub", "Budget", "Spent", "Carryover", "Remaining", "Used",
                "Color"
            ],
            data
        )
    );
    Ok(())
}

fn transactions<K: KvStore>(store: &Store<K>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let row = store.resolve_budget(&req_str(sub, "id")?)?;
    let hide = store.state().display.hide_amounts;
    if maybe_print_json_masked(json_flag, jsonl_flag, &row.transactions, hide)? {
        return Ok(());
    }
    let data = row
        .transactions
        .iter()
        .map(|t| {
            vec![
                t.date.clone(),
                fmt_money(&t.amount, hide),
                t.note.clone().unwrap_or_default(),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Date", "Amount", "Note"], data));
    Ok(())
}

fn rollover<K: KvStore>(store: &mut Store<K>, sub: &clap::ArgMatches) -> Result<()> {
    if !sub.get_flag("yes") {
        bail!("Rollover clears this month's spend and transactions; re-run with --yes to confirm");
    }
    store.rollover()?;
    println!("Budgets rolled over; leftovers moved to carry-over");
    Ok(())
}
