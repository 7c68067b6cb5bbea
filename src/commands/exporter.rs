// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::KvStore;
use crate::snapshot::Snapshot;
use crate::store::Store;
use crate::utils::req_str;
use anyhow::{Context, Result, bail};
use serde::Serialize;
use std::path::Path;

pub fn handle<K: KvStore>(store: &Store<K>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("snapshot", sub)) => export_snapshot(store, sub),
        Some(("assets", sub)) => export_assets(store, sub),
        Some(("transactions", sub)) => export_transactions(store, sub),
        _ => Ok(()),
    }
}

fn export_snapshot<K: KvStore>(store: &Store<K>, sub: &clap::ArgMatches) -> Result<()> {
    let out = req_str(sub, "out")?;
    Snapshot::of(store.state())
        .write_to(Path::new(&out))
        .with_context(|| format!("Write snapshot to {}", out))?;
    println!("Exported snapshot to {}", out);
    Ok(())
}

#[derive(Serialize)]
struct AssetRow<'a> {
    id: &'a str,
    name: &'a str,
    category: &'a str,
    value: String,
    target_value: String,
    duration_months: String,
    last_updated: &'a str,
    notes: &'a str,
}

fn export_assets<K: KvStore>(store: &Store<K>, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = req_str(sub, "format")?.to_lowercase();
    let out = req_str(sub, "out")?;
    let assets = &store.state().assets;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(&out)?;
            for a in assets {
                wtr.serialize(AssetRow {
                    id: &a.id,
                    name: &a.name,
                    category: &a.category,
                    value: a.value.to_string(),
                    target_value: a.target_value.map(|t| t.to_string()).unwrap_or_default(),
                    duration_months: a.duration_months.map(|m| m.to_string()).unwrap_or_default(),
                    last_updated: &a.last_updated,
                    notes: a.notes.as_deref().unwrap_or_default(),
                })?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(&out, serde_json::to_string_pretty(assets)?)?;
        }
        _ => bail!("Unknown format: {} (use csv|json)", fmt),
    }
    println!("Exported {} asset(s) to {}", assets.len(), out);
    Ok(())
}

#[derive(Serialize)]
struct TransactionRow<'a> {
    budget_id: &'a str,
    category: &'a str,
    date: &'a str,
    amount: String,
    note: &'a str,
}

fn export_transactions<K: KvStore>(store: &Store<K>, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = req_str(sub, "format")?.to_lowercase();
    let out = req_str(sub, "out")?;
    let rows: Vec<TransactionRow<'_>> = store
        .state()
        .budgets
        .iter()
        .flat_map(|b| {
            b.transactions.iter().map(move |t| TransactionRow {
                budget_id: &b.id,
                category: &b.category,
                date: &t.date,
                amount: t.amount.to_string(),
                note: t.note.as_deref().unwrap_or_default(),
            })
        })
        .collect();

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(&out)?;
            for r in &rows {
                wtr.serialize(r)?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(&out, serde_json::to_string_pretty(&rows)?)?;
        }
        _ => bail!("Unknown format: {} (use csv|json)", fmt),
    }
    println!("Exported {} transaction(s) to {}", rows.len(), out);
    Ok(())
}
