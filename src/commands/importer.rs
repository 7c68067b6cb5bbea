// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::KvStore;
use crate::snapshot::Snapshot;
use crate::store::Store;
use crate::utils::{parse_date, parse_decimal, req_str};
use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use rust_decimal::Decimal;
use std::path::Path;

pub fn handle<K: KvStore>(store: &mut Store<K>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("snapshot", sub)) => import_snapshot(store, sub),
        Some(("transactions", sub)) => import_transactions(store, sub),
        _ => Ok(()),
    }
}

fn import_snapshot<K: KvStore>(store: &mut Store<K>, sub: &clap::ArgMatches) -> Result<()> {
    let path = req_str(sub, "path")?;
    // Parse before asking for anything, so a bad file never touches state.
    let snapshot = Snapshot::read_from(Path::new(&path))
        .with_context(|| format!("Read snapshot {}", path))?;
    if !sub.get_flag("yes") {
        bail!(
            "Importing replaces all current data with the snapshot from {}; \
             re-run with --yes to confirm",
            snapshot.exported_at
        );
    }
    store.replace_state(snapshot.state)?;
    println!("Imported snapshot from {}", path);
    Ok(())
}

struct SpendRow {
    date: NaiveDate,
    amount: Decimal,
    note: Option<String>,
}

fn import_transactions<K: KvStore>(store: &mut Store<K>, sub: &clap::ArgMatches) -> Result<()> {
    let path = req_str(sub, "path")?;
    let target = store.resolve_budget(&req_str(sub, "budget")?)?;
    if target.is_total() {
        bail!("The Total row is derived; import into a category row instead");
    }
    let id = target.id.clone();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(&path)
        .with_context(|| format!("Open CSV {}", path))?;

    let mut rows = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let rec = result?;
        let date_raw = rec.get(0).context("date missing")?.trim().to_string();
        let amount_raw = rec.get(1).context("amount missing")?.trim().to_string();
        let note = rec
            .get(2)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());
        let date = parse_date(&date_raw)
            .with_context(|| format!("Row {}: invalid date '{}'", line + 1, date_raw))?;
        let amount = parse_decimal(&amount_raw)
            .with_context(|| format!("Row {}: invalid amount '{}'", line + 1, amount_raw))?;
        if amount.is_zero() {
            return Err(anyhow!("Row {}: amount must not be zero", line + 1));
        }
        rows.push(SpendRow { date, amount, note });
    }

    let count = rows.len();
    for r in rows {
        store.record_spend(&id, r.amount, Some(r.date), r.note)?;
    }
    println!("Imported {} transaction(s) from {}", count, path);
    Ok(())
}
