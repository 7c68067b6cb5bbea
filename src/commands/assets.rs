// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::KvStore;
use crate::models::{ALL_FILTER, Asset, AssetPatch, NewAsset};
use crate::store::Store;
use crate::utils::{
    arg_decimal, arg_str, fmt_money, maybe_print_json_masked, pretty_table, req_str, short_id,
};
use anyhow::{Context, Result};

pub fn handle<K: KvStore>(store: &mut Store<K>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("update", sub)) => update(store, sub)?,
        Some(("rm", sub)) => remove(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("history", sub)) => history(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn add<K: KvStore>(store: &mut Store<K>, sub: &clap::ArgMatches) -> Result<()> {
    let input = NewAsset {
        name: req_str(sub, "name")?,
        category: req_str(sub, "category")?,
        value: arg_decimal(sub, "value")?.context("--value is required")?,
        target_value: arg_decimal(sub, "target")?,
        duration_months: sub.get_one::<u32>("months").copied(),
        color: arg_str(sub, "color"),
        notes: arg_str(sub, "notes"),
    };
    let name = input.name.clone();
    let id = store.add_asset(input)?;
    println!("Added asset '{}' ({})", name, short_id(&id));
    Ok(())
}

fn update<K: KvStore>(store: &mut Store<K>, sub: &clap::ArgMatches) -> Result<()> {
    let id = store.resolve_asset(&req_str(sub, "id")?)?.id.clone();
    let patch = AssetPatch {
        name: arg_str(sub, "name"),
        category: arg_str(sub, "category"),
        value: arg_decimal(sub, "value")?,
        target_value: arg_decimal(sub, "target")?,
        duration_months: sub.get_one::<u32>("months").copied(),
        color: arg_str(sub, "color"),
        notes: arg_str(sub, "notes"),
    };
    let appended = patch.value.is_some();
    if store.update_asset(&id, patch)? {
        if appended {
            println!("Updated asset {} (history snapshot added)", short_id(&id));
        } else {
            println!("Updated asset {}", short_id(&id));
        }
    }
    Ok(())
}

fn remove<K: KvStore>(store: &mut Store<K>, sub: &clap::ArgMatches) -> Result<()> {
    let asset = store.resolve_asset(&req_str(sub, "id")?)?;
    let (id, name) = (asset.id.clone(), asset.name.clone());
    store.delete_asset(&id)?;
    println!("Removed asset '{}'", name);
    Ok(())
}

/// Assets shown by `asset list`: an explicit `--category` wins over the
/// stored filter.
pub fn listed_assets<'a, K: KvStore>(
    store: &'a Store<K>,
    category: Option<&str>,
) -> Vec<&'a Asset> {
    let all = store.state().assets.iter();
    match category {
        Some(c) if c != ALL_FILTER => all.filter(|a| a.category == c).collect(),
        Some(_) => all.collect(),
        None => store.visible_assets(),
    }
}

fn list<K: KvStore>(store: &Store<K>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let category = arg_str(sub, "category");
    let assets = listed_assets(store, category.as_deref());
    let state = store.state();
    let hide = state.display.hide_amounts;
    if maybe_print_json_masked(json_flag, jsonl_flag, &assets, hide)? {
        return Ok(());
    }
    let rows = assets
        .iter()
        .map(|a| {
            let kind = if state.is_liability(&a.category) {
                "liability"
            } else {
                "asset"
            };
            vec![
                short_id(&a.id),
                a.name.clone(),
                a.category.clone(),
                kind.to_string(),
                fmt_money(&a.value, hide),
                a.target_value
                    .map(|t| fmt_money(&t, hide))
                    .unwrap_or_default(),
                state
                    .category_colors
                    .resolve(a.color.as_deref(), &a.category)
                    .to_string(),
                a.last_updated.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Name", "Category", "Kind", "Value", "Target", "Color", "Updated"],
            rows
        )
    );
    Ok(())
}

fn history<K: KvStore>(store: &Store<K>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let asset = store.resolve_asset(&req_str(sub, "id")?)?;
    let hide = store.state().display.hide_amounts;
    if maybe_print_json_masked(json_flag, jsonl_flag, &asset.history, hide)? {
        return Ok(());
    }
    let rows = asset
        .history
        .iter()
        .map(|p| vec![p.date.clone(), fmt_money(&p.value, hide)])
        .collect();
    println!("{}", asset.name);
    println!("{}", pretty_table(&["Date", "Value"], rows));
    Ok(())
}
