// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::categories::Domain;
use crate::db::KvStore;
use crate::store::Store;
use crate::utils::{maybe_print_json, pretty_table, req_str};
use anyhow::{Result, bail};
use serde::Serialize;

pub fn handle<K: KvStore>(store: &mut Store<K>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let domain: Domain = req_str(sub, "domain")?.parse()?;
            let name = store.add_category(domain, &req_str(sub, "name")?)?;
            println!("Added {} category '{}'", domain, name);
        }
        Some(("rename", sub)) => {
            let domain: Domain = req_str(sub, "domain")?.parse()?;
            let from = req_str(sub, "from")?;
            let to = store.rename_category(domain, &from, &req_str(sub, "to")?)?;
            println!("Renamed {} category '{}' -> '{}'", domain, from, to);
        }
        Some(("rm", sub)) => {
            let domain: Domain = req_str(sub, "domain")?.parse()?;
            let name = req_str(sub, "name")?;
            if !sub.get_flag("yes") {
                bail!(
                    "Deleting '{}' moves its records to the fallback category; \
                     re-run with --yes to confirm",
                    name
                );
            }
            let moved = store.delete_category(domain, &name)?;
            println!(
                "Removed {} category '{}' ({} record(s) reassigned)",
                domain, name, moved
            );
        }
        Some(("move", sub)) => {
            let domain: Domain = req_str(sub, "domain")?.parse()?;
            let name = req_str(sub, "name")?;
            let to = sub.get_one::<usize>("to").copied().unwrap_or_default();
            store.reorder_category(domain, &name, to)?;
            println!("Moved '{}' to position {}", name, to);
        }
        Some(("list", sub)) => list(store, sub)?,
        Some(("color", sub)) => {
            let name = req_str(sub, "name")?;
            store.set_category_color(&name, &req_str(sub, "color")?)?;
            println!("Color set for '{}'", name);
        }
        Some(("liability", sub)) => {
            let name = req_str(sub, "name")?;
            let liability = !sub.get_flag("off");
            store.set_liability(&name, liability)?;
            if liability {
                println!("'{}' now counts as a liability", name);
            } else {
                println!("'{}' no longer counts as a liability", name);
            }
        }
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
pub struct CategoryRow {
    pub position: usize,
    pub name: String,
    pub color: String,
    pub records: usize,
    pub liability: bool,
}

pub fn category_rows<K: KvStore>(store: &Store<K>, domain: Domain) -> Vec<CategoryRow> {
    let state = store.state();
    state
        .registry(domain)
        .iter()
        .enumerate()
        .map(|(position, name)| {
            let records = match domain {
                Domain::Asset => state.assets.iter().filter(|a| &a.category == name).count(),
                Domain::Budget => state.budgets.iter().filter(|b| &b.category == name).count(),
            };
            CategoryRow {
                position,
                name: name.clone(),
                color: state.category_colors.resolve(None, name).to_string(),
                records,
                liability: domain == Domain::Asset && state.is_liability(name),
            }
        })
        .collect()
}

fn list<K: KvStore>(store: &Store<K>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let domain: Domain = req_str(sub, "domain")?.parse()?;
    let data = category_rows(store, domain);
    if maybe_print_json(json_flag, jsonl_flag, &data)? {
        return Ok(());
    }
    let rows = data
        .into_iter()
        .map(|r| {
            vec![
                r.position.to_string(),
                r.name,
                r.color,
                r.records.to_string(),
                if r.liability { "yes".into() } else { String::new() },
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["#", "Category", "Color", "Records", "Liability"], rows)
    );
    Ok(())
}
