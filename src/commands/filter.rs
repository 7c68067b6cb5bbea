// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::categories::Domain;
use crate::db::KvStore;
use crate::store::Store;
use crate::utils::{pretty_table, req_str};
use anyhow::Result;

pub fn handle<K: KvStore>(store: &mut Store<K>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let domain: Domain = req_str(sub, "domain")?.parse()?;
            let category = req_str(sub, "category")?;
            store.set_filter(domain, &category)?;
            println!("{} filter set to '{}'", domain, category);
        }
        Some(("show", _)) => {
            let state = store.state();
            let rows = vec![
                vec!["asset".to_string(), state.filter(Domain::Asset).to_string()],
                vec!["budget".to_string(), state.filter(Domain::Budget).to_string()],
            ];
            println!("{}", pretty_table(&["Domain", "Filter"], rows));
        }
        _ => {}
    }
    Ok(())
}
