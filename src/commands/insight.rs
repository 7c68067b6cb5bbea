// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::KvStore;
use crate::insight::{GeminiClient, InsightProvider, generate_insight};
use crate::ledger::summaries;
use crate::store::Store;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle<K: KvStore>(store: &Store<K>, m: &clap::ArgMatches) -> Result<()> {
    let client = GeminiClient::from_env();
    let provider = client.as_ref().map(|c| c as &dyn InsightProvider);
    let insight = generate_insight(provider, &summaries(&store.state().assets));

    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &insight)? {
        return Ok(());
    }
    let mut rows = vec![
        vec!["Summary".to_string(), insight.summary],
        vec!["Risk level".to_string(), insight.risk_level],
    ];
    for (i, s) in insight.suggestions.into_iter().enumerate() {
        rows.push(vec![format!("Suggestion {}", i + 1), s]);
    }
    println!("{}", pretty_table(&["Insight", ""], rows));
    Ok(())
}
