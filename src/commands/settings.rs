// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::KvStore;
use crate::store::Store;
use crate::utils::{maybe_print_json, pretty_table, req_str};
use anyhow::Result;
use serde_json::json;

pub fn handle<K: KvStore>(store: &mut Store<K>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => {
            let state = store.state();
            let view = json!({
                "themeColor": state.theme_color,
                "display": state.display,
                "categoryColors": state.category_colors,
            });
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &view)? {
                let mut rows = vec![
                    vec!["theme color".to_string(), state.theme_color.clone()],
                    vec![
                        "hide amounts".to_string(),
                        state.display.hide_amounts.to_string(),
                    ],
                    vec!["dark mode".to_string(), state.display.dark_mode.to_string()],
                ];
                for (name, color) in state.category_colors.iter() {
                    rows.push(vec![format!("color: {}", name), color.to_string()]);
                }
                println!("{}", pretty_table(&["Setting", "Value"], rows));
            }
        }
        Some(("theme", sub)) => {
            store.set_theme(&req_str(sub, "color")?)?;
            println!("Theme color set to {}", store.state().theme_color);
        }
        Some(("display", sub)) => {
            let hide = sub.get_one::<bool>("hide-amounts").copied();
            let dark = sub.get_one::<bool>("dark").copied();
            store.set_display(hide, dark)?;
            println!(
                "Display: hide amounts = {}, dark mode = {}",
                store.state().display.hide_amounts,
                store.state().display.dark_mode
            );
        }
        _ => {}
    }
    Ok(())
}
