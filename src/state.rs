// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The whole application state and its mapping onto persistence keys.

use crate::budget;
use crate::db::KvStore;
use crate::error::Result;
use crate::models::{Asset, Budget, DisplayPrefs, FALLBACK_CATEGORY};
use crate::theme::{ColorMap, DEFAULT_THEME};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const KEY_ASSETS: &str = "assets";
pub const KEY_BUDGETS: &str = "budgets";
pub const KEY_ASSET_CATEGORIES: &str = "asset_categories";
pub const KEY_BUDGET_CATEGORIES: &str = "budget_categories";
pub const KEY_LIABILITY_CATEGORIES: &str = "liability_categories";
pub const KEY_CATEGORY_COLORS: &str = "category_colors";
pub const KEY_THEME: &str = "theme_color";
pub const KEY_DISPLAY: &str = "display";

pub const LIABILITY_CATEGORY: &str = "负债";

pub fn default_asset_categories() -> Vec<String> {
    ["现金", "银行存款", "投资", "房产", LIABILITY_CATEGORY, FALLBACK_CATEGORY]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

pub fn default_budget_categories() -> Vec<String> {
    ["生活", "餐饮", "交通", "娱乐", FALLBACK_CATEGORY]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub assets: Vec<Asset>,
    pub budgets: Vec<Budget>,
    pub asset_categories: Vec<String>,
    pub budget_categories: Vec<String>,
    #[serde(default = "default_liabilities")]
    pub liability_categories: Vec<String>,
    #[serde(default)]
    pub category_colors: ColorMap,
    #[serde(default = "default_theme")]
    pub theme_color: String,
    #[serde(default)]
    pub display: DisplayPrefs,
}

fn default_liabilities() -> Vec<String> {
    vec![LIABILITY_CATEGORY.to_string()]
}

fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

impl Default for AppState {
    fn default() -> Self {
        AppState {
            assets: Vec::new(),
            budgets: vec![Budget::total_row()],
            asset_categories: default_asset_categories(),
            budget_categories: default_budget_categories(),
            liability_categories: default_liabilities(),
            category_colors: ColorMap::new(),
            theme_color: default_theme(),
            display: DisplayPrefs::default(),
        }
    }
}

impl AppState {
    pub fn is_liability(&self, category: &str) -> bool {
        self.liability_categories.iter().any(|c| c == category)
    }

    /// Loads every key, falling back to defaults for absent or undecodable
    /// values. Storage failures still propagate.
    pub fn hydrate<K: KvStore>(kv: &K) -> Result<Self> {
        let defaults = AppState::default();
        let mut state = AppState {
            assets: load_or(kv, KEY_ASSETS, defaults.assets)?,
            budgets: load_or(kv, KEY_BUDGETS, defaults.budgets)?,
            asset_categories: load_or(kv, KEY_ASSET_CATEGORIES, defaults.asset_categories)?,
            budget_categories: load_or(kv, KEY_BUDGET_CATEGORIES, defaults.budget_categories)?,
            liability_categories: load_or(
                kv,
                KEY_LIABILITY_CATEGORIES,
                defaults.liability_categories,
            )?,
            category_colors: load_or(kv, KEY_CATEGORY_COLORS, defaults.category_colors)?,
            theme_color: load_or(kv, KEY_THEME, defaults.theme_color)?,
            display: load_or(kv, KEY_DISPLAY, defaults.display)?,
        };
        if let Err(err) = budget::recompute_total(&mut state.budgets) {
            warn!(error = %err, "stored budgets do not sum; keeping the stored Total row");
        }
        Ok(state)
    }

    /// Writes every key as one batch; either all of them land or none do.
    pub fn persist<K: KvStore>(&self, kv: &K) -> Result<()> {
        let entries = [
            (KEY_ASSETS, serde_json::to_value(&self.assets)?),
            (KEY_BUDGETS, serde_json::to_value(&self.budgets)?),
            (KEY_ASSET_CATEGORIES, serde_json::to_value(&self.asset_categories)?),
            (KEY_BUDGET_CATEGORIES, serde_json::to_value(&self.budget_categories)?),
            (KEY_LIABILITY_CATEGORIES, serde_json::to_value(&self.liability_categories)?),
            (KEY_CATEGORY_COLORS, serde_json::to_value(&self.category_colors)?),
            (KEY_THEME, serde_json::to_value(&self.theme_color)?),
            (KEY_DISPLAY, serde_json::to_value(&self.display)?),
        ];
        kv.save_all(&entries)?;
        debug!(assets = self.assets.len(), budgets = self.budgets.len(), "state persisted");
        Ok(())
    }
}

fn load_or<K: KvStore, T: DeserializeOwned>(kv: &K, key: &str, default: T) -> Result<T> {
    let Some(raw) = kv.load(key)? else {
        return Ok(default);
    };
    match serde_json::from_value(raw) {
        Ok(v) => Ok(v),
        Err(err) => {
            warn!(key, %err, "stored value could not be decoded, using default");
            Ok(default)
        }
    }
}
