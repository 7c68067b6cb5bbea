// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The store owns the application state. Its methods are the only way to
//! mutate it; each successful mutation is snapshotted to the key-value
//! adapter before returning.

use crate::budget;
use crate::categories::Domain;
use crate::db::KvStore;
use crate::error::{NesteggError, Result};
use crate::ledger::{self, Balances, GoalProgress};
use crate::models::{
    ALL_FILTER, Asset, AssetPatch, Budget, BudgetPatch, NewAsset, NewBudget, Transaction,
};
use crate::state::AppState;
use crate::theme::validate_color;
use crate::trend::{self, TrendPoint};
use crate::utils::{iso, today};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info};

#[derive(Debug)]
pub struct Store<K: KvStore> {
    state: AppState,
    kv: K,
    clock: fn() -> NaiveDate,
}

impl<K: KvStore> Store<K> {
    pub fn open(kv: K) -> Result<Self> {
        let state = AppState::hydrate(&kv)?;
        Ok(Store {
            state,
            kv,
            clock: today,
        })
    }

    /// Replaces the date source; used to pin "today" in tests.
    pub fn with_clock(mut self, clock: fn() -> NaiveDate) -> Self {
        self.clock = clock;
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    /// Runs `f` against a copy of the state and persists the copy. The copy
    /// replaces the live state only once every key has been written, so a
    /// failed validation or write leaves memory and storage as they were.
    fn apply<T>(&mut self, f: impl FnOnce(&mut AppState) -> Result<T>) -> Result<T> {
        let mut next = self.state.clone();
        let out = f(&mut next)?;
        next.persist(&self.kv)?;
        self.state = next;
        Ok(out)
    }

    // Assets

    pub fn resolve_asset(&self, key: &str) -> Result<&Asset> {
        let id = resolve_id(self.state.assets.iter().map(|a| a.id.as_str()), key, "asset")?;
        self.asset(&id).ok_or_else(|| NesteggError::NotFound {
            kind: "asset",
            key: key.to_string(),
        })
    }

    pub fn asset(&self, id: &str) -> Option<&Asset> {
        self.state.assets.iter().find(|a| a.id == id)
    }

    /// Assets matching the active asset filter.
    pub fn visible_assets(&self) -> Vec<&Asset> {
        let filter = self.state.filter(Domain::Asset);
        self.state
            .assets
            .iter()
            .filter(|a| filter == ALL_FILTER || a.category == filter)
            .collect()
    }

    fn check_asset_fields(
        &self,
        name: Option<&str>,
        category: Option<&str>,
        color: Option<&str>,
    ) -> Result<()> {
        if let Some(n) = name
            && n.trim().is_empty()
        {
            return Err(NesteggError::EmptyName("asset name"));
        }
        if let Some(c) = category
            && !self.state.has_category(Domain::Asset, c)
        {
            return Err(NesteggError::UnknownCategory(c.to_string()));
        }
        if let Some(c) = color {
            validate_color(c)?;
        }
        Ok(())
    }

    pub fn add_asset(&mut self, mut input: NewAsset) -> Result<String> {
        self.check_asset_fields(
            Some(input.name.as_str()),
            Some(input.category.as_str()),
            input.color.as_deref(),
        )?;
        input.color = input.color.as_deref().map(validate_color).transpose()?;
        let asset = ledger::create(input, self.today());
        let id = asset.id.clone();
        self.apply(|state| {
            state.assets.push(asset);
            Ok(())
        })?;
        info!(id = %id, "asset added");
        Ok(id)
    }

    /// Returns `false` without touching anything when `id` is unknown.
    pub fn update_asset(&mut self, id: &str, mut patch: AssetPatch) -> Result<bool> {
        let today = self.today();
        let Some(idx) = self.state.assets.iter().position(|a| a.id == id) else {
            debug!(id, "update for unknown asset ignored");
            return Ok(false);
        };
        self.check_asset_fields(
            patch.name.as_deref(),
            patch.category.as_deref(),
            patch.color.as_deref(),
        )?;
        patch.color = patch.color.as_deref().map(validate_color).transpose()?;
        self.apply(|state| {
            ledger::apply_update(&mut state.assets[idx], patch, today);
            Ok(())
        })?;
        info!(id, "asset updated");
        Ok(true)
    }

    pub fn delete_asset(&mut self, id: &str) -> Result<bool> {
        let Some(idx) = self.state.assets.iter().position(|a| a.id == id) else {
            return Ok(false);
        };
        self.apply(|state| {
            state.assets.remove(idx);
            Ok(())
        })?;
        info!(id, "asset deleted");
        Ok(true)
    }

    pub fn balances(&self) -> Result<Balances> {
        ledger::balances(&self.state.assets, |c| self.state.is_liability(c))
    }

    pub fn net_worth_trend(&self) -> Result<Vec<TrendPoint>> {
        trend::net_worth_trend(
            &self.state.assets,
            |c| self.state.is_liability(c),
            self.today(),
        )
    }

    pub fn goals(&self) -> Result<Vec<GoalProgress>> {
        let mut goals = Vec::new();
        for asset in &self.state.assets {
            if let Some(g) = ledger::goal_progress(asset)? {
                goals.push(g);
            }
        }
        Ok(goals)
    }

    // Budgets

    pub fn resolve_budget(&self, key: &str) -> Result<&Budget> {
        let id = resolve_id(self.state.budgets.iter().map(|b| b.id.as_str()), key, "budget")?;
        self.budget(&id).ok_or_else(|| NesteggError::NotFound {
            kind: "budget",
            key: key.to_string(),
        })
    }

    pub fn budget(&self, id: &str) -> Option<&Budget> {
        self.state.budgets.iter().find(|b| b.id == id)
    }

    /// Budget rows matching the active budget filter. The Total row is
    /// always included.
    pub fn visible_budgets(&self) -> Vec<&Budget> {
        let filter = self.state.filter(Domain::Budget);
        self.state
            .budgets
            .iter()
            .filter(|b| b.is_total() || filter == ALL_FILTER || b.category == filter)
            .collect()
    }

    fn check_budget_category(&self, category: &str) -> Result<()> {
        if !self.state.has_category(Domain::Budget, category) {
            return Err(NesteggError::UnknownCategory(category.to_string()));
        }
        Ok(())
    }

    pub fn add_budget(&mut self, mut input: NewBudget) -> Result<String> {
        self.check_budget_category(&input.category)?;
        check_non_negative(input.monthly_amount, "monthly amount")?;
        input.color = input.color.as_deref().map(validate_color).transpose()?;
        let row = Budget {
            id: crate::models::new_id(),
            category: input.category,
            sub_category: input.sub_category.filter(|s| !s.trim().is_empty()),
            monthly_amount: input.monthly_amount,
            spent_this_month: Decimal::ZERO,
            carry_over: input.carry_over,
            color: input.color,
            notes: input.notes.filter(|n| !n.trim().is_empty()),
            transactions: Vec::new(),
        };
        let id = row.id.clone();
        let category = row.category.clone();
        self.apply(|state| {
            state.budgets.push(row);
            budget::recompute_total(&mut state.budgets)
        })?;
        info!(id = %id, category = %category, "budget added");
        Ok(id)
    }

    /// Returns `false` when `id` is unknown. The Total row only accepts
    /// notes and color.
    pub fn update_budget(&mut self, id: &str, mut patch: BudgetPatch) -> Result<bool> {
        let Some(idx) = self.state.budgets.iter().position(|b| b.id == id) else {
            return Ok(false);
        };
        if self.state.budgets[idx].is_total() && patch.touches_amounts() {
            return Err(NesteggError::DerivedRow);
        }
        if let Some(c) = patch.category.as_deref() {
            self.check_budget_category(c)?;
        }
        if let Some(m) = patch.monthly_amount {
            check_non_negative(m, "monthly amount")?;
        }
        patch.color = patch.color.as_deref().map(validate_color).transpose()?;
        self.apply(|state| {
            budget::apply_patch(&mut state.budgets[idx], patch);
            budget::recompute_total(&mut state.budgets)
        })?;
        info!(id, "budget updated");
        Ok(true)
    }

    pub fn record_spend(
        &mut self,
        id: &str,
        amount: Decimal,
        date: Option<NaiveDate>,
        note: Option<String>,
    ) -> Result<Transaction> {
        if amount.is_zero() {
            return Err(NesteggError::InvalidAmount("spend amount must not be zero".into()));
        }
        let date = iso(date.unwrap_or_else(|| self.today()));
        let idx = self
            .state
            .budgets
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| NesteggError::NotFound {
                kind: "budget",
                key: id.to_string(),
            })?;
        if self.state.budgets[idx].is_total() {
            return Err(NesteggError::DerivedRow);
        }
        let tx = self.apply(|state| {
            let tx = budget::record_spend(&mut state.budgets[idx], amount, date, note)?;
            budget::recompute_total(&mut state.budgets)?;
            Ok(tx)
        })?;
        info!(id, amount = %amount, "spend recorded");
        Ok(tx)
    }

    pub fn delete_budget(&mut self, id: &str) -> Result<bool> {
        let Some(idx) = self.state.budgets.iter().position(|b| b.id == id) else {
            return Ok(false);
        };
        if self.state.budgets[idx].is_total() {
            return Err(NesteggError::DerivedRow);
        }
        self.apply(|state| {
            state.budgets.remove(idx);
            budget::recompute_total(&mut state.budgets)
        })?;
        info!(id, "budget deleted");
        Ok(true)
    }

    pub fn rollover(&mut self) -> Result<()> {
        self.apply(|state| budget::rollover(&mut state.budgets))?;
        info!("budgets rolled over to a new month");
        Ok(())
    }

    // Categories

    pub fn add_category(&mut self, domain: Domain, name: &str) -> Result<String> {
        self.apply(|state| state.add_category(domain, name))
    }

    pub fn rename_category(&mut self, domain: Domain, old: &str, new: &str) -> Result<String> {
        self.apply(|state| state.rename_category(domain, old, new))
    }

    pub fn delete_category(&mut self, domain: Domain, name: &str) -> Result<usize> {
        self.apply(|state| state.delete_category(domain, name))
    }

    pub fn reorder_category(&mut self, domain: Domain, name: &str, index: usize) -> Result<()> {
        self.apply(|state| state.reorder_category(domain, name, index))
    }

    pub fn set_filter(&mut self, domain: Domain, value: &str) -> Result<()> {
        self.apply(|state| state.set_filter(domain, value))
    }

    pub fn set_liability(&mut self, name: &str, liability: bool) -> Result<()> {
        self.apply(|state| state.set_liability(name, liability))
    }

    pub fn set_category_color(&mut self, name: &str, color: &str) -> Result<()> {
        if !self.state.has_category(Domain::Asset, name)
            && !self.state.has_category(Domain::Budget, name)
        {
            return Err(NesteggError::UnknownCategory(name.to_string()));
        }
        self.apply(|state| state.category_colors.set(name, color))
    }

    // Settings

    pub fn set_theme(&mut self, color: &str) -> Result<()> {
        let color = validate_color(color)?;
        self.apply(|state| {
            state.theme_color = color;
            Ok(())
        })
    }

    pub fn set_display(
        &mut self,
        hide_amounts: Option<bool>,
        dark_mode: Option<bool>,
    ) -> Result<()> {
        self.apply(|state| {
            if let Some(h) = hide_amounts {
                state.display.hide_amounts = h;
            }
            if let Some(d) = dark_mode {
                state.display.dark_mode = d;
            }
            Ok(())
        })
    }

    /// Wholesale replacement, as done by snapshot import.
    pub fn replace_state(&mut self, mut state: AppState) -> Result<()> {
        budget::recompute_total(&mut state.budgets)?;
        state.persist(&self.kv)?;
        self.state = state;
        info!(
            assets = self.state.assets.len(),
            budgets = self.state.budgets.len(),
            "state replaced"
        );
        Ok(())
    }
}

fn check_non_negative(v: Decimal, what: &str) -> Result<()> {
    if v < Decimal::ZERO {
        return Err(NesteggError::InvalidAmount(format!("{what} must not be negative")));
    }
    Ok(())
}

/// Exact id match first, then a unique prefix.
fn resolve_id<'a, I>(ids: I, key: &str, kind: &'static str) -> Result<String>
where
    I: Iterator<Item = &'a str> + Clone,
{
    let key = key.trim();
    if key.is_empty() {
        return Err(NesteggError::EmptyName("id"));
    }
    if let Some(id) = ids.clone().find(|id| *id == key) {
        return Ok(id.to_string());
    }
    let mut matches = ids.filter(|id| id.starts_with(key));
    match (matches.next(), matches.next()) {
        (Some(id), None) => Ok(id.to_string()),
        (None, _) => Err(NesteggError::NotFound {
            kind,
            key: key.to_string(),
        }),
        (Some(_), Some(_)) => Err(NesteggError::Ambiguous {
            kind,
            key: key.to_string(),
        }),
    }
}
