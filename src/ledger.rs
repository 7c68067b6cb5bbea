// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Asset ledger: creation, value updates, and balance aggregates.

use crate::error::Result;
use crate::models::{Asset, AssetPatch, HistoryPoint, NewAsset, new_id};
use crate::money;
use crate::utils::iso;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// Builds an asset with a single history point dated `today`.
pub fn create(input: NewAsset, today: NaiveDate) -> Asset {
    let date = iso(today);
    Asset {
        id: new_id(),
        name: input.name.trim().to_string(),
        category: input.category,
        value: input.value,
        target_value: input.target_value,
        duration_months: input.duration_months,
        color: input.color,
        notes: input.notes.filter(|n| !n.trim().is_empty()),
        last_updated: date.clone(),
        history: vec![HistoryPoint {
            date,
            value: input.value,
        }],
    }
}

/// Merges `patch` into `asset`. A new value appends a snapshot dated
/// `today`; `last_updated` is refreshed whatever the patch contains.
pub fn apply_update(asset: &mut Asset, patch: AssetPatch, today: NaiveDate) {
    let date = iso(today);
    if let Some(name) = patch.name {
        asset.name = name.trim().to_string();
    }
    if let Some(category) = patch.category {
        asset.category = category;
    }
    if let Some(t) = patch.target_value {
        asset.target_value = Some(t);
    }
    if let Some(m) = patch.duration_months {
        asset.duration_months = Some(m);
    }
    if let Some(c) = patch.color {
        asset.color = Some(c);
    }
    if let Some(n) = patch.notes {
        asset.notes = Some(n).filter(|n| !n.trim().is_empty());
    }
    if let Some(value) = patch.value {
        asset.value = value;
        asset.history.push(HistoryPoint {
            date: date.clone(),
            value,
        });
    }
    asset.last_updated = date;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Balances {
    pub total_assets: Decimal,
    pub total_liabilities: Decimal,
    pub net_worth: Decimal,
}

pub fn balances<F>(assets: &[Asset], is_liability: F) -> Result<Balances>
where
    F: Fn(&str) -> bool,
{
    let mut total_assets = Decimal::ZERO;
    let mut total_liabilities = Decimal::ZERO;
    for a in assets {
        if is_liability(&a.category) {
            total_liabilities = money::add(total_liabilities, a.value)?;
        } else {
            total_assets = money::add(total_assets, a.value)?;
        }
    }
    Ok(Balances {
        total_assets,
        total_liabilities,
        net_worth: money::sub(total_assets, total_liabilities)?,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub id: String,
    pub name: String,
    pub value: Decimal,
    pub target_value: Decimal,
    /// Percent of target reached, capped at 100.
    pub percent: Decimal,
    /// Amount still to put aside each month, when a duration is set.
    pub monthly_needed: Option<Decimal>,
}

/// Progress toward `target_value`; `Ok(None)` for assets without a
/// positive target.
pub fn goal_progress(asset: &Asset) -> Result<Option<GoalProgress>> {
    let Some(target) = asset.target_value.filter(|t| *t > Decimal::ZERO) else {
        return Ok(None);
    };
    // a ratio too large to scale is past one of the caps
    let past_cap = if asset.value.is_sign_negative() {
        Decimal::ZERO
    } else {
        Decimal::ONE_HUNDRED
    };
    let percent = money::div(asset.value, target)
        .and_then(|r| money::mul(r, Decimal::ONE_HUNDRED))
        .unwrap_or(past_cap)
        .min(Decimal::ONE_HUNDRED)
        .max(Decimal::ZERO)
        .round_dp(1);
    let gap = money::sub(target, asset.value)?.max(Decimal::ZERO);
    let monthly_needed = asset
        .duration_months
        .filter(|m| *m > 0)
        .map(|m| money::div(gap, Decimal::from(m)).map(|v| v.round_dp(2)))
        .transpose()?;
    Ok(Some(GoalProgress {
        id: asset.id.clone(),
        name: asset.name.clone(),
        value: asset.value,
        target_value: target,
        percent,
        monthly_needed,
    }))
}

/// The slice of an asset the insight service gets to see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetSummary {
    pub name: String,
    pub category: String,
    pub value: Decimal,
}

pub fn summaries(assets: &[Asset]) -> Vec<AssetSummary> {
    assets
        .iter()
        .map(|a| AssetSummary {
            name: a.name.clone(),
            category: a.category.clone(),
            value: a.value,
        })
        .collect()
}
