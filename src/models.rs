// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::Result;
use crate::money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Category of the synthetic budget row that sums every other row.
pub const TOTAL_CATEGORY: &str = "Total";
/// Records of a deleted category are reassigned here.
pub const FALLBACK_CATEGORY: &str = "其他";
/// Filter value that matches every category.
pub const ALL_FILTER: &str = "全部";

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryPoint {
    /// `YYYY-MM-DD`, or legacy `MM/DD` in older data.
    pub date: String,
    pub value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub name: String,
    pub category: String,
    pub value: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_value: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_months: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub last_updated: String,
    #[serde(default)]
    pub history: Vec<HistoryPoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub amount: Decimal,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    // Older exports carry no id; one is minted on load.
    #[serde(default = "new_id")]
    pub id: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,
    pub monthly_amount: Decimal,
    #[serde(default)]
    pub spent_this_month: Decimal,
    #[serde(default)]
    pub carry_over: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Budget {
    pub fn is_total(&self) -> bool {
        self.category == TOTAL_CATEGORY
    }

    /// What is left of this month's envelope, including carry-over.
    pub fn remaining(&self) -> Result<Decimal> {
        let available = money::add(self.monthly_amount, self.carry_over)?;
        money::sub(available, self.spent_this_month)
    }

    pub fn total_row() -> Self {
        Budget {
            id: new_id(),
            category: TOTAL_CATEGORY.to_string(),
            sub_category: None,
            monthly_amount: Decimal::ZERO,
            spent_this_month: Decimal::ZERO,
            carry_over: Decimal::ZERO,
            color: None,
            notes: None,
            transactions: Vec::new(),
        }
    }
}

/// Input for a new asset.
#[derive(Debug, Clone, Default)]
pub struct NewAsset {
    pub name: String,
    pub category: String,
    pub value: Decimal,
    pub target_value: Option<Decimal>,
    pub duration_months: Option<u32>,
    pub color: Option<String>,
    pub notes: Option<String>,
}

/// Partial asset update. `value` appends a history snapshot; every other
/// field is merged without touching history.
#[derive(Debug, Clone, Default)]
pub struct AssetPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub value: Option<Decimal>,
    pub target_value: Option<Decimal>,
    pub duration_months: Option<u32>,
    pub color: Option<String>,
    pub notes: Option<String>,
}

/// Input for a new budget row.
#[derive(Debug, Clone, Default)]
pub struct NewBudget {
    pub category: String,
    pub sub_category: Option<String>,
    pub monthly_amount: Decimal,
    pub carry_over: Decimal,
    pub color: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct BudgetPatch {
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub monthly_amount: Option<Decimal>,
    pub spent_this_month: Option<Decimal>,
    pub carry_over: Option<Decimal>,
    pub color: Option<String>,
    pub notes: Option<String>,
}

impl BudgetPatch {
    /// True when the patch touches a field the Total row derives.
    pub fn touches_amounts(&self) -> bool {
        self.category.is_some()
            || self.monthly_amount.is_some()
            || self.spent_this_month.is_some()
            || self.carry_over.is_some()
    }
}

/// Display preferences and the active list filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplayPrefs {
    pub hide_amounts: bool,
    pub dark_mode: bool,
    pub asset_filter: String,
    pub budget_filter: String,
}

impl Default for DisplayPrefs {
    fn default() -> Self {
        DisplayPrefs {
            hide_amounts: false,
            dark_mode: false,
            asset_filter: ALL_FILTER.to_string(),
            budget_filter: ALL_FILTER.to_string(),
        }
    }
}
