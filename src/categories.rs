// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Category registries and the rename/delete cascades.
//!
//! Every operation validates first and only then mutates, so a failed call
//! leaves registry, ledgers, colors and filters exactly as they were.

use crate::error::{NesteggError, Result};
use crate::models::{ALL_FILTER, FALLBACK_CATEGORY, TOTAL_CATEGORY};
use crate::state::AppState;
use core::fmt;
use core::str::FromStr;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Asset,
    Budget,
}

impl Domain {
    pub fn other(self) -> Domain {
        match self {
            Domain::Asset => Domain::Budget,
            Domain::Budget => Domain::Asset,
        }
    }
}

impl FromStr for Domain {
    type Err = NesteggError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "asset" | "assets" => Ok(Domain::Asset),
            "budget" | "budgets" => Ok(Domain::Budget),
            _ => Err(NesteggError::InvalidDomain(s.to_string())),
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Asset => f.write_str("asset"),
            Domain::Budget => f.write_str("budget"),
        }
    }
}

fn is_reserved(name: &str) -> bool {
    name == TOTAL_CATEGORY || name == ALL_FILTER
}

impl AppState {
    pub fn registry(&self, domain: Domain) -> &[String] {
        match domain {
            Domain::Asset => &self.asset_categories,
            Domain::Budget => &self.budget_categories,
        }
    }

    fn registry_mut(&mut self, domain: Domain) -> &mut Vec<String> {
        match domain {
            Domain::Asset => &mut self.asset_categories,
            Domain::Budget => &mut self.budget_categories,
        }
    }

    pub fn filter(&self, domain: Domain) -> &str {
        match domain {
            Domain::Asset => &self.display.asset_filter,
            Domain::Budget => &self.display.budget_filter,
        }
    }

    fn filter_mut(&mut self, domain: Domain) -> &mut String {
        match domain {
            Domain::Asset => &mut self.display.asset_filter,
            Domain::Budget => &mut self.display.budget_filter,
        }
    }

    pub fn has_category(&self, domain: Domain, name: &str) -> bool {
        self.registry(domain).iter().any(|c| c == name)
    }

    fn ensure_new_name(&self, domain: Domain, raw: &str) -> Result<String> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(NesteggError::EmptyName("category name"));
        }
        if is_reserved(name) {
            return Err(NesteggError::ReservedCategory(name.to_string()));
        }
        if self.has_category(domain, name) {
            return Err(NesteggError::DuplicateCategory(name.to_string()));
        }
        Ok(name.to_string())
    }

    pub fn add_category(&mut self, domain: Domain, raw: &str) -> Result<String> {
        let name = self.ensure_new_name(domain, raw)?;
        self.registry_mut(domain).push(name.clone());
        info!(%domain, category = %name, "category added");
        Ok(name)
    }

    /// Renames in place and cascades to every record, the color map, the
    /// liability list and the active filter.
    pub fn rename_category(&mut self, domain: Domain, old: &str, raw_new: &str) -> Result<String> {
        let new = self.ensure_new_name(domain, raw_new)?;
        let pos = self
            .registry(domain)
            .iter()
            .position(|c| c == old)
            .ok_or_else(|| NesteggError::UnknownCategory(old.to_string()))?;

        self.registry_mut(domain)[pos] = new.clone();
        match domain {
            Domain::Asset => {
                for a in self.assets.iter_mut().filter(|a| a.category == old) {
                    a.category = new.clone();
                }
                for l in self.liability_categories.iter_mut().filter(|l| l.as_str() == old) {
                    *l = new.clone();
                }
            }
            Domain::Budget => {
                for b in self.budgets.iter_mut().filter(|b| b.category == old) {
                    b.category = new.clone();
                }
            }
        }
        let shared = self.has_category(domain.other(), old);
        self.category_colors.migrate(old, &new, shared);
        let filter = self.filter_mut(domain);
        if filter.as_str() == old {
            *filter = new.clone();
        }
        info!(%domain, from = old, to = %new, "category renamed");
        Ok(new)
    }

    /// Removes `name`, moving its records to the fallback category and
    /// resetting the filter to All when it pointed at `name`.
    pub fn delete_category(&mut self, domain: Domain, name: &str) -> Result<usize> {
        if name == FALLBACK_CATEGORY {
            return Err(NesteggError::FallbackCategory(name.to_string()));
        }
        if !self.has_category(domain, name) {
            return Err(NesteggError::UnknownCategory(name.to_string()));
        }

        if !self.has_category(domain, FALLBACK_CATEGORY) {
            self.registry_mut(domain).push(FALLBACK_CATEGORY.to_string());
        }
        let moved = match domain {
            Domain::Asset => {
                let mut n = 0;
                for a in self.assets.iter_mut().filter(|a| a.category == name) {
                    a.category = FALLBACK_CATEGORY.to_string();
                    n += 1;
                }
                self.liability_categories.retain(|l| l != name);
                n
            }
            Domain::Budget => {
                let mut n = 0;
                for b in self.budgets.iter_mut().filter(|b| b.category == name) {
                    b.category = FALLBACK_CATEGORY.to_string();
                    n += 1;
                }
                n
            }
        };
        self.registry_mut(domain).retain(|c| c != name);
        if !self.has_category(domain.other(), name) {
            self.category_colors.remove(name);
        }
        let filter = self.filter_mut(domain);
        if filter.as_str() == name {
            *filter = ALL_FILTER.to_string();
        }
        info!(%domain, category = name, moved, "category deleted");
        Ok(moved)
    }

    /// Moves `name` to position `index` in the registry.
    pub fn reorder_category(&mut self, domain: Domain, name: &str, index: usize) -> Result<()> {
        let len = self.registry(domain).len();
        let from = self
            .registry(domain)
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| NesteggError::UnknownCategory(name.to_string()))?;
        if index >= len {
            return Err(NesteggError::IndexOutOfRange { index, len });
        }
        let list = self.registry_mut(domain);
        let item = list.remove(from);
        list.insert(index, item);
        Ok(())
    }

    /// Sets the active filter; `全部` or any registered category.
    pub fn set_filter(&mut self, domain: Domain, value: &str) -> Result<()> {
        let value = value.trim();
        if value != ALL_FILTER && !self.has_category(domain, value) {
            return Err(NesteggError::UnknownCategory(value.to_string()));
        }
        *self.filter_mut(domain) = value.to_string();
        Ok(())
    }

    /// Flags or unflags an asset category as a liability.
    pub fn set_liability(&mut self, name: &str, liability: bool) -> Result<()> {
        if !self.has_category(Domain::Asset, name) {
            return Err(NesteggError::UnknownCategory(name.to_string()));
        }
        let present = self.is_liability(name);
        if liability && !present {
            self.liability_categories.push(name.to_string());
        } else if !liability && present {
            self.liability_categories.retain(|l| l != name);
        }
        Ok(())
    }
}
