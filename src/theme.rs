// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Category colors and the theme color.
//!
//! A record's display color resolves in three tiers: the record's own
//! override, then the color assigned to its category, then [`DEFAULT_COLOR`].

use crate::error::{NesteggError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_COLOR: &str = "#94a3b8";
pub const DEFAULT_THEME: &str = "#4f46e5";

static HEX_COLOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("hex color pattern")
});

/// Normalizes a `#rgb`/`#rrggbb` color to lowercase, rejecting anything else.
pub fn validate_color(raw: &str) -> Result<String> {
    let s = raw.trim();
    if HEX_COLOR.is_match(s) {
        Ok(s.to_lowercase())
    } else {
        Err(NesteggError::InvalidColor(raw.to_string()))
    }
}

/// Category name to hex color.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorMap(BTreeMap<String, String>);

impl ColorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: &str) -> Option<&str> {
        self.0.get(category).map(String::as_str)
    }

    pub fn set(&mut self, category: &str, color: &str) -> Result<()> {
        let color = validate_color(color)?;
        self.0.insert(category.to_string(), color);
        Ok(())
    }

    pub fn remove(&mut self, category: &str) -> Option<String> {
        self.0.remove(category)
    }

    /// Carries `old`'s color over to `new`. When `keep_old` is set the old
    /// entry stays, because another registry still uses that name.
    pub fn migrate(&mut self, old: &str, new: &str, keep_old: bool) {
        let color = if keep_old {
            self.0.get(old).cloned()
        } else {
            self.0.remove(old)
        };
        if let Some(c) = color {
            self.0.entry(new.to_string()).or_insert(c);
        }
    }

    pub fn resolve<'a>(&'a self, record_color: Option<&'a str>, category: &str) -> &'a str {
        record_color
            .filter(|c| !c.trim().is_empty())
            .or_else(|| self.get(category))
            .unwrap_or(DEFAULT_COLOR)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
