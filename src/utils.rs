// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

const UA: &str = concat!(
    "nestegg/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/nestegg)"
);

static LEGACY_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})$").expect("legacy date pattern"));

pub fn http_client() -> crate::error::Result<reqwest::blocking::Client> {
    let c = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .user_agent(UA)
        .build()?;
    Ok(c)
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// ISO form used for every date this crate writes.
pub fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// Tolerant parser for stored history dates.
///
/// Accepts `YYYY-MM-DD`, an ISO datetime (date part is used) and the legacy
/// `MM/DD` form, which is placed in `today`'s year.
pub fn parse_history_date(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Some((day, _)) = s.split_once('T')
        && let Ok(d) = NaiveDate::parse_from_str(day, "%Y-%m-%d")
    {
        return Some(d);
    }
    let caps = LEGACY_DATE.captures(s)?;
    let month: u32 = caps[1].parse().ok()?;
    let day: u32 = caps[2].parse().ok()?;
    NaiveDate::from_ymd_opt(today.year(), month, day)
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Shown in place of an amount while amounts are hidden.
pub const MASK: &str = "****";

pub fn fmt_money(d: &Decimal, hide: bool) -> String {
    if hide {
        MASK.to_string()
    } else {
        format!("{:.2}", d.round_dp(2))
    }
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

/// First eight characters of an id, enough to type back as a prefix.
pub fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

/// Trimmed value of an optional string argument.
/// JSON keys that carry money amounts.
const MONEY_KEYS: &[&str] = &[
    "amount",
    "budgeted",
    "carryOver",
    "change",
    "current",
    "highest",
    "lowest",
    "monthlyAmount",
    "monthlyNeeded",
    "netWorth",
    "spent",
    "spentThisMonth",
    "targetValue",
    "totalAssets",
    "totalLiabilities",
    "value",
];

/// Replaces every non-null money amount in `v` with the masked placeholder.
pub fn mask_amounts(v: &mut serde_json::Value) {
    match v {
        serde_json::Value::Array(items) => items.iter_mut().for_each(mask_amounts),
        serde_json::Value::Object(map) => {
            for (key, item) in map.iter_mut() {
                if MONEY_KEYS.contains(&key.as_str()) && !item.is_null() {
                    *item = serde_json::Value::String(MASK.to_string());
                } else {
                    mask_amounts(item);
                }
            }
        }
        _ => {}
    }
}

/// `maybe_print_json` that honours the hide-amounts display preference.
pub fn maybe_print_json_masked<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
    hide: bool,
) -> Result<bool> {
    if !json_flag && !jsonl_flag {
        return Ok(false);
    }
    let mut val = serde_json::to_value(v)?;
    if hide {
        mask_amounts(&mut val);
    }
    maybe_print_json(json_flag, jsonl_flag, &val)
}

pub fn arg_str(m: &clap::ArgMatches, id: &str) -> Option<String> {
    m.get_one::<String>(id).map(|s| s.trim().to_string())
}

/// Trimmed value of a required string argument.
pub fn req_str(m: &clap::ArgMatches, id: &str) -> Result<String> {
    arg_str(m, id).with_context(|| format!("--{} is required", id))
}

pub fn arg_decimal(m: &clap::ArgMatches, id: &str) -> Result<Option<Decimal>> {
    arg_str(m, id).map(|s| parse_decimal(&s)).transpose()
}
