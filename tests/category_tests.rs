// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use nestegg::categories::Domain;
use nestegg::db::{KvStore, MemoryKv};
use nestegg::error::{NesteggError, Result};
use nestegg::models::{ALL_FILTER, FALLBACK_CATEGORY, NewAsset, NewBudget};
use nestegg::state::{AppState, KEY_ASSET_CATEGORIES};
use nestegg::store::Store;
use nestegg::{cli, commands::categories};
use rust_decimal::Decimal;
use serde_json::Value;
use std::cell::Cell;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 8, 15).unwrap()
}

fn setup() -> Store<MemoryKv> {
    Store::open(MemoryKv::new()).unwrap().with_clock(today)
}

fn add_asset<K: KvStore>(store: &mut Store<K>, name: &str, category: &str, value: i64) -> String {
    store
        .add_asset(NewAsset {
            name: name.into(),
            category: category.into(),
            value: Decimal::from(value),
            ..NewAsset::default()
        })
        .unwrap()
}

fn add_budget(store: &mut Store<MemoryKv>, category: &str, amount: i64) -> String {
    store
        .add_budget(NewBudget {
            category: category.into(),
            monthly_amount: Decimal::from(amount),
            ..NewBudget::default()
        })
        .unwrap()
}

#[test]
fn rename_cascades_in_place() {
    let mut store = setup();
    let fund = add_asset(&mut store, "Index fund", "投资", 5000);
    let bonds = add_asset(&mut store, "Bonds", "投资", 2000);
    let wallet = add_asset(&mut store, "Wallet", "现金", 100);
    store.set_category_color("投资", "#22C55E").unwrap();
    store.set_filter(Domain::Asset, "投资").unwrap();
    let pos = store.state().registry(Domain::Asset).iter().position(|c| c == "投资").unwrap();

    let new = store.rename_category(Domain::Asset, "投资", "  股票 ").unwrap();
    assert_eq!(new, "股票");

    let state = store.state();
    assert_eq!(state.registry(Domain::Asset)[pos], "股票");
    assert!(!state.has_category(Domain::Asset, "投资"));
    assert_eq!(store.asset(&fund).unwrap().category, "股票");
    assert_eq!(store.asset(&bonds).unwrap().category, "股票");
    assert_eq!(store.asset(&wallet).unwrap().category, "现金");
    assert_eq!(state.category_colors.get("股票"), Some("#22c55e"));
    assert_eq!(state.category_colors.get("投资"), None);
    assert_eq!(state.filter(Domain::Asset), "股票");

    // the rename is persisted
    let reloaded = AppState::hydrate(store.kv()).unwrap();
    assert_eq!(&reloaded, store.state());
}

#[test]
fn rename_of_shared_name_keeps_color_for_other_domain() {
    let mut store = setup();
    store.set_category_color(FALLBACK_CATEGORY, "#abc").unwrap();
    store.rename_category(Domain::Asset, FALLBACK_CATEGORY, "杂项").unwrap();

    let colors = &store.state().category_colors;
    assert_eq!(colors.get("杂项"), Some("#abc"));
    assert_eq!(colors.get(FALLBACK_CATEGORY), Some("#abc"));
    assert!(store.state().has_category(Domain::Budget, FALLBACK_CATEGORY));
}

#[test]
fn rename_moves_liability_flag() {
    let mut store = setup();
    add_asset(&mut store, "Mortgage", "负债", 500);
    store.rename_category(Domain::Asset, "负债", "贷款").unwrap();
    assert!(store.state().is_liability("贷款"));
    assert!(!store.state().is_liability("负债"));
    assert_eq!(store.balances().unwrap().total_liabilities, Decimal::from(500));
}

#[test]
fn rename_rejections_leave_state_unchanged() {
    let mut store = setup();
    add_asset(&mut store, "Wallet", "现金", 100);
    let before = store.state().clone();

    assert!(matches!(
        store.rename_category(Domain::Asset, "现金", "   "),
        Err(NesteggError::EmptyName(_))
    ));
    assert!(matches!(
        store.rename_category(Domain::Asset, "现金", "投资"),
        Err(NesteggError::DuplicateCategory(_))
    ));
    assert!(matches!(
        store.rename_category(Domain::Asset, "现金", "Total"),
        Err(NesteggError::ReservedCategory(_))
    ));
    assert!(matches!(
        store.rename_category(Domain::Asset, "黄金", "贵金属"),
        Err(NesteggError::UnknownCategory(_))
    ));
    assert_eq!(store.state(), &before);
}

#[test]
fn delete_moves_records_to_fallback() {
    let mut store = setup();
    let a = add_budget(&mut store, "生活", 800);
    let b = add_budget(&mut store, "生活", 200);
    let c = add_budget(&mut store, "餐饮", 300);
    store.set_filter(Domain::Budget, "生活").unwrap();

    let moved = store.delete_category(Domain::Budget, "生活").unwrap();
    assert_eq!(moved, 2);

    let state = store.state();
    assert!(!state.has_category(Domain::Budget, "生活"));
    assert_eq!(store.budget(&a).unwrap().category, FALLBACK_CATEGORY);
    assert_eq!(store.budget(&b).unwrap().category, FALLBACK_CATEGORY);
    assert_eq!(store.budget(&c).unwrap().category, "餐饮");
    assert_eq!(state.filter(Domain::Budget), ALL_FILTER);
    for row in state.budgets.iter().filter(|r| !r.is_total()) {
        assert!(state.has_category(Domain::Budget, &row.category));
    }
    let total = state.budgets.iter().find(|r| r.is_total()).unwrap();
    assert_eq!(total.monthly_amount, Decimal::from(1300));
}

#[test]
fn delete_fallback_is_rejected() {
    let mut store = setup();
    let before = store.state().clone();
    assert!(matches!(
        store.delete_category(Domain::Asset, FALLBACK_CATEGORY),
        Err(NesteggError::FallbackCategory(_))
    ));
    assert!(matches!(
        store.delete_category(Domain::Asset, "不存在"),
        Err(NesteggError::UnknownCategory(_))
    ));
    assert_eq!(store.state(), &before);
}

#[test]
fn delete_restores_missing_fallback() {
    let mut store = setup();
    store.rename_category(Domain::Budget, FALLBACK_CATEGORY, "杂项").unwrap();
    let id = add_budget(&mut store, "交通", 90);

    store.delete_category(Domain::Budget, "交通").unwrap();

    let registry = store.state().registry(Domain::Budget);
    assert_eq!(registry.last().map(String::as_str), Some(FALLBACK_CATEGORY));
    assert!(registry.iter().any(|c| c == "杂项"));
    assert_eq!(store.budget(&id).unwrap().category, FALLBACK_CATEGORY);
}

#[test]
fn delete_liability_category_unflags_it() {
    let mut store = setup();
    let loan = add_asset(&mut store, "Loan", "负债", 500);
    add_asset(&mut store, "Cash", "现金", 2000);
    assert_eq!(store.balances().unwrap().net_worth, Decimal::from(1500));

    store.delete_category(Domain::Asset, "负债").unwrap();
    let state = store.state();
    assert!(state.liability_categories.is_empty());
    assert_eq!(store.asset(&loan).unwrap().category, FALLBACK_CATEGORY);
    for asset in &state.assets {
        assert!(state.has_category(Domain::Asset, &asset.category));
    }
    let b = store.balances().unwrap();
    assert_eq!(b.total_liabilities, Decimal::ZERO);
    assert_eq!(b.net_worth, Decimal::from(2500));
}

/// Accepts writes until armed, then rejects any batch that touches the
/// asset category registry.
struct FailingKv {
    inner: MemoryKv,
    armed: Cell<bool>,
}

impl KvStore for FailingKv {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        self.inner.load(key)
    }

    fn save(&self, key: &str, value: &Value) -> Result<()> {
        self.inner.save(key, value)
    }

    fn save_all(&self, entries: &[(&str, Value)]) -> Result<()> {
        if self.armed.get() && entries.iter().any(|(k, _)| *k == KEY_ASSET_CATEGORIES) {
            return Err(std::io::Error::other("disk full").into());
        }
        self.inner.save_all(entries)
    }
}

#[test]
fn failed_write_keeps_memory_and_storage_in_step() {
    let kv = FailingKv {
        inner: MemoryKv::new(),
        armed: Cell::new(false),
    };
    let mut store = Store::open(kv).unwrap().with_clock(today);
    let fund = add_asset(&mut store, "Index fund", "投资", 5000);
    store.set_filter(Domain::Asset, "投资").unwrap();
    let before = store.state().clone();

    store.kv().armed.set(true);
    assert!(matches!(
        store.rename_category(Domain::Asset, "投资", "股票"),
        Err(NesteggError::Io(_))
    ));
    assert_eq!(store.state(), &before);
    assert_eq!(store.asset(&fund).unwrap().category, "投资");

    let stored = AppState::hydrate(store.kv()).unwrap();
    assert_eq!(&stored, &before);
    for asset in &stored.assets {
        assert!(stored.has_category(Domain::Asset, &asset.category));
    }

    store.kv().armed.set(false);
    store.rename_category(Domain::Asset, "投资", "股票").unwrap();
    assert_eq!(AppState::hydrate(store.kv()).unwrap().filter(Domain::Asset), "股票");
}

#[test]
fn reorder_and_filter_validation() {
    let mut store = setup();
    store.reorder_category(Domain::Asset, FALLBACK_CATEGORY, 0).unwrap();
    assert_eq!(store.state().registry(Domain::Asset)[0], FALLBACK_CATEGORY);

    let len = store.state().registry(Domain::Asset).len();
    assert!(matches!(
        store.reorder_category(Domain::Asset, "现金", len),
        Err(NesteggError::IndexOutOfRange { .. })
    ));
    assert!(matches!(
        store.set_filter(Domain::Asset, "餐饮"),
        Err(NesteggError::UnknownCategory(_))
    ));
    store.set_filter(Domain::Asset, ALL_FILTER).unwrap();
}

#[test]
fn category_rename_through_cli() {
    let mut store = setup();
    let id = add_budget(&mut store, "娱乐", 150);

    let matches = cli::build_cli().get_matches_from([
        "nestegg", "category", "rename", "--domain", "budget", "--from", "娱乐", "--to", "休闲",
    ]);
    if let Some(("category", cat_m)) = matches.subcommand() {
        categories::handle(&mut store, cat_m).unwrap();
    } else {
        panic!("category command not parsed");
    }

    assert_eq!(store.budget(&id).unwrap().category, "休闲");
    let rows = categories::category_rows(&store, Domain::Budget);
    assert!(rows.iter().any(|r| r.name == "休闲" && r.records == 1));
}

#[test]
fn domain_parses_from_cli_words() {
    assert_eq!("assets".parse::<Domain>().unwrap(), Domain::Asset);
    assert_eq!("Budget".parse::<Domain>().unwrap(), Domain::Budget);
    assert!("stocks".parse::<Domain>().is_err());
}
