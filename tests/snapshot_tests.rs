// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use nestegg::categories::Domain;
use nestegg::db::{KvStore, MemoryKv, SqliteKv};
use nestegg::error::NesteggError;
use nestegg::models::{AssetPatch, NewAsset, NewBudget};
use nestegg::snapshot::Snapshot;
use nestegg::state::{AppState, KEY_ASSETS, KEY_BUDGET_CATEGORIES, KEY_THEME};
use nestegg::store::Store;
use nestegg::theme::DEFAULT_THEME;
use nestegg::{cli, commands::exporter, commands::importer};
use rust_decimal::Decimal;
use serde_json::json;
use std::fs;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 8, 15).unwrap()
}

fn populated<K: KvStore>(kv: K) -> Store<K> {
    let mut store = Store::open(kv).unwrap().with_clock(today);
    let id = store
        .add_asset(NewAsset {
            name: "Savings".into(),
            category: "银行存款".into(),
            value: Decimal::from(1000),
            target_value: Some(Decimal::from(5000)),
            duration_months: Some(12),
            ..NewAsset::default()
        })
        .unwrap();
    store
        .update_asset(
            &id,
            AssetPatch {
                value: Some(Decimal::new(120050, 2)),
                ..AssetPatch::default()
            },
        )
        .unwrap();
    let b = store
        .add_budget(NewBudget {
            category: "餐饮".into(),
            monthly_amount: Decimal::from(600),
            ..NewBudget::default()
        })
        .unwrap();
    store.record_spend(&b, Decimal::from(35), None, Some("dinner".into())).unwrap();
    store.add_category(Domain::Budget, "旅行").unwrap();
    store.set_category_color("餐饮", "#f97316").unwrap();
    store.set_theme("#0EA5E9").unwrap();
    store.set_display(Some(true), None).unwrap();
    store
}

fn run_export<K: KvStore>(store: &Store<K>, args: &[&str]) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from(args);
    match matches.subcommand() {
        Some(("export", m)) => exporter::handle(store, m),
        _ => panic!("export command not parsed"),
    }
}

fn run_import<K: KvStore>(store: &mut Store<K>, args: &[&str]) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from(args);
    match matches.subcommand() {
        Some(("import", m)) => importer::handle(store, m),
        _ => panic!("import command not parsed"),
    }
}

#[test]
fn snapshot_json_round_trip_restores_state() {
    let store = populated(MemoryKv::new());
    let json = Snapshot::of(store.state()).to_json().unwrap();
    let restored = Snapshot::from_json(&json).unwrap();
    assert_eq!(&restored.state, store.state());

    let mut fresh = Store::open(MemoryKv::new()).unwrap();
    fresh.replace_state(restored.state).unwrap();
    assert_eq!(fresh.state(), store.state());
    assert_eq!(&AppState::hydrate(fresh.kv()).unwrap(), store.state());
}

#[test]
fn export_then_import_through_cli() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("backup.json");
    let path_s = path.to_str().unwrap();

    let source = populated(MemoryKv::new());
    run_export(&source, &["nestegg", "export", "snapshot", "--out", path_s]).unwrap();

    let mut target = Store::open(MemoryKv::new()).unwrap().with_clock(today);
    let before = target.state().clone();
    let unconfirmed = run_import(&mut target, &["nestegg", "import", "snapshot", "--path", path_s]);
    assert!(unconfirmed.is_err());
    assert_eq!(target.state(), &before);

    run_import(
        &mut target,
        &["nestegg", "import", "snapshot", "--path", path_s, "--yes"],
    )
    .unwrap();
    assert_eq!(target.state(), source.state());
}

#[test]
fn malformed_snapshot_leaves_state_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ \"assets\": [ this is not json").unwrap();

    let mut store = populated(MemoryKv::new());
    let before = store.state().clone();
    let res = run_import(
        &mut store,
        &["nestegg", "import", "snapshot", "--path", path.to_str().unwrap(), "--yes"],
    );
    assert!(res.is_err());
    assert_eq!(store.state(), &before);
}

#[test]
fn legacy_document_gets_ids_and_defaults() {
    let doc = json!({
        "exportedAt": "2024-03-01T10:00:00Z",
        "assets": [{
            "id": "a1",
            "name": "Cash",
            "category": "现金",
            "value": 250,
            "lastUpdated": "2024-03-01",
            "history": [{ "date": "03/01", "value": 250 }]
        }],
        "budgets": [
            { "category": "Total", "monthlyAmount": 0 },
            { "category": "生活", "monthlyAmount": "400", "spentThisMonth": 120.5 }
        ],
        "assetCategories": ["现金", "负债", "其他"],
        "budgetCategories": ["生活", "其他"]
    });
    let snap = Snapshot::from_json(&doc.to_string()).unwrap();
    let mut store = Store::open(MemoryKv::new()).unwrap();
    store.replace_state(snap.state).unwrap();

    let state = store.state();
    assert!(state.budgets.iter().all(|b| !b.id.is_empty()));
    assert_ne!(state.budgets[0].id, state.budgets[1].id);
    let total = state.budgets.iter().find(|b| b.is_total()).unwrap();
    assert_eq!(total.monthly_amount, Decimal::from(400));
    assert_eq!(total.spent_this_month, Decimal::new(1205, 1));
    assert_eq!(state.theme_color, DEFAULT_THEME);
    assert!(state.is_liability("负债"));
}

#[test]
fn sqlite_kv_persists_every_mutation() {
    let store = populated(SqliteKv::in_memory().unwrap());
    let reloaded = AppState::hydrate(store.kv()).unwrap();
    assert_eq!(&reloaded, store.state());
}

#[test]
fn every_key_is_written_on_commit() {
    let store = populated(MemoryKv::new());
    assert_eq!(
        store.kv().keys(),
        vec![
            "asset_categories",
            "assets",
            "budget_categories",
            "budgets",
            "category_colors",
            "display",
            "liability_categories",
            "theme_color",
        ]
    );

    let sqlite = populated(SqliteKv::in_memory().unwrap());
    let rows: i64 = sqlite
        .kv()
        .connection()
        .query_row("SELECT COUNT(*) FROM kv", [], |r| r.get(0))
        .unwrap();
    assert_eq!(rows, 8);
}

#[test]
fn sqlite_rows_carry_write_timestamps() {
    let before = Utc::now();
    let store = populated(SqliteKv::in_memory().unwrap());
    let stamp: DateTime<Utc> = store
        .kv()
        .connection()
        .query_row("SELECT updated_at FROM kv WHERE key = ?1", [KEY_ASSETS], |r| {
            r.get(0)
        })
        .unwrap();
    assert!(stamp >= before - Duration::seconds(1));
    assert!(stamp <= Utc::now());
}

#[test]
fn sqlite_batch_rolls_back_when_one_key_fails() {
    let kv = SqliteKv::in_memory().unwrap();
    kv.connection()
        .execute_batch(
            "CREATE TRIGGER reject_theme BEFORE INSERT ON kv WHEN NEW.key = 'theme_color'
             BEGIN SELECT RAISE(ABORT, 'theme rejected'); END;",
        )
        .unwrap();
    let mut store = Store::open(kv).unwrap().with_clock(today);

    assert!(matches!(
        store.add_category(Domain::Budget, "旅行"),
        Err(NesteggError::Storage(_))
    ));
    assert!(!store.state().has_category(Domain::Budget, "旅行"));
    let rows: i64 = store
        .kv()
        .connection()
        .query_row("SELECT COUNT(*) FROM kv", [], |r| r.get(0))
        .unwrap();
    assert_eq!(rows, 0);
}

#[test]
fn corrupt_sqlite_text_is_treated_as_absent() {
    let kv = SqliteKv::in_memory().unwrap();
    kv.connection()
        .execute(
            "INSERT INTO kv(key, value) VALUES (?1, ?2)",
            ["budget_categories", "{not json"],
        )
        .unwrap();
    assert!(kv.load(KEY_BUDGET_CATEGORIES).unwrap().is_none());
    let state = AppState::hydrate(&kv).unwrap();
    assert_eq!(state.budget_categories, AppState::default().budget_categories);
}

#[test]
fn hydrate_falls_back_per_key() {
    let kv = MemoryKv::new();
    let empty = AppState::hydrate(&kv).unwrap();
    let defaults = AppState::default();
    assert_eq!(empty.asset_categories, defaults.asset_categories);
    assert_eq!(empty.budget_categories, defaults.budget_categories);
    assert_eq!(empty.theme_color, DEFAULT_THEME);
    assert_eq!(empty.budgets.len(), 1);
    assert!(empty.budgets[0].is_total());

    kv.save(KEY_ASSETS, &json!("definitely not a list")).unwrap();
    kv.save(KEY_THEME, &json!("#123456")).unwrap();
    let state = AppState::hydrate(&kv).unwrap();
    assert!(state.assets.is_empty());
    assert_eq!(state.theme_color, "#123456");
    assert_eq!(state.budgets.iter().filter(|b| b.is_total()).count(), 1);
}

#[test]
fn export_assets_csv_and_json() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("assets.csv");
    let json_path = dir.path().join("assets.json");
    let store = populated(MemoryKv::new());

    run_export(
        &store,
        &["nestegg", "export", "assets", "--out", csv_path.to_str().unwrap()],
    )
    .unwrap();
    let csv = fs::read_to_string(&csv_path).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next().unwrap(),
        "id,name,category,value,target_value,duration_months,last_updated,notes"
    );
    assert!(lines.next().unwrap().contains("Savings,银行存款,1200.50,5000,12,2025-08-15"));

    run_export(
        &store,
        &[
            "nestegg", "export", "assets", "--format", "JSON", "--out",
            json_path.to_str().unwrap(),
        ],
    )
    .unwrap();
    let parsed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(parsed[0]["name"], "Savings");
    assert_eq!(parsed[0]["history"].as_array().unwrap().len(), 2);
}

#[test]
fn export_unknown_format_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("tx.xml");
    let store = populated(MemoryKv::new());
    let res = run_export(
        &store,
        &[
            "nestegg", "export", "transactions", "--format", "xml", "--out",
            out.to_str().unwrap(),
        ],
    );
    assert!(res.is_err());
    assert!(!out.exists());
}

#[test]
fn import_transactions_validates_all_rows_first() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.csv");
    let bad = dir.path().join("bad.csv");
    fs::write(&good, "date,amount,note\n2025-08-01,12.50,coffee\n2025-08-02, 7 ,\n").unwrap();
    fs::write(&bad, "date,amount,note\n2025-08-01,10,ok\nnot-a-date,5,broken\n").unwrap();

    let mut store = Store::open(MemoryKv::new()).unwrap().with_clock(today);
    let id = store
        .add_budget(NewBudget {
            category: "餐饮".into(),
            monthly_amount: Decimal::from(100),
            ..NewBudget::default()
        })
        .unwrap();

    let res = run_import(
        &mut store,
        &[
            "nestegg", "import", "transactions", "--path", bad.to_str().unwrap(), "--budget",
            &id,
        ],
    );
    assert!(res.is_err());
    assert!(store.budget(&id).unwrap().transactions.is_empty());

    run_import(
        &mut store,
        &[
            "nestegg", "import", "transactions", "--path", good.to_str().unwrap(), "--budget",
            &id,
        ],
    )
    .unwrap();
    let row = store.budget(&id).unwrap();
    assert_eq!(row.transactions.len(), 2);
    assert_eq!(row.spent_this_month, Decimal::new(1950, 2));
    assert_eq!(row.transactions[1].note, None);
}
