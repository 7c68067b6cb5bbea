// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Key-value persistence for the application state.
//!
//! Each collection is stored as one JSON document under a fixed key. The
//! store only hydrates from here at startup and snapshots back after each
//! mutation; adapters never look inside the values.

use crate::error::Result;
use anyhow::Context;
use chrono::Utc;
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension, params};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Nestegg", "nestegg"));

/// Overrides the database location when set.
pub const DB_ENV: &str = "NESTEGG_DB";

pub trait KvStore {
    /// Returns `None` when the key was never saved.
    fn load(&self, key: &str) -> Result<Option<Value>>;
    fn save(&self, key: &str, value: &Value) -> Result<()>;
    /// Writes every entry or none of them.
    fn save_all(&self, entries: &[(&str, Value)]) -> Result<()>;
}

pub fn db_path() -> anyhow::Result<PathBuf> {
    if let Ok(p) = std::env::var(DB_ENV)
        && !p.trim().is_empty()
    {
        return Ok(PathBuf::from(p));
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("nestegg.sqlite"))
}

pub fn open_or_init() -> anyhow::Result<SqliteKv> {
    let path = db_path()?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    Ok(SqliteKv::new(conn)?)
}

/// SQLite-backed store: a single `kv` table of JSON text.
#[derive(Debug)]
pub struct SqliteKv {
    conn: Connection,
}

impl SqliteKv {
    pub fn new(conn: Connection) -> Result<Self> {
        init_schema(&conn)?;
        Ok(SqliteKv { conn })
    }

    pub fn in_memory() -> Result<Self> {
        Self::new(Connection::open_in_memory()?)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS kv(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    )?;
    Ok(())
}

impl KvStore for SqliteKv {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        let raw: Option<String> = self
            .conn
            .query_row("SELECT value FROM kv WHERE key=?1", params![key], |r| {
                r.get(0)
            })
            .optional()?;
        let Some(s) = raw else {
            return Ok(None);
        };
        match serde_json::from_str(&s) {
            Ok(v) => Ok(Some(v)),
            Err(err) => {
                warn!(key, %err, "kv entry is not valid JSON, treating as absent");
                Ok(None)
            }
        }
    }

    fn save(&self, key: &str, value: &Value) -> Result<()> {
        upsert(&self.conn, key, value)
    }

    fn save_all(&self, entries: &[(&str, Value)]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        for (key, value) in entries {
            upsert(&tx, key, value)?;
        }
        tx.commit()?;
        Ok(())
    }
}

fn upsert(conn: &Connection, key: &str, value: &Value) -> Result<()> {
    conn.execute(
        "INSERT INTO kv(key, value, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value, updated_at=excluded.updated_at",
        params![key, serde_json::to_string(value)?, Utc::now()],
    )?;
    Ok(())
}

/// Volatile store for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryKv {
    entries: RefCell<HashMap<String, Value>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.borrow().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl KvStore for MemoryKv {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, value: &Value) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    fn save_all(&self, entries: &[(&str, Value)]) -> Result<()> {
        let mut map = self.entries.borrow_mut();
        for (key, value) in entries {
            map.insert(key.to_string(), value.clone());
        }
        Ok(())
    }
}
