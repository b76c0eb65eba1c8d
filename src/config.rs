// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Device-local key/value settings, kept outside the database.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::billing::BillingDay;
use crate::error::Result;

pub const CARD_BILLING_DAY_KEY: &str = "card_billing_day";
pub const SESSION_USER_KEY: &str = "session_user";
pub const STORAGE_FILE: &str = "local_storage.json";

#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
    entries: BTreeMap<String, Value>,
}

impl LocalStorage {
    /// Opens the store at `path`; a missing or unreadable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt local storage");
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Self { path, entries }
    }

    pub fn open_default() -> anyhow::Result<Self> {
        Ok(Self::open(crate::db::config_dir()?.join(STORAGE_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        self.save()
    }

    pub fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }

    fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, format!("{json}\n"))?;
        Ok(())
    }

    /// Stored billing day, or the default (10) when absent or invalid.
    pub fn billing_day(&self) -> BillingDay {
        self.get(CARD_BILLING_DAY_KEY)
            .and_then(|v| match v {
                Value::Number(n) => n.as_u64(),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            })
            .and_then(|d| u32::try_from(d).ok())
            .and_then(|d| BillingDay::new(d).ok())
            .unwrap_or_default()
    }

    pub fn set_billing_day(&mut self, day: BillingDay) -> Result<()> {
        self.set(CARD_BILLING_DAY_KEY, Value::from(day.get()))
    }
}
