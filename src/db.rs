// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.carteira", "Carteira", "carteira"));

/// Overrides both the data and the config directory when set.
pub const HOME_ENV: &str = "CARTEIRA_HOME";

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")
}

pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os(HOME_ENV) {
        Some(home) => PathBuf::from(home),
        None => project_dirs()?.data_dir().to_path_buf(),
    };
    fs::create_dir_all(&dir).context("Failed to create data dir")?;
    Ok(dir)
}

pub fn config_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os(HOME_ENV) {
        Some(home) => PathBuf::from(home),
        None => project_dirs()?.config_dir().to_path_buf(),
    };
    fs::create_dir_all(&dir).context("Failed to create config dir")?;
    Ok(dir)
}

pub fn db_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("carteira.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    tracing::debug!(path = %path.display(), "database ready");
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS profiles(
        id TEXT PRIMARY KEY,
        full_name TEXT NOT NULL UNIQUE,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS fixed_expenses(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id TEXT NOT NULL,
        name TEXT NOT NULL,
        description TEXT,
        amount TEXT NOT NULL,
        category TEXT NOT NULL,
        day_of_month INTEGER NOT NULL CHECK(day_of_month BETWEEN 1 AND 31),
        is_active INTEGER NOT NULL DEFAULT 1,
        total_installments INTEGER NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(user_id) REFERENCES profiles(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id TEXT NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('income','expense')),
        category TEXT NOT NULL,
        amount TEXT NOT NULL,
        description TEXT NOT NULL,
        date TEXT NOT NULL,
        is_credit INTEGER NOT NULL DEFAULT 0,
        card_name TEXT,
        installments INTEGER,
        current_installment INTEGER,
        installment_group_id TEXT,
        due_date TEXT,
        expense_type TEXT CHECK(expense_type IN ('normal','fixed','installment')),
        is_paid INTEGER NOT NULL DEFAULT 0,
        fixed_expense_id INTEGER,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(user_id) REFERENCES profiles(id) ON DELETE CASCADE,
        FOREIGN KEY(fixed_expense_id) REFERENCES fixed_expenses(id) ON DELETE SET NULL
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_user_date ON transactions(user_id, date);
    CREATE INDEX IF NOT EXISTS idx_transactions_group ON transactions(installment_group_id);

    CREATE TABLE IF NOT EXISTS future_purchases(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id TEXT NOT NULL,
        name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        estimated_price TEXT NOT NULL,
        priority TEXT NOT NULL CHECK(priority IN ('low','medium','high','urgent')),
        category TEXT NOT NULL,
        target_date TEXT,
        completed INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(user_id) REFERENCES profiles(id) ON DELETE CASCADE
    );
    "#,
    )?;
    Ok(())
}
