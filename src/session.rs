// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use serde_json::Value;

use crate::config::{LocalStorage, SESSION_USER_KEY};
use crate::error::{FinanceError, Result};
use crate::models::Profile;
use crate::repo;

/// The signed-in profile, if any. Every write is scoped to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user_id: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self { user_id: None }
    }

    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }

    /// Restores the session saved in local storage, dropping it if the
    /// profile no longer exists.
    pub fn restore(conn: &Connection, storage: &LocalStorage) -> Result<Self> {
        let Some(Value::String(id)) = storage.get(SESSION_USER_KEY) else {
            return Ok(Self::anonymous());
        };
        match repo::find_profile(conn, id)? {
            Some(p) => Ok(Self::for_user(p.id)),
            None => {
                tracing::warn!(user = %id, "stored session refers to a missing profile");
                Ok(Self::anonymous())
            }
        }
    }

    pub fn sign_in(conn: &Connection, storage: &mut LocalStorage, key: &str) -> Result<Profile> {
        let profile =
            repo::find_profile(conn, key)?.ok_or_else(|| FinanceError::not_found("Profile", key))?;
        storage.set(SESSION_USER_KEY, Value::from(profile.id.clone()))?;
        tracing::info!(user = %profile.id, "signed in");
        Ok(profile)
    }

    pub fn sign_out(storage: &mut LocalStorage) -> Result<()> {
        storage.remove(SESSION_USER_KEY)
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn require_user(&self) -> Result<&str> {
        self.user_id().ok_or(FinanceError::NotAuthenticated)
    }
}
