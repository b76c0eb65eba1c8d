// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Wishlist of planned purchases. These never create transactions.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::error::{FinanceError, Result};
use crate::models::{validate_amount, Category, FuturePurchase, Priority};
use crate::utils::sum_amounts;
use crate::repo;
use crate::session::Session;

#[derive(Debug, Clone)]
pub struct PurchaseDraft {
    pub name: String,
    pub description: String,
    pub estimated_price: Decimal,
    pub priority: Priority,
    pub category: Category,
    pub target_date: Option<NaiveDate>,
}

impl PurchaseDraft {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(FinanceError::MissingField("name"));
        }
        validate_amount(self.estimated_price)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct PurchaseUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub estimated_price: Option<Decimal>,
    pub priority: Option<Priority>,
    pub category: Option<Category>,
    pub target_date: Option<NaiveDate>,
    pub clear_target_date: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    All,
    Pending,
    Completed,
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Status::All),
            "pending" => Ok(Status::Pending),
            "completed" => Ok(Status::Completed),
            other => Err(format!("Unknown status '{}' (use all|pending|completed)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PurchaseFilter {
    pub priority: Option<Priority>,
    pub status: Status,
}

impl PurchaseFilter {
    pub fn matches(&self, p: &FuturePurchase) -> bool {
        if let Some(pr) = self.priority {
            if p.priority != pr {
                return false;
            }
        }
        match self.status {
            Status::All => true,
            Status::Pending => !p.completed,
            Status::Completed => p.completed,
        }
    }
}

/// Filters, then orders pending before completed and by priority
/// (`urgent` first). The sort is stable, so ties keep newest-first order.
pub fn arrange(purchases: Vec<FuturePurchase>, filter: &PurchaseFilter) -> Vec<FuturePurchase> {
    let mut out: Vec<FuturePurchase> = purchases.into_iter().filter(|p| filter.matches(p)).collect();
    out.sort_by_key(|p| (p.completed, p.priority.rank()));
    out
}

pub fn total_estimated(purchases: &[FuturePurchase]) -> Decimal {
    sum_amounts(purchases.iter().map(|p| p.estimated_price))
}

pub fn add(conn: &Connection, session: &Session, draft: &PurchaseDraft) -> Result<i64> {
    draft.validate()?;
    let user = session.require_user()?;
    let id = repo::insert_future_purchase(conn, user, draft).inspect_err(|e| {
        tracing::error!(error = %e, "failed to add future purchase");
    })?;
    tracing::info!(id, name = %draft.name, "future purchase added");
    Ok(id)
}

pub fn list(conn: &Connection, session: &Session, filter: &PurchaseFilter) -> Result<Vec<FuturePurchase>> {
    let Some(user) = session.user_id() else {
        return Ok(Vec::new());
    };
    Ok(arrange(repo::list_future_purchases(conn, user)?, filter))
}

/// Flips the completed flag and returns the new value.
pub fn toggle_completed(conn: &Connection, session: &Session, id: i64) -> Result<bool> {
    let user = session.require_user()?;
    let mut p = repo::find_future_purchase(conn, user, id)?
        .ok_or_else(|| FinanceError::not_found("Future purchase", id))?;
    p.completed = !p.completed;
    repo::update_future_purchase(conn, &p)?;
    Ok(p.completed)
}

pub fn update(conn: &Connection, session: &Session, id: i64, changes: &PurchaseUpdate) -> Result<FuturePurchase> {
    let user = session.require_user()?;
    let mut p = repo::find_future_purchase(conn, user, id)?
        .ok_or_else(|| FinanceError::not_found("Future purchase", id))?;
    if let Some(n) = &changes.name {
        p.name = n.clone();
    }
    if let Some(d) = &changes.description {
        p.description = d.clone();
    }
    if let Some(price) = changes.estimated_price {
        p.estimated_price = price;
    }
    if let Some(pr) = changes.priority {
        p.priority = pr;
    }
    if let Some(c) = &changes.category {
        p.category = c.clone();
    }
    if changes.clear_target_date {
        p.target_date = None;
    } else if let Some(t) = changes.target_date {
        p.target_date = Some(t);
    }

    PurchaseDraft {
        name: p.name.clone(),
        description: p.description.clone(),
        estimated_price: p.estimated_price,
        priority: p.priority,
        category: p.category.clone(),
        target_date: p.target_date,
    }
    .validate()?;

    repo::update_future_purchase(conn, &p).inspect_err(|e| {
        tracing::error!(id, error = %e, "failed to update future purchase");
    })?;
    Ok(p)
}

pub fn delete(conn: &Connection, session: &Session, id: i64) -> Result<()> {
    let user = session.require_user()?;
    repo::delete_future_purchase(conn, user, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(id: i64, priority: Priority, completed: bool, price: i64) -> FuturePurchase {
        FuturePurchase {
            id,
            user_id: "u".into(),
            name: format!("item {id}"),
            description: String::new(),
            estimated_price: Decimal::new(price, 0),
            priority,
            category: Category::Shopping,
            target_date: None,
            created_at: None,
            completed,
        }
    }

    #[test]
    fn pending_first_then_priority() {
        let items = vec![
            p(1, Priority::Low, false, 10),
            p(2, Priority::Urgent, true, 20),
            p(3, Priority::High, false, 30),
            p(4, Priority::Urgent, false, 40),
            p(5, Priority::Medium, false, 50),
        ];
        let ids: Vec<i64> = arrange(items, &PurchaseFilter::default())
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![4, 3, 5, 1, 2]);
    }

    #[test]
    fn filters_by_priority_and_status() {
        let items = vec![
            p(1, Priority::High, false, 10),
            p(2, Priority::High, true, 20),
            p(3, Priority::Low, false, 30),
        ];
        let f = PurchaseFilter {
            priority: Some(Priority::High),
            status: Status::Pending,
        };
        let out = arrange(items.clone(), &f);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, 1);

        let done = arrange(
            items,
            &PurchaseFilter {
                priority: None,
                status: Status::Completed,
            },
        );
        assert_eq!(total_estimated(&done), Decimal::new(20, 0));
    }
}
