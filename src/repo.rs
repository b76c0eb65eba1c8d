// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Row <-> model mapping for every table.
//!
//! Columns are snake_case (`card_name`, `installment_group_id`, ...) and map
//! onto the single model in [`crate::models`]; nothing outside this module
//! touches column names.

use std::str::FromStr;

use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::error::{FinanceError, Result};
use crate::fixed::FixedExpensePlan;
use crate::models::{
    Category, FixedExpense, FuturePurchase, NewTransaction, Profile, Transaction,
};
use crate::purchases::PurchaseDraft;

const TX_COLUMNS: &str = "id, user_id, type, category, amount, description, date, created_at, \
     is_credit, card_name, installments, current_installment, installment_group_id, \
     due_date, expense_type, is_paid, fixed_expense_id";

const FIXED_COLUMNS: &str =
    "id, user_id, name, description, amount, category, day_of_month, is_active, total_installments";

const PURCHASE_COLUMNS: &str = "id, user_id, name, description, estimated_price, priority, \
     category, target_date, created_at, completed";

fn parse_text<T>(r: &Row, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = r.get(idx)?;
    raw.parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_opt_text<T>(r: &Row, idx: usize) -> rusqlite::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: Option<String> = r.get(idx)?;
    raw.map(|s| {
        s.parse::<T>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

fn transaction_from_row(r: &Row) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: r.get(0)?,
        user_id: r.get(1)?,
        r#type: parse_text(r, 2)?,
        category: Category::from(r.get::<_, String>(3)?),
        amount: parse_text(r, 4)?,
        description: r.get(5)?,
        date: r.get(6)?,
        created_at: r.get(7)?,
        is_credit: r.get(8)?,
        credit_card: r.get(9)?,
        installments: r.get(10)?,
        current_installment: r.get(11)?,
        installment_group_id: parse_opt_text::<Uuid>(r, 12)?,
        due_date: r.get(13)?,
        expense_type: parse_opt_text(r, 14)?,
        is_paid: r.get(15)?,
        fixed_expense_id: r.get(16)?,
    })
}

fn fixed_expense_from_row(r: &Row) -> rusqlite::Result<FixedExpense> {
    Ok(FixedExpense {
        id: r.get(0)?,
        user_id: r.get(1)?,
        name: r.get(2)?,
        description: r.get(3)?,
        amount: parse_text(r, 4)?,
        category: Category::from(r.get::<_, String>(5)?),
        day_of_month: r.get(6)?,
        is_active: r.get(7)?,
        total_installments: r.get(8)?,
    })
}

fn purchase_from_row(r: &Row) -> rusqlite::Result<FuturePurchase> {
    Ok(FuturePurchase {
        id: r.get(0)?,
        user_id: r.get(1)?,
        name: r.get(2)?,
        description: r.get(3)?,
        estimated_price: parse_text(r, 4)?,
        priority: parse_text(r, 5)?,
        category: Category::from(r.get::<_, String>(6)?),
        target_date: r.get(7)?,
        created_at: r.get(8)?,
        completed: r.get(9)?,
    })
}

// ---------------------------------------------------------------------------
// transactions
// ---------------------------------------------------------------------------

pub fn insert_transaction(conn: &Connection, user_id: &str, t: &NewTransaction) -> Result<i64> {
    conn.execute(
        "INSERT INTO transactions(user_id, type, category, amount, description, date,
            is_credit, card_name, installments, current_installment, installment_group_id,
            due_date, expense_type, is_paid, fixed_expense_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        params![
            user_id,
            t.r#type.as_str(),
            t.category.slug(),
            t.amount.to_string(),
            t.description,
            t.date,
            t.is_credit,
            t.credit_card,
            t.installments,
            t.current_installment,
            t.installment_group_id.map(|g| g.to_string()),
            t.due_date,
            t.expense_type.map(|e| e.as_str()),
            t.is_paid,
            t.fixed_expense_id,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Inserts every draft or none of them.
pub fn insert_transactions(
    conn: &mut Connection,
    user_id: &str,
    drafts: &[NewTransaction],
) -> Result<Vec<i64>> {
    let tx = conn.transaction()?;
    let mut ids = Vec::with_capacity(drafts.len());
    for d in drafts {
        ids.push(insert_transaction(&tx, user_id, d)?);
    }
    tx.commit()?;
    Ok(ids)
}

pub fn list_transactions(conn: &Connection, user_id: &str) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TX_COLUMNS} FROM transactions WHERE user_id=?1 ORDER BY date DESC, id DESC"
    ))?;
    let rows = stmt.query_map(params![user_id], transaction_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn find_transaction(conn: &Connection, user_id: &str, id: i64) -> Result<Option<Transaction>> {
    let t = conn
        .query_row(
            &format!("SELECT {TX_COLUMNS} FROM transactions WHERE id=?1 AND user_id=?2"),
            params![id, user_id],
            transaction_from_row,
        )
        .optional()?;
    Ok(t)
}

/// Writes the editable columns of a single record.
pub fn update_transaction(conn: &Connection, t: &Transaction) -> Result<()> {
    let n = conn.execute(
        "UPDATE transactions SET type=?1, category=?2, amount=?3, description=?4, date=?5,
            is_credit=?6, card_name=?7, is_paid=?8
         WHERE id=?9 AND user_id=?10",
        params![
            t.r#type.as_str(),
            t.category.slug(),
            t.amount.to_string(),
            t.description,
            t.date,
            t.is_credit,
            t.credit_card,
            t.is_paid,
            t.id,
            t.user_id,
        ],
    )?;
    if n == 0 {
        return Err(FinanceError::not_found("Transaction", t.id));
    }
    Ok(())
}

pub fn delete_transaction(conn: &Connection, user_id: &str, id: i64) -> Result<usize> {
    Ok(conn.execute(
        "DELETE FROM transactions WHERE id=?1 AND user_id=?2",
        params![id, user_id],
    )?)
}

pub fn delete_installment_group(conn: &Connection, user_id: &str, group: Uuid) -> Result<usize> {
    Ok(conn.execute(
        "DELETE FROM transactions WHERE installment_group_id=?1 AND user_id=?2",
        params![group.to_string(), user_id],
    )?)
}

pub fn delete_all_transactions(conn: &Connection, user_id: &str) -> Result<usize> {
    Ok(conn.execute(
        "DELETE FROM transactions WHERE user_id=?1",
        params![user_id],
    )?)
}

pub fn set_transaction_paid(conn: &Connection, user_id: &str, id: i64, paid: bool) -> Result<()> {
    let n = conn.execute(
        "UPDATE transactions SET is_paid=?1 WHERE id=?2 AND user_id=?3",
        params![paid, id, user_id],
    )?;
    if n == 0 {
        return Err(FinanceError::not_found("Transaction", id));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// fixed_expenses
// ---------------------------------------------------------------------------

pub fn insert_fixed_expense(conn: &Connection, user_id: &str, plan: &FixedExpensePlan) -> Result<i64> {
    conn.execute(
        "INSERT INTO fixed_expenses(user_id, name, description, amount, category, day_of_month,
            is_active, total_installments)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7)",
        params![
            user_id,
            plan.name,
            plan.description,
            plan.total_amount.to_string(),
            plan.category.slug(),
            plan.day_of_month,
            plan.months_count,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_active_fixed_expenses(conn: &Connection, user_id: &str) -> Result<Vec<FixedExpense>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {FIXED_COLUMNS} FROM fixed_expenses
         WHERE user_id=?1 AND is_active=1 ORDER BY day_of_month ASC, id ASC"
    ))?;
    let rows = stmt.query_map(params![user_id], fixed_expense_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn find_fixed_expense(conn: &Connection, user_id: &str, id: i64) -> Result<Option<FixedExpense>> {
    let f = conn
        .query_row(
            &format!("SELECT {FIXED_COLUMNS} FROM fixed_expenses WHERE id=?1 AND user_id=?2"),
            params![id, user_id],
            fixed_expense_from_row,
        )
        .optional()?;
    Ok(f)
}

pub fn update_fixed_expense(conn: &Connection, f: &FixedExpense) -> Result<()> {
    let n = conn.execute(
        "UPDATE fixed_expenses SET name=?1, description=?2, amount=?3, category=?4,
            day_of_month=?5, total_installments=?6
         WHERE id=?7 AND user_id=?8",
        params![
            f.name,
            f.description,
            f.amount.to_string(),
            f.category.slug(),
            f.day_of_month,
            f.total_installments,
            f.id,
            f.user_id,
        ],
    )?;
    if n == 0 {
        return Err(FinanceError::not_found("Fixed expense", f.id));
    }
    Ok(())
}

pub fn deactivate_fixed_expense(conn: &Connection, user_id: &str, id: i64) -> Result<()> {
    let n = conn.execute(
        "UPDATE fixed_expenses SET is_active=0 WHERE id=?1 AND user_id=?2",
        params![id, user_id],
    )?;
    if n == 0 {
        return Err(FinanceError::not_found("Fixed expense", id));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// future_purchases
// ---------------------------------------------------------------------------

pub fn insert_future_purchase(conn: &Connection, user_id: &str, p: &PurchaseDraft) -> Result<i64> {
    conn.execute(
        "INSERT INTO future_purchases(user_id, name, description, estimated_price, priority,
            category, target_date, completed)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0)",
        params![
            user_id,
            p.name,
            p.description,
            p.estimated_price.to_string(),
            p.priority.as_str(),
            p.category.slug(),
            p.target_date,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_future_purchases(conn: &Connection, user_id: &str) -> Result<Vec<FuturePurchase>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PURCHASE_COLUMNS} FROM future_purchases
         WHERE user_id=?1 ORDER BY created_at DESC, id DESC"
    ))?;
    let rows = stmt.query_map(params![user_id], purchase_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn find_future_purchase(conn: &Connection, user_id: &str, id: i64) -> Result<Option<FuturePurchase>> {
    let p = conn
        .query_row(
            &format!("SELECT {PURCHASE_COLUMNS} FROM future_purchases WHERE id=?1 AND user_id=?2"),
            params![id, user_id],
            purchase_from_row,
        )
        .optional()?;
    Ok(p)
}

pub fn update_future_purchase(conn: &Connection, p: &FuturePurchase) -> Result<()> {
    let n = conn.execute(
        "UPDATE future_purchases SET name=?1, description=?2, estimated_price=?3, priority=?4,
            category=?5, target_date=?6, completed=?7
         WHERE id=?8 AND user_id=?9",
        params![
            p.name,
            p.description,
            p.estimated_price.to_string(),
            p.priority.as_str(),
            p.category.slug(),
            p.target_date,
            p.completed,
            p.id,
            p.user_id,
        ],
    )?;
    if n == 0 {
        return Err(FinanceError::not_found("Future purchase", p.id));
    }
    Ok(())
}

pub fn delete_future_purchase(conn: &Connection, user_id: &str, id: i64) -> Result<()> {
    let n = conn.execute(
        "DELETE FROM future_purchases WHERE id=?1 AND user_id=?2",
        params![id, user_id],
    )?;
    if n == 0 {
        return Err(FinanceError::not_found("Future purchase", id));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// profiles
// ---------------------------------------------------------------------------

pub fn insert_profile(conn: &Connection, full_name: &str) -> Result<Profile> {
    let name = full_name.trim();
    if name.is_empty() {
        return Err(FinanceError::MissingField("name"));
    }
    let id = Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO profiles(id, full_name) VALUES (?1, ?2)",
        params![id, name],
    )?;
    find_profile(conn, &id)?.ok_or_else(|| FinanceError::not_found("Profile", &id))
}

/// Looks a profile up by id or by full name.
pub fn find_profile(conn: &Connection, key: &str) -> Result<Option<Profile>> {
    let p = conn
        .query_row(
            "SELECT id, full_name, created_at FROM profiles WHERE id=?1 OR full_name=?1",
            params![key.trim()],
            |r| {
                Ok(Profile {
                    id: r.get(0)?,
                    full_name: r.get(1)?,
                    created_at: r.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(p)
}

pub fn list_profiles(conn: &Connection) -> Result<Vec<Profile>> {
    let mut stmt = conn.prepare("SELECT id, full_name, created_at FROM profiles ORDER BY full_name")?;
    let rows = stmt.query_map([], |r| {
        Ok(Profile {
            id: r.get(0)?,
            full_name: r.get(1)?,
            created_at: r.get(2)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
