// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, NaiveDate};
use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::error::{FinanceError, Result};
use crate::models::{
    validate_amount, Category, ExpenseType, FixedExpense, NewTransaction, TransactionType,
};
use crate::repo;
use crate::session::Session;
use crate::utils::{sum_amounts, ymd_clamped};

/// Input for a recurring monthly obligation.
#[derive(Debug, Clone)]
pub struct FixedExpensePlan {
    pub name: String,
    pub description: Option<String>,
    pub total_amount: Decimal,
    pub months_count: u32,
    pub category: Category,
    pub day_of_month: u32,
}

impl FixedExpensePlan {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(FinanceError::MissingField("name"));
        }
        validate_amount(self.total_amount)?;
        if self.months_count < 1 {
            return Err(FinanceError::InvalidMonthCount(self.months_count));
        }
        if !(1..=31).contains(&self.day_of_month) {
            return Err(FinanceError::InvalidDayOfMonth(self.day_of_month));
        }
        Ok(())
    }

    pub fn monthly_amount(&self) -> Decimal {
        self.total_amount / Decimal::from(self.months_count)
    }
}

/// One expense per month starting at `today`'s month, each due on the plan's
/// day (clamped to the month end) and linked back to `fixed_expense_id`.
pub fn materialize(
    plan: &FixedExpensePlan,
    fixed_expense_id: i64,
    today: NaiveDate,
) -> Result<Vec<NewTransaction>> {
    plan.validate()?;
    let amount = plan.monthly_amount();
    let n = plan.months_count;

    (0..n)
        .map(|i| -> Result<NewTransaction> {
            let due = ymd_clamped(today.year(), today.month(), i as i32, plan.day_of_month)?;
            Ok(NewTransaction {
                r#type: TransactionType::Expense,
                category: plan.category.clone(),
                amount,
                description: format!("{} ({}/{})", plan.name, i + 1, n),
                date: due,
                is_credit: false,
                credit_card: None,
                installments: None,
                current_installment: None,
                installment_group_id: None,
                due_date: Some(due),
                expense_type: Some(ExpenseType::Fixed),
                is_paid: false,
                fixed_expense_id: Some(fixed_expense_id),
            })
        })
        .collect()
}

/// Persists the template and its materialized months in one database
/// transaction, so a failure leaves neither behind. Returns the template id
/// and the transaction ids.
pub fn create(
    conn: &mut Connection,
    session: &Session,
    plan: &FixedExpensePlan,
    today: NaiveDate,
) -> Result<(i64, Vec<i64>)> {
    plan.validate()?;
    let user = session.require_user()?;

    let tx = conn.transaction()?;
    let fixed_id = repo::insert_fixed_expense(&tx, user, plan).inspect_err(|e| {
        tracing::error!(name = %plan.name, error = %e, "failed to add fixed expense");
    })?;
    let drafts = materialize(plan, fixed_id, today)?;
    let mut ids = Vec::with_capacity(drafts.len());
    for d in &drafts {
        ids.push(repo::insert_transaction(&tx, user, d).inspect_err(|e| {
            tracing::error!(fixed_id, error = %e, "failed to add fixed expense transactions");
        })?);
    }
    tx.commit()?;

    tracing::info!(fixed_id, months = ids.len(), "fixed expense added");
    Ok((fixed_id, ids))
}

/// Active templates, earliest day of month first.
pub fn list_active(conn: &Connection, session: &Session) -> Result<Vec<FixedExpense>> {
    match session.user_id() {
        Some(user) => repo::list_active_fixed_expenses(conn, user),
        None => Ok(Vec::new()),
    }
}

#[derive(Debug, Clone, Default)]
pub struct FixedExpenseUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub category: Option<Category>,
    pub day_of_month: Option<u32>,
    pub total_installments: Option<u32>,
}

/// Edits the template only; transactions already generated stay as they are.
pub fn update(
    conn: &Connection,
    session: &Session,
    id: i64,
    changes: &FixedExpenseUpdate,
) -> Result<FixedExpense> {
    let user = session.require_user()?;
    let mut f = repo::find_fixed_expense(conn, user, id)?
        .ok_or_else(|| FinanceError::not_found("Fixed expense", id))?;
    if let Some(n) = &changes.name {
        f.name = n.clone();
    }
    if let Some(d) = &changes.description {
        f.description = Some(d.clone());
    }
    if let Some(a) = changes.amount {
        f.amount = a;
    }
    if let Some(c) = &changes.category {
        f.category = c.clone();
    }
    if let Some(day) = changes.day_of_month {
        f.day_of_month = day;
    }
    if let Some(n) = changes.total_installments {
        f.total_installments = n;
    }

    FixedExpensePlan {
        name: f.name.clone(),
        description: f.description.clone(),
        total_amount: f.amount,
        months_count: f.total_installments,
        category: f.category.clone(),
        day_of_month: f.day_of_month,
    }
    .validate()?;

    repo::update_fixed_expense(conn, &f)?;
    Ok(f)
}

/// Soft delete: the template is hidden, its transactions are kept.
pub fn deactivate(conn: &Connection, session: &Session, id: i64) -> Result<()> {
    let user = session.require_user()?;
    repo::deactivate_fixed_expense(conn, user, id)?;
    tracing::info!(id, "fixed expense deactivated");
    Ok(())
}

pub fn total_amount(expenses: &[FixedExpense]) -> Decimal {
    sum_amounts(expenses.iter().map(|e| e.amount))
}
