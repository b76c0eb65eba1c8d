// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, NaiveDate};
use rusqlite::Connection;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::billing::{BillingCycle, BillingDay};
use crate::error::{FinanceError, Result};
use crate::installments::{self, InstallmentPurchase};
use crate::models::{
    validate_amount, Category, NewTransaction, Transaction, TransactionPatch, TransactionType,
};
use crate::repo;
use crate::session::Session;
use crate::stats::filter_by_month;
use crate::utils::ymd_clamped;

/// Cached view of the signed-in user's transactions.
///
/// Every mutation goes to the database first and then reloads the whole
/// cache; the cache is never patched in place.
#[derive(Debug, Clone)]
pub struct TransactionStore {
    session: Session,
    transactions: Vec<Transaction>,
}

impl TransactionStore {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            transactions: Vec::new(),
        }
    }

    /// Builds a store and loads it.
    pub fn load(conn: &Connection, session: Session) -> Result<Self> {
        let mut store = Self::new(session);
        store.fetch(conn)?;
        Ok(store)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Newest first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn get(&self, id: i64) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    pub fn fetch(&mut self, conn: &Connection) -> Result<()> {
        let Some(user) = self.session.user_id() else {
            self.transactions.clear();
            return Ok(());
        };
        self.transactions = repo::list_transactions(conn, user).inspect_err(|e| {
            tracing::error!(error = %e, "failed to fetch transactions");
        })?;
        tracing::debug!(count = self.transactions.len(), "transactions reloaded");
        Ok(())
    }

    /// Records a transaction. Credit purchases with more than one installment
    /// are expanded into their installment group; anything else is stored as
    /// a single record. Returns the ids of the inserted rows.
    pub fn add(&mut self, conn: &mut Connection, mut draft: NewTransaction) -> Result<Vec<i64>> {
        match draft.installments {
            Some(n) if draft.is_credit && n > 1 => {
                let purchase = InstallmentPurchase {
                    r#type: draft.r#type,
                    total_amount: draft.amount,
                    installment_count: n,
                    start_date: draft.date,
                    category: draft.category,
                    description: draft.description,
                    card_name: draft.credit_card,
                };
                let (_, ids) = self.add_installments(conn, &purchase)?;
                Ok(ids)
            }
            Some(0) => Err(FinanceError::InvalidInstallmentCount(0)),
            _ => {
                validate_amount(draft.amount)?;
                if draft.description.trim().is_empty() {
                    return Err(FinanceError::MissingField("description"));
                }
                // Group membership is only ever assigned by the materializer.
                draft.installment_group_id = None;
                draft.current_installment = None;
                let user = self.session.require_user()?;
                let id = repo::insert_transaction(conn, user, &draft).inspect_err(|e| {
                    tracing::error!(error = %e, "failed to add transaction");
                })?;
                tracing::info!(id, amount = %draft.amount, "transaction added");
                self.fetch(conn)?;
                Ok(vec![id])
            }
        }
    }

    /// Inserts the whole installment group in one database transaction.
    pub fn add_installments(
        &mut self,
        conn: &mut Connection,
        purchase: &InstallmentPurchase,
    ) -> Result<(Uuid, Vec<i64>)> {
        let drafts = installments::materialize(purchase)?;
        let user = self.session.require_user()?;
        let group = drafts
            .first()
            .and_then(|d| d.installment_group_id)
            .ok_or(FinanceError::InvalidInstallmentCount(purchase.installment_count))?;

        let ids = repo::insert_transactions(conn, user, &drafts).inspect_err(|e| {
            tracing::error!(group = %group, error = %e, "failed to add installments");
        })?;
        tracing::info!(group = %group, count = ids.len(), "installment purchase added");
        self.fetch(conn)?;
        Ok((group, ids))
    }

    /// Updates one record only, even when it belongs to an installment group.
    pub fn update(&mut self, conn: &Connection, id: i64, patch: &TransactionPatch) -> Result<()> {
        let user = self.session.require_user()?;
        if let Some(a) = patch.amount {
            validate_amount(a)?;
        }
        if patch.description.as_deref().is_some_and(|d| d.trim().is_empty()) {
            return Err(FinanceError::MissingField("description"));
        }
        let mut tx = repo::find_transaction(conn, user, id)?
            .ok_or_else(|| FinanceError::not_found("Transaction", id))?;
        patch.apply(&mut tx);
        repo::update_transaction(conn, &tx).inspect_err(|e| {
            tracing::error!(id, error = %e, "failed to update transaction");
        })?;
        self.fetch(conn)
    }

    /// Deletes a record; a member of an installment group takes the whole
    /// group with it. Returns the number of rows removed.
    pub fn delete(&mut self, conn: &Connection, id: i64) -> Result<usize> {
        let user = self.session.require_user()?;
        let group = match self.get(id) {
            Some(t) => t.installment_group_id,
            None => repo::find_transaction(conn, user, id)?
                .ok_or_else(|| FinanceError::not_found("Transaction", id))?
                .installment_group_id,
        };

        let removed = match group {
            Some(g) => repo::delete_installment_group(conn, user, g),
            None => repo::delete_transaction(conn, user, id),
        }
        .inspect_err(|e| {
            tracing::error!(id, error = %e, "failed to delete transaction");
        })?;
        tracing::info!(id, removed, "transaction deleted");
        self.fetch(conn)?;
        Ok(removed)
    }

    /// Only fixed-expense transactions carry a paid flag.
    pub fn mark_paid(&mut self, conn: &Connection, id: i64, paid: bool) -> Result<()> {
        let user = self.session.require_user()?;
        let is_fixed = repo::find_transaction(conn, user, id)?.is_some_and(|t| t.is_fixed());
        if !is_fixed {
            return Err(FinanceError::not_found("Fixed expense transaction", id));
        }
        repo::set_transaction_paid(conn, user, id, paid)?;
        self.fetch(conn)
    }

    pub fn clear_all(&mut self, conn: &Connection) -> Result<usize> {
        let user = self.session.require_user()?;
        let removed = repo::delete_all_transactions(conn, user)?;
        tracing::warn!(removed, "all transactions cleared");
        self.transactions.clear();
        Ok(removed)
    }

    /// Inserts the demo data set relative to `today`'s month.
    pub fn load_sample(&mut self, conn: &mut Connection, today: NaiveDate) -> Result<usize> {
        let user = self.session.require_user()?;
        let drafts = sample_transactions(today)?;
        let ids = repo::insert_transactions(conn, user, &drafts)?;
        self.fetch(conn)?;
        Ok(ids.len())
    }

    pub fn by_month(&self, year: i32, month: u32) -> Vec<&Transaction> {
        filter_by_month(&self.transactions, year, month)
    }

    /// Normal and installment expenses inside the card cycle around
    /// `reference`.
    pub fn cycle_expenses(
        &self,
        reference: NaiveDate,
        billing_day: BillingDay,
    ) -> Result<(BillingCycle, Vec<&Transaction>)> {
        let cycle = BillingCycle::resolve(reference, billing_day)?;
        let txs = cycle.filter(
            self.transactions
                .iter()
                .filter(|t| t.is_expense() && !t.is_fixed()),
        );
        Ok((cycle, txs))
    }

    /// Fixed-expense installments falling in a calendar month.
    pub fn fixed_for_month(&self, year: i32, month: u32) -> Vec<&Transaction> {
        filter_by_month(self.transactions.iter().filter(|t| t.is_fixed()), year, month)
    }
}

fn sample_transactions(today: NaiveDate) -> Result<Vec<NewTransaction>> {
    let (y, m) = (today.year(), today.month());
    let rows: [(TransactionType, i64, Category, &str, i32, u32); 12] = [
        (TransactionType::Income, 5000, Category::Salary, "Salário mensal", 0, 5),
        (TransactionType::Income, 1200, Category::Freelance, "Projeto de desenvolvimento web", 0, 15),
        (TransactionType::Income, 300, Category::Investment, "Dividendos", 0, 20),
        (TransactionType::Expense, 1200, Category::Housing, "Aluguel", 0, 1),
        (TransactionType::Expense, 450, Category::Food, "Supermercado", 0, 10),
        (TransactionType::Expense, 200, Category::Transport, "Combustível e manutenção", 0, 12),
        (TransactionType::Expense, 150, Category::Entertainment, "Cinema e restaurantes", 0, 18),
        (TransactionType::Expense, 100, Category::Health, "Farmácia", 0, 8),
        (TransactionType::Expense, 80, Category::Education, "Curso online", 0, 14),
        (TransactionType::Income, 5000, Category::Salary, "Salário mensal", -1, 5),
        (TransactionType::Expense, 1200, Category::Housing, "Aluguel", -1, 1),
        (TransactionType::Expense, 500, Category::Food, "Supermercado", -1, 10),
    ];
    rows.into_iter()
        .map(|(kind, amount, category, description, offset, day)| -> Result<NewTransaction> {
            let date = ymd_clamped(y, m, offset, day)?;
            Ok(NewTransaction::new(
                kind,
                category,
                Decimal::new(amount, 0),
                description,
                date,
            ))
        })
        .collect()
}
