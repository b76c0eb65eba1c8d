// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FinanceError {
    #[error("Not signed in: run `carteira profile use <name>` first")]
    NotAuthenticated,

    #[error("Amount must be greater than zero (got {0})")]
    NonPositiveAmount(rust_decimal::Decimal),

    #[error("Amount exceeds the maximum of {max} (got {0})", max = crate::models::MAX_AMOUNT)]
    AmountTooLarge(rust_decimal::Decimal),

    #[error("Installment count must be at least 1 (got {0})")]
    InvalidInstallmentCount(u32),

    #[error("Month count must be at least 1 (got {0})")]
    InvalidMonthCount(u32),

    #[error("Billing day must be between 1 and 31 (got {0})")]
    InvalidBillingDay(u32),

    #[error("Day of month must be between 1 and 31 (got {0})")]
    InvalidDayOfMonth(u32),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Unknown transaction type '{0}' (use income|expense)")]
    UnknownTransactionType(String),

    #[error("Unknown expense type '{0}' (use normal|fixed|installment)")]
    UnknownExpenseType(String),

    #[error("Unknown priority '{0}' (use low|medium|high|urgent)")]
    UnknownPriority(String),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Date out of range: {0}")]
    DateOutOfRange(String),

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl FinanceError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        FinanceError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FinanceError>;
