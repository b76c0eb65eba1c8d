// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::FinanceError;

/// Largest amount accepted for a single record, in reais.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

/// Amounts must be positive and at most [`MAX_AMOUNT`].
pub fn validate_amount(amount: Decimal) -> Result<(), FinanceError> {
    if amount <= Decimal::ZERO {
        return Err(FinanceError::NonPositiveAmount(amount));
    }
    if amount > Decimal::from(MAX_AMOUNT) {
        return Err(FinanceError::AmountTooLarge(amount));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(FinanceError::UnknownTransactionType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseType {
    Normal,
    Fixed,
    Installment,
}

impl ExpenseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseType::Normal => "normal",
            ExpenseType::Fixed => "fixed",
            ExpenseType::Installment => "installment",
        }
    }
}

impl FromStr for ExpenseType {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(ExpenseType::Normal),
            "fixed" => Ok(ExpenseType::Fixed),
            "installment" => Ok(ExpenseType::Installment),
            other => Err(FinanceError::UnknownExpenseType(other.to_string())),
        }
    }
}

/// Standard categories plus any user-defined label.
///
/// Serialized as its slug (`"other-income"`, `"food"`, ...); unknown slugs
/// round-trip through [`Category::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Category {
    Salary,
    Freelance,
    Investment,
    OtherIncome,
    Food,
    Transport,
    Housing,
    Entertainment,
    Health,
    Education,
    Shopping,
    Bills,
    OtherExpense,
    Custom(String),
}

impl Category {
    pub const INCOME: [Category; 4] = [
        Category::Salary,
        Category::Freelance,
        Category::Investment,
        Category::OtherIncome,
    ];

    pub const EXPENSE: [Category; 9] = [
        Category::Food,
        Category::Transport,
        Category::Housing,
        Category::Entertainment,
        Category::Health,
        Category::Education,
        Category::Shopping,
        Category::Bills,
        Category::OtherExpense,
    ];

    pub fn slug(&self) -> &str {
        match self {
            Category::Salary => "salary",
            Category::Freelance => "freelance",
            Category::Investment => "investment",
            Category::OtherIncome => "other-income",
            Category::Food => "food",
            Category::Transport => "transport",
            Category::Housing => "housing",
            Category::Entertainment => "entertainment",
            Category::Health => "health",
            Category::Education => "education",
            Category::Shopping => "shopping",
            Category::Bills => "bills",
            Category::OtherExpense => "other-expense",
            Category::Custom(name) => name,
        }
    }

    /// Display label (pt-BR). Custom categories show their own name.
    pub fn label(&self) -> &str {
        match self {
            Category::Salary => "Salário",
            Category::Freelance => "Freelance",
            Category::Investment => "Investimento",
            Category::OtherIncome => "Outras Receitas",
            Category::Food => "Alimentação",
            Category::Transport => "Transporte",
            Category::Housing => "Moradia",
            Category::Entertainment => "Entretenimento",
            Category::Health => "Saúde",
            Category::Education => "Educação",
            Category::Shopping => "Compras",
            Category::Bills => "Contas",
            Category::OtherExpense => "Outras Despesas",
            Category::Custom(name) => name,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Category::Salary => "#10b981",
            Category::Freelance => "#14b8a6",
            Category::Investment => "#06b6d4",
            Category::OtherIncome => "#22d3ee",
            Category::Food => "#f97316",
            Category::Transport => "#3b82f6",
            Category::Housing => "#8b5cf6",
            Category::Entertainment => "#ec4899",
            Category::Health => "#ef4444",
            Category::Education => "#f59e0b",
            Category::Shopping => "#a855f7",
            Category::Bills => "#f43f5e",
            Category::OtherExpense | Category::Custom(_) => "#64748b",
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Category::Custom(_))
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        let slug = s.trim();
        Category::INCOME
            .iter()
            .chain(Category::EXPENSE.iter())
            .find(|c| c.slug() == slug)
            .cloned()
            .unwrap_or_else(|| Category::Custom(slug.to_string()))
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        Category::from(s.as_str())
    }
}

impl From<Category> for String {
    fn from(c: Category) -> Self {
        c.slug().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Baixa",
            Priority::Medium => "Média",
            Priority::High => "Alta",
            Priority::Urgent => "Urgente",
        }
    }

    /// Position in the display order `urgent, high, medium, low`.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Urgent => 0,
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }
}

impl FromStr for Priority {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "urgent" => Ok(Priority::Urgent),
            other => Err(FinanceError::UnknownPriority(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub user_id: String,
    pub r#type: TransactionType,
    pub category: Category,
    pub amount: Decimal,
    pub description: String,
    pub date: NaiveDate,
    pub created_at: Option<String>,
    pub is_credit: bool,
    pub credit_card: Option<String>,
    pub installments: Option<u32>,
    pub current_installment: Option<u32>,
    pub installment_group_id: Option<Uuid>,
    pub due_date: Option<NaiveDate>,
    pub expense_type: Option<ExpenseType>,
    pub is_paid: bool,
    pub fixed_expense_id: Option<i64>,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.r#type == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.r#type == TransactionType::Expense
    }

    pub fn is_fixed(&self) -> bool {
        self.expense_type == Some(ExpenseType::Fixed)
    }
}

/// A transaction that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub r#type: TransactionType,
    pub category: Category,
    pub amount: Decimal,
    pub description: String,
    pub date: NaiveDate,
    pub is_credit: bool,
    pub credit_card: Option<String>,
    pub installments: Option<u32>,
    pub current_installment: Option<u32>,
    pub installment_group_id: Option<Uuid>,
    pub due_date: Option<NaiveDate>,
    pub expense_type: Option<ExpenseType>,
    pub is_paid: bool,
    pub fixed_expense_id: Option<i64>,
}

impl NewTransaction {
    pub fn new(
        r#type: TransactionType,
        category: Category,
        amount: Decimal,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            r#type,
            category,
            amount,
            description: description.into(),
            date,
            is_credit: false,
            credit_card: None,
            installments: None,
            current_installment: None,
            installment_group_id: None,
            due_date: None,
            expense_type: match r#type {
                TransactionType::Expense => Some(ExpenseType::Normal),
                TransactionType::Income => None,
            },
            is_paid: false,
            fixed_expense_id: None,
        }
    }
}

/// Partial update of a single transaction; `None` leaves the field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    pub r#type: Option<TransactionType>,
    pub category: Option<Category>,
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub is_credit: Option<bool>,
    pub credit_card: Option<String>,
    pub is_paid: Option<bool>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        *self == TransactionPatch::default()
    }

    pub fn apply(&self, tx: &mut Transaction) {
        if let Some(t) = self.r#type {
            tx.r#type = t;
        }
        if let Some(c) = &self.category {
            tx.category = c.clone();
        }
        if let Some(a) = self.amount {
            tx.amount = a;
        }
        if let Some(d) = &self.description {
            tx.description = d.clone();
        }
        if let Some(d) = self.date {
            tx.date = d;
        }
        if let Some(c) = self.is_credit {
            tx.is_credit = c;
        }
        if let Some(card) = &self.credit_card {
            tx.credit_card = Some(card.clone());
        }
        if let Some(p) = self.is_paid {
            tx.is_paid = p;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedExpense {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub amount: Decimal,
    pub category: Category,
    pub day_of_month: u32,
    pub is_active: bool,
    pub total_installments: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuturePurchase {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub estimated_price: Decimal,
    pub priority: Priority,
    pub category: Category,
    pub target_date: Option<NaiveDate>,
    pub created_at: Option<String>,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub full_name: String,
    pub created_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_slug_round_trip() {
        for c in Category::INCOME.iter().chain(Category::EXPENSE.iter()) {
            assert_eq!(&Category::from(c.slug()), c);
        }
        assert_eq!(
            Category::from("Pets"),
            Category::Custom("Pets".to_string())
        );
    }

    #[test]
    fn transaction_json_uses_camel_case() {
        let tx = Transaction {
            id: 7,
            user_id: "u1".into(),
            r#type: TransactionType::Expense,
            category: Category::Food,
            amount: Decimal::new(1250, 2),
            description: "Mercado".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            created_at: None,
            is_credit: true,
            credit_card: Some("Nubank".into()),
            installments: Some(3),
            current_installment: Some(1),
            installment_group_id: None,
            due_date: None,
            expense_type: Some(ExpenseType::Installment),
            is_paid: false,
            fixed_expense_id: None,
        };
        let v = serde_json::to_value(&tx).unwrap();
        assert_eq!(v["type"], "expense");
        assert_eq!(v["category"], "food");
        assert_eq!(v["isCredit"], true);
        assert_eq!(v["creditCard"], "Nubank");
        assert_eq!(v["currentInstallment"], 1);
        assert_eq!(v["expenseType"], "installment");
        assert!(v.get("is_credit").is_none());
    }

    #[test]
    fn priority_order_is_urgent_first() {
        let mut ps = vec![Priority::Low, Priority::Urgent, Priority::Medium, Priority::High];
        ps.sort_by_key(|p| p.rank());
        assert_eq!(
            ps,
            vec![Priority::Urgent, Priority::High, Priority::Medium, Priority::Low]
        );
    }
}
