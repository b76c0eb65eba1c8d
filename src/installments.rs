// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Splits a card purchase into one transaction per monthly installment.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{FinanceError, Result};
use crate::models::{validate_amount, Category, ExpenseType, NewTransaction, TransactionType};
use crate::utils::add_months;

#[derive(Debug, Clone)]
pub struct InstallmentPurchase {
    pub r#type: TransactionType,
    pub total_amount: Decimal,
    pub installment_count: u32,
    pub start_date: NaiveDate,
    pub category: Category,
    pub description: String,
    pub card_name: Option<String>,
}

impl InstallmentPurchase {
    pub fn validate(&self) -> Result<()> {
        if self.installment_count < 1 {
            return Err(FinanceError::InvalidInstallmentCount(self.installment_count));
        }
        validate_amount(self.total_amount)?;
        if self.description.trim().is_empty() {
            return Err(FinanceError::MissingField("description"));
        }
        Ok(())
    }

    /// Equal share of the total. The remainder of an inexact division is not
    /// redistributed.
    pub fn installment_amount(&self) -> Decimal {
        self.total_amount / Decimal::from(self.installment_count)
    }
}

/// Materializes the purchase under a freshly generated group id.
pub fn materialize(purchase: &InstallmentPurchase) -> Result<Vec<NewTransaction>> {
    materialize_with_group(purchase, Uuid::new_v4())
}

pub fn materialize_with_group(
    purchase: &InstallmentPurchase,
    group_id: Uuid,
) -> Result<Vec<NewTransaction>> {
    purchase.validate()?;
    let amount = purchase.installment_amount();
    let n = purchase.installment_count;

    (0..n)
        .map(|i| -> Result<NewTransaction> {
            let date = add_months(purchase.start_date, i)?;
            Ok(NewTransaction {
                r#type: purchase.r#type,
                category: purchase.category.clone(),
                amount,
                description: purchase.description.clone(),
                date,
                is_credit: true,
                credit_card: purchase.card_name.clone(),
                installments: Some(n),
                current_installment: Some(i + 1),
                installment_group_id: Some(group_id),
                due_date: None,
                expense_type: Some(ExpenseType::Installment),
                is_paid: false,
                fixed_expense_id: None,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn purchase(total: Decimal, n: u32) -> InstallmentPurchase {
        InstallmentPurchase {
            r#type: TransactionType::Expense,
            total_amount: total,
            installment_count: n,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            category: Category::Shopping,
            description: "Notebook".into(),
            card_name: Some("Nubank".into()),
        }
    }

    #[test]
    fn three_installments_of_one_hundred() {
        let drafts = materialize(&purchase(Decimal::new(300, 0), 3)).unwrap();
        assert_eq!(drafts.len(), 3);

        let dates: Vec<String> = drafts.iter().map(|d| d.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-01-15", "2024-02-15", "2024-03-15"]);

        let group = drafts[0].installment_group_id.unwrap();
        for (i, d) in drafts.iter().enumerate() {
            assert_eq!(d.amount, Decimal::new(100, 0));
            assert_eq!(d.current_installment, Some(i as u32 + 1));
            assert_eq!(d.installments, Some(3));
            assert_eq!(d.installment_group_id, Some(group));
            assert!(d.is_credit);
            assert_eq!(d.expense_type, Some(ExpenseType::Installment));
            assert_eq!(d.credit_card.as_deref(), Some("Nubank"));
        }
    }

    #[test]
    fn positions_are_contiguous_and_amounts_reconcile() {
        let tolerance = Decimal::new(1, 20);
        for n in 1..=24u32 {
            let total = Decimal::new(100, 0);
            let drafts = materialize(&purchase(total, n)).unwrap();
            assert_eq!(drafts.len(), n as usize);

            let positions: Vec<u32> = drafts
                .iter()
                .map(|d| d.current_installment.unwrap())
                .collect();
            assert_eq!(positions, (1..=n).collect::<Vec<_>>());

            let sum: Decimal = drafts.iter().map(|d| d.amount).sum();
            assert!((sum - total).abs() < tolerance, "n={n} sum={sum}");
        }
    }

    #[test]
    fn month_end_start_clamps() {
        let mut p = purchase(Decimal::new(200, 0), 2);
        p.start_date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let drafts = materialize(&p).unwrap();
        assert_eq!(drafts[1].date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn rejects_zero_installments_and_non_positive_totals() {
        assert!(matches!(
            materialize(&purchase(Decimal::new(300, 0), 0)),
            Err(FinanceError::InvalidInstallmentCount(0))
        ));
        assert!(matches!(
            materialize(&purchase(Decimal::ZERO, 3)),
            Err(FinanceError::NonPositiveAmount(_))
        ));
    }

    #[test]
    fn each_call_gets_a_new_group() {
        let p = purchase(Decimal::new(300, 0), 3);
        let a = materialize(&p).unwrap();
        let b = materialize(&p).unwrap();
        assert_ne!(a[0].installment_group_id, b[0].installment_group_id);
    }
}
