// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Category, Transaction, TransactionType};
use crate::utils::{fmt_brl, month_key, ymd_clamped};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStats {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub balance: Decimal,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStats {
    pub category: Category,
    pub amount: Decimal,
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub month: String,
    pub income: Decimal,
    pub expenses: Decimal,
    pub balance: Decimal,
}

pub fn monthly_stats<'a, I>(txs: I) -> MonthlyStats
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut stats = MonthlyStats::default();
    for t in txs {
        match t.r#type {
            TransactionType::Income => {
                stats.total_income = stats.total_income.saturating_add(t.amount)
            }
            TransactionType::Expense => {
                stats.total_expenses = stats.total_expenses.saturating_add(t.amount)
            }
        }
        stats.transaction_count += 1;
    }
    stats.balance = stats.total_income.saturating_sub(stats.total_expenses);
    stats
}

/// Per-category totals for one transaction type, largest first.
pub fn category_stats<'a, I>(txs: I, kind: TransactionType) -> Vec<CategoryStats>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut by_cat: HashMap<Category, Decimal> = HashMap::new();
    let mut total = Decimal::ZERO;
    for t in txs.into_iter().filter(|t| t.r#type == kind) {
        let entry = by_cat.entry(t.category.clone()).or_insert(Decimal::ZERO);
        *entry = entry.saturating_add(t.amount);
        total = total.saturating_add(t.amount);
    }

    let mut items: Vec<CategoryStats> = by_cat
        .into_iter()
        .map(|(category, amount)| CategoryStats {
            category,
            amount,
            percentage: percent_of(amount, total),
        })
        .collect();
    // Stable order for equal amounts.
    items.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.category.cmp(&b.category)));
    items
}

/// Calendar-month window.
pub fn filter_by_month<'a, I>(txs: I, year: i32, month: u32) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    txs.into_iter()
        .filter(|t| t.date.year() == year && t.date.month() == month)
        .collect()
}

/// Income and expenses for the `months` calendar months ending with
/// `today`'s month, oldest first.
pub fn monthly_trend(txs: &[Transaction], today: NaiveDate, months: u32) -> Vec<TrendPoint> {
    let months = i32::try_from(months).unwrap_or(i32::MAX);
    (0..months)
        .rev()
        .filter_map(|back| ymd_clamped(today.year(), today.month(), -back, 1).ok())
        .map(|first| {
            let s = monthly_stats(filter_by_month(txs, first.year(), first.month()));
            TrendPoint {
                month: month_key(first),
                income: s.total_income,
                expenses: s.total_expenses,
                balance: s.balance,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Warning,
    Success,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub savings_rate: Decimal,
    pub expense_rate: Decimal,
    pub top_expense: Option<CategoryStats>,
    pub top_income: Option<CategoryStats>,
    pub insights: Vec<Insight>,
}

/// `part / whole * 100`; zero for an empty whole, saturating when the ratio
/// does not fit in a `Decimal`.
fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let saturated = if part.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    };
    part.checked_div(whole)
        .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(saturated)
}

/// Savings/expense ratios and rule-based advice for one month.
pub fn analyze(
    stats: &MonthlyStats,
    expense_stats: &[CategoryStats],
    income_stats: &[CategoryStats],
) -> Analysis {
    let savings_rate = percent_of(stats.balance, stats.total_income).round_dp(1);
    let expense_rate = percent_of(stats.total_expenses, stats.total_income).round_dp(1);

    let mut insights = Vec::new();
    if stats.balance < Decimal::ZERO {
        insights.push(Insight {
            kind: InsightKind::Warning,
            title: "Negative balance".into(),
            text: format!(
                "Expenses exceeded income by {}. Review your spending.",
                fmt_brl(&stats.balance.abs())
            ),
        });
    } else if savings_rate > Decimal::from(20) {
        insights.push(Insight {
            kind: InsightKind::Success,
            title: "Excellent savings rate".into(),
            text: format!("You are saving {}% of your income. Keep it up!", savings_rate),
        });
    } else if savings_rate < Decimal::from(10) && stats.balance > Decimal::ZERO {
        insights.push(Insight {
            kind: InsightKind::Info,
            title: "Savings opportunity".into(),
            text: format!(
                "Your savings rate is {}%. Aim for at least 20% to build a solid reserve.",
                savings_rate
            ),
        });
    }

    let top_expense = expense_stats.first().cloned();
    if let Some(top) = &top_expense {
        if top.percentage > Decimal::from(40) {
            insights.push(Insight {
                kind: InsightKind::Warning,
                title: "Spending concentration".into(),
                text: format!(
                    "{:.1}% of your expenses are in {}. Consider diversifying or cutting back.",
                    top.percentage,
                    top.category.label()
                ),
            });
        }
    }

    if expense_rate > Decimal::from(90) {
        insights.push(Insight {
            kind: InsightKind::Warning,
            title: "High income commitment".into(),
            text: format!(
                "{}% of your income is being spent. Leave a larger safety margin.",
                expense_rate
            ),
        });
    }

    Analysis {
        savings_rate,
        expense_rate,
        top_expense,
        top_income: income_stats.first().cloned(),
        insights,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewTransaction;

    fn tx(kind: TransactionType, cat: Category, amount: i64, date: NaiveDate) -> Transaction {
        let n = NewTransaction::new(kind, cat, Decimal::new(amount, 0), "t", date);
        Transaction {
            id: 0,
            user_id: "u".into(),
            r#type: n.r#type,
            category: n.category,
            amount: n.amount,
            description: n.description,
            date: n.date,
            created_at: None,
            is_credit: false,
            credit_card: None,
            installments: None,
            current_installment: None,
            installment_group_id: None,
            due_date: None,
            expense_type: n.expense_type,
            is_paid: false,
            fixed_expense_id: None,
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn empty_input_yields_zeroes() {
        let none: Vec<Transaction> = Vec::new();
        let s = monthly_stats(&none);
        assert_eq!(s, MonthlyStats::default());
        assert_eq!(s.balance, s.total_income - s.total_expenses);
        assert!(category_stats(&none, TransactionType::Expense).is_empty());
    }

    #[test]
    fn balance_is_income_minus_expenses() {
        let txs = vec![
            tx(TransactionType::Income, Category::Salary, 5000, d(2024, 1, 5)),
            tx(TransactionType::Expense, Category::Housing, 1200, d(2024, 1, 1)),
            tx(TransactionType::Expense, Category::Food, 450, d(2024, 1, 10)),
        ];
        let s = monthly_stats(&txs);
        assert_eq!(s.total_income, Decimal::new(5000, 0));
        assert_eq!(s.total_expenses, Decimal::new(1650, 0));
        assert_eq!(s.balance, Decimal::new(3350, 0));
        assert_eq!(s.transaction_count, 3);
    }

    #[test]
    fn category_percentages_sum_to_hundred() {
        let txs = vec![
            tx(TransactionType::Expense, Category::Food, 100, d(2024, 1, 1)),
            tx(TransactionType::Expense, Category::Food, 50, d(2024, 1, 2)),
            tx(TransactionType::Expense, Category::Transport, 100, d(2024, 1, 3)),
            tx(TransactionType::Expense, Category::Custom("Pets".into()), 50, d(2024, 1, 4)),
            tx(TransactionType::Income, Category::Salary, 999, d(2024, 1, 4)),
        ];
        let stats = category_stats(&txs, TransactionType::Expense);
        assert_eq!(stats.len(), 3);
        assert_eq!(stats[0].category, Category::Food);
        assert_eq!(stats[0].amount, Decimal::new(150, 0));
        assert_eq!(stats[0].percentage, Decimal::new(50, 0));

        let sum: Decimal = stats.iter().map(|s| s.percentage).sum();
        assert!((sum - Decimal::ONE_HUNDRED).abs() < Decimal::new(1, 10));
        for s in &stats {
            assert!(s.percentage >= Decimal::ZERO && s.percentage <= Decimal::ONE_HUNDRED);
        }
        for w in stats.windows(2) {
            assert!(w[0].amount >= w[1].amount);
        }
    }

    #[test]
    fn trend_covers_trailing_months_oldest_first() {
        let txs = vec![
            tx(TransactionType::Income, Category::Salary, 5000, d(2024, 2, 5)),
            tx(TransactionType::Expense, Category::Food, 300, d(2023, 12, 5)),
            tx(TransactionType::Expense, Category::Food, 999, d(2023, 8, 5)),
        ];
        let trend = monthly_trend(&txs, d(2024, 2, 20), 6);
        let months: Vec<&str> = trend.iter().map(|p| p.month.as_str()).collect();
        assert_eq!(
            months,
            vec!["2023-09", "2023-10", "2023-11", "2023-12", "2024-01", "2024-02"]
        );
        assert_eq!(trend[3].expenses, Decimal::new(300, 0));
        assert_eq!(trend[5].income, Decimal::new(5000, 0));
        assert_eq!(trend[5].balance, Decimal::new(5000, 0));
    }

    #[test]
    fn analysis_flags_negative_balance_and_concentration() {
        let txs = vec![
            tx(TransactionType::Income, Category::Salary, 1000, d(2024, 1, 5)),
            tx(TransactionType::Expense, Category::Housing, 1200, d(2024, 1, 1)),
            tx(TransactionType::Expense, Category::Food, 100, d(2024, 1, 1)),
        ];
        let s = monthly_stats(&txs);
        let exp = category_stats(&txs, TransactionType::Expense);
        let inc = category_stats(&txs, TransactionType::Income);
        let a = analyze(&s, &exp, &inc);

        assert_eq!(a.expense_rate, Decimal::new(1300, 1));
        let titles: Vec<&str> = a.insights.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Negative balance", "Spending concentration", "High income commitment"]
        );
        assert_eq!(a.top_income.unwrap().category, Category::Salary);
    }

    #[test]
    fn analysis_praises_high_savings() {
        let txs = vec![
            tx(TransactionType::Income, Category::Salary, 1000, d(2024, 1, 5)),
            tx(TransactionType::Expense, Category::Food, 200, d(2024, 1, 1)),
            tx(TransactionType::Expense, Category::Transport, 200, d(2024, 1, 1)),
            tx(TransactionType::Expense, Category::Bills, 200, d(2024, 1, 1)),
        ];
        let s = monthly_stats(&txs);
        let a = analyze(&s, &category_stats(&txs, TransactionType::Expense), &[]);
        assert_eq!(a.savings_rate, Decimal::new(400, 1));
        assert_eq!(a.insights.len(), 1);
        assert_eq!(a.insights[0].kind, InsightKind::Success);
    }

    #[test]
    fn no_income_means_zero_rates() {
        let s = MonthlyStats::default();
        let a = analyze(&s, &[], &[]);
        assert!(a.savings_rate.is_zero() && a.expense_rate.is_zero());
        assert!(a.insights.is_empty());
    }

    #[test]
    fn huge_amounts_saturate_instead_of_panicking() {
        let mut big = tx(TransactionType::Expense, Category::Food, 0, d(2025, 1, 2));
        big.amount = Decimal::MAX;
        let mut tiny_income = tx(TransactionType::Income, Category::Salary, 0, d(2025, 1, 3));
        tiny_income.amount = Decimal::new(1, 2);
        let txs = vec![big.clone(), big, tiny_income];

        let s = monthly_stats(&txs);
        assert_eq!(s.total_expenses, Decimal::MAX);
        assert_eq!(s.transaction_count, 3);

        let cats = category_stats(&txs, TransactionType::Expense);
        assert_eq!(cats[0].amount, Decimal::MAX);
        assert_eq!(cats[0].percentage, Decimal::ONE_HUNDRED);

        let a = analyze(&s, &cats, &[]);
        assert!(a.expense_rate > Decimal::from(90));
        assert!(a.savings_rate < Decimal::ZERO);
    }

    #[test]
    fn trend_length_follows_requested_months() {
        let today = d(2025, 3, 10);
        assert!(monthly_trend(&[], today, 0).is_empty());
        let trend = monthly_trend(&[], today, 15);
        assert_eq!(trend.len(), 15);
        assert_eq!(trend[0].month, "2024-01");
        assert_eq!(trend[14].month, "2025-03");
    }
}
