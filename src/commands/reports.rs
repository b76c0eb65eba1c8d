// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use super::{month_or_current, required, today};
use crate::models::TransactionType;
use crate::session::Session;
use crate::stats::{analyze, category_stats, monthly_stats, monthly_trend};
use crate::store::TransactionStore;
use crate::utils::{fmt_brl, fmt_percent, maybe_print_json, pretty_table};

pub fn handle(conn: &Connection, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    let store = TransactionStore::load(conn, session.clone())?;
    match m.subcommand() {
        Some(("summary", sub)) => summary(&store, sub)?,
        Some(("categories", sub)) => categories(&store, sub)?,
        Some(("trend", sub)) => trend(&store, sub)?,
        Some(("analysis", sub)) => analysis(&store, sub)?,
        _ => {}
    }
    Ok(())
}

fn summary(store: &TransactionStore, sub: &clap::ArgMatches) -> Result<()> {
    let (y, m) = month_or_current(sub)?;
    let stats = monthly_stats(store.by_month(y, m));
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &stats)? {
        let rows = vec![
            vec!["Income".to_string(), fmt_brl(&stats.total_income)],
            vec!["Expenses".to_string(), fmt_brl(&stats.total_expenses)],
            vec!["Balance".to_string(), fmt_brl(&stats.balance)],
            vec!["Transactions".to_string(), stats.transaction_count.to_string()],
        ];
        let header = format!("{:04}-{:02}", y, m);
        println!("{}", pretty_table(&[header.as_str(), ""], rows));
    }
    Ok(())
}

fn categories(store: &TransactionStore, sub: &clap::ArgMatches) -> Result<()> {
    let (y, m) = month_or_current(sub)?;
    let kind: TransactionType = required(sub, "type")?.parse()?;
    let data = category_stats(store.by_month(y, m), kind);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|c| {
                vec![
                    c.category.label().to_string(),
                    fmt_brl(&c.amount),
                    fmt_percent(&c.percentage),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Category", "Amount", "Share"], rows));
    }
    Ok(())
}

fn trend(store: &TransactionStore, sub: &clap::ArgMatches) -> Result<()> {
    let months = *sub.get_one::<u32>("months").unwrap_or(&6);
    let data = monthly_trend(store.transactions(), today(), months);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|p| {
                vec![
                    p.month.clone(),
                    fmt_brl(&p.income),
                    fmt_brl(&p.expenses),
                    fmt_brl(&p.balance),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Month", "Income", "Expenses", "Balance"], rows)
        );
    }
    Ok(())
}

fn analysis(store: &TransactionStore, sub: &clap::ArgMatches) -> Result<()> {
    let (y, m) = month_or_current(sub)?;
    let month = store.by_month(y, m);
    let stats = monthly_stats(month.iter().copied());
    let expenses = category_stats(month.iter().copied(), TransactionType::Expense);
    let income = category_stats(month.iter().copied(), TransactionType::Income);
    let report = analyze(&stats, &expenses, &income);

    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        println!("Savings rate: {}", fmt_percent(&report.savings_rate));
        println!("Expense rate: {}", fmt_percent(&report.expense_rate));
        if let Some(top) = &report.top_expense {
            println!(
                "Top expense: {} ({}, {})",
                top.category.label(),
                fmt_brl(&top.amount),
                fmt_percent(&top.percentage)
            );
        }
        if let Some(top) = &report.top_income {
            println!(
                "Top income: {} ({}, {})",
                top.category.label(),
                fmt_brl(&top.amount),
                fmt_percent(&top.percentage)
            );
        }
        let rows: Vec<Vec<String>> = report
            .insights
            .iter()
            .map(|i| {
                vec![
                    format!("{:?}", i.kind).to_lowercase(),
                    i.title.clone(),
                    i.text.clone(),
                ]
            })
            .collect();
        if !rows.is_empty() {
            println!("{}", pretty_table(&["Kind", "Insight", "Detail"], rows));
        }
    }
    Ok(())
}
