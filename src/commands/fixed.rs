// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{bail, Result};
use rust_decimal::Decimal;
use rusqlite::Connection;
use serde::Serialize;

use super::{month_or_current, required, today};
use crate::fixed::{self, FixedExpensePlan, FixedExpenseUpdate};
use crate::models::{Category, Transaction};
use crate::session::Session;
use crate::store::TransactionStore;
use crate::utils::{fmt_brl, maybe_print_json, parse_decimal, pretty_table, sum_amounts};

pub fn handle(conn: &mut Connection, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, session, sub)?,
        Some(("list", sub)) => list(conn, session, sub)?,
        Some(("edit", sub)) => edit(conn, session, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap_or(&0);
            fixed::deactivate(conn, session, id)?;
            println!("Deactivated fixed expense {} (its transactions were kept)", id);
        }
        Some(("pay", sub)) => {
            let id = *sub.get_one::<i64>("tx").unwrap_or(&0);
            let paid = !sub.get_flag("undo");
            let mut store = TransactionStore::load(conn, session.clone())?;
            store.mark_paid(conn, id, paid)?;
            println!(
                "Transaction {} marked as {}",
                id,
                if paid { "paid" } else { "unpaid" }
            );
        }
        Some(("month", sub)) => month(conn, session, sub)?,
        _ => {}
    }
    Ok(())
}

pub fn plan_from_args(sub: &clap::ArgMatches) -> Result<FixedExpensePlan> {
    Ok(FixedExpensePlan {
        name: required(sub, "name")?.to_string(),
        description: sub.get_one::<String>("description").cloned(),
        total_amount: parse_decimal(required(sub, "amount")?)?,
        months_count: *sub.get_one::<u32>("months").unwrap_or(&1),
        category: Category::from(required(sub, "category")?),
        day_of_month: *sub.get_one::<u32>("day").unwrap_or(&1),
    })
}

fn add(conn: &mut Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let plan = plan_from_args(sub)?;
    let (id, tx_ids) = fixed::create(conn, session, &plan, today())?;
    println!(
        "Added fixed expense {} '{}': {} x {}",
        id,
        plan.name,
        tx_ids.len(),
        fmt_brl(&plan.monthly_amount())
    );
    Ok(())
}

fn list(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let data = fixed::list_active(conn, session)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let mut rows: Vec<Vec<String>> = data
            .iter()
            .map(|f| {
                vec![
                    f.id.to_string(),
                    f.name.clone(),
                    f.category.label().to_string(),
                    f.day_of_month.to_string(),
                    f.total_installments.to_string(),
                    fmt_brl(&f.amount),
                ]
            })
            .collect();
        rows.push(vec![
            String::new(),
            "Total".into(),
            String::new(),
            String::new(),
            String::new(),
            fmt_brl(&fixed::total_amount(&data)),
        ]);
        println!(
            "{}",
            pretty_table(&["ID", "Name", "Category", "Day", "Months", "Amount"], rows)
        );
    }
    Ok(())
}

fn edit(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap_or(&0);
    let changes = FixedExpenseUpdate {
        name: sub.get_one::<String>("name").cloned(),
        description: sub.get_one::<String>("description").cloned(),
        amount: sub
            .get_one::<String>("amount")
            .map(|s| parse_decimal(s))
            .transpose()?,
        category: sub.get_one::<String>("category").map(|s| Category::from(s.as_str())),
        day_of_month: sub.get_one::<u32>("day").copied(),
        total_installments: sub.get_one::<u32>("months").copied(),
    };
    if changes.name.is_none()
        && changes.description.is_none()
        && changes.amount.is_none()
        && changes.category.is_none()
        && changes.day_of_month.is_none()
        && changes.total_installments.is_none()
    {
        bail!("Nothing to update");
    }
    let f = fixed::update(conn, session, id, &changes)?;
    println!("Updated fixed expense {} '{}'", f.id, f.name);
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MonthView<'a> {
    month: String,
    total: Decimal,
    paid: Decimal,
    pending: Decimal,
    transactions: Vec<&'a Transaction>,
}

fn month(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let (y, m) = month_or_current(sub)?;
    let store = TransactionStore::load(conn, session.clone())?;
    let txs = store.fixed_for_month(y, m);
    let paid = sum_amounts(txs.iter().filter(|t| t.is_paid).map(|t| t.amount));
    let total = sum_amounts(txs.iter().map(|t| t.amount));
    let view = MonthView {
        month: format!("{:04}-{:02}", y, m),
        total,
        paid,
        pending: total - paid,
        transactions: txs,
    };

    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &view)? {
        let rows: Vec<Vec<String>> = view
            .transactions
            .iter()
            .map(|t| {
                vec![
                    t.id.to_string(),
                    t.due_date.unwrap_or(t.date).to_string(),
                    t.description.clone(),
                    fmt_brl(&t.amount),
                    if t.is_paid { "paid" } else { "pending" }.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Due", "Description", "Amount", "Status"], rows)
        );
        println!(
            "{}: total {} | paid {} | pending {}",
            view.month,
            fmt_brl(&view.total),
            fmt_brl(&view.paid),
            fmt_brl(&view.pending)
        );
    }
    Ok(())
}
