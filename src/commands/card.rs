// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rust_decimal::Decimal;
use rusqlite::Connection;
use serde::Serialize;

use super::today;
use crate::billing::{BillingCycle, BillingDay};
use crate::config::LocalStorage;
use crate::models::Transaction;
use crate::session::Session;
use crate::store::TransactionStore;
use crate::utils::{fmt_brl, maybe_print_json, parse_date, pretty_table, sum_amounts};

pub fn handle(
    conn: &Connection,
    storage: &mut LocalStorage,
    session: &Session,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => {
            println!("Card billing day: {}", storage.billing_day());
        }
        Some(("set-day", sub)) => {
            let day = BillingDay::new(*sub.get_one::<u32>("day").unwrap_or(&0))?;
            storage.set_billing_day(day)?;
            println!("Card billing day set to {}", day);
        }
        Some(("cycle", sub)) => cycle(conn, storage, session, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
struct CycleView<'a> {
    cycle: BillingCycle,
    total: Decimal,
    transactions: Vec<&'a Transaction>,
}

fn cycle(
    conn: &Connection,
    storage: &LocalStorage,
    session: &Session,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let reference = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => today(),
    };
    let store = TransactionStore::load(conn, session.clone())?;
    let (cycle, transactions) = store.cycle_expenses(reference, storage.billing_day())?;
    let view = CycleView {
        cycle,
        total: sum_amounts(transactions.iter().map(|t| t.amount)),
        transactions,
    };

    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &view)? {
        let rows: Vec<Vec<String>> = view
            .transactions
            .iter()
            .map(|t| {
                let installment = match (t.current_installment, t.installments) {
                    (Some(c), Some(n)) if n > 1 => format!("{}/{}", c, n),
                    _ => String::new(),
                };
                vec![
                    t.date.to_string(),
                    t.description.clone(),
                    t.category.label().to_string(),
                    installment,
                    fmt_brl(&t.amount),
                ]
            })
            .collect();
        println!("Statement {}", view.cycle);
        println!(
            "{}",
            pretty_table(&["Date", "Description", "Category", "Installment", "Amount"], rows)
        );
        println!("Statement total: {}", fmt_brl(&view.total));
    }
    Ok(())
}
