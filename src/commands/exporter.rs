// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;

use anyhow::{bail, Result};
use rusqlite::Connection;

use super::required;
use crate::models::Transaction;
use crate::session::Session;
use crate::store::TransactionStore;
use crate::utils::parse_month;

pub fn handle(conn: &Connection, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, session, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = required(sub, "format")?.to_lowercase();
    let out = required(sub, "out")?;

    let store = TransactionStore::load(conn, session.clone())?;
    let mut txs: Vec<&Transaction> = match sub.get_one::<String>("month") {
        Some(month) => {
            let (y, m) = parse_month(month)?;
            store.by_month(y, m)
        }
        None => store.transactions().iter().collect(),
    };
    // Oldest first in files.
    txs.reverse();

    let n = write_transactions(&txs, &fmt, Path::new(out))?;
    println!("Exported {} transactions to {}", n, out);
    Ok(())
}

/// Writes `txs` as CSV or a pretty JSON array. Returns the record count.
pub fn write_transactions(txs: &[&Transaction], fmt: &str, out: &Path) -> Result<usize> {
    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "id",
                "date",
                "type",
                "category",
                "description",
                "amount",
                "is_credit",
                "credit_card",
                "installment",
                "installments",
                "installment_group_id",
                "expense_type",
                "due_date",
                "is_paid",
                "fixed_expense_id",
            ])?;
            for t in txs {
                wtr.write_record([
                    t.id.to_string(),
                    t.date.to_string(),
                    t.r#type.to_string(),
                    t.category.slug().to_string(),
                    t.description.clone(),
                    t.amount.to_string(),
                    t.is_credit.to_string(),
                    t.credit_card.clone().unwrap_or_default(),
                    opt(t.current_installment),
                    opt(t.installments),
                    opt(t.installment_group_id),
                    t.expense_type.map(|e| e.as_str().to_string()).unwrap_or_default(),
                    opt(t.due_date),
                    t.is_paid.to_string(),
                    opt(t.fixed_expense_id),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(txs)?)?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    tracing::info!(count = txs.len(), format = fmt, path = %out.display(), "transactions exported");
    Ok(txs.len())
}

fn opt<T: ToString>(v: Option<T>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}
