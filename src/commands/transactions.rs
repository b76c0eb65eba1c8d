// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{bail, Result};
use rusqlite::Connection;

use super::{required, today};
use crate::models::{Category, NewTransaction, Transaction, TransactionPatch, TransactionType};
use crate::session::Session;
use crate::store::TransactionStore;
use crate::utils::{fmt_brl, maybe_print_json, parse_date, parse_decimal, parse_month, pretty_table};

pub fn handle(conn: &mut Connection, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    let mut store = TransactionStore::load(conn, session.clone())?;
    match m.subcommand() {
        Some(("add", sub)) => add(conn, &mut store, sub)?,
        Some(("list", sub)) => list(&store, sub)?,
        Some(("edit", sub)) => edit(conn, &mut store, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap_or(&0);
            let removed = store.delete(conn, id)?;
            println!("Deleted {} transaction(s)", removed);
        }
        Some(("sample", _)) => {
            let n = store.load_sample(conn, today())?;
            println!("Loaded {} sample transactions", n);
        }
        Some(("clear", sub)) => {
            if !sub.get_flag("yes") {
                bail!("Refusing to delete every transaction without --yes");
            }
            let n = store.clear_all(conn)?;
            println!("Deleted {} transaction(s)", n);
        }
        _ => {}
    }
    Ok(())
}

/// Builds the draft described by `tx add` arguments.
pub fn draft_from_args(sub: &clap::ArgMatches) -> Result<NewTransaction> {
    let kind: TransactionType = required(sub, "type")?.parse()?;
    let amount = parse_decimal(required(sub, "amount")?)?;
    let category = Category::from(required(sub, "category")?);
    let description = required(sub, "description")?;
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => today(),
    };
    let credit = sub.get_flag("credit");
    let installments = *sub.get_one::<u32>("installments").unwrap_or(&1);
    if installments > 1 && !credit {
        bail!("--installments requires --credit");
    }

    let mut draft = NewTransaction::new(kind, category, amount, description, date);
    if credit {
        draft.is_credit = true;
        draft.credit_card = sub.get_one::<String>("card").cloned();
        draft.installments = Some(installments);
    }
    Ok(draft)
}

fn add(conn: &mut Connection, store: &mut TransactionStore, sub: &clap::ArgMatches) -> Result<()> {
    let draft = draft_from_args(sub)?;
    let (amount, date) = (draft.amount, draft.date);
    let ids = store.add(conn, draft)?;
    if ids.len() > 1 {
        println!(
            "Recorded {} in {} installments starting {} (ids {}..={})",
            fmt_brl(&amount),
            ids.len(),
            date,
            ids[0],
            ids[ids.len() - 1]
        );
    } else {
        println!("Recorded {} on {}", fmt_brl(&amount), date);
    }
    Ok(())
}

fn list(store: &TransactionStore, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(store, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data.iter().map(|t| row(t)).collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Type", "Category", "Description", "Amount", "Installment", "Card"],
                rows,
            )
        );
    }
    Ok(())
}

fn row(t: &Transaction) -> Vec<String> {
    let installment = match (t.current_installment, t.installments) {
        (Some(c), Some(n)) if n > 1 => format!("{}/{}", c, n),
        _ => String::new(),
    };
    vec![
        t.id.to_string(),
        t.date.to_string(),
        t.r#type.to_string(),
        t.category.label().to_string(),
        t.description.clone(),
        fmt_brl(&t.amount),
        installment,
        t.credit_card.clone().unwrap_or_default(),
    ]
}

/// Applies the `tx list` filters to the cached transactions, newest first.
pub fn query_rows<'a>(
    store: &'a TransactionStore,
    sub: &clap::ArgMatches,
) -> Result<Vec<&'a Transaction>> {
    let mut data: Vec<&Transaction> = match sub.get_one::<String>("month") {
        Some(month) => {
            let (y, m) = parse_month(month)?;
            store.by_month(y, m)
        }
        None => store.transactions().iter().collect(),
    };
    if let Some(kind) = sub.get_one::<String>("type") {
        let kind: TransactionType = kind.parse()?;
        data.retain(|t| t.r#type == kind);
    }
    if let Some(limit) = sub.get_one::<usize>("limit") {
        data.truncate(*limit);
    }
    Ok(data)
}

fn edit(conn: &Connection, store: &mut TransactionStore, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap_or(&0);
    let patch = TransactionPatch {
        r#type: sub
            .get_one::<String>("type")
            .map(|s| s.parse())
            .transpose()?,
        category: sub.get_one::<String>("category").map(|s| Category::from(s.as_str())),
        amount: sub
            .get_one::<String>("amount")
            .map(|s| parse_decimal(s))
            .transpose()?,
        description: sub.get_one::<String>("description").cloned(),
        date: sub
            .get_one::<String>("date")
            .map(|s| parse_date(s))
            .transpose()?,
        credit_card: sub.get_one::<String>("card").cloned(),
        ..Default::default()
    };
    if patch.is_empty() {
        bail!("Nothing to update");
    }
    store.update(conn, id, &patch)?;
    println!("Updated transaction {}", id);
    Ok(())
}
