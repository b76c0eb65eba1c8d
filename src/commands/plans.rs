// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use super::required;
use crate::models::{Category, Priority};
use crate::purchases::{self, PurchaseDraft, PurchaseFilter, PurchaseUpdate, Status};
use crate::session::Session;
use crate::utils::{fmt_brl, maybe_print_json, parse_date, parse_decimal, pretty_table};

pub fn handle(conn: &Connection, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let draft = PurchaseDraft {
                name: required(sub, "name")?.to_string(),
                description: sub.get_one::<String>("description").cloned().unwrap_or_default(),
                estimated_price: parse_decimal(required(sub, "price")?)?,
                priority: required(sub, "priority")?.parse()?,
                category: Category::from(required(sub, "category")?),
                target_date: sub
                    .get_one::<String>("target-date")
                    .map(|s| parse_date(s))
                    .transpose()?,
            };
            let id = purchases::add(conn, session, &draft)?;
            println!("Planned purchase {} '{}' ({})", id, draft.name, fmt_brl(&draft.estimated_price));
        }
        Some(("list", sub)) => list(conn, session, sub)?,
        Some(("done", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap_or(&0);
            let completed = purchases::toggle_completed(conn, session, id)?;
            println!(
                "Purchase {} is now {}",
                id,
                if completed { "completed" } else { "pending" }
            );
        }
        Some(("edit", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap_or(&0);
            let changes = PurchaseUpdate {
                name: sub.get_one::<String>("name").cloned(),
                description: sub.get_one::<String>("description").cloned(),
                estimated_price: sub
                    .get_one::<String>("price")
                    .map(|s| parse_decimal(s))
                    .transpose()?,
                priority: sub
                    .get_one::<String>("priority")
                    .map(|s| s.parse::<Priority>())
                    .transpose()?,
                category: sub.get_one::<String>("category").map(|s| Category::from(s.as_str())),
                target_date: sub
                    .get_one::<String>("target-date")
                    .map(|s| parse_date(s))
                    .transpose()?,
                clear_target_date: sub.get_flag("no-target-date"),
            };
            let p = purchases::update(conn, session, id, &changes)?;
            println!("Updated purchase {} '{}'", p.id, p.name);
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap_or(&0);
            purchases::delete(conn, session, id)?;
            println!("Deleted purchase {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn list(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let filter = PurchaseFilter {
        priority: sub
            .get_one::<String>("priority")
            .map(|s| s.parse::<Priority>())
            .transpose()?,
        status: required(sub, "status")?
            .parse::<Status>()
            .map_err(anyhow::Error::msg)?,
    };
    let data = purchases::list(conn, session, &filter)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|p| {
                vec![
                    p.id.to_string(),
                    p.name.clone(),
                    p.priority.label().to_string(),
                    p.category.label().to_string(),
                    fmt_brl(&p.estimated_price),
                    p.target_date.map(|d| d.to_string()).unwrap_or_default(),
                    if p.completed { "done" } else { "pending" }.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Name", "Priority", "Category", "Price", "Target", "Status"],
                rows,
            )
        );
        println!("Estimated total: {}", fmt_brl(&purchases::total_estimated(&data)));
    }
    Ok(())
}
