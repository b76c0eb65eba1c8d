// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use super::required;
use crate::config::LocalStorage;
use crate::repo;
use crate::session::Session;
use crate::utils::pretty_table;

pub fn handle(
    conn: &Connection,
    storage: &mut LocalStorage,
    session: &Session,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let p = repo::insert_profile(conn, required(sub, "name")?)?;
            println!("Created profile '{}' ({})", p.full_name, p.id);
            if session.user_id().is_none() {
                Session::sign_in(conn, storage, &p.id)?;
                println!("Signed in as '{}'", p.full_name);
            }
        }
        Some(("use", sub)) => {
            let p = Session::sign_in(conn, storage, required(sub, "profile")?)?;
            println!("Signed in as '{}'", p.full_name);
        }
        Some(("logout", _)) => {
            Session::sign_out(storage)?;
            println!("Signed out");
        }
        Some(("show", _)) => match session.user_id() {
            Some(id) => match repo::find_profile(conn, id)? {
                Some(p) => println!("{} ({})", p.full_name, p.id),
                None => println!("Not signed in"),
            },
            None => println!("Not signed in"),
        },
        Some(("list", _)) => {
            let rows: Vec<Vec<String>> = repo::list_profiles(conn)?
                .into_iter()
                .map(|p| {
                    let active = if session.user_id() == Some(p.id.as_str()) {
                        "*"
                    } else {
                        ""
                    };
                    vec![active.to_string(), p.full_name, p.id]
                })
                .collect();
            println!("{}", pretty_table(&["", "Name", "ID"], rows));
        }
        _ => {}
    }
    Ok(())
}
