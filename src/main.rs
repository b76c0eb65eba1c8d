// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use carteira::config::LocalStorage;
use carteira::session::Session;
use carteira::{cli, commands, db, logging};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();
    logging::init_logging(matches.get_flag("verbose"));

    let mut conn = db::open_or_init()?;
    let mut storage = LocalStorage::open_default()?;
    let session = Session::restore(&conn, &storage)?;
    tracing::debug!(user = ?session.user_id(), "session restored");

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
            println!("Settings stored in {}", storage.path().display());
        }
        Some(("profile", sub)) => commands::profiles::handle(&conn, &mut storage, &session, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&mut conn, &session, sub)?,
        Some(("fixed", sub)) => commands::fixed::handle(&mut conn, &session, sub)?,
        Some(("plan", sub)) => commands::plans::handle(&conn, &session, sub)?,
        Some(("card", sub)) => commands::card::handle(&conn, &mut storage, &session, sub)?,
        Some(("report", sub)) => commands::reports::handle(&conn, &session, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, &session, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
