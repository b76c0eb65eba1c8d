// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use carteira::commands::{exporter, transactions};
use carteira::models::{Category, NewTransaction, TransactionType};
use carteira::session::Session;
use carteira::store::TransactionStore;
use carteira::{cli, db, repo};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use tempfile::tempdir;

fn seeded() -> (Connection, Session) {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    let session = Session::for_user(repo::insert_profile(&conn, "Dani").unwrap().id);
    let mut store = TransactionStore::new(session.clone());
    for (i, (kind, amount, category, description)) in [
        (TransactionType::Income, 3000, Category::Salary, "Salário"),
        (TransactionType::Expense, 120, Category::Food, "Feira"),
        (TransactionType::Expense, 45, Category::Transport, "Uber"),
    ]
    .into_iter()
    .enumerate()
    {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1 + i as u32).unwrap();
        store
            .add(
                &mut conn,
                NewTransaction::new(kind, category, Decimal::new(amount, 0), description, date),
            )
            .unwrap();
    }
    store
        .add(
            &mut conn,
            NewTransaction::new(
                TransactionType::Expense,
                Category::Food,
                Decimal::new(60, 0),
                "Padaria",
                NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(),
            ),
        )
        .unwrap();
    (conn, session)
}

fn sub<'a>(m: &'a clap::ArgMatches, path: &[&str]) -> &'a clap::ArgMatches {
    let mut cur = m;
    for name in path {
        match cur.subcommand() {
            Some((n, next)) if n == *name => cur = next,
            other => panic!("expected subcommand {name}, got {:?}", other.map(|(n, _)| n)),
        }
    }
    cur
}

#[test]
fn list_filters_by_month_type_and_limit() {
    let (conn, session) = seeded();
    let store = TransactionStore::load(&conn, session).unwrap();

    let m = cli::build_cli().get_matches_from(["carteira", "tx", "list", "--month", "2025-01"]);
    let rows = transactions::query_rows(&store, sub(&m, &["tx", "list"])).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].description, "Uber");

    let m = cli::build_cli().get_matches_from(["carteira", "tx", "list", "--type", "expense", "--limit", "2"]);
    let rows = transactions::query_rows(&store, sub(&m, &["tx", "list"])).unwrap();
    let names: Vec<&str> = rows.iter().map(|t| t.description.as_str()).collect();
    assert_eq!(names, vec!["Padaria", "Uber"]);
}

#[test]
fn add_arguments_build_a_credit_installment_draft() {
    let m = cli::build_cli().get_matches_from([
        "carteira",
        "tx",
        "add",
        "--amount",
        "600",
        "--category",
        "shopping",
        "--description",
        "Geladeira",
        "--date",
        "2025-01-31",
        "--credit",
        "--card",
        "Nubank",
        "--installments",
        "6",
    ]);
    let draft = transactions::draft_from_args(sub(&m, &["tx", "add"])).unwrap();
    assert_eq!(draft.r#type, TransactionType::Expense);
    assert_eq!(draft.category, Category::Shopping);
    assert_eq!(draft.amount, Decimal::new(600, 0));
    assert!(draft.is_credit);
    assert_eq!(draft.installments, Some(6));
    assert_eq!(draft.credit_card.as_deref(), Some("Nubank"));

    let m = cli::build_cli().get_matches_from([
        "carteira",
        "tx",
        "add",
        "--amount",
        "600",
        "--category",
        "shopping",
        "--description",
        "Geladeira",
        "--installments",
        "6",
    ]);
    assert!(transactions::draft_from_args(sub(&m, &["tx", "add"])).is_err());
}

#[test]
fn verbose_flag_is_global() {
    let m = cli::build_cli().get_matches_from(["carteira", "report", "summary", "-v"]);
    assert!(m.get_flag("verbose"));
    let m = cli::build_cli()
        .try_get_matches_from(["carteira", "card", "set-day", "abc"]);
    assert!(m.is_err());
}

#[test]
fn counts_outside_their_range_fail_to_parse() {
    let add = |n: &str| {
        cli::build_cli().try_get_matches_from([
            "carteira",
            "tx",
            "add",
            "--amount",
            "50",
            "--category",
            "food",
            "--description",
            "Mercado",
            "--credit",
            "--installments",
            n,
        ])
    };
    assert!(add("0").is_err());
    assert!(add("1").is_ok());

    let trend = |n: &str| {
        cli::build_cli().try_get_matches_from(["carteira", "report", "trend", "--months", n])
    };
    assert!(trend("0").is_err());
    assert!(trend("3000000000").is_err());
    assert!(trend("24").is_ok());
}

#[test]
fn export_writes_pretty_json_oldest_first() {
    let (conn, session) = seeded();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    let out_str = out_path.to_string_lossy().to_string();

    let m = cli::build_cli().get_matches_from([
        "carteira",
        "export",
        "transactions",
        "--format",
        "json",
        "--out",
        &out_str,
        "--month",
        "2025-01",
    ]);
    exporter::handle(&conn, &session, sub(&m, &["export"])).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    let arr = parsed.as_array().unwrap();
    assert_eq!(arr.len(), 3);
    assert_eq!(arr[0]["description"], "Salário");
    assert_eq!(arr[0]["type"], "income");
    assert_eq!(arr[0]["category"], "salary");
    assert_eq!(arr[0]["date"], "2025-01-01");
    assert_eq!(arr[1]["expenseType"], "normal");
    assert_eq!(arr[1]["isPaid"], false);
}

#[test]
fn export_writes_csv_with_header() {
    let (conn, session) = seeded();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.csv");
    let out_str = out_path.to_string_lossy().to_string();

    let m = cli::build_cli().get_matches_from([
        "carteira",
        "export",
        "transactions",
        "--out",
        &out_str,
    ]);
    exporter::handle(&conn, &session, sub(&m, &["export"])).unwrap();

    let mut rdr = csv::Reader::from_path(&out_path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(&headers[1], "date");
    assert_eq!(&headers[5], "amount");
    let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 4);
    assert_eq!(&records[0][4], "Salário");
    assert_eq!(&records[3][4], "Padaria");
    assert_eq!(&records[3][5], "60");
}

#[test]
fn export_rejects_unknown_format() {
    let (conn, session) = seeded();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.xml");
    let store = TransactionStore::load(&conn, session).unwrap();
    let txs: Vec<_> = store.transactions().iter().collect();
    assert!(exporter::write_transactions(&txs, "xml", &out_path).is_err());
    assert!(!out_path.exists());
}
