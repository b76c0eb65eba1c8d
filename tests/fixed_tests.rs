// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use carteira::error::FinanceError;
use carteira::fixed::{self, FixedExpensePlan, FixedExpenseUpdate};
use carteira::models::{Category, NewTransaction, TransactionType};
use carteira::session::Session;
use carteira::store::TransactionStore;
use carteira::{db, repo};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> (Connection, Session) {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    let profile = repo::insert_profile(&conn, "Bruno").unwrap();
    (conn, Session::for_user(profile.id))
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn gym() -> FixedExpensePlan {
    FixedExpensePlan {
        name: "Academia".into(),
        description: Some("Plano anual".into()),
        total_amount: Decimal::new(1200, 0),
        months_count: 12,
        category: Category::Health,
        day_of_month: 5,
    }
}

fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
        .unwrap()
}

#[test]
fn create_persists_template_and_every_month() {
    let (mut conn, session) = setup();
    let (id, tx_ids) = fixed::create(&mut conn, &session, &gym(), d(2025, 3, 18)).unwrap();
    assert_eq!(tx_ids.len(), 12);

    let active = fixed::list_active(&conn, &session).unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, id);
    assert_eq!(active[0].amount, Decimal::new(1200, 0));
    assert_eq!(active[0].total_installments, 12);

    let store = TransactionStore::load(&conn, session).unwrap();
    assert!(store
        .transactions()
        .iter()
        .all(|t| t.fixed_expense_id == Some(id) && t.amount == Decimal::new(100, 0)));
    let march = store.fixed_for_month(2025, 3);
    assert_eq!(march.len(), 1);
    assert_eq!(march[0].description, "Academia (1/12)");
    assert_eq!(march[0].due_date, Some(d(2025, 3, 5)));
    let last = store.fixed_for_month(2026, 2);
    assert_eq!(last.len(), 1);
    assert_eq!(last[0].description, "Academia (12/12)");
}

#[test]
fn failure_midway_leaves_no_orphan_template() {
    let (mut conn, session) = setup();
    conn.execute_batch(
        "CREATE TEMP TRIGGER fail_second BEFORE INSERT ON transactions
         WHEN NEW.description LIKE '%(2/12)'
         BEGIN SELECT RAISE(ABORT, 'boom'); END;",
    )
    .unwrap();

    assert!(fixed::create(&mut conn, &session, &gym(), d(2025, 3, 18)).is_err());
    assert_eq!(count(&conn, "fixed_expenses"), 0);
    assert_eq!(count(&conn, "transactions"), 0);
}

#[test]
fn deactivation_hides_template_but_keeps_transactions() {
    let (mut conn, session) = setup();
    let (id, _) = fixed::create(&mut conn, &session, &gym(), d(2025, 3, 18)).unwrap();

    fixed::deactivate(&conn, &session, id).unwrap();
    assert!(fixed::list_active(&conn, &session).unwrap().is_empty());
    assert_eq!(count(&conn, "transactions"), 12);
    assert!(matches!(
        fixed::deactivate(&conn, &session, 999),
        Err(FinanceError::NotFound { .. })
    ));
}

#[test]
fn update_revalidates_and_does_not_touch_transactions() {
    let (mut conn, session) = setup();
    let (id, _) = fixed::create(&mut conn, &session, &gym(), d(2025, 3, 18)).unwrap();

    let changes = FixedExpenseUpdate {
        name: Some("Academia Premium".into()),
        day_of_month: Some(10),
        ..Default::default()
    };
    let updated = fixed::update(&conn, &session, id, &changes).unwrap();
    assert_eq!(updated.name, "Academia Premium");
    assert_eq!(updated.day_of_month, 10);

    let bad = FixedExpenseUpdate {
        day_of_month: Some(40),
        ..Default::default()
    };
    assert!(matches!(
        fixed::update(&conn, &session, id, &bad),
        Err(FinanceError::InvalidDayOfMonth(40))
    ));

    let store = TransactionStore::load(&conn, session).unwrap();
    assert!(store
        .transactions()
        .iter()
        .all(|t| t.description.starts_with("Academia (")));
}

#[test]
fn paying_a_month_flags_only_that_transaction() {
    let (mut conn, session) = setup();
    let (_, tx_ids) = fixed::create(&mut conn, &session, &gym(), d(2025, 3, 18)).unwrap();

    let mut store = TransactionStore::load(&conn, session).unwrap();
    store.mark_paid(&conn, tx_ids[0], true).unwrap();
    let paid: Vec<i64> = store
        .transactions()
        .iter()
        .filter(|t| t.is_paid)
        .map(|t| t.id)
        .collect();
    assert_eq!(paid, vec![tx_ids[0]]);
}

#[test]
fn anonymous_session_cannot_create() {
    let (mut conn, _) = setup();
    let err = fixed::create(&mut conn, &Session::anonymous(), &gym(), d(2025, 3, 18)).unwrap_err();
    assert!(matches!(err, FinanceError::NotAuthenticated));
    assert!(fixed::list_active(&conn, &Session::anonymous())
        .unwrap()
        .is_empty());
}

#[test]
fn only_fixed_expenses_can_be_marked_paid() {
    let (mut conn, session) = setup();
    let mut store = TransactionStore::new(session);
    let id = store
        .add(
            &mut conn,
            NewTransaction::new(
                TransactionType::Expense,
                Category::Food,
                Decimal::new(30, 0),
                "Feira",
                d(2025, 3, 2),
            ),
        )
        .unwrap()[0];

    assert!(matches!(
        store.mark_paid(&conn, id, true),
        Err(FinanceError::NotFound { .. })
    ));
    assert!(matches!(
        store.mark_paid(&conn, 9999, true),
        Err(FinanceError::NotFound { .. })
    ));
    assert!(!store.get(id).unwrap().is_paid);
}
