//! Ledger Integration Tests
//!
//! Full flow through the public API: record expenses, then report balances
//! and settlements.

use rust_decimal_macros::dec;
use split_ledger::handlers::{GroupBalancesHandler, SplitShare, UserBalancesHandler};
use split_ledger::ledger::{compute_group_balances, compute_settlement};
use split_ledger::store::{InMemoryStore, LedgerSnapshot, LedgerStore};
use split_ledger::{AppError, Money, StoreError};

mod common;
use common::{add_equal, add_percentage, setup_store, ALICE, BOB, CAROL, FLAT};

fn cents(report_amount: Money) -> i64 {
    report_amount.cents()
}

#[test]
fn test_equal_then_percentage_e2e() {
    let mut store = setup_store();

    // 1. Alice pays 90.00 split equally
    let dinner = add_equal(&mut store, ALICE, "90.00");
    assert!(dinner.is_balanced());

    let report = GroupBalancesHandler::new(&store).execute(FLAT).unwrap();
    assert_eq!(cents(report.member(ALICE).unwrap().balance.net_balance), 6000);
    assert_eq!(cents(report.member(BOB).unwrap().balance.net_balance), -3000);
    assert_eq!(cents(report.member(CAROL).unwrap().balance.net_balance), -3000);

    let payments: Vec<_> = report
        .settlement
        .iter()
        .map(|tx| (tx.debtor_id, tx.creditor_id, tx.amount.to_string()))
        .collect();
    assert_eq!(
        payments,
        vec![
            (BOB, ALICE, "30.00".to_string()),
            (CAROL, ALICE, "30.00".to_string()),
        ]
    );

    // 2. Bob pays 100.00 split 25/25/50
    add_percentage(
        &mut store,
        BOB,
        "100.00",
        vec![
            SplitShare::new(ALICE, dec!(25)),
            SplitShare::new(BOB, dec!(25)),
            SplitShare::new(CAROL, dec!(50)),
        ],
    );

    let report = GroupBalancesHandler::new(&store).execute(FLAT).unwrap();
    assert_eq!(report.total_expenses.to_string(), "190.00");
    assert_eq!(cents(report.member(ALICE).unwrap().balance.net_balance), 3500);
    assert_eq!(cents(report.member(BOB).unwrap().balance.net_balance), 4500);
    assert_eq!(cents(report.member(CAROL).unwrap().balance.net_balance), -8000);

    let payments: Vec<_> = report
        .settlement
        .iter()
        .map(|tx| (tx.debtor_id, tx.creditor_id, tx.amount.cents()))
        .collect();
    assert_eq!(payments, vec![(CAROL, BOB, 4500), (CAROL, ALICE, 3500)]);

    // 3. Alice's cross-group view matches the group row
    let user_report = UserBalancesHandler::new(&store).execute(ALICE).unwrap();
    assert_eq!(user_report.groups.len(), 1);
    assert_eq!(user_report.total_net_balance, Money::from_cents(3500));
    assert_eq!(user_report.groups[0].owed_by[0].user_name, "Carol");
}

#[test]
fn test_indivisible_amount_stays_closed() {
    let mut store = setup_store();
    let expense = add_equal(&mut store, CAROL, "100.00");

    let amounts: Vec<i64> = expense.splits.iter().map(|s| s.amount.cents()).collect();
    assert_eq!(amounts, vec![3334, 3333, 3333]);

    let balances = compute_group_balances(&store.group_expenses(FLAT).unwrap()).unwrap();
    assert!(balances.check_closed().is_ok());

    let settlement = compute_settlement(&balances);
    assert_eq!(settlement.unsettled, Money::ZERO);
    assert!(settlement.apply_to(&balances).unwrap().is_settled());
}

#[test]
fn test_report_is_recomputed_after_each_expense() {
    let mut store = setup_store();
    let empty = GroupBalancesHandler::new(&store).execute(FLAT).unwrap();
    assert!(empty.settlement.is_empty());
    assert_eq!(empty.total_expenses, Money::ZERO);

    add_equal(&mut store, BOB, "30.00");
    add_equal(&mut store, CAROL, "30.00");
    add_equal(&mut store, ALICE, "30.00");

    // Everyone paid the same, so nobody owes anything.
    let report = GroupBalancesHandler::new(&store).execute(FLAT).unwrap();
    assert!(report.settlement.is_empty());
    assert!(report
        .balances
        .iter()
        .all(|member| member.balance.net_balance.is_zero()));
}

#[test]
fn test_snapshot_load_and_report() {
    let json = r#"{
        "users": [
            {"id": 1, "name": "Alice", "email": "alice@example.com"},
            {"id": 2, "name": "Bob", "email": "bob@example.com"},
            {"id": 3, "name": "Carol", "email": "carol@example.com"}
        ],
        "groups": [
            {"id": 7, "name": "Cabin", "members": [1, 2, 3]}
        ],
        "expenses": [
            {
                "id": "6f1c2f4e-8a55-4a43-9b59-2d0f7b7c1a01",
                "group_id": 7,
                "description": "groceries",
                "amount": "60.00",
                "payer_id": 2,
                "split_policy": "equal",
                "created_at": "2024-03-01T12:00:00Z",
                "participants": [1, 2, 3],
                "splits": [
                    {"user_id": 1, "amount": "20.00"},
                    {"user_id": 2, "amount": "20.00"},
                    {"user_id": 3, "amount": "20.00"}
                ]
            }
        ]
    }"#;

    let snapshot = LedgerSnapshot::from_json_str(json).unwrap();
    let store = InMemoryStore::from_snapshot(snapshot).unwrap();

    let report = GroupBalancesHandler::new(&store)
        .execute(split_ledger::GroupId(7))
        .unwrap();
    assert_eq!(report.group_name, "Cabin");
    assert_eq!(cents(report.member(BOB).unwrap().balance.net_balance), 4000);

    let payments: Vec<_> = report
        .settlement
        .iter()
        .map(|tx| (tx.debtor_id, tx.creditor_id, tx.amount.cents()))
        .collect();
    assert_eq!(payments, vec![(ALICE, BOB, 2000), (CAROL, BOB, 2000)]);

    let serialized = serde_json::to_value(&report).unwrap();
    assert_eq!(serialized["total_expenses"], "60.00");
    assert_eq!(serialized["balances"][1]["net_balance"], "40.00");
}

#[test]
fn test_snapshot_with_unknown_member_rejected() {
    let json = r#"{
        "users": [{"id": 1, "name": "Alice", "email": "alice@example.com"}],
        "groups": [{"id": 7, "name": "Cabin", "members": [1, 9]}]
    }"#;

    let snapshot = LedgerSnapshot::from_json_str(json).unwrap();
    let result = InMemoryStore::from_snapshot(snapshot);
    assert!(matches!(result, Err(StoreError::UserNotFound(_))));
}

#[test]
fn test_malformed_snapshot_rejected() {
    let result = LedgerSnapshot::from_json_str(r#"{"users": [{"id": "x"}]}"#);
    assert!(matches!(result, Err(StoreError::Format(_))));
}

#[test]
fn test_error_response_codes() {
    let store = setup_store();
    let err = GroupBalancesHandler::new(&store)
        .execute(split_ledger::GroupId(404))
        .unwrap_err();

    assert!(matches!(err, AppError::GroupNotFound(_)));
    let response = err.to_response();
    assert_eq!(response.error_code, "group_not_found");
}
