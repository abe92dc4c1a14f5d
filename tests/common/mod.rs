//! Common test utilities

#![allow(dead_code)]

use split_ledger::domain::{Group, GroupId, User, UserId};
use split_ledger::handlers::{CreateExpenseCommand, CreateExpenseHandler, SplitShare};
use split_ledger::store::InMemoryStore;
use split_ledger::Expense;

pub const ALICE: UserId = UserId(1);
pub const BOB: UserId = UserId(2);
pub const CAROL: UserId = UserId(3);
pub const FLAT: GroupId = GroupId(1);

/// Store seeded with Alice, Bob and Carol sharing one group
pub fn setup_store() -> InMemoryStore {
    let mut store = InMemoryStore::new();
    for (id, name) in [(ALICE, "Alice"), (BOB, "Bob"), (CAROL, "Carol")] {
        store
            .add_user(User {
                id,
                name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase()),
            })
            .expect("Failed to seed user");
    }
    store
        .add_group(
            Group {
                id: FLAT,
                name: "Flat".to_string(),
            },
            vec![ALICE, BOB, CAROL],
        )
        .expect("Failed to seed group");
    store
}

/// Record an equal split paid by `payer`
pub fn add_equal(store: &mut InMemoryStore, payer: UserId, amount: &str) -> Expense {
    let command = CreateExpenseCommand::new(
        FLAT,
        format!("equal {amount}"),
        amount.to_string(),
        payer,
        "equal".to_string(),
    );
    CreateExpenseHandler::new(store)
        .execute(command)
        .expect("Failed to record equal expense")
}

/// Record a percentage split paid by `payer`
pub fn add_percentage(
    store: &mut InMemoryStore,
    payer: UserId,
    amount: &str,
    shares: Vec<SplitShare>,
) -> Expense {
    let command = CreateExpenseCommand::new(
        FLAT,
        format!("percentage {amount}"),
        amount.to_string(),
        payer,
        "percentage".to_string(),
    )
    .with_shares(shares);
    CreateExpenseHandler::new(store)
        .execute(command)
        .expect("Failed to record percentage expense")
}
