#![allow(dead_code)]

use rust_decimal::Decimal;
use splitledger::services::{GroupService, LedgerEngine, NewTransaction, UserService};
use splitledger::store::MemoryStore;
use uuid::Uuid;

pub struct TestLedger {
    pub store: MemoryStore,
    pub users: UserService,
    pub groups: GroupService,
    pub engine: LedgerEngine,
}

pub fn setup_ledger() -> TestLedger {
    let store = MemoryStore::new();
    TestLedger {
        users: UserService::new(store.clone()),
        groups: GroupService::new(store.clone()),
        engine: LedgerEngine::new(store.clone()),
        store,
    }
}

pub async fn seed_users(ledger: &TestLedger, names: &[&str]) -> Vec<Uuid> {
    let mut ids = Vec::with_capacity(names.len());
    for name in names {
        let user = ledger.users.create_user(name).await.expect("seed user");
        ids.push(user.id);
    }
    ids
}

pub fn individual_purchase(item: &str, price: Decimal, buyer: Uuid, borrower: Uuid) -> NewTransaction {
    NewTransaction {
        item: item.to_string(),
        price,
        buyer_id: buyer,
        borrower_id: Some(borrower),
        group_id: None,
    }
}

pub fn group_purchase(item: &str, price: Decimal, buyer: Uuid, group: Uuid) -> NewTransaction {
    NewTransaction {
        item: item.to_string(),
        price,
        buyer_id: buyer,
        borrower_id: None,
        group_id: Some(group),
    }
}

/// Asserts that every pairwise balance has a mirrored negation on the
/// other side, and that the sum of all total_owed values is zero.
pub async fn assert_ledger_consistent(ledger: &TestLedger) {
    let users = ledger.store.list_users().await;
    let mut sum = Decimal::ZERO;

    for user in &users {
        sum += user.total_owed;

        let mut per_user = Decimal::ZERO;
        for (other_id, amount) in &user.outstanding {
            per_user += *amount;
            let other = ledger
                .store
                .find_user(*other_id)
                .await
                .expect("counterparty exists");
            assert_eq!(
                other.balance_with(user.id),
                -*amount,
                "pairwise balance between {} and {} is not mirrored",
                user.id,
                other_id
            );
        }
        assert_eq!(
            user.total_owed, per_user,
            "total_owed for {} diverges from its pairwise sum",
            user.id
        );
    }

    assert_eq!(sum, Decimal::ZERO, "ledger-wide balances do not cancel");
}
