use crate::error::{AppError, Result};
use crate::models::{Group, TransactionRecord, User};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockWriteGuard};
use uuid::Uuid;

/// Everything the service persists: users with their pairwise balances,
/// groups, and transaction records.
#[derive(Debug, Clone, Default)]
pub struct LedgerState {
    users: HashMap<Uuid, User>,
    groups: HashMap<Uuid, Group>,
    transactions: HashMap<Uuid, TransactionRecord>,
}

/// In-memory persistence collaborator.
///
/// Settlement writes go through [`StoreTx`], obtained from [`MemoryStore::begin`].
/// Holding the write lock for the lifetime of a `StoreTx` serializes any two
/// settlements, which is a superset of the requirement that settlements over
/// overlapping user sets serialize. Readers take the lock briefly and see
/// either the state before a settlement or after it, never a partial one.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<LedgerState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens an atomic unit of work. Changes are staged on a private copy of
    /// the state and become visible only on [`StoreTx::commit`]; dropping the
    /// transaction without committing discards them.
    pub async fn begin(&self) -> StoreTx<'_> {
        let guard = self.state.write().await;
        let staged = guard.clone();
        StoreTx { guard, staged }
    }

    pub async fn find_user(&self, id: Uuid) -> Option<User> {
        self.state.read().await.users.get(&id).cloned()
    }

    pub async fn list_users(&self) -> Vec<User> {
        let mut users: Vec<User> = self.state.read().await.users.values().cloned().collect();
        users.sort_by_key(|u| u.created_at);
        users
    }

    pub async fn find_group(&self, id: Uuid) -> Option<Group> {
        self.state.read().await.groups.get(&id).cloned()
    }

    pub async fn list_groups(&self) -> Vec<Group> {
        let mut groups: Vec<Group> = self.state.read().await.groups.values().cloned().collect();
        groups.sort_by_key(|g| g.created_at);
        groups
    }

    pub async fn find_transaction(&self, id: Uuid) -> Option<TransactionRecord> {
        self.state.read().await.transactions.get(&id).cloned()
    }

    pub async fn list_transactions(&self) -> Vec<TransactionRecord> {
        let mut records: Vec<TransactionRecord> = self
            .state
            .read()
            .await
            .transactions
            .values()
            .cloned()
            .collect();
        records.sort_by_key(|t| t.created_at);
        records
    }
}

/// An open atomic unit over the ledger state.
///
/// All reads and writes operate on the staged copy, so a settlement observes
/// its own earlier adjustments. [`StoreTx::adjust`] is the balance-store
/// primitive: it keeps the pairwise map and both aggregates consistent inside
/// a single call, which is what makes it impossible for a caller to update
/// one and forget the other.
pub struct StoreTx<'a> {
    guard: RwLockWriteGuard<'a, LedgerState>,
    staged: LedgerState,
}

impl StoreTx<'_> {
    /// Publishes the staged state. Consumes the transaction; without this
    /// call every staged change is rolled back on drop.
    pub fn commit(self) {
        let StoreTx { mut guard, staged } = self;
        *guard = staged;
    }

    pub fn contains_user(&self, id: Uuid) -> bool {
        self.staged.users.contains_key(&id)
    }

    pub fn user(&self, id: Uuid) -> Result<&User> {
        self.staged.users.get(&id).ok_or(AppError::UnknownUser(id))
    }

    pub fn insert_user(&mut self, user: User) {
        self.staged.users.insert(user.id, user);
    }

    pub fn remove_user(&mut self, id: Uuid) -> Option<User> {
        self.staged.users.remove(&id)
    }

    pub fn find_group(&self, id: Uuid) -> Option<&Group> {
        self.staged.groups.get(&id)
    }

    pub fn insert_group(&mut self, group: Group) {
        self.staged.groups.insert(group.id, group);
    }

    pub fn remove_group(&mut self, id: Uuid) -> Option<Group> {
        self.staged.groups.remove(&id)
    }

    pub fn find_transaction(&self, id: Uuid) -> Option<&TransactionRecord> {
        self.staged.transactions.get(&id)
    }

    pub fn upsert_transaction(&mut self, record: TransactionRecord) {
        self.staged.transactions.insert(record.id, record);
    }

    pub fn remove_transaction(&mut self, id: Uuid) -> Option<TransactionRecord> {
        self.staged.transactions.remove(&id)
    }

    /// True if any live record names `user_id` as its buyer.
    pub fn is_buyer_referenced(&self, user_id: Uuid) -> bool {
        self.staged
            .transactions
            .values()
            .any(|t| t.buyer_id == user_id)
    }

    /// Adds `delta` to `outstanding[user][counterparty]` and subtracts it
    /// from `outstanding[counterparty][user]`, moving both users'
    /// `total_owed` in step (`+delta` / `-delta`).
    ///
    /// Missing entries are treated as zero and created on first adjustment;
    /// there is no separate insert branch, so both sides of a pair always
    /// have the same entry shape. Both ids are validated before anything is
    /// mutated.
    pub fn adjust(&mut self, user_id: Uuid, counterparty_id: Uuid, delta: Decimal) -> Result<()> {
        if user_id == counterparty_id {
            return Err(AppError::Validation(
                "a user cannot hold a balance against themselves".to_string(),
            ));
        }
        if !self.staged.users.contains_key(&counterparty_id) {
            return Err(AppError::UnknownUser(counterparty_id));
        }

        let user = self
            .staged
            .users
            .get_mut(&user_id)
            .ok_or(AppError::UnknownUser(user_id))?;
        *user.outstanding.entry(counterparty_id).or_insert(Decimal::ZERO) += delta;
        user.total_owed += delta;

        let counterparty = self
            .staged
            .users
            .get_mut(&counterparty_id)
            .ok_or(AppError::UnknownUser(counterparty_id))?;
        *counterparty.outstanding.entry(user_id).or_insert(Decimal::ZERO) -= delta;
        counterparty.total_owed -= delta;

        Ok(())
    }
}
