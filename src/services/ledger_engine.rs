use crate::error::{AppError, Result};
use crate::models::{Counterparty, TransactionRecord};
use crate::services::split::{self, GroupSplit};
use crate::store::{MemoryStore, StoreTx};
use rust_decimal::Decimal;
use tracing::{debug, info};
use uuid::Uuid;

/// Request to record a new purchase.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub item: String,
    pub price: Decimal,
    pub buyer_id: Uuid,
    pub borrower_id: Option<Uuid>,
    pub group_id: Option<Uuid>,
}

/// The settlement engine.
///
/// Applies the financial effect of every transaction lifecycle transition to
/// the pairwise ledger. Both settlement primitives are linear in price, so
/// creation settles `+price`, deletion settles `-price` (the exact inverse),
/// and a price edit settles the delta under the same split policy instead of
/// a delete-and-recreate. Each operation runs begin-to-commit inside one
/// store transaction: either every pairwise adjustment and both aggregates
/// land, or none do.
pub struct LedgerEngine {
    store: MemoryStore,
}

impl LedgerEngine {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    /// Records a purchase and settles `+price` against the resolved
    /// counterparties. A dangling borrower/group reference rejects the
    /// creation; nothing is committed on any error.
    pub async fn create_transaction(&self, request: NewTransaction) -> Result<TransactionRecord> {
        if request.price < Decimal::ZERO {
            return Err(AppError::Validation(
                "price cannot be negative".to_string(),
            ));
        }

        let mut record = TransactionRecord::from_parts(
            request.item,
            request.price,
            request.buyer_id,
            request.borrower_id,
            request.group_id,
        )?;

        let mut tx = self.store.begin().await;
        tx.user(record.buyer_id)?;

        Self::apply_settlement(&mut tx, &record, record.price)?;

        record.activate();
        tx.upsert_transaction(record.clone());
        tx.commit();

        info!(
            transaction_id = %record.id,
            buyer_id = %record.buyer_id,
            price = %record.price,
            group = record.is_group(),
            "transaction settled"
        );
        Ok(record)
    }

    /// Edits a transaction's price, settling `new_price - old_price` under
    /// the same split policy. Valid only for `Active` records.
    pub async fn update_price(&self, id: Uuid, new_price: Decimal) -> Result<TransactionRecord> {
        if new_price < Decimal::ZERO {
            return Err(AppError::Validation(
                "price cannot be negative".to_string(),
            ));
        }

        let mut tx = self.store.begin().await;
        let mut record = tx
            .find_transaction(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("transaction '{id}' not found")))?;

        if !record.can_edit() {
            return Err(AppError::Validation(format!(
                "transaction '{id}' is not active and cannot be edited"
            )));
        }

        let delta = new_price - record.price;
        Self::apply_settlement(&mut tx, &record, delta)?;

        record.set_price(new_price);
        tx.upsert_transaction(record.clone());
        tx.commit();

        info!(transaction_id = %id, price = %new_price, delta = %delta, "transaction price updated");
        Ok(record)
    }

    /// Deletes a transaction, settling `-price` to reverse its effect
    /// exactly. If the referenced group or borrower no longer exists the
    /// reversal is skipped — the debt was already orphaned — but the record
    /// is still removed. An existing-but-empty group still rejects the
    /// delete.
    pub async fn delete_transaction(&self, id: Uuid) -> Result<TransactionRecord> {
        let mut tx = self.store.begin().await;
        let mut record = tx
            .find_transaction(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("transaction '{id}' not found")))?;

        match Self::apply_settlement(&mut tx, &record, -record.price) {
            Ok(()) => {}
            Err(AppError::DanglingReference(reference)) => {
                debug!(transaction_id = %id, %reference, "skipping reversal for orphaned reference");
            }
            Err(other) => return Err(other),
        }

        record.mark_deleted();
        tx.remove_transaction(id);
        tx.commit();

        info!(transaction_id = %id, "transaction deleted");
        Ok(record)
    }

    /// Resolves the record's counterparties and settles `price` against
    /// them. `price` is the raw figure; halving for two-party transactions
    /// happens at resolution.
    fn apply_settlement(tx: &mut StoreTx<'_>, record: &TransactionRecord, price: Decimal) -> Result<()> {
        match record.counterparty {
            Counterparty::Borrower(borrower_id) => {
                let split = split::resolve_individual(tx, record.buyer_id, borrower_id, price)?;
                Self::settle_individual(tx, split.buyer_id, split.borrower_id, split.amount)
            }
            Counterparty::Group(group_id) => {
                let split = split::resolve_group(tx, record.buyer_id, group_id, price)?;
                Self::settle_group(tx, &split)
            }
        }
    }

    /// Two-party settlement: one pairwise adjustment. `amount` is already
    /// halved by the resolver — the ledger-visible figure, not the raw price.
    fn settle_individual(
        tx: &mut StoreTx<'_>,
        buyer_id: Uuid,
        borrower_id: Uuid,
        amount: Decimal,
    ) -> Result<()> {
        tx.adjust(buyer_id, borrower_id, amount)
    }

    /// Group settlement: one independent pairwise adjustment per counterparty
    /// at `per_head`, never a lump buyer adjustment, so pairwise symmetry
    /// holds for every pair and not just in aggregate. A failure on any
    /// counterparty aborts the whole unit as `Unprocessable`.
    fn settle_group(tx: &mut StoreTx<'_>, split: &GroupSplit) -> Result<()> {
        for member_id in &split.counterparties {
            tx.adjust(split.buyer_id, *member_id, split.per_head)
                .map_err(|err| {
                    AppError::Unprocessable(format!(
                        "group settlement failed on member '{member_id}': {err}"
                    ))
                })?;
        }
        Ok(())
    }
}
