use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The party on the other side of a purchase: either a single borrower or a
/// group whose members split the price equally. A validly-formed transaction
/// always has exactly one of the two, which this enum makes unrepresentable
/// to get wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Counterparty {
    Borrower(Uuid),
    Group(Uuid),
}

/// Status of a transaction in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    /// Being constructed from a creation request; not yet settled.
    Pending,
    /// Persisted with a completed ledger settlement. Price edits happen here.
    Active,
    /// Terminal; the settlement has been reversed. No reactivation.
    Deleted,
}

impl TransactionStatus {
    pub fn is_final(&self) -> bool {
        matches!(self, TransactionStatus::Deleted)
    }

    pub fn can_transition(from: TransactionStatus, to: TransactionStatus) -> bool {
        matches!(
            (from, to),
            (TransactionStatus::Pending, TransactionStatus::Active)
                | (TransactionStatus::Active, TransactionStatus::Deleted)
        )
    }
}

/// The persisted fact of a purchase: who bought what, for how much, and who
/// shares the cost. Its lifecycle transitions each drive exactly one
/// compensating ledger settlement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: Uuid,
    pub item: String,
    pub price: Decimal,
    pub buyer_id: Uuid,
    pub counterparty: Counterparty,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TransactionRecord {
    pub fn new(item: String, price: Decimal, buyer_id: Uuid, counterparty: Counterparty) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            item,
            price,
            buyer_id,
            counterparty,
            status: TransactionStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builds a record from wire-level optional ids, enforcing that exactly
    /// one of `borrower_id`/`group_id` is set.
    pub fn from_parts(
        item: String,
        price: Decimal,
        buyer_id: Uuid,
        borrower_id: Option<Uuid>,
        group_id: Option<Uuid>,
    ) -> Result<Self> {
        let counterparty = match (borrower_id, group_id) {
            (Some(borrower), None) => Counterparty::Borrower(borrower),
            (None, Some(group)) => Counterparty::Group(group),
            (Some(_), Some(_)) => {
                return Err(AppError::MalformedTransaction(
                    "both borrower_id and group_id set".to_string(),
                ))
            }
            (None, None) => {
                return Err(AppError::MalformedTransaction(
                    "neither borrower_id nor group_id set".to_string(),
                ))
            }
        };
        Ok(Self::new(item, price, buyer_id, counterparty))
    }

    pub fn is_group(&self) -> bool {
        matches!(self.counterparty, Counterparty::Group(_))
    }

    pub fn borrower_id(&self) -> Option<Uuid> {
        match self.counterparty {
            Counterparty::Borrower(id) => Some(id),
            Counterparty::Group(_) => None,
        }
    }

    pub fn group_id(&self) -> Option<Uuid> {
        match self.counterparty {
            Counterparty::Group(id) => Some(id),
            Counterparty::Borrower(_) => None,
        }
    }

    /// Marks the record settled and live.
    pub fn activate(&mut self) {
        self.status = TransactionStatus::Active;
        self.updated_at = Utc::now();
    }

    /// Marks the record deleted (terminal).
    pub fn mark_deleted(&mut self) {
        self.status = TransactionStatus::Deleted;
        self.updated_at = Utc::now();
    }

    /// Only live records can take a price edit.
    pub fn can_edit(&self) -> bool {
        self.status == TransactionStatus::Active
    }

    /// Applies a price edit in place.
    pub fn set_price(&mut self, new_price: Decimal) {
        self.price = new_price;
        self.updated_at = Utc::now();
    }
}
