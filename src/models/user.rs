use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// A participant in the shared-expense ledger.
///
/// `total_owed` is the user's aggregate net position (positive = is owed
/// money). `outstanding` maps each counterparty id to the signed balance
/// against that counterparty (positive = the counterparty owes this user).
/// The map is keyed by the counterparty's `Uuid` only — never by a formatted
/// variant of it — so there is exactly one logical entry per counterparty.
///
/// Both fields are mutated exclusively by the ledger engine through the
/// store's `adjust` primitive, which keeps `total_owed` equal to the sum of
/// `outstanding` values at all times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub total_owed: Decimal,
    pub outstanding: BTreeMap<Uuid, Decimal>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user with a zero net position and no counterparties.
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            total_owed: Decimal::ZERO,
            outstanding: BTreeMap::new(),
            created_at: Utc::now(),
        }
    }

    /// Returns the signed balance against `counterparty_id`, zero if the
    /// pair has never transacted.
    pub fn balance_with(&self, counterparty_id: Uuid) -> Decimal {
        self.outstanding
            .get(&counterparty_id)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Returns true if the user owes nothing and is owed nothing.
    pub fn is_settled(&self) -> bool {
        self.total_owed.is_zero() && self.outstanding.values().all(Decimal::is_zero)
    }
}
