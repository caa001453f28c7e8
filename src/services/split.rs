use crate::error::{AppError, Result};
use crate::store::StoreTx;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Resolved split for a two-party transaction. `amount` is the ledger-visible
/// half of the raw price: the borrower owes half, the buyer keeps half.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndividualSplit {
    pub buyer_id: Uuid,
    pub borrower_id: Uuid,
    pub amount: Decimal,
}

/// Resolved split for a group transaction. Counterparties are every group
/// member except the buyer; each owes `per_head = price / member_count`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSplit {
    pub buyer_id: Uuid,
    pub counterparties: Vec<Uuid>,
    pub per_head: Decimal,
}

/// Resolves the split for a two-party transaction at the given (possibly
/// negative or delta) price.
///
/// Fails with `DanglingReference` if the borrower no longer exists; callers
/// on the deletion path treat that as "no ledger effect" because a
/// transaction can outlive the user it pointed to.
pub fn resolve_individual(
    tx: &StoreTx<'_>,
    buyer_id: Uuid,
    borrower_id: Uuid,
    price: Decimal,
) -> Result<IndividualSplit> {
    if !tx.contains_user(borrower_id) {
        return Err(AppError::DanglingReference(format!(
            "borrower '{borrower_id}' no longer exists"
        )));
    }
    Ok(IndividualSplit {
        buyer_id,
        borrower_id,
        amount: price / Decimal::TWO,
    })
}

/// Resolves the split for a group transaction at the given price.
///
/// Fails with `DanglingReference` if the group no longer exists and with
/// `EmptyGroup` if it has zero members — the division is guarded, never
/// undefined.
pub fn resolve_group(
    tx: &StoreTx<'_>,
    buyer_id: Uuid,
    group_id: Uuid,
    price: Decimal,
) -> Result<GroupSplit> {
    let group = tx.find_group(group_id).ok_or_else(|| {
        AppError::DanglingReference(format!("group '{group_id}' no longer exists"))
    })?;

    let member_count = group.member_count();
    if member_count == 0 {
        return Err(AppError::EmptyGroup(group_id));
    }

    Ok(GroupSplit {
        buyer_id,
        counterparties: group.members_except(buyer_id),
        per_head: price / Decimal::from(member_count as u64),
    })
}
