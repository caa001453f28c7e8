use thiserror::Error;
use uuid::Uuid;

/// Application-level error taxonomy.
///
/// Every settlement failure is recoverable at the transport boundary; the
/// handlers map each variant to a status code. The ledger engine itself never
/// partially commits: an error inside a settlement aborts the enclosing
/// store transaction before it reaches the caller.
#[derive(Debug, Error)]
pub enum AppError {
    /// A referenced user id does not exist in the store.
    #[error("unknown user '{0}'")]
    UnknownUser(Uuid),

    /// A group has zero members at settlement time.
    #[error("group '{0}' has no members to split against")]
    EmptyGroup(Uuid),

    /// A group or borrower referenced by a transaction no longer exists.
    #[error("dangling reference: {0}")]
    DanglingReference(String),

    /// Neither or both of borrower/group were set on a transaction.
    #[error("malformed transaction: {0}")]
    MalformedTransaction(String),

    /// A settlement failed mid-way; the atomic unit was rolled back.
    #[error("unprocessable transaction: {0}")]
    Unprocessable(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
