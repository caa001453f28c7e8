pub mod group;
pub mod transaction;
pub mod user;

pub use group::Group;
pub use transaction::{Counterparty, TransactionRecord, TransactionStatus};
pub use user::User;
