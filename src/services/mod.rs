pub mod group_service;
pub mod ledger_engine;
pub mod split;
pub mod user_service;

pub use group_service::GroupService;
pub use ledger_engine::{LedgerEngine, NewTransaction};
pub use split::{GroupSplit, IndividualSplit};
pub use user_service::UserService;
