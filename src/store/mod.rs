pub mod memory;

pub use memory::{MemoryStore, StoreTx};
