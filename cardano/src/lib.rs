// Ledger-side core of the minter: input selection and transaction building

pub mod backend;
pub mod builder;
pub mod deposit;
pub mod error;
pub mod fee;
#[cfg(any(test, feature = "test-utils"))]
pub mod in_memory_backend;
pub mod policy;
pub mod selection;
pub mod signing;
