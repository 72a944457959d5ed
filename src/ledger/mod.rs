//! Ledger module containing balance accounting and delegated transfers

pub mod core;
pub mod journal;
pub mod transfer;

pub use self::core::*;
pub use journal::*;
