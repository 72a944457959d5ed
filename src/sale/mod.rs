//! Token sale exchanging native currency for ledger tokens

pub mod token_sale;

pub use token_sale::*;
