//! # Dapp Token
//!
//! A standalone fungible token ledger with delegated transfers, plus a token
//! sale that exchanges native currency for units of that token.
//!
//! ## Features
//!
//! - **Token ledger**: balances, allowances, transfers and delegated transfers
//!   with a fixed total supply
//! - **Token sale**: fixed unit price, exact-payment purchases from the sale's
//!   own inventory, and a one-time admin finalization
//! - **Events and receipts**: every successful call returns a receipt with the
//!   events it emitted, and each instance keeps an ordered event journal
//! - **Storage abstraction**: ledger state lives behind the `TokenStorage` trait
//!
//! Every operation is a single atomic state transition. A rejected operation
//! returns a [`TokenError`] and leaves no trace.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use dapp_token::{Address, TokenLedger, TokenSale};
//!
//! let admin = Address::repeat_byte(1);
//! let buyer = Address::repeat_byte(2);
//!
//! let ledger = Arc::new(TokenLedger::new(admin, 1_000_000));
//! let sale = TokenSale::new(Arc::clone(&ledger), admin, 1_000_000_000_000_000).unwrap();
//! ledger.transfer(admin, sale.address(), 750_000).unwrap();
//!
//! sale.buy_tokens(buyer, 10, 10 * 1_000_000_000_000_000).unwrap();
//! assert_eq!(ledger.balance_of(&buyer), 10);
//! ```

pub mod config;
pub mod ledger;
pub mod sale;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::*;
pub use ledger::*;
pub use sale::*;
pub use traits::*;
pub use types::*;
