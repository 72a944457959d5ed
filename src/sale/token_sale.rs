//! Token sale state machine

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::config::SaleConfig;
use crate::ledger::{EventJournal, TokenLedger};
use crate::traits::*;
use crate::types::*;
use crate::utils::memory_storage::MemoryStorage;
use crate::utils::units::wei_to_ether;
use crate::utils::validation::validate_token_price;

/// Mutable sale state, guarded as a single unit
struct SaleState {
    tokens_sold: Amount,
    funds_raised: Amount,
    is_open: bool,
    journal: EventJournal,
}

/// Sale of ledger tokens for native currency
///
/// The sale's inventory is the balance of its own [`address`](Self::address)
/// on the shared ledger; the deployer stocks it with an ordinary ledger
/// transfer. The sale starts open and is closed exactly once by its admin,
/// after which it rejects every call that depends on its state.
///
/// Locks are always taken sale first, ledger second.
pub struct TokenSale<S: TokenStorage = MemoryStorage> {
    address: Address,
    admin: Address,
    ledger: Arc<TokenLedger<S>>,
    token_price: Amount,
    state: RwLock<SaleState>,
}

/// Result of closing a sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub receipt: Receipt,
    /// Inventory transferred back to the admin
    pub unsold_returned: Amount,
    /// Payments released to the admin
    pub funds_released: Amount,
}

impl<S: TokenStorage> TokenSale<S> {
    /// Create an open sale; `admin` is the creator
    ///
    /// Fails with a validation error if `token_price` is zero.
    pub fn new(
        ledger: Arc<TokenLedger<S>>,
        admin: Address,
        token_price: Amount,
    ) -> TokenResult<Self> {
        validate_token_price(token_price)?;

        let address = Address::generate();
        tracing::info!(
            sale = %address,
            ledger = %ledger.address(),
            admin = %admin,
            token_price,
            "token sale created"
        );

        Ok(Self {
            address,
            admin,
            ledger,
            token_price,
            state: RwLock::new(SaleState {
                tokens_sold: 0,
                funds_raised: 0,
                is_open: true,
                journal: EventJournal::new(),
            }),
        })
    }

    /// Create a sale from configuration
    pub fn from_config(
        ledger: Arc<TokenLedger<S>>,
        admin: Address,
        config: &SaleConfig,
    ) -> TokenResult<Self> {
        Self::new(ledger, admin, config.token_price)
    }

    fn read_state(&self) -> RwLockReadGuard<'_, SaleState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, SaleState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read a value that is only available while the sale is open
    fn read_open<T>(&self, f: impl FnOnce(&SaleState) -> T) -> TokenResult<T> {
        let state = self.read_state();
        if !state.is_open {
            return Err(TokenError::SaleClosed);
        }
        Ok(f(&state))
    }

    /// The sale's own account on the ledger
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn admin(&self) -> Address {
        self.admin
    }

    /// Address of the ledger whose tokens are sold
    pub fn token_contract(&self) -> Address {
        self.ledger.address()
    }

    /// Shared handle to the ledger
    pub fn ledger(&self) -> &Arc<TokenLedger<S>> {
        &self.ledger
    }

    pub fn is_open(&self) -> bool {
        self.read_state().is_open
    }

    /// Price per token unit; fails once the sale is closed
    pub fn token_price(&self) -> TokenResult<Amount> {
        self.read_open(|_| self.token_price)
    }

    /// Price per token unit in ether
    pub fn token_price_in_ether(&self) -> TokenResult<BigDecimal> {
        self.token_price().map(wei_to_ether)
    }

    /// Units sold so far; fails once the sale is closed
    pub fn tokens_sold(&self) -> TokenResult<Amount> {
        self.read_open(|state| state.tokens_sold)
    }

    /// Payments retained so far; fails once the sale is closed
    pub fn funds_raised(&self) -> TokenResult<Amount> {
        self.read_open(|state| state.funds_raised)
    }

    /// Tokens currently available for sale
    pub fn inventory(&self) -> Amount {
        self.ledger.balance_of(&self.address)
    }

    /// Every event emitted by this sale, oldest first
    pub fn events(&self) -> Vec<Event> {
        self.read_state().journal.events()
    }

    /// Buy `units` tokens for `payment`, which must equal `units * token_price`
    pub fn buy_tokens(&self, caller: Address, units: Amount, payment: Amount) -> TokenResult<Receipt> {
        let mut state = self.write_state();

        if !state.is_open {
            return Err(TokenError::SaleClosed);
        }

        let invalid_payment = TokenError::InvalidPayment {
            units,
            unit_price: self.token_price,
            received: payment,
        };
        let cost = match units.checked_mul(self.token_price) {
            Some(cost) if cost == payment => cost,
            _ => {
                tracing::warn!(buyer = %caller, units, payment, "purchase rejected: wrong payment");
                return Err(invalid_payment);
            }
        };
        let funds_raised = state
            .funds_raised
            .checked_add(cost)
            .ok_or(invalid_payment)?;
        let tokens_sold = state
            .tokens_sold
            .checked_add(units)
            .ok_or(TokenError::InsufficientInventory {
                available: 0,
                requested: units,
            })?;

        self.ledger
            .transfer(self.address, caller, units)
            .map_err(|err| match err {
                TokenError::InsufficientBalance { balance, .. } => {
                    tracing::warn!(buyer = %caller, units, available = balance, "purchase rejected: inventory");
                    TokenError::InsufficientInventory {
                        available: balance,
                        requested: units,
                    }
                }
                other => other,
            })?;

        state.tokens_sold = tokens_sold;
        state.funds_raised = funds_raised;
        tracing::debug!(buyer = %caller, units, payment, tokens_sold = state.tokens_sold, "sell");

        Ok(state.journal.record(
            Uuid::new_v4(),
            vec![Event::Sell {
                buyer: caller,
                amount: units,
            }],
        ))
    }

    /// Close the sale, returning unsold inventory and retained payments to
    /// the admin
    ///
    /// Only the admin may call this, and only once.
    pub fn end_sale(&self, caller: Address) -> TokenResult<Settlement> {
        let mut state = self.write_state();

        if caller != self.admin {
            tracing::warn!(caller = %caller, admin = %self.admin, "end_sale rejected: not admin");
            return Err(TokenError::Unauthorized { caller });
        }
        if !state.is_open {
            return Err(TokenError::SaleClosed);
        }

        let unsold = self.ledger.balance_of(&self.address);
        self.ledger.transfer(self.address, self.admin, unsold)?;

        state.is_open = false;
        let funds_released = state.funds_raised;
        tracing::info!(
            sale = %self.address,
            tokens_sold = state.tokens_sold,
            unsold_returned = unsold,
            funds_released,
            "token sale ended"
        );

        Ok(Settlement {
            receipt: state.journal.record(Uuid::new_v4(), Vec::new()),
            unsold_returned: unsold,
            funds_released,
        })
    }
}
