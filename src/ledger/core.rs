//! Token ledger: metadata, supply and read access to balances and allowances

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::TokenConfig;
use crate::ledger::journal::EventJournal;
use crate::traits::*;
use crate::types::*;
use crate::utils::memory_storage::MemoryStorage;
use crate::utils::validation::validate_metadata;

/// Mutable ledger state, guarded as a single unit
pub(crate) struct LedgerState<S> {
    pub(crate) storage: S,
    pub(crate) journal: EventJournal,
}

/// Fungible token ledger
///
/// Owns the authoritative balances and allowances. The whole mutable state
/// sits behind one lock: every mutation takes it exclusively for its full
/// duration, and every read takes it shared, so no caller can observe a
/// partially applied transfer. Share a ledger between callers (and with a
/// [`TokenSale`](crate::sale::TokenSale)) through an `Arc`.
pub struct TokenLedger<S: TokenStorage = MemoryStorage> {
    address: Address,
    metadata: TokenMetadata,
    total_supply: Amount,
    pub(crate) state: RwLock<LedgerState<S>>,
}

impl TokenLedger<MemoryStorage> {
    /// Create a Dapp Token ledger crediting `initial_supply` to `creator`
    pub fn new(creator: Address, initial_supply: Amount) -> Self {
        let mut storage = MemoryStorage::new();
        storage.set_balance(creator, initial_supply);
        Self::assemble(TokenMetadata::default(), initial_supply, storage)
    }

    /// Create a ledger from configuration, validating the metadata first
    pub fn from_config(creator: Address, config: &TokenConfig) -> TokenResult<Self> {
        Self::with_storage(
            creator,
            config.metadata(),
            config.initial_supply,
            MemoryStorage::new(),
        )
    }
}

impl<S: TokenStorage> TokenLedger<S> {
    /// Create a ledger on a custom, empty storage backend
    pub fn with_storage(
        creator: Address,
        metadata: TokenMetadata,
        initial_supply: Amount,
        mut storage: S,
    ) -> TokenResult<Self> {
        validate_metadata(&metadata)?;

        if !storage.balances().is_empty() {
            return Err(TokenError::Validation(
                "Ledger storage must be empty at construction".to_string(),
            ));
        }

        storage.set_balance(creator, initial_supply);
        Ok(Self::assemble(metadata, initial_supply, storage))
    }

    fn assemble(metadata: TokenMetadata, total_supply: Amount, storage: S) -> Self {
        let address = Address::generate();
        tracing::info!(
            ledger = %address,
            symbol = %metadata.symbol,
            total_supply,
            "token ledger created"
        );

        Self {
            address,
            metadata,
            total_supply,
            state: RwLock::new(LedgerState {
                storage,
                journal: EventJournal::new(),
            }),
        }
    }

    pub(crate) fn read_state(&self) -> RwLockReadGuard<'_, LedgerState<S>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write_state(&self) -> RwLockWriteGuard<'_, LedgerState<S>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Address of the ledger itself
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn symbol(&self) -> &str {
        &self.metadata.symbol
    }

    pub fn standard(&self) -> &str {
        &self.metadata.standard
    }

    pub fn metadata(&self) -> &TokenMetadata {
        &self.metadata
    }

    /// Total supply, fixed at construction
    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Balance of an account (0 for unknown accounts)
    pub fn balance_of(&self, account: &Address) -> Amount {
        self.read_state().storage.balance(account)
    }

    /// Amount `spender` may still move out of `owner`'s balance
    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.read_state().storage.allowance(owner, spender)
    }

    /// Accounts currently holding a non-zero balance
    pub fn holders(&self) -> Vec<Address> {
        let mut holders: Vec<Address> = self
            .read_state()
            .storage
            .balances()
            .into_iter()
            .filter(|(_, amount)| *amount > 0)
            .map(|(account, _)| account)
            .collect();
        holders.sort();
        holders
    }

    /// Every event emitted by this ledger, oldest first
    pub fn events(&self) -> Vec<Event> {
        self.read_state().journal.events()
    }

    /// Every journal entry of this ledger, oldest first
    pub fn log_entries(&self) -> Vec<LogEntry> {
        self.read_state().journal.entries().to_vec()
    }

    /// Consistent copy of the ledger state, taken under a single read lock
    pub fn snapshot(&self) -> LedgerSnapshot {
        let state = self.read_state();

        let balances: BTreeMap<Address, Amount> = state
            .storage
            .balances()
            .into_iter()
            .filter(|(_, amount)| *amount > 0)
            .collect();

        let mut allowances: Vec<AllowanceRecord> = state
            .storage
            .allowances()
            .into_iter()
            .filter(|(_, _, amount)| *amount > 0)
            .map(|(owner, spender, amount)| AllowanceRecord {
                owner,
                spender,
                amount,
            })
            .collect();
        allowances.sort_by_key(|record| (record.owner, record.spender));

        LedgerSnapshot {
            address: self.address,
            metadata: self.metadata.clone(),
            total_supply: self.total_supply,
            balances,
            allowances,
        }
    }

    /// Check that the balances still add up to the total supply
    pub fn validate_integrity(&self) -> IntegrityReport {
        let balances = self.read_state().storage.balances();
        let mut issues = Vec::new();

        let sum_of_balances = balances
            .iter()
            .try_fold(0 as Amount, |acc, (_, amount)| acc.checked_add(*amount));

        match sum_of_balances {
            Some(sum) if sum != self.total_supply => issues.push(format!(
                "Balances sum to {} but total supply is {}",
                sum, self.total_supply
            )),
            None => issues.push("Sum of balances overflows".to_string()),
            _ => {}
        }

        IntegrityReport {
            total_supply: self.total_supply,
            sum_of_balances,
            holder_count: balances.iter().filter(|(_, amount)| *amount > 0).count(),
            is_valid: issues.is_empty(),
            issues,
        }
    }
}

/// One outstanding allowance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceRecord {
    pub owner: Address,
    pub spender: Address,
    pub amount: Amount,
}

/// Point-in-time copy of a ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub address: Address,
    pub metadata: TokenMetadata,
    pub total_supply: Amount,
    /// Non-zero balances
    pub balances: BTreeMap<Address, Amount>,
    /// Non-zero allowances, ordered by owner then spender
    pub allowances: Vec<AllowanceRecord>,
}

/// Report on ledger integrity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub total_supply: Amount,
    /// `None` if the sum does not fit in an [`Amount`]
    pub sum_of_balances: Option<Amount>,
    pub holder_count: usize,
    pub is_valid: bool,
    pub issues: Vec<String>,
}
