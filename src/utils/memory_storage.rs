//! In-memory storage implementation

use std::collections::HashMap;

use crate::traits::*;
use crate::types::*;

/// In-memory storage implementation, the default ledger backend
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    balances: HashMap<Address, Amount>,
    allowances: HashMap<(Address, Address), Amount>,
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStorage for MemoryStorage {
    fn balance(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn set_balance(&mut self, account: Address, amount: Amount) {
        if amount == 0 {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, amount);
        }
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    fn set_allowance(&mut self, owner: Address, spender: Address, amount: Amount) {
        if amount == 0 {
            self.allowances.remove(&(owner, spender));
        } else {
            self.allowances.insert((owner, spender), amount);
        }
    }

    fn balances(&self) -> Vec<(Address, Amount)> {
        self.balances
            .iter()
            .map(|(account, amount)| (*account, *amount))
            .collect()
    }

    fn allowances(&self) -> Vec<(Address, Address, Amount)> {
        self.allowances
            .iter()
            .map(|((owner, spender), amount)| (*owner, *spender, *amount))
            .collect()
    }
}
