//! Traits for storage abstraction

use crate::types::*;

/// Storage abstraction for token balances and allowances
///
/// This trait allows the ledger to keep its state in any backend by
/// implementing these methods. The ledger serializes all access to a storage
/// instance behind one lock and only writes once every check for an operation
/// has passed, so implementations do not need their own synchronization and
/// writes cannot fail.
pub trait TokenStorage: Send + Sync {
    /// Balance of an account (0 for unknown accounts)
    fn balance(&self, account: &Address) -> Amount;

    /// Overwrite the balance of an account
    fn set_balance(&mut self, account: Address, amount: Amount);

    /// Amount `spender` may move out of `owner`'s balance (0 if never approved)
    fn allowance(&self, owner: &Address, spender: &Address) -> Amount;

    /// Overwrite the allowance of `spender` over `owner`'s balance
    fn set_allowance(&mut self, owner: Address, spender: Address, amount: Amount);

    /// All accounts with a recorded balance, in no particular order
    fn balances(&self) -> Vec<(Address, Amount)>;

    /// All recorded allowances as `(owner, spender, amount)`
    fn allowances(&self) -> Vec<(Address, Address, Amount)>;
}
