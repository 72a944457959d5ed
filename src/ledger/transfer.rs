//! Transfers, approvals and delegated transfers

use uuid::Uuid;

use crate::ledger::core::TokenLedger;
use crate::traits::*;
use crate::types::*;

/// Move `amount` from `from` to `to`. Callers must have checked the balance.
fn move_balance<S: TokenStorage>(storage: &mut S, from: Address, to: Address, amount: Amount) {
    let from_balance = storage.balance(&from);
    storage.set_balance(from, from_balance - amount);

    // Read after the debit so a self-transfer nets out
    let to_balance = storage.balance(&to);
    storage.set_balance(to, to_balance + amount);
}

impl<S: TokenStorage> TokenLedger<S> {
    /// Transfer `amount` from `caller` to `to`
    ///
    /// A zero amount is a valid no-op transfer and still emits a `Transfer`
    /// event.
    pub fn transfer(&self, caller: Address, to: Address, amount: Amount) -> TokenResult<Receipt> {
        let mut state = self.write_state();

        let balance = state.storage.balance(&caller);
        if balance < amount {
            tracing::warn!(from = %caller, to = %to, value = amount, balance, "transfer rejected");
            return Err(TokenError::InsufficientBalance {
                account: caller,
                balance,
                needed: amount,
            });
        }

        move_balance(&mut state.storage, caller, to, amount);
        tracing::debug!(from = %caller, to = %to, value = amount, "transfer");

        Ok(state.journal.record(
            Uuid::new_v4(),
            vec![Event::Transfer {
                from: caller,
                to,
                value: amount,
            }],
        ))
    }

    /// Set the allowance of `spender` over `caller`'s balance to `amount`
    ///
    /// Overwrites any previous allowance; never fails.
    pub fn approve(&self, caller: Address, spender: Address, amount: Amount) -> TokenResult<Receipt> {
        let mut state = self.write_state();

        state.storage.set_allowance(caller, spender, amount);
        tracing::debug!(owner = %caller, spender = %spender, value = amount, "approve");

        Ok(state.journal.record(
            Uuid::new_v4(),
            vec![Event::Approval {
                owner: caller,
                spender,
                value: amount,
            }],
        ))
    }

    /// Transfer `amount` from `from` to `to` on behalf of `from`, spending
    /// `caller`'s allowance
    pub fn transfer_from(
        &self,
        caller: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> TokenResult<Receipt> {
        let mut state = self.write_state();

        let balance = state.storage.balance(&from);
        if balance < amount {
            tracing::warn!(spender = %caller, from = %from, to = %to, value = amount, balance, "delegated transfer rejected");
            return Err(TokenError::InsufficientBalance {
                account: from,
                balance,
                needed: amount,
            });
        }

        let allowance = state.storage.allowance(&from, &caller);
        if allowance < amount {
            tracing::warn!(spender = %caller, from = %from, to = %to, value = amount, allowance, "delegated transfer rejected");
            return Err(TokenError::InsufficientAllowance {
                owner: from,
                spender: caller,
                allowance,
                needed: amount,
            });
        }

        move_balance(&mut state.storage, from, to, amount);
        state
            .storage
            .set_allowance(from, caller, allowance - amount);
        tracing::debug!(spender = %caller, from = %from, to = %to, value = amount, "transfer_from");

        Ok(state.journal.record(
            Uuid::new_v4(),
            vec![Event::Transfer {
                from,
                to,
                value: amount,
            }],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::memory_storage::MemoryStorage;

    fn accounts() -> (Address, Address, Address) {
        (
            Address::repeat_byte(0xa1),
            Address::repeat_byte(0xb0),
            Address::repeat_byte(0xc0),
        )
    }

    fn ledger(owner: Address) -> TokenLedger<MemoryStorage> {
        TokenLedger::new(owner, 1_000_000)
    }

    #[test]
    fn test_transfer_moves_balance_and_emits_event() {
        let (alice, bob, _) = accounts();
        let ledger = ledger(alice);

        let receipt = ledger.transfer(alice, bob, 250_000).unwrap();

        assert!(receipt.success);
        assert_eq!(
            receipt.logs,
            vec![Event::Transfer {
                from: alice,
                to: bob,
                value: 250_000
            }]
        );
        assert_eq!(ledger.balance_of(&bob), 250_000);
        assert_eq!(ledger.balance_of(&alice), 750_000);
        assert_eq!(ledger.events(), receipt.logs);
    }

    #[test]
    fn test_transfer_rejects_insufficient_balance() {
        let (alice, bob, _) = accounts();
        let ledger = ledger(alice);

        let err = ledger.transfer(alice, bob, 99_999_999).unwrap_err();

        assert_eq!(
            err,
            TokenError::InsufficientBalance {
                account: alice,
                balance: 1_000_000,
                needed: 99_999_999
            }
        );
        assert_eq!(ledger.balance_of(&alice), 1_000_000);
        assert_eq!(ledger.balance_of(&bob), 0);
        assert!(ledger.events().is_empty());
    }

    #[test]
    fn test_zero_transfer_succeeds_with_event() {
        let (alice, bob, _) = accounts();
        let ledger = ledger(alice);

        let receipt = ledger.transfer(bob, alice, 0).unwrap();

        assert_eq!(receipt.logs.len(), 1);
        assert_eq!(ledger.balance_of(&alice), 1_000_000);
    }

    #[test]
    fn test_self_transfer_keeps_balance() {
        let (alice, _, _) = accounts();
        let ledger = ledger(alice);

        ledger.transfer(alice, alice, 400).unwrap();

        assert_eq!(ledger.balance_of(&alice), 1_000_000);
        assert!(ledger.validate_integrity().is_valid);
    }

    #[test]
    fn test_approve_overwrites() {
        let (alice, bob, _) = accounts();
        let ledger = ledger(alice);

        let receipt = ledger.approve(alice, bob, 100).unwrap();
        assert_eq!(
            receipt.logs,
            vec![Event::Approval {
                owner: alice,
                spender: bob,
                value: 100
            }]
        );
        assert_eq!(ledger.allowance(&alice, &bob), 100);

        ledger.approve(alice, bob, 30).unwrap();
        assert_eq!(ledger.allowance(&alice, &bob), 30);
        assert_eq!(ledger.events().len(), 2);
    }

    #[test]
    fn test_approve_does_not_require_balance() {
        let (_, bob, carol) = accounts();
        let ledger = ledger(Address::repeat_byte(1));

        ledger.approve(bob, carol, 5_000_000).unwrap();
        assert_eq!(ledger.allowance(&bob, &carol), 5_000_000);
    }

    #[test]
    fn test_transfer_from_spends_allowance() {
        let (alice, spender, to) = accounts();
        let ledger = ledger(alice);
        ledger.approve(alice, spender, 10).unwrap();

        let receipt = ledger.transfer_from(spender, alice, to, 10).unwrap();

        assert_eq!(
            receipt.logs,
            vec![Event::Transfer {
                from: alice,
                to,
                value: 10
            }]
        );
        assert_eq!(ledger.balance_of(&to), 10);
        assert_eq!(ledger.balance_of(&alice), 999_990);
        assert_eq!(ledger.allowance(&alice, &spender), 0);

        let err = ledger.transfer_from(spender, alice, to, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientAllowance);
    }

    #[test]
    fn test_transfer_from_checks_balance_before_allowance() {
        let (alice, spender, to) = accounts();
        let ledger = ledger(alice);
        ledger.transfer(alice, to, 1_000_000).unwrap();

        let err = ledger.transfer_from(spender, alice, to, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientBalance);
    }

    #[test]
    fn test_failed_transfer_from_changes_nothing() {
        let (alice, spender, to) = accounts();
        let ledger = ledger(alice);
        ledger.approve(alice, spender, 10).unwrap();
        let before = ledger.snapshot();

        assert!(ledger.transfer_from(spender, alice, to, 20).is_err());

        assert_eq!(ledger.snapshot(), before);
        assert_eq!(ledger.events().len(), 1);
    }
}
