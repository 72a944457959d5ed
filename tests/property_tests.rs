//! Property and concurrency tests for ledger and sale invariants

use dapp_token::{Address, ErrorKind, TokenLedger, TokenSale};
use proptest::prelude::*;
use std::sync::Arc;
use std::thread;

const SUPPLY: u128 = 1_000_000;

#[derive(Debug, Clone)]
enum Op {
    Transfer { caller: u8, to: u8, amount: u128 },
    Approve { caller: u8, spender: u8, amount: u128 },
    TransferFrom { caller: u8, from: u8, to: u8, amount: u128 },
}

fn account(index: u8) -> Address {
    Address::repeat_byte(index + 1)
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..4, 0u8..4, 0u128..600_000)
            .prop_map(|(caller, to, amount)| Op::Transfer { caller, to, amount }),
        (0u8..4, 0u8..4, 0u128..600_000)
            .prop_map(|(caller, spender, amount)| Op::Approve { caller, spender, amount }),
        (0u8..4, 0u8..4, 0u8..4, 0u128..600_000).prop_map(|(caller, from, to, amount)| {
            Op::TransferFrom {
                caller,
                from,
                to,
                amount,
            }
        }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    /// Property: balances always sum to the total supply, and every call
    /// either applies fully with one event or changes nothing.
    #[test]
    fn supply_is_conserved(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let ledger = TokenLedger::new(account(0), SUPPLY);

        for op in ops {
            let before = ledger.snapshot();
            let events_before = ledger.events().len();

            let result = match op {
                Op::Transfer { caller, to, amount } => {
                    ledger.transfer(account(caller), account(to), amount)
                }
                Op::Approve { caller, spender, amount } => {
                    ledger.approve(account(caller), account(spender), amount)
                }
                Op::TransferFrom { caller, from, to, amount } => {
                    ledger.transfer_from(account(caller), account(from), account(to), amount)
                }
            };

            match result {
                Ok(receipt) => {
                    prop_assert!(receipt.success);
                    prop_assert_eq!(receipt.logs.len(), 1);
                    prop_assert_eq!(ledger.events().len(), events_before + 1);
                }
                Err(_) => {
                    prop_assert_eq!(ledger.snapshot(), before);
                    prop_assert_eq!(ledger.events().len(), events_before);
                }
            }

            let total: u128 = ledger.snapshot().balances.values().sum();
            prop_assert_eq!(total, SUPPLY);
        }
    }

    /// Property: a delegated transfer above the allowance is always rejected,
    /// even when the owner's balance covers it.
    #[test]
    fn allowance_bounds_delegated_transfers(allowance in 0u128..1_000, extra in 1u128..1_000) {
        let owner = account(0);
        let spender = account(1);
        let ledger = TokenLedger::new(owner, SUPPLY);
        ledger.approve(owner, spender, allowance).unwrap();

        let err = ledger
            .transfer_from(spender, owner, account(2), allowance + extra)
            .unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::InsufficientAllowance);
        prop_assert_eq!(ledger.balance_of(&owner), SUPPLY);
        prop_assert_eq!(ledger.allowance(&owner, &spender), allowance);
    }

    /// Property: approving twice keeps only the latest value.
    #[test]
    fn approve_overwrites(first in any::<u128>(), second in any::<u128>()) {
        let ledger = TokenLedger::new(account(0), SUPPLY);
        ledger.approve(account(0), account(1), first).unwrap();
        ledger.approve(account(0), account(1), second).unwrap();

        prop_assert_eq!(ledger.allowance(&account(0), &account(1)), second);
    }
}

#[test]
fn concurrent_purchases_and_transfers_stay_consistent() {
    let admin = account(0);
    let price = 3;
    let ledger = Arc::new(TokenLedger::new(admin, SUPPLY));
    let sale = TokenSale::new(Arc::clone(&ledger), admin, price).unwrap();
    ledger.transfer(admin, sale.address(), 1_000).unwrap();

    thread::scope(|scope| {
        for buyer_index in 1..=8u8 {
            let sale = &sale;
            let ledger = &ledger;
            scope.spawn(move || {
                let buyer = account(buyer_index);
                for _ in 0..200 {
                    if sale.buy_tokens(buyer, 1, price).is_ok() {
                        // Pass some tokens on to exercise concurrent ledger writes
                        let _ = ledger.transfer(buyer, admin, 1);
                    }
                }
            });
        }
    });

    assert_eq!(sale.tokens_sold().unwrap(), 1_000);
    assert_eq!(sale.funds_raised().unwrap(), 1_000 * price);
    assert_eq!(sale.inventory(), 0);
    assert_eq!(sale.events().len(), 1_000);
    assert_eq!(ledger.balance_of(&admin), SUPPLY);
    assert!(ledger.validate_integrity().is_valid);
}
