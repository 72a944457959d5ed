//! Native currency unit conversions

use bigdecimal::{BigDecimal, Signed, ToPrimitive, Zero};

use crate::types::*;

/// Number of wei in one ether
pub const WEI_PER_ETHER: Amount = 1_000_000_000_000_000_000;

/// Convert an amount of wei to ether
pub fn wei_to_ether(wei: Amount) -> BigDecimal {
    (BigDecimal::from(wei) / BigDecimal::from(WEI_PER_ETHER)).normalized()
}

/// Convert an amount of ether to wei
///
/// Rejects negative amounts, amounts finer than one wei and amounts that do
/// not fit in [`Amount`].
pub fn ether_to_wei(ether: &BigDecimal) -> TokenResult<Amount> {
    if ether.is_negative() {
        return Err(TokenError::Validation(format!(
            "Ether amount cannot be negative: {}",
            ether
        )));
    }

    let wei = ether * BigDecimal::from(WEI_PER_ETHER);
    if !(&wei - wei.with_scale(0)).is_zero() {
        return Err(TokenError::Validation(format!(
            "Ether amount {} is not a whole number of wei",
            ether
        )));
    }

    wei.to_u128().ok_or_else(|| {
        TokenError::Validation(format!("Ether amount {} does not fit in wei", ether))
    })
}
