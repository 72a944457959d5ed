//! Validation utilities

use crate::types::*;

/// Validate a piece of token metadata (name, symbol or standard)
pub fn validate_metadata_field(field: &str, value: &str, max_len: usize) -> TokenResult<()> {
    if value.trim().is_empty() {
        return Err(TokenError::Validation(format!(
            "Token {} cannot be empty",
            field
        )));
    }

    if value.len() > max_len {
        return Err(TokenError::Validation(format!(
            "Token {} cannot exceed {} characters",
            field, max_len
        )));
    }

    Ok(())
}

/// Validate token metadata before a ledger is created
pub fn validate_metadata(metadata: &TokenMetadata) -> TokenResult<()> {
    validate_metadata_field("name", &metadata.name, 100)?;
    validate_metadata_field("standard", &metadata.standard, 100)?;
    validate_metadata_field("symbol", &metadata.symbol, 11)?;

    // Symbols are tickers: alphanumeric only
    if !metadata.symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(TokenError::Validation(
            "Token symbol can only contain ASCII letters and digits".to_string(),
        ));
    }

    Ok(())
}

/// Validate a sale unit price
pub fn validate_token_price(price: Amount) -> TokenResult<()> {
    if price == 0 {
        Err(TokenError::Validation(
            "Token price must be positive".to_string(),
        ))
    } else {
        Ok(())
    }
}
