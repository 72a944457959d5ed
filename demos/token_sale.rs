//! Token sale walkthrough
//!
//! Run with `RUST_LOG=debug` to see every ledger and sale transition. Pass a
//! JSON deployment config path as the first argument to override defaults.

use dapp_token::utils::wei_to_ether;
use dapp_token::{Address, DeploymentConfig, TokenLedger, TokenSale};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => DeploymentConfig::from_path(path)?,
        None => DeploymentConfig::default(),
    };

    println!("🪙 Dapp Token - Token Sale Example\n");

    let admin = Address::generate();
    let buyer = Address::generate();

    // 1. Deploy the ledger and the sale, then stock the sale
    let ledger = Arc::new(TokenLedger::from_config(admin, &config.token)?);
    let sale = TokenSale::from_config(Arc::clone(&ledger), admin, &config.sale)?;
    ledger.transfer(admin, sale.address(), config.sale.initial_inventory)?;

    println!(
        "📊 {} ({}) - {}",
        ledger.name(),
        ledger.symbol(),
        ledger.standard()
    );
    println!("  ✓ Ledger:  {}", ledger.address());
    println!("  ✓ Sale:    {}", sale.address());
    println!("  ✓ Price:   {} ether per token", sale.token_price_in_ether()?);
    println!("  ✓ Stocked: {} tokens\n", sale.inventory());

    // 2. Buy some tokens
    let units = 10;
    let payment = units * sale.token_price()?;
    let receipt = sale.buy_tokens(buyer, units, payment)?;
    println!("💰 Purchase {}", receipt.tx_id);
    for event in &receipt.logs {
        println!("  ✓ {}", serde_json::to_string(event)?);
    }

    // A wrong payment is rejected without side effects
    if let Err(err) = sale.buy_tokens(buyer, units, 1) {
        println!("  ✗ {}", err);
    }
    println!();

    // 3. Close the sale
    let settlement = sale.end_sale(admin)?;
    println!("🏁 Sale ended");
    println!("  ✓ Unsold tokens returned: {}", settlement.unsold_returned);
    println!(
        "  ✓ Funds released: {} ether",
        wei_to_ether(settlement.funds_released)
    );
    println!("  ✓ Admin balance: {}", ledger.balance_of(&admin));
    println!("  ✓ Buyer balance: {}", ledger.balance_of(&buyer));

    let report = ledger.validate_integrity();
    println!(
        "\n🔎 Integrity: {} ({} holders)",
        if report.is_valid { "valid" } else { "INVALID" },
        report.holder_count
    );

    Ok(())
}
