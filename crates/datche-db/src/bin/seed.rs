//! # Ledger Seeder
//!
//! Prepares a fresh stand database: the default price table and, when
//! asked, an opening stock count for every stocked product.
//!
//! ## Usage
//! ```bash
//! # Default prices into the configured database
//! cargo run -p datche-db --bin seed
//!
//! # 20 units of every stocked product, custom database
//! cargo run -p datche-db --bin seed -- --stock 20 --db ./datche_dev.db
//!
//! # Overwrite prices that were already edited
//! cargo run -p datche-db --bin seed -- --force-prices
//! ```
//!
//! Without `--stock`, `[stock] initial_quantity` from `ledger.toml` (or
//! `DATCHE_INITIAL_STOCK`) is used.

use datche_core::Product;
use datche_db::{init_tracing, Ledger, LedgerConfig};
use std::env;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut config_path: Option<PathBuf> = None;
    let mut db_path: Option<PathBuf> = None;
    let mut stock: Option<i64> = None;
    let mut force_prices = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--stock" | "-s" => {
                if i + 1 < args.len() {
                    stock = Some(args[i + 1].parse()?);
                    i += 1;
                }
            }
            "--force-prices" => force_prices = true,
            "--help" | "-h" => {
                println!("Datché POS Ledger Seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>  ledger.toml to read");
                println!("  -d, --db <PATH>      Database file path");
                println!("  -s, --stock <N>      Opening units for every stocked product");
                println!("      --force-prices   Overwrite an existing price table");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            other => eprintln!("Ignoring unknown argument: {}", other),
        }
        i += 1;
    }

    let mut config = LedgerConfig::load(config_path)?;
    if let Some(path) = db_path {
        config.database.path = Some(path);
    }
    let stock = stock.or(config.stock.initial_quantity);

    println!("🌱 Datché POS Ledger Seeder");
    println!("===========================");
    println!("Database: {}", config.database_path().display());
    println!();

    if let Some(parent) = config.database_path().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let ledger = Ledger::open(&config).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = ledger.prices().await?;
    if existing.is_empty() || force_prices {
        let prices = ledger.reset_prices().await?;
        println!("✓ Wrote default prices for {} products", prices.len());
    } else {
        println!("⚠ Price table already has {} rows", existing.len());
        println!("  Keeping them. Pass --force-prices to overwrite.");
    }

    match stock {
        Some(quantity) => {
            for product in Product::stocked() {
                ledger.set_stock(product, quantity).await?;
            }
            println!("✓ Set {} units for every stocked product", quantity);
        }
        None => println!("  Stock left untouched"),
    }

    ledger.database().close().await;
    println!();
    println!("Done.");

    Ok(())
}
