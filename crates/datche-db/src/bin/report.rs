//! # Daily Report
//!
//! Prints the day's summary: sale count, units per product, balances per
//! payment method and the two currency totals. With `--method`, also lists
//! that method's transactions (the per-method export in text form).
//!
//! ## Usage
//! ```bash
//! cargo run -p datche-db --bin report
//! cargo run -p datche-db --bin report -- --method cash
//! ```

use datche_core::{Currency, PaymentMethod, SaleRecord, SaleStats};
use datche_db::{init_tracing, Ledger, LedgerConfig};
use std::env;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut config_path: Option<PathBuf> = None;
    let mut db_path: Option<PathBuf> = None;
    let mut method: Option<PaymentMethod> = None;

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
            "--method" | "-m" => {
                if i + 1 < args.len() {
                    method = Some(args[i + 1].parse()?);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Datché POS Daily Report");
                println!();
                println!("Usage: report [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>    ledger.toml to read");
                println!("  -d, --db <PATH>        Database file path");
                println!("  -m, --method <METHOD>  List transactions for revolut, mobile_money or cash");
                println!("  -h, --help             Show this help message");
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

    let ledger = Ledger::open(&config).await?;

    let stats = ledger.daily_stats().await?;
    print_summary(&stats);

    let low = ledger.low_stock().await?;
    if !low.is_empty() {
        println!();
        println!("Low stock (< {}):", config.low_stock_threshold());
        for entry in low {
            println!("  {:<10} {:>4}", entry.product.name(), entry.quantity);
        }
    }

    if let Some(method) = method {
        let sales = ledger.sales_by_payment_method(method).await?;
        println!();
        print_transactions(method, &sales);
    }

    ledger.database().close().await;
    Ok(())
}

fn print_summary(stats: &SaleStats) {
    println!("Daily summary");
    println!("=============");
    println!("Sales: {}   Units: {}", stats.sale_count, stats.total_quantity);
    println!();

    println!("Units by product:");
    for (product, quantity) in &stats.quantity_by_product {
        if *quantity > 0 {
            println!("  {:<10} {:>4}", product.name(), quantity);
        }
    }
    println!();

    println!("Balances by payment method:");
    for balance in stats.balances() {
        println!(
            "  {:<14} {:>16}",
            balance.payment_method.label(),
            balance.currency.format(balance.total)
        );
    }
    println!();

    println!("Total EUR:  {}", Currency::Eur.format(stats.total_eur));
    println!("Total FCFA: {}", Currency::Fcfa.format(stats.total_fcfa));
}

fn print_transactions(method: PaymentMethod, sales: &[SaleRecord]) {
    println!("{} transactions ({})", method.label(), sales.len());
    for sale in sales {
        println!(
            "  {}  {:<10} x{:<3} {:>14}  change {:>14}",
            sale.created_at.format("%H:%M:%S"),
            sale.product.name(),
            sale.quantity,
            sale.currency.format(sale.total),
            sale.currency.format(sale.change_due),
        );
    }
}
