//! # Seed Data Generator
//!
//! Fills a QuickInvoice database with sample invoices for development.
//!
//! ```bash
//! cargo run -p quickinvoice-db --bin seed                    # 25 invoices
//! cargo run -p quickinvoice-db --bin seed -- --count 100
//! cargo run -p quickinvoice-db --bin seed -- --db ./data/quickinvoice.db
//! ```
//!
//! Each invoice gets a seller/customer pair, 1-4 priced line items and a
//! jurisdiction preset cycled from the catalog; every invoice is finalized
//! so the numbering counters get exercised too.

use std::env;

use quickinvoice_core::catalog;
use quickinvoice_core::money::Money;
use quickinvoice_core::types::{Invoice, InvoiceItem, Party};
use quickinvoice_core::update::{update, InvoicePatch};
use quickinvoice_db::{Database, DbConfig};

/// Seller names cycled across generated invoices.
const SELLERS: &[(&str, &str)] = &[
    ("Northwind Studio", "42 Harbour Lane, Liverpool"),
    ("Meridian Consulting", "Platz der Ideen 7, Düsseldorf"),
    ("Lotus Web Services", "12 Hill Road, Mumbai"),
    ("Dune Trading LLC", "Marina Plaza, Dubai"),
    ("Bluebird Press", "880 Fifth Avenue, New York"),
];

const CUSTOMERS: &[(&str, &str)] = &[
    ("Orchard Supplies", "3 Mill Street, Leeds"),
    ("Vertex Labs", "Hauptstrasse 19, Berlin"),
    ("Sagar Textiles", "7 MG Road, Pune"),
    ("Falcon Logistics", "Port Saeed, Dubai"),
    ("Granite & Co", "15 Pine Court, Boston"),
];

const SERVICES: &[(&str, i64)] = &[
    ("Logo design", 45_000),
    ("Landing page build", 120_000),
    ("Monthly hosting", 1_999),
    ("Consulting hour", 15_000),
    ("Copywriting", 30_000),
    ("Photo retouching", 7_500),
    ("SEO audit", 55_000),
];

const USAGE: &str = "\
Seeds a QuickInvoice database with sample invoices.

Usage: seed [OPTIONS]

Options:
  -c, --count <N>    Invoices to generate (default: 25)
  -d, --db <PATH>    Database file (default: ./quickinvoice_dev.db)
  -h, --help         Show this help";

struct SeedArgs {
    count: usize,
    db_path: String,
}

fn parse_args() -> Result<SeedArgs, String> {
    let mut parsed = SeedArgs {
        count: 25,
        db_path: "./quickinvoice_dev.db".to_string(),
    };

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--count" | "-c" => {
                let value = args.next().ok_or("--count needs a value")?;
                parsed.count = value
                    .parse()
                    .map_err(|_| format!("invalid count: {value}"))?;
            }
            "--db" | "-d" => {
                parsed.db_path = args.next().ok_or("--db needs a value")?;
            }
            "--help" | "-h" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            other => return Err(format!("unknown option: {other}")),
        }
    }

    Ok(parsed)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = parse_args().map_err(|e| format!("{e}\n\n{USAGE}"))?;

    println!("Seeding {} into {}", plural(args.count), args.db_path);

    let db = Database::new(DbConfig::new(&args.db_path)).await?;
    let repo = db.invoices();

    let existing = repo.count().await?;
    if existing > 0 {
        println!("Store already holds {existing} invoices; nothing seeded.");
        println!("Delete the database file to start over.");
        return Ok(());
    }

    let start = std::time::Instant::now();
    let mut generated = 0;

    for seed in 0..args.count {
        match repo.finalize(&generate_invoice(seed)).await {
            Ok(_) => generated += 1,
            Err(e) => eprintln!("invoice {seed} failed to finalize: {e}"),
        }
    }

    println!(
        "Seeded {} in {:.2?}.",
        plural(generated),
        start.elapsed()
    );

    println!("\nMost recent:");
    for invoice in repo.list_recent(5).await? {
        println!(
            "  {}  {}  {}",
            invoice.invoice_number,
            invoice.seller.name,
            invoice.currency.format(invoice.totals.total()),
        );
    }

    Ok(())
}

fn plural(count: usize) -> String {
    if count == 1 {
        "1 invoice".to_string()
    } else {
        format!("{count} invoices")
    }
}

/// Generates a single invoice with deterministic sample data.
fn generate_invoice(seed: usize) -> Invoice {
    let presets = catalog::PRESETS;
    let preset = &presets[seed % presets.len()];

    let (seller_name, seller_address) = SELLERS[seed % SELLERS.len()];
    let (customer_name, customer_address) = CUSTOMERS[(seed + 2) % CUSTOMERS.len()];

    let item_count = 1 + seed % 4;
    let items: Vec<InvoiceItem> = (0..item_count)
        .map(|n| {
            let (name, cents) = SERVICES[(seed + n) % SERVICES.len()];
            InvoiceItem::with(name, 1 + ((seed + n) % 3) as i64, Money::from_cents(cents))
        })
        .collect();

    let invoice = Invoice::from_preset(preset);
    update(
        &invoice,
        InvoicePatch {
            seller: Some(Party {
                name: seller_name.to_string(),
                address: seller_address.to_string(),
                tax_id: None,
            }),
            customer: Some(Party {
                name: customer_name.to_string(),
                address: customer_address.to_string(),
                tax_id: None,
            }),
            items: Some(items),
            qr_enabled: Some(seed % 2 == 0),
            ..Default::default()
        },
    )
}
