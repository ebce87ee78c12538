//! Checkout Walkthrough
//!
//! Runs one full trip through the pipeline: seed the sample catalog, add
//! items to the cart, capture a shipping address, settle the simulated
//! payment and print the receipt.
//!
//! Use `-c` to ship to a different country (unknown ones fall back to the
//! India tax rule), `-s` to keep the storage directory between runs, and
//! `-d` to change the settlement delay.

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mandi::{
    fixtures::sample_catalog,
    prelude::*,
    summary::{order_receipt, price_summary},
    utils::DemoArgs,
};

#[expect(clippy::print_stdout, reason = "Example code")]
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = DemoArgs::parse();

    let tempdir = tempfile::tempdir()?;
    let dir = args
        .storage_dir
        .clone()
        .unwrap_or_else(|| tempdir.path().to_path_buf());

    let storage = JsonFileStorage::open(dir)?;
    let catalog = sample_catalog()?;

    // Shop: one top link assembly and two oil filters.
    let cart = CartStore::new(storage.clone());

    cart.add_one(
        catalog
            .get(ProductId(1))
            .ok_or_else(|| anyhow::anyhow!("product 1 missing from sample catalog"))?,
    )?;
    cart.add(
        catalog
            .get(ProductId(33))
            .ok_or_else(|| anyhow::anyhow!("product 33 missing from sample catalog"))?,
        2,
    )?;

    let table = TaxTable::default();
    let breakdown = PriceBreakdown::compute(&cart.snapshot()?, table.rule_for(&args.country));

    println!("Order summary (shipping to {}):", args.country);
    println!("{}", price_summary(&breakdown));

    // Checkout: capture the shipping address.
    let address = ShippingAddress {
        full_name: "Raman Pillai".into(),
        email: "raman.pillai@example.com".into(),
        phone: "9876543210".into(),
        address: "14 Mettur Road, Erode".into(),
        city: "Erode".into(),
        state: "Tamil Nadu".into(),
        pincode: "638001".into(),
        landmark: Some("Opposite grain market".into()),
        country: args.country.clone(),
    };

    AddressCapture::new(storage.clone()).submit(&address)?;

    // Payment: debit card through the simulated gateway.
    let gateway = SimulatedGateway::new(Duration::from_millis(args.delay_ms));
    let finalizer = OrderFinalizer::new(storage.clone(), gateway);
    let mut flow = PaymentFlow::new();

    flow.select(PaymentMethod::Debit)?;

    println!("Processing payment...");

    let order = flow.confirm(&finalizer).await?;

    println!();
    println!("{}", order_receipt(&order));

    Ok(())
}
