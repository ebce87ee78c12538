//! End-to-end pipeline tests: shop → cart → checkout → payment →
//! confirmation, over file-backed storage.

use mandi::{
    fixtures::sample_catalog,
    prelude::*,
    pricing,
    summary::{order_receipt, price_summary},
};
use testresult::TestResult;

fn india_address() -> ShippingAddress {
    ShippingAddress {
        full_name: "Raman Pillai".into(),
        email: "raman.pillai@example.com".into(),
        phone: "9876543210".into(),
        address: "14 Mettur Road, Erode".into(),
        city: "Erode".into(),
        state: "Tamil Nadu".into(),
        pincode: "638001".into(),
        landmark: None,
        country: "India".into(),
    }
}

#[tokio::test]
async fn reference_checkout_end_to_end() -> TestResult {
    let dir = tempfile::tempdir()?;
    let storage = JsonFileStorage::open(dir.path())?;
    let catalog = sample_catalog()?;

    // Shop: one top link assembly, two oil filters.
    let cart = CartStore::new(storage.clone());
    cart.add_one(catalog.get(ProductId(1)).expect("missing product 1"))?;
    cart.add(catalog.get(ProductId(33)).expect("missing product 33"), 2)?;

    let lines = cart.snapshot()?;
    let table = TaxTable::default();
    let breakdown = PriceBreakdown::compute(&lines, table.rule_for("India"));

    assert_eq!(breakdown.subtotal, 2750);
    assert_eq!(breakdown.shipping, 0, "2750 clears the free-shipping cliff");
    assert_eq!(breakdown.tax, 495);
    assert_eq!(breakdown.total, 3245);

    // Checkout is reachable now that the cart has lines.
    assert_eq!(resolve_entry(Stage::Checkout, &storage), Stage::Checkout);
    assert_eq!(
        resolve_entry(Stage::Payment, &storage),
        Stage::Shop,
        "payment needs an address first"
    );

    AddressCapture::new(storage.clone()).submit(&india_address())?;

    assert_eq!(resolve_entry(Stage::Payment, &storage), Stage::Payment);

    // Payment: select debit and confirm.
    let finalizer = OrderFinalizer::new(storage.clone(), SimulatedGateway::instant());
    let mut flow = PaymentFlow::new();

    flow.select(PaymentMethod::Debit)?;
    let order = flow.confirm(&finalizer).await?;

    assert_eq!(order.total_amount, 3245);
    assert_eq!(order.items.len(), 2);
    assert!(
        order.order_id.starts_with("TKC"),
        "unexpected order id: {}",
        order.order_id
    );

    // The order consumed the cart and the address.
    assert!(CartStore::new(storage.clone()).snapshot()?.is_empty());
    assert_eq!(AddressCapture::new(storage.clone()).saved()?, None);

    // Confirmation reads the recorded order; payment degrades to shop.
    assert_eq!(
        resolve_entry(Stage::Confirmation, &storage),
        Stage::Confirmation
    );
    assert_eq!(resolve_entry(Stage::Payment, &storage), Stage::Shop);

    let recorded = finalizer.last_order()?.expect("order should be recorded");

    assert_eq!(recorded.order_id, order.order_id);

    // The receipt renders from the recorded order alone.
    let receipt = order_receipt(&recorded);

    assert!(receipt.contains("₹3,245.00"), "got:\n{receipt}");

    Ok(())
}

#[tokio::test]
async fn invalid_phone_blocks_the_whole_submission() -> TestResult {
    let dir = tempfile::tempdir()?;
    let storage = JsonFileStorage::open(dir.path())?;
    let catalog = sample_catalog()?;

    CartStore::new(storage.clone())
        .add_one(catalog.get(ProductId(33)).expect("missing product 33"))?;

    let mut address = india_address();
    address.phone = "12345".into();

    let capture = AddressCapture::new(storage.clone());

    let errors = match capture.submit(&address) {
        Err(SubmitError::Invalid(errors)) => errors,
        other => panic!("expected a validation rejection, got {other:?}"),
    };

    assert_eq!(
        errors.message(AddressField::Phone),
        Some("Invalid phone number")
    );
    assert_eq!(errors.len(), 1, "only the phone should fail");

    // Nothing was persisted, so payment stays unreachable.
    assert_eq!(capture.saved()?, None);
    assert_eq!(resolve_entry(Stage::Payment, &storage), Stage::Shop);

    Ok(())
}

#[test]
fn cart_survives_a_restart() -> TestResult {
    let dir = tempfile::tempdir()?;
    let catalog = sample_catalog()?;

    {
        let storage = JsonFileStorage::open(dir.path())?;
        CartStore::new(storage).add(catalog.get(ProductId(7)).expect("missing product 7"), 3)?;
    }

    // A fresh process over the same profile sees the same cart.
    let storage = JsonFileStorage::open(dir.path())?;
    let lines = CartStore::new(storage).snapshot()?;

    assert_eq!(lines.len(), 1);
    assert_eq!(lines.first().map(|line| line.quantity), Some(3));

    Ok(())
}

#[test]
fn corrupt_profile_degrades_to_an_empty_cart() -> TestResult {
    let dir = tempfile::tempdir()?;

    std::fs::write(dir.path().join("cartItems.json"), "][ not json")?;

    let storage = JsonFileStorage::open(dir.path())?;

    assert!(CartStore::new(storage.clone()).snapshot()?.is_empty());
    assert_eq!(resolve_entry(Stage::Checkout, &storage), Stage::Cart);

    Ok(())
}

#[tokio::test]
async fn unknown_country_is_taxed_like_india() -> TestResult {
    let catalog = sample_catalog()?;
    let table = TaxTable::default();

    let storage = MemoryStorage::new();
    let cart = CartStore::new(storage.clone());
    cart.add_one(catalog.get(ProductId(1)).expect("missing product 1"))?;
    cart.add(catalog.get(ProductId(33)).expect("missing product 33"), 2)?;

    let lines = cart.snapshot()?;

    assert_eq!(
        pricing::tax_amount(pricing::subtotal(&lines), table.rule_for("Atlantis")),
        pricing::tax_amount(pricing::subtotal(&lines), table.rule_for("India")),
    );

    let mut address = india_address();
    address.country = "Atlantis".into();
    AddressCapture::new(storage.clone()).submit(&address)?;

    let order = OrderFinalizer::new(storage, SimulatedGateway::instant())
        .place_order(PaymentMethod::Netbanking)
        .await?;

    assert_eq!(order.total_amount, 3245, "fallback rule is India's 18%");

    Ok(())
}

#[test]
fn summary_panel_renders_the_running_cart() -> TestResult {
    let catalog = sample_catalog()?;
    let storage = MemoryStorage::new();
    let cart = CartStore::new(storage);

    cart.add(catalog.get(ProductId(33)).expect("missing product 33"), 2)?;

    let table = TaxTable::default();
    let breakdown = PriceBreakdown::compute(&cart.snapshot()?, table.rule_for("India"));
    let summary = price_summary(&breakdown);

    assert!(summary.contains("Subtotal (2 items)"), "got:\n{summary}");
    assert!(
        summary.contains("₹100.00"),
        "below the cliff the flat fee shows:\n{summary}"
    );

    Ok(())
}
