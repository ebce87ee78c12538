//! Summary
//!
//! Text rendering of summary panels and order receipts, for the demo
//! walkthrough and the confirmation view. Pure presentation over
//! [`PriceBreakdown`] and [`Order`]; nothing here touches storage.

use rusty_money::{Money, iso};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

use crate::{cart::CartLine, checkout::Order, pricing::PriceBreakdown};

/// Format a whole-unit amount as Indian rupees, with the lakh/crore digit
/// grouping the storefront uses.
#[must_use]
pub fn format_inr(amount: u64) -> String {
    let amount = i64::try_from(amount).unwrap_or(i64::MAX);

    Money::from_major(amount, iso::INR).to_string()
}

fn right_align_last_column(builder: Builder) -> String {
    let mut table = builder.build();

    table.with(Style::sharp());
    table.modify(Columns::last(), Alignment::right());

    table.to_string()
}

/// Render the order-summary panel for a computed breakdown.
#[must_use]
pub fn price_summary(breakdown: &PriceBreakdown) -> String {
    let mut builder = Builder::default();

    builder.push_record([
        format!("Subtotal ({} items)", breakdown.item_count),
        format_inr(breakdown.subtotal),
    ]);

    if breakdown.savings > 0 {
        builder.push_record([
            "Total Savings".to_owned(),
            format!("-{}", format_inr(breakdown.savings)),
        ]);
    }

    let shipping = if breakdown.shipping == 0 {
        "Free".to_owned()
    } else {
        format_inr(breakdown.shipping)
    };

    builder.push_record(["Shipping".to_owned(), shipping]);
    builder.push_record([
        format!("{} ({}%)", breakdown.tax_label, breakdown.tax_rate),
        format_inr(breakdown.tax),
    ]);
    builder.push_record(["Total".to_owned(), format_inr(breakdown.total)]);

    right_align_last_column(builder)
}

fn items_table(lines: &[CartLine]) -> String {
    let mut builder = Builder::default();

    builder.push_record(["Item", "Qty", "Amount"]);

    for line in lines {
        builder.push_record([
            line.name.clone(),
            line.quantity.to_string(),
            format_inr(line.line_total()),
        ]);
    }

    right_align_last_column(builder)
}

/// Render a confirmed order as a printable receipt.
#[must_use]
pub fn order_receipt(order: &Order) -> String {
    let address = &order.shipping_address;

    let mut receipt = format!(
        "Order {}\nPlaced {}\nStatus: confirmed\n\n{}\n",
        order.order_id,
        order.order_date,
        items_table(&order.items),
    );

    receipt.push_str(&format!(
        "\nTotal paid: {} via {}\n",
        format_inr(order.total_amount),
        order.payment_method,
    ));

    receipt.push_str(&format!(
        "\nShip to:\n  {}\n  {}\n",
        address.full_name, address.address,
    ));

    if let Some(landmark) = &address.landmark {
        receipt.push_str(&format!("  {landmark}\n"));
    }

    receipt.push_str(&format!(
        "  {}, {} - {}\n  {}\n  {}\n",
        address.city, address.state, address.pincode, address.country, address.phone,
    ));

    receipt.push_str(&format!(
        "\nEstimated delivery: {}\n",
        order.estimated_delivery(),
    ));

    receipt
}
