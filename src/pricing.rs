//! Pricing
//!
//! Pure functions over a cart snapshot. Everything here is
//! order-independent and idempotent: no function mutates its input, and
//! repeated calls over the same lines yield the same amounts.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

use crate::{cart::CartLine, tax::TaxRule};

/// Orders at or above this subtotal ship free.
pub const FREE_SHIPPING_THRESHOLD: u64 = 2000;

/// Flat shipping fee below the free-shipping threshold.
pub const FLAT_SHIPPING_FEE: u64 = 100;

/// Sum of price × quantity over all lines.
#[must_use]
pub fn subtotal(lines: &[CartLine]) -> u64 {
    lines.iter().map(CartLine::line_total).sum()
}

/// Sum of the per-unit discount × quantity over lines that carry an offer
/// price. A line whose offer price is not below its price contributes
/// nothing.
#[must_use]
pub fn savings(lines: &[CartLine]) -> u64 {
    lines.iter().map(CartLine::line_savings).sum()
}

/// Total units across all lines.
#[must_use]
pub fn item_count(lines: &[CartLine]) -> u64 {
    lines.iter().map(|line| u64::from(line.quantity)).sum()
}

/// Shipping cost for a subtotal: a single fixed free-shipping cliff, not a
/// tiered schedule.
#[must_use]
pub fn shipping_cost(subtotal: u64) -> u64 {
    if subtotal >= FREE_SHIPPING_THRESHOLD {
        0
    } else {
        FLAT_SHIPPING_FEE
    }
}

/// How much more the shopper must spend to reach free shipping, or `None`
/// once the threshold is met. Drives the "add ₹X more" hint.
#[must_use]
pub fn free_shipping_gap(subtotal: u64) -> Option<u64> {
    (subtotal < FREE_SHIPPING_THRESHOLD).then(|| FREE_SHIPPING_THRESHOLD - subtotal)
}

/// Tax on a subtotal under the given rule, rounded half-up to the nearest
/// whole currency unit. Rates may be fractional (e.g. 8.5%).
#[must_use]
pub fn tax_amount(subtotal: u64, rule: &TaxRule) -> u64 {
    let tax = Decimal::from(subtotal) * rule.rate / Decimal::ONE_HUNDRED;

    tax.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .unwrap_or(u64::MAX)
}

/// Subtotal + shipping + tax for the destination's rule.
#[must_use]
pub fn grand_total(lines: &[CartLine], rule: &TaxRule) -> u64 {
    let subtotal = subtotal(lines);

    subtotal + shipping_cost(subtotal) + tax_amount(subtotal, rule)
}

/// Everything a summary panel shows, computed in one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceBreakdown {
    /// Sum of price × quantity.
    pub subtotal: u64,

    /// Total offer-price savings.
    pub savings: u64,

    /// Total units across all lines.
    pub item_count: u64,

    /// Shipping cost after the free-shipping cliff.
    pub shipping: u64,

    /// Tax amount for the destination's rule.
    pub tax: u64,

    /// Grand total: subtotal + shipping + tax.
    pub total: u64,

    /// Display label of the applied tax (e.g. "GST").
    pub tax_label: String,

    /// Applied tax rate as a percentage.
    pub tax_rate: Decimal,
}

impl PriceBreakdown {
    /// Compute the full breakdown for a cart snapshot and tax rule.
    #[must_use]
    pub fn compute(lines: &[CartLine], rule: &TaxRule) -> Self {
        let subtotal = subtotal(lines);
        let shipping = shipping_cost(subtotal);
        let tax = tax_amount(subtotal, rule);

        Self {
            subtotal,
            savings: savings(lines),
            item_count: item_count(lines),
            shipping,
            tax,
            total: subtotal + shipping + tax,
            tax_label: rule.label.clone(),
            tax_rate: rule.rate,
        }
    }
}
