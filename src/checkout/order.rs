//! Order model.

use std::fmt;

use jiff::{Span, Timestamp};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{address::ShippingAddress, cart::CartLine};

/// Prefix carried by every order id.
pub const ORDER_ID_PREFIX: &str = "TKC";

/// Days quoted for delivery on the confirmation view.
pub const DELIVERY_DAYS: i64 = 5;

/// How the shopper paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Debit card.
    Debit,

    /// Credit card.
    Credit,

    /// Direct bank transfer.
    Netbanking,
}

impl PaymentMethod {
    /// Every selectable method, in presentation order.
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::Debit,
        PaymentMethod::Credit,
        PaymentMethod::Netbanking,
    ];

    /// Human-readable name shown on receipts.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            PaymentMethod::Debit => "Debit Card",
            PaymentMethod::Credit => "Credit Card",
            PaymentMethod::Netbanking => "Net Banking",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Lifecycle status of an order. Orders are only ever recorded confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Payment settled; the order exists.
    Confirmed,
}

/// A confirmed order: the terminal record of one trip through the
/// pipeline.
///
/// The wire shape (camelCase keys) is the persisted `lastOrder` record.
/// Immutable once created; the store holds only the most recent order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique order id: prefix + creation milliseconds + entropy suffix.
    pub order_id: String,

    /// The cart lines as they stood at settlement.
    pub items: Vec<CartLine>,

    /// Where the order ships.
    pub shipping_address: ShippingAddress,

    /// How the shopper paid.
    pub payment_method: PaymentMethod,

    /// Grand total charged, in whole currency units.
    pub total_amount: u64,

    /// When the order was created.
    pub order_date: Timestamp,

    /// Always [`OrderStatus::Confirmed`].
    pub status: OrderStatus,
}

impl Order {
    /// Generate an order id for the given creation time.
    ///
    /// The id keeps the storefront's prefix-plus-milliseconds shape and
    /// appends a random four-digit suffix so that two settlements within
    /// the same millisecond cannot collide.
    #[must_use]
    pub fn generate_id(at: Timestamp) -> String {
        let suffix: u16 = rand::thread_rng().gen_range(0..10_000);

        format!("{ORDER_ID_PREFIX}{}-{suffix:04}", at.as_millisecond())
    }

    /// Delivery estimate quoted to the shopper: order date plus five days.
    #[must_use]
    pub fn estimated_delivery(&self) -> Timestamp {
        self.order_date
            .checked_add(Span::new().hours(24 * DELIVERY_DAYS))
            .unwrap_or(self.order_date)
    }
}
