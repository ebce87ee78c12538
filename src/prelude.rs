//! Mandi prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    address::{AddressCapture, AddressField, ShippingAddress, SubmitError, ValidationErrors},
    cart::{CartLine, CartStore},
    catalog::{Catalog, CatalogError, MachineryProduct, Product, ProductId, SparePartProduct},
    checkout::{
        CancelHandle, CancelSignal, CheckoutError, Order, OrderFinalizer, OrderStatus,
        PaymentError, PaymentFlow, PaymentGateway, PaymentMethod, PaymentState,
        SettlementReceipt, SimulatedGateway,
    },
    pricing::PriceBreakdown,
    stages::{Stage, resolve_entry},
    storage::{JsonFileStorage, MemoryStorage, Slot, Storage, StorageError},
    tax::{TaxRule, TaxTable},
};
