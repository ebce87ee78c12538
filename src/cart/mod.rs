//! Cart
//!
//! The cart store is the single source of truth for what the shopper
//! intends to buy: a durable mapping from product id to line item, with a
//! price snapshot taken at add time. Every mutation is a synchronous
//! load → mutate → persist round trip against the `cartItems` slot.

use serde::{Deserialize, Serialize};

use crate::{
    catalog::{Product, ProductId},
    storage::{Slot, Storage, StorageError, read_slot, write_slot},
};

/// One product entry in the cart.
///
/// The wire shape (camelCase keys) is the persisted `cartItems` record.
/// Prices and names are copied from the product when the line is created;
/// later catalog changes do not retroactively affect lines already in the
/// cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Product id this line is keyed by.
    pub id: ProductId,

    /// Product name at add time.
    pub name: String,

    /// Product category at add time.
    pub category: String,

    /// Unit price at add time, in whole currency units.
    pub price: u64,

    /// Pre-discount unit price at add time, when the product was on offer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<u64>,

    /// Listing image reference.
    pub image: String,

    /// Units of this product in the cart. Always at least one; a line that
    /// would drop to zero is removed instead.
    pub quantity: u32,

    /// Stock flag at add time. Recorded, not enforced.
    pub in_stock: bool,
}

impl CartLine {
    /// Snapshot a product into a new line.
    #[must_use]
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id(),
            name: product.name().to_owned(),
            category: product.category().to_owned(),
            price: product.price(),
            original_price: product.original_price(),
            image: product.image().to_owned(),
            quantity,
            in_stock: product.in_stock(),
        }
    }

    /// Price × quantity for this line.
    #[must_use]
    pub fn line_total(&self) -> u64 {
        self.price * u64::from(self.quantity)
    }

    /// Discount × quantity for this line, zero when not on offer.
    #[must_use]
    pub fn line_savings(&self) -> u64 {
        let unit = self
            .original_price
            .map_or(0, |original| original.saturating_sub(self.price));

        unit * u64::from(self.quantity)
    }
}

/// Durable cart service over a [`Storage`] backend.
///
/// A corrupt or absent `cartItems` slot always reads as an empty cart,
/// never an error.
#[derive(Debug, Clone)]
pub struct CartStore<S> {
    storage: S,
}

impl<S: Storage> CartStore<S> {
    /// Create a cart service over the given storage.
    #[must_use]
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// The current cart lines, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] only for backend I/O failures.
    pub fn snapshot(&self) -> Result<Vec<CartLine>, StorageError> {
        Ok(read_slot(&self.storage, Slot::CartItems)?.unwrap_or_default())
    }

    /// Total units across all lines.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] only for backend I/O failures.
    pub fn item_count(&self) -> Result<u64, StorageError> {
        Ok(crate::pricing::item_count(&self.snapshot()?))
    }

    /// Whether the cart holds no lines.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] only for backend I/O failures.
    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.snapshot()?.is_empty())
    }

    /// Add `quantity` units of a product.
    ///
    /// An existing line for the same product id has its quantity
    /// incremented; otherwise a new line snapshots the product's current
    /// price, name and image. No stock-ceiling check is performed. Adding
    /// zero units changes nothing. Returns the updated lines.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the cart cannot be persisted.
    pub fn add(&self, product: &Product, quantity: u32) -> Result<Vec<CartLine>, StorageError> {
        let mut lines = self.snapshot()?;

        if quantity == 0 {
            return Ok(lines);
        }

        if let Some(line) = lines.iter_mut().find(|line| line.id == product.id()) {
            line.quantity += quantity;
        } else {
            lines.push(CartLine::from_product(product, quantity));
        }

        tracing::debug!(product = %product.id(), quantity, "added to cart");

        self.persist(lines)
    }

    /// Add a single unit of a product.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the cart cannot be persisted.
    pub fn add_one(&self, product: &Product) -> Result<Vec<CartLine>, StorageError> {
        self.add(product, 1)
    }

    /// Overwrite a line's quantity.
    ///
    /// A quantity of zero removes the line. An unknown product id is a
    /// silent no-op. Returns the updated lines.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the cart cannot be persisted.
    pub fn set_quantity(&self, id: ProductId, quantity: u32) -> Result<Vec<CartLine>, StorageError> {
        if quantity == 0 {
            return self.remove(id);
        }

        let mut lines = self.snapshot()?;

        let Some(line) = lines.iter_mut().find(|line| line.id == id) else {
            return Ok(lines);
        };

        line.quantity = quantity;

        self.persist(lines)
    }

    /// Remove a line. An unknown product id is a silent no-op. Returns the
    /// updated lines.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the cart cannot be persisted.
    pub fn remove(&self, id: ProductId) -> Result<Vec<CartLine>, StorageError> {
        let mut lines = self.snapshot()?;

        lines.retain(|line| line.id != id);

        self.persist(lines)
    }

    /// Empty the cart. Called by the order finalizer after settlement.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the slot cannot be removed.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(Slot::CartItems)
    }

    fn persist(&self, lines: Vec<CartLine>) -> Result<Vec<CartLine>, StorageError> {
        write_slot(&self.storage, Slot::CartItems, &lines)?;

        Ok(lines)
    }
}
