//! Stages
//!
//! The pipeline is page-driven and strictly linear:
//! Shop → Cart → Checkout → Payment → Confirmation. Each stage assumes
//! certain upstream state; a stage entered without it degrades to an
//! earlier safe stage instead of erroring. Missing *and* unreadable state
//! are treated identically, so a broken storage backend at worst sends the
//! shopper back to the shop.

use crate::{
    address::ShippingAddress,
    cart::CartLine,
    checkout::Order,
    storage::{Slot, Storage, read_slot},
};

/// The pages of the checkout pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Product listings; always reachable.
    Shop,

    /// The cart view; owns its own empty-cart presentation.
    Cart,

    /// Address capture; needs something in the cart.
    Checkout,

    /// Payment-method selection; needs a cart and a captured address.
    Payment,

    /// The confirmation view; needs a recorded order.
    Confirmation,
}

fn has_cart_lines<S: Storage>(storage: &S) -> bool {
    matches!(
        read_slot::<Vec<CartLine>, _>(storage, Slot::CartItems),
        Ok(Some(lines)) if !lines.is_empty()
    )
}

fn has_address<S: Storage>(storage: &S) -> bool {
    matches!(
        read_slot::<ShippingAddress, _>(storage, Slot::ShippingAddress),
        Ok(Some(_))
    )
}

fn has_order<S: Storage>(storage: &S) -> bool {
    matches!(read_slot::<Order, _>(storage, Slot::LastOrder), Ok(Some(_)))
}

/// Resolve where a navigation to `requested` actually lands given the
/// persisted state.
///
/// Checkout without a cart falls back to the cart view; Payment and
/// Confirmation without their upstream state fall all the way back to the
/// shop. This never fails: storage errors count as missing state.
pub fn resolve_entry<S: Storage>(requested: Stage, storage: &S) -> Stage {
    let resolved = match requested {
        Stage::Shop | Stage::Cart => requested,
        Stage::Checkout => {
            if has_cart_lines(storage) {
                Stage::Checkout
            } else {
                Stage::Cart
            }
        }
        Stage::Payment => {
            if has_cart_lines(storage) && has_address(storage) {
                Stage::Payment
            } else {
                Stage::Shop
            }
        }
        Stage::Confirmation => {
            if has_order(storage) {
                Stage::Confirmation
            } else {
                Stage::Shop
            }
        }
    };

    if resolved != requested {
        tracing::debug!(?requested, ?resolved, "redirected for missing upstream state");
    }

    resolved
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        address::AddressCapture,
        cart::CartStore,
        catalog::ProductId,
        checkout::{OrderFinalizer, PaymentMethod, SimulatedGateway},
        fixtures::sample_catalog,
        storage::{MemoryStorage, Storage as _},
    };

    use super::*;

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

    #[test]
    fn shop_and_cart_are_always_reachable() {
        let storage = MemoryStorage::new();

        assert_eq!(resolve_entry(Stage::Shop, &storage), Stage::Shop);
        assert_eq!(resolve_entry(Stage::Cart, &storage), Stage::Cart);
    }

    #[test]
    fn checkout_with_empty_cart_falls_back_to_cart() {
        let storage = MemoryStorage::new();

        assert_eq!(resolve_entry(Stage::Checkout, &storage), Stage::Cart);
    }

    #[test]
    fn payment_without_address_falls_back_to_shop() -> TestResult {
        let storage = MemoryStorage::new();
        let catalog = sample_catalog()?;

        CartStore::new(storage.clone())
            .add_one(catalog.get(ProductId(33)).expect("missing product 33"))?;

        assert_eq!(resolve_entry(Stage::Payment, &storage), Stage::Shop);

        Ok(())
    }

    #[test]
    fn payment_with_cart_and_address_is_reachable() -> TestResult {
        let storage = MemoryStorage::new();
        let catalog = sample_catalog()?;

        CartStore::new(storage.clone())
            .add_one(catalog.get(ProductId(33)).expect("missing product 33"))?;
        AddressCapture::new(storage.clone()).submit(&india_address())?;

        assert_eq!(resolve_entry(Stage::Payment, &storage), Stage::Payment);

        Ok(())
    }

    #[test]
    fn confirmation_without_an_order_falls_back_to_shop() {
        let storage = MemoryStorage::new();

        assert_eq!(resolve_entry(Stage::Confirmation, &storage), Stage::Shop);
    }

    #[tokio::test]
    async fn confirmation_is_reachable_after_an_order() -> TestResult {
        let storage = MemoryStorage::new();
        let catalog = sample_catalog()?;

        CartStore::new(storage.clone())
            .add_one(catalog.get(ProductId(1)).expect("missing product 1"))?;
        AddressCapture::new(storage.clone()).submit(&india_address())?;

        OrderFinalizer::new(storage.clone(), SimulatedGateway::instant())
            .place_order(PaymentMethod::Debit)
            .await?;

        assert_eq!(
            resolve_entry(Stage::Confirmation, &storage),
            Stage::Confirmation
        );

        // The order consumed the cart, so payment degrades again.
        assert_eq!(resolve_entry(Stage::Payment, &storage), Stage::Shop);

        Ok(())
    }

    #[test]
    fn corrupt_slots_count_as_missing_state() -> TestResult {
        let storage = MemoryStorage::new();

        storage.put(Slot::CartItems, "{corrupt")?;
        storage.put(Slot::LastOrder, "{corrupt")?;

        assert_eq!(resolve_entry(Stage::Checkout, &storage), Stage::Cart);
        assert_eq!(resolve_entry(Stage::Confirmation, &storage), Stage::Shop);

        Ok(())
    }
}
