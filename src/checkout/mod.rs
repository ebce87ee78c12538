//! Checkout
//!
//! The tail of the pipeline: payment-method selection, the simulated
//! settlement, and order finalisation. Settlement is the only
//! asynchronous operation in the system; everything around it is
//! synchronous slot reads and writes.

use jiff::Timestamp;
use thiserror::Error;
use tokio::sync::oneshot;

use crate::{
    address::AddressCapture,
    cart::CartStore,
    pricing,
    storage::{Slot, Storage, StorageError, read_slot, write_slot},
    tax::TaxTable,
};

pub mod gateway;
mod order;

pub use gateway::{PaymentError, PaymentGateway, SettlementReceipt, SimulatedGateway};
pub use order::{DELIVERY_DAYS, ORDER_ID_PREFIX, Order, OrderStatus, PaymentMethod};

/// Errors raised while finalising an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Confirm was attempted with no payment method selected.
    #[error("no payment method selected")]
    NoMethodSelected,

    /// Confirm was attempted while a settlement is already running.
    #[error("settlement already in progress")]
    AlreadyProcessing,

    /// Confirm was attempted after the flow already produced an order.
    #[error("order already confirmed")]
    AlreadyConfirmed,

    /// There is nothing in the cart to order.
    #[error("cart is empty")]
    EmptyCart,

    /// No shipping address has been captured.
    #[error("no shipping address on file")]
    MissingAddress,

    /// The settlement failed or was cancelled.
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// The backend could not be read or written.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Sender half of a cancellation signal for an in-flight settlement.
///
/// Dropping the handle without calling [`cancel`](CancelHandle::cancel)
/// lets the settlement run to completion.
#[derive(Debug)]
pub struct CancelHandle {
    tx: oneshot::Sender<()>,
}

impl CancelHandle {
    /// Create a linked handle/signal pair.
    #[must_use]
    pub fn new() -> (Self, CancelSignal) {
        let (tx, rx) = oneshot::channel();

        (Self { tx }, CancelSignal { rx })
    }

    /// Abandon the settlement. A no-op if it has already completed.
    pub fn cancel(self) {
        // The receiver is gone once settlement finished; nothing to do then.
        drop(self.tx.send(()));
    }
}

/// Receiver half of a cancellation signal, passed into
/// [`OrderFinalizer::place_order_with_cancel`].
#[derive(Debug)]
pub struct CancelSignal {
    rx: oneshot::Receiver<()>,
}

/// Finalises orders: prices the cart for the saved address, settles
/// through the gateway, records the order and clears the upstream slots.
#[derive(Debug, Clone)]
pub struct OrderFinalizer<S, G> {
    storage: S,
    gateway: G,
    tax_table: TaxTable,
}

impl<S: Storage, G: PaymentGateway> OrderFinalizer<S, G> {
    /// Create a finalizer over the given storage and gateway, using the
    /// built-in G20 tax table.
    #[must_use]
    pub fn new(storage: S, gateway: G) -> Self {
        Self::with_tax_table(storage, gateway, TaxTable::default())
    }

    /// Create a finalizer with a custom tax table.
    #[must_use]
    pub fn with_tax_table(storage: S, gateway: G, tax_table: TaxTable) -> Self {
        Self {
            storage,
            gateway,
            tax_table,
        }
    }

    /// The most recently confirmed order, if any. A corrupt slot reads as
    /// absent.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] only for backend I/O failures.
    pub fn last_order(&self) -> Result<Option<Order>, StorageError> {
        read_slot(&self.storage, Slot::LastOrder)
    }

    /// Settle the cart and record the order.
    ///
    /// Reads the cart and the saved address, prices the order for the
    /// address's country, settles through the gateway, then — in one
    /// terminal step — persists the order as `lastOrder` and clears the
    /// cart and address slots.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if upstream state is missing, the
    /// settlement fails, or storage cannot be written. On any error every
    /// slot is left exactly as it was.
    pub async fn place_order(&self, method: PaymentMethod) -> Result<Order, CheckoutError> {
        self.finalize(method, None).await
    }

    /// [`place_order`](Self::place_order), abandonable through a
    /// [`CancelSignal`].
    ///
    /// # Errors
    ///
    /// As [`place_order`](Self::place_order); additionally returns
    /// [`PaymentError::Cancelled`] if the signal fires before the gateway
    /// settles.
    pub async fn place_order_with_cancel(
        &self,
        method: PaymentMethod,
        cancel: CancelSignal,
    ) -> Result<Order, CheckoutError> {
        self.finalize(method, Some(cancel)).await
    }

    async fn finalize(
        &self,
        method: PaymentMethod,
        cancel: Option<CancelSignal>,
    ) -> Result<Order, CheckoutError> {
        let items = CartStore::new(&self.storage).snapshot()?;

        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let shipping_address = AddressCapture::new(&self.storage)
            .saved()?
            .ok_or(CheckoutError::MissingAddress)?;

        let rule = self.tax_table.rule_for(&shipping_address.country);
        let total_amount = pricing::grand_total(&items, rule);

        let receipt = match cancel {
            None => self.gateway.settle(total_amount, method).await?,
            Some(signal) => tokio::select! {
                receipt = self.gateway.settle(total_amount, method) => receipt?,
                _ = signal.rx => return Err(PaymentError::Cancelled.into()),
            },
        };

        let order_date = Timestamp::now();
        let order = Order {
            order_id: Order::generate_id(order_date),
            items,
            shipping_address,
            payment_method: method,
            total_amount,
            order_date,
            status: OrderStatus::Confirmed,
        };

        write_slot(&self.storage, Slot::LastOrder, &order)?;
        CartStore::new(&self.storage).clear()?;
        AddressCapture::new(&self.storage).clear()?;

        tracing::info!(
            order_id = %order.order_id,
            total_amount,
            settlement = %receipt.reference,
            "order confirmed"
        );

        Ok(order)
    }
}

/// Where the payment view stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentState {
    /// Waiting for the shopper to pick a method.
    SelectingMethod,

    /// Settlement in flight; confirm is disabled.
    Processing,

    /// An order was produced. Terminal.
    Confirmed,
}

/// The payment view's state machine:
/// `SelectingMethod → Processing → Confirmed`.
///
/// There is no default method; confirm stays disabled until one is
/// selected, and re-entry is rejected while a settlement is in flight. A
/// declined or cancelled settlement returns the flow to
/// `SelectingMethod` with the selection kept, so the shopper can retry.
/// `Confirmed` is one-way.
#[derive(Debug)]
pub struct PaymentFlow {
    state: PaymentState,
    selected: Option<PaymentMethod>,
}

impl Default for PaymentFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl PaymentFlow {
    /// Start a fresh flow in `SelectingMethod` with nothing selected.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: PaymentState::SelectingMethod,
            selected: None,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> PaymentState {
        self.state
    }

    /// The currently selected method, if any.
    #[must_use]
    pub fn selected(&self) -> Option<PaymentMethod> {
        self.selected
    }

    /// Whether the confirm action is enabled.
    #[must_use]
    pub fn can_confirm(&self) -> bool {
        self.state() == PaymentState::SelectingMethod && self.selected.is_some()
    }

    /// Select (or change) the payment method.
    ///
    /// # Errors
    ///
    /// Rejected outside `SelectingMethod`.
    pub fn select(&mut self, method: PaymentMethod) -> Result<(), CheckoutError> {
        match self.state() {
            PaymentState::SelectingMethod => {
                self.selected = Some(method);

                Ok(())
            }
            PaymentState::Processing => Err(CheckoutError::AlreadyProcessing),
            PaymentState::Confirmed => Err(CheckoutError::AlreadyConfirmed),
        }
    }

    /// Run the settlement for the selected method.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if no method is selected, the flow is
    /// not in `SelectingMethod`, or the finalizer fails; on failure the
    /// flow returns to `SelectingMethod` with the selection kept.
    pub async fn confirm<S, G>(
        &mut self,
        finalizer: &OrderFinalizer<S, G>,
    ) -> Result<Order, CheckoutError>
    where
        S: Storage,
        G: PaymentGateway,
    {
        self.run(finalizer, None).await
    }

    /// [`confirm`](Self::confirm), abandonable through a [`CancelSignal`].
    ///
    /// # Errors
    ///
    /// As [`confirm`](Self::confirm); additionally returns
    /// [`PaymentError::Cancelled`] if the signal fires first.
    pub async fn confirm_with_cancel<S, G>(
        &mut self,
        finalizer: &OrderFinalizer<S, G>,
        cancel: CancelSignal,
    ) -> Result<Order, CheckoutError>
    where
        S: Storage,
        G: PaymentGateway,
    {
        self.run(finalizer, Some(cancel)).await
    }

    async fn run<S, G>(
        &mut self,
        finalizer: &OrderFinalizer<S, G>,
        cancel: Option<CancelSignal>,
    ) -> Result<Order, CheckoutError>
    where
        S: Storage,
        G: PaymentGateway,
    {
        match self.state() {
            PaymentState::Processing => return Err(CheckoutError::AlreadyProcessing),
            PaymentState::Confirmed => return Err(CheckoutError::AlreadyConfirmed),
            PaymentState::SelectingMethod => {}
        }

        let method = self.selected.ok_or(CheckoutError::NoMethodSelected)?;

        self.state = PaymentState::Processing;

        let result = finalizer.finalize(method, cancel).await;

        match &result {
            Ok(_) => self.state = PaymentState::Confirmed,
            Err(_) => self.state = PaymentState::SelectingMethod,
        }

        result
    }
}
