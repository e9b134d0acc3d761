//! # Order
//!
//! An order is built against a shared stock ledger and sales history, priced
//! through a shipping calculator, then confirmed exactly once.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Order Lifecycle                                 │
//! │                                                                         │
//! │   Order::new(address, ledger, history, shipping)                       │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   ┌──────────┐  add(item)      is_available? ── no ──► error, not added │
//! │   │ Building │◄──────────────── yes ──► line appended                   │
//! │   │          │  subtotal() / total()   (any number of times)           │
//! │   └────┬─────┘                                                          │
//! │        │ confirm()                                                      │
//! │        │   1. lock ledger                                               │
//! │        │   2. re-validate EVERY line against current stock             │
//! │        │        └── any failure ──► error, nothing changed, Building   │
//! │        │   3. deduct every line                                         │
//! │        │   4. record once in sales history                              │
//! │        ▼                                                                │
//! │   ┌───────────┐                                                         │
//! │   │ Confirmed │  terminal: add() and confirm() are rejected            │
//! │   └───────────┘                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Nothing Is Reserved
//! `add` only checks stock. Another order may take the units before this one
//! is confirmed, which is why `confirm` validates again against the ledger
//! as it is at confirmation time.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::error::{CoreError, CoreResult, LookupError};
use crate::history::{OrderRecord, SharedHistory};
use crate::ledger::SharedLedger;
use crate::money::Money;
use crate::shipping::ShippingCalculator;
use crate::types::{Address, Item, OrderId, OrderStatus};

/// A customer order.
#[derive(Debug)]
pub struct Order {
    id: OrderId,
    items: Vec<Item>,
    shipping_address: Address,
    status: OrderStatus,
    ledger: SharedLedger,
    history: SharedHistory,
    shipping: ShippingCalculator,
    created_at: DateTime<Utc>,
    confirmed_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Creates an empty order bound to its collaborators.
    ///
    /// The order only holds handles; the ledger and history stay shared with
    /// every other order built from the same handles.
    pub fn new(
        shipping_address: Address,
        ledger: SharedLedger,
        history: SharedHistory,
        shipping: ShippingCalculator,
    ) -> Self {
        Order {
            id: OrderId::new(),
            items: Vec::new(),
            shipping_address,
            status: OrderStatus::Building,
            ledger,
            history,
            shipping,
            created_at: Utc::now(),
            confirmed_at: None,
        }
    }

    // =========================================================================
    // Building
    // =========================================================================

    /// Appends a line if the ledger currently holds enough stock.
    ///
    /// ## Errors
    /// - `ProductNotFound`: product has no ledger entry
    /// - `InsufficientStock`: fewer units on hand than requested
    /// - `OrderAlreadyConfirmed`
    ///
    /// On any error the line is not appended.
    pub fn add(&mut self, item: Item) -> CoreResult<()> {
        self.ensure_building()?;

        self.ledger.with_ledger(|ledger| {
            let product = item.product();
            if ledger.is_available(product, item.quantity())? {
                Ok(())
            } else {
                Err(CoreError::insufficient(
                    product.id(),
                    ledger.check_stock(product)?,
                    item.quantity(),
                ))
            }
        })?;

        self.items.push(item);
        Ok(())
    }

    // =========================================================================
    // Pricing
    // =========================================================================

    /// Sum of line totals. An empty order is £0.00.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(Item::line_total).sum()
    }

    /// Subtotal plus shipping to the order's country.
    ///
    /// Suspends on the region lookup.
    ///
    /// ## Errors
    /// The `LookupError` from region resolution; nothing is retried.
    pub async fn total(&self) -> Result<Money, LookupError> {
        let subtotal = self.subtotal();
        let shipping = self
            .shipping
            .calculate_shipping(self.shipping_address.country(), subtotal)
            .await?;
        Ok(subtotal + shipping)
    }

    // =========================================================================
    // Confirmation
    // =========================================================================

    /// Deducts stock for every line and records the order in sales history.
    ///
    /// All lines are validated against the ledger's current state before any
    /// stock moves; if one line fails, no stock is deducted, nothing is
    /// recorded and the order stays open for a retry.
    ///
    /// ## Errors
    /// - `ProductNotFound`: a product was removed since it was added
    /// - `InsufficientStock`: stock fell below what the order needs
    /// - `OrderAlreadyConfirmed`
    pub fn confirm(&mut self) -> CoreResult<()> {
        self.ensure_building()?;

        let deducted = self.ledger.with_ledger_mut(|ledger| {
            ledger.adjust_stock_batch(
                self.items
                    .iter()
                    .map(|item| (item.product(), item.quantity())),
            )
        });

        if let Err(e) = deducted {
            warn!(order_id = %self.id, error = %e, "Order confirmation rejected");
            return Err(e);
        }

        let confirmed_at = Utc::now();
        self.status = OrderStatus::Confirmed;
        self.confirmed_at = Some(confirmed_at);

        let record = self.snapshot(confirmed_at);
        self.history.with_history_mut(|history| history.record(record));

        info!(
            order_id = %self.id,
            lines = self.items.len(),
            subtotal = %self.subtotal(),
            "Order confirmed"
        );
        Ok(())
    }

    /// History snapshot of this order, once confirmed.
    pub fn record(&self) -> Option<OrderRecord> {
        self.confirmed_at.map(|at| self.snapshot(at))
    }

    fn snapshot(&self, confirmed_at: DateTime<Utc>) -> OrderRecord {
        OrderRecord {
            id: self.id,
            shipping_address: self.shipping_address.clone(),
            items: self.items.clone(),
            subtotal: self.subtotal(),
            confirmed_at,
        }
    }

    fn ensure_building(&self) -> CoreResult<()> {
        match self.status {
            OrderStatus::Building => Ok(()),
            OrderStatus::Confirmed => Err(CoreError::OrderAlreadyConfirmed(self.id.to_string())),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn shipping_address(&self) -> &Address {
        &self.shipping_address
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == OrderStatus::Confirmed
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn confirmed_at(&self) -> Option<DateTime<Utc>> {
        self.confirmed_at
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
