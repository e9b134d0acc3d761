//! # Stock Ledger
//!
//! Tracks how many units of each catalogue product are on hand.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stock Ledger Operations                              │
//! │                                                                         │
//! │  Caller                   Ledger call              Entry change         │
//! │  ──────                   ───────────              ────────────         │
//! │                                                                         │
//! │  Delivery arrives ──────► receive_stock() ───────► qty += n (or create) │
//! │                                                                         │
//! │  Order.add() ───────────► is_available() ────────► (read only)         │
//! │                                                                         │
//! │  Single deduction ──────► adjust_stock() ────────► qty -= n            │
//! │                                                                         │
//! │  Order.confirm() ───────► adjust_stock_batch() ──► qty -= n, all lines │
//! │                                                                         │
//! │  Delisting ─────────────► remove_product() ──────► entry deleted       │
//! │                                                                         │
//! │  NOTE: check and deduct are never separate calls for a caller.          │
//! │        Every deduction validates first and mutates only on success.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Zero vs. Absent
//! A product with zero units is still in the ledger: `check_stock` returns
//! `Ok(0)`. Only a product that was never received, or was removed, yields
//! `ProductNotFound`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::types::{Product, ProductKey};

#[derive(Debug, Clone)]
struct StockEntry {
    product: Product,
    quantity: i64,
}

/// In-memory stock ledger keyed by product identity.
#[derive(Debug, Clone, Default)]
pub struct StockLedger {
    entries: HashMap<ProductKey, StockEntry>,
}

impl StockLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ledger from an initial catalogue of products and stock levels.
    ///
    /// ## Example
    /// ```rust
    /// use fulfil_core::{Money, Product, StockLedger};
    ///
    /// let a = Product::new("a", "A very nice product", Money::from_pounds(10)).unwrap();
    /// let ledger = StockLedger::from_catalogue([(a.clone(), 100)]).unwrap();
    /// assert_eq!(ledger.check_stock(&a).unwrap(), 100);
    /// ```
    pub fn from_catalogue<I>(catalogue: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = (Product, i64)>,
    {
        let mut ledger = Self::new();
        for (product, quantity) in catalogue {
            ledger.receive_stock(&product, quantity)?;
        }
        Ok(ledger)
    }

    /// Returns the current quantity of a product.
    ///
    /// ## Errors
    /// `ProductNotFound` if the product has no entry.
    pub fn check_stock(&self, product: &Product) -> CoreResult<i64> {
        self.entries
            .get(&product.key())
            .map(|entry| entry.quantity)
            .ok_or_else(|| CoreError::ProductNotFound(product.id().to_string()))
    }

    /// Returns true if `quantity` units can be taken right now.
    ///
    /// ## Errors
    /// `ProductNotFound` if the product has no entry.
    pub fn is_available(&self, product: &Product, quantity: i64) -> CoreResult<bool> {
        Ok(quantity <= self.check_stock(product)?)
    }

    /// Deducts `quantity` units and returns the new stock level.
    ///
    /// Fails without touching the entry when the product is absent, the
    /// quantity is negative, or fewer than `quantity` units are on hand.
    pub fn adjust_stock(&mut self, product: &Product, quantity: i64) -> CoreResult<i64> {
        if quantity < 0 {
            return Err(CoreError::invalid_quantity(
                quantity,
                "stock adjustment cannot be negative",
            ));
        }

        let entry = self
            .entries
            .get_mut(&product.key())
            .ok_or_else(|| CoreError::ProductNotFound(product.id().to_string()))?;

        if quantity > entry.quantity {
            return Err(CoreError::insufficient(product.id(), entry.quantity, quantity));
        }

        entry.quantity -= quantity;
        debug!(
            product = %product.id(),
            deducted = quantity,
            remaining = entry.quantity,
            "Stock adjusted"
        );
        Ok(entry.quantity)
    }

    /// Deducts several lines as one all-or-nothing movement.
    ///
    /// Quantities for the same product are summed before they are checked,
    /// so two lines of 60 against 100 units fail together rather than
    /// leaving the first line deducted.
    ///
    /// ## Errors
    /// The first failing line's `InvalidQuantity`, `ProductNotFound` or
    /// `InsufficientStock`. When an error is returned no entry has changed.
    pub fn adjust_stock_batch<'a, I>(&mut self, demands: I) -> CoreResult<()>
    where
        I: IntoIterator<Item = (&'a Product, i64)>,
    {
        let mut totals: Vec<(&'a Product, i64)> = Vec::new();
        let mut positions: HashMap<ProductKey, usize> = HashMap::new();

        // Pass 1: validate against current stock, mutate nothing.
        for (product, quantity) in demands {
            if quantity < 0 {
                return Err(CoreError::invalid_quantity(
                    quantity,
                    "stock adjustment cannot be negative",
                ));
            }

            let available = self.check_stock(product)?;
            let slot = *positions.entry(product.key()).or_insert_with(|| {
                totals.push((product, 0));
                totals.len() - 1
            });
            // A sum past i64::MAX exceeds any stock level.
            let requested = match totals[slot].1.checked_add(quantity) {
                Some(requested) if requested <= available => requested,
                Some(requested) => {
                    return Err(CoreError::insufficient(product.id(), available, requested))
                }
                None => return Err(CoreError::insufficient(product.id(), available, i64::MAX)),
            };
            totals[slot].1 = requested;
        }

        // Pass 2: every line is known to fit.
        for (product, quantity) in totals {
            if let Some(entry) = self.entries.get_mut(&product.key()) {
                entry.quantity -= quantity;
                debug!(
                    product = %product.id(),
                    deducted = quantity,
                    remaining = entry.quantity,
                    "Stock adjusted"
                );
            }
        }

        Ok(())
    }

    /// Adds `quantity` units, creating the entry if the product is new.
    /// Returns the new stock level.
    pub fn receive_stock(&mut self, product: &Product, quantity: i64) -> CoreResult<i64> {
        if quantity < 0 {
            return Err(CoreError::invalid_quantity(
                quantity,
                "received quantity cannot be negative",
            ));
        }

        let on_hand = self
            .entries
            .get(&product.key())
            .map_or(0, |entry| entry.quantity);
        let updated = on_hand.checked_add(quantity).ok_or_else(|| {
            CoreError::invalid_quantity(quantity, "stock level would overflow")
        })?;

        let entry = self
            .entries
            .entry(product.key())
            .or_insert_with(|| StockEntry {
                product: product.clone(),
                quantity: 0,
            });
        entry.quantity = updated;

        debug!(
            product = %product.id(),
            received = quantity,
            on_hand = entry.quantity,
            "Stock received"
        );
        Ok(entry.quantity)
    }

    /// Deletes the product's entry and returns the quantity it held.
    ///
    /// ## Errors
    /// `ProductNotFound` if the product has no entry.
    pub fn remove_product(&mut self, product: &Product) -> CoreResult<i64> {
        let entry = self
            .entries
            .remove(&product.key())
            .ok_or_else(|| CoreError::ProductNotFound(product.id().to_string()))?;

        debug!(product = %product.id(), discarded = entry.quantity, "Product removed");
        Ok(entry.quantity)
    }

    /// Returns true if the product has an entry (even at zero stock).
    pub fn contains(&self, product: &Product) -> bool {
        self.entries.contains_key(&product.key())
    }

    /// Number of catalogue entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over every catalogue product with its stock level.
    pub fn iter(&self) -> impl Iterator<Item = (&Product, i64)> {
        self.entries
            .values()
            .map(|entry| (&entry.product, entry.quantity))
    }
}

// =============================================================================
// Shared Handle
// =============================================================================

/// Cloneable handle to one ledger shared by many orders.
///
/// ## Why Arc<Mutex>?
/// Every order built against the same handle must see the same stock, and
/// `Order::total` is async, so the handle has to be `Send`.
/// `Order::confirm` holds the lock for its whole validate-then-deduct pass.
#[derive(Debug, Clone, Default)]
pub struct SharedLedger {
    inner: Arc<Mutex<StockLedger>>,
}

impl SharedLedger {
    pub fn new(ledger: StockLedger) -> Self {
        SharedLedger {
            inner: Arc::new(Mutex::new(ledger)),
        }
    }

    /// Executes a function with read access to the ledger.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let on_hand = ledger.with_ledger(|l| l.check_stock(&product))?;
    /// ```
    pub fn with_ledger<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&StockLedger) -> R,
    {
        let ledger = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&ledger)
    }

    /// Executes a function with write access to the ledger.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// ledger.with_ledger_mut(|l| l.receive_stock(&product, 50))?;
    /// ```
    pub fn with_ledger_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut StockLedger) -> R,
    {
        let mut ledger = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut ledger)
    }
}

impl From<StockLedger> for SharedLedger {
    fn from(ledger: StockLedger) -> Self {
        SharedLedger::new(ledger)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
