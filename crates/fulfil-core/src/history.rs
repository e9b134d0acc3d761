//! # Sales History
//!
//! Dual inverted index over confirmed orders.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Sales History                                    │
//! │                                                                         │
//! │   records:         OrderId    ──► OrderRecord (snapshot)               │
//! │                                                                         │
//! │   by_product:      ProductKey ──► { OrderId, ... }                     │
//! │   by_address:      AddressKey ──► { OrderId, ... }                     │
//! │                                                                         │
//! │   Append-only. Buckets are sets: an order whose product appears on     │
//! │   two lines is listed once under that product.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::money::Money;
use crate::types::{Address, AddressKey, Item, OrderId, Product, ProductKey};

// =============================================================================
// Order Record
// =============================================================================

/// Snapshot of a confirmed order, as stored in the history.
#[derive(Debug, Clone, Serialize)]
pub struct OrderRecord {
    pub id: OrderId,
    pub shipping_address: Address,
    pub items: Vec<Item>,
    pub subtotal: Money,
    pub confirmed_at: DateTime<Utc>,
}

impl OrderRecord {
    /// Total units of `product` across this order's lines.
    pub fn quantity_of(&self, product: &Product) -> i64 {
        self.items
            .iter()
            .filter(|item| item.product() == product)
            .map(Item::quantity)
            .sum()
    }
}

// =============================================================================
// Sales History
// =============================================================================

/// Confirmed orders, queryable by product and by shipping address.
#[derive(Debug, Clone, Default)]
pub struct SalesHistory {
    records: HashMap<OrderId, OrderRecord>,
    by_product: HashMap<ProductKey, HashSet<OrderId>>,
    by_address: HashMap<AddressKey, HashSet<OrderId>>,
}

impl SalesHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes an order under each of its products and its shipping address.
    ///
    /// Indexing is driven by the order lines: an order without lines is
    /// kept as a record but appears in no bucket.
    ///
    /// Recording the same order again (or an order with repeated products)
    /// never duplicates bucket membership.
    pub fn record(&mut self, record: OrderRecord) {
        let order_id = record.id;

        for item in &record.items {
            self.by_product
                .entry(item.product().key())
                .or_default()
                .insert(order_id);
        }
        if !record.items.is_empty() {
            self.by_address
                .entry(record.shipping_address.key())
                .or_default()
                .insert(order_id);
        }

        debug!(
            order_id = %order_id,
            lines = record.items.len(),
            "Order recorded in sales history"
        );
        self.records.insert(order_id, record);
    }

    /// Orders that contained `product`. Unknown product ⇒ empty set.
    pub fn orders_for_product(&self, product: &Product) -> HashSet<OrderId> {
        self.by_product
            .get(&product.key())
            .cloned()
            .unwrap_or_default()
    }

    /// Orders shipped to `address`. Unknown address ⇒ empty set.
    pub fn orders_for_address(&self, address: &Address) -> HashSet<OrderId> {
        self.by_address
            .get(&address.key())
            .cloned()
            .unwrap_or_default()
    }

    /// Looks up a recorded order.
    pub fn order(&self, id: &OrderId) -> Option<&OrderRecord> {
        self.records.get(id)
    }

    /// Units of `product` sold across every recorded order.
    pub fn units_sold(&self, product: &Product) -> i64 {
        self.by_product
            .get(&product.key())
            .into_iter()
            .flatten()
            .filter_map(|id| self.records.get(id))
            .map(|record| record.quantity_of(product))
            .sum()
    }

    /// Number of distinct recorded orders.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// =============================================================================
// Shared Handle
// =============================================================================

/// Cloneable handle to one sales history shared by many orders.
#[derive(Debug, Clone, Default)]
pub struct SharedHistory {
    inner: Arc<Mutex<SalesHistory>>,
}

impl SharedHistory {
    pub fn new(history: SalesHistory) -> Self {
        SharedHistory {
            inner: Arc::new(Mutex::new(history)),
        }
    }

    /// Executes a function with read access to the history.
    pub fn with_history<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&SalesHistory) -> R,
    {
        let history = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&history)
    }

    /// Executes a function with write access to the history.
    pub fn with_history_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut SalesHistory) -> R,
    {
        let mut history = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut history)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Country;

    fn product(id: &str, pounds: i64) -> Product {
        Product::new(id, "A very nice product", Money::from_pounds(pounds)).unwrap()
    }

    fn london() -> Address {
        Address::new("123", "Fake St", "London", "E1 4UD", Country::united_kingdom()).unwrap()
    }

    fn record(address: &Address, lines: &[(&Product, i64)]) -> OrderRecord {
        let items: Vec<Item> = lines
            .iter()
            .map(|(p, qty)| Item::new((*p).clone(), *qty).unwrap())
            .collect();
        let subtotal = items.iter().map(Item::line_total).sum();
        OrderRecord {
            id: OrderId::new(),
            shipping_address: address.clone(),
            items,
            subtotal,
            confirmed_at: Utc::now(),
        }
    }

    #[test]
    fn test_new_history_is_empty() {
        let history = SalesHistory::new();
        assert!(history.is_empty());
        assert!(history.orders_for_product(&product("a", 10)).is_empty());
        assert!(history.orders_for_address(&london()).is_empty());
    }

    #[test]
    fn test_record_indexes_product_and_address() {
        let a = product("a", 10);
        let address = london();
        let order = record(&address, &[(&a, 1)]);
        let order_id = order.id;

        let mut history = SalesHistory::new();
        history.record(order);

        assert_eq!(history.orders_for_product(&a), HashSet::from([order_id]));
        assert_eq!(history.orders_for_address(&address), HashSet::from([order_id]));
        assert_eq!(history.order(&order_id).unwrap().subtotal, Money::from_pounds(10));
    }

    #[test]
    fn test_repeated_product_listed_once() {
        let a = product("a", 10);
        let address = london();
        let order = record(&address, &[(&a, 1), (&a, 2)]);

        let mut history = SalesHistory::new();
        history.record(order.clone());
        history.record(order);

        assert_eq!(history.orders_for_product(&a).len(), 1);
        assert_eq!(history.orders_for_address(&address).len(), 1);
        assert_eq!(history.len(), 1);
        assert_eq!(history.units_sold(&a), 3);
    }

    #[test]
    fn test_buckets_keyed_by_identity() {
        let a = product("a", 10);
        let twin_product = product("a", 10);
        let address = london();
        let twin_address = london();

        let mut history = SalesHistory::new();
        history.record(record(&address, &[(&a, 1)]));

        assert!(history.orders_for_product(&twin_product).is_empty());
        assert!(history.orders_for_address(&twin_address).is_empty());
    }

    #[test]
    fn test_multiple_orders_accumulate() {
        let a = product("a", 10);
        let b = product("b", 20);
        let address = london();

        let mut history = SalesHistory::new();
        let first = record(&address, &[(&a, 1)]);
        let second = record(&address, &[(&a, 4), (&b, 2)]);
        let (first_id, second_id) = (first.id, second.id);
        history.record(first);
        history.record(second);

        assert_eq!(
            history.orders_for_product(&a),
            HashSet::from([first_id, second_id])
        );
        assert_eq!(history.orders_for_product(&b), HashSet::from([second_id]));
        assert_eq!(history.orders_for_address(&address).len(), 2);
        assert_eq!(history.units_sold(&a), 5);
        assert_eq!(history.units_sold(&b), 2);
    }

    #[test]
    fn test_order_without_lines_is_not_indexed() {
        let address = london();
        let empty = record(&address, &[]);
        let empty_id = empty.id;

        let mut history = SalesHistory::new();
        history.record(empty);

        assert!(history.orders_for_address(&address).is_empty());
        assert!(history.order(&empty_id).is_some());
    }

    #[test]
    fn test_record_serializes() {
        let a = product("a", 10);
        let order = record(&london(), &[(&a, 3)]);

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["subtotal"], 3000);
        assert_eq!(json["items"][0]["quantity"], 3);
        assert_eq!(json["shipping_address"]["country"], "United Kingdom");
    }
}
