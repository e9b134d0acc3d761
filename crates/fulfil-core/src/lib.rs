//! # fulfil-core: Order Fulfilment Logic
//!
//! Products, stock, orders, shipping tiers and sales history. Nothing in this
//! crate performs I/O; the only outward-facing seam is the [`RegionResolver`]
//! trait, implemented elsewhere (see `fulfil-shipping`).
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Fulfil Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                ★ fulfil-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  ledger   │  │  history  │  │   │
//! │  │   │  Product  │  │   Money   │  │  Stock    │  │  Sales    │  │   │
//! │  │   │  Address  │  │  (pence)  │  │  Ledger   │  │  History  │  │   │
//! │  │   └───────────┘  └───────────┘  └─────┬─────┘  └─────┬─────┘  │   │
//! │  │                                       │              │         │   │
//! │  │                  ┌────────────────────▼──────────────▼──────┐  │   │
//! │  │                  │   order: add ──► total ──► confirm       │  │   │
//! │  │                  └────────────────────┬─────────────────────┘  │   │
//! │  │                                       │                        │   │
//! │  │                  ┌────────────────────▼─────────────────────┐  │   │
//! │  │                  │   shipping: estimate + RegionResolver    │  │   │
//! │  │                  └────────────────────┬─────────────────────┘  │   │
//! │  └───────────────────────────────────────┼────────────────────────┘   │
//! │                                          │ trait object               │
//! │  ┌───────────────────────────────────────▼────────────────────────┐   │
//! │  │          fulfil-shipping (HTTP region service, config)          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Address, Item, Region, ...)
//! - [`money`] - Integer pence arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Field rules for products and addresses
//! - [`ledger`] - Stock levels per product
//! - [`shipping`] - Region tiers and the resolver seam
//! - [`order`] - The order aggregate
//! - [`history`] - Confirmed orders indexed by product and address
//!
//! ## Example Usage
//!
//! ```rust
//! use fulfil_core::{estimate, Money, Product, Region, StockLedger};
//!
//! let widget = Product::new("widget", "A very nice product", Money::from_pounds(10)).unwrap();
//! let mut ledger = StockLedger::from_catalogue([(widget.clone(), 100)]).unwrap();
//!
//! ledger.adjust_stock(&widget, 10).unwrap();
//! assert_eq!(ledger.check_stock(&widget).unwrap(), 90);
//!
//! // £99.99 to the UK is under the free-shipping threshold
//! assert_eq!(estimate(Region::Uk, Money::from_pence(9999)).to_string(), "£4.99");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod history;
pub mod ledger;
pub mod money;
pub mod order;
pub mod shipping;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, LookupError, ValidationError};
pub use history::{OrderRecord, SalesHistory, SharedHistory};
pub use ledger::{SharedLedger, StockLedger};
pub use money::Money;
pub use order::Order;
pub use shipping::{estimate, RegionResolver, ShippingCalculator, StaticRegionResolver};
pub use types::*;
pub use validation::MAX_ITEM_QUANTITY;
