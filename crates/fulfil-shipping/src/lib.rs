//! # fulfil-shipping: Region Service Client
//!
//! Network and configuration edge for shipping estimation. Implements
//! `fulfil_core::RegionResolver` over HTTP so orders can price shipping
//! against the live region classification service.
//!
//! ## Usage
//! ```rust,no_run
//! use fulfil_core::{Country, Money, ShippingCalculator};
//! use fulfil_shipping::{HttpRegionResolver, ShippingConfig};
//!
//! # async fn quote() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ShippingConfig::load(None)?;
//! let resolver = HttpRegionResolver::new(&config.region_service)?;
//! let calculator = ShippingCalculator::from_resolver(resolver);
//!
//! let charge = calculator
//!     .calculate_shipping(&Country::france(), Money::from_pence(9999))
//!     .await?;
//! println!("Shipping to France: {}", charge);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod resolver;

pub use config::{RegionServiceConfig, ShippingConfig, DEFAULT_REGION_ENDPOINT};
pub use error::{ShippingError, ShippingResult};
pub use resolver::{parse_region_body, HttpRegionResolver};
