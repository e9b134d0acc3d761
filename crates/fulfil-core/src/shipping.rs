//! # Shipping Estimator
//!
//! Region-based shipping charges.
//!
//! ## Pricing Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Order.total()                                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ShippingCalculator::calculate_shipping(country, subtotal)             │
//! │       │                                                                 │
//! │       ├──► RegionResolver::resolve_region(country)   (async, may fail) │
//! │       │         │                                                       │
//! │       │         └── LookupError ──► returned to caller, no retry       │
//! │       │                                                                 │
//! │       └──► estimate(region, subtotal)                (pure, total)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Shipping Policy
//! ```text
//! ┌──────────┬──────────────┬─────────────┬──────────────┐
//! │ Region   │ Threshold    │ Below       │ At or above  │
//! ├──────────┼──────────────┼─────────────┼──────────────┤
//! │ UK       │ £120.00      │ £4.99       │ £0.00        │
//! │ EU       │ £100.00      │ £8.99       │ £4.99        │
//! │ OTHER    │ £200.00      │ £9.99       │ £5.99        │
//! └──────────┴──────────────┴─────────────┴──────────────┘
//! ```
//! These values are fixed business policy, not configuration.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::LookupError;
use crate::money::Money;
use crate::types::{Country, Region};

const UK_FREE_SHIPPING_THRESHOLD: Money = Money::from_pounds(120);
const UK_STANDARD: Money = Money::from_pence(499);

const EU_THRESHOLD: Money = Money::from_pounds(100);
const EU_STANDARD: Money = Money::from_pence(899);
const EU_REDUCED: Money = Money::from_pence(499);

const OTHER_THRESHOLD: Money = Money::from_pounds(200);
const OTHER_STANDARD: Money = Money::from_pence(999);
const OTHER_REDUCED: Money = Money::from_pence(599);

// =============================================================================
// Region Resolution
// =============================================================================

/// Classifies a destination country into a shipping [`Region`].
///
/// Implementations may suspend on I/O. They must surface every failure as a
/// [`LookupError`] and must not retry on their own.
#[async_trait]
pub trait RegionResolver: Send + Sync {
    async fn resolve_region(&self, country: &Country) -> Result<Region, LookupError>;
}

/// Resolver backed by a fixed country table.
///
/// Useful offline and in tests. Countries missing from the table fail with
/// `LookupError::InvalidRegion`.
#[derive(Debug, Clone, Default)]
pub struct StaticRegionResolver {
    regions: HashMap<String, Region>,
}

impl StaticRegionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a country's region.
    pub fn with(mut self, country: &Country, region: Region) -> Self {
        self.regions.insert(country.name().to_string(), region);
        self
    }
}

#[async_trait]
impl RegionResolver for StaticRegionResolver {
    async fn resolve_region(&self, country: &Country) -> Result<Region, LookupError> {
        self.regions
            .get(country.name())
            .copied()
            .ok_or_else(|| LookupError::InvalidRegion(format!("no region for {}", country)))
    }
}

// =============================================================================
// Estimation
// =============================================================================

/// Shipping charge for a region and basket subtotal.
///
/// ## Example
/// ```rust
/// use fulfil_core::{estimate, Money, Region};
///
/// assert_eq!(estimate(Region::Uk, Money::from_pounds(99)), Money::from_pence(499));
/// assert_eq!(estimate(Region::Uk, Money::from_pounds(120)), Money::zero());
/// ```
pub fn estimate(region: Region, subtotal: Money) -> Money {
    match region {
        Region::Uk if subtotal < UK_FREE_SHIPPING_THRESHOLD => UK_STANDARD,
        Region::Uk => Money::zero(),
        Region::Eu if subtotal < EU_THRESHOLD => EU_STANDARD,
        Region::Eu => EU_REDUCED,
        Region::Other if subtotal < OTHER_THRESHOLD => OTHER_STANDARD,
        Region::Other => OTHER_REDUCED,
    }
}

/// Combines a [`RegionResolver`] with [`estimate`].
///
/// Cheap to clone; every order holds one.
#[derive(Clone)]
pub struct ShippingCalculator {
    resolver: Arc<dyn RegionResolver>,
}

impl ShippingCalculator {
    pub fn new(resolver: Arc<dyn RegionResolver>) -> Self {
        ShippingCalculator { resolver }
    }

    pub fn from_resolver<R>(resolver: R) -> Self
    where
        R: RegionResolver + 'static,
    {
        Self::new(Arc::new(resolver))
    }

    /// Resolves the country's region and prices shipping for `subtotal`.
    ///
    /// ## Errors
    /// The resolver's `LookupError`, unchanged.
    pub async fn calculate_shipping(
        &self,
        country: &Country,
        subtotal: Money,
    ) -> Result<Money, LookupError> {
        let region = match self.resolver.resolve_region(country).await {
            Ok(region) => region,
            Err(e) => {
                warn!(country = %country, error = %e, "Region lookup failed");
                return Err(e);
            }
        };

        let charge = estimate(region, subtotal);
        debug!(
            country = %country,
            region = %region,
            subtotal = %subtotal,
            charge = %charge,
            "Shipping estimated"
        );
        Ok(charge)
    }
}

impl fmt::Debug for ShippingCalculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShippingCalculator").finish_non_exhaustive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingResolver;

    #[async_trait]
    impl RegionResolver for FailingResolver {
        async fn resolve_region(&self, _country: &Country) -> Result<Region, LookupError> {
            Err(LookupError::Transport("connection refused".to_string()))
        }
    }

    #[test]
    fn test_estimate_table() {
        let cases = [
            (Region::Uk, 9900, 499),
            (Region::Uk, 11999, 499),
            (Region::Uk, 12000, 0),
            (Region::Eu, 9900, 899),
            (Region::Eu, 10000, 499),
            (Region::Other, 10000, 999),
            (Region::Other, 19999, 999),
            (Region::Other, 20000, 599),
        ];

        for (region, subtotal, expected) in cases {
            assert_eq!(
                estimate(region, Money::from_pence(subtotal)),
                Money::from_pence(expected),
                "{region} at {subtotal}p"
            );
        }
    }

    #[test]
    fn test_estimate_empty_basket() {
        assert_eq!(estimate(Region::Uk, Money::zero()), Money::from_pence(499));
        assert_eq!(estimate(Region::Eu, Money::zero()), Money::from_pence(899));
        assert_eq!(estimate(Region::Other, Money::zero()), Money::from_pence(999));
    }

    #[tokio::test]
    async fn test_calculate_shipping_uses_resolved_region() {
        let calculator = ShippingCalculator::from_resolver(
            StaticRegionResolver::new()
                .with(&Country::united_kingdom(), Region::Uk)
                .with(&Country::france(), Region::Eu)
                .with(&Country::albania(), Region::Other),
        );

        let subtotal = Money::from_pence(9999);
        assert_eq!(
            calculator
                .calculate_shipping(&Country::united_kingdom(), subtotal)
                .await
                .unwrap(),
            Money::from_pence(499)
        );
        assert_eq!(
            calculator
                .calculate_shipping(&Country::france(), subtotal)
                .await
                .unwrap(),
            Money::from_pence(899)
        );
        assert_eq!(
            calculator
                .calculate_shipping(&Country::albania(), Money::from_pounds(100))
                .await
                .unwrap(),
            Money::from_pence(999)
        );
    }

    #[tokio::test]
    async fn test_calculate_shipping_propagates_lookup_failure() {
        let calculator = ShippingCalculator::from_resolver(FailingResolver);

        let result = calculator
            .calculate_shipping(&Country::france(), Money::from_pounds(50))
            .await;

        assert_eq!(
            result,
            Err(LookupError::Transport("connection refused".to_string()))
        );
    }

    #[tokio::test]
    async fn test_static_resolver_unknown_country() {
        let resolver = StaticRegionResolver::new();
        let result = resolver.resolve_region(&Country::new("Atlantis")).await;
        assert!(matches!(result, Err(LookupError::InvalidRegion(_))));
    }
}
