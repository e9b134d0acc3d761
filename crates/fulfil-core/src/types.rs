//! # Domain Types
//!
//! Core domain types used throughout order fulfilment.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Address      │   │      Item       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  key (UUID)     │   │  key (UUID)     │   │  product        │       │
//! │  │  id (business)  │   │  house, street  │   │  quantity > 0   │       │
//! │  │  description    │   │  city, postcode │   │                 │       │
//! │  │  price          │   │  country        │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Country      │   │     Region      │   │  OrderStatus    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  name           │   │  UK / EU / OTHER│   │  Building       │       │
//! │  └─────────────────┘   └─────────────────┘   │  Confirmed      │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity, Not Structure
//! `Product` and `Address` are keyed by a surrogate UUID assigned when they
//! are created. Two products built from identical fields are two different
//! catalogue entries; a clone is the same entry. Every index in this crate
//! (ledger, history) is keyed on [`ProductKey`] / [`AddressKey`], never on
//! field values.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, LookupError};
use crate::money::Money;
use crate::validation::{
    validate_address_field, validate_description, validate_price, validate_product_id,
    validate_quantity,
};

// =============================================================================
// Surrogate Keys
// =============================================================================

/// Identity of a catalogue product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductKey(Uuid);

impl ProductKey {
    fn generate() -> Self {
        ProductKey(Uuid::new_v4())
    }
}

impl fmt::Display for ProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Identity of a shipping address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressKey(Uuid);

impl AddressKey {
    fn generate() -> Self {
        AddressKey(Uuid::new_v4())
    }
}

/// Identity of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(Uuid);

impl OrderId {
    pub fn new() -> Self {
        OrderId(Uuid::new_v4())
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product in the catalogue.
///
/// Immutable after creation. Equality and hashing use [`ProductKey`] only.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    key: ProductKey,

    /// Business identifier (e.g. `"a"`, `"COKE-330"`).
    id: String,

    /// Human-readable description.
    description: String,

    /// Unit price.
    price: Money,
}

impl Product {
    /// Creates a product with a fresh identity.
    ///
    /// ## Example
    /// ```rust
    /// use fulfil_core::{Money, Product};
    ///
    /// let a = Product::new("a", "A very nice product", Money::from_pounds(10)).unwrap();
    /// let twin = Product::new("a", "A very nice product", Money::from_pounds(10)).unwrap();
    ///
    /// assert_eq!(a, a.clone());
    /// assert_ne!(a, twin); // same fields, different catalogue entry
    /// ```
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        price: Money,
    ) -> CoreResult<Self> {
        let id = id.into();
        let description = description.into();

        validate_product_id(&id)?;
        validate_description(&description)?;
        validate_price(price)?;

        Ok(Product {
            key: ProductKey::generate(),
            id,
            description,
            price,
        })
    }

    #[inline]
    pub fn key(&self) -> ProductKey {
        self.key
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the unit price.
    #[inline]
    pub fn price(&self) -> Money {
        self.price
    }
}

impl PartialEq for Product {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Product {}

impl Hash for Product {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

// =============================================================================
// Country
// =============================================================================

/// A destination country, by the name the region service understands.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Country(String);

impl Country {
    pub fn new(name: impl Into<String>) -> Self {
        Country(name.into())
    }

    pub fn united_kingdom() -> Self {
        Country::new("United Kingdom")
    }

    pub fn france() -> Self {
        Country::new("France")
    }

    pub fn albania() -> Self {
        Country::new("Albania")
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Address
// =============================================================================

/// A shipping address.
///
/// Immutable after creation. Equality and hashing use [`AddressKey`] only, so
/// two structurally identical addresses are separate history buckets.
#[derive(Debug, Clone, Serialize)]
pub struct Address {
    key: AddressKey,
    house: String,
    street: String,
    city: String,
    postcode: String,
    country: Country,
}

impl Address {
    pub fn new(
        house: impl Into<String>,
        street: impl Into<String>,
        city: impl Into<String>,
        postcode: impl Into<String>,
        country: Country,
    ) -> CoreResult<Self> {
        let house = house.into();
        let street = street.into();
        let city = city.into();
        let postcode = postcode.into();

        validate_address_field("house", &house)?;
        validate_address_field("street", &street)?;
        validate_address_field("city", &city)?;
        validate_address_field("postcode", &postcode)?;
        validate_address_field("country", country.name())?;

        Ok(Address {
            key: AddressKey::generate(),
            house,
            street,
            city,
            postcode,
            country,
        })
    }

    #[inline]
    pub fn key(&self) -> AddressKey {
        self.key
    }

    pub fn house(&self) -> &str {
        &self.house
    }

    pub fn street(&self) -> &str {
        &self.street
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn postcode(&self) -> &str {
        &self.postcode
    }

    pub fn country(&self) -> &Country {
        &self.country
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Address {}

impl Hash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}, {}, {}, {}",
            self.house, self.street, self.city, self.postcode, self.country
        )
    }
}

// =============================================================================
// Item
// =============================================================================

/// An order line: a product and a positive quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    product: Product,
    quantity: i64,
}

impl Item {
    /// Creates an order line.
    ///
    /// ## Errors
    /// `InvalidQuantity` when `quantity` is outside `1..=MAX_ITEM_QUANTITY`
    /// or the line total does not fit in pence.
    pub fn new(product: Product, quantity: i64) -> CoreResult<Self> {
        validate_quantity(quantity)
            .map_err(|e| CoreError::invalid_quantity(quantity, e.to_string()))?;
        if product.price().checked_multiply_quantity(quantity).is_none() {
            return Err(CoreError::invalid_quantity(
                quantity,
                "line total is too large",
            ));
        }
        Ok(Item { product, quantity })
    }

    #[inline]
    pub fn product(&self) -> &Product {
        &self.product
    }

    #[inline]
    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.product.price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Region
// =============================================================================

/// Coarse shipping tier derived from a destination country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "UK")]
    Uk,
    #[serde(rename = "EU")]
    Eu,
    #[serde(rename = "OTHER")]
    Other,
}

impl Region {
    /// Wire name used by the region service.
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Uk => "UK",
            Region::Eu => "EU",
            Region::Other => "OTHER",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = LookupError;

    /// Exact, case-sensitive match on the wire names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UK" => Ok(Region::Uk),
            "EU" => Ok(Region::Eu),
            "OTHER" => Ok(Region::Other),
            other => Err(LookupError::InvalidRegion(other.to_string())),
        }
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// The lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Items are being added; may be priced and confirmed.
    #[default]
    Building,
    /// Stock deducted and recorded in history. Terminal.
    Confirmed,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn product(id: &str, pounds: i64) -> Product {
        Product::new(id, "A very nice product", Money::from_pounds(pounds)).unwrap()
    }

    fn london() -> Address {
        Address::new("123", "Fake St", "London", "E1 4UD", Country::united_kingdom()).unwrap()
    }

    #[test]
    fn test_product_identity_not_structure() {
        let a = product("a", 10);
        let twin = product("a", 10);

        assert_eq!(a, a.clone());
        assert_ne!(a, twin);
        assert_ne!(a.key(), twin.key());

        let set: HashSet<Product> = [a.clone(), twin, a].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_product_validation() {
        assert!(Product::new("", "desc", Money::zero()).is_err());
        assert!(Product::new("a", "", Money::zero()).is_err());
        assert!(matches!(
            Product::new("a", "desc", Money::from_pence(-1)),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn test_address_identity_not_structure() {
        let first = london();
        let second = london();

        assert_ne!(first, second);
        assert_eq!(first, first.clone());
        assert_eq!(first.country(), second.country());
        assert_eq!(first.to_string(), "123 Fake St, London, E1 4UD, United Kingdom");
    }

    #[test]
    fn test_address_requires_every_field() {
        let result = Address::new("123", "Fake St", "London", "", Country::united_kingdom());
        assert!(matches!(result, Err(CoreError::Validation(_))));

        let result = Address::new("123", "Fake St", "London", "E1 4UD", Country::new(""));
        assert!(result.is_err());
    }

    #[test]
    fn test_item_quantity_must_be_positive() {
        let a = product("a", 10);

        assert!(Item::new(a.clone(), 1).is_ok());
        assert!(matches!(
            Item::new(a.clone(), 0),
            Err(CoreError::InvalidQuantity { quantity: 0, .. })
        ));
        assert!(matches!(
            Item::new(a, -3),
            Err(CoreError::InvalidQuantity { quantity: -3, .. })
        ));
    }

    #[test]
    fn test_item_quantity_is_bounded() {
        let a = product("a", 10);

        assert!(Item::new(a.clone(), crate::validation::MAX_ITEM_QUANTITY).is_ok());
        assert!(matches!(
            Item::new(a, i64::MAX),
            Err(CoreError::InvalidQuantity { quantity: i64::MAX, .. })
        ));

        let priceless = Product::new("gem", "Priceless", Money::from_pence(i64::MAX)).unwrap();
        assert!(matches!(
            Item::new(priceless, 2),
            Err(CoreError::InvalidQuantity { quantity: 2, .. })
        ));
    }

    #[test]
    fn test_item_line_total() {
        let item = Item::new(product("b", 20), 2).unwrap();
        assert_eq!(item.line_total(), Money::from_pounds(40));
    }

    #[test]
    fn test_region_parsing() {
        assert_eq!("UK".parse::<Region>().unwrap(), Region::Uk);
        assert_eq!("EU".parse::<Region>().unwrap(), Region::Eu);
        assert_eq!("OTHER".parse::<Region>().unwrap(), Region::Other);

        assert_eq!(
            "uk".parse::<Region>().unwrap_err(),
            LookupError::InvalidRegion("uk".to_string())
        );
        assert!("".parse::<Region>().is_err());
    }

    #[test]
    fn test_region_serde_names() {
        assert_eq!(serde_json::to_string(&Region::Other).unwrap(), "\"OTHER\"");
        let region: Region = serde_json::from_str("\"EU\"").unwrap();
        assert_eq!(region, Region::Eu);
    }

    #[test]
    fn test_order_status_default() {
        assert_eq!(OrderStatus::default(), OrderStatus::Building);
    }
}
