//! The mock entity types templates read.
//!
//! Prices are integer minor units throughout, matching the platform's
//! money representation; the `money` filter divides by 100 at output
//! time.

use serde::Serialize;

/// The shop object: name, currency and money formats.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shop {
    pub name: String,
    pub currency: String,
    pub money_format: String,
    pub money_with_currency_format: String,
}

impl Shop {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            currency: "USD".to_string(),
            money_format: "${{amount}}".to_string(),
            money_with_currency_format: "${{amount}} USD".to_string(),
        }
    }
}

/// An image reference. The preview passes URLs through; nothing is
/// uploaded or resized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MockImage {
    pub src: String,
    pub alt: String,
    pub width: u32,
    pub height: u32,
}

impl MockImage {
    pub fn new(src: &str, alt: &str) -> Self {
        Self {
            src: src.to_string(),
            alt: alt.to_string(),
            width: 1200,
            height: 800,
        }
    }
}

/// One purchasable variant of a product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MockVariant {
    pub id: String,
    pub title: String,
    /// Minor units.
    pub price: i64,
    pub available: bool,
    pub sku: String,
}

/// A product as templates see it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MockProduct {
    pub id: String,
    /// URL slug derived from the title.
    pub handle: String,
    pub title: String,
    pub description: String,
    /// Minor units.
    pub price: i64,
    pub price_min: i64,
    pub price_max: i64,
    pub available: bool,
    pub vendor: String,
    pub tags: Vec<String>,
    pub featured_image: Option<MockImage>,
    pub images: Vec<MockImage>,
    pub variants: Vec<MockVariant>,
    pub url: String,
}

/// A collection of products.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MockCollection {
    pub id: String,
    pub title: String,
    pub handle: String,
    pub products: Vec<MockProduct>,
    pub products_count: usize,
    pub url: String,
}
