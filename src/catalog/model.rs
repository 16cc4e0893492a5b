//! Catalog records: products, featured looks, and X-Ray scene items.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Symbol every catalog price is rendered with.
pub const CURRENCY_SYMBOL: char = '€';

/// A purchasable catalog item. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_ai_hint: Option<String>,
    pub brand: String,
    /// Display price including the currency symbol, e.g. `€79.99`.
    pub price: String,
    pub color: String,
    /// e.g. "Casual", "Formal", "Vintage"
    pub style: String,
    /// e.g. "Tops", "Dresses", "Accessories"
    pub category: String,
}

impl Product {
    /// Numeric price with the currency symbol stripped.
    pub fn price_amount(&self) -> Result<Decimal, CatalogError> {
        parse_price(&self.price)
    }
}

/// Parse a display price such as `€95.50` into a decimal amount.
pub fn parse_price(raw: &str) -> Result<Decimal, CatalogError> {
    let trimmed = raw.trim();
    let number = trimmed
        .strip_prefix(CURRENCY_SYMBOL)
        .unwrap_or(trimmed)
        .trim();

    Decimal::from_str(number).map_err(|_| CatalogError::MalformedPrice(raw.to_string()))
}

/// A curated look shown on the landing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedItem {
    pub id: String,
    pub title: String,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_ai_hint: Option<String>,
    pub description: String,
}

/// A fashion item spotted in the demo scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XRayItem {
    pub id: String,
    pub name: String,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_ai_hint: Option<String>,
    /// Who wears it / where it appears.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Keywords handed to the assistant as context.
    pub search_keywords: String,
}
