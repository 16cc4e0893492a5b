//! Facet filtering over the product list.
//!
//! A product matches when every facet is either `All` or equal to the
//! product's value, and its price falls in the selected range. Anything
//! that fails to parse matches nothing.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::model::Product;
use crate::error::CatalogError;

/// Facet value meaning "no filtering".
pub const ALL: &str = "All";

/// A price-range facet choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceRange {
    All,
    /// `min-max`, inclusive on both ends.
    Between { min: Decimal, max: Decimal },
    /// `min+`, unbounded above.
    AtLeast { min: Decimal },
}

impl PriceRange {
    pub fn contains(&self, price: Decimal) -> bool {
        match *self {
            Self::All => true,
            Self::Between { min, max } => price >= min && price <= max,
            Self::AtLeast { min } => price >= min,
        }
    }
}

impl FromStr for PriceRange {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let malformed = || CatalogError::MalformedPriceRange(s.to_string());
        let number = |n: &str| Decimal::from_str(n.trim()).map_err(|_| malformed());

        if raw == ALL {
            return Ok(Self::All);
        }

        if let Some(min) = raw.strip_suffix('+') {
            return Ok(Self::AtLeast { min: number(min)? });
        }

        let (min, max) = raw.split_once('-').ok_or_else(malformed)?;
        let (min, max) = (number(min)?, number(max)?);
        if min > max {
            return Err(malformed());
        }
        Ok(Self::Between { min, max })
    }
}

/// The four facet choices of the filter panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSelection {
    pub color: String,
    pub style: String,
    pub brand: String,
    #[serde(alias = "price_range")]
    pub price_range: String,
}

impl Default for FilterSelection {
    fn default() -> Self {
        Self {
            color: ALL.to_string(),
            style: ALL.to_string(),
            brand: ALL.to_string(),
            price_range: ALL.to_string(),
        }
    }
}

impl FilterSelection {
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = brand.into();
        self
    }

    pub fn with_price_range(mut self, range: impl Into<String>) -> Self {
        self.price_range = range.into();
        self
    }

    /// Back to all-`All`.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn facet_matches(choice: &str, value: &str) -> bool {
    choice == ALL || choice == value
}

fn price_matches(product: &Product, range: &PriceRange) -> bool {
    if *range == PriceRange::All {
        return true;
    }
    match product.price_amount() {
        Ok(price) => range.contains(price),
        Err(e) => {
            debug!(product = %product.id, error = %e, "Unparseable price treated as non-matching");
            false
        }
    }
}

/// Return the products matching `selection`, in their original order.
pub fn filter_products<'a>(
    products: &'a [Product],
    selection: &FilterSelection,
) -> Vec<&'a Product> {
    let range = match selection.price_range.parse::<PriceRange>() {
        Ok(range) => range,
        Err(e) => {
            warn!(error = %e, "Unparseable price range; no products match");
            return Vec::new();
        }
    };

    products
        .iter()
        .filter(|p| {
            facet_matches(&selection.color, &p.color)
                && facet_matches(&selection.style, &p.style)
                && facet_matches(&selection.brand, &p.brand)
                && price_matches(p, &range)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::data;
    use rust_decimal_macros::dec;

    fn ids(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.id.clone()).collect()
    }

    fn priced(id: &str, price: &str) -> Product {
        let mut p = data::products()[0].clone();
        p.id = id.to_string();
        p.price = price.to_string();
        p
    }

    #[test]
    fn default_selection_returns_everything_in_order() {
        let products = data::products();
        let result = filter_products(&products, &FilterSelection::default());
        assert_eq!(result.len(), products.len());
        assert_eq!(ids(&result), products.iter().map(|p| p.id.clone()).collect::<Vec<_>>());
    }

    #[test]
    fn each_product_matches_its_own_color() {
        let products = data::products();
        for p in &products {
            let selection = FilterSelection::default().with_color(p.color.clone());
            let result = filter_products(&products, &selection);
            assert!(result.iter().any(|r| r.id == p.id), "{} missing", p.id);
            assert!(result.iter().all(|r| r.color == p.color));
        }
    }

    #[test]
    fn facets_are_conjunctive() {
        let products = data::products();
        let selection = FilterSelection::default()
            .with_color("White")
            .with_style("Relaxed");
        assert_eq!(ids(&filter_products(&products, &selection)), vec!["p7"]);

        let selection = FilterSelection::default()
            .with_color("White")
            .with_brand("Heritage Line");
        assert!(filter_products(&products, &selection).is_empty());
    }

    #[test]
    fn between_range_is_inclusive() {
        let products = vec![
            priced("a", "€95.50"),
            priced("b", "€35.00"),
            priced("c", "€100.00"),
            priced("d", "€50.00"),
        ];
        let selection = FilterSelection::default().with_price_range("50-100");
        assert_eq!(ids(&filter_products(&products, &selection)), vec!["a", "c", "d"]);
    }

    #[test]
    fn open_ended_range() {
        let products = vec![priced("a", "€220.00"), priced("b", "€150.00")];
        let selection = FilterSelection::default().with_price_range("200+");
        assert_eq!(ids(&filter_products(&products, &selection)), vec!["a"]);
    }

    #[test]
    fn builtin_buckets_partition_the_catalog_sensibly() {
        let products = data::products();
        let count = |range: &str| {
            filter_products(&products, &FilterSelection::default().with_price_range(range)).len()
        };
        assert_eq!(count("0-50"), 1); // p5
        assert_eq!(count("50-100"), 4); // p1, p3, p7, p8
        assert_eq!(count("100-200"), 2); // p2, p4
        assert_eq!(count("200+"), 1); // p6
    }

    #[test]
    fn malformed_price_is_non_matching() {
        let products = vec![priced("bad", "€n/a"), priced("good", "€60.00")];
        let selection = FilterSelection::default().with_price_range("50-100");
        assert_eq!(ids(&filter_products(&products, &selection)), vec!["good"]);

        // With no price facet the malformed price is never inspected.
        assert_eq!(filter_products(&products, &FilterSelection::default()).len(), 2);
    }

    #[test]
    fn malformed_range_matches_nothing() {
        let products = data::products();
        for range in ["cheap", "50-", "-100", "100-50", "+"] {
            let selection = FilterSelection::default().with_price_range(range);
            assert!(filter_products(&products, &selection).is_empty(), "{range}");
        }
    }

    #[test]
    fn price_range_parsing() {
        assert_eq!("All".parse::<PriceRange>().unwrap(), PriceRange::All);
        assert_eq!(
            "0-50".parse::<PriceRange>().unwrap(),
            PriceRange::Between {
                min: dec!(0),
                max: dec!(50)
            }
        );
        assert_eq!(
            "200+".parse::<PriceRange>().unwrap(),
            PriceRange::AtLeast { min: dec!(200) }
        );
    }

    #[test]
    fn reset_restores_defaults() {
        let mut selection = FilterSelection::default()
            .with_color("Navy")
            .with_price_range("200+");
        assert_ne!(selection, FilterSelection::default());
        selection.reset();
        assert_eq!(selection, FilterSelection::default());
    }

    #[test]
    fn selection_deserializes_with_missing_fields_as_all() {
        let selection: FilterSelection =
            serde_json::from_str(r#"{"color": "Blue", "price_range": "50-100"}"#).unwrap();
        assert_eq!(selection.color, "Blue");
        assert_eq!(selection.style, ALL);
        assert_eq!(selection.price_range, "50-100");
    }
}
