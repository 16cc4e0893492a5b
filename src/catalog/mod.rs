//! Static product catalog and client-style facet filtering.

pub mod data;
pub mod filter;
pub mod model;

pub use filter::{ALL, FilterSelection, PriceRange, filter_products};
pub use model::{CURRENCY_SYMBOL, FeaturedItem, Product, XRayItem, parse_price};

use serde::Serialize;

/// Values offered for each facet of the filter panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetVocabulary {
    pub colors: Vec<String>,
    pub styles: Vec<String>,
    pub brands: Vec<String>,
    pub price_ranges: Vec<String>,
}

/// In-memory catalog; never mutated after construction.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    featured: Vec<FeaturedItem>,
    xray: Vec<XRayItem>,
}

impl Catalog {
    pub fn new(products: Vec<Product>, featured: Vec<FeaturedItem>, xray: Vec<XRayItem>) -> Self {
        Self {
            products,
            featured,
            xray,
        }
    }

    /// The demo catalog shipped with the app.
    pub fn builtin() -> Self {
        Self::new(data::products(), data::featured_items(), data::xray_items())
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn featured(&self) -> &[FeaturedItem] {
        &self.featured
    }

    pub fn xray_items(&self) -> &[XRayItem] {
        &self.xray
    }

    pub fn xray_item(&self, id: &str) -> Option<&XRayItem> {
        self.xray.iter().find(|item| item.id == id)
    }

    pub fn filter(&self, selection: &FilterSelection) -> Vec<&Product> {
        filter_products(&self.products, selection)
    }

    /// Distinct facet values in first-seen order, plus the fixed price buckets.
    pub fn facets(&self) -> FacetVocabulary {
        FacetVocabulary {
            colors: distinct(self.products.iter().map(|p| p.color.as_str())),
            styles: distinct(self.products.iter().map(|p| p.style.as_str())),
            brands: distinct(self.products.iter().map(|p| p.brand.as_str())),
            price_ranges: data::PRICE_RANGES.iter().map(|r| r.to_string()).collect(),
        }
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        if !out.iter().any(|v| v == value) {
            out.push(value.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facets_are_distinct_in_first_seen_order() {
        let facets = Catalog::builtin().facets();
        assert_eq!(
            facets.colors,
            vec!["Blue", "Multicolor", "White", "Black", "Gray", "Navy", "Beige"]
        );
        assert_eq!(facets.styles.len(), 8);
        assert_eq!(facets.brands.len(), 8);
        assert_eq!(
            facets.price_ranges,
            vec!["All", "0-50", "50-100", "100-200", "200+"]
        );
    }

    #[test]
    fn looks_up_xray_items() {
        let catalog = Catalog::builtin();
        assert_eq!(
            catalog.xray_item("xray2").map(|i| i.name.as_str()),
            Some("Retro Aviator Sunglasses")
        );
        assert!(catalog.xray_item("nope").is_none());
    }

    #[test]
    fn builtin_data_is_complete() {
        let catalog = Catalog::builtin();
        let ids: Vec<_> = catalog.products().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2", "p3", "p4", "p5", "p6", "p7", "p8"]);
        let p8 = &catalog.products()[7];
        assert_eq!(p8.name, "High-Waisted Tailored Trousers");
        assert_eq!(p8.price, "€89.90");
        assert_eq!(p8.category, "Bottoms");

        let featured: Vec<_> = catalog.featured().iter().map(|f| f.title.as_str()).collect();
        assert_eq!(
            featured,
            vec!["Street Style Revolution", "Red Carpet Glamour", "Vintage Vibes"]
        );
        let xray: Vec<_> = catalog.xray_items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(xray, vec!["xray1", "xray2", "xray3"]);
        assert_eq!(
            catalog.xray_items()[2].search_keywords,
            "women tailored tweed blazer classic"
        );
    }

    #[test]
    fn catalog_filter_delegates() {
        let catalog = Catalog::builtin();
        let navy = catalog.filter(&FilterSelection::default().with_color("Navy"));
        assert_eq!(navy.len(), 1);
        assert_eq!(navy[0].name, "Wool Blend Peacoat");
    }
}
