//! Built-in demo catalog.

use super::model::{FeaturedItem, Product, XRayItem};

/// Price buckets offered by the filter panel, in display order.
pub const PRICE_RANGES: [&str; 5] = ["All", "0-50", "50-100", "100-200", "200+"];

const PRODUCT_IMAGE: &str = "https://placehold.co/300x400.png";
const FEATURED_IMAGE: &str = "https://placehold.co/600x400.png";
const XRAY_IMAGE: &str = "https://placehold.co/100x150.png";

#[allow(clippy::too_many_arguments)]
fn product(
    id: &str,
    name: &str,
    hint: &str,
    brand: &str,
    price: &str,
    color: &str,
    style: &str,
    category: &str,
) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        image_url: PRODUCT_IMAGE.to_string(),
        data_ai_hint: Some(hint.to_string()),
        brand: brand.to_string(),
        price: price.to_string(),
        color: color.to_string(),
        style: style.to_string(),
        category: category.to_string(),
    }
}

pub fn products() -> Vec<Product> {
    vec![
        product(
            "p1",
            "Classic Blue Denim Jacket",
            "denim jacket",
            "Urban Threads",
            "€79.99",
            "Blue",
            "Casual",
            "Outerwear",
        ),
        product(
            "p2",
            "Silk Floral Maxi Dress",
            "floral dress",
            "Boho Chic",
            "€129.00",
            "Multicolor",
            "Bohemian",
            "Dresses",
        ),
        product(
            "p3",
            "Minimalist White Sneakers",
            "white sneakers",
            "Everlane",
            "€95.50",
            "White",
            "Minimalist",
            "Shoes",
        ),
        product(
            "p4",
            "Leather Crossbody Bag",
            "leather bag",
            "Artisan Co.",
            "€150.00",
            "Black",
            "Chic",
            "Accessories",
        ),
        product(
            "p5",
            "Cotton Graphic T-Shirt",
            "graphic t-shirt",
            "Street Smart",
            "€35.00",
            "Gray",
            "Streetwear",
            "Tops",
        ),
        product(
            "p6",
            "Wool Blend Peacoat",
            "peacoat",
            "Heritage Line",
            "€220.00",
            "Navy",
            "Classic",
            "Outerwear",
        ),
        product(
            "p7",
            "Striped Linen Shirt",
            "linen shirt",
            "Coastal Living",
            "€65.00",
            "White",
            "Relaxed",
            "Tops",
        ),
        product(
            "p8",
            "High-Waisted Tailored Trousers",
            "tailored trousers",
            "Office Elegance",
            "€89.90",
            "Beige",
            "Formal",
            "Bottoms",
        ),
    ]
}

pub fn featured_items() -> Vec<FeaturedItem> {
    let item = |id: &str, title: &str, hint: &str, description: &str| FeaturedItem {
        id: id.to_string(),
        title: title.to_string(),
        image_url: FEATURED_IMAGE.to_string(),
        data_ai_hint: Some(hint.to_string()),
        description: description.to_string(),
    };

    vec![
        item(
            "1",
            "Street Style Revolution",
            "street style",
            "Explore the latest trends from the streets of fashion capitals.",
        ),
        item(
            "2",
            "Red Carpet Glamour",
            "red carpet",
            "Iconic looks from the most glamorous events.",
        ),
        item(
            "3",
            "Vintage Vibes",
            "vintage fashion",
            "Timeless pieces that never go out of style.",
        ),
    ]
}

pub fn xray_items() -> Vec<XRayItem> {
    let item = |id: &str, name: &str, hint: &str, description: &str, keywords: &str| XRayItem {
        id: id.to_string(),
        name: name.to_string(),
        image_url: XRAY_IMAGE.to_string(),
        data_ai_hint: Some(hint.to_string()),
        description: Some(description.to_string()),
        search_keywords: keywords.to_string(),
    };

    vec![
        item(
            "xray1",
            "Vibrant Silk Scarf",
            "silk scarf",
            "Worn by the lead actress in the cafe scene.",
            "vibrant silk scarf floral print",
        ),
        item(
            "xray2",
            "Retro Aviator Sunglasses",
            "aviator sunglasses",
            "Seen on the detective during the car chase.",
            "retro aviator sunglasses gold frame",
        ),
        item(
            "xray3",
            "Tailored Tweed Blazer",
            "tweed blazer",
            "A key piece in the protagonist's wardrobe.",
            "women tailored tweed blazer classic",
        ),
    ]
}
