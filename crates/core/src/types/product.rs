//! Catalog product and variant types.
//!
//! These mirror the JSON shape served by the catalog API:
//!
//! ```json
//! {
//!   "id": "hoodie-001",
//!   "name": "Classic Language Hoodie",
//!   "description": "Soft cotton hoodie with school logo.",
//!   "price": 49.99,
//!   "category": "hoodies",
//!   "images": ["/images/hoodie-black.jpg"],
//!   "variants": [{ "id": "h001-s-black", "size": "S", "color": "black", "inStock": true }]
//! }
//! ```

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::{ProductId, VariantId};
use super::price::Price;

/// Error returned when parsing an unknown [`Category`] or [`Size`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Hoodies,
    Tshirts,
    Mugs,
    Socks,
    ZipHoodies,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Self; 5] = [
        Self::Hoodies,
        Self::Tshirts,
        Self::Mugs,
        Self::Socks,
        Self::ZipHoodies,
    ];

    /// The wire identifier (e.g. `zip-hoodies`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Hoodies => "hoodies",
            Self::Tshirts => "tshirts",
            Self::Mugs => "mugs",
            Self::Socks => "socks",
            Self::ZipHoodies => "zip-hoodies",
        }
    }

    /// Human-readable label (e.g. `Zip Hoodies`).
    #[must_use]
    pub fn label(&self) -> String {
        self.as_str()
            .split('-')
            .map(|word| {
                let mut chars = word.chars();
                chars.next().map_or_else(String::new, |first| {
                    first.to_uppercase().chain(chars).collect()
                })
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "category",
                value: s.to_owned(),
            })
    }
}

/// Garment size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Size {
    Xs,
    S,
    M,
    L,
    Xl,
    Xxl,
    OneSize,
}

impl Size {
    /// All sizes, smallest first.
    pub const ALL: [Self; 7] = [
        Self::Xs,
        Self::S,
        Self::M,
        Self::L,
        Self::Xl,
        Self::Xxl,
        Self::OneSize,
    ];

    /// The wire identifier (e.g. `XL`, `ONE_SIZE`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Xs => "XS",
            Self::S => "S",
            Self::M => "M",
            Self::L => "L",
            Self::Xl => "XL",
            Self::Xxl => "XXL",
            Self::OneSize => "ONE_SIZE",
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Size {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|size| size.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "size",
                value: s.to_owned(),
            })
    }
}

/// A purchasable size/color combination of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    /// Unique within the parent product.
    pub id: VariantId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub in_stock: bool,
}

impl ProductVariant {
    /// Short description such as `M, black`, `ONE_SIZE` or `white`.
    #[must_use]
    pub fn label(&self) -> String {
        match (&self.size, &self.color) {
            (Some(size), Some(color)) => format!("{size}, {color}"),
            (Some(size), None) => size.to_string(),
            (None, Some(color)) => color.clone(),
            (None, None) => String::new(),
        }
    }
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub category: Category,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Never empty when deserialized.
    #[serde(deserialize_with = "non_empty_variants")]
    pub variants: Vec<ProductVariant>,
}

fn non_empty_variants<'de, D>(deserializer: D) -> Result<Vec<ProductVariant>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let variants = Vec::<ProductVariant>::deserialize(deserializer)?;
    if variants.is_empty() {
        return Err(serde::de::Error::custom("product must have at least one variant"));
    }
    Ok(variants)
}

impl Product {
    /// Look up a variant by ID.
    #[must_use]
    pub fn variant(&self, id: &VariantId) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| &v.id == id)
    }

    /// The first variant that can be purchased, used as the default selection.
    #[must_use]
    pub fn first_in_stock_variant(&self) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| v.in_stock)
    }

    /// Whether any variant is in stock.
    #[must_use]
    pub fn has_stock(&self) -> bool {
        self.variants.iter().any(|v| v.in_stock)
    }

    /// Tags, or an empty slice when the product has none.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or_default()
    }

    /// The first image, used as the thumbnail.
    #[must_use]
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}
