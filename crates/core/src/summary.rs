//! Order summary: cart line items priced against the catalog.

use serde::Serialize;

use crate::cart::CartLineItem;
use crate::types::{Price, Product, ProductId, VariantId};

/// One priced cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryLine {
    pub product_id: ProductId,
    pub variant_id: VariantId,
    pub name: String,
    /// e.g. `M, black`; empty when the variant has neither size nor color.
    pub variant_label: String,
    pub image: Option<String>,
    pub quantity: u32,
    pub unit_price: Price,
    pub line_total: Price,
}

/// Priced lines and their total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub lines: Vec<SummaryLine>,
    pub total: Price,
}

impl OrderSummary {
    /// Price `items` using `products`.
    ///
    /// Items whose product or variant is not in the catalog are left out
    /// and add nothing to the total. Line totals and the total saturate at
    /// [`Price::MAX`].
    #[must_use]
    pub fn build(items: &[CartLineItem], products: &[Product]) -> Self {
        let lines: Vec<SummaryLine> = items
            .iter()
            .filter_map(|item| {
                let product = products.iter().find(|p| p.id == item.product_id)?;
                let variant = product.variant(&item.variant_id)?;
                Some(SummaryLine {
                    product_id: item.product_id.clone(),
                    variant_id: item.variant_id.clone(),
                    name: product.name.clone(),
                    variant_label: variant.label(),
                    image: product.thumbnail().map(str::to_owned),
                    quantity: item.quantity,
                    unit_price: product.price,
                    line_total: product.price.saturating_mul(item.quantity),
                })
            })
            .collect();

        let total = lines.iter().map(|l| l.line_total).sum();
        Self { lines, total }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{Category, ProductVariant, Size};

    fn mug() -> Product {
        Product {
            id: ProductId::new("mug-001"),
            name: "Ceramic Coffee Mug".to_owned(),
            description: "11oz ceramic mug".to_owned(),
            price: Price::from_cents(1499).unwrap(),
            category: Category::Mugs,
            images: vec!["/images/mug.jpg".to_owned()],
            tags: None,
            variants: vec![ProductVariant {
                id: VariantId::new("m001-one"),
                size: Some(Size::OneSize),
                color: Some("white".to_owned()),
                in_stock: true,
            }],
        }
    }

    fn line(p: &str, v: &str, quantity: u32) -> CartLineItem {
        CartLineItem {
            product_id: ProductId::new(p),
            variant_id: VariantId::new(v),
            quantity,
        }
    }

    #[test]
    fn test_prices_lines() {
        let summary = OrderSummary::build(&[line("mug-001", "m001-one", 3)], &[mug()]);
        assert_eq!(summary.lines.len(), 1);
        assert_eq!(summary.lines[0].variant_label, "ONE_SIZE, white");
        assert_eq!(summary.lines[0].image.as_deref(), Some("/images/mug.jpg"));
        assert_eq!(summary.total, Price::from_cents(4497).unwrap());
    }

    #[test]
    fn test_skips_unknown_products_and_variants() {
        let summary = OrderSummary::build(
            &[
                line("missing", "m001-one", 1),
                line("mug-001", "missing", 1),
                line("mug-001", "m001-one", 1),
            ],
            &[mug()],
        );
        assert_eq!(summary.lines.len(), 1);
        assert_eq!(summary.total.to_string(), "$14.99");
    }

    #[test]
    fn test_huge_quantities_saturate() {
        let mut product = mug();
        product.price = serde_json::from_str("1e20").unwrap();
        let items = [line("mug-001", "m001-one", u32::MAX), line("mug-001", "m001-one", 1)];

        let summary = OrderSummary::build(&items, &[product]);
        assert_eq!(summary.lines[0].line_total, Price::MAX);
        assert_eq!(summary.total, Price::MAX);
    }

    #[test]
    fn test_empty() {
        let summary = OrderSummary::build(&[], &[mug()]);
        assert!(summary.is_empty());
        assert_eq!(summary.total, Price::ZERO);
    }
}
