//! Filtered catalog view.
//!
//! [`filter_products`] is a pure function of the catalog and the criteria.
//! It is cheap at catalog sizes of a few hundred items and is recomputed on
//! every request; a cache keyed on `(catalog, criteria)` could be added
//! without changing results.

use std::collections::BTreeSet;

use crate::filter::FilterCriteria;
use crate::types::{Category, Product};

/// Narrow `products` to those matching every active criterion.
///
/// Passes, each skipped when its criterion is inactive:
///
/// 1. category equals the selected category
/// 2. price within the inclusive price range (always active)
/// 3. case-insensitive substring of name, description or any tag
/// 4. at least one variant in stock
/// 5. at least one variant whose size is selected
/// 6. at least one variant whose color is selected
///
/// Input order is preserved.
#[must_use]
pub fn filter_products<'a>(products: &'a [Product], criteria: &FilterCriteria) -> Vec<&'a Product> {
    let query = criteria.search_query().to_lowercase();

    products
        .iter()
        .filter(|p| criteria.category().is_none_or(|c| p.category == c))
        .filter(|p| criteria.price_range().contains(p.price.amount()))
        .filter(|p| query.is_empty() || matches_query(p, &query))
        .filter(|p| !criteria.in_stock() || p.has_stock())
        .filter(|p| {
            criteria.sizes().is_empty()
                || p.variants.iter().any(|v| {
                    v.size
                        .is_some_and(|size| criteria.sizes().contains(size.as_str()))
                })
        })
        .filter(|p| {
            criteria.colors().is_empty()
                || p.variants.iter().any(|v| {
                    v.color
                        .as_ref()
                        .is_some_and(|color| criteria.colors().contains(color))
                })
        })
        .collect()
}

/// `query` must already be lowercase.
fn matches_query(product: &Product, query: &str) -> bool {
    product.name.to_lowercase().contains(query)
        || product.description.to_lowercase().contains(query)
        || product
            .tags()
            .iter()
            .any(|tag| tag.to_lowercase().contains(query))
}

/// Distinct categories present in the catalog, sorted by wire name.
#[must_use]
pub fn available_categories(products: &[Product]) -> Vec<Category> {
    let mut categories: Vec<Category> = products
        .iter()
        .map(|p| p.category)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    categories.sort_by_key(Category::as_str);
    categories
}

/// Distinct variant colors present in the catalog, sorted.
#[must_use]
pub fn available_colors(products: &[Product]) -> Vec<String> {
    products
        .iter()
        .flat_map(|p| p.variants.iter().filter_map(|v| v.color.clone()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
