//! Catalog browsing commands.
//!
//! # Usage
//!
//! ```bash
//! ls-cli products list --category tshirts --size M --color white
//! ls-cli products show hoodie-001
//! ```
//!
//! # Environment Variables
//!
//! - `LANGUAGESHOP_API_URL` - Catalog API base URL (default: `http://127.0.0.1:3000/api`)

use std::fmt::Write as _;

use language_shop_core::{
    Category, FilterCriteria, PriceRange, Product, ProductId, filter_products,
};
use language_shop_storefront::catalog::{CatalogClient, CatalogError};
use rust_decimal::Decimal;

/// Filters for `products list`. Unset bounds fall back to the default range.
#[derive(Debug, Default)]
pub struct ListOptions {
    pub category: Option<Category>,
    pub search: Option<String>,
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub in_stock: bool,
}

impl ListOptions {
    /// Build filter criteria the same way the storefront's filter routes do.
    #[must_use]
    pub fn criteria(&self) -> FilterCriteria {
        let mut criteria = FilterCriteria::new();
        criteria.set_category(self.category);
        criteria.set_price_range(PriceRange::new(
            self.min.unwrap_or(PriceRange::DEFAULT.min),
            self.max.unwrap_or(PriceRange::DEFAULT.max),
        ));
        // A flag given twice selects once rather than toggling back off
        for size in &self.sizes {
            if !criteria.sizes().contains(size) {
                criteria.toggle_size(size.as_str());
            }
        }
        for color in &self.colors {
            if !criteria.colors().contains(color) {
                criteria.toggle_color(color.as_str());
            }
        }
        criteria.set_in_stock(self.in_stock);
        if let Some(search) = &self.search {
            criteria.set_search_query(search.as_str());
        }
        criteria
    }
}

/// One line per product: ID, price, stock marker and name.
#[must_use]
pub fn render_list(products: &[&Product]) -> String {
    let mut out = String::new();
    for product in products {
        let stock = if product.has_stock() { "" } else { "  (out of stock)" };
        let _ = writeln!(
            out,
            "{:<12} {:>9}  {}{stock}",
            product.id.as_str(),
            product.price.to_string(),
            product.name
        );
    }
    let _ = writeln!(out, "{} product(s)", products.len());
    out
}

/// Product detail with one line per variant.
#[must_use]
pub fn render_detail(product: &Product) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", product.name, product.id);
    let _ = writeln!(out, "{} - {}", product.price, product.category.label());
    let _ = writeln!(out, "{}", product.description);
    for variant in &product.variants {
        let stock = if variant.in_stock { "in stock" } else { "out of stock" };
        let _ = writeln!(out, "  {:<14} {:<16} {stock}", variant.id.as_str(), variant.label());
    }
    if product.first_in_stock_variant().is_none() {
        let _ = writeln!(out, "This product is currently out of stock.");
    }
    out
}

/// Fetch the catalog and print the products matching `options`.
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched.
#[allow(clippy::print_stdout)]
pub async fn list(client: &CatalogClient, options: &ListOptions) -> Result<(), CatalogError> {
    tracing::info!(api = %client.base_url(), "Fetching catalog");
    let products = client.fetch_products().await?;
    let criteria = options.criteria();
    let matching = filter_products(&products, &criteria);

    print!("{}", render_list(&matching));
    Ok(())
}

/// Output for a product lookup. An unknown ID is a normal outcome.
///
/// # Errors
///
/// Returns the lookup error unless it is [`CatalogError::NotFound`].
pub fn render_lookup(result: Result<Product, CatalogError>) -> Result<String, CatalogError> {
    match result {
        Ok(product) => Ok(render_detail(&product)),
        Err(CatalogError::NotFound(id)) => Ok(format!("Product not found: {id}\n")),
        Err(e) => Err(e),
    }
}

/// Fetch and print a single product, or a not-found line.
///
/// # Errors
///
/// Returns an error if the request fails.
#[allow(clippy::print_stdout)]
pub async fn show(client: &CatalogClient, id: &str) -> Result<(), CatalogError> {
    let result = client.fetch_product_by_id(&ProductId::new(id)).await;
    print!("{}", render_lookup(result)?);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use language_shop_storefront::catalog::MockCatalog;

    #[test]
    fn test_criteria_defaults_match_storefront() {
        assert_eq!(ListOptions::default().criteria(), FilterCriteria::new());
    }

    #[test]
    fn test_criteria_from_options() {
        let options = ListOptions {
            category: Some(Category::Tshirts),
            max: Some(Decimal::from(30)),
            sizes: vec!["M".to_string()],
            in_stock: true,
            ..ListOptions::default()
        };
        let criteria = options.criteria();

        assert_eq!(criteria.category(), Some(Category::Tshirts));
        assert_eq!(criteria.price_range().min, Decimal::ZERO);
        assert_eq!(criteria.price_range().max, Decimal::from(30));
        assert!(criteria.sizes().contains("M"));
        assert!(criteria.in_stock());
    }

    #[test]
    fn test_repeated_flag_is_a_single_selection() {
        let options = ListOptions {
            colors: vec!["white".to_string(), "white".to_string()],
            ..ListOptions::default()
        };
        assert_eq!(options.criteria().colors().len(), 1);
    }

    #[test]
    fn test_render_list() {
        let catalog = MockCatalog::builtin().unwrap();
        let products: Vec<&Product> = catalog.products().iter().collect();
        let out = render_list(&products);

        assert!(out.contains("mug-001"));
        assert!(out.contains("$14.99"));
        assert!(out.ends_with("3 product(s)\n"));
    }

    #[test]
    fn test_render_lookup_reports_unknown_id() {
        let out = render_lookup(Err(CatalogError::NotFound(ProductId::new("nope")))).unwrap();
        assert_eq!(out, "Product not found: nope\n");

        let catalog = MockCatalog::builtin().unwrap();
        let mug = catalog.get(&ProductId::new("mug-001")).unwrap().clone();
        assert!(render_lookup(Ok(mug)).unwrap().starts_with("Ceramic Coffee Mug"));

        assert!(matches!(
            render_lookup(Err(CatalogError::FetchFailed { status: 500 })),
            Err(CatalogError::FetchFailed { status: 500 })
        ));
    }

    #[test]
    fn test_render_detail() {
        let catalog = MockCatalog::builtin().unwrap();
        let hoodie = catalog.get(&ProductId::new("hoodie-001")).unwrap();
        let out = render_detail(hoodie);

        assert!(out.starts_with("Classic Language Hoodie (hoodie-001)\n$49.99 - Hoodies\n"));
        assert!(out.contains("L, black"));
        assert!(out.contains("out of stock"));
        assert!(!out.contains("currently out of stock"));
    }
}
