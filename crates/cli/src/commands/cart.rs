//! Cart management commands.
//!
//! Operates directly on the cart file the storefront persists, so changes
//! made here are seen by the server on its next start.
//!
//! # Usage
//!
//! ```bash
//! ls-cli cart add tshirt-001 t001-m-white
//! ls-cli cart update tshirt-001 t001-m-white 2
//! ls-cli cart remove tshirt-001 t001-m-white
//! ls-cli --data-dir /var/lib/languageshop cart show
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATA_DIR` - Directory holding the persisted cart (default: `.languageshop`)

use std::fmt::Write as _;
use std::path::Path;

use language_shop_core::{Cart, CartLineItem, OrderSummary, ProductId, VariantId};
use language_shop_storefront::catalog::CatalogClient;
use language_shop_storefront::storage::FileStorage;
use tracing::{info, warn};

/// Open and hydrate the cart stored in `data_dir`.
#[must_use]
pub fn open(data_dir: &Path) -> Cart<FileStorage> {
    Cart::open(FileStorage::new(data_dir))
}

/// Raw line items, used when the catalog is unreachable.
#[must_use]
pub fn render_items(items: &[CartLineItem]) -> String {
    let mut out = String::new();
    for item in items {
        let _ = writeln!(
            out,
            "{:<12} {:<14} x{}",
            item.product_id.as_str(),
            item.variant_id.as_str(),
            item.quantity
        );
    }
    out
}

/// Priced lines and the subtotal.
#[must_use]
pub fn render_summary(summary: &OrderSummary) -> String {
    let mut out = String::new();
    for line in &summary.lines {
        let _ = writeln!(
            out,
            "{:<26} {:<14} {:>3} x {:>9} = {:>9}",
            line.name,
            line.variant_label,
            line.quantity,
            line.unit_price.to_string(),
            line.line_total.to_string()
        );
    }
    let _ = writeln!(out, "Subtotal: {}", summary.total);
    out
}

/// Print the cart, priced against the catalog API when it answers.
#[allow(clippy::print_stdout)]
pub async fn show(cart: &Cart<FileStorage>, client: &CatalogClient) {
    if cart.is_empty() {
        println!("Your cart is empty");
        return;
    }

    match client.fetch_products().await {
        Ok(products) => print!("{}", render_summary(&OrderSummary::build(cart.items(), &products))),
        Err(e) => {
            warn!(error = %e, "Catalog unavailable, showing unpriced items");
            print!("{}", render_items(cart.items()));
        }
    }
    println!("{} item(s)", cart.total_items());
}

pub fn add(cart: &mut Cart<FileStorage>, product_id: String, variant_id: String) {
    cart.add_item(product_id, variant_id);
    info!(total_items = cart.total_items(), "Added to cart");
}

pub fn update(cart: &mut Cart<FileStorage>, product_id: String, variant_id: String, quantity: i64) {
    if quantity < 1 {
        warn!(quantity, "Quantity must be at least 1; use `cart remove` to delete a line");
    }
    cart.update_quantity(&ProductId::new(product_id), &VariantId::new(variant_id), quantity);
    info!(total_items = cart.total_items(), "Cart updated");
}

pub fn remove(cart: &mut Cart<FileStorage>, product_id: String, variant_id: String) {
    cart.remove_item(&ProductId::new(product_id), &VariantId::new(variant_id));
    info!(total_items = cart.total_items(), "Removed from cart");
}

pub fn clear(cart: &mut Cart<FileStorage>) {
    cart.clear_cart();
    info!("Cart cleared");
}
