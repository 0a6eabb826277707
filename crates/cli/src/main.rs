//! LanguageShop CLI - catalog browsing and cart management.
//!
//! # Usage
//!
//! ```bash
//! # List in-stock hoodies under $60 from a running storefront
//! ls-cli products list --category hoodies --max 60 --in-stock
//!
//! # Show one product
//! ls-cli products show mug-001
//!
//! # Manage the persisted cart
//! ls-cli cart add mug-001 m001-one
//! ls-cli cart update mug-001 m001-one 3
//! ls-cli cart show
//! ls-cli cart clear
//! ```
//!
//! # Commands
//!
//! - `products` - Query the catalog API (`--api-url`, `LANGUAGESHOP_API_URL`)
//! - `cart` - Operate on the cart in `--data-dir` (`STOREFRONT_DATA_DIR`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use language_shop_core::Category;
use language_shop_storefront::catalog::CatalogClient;
use rust_decimal::Decimal;
use url::Url;

mod commands;

use commands::products::ListOptions;

#[derive(Parser)]
#[command(name = "ls-cli")]
#[command(author, version, about = "LanguageShop CLI tools")]
struct Cli {
    /// Catalog API base URL
    #[arg(
        long,
        global = true,
        env = "LANGUAGESHOP_API_URL",
        default_value = "http://127.0.0.1:3000/api"
    )]
    api_url: Url,

    /// Directory holding the persisted cart
    #[arg(
        long,
        global = true,
        env = "STOREFRONT_DATA_DIR",
        default_value = ".languageshop"
    )]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Manage the persisted cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List products matching the given filters
    List {
        /// Category (`hoodies`, `tshirts`, `mugs`, `socks`, `zip-hoodies`)
        #[arg(long)]
        category: Option<Category>,

        /// Case-insensitive text matched against name, description and tags
        #[arg(long)]
        search: Option<String>,

        /// Minimum price (default 0)
        #[arg(long)]
        min: Option<Decimal>,

        /// Maximum price (default 100)
        #[arg(long)]
        max: Option<Decimal>,

        /// Size to include, e.g. `M` (repeatable)
        #[arg(long = "size")]
        sizes: Vec<String>,

        /// Color to include, e.g. `black` (repeatable)
        #[arg(long = "color")]
        colors: Vec<String>,

        /// Only products with an in-stock variant
        #[arg(long)]
        in_stock: bool,
    },
    /// Show a single product
    Show {
        /// Product ID
        id: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart, priced against the catalog when it is reachable
    Show,
    /// Add one unit of a variant
    Add { product_id: String, variant_id: String },
    /// Set a line's quantity (values below 1 are ignored)
    Update {
        product_id: String,
        variant_id: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a line
    Remove { product_id: String, variant_id: String },
    /// Remove every line
    Clear,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let client = CatalogClient::new(cli.api_url);

    match cli.command {
        Commands::Products { action } => match action {
            ProductsAction::List {
                category,
                search,
                min,
                max,
                sizes,
                colors,
                in_stock,
            } => {
                let options = ListOptions {
                    category,
                    search,
                    min,
                    max,
                    sizes,
                    colors,
                    in_stock,
                };
                commands::products::list(&client, &options).await?;
            }
            ProductsAction::Show { id } => commands::products::show(&client, &id).await?,
        },
        Commands::Cart { action } => {
            let mut cart = commands::cart::open(&cli.data_dir);
            match action {
                CartAction::Show => commands::cart::show(&cart, &client).await,
                CartAction::Add {
                    product_id,
                    variant_id,
                } => commands::cart::add(&mut cart, product_id, variant_id),
                CartAction::Update {
                    product_id,
                    variant_id,
                    quantity,
                } => commands::cart::update(&mut cart, product_id, variant_id, quantity),
                CartAction::Remove {
                    product_id,
                    variant_id,
                } => commands::cart::remove(&mut cart, product_id, variant_id),
                CartAction::Clear => commands::cart::clear(&mut cart),
            }
        }
    }
    Ok(())
}
