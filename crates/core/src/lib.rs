//! LanguageShop Core - Domain types and state containers.
//!
//! This crate provides the pieces shared by every LanguageShop component:
//! - `storefront` - HTTP server exposing the catalog, cart and checkout
//! - `cli` - Command-line tools for browsing the catalog and managing the cart
//!
//! # Architecture
//!
//! The core crate contains types, state containers and pure functions - no
//! network I/O and no async. Durable storage is reached only through the
//! [`CartStorage`] trait, so containers can be driven by in-memory storage
//! in tests and by file storage in the storefront.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, emails, products and variants
//! - [`cart`] - Persisted cart container with versioned envelope
//! - [`storage`] - Key-value storage trait and in-memory backend
//! - [`filter`] - Filter criteria container
//! - [`view`] - Filtered catalog derivation and facet helpers
//! - [`checkout`] - Checkout form validation
//! - [`summary`] - Cart items priced against the catalog

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod filter;
pub mod storage;
pub mod summary;
pub mod types;
pub mod view;

pub use cart::{CART_STATE_VERSION, CART_STORAGE_KEY, Cart, CartLineItem};
pub use checkout::{CheckoutField, CheckoutForm, FieldError, ValidatedCheckout, ValidationErrors};
pub use filter::{FilterCriteria, PriceRange};
pub use storage::{CartStorage, MemoryStorage, StorageError};
pub use summary::{OrderSummary, SummaryLine};
pub use types::*;
pub use view::{available_categories, available_colors, filter_products};
