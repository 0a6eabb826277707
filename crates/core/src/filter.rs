//! Product filter criteria.
//!
//! Every setter replaces exactly one field. Nothing is validated: a price
//! range with `min > max` is stored as given and simply matches no product.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Category;

/// Inclusive price bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    #[serde(with = "rust_decimal::serde::float")]
    pub min: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub max: Decimal,
}

impl PriceRange {
    /// The range applied when no price filter has been chosen: `0..=100`.
    pub const DEFAULT: Self = Self {
        min: Decimal::ZERO,
        max: Decimal::ONE_HUNDRED,
    };

    #[must_use]
    pub const fn new(min: Decimal, max: Decimal) -> Self {
        Self { min, max }
    }

    /// Whether `amount` lies within the bounds, inclusive on both ends.
    #[must_use]
    pub fn contains(&self, amount: Decimal) -> bool {
        self.min <= amount && amount <= self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// The user's current narrowing conditions for the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    category: Option<Category>,
    price_range: PriceRange,
    sizes: BTreeSet<String>,
    colors: BTreeSet<String>,
    in_stock: bool,
    search_query: String,
}

impl FilterCriteria {
    /// Criteria that match the whole default price range.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn category(&self) -> Option<Category> {
        self.category
    }

    #[must_use]
    pub const fn price_range(&self) -> PriceRange {
        self.price_range
    }

    #[must_use]
    pub const fn sizes(&self) -> &BTreeSet<String> {
        &self.sizes
    }

    #[must_use]
    pub const fn colors(&self) -> &BTreeSet<String> {
        &self.colors
    }

    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.in_stock
    }

    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub const fn set_category(&mut self, category: Option<Category>) {
        self.category = category;
    }

    pub const fn set_price_range(&mut self, range: PriceRange) {
        self.price_range = range;
    }

    /// Add `size` if absent, remove it if present.
    pub fn toggle_size(&mut self, size: impl Into<String>) {
        toggle(&mut self.sizes, size.into());
    }

    /// Add `color` if absent, remove it if present.
    pub fn toggle_color(&mut self, color: impl Into<String>) {
        toggle(&mut self.colors, color.into());
    }

    pub const fn set_in_stock(&mut self, enabled: bool) {
        self.in_stock = enabled;
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// Restore every field to its default.
    pub fn reset_filters(&mut self) {
        *self = Self::default();
    }
}

fn toggle(set: &mut BTreeSet<String>, value: String) {
    if !set.remove(&value) {
        set.insert(value);
    }
}
