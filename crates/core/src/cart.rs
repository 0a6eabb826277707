//! Persisted shopping cart.
//!
//! [`Cart`] owns the line items and writes the whole collection to a
//! [`CartStorage`] under [`CART_STORAGE_KEY`] after every mutation. The
//! stored value is a versioned envelope:
//!
//! ```json
//! { "state": { "items": [{ "productId": "1", "variantId": "v1", "quantity": 2 }] }, "version": 0 }
//! ```
//!
//! Cart operations never fail. Items are not checked against the catalog,
//! and a storage write error is logged and otherwise ignored so the
//! in-memory cart stays usable.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::storage::CartStorage;
use crate::types::{ProductId, VariantId};

/// Storage key the cart is persisted under.
pub const CART_STORAGE_KEY: &str = "cart-storage";

/// Version written into new envelopes.
pub const CART_STATE_VERSION: u32 = 0;

/// One (product, variant, quantity) record in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub product_id: ProductId,
    pub variant_id: VariantId,
    /// Always at least 1.
    pub quantity: u32,
}

impl CartLineItem {
    fn matches(&self, product_id: &ProductId, variant_id: &VariantId) -> bool {
        &self.product_id == product_id && &self.variant_id == variant_id
    }
}

/// The cart state stored inside the envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub items: Vec<CartLineItem>,
}

/// An envelope as read from storage, before migration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredEnvelope {
    pub state: serde_json::Value,
    /// Envelopes written without a version are treated as version 0.
    #[serde(default)]
    pub version: u32,
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    state: SnapshotRef<'a>,
    version: u32,
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    items: &'a [CartLineItem],
}

/// Errors while restoring a persisted cart.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// The envelope was written by a newer release.
    #[error("unsupported cart state version {found} (current is {current})")]
    UnsupportedVersion { found: u32, current: u32 },

    /// The envelope or its state does not have the expected shape.
    #[error("malformed cart state: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Bring a stored envelope up to the current [`CartSnapshot`] shape.
///
/// Each version bump adds one arm that converts the previous shape into the
/// next. Restored items are normalized: zero quantities are dropped and
/// duplicate keys are merged by summing their quantities.
///
/// # Errors
///
/// Returns an error if the version is newer than [`CART_STATE_VERSION`] or
/// the state cannot be decoded.
pub fn migrate(envelope: StoredEnvelope) -> Result<CartSnapshot, MigrationError> {
    let snapshot: CartSnapshot = match envelope.version {
        0 => serde_json::from_value(envelope.state)?,
        found => {
            return Err(MigrationError::UnsupportedVersion {
                found,
                current: CART_STATE_VERSION,
            });
        }
    };

    Ok(normalize(snapshot))
}

fn normalize(snapshot: CartSnapshot) -> CartSnapshot {
    let mut items: Vec<CartLineItem> = Vec::with_capacity(snapshot.items.len());
    for item in snapshot.items.into_iter().filter(|i| i.quantity > 0) {
        match items
            .iter_mut()
            .find(|existing| existing.matches(&item.product_id, &item.variant_id))
        {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
            None => items.push(item),
        }
    }
    CartSnapshot { items }
}

/// The cart state container.
#[derive(Debug)]
pub struct Cart<S> {
    items: Vec<CartLineItem>,
    storage: S,
    hydrated: bool,
}

impl<S: CartStorage> Cart<S> {
    /// Create an empty, not-yet-hydrated cart over `storage`.
    pub const fn new(storage: S) -> Self {
        Self {
            items: Vec::new(),
            storage,
            hydrated: false,
        }
    }

    /// Create a cart and immediately restore any persisted state.
    pub fn open(storage: S) -> Self {
        let mut cart = Self::new(storage);
        cart.hydrate();
        cart
    }

    /// Restore persisted state, replacing the in-memory items.
    ///
    /// Missing, unreadable, malformed or future-version data leaves the
    /// cart empty. The hydration flag is set in every case.
    pub fn hydrate(&mut self) {
        self.items = match self.load() {
            Ok(Some(snapshot)) => {
                debug!(items = snapshot.items.len(), "Cart hydrated from storage");
                snapshot.items
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Discarding persisted cart state");
                Vec::new()
            }
        };
        self.hydrated = true;
    }

    fn load(&self) -> Result<Option<CartSnapshot>, StateError> {
        let Some(raw) = self.storage.get_item(CART_STORAGE_KEY)? else {
            return Ok(None);
        };
        let envelope: StoredEnvelope =
            serde_json::from_str(&raw).map_err(MigrationError::Malformed)?;
        Ok(Some(migrate(envelope)?))
    }

    /// Whether [`hydrate`](Self::hydrate) has completed.
    #[must_use]
    pub const fn has_hydrated(&self) -> bool {
        self.hydrated
    }

    /// Current line items, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Whether the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all line item quantities.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Add one unit of a variant, creating the line item if needed.
    pub fn add_item(&mut self, product_id: impl Into<ProductId>, variant_id: impl Into<VariantId>) {
        let product_id = product_id.into();
        let variant_id = variant_id.into();

        match self
            .items
            .iter_mut()
            .find(|i| i.matches(&product_id, &variant_id))
        {
            Some(item) => item.quantity = item.quantity.saturating_add(1),
            None => self.items.push(CartLineItem {
                product_id,
                variant_id,
                quantity: 1,
            }),
        }

        self.persist();
    }

    /// Set the quantity of an existing line item.
    ///
    /// Quantities below 1 are ignored rather than treated as removal; use
    /// [`remove_item`](Self::remove_item) for that. Unknown keys are ignored.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        variant_id: &VariantId,
        quantity: i64,
    ) {
        if quantity < 1 {
            return;
        }
        let Ok(quantity) = u32::try_from(quantity) else {
            debug!(quantity, "Ignoring out-of-range cart quantity");
            return;
        };

        let Some(item) = self
            .items
            .iter_mut()
            .find(|i| i.matches(product_id, variant_id))
        else {
            return;
        };
        if item.quantity == quantity {
            return;
        }
        item.quantity = quantity;

        self.persist();
    }

    /// Remove a line item if present.
    pub fn remove_item(&mut self, product_id: &ProductId, variant_id: &VariantId) {
        let before = self.items.len();
        self.items.retain(|i| !i.matches(product_id, variant_id));
        if self.items.len() != before {
            self.persist();
        }
    }

    /// Remove every line item.
    pub fn clear_cart(&mut self) {
        self.items.clear();
        self.persist();
    }

    fn persist(&self) {
        let envelope = EnvelopeRef {
            state: SnapshotRef { items: &self.items },
            version: CART_STATE_VERSION,
        };

        let result = serde_json::to_string(&envelope)
            .map_err(StateError::from)
            .and_then(|json| {
                self.storage
                    .set_item(CART_STORAGE_KEY, &json)
                    .map_err(StateError::from)
            });

        if let Err(e) = result {
            warn!(error = %e, "Failed to persist cart");
        }
    }
}

#[derive(Debug, Error)]
enum StateError {
    #[error(transparent)]
    Storage(#[from] crate::storage::StorageError),
    #[error(transparent)]
    Migration(#[from] MigrationError),
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, StorageError};

    fn key(p: &str, v: &str) -> (ProductId, VariantId) {
        (ProductId::new(p), VariantId::new(v))
    }

    fn item(p: &str, v: &str, quantity: u32) -> CartLineItem {
        CartLineItem {
            product_id: ProductId::new(p),
            variant_id: VariantId::new(v),
            quantity,
        }
    }

    #[test]
    fn test_add_same_key_increments() {
        let mut cart = Cart::new(MemoryStorage::new());
        for _ in 0..5 {
            cart.add_item("prod-1", "var-1");
        }
        assert_eq!(cart.items(), &[item("prod-1", "var-1", 5)]);
    }

    #[test]
    fn test_add_scenario_totals() {
        let mut cart = Cart::new(MemoryStorage::new());
        cart.add_item("1", "v1");
        cart.add_item("1", "v1");
        cart.add_item("2", "v2");

        assert_eq!(cart.items(), &[item("1", "v1", 2), item("2", "v2", 1)]);
        assert_eq!(cart.total_items(), 3);
    }

    #[test]
    fn test_same_product_different_variant_is_separate_line() {
        let mut cart = Cart::new(MemoryStorage::new());
        cart.add_item("1", "v1");
        cart.add_item("1", "v2");
        assert_eq!(cart.items().len(), 2);
    }

    #[test]
    fn test_update_quantity() {
        let mut cart = Cart::new(MemoryStorage::new());
        cart.add_item("prod-1", "var-1");
        let (p, v) = key("prod-1", "var-1");
        cart.update_quantity(&p, &v, 3);
        assert_eq!(cart.items(), &[item("prod-1", "var-1", 3)]);
    }

    #[test]
    fn test_update_quantity_below_one_is_noop() {
        let mut cart = Cart::new(MemoryStorage::new());
        cart.add_item("prod-1", "var-1");
        cart.add_item("prod-1", "var-1");
        let before = cart.items().to_vec();

        let (p, v) = key("prod-1", "var-1");
        for q in [0, -1, i64::MIN] {
            cart.update_quantity(&p, &v, q);
            assert_eq!(cart.items(), before.as_slice());
        }
    }

    #[test]
    fn test_update_quantity_unknown_key_is_noop() {
        let mut cart = Cart::new(MemoryStorage::new());
        cart.add_item("prod-1", "var-1");
        let (p, v) = key("prod-2", "var-1");
        cart.update_quantity(&p, &v, 7);
        assert_eq!(cart.items(), &[item("prod-1", "var-1", 1)]);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut cart = Cart::new(MemoryStorage::new());
        cart.add_item("prod-1", "var-1");
        cart.add_item("prod-2", "var-2");
        let (p, v) = key("prod-1", "var-1");

        cart.remove_item(&p, &v);
        let after_first = cart.items().to_vec();
        cart.remove_item(&p, &v);

        assert_eq!(cart.items(), after_first.as_slice());
        assert_eq!(cart.items(), &[item("prod-2", "var-2", 1)]);
    }

    #[test]
    fn test_clear_cart() {
        let mut cart = Cart::new(MemoryStorage::new());
        cart.clear_cart();
        assert!(cart.is_empty());

        cart.add_item("a", "1");
        cart.add_item("b", "2");
        cart.add_item("b", "2");
        cart.clear_cart();
        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
    }

    #[test]
    fn test_persists_envelope() {
        let storage = MemoryStorage::new();
        let mut cart = Cart::new(storage.clone());
        cart.add_item("1", "v1");

        let raw = storage.get_item(CART_STORAGE_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "state": { "items": [{ "productId": "1", "variantId": "v1", "quantity": 1 }] },
                "version": 0
            })
        );
    }

    #[test]
    fn test_hydrate_restores_previous_session() {
        let storage = MemoryStorage::new();
        {
            let mut cart = Cart::open(storage.clone());
            cart.add_item("1", "v1");
            cart.add_item("1", "v1");
            cart.add_item("2", "v2");
        }

        let cart = Cart::open(storage);
        assert!(cart.has_hydrated());
        assert_eq!(cart.items(), &[item("1", "v1", 2), item("2", "v2", 1)]);
    }

    #[test]
    fn test_new_cart_is_not_hydrated() {
        let mut cart = Cart::new(MemoryStorage::new());
        assert!(!cart.has_hydrated());
        cart.hydrate();
        assert!(cart.has_hydrated());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_hydrate_discards_future_version() {
        let storage = MemoryStorage::new();
        storage
            .set_item(
                CART_STORAGE_KEY,
                r#"{"state":{"items":[{"productId":"1","variantId":"v1","quantity":1}]},"version":7}"#,
            )
            .unwrap();

        let cart = Cart::open(storage);
        assert!(cart.has_hydrated());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_hydrate_discards_corrupt_state() {
        let storage = MemoryStorage::new();
        storage.set_item(CART_STORAGE_KEY, "not json").unwrap();
        let cart = Cart::open(storage);
        assert!(cart.has_hydrated());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_migrate_missing_version_normalizes() {
        let envelope: StoredEnvelope = serde_json::from_str(
            r#"{"state":{"items":[
                {"productId":"1","variantId":"v1","quantity":2},
                {"productId":"2","variantId":"v2","quantity":0},
                {"productId":"1","variantId":"v1","quantity":3}
            ]}}"#,
        )
        .unwrap();
        assert_eq!(envelope.version, 0);

        let snapshot = migrate(envelope).unwrap();
        assert_eq!(snapshot.items, vec![item("1", "v1", 5)]);
    }

    #[test]
    fn test_migrate_rejects_negative_quantity() {
        let envelope: StoredEnvelope = serde_json::from_str(
            r#"{"state":{"items":[{"productId":"1","variantId":"v1","quantity":-2}]},"version":0}"#,
        )
        .unwrap();
        assert!(matches!(migrate(envelope), Err(MigrationError::Malformed(_))));
    }

    struct FailingStorage;

    impl CartStorage for FailingStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Poisoned)
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Poisoned)
        }

        fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Poisoned)
        }
    }

    #[derive(Default)]
    struct CountingStorage {
        inner: MemoryStorage,
        writes: std::sync::atomic::AtomicUsize,
    }

    impl CountingStorage {
        fn writes(&self) -> usize {
            self.writes.load(std::sync::atomic::Ordering::SeqCst)
        }
    }

    impl CartStorage for CountingStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.writes.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            self.inner.set_item(key, value)
        }

        fn remove_item(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove_item(key)
        }
    }

    #[test]
    fn test_unchanged_state_is_not_persisted() {
        let storage = std::sync::Arc::new(CountingStorage::default());
        let mut cart = Cart::new(storage.clone());
        cart.add_item("1", "v1");
        assert_eq!(storage.writes(), 1);

        let (p, v) = key("1", "v1");
        let (missing_p, missing_v) = key("2", "v2");
        cart.update_quantity(&missing_p, &missing_v, 4);
        cart.update_quantity(&p, &v, 1);
        cart.update_quantity(&p, &v, 0);
        cart.remove_item(&missing_p, &missing_v);
        assert_eq!(storage.writes(), 1);

        cart.update_quantity(&p, &v, 4);
        cart.remove_item(&p, &v);
        assert_eq!(storage.writes(), 3);
    }

    #[test]
    fn test_storage_failure_does_not_fail_operations() {
        let mut cart = Cart::open(FailingStorage);
        assert!(cart.has_hydrated());
        cart.add_item("1", "v1");
        cart.add_item("1", "v1");
        assert_eq!(cart.total_items(), 2);
    }
}
