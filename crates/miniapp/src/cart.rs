//! Cart state engine.
//!
//! The engine exclusively owns the line-item collection for the lifetime
//! of the app session. Mutations are synchronous on the caller's event
//! loop; after each one an explicit post-mutation hook recomputes the
//! aggregates and schedules persistence to both backends. The local
//! backend is written synchronously, the cloud backend via a
//! fire-and-forget task. Each cloud write carries a complete snapshot of
//! the cart, so out-of-order completion of in-flight writes can only ever
//! land some point-in-time cart, never a partial merge.
//!
//! Hydration order on startup: the local backend wins when it holds a
//! parseable cart, and the cloud copy is consulted only when the cart is
//! still empty afterwards. That keeps a stale cross-device copy from
//! overwriting a freshly started local session.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use nexus_gear_core::{Product, ProductId};

use crate::storage::DualStore;

/// Storage key for the serialized cart, shared by both backends.
pub const CART_STORAGE_KEY: &str = "ngs_cart_items_v1";

/// One product entry in the cart.
///
/// Quantity is at least 1 while the item is in the collection; an item
/// whose quantity reaches 0 is removed, never retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product this line refers to. Unique within the cart.
    pub id: ProductId,
    /// Display name copied from the catalog record at add time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Unit price copied from the catalog record at add time.
    pub price: Decimal,
    /// Number of units, >= 1.
    pub quantity: u32,
}

impl LineItem {
    fn from_product(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            quantity: 1,
        }
    }

    /// Price times quantity for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Parse a persisted payload into line items.
///
/// Anything that is not a JSON array of line-item records counts as
/// absent. Records with a zero quantity cannot exist in a live cart and
/// are dropped at this boundary.
fn parse_items(raw: &str) -> Option<Vec<LineItem>> {
    let mut items: Vec<LineItem> = serde_json::from_str(raw).ok()?;
    items.retain(|item| item.quantity >= 1);
    Some(items)
}

/// Reactive cart state container.
///
/// Construct with [`CartEngine::new`] (synchronous local hydration), then
/// call [`CartEngine::hydrate_remote`] once to pull the cross-device copy
/// when no local cart exists. Cloud persistence is spawned onto the
/// current async runtime; without one, mutations still succeed and only
/// the local copy is written.
pub struct CartEngine {
    store: DualStore,
    items: Vec<LineItem>,
    total_items: u32,
    total_price: Decimal,
}

impl CartEngine {
    /// Create the engine, adopting the local backend's cart if it holds
    /// one.
    #[must_use]
    pub fn new(store: DualStore) -> Self {
        let items = store
            .local_get(CART_STORAGE_KEY)
            .and_then(|raw| parse_items(&raw))
            .unwrap_or_default();
        let mut engine = Self {
            store,
            items,
            total_items: 0,
            total_price: Decimal::ZERO,
        };
        engine.recompute();
        engine
    }

    /// Consult the cloud copy, only when local hydration produced an
    /// empty cart.
    ///
    /// Runs once at startup. When the cart already has items the cloud
    /// backend is not read at all, so a stale remote copy can never
    /// append onto a fresh local session.
    pub async fn hydrate_remote(&mut self) {
        if !self.items.is_empty() {
            return;
        }
        let Some(raw) = self.store.cloud_get(CART_STORAGE_KEY).await else {
            return;
        };
        if let Some(items) = parse_items(&raw) {
            self.items = items;
            self.recompute();
        }
    }

    /// Add one unit of `product`: increments the existing line or appends
    /// a new one with quantity 1.
    pub fn add_product(&mut self, product: &Product) {
        match self.items.iter_mut().find(|item| item.id == product.id) {
            Some(existing) => existing.quantity += 1,
            None => self.items.push(LineItem::from_product(product)),
        }
        self.after_mutation();
    }

    /// Remove one unit. A line reaching quantity 0 is removed entirely.
    /// No-op for an absent id.
    pub fn decrement_product(&mut self, id: ProductId) {
        let Some(existing) = self.items.iter_mut().find(|item| item.id == id) else {
            return;
        };
        existing.quantity = existing.quantity.saturating_sub(1);
        if existing.quantity == 0 {
            self.items.retain(|item| item.id != id);
        }
        self.after_mutation();
    }

    /// Set a line's quantity. Negative values clamp to 0, and 0 removes
    /// the line. No-op for an absent id.
    pub fn set_quantity(&mut self, id: ProductId, quantity: i64) {
        if !self.items.iter().any(|item| item.id == id) {
            return;
        }
        let next = u32::try_from(quantity.max(0)).unwrap_or(u32::MAX);
        if next == 0 {
            self.items.retain(|item| item.id != id);
        } else if let Some(existing) = self.items.iter_mut().find(|item| item.id == id) {
            existing.quantity = next;
        }
        self.after_mutation();
    }

    /// Set a line's quantity from free-text field input. Non-numeric
    /// input coerces to 0, which removes the line.
    pub fn set_quantity_input(&mut self, id: ProductId, raw: &str) {
        let quantity = raw.trim().parse::<i64>().unwrap_or(0);
        self.set_quantity(id, quantity);
    }

    /// Remove a line unconditionally. No-op for an absent id.
    pub fn remove_product(&mut self, id: ProductId) {
        self.items.retain(|item| item.id != id);
        self.after_mutation();
    }

    /// Empty the cart, e.g. after a successful checkout.
    pub fn clear(&mut self) {
        self.items.clear();
        self.after_mutation();
    }

    /// Current line items, in first-added order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub const fn total_items(&self) -> u32 {
        self.total_items
    }

    /// Sum of price times quantity across all lines.
    #[must_use]
    pub const fn total_price(&self) -> Decimal {
        self.total_price
    }

    /// Whether the cart holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Post-mutation hook: recompute aggregates, then persist. Every
    /// mutation ends here; hydration does not.
    fn after_mutation(&mut self) {
        self.recompute();
        self.persist();
    }

    fn recompute(&mut self) {
        self.total_items = self.items.iter().map(|item| item.quantity).sum();
        self.total_price = self.items.iter().map(LineItem::line_total).sum();
    }

    /// Serialize the current cart once and write it to both backends.
    ///
    /// The local write is synchronous and therefore ordered with
    /// mutations. The cloud write is spawned and never awaited; a failure
    /// in either backend is independent of the other and of the mutation
    /// itself. The next mutation's write is the retry.
    fn persist(&self) {
        let payload = match serde_json::to_string(&self.items) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::debug!(error = %e, "Cart snapshot serialization failed, skipping persistence");
                return;
            }
        };

        self.store.local_set(CART_STORAGE_KEY, &payload);

        let Some(cloud) = self.store.cloud_handle() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if !cloud.set_item(CART_STORAGE_KEY, &payload).await {
                        tracing::debug!("Cloud cart write failed, next mutation retries");
                    }
                });
            }
            Err(_) => {
                tracing::debug!("No async runtime, skipping cloud cart write");
            }
        }
    }
}
