//! Catalog product record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// A catalog product as delivered by the storefront API.
///
/// Only the fields the cart copies into a line item are modeled here;
/// category, description, and image data stay in the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog ID, unique per product.
    pub id: ProductId,
    /// Display name; the catalog may omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Unit price in the store currency. Non-negative by catalog contract.
    pub price: Decimal,
}

impl Product {
    /// Create a product record.
    #[must_use]
    pub fn new(id: ProductId, name: Option<String>, price: Decimal) -> Self {
        Self { id, name, price }
    }
}
