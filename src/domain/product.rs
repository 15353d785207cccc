use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::category::Category;
use crate::domain::tag::Tag;

/// Domain representation of a catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier of the product.
    pub id: i32,
    /// Human-readable name of the product.
    pub name: String,
    /// Optional longer description shown to clients.
    pub description: Option<String>,
    /// Price represented in the smallest currency unit (for example cents).
    pub price_cents: i64,
    /// Number of units currently in stock.
    pub stock: i32,
    /// Identifier of the owning category, if any.
    pub category_id: Option<i32>,
    /// Eager-loaded category record, when `category_id` is set.
    pub category: Option<Category>,
    /// Eager-loaded tags attached through the join table.
    pub tags: Vec<Tag>,
    /// Timestamp for when the product record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the product record.
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    /// Human-readable name of the product.
    pub name: String,
    /// Optional longer description shown to clients.
    pub description: Option<String>,
    /// Price in the smallest currency unit.
    pub price_cents: i64,
    /// Number of units in stock.
    pub stock: i32,
    /// Identifier of the owning category, if any.
    pub category_id: Option<i32>,
}

impl NewProduct {
    /// Build a new product payload with the supplied name and price.
    pub fn new(name: impl Into<String>, price_cents: i64) -> Self {
        Self {
            name: name.into(),
            description: None,
            price_cents,
            stock: 0,
            category_id: None,
        }
    }

    /// Attach a descriptive text to the product payload.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the initial stock level.
    pub fn with_stock(mut self, stock: i32) -> Self {
        self.stock = stock;
        self
    }

    /// Assign the product to a category.
    pub fn with_category_id(mut self, category_id: i32) -> Self {
        self.category_id = Some(category_id);
        self
    }
}

/// Patch data applied when updating an existing product.
///
/// Fields left as `None` are not touched; `updated_at` is always refreshed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateProduct {
    /// Optional name update.
    pub name: Option<String>,
    /// Optional description update.
    pub description: Option<String>,
    /// Optional price update in the smallest currency unit.
    pub price_cents: Option<i64>,
    /// Optional stock level update.
    pub stock: Option<i32>,
    /// Optional category reassignment.
    pub category_id: Option<i32>,
    /// Timestamp captured when the patch was created.
    pub updated_at: NaiveDateTime,
}

impl Default for UpdateProduct {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateProduct {
    /// Create a new patch object with no changes applied yet.
    pub fn new() -> Self {
        Self {
            name: None,
            description: None,
            price_cents: None,
            stock: None,
            category_id: None,
            updated_at: chrono::Local::now().naive_utc(),
        }
    }

    /// Update the product name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Update the product description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Update the product price.
    pub fn price_cents(mut self, price_cents: i64) -> Self {
        self.price_cents = Some(price_cents);
        self
    }

    /// Update the stock level.
    pub fn stock(mut self, stock: i32) -> Self {
        self.stock = Some(stock);
        self
    }

    /// Reassign the product to a category.
    pub fn category_id(mut self, category_id: i32) -> Self {
        self.category_id = Some(category_id);
        self
    }
}
