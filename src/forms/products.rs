use std::collections::HashSet;

use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::product::{NewProduct, UpdateProduct};
use crate::forms::sanitize_inline_text;

/// Maximum allowed length for a product name.
const NAME_MAX_LEN: usize = 128;
const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;

/// Result type returned by the product form helpers.
pub type ProductFormResult<T> = Result<T, ProductFormError>;

/// Errors that can occur while processing product payloads.
#[derive(Debug, Error)]
pub enum ProductFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The provided name is empty after sanitization.
    #[error("product name cannot be empty")]
    EmptyName,
}

/// A sanitized create payload together with the tag ids to attach.
#[derive(Debug, Clone)]
pub struct ProductPayload {
    /// Product attributes ready for insertion.
    pub product: NewProduct,
    /// Distinct tag ids to associate with the created product.
    pub tag_ids: Vec<i32>,
}

/// A sanitized update patch together with the optional replacement tag set.
#[derive(Debug, Clone)]
pub struct ProductPatch {
    /// Attribute changes to apply.
    pub updates: UpdateProduct,
    /// When present, the product's tag set is replaced by these ids.
    pub tag_ids: Option<Vec<i32>>,
}

/// JSON body accepted by `POST /api/products`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductForm {
    /// Name supplied by the client.
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// Price in the smallest currency unit.
    #[validate(range(min = 0))]
    pub price_cents: i64,
    /// Initial stock level.
    #[serde(default)]
    #[validate(range(min = 0))]
    pub stock: i32,
    /// Optional owning category.
    pub category_id: Option<i32>,
    /// Tags to attach to the created product.
    #[serde(default)]
    pub tag_ids: Vec<i32>,
}

impl CreateProductForm {
    /// Validates and sanitizes the payload into a domain `NewProduct` plus
    /// the distinct tag ids to attach.
    pub fn into_payload(self) -> ProductFormResult<ProductPayload> {
        self.validate()?;

        let sanitized_name = sanitize_inline_text(&self.name);
        if sanitized_name.is_empty() {
            return Err(ProductFormError::EmptyName);
        }

        let mut product = NewProduct::new(sanitized_name, self.price_cents).with_stock(self.stock);

        if let Some(description) = self
            .description
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
        {
            product = product.with_description(description);
        }

        if let Some(category_id) = self.category_id {
            product = product.with_category_id(category_id);
        }

        Ok(ProductPayload {
            product,
            tag_ids: dedupe_ids(self.tag_ids),
        })
    }
}

/// JSON body accepted by `PUT /api/products/{id}`.
///
/// Absent fields leave the stored attribute unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductForm {
    /// Optional replacement name.
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: Option<String>,
    /// Optional replacement description.
    pub description: Option<String>,
    /// Optional replacement price.
    #[validate(range(min = 0))]
    pub price_cents: Option<i64>,
    /// Optional replacement stock level.
    #[validate(range(min = 0))]
    pub stock: Option<i32>,
    /// Optional category reassignment.
    pub category_id: Option<i32>,
    /// When present, replaces the product's tag set entirely; an empty list
    /// clears it.
    pub tag_ids: Option<Vec<i32>>,
}

impl UpdateProductForm {
    /// Validates and sanitizes the payload into a domain patch.
    pub fn into_patch(self) -> ProductFormResult<ProductPatch> {
        self.validate()?;

        let mut updates = UpdateProduct::new();

        if let Some(name) = self.name.as_deref() {
            let sanitized_name = sanitize_inline_text(name);
            if sanitized_name.is_empty() {
                return Err(ProductFormError::EmptyName);
            }
            updates = updates.name(sanitized_name);
        }

        if let Some(description) = self
            .description
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
        {
            updates = updates.description(description);
        }

        if let Some(price_cents) = self.price_cents {
            updates = updates.price_cents(price_cents);
        }

        if let Some(stock) = self.stock {
            updates = updates.stock(stock);
        }

        if let Some(category_id) = self.category_id {
            updates = updates.category_id(category_id);
        }

        Ok(ProductPatch {
            updates,
            tag_ids: self.tag_ids.map(dedupe_ids),
        })
    }
}

/// Drops duplicate ids while preserving the order of first occurrence.
fn dedupe_ids(ids: Vec<i32>) -> Vec<i32> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}
