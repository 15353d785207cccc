use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::category::{NewCategory, UpdateCategory};
use crate::forms::sanitize_inline_text;

/// Maximum allowed length for a category name.
const NAME_MAX_LEN: usize = 128;
const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;

/// Result type returned by the category form helpers.
pub type CategoryFormResult<T> = Result<T, CategoryFormError>;

/// Errors that can occur while processing category payloads.
#[derive(Debug, Error)]
pub enum CategoryFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The provided name is empty after sanitization.
    #[error("category name cannot be empty")]
    EmptyName,
}

/// JSON body accepted by `POST /api/categories`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryForm {
    /// Name supplied by the client.
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
}

impl CreateCategoryForm {
    /// Validates and sanitizes the payload into a domain `NewCategory`.
    pub fn into_new_category(self) -> CategoryFormResult<NewCategory> {
        self.validate()?;

        let sanitized_name = sanitize_inline_text(&self.name);
        if sanitized_name.is_empty() {
            return Err(CategoryFormError::EmptyName);
        }

        Ok(NewCategory::new(sanitized_name))
    }
}

/// JSON body accepted by `PUT /api/categories/{id}`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryForm {
    /// Replacement name supplied by the client.
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
}

impl UpdateCategoryForm {
    /// Validates and sanitizes the payload into a domain `UpdateCategory`.
    pub fn into_update_category(self) -> CategoryFormResult<UpdateCategory> {
        self.validate()?;

        let sanitized_name = sanitize_inline_text(&self.name);
        if sanitized_name.is_empty() {
            return Err(CategoryFormError::EmptyName);
        }

        Ok(UpdateCategory::new(sanitized_name))
    }
}
