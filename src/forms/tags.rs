use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::tag::{NewTag, UpdateTag};
use crate::forms::sanitize_inline_text;

/// Maximum allowed length for a tag name.
const NAME_MAX_LEN: usize = 128;
const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;

/// Result type returned by the tag form helpers.
pub type TagFormResult<T> = Result<T, TagFormError>;

/// Errors that can occur while processing tag payloads.
#[derive(Debug, Error)]
pub enum TagFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The provided name is empty after sanitization.
    #[error("tag name cannot be empty")]
    EmptyName,
}

/// JSON body accepted by `POST /api/tags`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTagForm {
    /// Name supplied by the client.
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
}

impl CreateTagForm {
    /// Validates and sanitizes the payload into a domain `NewTag`.
    pub fn into_new_tag(self) -> TagFormResult<NewTag> {
        self.validate()?;

        let sanitized_name = sanitize_inline_text(&self.name);
        if sanitized_name.is_empty() {
            return Err(TagFormError::EmptyName);
        }

        Ok(NewTag::new(sanitized_name))
    }
}

/// JSON body accepted by `PUT /api/tags/{id}`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTagForm {
    /// Replacement name supplied by the client.
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
}

impl UpdateTagForm {
    /// Validates and sanitizes the payload into a domain `UpdateTag`.
    pub fn into_update_tag(self) -> TagFormResult<UpdateTag> {
        self.validate()?;

        let sanitized_name = sanitize_inline_text(&self.name);
        if sanitized_name.is_empty() {
            return Err(TagFormError::EmptyName);
        }

        Ok(UpdateTag::new(sanitized_name))
    }
}
