use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Domain representation of a product category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique identifier of the category.
    pub id: i32,
    /// Human-readable name of the category.
    pub name: String,
    /// Timestamp for when the category record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the category record.
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    /// Human-readable name of the category.
    pub name: String,
}

impl NewCategory {
    /// Construct a new category payload with a trimmed name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into().trim().to_string();
        Self { name }
    }
}

/// Patch data applied when updating an existing category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCategory {
    /// Updated human-readable name of the category.
    pub name: String,
    /// Timestamp captured when the patch was created.
    pub updated_at: NaiveDateTime,
}

impl UpdateCategory {
    /// Build a category update payload with the supplied name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            updated_at: chrono::Local::now().naive_utc(),
        }
    }
}
