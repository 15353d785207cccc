use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Domain representation of a reusable tag attached to products.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    /// Unique identifier of the tag.
    pub id: i32,
    /// Human-readable name of the tag.
    pub name: String,
    /// Timestamp for when the tag record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the tag record.
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTag {
    /// Human-readable name of the tag.
    pub name: String,
}

impl NewTag {
    /// Construct a new tag payload with a trimmed name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into().trim().to_string();
        Self { name }
    }
}

/// Patch data applied when updating an existing tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTag {
    /// Updated human-readable name of the tag.
    pub name: String,
    /// Timestamp captured when the patch was created.
    pub updated_at: NaiveDateTime,
}

impl UpdateTag {
    /// Build a tag update payload with the supplied name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            updated_at: chrono::Local::now().naive_utc(),
        }
    }
}
