//! Grocery list entities
//!
//! The list itself lives in the backend; these types mirror its wire shape.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Maximum description length accepted by the backend.
pub const MAX_DESCRIPTION_LEN: usize = 255;

/// An item on the grocery list (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroceryItem {
    pub id: i64,
    pub description: String,
    #[serde(default)]
    pub checked: bool,
}

/// A validated item to be created
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewGroceryItem {
    description: String,
    checked: bool,
}

impl NewGroceryItem {
    pub fn new(description: &str) -> Result<Self, DomainError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(DomainError::EmptyDescription);
        }
        let length = description.chars().count();
        if length > MAX_DESCRIPTION_LEN {
            return Err(DomainError::DescriptionTooLong {
                length,
                max: MAX_DESCRIPTION_LEN,
            });
        }
        Ok(Self {
            description: description.to_string(),
            checked: false,
        })
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn checked(&self) -> bool {
        self.checked
    }
}

/// Count of checked items, for list summaries.
pub fn checked_count(items: &[GroceryItem]) -> usize {
    items.iter().filter(|i| i.checked).count()
}
