//! Grocery list port
//!
//! Opaque CRUD access to the list backend. The conversation never calls
//! this directly; the presentation layer refreshes the list when an exchange
//! completes.

use async_trait::async_trait;
use grocery_domain::{GroceryItem, NewGroceryItem};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GroceryListError {
    #[error("List request failed: {status} - {body}")]
    Status { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Item not found: {0}")]
    NotFound(i64),
}

#[async_trait]
pub trait GroceryListPort: Send + Sync {
    /// All items in backend order.
    async fn list(&self) -> Result<Vec<GroceryItem>, GroceryListError>;

    /// Create an item and return it with its assigned id.
    async fn add(&self, item: &NewGroceryItem) -> Result<GroceryItem, GroceryListError>;

    async fn delete(&self, id: i64) -> Result<(), GroceryListError>;

    async fn set_checked(&self, id: i64, checked: bool) -> Result<GroceryItem, GroceryListError>;

    /// Backend liveness message.
    async fn health(&self) -> Result<String, GroceryListError>;
}
