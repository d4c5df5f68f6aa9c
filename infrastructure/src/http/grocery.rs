//! Grocery list CRUD client

use super::endpoint;
use async_trait::async_trait;
use grocery_application::{GroceryListError, GroceryListPort};
use grocery_domain::{GroceryItem, NewGroceryItem};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

/// The backend answers a missing id with 200 and this message.
const NOT_FOUND_MESSAGE: &str = "Item not found";

#[derive(Deserialize)]
struct MessageBody {
    message: String,
}

/// [`GroceryListPort`] backed by the `/items` and `/health` endpoints.
pub struct HttpGroceryList {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGroceryList {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        endpoint(&self.base_url, path)
    }

    /// Read the body as text, mapping non-success statuses and "not found"
    /// messages to errors.
    async fn read(response: Response, id: Option<i64>) -> Result<String, GroceryListError> {
        let status = response.status();
        let body = response.text().await.map_err(network)?;

        if let Some(id) = id {
            if status == StatusCode::NOT_FOUND {
                return Err(GroceryListError::NotFound(id));
            }
            if let Ok(message) = serde_json::from_str::<MessageBody>(&body)
                && message.message == NOT_FOUND_MESSAGE
            {
                return Err(GroceryListError::NotFound(id));
            }
        }

        if !status.is_success() {
            return Err(GroceryListError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    async fn read_json<T: DeserializeOwned>(
        response: Response,
        id: Option<i64>,
    ) -> Result<T, GroceryListError> {
        let body = Self::read(response, id).await?;
        serde_json::from_str(&body).map_err(|e| GroceryListError::Decode(e.to_string()))
    }
}

fn network(e: reqwest::Error) -> GroceryListError {
    GroceryListError::Network(e.to_string())
}

#[async_trait]
impl GroceryListPort for HttpGroceryList {
    async fn list(&self) -> Result<Vec<GroceryItem>, GroceryListError> {
        let response = self
            .client
            .get(self.url("/items"))
            .send()
            .await
            .map_err(network)?;
        let items: Vec<GroceryItem> = Self::read_json(response, None).await?;
        debug!("Fetched {} grocery items", items.len());
        Ok(items)
    }

    async fn add(&self, item: &NewGroceryItem) -> Result<GroceryItem, GroceryListError> {
        let response = self
            .client
            .post(self.url("/items"))
            .json(item)
            .send()
            .await
            .map_err(network)?;
        Self::read_json(response, None).await
    }

    async fn delete(&self, id: i64) -> Result<(), GroceryListError> {
        let response = self
            .client
            .delete(self.url(&format!("/items/{id}")))
            .send()
            .await
            .map_err(network)?;
        Self::read(response, Some(id)).await.map(|_| ())
    }

    async fn set_checked(&self, id: i64, checked: bool) -> Result<GroceryItem, GroceryListError> {
        let response = self
            .client
            .patch(self.url(&format!("/items/{id}/checked")))
            .json(&json!({ "checked": checked }))
            .send()
            .await
            .map_err(network)?;
        Self::read_json(response, Some(id)).await
    }

    async fn health(&self) -> Result<String, GroceryListError> {
        let response = self
            .client
            .get(self.url("/health"))
            .send()
            .await
            .map_err(network)?;
        let body: MessageBody = Self::read_json(response, None).await?;
        Ok(body.message)
    }
}
