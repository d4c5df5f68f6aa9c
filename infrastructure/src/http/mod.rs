//! HTTP adapters for the grocery backend
//!
//! Both adapters share one [`reqwest::Client`] built by [`build_client`].

mod chat;
mod grocery;

pub use chat::HttpChatGateway;
pub use grocery::HttpGroceryList;

use std::time::Duration;

const USER_AGENT: &str = concat!("grocery-chat/", env!("CARGO_PKG_VERSION"));

/// Build the shared HTTP client.
///
/// `timeout` bounds connecting and each wait for the next read. A reply
/// that keeps streaming is never cut off, however long it runs.
pub fn build_client(timeout: Option<Duration>) -> reqwest::Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
    if let Some(timeout) = timeout {
        builder = builder.connect_timeout(timeout).read_timeout(timeout);
    }
    builder.build()
}

/// Join a base URL and an absolute path without doubling slashes.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}
