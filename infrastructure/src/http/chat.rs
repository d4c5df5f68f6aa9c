//! Streaming chat gateway over HTTP
//!
//! `POST {base}/chat` with `{"message": ...}`. The backend answers with raw
//! UTF-8 text frames (labelled `text/event-stream`, but not SSE-framed), so
//! the body is handed over as plain bytes.

use super::endpoint;
use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use grocery_application::{ByteStream, ChatGateway, TransportError};
use reqwest::StatusCode;
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

/// [`ChatGateway`] backed by the grocery backend's `/chat` endpoint.
pub struct HttpChatGateway {
    client: reqwest::Client,
    url: String,
}

impl HttpChatGateway {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            url: endpoint(base_url, "/chat"),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ChatGateway for HttpChatGateway {
    async fn open_reply(&self, message: &str) -> Result<ByteStream, TransportError> {
        debug!("POST {}", self.url);
        let response = self
            .client
            .post(&self.url)
            .json(&ChatRequest { message })
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Chat request failed with status {}", status.as_u16());
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        // These statuses carry no body by definition
        if matches!(status, StatusCode::NO_CONTENT | StatusCode::RESET_CONTENT) {
            return Err(TransportError::MissingBody);
        }

        Ok(response
            .bytes_stream()
            .map_err(|e| TransportError::Network(e.to_string()))
            .boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grocery_application::{ChatConfig, ChatError, ChatUseCase};
    use crate::http::build_client;
    use grocery_domain::StreamContentError;
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway(server: &MockServer) -> HttpChatGateway {
        HttpChatGateway::new(reqwest::Client::new(), &server.uri())
    }

    #[tokio::test]
    async fn test_posts_message_and_streams_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(body_json(serde_json::json!({ "message": "milk" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string("Sure, I'll add milk."),
            )
            .expect(1)
            .mount(&server)
            .await;

        let chat = ChatUseCase::new(Arc::new(gateway(&server)), ChatConfig::default());
        let mut text = String::new();
        chat.chat("milk", |f| text.push_str(f)).await.unwrap();

        assert_eq!(text, "Sure, I'll add milk.");
    }

    #[tokio::test]
    async fn test_non_success_status_carries_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .mount(&server)
            .await;

        let result = gateway(&server).open_reply("milk").await;

        match result {
            Err(error) => {
                assert_eq!(
                    error,
                    TransportError::Status {
                        status: 500,
                        body: "internal error".to_string()
                    }
                );
                assert_eq!(
                    error.to_string(),
                    "Chat request failed: 500 - internal error"
                );
            }
            Ok(_) => panic!("expected status error"),
        }
    }

    #[tokio::test]
    async fn test_no_content_is_missing_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let result = gateway(&server).open_reply("milk").await;
        assert!(matches!(result, Err(TransportError::MissingBody)));
    }

    #[tokio::test]
    async fn test_in_band_error_marker() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Error: rate limited\n\n"))
            .mount(&server)
            .await;

        let chat = ChatUseCase::new(Arc::new(gateway(&server)), ChatConfig::default());
        let err = chat.chat("milk", |_| {}).await.unwrap_err();

        assert_eq!(
            err,
            ChatError::Content(StreamContentError::new("rate limited"))
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        let closed = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let gateway = HttpChatGateway::new(reqwest::Client::new(), &format!("http://{closed}"));

        let result = gateway.open_reply("milk").await;
        assert!(matches!(result, Err(TransportError::Network(_))));
    }

    #[tokio::test]
    async fn test_live_stream_outlasts_timeout() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = vec![0u8; 4096];
            let _ = socket.read(&mut request).await;
            socket
                .write_all(
                    b"HTTP/1.1 200 OK\r\ncontent-type: text/event-stream\r\ntransfer-encoding: chunked\r\n\r\n",
                )
                .await
                .unwrap();
            for fragment in ["Sure", ", I'll", " add milk."] {
                tokio::time::sleep(Duration::from_millis(200)).await;
                let frame = format!("{:x}\r\n{}\r\n", fragment.len(), fragment);
                socket.write_all(frame.as_bytes()).await.unwrap();
            }
            socket.write_all(b"0\r\n\r\n").await.unwrap();
        });

        // Whole reply takes ~600ms; no single gap reaches the timeout
        let client = build_client(Some(Duration::from_millis(400))).unwrap();
        let gateway = HttpChatGateway::new(client, &format!("http://{addr}"));
        let chat = ChatUseCase::new(Arc::new(gateway), ChatConfig::default());

        let mut text = String::new();
        chat.chat("milk", |f| text.push_str(f)).await.unwrap();
        assert_eq!(text, "Sure, I'll add milk.");
    }
}
