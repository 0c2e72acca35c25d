use crate::error::PageError;
use async_trait::async_trait;
use serde_json::Value;

/// Anything that can answer a gateway endpoint with a JSON document.
#[async_trait]
pub trait JsonSource: Send + Sync {
    /// `endpoint` is relative (`"anime/abc"`, `"search?q=one%20piece"`) and
    /// already encoded by the caller.
    async fn fetch_json(&self, endpoint: &str) -> Result<Value, PageError>;
}

/// Single-attempt client for the `/api/otakudesu/<resource>` gateway.
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: String,
}

impl GatewayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("nontonanime/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }
}

#[async_trait]
impl JsonSource for GatewayClient {
    async fn fetch_json(&self, endpoint: &str) -> Result<Value, PageError> {
        let url = self.endpoint_url(endpoint);
        log::debug!("Gateway request: {}", url);

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                log::error!("Gateway request failed: {} ({})", url, e);
                PageError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("Gateway returned {} for {}", status, url);
            return Err(PageError::Gateway {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| PageError::Network(format!("Failed to read response body: {}", e)))?;

        serde_json::from_str(&body).map_err(|e| {
            log::warn!("Gateway body for {} is not JSON: {}", url, e);
            PageError::Shape(format!("Failed to parse gateway response: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Json, Router};
    use serde_json::json;

    async fn spawn_gateway() -> String {
        let app = Router::new()
            .route(
                "/api/otakudesu/ongoing",
                get(|| async { Json(json!({ "ok": true, "data": { "animeList": [] } })) }),
            )
            .route(
                "/api/otakudesu/broken",
                get(|| async {
                    (
                        StatusCode::BAD_GATEWAY,
                        Json(json!({ "error": "API eksternal gagal" })),
                    )
                }),
            )
            .route("/api/otakudesu/html", get(|| async { "<html></html>" }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/api/otakudesu/", addr)
    }

    #[test]
    fn test_endpoint_url_joins_cleanly() {
        let client = GatewayClient::new("http://gw/api/otakudesu/");
        assert_eq!(
            client.endpoint_url("/search?q=one%20piece"),
            "http://gw/api/otakudesu/search?q=one%20piece"
        );
        assert_eq!(client.endpoint_url("home"), "http://gw/api/otakudesu/home");
    }

    #[tokio::test]
    async fn test_success_returns_body_as_is() {
        let client = GatewayClient::new(spawn_gateway().await);
        let body = client.fetch_json("ongoing?page=1").await.unwrap();
        assert_eq!(body["ok"], json!(true));
        assert!(body["data"]["animeList"].is_array());
    }

    #[tokio::test]
    async fn test_non_success_status_is_gateway_error() {
        let client = GatewayClient::new(spawn_gateway().await);
        let err = client.fetch_json("broken").await.unwrap_err();
        assert_eq!(err, PageError::Gateway { status: 502 });
    }

    #[tokio::test]
    async fn test_non_json_body_is_shape_error() {
        let client = GatewayClient::new(spawn_gateway().await);
        let err = client.fetch_json("html").await.unwrap_err();
        assert!(err.is_shape());
    }

    #[tokio::test]
    async fn test_unreachable_gateway_is_network_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = GatewayClient::new(format!("http://{}/api/otakudesu", addr));
        let err = client.fetch_json("home").await.unwrap_err();
        assert!(matches!(err, PageError::Network(_)));
    }
}
