use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::host::{HostError, HttpClient, HttpRequest, HttpResponse};

#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestHttpClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, HostError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(HostError::InvalidRequest(format!(
                "backend url must be http(s): {base_url}"
            )));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| HostError::InvalidRequest(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, HostError> {
        let url = self.url_for(&request.path);
        debug!(url = %url, query = ?request.query, "issuing GET");

        let response = self
            .client
            .get(&url)
            .query(&request.query)
            .headers(request.headers)
            .send()
            .await
            .map_err(|e| HostError::Transport {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| HostError::Transport {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::net::SocketAddr;

    use axum::{
        extract::Query,
        http::{HeaderMap, StatusCode},
        routing::get,
        Json, Router,
    };
    use serde_json::{json, Value};

    use super::ReqwestHttpClient;
    use crate::host::{HostError, HttpClient, HttpRequest};

    async fn echo(headers: HeaderMap, Query(query): Query<HashMap<String, String>>) -> Json<Value> {
        let token = headers
            .get("x-csrftoken")
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        Json(json!({ "token": token, "query": query }))
    }

    async fn spawn_backend() -> SocketAddr {
        let app = Router::new()
            .route("/echo/", get(echo))
            .route("/broken/", get(|| async { StatusCode::BAD_GATEWAY }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });
        addr
    }

    #[tokio::test]
    async fn forwards_query_and_headers() {
        let addr = spawn_backend().await;
        let client = ReqwestHttpClient::new(&format!("http://{addr}/"), None).expect("client");

        let mut request = HttpRequest::get("/echo/").with_query("is_active", "true");
        request
            .headers
            .insert("x-csrftoken", "abc123".parse().expect("header"));

        let response = client.get(request).await.expect("response");
        assert!(response.status.is_success());

        let body: Value = serde_json::from_slice(&response.body).expect("json");
        assert_eq!(body["token"], "abc123");
        assert_eq!(body["query"]["is_active"], "true");
    }

    #[tokio::test]
    async fn non_success_status_is_returned_not_raised() {
        let addr = spawn_backend().await;
        let client = ReqwestHttpClient::new(&format!("http://{addr}"), None).expect("client");

        let response = client
            .get(HttpRequest::get("broken/"))
            .await
            .expect("response");
        assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn rejects_non_http_base_url() {
        let err = ReqwestHttpClient::new("ftp://example.org", None).expect_err("scheme");
        assert!(matches!(err, HostError::InvalidRequest(_)));
    }
}
