//! HTTP transport to the prediction provider.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::debug;

use crate::document::EncodedDocument;
use crate::error::{CardexError, Result};
use crate::models::config::ClientConfig;

/// Request seam between the client and the provider.
///
/// Paths are relative to the configured product base URL
/// (`predict`, `predict_async`, `documents/queue/{id}`).
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST a document as a single-part multipart form and return the JSON body.
    async fn post_document(&self, path: &str, document: &EncodedDocument) -> Result<Value>;

    /// GET a JSON resource.
    async fn get_json(&self, path: &str) -> Result<Value>;
}

/// reqwest-backed transport.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    file_name: String,
}

impl HttpTransport {
    /// Build a transport from client configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&config.authorization())
            .map_err(|_| CardexError::Config("API key is not a valid header value".to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            file_name: config.file_name.clone(),
        })
    }

    /// Absolute URL for a relative endpoint path.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_document(&self, path: &str, document: &EncodedDocument) -> Result<Value> {
        let url = self.url(path);
        debug!("POST {} ({} bytes)", url, document.len());

        let form = document.to_form(&self.file_name)?;
        let response = self.client.post(&url).multipart(form).send().await?;
        read_json(response).await
    }

    async fn get_json(&self, path: &str) -> Result<Value> {
        let url = self.url(path);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        read_json(response).await
    }
}

async fn read_json(response: Response) -> Result<Value> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<body unavailable>".to_string());
        debug!("provider returned {}: {}", status, body);
        return Err(CardexError::Provider {
            status: status.as_u16(),
            message: status.canonical_reason().unwrap_or("Unknown").to_string(),
        });
    }
    Ok(response.json().await?)
}
