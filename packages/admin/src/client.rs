use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use crate::error::ApiError;

/// HTTP client for the catalog API.
///
/// The bearer token lives in a shared store so clones of the client see sign-in
/// and sign-out immediately.
#[derive(Clone)]
pub struct ApiClient {
    pub(crate) client: Client,
    base_url: String,
    token_store: Arc<RwLock<Option<String>>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field(
                "has_token",
                &self
                    .token_store
                    .try_read()
                    .map(|t| t.is_some())
                    .unwrap_or(false),
            )
            .finish()
    }
}

impl ApiClient {
    /// `base_url` points at the API root, e.g. `http://127.0.0.1:8000/api`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token_store: Arc::new(RwLock::new(None)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn set_token(&self, token: Option<String>) {
        *self.token_store.write().await = token;
    }

    pub async fn token(&self) -> Option<String> {
        self.token_store.read().await.clone()
    }

    /// Attach the stored bearer token, if any.
    pub async fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.token_store.read().await.as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and decode its JSON body, funnelling every failure into [`ApiError`].
    pub async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        catch_error(request.send().await).await
    }
}

/// Turn a raw send result into the decoded body or an [`ApiError`].
///
/// Error bodies of the form `{"error": "..."}` are passed through verbatim;
/// anything else becomes a message carrying the HTTP status.
pub async fn catch_error<T: DeserializeOwned>(
    result: Result<Response, reqwest::Error>,
) -> Result<T, ApiError> {
    let response = result.map_err(|e| {
        tracing::debug!(error = %e, "Request failed before a response arrived");
        ApiError::from(e)
    })?;

    let status = response.status();
    let body = response.bytes().await?;

    if status.is_success() {
        return serde_json::from_slice(&body)
            .map_err(|e| ApiError::new(format!("Unexpected response body: {e}")));
    }

    match serde_json::from_slice::<ApiError>(&body) {
        Ok(err) => Err(err),
        Err(_) => Err(ApiError::new(format!("Request failed with status {status}"))),
    }
}
