//! HTTP client for the REST collaborators

use std::time::Duration;

use crate::{ClientConfig, ClientError, ClientResult};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Thin reqwest wrapper: base URL, bearer token and status mapping
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a path relative to the base
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Start a request with the authorization header applied
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.client.request(method, self.url(path));
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.request(Method::GET, path).send().await?;
        Self::handle_response(response).await
    }

    /// GET that maps 404 to `None`
    pub async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> ClientResult<Option<T>> {
        let response = self.request(Method::GET, path).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::handle_response(response).await.map(Some)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self.request(Method::POST, path).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Make a PATCH request with JSON body, ignoring the response body
    pub async fn patch<B: Serialize>(&self, path: &str, body: &B) -> ClientResult<()> {
        let response = self.request(Method::PATCH, path).json(body).send().await?;
        Self::check_status(response).await.map(|_| ())
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        let response = self.request(Method::DELETE, path).send().await?;
        Self::check_status(response).await.map(|_| ())
    }

    /// Fail on non-success statuses, passing successful responses through
    pub async fn check_status(response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await?;
        Err(status_error(status, text))
    }

    /// Handle the HTTP response
    pub async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> ClientResult<T> {
        let response = Self::check_status(response).await?;
        response.json().await.map_err(Into::into)
    }
}

/// Map a failed status and its body to a [`ClientError`]
pub fn status_error(status: StatusCode, text: String) -> ClientError {
    match status {
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
        StatusCode::FORBIDDEN => ClientError::Forbidden(text),
        StatusCode::NOT_FOUND => ClientError::NotFound(text),
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            ClientError::Validation(text)
        }
        StatusCode::TOO_MANY_REQUESTS => ClientError::RateLimited(text),
        _ => ClientError::Internal(format!("{}: {}", status, text)),
    }
}
