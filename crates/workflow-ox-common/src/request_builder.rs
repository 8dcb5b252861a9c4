use crate::error::{self, CommonRequestError};
use reqwest::{Method, RequestBuilder as ReqwestRequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// HTTP method for workflow service endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
        }
    }
}

/// Authentication method for service requests
#[derive(Clone)]
pub enum AuthMethod {
    /// Bearer token authentication (Authorization: Bearer <token>)
    Bearer(String),
}

impl std::fmt::Debug for AuthMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthMethod::Bearer(_) => f.debug_tuple("Bearer").field(&"[REDACTED]").finish(),
        }
    }
}

/// Represents a service endpoint relative to the configured base URL
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub path: String,
    pub method: HttpMethod,
}

impl Endpoint {
    pub fn new(path: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            path: path.into(),
            method,
        }
    }
}

/// Configuration for request building
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub base_url: String,
    pub auth: Option<AuthMethod>,
    pub default_headers: HashMap<String, String>,
}

impl RequestConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth: None,
            default_headers: HashMap::new(),
        }
    }

    /// Attach authentication only when a value is present.
    #[must_use]
    pub fn with_optional_auth(mut self, auth: Option<AuthMethod>) -> Self {
        self.auth = auth;
        self
    }

    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }
}

/// Generic request builder that handles the request/response cycle against the workflow service
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    client: reqwest::Client,
    config: RequestConfig,
}

impl RequestBuilder {
    pub fn new(client: reqwest::Client, config: RequestConfig) -> Self {
        Self { client, config }
    }

    /// Absolute URL for an endpoint, joined with exactly one slash
    pub fn url(&self, endpoint: &Endpoint) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint.path.trim_start_matches('/')
        )
    }

    /// Build a reqwest `RequestBuilder` for the given endpoint
    ///
    /// # Errors
    /// Returns [`CommonRequestError::RequestBuilder`] when no base URL is configured.
    pub fn build_request(
        &self,
        endpoint: &Endpoint,
    ) -> Result<ReqwestRequestBuilder, CommonRequestError> {
        if self.config.base_url.trim().is_empty() {
            return Err(CommonRequestError::RequestBuilder(
                "base URL is empty".to_string(),
            ));
        }

        let url = self.url(endpoint);
        let mut req = self.client.request(endpoint.method.into(), &url);

        if let Some(ref auth) = self.config.auth {
            req = match auth {
                AuthMethod::Bearer(token) => req.bearer_auth(token),
            };
        }

        for (key, value) in &self.config.default_headers {
            req = req.header(key, value);
        }

        Ok(req)
    }

    /// Execute a request with a JSON body and return the deserialized response
    ///
    /// # Errors
    /// Fails on serialization, transport, non-success status or an undecodable body.
    pub async fn request_json<T: for<'de> Deserialize<'de>, B: Serialize>(
        &self,
        endpoint: &Endpoint,
        body: Option<&B>,
    ) -> Result<T, CommonRequestError> {
        let mut req = self.build_request(endpoint)?;

        if let Some(body) = body {
            // Normalize to a Value so the logged payload is exactly what goes on the wire
            let val =
                serde_json::to_value(body).map_err(|e| CommonRequestError::Json(e.to_string()))?;
            log::trace!(
                "{:?} {} payload: {}",
                endpoint.method,
                endpoint.path,
                val
            );
            req = req.json(&val);
        }

        let res = req.send().await?;
        self.handle_response(res).await
    }

    /// Execute a request without body and return the deserialized response
    ///
    /// # Errors
    /// Fails on transport, non-success status or an undecodable body.
    pub async fn request<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &Endpoint,
    ) -> Result<T, CommonRequestError> {
        let req = self.build_request(endpoint)?;
        let res = req.send().await?;
        self.handle_response(res).await
    }

    /// Handle response and parse errors
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        res: Response,
    ) -> Result<T, CommonRequestError> {
        let status = res.status();
        let bytes = res.bytes().await?;

        if status.is_success() {
            serde_json::from_slice::<T>(&bytes).map_err(|e| {
                let body_str = String::from_utf8_lossy(&bytes);
                CommonRequestError::UnexpectedResponse(format!(
                    "HTTP {} but failed to decode JSON: {}; body: {}",
                    status.as_u16(),
                    e,
                    body_str
                ))
            })
        } else {
            log::debug!("{} returned HTTP {}", self.config.base_url, status.as_u16());
            Err(error::parse_error_response(status, &bytes))
        }
    }
}
