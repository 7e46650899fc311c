//! Request execution.
//!
//! [`ReqwestTransport`] talks HTTP. Unit tests swap in a scripted fake that
//! replays canned responses and records what it was asked to send.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde_json::Value;

use super::error::ApiError;
use super::request::{ApiRequest, Body, Credential};

/// Raw backend answer: status plus body.
///
/// JSON bodies are parsed; an empty body is `Null` and a non-JSON body is
/// kept verbatim as a JSON string.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    #[must_use]
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes one bound request.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] when no response was received. A
    /// non-2xx response is NOT an error at this layer.
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError>;
}

#[async_trait::async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        (**self).send(request).await
    }
}

// =============================================================================
// REQWEST
// =============================================================================

pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(request_timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http })
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let operation = request.operation.name();
        let mut builder = self
            .http
            .request(request.method.clone(), &request.url)
            .header(ACCEPT, "application/json");

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        builder = match &request.credential {
            Some(Credential::Bearer(token)) => builder.header(AUTHORIZATION, format!("Bearer {token}")),
            Some(Credential::Basic { username, password }) => builder.basic_auth(username, Some(password)),
            None => builder,
        };

        builder = match &request.body {
            Body::Empty => builder,
            Body::Form(pairs) => builder.form(pairs),
            Body::Json(value) => builder.json(value),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport { operation, message: e.to_string() })?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Transport { operation, message: e.to_string() })?;

        Ok(ApiResponse { status, body: parse_body(&text) })
    }
}

pub(crate) fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_owned()))
}

#[cfg(test)]
#[path = "scripted_test.rs"]
mod scripted;
#[cfg(test)]
pub(crate) use scripted::ScriptedTransport;

#[cfg(test)]
#[path = "transport_test.rs"]
mod tests;
