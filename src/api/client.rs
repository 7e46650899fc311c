//! Generic dispatch over the endpoint table.

use std::time::Duration;

use serde_json::Value;

use super::endpoint::{AuthMode, Operation, Service, render_path};
use super::error::ApiError;
use super::request::{ApiRequest, Credential, Params};
use super::transport::{ReqwestTransport, Transport};
use crate::config::{AdminConfig, AuctionApiConfig, FishonApiConfig};
use crate::session::Session;

/// Client for both backends, sharing one [`Session`].
pub struct ApiClient<T = ReqwestTransport> {
    auction: AuctionApiConfig,
    fishon: FishonApiConfig,
    session: Session,
    transport: T,
}

impl ApiClient<ReqwestTransport> {
    /// Build a client that talks HTTP via `reqwest`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn from_config(config: &AdminConfig, session: Session) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(config.request_timeout_secs.map(Duration::from_secs))?;
        Ok(Self::new(config, session, transport))
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn new(config: &AdminConfig, session: Session, transport: T) -> Self {
        Self { auction: config.auction.clone(), fishon: config.fishon.clone(), session, transport }
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn base_url(&self, service: Service) -> &str {
        match service {
            Service::Auction => &self.auction.base_url,
            Service::Fishon => &self.fishon.base_url,
        }
    }

    fn credential(&self, auth: AuthMode) -> Result<Option<Credential>, ApiError> {
        match auth {
            AuthMode::ServiceToken => {
                if self.auction.token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(Credential::Bearer(self.auction.token.clone())))
                }
            }
            // Re-read on every call so a token swapped between calls is honored.
            AuthMode::Session => {
                let token = self.session.get().ok_or(ApiError::MissingToken)?;
                Ok(Some(Credential::Bearer(token)))
            }
            AuthMode::ClientCredentials => {
                let client = self
                    .fishon
                    .client
                    .as_ref()
                    .ok_or(ApiError::MissingClientCredentials)?;
                Ok(Some(Credential::Basic {
                    username: client.client_id.clone(),
                    password: client.client_secret.clone(),
                }))
            }
        }
    }

    /// Bind `params` to the endpoint row of `operation` without sending it.
    ///
    /// # Errors
    ///
    /// Returns an error if a path parameter is missing or the required
    /// credential is not available locally.
    pub fn prepare(&self, operation: Operation, params: Params) -> Result<ApiRequest, ApiError> {
        let endpoint = operation.endpoint();
        let path = render_path(operation, endpoint.path, &params.path)?;
        let credential = self.credential(endpoint.auth)?;
        let url = format!("{}{}", self.base_url(endpoint.service), path);

        Ok(ApiRequest {
            operation,
            service: endpoint.service,
            method: endpoint.method,
            url,
            path,
            query: params.query,
            body: params.body,
            credential,
        })
    }

    /// Send `operation` and return the backend's raw body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be prepared, never gets a
    /// response, or gets a non-2xx status.
    pub async fn dispatch(&self, operation: Operation, params: Params) -> Result<Value, ApiError> {
        let request = self.prepare(operation, params)?;
        tracing::debug!(%operation, method = %request.method, path = %request.path, "api request");

        let response = self.transport.send(&request).await?;
        if !response.is_success() {
            tracing::debug!(%operation, status = response.status, "api request rejected");
            return Err(ApiError::Status { operation: operation.name(), status: response.status, body: response.body });
        }

        Ok(response.body)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
