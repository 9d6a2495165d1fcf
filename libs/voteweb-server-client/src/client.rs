use std::{future::Future, time::Duration};

use reqwest::Url;
use serde::{de::DeserializeOwned, Serialize};
use types_rs::voteweb::{
    ErrorResponse, IntegrityRequest, IntegrityResponse, PresenceRequest, PresenceResponse,
};

use crate::result::{Error, Result};

pub const CONTROL_INTEGRITY_PATH: &str = "/ballot-papers/control-integrity";
pub const CONTROL_PRESENCE_PATH: &str = "/ballot-papers/control-presence";

/// The two control endpoints of an election site.
pub trait ControlServer {
    /// Ask the server for the data needed to display a decrypted ballot.
    fn control_integrity(
        &self,
        request: &IntegrityRequest,
    ) -> impl Future<Output = Result<IntegrityResponse>> + Send;

    /// Ask the server for the encrypted ballot stored in the ballot box.
    fn control_presence(
        &self,
        request: &PresenceRequest,
    ) -> impl Future<Output = Result<PresenceResponse>> + Send;
}

/// A client for an election site's control endpoints.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
    timeout: Duration,
}

impl Client {
    /// Create a new client with the given base URL. Every request is abandoned
    /// once `timeout` has elapsed.
    ///
    /// # Example
    ///
    /// ```
    /// # use std::time::Duration;
    /// # use voteweb_server_client::Client;
    /// let base_url = "http://localhost:8000".parse().unwrap();
    /// let client = Client::new(base_url, Duration::from_secs(60)).unwrap();
    /// ```
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url,
            http,
            timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn control_integrity(&self, request: &IntegrityRequest) -> Result<IntegrityResponse> {
        self.post_json(CONTROL_INTEGRITY_PATH, request).await
    }

    pub async fn control_presence(&self, request: &PresenceRequest) -> Result<PresenceResponse> {
        self.post_json(CONTROL_PRESENCE_PATH, request).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T> {
        let url = self.base_url.join(path)?;
        tracing::debug!(%url, "sending control request");

        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let status_code = response.status();
        let text = response.text().await.map_err(|e| self.transport_error(e))?;
        tracing::debug!(%status_code, length = text.len(), "received control response");

        if !status_code.is_success() {
            return Err(match serde_json::from_str::<ErrorResponse>(&text) {
                Ok(ErrorResponse { error }) => Error::Server {
                    status_code,
                    message: error,
                },
                Err(e) => Error::MalformedResponse {
                    status_code,
                    source: Some(e),
                },
            });
        }

        serde_json::from_str(&text).map_err(|e| Error::MalformedResponse {
            status_code,
            source: Some(e),
        })
    }

    fn transport_error(&self, error: reqwest::Error) -> Error {
        if error.is_timeout() {
            Error::Timeout(self.timeout)
        } else {
            Error::Reqwest(error)
        }
    }
}

impl ControlServer for Client {
    fn control_integrity(
        &self,
        request: &IntegrityRequest,
    ) -> impl Future<Output = Result<IntegrityResponse>> + Send {
        Self::control_integrity(self, request)
    }

    fn control_presence(
        &self,
        request: &PresenceRequest,
    ) -> impl Future<Output = Result<PresenceResponse>> + Send {
        Self::control_presence(self, request)
    }
}
