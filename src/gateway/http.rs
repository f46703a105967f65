//! HTTP state store
//!
//! Talks to the remote JSON store with blocking requests. No retries; a
//! non-success status is returned to the caller as is.

use serde_json::Value;

use super::store::{pointer_from_body, StateStore};
use crate::config::{Credential, GatewayConfig};
use crate::error::{GlancerError, Result};

/// State store reached over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpStateStore {
    client: reqwest::blocking::Client,
}

impl HttpStateStore {
    /// Build a client honouring the configured timeout.
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| GlancerError::StoreUnavailable {
            reason: format!("cannot build HTTP client: {}", e),
        })?;
        Ok(Self { client })
    }

    fn transport_error(url: &str, e: reqwest::Error) -> GlancerError {
        let message = if e.is_timeout() {
            format!("request timed out: {}", e)
        } else if e.is_connect() {
            format!("cannot connect: {}", e)
        } else {
            e.to_string()
        };
        GlancerError::Transport {
            url: url.to_string(),
            message,
        }
    }
}

impl StateStore for HttpStateStore {
    fn fetch(&self, json_url: &str, credential: &Credential) -> Result<Value> {
        tracing::debug!(url = json_url, "fetching viewer state");

        let response = self
            .client
            .get(json_url)
            .bearer_auth(credential.token())
            .send()
            .map_err(|e| Self::transport_error(json_url, e))?;

        if !response.status().is_success() {
            return Err(GlancerError::FetchFailed {
                url: json_url.to_string(),
                status: response.status().as_u16(),
            });
        }

        response
            .json::<Value>()
            .map_err(|e| Self::transport_error(json_url, e))
    }

    fn publish(
        &self,
        publish_url: &str,
        payload: &Value,
        credential: &Credential,
    ) -> Result<String> {
        tracing::debug!(url = publish_url, "publishing viewer state");

        let response = self
            .client
            .post(publish_url)
            .bearer_auth(credential.token())
            .json(payload)
            .send()
            .map_err(|e| Self::transport_error(publish_url, e))?;

        if !response.status().is_success() {
            return Err(GlancerError::PublishFailed {
                url: publish_url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = response
            .json::<Value>()
            .map_err(|e| Self::transport_error(publish_url, e))?;
        pointer_from_body(&body)
    }
}
