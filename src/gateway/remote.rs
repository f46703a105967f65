//! Remote State Gateway
//!
//! Decodes viewer links into state documents and publishes documents as
//! new share links. The gateway holds no document between calls.

use std::sync::Arc;

use super::input::{bare_query_state, DecodeMode, ViewerInput, JSON_URL_PARAM};
use super::store::StateStore;
use crate::config::GatewayConfig;
use crate::error::Result;
use crate::state::StateDocument;

pub struct RemoteStateGateway {
    store: Arc<dyn StateStore>,
    config: GatewayConfig,
}

impl RemoteStateGateway {
    pub fn new(store: Arc<dyn StateStore>, config: GatewayConfig) -> Self {
        Self { store, config }
    }

    /// Gateway talking HTTP to the configured store.
    #[cfg(feature = "http")]
    pub fn from_config(config: GatewayConfig) -> Result<Self> {
        let store = super::http::HttpStateStore::from_config(&config)?;
        Ok(Self::new(Arc::new(store), config))
    }

    #[cfg(not(feature = "http"))]
    pub fn from_config(_config: GatewayConfig) -> Result<Self> {
        Err(crate::error::GlancerError::StoreUnavailable {
            reason: "HTTP support not compiled. Build with --features http".to_string(),
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Resolve a viewer link (or parsed query) to a state document.
    ///
    /// Only `json_url` links touch the store. The result is validated to
    /// carry a `layers` list whichever way it was obtained.
    pub fn decode(&self, input: impl Into<ViewerInput>) -> Result<StateDocument> {
        let value = match input.into().decode_mode()? {
            DecodeMode::Remote { json_url } => {
                let credential = self.config.require_credential()?;
                self.store.fetch(&json_url, credential)?
            }
            DecodeMode::Inline(state) => state,
            DecodeMode::BareQuery(params) => {
                tracing::debug!(
                    keys = params.len(),
                    "no json_url in link, using query parameters as state"
                );
                bare_query_state(&params)
            }
        };

        StateDocument::from_value(value)
    }

    /// Publish `document` as a new stored state and return its share link.
    ///
    /// Every call creates a new object, even for an unchanged document.
    pub fn encode(&self, document: &StateDocument) -> Result<String> {
        let credential = self.config.require_credential()?;
        let payload = document.to_value()?;

        let pointer = self
            .store
            .publish(&self.config.publish_url(), &payload, credential)?;
        let url = self.share_url(&pointer);

        tracing::info!(url = %url, layers = document.len(), "published viewer state");
        Ok(url)
    }

    /// `<viewer host>/?json_url=<pointer>`
    pub fn share_url(&self, pointer: &str) -> String {
        format!(
            "{}/?{}={}",
            self.config.viewer_url.trim_end_matches('/'),
            JSON_URL_PARAM,
            pointer
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Credential;
    use crate::gateway::MemoryStateStore;
    use serde_json::json;

    fn gateway(store: Arc<MemoryStateStore>) -> RemoteStateGateway {
        let config = GatewayConfig::new()
            .with_state_url("https://store/nglstate")
            .with_viewer_url("https://viewer.example/")
            .with_credential(Credential::new("T"));
        RemoteStateGateway::new(store, config)
    }

    #[test]
    fn test_share_url_format() {
        let gateway = gateway(Arc::new(MemoryStateStore::new()));
        assert_eq!(
            gateway.share_url("https://store/nglstate/9"),
            "https://viewer.example/?json_url=https://store/nglstate/9"
        );
    }

    #[test]
    fn test_decode_without_json_url_makes_no_call() {
        let store = Arc::new(MemoryStateStore::new());
        let gateway = gateway(store.clone());

        let err = gateway
            .decode("https://viewer.example/?layout=xy")
            .unwrap_err();
        assert_eq!(err.error_code(), "SCHEMA_ERROR");
        assert_eq!(store.call_count(), 0);
    }

    #[test]
    fn test_encode_requires_credential() {
        let store = Arc::new(MemoryStateStore::new());
        let gateway = RemoteStateGateway::new(store.clone(), GatewayConfig::new());

        let err = gateway.encode(&StateDocument::empty()).unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
        assert_eq!(store.call_count(), 0);
    }

    #[test]
    fn test_decode_inline_fragment() {
        let gateway = gateway(Arc::new(MemoryStateStore::new()));
        let state = json!({"layers": [{"type": "image", "name": "em", "source": "precomputed://em"}]});
        let url = format!(
            "https://viewer.example/#!{}",
            urlencoding::encode(&state.to_string())
        );

        let document = gateway.decode(url).unwrap();
        assert_eq!(document.layer_names(), vec!["em"]);
    }
}
