//! Gateway configuration
//!
//! Where the state store and viewer live, which bearer token to send and
//! how long to wait on the network. Values come from code, the environment,
//! or a secret file; nothing is looked up implicitly at request time.

use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{GlancerError, Result};

pub const DEFAULT_STATE_URL: &str = "https://globalv1.flywire-daf.com/nglstate";
pub const DEFAULT_VIEWER_URL: &str = "https://ngl.flywire.ai";

pub const ENV_STATE_URL: &str = "FLYGLANCE_STATE_URL";
pub const ENV_VIEWER_URL: &str = "FLYGLANCE_VIEWER_URL";
pub const ENV_TOKEN: &str = "FLYGLANCE_TOKEN";
pub const ENV_TIMEOUT_MS: &str = "FLYGLANCE_TIMEOUT_MS";

/// Bearer token for the state store. `Debug` never prints the token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

#[derive(Deserialize)]
struct SecretFile {
    token: String,
}

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Read a `{"token": "..."}` secret file.
    pub fn from_secret_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| GlancerError::Config {
            reason: format!("cannot read secret file {}: {}", path.display(), e),
        })?;
        let secret: SecretFile = serde_json::from_str(&content).map_err(|e| GlancerError::Config {
            reason: format!("secret file {} has no token: {}", path.display(), e),
        })?;

        if secret.token.trim().is_empty() {
            return Err(GlancerError::Config {
                reason: format!("secret file {} has an empty token", path.display()),
            });
        }
        Ok(Self(secret.token))
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Settings for the remote state gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayConfig {
    /// Base URL of the JSON state store; publishing posts to `<state_url>/post`.
    pub state_url: String,
    /// Viewer host that share links point at.
    pub viewer_url: String,
    pub credential: Option<Credential>,
    /// Per-request timeout. `None` keeps the HTTP client's default.
    pub timeout: Option<Duration>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            state_url: DEFAULT_STATE_URL.to_string(),
            viewer_url: DEFAULT_VIEWER_URL.to_string(),
            credential: None,
            timeout: None,
        }
    }
}

impl GatewayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `FLYGLANCE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(url) = env::var(ENV_STATE_URL) {
            config.state_url = url;
        }
        if let Ok(url) = env::var(ENV_VIEWER_URL) {
            config.viewer_url = url;
        }
        if let Ok(token) = env::var(ENV_TOKEN) {
            if !token.is_empty() {
                config.credential = Some(Credential::new(token));
            }
        }
        if let Ok(raw) = env::var(ENV_TIMEOUT_MS) {
            let ms: u64 = raw.parse().map_err(|_| GlancerError::Config {
                reason: format!("{} must be milliseconds, got '{}'", ENV_TIMEOUT_MS, raw),
            })?;
            config.timeout = Some(Duration::from_millis(ms));
        }

        Ok(config)
    }

    pub fn with_state_url(mut self, url: impl Into<String>) -> Self {
        self.state_url = url.into();
        self
    }

    pub fn with_viewer_url(mut self, url: impl Into<String>) -> Self {
        self.viewer_url = url.into();
        self
    }

    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Endpoint that creates a new state object.
    pub fn publish_url(&self) -> String {
        format!("{}/post", self.state_url.trim_end_matches('/'))
    }

    pub fn require_credential(&self) -> Result<&Credential> {
        self.credential.as_ref().ok_or_else(|| GlancerError::Config {
            reason: format!(
                "no bearer token configured; set {} or pass a secret file",
                ENV_TOKEN
            ),
        })
    }
}
