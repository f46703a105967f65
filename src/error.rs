//! Error handling for Flyglance
//!
//! Every failure carries enough context to tell a transport problem from a
//! malformed document or a bad layer request.

use thiserror::Error;

/// Result type alias for Flyglance operations
pub type Result<T> = std::result::Result<T, GlancerError>;

/// Main error type for Flyglance operations
#[derive(Error, Debug)]
pub enum GlancerError {
    // Remote store errors
    #[error("Fetching state from {url} failed with HTTP {status}")]
    FetchFailed { url: String, status: u16 },

    #[error("Publishing state to {url} failed with HTTP {status}")]
    PublishFailed { url: String, status: u16 },

    #[error("Transport error talking to {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Remote store returned an unusable pointer: {body}")]
    InvalidPointer { body: String },

    #[error("Remote store is not available: {reason}")]
    StoreUnavailable { reason: String },

    // Input errors
    #[error("Invalid viewer URL '{input}': {reason}")]
    InvalidUrl { input: String, reason: String },

    #[error("State document does not match the expected schema: {reason}")]
    Schema { reason: String },

    #[error("Unknown viewer space: {space}")]
    UnknownSpace { space: String },

    // Layer construction errors
    #[error("Palette of {colors} colors cannot style {segments} segments (need 1 or {segments})")]
    StylingMismatch { colors: usize, segments: usize },

    #[error("Layer '{layer}' needs at least one color")]
    EmptyPalette { layer: String },

    #[error("Data source failed for '{source_id}': {reason}")]
    Collaborator { source_id: String, reason: String },

    // Configuration errors
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GlancerError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            GlancerError::FetchFailed { .. } => "FETCH_FAILED",
            GlancerError::PublishFailed { .. } => "PUBLISH_FAILED",
            GlancerError::Transport { .. } => "TRANSPORT_ERROR",
            GlancerError::InvalidPointer { .. } => "INVALID_POINTER",
            GlancerError::StoreUnavailable { .. } => "STORE_UNAVAILABLE",
            GlancerError::InvalidUrl { .. } => "INVALID_URL",
            GlancerError::Schema { .. } => "SCHEMA_ERROR",
            GlancerError::UnknownSpace { .. } => "UNKNOWN_SPACE",
            GlancerError::StylingMismatch { .. } => "STYLING_MISMATCH",
            GlancerError::EmptyPalette { .. } => "EMPTY_PALETTE",
            GlancerError::Collaborator { .. } => "COLLABORATOR_ERROR",
            GlancerError::Config { .. } => "CONFIG_ERROR",
            GlancerError::Io(_) => "IO_ERROR",
            GlancerError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// True for failures raised while building layers, before any remote call.
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            GlancerError::StylingMismatch { .. }
                | GlancerError::EmptyPalette { .. }
                | GlancerError::Collaborator { .. }
        )
    }

    /// Returns a user-friendly recovery suggestion.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            GlancerError::FetchFailed { status: 401 | 403, .. }
            | GlancerError::PublishFailed { status: 401 | 403, .. } => {
                Some("Check that the bearer token is valid for the state store.")
            }
            GlancerError::FetchFailed { .. } => {
                Some("Check that the json_url in the viewer link still exists.")
            }
            GlancerError::Transport { .. } => {
                Some("Check network access to the state store or raise the timeout.")
            }
            GlancerError::StylingMismatch { .. } => {
                Some("Pass a single color or exactly one color per segment.")
            }
            GlancerError::Schema { .. } => {
                Some("The link does not point at a viewer state; use a json_url link.")
            }
            GlancerError::UnknownSpace { .. } => Some("Known spaces are FAFB and hemibrain."),
            _ => None,
        }
    }
}
