//! Style resolution for layer requests

use serde::{Deserialize, Serialize};

use crate::builder::LayerRequest;
use crate::error::Result;

pub const DEFAULT_COLOR: &str = "#ff0000";
pub const DEFAULT_ALPHA: f64 = 0.5;
pub const DEFAULT_SCALE: f64 = 1.0;

/// How annotations of a request are expressed in the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationMode {
    /// Point at an existing chunked precomputed source.
    #[default]
    Precomputed,
    /// List the annotations inline, built from point tables.
    Constructed,
}

/// Style values a request resolves to.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    pub colors: Vec<String>,
    pub alpha: f64,
    pub scale: f64,
    pub mode: AnnotationMode,
}

/// Derives palette, opacity, scale and annotation mode for a request.
pub trait StyleResolver: Send + Sync {
    fn resolve(&self, request: &LayerRequest) -> Result<ResolvedStyle>;
}

/// Reads the style straight off the request, filling gaps with defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestStyleResolver;

impl StyleResolver for RequestStyleResolver {
    fn resolve(&self, request: &LayerRequest) -> Result<ResolvedStyle> {
        let colors = if request.colors.is_empty() {
            vec![DEFAULT_COLOR.to_string()]
        } else {
            request.colors.clone()
        };

        Ok(ResolvedStyle {
            colors,
            alpha: request.alpha.unwrap_or(DEFAULT_ALPHA),
            scale: request.scale.unwrap_or(DEFAULT_SCALE),
            mode: request.annotation_mode.unwrap_or_default(),
        })
    }
}
