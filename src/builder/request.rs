//! Layer requests
//!
//! The declarative description of a layer to add. `type` picks the builder
//! branch; an unrecognised type is kept as [`LayerKind::Unsupported`] so the
//! caller gets a typed no-op instead of a parse failure.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::style::AnnotationMode;

/// Kind of layer a request asks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LayerKind {
    Skeletons,
    Volumes,
    Synapses,
    Points,
    Unsupported(String),
}

impl LayerKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Skeletons => "skeletons",
            Self::Volumes => "volumes",
            Self::Synapses => "synapses",
            Self::Points => "points",
            Self::Unsupported(other) => other,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }
}

impl From<&str> for LayerKind {
    fn from(s: &str) -> Self {
        match s {
            "skeletons" => Self::Skeletons,
            "volumes" => Self::Volumes,
            "synapses" => Self::Synapses,
            "points" => Self::Points,
            other => Self::Unsupported(other.to_string()),
        }
    }
}

impl From<String> for LayerKind {
    fn from(s: String) -> Self {
        LayerKind::from(s.as_str())
    }
}

impl From<LayerKind> for String {
    fn from(kind: LayerKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One layer to add to a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerRequest {
    #[serde(rename = "type")]
    pub kind: LayerKind,
    /// Locator of the data behind the layer (file, id list, dataset).
    #[serde(default)]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
    #[serde(
        default,
        alias = "annotationstatetype",
        skip_serializing_if = "Option::is_none"
    )]
    pub annotation_mode: Option<AnnotationMode>,
}

impl LayerRequest {
    pub fn new(kind: impl Into<LayerKind>, source: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            source: source.into(),
            name: None,
            scale: None,
            colors: Vec::new(),
            alpha: None,
            annotation_mode: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.colors = colors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    pub fn with_annotation_mode(mut self, mode: AnnotationMode) -> Self {
        self.annotation_mode = Some(mode);
        self
    }
}
