//! State Document
//!
//! The full viewer state: an ordered layer list plus top-level metadata.
//! Keys this crate does not model are kept in `extra` and written back in
//! their original order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::layer::{ImageLayer, Layer};
use super::spaces::Space;
use crate::error::{GlancerError, Result};

/// Scale and unit of one coordinate axis, written as `[scale, "unit"]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension(pub f64, pub String);

/// Named axes of the viewer coordinate space.
pub type CoordinateSpace = IndexMap<String, Dimension>;

/// In-memory viewer state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<CoordinateSpace>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec<f64>>,
    layers: Vec<Layer>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for StateDocument {
    fn default() -> Self {
        Self::empty()
    }
}

impl StateDocument {
    /// A state with no layers and no metadata.
    pub fn empty() -> Self {
        Self {
            dimensions: None,
            position: None,
            layers: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Seed a state with the image layers and dimensions of a built-in space.
    pub fn from_space(name: &str) -> Result<Self> {
        let space = Space::builtin(name)?;
        let layers = space
            .layers
            .iter()
            .map(|(name, source)| Layer::Image(ImageLayer::new(*name, *source)));

        let mut document = Self::empty().with_layers(layers);
        document.dimensions = Some(space.coordinate_space());
        Ok(document)
    }

    /// Validate and interpret a decoded JSON payload.
    ///
    /// The payload must be an object carrying a `layers` array; anything else
    /// is rejected here rather than later during a merge.
    pub fn from_value(value: Value) -> Result<Self> {
        match &value {
            Value::Object(map) => match map.get("layers") {
                Some(Value::Array(_)) => {}
                Some(other) => {
                    return Err(GlancerError::Schema {
                        reason: format!("'layers' must be an array, found {}", json_kind(other)),
                    })
                }
                None => {
                    return Err(GlancerError::Schema {
                        reason: "state has no 'layers' list".to_string(),
                    })
                }
            },
            other => {
                return Err(GlancerError::Schema {
                    reason: format!("state must be a JSON object, found {}", json_kind(other)),
                })
            }
        }

        serde_json::from_value(value).map_err(|e| GlancerError::Schema {
            reason: e.to_string(),
        })
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// First layer with the given name.
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name() == Some(name))
    }

    pub fn layer_names(&self) -> Vec<&str> {
        self.layers.iter().filter_map(Layer::name).collect()
    }

    /// Append one layer after the existing ones.
    pub fn with_layer(self, layer: impl Into<Layer>) -> Self {
        self.with_layers(std::iter::once(layer.into()))
    }

    /// Append layers in iteration order. Existing layers keep their positions.
    pub fn with_layers(mut self, layers: impl IntoIterator<Item = Layer>) -> Self {
        self.layers.extend(layers);
        self
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
