//! Session orchestration
//!
//! Adds one layer to a viewer session: build the layers, append them to the
//! document, publish the result. Nothing is published unless the build
//! succeeded and produced layers.

use crate::builder::{BuildOutcome, LayerBuilder, LayerRequest};
use crate::error::Result;
use crate::gateway::{RemoteStateGateway, ViewerInput};
use crate::state::StateDocument;

/// What adding a layer produced.
#[derive(Debug, Clone, PartialEq)]
pub enum AddLayerOutcome {
    /// The updated document was published at `url`.
    Published { url: String, document: StateDocument },
    /// The request type is not supported; the store was not contacted.
    Unsupported { layer_type: String },
}

impl AddLayerOutcome {
    /// Share link, if anything was published.
    pub fn url(&self) -> Option<&str> {
        match self {
            AddLayerOutcome::Published { url, .. } => Some(url),
            AddLayerOutcome::Unsupported { .. } => None,
        }
    }

    pub fn document(&self) -> Option<&StateDocument> {
        match self {
            AddLayerOutcome::Published { document, .. } => Some(document),
            AddLayerOutcome::Unsupported { .. } => None,
        }
    }
}

/// Layer builder and gateway wired together.
pub struct Session {
    builder: LayerBuilder,
    gateway: RemoteStateGateway,
}

impl Session {
    pub fn new(builder: LayerBuilder, gateway: RemoteStateGateway) -> Self {
        Self { builder, gateway }
    }

    pub fn builder(&self) -> &LayerBuilder {
        &self.builder
    }

    pub fn gateway(&self) -> &RemoteStateGateway {
        &self.gateway
    }

    /// Append the layers for `request` to `document` and publish it.
    pub fn add_layer(
        &self,
        document: StateDocument,
        request: &LayerRequest,
    ) -> Result<AddLayerOutcome> {
        let layers = match self.builder.build(request)? {
            BuildOutcome::Layers(layers) => layers,
            BuildOutcome::Unsupported { layer_type } => {
                return Ok(AddLayerOutcome::Unsupported { layer_type })
            }
        };

        let document = document.with_layers(layers);
        let url = self.gateway.encode(&document)?;
        Ok(AddLayerOutcome::Published { url, document })
    }

    /// Decode `input`, then [`add_layer`](Self::add_layer).
    ///
    /// An unsupported request returns before the link is decoded, so it
    /// causes no store traffic at all.
    pub fn add_layer_to_url(
        &self,
        input: impl Into<ViewerInput>,
        request: &LayerRequest,
    ) -> Result<AddLayerOutcome> {
        if !request.kind.is_supported() {
            tracing::warn!(layer_type = %request.kind, "unsupported layer type, link not decoded");
            return Ok(AddLayerOutcome::Unsupported {
                layer_type: request.kind.to_string(),
            });
        }

        let document = self.gateway.decode(input)?;
        self.add_layer(document, request)
    }
}
