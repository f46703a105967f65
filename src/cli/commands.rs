//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::builder::{LayerBuilder, LayerRequest};
use crate::config::GatewayConfig;
use crate::error::Result;
use crate::gateway::RemoteStateGateway;
use crate::session::{AddLayerOutcome, Session};
use crate::sources::StaticSources;
use crate::state::{Space, StateDocument};

/// Print the state behind a viewer link.
pub fn decode(config: GatewayConfig, url: &str) -> Result<()> {
    info!("Decoding viewer link: {}", url);

    let gateway = RemoteStateGateway::from_config(config)?;
    let document = gateway.decode(url)?;

    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}

/// Publish a state file.
pub fn publish(config: GatewayConfig, path: &Path) -> Result<()> {
    info!("Publishing state file: {}", path.display());

    let content = fs::read_to_string(path)?;
    let document = StateDocument::from_value(serde_json::from_str(&content)?)?;

    let gateway = RemoteStateGateway::from_config(config)?;
    let url = gateway.encode(&document)?;

    println!("{}", url);
    Ok(())
}

/// Add one layer to an existing link, a built-in space, or an empty state.
pub fn add_layer(
    config: GatewayConfig,
    request_path: &Path,
    url: Option<&str>,
    space: Option<&str>,
    sources_path: Option<&Path>,
) -> Result<()> {
    info!("Adding layer from request: {}", request_path.display());

    let request: LayerRequest = serde_json::from_str(&fs::read_to_string(request_path)?)?;
    let sources = match sources_path {
        Some(path) => StaticSources::from_file(path)?,
        None => StaticSources::new(),
    };

    let session = Session::new(
        LayerBuilder::from_sources(sources),
        RemoteStateGateway::from_config(config)?,
    );

    let outcome = match (url, space) {
        (Some(url), _) => session.add_layer_to_url(url, &request)?,
        (None, Some(space)) => session.add_layer(StateDocument::from_space(space)?, &request)?,
        (None, None) => session.add_layer(StateDocument::empty(), &request)?,
    };

    match outcome {
        AddLayerOutcome::Published { url, document } => {
            println!("{}", url);
            println!("Layers: {}", document.layer_names().join(", "));
        }
        AddLayerOutcome::Unsupported { layer_type } => {
            println!("Layer type '{}' is not supported; nothing published.", layer_type);
        }
    }

    Ok(())
}

/// List built-in spaces.
pub fn list_spaces() -> Result<()> {
    for space in Space::all() {
        let layers: Vec<_> = space.layers.iter().map(|(name, _)| *name).collect();
        println!("{:<12} {}", space.name, layers.join(", "));
    }
    Ok(())
}
