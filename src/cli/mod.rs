//! CLI Module
//!
//! Command-line interface for decoding, publishing and extending viewer
//! sessions.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{Credential, GatewayConfig, ENV_STATE_URL, ENV_TOKEN, ENV_VIEWER_URL};
use crate::error::Result;

/// Flyglance - build and share neuroglancer viewer sessions
#[derive(Parser, Debug)]
#[command(name = "flyglance")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Base URL of the state store
    #[arg(long, global = true, env = ENV_STATE_URL)]
    pub state_url: Option<String>,

    /// Viewer host used in share links
    #[arg(long, global = true, env = ENV_VIEWER_URL)]
    pub viewer_url: Option<String>,

    /// Bearer token for the state store
    #[arg(long, global = true, env = ENV_TOKEN, hide_env_values = true)]
    pub token: Option<String>,

    /// JSON file holding {"token": "..."}; used when no token is given
    #[arg(long, global = true)]
    pub secret_file: Option<PathBuf>,

    /// Network timeout in milliseconds
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the state behind a viewer link
    #[command(name = "decode")]
    Decode {
        /// Viewer link
        url: String,
    },

    /// Publish a state file and print its share link
    #[command(name = "publish")]
    Publish {
        /// Path to a state JSON file
        path: PathBuf,
    },

    /// Add a layer to a session and print the new share link
    #[command(name = "add-layer")]
    AddLayer {
        /// Path to a layer request JSON file
        #[arg(short, long)]
        request: PathBuf,

        /// Existing viewer link to extend
        #[arg(short, long, conflicts_with = "space")]
        url: Option<String>,

        /// Start a fresh session in a built-in space
        #[arg(long)]
        space: Option<String>,

        /// JSON file with precomputed hosts, segment ids and point tables
        #[arg(long)]
        sources: Option<PathBuf>,
    },

    /// List built-in spaces
    #[command(name = "spaces")]
    Spaces,
}

impl Cli {
    /// Environment defaults overridden by command-line flags.
    pub fn gateway_config(&self) -> Result<GatewayConfig> {
        let mut config = GatewayConfig::from_env()?;

        if let Some(url) = &self.state_url {
            config.state_url = url.clone();
        }
        if let Some(url) = &self.viewer_url {
            config.viewer_url = url.clone();
        }
        if let Some(ms) = self.timeout_ms {
            config.timeout = Some(Duration::from_millis(ms));
        }
        match (&self.token, &self.secret_file) {
            (Some(token), _) => config.credential = Some(Credential::new(token.clone())),
            (None, Some(path)) => config.credential = Some(Credential::from_secret_file(path)?),
            (None, None) => {}
        }

        Ok(config)
    }
}
