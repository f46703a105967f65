//! Flyglance - viewer-state sessions for remote neuroglancer viewers
//!
//! Flyglance turns a viewer link into a typed state document, adds layers
//! to it from declarative requests, and publishes the result as a new link.
//!
//! # Architecture
//!
//! - `state`: the document model (layers, segment ids, dataset spaces)
//! - `style`: palette, opacity and per-segment color assignment
//! - `sources`: point tables and precomputed data lookups
//! - `builder`: request → layer records
//! - `gateway`: link ↔ document through an authenticated JSON store
//! - `session`: build, append, publish

pub mod builder;
pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod session;
pub mod sources;
pub mod state;
pub mod style;

pub use builder::{BuildOutcome, LayerBuilder, LayerKind, LayerRequest};
pub use config::{Credential, GatewayConfig};
pub use error::{GlancerError, Result};
pub use gateway::{MemoryStateStore, RemoteStateGateway, StateStore, ViewerInput};
pub use session::{AddLayerOutcome, Session};
pub use state::{Layer, SegmentId, StateDocument};
