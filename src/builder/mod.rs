//! Layer construction
//!
//! A typed request goes in, layer records come out. Merging them into a
//! document is left to the caller.

mod layers;
mod request;

pub use layers::{
    precomputed_url, BuildOutcome, LayerBuilder, DEFAULT_VOLUME_LAYER, POINT_COLOR,
    POSTSYNAPSE_COLOR, POSTSYNAPSE_LAYER, PRESYNAPSE_COLOR, PRESYNAPSE_LAYER, SKELETON_LAYER,
};
pub use request::{LayerKind, LayerRequest};
