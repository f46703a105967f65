//! Layer styling
//!
//! - `StyleResolver` turns a request into palette, opacity, scale and mode
//! - `ColorAssignment` maps a palette onto a segment list

mod palette;
mod resolver;

pub use palette::{BroadcastColor, ColorAssignment, PairwiseColor, SegmentColors};
pub use resolver::{
    AnnotationMode, RequestStyleResolver, ResolvedStyle, StyleResolver, DEFAULT_ALPHA,
    DEFAULT_COLOR, DEFAULT_SCALE,
};
