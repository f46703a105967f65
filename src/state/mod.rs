//! State Document Module
//!
//! Typed model of the viewer state: the document, its layers, segment ids
//! and the built-in dataset spaces a new state can start from.

pub mod document;
pub mod layer;
pub mod segment;
pub mod spaces;

pub use document::{CoordinateSpace, Dimension, StateDocument};
pub use layer::{
    Annotation, AnnotationLayer, ImageLayer, Layer, Point3, RenderMode, SegmentationLayer,
    SkeletonRendering,
};
pub use segment::SegmentId;
pub use spaces::Space;
