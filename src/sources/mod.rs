//! Data sources consulted while building layers
//!
//! This module provides:
//! - `PointTableProvider` for skeleton line tables and synapse point tables
//! - `PrecomputedResolver` for segment ids and hosting locations
//! - `StaticSources`, a literal implementation of both

mod fixture;

use serde::{Deserialize, Serialize};

use crate::builder::LayerRequest;
use crate::error::Result;
use crate::state::{Point3, SegmentId};

pub use fixture::StaticSources;

/// One edge of a traced skeleton.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    #[serde(rename = "pointA")]
    pub point_a: Point3,
    #[serde(rename = "pointB")]
    pub point_b: Point3,
}

/// Node pairs of one skeleton.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkeletonTable {
    pub id: SegmentId,
    #[serde(default)]
    pub lines: Vec<LineSegment>,
}

/// Synapse locations of one traced neuron.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynapseTable {
    pub id: SegmentId,
    #[serde(default)]
    pub pre_synapses: Vec<Point3>,
    #[serde(default)]
    pub post_synapses: Vec<Point3>,
}

/// Segments published as a precomputed source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecomputedSegments {
    pub segment_ids: Vec<SegmentId>,
    /// Host (and optional path) serving the `precomputed/` tree.
    pub host: String,
}

/// A point annotation source published as a precomputed layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecomputedPoints {
    pub host: String,
    pub layer_name: String,
}

/// Supplies coordinate tables for constructed annotation layers.
pub trait PointTableProvider: Send + Sync {
    /// One table per skeleton in `source`, in source order.
    fn skeleton_tables(&self, source: &str, scale: f64) -> Result<Vec<SkeletonTable>>;

    /// One table per neuron in `source`, in source order.
    fn synapse_tables(&self, source: &str, scale: f64) -> Result<Vec<SynapseTable>>;
}

/// Locates precomputed data for a request.
pub trait PrecomputedResolver: Send + Sync {
    fn resolve_segments(&self, request: &LayerRequest) -> Result<PrecomputedSegments>;

    fn resolve_host(&self, request: &LayerRequest) -> Result<String>;

    fn resolve_points(&self, request: &LayerRequest) -> Result<PrecomputedPoints>;
}
