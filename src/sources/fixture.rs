//! Literal data sources
//!
//! `StaticSources` answers every lookup from data it was given up front,
//! either in code or from a JSON file. Tables are returned as stored; the
//! requested scale is not applied.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{
    PointTableProvider, PrecomputedPoints, PrecomputedResolver, PrecomputedSegments,
    SkeletonTable, SynapseTable,
};
use crate::builder::LayerRequest;
use crate::error::{GlancerError, Result};
use crate::state::SegmentId;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticSources {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub segment_ids: Vec<SegmentId>,
    /// Name of the precomputed point layer; defaults to the request name.
    #[serde(default)]
    pub point_layer: Option<String>,
    #[serde(default)]
    pub skeletons: Vec<SkeletonTable>,
    #[serde(default)]
    pub synapses: Vec<SynapseTable>,
}

impl StaticSources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load sources from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_segments(mut self, ids: impl IntoIterator<Item = u64>) -> Self {
        self.segment_ids = ids.into_iter().map(SegmentId).collect();
        self
    }

    pub fn with_point_layer(mut self, name: impl Into<String>) -> Self {
        self.point_layer = Some(name.into());
        self
    }

    pub fn with_skeleton(mut self, table: SkeletonTable) -> Self {
        self.skeletons.push(table);
        self
    }

    pub fn with_synapses(mut self, table: SynapseTable) -> Self {
        self.synapses.push(table);
        self
    }

    fn host_for(&self, request: &LayerRequest) -> Result<String> {
        self.host.clone().ok_or_else(|| GlancerError::Collaborator {
            source_id: request.source.clone(),
            reason: "no precomputed host configured".to_string(),
        })
    }
}

impl PrecomputedResolver for StaticSources {
    fn resolve_segments(&self, request: &LayerRequest) -> Result<PrecomputedSegments> {
        Ok(PrecomputedSegments {
            segment_ids: self.segment_ids.clone(),
            host: self.host_for(request)?,
        })
    }

    fn resolve_host(&self, request: &LayerRequest) -> Result<String> {
        self.host_for(request)
    }

    fn resolve_points(&self, request: &LayerRequest) -> Result<PrecomputedPoints> {
        let layer_name = self
            .point_layer
            .clone()
            .or_else(|| request.name.clone())
            .ok_or_else(|| GlancerError::Collaborator {
                source_id: request.source.clone(),
                reason: "no point layer name configured".to_string(),
            })?;

        Ok(PrecomputedPoints {
            host: self.host_for(request)?,
            layer_name,
        })
    }
}

impl PointTableProvider for StaticSources {
    fn skeleton_tables(&self, source: &str, scale: f64) -> Result<Vec<SkeletonTable>> {
        tracing::debug!(source, scale, count = self.skeletons.len(), "static skeleton tables");
        Ok(self.skeletons.clone())
    }

    fn synapse_tables(&self, source: &str, scale: f64) -> Result<Vec<SynapseTable>> {
        tracing::debug!(source, scale, count = self.synapses.len(), "static synapse tables");
        Ok(self.synapses.clone())
    }
}
