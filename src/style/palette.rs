//! Per-segment color assignment
//!
//! A palette of one color is broadcast to every segment; a palette with one
//! color per segment is paired positionally. Any other length is rejected
//! before a layer is built.

use indexmap::IndexMap;

use crate::error::{GlancerError, Result};
use crate::state::SegmentId;

/// Map from segment id to hex color.
pub type SegmentColors = IndexMap<SegmentId, String>;

/// Give every segment the same color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastColor(pub String);

impl BroadcastColor {
    pub fn assign(&self, segments: &[SegmentId]) -> SegmentColors {
        segments.iter().map(|id| (*id, self.0.clone())).collect()
    }
}

/// Pair the i-th color with the i-th segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairwiseColor(pub Vec<String>);

impl PairwiseColor {
    pub fn assign(&self, segments: &[SegmentId]) -> Result<SegmentColors> {
        if self.0.len() != segments.len() {
            return Err(GlancerError::StylingMismatch {
                colors: self.0.len(),
                segments: segments.len(),
            });
        }
        Ok(segments
            .iter()
            .copied()
            .zip(self.0.iter().cloned())
            .collect())
    }
}

/// The strategy chosen for a palette and a segment count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorAssignment {
    Broadcast(BroadcastColor),
    Pairwise(PairwiseColor),
}

impl ColorAssignment {
    /// Pick a strategy from the palette length alone.
    pub fn select(palette: &[String], segment_count: usize) -> Result<Self> {
        match palette {
            [single] => Ok(ColorAssignment::Broadcast(BroadcastColor(single.clone()))),
            colors if !colors.is_empty() && colors.len() == segment_count => {
                Ok(ColorAssignment::Pairwise(PairwiseColor(colors.to_vec())))
            }
            colors => Err(GlancerError::StylingMismatch {
                colors: colors.len(),
                segments: segment_count,
            }),
        }
    }

    pub fn assign(&self, segments: &[SegmentId]) -> Result<SegmentColors> {
        match self {
            ColorAssignment::Broadcast(b) => Ok(b.assign(segments)),
            ColorAssignment::Pairwise(p) => p.assign(segments),
        }
    }

    /// Select and apply in one step.
    pub fn colors_for(palette: &[String], segments: &[SegmentId]) -> Result<SegmentColors> {
        Self::select(palette, segments.len())?.assign(segments)
    }
}
