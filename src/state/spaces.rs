//! Built-in viewer spaces
//!
//! A space names a dataset and the EM image layers that belong to it. A
//! fresh session starts from one of these.

use super::document::{CoordinateSpace, Dimension};
use crate::error::{GlancerError, Result};

/// A dataset with its image layers.
#[derive(Debug, Clone, PartialEq)]
pub struct Space {
    pub name: &'static str,
    /// Voxel size of each axis, in `unit`.
    pub voxel_size: [f64; 3],
    pub unit: &'static str,
    /// `(layer name, source)` pairs, in display order.
    pub layers: &'static [(&'static str, &'static str)],
}

const FAFB: Space = Space {
    name: "FAFB",
    voxel_size: [1.0, 1.0, 1.0],
    unit: "um",
    layers: &[
        (
            "fafb_v14_orig",
            "precomputed://gs://neuroglancer-fafb-data/fafb_v14/fafb_v14_orig",
        ),
        (
            "fafb_v14_clahe",
            "precomputed://gs://neuroglancer-fafb-data/fafb_v14/fafb_v14_clahe",
        ),
    ],
};

const HEMIBRAIN: Space = Space {
    name: "hemibrain",
    voxel_size: [1.0, 1.0, 1.0],
    unit: "um",
    layers: &[(
        "emdata",
        "precomputed://gs://neuroglancer-janelia-flyem-hemibrain/emdata/clahe_yz/jpeg",
    )],
};

const BUILTIN: &[Space] = &[FAFB, HEMIBRAIN];

impl Space {
    /// Look up a built-in space, ignoring ASCII case.
    pub fn builtin(name: &str) -> Result<Space> {
        BUILTIN
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| GlancerError::UnknownSpace {
                space: name.to_string(),
            })
    }

    pub fn all() -> &'static [Space] {
        BUILTIN
    }

    pub fn coordinate_space(&self) -> CoordinateSpace {
        ["x", "y", "z"]
            .iter()
            .zip(self.voxel_size)
            .map(|(axis, size)| (axis.to_string(), Dimension(size, self.unit.to_string())))
            .collect()
    }
}
