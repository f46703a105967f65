//! Layer Builder
//!
//! Turns one [`LayerRequest`] into the layer records it stands for. Each
//! request type either points at precomputed data or constructs inline
//! annotations from point tables; the choice comes from the resolved
//! annotation mode.

use std::sync::Arc;

use super::request::{LayerKind, LayerRequest};
use crate::error::{GlancerError, Result};
use crate::sources::{PointTableProvider, PrecomputedResolver};
use crate::state::{Annotation, AnnotationLayer, Layer, SegmentationLayer, SkeletonRendering};
use crate::style::{
    AnnotationMode, ColorAssignment, RequestStyleResolver, ResolvedStyle, StyleResolver,
};

/// Name of the segmentation layer holding precomputed skeletons.
pub const SKELETON_LAYER: &str = "skeleton";

/// Volume layer name when the request gives none.
pub const DEFAULT_VOLUME_LAYER: &str = "volumes";

/// Precomputed synapse layer names, also their paths under the host.
pub const PRESYNAPSE_LAYER: &str = "presynapses";
pub const POSTSYNAPSE_LAYER: &str = "postsynapses";

/// Fixed colors of the precomputed synapse layers.
pub const PRESYNAPSE_COLOR: &str = "#ff0000";
pub const POSTSYNAPSE_COLOR: &str = "#0000ff";

/// Color of precomputed point layers.
pub const POINT_COLOR: &str = "#ff0000";

const PRESYNAPSE_ROLE: &str = "presynapses_cell";
const POSTSYNAPSE_ROLE: &str = "postsynapses_cell";

/// Result of building a request.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildOutcome {
    /// Layers to append, in order.
    Layers(Vec<Layer>),
    /// The request type has no builder; nothing was produced.
    Unsupported { layer_type: String },
}

impl BuildOutcome {
    pub fn layers(&self) -> &[Layer] {
        match self {
            BuildOutcome::Layers(layers) => layers,
            BuildOutcome::Unsupported { .. } => &[],
        }
    }
}

/// `precomputed://<host>/precomputed/<path>`
pub fn precomputed_url(host: &str, path: &str) -> String {
    format!("precomputed://{}/precomputed/{}", host, path)
}

/// Builds layer records, consulting the style resolver and data sources.
#[derive(Clone)]
pub struct LayerBuilder {
    style: Arc<dyn StyleResolver>,
    tables: Arc<dyn PointTableProvider>,
    precomputed: Arc<dyn PrecomputedResolver>,
}

impl LayerBuilder {
    /// Create a builder that reads styles straight from requests.
    pub fn new(
        tables: Arc<dyn PointTableProvider>,
        precomputed: Arc<dyn PrecomputedResolver>,
    ) -> Self {
        Self {
            style: Arc::new(RequestStyleResolver),
            tables,
            precomputed,
        }
    }

    /// Create a builder backed by one object serving both data lookups.
    pub fn from_sources<S>(sources: S) -> Self
    where
        S: PointTableProvider + PrecomputedResolver + 'static,
    {
        let sources = Arc::new(sources);
        Self::new(sources.clone(), sources)
    }

    pub fn with_style_resolver(mut self, style: Arc<dyn StyleResolver>) -> Self {
        self.style = style;
        self
    }

    /// Build the layers for `request`.
    ///
    /// Styling is checked before any layer is returned, so a palette that
    /// cannot cover the segments fails here and never reaches the store.
    pub fn build(&self, request: &LayerRequest) -> Result<BuildOutcome> {
        let layers = match &request.kind {
            LayerKind::Skeletons => {
                let style = self.style.resolve(request)?;
                match style.mode {
                    AnnotationMode::Precomputed => {
                        vec![self.precomputed_skeletons(request, &style)?]
                    }
                    AnnotationMode::Constructed => self.constructed_skeletons(request, &style)?,
                }
            }
            LayerKind::Volumes => {
                let style = self.style.resolve(request)?;
                vec![self.volumes(request, &style)?]
            }
            LayerKind::Synapses => {
                let style = self.style.resolve(request)?;
                match style.mode {
                    AnnotationMode::Precomputed => self.precomputed_synapses(request)?,
                    AnnotationMode::Constructed => self.constructed_synapses(request, &style)?,
                }
            }
            LayerKind::Points => vec![self.points(request)?],
            LayerKind::Unsupported(other) => {
                tracing::warn!(layer_type = %other, "unsupported layer type, nothing to build");
                return Ok(BuildOutcome::Unsupported {
                    layer_type: other.clone(),
                });
            }
        };

        tracing::debug!(
            layer_type = %request.kind,
            count = layers.len(),
            "built layers"
        );
        Ok(BuildOutcome::Layers(layers))
    }

    fn precomputed_skeletons(
        &self,
        request: &LayerRequest,
        style: &ResolvedStyle,
    ) -> Result<Layer> {
        let resolved = self.precomputed.resolve_segments(request)?;
        let colors = ColorAssignment::colors_for(&style.colors, &resolved.segment_ids)?;

        let layer = SegmentationLayer::new(SKELETON_LAYER, resolved.segment_ids, colors)
            .with_skeletons(precomputed_url(&resolved.host, "skeletons"))
            .with_rendering(SkeletonRendering::default())
            .with_alpha(style.alpha);
        Ok(layer.into())
    }

    fn constructed_skeletons(
        &self,
        request: &LayerRequest,
        style: &ResolvedStyle,
    ) -> Result<Vec<Layer>> {
        let color = first_color(style, request)?;
        let tables = self.tables.skeleton_tables(&request.source, style.scale)?;

        Ok(tables
            .into_iter()
            .map(|table| {
                let lines = table
                    .lines
                    .into_iter()
                    .map(|l| Annotation::line(l.point_a, l.point_b))
                    .collect();
                Layer::from(AnnotationLayer::inline(
                    format!("skel_annot_{}", table.id),
                    color,
                    lines,
                ))
            })
            .collect())
    }

    fn volumes(&self, request: &LayerRequest, style: &ResolvedStyle) -> Result<Layer> {
        let resolved = self.precomputed.resolve_segments(request)?;
        let name = request.name.as_deref().unwrap_or(DEFAULT_VOLUME_LAYER);
        let colors = ColorAssignment::colors_for(&style.colors, &resolved.segment_ids)?;

        let layer = SegmentationLayer::new(name, resolved.segment_ids, colors)
            .with_mesh(precomputed_url(&resolved.host, &format!("{}/mesh", name)))
            .with_rendering(SkeletonRendering::default())
            .with_alpha(style.alpha);
        Ok(layer.into())
    }

    fn precomputed_synapses(&self, request: &LayerRequest) -> Result<Vec<Layer>> {
        let host = self.precomputed.resolve_host(request)?;

        let pre = AnnotationLayer::precomputed(
            PRESYNAPSE_LAYER,
            precomputed_url(&host, PRESYNAPSE_LAYER),
            PRESYNAPSE_COLOR,
        )
        .linked_to(PRESYNAPSE_ROLE, SKELETON_LAYER)
        .filtered_by(POSTSYNAPSE_ROLE);

        let post = AnnotationLayer::precomputed(
            POSTSYNAPSE_LAYER,
            precomputed_url(&host, POSTSYNAPSE_LAYER),
            POSTSYNAPSE_COLOR,
        )
        .linked_to(POSTSYNAPSE_ROLE, SKELETON_LAYER)
        .filtered_by(PRESYNAPSE_ROLE);

        Ok(vec![Layer::from(pre), Layer::from(post)])
    }

    fn constructed_synapses(
        &self,
        request: &LayerRequest,
        style: &ResolvedStyle,
    ) -> Result<Vec<Layer>> {
        // index 0 colors postsynapses, index 1 presynapses
        let post_color = first_color(style, request)?;
        let pre_color = style.colors.get(1).map(String::as_str).unwrap_or(post_color);
        let tables = self.tables.synapse_tables(&request.source, style.scale)?;

        let mut layers: Vec<Layer> = Vec::with_capacity(tables.len() * 2);
        for table in tables {
            let post = table.post_synapses.into_iter().map(Annotation::point).collect();
            let pre = table.pre_synapses.into_iter().map(Annotation::point).collect();

            layers.push(
                AnnotationLayer::inline(format!("postsyn_annot_{}", table.id), post_color, post)
                    .into(),
            );
            layers.push(
                AnnotationLayer::inline(format!("presyn_annot_{}", table.id), pre_color, pre)
                    .into(),
            );
        }
        Ok(layers)
    }

    fn points(&self, request: &LayerRequest) -> Result<Layer> {
        let resolved = self.precomputed.resolve_points(request)?;
        let layer = AnnotationLayer::precomputed(
            resolved.layer_name.clone(),
            precomputed_url(&resolved.host, &resolved.layer_name),
            POINT_COLOR,
        );
        Ok(layer.into())
    }
}

fn first_color<'a>(style: &'a ResolvedStyle, request: &LayerRequest) -> Result<&'a str> {
    style
        .colors
        .first()
        .map(String::as_str)
        .ok_or_else(|| GlancerError::EmptyPalette {
            layer: request.kind.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{LineSegment, SkeletonTable, StaticSources, SynapseTable};
    use crate::state::SegmentId;
    use pretty_assertions::assert_eq;

    fn builder(sources: StaticSources) -> LayerBuilder {
        LayerBuilder::from_sources(sources)
    }

    fn only_segmentation(outcome: &BuildOutcome) -> &SegmentationLayer {
        match outcome.layers() {
            [layer] => layer.as_segmentation().expect("segmentation layer"),
            other => panic!("expected one layer, got {}", other.len()),
        }
    }

    #[test]
    fn test_volumes_broadcast_single_color() {
        let sources = StaticSources::new().with_host("example.org").with_segments([1, 2, 3]);
        let request = LayerRequest::new(LayerKind::Volumes, "v.obj").with_colors(["#ff0000"]);

        let outcome = builder(sources).build(&request).unwrap();
        let layer = only_segmentation(&outcome);

        assert_eq!(layer.name, "volumes");
        assert_eq!(
            layer.mesh.as_deref(),
            Some("precomputed://example.org/precomputed/volumes/mesh")
        );
        for id in [1, 2, 3] {
            assert_eq!(layer.color_of(SegmentId(id)), Some("#ff0000"));
        }
        assert!(layer.colors_cover_segments());
    }

    #[test]
    fn test_volumes_use_request_name() {
        let sources = StaticSources::new().with_host("h").with_segments([4, 5]);
        let request = LayerRequest::new(LayerKind::Volumes, "v.obj")
            .with_name("neuropils")
            .with_colors(["#010101", "#020202"]);

        let outcome = builder(sources).build(&request).unwrap();
        let layer = only_segmentation(&outcome);

        assert_eq!(layer.name, "neuropils");
        assert_eq!(
            layer.mesh.as_deref(),
            Some("precomputed://h/precomputed/neuropils/mesh")
        );
        assert_eq!(layer.color_of(SegmentId(5)), Some("#020202"));
    }

    #[test]
    fn test_precomputed_skeletons() {
        let sources = StaticSources::new().with_host("localhost:8000").with_segments([9, 8]);
        let request = LayerRequest::new(LayerKind::Skeletons, "skids")
            .with_colors(["#aa0000", "#00aa00"])
            .with_alpha(0.7);

        let outcome = builder(sources).build(&request).unwrap();
        let layer = only_segmentation(&outcome);

        assert_eq!(layer.name, SKELETON_LAYER);
        assert_eq!(
            layer.skeletons.as_deref(),
            Some("precomputed://localhost:8000/precomputed/skeletons")
        );
        assert_eq!(layer.skeleton_rendering, Some(SkeletonRendering::default()));
        assert_eq!(layer.object_alpha, Some(0.7));
        assert_eq!(layer.segment_ids().to_vec(), vec![SegmentId(9), SegmentId(8)]);
        assert_eq!(layer.color_of(SegmentId(9)), Some("#aa0000"));
    }

    #[test]
    fn test_styling_mismatch_fails_build() {
        let sources = StaticSources::new().with_host("h").with_segments([1, 2, 3]);
        let request =
            LayerRequest::new(LayerKind::Skeletons, "skids").with_colors(["#000001", "#000002"]);

        let err = builder(sources).build(&request).unwrap_err();
        assert!(matches!(
            err,
            GlancerError::StylingMismatch {
                colors: 2,
                segments: 3
            }
        ));
    }

    #[test]
    fn test_constructed_skeletons_one_layer_each() {
        let line = LineSegment {
            point_a: [0.0, 0.0, 0.0],
            point_b: [1.0, 2.0, 3.0],
        };
        let sources = StaticSources::new()
            .with_skeleton(SkeletonTable {
                id: SegmentId(11),
                lines: vec![line.clone(), line],
            })
            .with_skeleton(SkeletonTable {
                id: SegmentId(12),
                lines: vec![],
            });
        let request = LayerRequest::new(LayerKind::Skeletons, "skids")
            .with_colors(["#123456", "#654321"])
            .with_annotation_mode(AnnotationMode::Constructed);

        let outcome = builder(sources).build(&request).unwrap();
        let names: Vec<_> = outcome.layers().iter().filter_map(Layer::name).collect();
        assert_eq!(names, vec!["skel_annot_11", "skel_annot_12"]);

        let first = outcome.layers()[0].as_annotation().unwrap();
        assert_eq!(first.annotation_color.as_deref(), Some("#123456"));
        assert_eq!(first.annotations().len(), 2);
        assert!(matches!(first.annotations()[0], Annotation::Line { .. }));
    }

    #[test]
    fn test_precomputed_synapses_link_to_skeleton() {
        let sources = StaticSources::new().with_host("h");
        let request = LayerRequest::new(LayerKind::Synapses, "skids");

        let outcome = builder(sources).build(&request).unwrap();
        let layers: Vec<_> = outcome
            .layers()
            .iter()
            .map(|l| l.as_annotation().unwrap())
            .collect();

        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].name, PRESYNAPSE_LAYER);
        assert_eq!(layers[1].name, POSTSYNAPSE_LAYER);
        assert_eq!(
            layers[0].source.as_deref(),
            Some("precomputed://h/precomputed/presynapses")
        );
        assert_eq!(layers[1].annotation_color.as_deref(), Some(POSTSYNAPSE_COLOR));
        for layer in &layers {
            let links = layer.linked_segmentation_layer.as_ref().unwrap();
            assert!(links.values().all(|target| target == SKELETON_LAYER));
        }
        assert_eq!(
            layers[0].filter_by_segmentation,
            Some(vec![POSTSYNAPSE_ROLE.to_string()])
        );
        assert_eq!(
            layers[1].filter_by_segmentation,
            Some(vec![PRESYNAPSE_ROLE.to_string()])
        );
    }

    #[test]
    fn test_constructed_synapses_pair_per_neuron() {
        let sources = StaticSources::new()
            .with_synapses(SynapseTable {
                id: SegmentId(3),
                pre_synapses: vec![[1.0, 1.0, 1.0]],
                post_synapses: vec![[2.0, 2.0, 2.0], [3.0, 3.0, 3.0]],
            })
            .with_synapses(SynapseTable {
                id: SegmentId(4),
                pre_synapses: vec![],
                post_synapses: vec![],
            });
        let request = LayerRequest::new(LayerKind::Synapses, "skids")
            .with_colors(["#00ff00", "#ff00ff"])
            .with_annotation_mode(AnnotationMode::Constructed);

        let outcome = builder(sources).build(&request).unwrap();
        let names: Vec<_> = outcome.layers().iter().filter_map(Layer::name).collect();
        assert_eq!(
            names,
            vec!["postsyn_annot_3", "presyn_annot_3", "postsyn_annot_4", "presyn_annot_4"]
        );

        let post = outcome.layers()[0].as_annotation().unwrap();
        let pre = outcome.layers()[1].as_annotation().unwrap();
        assert_eq!(post.annotation_color.as_deref(), Some("#00ff00"));
        assert_eq!(pre.annotation_color.as_deref(), Some("#ff00ff"));
        assert_eq!(post.annotations().len(), 2);
        assert_eq!(pre.annotations().len(), 1);
    }

    #[test]
    fn test_constructed_synapses_single_color_colors_both() {
        let sources = StaticSources::new().with_synapses(SynapseTable {
            id: SegmentId(77),
            pre_synapses: vec![[1.0, 1.0, 1.0]],
            post_synapses: vec![[2.0, 2.0, 2.0]],
        });
        let request = LayerRequest::new(LayerKind::Synapses, "skids")
            .with_colors(["#123456"])
            .with_annotation_mode(AnnotationMode::Constructed);

        let outcome = builder(sources).build(&request).unwrap();
        let layers: Vec<_> = outcome
            .layers()
            .iter()
            .map(|l| l.as_annotation().unwrap())
            .collect();

        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].name, "postsyn_annot_77");
        assert_eq!(layers[1].name, "presyn_annot_77");
        for layer in &layers {
            assert_eq!(layer.annotation_color.as_deref(), Some("#123456"));
        }
    }

    #[test]
    fn test_points_layer() {
        let sources = StaticSources::new().with_host("h").with_point_layer("somepoints");
        let request = LayerRequest::new(LayerKind::Points, "pts.csv");

        let outcome = builder(sources).build(&request).unwrap();
        let layer = outcome.layers()[0].as_annotation().unwrap();

        assert_eq!(layer.name, "somepoints");
        assert_eq!(
            layer.source.as_deref(),
            Some("precomputed://h/precomputed/somepoints")
        );
        assert_eq!(layer.annotation_color.as_deref(), Some(POINT_COLOR));
    }

    #[test]
    fn test_unsupported_type() {
        let request = LayerRequest::new("foo", "x");
        let outcome = builder(StaticSources::new()).build(&request).unwrap();
        assert_eq!(
            outcome,
            BuildOutcome::Unsupported {
                layer_type: "foo".to_string()
            }
        );
        assert!(outcome.layers().is_empty());
    }

    #[test]
    fn test_empty_palette_from_custom_resolver() {
        struct NoColors;
        impl StyleResolver for NoColors {
            fn resolve(&self, _request: &LayerRequest) -> Result<ResolvedStyle> {
                Ok(ResolvedStyle {
                    colors: vec![],
                    alpha: 1.0,
                    scale: 1.0,
                    mode: AnnotationMode::Constructed,
                })
            }
        }

        let builder = builder(StaticSources::new()).with_style_resolver(Arc::new(NoColors));
        let err = builder
            .build(&LayerRequest::new(LayerKind::Skeletons, "skids"))
            .unwrap_err();
        assert_eq!(err.error_code(), "EMPTY_PALETTE");
    }
}
