//! Layer records
//!
//! A layer is one visual element of the viewer state, discriminated by its
//! `type` key. Image, segmentation and annotation layers are typed; anything
//! else the viewer emits is carried as opaque JSON so that merging never drops
//! or rewrites a layer it does not understand.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::segment::SegmentId;

/// A 3D coordinate in viewer space.
pub type Point3 = [f64; 3];

/// How skeletons are drawn in one of the viewer panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    Lines,
    LinesAndPoints,
}

/// Skeleton rendering for the 2D cross-section and 3D panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkeletonRendering {
    pub mode2d: RenderMode,
    pub mode3d: RenderMode,
}

impl Default for SkeletonRendering {
    fn default() -> Self {
        Self {
            mode2d: RenderMode::LinesAndPoints,
            mode3d: RenderMode::Lines,
        }
    }
}

/// Raw volumetric data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageLayer {
    #[serde(default)]
    pub name: String,
    pub source: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ImageLayer {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            extra: Map::new(),
        }
    }
}

/// Meshes or skeletons for an ordered set of segments, each with a color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentationLayer {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skeletons: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skeleton_rendering: Option<SkeletonRendering>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<SegmentId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_colors: Option<IndexMap<SegmentId, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_alpha: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SegmentationLayer {
    /// Create a layer for `segments` with the given colors.
    ///
    /// Callers build `segment_colors` through
    /// [`ColorAssignment`](crate::style::ColorAssignment), which keeps the key
    /// set equal to the segment set.
    pub fn new(
        name: impl Into<String>,
        segments: Vec<SegmentId>,
        segment_colors: IndexMap<SegmentId, String>,
    ) -> Self {
        Self {
            name: name.into(),
            source: None,
            mesh: None,
            skeletons: None,
            skeleton_rendering: None,
            segments: Some(segments),
            segment_colors: Some(segment_colors),
            object_alpha: None,
            extra: Map::new(),
        }
    }

    pub fn with_mesh(mut self, mesh: impl Into<String>) -> Self {
        self.mesh = Some(mesh.into());
        self
    }

    pub fn with_skeletons(mut self, skeletons: impl Into<String>) -> Self {
        self.skeletons = Some(skeletons.into());
        self
    }

    pub fn with_rendering(mut self, rendering: SkeletonRendering) -> Self {
        self.skeleton_rendering = Some(rendering);
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.object_alpha = Some(alpha);
        self
    }

    pub fn segment_ids(&self) -> &[SegmentId] {
        self.segments.as_deref().unwrap_or(&[])
    }

    pub fn color_of(&self, id: SegmentId) -> Option<&str> {
        self.segment_colors
            .as_ref()
            .and_then(|colors| colors.get(&id))
            .map(String::as_str)
    }

    /// True when every colored segment is in the layer and every segment has a color.
    pub fn colors_cover_segments(&self) -> bool {
        let segments = self.segment_ids();
        match &self.segment_colors {
            Some(colors) => {
                colors.keys().all(|id| segments.contains(id))
                    && segments.iter().all(|id| colors.contains_key(id))
            }
            None => segments.is_empty(),
        }
    }
}

/// One inline annotation of a constructed layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Annotation {
    Point {
        point: Point3,
        id: String,
        /// Description, segments, properties and other keys the viewer attaches.
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    Line {
        #[serde(rename = "pointA")]
        point_a: Point3,
        #[serde(rename = "pointB")]
        point_b: Point3,
        id: String,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
}

impl Annotation {
    pub fn point(point: Point3) -> Self {
        Annotation::Point {
            point,
            id: new_annotation_id(),
            extra: Map::new(),
        }
    }

    pub fn line(point_a: Point3, point_b: Point3) -> Self {
        Annotation::Line {
            point_a,
            point_b,
            id: new_annotation_id(),
            extra: Map::new(),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Annotation::Point { id, .. } | Annotation::Line { id, .. } => id,
        }
    }
}

fn new_annotation_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Points or lines, either from a precomputed source or listed inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationLayer {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation_color: Option<String>,
    /// Annotation relationship (e.g. `presynapses_cell`) to segmentation layer name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_segmentation_layer: Option<IndexMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_by_segmentation: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Vec<Annotation>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AnnotationLayer {
    /// Layer backed by a precomputed annotation source.
    pub fn precomputed(
        name: impl Into<String>,
        source: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            source: Some(source.into()),
            annotation_color: Some(color.into()),
            linked_segmentation_layer: None,
            filter_by_segmentation: None,
            tool: None,
            annotations: None,
            extra: Map::new(),
        }
    }

    /// Layer whose annotations are listed inline in the state.
    pub fn inline(
        name: impl Into<String>,
        color: impl Into<String>,
        annotations: Vec<Annotation>,
    ) -> Self {
        let tool = match annotations.first() {
            Some(Annotation::Line { .. }) => "annotateLine",
            _ => "annotatePoint",
        };
        Self {
            name: name.into(),
            source: None,
            annotation_color: Some(color.into()),
            linked_segmentation_layer: None,
            filter_by_segmentation: None,
            tool: Some(tool.to_string()),
            annotations: Some(annotations),
            extra: Map::new(),
        }
    }

    pub fn annotations(&self) -> &[Annotation] {
        self.annotations.as_deref().unwrap_or(&[])
    }

    /// Link an annotation relationship to a segmentation layer by name.
    pub fn linked_to(mut self, relationship: &str, segmentation_layer: &str) -> Self {
        self.linked_segmentation_layer
            .get_or_insert_with(IndexMap::new)
            .insert(relationship.to_string(), segmentation_layer.to_string());
        self
    }

    pub fn filtered_by(mut self, relationship: &str) -> Self {
        self.filter_by_segmentation
            .get_or_insert_with(Vec::new)
            .push(relationship.to_string());
        self
    }
}

/// One layer of a viewer state.
#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    Image(ImageLayer),
    Segmentation(SegmentationLayer),
    Annotation(AnnotationLayer),
    /// A layer type this crate does not model, kept verbatim.
    Opaque(Value),
}

impl Layer {
    /// Interpret a JSON layer, falling back to [`Layer::Opaque`].
    ///
    /// A layer is only typed when writing it back yields the same JSON, so
    /// decoding and re-publishing never changes a layer.
    pub fn from_value(value: Value) -> Self {
        let layer_type = value.get("type").and_then(Value::as_str).unwrap_or("<none>");
        let typed = match layer_type {
            "image" => parse_body(&value).map(Layer::Image),
            "segmentation" => parse_body(&value).map(Layer::Segmentation),
            "annotation" => parse_body(&value).map(Layer::Annotation),
            _ => None,
        };

        match typed {
            Some(layer) if serde_json::to_value(&layer).ok().as_ref() == Some(&value) => layer,
            _ => {
                tracing::debug!(layer_type, "keeping layer as opaque JSON");
                Layer::Opaque(value)
            }
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Layer::Image(l) => Some(&l.name),
            Layer::Segmentation(l) => Some(&l.name),
            Layer::Annotation(l) => Some(&l.name),
            Layer::Opaque(v) => v.get("name").and_then(Value::as_str),
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            Layer::Image(_) => "image",
            Layer::Segmentation(_) => "segmentation",
            Layer::Annotation(_) => "annotation",
            Layer::Opaque(v) => v.get("type").and_then(Value::as_str).unwrap_or("unknown"),
        }
    }

    pub fn as_segmentation(&self) -> Option<&SegmentationLayer> {
        match self {
            Layer::Segmentation(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_annotation(&self) -> Option<&AnnotationLayer> {
        match self {
            Layer::Annotation(l) => Some(l),
            _ => None,
        }
    }
}

fn parse_body<T: DeserializeOwned>(value: &Value) -> Option<T> {
    let mut body = value.clone();
    if let Value::Object(map) = &mut body {
        map.remove("type");
    }
    serde_json::from_value(body).ok()
}

impl From<ImageLayer> for Layer {
    fn from(layer: ImageLayer) -> Self {
        Layer::Image(layer)
    }
}

impl From<SegmentationLayer> for Layer {
    fn from(layer: SegmentationLayer) -> Self {
        Layer::Segmentation(layer)
    }
}

impl From<AnnotationLayer> for Layer {
    fn from(layer: AnnotationLayer) -> Self {
        Layer::Annotation(layer)
    }
}

impl Serialize for Layer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        #[serde(tag = "type", rename_all = "lowercase")]
        enum Tagged<'a> {
            Image(&'a ImageLayer),
            Segmentation(&'a SegmentationLayer),
            Annotation(&'a AnnotationLayer),
        }

        match self {
            Layer::Image(l) => Tagged::Image(l).serialize(serializer),
            Layer::Segmentation(l) => Tagged::Segmentation(l).serialize(serializer),
            Layer::Annotation(l) => Tagged::Annotation(l).serialize(serializer),
            Layer::Opaque(v) => v.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Layer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Layer::from_value)
    }
}
