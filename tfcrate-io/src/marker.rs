//! Frame-tagged entity batches
//!
//! A marker is any detected object a perception node publishes in its own
//! frame: an id, an optional size, an optional pose and optional point
//! lists. Only the geometry is touched when re-expressing a marker; every
//! other member, known or not, is written back as it was read.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use tfcrate_core::{Pose, RawVector3, Transformable};

use crate::message::Header;

/// One frame-tagged entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// `Some(Value::Null)` is an explicit `"id": null`, `None` an absent id
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Value>,
    /// Kept as a JSON number so integers are written back as integers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pose: Option<Pose>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<RawVector3>>,
    /// ArUco detectors publish the four marker corners here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corners: Option<Vec<RawVector3>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Marker {
    pub fn new(id: impl Into<Value>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    pub fn with_pose(mut self, pose: Pose) -> Self {
        self.pose = Some(pose);
        self
    }

    /// A non-finite size cannot be written as JSON and clears the size
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = Number::from_f64(size);
        self
    }

    pub fn size(&self) -> Option<f64> {
        self.size.as_ref().and_then(Number::as_f64)
    }

    pub fn with_corners(mut self, corners: Vec<RawVector3>) -> Self {
        self.corners = Some(corners);
        self
    }

    /// Whether the marker carries anything a frame change would move
    pub fn has_geometry(&self) -> bool {
        self.pose.is_some() || self.points.is_some() || self.corners.is_some()
    }
}

/// Deserializes a member that is present, keeping `null` as `Some(Value::Null)`
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl Transformable for Marker {
    fn transform(&mut self, frame: &Pose) {
        self.pose.transform(frame);
        self.points.transform(frame);
        self.corners.transform(frame);
    }
}

/// A batch of markers and the frame they were published in
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkerArray {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<Header>,
    pub markers: Vec<Marker>,
}

impl MarkerArray {
    pub fn new(markers: Vec<Marker>) -> Self {
        Self {
            header: None,
            markers,
        }
    }

    /// The publishing frame from the header, if any
    pub fn frame_id(&self) -> Option<&str> {
        self.header
            .as_ref()
            .and_then(|h| h.frame_id.as_deref())
            .filter(|f| !f.is_empty())
    }
}

/// Top-level layouts accepted by [`parse_markers`](crate::parse_markers)
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum MarkerPayload {
    Wrapped(MarkerArray),
    Many(Vec<Marker>),
}

impl From<MarkerPayload> for MarkerArray {
    fn from(payload: MarkerPayload) -> Self {
        match payload {
            MarkerPayload::Wrapped(array) => array,
            MarkerPayload::Many(markers) => MarkerArray::new(markers),
        }
    }
}
