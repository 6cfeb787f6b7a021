//! Transform message shapes
//!
//! Two producers are understood: the flat shape used by lightweight
//! publishers, and ROS `geometry_msgs/TransformStamped`, optionally wrapped
//! in a `tf2_msgs/TFMessage`. Both decode to [`RawTransform`] and are
//! validated later, at ingest.

use serde::{Deserialize, Serialize};
use tfcrate_core::{RawQuaternion, RawTransform, RawVector3, Transform};

/// `std_msgs/Header`, reduced to the frame id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Header {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_id: Option<String>,
}

/// `geometry_msgs/Transform`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StampedPayload {
    #[serde(default)]
    pub translation: Option<RawVector3>,
    #[serde(default)]
    pub rotation: Option<RawQuaternion>,
}

/// `geometry_msgs/TransformStamped`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformStamped {
    #[serde(default)]
    pub header: Header,
    #[serde(default)]
    pub child_frame_id: Option<String>,
    pub transform: StampedPayload,
}

impl From<TransformStamped> for RawTransform {
    fn from(msg: TransformStamped) -> Self {
        Self {
            parent_frame: msg.header.frame_id,
            child_frame: msg.child_frame_id,
            translation: msg.transform.translation,
            rotation: msg.transform.rotation,
        }
    }
}

impl From<&Transform> for TransformStamped {
    fn from(t: &Transform) -> Self {
        Self {
            header: Header {
                frame_id: Some(t.parent_frame.clone()),
            },
            child_frame_id: Some(t.child_frame.clone()),
            transform: StampedPayload {
                translation: Some(t.translation.into()),
                rotation: Some(t.rotation.into()),
            },
        }
    }
}

/// One transform record in either accepted shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransformMessage {
    /// Tried first: it requires a `transform` member
    Stamped(TransformStamped),
    /// Every member is optional, so this matches any remaining object
    Flat(RawTransform),
}

impl From<TransformMessage> for RawTransform {
    fn from(msg: TransformMessage) -> Self {
        match msg {
            TransformMessage::Stamped(stamped) => stamped.into(),
            TransformMessage::Flat(raw) => raw,
        }
    }
}

/// `tf2_msgs/TFMessage`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TfMessage {
    pub transforms: Vec<TransformMessage>,
}

impl TfMessage {
    /// Encode validated transforms in the ROS stamped shape
    pub fn from_transforms<'a, I: IntoIterator<Item = &'a Transform>>(transforms: I) -> Self {
        Self {
            transforms: transforms
                .into_iter()
                .map(|t| TransformMessage::Stamped(t.into()))
                .collect(),
        }
    }
}

/// Top-level layouts accepted by [`parse_transforms`](crate::parse_transforms)
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum TransformPayload {
    Wrapped(TfMessage),
    Many(Vec<TransformMessage>),
    One(TransformMessage),
}

impl TransformPayload {
    pub(crate) fn into_raw(self) -> Vec<RawTransform> {
        match self {
            TransformPayload::Wrapped(msg) => msg.transforms.into_iter().map(Into::into).collect(),
            TransformPayload::Many(msgs) => msgs.into_iter().map(Into::into).collect(),
            TransformPayload::One(msg) => vec![msg.into()],
        }
    }
}
