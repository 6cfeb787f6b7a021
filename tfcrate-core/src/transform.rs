//! Parent→child transform edges

use crate::error::{Error, MalformedKind, Result};
use crate::point::{RawQuaternion, RawVector3, UnitQuaterniond, Vector3d};
use crate::pose::Pose;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a transform edge: the `(parent, child)` frame pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    pub parent: String,
    pub child: String,
}

impl EdgeKey {
    pub fn new(parent: impl Into<String>, child: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            child: child.into(),
        }
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.parent, self.child)
    }
}

/// A validated rigid transform taking child-frame coordinates into the parent frame
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    pub parent_frame: String,
    pub child_frame: String,
    pub translation: Vector3d,
    pub rotation: UnitQuaterniond,
}

impl Transform {
    pub fn new(
        parent_frame: impl Into<String>,
        child_frame: impl Into<String>,
        translation: Vector3d,
        rotation: UnitQuaterniond,
    ) -> Self {
        Self {
            parent_frame: parent_frame.into(),
            child_frame: child_frame.into(),
            translation,
            rotation,
        }
    }

    /// Transform with a translation and no rotation
    pub fn from_translation(
        parent_frame: impl Into<String>,
        child_frame: impl Into<String>,
        translation: Vector3d,
    ) -> Self {
        Self::new(
            parent_frame,
            child_frame,
            translation,
            UnitQuaterniond::identity(),
        )
    }

    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(self.parent_frame.clone(), self.child_frame.clone())
    }

    /// The local parent→child transform as a pose in the parent frame
    pub fn local_pose(&self) -> Pose {
        Pose::new(self.translation, self.rotation)
    }
}

/// An incoming transform record before structural validation.
///
/// This is the flat message shape:
/// `{ parentFrame, childFrame, translation: {x,y,z}, rotation: {x,y,z,w} }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransform {
    #[serde(default)]
    pub parent_frame: Option<String>,
    #[serde(default)]
    pub child_frame: Option<String>,
    #[serde(default)]
    pub translation: Option<RawVector3>,
    #[serde(default)]
    pub rotation: Option<RawQuaternion>,
}

impl TryFrom<RawTransform> for Transform {
    type Error = Error;

    fn try_from(raw: RawTransform) -> Result<Self> {
        let malformed = Error::MalformedTransform;
        let parent_frame = raw
            .parent_frame
            .filter(|f| !f.is_empty())
            .ok_or(malformed(MalformedKind::MissingParentFrame))?;
        let child_frame = raw
            .child_frame
            .filter(|f| !f.is_empty())
            .ok_or(malformed(MalformedKind::MissingChildFrame))?;
        let translation = raw
            .translation
            .ok_or(malformed(MalformedKind::MissingTranslation))?;
        let rotation = raw
            .rotation
            .ok_or(malformed(MalformedKind::MissingRotation))?;

        Ok(Transform::new(
            parent_frame,
            child_frame,
            translation.to_vector(),
            rotation.to_unit_quaternion(),
        ))
    }
}

impl From<&Transform> for RawTransform {
    fn from(t: &Transform) -> Self {
        Self {
            parent_frame: Some(t.parent_frame.clone()),
            child_frame: Some(t.child_frame.clone()),
            translation: Some(t.translation.into()),
            rotation: Some(t.rotation.into()),
        }
    }
}
