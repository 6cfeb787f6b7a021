//! Vector and quaternion types, and their `{x, y, z[, w]}` wire shapes

use nalgebra::{Quaternion, UnitQuaternion, Vector3};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A 3D vector with double precision components
pub type Vector3d = Vector3<f64>;

/// A unit quaternion with double precision components
pub type UnitQuaterniond = UnitQuaternion<f64>;

/// A `{x, y, z}` object as produced by telemetry sources.
///
/// Every component is optional; absent components read as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawVector3 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
}

impl RawVector3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            z: Some(z),
        }
    }

    /// Resolve to a vector, defaulting absent components to zero
    pub fn to_vector(&self) -> Vector3d {
        Vector3d::new(
            self.x.unwrap_or(0.0),
            self.y.unwrap_or(0.0),
            self.z.unwrap_or(0.0),
        )
    }
}

impl From<Vector3d> for RawVector3 {
    fn from(v: Vector3d) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

/// A `{x, y, z, w}` object as produced by telemetry sources.
///
/// Absent `x`, `y`, `z` read as zero and an absent `w` reads as one, so an
/// empty object is the identity rotation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawQuaternion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w: Option<f64>,
}

impl RawQuaternion {
    pub fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            z: Some(z),
            w: Some(w),
        }
    }

    /// Resolve to a normalized rotation.
    ///
    /// A zero-length quaternion cannot be normalized and resolves to identity.
    pub fn to_unit_quaternion(&self) -> UnitQuaterniond {
        normalize_quaternion(Quaternion::new(
            self.w.unwrap_or(1.0),
            self.x.unwrap_or(0.0),
            self.y.unwrap_or(0.0),
            self.z.unwrap_or(0.0),
        ))
    }
}

impl From<UnitQuaterniond> for RawQuaternion {
    fn from(q: UnitQuaterniond) -> Self {
        let q = q.into_inner();
        Self::new(q.i, q.j, q.k, q.w)
    }
}

/// Normalize a raw quaternion, falling back to identity when it has no length
pub fn normalize_quaternion(q: Quaternion<f64>) -> UnitQuaterniond {
    UnitQuaterniond::try_new(q, f64::EPSILON).unwrap_or_else(UnitQuaterniond::identity)
}

/// Serde adapter writing a [`Vector3d`] as `{x, y, z}`
pub mod xyz {
    use super::*;

    pub fn serialize<S: Serializer>(v: &Vector3d, serializer: S) -> Result<S::Ok, S::Error> {
        RawVector3::from(*v).serialize(serializer)
    }

    /// An explicit `null` reads as the zero vector
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vector3d, D::Error> {
        let raw = Option::<RawVector3>::deserialize(deserializer)?;
        Ok(raw.unwrap_or_default().to_vector())
    }
}

/// Serde adapter writing a [`UnitQuaterniond`] as `{x, y, z, w}`
pub mod xyzw {
    use super::*;

    pub fn serialize<S: Serializer>(q: &UnitQuaterniond, serializer: S) -> Result<S::Ok, S::Error> {
        RawQuaternion::from(*q).serialize(serializer)
    }

    /// An explicit `null` reads as the identity rotation
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<UnitQuaterniond, D::Error> {
        let raw = Option::<RawQuaternion>::deserialize(deserializer)?;
        Ok(raw.unwrap_or_default().to_unit_quaternion())
    }
}
