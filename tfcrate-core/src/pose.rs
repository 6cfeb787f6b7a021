//! Poses and the pose compositor
//!
//! Composition follows the parent-first convention: a local transform is
//! expressed in its parent's rotated frame, so
//!
//! ```text
//! child_position    = parent_position + parent_orientation * local_position
//! child_orientation = normalize(parent_orientation * local_orientation)
//! ```

use crate::config::ResolverConfig;
use crate::point::{xyz, xyzw, UnitQuaterniond, Vector3d};
use nalgebra::{Isometry3, Translation3};
use serde::{Deserialize, Serialize};

/// Position and orientation of something within a frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    #[serde(with = "xyz", default = "Vector3d::zeros")]
    pub position: Vector3d,
    #[serde(with = "xyzw", default = "UnitQuaterniond::identity")]
    pub orientation: UnitQuaterniond,
}

impl Pose {
    pub fn new(position: Vector3d, orientation: UnitQuaterniond) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// The identity pose: origin, no rotation
    pub fn identity() -> Self {
        Self::new(Vector3d::zeros(), UnitQuaterniond::identity())
    }

    /// Compose `local` (expressed in this pose's frame) onto this pose
    pub fn compose(&self, local: &Pose) -> Pose {
        let (position, orientation) = compose(
            &self.position,
            &self.orientation,
            &local.position,
            &local.orientation,
        );
        Pose::new(position, orientation)
    }

    /// Map a point expressed in this pose's frame into the enclosing frame
    pub fn apply_to_point(&self, point: &Vector3d) -> Vector3d {
        apply_to_point(&self.position, &self.orientation, point)
    }

    /// True when the pose is close enough to identity that applying it would
    /// only add floating-point noise.
    ///
    /// The rotation test compares the scalar part against one, so the
    /// double-cover identity `w = -1` is not treated as identity.
    pub fn is_effectively_identity(&self, config: &ResolverConfig) -> bool {
        self.position.norm_squared() < config.identity_position_epsilon_sq
            && (1.0 - self.orientation.scalar()).abs() < config.identity_rotation_epsilon
    }

    pub fn to_isometry(&self) -> Isometry3<f64> {
        Isometry3::from_parts(Translation3::from(self.position), self.orientation)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<Isometry3<f64>> for Pose {
    fn from(isometry: Isometry3<f64>) -> Self {
        Self::new(isometry.translation.vector, isometry.rotation)
    }
}

/// Combine a parent world pose with a local parent→child transform.
///
/// Returns the child's world position and orientation. The orientation is
/// renormalized after the Hamilton product.
pub fn compose(
    parent_position: &Vector3d,
    parent_orientation: &UnitQuaterniond,
    local_position: &Vector3d,
    local_orientation: &UnitQuaterniond,
) -> (Vector3d, UnitQuaterniond) {
    let position = parent_position + parent_orientation * local_position;
    let mut orientation = parent_orientation * local_orientation;
    orientation.renormalize();
    (position, orientation)
}

/// Rotate then translate a point. Points carry no orientation.
pub fn apply_to_point(
    position: &Vector3d,
    orientation: &UnitQuaterniond,
    point: &Vector3d,
) -> Vector3d {
    position + orientation * point
}
