//! Core traits for tfcrate

use crate::point::{RawVector3, Vector3d};
use crate::pose::Pose;

/// Trait for objects whose geometry can be re-expressed in another frame
pub trait Transformable {
    /// Apply `frame` (the source frame's pose in the target frame) to every
    /// geometric part of the object. Non-geometric fields stay untouched.
    fn transform(&mut self, frame: &Pose);
}

impl Transformable for Pose {
    fn transform(&mut self, frame: &Pose) {
        *self = frame.compose(self);
    }
}

impl Transformable for Vector3d {
    fn transform(&mut self, frame: &Pose) {
        *self = frame.apply_to_point(self);
    }
}

/// Wire-shaped points are transformed as if absent components were zero
impl Transformable for RawVector3 {
    fn transform(&mut self, frame: &Pose) {
        *self = frame.apply_to_point(&self.to_vector()).into();
    }
}

impl<T: Transformable> Transformable for Option<T> {
    fn transform(&mut self, frame: &Pose) {
        if let Some(inner) = self {
            inner.transform(frame);
        }
    }
}

impl<T: Transformable> Transformable for Vec<T> {
    fn transform(&mut self, frame: &Pose) {
        for item in self.iter_mut() {
            item.transform(frame);
        }
    }
}
