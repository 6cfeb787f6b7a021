//! Core data structures and traits for tfcrate
//!
//! This crate provides the fundamental types for transform-graph resolution:
//! double precision vectors and unit quaternions with their telemetry wire
//! shapes, poses and the pose compositor, validated transform edges, and the
//! resolver configuration.

pub mod point;
pub mod pose;
pub mod transform;
pub mod traits;
pub mod config;
pub mod error;

pub use point::*;
pub use pose::*;
pub use transform::*;
pub use traits::*;
pub use config::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Isometry3, Quaternion, UnitQuaternion, Vector3};
