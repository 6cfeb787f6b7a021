//! # TfCrate
//!
//! Transform-graph resolution for streamed robot telemetry.
//!
//! This is the umbrella crate that provides convenient access to all tfcrate functionality.
//! You can use this crate to get everything in one place, or use individual crates for
//! more granular control over dependencies.
//!
//! ## Features
//!
//! - **Core**: Poses, transform edges, the pose compositor and resolver configuration
//! - **Graph**: Transform store, tree builder, frame transformer, root selection and overlays
//! - **I/O**: JSON codecs for flat and ROS transform messages and marker batches
//!
//! ## Quick Start
//!
//! ```rust
//! use tfcrate::prelude::*;
//!
//! let mut store = TransformStore::new();
//! store.insert(Transform::from_translation("map", "base_link", Vector3d::new(1.0, 0.0, 0.0)));
//! store.insert(Transform::from_translation("base_link", "laser", Vector3d::new(0.0, 0.0, 0.5)));
//!
//! let tree = build_tree("map", &store.snapshot());
//! let transformer = FrameTransformer::new(&tree);
//!
//! let hit = transformer.transform_point(&Vector3d::new(2.0, 0.0, 0.0), "laser");
//! assert_eq!(hit, Vector3d::new(3.0, 0.0, 0.5));
//! ```
//!
//! ## Feature Flags
//!
//! - `default`: Enables core, graph and io
//! - `graph`: Store, tree builder and cross-frame conversion
//! - `io`: JSON message codecs
//! - `all`: Enables all features

// Re-export core functionality
pub use tfcrate_core::*;

// Re-export sub-crates
#[cfg(feature = "graph")]
pub use tfcrate_graph as graph;

#[cfg(feature = "io")]
pub use tfcrate_io as io;

/// Convenient imports for common use cases
pub mod prelude {
    pub use tfcrate_core::*;

    #[cfg(feature = "graph")]
    pub use tfcrate_graph::*;

    #[cfg(feature = "io")]
    pub use tfcrate_io::{parse_markers, parse_transforms, Marker, MarkerArray};
}
