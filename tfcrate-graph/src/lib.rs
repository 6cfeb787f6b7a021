//! # TfCrate Graph
//!
//! Transform graph resolution for streamed robot telemetry.
//!
//! This crate stores the latest transform per parent/child edge, builds a
//! tree of world poses from a chosen root frame, and re-expresses data given
//! in any placed frame in that root frame. It also selects root frames and
//! produces line geometry for drawing the tree.

pub mod store;
pub mod tree;
pub mod resolver;
pub mod selection;
pub mod overlay;
pub mod session;

// Re-export commonly used items
pub use store::*;
pub use tree::*;
pub use resolver::*;
pub use selection::*;
pub use overlay::*;
pub use session::*;
