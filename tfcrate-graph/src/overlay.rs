//! Line geometry for drawing a transform tree
//!
//! Produces renderer-agnostic line lists: every consecutive pair of vertices
//! is one segment. Vertices are `#[repr(C)]` and `Pod` so they can be copied
//! straight into a vertex buffer.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use tfcrate_core::Vector3d;

use crate::tree::TransformTree;

pub const AXIS_X_COLOR: [f32; 4] = [1.0, 0.2, 0.2, 1.0];
pub const AXIS_Y_COLOR: [f32; 4] = [0.2, 1.0, 0.2, 1.0];
pub const AXIS_Z_COLOR: [f32; 4] = [0.2, 0.6, 1.0, 1.0];
pub const LINK_COLOR: [f32; 4] = [0.7, 0.7, 0.7, 0.6];

/// One endpoint of a line segment
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl LineVertex {
    pub fn new(position: &Vector3d, color: [f32; 4]) -> Self {
        Self {
            position: [position.x as f32, position.y as f32, position.z as f32],
            color,
        }
    }

    /// Raw bytes of a vertex slice, for buffer upload
    pub fn as_bytes(vertices: &[LineVertex]) -> &[u8] {
        bytemuck::cast_slice(vertices)
    }
}

/// Axis length to draw with; anything non-finite or non-positive means 1.0
pub fn effective_axis_scale(scale: f64) -> f64 {
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    }
}

fn push_segment(out: &mut Vec<LineVertex>, from: &Vector3d, to: &Vector3d, color: [f32; 4]) {
    out.push(LineVertex::new(from, color));
    out.push(LineVertex::new(to, color));
}

/// An oriented X/Y/Z triad at every frame in the tree
pub fn frame_axes(tree: &TransformTree, scale: f64) -> Vec<LineVertex> {
    let scale = effective_axis_scale(scale);
    let mut out = Vec::with_capacity(tree.len() * 6);

    for node in tree.nodes() {
        let origin = node.world_position;
        let q = node.world_orientation;
        for (axis, color) in [
            (Vector3d::x(), AXIS_X_COLOR),
            (Vector3d::y(), AXIS_Y_COLOR),
            (Vector3d::z(), AXIS_Z_COLOR),
        ] {
            let tip = origin + (q * axis) * scale;
            push_segment(&mut out, &origin, &tip, color);
        }
    }
    out
}

/// A segment from each frame's parent to the frame
pub fn frame_links(tree: &TransformTree) -> Vec<LineVertex> {
    let mut out = Vec::with_capacity(tree.len() * 2);
    for node in tree.nodes() {
        push_segment(&mut out, &node.parent_world_position, &node.world_position, LINK_COLOR);
    }
    out
}
