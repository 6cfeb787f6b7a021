//! Frame transform utility
//!
//! Re-expresses poses, points and entity batches given in some source frame
//! in the root frame of a [`TransformTree`].
//!
//! Two pass-through rules apply to every operation:
//! - a source frame the tree does not place is not an error; the input comes
//!   back unchanged;
//! - a source transform that is effectively identity is not applied, so
//!   same-frame inputs come back bit-for-bit unchanged.

use tfcrate_core::{Pose, ResolverConfig, Transformable, Vector3d};

use crate::tree::TransformTree;

/// Cross-frame conversion against one built tree
#[derive(Debug, Clone)]
pub struct FrameTransformer<'a> {
    tree: &'a TransformTree,
    config: ResolverConfig,
}

impl<'a> FrameTransformer<'a> {
    pub fn new(tree: &'a TransformTree) -> Self {
        Self::with_config(tree, ResolverConfig::default())
    }

    pub fn with_config(tree: &'a TransformTree, config: ResolverConfig) -> Self {
        Self { tree, config }
    }

    pub fn root(&self) -> &str {
        self.tree.root()
    }

    pub fn tree(&self) -> &'a TransformTree {
        self.tree
    }

    /// Pose of `frame_id` in the root frame.
    ///
    /// The root (or an empty frame id) is identity. Frames the tree does not
    /// place resolve to `None`.
    pub fn world_transform_of(&self, frame_id: &str) -> Option<Pose> {
        if frame_id.is_empty() || frame_id == self.tree.root() {
            return Some(Pose::identity());
        }
        self.tree.get(frame_id).map(|node| node.world_pose())
    }

    /// The transform to apply for `source_frame_id`, or `None` when inputs
    /// should pass through untouched.
    fn effective_transform(&self, source_frame_id: &str) -> Option<Pose> {
        self.world_transform_of(source_frame_id)
            .filter(|frame| !frame.is_effectively_identity(&self.config))
    }

    /// Re-express `pose` from `source_frame_id` in the root frame
    pub fn transform_pose(&self, pose: &Pose, source_frame_id: &str) -> Pose {
        match self.effective_transform(source_frame_id) {
            Some(frame) => frame.compose(pose),
            None => *pose,
        }
    }

    /// Re-express a point from `source_frame_id` in the root frame
    pub fn transform_point(&self, point: &Vector3d, source_frame_id: &str) -> Vector3d {
        match self.effective_transform(source_frame_id) {
            Some(frame) => frame.apply_to_point(point),
            None => *point,
        }
    }

    /// Re-express every entity of a batch from `source_frame_id`.
    ///
    /// The source transform is resolved once for the whole batch. Each entity
    /// is copied and its geometry transformed through [`Transformable`]; other
    /// fields are carried over unchanged. An unresolvable source returns the
    /// batch as is.
    pub fn transform_batch<E>(&self, entities: &[E], source_frame_id: &str) -> Vec<E>
    where
        E: Transformable + Clone,
    {
        let Some(frame) = self.effective_transform(source_frame_id) else {
            return entities.to_vec();
        };

        entities
            .iter()
            .map(|entity| {
                let mut out = entity.clone();
                out.transform(&frame);
                out
            })
            .collect()
    }

    /// In-place variant of [`transform_batch`](Self::transform_batch).
    ///
    /// Returns whether anything was transformed.
    pub fn transform_batch_in_place<E: Transformable>(
        &self,
        entities: &mut [E],
        source_frame_id: &str,
    ) -> bool {
        match self.effective_transform(source_frame_id) {
            Some(frame) => {
                for entity in entities.iter_mut() {
                    entity.transform(&frame);
                }
                true
            }
            None => false,
        }
    }
}
