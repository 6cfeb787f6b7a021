//! Transform tree builder
//!
//! Computes the world pose of every frame reachable from a chosen root by
//! walking parent→child edges breadth-first from a worklist. Each frame is
//! placed at most once: the first path that reaches it wins, and any later
//! edge into an already placed frame (a cycle or a second parent) is skipped.
//! Frames that are unreachable or only reachable through such an edge are
//! left out of the tree without a diagnostic.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use log::trace;
use serde::{Deserialize, Serialize};
use tfcrate_core::{
    xyz, xyzw, BuildStrategy, Pose, ResolverConfig, Transform, UnitQuaterniond, Vector3d,
};

use crate::store::Snapshot;

/// World placement of one frame, relative to the tree's root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameNode {
    pub frame_id: String,
    #[serde(with = "xyz")]
    pub world_position: Vector3d,
    #[serde(with = "xyzw")]
    pub world_orientation: UnitQuaterniond,
    pub parent_frame_id: String,
    /// Where the parent sits, for drawing parent→child links
    #[serde(with = "xyz")]
    pub parent_world_position: Vector3d,
}

impl FrameNode {
    pub fn world_pose(&self) -> Pose {
        Pose::new(self.world_position, self.world_orientation)
    }
}

/// The result of one tree build.
///
/// Maps child frame ids to their [`FrameNode`]. The root itself is never an
/// entry; its pose is identity by definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformTree {
    root: String,
    frames: BTreeMap<String, FrameNode>,
}

impl TransformTree {
    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn get(&self, frame_id: &str) -> Option<&FrameNode> {
        self.frames.get(frame_id)
    }

    pub fn contains(&self, frame_id: &str) -> bool {
        self.frames.contains_key(frame_id)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Nodes ordered by frame id
    pub fn nodes(&self) -> impl Iterator<Item = &FrameNode> {
        self.frames.values()
    }

    pub fn frame_ids(&self) -> impl Iterator<Item = &str> {
        self.frames.keys().map(String::as_str)
    }

    /// Frames mentioned in `snapshot` that this tree does not place.
    ///
    /// These are the frames that were unreachable from the root or cut off by
    /// a cycle. The builder itself stays silent about them; this is for callers
    /// that want to surface the omission.
    pub fn excluded_frames(&self, snapshot: &Snapshot) -> Vec<String> {
        snapshot
            .frame_ids()
            .into_iter()
            .filter(|f| *f != self.root && !self.frames.contains_key(*f))
            .map(str::to_string)
            .collect()
    }
}

/// Outgoing-edge lookup used during a build
enum EdgeLookup<'a> {
    /// Adjacency index built once per snapshot
    Indexed(HashMap<&'a str, Vec<&'a Transform>>),
    /// Linear scan over every edge
    Rescan(&'a Snapshot),
}

impl<'a> EdgeLookup<'a> {
    fn new(strategy: BuildStrategy, snapshot: &'a Snapshot) -> Self {
        match strategy {
            BuildStrategy::Indexed => EdgeLookup::Indexed(snapshot.index_by_parent()),
            BuildStrategy::Rescan => EdgeLookup::Rescan(snapshot),
        }
    }

    fn outgoing<'s>(&'s self, parent: &'s str) -> Box<dyn Iterator<Item = &'a Transform> + 's> {
        match self {
            EdgeLookup::Indexed(index) => {
                Box::new(index.get(parent).into_iter().flatten().copied())
            }
            EdgeLookup::Rescan(snapshot) => {
                let snapshot: &'a Snapshot = *snapshot;
                Box::new(snapshot.iter().filter(move |t| t.parent_frame == parent))
            }
        }
    }
}

/// Builds [`TransformTree`]s from store snapshots
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeBuilder {
    strategy: BuildStrategy,
}

impl TreeBuilder {
    pub fn new(strategy: BuildStrategy) -> Self {
        Self { strategy }
    }

    pub fn from_config(config: &ResolverConfig) -> Self {
        Self::new(config.strategy)
    }

    pub fn strategy(&self) -> BuildStrategy {
        self.strategy
    }

    /// Compute the world pose of every frame reachable from `root`.
    ///
    /// An unknown root yields an empty tree.
    pub fn build(&self, root: &str, snapshot: &Snapshot) -> TransformTree {
        let lookup = EdgeLookup::new(self.strategy, snapshot);
        let mut frames = BTreeMap::new();

        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(root);
        let mut queue: VecDeque<(&str, Pose)> = VecDeque::new();
        queue.push_back((root, Pose::identity()));

        let mut skipped = 0usize;
        while let Some((frame, world)) = queue.pop_front() {
            for edge in lookup.outgoing(frame) {
                let child = edge.child_frame.as_str();
                if visited.contains(child) {
                    // Cycle back into the tree, or a second path to a placed frame
                    trace!("Skipping edge {}: {} already placed", edge.key(), child);
                    skipped += 1;
                    continue;
                }
                visited.insert(child);

                let child_world = world.compose(&edge.local_pose());
                frames.insert(
                    child.to_string(),
                    FrameNode {
                        frame_id: child.to_string(),
                        world_position: child_world.position,
                        world_orientation: child_world.orientation,
                        parent_frame_id: frame.to_string(),
                        parent_world_position: world.position,
                    },
                );
                queue.push_back((child, child_world));
            }
        }

        trace!(
            "Built tree rooted at {} ({}): {} frames, {} of {} edges skipped",
            root,
            self.strategy,
            frames.len(),
            skipped,
            snapshot.len()
        );

        TransformTree {
            root: root.to_string(),
            frames,
        }
    }
}

/// Build a tree with the default (indexed) strategy
pub fn build_tree(root: &str, snapshot: &Snapshot) -> TransformTree {
    TreeBuilder::default().build(root, snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tfcrate_core::Isometry3;

    fn edge(
        parent: &str,
        child: &str,
        translation: Vector3d,
        rotation: UnitQuaterniond,
    ) -> Transform {
        Transform::new(parent, child, translation, rotation)
    }

    fn snapshot(edges: Vec<Transform>) -> Snapshot {
        Snapshot::from_transforms(edges)
    }

    #[test]
    fn test_map_base_link_sensor() {
        let snap = snapshot(vec![
            Transform::from_translation("map", "base_link", Vector3d::new(1.0, 0.0, 0.0)),
            Transform::from_translation("base_link", "sensor", Vector3d::new(0.0, 0.0, 0.2)),
        ]);

        let tree = build_tree("map", &snap);
        assert_eq!(tree.len(), 2);
        assert!(!tree.contains("map"));

        let base = tree.get("base_link").unwrap();
        assert_relative_eq!(base.world_position, Vector3d::new(1.0, 0.0, 0.0), epsilon = 1e-12);
        assert_eq!(base.parent_frame_id, "map");
        assert_eq!(base.parent_world_position, Vector3d::zeros());

        let sensor = tree.get("sensor").unwrap();
        assert_relative_eq!(sensor.world_position, Vector3d::new(1.0, 0.0, 0.2), epsilon = 1e-12);
        assert_eq!(sensor.parent_frame_id, "base_link");
        assert_relative_eq!(
            sensor.parent_world_position,
            Vector3d::new(1.0, 0.0, 0.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_chain_matches_manual_composition() {
        let ab = edge(
            "A",
            "B",
            Vector3d::new(0.5, -1.0, 2.0),
            UnitQuaterniond::from_euler_angles(0.3, -0.2, 1.1),
        );
        let bc = edge(
            "B",
            "C",
            Vector3d::new(-3.0, 0.25, 0.75),
            UnitQuaterniond::from_euler_angles(-1.2, 0.4, 0.05),
        );
        let cd = edge(
            "C",
            "D",
            Vector3d::new(1.5, 1.5, -0.5),
            UnitQuaterniond::from_euler_angles(0.9, 0.6, -2.3),
        );

        let manual: Isometry3<f64> = ab.local_pose().to_isometry()
            * bc.local_pose().to_isometry()
            * cd.local_pose().to_isometry();

        let tree = build_tree("A", &snapshot(vec![ab, bc, cd]));
        let d = tree.get("D").unwrap();

        assert_relative_eq!(d.world_position, manual.translation.vector, epsilon = 1e-9);
        let q = d.world_orientation.into_inner();
        let expected = manual.rotation.into_inner();
        // Same rotation may come out with the opposite sign
        let sign = if q.dot(&expected) < 0.0 { -1.0 } else { 1.0 };
        assert_relative_eq!(q.coords * sign, expected.coords, epsilon = 1e-9);
    }

    #[test]
    fn test_cycle_terminates() {
        let snap = snapshot(vec![
            Transform::from_translation("A", "B", Vector3d::x()),
            Transform::from_translation("B", "C", Vector3d::y()),
            Transform::from_translation("C", "A", Vector3d::z()),
        ]);

        for strategy in [BuildStrategy::Indexed, BuildStrategy::Rescan] {
            let tree = TreeBuilder::new(strategy).build("A", &snap);
            let frames: Vec<&str> = tree.frame_ids().collect();
            assert_eq!(frames, vec!["B", "C"]);
            assert!(!tree.contains("A"));
        }
    }

    #[test]
    fn test_first_discovered_path_wins() {
        // D is reachable via B (depth 2) and directly from A (depth 1)
        let snap = snapshot(vec![
            Transform::from_translation("A", "B", Vector3d::new(1.0, 0.0, 0.0)),
            Transform::from_translation("B", "D", Vector3d::new(0.0, 1.0, 0.0)),
            Transform::from_translation("A", "D", Vector3d::new(0.0, 0.0, 5.0)),
        ]);

        let tree = build_tree("A", &snap);
        let d = tree.get("D").unwrap();
        assert_eq!(d.parent_frame_id, "A");
        assert_relative_eq!(d.world_position, Vector3d::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn test_unknown_root_is_empty() {
        let snap = snapshot(vec![Transform::from_translation("map", "odom", Vector3d::x())]);
        let tree = build_tree("nowhere", &snap);
        assert!(tree.is_empty());
        assert_eq!(tree.root(), "nowhere");
    }

    #[test]
    fn test_unreachable_frames_excluded() {
        let snap = snapshot(vec![
            Transform::from_translation("map", "odom", Vector3d::x()),
            Transform::from_translation("camera_rig", "camera", Vector3d::x()),
        ]);
        let tree = build_tree("map", &snap);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.excluded_frames(&snap), vec!["camera", "camera_rig"]);
    }

    #[test]
    fn test_subtree_root() {
        let snap = snapshot(vec![
            Transform::from_translation("map", "base_link", Vector3d::new(4.0, 0.0, 0.0)),
            Transform::from_translation("base_link", "laser", Vector3d::new(0.1, 0.0, 0.3)),
        ]);
        let tree = build_tree("base_link", &snap);
        assert_eq!(tree.len(), 1);
        assert_relative_eq!(
            tree.get("laser").unwrap().world_position,
            Vector3d::new(0.1, 0.0, 0.3)
        );
    }

    #[test]
    fn test_strategies_agree() {
        let mut edges = Vec::new();
        for i in 0..20 {
            let parent = if i == 0 { "root".to_string() } else { format!("f{}", (i - 1) / 2) };
            edges.push(edge(
                &parent,
                &format!("f{}", i),
                Vector3d::new(i as f64 * 0.1, 1.0, -0.5),
                UnitQuaterniond::from_euler_angles(0.01 * i as f64, 0.2, -0.1),
            ));
        }
        // A back-edge and a duplicate path
        edges.push(Transform::from_translation("f7", "f1", Vector3d::x()));
        edges.push(Transform::from_translation("root", "f9", Vector3d::y()));
        let snap = snapshot(edges);

        let indexed = TreeBuilder::new(BuildStrategy::Indexed).build("root", &snap);
        let rescan = TreeBuilder::new(BuildStrategy::Rescan).build("root", &snap);
        assert_eq!(indexed, rescan);
        assert_eq!(indexed.len(), 20);
    }

    #[test]
    fn test_node_world_pose() {
        let snap = snapshot(vec![Transform::from_translation(
            "map",
            "odom",
            Vector3d::new(1.0, 2.0, 3.0),
        )]);
        let tree = build_tree("map", &snap);
        let node = tree.get("odom").unwrap();

        let pose = node.world_pose();
        assert_eq!(pose.position, Vector3d::new(1.0, 2.0, 3.0));
        assert_eq!(pose.orientation, UnitQuaterniond::identity());
    }
}
