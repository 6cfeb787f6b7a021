//! Integration tests for tfcrate-graph
//!
//! These tests drive the store, tree builder and transformer together the way
//! a telemetry consumer does: ingest raw records, build from a root, then
//! re-express data from sensor frames.

use approx::assert_relative_eq;
use std::f64::consts::FRAC_PI_2;
use tfcrate_core::*;
use tfcrate_graph::*;

fn raw(parent: &str, child: &str, t: [f64; 3], yaw: f64) -> RawTransform {
    let q = UnitQuaterniond::from_euler_angles(0.0, 0.0, yaw);
    RawTransform {
        parent_frame: Some(parent.to_string()),
        child_frame: Some(child.to_string()),
        translation: Some(RawVector3::new(t[0], t[1], t[2])),
        rotation: Some(RawQuaternion::from(q)),
    }
}

/// map -> odom -> base_link -> {laser, camera}, plus a detached gps chain
fn robot_store() -> TransformStore {
    let mut store = TransformStore::new();
    let report = store.ingest_batch(vec![
        raw("map", "odom", [0.0, 0.0, 0.0], 0.0),
        raw("odom", "base_link", [2.0, 1.0, 0.0], FRAC_PI_2),
        raw("base_link", "laser", [0.2, 0.0, 0.3], 0.0),
        raw("base_link", "camera", [0.1, 0.0, 0.5], -FRAC_PI_2),
        raw("gps_origin", "gps", [5.0, 5.0, 0.0], 0.0),
    ]);
    assert_eq!(report.accepted, 5);
    assert_eq!(report.rejected, 0);
    store
}

#[test]
fn test_end_to_end_laser_scan() {
    let store = robot_store();
    let tree = build_tree("map", &store.snapshot());
    let tf = FrameTransformer::new(&tree);

    // base_link faces +Y in map, so a laser hit 1m ahead lands at +Y
    let hit = tf.transform_point(&Vector3d::new(1.0, 0.0, 0.0), "laser");
    assert_relative_eq!(hit, Vector3d::new(2.0, 2.2, 0.3), epsilon = 1e-12);

    // Map data passes through untouched
    let p = Vector3d::new(0.3, 0.7, 1.1);
    assert_eq!(tf.transform_point(&p, "map"), p);
    // odom is an identity child of map
    assert_eq!(tf.transform_point(&p, "odom"), p);
}

#[test]
fn test_detached_chain_is_excluded() {
    let store = robot_store();
    let snapshot = store.snapshot();
    let tree = build_tree("map", &snapshot);

    assert_eq!(tree.len(), 4);
    assert!(!tree.contains("gps"));
    assert_eq!(tree.excluded_frames(&snapshot), vec!["gps", "gps_origin"]);

    let tf = FrameTransformer::new(&tree);
    let p = Vector3d::new(1.0, 2.0, 3.0);
    assert_eq!(tf.transform_point(&p, "gps"), p);
}

#[test]
fn test_latest_transform_wins_after_rebuild() {
    let mut store = robot_store();
    let before = build_tree("map", &store.snapshot());

    assert!(!store.ingest(raw("odom", "base_link", [4.0, 0.0, 0.0], 0.0)).unwrap());
    let after = build_tree("map", &store.snapshot());

    // The earlier tree is a value and does not observe later ingestion
    assert_relative_eq!(
        before.get("base_link").unwrap().world_position,
        Vector3d::new(2.0, 1.0, 0.0),
        epsilon = 1e-12
    );
    assert_relative_eq!(
        after.get("laser").unwrap().world_position,
        Vector3d::new(4.2, 0.0, 0.3),
        epsilon = 1e-12
    );
}

#[test]
fn test_world_pose_matches_isometry_chain() {
    let store = robot_store();
    let snapshot = store.snapshot();
    let tree = build_tree("map", &snapshot);

    let iso = |parent: &str, child: &str| {
        snapshot.get(parent, child).unwrap().local_pose().to_isometry()
    };
    let expected = iso("map", "odom") * iso("odom", "base_link") * iso("base_link", "camera");
    let camera = tree.get("camera").unwrap().world_pose().to_isometry();

    assert_relative_eq!(camera.translation.vector, expected.translation.vector, epsilon = 1e-9);
    assert!(camera.rotation.angle_to(&expected.rotation) < 1e-9);
}

#[test]
fn test_cycle_terminates_for_both_strategies() {
    let mut store = TransformStore::new();
    store.ingest_batch(vec![
        raw("A", "B", [1.0, 0.0, 0.0], 0.0),
        raw("B", "C", [1.0, 0.0, 0.0], 0.0),
        raw("C", "A", [1.0, 0.0, 0.0], 0.0),
    ]);
    let snapshot = store.snapshot();

    for strategy in [BuildStrategy::Indexed, BuildStrategy::Rescan] {
        let tree = TreeBuilder::new(strategy).build("A", &snapshot);
        let frames: Vec<&str> = tree.frame_ids().collect();
        assert_eq!(frames, vec!["B", "C"]);
        assert_relative_eq!(tree.get("C").unwrap().world_position.x, 2.0, epsilon = 1e-12);
    }
}

#[test]
fn test_malformed_records_leave_store_untouched() {
    let mut store = robot_store();
    let before = store.snapshot();

    let report = store.ingest_batch(vec![
        RawTransform {
            parent_frame: Some("map".to_string()),
            child_frame: None,
            translation: Some(RawVector3::default()),
            rotation: Some(RawQuaternion::default()),
        },
        RawTransform {
            parent_frame: Some("map".to_string()),
            child_frame: Some("x".to_string()),
            translation: None,
            rotation: Some(RawQuaternion::default()),
        },
    ]);

    assert_eq!(report.accepted, 0);
    assert_eq!(report.rejected, 2);
    assert!(!report.new_frames);
    assert_eq!(store.snapshot(), before);
}

#[test]
fn test_root_selection_drives_overlay() {
    let store = robot_store();
    let snapshot = store.snapshot();
    let candidates = candidate_roots(&snapshot);
    assert_eq!(candidates, vec!["base_link", "gps_origin", "map", "odom"]);

    let root = select_root(None, &candidates, DEFAULT_ROOT_FRAME).unwrap();
    assert_eq!(root, "map");

    let tree = build_tree(&root, &snapshot);
    assert_eq!(frame_axes(&tree, 0.1).len(), tree.len() * 6);
    assert_eq!(frame_links(&tree).len(), tree.len() * 2);
}

#[test]
fn test_shared_store_feeds_session_like_consumer() {
    let shared = SharedTransformStore::new();
    let producer = shared.clone();
    let handle = std::thread::spawn(move || {
        producer
            .ingest_batch(vec![
                raw("map", "base_link", [1.0, 0.0, 0.0], 0.0),
                raw("base_link", "laser", [0.0, 0.0, 0.5], 0.0),
            ])
            .unwrap()
    });
    let report = handle.join().unwrap();
    assert!(report.new_frames);

    let snapshot = shared.snapshot().unwrap();
    let tree = build_tree("map", &snapshot);
    let tf = FrameTransformer::new(&tree);
    let out = tf.transform_batch(&[Vector3d::zeros(), Vector3d::x()], "laser");
    assert_relative_eq!(out[0], Vector3d::new(1.0, 0.0, 0.5), epsilon = 1e-12);
    assert_relative_eq!(out[1], Vector3d::new(2.0, 0.0, 0.5), epsilon = 1e-12);
}
