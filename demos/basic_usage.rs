//! Basic usage example for tfcrate
//!
//! This example demonstrates fundamental operations:
//! - Ingesting transform messages
//! - Building the tree from a root frame
//! - Re-expressing sensor data in the root frame

use std::f64::consts::FRAC_PI_2;

use tfcrate_core::{Pose, Transform, UnitQuaterniond, Vector3d};
use tfcrate_graph::{build_tree, candidate_roots, select_root, FrameTransformer, TransformStore};
use tfcrate_io::parse_transforms;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("tfcrate Basic Usage Example");
    println!("===========================");

    let mut store = TransformStore::new();

    // Messages as a telemetry bridge would deliver them
    let json = r#"{
        "transforms": [
            { "header": { "frame_id": "map" }, "child_frame_id": "odom",
              "transform": { "translation": { "x": 0.0, "y": 0.0, "z": 0.0 },
                             "rotation": { "x": 0.0, "y": 0.0, "z": 0.0, "w": 1.0 } } },
            { "header": { "frame_id": "odom" }, "child_frame_id": "base_link",
              "transform": { "translation": { "x": 2.0, "y": 1.0, "z": 0.0 },
                             "rotation": { "x": 0.0, "y": 0.0, "z": 0.7071068, "w": 0.7071068 } } },
            { "header": { "frame_id": "base_link" }, "child_frame_id": "" ,
              "transform": { "translation": { "x": 0.0 }, "rotation": {} } }
        ]
    }"#;
    let report = store.ingest_batch(parse_transforms(json)?);
    println!(
        "Ingested {} transforms, rejected {}",
        report.accepted, report.rejected
    );

    // Static sensor mounts can be inserted directly
    store.insert(Transform::from_translation(
        "base_link",
        "laser",
        Vector3d::new(0.2, 0.0, 0.3),
    ));
    store.insert(Transform::new(
        "base_link",
        "camera",
        Vector3d::new(0.1, 0.0, 0.5),
        UnitQuaterniond::from_euler_angles(0.0, 0.0, -FRAC_PI_2),
    ));

    let snapshot = store.snapshot();
    let candidates = candidate_roots(&snapshot);
    println!("\nCandidate roots: {:?}", candidates);

    let Some(root) = select_root(None, &candidates, "map") else {
        println!("No root frame available");
        return Ok(());
    };

    let tree = build_tree(&root, &snapshot);
    println!("\nTree rooted at {} ({} frames):", tree.root(), tree.len());
    for node in tree.nodes() {
        let p = node.world_position;
        println!(
            "  {:<10} <- {:<10} at ({:.3}, {:.3}, {:.3})",
            node.frame_id, node.parent_frame_id, p.x, p.y, p.z
        );
    }

    let transformer = FrameTransformer::new(&tree);

    println!("\nRe-expressing sensor data in {}:", tree.root());
    let hit = transformer.transform_point(&Vector3d::new(1.0, 0.0, 0.0), "laser");
    println!("  laser hit 1m ahead     -> ({:.3}, {:.3}, {:.3})", hit.x, hit.y, hit.z);

    let detection = Pose::new(Vector3d::new(0.0, 0.0, 2.0), UnitQuaterniond::identity());
    let world = transformer.transform_pose(&detection, "camera");
    println!(
        "  camera detection at 2m -> ({:.3}, {:.3}, {:.3})",
        world.position.x, world.position.y, world.position.z
    );

    let unknown = transformer.transform_point(&Vector3d::new(1.0, 2.0, 3.0), "gps");
    println!("  unknown frame passes through unchanged: {:?}", unknown.as_slice());

    Ok(())
}
