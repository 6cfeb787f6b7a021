//! Inspect a recorded transform stream
//!
//! Reads transform messages (flat, array or ROS `TFMessage` JSON), builds the
//! tree from a root frame and prints every placed frame as JSON. Given a
//! marker batch, also prints the markers re-expressed in the root frame.
//!
//! ```bash
//! cargo run -p tfcrate-demos --bin tf_inspect -- tf.json --root map \
//!     --markers aruco.json --marker-frame camera --overlay --axis-scale 0.2
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{bail, Context as _};
use clap::Parser;
use serde::Serialize;
use tfcrate_core::{BuildStrategy, ResolverConfig};
use tfcrate_graph::{
    frame_axes, frame_links, FrameNode, FrameTransformer, LineVertex, ResolverSession,
};
use tfcrate_io::{read_markers, read_transforms, write_json, Marker};

#[derive(Debug, Clone, Parser)]
#[command(name = "tf_inspect", about = "Resolve a transform stream into world poses")]
struct Args {
    /// Transform messages to read
    transforms: PathBuf,

    /// Root frame. Defaults to the configured root, or the first candidate.
    #[arg(long)]
    root: Option<String>,

    /// Marker batch to re-express in the root frame
    #[arg(long)]
    markers: Option<PathBuf>,

    /// Frame the markers were published in. Overrides the batch header.
    #[arg(long, requires = "markers")]
    marker_frame: Option<String>,

    /// Tree build strategy
    #[arg(long)]
    strategy: Option<BuildStrategy>,

    /// Resolver configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also print axis and link line lists for drawing the tree
    #[arg(long)]
    overlay: bool,

    /// Length of the drawn frame axes. Overrides the configuration.
    #[arg(long)]
    axis_scale: Option<f64>,
}

#[derive(Debug, Serialize)]
struct Overlay {
    axes: Vec<LineVertex>,
    links: Vec<LineVertex>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Report<'a> {
    root: &'a str,
    frames: Vec<&'a FrameNode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    excluded_frames: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    markers: Option<Vec<Marker>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    overlay: Option<Overlay>,
}

fn load_config(args: &Args) -> anyhow::Result<ResolverConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => ResolverConfig::default(),
    };
    if let Some(strategy) = args.strategy {
        config = config.with_strategy(strategy);
    }
    if let Some(scale) = args.axis_scale {
        config = config.with_axis_scale(scale);
    }
    config.validate()?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = load_config(&args)?;
    let axis_scale = config.axis_scale;

    let records = read_transforms(&args.transforms)
        .with_context(|| format!("reading {}", args.transforms.display()))?;

    let mut session = ResolverSession::try_new(config)?;
    let report = session.ingest_batch(records);
    log::info!(
        "Ingested {} transforms ({} rejected)",
        report.accepted,
        report.rejected
    );
    if report.rejected > 0 {
        log::warn!("{} malformed transform records were skipped", report.rejected);
    }

    if let Some(root) = &args.root {
        session.set_root(root.clone());
    }
    log::info!("Candidate roots: {:?}", session.candidate_roots());

    let snapshot = session.store().snapshot();
    let Some(tree) = session.tree().cloned() else {
        bail!("no root frame available: no transforms were accepted");
    };
    if tree.is_empty() {
        log::warn!("Root frame {} has no reachable children", tree.root());
    }

    let excluded_frames = tree.excluded_frames(&snapshot);
    if !excluded_frames.is_empty() {
        log::info!("Frames not reachable from {}: {:?}", tree.root(), excluded_frames);
    }

    let transformer = FrameTransformer::with_config(&tree, session.config().clone());

    let markers = match &args.markers {
        Some(path) => {
            let batch =
                read_markers(path).with_context(|| format!("reading {}", path.display()))?;
            let frame = match args.marker_frame.as_deref().or(batch.frame_id()) {
                Some(frame) => frame.to_string(),
                None => bail!("markers carry no header frame id; pass --marker-frame"),
            };
            if transformer.world_transform_of(&frame).is_none() {
                log::warn!(
                    "Marker frame {} is not placed under {}; markers left as is",
                    frame,
                    tree.root()
                );
            }
            Some(transformer.transform_batch(&batch.markers, &frame))
        }
        None => None,
    };

    let overlay = args.overlay.then(|| Overlay {
        axes: frame_axes(&tree, axis_scale),
        links: frame_links(&tree),
    });

    let report = Report {
        root: tree.root(),
        frames: tree.nodes().collect(),
        excluded_frames,
        markers,
        overlay,
    };
    write_json(&report, std::io::stdout().lock())?;

    Ok(())
}
