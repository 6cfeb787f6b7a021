//! Viewer-side resolver session
//!
//! Ties the store, root selection and tree builder together the way a
//! telemetry viewer uses them: batches of transforms arrive, the root frame
//! may change, and the tree is rebuilt from scratch on the next read after
//! either happens.

use log::debug;
use tfcrate_core::{RawTransform, ResolverConfig, Result, Transform};

use crate::resolver::FrameTransformer;
use crate::selection::{candidate_roots, select_root};
use crate::store::{IngestReport, TransformStore};
use crate::tree::{TransformTree, TreeBuilder};

/// Store plus lazily rebuilt tree for one viewer
#[derive(Debug, Clone)]
pub struct ResolverSession {
    config: ResolverConfig,
    store: TransformStore,
    /// Kept across batches while it is still a candidate root
    root: Option<String>,
    tree: Option<TransformTree>,
}

impl Default for ResolverSession {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}

impl ResolverSession {
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            config,
            store: TransformStore::new(),
            root: None,
            tree: None,
        }
    }

    /// Validates the configuration before use
    pub fn try_new(config: ResolverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn store(&self) -> &TransformStore {
        &self.store
    }

    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    /// Ingest one transform batch and invalidate the tree
    pub fn ingest_batch<I>(&mut self, records: I) -> IngestReport
    where
        I: IntoIterator<Item = RawTransform>,
    {
        let report = self.store.ingest_batch(records);
        if report.accepted > 0 {
            self.tree = None;
        }
        if report.new_frames {
            self.refresh_root();
        }
        report
    }

    /// Store one validated transform and invalidate the tree
    pub fn insert(&mut self, transform: Transform) -> bool {
        let new_frame = self.store.insert(transform);
        self.tree = None;
        if new_frame {
            self.refresh_root();
        }
        new_frame
    }

    /// Root frames currently available
    pub fn candidate_roots(&self) -> Vec<String> {
        candidate_roots(self.store.iter())
    }

    /// Choose the root explicitly. The tree is rebuilt on next access.
    pub fn set_root(&mut self, root: impl Into<String>) {
        let root = root.into();
        if self.root.as_deref() != Some(root.as_str()) {
            debug!("Root frame set to {}", root);
            self.root = Some(root);
            self.tree = None;
        }
    }

    fn refresh_root(&mut self) {
        let candidates = self.candidate_roots();
        let selected = select_root(self.root.as_deref(), &candidates, &self.config.default_root);
        if selected != self.root {
            debug!("Root frame changed: {:?} -> {:?}", self.root, selected);
            self.root = selected;
            self.tree = None;
        }
    }

    /// The tree for the current root, rebuilt if stale.
    ///
    /// Returns `None` while no root is known.
    pub fn tree(&mut self) -> Option<&TransformTree> {
        let root = self.root.as_deref()?;
        if self.tree.as_ref().map_or(true, |t| t.root() != root) {
            let snapshot = self.store.snapshot();
            self.tree = Some(TreeBuilder::from_config(&self.config).build(root, &snapshot));
        }
        self.tree.as_ref()
    }

    /// A transformer over the current tree
    pub fn transformer(&mut self) -> Option<FrameTransformer<'_>> {
        let config = self.config.clone();
        self.tree()
            .map(move |tree| FrameTransformer::with_config(tree, config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tfcrate_core::{RawQuaternion, RawVector3, Vector3d};

    fn raw(parent: &str, child: &str, x: f64) -> RawTransform {
        RawTransform {
            parent_frame: Some(parent.to_string()),
            child_frame: Some(child.to_string()),
            translation: Some(RawVector3::new(x, 0.0, 0.0)),
            rotation: Some(RawQuaternion::default()),
        }
    }

    #[test]
    fn test_defaults_to_map_root() {
        let mut session = ResolverSession::default();
        session.ingest_batch(vec![raw("base_link", "laser", 0.1), raw("map", "base_link", 1.0)]);
        assert_eq!(session.root(), Some("map"));
        assert_eq!(session.tree().unwrap().len(), 2);
    }

    #[test]
    fn test_first_candidate_without_map() {
        let mut session = ResolverSession::default();
        session.ingest_batch(vec![raw("odom", "base_link", 1.0), raw("base_link", "laser", 0.1)]);
        assert_eq!(session.root(), Some("base_link"));
    }

    #[test]
    fn test_tree_rebuilt_after_new_data() {
        let mut session = ResolverSession::default();
        session.ingest_batch(vec![raw("map", "base_link", 1.0)]);
        let x = session.tree().unwrap().get("base_link").unwrap().world_position.x;
        assert_relative_eq!(x, 1.0);

        session.ingest_batch(vec![raw("map", "base_link", 2.5)]);
        let x = session.tree().unwrap().get("base_link").unwrap().world_position.x;
        assert_relative_eq!(x, 2.5);
    }

    #[test]
    fn test_explicit_root_kept_while_candidate() {
        let mut session = ResolverSession::default();
        session.ingest_batch(vec![raw("map", "odom", 1.0), raw("odom", "base_link", 1.0)]);
        session.set_root("odom");
        session.ingest_batch(vec![raw("base_link", "camera", 0.2)]);
        assert_eq!(session.root(), Some("odom"));

        let tf = session.transformer().unwrap();
        let p = tf.transform_point(&Vector3d::zeros(), "camera");
        assert_relative_eq!(p, Vector3d::new(1.2, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_bad_config() {
        let config = ResolverConfig::default().with_identity_tolerances(-1.0, 0.0);
        assert!(ResolverSession::try_new(config).is_err());
    }

    #[test]
    fn test_candidate_roots_track_store() {
        let mut session = ResolverSession::default();
        session.ingest_batch(vec![raw("odom", "base_link", 1.0), raw("map", "odom", 0.0)]);
        assert_eq!(session.candidate_roots(), vec!["map", "odom"]);

        session.insert(Transform::from_translation("base_link", "laser", Vector3d::x()));
        assert_eq!(session.candidate_roots(), vec!["base_link", "map", "odom"]);
        assert_eq!(session.root(), Some("map"));
    }

    #[test]
    fn test_no_root_no_tree() {
        let mut session = ResolverSession::default();
        assert!(session.tree().is_none());
        assert!(session.transformer().is_none());
    }
}
