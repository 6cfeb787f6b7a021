//! Transform store
//!
//! Holds the latest transform for every observed `(parent, child)` edge.
//! Entries are inserted or overwritten, never removed, so the key set only
//! grows for the lifetime of the store.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

use log::{debug, trace};
use tfcrate_core::{EdgeKey, Error, RawTransform, Result, Transform};

/// Outcome of ingesting a batch of transform records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Records stored or overwritten
    pub accepted: usize,
    /// Records dropped as malformed or incomplete
    pub rejected: usize,
    /// Whether any accepted record introduced a frame id not seen before
    pub new_frames: bool,
}

impl IngestReport {
    pub fn total(&self) -> usize {
        self.accepted + self.rejected
    }
}

/// An owned, point-in-time copy of the store's edges.
///
/// Edges iterate in key order (parent, then child), which makes tree builds
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    edges: BTreeMap<EdgeKey, Transform>,
}

impl Snapshot {
    pub fn from_transforms<I: IntoIterator<Item = Transform>>(transforms: I) -> Self {
        let mut edges = BTreeMap::new();
        for t in transforms {
            edges.insert(t.key(), t);
        }
        Self { edges }
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn get(&self, parent: &str, child: &str) -> Option<&Transform> {
        self.edges.get(&EdgeKey::new(parent, child))
    }

    /// Iterate over all edges in key order
    pub fn iter(&self) -> impl Iterator<Item = &Transform> {
        self.edges.values()
    }

    /// Every frame id referenced by any edge, as parent or child
    pub fn frame_ids(&self) -> BTreeSet<&str> {
        self.edges
            .keys()
            .flat_map(|k| [k.parent.as_str(), k.child.as_str()])
            .collect()
    }

    /// Group edges by parent frame id, preserving key order within each group
    pub fn index_by_parent(&self) -> HashMap<&str, Vec<&Transform>> {
        let mut index: HashMap<&str, Vec<&Transform>> = HashMap::new();
        for t in self.edges.values() {
            index.entry(t.parent_frame.as_str()).or_default().push(t);
        }
        index
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a Transform;
    type IntoIter = std::collections::btree_map::Values<'a, EdgeKey, Transform>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.values()
    }
}

/// Latest-transform-per-edge store
#[derive(Debug, Clone, Default)]
pub struct TransformStore {
    edges: BTreeMap<EdgeKey, Transform>,
    frames: BTreeSet<String>,
}

impl TransformStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and store an incoming record.
    ///
    /// Returns whether the edge introduced a frame id the store had not seen.
    /// Malformed or incomplete records are rejected with
    /// [`Error::MalformedTransform`] and leave the store unchanged.
    pub fn ingest(&mut self, raw: RawTransform) -> Result<bool> {
        let transform = Transform::try_from(raw).map_err(|e| {
            debug!("Dropping transform: {}", e);
            e
        })?;
        Ok(self.insert(transform))
    }

    /// Store an already validated transform, overwriting any previous value
    /// for the same edge. Returns whether a new frame id appeared.
    pub fn insert(&mut self, transform: Transform) -> bool {
        let mut new_frame = false;
        for frame in [&transform.parent_frame, &transform.child_frame] {
            if !self.frames.contains(frame.as_str()) {
                debug!("New frame: {}", frame);
                self.frames.insert(frame.clone());
                new_frame = true;
            }
        }

        let key = transform.key();
        trace!("Storing edge {}", key);
        self.edges.insert(key, transform);
        new_frame
    }

    /// Ingest every record of a message batch
    pub fn ingest_batch<I>(&mut self, records: I) -> IngestReport
    where
        I: IntoIterator<Item = RawTransform>,
    {
        let mut report = IngestReport::default();
        for raw in records {
            match self.ingest(raw) {
                Ok(new_frame) => {
                    report.accepted += 1;
                    report.new_frames |= new_frame;
                }
                Err(_) => report.rejected += 1,
            }
        }
        if report.rejected > 0 {
            debug!(
                "Ingested {} of {} transforms ({} rejected)",
                report.accepted,
                report.total(),
                report.rejected
            );
        }
        report
    }

    /// Owned copy of the current edges for a tree build
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            edges: self.edges.clone(),
        }
    }

    pub fn get(&self, parent: &str, child: &str) -> Option<&Transform> {
        self.edges.get(&EdgeKey::new(parent, child))
    }

    /// Iterate over the stored edges in key order, without copying them
    pub fn iter(&self) -> impl Iterator<Item = &Transform> {
        self.edges.values()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Every frame id ever seen, sorted
    pub fn frame_ids(&self) -> impl Iterator<Item = &str> {
        self.frames.iter().map(String::as_str)
    }

    pub fn contains_frame(&self, frame_id: &str) -> bool {
        self.frames.contains(frame_id)
    }
}

/// A transform store shared between producers.
///
/// Writes serialize on the write lock; snapshots are taken under the read
/// lock, so a tree build never observes a half-applied batch.
#[derive(Debug, Clone, Default)]
pub struct SharedTransformStore {
    inner: Arc<RwLock<TransformStore>>,
}

impl SharedTransformStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ingest(&self, raw: RawTransform) -> Result<bool> {
        self.inner
            .write()
            .map_err(|_| Error::LockPoisoned)?
            .ingest(raw)
    }

    pub fn insert(&self, transform: Transform) -> Result<bool> {
        Ok(self
            .inner
            .write()
            .map_err(|_| Error::LockPoisoned)?
            .insert(transform))
    }

    /// Ingest a whole batch under one write lock
    pub fn ingest_batch<I>(&self, records: I) -> Result<IngestReport>
    where
        I: IntoIterator<Item = RawTransform>,
    {
        Ok(self
            .inner
            .write()
            .map_err(|_| Error::LockPoisoned)?
            .ingest_batch(records))
    }

    pub fn snapshot(&self) -> Result<Snapshot> {
        Ok(self
            .inner
            .read()
            .map_err(|_| Error::LockPoisoned)?
            .snapshot())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.inner.read().map_err(|_| Error::LockPoisoned)?.len())
    }
}

impl From<TransformStore> for SharedTransformStore {
    fn from(store: TransformStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }
}
