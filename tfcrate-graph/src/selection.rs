//! Root frame selection

use std::collections::BTreeSet;

use tfcrate_core::Transform;

/// Frames that can serve as a root: every parent frame id, sorted and
/// de-duplicated.
///
/// Takes any edge iterator, so both a [`Snapshot`](crate::store::Snapshot)
/// and a live store can be listed.
pub fn candidate_roots<'a, I>(edges: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Transform>,
{
    edges
        .into_iter()
        .map(|t| t.parent_frame.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Pick the root to build from.
///
/// Keeps `current` while it is still a candidate, otherwise falls back to
/// `preferred`, then to the first candidate.
pub fn select_root(
    current: Option<&str>,
    candidates: &[String],
    preferred: &str,
) -> Option<String> {
    let is_candidate = |frame: &str| candidates.iter().any(|c| c == frame);

    match current {
        Some(frame) if is_candidate(frame) => Some(frame.to_string()),
        _ if is_candidate(preferred) => Some(preferred.to_string()),
        _ => candidates.first().cloned(),
    }
}
