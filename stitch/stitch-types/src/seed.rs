//! Seed output: the post-chunk continuation of one connected component.

use std::collections::{BTreeMap, BTreeSet};

use crate::segment::SegmentId;

/// The matched post-chunk segments for one escaping component, keyed by
/// segment ID with their accumulated voxel sizes as values.
///
/// Seeds are what a downstream reconstruction task starts from in the next
/// chunk. Maps are ordered so repeated runs serialize identically.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Seed {
    /// Accepted post segments and their voxel sizes over the widened post
    /// window. Never contains the background ID; non-empty whenever the
    /// originating component observed any post segment at all.
    pub post_segments: BTreeMap<SegmentId, u64>,
    /// The selected pre segments the originating component was built from.
    pub pre_segments: BTreeSet<SegmentId>,
}

impl Seed {
    /// Creates an empty seed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of matched post segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.post_segments.len()
    }

    /// `true` when no post segment was matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.post_segments.is_empty()
    }

    /// Total voxel size across all matched post segments.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.post_segments.values().sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_seed() {
        let seed = Seed::new();
        assert!(seed.is_empty());
        assert_eq!(seed.len(), 0);
        assert_eq!(seed.total_size(), 0);
    }

    #[test]
    fn test_total_size() {
        let mut seed = Seed::new();
        seed.post_segments.insert(SegmentId::new(3), 100);
        seed.post_segments.insert(SegmentId::new(9), 250);
        assert_eq!(seed.len(), 2);
        assert_eq!(seed.total_size(), 350);
    }

    #[test]
    fn test_post_segments_ordered() {
        let mut seed = Seed::new();
        seed.post_segments.insert(SegmentId::new(9), 1);
        seed.post_segments.insert(SegmentId::new(3), 1);
        let ids: Vec<_> = seed.post_segments.keys().copied().collect();
        assert_eq!(ids, vec![SegmentId::new(3), SegmentId::new(9)]);
    }
}
