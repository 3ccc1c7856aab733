//! Spawn table: the full pre/post correspondence structure.
//!
//! Where a [`Seed`](crate::Seed) list resolves ambiguity eagerly, the spawn
//! table reports raw overlap for every valid pre segment and leaves
//! disambiguation to the consumer. It is the shape handed across process
//! boundaries to a task orchestrator, hence the serde derives.

use std::collections::BTreeMap;

use crate::segment::SegmentId;

/// A pre segment supporting a post match, with the pairwise intersection
/// voxel count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PreSupport {
    /// The supporting pre segment.
    pub id: SegmentId,
    /// Voxels of the overlap window where this pre segment meets the post
    /// segment.
    pub intersection_size: u64,
}

/// One post segment overlapping a pre segment.
///
/// `supports` lists every pre segment that also overlaps this post segment
/// (the M side of an M:N correspondence), so a consumer can tell a clean
/// 1:1 continuation from a contested one.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PostMatch {
    /// The post segment.
    pub id: SegmentId,
    /// Total voxels of this post segment within the overlap window.
    pub overlap_size: u64,
    /// Every pre segment overlapping this post segment, with pairwise
    /// intersection sizes.
    pub supports: Vec<PreSupport>,
}

/// Correspondence record for one pre segment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpawnEntry {
    /// Post segments this pre segment overlaps, with their support sets.
    pub post_matches: Vec<PostMatch>,
    /// Pre segments directly face-adjacent to this one within the ROI:
    /// merge candidates, independent of any post-side matching.
    pub neighbors: Vec<SegmentId>,
    /// Whether this segment's bounds reach the post half of the overlap
    /// and the segment clears the dust thresholds.
    pub can_spawn: bool,
}

/// The full pre/post correspondence table, keyed by pre segment ID.
///
/// # Example
///
/// ```
/// use stitch_types::{SegmentId, SpawnEntry, SpawnTable};
///
/// let mut table = SpawnTable::new();
/// table.entries.insert(SegmentId::new(7), SpawnEntry::default());
/// assert_eq!(table.len(), 1);
/// assert!(table.get(SegmentId::new(7)).is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpawnTable {
    /// Per-pre-segment correspondence records, ordered by segment ID.
    pub entries: BTreeMap<SegmentId, SpawnEntry>,
}

impl SpawnTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pre segments with at least one recorded overlap.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when no pre segment overlaps any post segment.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up the record for one pre segment.
    #[must_use]
    pub fn get(&self, id: SegmentId) -> Option<&SpawnEntry> {
        self.entries.get(&id)
    }

    /// Iterates records in ascending pre-segment order.
    pub fn iter(&self) -> impl Iterator<Item = (SegmentId, &SpawnEntry)> {
        self.entries.iter().map(|(id, entry)| (*id, entry))
    }

    /// Pre segments eligible to spawn a task.
    pub fn spawnable(&self) -> impl Iterator<Item = SegmentId> + '_ {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.can_spawn)
            .map(|(id, _)| *id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn entry(can_spawn: bool) -> SpawnEntry {
        SpawnEntry {
            post_matches: vec![PostMatch {
                id: SegmentId::new(2),
                overlap_size: 40,
                supports: vec![PreSupport {
                    id: SegmentId::new(1),
                    intersection_size: 30,
                }],
            }],
            neighbors: vec![SegmentId::new(4)],
            can_spawn,
        }
    }

    #[test]
    fn test_empty_table() {
        let table = SpawnTable::new();
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
        assert!(table.get(SegmentId::new(1)).is_none());
    }

    #[test]
    fn test_lookup_and_iteration_order() {
        let mut table = SpawnTable::new();
        table.entries.insert(SegmentId::new(9), entry(true));
        table.entries.insert(SegmentId::new(1), entry(false));

        let ids: Vec<_> = table.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![SegmentId::new(1), SegmentId::new(9)]);
        assert!(table.get(SegmentId::new(9)).unwrap().can_spawn);
    }

    #[test]
    fn test_spawnable_filter() {
        let mut table = SpawnTable::new();
        table.entries.insert(SegmentId::new(1), entry(false));
        table.entries.insert(SegmentId::new(2), entry(true));
        table.entries.insert(SegmentId::new(3), entry(true));

        let spawnable: Vec<_> = table.spawnable().collect();
        assert_eq!(spawnable, vec![SegmentId::new(2), SegmentId::new(3)]);
    }
}
