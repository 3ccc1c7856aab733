//! Spawn-table construction: raw pre/post overlap reporting.
//!
//! Unlike the seed path, this variant runs without a segment selection and
//! without connectivity filtering; it reports the overlap of every valid
//! pre segment and leaves disambiguation to the consumer. The possible
//! shapes per pre segment:
//!
//! - 1:1, exactly one post counterpart, itself covered by no other pre
//! - 1:N, several post counterparts, all referring back to this segment
//! - M:1, one post counterpart, contested by other pre segments
//! - M:N, the general case; `supports` exposes the full contest

use std::collections::{BTreeMap, BTreeSet};

use stitch_types::{PostMatch, PreSupport, SegmentFilter, SegmentId, SpawnEntry, SpawnTable};
use stitch_volume::Volume;

use crate::roi::RoiPlan;

/// Raw tallies of the overlap scan pass.
pub(crate) struct OverlapScan {
    /// Per pre segment: overlapping post segments with pairwise voxel
    /// counts.
    pub pre_post: BTreeMap<SegmentId, BTreeMap<SegmentId, u64>>,
    /// The transpose: per post segment, the pre segments covering it.
    pub post_pre: BTreeMap<SegmentId, BTreeMap<SegmentId, u64>>,
    /// Per post segment: total voxels inside the overlap window (counted
    /// where any valid pre segment sits above them).
    pub post_window: BTreeMap<SegmentId, u64>,
    /// Face adjacency between pre segments within the ROI.
    pub neighbors: BTreeMap<SegmentId, BTreeSet<SegmentId>>,
}

/// The single ascending pass tallying pre/post overlap and pre-side
/// adjacency.
///
/// Adjacency records any nonzero differing neighbor, valid or not; a
/// merge candidate may well be a segment the dust filter would reject.
pub(crate) fn scan_overlap(
    pre: &Volume,
    post: &Volume,
    plan: &RoiPlan,
    filter: &SegmentFilter,
) -> OverlapScan {
    let dim = plan.dim;
    let pre_min = plan.pre_local.min();
    let post_min = plan.post_local.min();

    let mut scan = OverlapScan {
        pre_post: BTreeMap::new(),
        post_pre: BTreeMap::new(),
        post_window: BTreeMap::new(),
        neighbors: BTreeMap::new(),
    };

    let mut adjacent = |a: SegmentId, b: SegmentId| {
        scan.neighbors.entry(a).or_default().insert(b);
        scan.neighbors.entry(b).or_default().insert(a);
    };

    for z in 0..dim.z {
        for y in 0..dim.y {
            for x in 0..dim.x {
                let seg = pre.segment_at(pre_min.x + x, pre_min.y + y, pre_min.z + z);
                if !pre.segment_passes(seg, filter) {
                    continue;
                }

                let post_seg = post.segment_at(post_min.x + x, post_min.y + y, post_min.z + z);
                if !post_seg.is_background() {
                    *scan
                        .pre_post
                        .entry(seg)
                        .or_default()
                        .entry(post_seg)
                        .or_insert(0) += 1;
                    *scan
                        .post_pre
                        .entry(post_seg)
                        .or_default()
                        .entry(seg)
                        .or_insert(0) += 1;
                    *scan.post_window.entry(post_seg).or_insert(0) += 1;
                }

                if x > 0 {
                    let n = pre.segment_at(pre_min.x + x - 1, pre_min.y + y, pre_min.z + z);
                    if !n.is_background() && n != seg {
                        adjacent(seg, n);
                    }
                }
                if y > 0 {
                    let n = pre.segment_at(pre_min.x + x, pre_min.y + y - 1, pre_min.z + z);
                    if !n.is_background() && n != seg {
                        adjacent(seg, n);
                    }
                }
                if z > 0 {
                    let n = pre.segment_at(pre_min.x + x, pre_min.y + y, pre_min.z + z - 1);
                    if !n.is_background() && n != seg {
                        adjacent(seg, n);
                    }
                }
            }
        }
    }

    scan
}

/// Assembles the transport table from the scan tallies.
///
/// A pre segment spawns iff its bounds reach the post half of the overlap
/// and it clears the dust thresholds; segments with no post overlap get no
/// entry at all.
pub(crate) fn assemble_table(
    scan: &OverlapScan,
    pre: &Volume,
    plan: &RoiPlan,
    filter: &SegmentFilter,
) -> SpawnTable {
    let res = pre.resolution();
    let mut table = SpawnTable::new();

    for (&pre_seg, posts) in &scan.pre_post {
        let mut entry = SpawnEntry::default();

        for &post_seg in posts.keys() {
            let supports = scan
                .post_pre
                .get(&post_seg)
                .map(|supporters| {
                    supporters
                        .iter()
                        .map(|(&id, &intersection_size)| PreSupport {
                            id,
                            intersection_size,
                        })
                        .collect()
                })
                .unwrap_or_default();

            entry.post_matches.push(PostMatch {
                id: post_seg,
                overlap_size: scan.post_window.get(&post_seg).copied().unwrap_or(0),
                supports,
            });
        }

        if let Some(neighbors) = scan.neighbors.get(&pre_seg) {
            entry.neighbors = neighbors.iter().copied().collect();
        }

        let seg_world = pre.segment_bounds_physical(pre_seg).scale_down(res);
        entry.can_spawn = !seg_world.intersect(&plan.post_half_world).is_empty()
            && pre.segment_passes(pre_seg, filter);

        table.entries.insert(pre_seg, entry);
    }

    table
}
