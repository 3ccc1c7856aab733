//! Post-segment size accumulation.
//!
//! Match ratios need denominators that reflect a post segment's realistic
//! extent near the boundary, not just its sliver inside the thin scan ROI.
//! This pass independently tallies candidate post segments over a widened
//! window: the post-local ROI dilated per config, re-clipped to the valid
//! overlap slab so no read leaves the post chunk.

use std::collections::{HashMap, HashSet};

use nalgebra::Vector3;

use stitch_types::SegmentId;
use stitch_volume::Volume;

use crate::roi::RoiPlan;

/// Tallies voxel counts per candidate post segment over the widened
/// window.
///
/// Every candidate was observed inside the ROI, and the window contains
/// the ROI, so every candidate comes back with a positive count.
pub(crate) fn accumulate_post_sizes(
    post: &Volume,
    plan: &RoiPlan,
    candidates: &HashSet<SegmentId>,
    expansion: i64,
) -> HashMap<SegmentId, u64> {
    let window = plan
        .post_local
        .dilate(Vector3::repeat(expansion))
        .intersect(&plan.post_clip);

    let mut sizes: HashMap<SegmentId, u64> = HashMap::new();
    if candidates.is_empty() {
        return sizes;
    }

    let min = window.min();
    let max = window.max();
    for z in min.z..max.z {
        for y in min.y..max.y {
            for x in min.x..max.x {
                let seg = post.segment_at(x, y, z);
                if !seg.is_background() && candidates.contains(&seg) {
                    *sizes.entry(seg).or_insert(0) += 1;
                }
            }
        }
    }

    sizes
}
