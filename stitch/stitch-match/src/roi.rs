//! Region-of-interest resolution.
//!
//! A stitching query scans at most a thin slab where the two chunks
//! overlap, clipped to the selected segments' bounds. This module derives
//! that region once per query, in all three coordinate frames, and rejects
//! degenerate or oversized queries before any voxel is read.

use std::collections::BTreeSet;

use nalgebra::Vector3;
use tracing::debug;

use stitch_types::{
    overlap_along, overlap_region, Box3, Direction, SegmentId, StitchConfig, StitchError,
};
use stitch_volume::Volume;

/// The resolved scan geometry of one query.
#[derive(Debug, Clone)]
pub(crate) struct RoiPlan {
    /// Face of pre along which post lies.
    pub dir: Direction,
    /// Overlap thickness along the separation axis, in voxels.
    pub overlap: i64,
    /// Pre chunk in the world-voxel frame; the escape test runs against
    /// this box.
    pub pre_world: Box3,
    /// Post half of the overlap slab, world-voxel frame; spawn eligibility
    /// is tested against this box.
    pub post_half_world: Box3,
    /// The scanned region, world-voxel frame.
    pub roi_world: Box3,
    /// The scanned region in pre-local voxel coordinates.
    pub pre_local: Box3,
    /// The scanned region in post-local voxel coordinates.
    pub post_local: Box3,
    /// ROI extent; the scan linearizes voxels row-major within this.
    pub dim: Vector3<i64>,
    /// Margin-1 overlap slab in post-local coordinates; the size
    /// accumulator's window never leaves it.
    pub post_clip: Box3,
}

/// Why a query produced no plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RoiOutcome {
    /// The chunks' boxes do not overlap.
    NoOverlap,
    /// No selected valid segment reaches the overlap.
    NoCandidates,
    /// The ROI exceeds the configured voxel ceiling.
    TooLarge {
        /// Voxels the scan would have visited.
        volume: u64,
        /// The configured ceiling.
        ceiling: u64,
    },
}

/// Shared geometry of both query flavors.
struct OverlapFrame {
    dir: Direction,
    overlap: i64,
    pre_world: Box3,
    post_world: Box3,
    post_half_world: Box3,
    full_overlap: Box3,
}

/// Computes the world-voxel frame geometry, or `NoOverlap`.
///
/// Both chunks must carry the same voxel resolution; stitching across a
/// resolution change is undefined and rejected up front.
fn overlap_frame(pre: &Volume, post: &Volume) -> Result<Result<OverlapFrame, RoiOutcome>, StitchError> {
    if pre.resolution() != post.resolution() {
        return Err(StitchError::ResolutionMismatch {
            pre: pre.resolution(),
            post: post.resolution(),
        });
    }
    let res = pre.resolution();

    let pre_world = pre.physical_bounds().scale_down(res);
    let post_world = post.physical_bounds().scale_down(res);

    let Some(dir) = Direction::between(&pre_world, &post_world) else {
        return Ok(Err(RoiOutcome::NoOverlap));
    };
    let overlap = overlap_along(&pre_world, &post_world, dir);

    let post_half_world = overlap_region(&pre_world, &post_world, dir, overlap / 2, 0);
    if post_half_world.is_empty() {
        return Ok(Err(RoiOutcome::NoOverlap));
    }

    // Trim one voxel off both faces: labels right at the cut planes carry
    // segmentation artifacts from chunk-local processing.
    let full_overlap = overlap_region(&pre_world, &post_world, dir, 1, 1);

    Ok(Ok(OverlapFrame {
        dir,
        overlap,
        pre_world,
        post_world,
        post_half_world,
        full_overlap,
    }))
}

/// Finishes a plan from a world-frame ROI, enforcing the voxel ceiling.
fn finish(
    frame: OverlapFrame,
    roi_world: Box3,
    config: &StitchConfig,
) -> Result<RoiPlan, RoiOutcome> {
    let volume = roi_world.volume();
    let ceiling = config.roi_voxel_ceiling();
    if volume > ceiling {
        return Err(RoiOutcome::TooLarge { volume, ceiling });
    }

    let pre_local = roi_world.translate(-frame.pre_world.min());
    let post_local = roi_world.translate(-frame.post_world.min());
    let post_clip = frame.full_overlap.translate(-frame.post_world.min());

    debug!(
        dir = ?frame.dir,
        overlap = frame.overlap,
        roi_voxels = volume,
        "resolved region of interest"
    );

    Ok(RoiPlan {
        dir: frame.dir,
        overlap: frame.overlap,
        pre_world: frame.pre_world,
        post_half_world: frame.post_half_world,
        dim: roi_world.extent(),
        roi_world,
        pre_local,
        post_local,
        post_clip,
    })
}

/// Resolves the ROI for a seed query: the overlap slab clipped to the
/// selected segments' dilated bounds.
pub(crate) fn plan_selected(
    pre: &Volume,
    selected: &BTreeSet<SegmentId>,
    post: &Volume,
    config: &StitchConfig,
) -> Result<Result<RoiPlan, RoiOutcome>, StitchError> {
    let frame = match overlap_frame(pre, post)? {
        Ok(frame) => frame,
        Err(outcome) => return Ok(Err(outcome)),
    };
    let res = pre.resolution();
    let filter = config.segment_filter();

    let mut segment_bounds = Box3::empty();
    for &seg in selected {
        if pre.segment_passes(seg, &filter) {
            segment_bounds =
                segment_bounds.merge(&pre.segment_bounds_physical(seg).scale_down(res));
        }
    }
    if segment_bounds.is_empty() {
        return Ok(Err(RoiOutcome::NoCandidates));
    }
    // Catalog boxes can land one voxel off after the physical/voxel
    // conversion; widen before clipping.
    let segment_bounds = segment_bounds.dilate(Vector3::repeat(1));

    if frame
        .post_half_world
        .intersect(&segment_bounds)
        .is_empty()
    {
        return Ok(Err(RoiOutcome::NoCandidates));
    }

    let roi_world = frame.full_overlap.intersect(&segment_bounds);
    if roi_world.is_empty() {
        return Ok(Err(RoiOutcome::NoCandidates));
    }

    Ok(finish(frame, roi_world, config))
}

/// Resolves the ROI for a spawn-table query: the whole margin-1 overlap
/// slab, no segment selection involved.
pub(crate) fn plan_full(
    pre: &Volume,
    post: &Volume,
    config: &StitchConfig,
) -> Result<Result<RoiPlan, RoiOutcome>, StitchError> {
    let frame = match overlap_frame(pre, post)? {
        Ok(frame) => frame,
        Err(outcome) => return Ok(Err(outcome)),
    };
    let roi_world = frame.full_overlap;
    if roi_world.is_empty() {
        return Ok(Err(RoiOutcome::NoOverlap));
    }
    Ok(finish(frame, roi_world, config))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Pre chunk: world [0,10)^3. Post chunk: shifted +4 along X, so the
    /// world overlap is x in [4,10).
    fn pair(pre_ids: Vec<u32>, post_ids: Vec<u32>) -> (Volume, Volume) {
        let dims = Vector3::new(10, 10, 10);
        let res = Vector3::new(4, 4, 4);
        let pre = Volume::from_labels(Vector3::new(0, 0, 0), res, dims, pre_ids).unwrap();
        let post = Volume::from_labels(Vector3::new(16, 0, 0), res, dims, post_ids).unwrap();
        (pre, post)
    }

    fn filled(id: u32) -> Vec<u32> {
        vec![id; 1000]
    }

    #[test]
    fn test_plan_selected_geometry() {
        let (pre, post) = pair(filled(1), filled(2));
        let selected: BTreeSet<_> = [SegmentId::new(1)].into_iter().collect();
        let plan = plan_selected(&pre, &selected, &post, &StitchConfig::default())
            .unwrap()
            .unwrap();

        assert_eq!(plan.dir, Direction::XMax);
        assert_eq!(plan.overlap, 6);
        // Full overlap [5, 9) clipped to the dilated segment bounds.
        assert_eq!(plan.roi_world.min(), Vector3::new(5, 0, 0));
        assert_eq!(plan.roi_world.max(), Vector3::new(9, 10, 10));
        assert_eq!(plan.dim, Vector3::new(4, 10, 10));
        // Local frames.
        assert_eq!(plan.pre_local.min(), Vector3::new(5, 0, 0));
        assert_eq!(plan.post_local.min(), Vector3::new(1, 0, 0));
        // Post half of the overlap.
        assert_eq!(plan.post_half_world.min().x, 7);
        assert_eq!(plan.post_half_world.max().x, 10);
    }

    #[test]
    fn test_resolution_mismatch_rejected() {
        let dims = Vector3::new(10, 10, 10);
        let pre = Volume::from_labels(
            Vector3::new(0, 0, 0),
            Vector3::new(4, 4, 4),
            dims,
            filled(1),
        )
        .unwrap();
        let post = Volume::from_labels(
            Vector3::new(24, 0, 0),
            Vector3::new(4, 4, 8),
            dims,
            filled(2),
        )
        .unwrap();
        let selected: BTreeSet<_> = [SegmentId::new(1)].into_iter().collect();
        let err = plan_selected(&pre, &selected, &post, &StitchConfig::default()).unwrap_err();
        assert!(err.is_resolution_mismatch());
    }

    #[test]
    fn test_disjoint_chunks_no_overlap() {
        let dims = Vector3::new(10, 10, 10);
        let res = Vector3::new(4, 4, 4);
        let pre = Volume::from_labels(Vector3::new(0, 0, 0), res, dims, filled(1)).unwrap();
        let post = Volume::from_labels(Vector3::new(400, 0, 0), res, dims, filled(2)).unwrap();
        let selected: BTreeSet<_> = [SegmentId::new(1)].into_iter().collect();
        let outcome = plan_selected(&pre, &selected, &post, &StitchConfig::default())
            .unwrap()
            .unwrap_err();
        assert_eq!(outcome, RoiOutcome::NoOverlap);
    }

    #[test]
    fn test_dust_selection_no_candidates() {
        // Segment 7 is a 2x2x2 cube: below every dust threshold.
        let mut pre_ids = vec![0u32; 1000];
        for z in 0..2i64 {
            for y in 0..2i64 {
                for x in 8..10i64 {
                    pre_ids[(x + y * 10 + z * 100) as usize] = 7;
                }
            }
        }
        let (pre, post) = pair(pre_ids, filled(2));
        let selected: BTreeSet<_> = [SegmentId::new(7)].into_iter().collect();
        let outcome = plan_selected(&pre, &selected, &post, &StitchConfig::default())
            .unwrap()
            .unwrap_err();
        assert_eq!(outcome, RoiOutcome::NoCandidates);
    }

    #[test]
    fn test_selection_away_from_boundary_no_candidates() {
        // Valid segment, but it never reaches the overlap slab.
        let mut pre_ids = vec![0u32; 1000];
        for z in 0..10i64 {
            for y in 0..10i64 {
                for x in 0..2i64 {
                    pre_ids[(x + y * 10 + z * 100) as usize] = 4;
                }
            }
        }
        let (pre, post) = pair(pre_ids, filled(2));
        let selected: BTreeSet<_> = [SegmentId::new(4)].into_iter().collect();
        let outcome = plan_selected(&pre, &selected, &post, &StitchConfig::default())
            .unwrap()
            .unwrap_err();
        assert_eq!(outcome, RoiOutcome::NoCandidates);
    }

    #[test]
    fn test_ceiling_rejects_before_scan() {
        let (pre, post) = pair(filled(1), filled(2));
        let selected: BTreeSet<_> = [SegmentId::new(1)].into_iter().collect();
        let config = StitchConfig::default().with_roi_voxel_ceiling(100);
        let outcome = plan_selected(&pre, &selected, &post, &config)
            .unwrap()
            .unwrap_err();
        assert_eq!(
            outcome,
            RoiOutcome::TooLarge {
                volume: 400,
                ceiling: 100
            }
        );
    }

    #[test]
    fn test_plan_full_covers_whole_slab() {
        let (pre, post) = pair(filled(1), filled(2));
        let plan = plan_full(&pre, &post, &StitchConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(plan.roi_world.min(), Vector3::new(5, 0, 0));
        assert_eq!(plan.roi_world.max(), Vector3::new(9, 10, 10));
    }
}
