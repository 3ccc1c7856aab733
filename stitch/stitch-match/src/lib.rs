//! Boundary stitching of adjacent segmented chunks.
//!
//! Two neighboring chunks of a labeled dataset are segmented
//! independently, so an object crossing their shared boundary carries
//! different segment IDs on each side. Given the pre chunk, a set of
//! selected pre segments and the post chunk, this crate determines which
//! post segments continue the same physical objects. Two output shapes:
//!
//! - [`find_seeds`] - one [`Seed`] per connected component of the
//!   selection that genuinely reaches the boundary: the post segments a
//!   reconstruction task in the next chunk starts from.
//! - [`build_spawn_table`] - the full pre/post correspondence
//!   [`SpawnTable`] with neighbor adjacency and spawn eligibility,
//!   leaving disambiguation to a downstream orchestrator.
//!
//! The computation is three sequential read-only passes over voxel data
//! (component scan, size accumulation, component reduction), single
//! threaded, with cost bounded up front by an ROI voxel ceiling rather
//! than by cancellation. Inputs must be fully materialized
//! [`Volume`]s; no I/O happens here.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeSet;
//!
//! use nalgebra::Vector3;
//! use stitch_match::{find_seeds, SeedOutcome, StitchConfig};
//! use stitch_types::SegmentId;
//! use stitch_volume::Volume;
//!
//! // Two 10^3 chunks overlapping 6 voxels along X; segment 1 fills the
//! // pre chunk, segment 9 sits in the post chunk's side of the overlap.
//! let dims = Vector3::new(10, 10, 10);
//! let res = Vector3::new(4, 4, 4);
//! let pre = Volume::from_labels(Vector3::zeros(), res, dims, vec![1; 1000]).unwrap();
//! let mut post_ids = vec![0u32; 1000];
//! for z in 0..10 {
//!     for y in 0..10 {
//!         for x in 1..5 {
//!             post_ids[x + y * 10 + z * 100] = 9;
//!         }
//!     }
//! }
//! let post = Volume::from_labels(Vector3::new(16, 0, 0), res, dims, post_ids).unwrap();
//!
//! let selected: BTreeSet<_> = [SegmentId::new(1)].into_iter().collect();
//! let outcome = find_seeds(&pre, &selected, &post, &StitchConfig::default()).unwrap();
//!
//! let SeedOutcome::Seeds(seeds) = outcome else { panic!("expected seeds") };
//! assert_eq!(seeds.len(), 1);
//! assert_eq!(seeds[0].post_segments.get(&SegmentId::new(9)), Some(&400));
//! ```
//!
//! # Quality Standards
//!
//! This crate maintains the standards in [STANDARDS.md](../../STANDARDS.md):
//! - Zero clippy/doc warnings
//! - Zero `unwrap`/`expect` in library code

// Safety: Deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod components;
mod roi;
mod seeds;
mod sizes;
mod spawn;

use std::collections::BTreeSet;
use std::time::Instant;

use tracing::{debug, info, warn};

// Re-export the vocabulary callers need alongside the entry points.
pub use stitch_types::{
    EscapeMargin, Seed, SeedOutcome, SegmentFilter, SegmentId, SpawnOutcome, SpawnTable,
    StitchConfig, StitchError,
};
pub use stitch_volume::Volume;

use crate::roi::RoiOutcome;

/// Determines the post-chunk continuations of the selected pre segments.
///
/// One seed per connected component of selected, valid pre segments that
/// reaches the escape band at the shared seam; components that never do
/// are ROI-trimming artifacts and are dropped. Every escaping component
/// with at least one observed post segment yields a non-empty seed.
///
/// Invalid segment IDs in `selected` (background, out of range, dust) are
/// silently ignored.
///
/// # Errors
///
/// Returns [`StitchError::ResolutionMismatch`] when the chunks disagree on
/// voxel resolution and [`StitchError::InvalidConfig`] for out-of-range
/// configuration. Geometric dead ends are not errors but
/// [`SeedOutcome`] variants.
pub fn find_seeds(
    pre: &Volume,
    selected: &BTreeSet<SegmentId>,
    post: &Volume,
    config: &StitchConfig,
) -> Result<SeedOutcome, StitchError> {
    config.validate()?;

    let started = Instant::now();
    let plan = match roi::plan_selected(pre, selected, post, config)? {
        Ok(plan) => plan,
        Err(RoiOutcome::NoOverlap) => {
            debug!("chunk boxes do not overlap");
            return Ok(SeedOutcome::NoOverlap);
        }
        Err(RoiOutcome::NoCandidates) => {
            debug!("no selected segments in the post half of the overlap");
            return Ok(SeedOutcome::NoCandidates);
        }
        Err(RoiOutcome::TooLarge { volume, ceiling }) => {
            warn!(volume, ceiling, "region of interest exceeds the ceiling");
            return Ok(SeedOutcome::RoiTooLarge { volume, ceiling });
        }
    };

    let filter = config.segment_filter();
    let mut scan = components::scan_components(pre, post, selected, &plan, &filter);
    debug!(
        included = scan.included.len(),
        post_candidates = scan.candidates.len(),
        elapsed = ?started.elapsed(),
        "component scan done"
    );

    let pass = Instant::now();
    let post_sizes =
        sizes::accumulate_post_sizes(post, &plan, &scan.candidates, config.post_window_expansion());
    debug!(elapsed = ?pass.elapsed(), "post segment sizes accumulated");

    let pass = Instant::now();
    let escape_margin = config.escape_margin().resolve(plan.overlap);
    let all = components::classify_components(&mut scan, pre, post, &plan, escape_margin);
    debug!(
        components = all.len(),
        elapsed = ?pass.elapsed(),
        "components classified"
    );

    let mut seeds = Vec::new();
    let mut discarded = 0_usize;
    for component in &all {
        if component.escapes {
            seeds.push(seeds::make_seed(
                component,
                &scan.overlap_counts,
                &post_sizes,
                config,
            ));
        } else {
            debug!(pre_segments = ?component.pre_segments, "component does not escape");
            discarded += 1;
        }
    }

    info!(
        seeds = seeds.len(),
        discarded,
        elapsed = ?started.elapsed(),
        "stitched chunk pair"
    );
    Ok(SeedOutcome::Seeds(seeds))
}

/// Builds the full pre/post correspondence table over the overlap slab.
///
/// Reports raw overlap for every valid pre segment, independent of any
/// selection and of connectivity filtering, plus pre-side adjacency and a
/// spawn eligibility flag. A strict superset of the information behind
/// [`find_seeds`], at the cost of leaving disambiguation to the consumer.
///
/// # Errors
///
/// Returns [`StitchError::ResolutionMismatch`] when the chunks disagree on
/// voxel resolution and [`StitchError::InvalidConfig`] for out-of-range
/// configuration.
pub fn build_spawn_table(
    pre: &Volume,
    post: &Volume,
    config: &StitchConfig,
) -> Result<SpawnOutcome, StitchError> {
    config.validate()?;

    let started = Instant::now();
    let plan = match roi::plan_full(pre, post, config)? {
        Ok(plan) => plan,
        // The full plan carries no selection, so candidates cannot run dry.
        Err(RoiOutcome::NoOverlap | RoiOutcome::NoCandidates) => {
            debug!("chunk boxes do not overlap");
            return Ok(SpawnOutcome::NoOverlap);
        }
        Err(RoiOutcome::TooLarge { volume, ceiling }) => {
            warn!(volume, ceiling, "region of interest exceeds the ceiling");
            return Ok(SpawnOutcome::RoiTooLarge { volume, ceiling });
        }
    };

    let filter = config.segment_filter();
    let scan = spawn::scan_overlap(pre, post, &plan, &filter);
    debug!(
        pre_segments = scan.pre_post.len(),
        post_segments = scan.post_pre.len(),
        elapsed = ?started.elapsed(),
        "overlap scan done"
    );

    let table = spawn::assemble_table(&scan, pre, &plan, &filter);
    info!(
        entries = table.len(),
        spawnable = table.spawnable().count(),
        elapsed = ?started.elapsed(),
        "spawn table built"
    );
    Ok(SpawnOutcome::Table(table))
}
