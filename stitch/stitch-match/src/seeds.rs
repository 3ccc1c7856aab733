//! Seed selection for one escaping component.

use std::collections::HashMap;

use tracing::debug;

use stitch_types::{Seed, SegmentId, StitchConfig};

use crate::components::VoxelComponent;

/// Converts one escaping component's post-segment candidates into a seed.
///
/// Two tiers:
///
/// 1. Every post segment with at least `match_threshold` of its windowed
///    size covered by the selection is accepted outright; the strict
///    ratio catches unambiguous continuations.
/// 2. If nothing clears the bar, the single best segment under the
///    Laplace-smoothed score `(overlap + K) / (size + 2K)` is taken alone,
///    so an object shattered into many small post-side pieces still
///    yields a seed. The prior dampens the ratio of tiny fragments, which
///    would otherwise win on a perfect but meaningless 1/1.
pub(crate) fn make_seed(
    component: &VoxelComponent,
    overlap_counts: &HashMap<SegmentId, u64>,
    sizes: &HashMap<SegmentId, u64>,
    config: &StitchConfig,
) -> Seed {
    let mut seed = Seed {
        pre_segments: component.pre_segments.clone(),
        ..Seed::new()
    };

    let k = config.smoothing_prior();
    let mut best: Option<SegmentId> = None;
    let mut best_score = 0.0_f64;
    let mut best_size = 0_u64;

    for &seg in &component.post_segments {
        let overlap = overlap_counts.get(&seg).copied().unwrap_or(0);
        let size = sizes.get(&seg).copied().unwrap_or(0);
        if size == 0 {
            continue;
        }

        #[allow(clippy::cast_precision_loss)]
        let ratio = overlap as f64 / size as f64;
        if ratio >= config.match_threshold() {
            seed.post_segments.insert(seg, size);
        }

        #[allow(clippy::cast_precision_loss)]
        let weighted = (overlap as f64 + k) / (size as f64 + 2.0 * k);
        if weighted >= best_score {
            best = Some(seg);
            best_score = weighted;
            best_size = size;
        }
    }

    if seed.post_segments.is_empty() {
        if let Some(seg) = best {
            debug!(
                segment = %seg,
                score = best_score,
                "no post segment cleared the match threshold, taking the best-scoring one"
            );
            seed.post_segments.insert(seg, best_size);
        }
    }

    seed
}
