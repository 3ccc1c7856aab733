//! End-to-end stitching scenarios over synthetic chunk pairs.
//!
//! The standard geometry: two 10x10x10 chunks with 4nm cubic voxels, the
//! post chunk shifted +16nm along X, so the world-voxel overlap is x in
//! [4, 10), the post half of the overlap is x in [7, 10) and the scanned
//! slab (margin 1 on both faces) is x in [5, 9). With the default
//! half-overlap escape policy the escape band is x > 7.

use std::collections::BTreeSet;

use nalgebra::Vector3;
use stitch_match::{
    build_spawn_table, find_seeds, SeedOutcome, SegmentId, SpawnOutcome, StitchConfig, Volume,
};

fn dims() -> Vector3<i64> {
    Vector3::new(10, 10, 10)
}

fn res() -> Vector3<i64> {
    Vector3::new(4, 4, 4)
}

/// Paints `id` over a local-coordinate box (half-open) in a 10^3 chunk.
fn paint(ids: &mut [u32], id: u32, min: [i64; 3], max: [i64; 3]) {
    for z in min[2]..max[2] {
        for y in min[1]..max[1] {
            for x in min[0]..max[0] {
                ids[(x + y * 10 + z * 100) as usize] = id;
            }
        }
    }
}

fn pre_volume(ids: Vec<u32>) -> Volume {
    Volume::from_labels(Vector3::new(0, 0, 0), res(), dims(), ids).unwrap()
}

fn post_volume(ids: Vec<u32>) -> Volume {
    Volume::from_labels(Vector3::new(16, 0, 0), res(), dims(), ids).unwrap()
}

fn select(ids: &[u32]) -> BTreeSet<SegmentId> {
    ids.iter().map(|&id| SegmentId::new(id)).collect()
}

/// Scenario A: one shared object across the +X face.
#[test]
fn single_shared_segment_yields_one_seed_with_true_size() {
    let mut pre_ids = vec![0u32; 1000];
    paint(&mut pre_ids, 1, [0, 0, 0], [10, 10, 10]);

    // Post segment 9 fills exactly the post-local slab under the ROI,
    // x in [1, 5): its true voxel count equals what the window tallies.
    let mut post_ids = vec![0u32; 1000];
    paint(&mut post_ids, 9, [1, 0, 0], [5, 10, 10]);

    let outcome = find_seeds(
        &pre_volume(pre_ids),
        &select(&[1]),
        &post_volume(post_ids),
        &StitchConfig::default(),
    )
    .unwrap();

    let SeedOutcome::Seeds(seeds) = outcome else {
        panic!("expected a completed seed list, got {outcome:?}");
    };
    assert_eq!(seeds.len(), 1);
    assert_eq!(seeds[0].post_segments.len(), 1);
    assert_eq!(seeds[0].post_segments.get(&SegmentId::new(9)), Some(&400));
    assert_eq!(seeds[0].pre_segments, select(&[1]));
}

/// Scenario B: a selection made only of dust dissolves before the
/// boundary.
#[test]
fn dust_only_selection_reports_no_candidates() {
    let mut pre_ids = vec![0u32; 1000];
    // 2x2x2 cube right at the boundary: too small on every threshold.
    paint(&mut pre_ids, 7, [8, 0, 0], [10, 2, 2]);

    let mut post_ids = vec![0u32; 1000];
    paint(&mut post_ids, 9, [0, 0, 0], [10, 10, 10]);

    let outcome = find_seeds(
        &pre_volume(pre_ids),
        &select(&[7]),
        &post_volume(post_ids),
        &StitchConfig::default(),
    )
    .unwrap();
    assert_eq!(outcome, SeedOutcome::NoCandidates);
}

/// Scenario C: disjoint chunks.
#[test]
fn disjoint_chunks_report_no_overlap() {
    let pre = pre_volume(vec![1; 1000]);
    let far_post = Volume::from_labels(Vector3::new(400, 0, 0), res(), dims(), vec![2; 1000]).unwrap();

    let outcome = find_seeds(&pre, &select(&[1]), &far_post, &StitchConfig::default()).unwrap();
    assert_eq!(outcome, SeedOutcome::NoOverlap);

    let spawn = build_spawn_table(&pre, &far_post, &StitchConfig::default()).unwrap();
    assert_eq!(spawn, SpawnOutcome::NoOverlap);
}

/// Scenario D: the ceiling rejects the query before any scan.
#[test]
fn oversized_roi_is_rejected_up_front() {
    let pre = pre_volume(vec![1; 1000]);
    let post = post_volume(vec![9; 1000]);
    let config = StitchConfig::default().with_roi_voxel_ceiling(100);

    let outcome = find_seeds(&pre, &select(&[1]), &post, &config).unwrap();
    assert_eq!(
        outcome,
        SeedOutcome::RoiTooLarge {
            volume: 400,
            ceiling: 100
        }
    );

    let spawn = build_spawn_table(&pre, &post, &config).unwrap();
    assert_eq!(
        spawn,
        SpawnOutcome::RoiTooLarge {
            volume: 400,
            ceiling: 100
        }
    );
}

/// Two selected objects separated by background form two components and
/// two seeds, in scan discovery order.
#[test]
fn disconnected_selections_yield_separate_seeds() {
    let mut pre_ids = vec![0u32; 1000];
    paint(&mut pre_ids, 1, [0, 0, 0], [10, 4, 10]);
    paint(&mut pre_ids, 3, [0, 6, 0], [10, 10, 10]);

    let mut post_ids = vec![0u32; 1000];
    paint(&mut post_ids, 9, [1, 0, 0], [5, 4, 10]);
    paint(&mut post_ids, 11, [1, 6, 0], [5, 10, 10]);

    let outcome = find_seeds(
        &pre_volume(pre_ids),
        &select(&[1, 3]),
        &post_volume(post_ids),
        &StitchConfig::default(),
    )
    .unwrap();

    let SeedOutcome::Seeds(seeds) = outcome else {
        panic!("expected seeds");
    };
    assert_eq!(seeds.len(), 2);
    // Scan order is ascending y: segment 1's component first.
    assert_eq!(seeds[0].pre_segments, select(&[1]));
    assert!(seeds[0].post_segments.contains_key(&SegmentId::new(9)));
    assert_eq!(seeds[1].pre_segments, select(&[3]));
    assert!(seeds[1].post_segments.contains_key(&SegmentId::new(11)));
}

/// Face-adjacent selected segments union into one component; the seed
/// carries both pre IDs.
#[test]
fn touching_selections_merge_into_one_component() {
    let mut pre_ids = vec![0u32; 1000];
    paint(&mut pre_ids, 1, [0, 0, 0], [10, 5, 10]);
    paint(&mut pre_ids, 2, [0, 5, 0], [10, 10, 10]);

    let mut post_ids = vec![0u32; 1000];
    paint(&mut post_ids, 9, [1, 0, 0], [5, 10, 10]);

    let outcome = find_seeds(
        &pre_volume(pre_ids),
        &select(&[1, 2]),
        &post_volume(post_ids),
        &StitchConfig::default(),
    )
    .unwrap();

    let SeedOutcome::Seeds(seeds) = outcome else {
        panic!("expected seeds");
    };
    assert_eq!(seeds.len(), 1);
    assert_eq!(seeds[0].pre_segments, select(&[1, 2]));
}

/// Diagonal contact is not 6-connectivity: one segment painted as two
/// edge-touching blocks stays two components.
#[test]
fn diagonal_contact_does_not_connect() {
    let mut pre_ids = vec![0u32; 1000];
    paint(&mut pre_ids, 1, [0, 0, 0], [10, 5, 5]);
    paint(&mut pre_ids, 1, [0, 5, 5], [10, 10, 10]);

    let mut post_ids = vec![0u32; 1000];
    paint(&mut post_ids, 9, [1, 0, 0], [5, 10, 10]);

    let outcome = find_seeds(
        &pre_volume(pre_ids),
        &select(&[1]),
        &post_volume(post_ids),
        &StitchConfig::default(),
    )
    .unwrap();

    let SeedOutcome::Seeds(seeds) = outcome else {
        panic!("expected seeds");
    };
    assert_eq!(seeds.len(), 2);
    assert_eq!(seeds[0].pre_segments, select(&[1]));
    assert_eq!(seeds[1].pre_segments, select(&[1]));
}

/// A component that only grazes the far side of the slab never escapes
/// and is discarded; the query still completes.
#[test]
fn non_escaping_component_is_discarded() {
    let mut pre_ids = vec![0u32; 1000];
    // Valid segment confined to x in [5, 7): inside the slab, but never
    // past the escape threshold x > 7.
    paint(&mut pre_ids, 1, [5, 0, 0], [7, 10, 10]);

    let mut post_ids = vec![0u32; 1000];
    paint(&mut post_ids, 9, [0, 0, 0], [10, 10, 10]);

    let outcome = find_seeds(
        &pre_volume(pre_ids),
        &select(&[1]),
        &post_volume(post_ids),
        &StitchConfig::default(),
    )
    .unwrap();

    let SeedOutcome::Seeds(seeds) = outcome else {
        panic!("expected a completed (empty) seed list");
    };
    assert!(seeds.is_empty());
}

/// A fixed escape margin wide enough turns the same geometry into a
/// continuation.
#[test]
fn fixed_escape_margin_overrides_half_overlap() {
    let mut pre_ids = vec![0u32; 1000];
    paint(&mut pre_ids, 1, [5, 0, 0], [7, 10, 10]);

    let mut post_ids = vec![0u32; 1000];
    paint(&mut post_ids, 9, [0, 0, 0], [10, 10, 10]);

    let config = StitchConfig::default().with_escape_margin(stitch_match::EscapeMargin::Fixed(5));
    let outcome = find_seeds(
        &pre_volume(pre_ids),
        &select(&[1]),
        &post_volume(post_ids),
        &config,
    )
    .unwrap();

    let SeedOutcome::Seeds(seeds) = outcome else {
        panic!("expected seeds");
    };
    assert_eq!(seeds.len(), 1);
}

/// M:N correspondence in the spawn table: window totals, supports,
/// adjacency and spawn eligibility.
#[test]
fn spawn_table_reports_contested_matches() {
    let mut pre_ids = vec![0u32; 1000];
    paint(&mut pre_ids, 1, [0, 0, 0], [10, 6, 10]);
    paint(&mut pre_ids, 2, [0, 6, 0], [10, 10, 10]);

    let mut post_ids = vec![0u32; 1000];
    paint(&mut post_ids, 9, [0, 0, 0], [10, 8, 10]);
    paint(&mut post_ids, 11, [0, 8, 0], [10, 10, 10]);

    let outcome = build_spawn_table(
        &pre_volume(pre_ids),
        &post_volume(post_ids),
        &StitchConfig::default(),
    )
    .unwrap();
    let SpawnOutcome::Table(table) = outcome else {
        panic!("expected a table");
    };

    assert_eq!(table.len(), 2);

    // Segment 1 covers post 9 over y in [0, 6): 4 * 6 * 10 voxels.
    let entry1 = table.get(SegmentId::new(1)).unwrap();
    assert_eq!(entry1.post_matches.len(), 1);
    let match9 = &entry1.post_matches[0];
    assert_eq!(match9.id, SegmentId::new(9));
    // Post 9 spans y in [0, 8) under valid pre segments: 4 * 8 * 10.
    assert_eq!(match9.overlap_size, 320);
    // Contested: both pre segments support post 9.
    assert_eq!(match9.supports.len(), 2);
    assert_eq!(match9.supports[0].id, SegmentId::new(1));
    assert_eq!(match9.supports[0].intersection_size, 240);
    assert_eq!(match9.supports[1].id, SegmentId::new(2));
    assert_eq!(match9.supports[1].intersection_size, 80);
    assert_eq!(entry1.neighbors, vec![SegmentId::new(2)]);
    assert!(entry1.can_spawn);

    // Segment 2 overlaps both post segments.
    let entry2 = table.get(SegmentId::new(2)).unwrap();
    let ids: Vec<_> = entry2.post_matches.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![SegmentId::new(9), SegmentId::new(11)]);
    assert_eq!(entry2.post_matches[1].overlap_size, 80);
    assert_eq!(entry2.neighbors, vec![SegmentId::new(1)]);
    assert!(entry2.can_spawn);
}

/// A valid pre segment overlapping post labels but whose bounds stop short
/// of the post half cannot spawn; dust never gets an entry at all.
#[test]
fn spawn_eligibility_and_dust_exclusion() {
    let mut pre_ids = vec![0u32; 1000];
    // Segment 4 ends at x = 6: overlaps the slab at x = 5 only, and its
    // bounds [0, 6) never reach the post half [7, 10).
    paint(&mut pre_ids, 4, [0, 0, 0], [6, 10, 10]);
    // Dust inside the slab.
    paint(&mut pre_ids, 8, [6, 0, 0], [8, 2, 1]);

    let post_ids = vec![9u32; 1000];

    let outcome = build_spawn_table(
        &pre_volume(pre_ids),
        &post_volume(post_ids),
        &StitchConfig::default(),
    )
    .unwrap();
    let SpawnOutcome::Table(table) = outcome else {
        panic!("expected a table");
    };

    let entry = table.get(SegmentId::new(4)).unwrap();
    assert!(!entry.can_spawn);
    assert_eq!(entry.post_matches.len(), 1);

    // The dust segment was scanned over but filtered out.
    assert!(table.get(SegmentId::new(8)).is_none());
    assert_eq!(table.spawnable().count(), 0);
}

/// The spawn table survives a serde round trip unchanged.
#[test]
fn spawn_table_serde_round_trip() {
    let mut pre_ids = vec![0u32; 1000];
    paint(&mut pre_ids, 1, [0, 0, 0], [10, 10, 10]);
    let post_ids = vec![9u32; 1000];

    let outcome = build_spawn_table(
        &pre_volume(pre_ids),
        &post_volume(post_ids),
        &StitchConfig::default(),
    )
    .unwrap();
    let SpawnOutcome::Table(table) = outcome else {
        panic!("expected a table");
    };

    let encoded = serde_json::to_string(&table).unwrap();
    let decoded: stitch_match::SpawnTable = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, table);
}

/// Mismatched voxel resolutions are a hard precondition violation.
#[test]
fn resolution_mismatch_is_an_error() {
    let pre = pre_volume(vec![1; 1000]);
    let post = Volume::from_labels(Vector3::new(16, 0, 0), Vector3::new(4, 4, 8), dims(), vec![
        9;
        1000
    ])
    .unwrap();

    let err = find_seeds(&pre, &select(&[1]), &post, &StitchConfig::default()).unwrap_err();
    assert!(err.is_resolution_mismatch());

    let err = build_spawn_table(&pre, &post, &StitchConfig::default()).unwrap_err();
    assert!(err.is_resolution_mismatch());
}

/// Invalid configuration is rejected before any geometry work.
#[test]
fn invalid_config_is_an_error() {
    let pre = pre_volume(vec![1; 1000]);
    let post = post_volume(vec![9; 1000]);
    let config = StitchConfig::default().with_match_threshold(0.0);
    assert!(find_seeds(&pre, &select(&[1]), &post, &config).is_err());
}
