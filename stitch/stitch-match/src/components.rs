//! Connected components of selected pre segments within the ROI.
//!
//! One ascending pass over the ROI unions face-adjacent voxels whose pre
//! segments are valid and selected; a reduction pass then folds per-voxel
//! observations into one record per component. Scanning strictly ascending
//! and testing only the three already-visited neighbors discovers full
//! 6-connectivity without double work.

use std::collections::{BTreeSet, HashMap, HashSet};

use nalgebra::Vector3;

use stitch_types::{in_escape_margin, SegmentFilter, SegmentId};
use stitch_volume::Volume;

use crate::roi::RoiPlan;

/// Union-Find (Disjoint-Set Union) over linearized ROI voxels.
///
/// Path compression plus union by rank; amortized near-constant time per
/// operation.
pub(crate) struct UnionFind {
    /// Parent pointers (index of parent, or self if root).
    parent: Vec<usize>,
    /// Rank for union by rank optimization.
    rank: Vec<usize>,
}

impl UnionFind {
    /// Create a new union-find with n elements.
    pub(crate) fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    /// Find the root of the set containing element x, with path compression.
    pub(crate) fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    /// Union the sets containing x and y, using union by rank.
    pub(crate) fn union(&mut self, x: usize, y: usize) {
        let root_x = self.find(x);
        let root_y = self.find(y);

        if root_x == root_y {
            return;
        }

        match self.rank[root_x].cmp(&self.rank[root_y]) {
            std::cmp::Ordering::Less => {
                self.parent[root_x] = root_y;
            }
            std::cmp::Ordering::Greater => {
                self.parent[root_y] = root_x;
            }
            std::cmp::Ordering::Equal => {
                self.parent[root_y] = root_x;
                self.rank[root_x] += 1;
            }
        }
    }
}

/// Raw results of the component scan pass.
pub(crate) struct ComponentScan {
    /// Partition of included voxels.
    pub sets: UnionFind,
    /// Linear indices of voxels whose pre segment is valid and selected,
    /// in scan order.
    pub included: Vec<usize>,
    /// Voxels of each post segment seen under the selection within the
    /// ROI: the numerators of the match ratios.
    pub overlap_counts: HashMap<SegmentId, u64>,
    /// Post segments seen at all; the size accumulator tallies only these.
    pub candidates: HashSet<SegmentId>,
}

/// One connected component of selected pre segments.
///
/// The escape flag is monotone: the reduction pass only ever turns it on.
/// Components that never enter the escape band exist only as ROI-trimming
/// artifacts and are dropped by the caller.
#[derive(Debug, Clone)]
pub(crate) struct VoxelComponent {
    /// Post segments observed under this component (background excluded).
    pub post_segments: BTreeSet<SegmentId>,
    /// Selected pre segments this component joins.
    pub pre_segments: BTreeSet<SegmentId>,
    /// Whether any voxel of this component reaches the escape band at the
    /// shared seam.
    pub escapes: bool,
}

/// The single ascending pass over the ROI.
///
/// Voxels are linearized row-major (x fastest) within the ROI extent. For
/// each voxel carrying a valid, selected pre segment: tally the post
/// segment underneath it, record the voxel, and union it with the three
/// already-visited face neighbors that also carry valid selected segments.
pub(crate) fn scan_components(
    pre: &Volume,
    post: &Volume,
    selected: &BTreeSet<SegmentId>,
    plan: &RoiPlan,
    filter: &SegmentFilter,
) -> ComponentScan {
    let dim = plan.dim;
    #[allow(clippy::cast_possible_truncation)]
    let mut sets = UnionFind::new(plan.roi_world.volume() as usize);
    let mut included = Vec::new();
    let mut overlap_counts: HashMap<SegmentId, u64> = HashMap::new();
    let mut candidates: HashSet<SegmentId> = HashSet::new();

    let pre_min = plan.pre_local.min();
    let post_min = plan.post_local.min();

    let accepts = |seg: SegmentId| selected.contains(&seg) && pre.segment_passes(seg, filter);

    for z in 0..dim.z {
        for y in 0..dim.y {
            for x in 0..dim.x {
                let seg = pre.segment_at(pre_min.x + x, pre_min.y + y, pre_min.z + z);
                if !accepts(seg) {
                    continue;
                }

                let post_seg = post.segment_at(post_min.x + x, post_min.y + y, post_min.z + z);
                if !post_seg.is_background() {
                    candidates.insert(post_seg);
                    *overlap_counts.entry(post_seg).or_insert(0) += 1;
                }

                #[allow(clippy::cast_sign_loss)]
                let proxy = (x + y * dim.x + z * dim.x * dim.y) as usize;
                included.push(proxy);

                if x > 0 && accepts(pre.segment_at(pre_min.x + x - 1, pre_min.y + y, pre_min.z + z))
                {
                    sets.union(proxy, proxy - 1);
                }
                if y > 0 && accepts(pre.segment_at(pre_min.x + x, pre_min.y + y - 1, pre_min.z + z))
                {
                    #[allow(clippy::cast_sign_loss)]
                    sets.union(proxy, proxy - dim.x as usize);
                }
                if z > 0 && accepts(pre.segment_at(pre_min.x + x, pre_min.y + y, pre_min.z + z - 1))
                {
                    #[allow(clippy::cast_sign_loss)]
                    sets.union(proxy, proxy - (dim.x * dim.y) as usize);
                }
            }
        }
    }

    ComponentScan {
        sets,
        included,
        overlap_counts,
        candidates,
    }
}

/// Folds per-voxel observations into one record per component.
///
/// Components live in an arena indexed by first contact; the union-find
/// root maps into the arena, so there is no parallel bookkeeping keyed by
/// raw roots. Records come back in scan discovery order.
pub(crate) fn classify_components(
    scan: &mut ComponentScan,
    pre: &Volume,
    post: &Volume,
    plan: &RoiPlan,
    escape_margin: i64,
) -> Vec<VoxelComponent> {
    let ComponentScan { sets, included, .. } = scan;

    let dim = plan.dim;
    let mut arena: Vec<VoxelComponent> = Vec::new();
    let mut root_to_component: HashMap<usize, usize> = HashMap::new();

    for &proxy in included.iter() {
        #[allow(clippy::cast_possible_wrap)]
        let proxy = proxy as i64;
        let pos = Vector3::new(
            proxy % dim.x,
            (proxy / dim.x) % dim.y,
            proxy / (dim.x * dim.y),
        );

        #[allow(clippy::cast_sign_loss)]
        let root = sets.find(proxy as usize);
        let index = *root_to_component.entry(root).or_insert_with(|| {
            arena.push(VoxelComponent {
                post_segments: BTreeSet::new(),
                pre_segments: BTreeSet::new(),
                escapes: false,
            });
            arena.len() - 1
        });
        let component = &mut arena[index];

        let post_pos = pos + plan.post_local.min();
        let post_seg = post.segment_at(post_pos.x, post_pos.y, post_pos.z);
        if !post_seg.is_background() {
            component.post_segments.insert(post_seg);
        }

        let pre_pos = pos + plan.pre_local.min();
        component
            .pre_segments
            .insert(pre.segment_at(pre_pos.x, pre_pos.y, pre_pos.z));

        if !component.escapes
            && in_escape_margin(
                pos + plan.roi_world.min(),
                &plan.pre_world,
                plan.dir,
                escape_margin,
            )
        {
            component.escapes = true;
        }
    }

    arena
}
