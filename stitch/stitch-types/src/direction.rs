//! Separation direction between two overlapping chunks.
//!
//! Adjacent chunks of a dataset overlap in a thin slab along exactly one
//! axis. The [`Direction`] names that axis and the side of the pre chunk
//! the post chunk lies on; the free functions trim and measure the overlap
//! slab and test proximity to the shared seam.

use nalgebra::Vector3;

use crate::box3::Box3;

/// A coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// The X axis.
    X,
    /// The Y axis.
    Y,
    /// The Z axis.
    Z,
}

impl Axis {
    /// Index of this axis into a coordinate triple.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}

/// The face of the pre chunk along which the post chunk lies.
///
/// `XMin` means post borders pre's low-X face, `XMax` its high-X face, and
/// so on. Detection is driven purely by box geometry, see
/// [`Direction::between`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// Post lies below pre along X.
    XMin,
    /// Post lies above pre along X.
    XMax,
    /// Post lies below pre along Y.
    YMin,
    /// Post lies above pre along Y.
    YMax,
    /// Post lies below pre along Z.
    ZMin,
    /// Post lies above pre along Z.
    ZMax,
}

impl Direction {
    /// The separation axis.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::XMin | Self::XMax => Axis::X,
            Self::YMin | Self::YMax => Axis::Y,
            Self::ZMin | Self::ZMax => Axis::Z,
        }
    }

    /// `true` for the `*Min` directions (post on the low side of pre).
    #[must_use]
    pub const fn is_min(self) -> bool {
        matches!(self, Self::XMin | Self::YMin | Self::ZMin)
    }

    /// The opposite face: swapping pre and post flips the sign and keeps
    /// the axis.
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::XMin => Self::XMax,
            Self::XMax => Self::XMin,
            Self::YMin => Self::YMax,
            Self::YMax => Self::YMin,
            Self::ZMin => Self::ZMax,
            Self::ZMax => Self::ZMin,
        }
    }

    /// Detects the direction from `pre` to `post` from their boxes.
    ///
    /// The separation axis is the one whose intersection extent is strictly
    /// smaller than both others. Ties resolve by fixed priority X, then Y,
    /// then Z (Z when no axis is uniquely smallest), so detection is never
    /// ambiguous at runtime. Along that axis the sign is `Min` iff the
    /// intersection minimum exceeds the post box minimum.
    ///
    /// Returns `None` when the boxes are disjoint.
    ///
    /// # Example
    ///
    /// ```
    /// use stitch_types::{Box3, Direction};
    /// use nalgebra::Vector3;
    ///
    /// let pre = Box3::new(Vector3::new(0, 0, 0), Vector3::new(10, 10, 10));
    /// let post = Box3::new(Vector3::new(0, 0, 8), Vector3::new(10, 10, 18));
    /// assert_eq!(Direction::between(&pre, &post), Some(Direction::ZMax));
    /// assert_eq!(Direction::between(&post, &pre), Some(Direction::ZMin));
    /// ```
    #[must_use]
    pub fn between(pre: &Box3, post: &Box3) -> Option<Self> {
        let bounds = pre.intersect(post);
        if bounds.is_empty() {
            return None;
        }

        let dims = bounds.extent();

        if dims.x < dims.y && dims.x < dims.z {
            return Some(if bounds.min().x > post.min().x {
                Self::XMin
            } else {
                Self::XMax
            });
        }

        if dims.y < dims.x && dims.y < dims.z {
            return Some(if bounds.min().y > post.min().y {
                Self::YMin
            } else {
                Self::YMax
            });
        }

        Some(if bounds.min().z > post.min().z {
            Self::ZMin
        } else {
            Self::ZMax
        })
    }
}

/// Thickness of the pre/post intersection along the separation axis.
#[must_use]
pub fn overlap_along(pre: &Box3, post: &Box3, dir: Direction) -> i64 {
    pre.intersect(post).extent()[dir.axis().index()]
}

/// Trims the pre/post intersection along the separation axis only.
///
/// The far (pre-interior) side is shrunk by `margin_pre` and the near
/// (post-interior) side by `margin_post`; the other two axes are left
/// unchanged. With margins larger than the overlap the result is empty.
///
/// # Example
///
/// ```
/// use stitch_types::{overlap_region, Box3, Direction};
/// use nalgebra::Vector3;
///
/// let pre = Box3::new(Vector3::new(0, 0, 0), Vector3::new(10, 10, 10));
/// let post = Box3::new(Vector3::new(4, 0, 0), Vector3::new(14, 10, 10));
///
/// // The post half of the 6 voxel overlap.
/// let half = overlap_region(&pre, &post, Direction::XMax, 3, 0);
/// assert_eq!(half.min().x, 7);
/// assert_eq!(half.max().x, 10);
/// ```
#[must_use]
pub fn overlap_region(
    pre: &Box3,
    post: &Box3,
    dir: Direction,
    margin_pre: i64,
    margin_post: i64,
) -> Box3 {
    let bounds = pre.intersect(post);
    let mut min = bounds.min();
    let mut max = bounds.max();
    let a = dir.axis().index();

    if dir.is_min() {
        // Post on the low side: pre's interior is at high coordinates.
        max[a] -= margin_pre;
        min[a] += margin_post;
    } else {
        min[a] += margin_pre;
        max[a] -= margin_post;
    }

    Box3::new(min, max)
}

/// Tests whether `pos` lies within `margin` voxels of the seam that `dir`
/// implies on `bounds`.
///
/// The seam is the face of `bounds` that borders the post chunk. A
/// connected component that never enters this band exists only as an
/// artifact of ROI trimming and is discarded by the classifier.
#[must_use]
pub fn in_escape_margin(pos: Vector3<i64>, bounds: &Box3, dir: Direction, margin: i64) -> bool {
    let a = dir.axis().index();
    if dir.is_min() {
        pos[a] < bounds.min()[a] + margin
    } else {
        pos[a] > bounds.max()[a] - margin
    }
}
