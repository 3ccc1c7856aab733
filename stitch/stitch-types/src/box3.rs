//! Axis-aligned box algebra over signed integer coordinates.

use nalgebra::Vector3;

/// An axis-aligned box with `i64` corners, half-open on every axis.
///
/// The minimum corner is inside the box; the maximum corner is one past the
/// last contained coordinate. The same type is used in physical,
/// world-voxel and local-voxel frames, and conversions between frames are
/// always explicit, never implied.
///
/// Coordinates are signed throughout, so [`Box3::dilate`] never needs an
/// underflow clamp and translated boxes may legitimately carry negative
/// corners.
///
/// # Example
///
/// ```
/// use stitch_types::Box3;
/// use nalgebra::Vector3;
///
/// let a = Box3::new(Vector3::new(0, 0, 0), Vector3::new(10, 10, 10));
/// let b = Box3::new(Vector3::new(5, 5, 5), Vector3::new(15, 15, 15));
///
/// let i = a.intersect(&b);
/// assert_eq!(i.min(), Vector3::new(5, 5, 5));
/// assert_eq!(i.max(), Vector3::new(10, 10, 10));
/// assert_eq!(i.volume(), 125);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Box3 {
    min: Vector3<i64>,
    max: Vector3<i64>,
}

impl Box3 {
    /// Creates a box from its corners.
    ///
    /// Corners are taken as given; a box with `max < min` on some axis is
    /// empty, which is meaningful to the overlap math and must not be
    /// "repaired" by reordering.
    #[must_use]
    pub fn new(min: Vector3<i64>, max: Vector3<i64>) -> Self {
        Self { min, max }
    }

    /// Creates the empty box, the identity element of [`Box3::merge`].
    ///
    /// # Example
    ///
    /// ```
    /// use stitch_types::Box3;
    /// use nalgebra::Vector3;
    ///
    /// let b = Box3::new(Vector3::new(1, 2, 3), Vector3::new(4, 5, 6));
    /// assert!(Box3::empty().is_empty());
    /// assert_eq!(Box3::empty().merge(&b), b);
    /// ```
    #[must_use]
    pub fn empty() -> Self {
        Self {
            min: Vector3::repeat(i64::MAX),
            max: Vector3::repeat(i64::MIN),
        }
    }

    /// Minimum corner (inclusive).
    #[must_use]
    pub fn min(&self) -> Vector3<i64> {
        self.min
    }

    /// Maximum corner (exclusive).
    #[must_use]
    pub fn max(&self) -> Vector3<i64> {
        self.max
    }

    /// Returns `true` iff some axis has `max < min`.
    ///
    /// A degenerate box (`max == min` on an axis) contains no voxels but is
    /// not empty; abutting chunks produce exactly such intersections and
    /// must still yield a separation direction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y || self.max.z < self.min.z
    }

    /// Per-axis extent, `max - min`. Negative on empty axes.
    #[must_use]
    pub fn extent(&self) -> Vector3<i64> {
        self.max - self.min
    }

    /// Number of contained voxels; 0 for empty or degenerate boxes.
    ///
    /// # Example
    ///
    /// ```
    /// use stitch_types::Box3;
    /// use nalgebra::Vector3;
    ///
    /// let b = Box3::new(Vector3::new(0, 0, 0), Vector3::new(4, 5, 6));
    /// assert_eq!(b.volume(), 120);
    /// assert_eq!(Box3::empty().volume(), 0);
    /// ```
    #[must_use]
    pub fn volume(&self) -> u64 {
        let e = self.extent();
        if e.x <= 0 || e.y <= 0 || e.z <= 0 {
            return 0;
        }
        #[allow(clippy::cast_sign_loss)]
        {
            (e.x as u64)
                .saturating_mul(e.y as u64)
                .saturating_mul(e.z as u64)
        }
    }

    /// Checks whether a coordinate lies inside (half-open containment).
    #[must_use]
    pub fn contains(&self, pos: Vector3<i64>) -> bool {
        pos.x >= self.min.x
            && pos.x < self.max.x
            && pos.y >= self.min.y
            && pos.y < self.max.y
            && pos.z >= self.min.z
            && pos.z < self.max.z
    }

    /// Intersection: per-axis max of mins, min of maxs. May be empty.
    ///
    /// # Example
    ///
    /// ```
    /// use stitch_types::Box3;
    /// use nalgebra::Vector3;
    ///
    /// let a = Box3::new(Vector3::new(0, 0, 0), Vector3::new(10, 10, 10));
    /// let b = Box3::new(Vector3::new(20, 0, 0), Vector3::new(30, 10, 10));
    /// assert!(a.intersect(&b).is_empty());
    /// ```
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            min: self.min.sup(&other.min),
            max: self.max.inf(&other.max),
        }
    }

    /// Bounding union: per-axis min of mins, max of maxs.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Expands every axis outward by the given margin.
    ///
    /// The signed coordinate domain means no lower-bound clamp is needed;
    /// dilating past zero simply yields negative corners.
    ///
    /// # Example
    ///
    /// ```
    /// use stitch_types::Box3;
    /// use nalgebra::Vector3;
    ///
    /// let b = Box3::new(Vector3::new(0, 0, 0), Vector3::new(4, 4, 4));
    /// let d = b.dilate(Vector3::new(1, 2, 3));
    /// assert_eq!(d.min(), Vector3::new(-1, -2, -3));
    /// assert_eq!(d.max(), Vector3::new(5, 6, 7));
    /// ```
    #[must_use]
    pub fn dilate(&self, margin: Vector3<i64>) -> Self {
        Self {
            min: self.min - margin,
            max: self.max + margin,
        }
    }

    /// Moves both corners by the given offset.
    ///
    /// Frame changes subtract the target frame's origin:
    /// `roi_world.translate(-chunk_world.min())` yields the chunk-local ROI.
    #[must_use]
    pub fn translate(&self, offset: Vector3<i64>) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Divides both corners elementwise; moves a physical-frame box into
    /// the world-voxel frame.
    #[must_use]
    pub fn scale_down(&self, factors: Vector3<i64>) -> Self {
        Self {
            min: self.min.component_div(&factors),
            max: self.max.component_div(&factors),
        }
    }

    /// Multiplies both corners elementwise; the inverse of
    /// [`Box3::scale_down`] up to integer truncation.
    #[must_use]
    pub fn scale_up(&self, factors: Vector3<i64>) -> Self {
        Self {
            min: self.min.component_mul(&factors),
            max: self.max.component_mul(&factors),
        }
    }
}

impl Default for Box3 {
    fn default() -> Self {
        Self::empty()
    }
}
