//! The chunk volume facade.

use nalgebra::Vector3;
use stitch_types::{Box3, SegmentFilter, SegmentId};

use crate::catalog::SegmentCatalog;
use crate::error::VolumeError;
use crate::labels::LabelArray;
use crate::meta::VolumeMeta;

/// One rectangular chunk of a segmented dataset.
///
/// Immutable: a volume is materialized once per query from its decoded
/// parts and only read afterwards. It knows its placement in physical
/// units, its voxel resolution, its segment catalog and its label field:
/// everything the stitching core needs, and nothing about where the bytes
/// came from.
#[derive(Debug, Clone)]
pub struct Volume {
    physical_bounds: Box3,
    resolution: Vector3<i64>,
    catalog: SegmentCatalog,
    labels: LabelArray,
}

impl Volume {
    /// Assembles a volume from decoded metadata and the chunk's stored
    /// buffers (catalog bounds, catalog sizes, label array).
    ///
    /// # Errors
    ///
    /// Returns a [`VolumeError`] when any buffer length disagrees with the
    /// metadata.
    pub fn from_parts(
        meta: &VolumeMeta,
        raw_bounds: &[u8],
        raw_sizes: &[u8],
        raw_labels: &[u8],
    ) -> Result<Self, VolumeError> {
        let catalog = SegmentCatalog::from_raw(meta, raw_bounds, raw_sizes)?;
        let labels = LabelArray::from_bytes(meta.id_type(), meta.dimensions(), raw_labels)?;
        Ok(Self {
            physical_bounds: meta.physical_bounds(),
            resolution: meta.resolution(),
            catalog,
            labels,
        })
    }

    /// Builds a volume directly from widened label IDs, deriving the
    /// catalog by one scan.
    ///
    /// This is the path for synthetic volumes and for producers that ship
    /// no precomputed catalog. The physical placement is
    /// `[physical_min, physical_min + dimensions * resolution)`.
    ///
    /// # Errors
    ///
    /// Returns a [`VolumeError`] for non-positive dimensions or
    /// resolution, or a label vector of the wrong length.
    pub fn from_labels(
        physical_min: Vector3<i64>,
        resolution: Vector3<i64>,
        dimensions: Vector3<i64>,
        ids: Vec<u32>,
    ) -> Result<Self, VolumeError> {
        if resolution.x <= 0 || resolution.y <= 0 || resolution.z <= 0 {
            return Err(VolumeError::InvalidResolution {
                x: resolution.x,
                y: resolution.y,
                z: resolution.z,
            });
        }
        let labels = LabelArray::from_raw_ids(dimensions, ids)?;
        let catalog = SegmentCatalog::from_labels(&labels, resolution, physical_min);
        let physical_max = physical_min + dimensions.component_mul(&resolution);
        Ok(Self {
            physical_bounds: Box3::new(physical_min, physical_max),
            resolution,
            catalog,
            labels,
        })
    }

    /// The chunk's placement in physical units.
    #[must_use]
    pub fn physical_bounds(&self) -> Box3 {
        self.physical_bounds
    }

    /// Physical units per voxel, per axis.
    #[must_use]
    pub fn resolution(&self) -> Vector3<i64> {
        self.resolution
    }

    /// Chunk extent in voxels.
    #[must_use]
    pub fn dimensions(&self) -> Vector3<i64> {
        self.labels.dimensions()
    }

    /// Number of catalog entries, background slot included.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.catalog.len()
    }

    /// Voxel count of a segment; 0 for background or out-of-range IDs.
    #[must_use]
    pub fn segment_size(&self, id: SegmentId) -> u64 {
        self.catalog.size(id)
    }

    /// Local-voxel bounds of a segment; empty for out-of-range IDs.
    #[must_use]
    pub fn segment_bounds_voxel(&self, id: SegmentId) -> Box3 {
        self.catalog.bounds_voxel(id)
    }

    /// Physical bounds of a segment; empty for out-of-range IDs.
    #[must_use]
    pub fn segment_bounds_physical(&self, id: SegmentId) -> Box3 {
        self.catalog.bounds_physical(id)
    }

    /// The label at a local voxel coordinate. O(1), row-major.
    #[must_use]
    pub fn segment_at(&self, x: i64, y: i64, z: i64) -> SegmentId {
        self.labels.get(x, y, z)
    }

    /// The underlying label array.
    #[must_use]
    pub fn labels(&self) -> &LabelArray {
        &self.labels
    }

    /// The underlying segment catalog.
    #[must_use]
    pub fn catalog(&self) -> &SegmentCatalog {
        &self.catalog
    }

    /// Whether a segment is valid for matching: nonzero, within catalog
    /// range, and above the filter's dust thresholds (voxel count and
    /// per-axis bounding-box extent, both strict).
    #[must_use]
    pub fn segment_passes(&self, id: SegmentId, filter: &SegmentFilter) -> bool {
        if id.is_background() || id.raw() as usize >= self.catalog.len() {
            return false;
        }
        if self.catalog.size(id) <= filter.min_voxel_count() {
            return false;
        }
        let extent = self.catalog.bounds_voxel(id).extent();
        extent.x > filter.min_extent()
            && extent.y > filter.min_extent()
            && extent.z > filter.min_extent()
    }
}
