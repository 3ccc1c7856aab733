//! Per-segment catalog: voxel counts and bounding boxes.

use nalgebra::Vector3;
use stitch_types::{Box3, SegmentId};

use crate::error::VolumeError;
use crate::labels::LabelArray;
use crate::meta::{LabelType, VolumeMeta};

/// Per-segment voxel counts and bounding boxes, indexed by segment ID.
///
/// Index 0 is the background slot; it stays at size 0 with empty bounds.
/// Out-of-range lookups behave like background; segment validity is a
/// policy question answered elsewhere, the catalog never fails a read.
///
/// Boxes are half-open in this crate's convention. Bounds decoded from a
/// producer's buffers are trusted as given; bounds derived by
/// [`SegmentCatalog::from_labels`] always satisfy it.
#[derive(Debug, Clone)]
pub struct SegmentCatalog {
    sizes: Vec<u64>,
    bounds_voxel: Vec<Box3>,
    bounds_physical: Vec<Box3>,
}

impl SegmentCatalog {
    /// Decodes the catalog from the stored little-endian buffers.
    ///
    /// The size buffer holds one count per segment; the bounds buffer
    /// holds six values per segment (min then max corner), both at the
    /// element widths the metadata names. Physical bounds are derived as
    /// `voxel_bounds * resolution + physical_min`.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeError::CatalogBufferLength`] when either buffer
    /// does not match the metadata's segment count.
    pub fn from_raw(
        meta: &VolumeMeta,
        raw_bounds: &[u8],
        raw_sizes: &[u8],
    ) -> Result<Self, VolumeError> {
        let count = meta.segment_count() as usize;

        let expected_sizes = count * meta.size_type().byte_size();
        if raw_sizes.len() != expected_sizes {
            return Err(VolumeError::CatalogBufferLength {
                what: "size",
                expected: expected_sizes,
                actual: raw_sizes.len(),
            });
        }
        let expected_bounds = count * 6 * meta.bbox_type().byte_size();
        if raw_bounds.len() != expected_bounds {
            return Err(VolumeError::CatalogBufferLength {
                what: "bounds",
                expected: expected_bounds,
                actual: raw_bounds.len(),
            });
        }

        let sizes = decode_values(meta.size_type(), raw_sizes);
        let corners = decode_values(meta.bbox_type(), raw_bounds);

        let resolution = meta.resolution();
        let physical_min = meta.physical_bounds().min();

        let mut bounds_voxel = Vec::with_capacity(count);
        let mut bounds_physical = Vec::with_capacity(count);
        for values in corners.chunks_exact(6) {
            #[allow(clippy::cast_possible_wrap)]
            let voxel = Box3::new(
                Vector3::new(values[0] as i64, values[1] as i64, values[2] as i64),
                Vector3::new(values[3] as i64, values[4] as i64, values[5] as i64),
            );
            bounds_voxel.push(voxel);
            bounds_physical.push(voxel.scale_up(resolution).translate(physical_min));
        }

        Ok(Self {
            sizes,
            bounds_voxel,
            bounds_physical,
        })
    }

    /// Derives the catalog by scanning a label array.
    ///
    /// One pass over the labels: per-segment voxel counts and tight
    /// half-open bounds, with physical bounds placed by the chunk's
    /// resolution and physical minimum. The background slot is left empty.
    #[must_use]
    pub fn from_labels(
        labels: &LabelArray,
        resolution: Vector3<i64>,
        physical_min: Vector3<i64>,
    ) -> Self {
        let dims = labels.dimensions();
        let mut sizes: Vec<u64> = Vec::new();
        let mut bounds_voxel: Vec<Box3> = Vec::new();

        for z in 0..dims.z {
            for y in 0..dims.y {
                for x in 0..dims.x {
                    let id = labels.get(x, y, z);
                    if id.is_background() {
                        continue;
                    }
                    let slot = id.raw() as usize;
                    if slot >= sizes.len() {
                        sizes.resize(slot + 1, 0);
                        bounds_voxel.resize(slot + 1, Box3::empty());
                    }
                    sizes[slot] += 1;
                    let voxel = Box3::new(
                        Vector3::new(x, y, z),
                        Vector3::new(x + 1, y + 1, z + 1),
                    );
                    bounds_voxel[slot] = bounds_voxel[slot].merge(&voxel);
                }
            }
        }

        let bounds_physical = bounds_voxel
            .iter()
            .map(|b| {
                if b.is_empty() {
                    Box3::empty()
                } else {
                    b.scale_up(resolution).translate(physical_min)
                }
            })
            .collect();

        Self {
            sizes,
            bounds_voxel,
            bounds_physical,
        }
    }

    /// Number of catalog entries, background slot included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// `true` when the catalog holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Voxel count of a segment; 0 for background or out-of-range IDs.
    #[must_use]
    pub fn size(&self, id: SegmentId) -> u64 {
        self.sizes.get(id.raw() as usize).copied().unwrap_or(0)
    }

    /// Local-voxel bounds of a segment; empty for out-of-range IDs.
    #[must_use]
    pub fn bounds_voxel(&self, id: SegmentId) -> Box3 {
        self.bounds_voxel
            .get(id.raw() as usize)
            .copied()
            .unwrap_or_else(Box3::empty)
    }

    /// Physical bounds of a segment; empty for out-of-range IDs.
    #[must_use]
    pub fn bounds_physical(&self, id: SegmentId) -> Box3 {
        self.bounds_physical
            .get(id.raw() as usize)
            .copied()
            .unwrap_or_else(Box3::empty)
    }
}

/// Widens a little-endian buffer of `label_type` elements to `u64`.
fn decode_values(label_type: LabelType, bytes: &[u8]) -> Vec<u64> {
    match label_type {
        LabelType::U8 => bytes.iter().map(|&b| u64::from(b)).collect(),
        LabelType::U16 => bytes
            .chunks_exact(2)
            .map(|c| u64::from(u16::from_le_bytes([c[0], c[1]])))
            .collect(),
        LabelType::U32 => bytes
            .chunks_exact(4)
            .map(|c| u64::from(u32::from_le_bytes([c[0], c[1], c[2], c[3]])))
            .collect(),
    }
}
