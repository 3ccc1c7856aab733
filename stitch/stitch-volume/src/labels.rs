//! Dense row-major label storage.

use nalgebra::Vector3;
use stitch_types::SegmentId;

use crate::error::VolumeError;
use crate::meta::LabelType;

/// Width-dispatched label storage.
#[derive(Debug, Clone)]
enum LabelData {
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
}

/// A chunk's dense label field.
///
/// Labels are stored row-major with X varying fastest, matching the stored
/// chunk layout, and are addressed in the chunk's local voxel frame.
/// Lookup is O(1).
///
/// Coordinates handed to [`LabelArray::get`] must lie within
/// [`LabelArray::dimensions`]; the stitching core guarantees this by
/// construction (its ROI is clipped to both chunks).
#[derive(Debug, Clone)]
pub struct LabelArray {
    dimensions: Vector3<i64>,
    data: LabelData,
}

impl LabelArray {
    /// Builds a label array from raw little-endian bytes.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeError::InvalidDimensions`] for non-positive
    /// dimensions and [`VolumeError::LabelBufferLength`] when the buffer
    /// does not hold exactly `x·y·z` elements of the given width.
    pub fn from_bytes(
        label_type: LabelType,
        dimensions: Vector3<i64>,
        bytes: &[u8],
    ) -> Result<Self, VolumeError> {
        let voxels = checked_voxel_count(dimensions)?;
        let expected = voxels * label_type.byte_size();
        if bytes.len() != expected {
            return Err(VolumeError::LabelBufferLength {
                expected,
                actual: bytes.len(),
            });
        }

        let data = match label_type {
            LabelType::U8 => LabelData::U8(bytes.to_vec()),
            LabelType::U16 => LabelData::U16(
                bytes
                    .chunks_exact(2)
                    .map(|c| u16::from_le_bytes([c[0], c[1]]))
                    .collect(),
            ),
            LabelType::U32 => LabelData::U32(
                bytes
                    .chunks_exact(4)
                    .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                    .collect(),
            ),
        };

        Ok(Self { dimensions, data })
    }

    /// Builds a label array from already-widened IDs.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeError::InvalidDimensions`] for non-positive
    /// dimensions and [`VolumeError::LabelBufferLength`] when `ids` does
    /// not hold exactly `x·y·z` values.
    pub fn from_raw_ids(dimensions: Vector3<i64>, ids: Vec<u32>) -> Result<Self, VolumeError> {
        let voxels = checked_voxel_count(dimensions)?;
        if ids.len() != voxels {
            return Err(VolumeError::LabelBufferLength {
                expected: voxels * 4,
                actual: ids.len() * 4,
            });
        }
        Ok(Self {
            dimensions,
            data: LabelData::U32(ids),
        })
    }

    /// Chunk extent in voxels.
    #[must_use]
    pub fn dimensions(&self) -> Vector3<i64> {
        self.dimensions
    }

    /// Total number of voxels.
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.data {
            LabelData::U8(v) => v.len(),
            LabelData::U16(v) => v.len(),
            LabelData::U32(v) => v.len(),
        }
    }

    /// `true` for a zero-voxel array (unreachable through the validated
    /// constructors).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The label at a local voxel coordinate.
    #[must_use]
    pub fn get(&self, x: i64, y: i64, z: i64) -> SegmentId {
        debug_assert!(
            x >= 0 && x < self.dimensions.x && y >= 0 && y < self.dimensions.y && z >= 0 && z < self.dimensions.z,
            "label lookup ({x}, {y}, {z}) outside chunk dimensions {:?}",
            self.dimensions
        );
        #[allow(clippy::cast_sign_loss)]
        let index = (x + y * self.dimensions.x + z * self.dimensions.x * self.dimensions.y) as usize;
        let raw = match &self.data {
            LabelData::U8(v) => u32::from(v[index]),
            LabelData::U16(v) => u32::from(v[index]),
            LabelData::U32(v) => v[index],
        };
        SegmentId::new(raw)
    }

    /// The label at a local voxel coordinate given as a vector.
    #[must_use]
    pub fn at(&self, pos: Vector3<i64>) -> SegmentId {
        self.get(pos.x, pos.y, pos.z)
    }
}

/// Validates dimensions and returns the voxel count.
fn checked_voxel_count(dimensions: Vector3<i64>) -> Result<usize, VolumeError> {
    if dimensions.x <= 0 || dimensions.y <= 0 || dimensions.z <= 0 {
        return Err(VolumeError::InvalidDimensions {
            x: dimensions.x,
            y: dimensions.y,
            z: dimensions.z,
        });
    }
    #[allow(clippy::cast_sign_loss)]
    Ok((dimensions.x * dimensions.y * dimensions.z) as usize)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_indexing() {
        let dims = Vector3::new(2, 3, 2);
        let ids: Vec<u32> = (0..12).collect();
        let labels = LabelArray::from_raw_ids(dims, ids).unwrap();

        assert_eq!(labels.get(0, 0, 0).raw(), 0);
        assert_eq!(labels.get(1, 0, 0).raw(), 1); // x fastest
        assert_eq!(labels.get(0, 1, 0).raw(), 2);
        assert_eq!(labels.get(0, 0, 1).raw(), 6);
        assert_eq!(labels.get(1, 2, 1).raw(), 11);
    }

    #[test]
    fn test_from_bytes_u8() {
        let dims = Vector3::new(2, 2, 1);
        let labels = LabelArray::from_bytes(LabelType::U8, dims, &[1, 2, 3, 4]).unwrap();
        assert_eq!(labels.get(1, 1, 0).raw(), 4);
    }

    #[test]
    fn test_from_bytes_u16_little_endian() {
        let dims = Vector3::new(2, 1, 1);
        // 0x0102 and 0x0304, little-endian.
        let labels =
            LabelArray::from_bytes(LabelType::U16, dims, &[0x02, 0x01, 0x04, 0x03]).unwrap();
        assert_eq!(labels.get(0, 0, 0).raw(), 0x0102);
        assert_eq!(labels.get(1, 0, 0).raw(), 0x0304);
    }

    #[test]
    fn test_from_bytes_u32_little_endian() {
        let dims = Vector3::new(1, 1, 1);
        let labels =
            LabelArray::from_bytes(LabelType::U32, dims, &0x0001_0002u32.to_le_bytes()).unwrap();
        assert_eq!(labels.get(0, 0, 0).raw(), 0x0001_0002);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let dims = Vector3::new(2, 2, 2);
        let err = LabelArray::from_bytes(LabelType::U16, dims, &[0; 15]).unwrap_err();
        assert!(matches!(
            err,
            VolumeError::LabelBufferLength {
                expected: 16,
                actual: 15
            }
        ));
    }

    #[test]
    fn test_bad_dimensions_rejected() {
        let err = LabelArray::from_raw_ids(Vector3::new(0, 4, 4), vec![]).unwrap_err();
        assert!(matches!(err, VolumeError::InvalidDimensions { x: 0, .. }));
    }

    #[test]
    fn test_at_matches_get() {
        let dims = Vector3::new(2, 2, 2);
        let labels = LabelArray::from_raw_ids(dims, (0..8).collect()).unwrap();
        assert_eq!(labels.at(Vector3::new(1, 0, 1)), labels.get(1, 0, 1));
    }
}
