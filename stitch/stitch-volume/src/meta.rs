//! Typed decode of the chunk metadata document.

use nalgebra::Vector3;
use serde::Deserialize;
use stitch_types::Box3;

use crate::error::VolumeError;

/// Storage width of label IDs and catalog values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelType {
    /// 8-bit unsigned.
    U8,
    /// 16-bit unsigned.
    U16,
    /// 32-bit unsigned.
    U32,
}

impl LabelType {
    /// Parses the metadata's type name.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeError::UnsupportedLabelType`] for anything but
    /// `UInt8`, `UInt16` or `UInt32`; the float types some metadata
    /// documents can name are not valid label storage.
    pub fn from_name(name: &str) -> Result<Self, VolumeError> {
        match name {
            "UInt8" => Ok(Self::U8),
            "UInt16" => Ok(Self::U16),
            "UInt32" => Ok(Self::U32),
            other => Err(VolumeError::UnsupportedLabelType(other.to_owned())),
        }
    }

    /// Bytes per stored element.
    #[must_use]
    pub const fn byte_size(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::U32 => 4,
        }
    }
}

/// The raw metadata document as stored alongside a chunk.
#[derive(Debug, Deserialize)]
struct MetaDoc {
    physical_offset_min: [i64; 3],
    physical_offset_max: [i64; 3],
    chunk_voxel_dimensions: [i64; 3],
    voxel_resolution: [i64; 3],
    resolution_units: String,
    segment_id_type: String,
    bounding_box_type: String,
    size_type: String,
    num_segments: u32,
}

/// Decoded, validated chunk metadata.
///
/// # Example
///
/// ```
/// use stitch_volume::{LabelType, VolumeMeta};
///
/// let doc = br#"{
///     "physical_offset_min": [0, 0, 0],
///     "physical_offset_max": [4096, 4096, 5120],
///     "chunk_voxel_dimensions": [1024, 1024, 128],
///     "voxel_resolution": [4, 4, 40],
///     "resolution_units": "nm",
///     "segment_id_type": "UInt16",
///     "bounding_box_type": "UInt16",
///     "size_type": "UInt32",
///     "num_segments": 1200
/// }"#;
///
/// let meta = VolumeMeta::from_json(doc).unwrap();
/// assert_eq!(meta.id_type(), LabelType::U16);
/// assert_eq!(meta.segment_count(), 1200);
/// assert_eq!(meta.resolution().z, 40);
/// ```
#[derive(Debug, Clone)]
pub struct VolumeMeta {
    physical_bounds: Box3,
    dimensions: Vector3<i64>,
    resolution: Vector3<i64>,
    resolution_units: String,
    id_type: LabelType,
    bbox_type: LabelType,
    size_type: LabelType,
    segment_count: u32,
}

impl VolumeMeta {
    /// Decodes and validates a metadata document.
    ///
    /// # Errors
    ///
    /// Returns a [`VolumeError`] when the document is malformed, names an
    /// unsupported label type, or carries non-positive dimensions or
    /// resolution.
    pub fn from_json(raw: &[u8]) -> Result<Self, VolumeError> {
        let doc: MetaDoc = serde_json::from_slice(raw)?;

        let dimensions = Vector3::from(doc.chunk_voxel_dimensions);
        if dimensions.x <= 0 || dimensions.y <= 0 || dimensions.z <= 0 {
            return Err(VolumeError::InvalidDimensions {
                x: dimensions.x,
                y: dimensions.y,
                z: dimensions.z,
            });
        }

        let resolution = Vector3::from(doc.voxel_resolution);
        if resolution.x <= 0 || resolution.y <= 0 || resolution.z <= 0 {
            return Err(VolumeError::InvalidResolution {
                x: resolution.x,
                y: resolution.y,
                z: resolution.z,
            });
        }

        Ok(Self {
            physical_bounds: Box3::new(
                Vector3::from(doc.physical_offset_min),
                Vector3::from(doc.physical_offset_max),
            ),
            dimensions,
            resolution,
            resolution_units: doc.resolution_units,
            id_type: LabelType::from_name(&doc.segment_id_type)?,
            bbox_type: LabelType::from_name(&doc.bounding_box_type)?,
            size_type: LabelType::from_name(&doc.size_type)?,
            segment_count: doc.num_segments,
        })
    }

    /// The chunk's placement in physical units.
    #[must_use]
    pub fn physical_bounds(&self) -> Box3 {
        self.physical_bounds
    }

    /// Chunk extent in voxels.
    #[must_use]
    pub fn dimensions(&self) -> Vector3<i64> {
        self.dimensions
    }

    /// Physical units per voxel, per axis.
    #[must_use]
    pub fn resolution(&self) -> Vector3<i64> {
        self.resolution
    }

    /// Unit name for the resolution values (e.g. `"nm"`).
    #[must_use]
    pub fn resolution_units(&self) -> &str {
        &self.resolution_units
    }

    /// Storage width of the label array.
    #[must_use]
    pub const fn id_type(&self) -> LabelType {
        self.id_type
    }

    /// Storage width of the catalog bounding-box buffer.
    #[must_use]
    pub const fn bbox_type(&self) -> LabelType {
        self.bbox_type
    }

    /// Storage width of the catalog size buffer.
    #[must_use]
    pub const fn size_type(&self) -> LabelType {
        self.size_type
    }

    /// Number of catalog entries, background included.
    #[must_use]
    pub const fn segment_count(&self) -> u32 {
        self.segment_count
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn doc(id_type: &str) -> Vec<u8> {
        format!(
            r#"{{
                "physical_offset_min": [68428, 93004, 160120],
                "physical_offset_max": [72520, 97096, 165200],
                "chunk_voxel_dimensions": [1023, 1023, 127],
                "voxel_resolution": [4, 4, 40],
                "resolution_units": "nm",
                "segment_id_type": "{id_type}",
                "bounding_box_type": "UInt16",
                "size_type": "UInt32",
                "num_segments": 10582
            }}"#
        )
        .into_bytes()
    }

    #[test]
    fn test_decode_full_document() {
        let meta = VolumeMeta::from_json(&doc("UInt16")).unwrap();
        assert_eq!(
            meta.physical_bounds().min(),
            Vector3::new(68428, 93004, 160120)
        );
        assert_eq!(meta.dimensions(), Vector3::new(1023, 1023, 127));
        assert_eq!(meta.resolution(), Vector3::new(4, 4, 40));
        assert_eq!(meta.resolution_units(), "nm");
        assert_eq!(meta.id_type(), LabelType::U16);
        assert_eq!(meta.bbox_type(), LabelType::U16);
        assert_eq!(meta.size_type(), LabelType::U32);
        assert_eq!(meta.segment_count(), 10582);
    }

    #[test]
    fn test_unsupported_label_type() {
        let err = VolumeMeta::from_json(&doc("Float32")).unwrap_err();
        assert!(matches!(err, VolumeError::UnsupportedLabelType(name) if name == "Float32"));
    }

    #[test]
    fn test_malformed_json() {
        let err = VolumeMeta::from_json(b"{ not json").unwrap_err();
        assert!(matches!(err, VolumeError::MetadataParse(_)));
    }

    #[test]
    fn test_missing_field() {
        let err = VolumeMeta::from_json(b"{}").unwrap_err();
        assert!(matches!(err, VolumeError::MetadataParse(_)));
    }

    #[test]
    fn test_zero_resolution_rejected() {
        let raw = String::from_utf8(doc("UInt8"))
            .unwrap()
            .replace("[4, 4, 40]", "[4, 0, 40]");
        let err = VolumeMeta::from_json(raw.as_bytes()).unwrap_err();
        assert!(matches!(err, VolumeError::InvalidResolution { y: 0, .. }));
    }

    #[test]
    fn test_label_type_sizes() {
        assert_eq!(LabelType::U8.byte_size(), 1);
        assert_eq!(LabelType::U16.byte_size(), 2);
        assert_eq!(LabelType::U32.byte_size(), 4);
    }
}
