//! Error types for volume decoding.

/// Errors that can occur while decoding a chunk volume from its stored
/// representation.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum VolumeError {
    /// The metadata document is not valid JSON or misses required fields.
    #[error("failed to parse volume metadata: {0}")]
    MetadataParse(#[from] serde_json::Error),

    /// The metadata names a label type this crate cannot decode.
    #[error("unsupported label type '{0}', must be UInt8, UInt16 or UInt32")]
    UnsupportedLabelType(String),

    /// The label buffer does not match the chunk dimensions.
    #[error("label buffer holds {actual} bytes, expected {expected}")]
    LabelBufferLength {
        /// Bytes required by dimensions and label width.
        expected: usize,
        /// Bytes actually provided.
        actual: usize,
    },

    /// A segment catalog buffer does not match the segment count.
    #[error("segment {what} buffer holds {actual} bytes, expected {expected}")]
    CatalogBufferLength {
        /// Which catalog buffer mismatched ("size" or "bounds").
        what: &'static str,
        /// Bytes required by the segment count and element width.
        expected: usize,
        /// Bytes actually provided.
        actual: usize,
    },

    /// Chunk dimensions must be positive on every axis.
    #[error("invalid chunk dimensions {x}x{y}x{z}")]
    InvalidDimensions {
        /// X dimension.
        x: i64,
        /// Y dimension.
        y: i64,
        /// Z dimension.
        z: i64,
    },

    /// Voxel resolution must be positive on every axis.
    #[error("invalid voxel resolution {x}x{y}x{z}")]
    InvalidResolution {
        /// X resolution.
        x: i64,
        /// Y resolution.
        y: i64,
        /// Z resolution.
        z: i64,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_label_type_display() {
        let error = VolumeError::UnsupportedLabelType("Float64".to_owned());
        assert!(error.to_string().contains("Float64"));
        assert!(error.to_string().contains("UInt8"));
    }

    #[test]
    fn test_label_buffer_length_display() {
        let error = VolumeError::LabelBufferLength {
            expected: 4096,
            actual: 17,
        };
        let msg = error.to_string();
        assert!(msg.contains("4096"));
        assert!(msg.contains("17"));
    }

    #[test]
    fn test_invalid_dimensions_display() {
        let error = VolumeError::InvalidDimensions { x: 0, y: 10, z: 10 };
        assert!(error.to_string().contains("0x10x10"));
    }
}
