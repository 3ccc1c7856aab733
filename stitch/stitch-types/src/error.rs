//! Error types for the stitching computation.

use nalgebra::Vector3;

/// Errors that can occur when setting up or running a stitching query.
///
/// Empty results are not errors: a query over disjoint chunks, or one whose
/// selected segments never reach the overlap, reports a distinct outcome
/// variant instead (see `SeedOutcome` / `SpawnOutcome`).
///
/// # Example
///
/// ```
/// use stitch_types::StitchError;
/// use nalgebra::Vector3;
///
/// let error = StitchError::ResolutionMismatch {
///     pre: Vector3::new(4, 4, 40),
///     post: Vector3::new(8, 8, 40),
/// };
/// assert!(error.to_string().contains("resolution"));
/// ```
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StitchError {
    /// Pre and post chunks carry different voxel resolutions.
    ///
    /// Stitching across a resolution change is undefined; resample one
    /// chunk before querying.
    #[error("voxel resolution mismatch: pre {pre:?}, post {post:?}")]
    ResolutionMismatch {
        /// Per-axis resolution of the pre chunk.
        pre: Vector3<i64>,
        /// Per-axis resolution of the post chunk.
        post: Vector3<i64>,
    },

    /// An invalid configuration parameter was provided.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl StitchError {
    /// Creates an invalid configuration error with the given message.
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Returns `true` if this is a resolution mismatch.
    #[must_use]
    pub const fn is_resolution_mismatch(&self) -> bool {
        matches!(self, Self::ResolutionMismatch { .. })
    }
}
