//! Configuration for the stitching computation.
//!
//! # Example
//!
//! ```
//! use stitch_types::{EscapeMargin, SegmentFilter, StitchConfig};
//!
//! let config = StitchConfig::default()
//!     .with_match_threshold(0.7)
//!     .with_escape_margin(EscapeMargin::Fixed(5))
//!     .with_segment_filter(SegmentFilter::default().with_min_voxel_count(500));
//!
//! assert!(config.validate().is_ok());
//! ```

use crate::error::StitchError;

/// Dust thresholds a segment must clear to participate in matching.
///
/// Segments failing either threshold are silently excluded everywhere;
/// they are noise, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentFilter {
    /// A segment's voxel count must exceed this (strictly).
    min_voxel_count: u64,
    /// A segment's bounding-box extent must exceed this on every axis
    /// (strictly).
    min_extent: i64,
}

impl SegmentFilter {
    /// Creates a filter with the given thresholds.
    #[must_use]
    pub const fn new(min_voxel_count: u64, min_extent: i64) -> Self {
        Self {
            min_voxel_count,
            min_extent,
        }
    }

    /// Minimum voxel count (exclusive).
    #[must_use]
    pub const fn min_voxel_count(&self) -> u64 {
        self.min_voxel_count
    }

    /// Minimum per-axis bounding-box extent (exclusive).
    #[must_use]
    pub const fn min_extent(&self) -> i64 {
        self.min_extent
    }

    /// Sets the minimum voxel count.
    #[must_use]
    pub const fn with_min_voxel_count(mut self, count: u64) -> Self {
        self.min_voxel_count = count;
        self
    }

    /// Sets the minimum per-axis extent.
    #[must_use]
    pub const fn with_min_extent(mut self, extent: i64) -> Self {
        self.min_extent = extent;
        self
    }
}

impl Default for SegmentFilter {
    /// Defaults: voxel count > 100, extent > 1 on every axis.
    fn default() -> Self {
        Self {
            min_voxel_count: 100,
            min_extent: 1,
        }
    }
}

/// How wide the band at the shared seam is when deciding whether a
/// component genuinely reaches the chunk boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EscapeMargin {
    /// Half the total overlap thickness, measured per query.
    HalfOverlap,
    /// A fixed number of voxels.
    Fixed(i64),
}

impl EscapeMargin {
    /// Resolves the margin in voxels for a query with the given overlap
    /// thickness.
    #[must_use]
    pub const fn resolve(&self, overlap: i64) -> i64 {
        match self {
            Self::HalfOverlap => overlap / 2,
            Self::Fixed(margin) => *margin,
        }
    }
}

/// Tunable parameters of the stitching computation.
///
/// All defaults reproduce the production behavior of the reconstruction
/// pipeline this crate grew out of; see the individual accessors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StitchConfig {
    /// Overlap/size ratio at which a post segment is accepted outright.
    match_threshold: f64,
    /// Laplace smoothing prior for the fallback score.
    smoothing_prior: f64,
    /// Escape band policy at the shared seam.
    escape_margin: EscapeMargin,
    /// Per-axis dilation of the post window for size accumulation.
    post_window_expansion: i64,
    /// Reject queries whose ROI holds more voxels than this.
    roi_voxel_ceiling: u64,
    /// Dust thresholds.
    segment_filter: SegmentFilter,
}

impl StitchConfig {
    /// Overlap/size ratio at which a post segment is accepted outright.
    ///
    /// Default 0.5: a post segment more than half covered by the selected
    /// pre segments is an unambiguous continuation. Stricter pipelines run
    /// higher values.
    #[must_use]
    pub const fn match_threshold(&self) -> f64 {
        self.match_threshold
    }

    /// Laplace smoothing prior `K` for the fallback score
    /// `(overlap + K) / (size + 2K)`.
    ///
    /// Default 1000.0. A heuristic prior, not a correctness constant; tune
    /// per dataset.
    #[must_use]
    pub const fn smoothing_prior(&self) -> f64 {
        self.smoothing_prior
    }

    /// Escape band policy. Default [`EscapeMargin::HalfOverlap`].
    #[must_use]
    pub const fn escape_margin(&self) -> EscapeMargin {
        self.escape_margin
    }

    /// Per-axis dilation of the post-side window scanned when accumulating
    /// true post-segment sizes. Default 50 voxels.
    #[must_use]
    pub const fn post_window_expansion(&self) -> i64 {
        self.post_window_expansion
    }

    /// Maximum ROI voxel volume; larger queries are rejected before any
    /// scan begins. Default 400 · 128³.
    #[must_use]
    pub const fn roi_voxel_ceiling(&self) -> u64 {
        self.roi_voxel_ceiling
    }

    /// Dust thresholds for segment validity.
    #[must_use]
    pub const fn segment_filter(&self) -> SegmentFilter {
        self.segment_filter
    }

    /// Sets the match threshold.
    #[must_use]
    pub const fn with_match_threshold(mut self, threshold: f64) -> Self {
        self.match_threshold = threshold;
        self
    }

    /// Sets the smoothing prior.
    #[must_use]
    pub const fn with_smoothing_prior(mut self, prior: f64) -> Self {
        self.smoothing_prior = prior;
        self
    }

    /// Sets the escape band policy.
    #[must_use]
    pub const fn with_escape_margin(mut self, margin: EscapeMargin) -> Self {
        self.escape_margin = margin;
        self
    }

    /// Sets the post-window expansion.
    #[must_use]
    pub const fn with_post_window_expansion(mut self, expansion: i64) -> Self {
        self.post_window_expansion = expansion;
        self
    }

    /// Sets the ROI voxel ceiling.
    #[must_use]
    pub const fn with_roi_voxel_ceiling(mut self, ceiling: u64) -> Self {
        self.roi_voxel_ceiling = ceiling;
        self
    }

    /// Sets the dust thresholds.
    #[must_use]
    pub const fn with_segment_filter(mut self, filter: SegmentFilter) -> Self {
        self.segment_filter = filter;
        self
    }

    /// Checks the configuration for out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns [`StitchError::InvalidConfig`] when the match threshold is
    /// outside `(0, 1]`, the smoothing prior is negative or non-finite,
    /// the post-window expansion or a fixed escape margin is negative, or
    /// the ROI ceiling is zero.
    pub fn validate(&self) -> Result<(), StitchError> {
        if !self.match_threshold.is_finite()
            || self.match_threshold <= 0.0
            || self.match_threshold > 1.0
        {
            return Err(StitchError::invalid_config(format!(
                "match_threshold must be in (0, 1], got {}",
                self.match_threshold
            )));
        }
        if !self.smoothing_prior.is_finite() || self.smoothing_prior < 0.0 {
            return Err(StitchError::invalid_config(format!(
                "smoothing_prior must be non-negative, got {}",
                self.smoothing_prior
            )));
        }
        if self.post_window_expansion < 0 {
            return Err(StitchError::invalid_config(format!(
                "post_window_expansion must be non-negative, got {}",
                self.post_window_expansion
            )));
        }
        if let EscapeMargin::Fixed(margin) = self.escape_margin {
            if margin < 0 {
                return Err(StitchError::invalid_config(format!(
                    "fixed escape margin must be non-negative, got {margin}"
                )));
            }
        }
        if self.roi_voxel_ceiling == 0 {
            return Err(StitchError::invalid_config(
                "roi_voxel_ceiling must be positive",
            ));
        }
        Ok(())
    }
}

impl Default for StitchConfig {
    fn default() -> Self {
        Self {
            match_threshold: 0.5,
            smoothing_prior: 1000.0,
            escape_margin: EscapeMargin::HalfOverlap,
            post_window_expansion: 50,
            roi_voxel_ceiling: 400 * 128 * 128 * 128,
            segment_filter: SegmentFilter::default(),
        }
    }
}
