//! Segmented chunk volumes.
//!
//! A [`Volume`] is one rectangular chunk of a larger labeled dataset: an
//! immutable 3D label field with a physical placement, a per-axis voxel
//! resolution and a segment catalog. This crate owns the accessor contract
//! the stitching core runs against, plus the decode paths that build a
//! volume from its stored representation:
//!
//! - [`VolumeMeta`] - typed decode of the chunk metadata document (JSON)
//! - [`SegmentCatalog`] - per-segment sizes and bounds from raw
//!   little-endian buffers, or derived by scanning a label array
//! - [`LabelArray`] - dense row-major label storage in 8/16/32 bit widths
//!
//! Remote retrieval and decompression of the stored buffers are the
//! caller's concern; everything here operates on fully materialized bytes.
//!
//! # Layer 0 Crate
//!
//! No dependencies beyond math, serde and error derives. Usable from CLI
//! tools, servers and bindings alike.
//!
//! # Example
//!
//! ```
//! use nalgebra::Vector3;
//! use stitch_volume::Volume;
//!
//! // A 4x4x4 chunk at physical origin with 8nm cubic voxels, holding one
//! // segment (ID 1) in its lower half.
//! let dims = Vector3::new(4, 4, 4);
//! let ids: Vec<u32> = (0..64).map(|i| u32::from(i < 32)).collect();
//! let volume = Volume::from_labels(
//!     Vector3::new(0, 0, 0),
//!     Vector3::new(8, 8, 8),
//!     dims,
//!     ids,
//! )
//! .unwrap();
//!
//! assert_eq!(volume.segment_size(stitch_volume::SegmentId::new(1)), 32);
//! assert_eq!(volume.segment_at(0, 0, 0).raw(), 1);
//! assert_eq!(volume.segment_at(0, 0, 3).raw(), 0);
//! ```
//!
//! # Quality Standards
//!
//! This crate maintains the standards in [STANDARDS.md](../../STANDARDS.md):
//! - Zero clippy/doc warnings
//! - Zero `unwrap`/`expect` in library code

// Safety: Deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod catalog;
mod error;
mod labels;
mod meta;
mod volume;

// Re-export core types
pub use catalog::SegmentCatalog;
pub use error::VolumeError;
pub use labels::LabelArray;
pub use meta::{LabelType, VolumeMeta};
pub use volume::Volume;

// Re-export the identifiers volumes hand out
pub use stitch_types::SegmentId;
