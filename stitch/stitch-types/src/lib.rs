//! Core types for segmentation chunk stitching.
//!
//! This crate provides the foundational types shared by the stitching
//! pipeline:
//!
//! - [`Box3`] - Axis-aligned box with signed integer corners
//! - [`Direction`] - The face along which one chunk borders another
//! - [`SegmentId`] - Label identifier within a segmented volume
//! - [`StitchConfig`] - Tunable matching parameters
//! - [`Seed`] - A matched set of post-chunk segments for one component
//! - [`SpawnTable`] - The full pre/post correspondence table
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with no dependencies beyond math, error and
//! (optionally) serde derives. It can be used in:
//! - CLI tools
//! - Servers
//! - Web applications (WASM)
//! - Python bindings
//!
//! # Coordinate Systems
//!
//! Three coordinate frames appear throughout the stitching pipeline, all
//! carried as `i64` triples:
//!
//! - **physical**: dataset units (e.g. nanometers), as stored in chunk
//!   metadata
//! - **world-voxel**: physical divided by per-axis voxel resolution; shared
//!   by both chunks of a query
//! - **local-voxel**: world-voxel minus a chunk's own origin; indexes that
//!   chunk's label array
//!
//! Boxes are **half-open**: the minimum corner is inside, the maximum
//! corner is one past the last voxel. Conversions between frames are always
//! explicit ([`Box3::scale_down`], [`Box3::translate`]).
//!
//! # Example
//!
//! ```
//! use stitch_types::{Box3, Direction};
//! use nalgebra::Vector3;
//!
//! let pre = Box3::new(Vector3::new(0, 0, 0), Vector3::new(10, 10, 10));
//! let post = Box3::new(Vector3::new(6, 0, 0), Vector3::new(16, 10, 10));
//!
//! // Post lies beyond pre's +X face, with a 4 voxel overlap.
//! let dir = Direction::between(&pre, &post).unwrap();
//! assert_eq!(dir, Direction::XMax);
//! assert_eq!(stitch_types::overlap_along(&pre, &post, dir), 4);
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

mod box3;
mod config;
mod direction;
mod error;
mod outcome;
mod seed;
mod segment;
mod table;

// Re-export core types
pub use box3::Box3;
pub use config::{EscapeMargin, SegmentFilter, StitchConfig};
pub use direction::{in_escape_margin, overlap_along, overlap_region, Axis, Direction};
pub use error::StitchError;
pub use outcome::{SeedOutcome, SpawnOutcome};
pub use seed::Seed;
pub use segment::SegmentId;
pub use table::{PostMatch, PreSupport, SpawnEntry, SpawnTable};

// Re-export nalgebra types for convenience
pub use nalgebra::Vector3;
