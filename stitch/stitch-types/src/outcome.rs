//! Query outcomes.
//!
//! Empty results carry their diagnosis as data rather than as errors: a
//! caller scheduling reconstruction tasks reacts differently to "these
//! chunks do not border each other" than to "the selection dissolved into
//! dust before the boundary".

use crate::seed::Seed;
use crate::table::SpawnTable;

/// Result of a seed query.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SeedOutcome {
    /// One seed per escaping component, in scan discovery order.
    Seeds(Vec<Seed>),
    /// The chunks' boxes do not overlap.
    NoOverlap,
    /// The chunks overlap, but no selected valid segment reaches the
    /// overlap region.
    NoCandidates,
    /// The region of interest exceeds the configured ceiling; rejected
    /// before any voxel was scanned.
    RoiTooLarge {
        /// Voxel volume the query would have scanned.
        volume: u64,
        /// The configured ceiling.
        ceiling: u64,
    },
}

impl SeedOutcome {
    /// The seed list, if the query completed.
    #[must_use]
    pub fn seeds(&self) -> Option<&[Seed]> {
        match self {
            Self::Seeds(seeds) => Some(seeds),
            _ => None,
        }
    }

    /// `true` when the query completed with a (possibly empty) seed list.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Seeds(_))
    }
}

/// Result of a spawn-table query.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpawnOutcome {
    /// The full correspondence table.
    Table(SpawnTable),
    /// The chunks' boxes do not overlap.
    NoOverlap,
    /// The region of interest exceeds the configured ceiling; rejected
    /// before any voxel was scanned.
    RoiTooLarge {
        /// Voxel volume the query would have scanned.
        volume: u64,
        /// The configured ceiling.
        ceiling: u64,
    },
}

impl SpawnOutcome {
    /// The table, if the query completed.
    #[must_use]
    pub const fn table(&self) -> Option<&SpawnTable> {
        match self {
            Self::Table(table) => Some(table),
            _ => None,
        }
    }

    /// `true` when the query completed.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Table(_))
    }
}
