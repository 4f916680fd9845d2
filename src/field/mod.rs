//! Field model and coverage analysis
//!
//! Everything here is pure and deterministic:
//! - No rendering or platform dependencies
//! - Stable iteration order (roster order)
//! - Derived data is recomputed from scratch, never cached

pub mod clip;
pub mod coverage;
pub mod gaps;
pub mod roster;

pub use clip::{clamp_to_boundary, clipped_disc_outline, clip_to_boundary};
pub use coverage::{CoverageDisc, coverage_discs, coverage_radius, distance_from_crease};
pub use gaps::{CoverageAnalysis, GapSector, analyze, detect_gaps, sample_sectors};
pub use roster::{FieldConstants, Fielder, Role, default_roster};
