//! FielderPro - a 3D cricket field placement editor
//!
//! Core modules:
//! - `field`: Pure field model and coverage analysis (no rendering or platform deps)
//! - `session`: Editor session state, recomputes coverage on dependency change
//! - `share`: URL-encoded field layouts
//! - `input`: Camera, picking and gesture state machines
//! - `renderer`: WebGPU mesh generation and pipeline
//! - `settings`: Editor preferences

pub mod field;
pub mod input;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod share;

pub use field::{CoverageAnalysis, CoverageDisc, FieldConstants, Fielder, GapSector, Role};
pub use session::FieldSession;
pub use settings::{QualityPreset, Settings};
pub use share::{ShareError, SharedField};

use glam::Vec2;

/// Field configuration constants
pub mod consts {
    /// Boundary rope distance from field center (meters)
    pub const BOUNDARY_RADIUS: f32 = 65.0;
    /// Inner fielding circle, 30 yards in meters
    pub const THIRTY_YARD_RADIUS: f32 = 27.43;
    /// 22 yards in meters
    pub const PITCH_LENGTH: f32 = 20.12;
    /// 10 feet in meters
    pub const PITCH_WIDTH: f32 = 3.05;

    /// Striker's end along the pitch axis; origin of all angular sampling
    pub const BATTING_CREASE_Z: f32 = -9.0;

    /// Coverage disc radius for a fielder standing on the crease
    pub const MIN_COVERAGE_RADIUS: f32 = 0.5;
    /// Coverage disc radius for a fielder at (or beyond) boundary distance
    pub const MAX_COVERAGE_RADIUS: f32 = 12.0;

    /// One sector per degree
    pub const NUM_SECTORS: usize = 360;
    /// Distance between radial sample points along a sector
    pub const RADIAL_STEP: f32 = 5.0;

    /// Gap overlay band, measured from the crease
    pub const GAP_INNER_RADIUS: f32 = 2.0;
    pub const GAP_OUTER_OVERSHOOT: f32 = 52.0;
    pub const GAP_ARC_SEGMENTS: u32 = 20;

    /// Pickable box around a fielder (width, height, depth) and its vertical offset
    pub const HITBOX_SIZE: [f32; 3] = [3.0, 6.0, 3.0];
    pub const HITBOX_OFFSET_Y: f32 = 2.5;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Offset in the ground (x, z) plane for a bearing measured from the +z axis.
///
/// Bearing 0° points down the pitch toward the bowler, 90° toward +x.
#[inline]
pub fn bearing_offset(r: f32, bearing_deg: f32) -> Vec2 {
    let theta = bearing_deg.to_radians();
    Vec2::new(r * theta.sin(), r * theta.cos())
}

/// Bearing (degrees, [0, 360)) of a ground-plane offset, inverse of [`bearing_offset`]
#[inline]
pub fn bearing_of(offset: Vec2) -> f32 {
    normalize_degrees(offset.x.atan2(offset.y).to_degrees())
}

/// Ground-plane position of the batting crease reference point
#[inline]
pub fn crease_point() -> Vec2 {
    Vec2::new(0.0, consts::BATTING_CREASE_Z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(450.0), 90.0);
    }

    #[test]
    fn test_bearing_round_trip() {
        for deg in [0.0_f32, 45.0, 90.0, 179.0, 270.0, 359.0] {
            let back = bearing_of(bearing_offset(10.0, deg));
            assert!((back - deg).abs() < 0.01, "{deg} came back as {back}");
        }
    }

    #[test]
    fn test_bearing_zero_points_down_pitch() {
        let v = bearing_offset(5.0, 0.0);
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - 5.0).abs() < 1e-6);
    }
}
