//! Per-fielder coverage discs
//!
//! A fielder's area of responsibility is modeled as a flat disc whose radius
//! grows with distance from the batting crease: close catchers get a tight
//! disc, boundary riders the widest one.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::roster::Fielder;
use crate::consts::*;
use crate::crease_point;

/// A fielder's modeled ground coverage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageDisc {
    pub fielder_id: String,
    /// Disc center on the ground plane (x, z)
    pub center: Vec2,
    pub radius: f32,
}

impl CoverageDisc {
    /// Check if a ground-plane point lies inside the disc (edge inclusive)
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.distance(self.center) <= self.radius
    }
}

/// Horizontal distance from the batting crease, ignoring height
#[inline]
pub fn distance_from_crease(position: Vec3) -> f32 {
    Vec2::new(position.x, position.z).distance(crease_point())
}

/// Coverage radius for a fielder standing at `position`.
///
/// Linear in crease distance, normalized by `boundary_radius` and saturating
/// at the boundary. Result is always within
/// [`MIN_COVERAGE_RADIUS`, `MAX_COVERAGE_RADIUS`].
pub fn coverage_radius(position: Vec3, boundary_radius: f32) -> f32 {
    let normalized = distance_from_crease(position) / boundary_radius;
    // NaN positions (and 0/0) fall back to the tightest disc; f32::min would
    // otherwise swallow the NaN and saturate
    if normalized.is_nan() || normalized < 0.0 {
        return MIN_COVERAGE_RADIUS;
    }
    let t = normalized.min(1.0);
    MIN_COVERAGE_RADIUS + t * (MAX_COVERAGE_RADIUS - MIN_COVERAGE_RADIUS)
}

/// Build one disc per ground-covering fielder, preserving roster order.
///
/// Returns nothing when coverage display is disabled.
pub fn coverage_discs(players: &[Fielder], boundary_radius: f32, enabled: bool) -> Vec<CoverageDisc> {
    if !enabled {
        return Vec::new();
    }

    players
        .iter()
        .filter(|p| p.role.covers_ground())
        .map(|p| CoverageDisc {
            fielder_id: p.id.clone(),
            center: p.ground_position(),
            radius: coverage_radius(p.position, boundary_radius),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::roster::{Role, default_roster};
    use proptest::prelude::*;

    fn at(x: f32, z: f32) -> Vec3 {
        Vec3::new(x, 0.0, z)
    }

    #[test]
    fn test_radius_at_crease_is_min() {
        let r = coverage_radius(at(0.0, BATTING_CREASE_Z), 65.0);
        assert_eq!(r, 0.5);
    }

    #[test]
    fn test_radius_at_boundary_distance_is_max() {
        // 65m straight down the pitch from the crease
        let r = coverage_radius(at(0.0, BATTING_CREASE_Z + 65.0), 65.0);
        assert_eq!(r, 12.0);
        // Beyond boundary distance saturates
        let r = coverage_radius(at(80.0, 40.0), 65.0);
        assert_eq!(r, 12.0);
    }

    #[test]
    fn test_radius_ignores_height() {
        let low = coverage_radius(Vec3::new(10.0, 0.0, 5.0), 65.0);
        let high = coverage_radius(Vec3::new(10.0, 30.0, 5.0), 65.0);
        assert_eq!(low, high);
    }

    #[test]
    fn test_radius_nan_guard() {
        let r = coverage_radius(Vec3::new(f32::NAN, 0.0, 0.0), 65.0);
        assert_eq!(r, MIN_COVERAGE_RADIUS);
        let r = coverage_radius(at(0.0, BATTING_CREASE_Z), 0.0);
        assert_eq!(r, MIN_COVERAGE_RADIUS);
    }

    #[test]
    fn test_discs_skip_batsman_and_bowler() {
        let mut players = default_roster();
        players.push(Fielder::new("striker", "Striker", at(0.0, -9.0), Role::Batsman));

        let discs = coverage_discs(&players, 65.0, true);
        assert_eq!(discs.len(), 10); // keeper + nine fielders
        assert!(discs.iter().all(|d| d.fielder_id != "bowler" && d.fielder_id != "striker"));
        // Roster order preserved
        assert_eq!(discs[0].fielder_id, "wk");
        assert_eq!(discs[1].fielder_id, "slip1");
    }

    #[test]
    fn test_discs_disabled() {
        assert!(coverage_discs(&default_roster(), 65.0, false).is_empty());
    }

    #[test]
    fn test_disc_center_is_ground_position() {
        let players = vec![Fielder::new("p", "P", Vec3::new(3.0, 1.5, -4.0), Role::Fielder)];
        let discs = coverage_discs(&players, 65.0, true);
        assert_eq!(discs[0].center, Vec2::new(3.0, -4.0));
        assert!(discs[0].contains(Vec2::new(3.0, -4.0)));
    }

    proptest! {
        #[test]
        fn radius_bounded(x in -200.0f32..200.0, z in -200.0f32..200.0, boundary in 1.0f32..150.0) {
            let r = coverage_radius(at(x, z), boundary);
            prop_assert!(r >= MIN_COVERAGE_RADIUS);
            prop_assert!(r <= MAX_COVERAGE_RADIUS);
        }

        #[test]
        fn radius_monotone_in_distance(d1 in 0.0f32..150.0, d2 in 0.0f32..150.0, bearing in 0.0f32..360.0) {
            let (near, far) = if d1 <= d2 { (d1, d2) } else { (d2, d1) };
            let origin = crease_point();
            let p_near = origin + crate::bearing_offset(near, bearing);
            let p_far = origin + crate::bearing_offset(far, bearing);
            let r_near = coverage_radius(at(p_near.x, p_near.y), 65.0);
            let r_far = coverage_radius(at(p_far.x, p_far.y), 65.0);
            // Allow for rounding in the polar round trip
            prop_assert!(r_near <= r_far + 1e-4);
        }
    }
}
