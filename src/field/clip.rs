//! Boundary clamping and clipping
//!
//! Both operations project radially onto the boundary circle around the field
//! center. Clipping works per vertex, not by polygon intersection, so a
//! clipped disc outline may be non-convex where it meets the rope.

use glam::{Vec2, Vec3};
use std::f32::consts::TAU;

use super::coverage::CoverageDisc;

/// Project a ground-plane point onto the boundary circle if it lies outside
#[inline]
pub fn clip_to_boundary(point: Vec2, boundary_radius: f32) -> Vec2 {
    let dist = point.length();
    if dist > boundary_radius {
        point * (boundary_radius / dist)
    } else {
        point
    }
}

/// Keep a dragged position inside the boundary, preserving its height
pub fn clamp_to_boundary(position: Vec3, boundary_radius: f32) -> Vec3 {
    let ground = clip_to_boundary(Vec2::new(position.x, position.z), boundary_radius);
    Vec3::new(ground.x, position.y, ground.y)
}

/// World-space outline of a coverage disc with each vertex clipped to the boundary.
///
/// Returns `segments + 1` points; the last repeats the first to close the loop.
pub fn clipped_disc_outline(disc: &CoverageDisc, boundary_radius: f32, segments: u32) -> Vec<Vec2> {
    let segments = segments.max(3);

    (0..=segments)
        .map(|i| {
            let angle = (i as f32 / segments as f32) * TAU;
            let world = disc.center + Vec2::new(disc.radius * angle.cos(), disc.radius * angle.sin());
            clip_to_boundary(world, boundary_radius)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disc(x: f32, z: f32, radius: f32) -> CoverageDisc {
        CoverageDisc {
            fielder_id: "test".to_string(),
            center: Vec2::new(x, z),
            radius,
        }
    }

    #[test]
    fn test_clamp_inside_is_unchanged() {
        let p = Vec3::new(10.0, 1.0, -20.0);
        assert_eq!(clamp_to_boundary(p, 65.0), p);
    }

    #[test]
    fn test_clamp_outside_lands_on_boundary() {
        let p = Vec3::new(60.0, 2.0, 80.0); // distance 100
        let clamped = clamp_to_boundary(p, 65.0);
        assert!((Vec2::new(clamped.x, clamped.z).length() - 65.0).abs() < 1e-4);
        assert_eq!(clamped.y, 2.0);
        // Direction preserved
        assert!((clamped.x - 39.0).abs() < 1e-4);
        assert!((clamped.z - 52.0).abs() < 1e-4);
    }

    #[test]
    fn test_outline_inside_boundary_is_circle() {
        let d = disc(0.0, 0.0, 5.0);
        let outline = clipped_disc_outline(&d, 65.0, 64);
        assert_eq!(outline.len(), 65);
        assert!(outline.iter().all(|p| (p.length() - 5.0).abs() < 1e-4));
        assert!((outline[0] - outline[64]).length() < 1e-4);
    }

    #[test]
    fn test_outline_clipped_at_rope() {
        // Disc centered just inside the rope pokes out on the far side
        let d = disc(60.0, 0.0, 12.0);
        let outline = clipped_disc_outline(&d, 65.0, 64);
        assert!(outline.iter().all(|p| p.length() <= 65.0 + 1e-3));
        // The vertex at angle 0 was projected onto the rope
        assert!((outline[0] - Vec2::new(65.0, 0.0)).length() < 1e-3);
        // The vertex at angle π stays where it was
        assert!((outline[32] - Vec2::new(48.0, 0.0)).length() < 1e-3);
    }
}
