//! Mesh generation for the field, fielders and coverage overlays
//!
//! Everything is emitted as world-space triangle lists. Flat geometry lies on
//! the ground plane with small height offsets so markings sit above the grass
//! and overlays above the markings.

use glam::{Vec2, Vec3};
use std::f32::consts::PI;

use super::vertex::{Vertex, colors};
use crate::consts::{GAP_ARC_SEGMENTS, GAP_INNER_RADIUS, GAP_OUTER_OVERSHOOT};
use crate::{bearing_offset, crease_point};
use crate::field::{CoverageAnalysis, CoverageDisc, FieldConstants, Fielder, GapSector, clip_to_boundary, clipped_disc_outline};
use crate::settings::Settings;

/// Heights above the ground for layered flat geometry
const RING_Y: f32 = 0.01;
const PITCH_Y: f32 = 0.02;
const CREASE_Y: f32 = 0.03;
const OVERLAY_Y: f32 = 0.1;

/// Triangles for one frame, split by blending mode
#[derive(Debug, Clone, Default)]
pub struct SceneMeshes {
    /// Depth-written geometry: ground, markings, fielders
    pub opaque: Vec<Vertex>,
    /// Translucent overlays drawn last: coverage discs, gap sectors
    pub overlay: Vec<Vertex>,
}

#[inline]
fn ground_vertex(p: Vec2, y: f32, color: [f32; 4]) -> Vertex {
    Vertex::new(p.x, y, p.y, color)
}

/// Filled circle on the ground plane
pub fn disc(center: Vec2, radius: f32, y: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        vertices.push(ground_vertex(center, y, color));
        vertices.push(ground_vertex(
            center + radius * Vec2::new(theta1.cos(), theta1.sin()),
            y,
            color,
        ));
        vertices.push(ground_vertex(
            center + radius * Vec2::new(theta2.cos(), theta2.sin()),
            y,
            color,
        ));
    }

    vertices
}

/// Flat ring (annulus) on the ground plane
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    y: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;
        let dir1 = Vec2::new(theta1.cos(), theta1.sin());
        let dir2 = Vec2::new(theta2.cos(), theta2.sin());

        let inner1 = center + inner_radius * dir1;
        let outer1 = center + outer_radius * dir1;
        let inner2 = center + inner_radius * dir2;
        let outer2 = center + outer_radius * dir2;

        // Two triangles per segment
        vertices.push(ground_vertex(inner1, y, color));
        vertices.push(ground_vertex(outer1, y, color));
        vertices.push(ground_vertex(inner2, y, color));

        vertices.push(ground_vertex(inner2, y, color));
        vertices.push(ground_vertex(outer1, y, color));
        vertices.push(ground_vertex(outer2, y, color));
    }

    vertices
}

/// Axis-aligned rectangle on the ground plane (`width` along x, `length` along z)
pub fn flat_rect(center: Vec2, width: f32, length: f32, y: f32, color: [f32; 4]) -> Vec<Vertex> {
    let h = Vec2::new(width / 2.0, length / 2.0);
    let a = center + Vec2::new(-h.x, -h.y);
    let b = center + Vec2::new(h.x, -h.y);
    let c = center + Vec2::new(h.x, h.y);
    let d = center + Vec2::new(-h.x, h.y);

    vec![
        ground_vertex(a, y, color),
        ground_vertex(b, y, color),
        ground_vertex(c, y, color),
        ground_vertex(a, y, color),
        ground_vertex(c, y, color),
        ground_vertex(d, y, color),
    ]
}

/// Axis-aligned box with per-face shading standing in for lighting
pub fn cuboid(center: Vec3, size: Vec3, color: [f32; 4]) -> Vec<Vertex> {
    let h = size / 2.0;
    let corner = |sx: f32, sy: f32, sz: f32| center + Vec3::new(sx * h.x, sy * h.y, sz * h.z);

    // (four corners counter-clockwise, shade factor)
    let faces: [([Vec3; 4], f32); 6] = [
        ([corner(-1.0, 1.0, -1.0), corner(-1.0, 1.0, 1.0), corner(1.0, 1.0, 1.0), corner(1.0, 1.0, -1.0)], 1.0),
        ([corner(-1.0, -1.0, -1.0), corner(1.0, -1.0, -1.0), corner(1.0, -1.0, 1.0), corner(-1.0, -1.0, 1.0)], 0.5),
        ([corner(1.0, -1.0, -1.0), corner(1.0, 1.0, -1.0), corner(1.0, 1.0, 1.0), corner(1.0, -1.0, 1.0)], 0.8),
        ([corner(-1.0, -1.0, -1.0), corner(-1.0, -1.0, 1.0), corner(-1.0, 1.0, 1.0), corner(-1.0, 1.0, -1.0)], 0.8),
        ([corner(-1.0, -1.0, 1.0), corner(1.0, -1.0, 1.0), corner(1.0, 1.0, 1.0), corner(-1.0, 1.0, 1.0)], 0.65),
        ([corner(-1.0, -1.0, -1.0), corner(-1.0, 1.0, -1.0), corner(1.0, 1.0, -1.0), corner(1.0, -1.0, -1.0)], 0.65),
    ];

    let mut vertices = Vec::with_capacity(36);
    for (quad, factor) in faces {
        let c = colors::shade(color, factor);
        for idx in [0, 1, 2, 0, 2, 3] {
            let p = quad[idx];
            vertices.push(Vertex::new(p.x, p.y, p.z, c));
        }
    }
    vertices
}

/// Blocky player figure: legs, body and head
pub fn fielder_model(fielder: &Fielder) -> Vec<Vertex> {
    let base = fielder.position;
    let kit = colors::role(fielder.role);

    let mut vertices = Vec::with_capacity(36 * 4);
    vertices.extend(cuboid(base + Vec3::new(-0.3, 0.6, 0.0), Vec3::new(0.35, 1.2, 0.35), kit));
    vertices.extend(cuboid(base + Vec3::new(0.3, 0.6, 0.0), Vec3::new(0.35, 1.2, 0.35), kit));
    vertices.extend(cuboid(base + Vec3::new(0.0, 2.0, 0.0), Vec3::new(1.2, 2.5, 0.8), kit));
    vertices.extend(cuboid(base + Vec3::new(0.0, 4.75, 0.0), Vec3::splat(1.0), colors::skin()));
    vertices
}

/// Static ground: grass, pitch, creases, rings, stumps and the buildings past the rope
pub fn field_markings(constants: &FieldConstants, segments: u32) -> Vec<Vertex> {
    let center = Vec2::new(constants.center.x, constants.center.z);
    let half_pitch = constants.pitch_length / 2.0;
    let boundary = constants.boundary_radius;
    let line = colors::line();

    let mut vertices = Vec::new();

    // Grass and pitch
    vertices.extend(disc(center, boundary, 0.0, colors::ground(), segments));
    vertices.extend(flat_rect(center, constants.pitch_width, constants.pitch_length, PITCH_Y, colors::pitch()));

    // Popping creases, 1.22m in front of the stumps
    vertices.extend(flat_rect(Vec2::new(0.0, constants.far_popping_crease_z()), 2.7, 0.08, CREASE_Y, line));
    vertices.extend(flat_rect(Vec2::new(0.0, constants.near_popping_crease_z()), 2.64, 0.08, CREASE_Y, line));

    for end in [half_pitch, -half_pitch] {
        // Return creases either side of the stumps
        vertices.extend(flat_rect(Vec2::new(1.32, end), 0.08, 2.44, CREASE_Y, line));
        vertices.extend(flat_rect(Vec2::new(-1.32, end), 0.08, 2.44, CREASE_Y, line));
        // Bowling crease through the stumps
        vertices.extend(flat_rect(Vec2::new(0.0, end), 3.66, 0.1, CREASE_Y, line));

        for x in [-0.1, 0.0, 0.1] {
            vertices.extend(cuboid(Vec3::new(x, 0.4, end), Vec3::new(0.04, 0.8, 0.04), colors::stumps()));
        }
    }

    // Thirty-yard circle and boundary rope
    vertices.extend(ring(
        center,
        constants.thirty_yard_radius - 0.2,
        constants.thirty_yard_radius,
        RING_Y,
        colors::thirty_yard(),
        segments,
    ));
    vertices.extend(ring(center, boundary - 0.5, boundary, RING_Y, colors::rope(), segments));

    // Sightscreens behind each end, pavilion behind the striker
    vertices.extend(cuboid(Vec3::new(0.0, 3.0, -boundary - 5.0), Vec3::new(20.0, 6.0, 1.0), line));
    vertices.extend(cuboid(Vec3::new(0.0, 3.0, boundary + 5.0), Vec3::new(20.0, 6.0, 1.0), line));
    vertices.extend(cuboid(Vec3::new(0.0, 3.0, -boundary - 15.0), Vec3::new(25.0, 6.0, 5.0), colors::stumps()));
    vertices.extend(cuboid(
        Vec3::new(0.0, 1.5, -boundary - 17.5),
        Vec3::new(30.0, 3.0, 2.0),
        colors::pavilion_base(),
    ));

    vertices
}

/// Coverage disc as a fan from its center to the boundary-clipped outline
pub fn coverage_disc(disc: &CoverageDisc, boundary_radius: f32, segments: u32) -> Vec<Vertex> {
    let color = colors::coverage();
    let outline = clipped_disc_outline(disc, boundary_radius, segments);

    let mut vertices = Vec::with_capacity(outline.len().saturating_sub(1) * 3);
    for pair in outline.windows(2) {
        vertices.push(ground_vertex(disc.center, OVERLAY_Y, color));
        vertices.push(ground_vertex(pair[0], OVERLAY_Y, color));
        vertices.push(ground_vertex(pair[1], OVERLAY_Y, color));
    }
    vertices
}

/// Gap sector as a band fanning out from the crease, outer edge held to the rope
pub fn gap_sector(gap: &GapSector, boundary_radius: f32) -> Vec<Vertex> {
    let color = colors::gap();
    let crease = crease_point();
    let outer_radius = boundary_radius + GAP_OUTER_OVERSHOOT;
    let segments = GAP_ARC_SEGMENTS;

    let arc_point = |r: f32, i: u32| {
        let t = i as f32 / segments as f32;
        crease + bearing_offset(r, gap.start_deg + gap.span_deg() * t)
    };

    let inner: Vec<Vec2> = (0..=segments).map(|i| arc_point(GAP_INNER_RADIUS, i)).collect();
    let outer: Vec<Vec2> = (0..=segments)
        .map(|i| clip_to_boundary(arc_point(outer_radius, i), boundary_radius))
        .collect();

    let mut vertices = Vec::with_capacity((segments * 6) as usize);
    for i in 0..segments as usize {
        vertices.push(ground_vertex(inner[i], OVERLAY_Y, color));
        vertices.push(ground_vertex(outer[i], OVERLAY_Y, color));
        vertices.push(ground_vertex(inner[i + 1], OVERLAY_Y, color));

        vertices.push(ground_vertex(inner[i + 1], OVERLAY_Y, color));
        vertices.push(ground_vertex(outer[i], OVERLAY_Y, color));
        vertices.push(ground_vertex(outer[i + 1], OVERLAY_Y, color));
    }
    vertices
}

/// Build every triangle for the current frame.
///
/// Fielders are sorted far-to-near from `eye` so overlapping figures layer
/// correctly before the depth test.
pub fn scene(
    players: &[Fielder],
    constants: &FieldConstants,
    analysis: &CoverageAnalysis,
    settings: &Settings,
    eye: Vec3,
) -> SceneMeshes {
    let segments = settings.quality.ring_segments();
    let boundary = constants.boundary_radius;

    let mut opaque = field_markings(constants, segments);
    let mut ordered: Vec<&Fielder> = players.iter().collect();
    ordered.sort_by(|a, b| {
        let da = a.position.distance_squared(eye);
        let db = b.position.distance_squared(eye);
        db.partial_cmp(&da).unwrap_or(std::cmp::Ordering::Equal)
    });
    for fielder in ordered {
        opaque.extend(fielder_model(fielder));
    }

    let mut overlay = Vec::new();
    if settings.show_coverage {
        let disc_segments = settings.quality.disc_segments();
        for d in &analysis.discs {
            overlay.extend(coverage_disc(d, boundary, disc_segments));
        }
        if settings.effective_show_gaps() {
            for gap in &analysis.gaps {
                overlay.extend(gap_sector(gap, boundary));
            }
        }
    }

    SceneMeshes { opaque, overlay }
}
