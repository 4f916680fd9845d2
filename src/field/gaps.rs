//! Angular gap detection around the batting crease
//!
//! The field is split into [`NUM_SECTORS`] one-degree sectors radiating from the
//! crease. Each sector is sampled every [`RADIAL_STEP`] meters out to the
//! boundary; a sector is covered as soon as one sample lands inside any
//! coverage disc. Maximal runs of uncovered sectors become [`GapSector`]s.

use serde::{Deserialize, Serialize};

use super::coverage::{CoverageDisc, coverage_discs};
use super::roster::{FieldConstants, Fielder};
use crate::consts::*;
use crate::{bearing_offset, crease_point, normalize_degrees};

/// Degrees spanned by one sector
const SECTOR_DEGREES: f32 = 360.0 / NUM_SECTORS as f32;

/// A contiguous uncovered angular range, as seen from the crease
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GapSector {
    /// Start bearing in degrees, [0, 360)
    pub start_deg: f32,
    /// End bearing in degrees, (start, 360]
    pub end_deg: f32,
}

impl GapSector {
    pub fn new(start_deg: f32, end_deg: f32) -> Self {
        Self { start_deg, end_deg }
    }

    /// Angular span in degrees (handles wraparound)
    pub fn span_deg(&self) -> f32 {
        let mut span = self.end_deg - self.start_deg;
        if span < 0.0 {
            span += 360.0;
        }
        span
    }

    /// Bearing halfway through the gap
    pub fn mid_deg(&self) -> f32 {
        normalize_degrees(self.start_deg + self.span_deg() / 2.0)
    }
}

/// Discs and gaps derived together from one roster snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageAnalysis {
    pub discs: Vec<CoverageDisc>,
    pub gaps: Vec<GapSector>,
}

impl CoverageAnalysis {
    /// Total uncovered arc in degrees
    pub fn uncovered_degrees(&self) -> f32 {
        self.gaps.iter().map(GapSector::span_deg).sum()
    }

    /// Widest gap, first one wins on ties
    pub fn widest_gap(&self) -> Option<&GapSector> {
        self.gaps.iter().fold(None, |best: Option<&GapSector>, g| match best {
            Some(b) if b.span_deg() >= g.span_deg() => Some(b),
            _ => Some(g),
        })
    }
}

/// Sample every sector and report which ones are reached by a disc.
///
/// Index `i` covers the bearing `i` degrees from the +z axis.
pub fn sample_sectors(discs: &[CoverageDisc], boundary_radius: f32) -> [bool; NUM_SECTORS] {
    let mut covered = [false; NUM_SECTORS];
    let origin = crease_point();
    // Radii 5, 10, 15, ... up to and including the boundary
    let steps = if boundary_radius >= RADIAL_STEP {
        (boundary_radius / RADIAL_STEP).floor() as u32
    } else {
        0
    };

    for (i, sector) in covered.iter_mut().enumerate() {
        let bearing = i as f32 * SECTOR_DEGREES;

        *sector = (1..=steps).any(|k| {
            let test_point = origin + bearing_offset(k as f32 * RADIAL_STEP, bearing);
            discs.iter().any(|disc| disc.contains(test_point))
        });
    }

    covered
}

/// Find maximal runs of uncovered sectors.
///
/// A run still open when the scan reaches the last sector closes at exactly
/// 360 and is not merged with a run that starts at sector 0, so a gap that
/// straddles 0° is reported as two sectors.
pub fn detect_gaps(discs: &[CoverageDisc], boundary_radius: f32) -> Vec<GapSector> {
    let covered = sample_sectors(discs, boundary_radius);
    gaps_from_coverage(&covered)
}

fn gaps_from_coverage(covered: &[bool]) -> Vec<GapSector> {
    let mut gaps = Vec::new();
    let mut gap_start: Option<usize> = None;

    for (i, &is_covered) in covered.iter().enumerate() {
        match (is_covered, gap_start) {
            (false, None) => gap_start = Some(i),
            (true, Some(start)) => {
                gaps.push(GapSector::new(
                    start as f32 * SECTOR_DEGREES,
                    i as f32 * SECTOR_DEGREES,
                ));
                gap_start = None;
            }
            _ => {}
        }
    }

    if let Some(start) = gap_start {
        gaps.push(GapSector::new(start as f32 * SECTOR_DEGREES, 360.0));
    }

    gaps
}

/// Full coverage analysis for a roster.
///
/// With coverage disabled there is nothing to analyze: no discs, no gaps.
pub fn analyze(players: &[Fielder], constants: &FieldConstants, enabled: bool) -> CoverageAnalysis {
    if !enabled {
        return CoverageAnalysis::default();
    }

    let discs = coverage_discs(players, constants.boundary_radius, true);
    let gaps = detect_gaps(&discs, constants.boundary_radius);
    CoverageAnalysis { discs, gaps }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::roster::{Role, default_roster};
    use glam::{Vec2, Vec3};

    fn disc(x: f32, z: f32, radius: f32) -> CoverageDisc {
        CoverageDisc {
            fielder_id: "test".to_string(),
            center: Vec2::new(x, z),
            radius,
        }
    }

    /// Disc sitting on the sample point `r` meters out along `bearing`
    fn disc_on_bearing(bearing: f32, r: f32, radius: f32) -> CoverageDisc {
        let p = crease_point() + bearing_offset(r, bearing);
        disc(p.x, p.y, radius)
    }

    #[test]
    fn test_empty_field_is_one_full_gap() {
        let gaps = detect_gaps(&[], 65.0);
        assert_eq!(gaps, vec![GapSector::new(0.0, 360.0)]);
    }

    #[test]
    fn test_huge_disc_at_crease_covers_everything() {
        let discs = [disc(0.0, BATTING_CREASE_Z, 70.0)];
        assert!(detect_gaps(&discs, 65.0).is_empty());
    }

    #[test]
    fn test_tiny_boundary_has_no_samples() {
        // No radius reaches 5m, so nothing can be covered
        let discs = [disc(0.0, BATTING_CREASE_Z, 70.0)];
        assert_eq!(detect_gaps(&discs, 4.0), vec![GapSector::new(0.0, 360.0)]);
    }

    #[test]
    fn test_single_disc_straight_down_pitch() {
        // 1m disc 30m out along 0° reaches sectors 359, 0 and 1 only
        let discs = [disc_on_bearing(0.0, 30.0, 1.0)];
        let covered = sample_sectors(&discs, 65.0);
        assert!(covered[0]);
        assert!(covered[1]);
        assert!(!covered[2]);
        assert!(!covered[180]);
        assert!(!covered[358]);
        assert!(covered[359]);

        let gaps = detect_gaps(&discs, 65.0);
        assert_eq!(gaps, vec![GapSector::new(2.0, 359.0)]);
    }

    #[test]
    fn test_wraparound_gap_is_not_merged() {
        // Cover only the sectors around 180°, leaving a gap across 0°
        let discs = [disc_on_bearing(180.0, 20.0, 3.0)];
        let gaps = detect_gaps(&discs, 65.0);
        assert_eq!(gaps.len(), 2);
        assert_eq!(gaps[0].start_deg, 0.0);
        assert!(gaps[0].end_deg < 180.0);
        assert!(gaps[1].start_deg > 180.0);
        assert_eq!(gaps[1].end_deg, 360.0);
    }

    #[test]
    fn test_gaps_from_coverage_runs() {
        let mut covered = [true; NUM_SECTORS];
        covered[10..20].fill(false);
        covered[350..].fill(false);
        let gaps = gaps_from_coverage(&covered);
        assert_eq!(gaps, vec![GapSector::new(10.0, 20.0), GapSector::new(350.0, 360.0)]);
    }

    #[test]
    fn test_detect_gaps_idempotent() {
        let analysis_a = analyze(&default_roster(), &FieldConstants::default(), true);
        let analysis_b = analyze(&default_roster(), &FieldConstants::default(), true);
        assert_eq!(analysis_a, analysis_b);
    }

    #[test]
    fn test_default_field_gaps() {
        let analysis = analyze(&default_roster(), &FieldConstants::default(), true);
        assert_eq!(analysis.discs.len(), 10);
        assert_eq!(
            analysis.gaps,
            vec![
                GapSector::new(0.0, 4.0),
                GapSector::new(26.0, 61.0),
                GapSector::new(82.0, 114.0),
                GapSector::new(140.0, 168.0),
                GapSector::new(226.0, 279.0),
                GapSector::new(300.0, 322.0),
                GapSector::new(357.0, 360.0),
            ]
        );
        assert_eq!(analysis.uncovered_degrees(), 177.0);
        assert_eq!(analysis.widest_gap(), Some(&GapSector::new(226.0, 279.0)));
    }

    #[test]
    fn test_analyze_disabled_is_empty() {
        let analysis = analyze(&default_roster(), &FieldConstants::default(), false);
        assert!(analysis.discs.is_empty());
        assert!(analysis.gaps.is_empty());
    }

    #[test]
    fn test_batsman_does_not_cover() {
        let players = vec![Fielder::new(
            "striker",
            "Striker",
            Vec3::new(0.0, 0.0, 20.0),
            Role::Batsman,
        )];
        let analysis = analyze(&players, &FieldConstants::default(), true);
        assert!(analysis.discs.is_empty());
        assert_eq!(analysis.gaps, vec![GapSector::new(0.0, 360.0)]);
    }

    #[test]
    fn test_gap_sector_helpers() {
        let g = GapSector::new(350.0, 10.0);
        assert_eq!(g.span_deg(), 20.0);
        assert_eq!(g.mid_deg(), 0.0);

        let g = GapSector::new(90.0, 120.0);
        assert_eq!(g.span_deg(), 30.0);
        assert_eq!(g.mid_deg(), 105.0);
    }

    #[test]
    fn test_widest_gap() {
        let analysis = CoverageAnalysis {
            discs: Vec::new(),
            gaps: vec![
                GapSector::new(0.0, 10.0),
                GapSector::new(40.0, 90.0),
                GapSector::new(300.0, 350.0),
            ],
        };
        assert_eq!(analysis.widest_gap(), Some(&GapSector::new(40.0, 90.0)));
        assert_eq!(analysis.uncovered_degrees(), 110.0);
    }
}
