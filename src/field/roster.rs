//! Fielder entities and static field geometry
//!
//! The roster is fixed for a session: fielders are moved and renamed in place,
//! never added or removed.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{bearing_of, crease_point};

/// Player role on the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Batsman,
    Bowler,
    Wicketkeeper,
    Fielder,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Batsman => "batsman",
            Role::Bowler => "bowler",
            Role::Wicketkeeper => "wicketkeeper",
            Role::Fielder => "fielder",
        }
    }

    /// Only fielders and the keeper are responsible for ground coverage
    pub fn covers_ground(&self) -> bool {
        matches!(self, Role::Fielder | Role::Wicketkeeper)
    }
}

/// A player on the field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fielder {
    /// Unique within a roster
    pub id: String,
    pub name: String,
    /// World position; y is height above the ground
    pub position: Vec3,
    #[serde(rename = "type")]
    pub role: Role,
}

impl Fielder {
    pub fn new(id: impl Into<String>, name: impl Into<String>, position: Vec3, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position,
            role,
        }
    }

    /// Position projected onto the ground plane as (x, z)
    #[inline]
    pub fn ground_position(&self) -> Vec2 {
        Vec2::new(self.position.x, self.position.z)
    }

    /// Direction from the batting crease, in the same degrees as gap sectors
    pub fn bearing_from_crease(&self) -> f32 {
        bearing_of(self.ground_position() - crease_point())
    }
}

/// Static field geometry, immutable for the lifetime of a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldConstants {
    pub center: Vec3,
    pub boundary_radius: f32,
    pub thirty_yard_radius: f32,
    pub pitch_length: f32,
    pub pitch_width: f32,
}

impl Default for FieldConstants {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            boundary_radius: BOUNDARY_RADIUS,
            thirty_yard_radius: THIRTY_YARD_RADIUS,
            pitch_length: PITCH_LENGTH,
            pitch_width: PITCH_WIDTH,
        }
    }
}

impl FieldConstants {
    /// Z of the popping crease at the bowler's end (1.22m in front of the stumps)
    pub fn far_popping_crease_z(&self) -> f32 {
        self.pitch_length / 2.0 - 1.22
    }

    /// Z of the popping crease at the striker's end
    pub fn near_popping_crease_z(&self) -> f32 {
        -(self.pitch_length / 2.0) + 1.22
    }
}

/// The standard opening field: bowler, keeper and nine fielders
pub fn default_roster() -> Vec<Fielder> {
    let spots: [(&str, &str, [f32; 3], Role); 11] = [
        ("bowler", "Bowler", [0.0, 0.0, 25.0], Role::Bowler),
        ("wk", "Wicket Keeper", [0.0, 0.0, -20.0], Role::Wicketkeeper),
        ("slip1", "First Slip", [-10.0, 0.0, -23.0], Role::Fielder),
        ("slip2", "Second Slip", [-4.0, 0.0, -22.0], Role::Fielder),
        ("gully", "Gully", [-2.0, 0.0, -23.0], Role::Fielder),
        ("point", "Point", [-26.0, 0.0, 0.0], Role::Fielder),
        ("cover", "Cover", [-10.0, 0.0, 10.0], Role::Fielder),
        ("mid-off", "Mid Off", [-9.0, 0.0, 26.0], Role::Fielder),
        ("mid-on", "Mid On", [9.0, 0.0, 26.0], Role::Fielder),
        ("square-leg", "Square Leg", [26.0, 0.0, 0.0], Role::Fielder),
        ("fine-leg", "Fine Leg", [8.0, 0.0, -15.0], Role::Fielder),
    ];

    spots
        .into_iter()
        .map(|(id, name, pos, role)| Fielder::new(id, name, Vec3::from_array(pos), role))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_roster_ids_unique() {
        let roster = default_roster();
        assert_eq!(roster.len(), 11);
        let ids: HashSet<_> = roster.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids.len(), roster.len());
    }

    #[test]
    fn test_default_roster_roles() {
        let roster = default_roster();
        assert_eq!(roster[0].role, Role::Bowler);
        assert_eq!(roster[1].role, Role::Wicketkeeper);
        assert!(roster[2..].iter().all(|f| f.role == Role::Fielder));
    }

    #[test]
    fn test_role_covers_ground() {
        assert!(Role::Fielder.covers_ground());
        assert!(Role::Wicketkeeper.covers_ground());
        assert!(!Role::Bowler.covers_ground());
        assert!(!Role::Batsman.covers_ground());
    }

    #[test]
    fn test_bearing_from_crease() {
        let roster = default_roster();
        let bearing = |id: &str| roster.iter().find(|f| f.id == id).unwrap().bearing_from_crease();
        // Bowler straight down the pitch, keeper straight behind
        assert!(bearing("bowler").abs() < 1e-3);
        assert!((bearing("wk") - 180.0).abs() < 1e-3);
        // Square leg on +x, point on -x
        assert!(bearing("square-leg") > 0.0 && bearing("square-leg") < 90.0);
        assert!(bearing("point") > 270.0 && bearing("point") < 360.0);
    }

    #[test]
    fn test_role_names_match_wire_format() {
        for role in [Role::Batsman, Role::Bowler, Role::Wicketkeeper, Role::Fielder] {
            assert_eq!(serde_json::to_value(role).unwrap(), role.as_str());
        }
    }

    #[test]
    fn test_fielder_wire_format() {
        let f = Fielder::new("point", "Point", Vec3::new(-26.0, 0.0, 0.0), Role::Fielder);
        let json = serde_json::to_value(&f).unwrap();
        assert_eq!(json["type"], "fielder");
        assert_eq!(json["position"], serde_json::json!([-26.0, 0.0, 0.0]));

        let parsed: Fielder = serde_json::from_str(
            r#"{"id":"wk","name":"Keeper","position":[0,0,-20],"type":"wicketkeeper"}"#,
        )
        .unwrap();
        assert_eq!(parsed.role, Role::Wicketkeeper);
        assert_eq!(parsed.position, Vec3::new(0.0, 0.0, -20.0));
    }

    #[test]
    fn test_crease_positions() {
        let c = FieldConstants::default();
        assert!((c.far_popping_crease_z() - 8.84).abs() < 1e-4);
        assert!((c.near_popping_crease_z() + 8.84).abs() < 1e-4);
    }
}
