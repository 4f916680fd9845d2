//! Editor session state
//!
//! Owns the roster and the coverage flag, and keeps the derived
//! [`CoverageAnalysis`] in step with them. The analysis is recomputed only when
//! something it depends on changes (positions, roles, the coverage flag);
//! renames and title edits leave it alone.

use glam::Vec3;

use crate::field::{
    CoverageAnalysis, FieldConstants, Fielder, Role, analyze, clamp_to_boundary, default_roster,
};
use crate::share::{self, ShareError, SharedField};

/// One editing session: a fixed roster plus what is derived from it
#[derive(Debug, Clone)]
pub struct FieldSession {
    constants: FieldConstants,
    players: Vec<Fielder>,
    title: Option<String>,
    show_coverage: bool,
    analysis: CoverageAnalysis,
    /// Bumped every time the analysis is recomputed
    analysis_revision: u64,
}

impl FieldSession {
    /// Start a session with the default roster
    pub fn new(constants: FieldConstants) -> Self {
        Self::with_players(constants, default_roster(), None)
    }

    pub fn with_players(constants: FieldConstants, players: Vec<Fielder>, title: Option<String>) -> Self {
        let mut session = Self {
            constants,
            players,
            title,
            show_coverage: true,
            analysis: CoverageAnalysis::default(),
            analysis_revision: 0,
        };
        session.recompute();
        session
    }

    /// Start from a page query string, falling back to the default roster when
    /// there is no `field` parameter or it does not decode
    pub fn from_query(search: &str, constants: FieldConstants) -> Self {
        let mut session = Self::new(constants);
        if let Some(payload) = share::field_param(search) {
            if let Err(e) = session.load_shared(&payload) {
                log::error!("Failed to load field from URL: {}", e);
            }
        }
        session
    }

    pub fn constants(&self) -> &FieldConstants {
        &self.constants
    }

    pub fn players(&self) -> &[Fielder] {
        &self.players
    }

    pub fn fielder(&self, id: &str) -> Option<&Fielder> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn show_coverage(&self) -> bool {
        self.show_coverage
    }

    pub fn analysis(&self) -> &CoverageAnalysis {
        &self.analysis
    }

    pub fn analysis_revision(&self) -> u64 {
        self.analysis_revision
    }

    /// Drag callback: move a fielder to a ground-plane point.
    ///
    /// The point is clamped inside the boundary and the fielder keeps its own
    /// height. Returns false for an unknown id.
    pub fn move_fielder(&mut self, id: &str, ground_point: Vec3) -> bool {
        let boundary = self.constants.boundary_radius;
        let Some(player) = self.players.iter_mut().find(|p| p.id == id) else {
            log::warn!("Drag for unknown fielder '{}'", id);
            return false;
        };

        let target = Vec3::new(ground_point.x, player.position.y, ground_point.z);
        let clamped = clamp_to_boundary(target, boundary);
        if clamped == player.position {
            return true;
        }
        player.position = clamped;
        log::debug!("Moved '{}' to ({:.2}, {:.2})", id, clamped.x, clamped.z);

        self.recompute();
        true
    }

    /// Rename callback. Names do not affect coverage, so no recompute.
    pub fn rename_fielder(&mut self, id: &str, name: &str) -> bool {
        let Some(player) = self.players.iter_mut().find(|p| p.id == id) else {
            log::warn!("Rename for unknown fielder '{}'", id);
            return false;
        };

        let name = name.trim();
        if name.is_empty() {
            log::debug!("Ignoring empty name for '{}'", id);
            return false;
        }
        player.name = name.to_string();
        log::debug!("Renamed '{}' to '{}'", id, player.name);
        true
    }

    pub fn set_role(&mut self, id: &str, role: Role) -> bool {
        let Some(player) = self.players.iter_mut().find(|p| p.id == id) else {
            log::warn!("Role change for unknown fielder '{}'", id);
            return false;
        };

        if player.role != role {
            player.role = role;
            self.recompute();
        }
        true
    }

    pub fn set_show_coverage(&mut self, show: bool) {
        if self.show_coverage != show {
            self.show_coverage = show;
            self.recompute();
        }
    }

    pub fn set_title(&mut self, title: Option<String>) {
        self.title = normalize_title(title);
    }

    /// Snapshot of what a share link carries
    pub fn shared_field(&self) -> SharedField {
        SharedField {
            players: self.players.clone(),
            title: self.title.clone(),
        }
    }

    pub fn share_url(&self, origin: &str, path: &str) -> Result<String, ShareError> {
        share::share_url(origin, path, &self.shared_field())
    }

    /// Replace roster and title from an encoded `field` value.
    ///
    /// On error the session is left untouched.
    pub fn load_shared(&mut self, encoded: &str) -> Result<(), ShareError> {
        let shared = share::decode_field(encoded)?;
        log::info!(
            "Loaded shared field with {} players{}",
            shared.players.len(),
            shared
                .title
                .as_deref()
                .map(|t| format!(" ('{}')", t))
                .unwrap_or_default()
        );
        self.players = shared.players;
        self.title = normalize_title(shared.title);
        self.recompute();
        Ok(())
    }

    fn recompute(&mut self) {
        self.analysis = analyze(&self.players, &self.constants, self.show_coverage);
        self.analysis_revision += 1;
        log::debug!(
            "Coverage recomputed: {} discs, {} gaps",
            self.analysis.discs.len(),
            self.analysis.gaps.len()
        );
    }
}

/// Trimmed title, with blank titles dropped
fn normalize_title(title: Option<String>) -> Option<String> {
    title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

impl Default for FieldSession {
    fn default() -> Self {
        Self::new(FieldConstants::default())
    }
}
