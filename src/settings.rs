//! Editor settings and preferences
//!
//! Persisted in LocalStorage, separately from field layouts (which only ever
//! live in share links).

use serde::{Deserialize, Serialize};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    /// Vertices around a coverage disc outline
    pub fn disc_segments(&self) -> u32 {
        match self {
            QualityPreset::Low => 24,
            QualityPreset::Medium => 64,
            QualityPreset::High => 128,
        }
    }

    /// Segments for the ground, boundary rope and thirty-yard ring
    pub fn ring_segments(&self) -> u32 {
        self.disc_segments()
    }
}

/// Editor settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Mesh quality preset
    pub quality: QualityPreset,

    // === Overlays ===
    /// Coverage discs (and the analysis behind them)
    pub show_coverage: bool,
    /// Red gap sectors on top of the coverage discs
    pub show_gaps: bool,
    /// Floating name labels above fielders
    pub show_labels: bool,

    // === Input ===
    /// Max delay between label clicks to enter name editing (ms)
    pub double_click_ms: f64,
    /// Orbit speed (radians per pixel dragged)
    pub orbit_sensitivity: f32,
    /// Zoom speed (distance factor per wheel delta unit)
    pub zoom_sensitivity: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            show_coverage: true,
            show_gaps: true,
            show_labels: true,

            double_click_ms: 400.0,
            orbit_sensitivity: 0.005,
            zoom_sensitivity: 0.001,
        }
    }
}

impl Settings {
    /// Gap overlays only make sense on top of coverage
    pub fn effective_show_gaps(&self) -> bool {
        self.show_coverage && self.show_gaps
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "fielder_pro_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_segments_increase() {
        assert!(QualityPreset::Low.disc_segments() < QualityPreset::Medium.disc_segments());
        assert!(QualityPreset::Medium.disc_segments() < QualityPreset::High.disc_segments());
        assert_eq!(QualityPreset::Medium.disc_segments(), 64);
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let s: Settings = serde_json::from_str(r#"{"quality":"High","show_gaps":false}"#).unwrap();
        assert_eq!(s.quality, QualityPreset::High);
        assert!(!s.show_gaps);
        assert!(s.show_coverage);
        assert_eq!(s.double_click_ms, 400.0);
    }

    #[test]
    fn test_gaps_need_coverage() {
        let mut s = Settings::default();
        assert!(s.effective_show_gaps());
        s.show_coverage = false;
        assert!(!s.effective_show_gaps());
    }
}
