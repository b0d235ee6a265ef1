//! Simulation settings and preferences
//!
//! Persisted in LocalStorage on the web host. Damage itself is never saved.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_STRESS, MAX_CRACK_SEGMENTS, STRESS_SCALE};
use crate::sim::TriggerOffsets;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Crack segment ceiling for this preset
    pub fn max_segments(&self) -> usize {
        match self {
            QualityPreset::Low => MAX_CRACK_SEGMENTS / 2,
            QualityPreset::Medium => MAX_CRACK_SEGMENTS,
            QualityPreset::High => MAX_CRACK_SEGMENTS * 3 / 2,
        }
    }
}

/// Simulation settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Stress slider value (0.0 - 1.0)
    pub stress: f32,
    /// Start ticking as soon as the simulation is mounted
    pub auto_start: bool,
    /// Maps the stress slider onto effective growth stress
    pub stress_scale: f32,
    /// Crack density preset
    pub quality: QualityPreset,

    // === Accessibility ===
    /// Reduced motion (no windshield shake or aura wobble)
    pub reduced_motion: bool,
    /// Draw the incoming rock
    pub show_rock: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            stress: DEFAULT_STRESS,
            auto_start: true,
            stress_scale: STRESS_SCALE,
            quality: QualityPreset::Medium,
            reduced_motion: false,
            show_rock: true,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Apply a quality preset
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;
    }

    /// Effective crack segment ceiling
    pub fn max_segments(&self) -> usize {
        self.quality.max_segments()
    }

    /// Auto-spawned rocks stop once the field gets this crowded
    pub fn auto_spawn_segment_limit(&self) -> usize {
        self.max_segments() * 5 / 6
    }

    /// Stress clamped into the slider range
    pub fn clamped_stress(&self) -> f32 {
        self.stress.clamp(0.0, 1.0)
    }

    /// Stress scale clamped to `[0, 1]`
    pub fn clamped_stress_scale(&self) -> f32 {
        self.stress_scale.clamp(0.0, 1.0)
    }

    /// Trigger offsets as they should reach the screen
    pub fn effective_offsets(&self, offsets: TriggerOffsets) -> TriggerOffsets {
        if self.reduced_motion {
            TriggerOffsets::default()
        } else {
            offsets
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse settings; missing fields take their defaults and numbers are
    /// clamped into range
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.stress = settings.clamped_stress();
        settings.stress_scale = settings.clamped_stress_scale();
        Ok(settings)
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "windshield_crack_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
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
            match self.to_json() {
                Ok(json) => {
                    let _ = storage.set_item(Self::STORAGE_KEY, &json);
                    log::info!("Settings saved");
                }
                Err(e) => log::warn!("Settings not saved: {}", e),
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
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.stress, 0.45);
        assert!(s.auto_start);
        assert_eq!(s.max_segments(), 3000);
        assert_eq!(s.auto_spawn_segment_limit(), 2500);
    }

    #[test]
    fn test_presets() {
        assert_eq!(Settings::from_preset(QualityPreset::Low).max_segments(), 1500);
        assert_eq!(Settings::from_preset(QualityPreset::High).max_segments(), 4500);
        assert_eq!(QualityPreset::parse("MED"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::parse("ultra"), None);
        assert_eq!(QualityPreset::High.as_str(), "High");
    }

    #[test]
    fn test_json_partial_fields() {
        let s = Settings::from_json(r#"{"stress": 0.9, "quality": "Low"}"#).expect("parse");
        assert_eq!(s.stress, 0.9);
        assert_eq!(s.quality, QualityPreset::Low);
        assert!(s.show_rock);

        let round = Settings::from_json(&s.to_json().expect("json")).expect("parse");
        assert_eq!(round, s);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Settings::from_json("{stress:").is_err());
    }

    #[test]
    fn test_reduced_motion_offsets() {
        let shaken = TriggerOffsets {
            shake: glam::Vec2::new(2.0, -1.0),
        };
        assert_eq!(Settings::default().effective_offsets(shaken), shaken);

        let calm = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        assert_eq!(calm.effective_offsets(shaken), TriggerOffsets::default());
    }

    #[test]
    fn test_clamped_stress() {
        let s = Settings {
            stress: -0.2,
            stress_scale: 7.0,
            ..Settings::default()
        };
        assert_eq!(s.clamped_stress(), 0.0);
        assert_eq!(s.clamped_stress_scale(), 1.0);
    }

    #[test]
    fn test_json_clamps_out_of_range_numbers() {
        let s = Settings::from_json(r#"{"stress": 1.5, "stress_scale": 2e9}"#).expect("parse");
        assert_eq!(s.stress, 1.0);
        assert_eq!(s.stress_scale, 1.0);
    }

    #[test]
    fn test_apply_preset() {
        let mut s = Settings::default();
        s.apply_preset(QualityPreset::High);
        assert_eq!(s.quality, QualityPreset::High);
        assert_eq!(s.max_segments(), 4500);
        assert_eq!(s.auto_spawn_segment_limit(), 3750);
    }
}
