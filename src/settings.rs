//! Presentation settings and preferences
//!
//! Persisted separately from the best score, as JSON in the key-value store.

use serde::{Deserialize, Serialize};

use crate::persistence::KeyValueStore;

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

    /// Next preset in the menu's cycle (Low -> Medium -> High -> Low)
    pub fn next(&self) -> Self {
        match self {
            QualityPreset::Low => QualityPreset::Medium,
            QualityPreset::Medium => QualityPreset::High,
            QualityPreset::High => QualityPreset::Low,
        }
    }

    /// Number of halo rings drawn around neon shapes
    pub fn glow_layers(&self) -> u32 {
        match self {
            QualityPreset::Low => 1,
            QualityPreset::Medium => 3,
            QualityPreset::High => 5,
        }
    }

    /// Triangle fan segments for round shapes
    pub fn circle_segments(&self) -> u32 {
        match self {
            QualityPreset::Low => 12,
            QualityPreset::Medium => 24,
            QualityPreset::High => 48,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Neon halos around cars and pickups
    pub glow: bool,
    /// Particle effects (explosions, pickup sparks)
    pub particles: bool,
    /// Keep the road grid and watermark still
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            glow: true,
            particles: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;

        // Low preset drops the halos for performance
        self.glow = preset != QualityPreset::Low;
    }

    /// Step to the next quality preset; returns the new preset
    pub fn cycle_quality(&mut self) -> QualityPreset {
        let next = self.quality.next();
        self.apply_preset(next);
        next
    }

    /// Flip reduced motion; returns the new value
    pub fn toggle_reduced_motion(&mut self) -> bool {
        self.reduced_motion = !self.reduced_motion;
        self.reduced_motion
    }

    /// Halo rings to draw (0 when glow is off)
    pub fn glow_layers(&self) -> u32 {
        if self.glow {
            self.quality.glow_layers()
        } else {
            0
        }
    }

    /// Storage key
    pub const STORAGE_KEY: &'static str = "neon_drift_settings";

    /// Load settings, falling back to defaults on missing or bad data
    pub fn load(store: &dyn KeyValueStore) -> Self {
        if let Ok(Some(json)) = store.get(Self::STORAGE_KEY) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring stored settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => match store.set(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::warn!("Settings not saved: {}", e),
            },
            Err(e) => log::warn!("Settings not serialized: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_low_preset_disables_glow() {
        let mut settings = Settings::default();
        settings.apply_preset(QualityPreset::Low);
        assert!(!settings.glow);
        assert_eq!(settings.glow_layers(), 0);
        assert_eq!(Settings::default().glow_layers(), 3);

        // Leaving Low brings the halos back
        settings.apply_preset(QualityPreset::High);
        assert_eq!(settings.glow_layers(), 5);
    }

    #[test]
    fn test_cycle_quality_wraps() {
        let mut settings = Settings::default();
        assert_eq!(settings.cycle_quality(), QualityPreset::High);
        assert_eq!(settings.cycle_quality(), QualityPreset::Low);
        assert!(!settings.glow);
        assert_eq!(settings.cycle_quality(), QualityPreset::Medium);
        assert!(settings.glow);
        assert_eq!(settings.quality.as_str(), "Medium");
    }

    #[test]
    fn test_menu_changes_persist() {
        let mut store = MemoryStore::new();
        let mut settings = Settings::load(&store);
        settings.cycle_quality();
        assert!(settings.toggle_reduced_motion());
        settings.save(&mut store);

        let reloaded = Settings::load(&store);
        assert_eq!(reloaded.quality, QualityPreset::High);
        assert!(reloaded.reduced_motion);
        assert_eq!(reloaded, settings);
    }

    #[test]
    fn test_save_load() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            quality: QualityPreset::High,
            particles: false,
            ..Default::default()
        };
        settings.save(&mut store);
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_bad_json_uses_defaults() {
        let mut store = MemoryStore::new();
        store.set(Settings::STORAGE_KEY, "{oops").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());

        store
            .set(Settings::STORAGE_KEY, r#"{"reduced_motion":true}"#)
            .unwrap();
        let loaded = Settings::load(&store);
        assert!(loaded.reduced_motion);
        assert!(loaded.glow);
    }
}
