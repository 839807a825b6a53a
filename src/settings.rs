//! User preferences
//!
//! Persisted in LocalStorage, separately from the URL-carried pool state.

use serde::{Deserialize, Serialize};

/// User preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Play the celebration sound on chore completion
    pub sound: bool,
    /// Show the confetti celebration effect
    pub celebration_effects: bool,
    /// Minimize motion (skips the celebration effect loop)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound: true,
            celebration_effects: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "chore_dice_settings";

    /// Effective celebration effects (respects reduced_motion)
    pub fn effective_celebration(&self) -> bool {
        self.celebration_effects && !self.reduced_motion
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
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
    fn test_settings_json_round_trip() {
        let settings = Settings {
            sound: false,
            celebration_effects: true,
            reduced_motion: true,
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.sound, settings.sound);
        assert_eq!(back.celebration_effects, settings.celebration_effects);
        assert_eq!(back.reduced_motion, settings.reduced_motion);
    }

    #[test]
    fn test_reduced_motion_suppresses_celebration() {
        let mut settings = Settings::default();
        assert!(settings.effective_celebration());
        settings.reduced_motion = true;
        assert!(!settings.effective_celebration());
    }
}
