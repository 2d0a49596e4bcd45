//! Game settings
//!
//! Loaded from an optional JSON file. Missing fields take their defaults, so
//! a settings file only needs the values it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Tunable world parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed for maze layout and hint placement
    pub seed: u64,

    // === Maze ===
    /// Side length of the first maze
    pub initial_maze_size: usize,
    /// Size added each time the finish is reached
    pub maze_growth: usize,
    /// Generate-and-solve attempts before giving up on a maze
    pub max_build_attempts: u32,
    /// Attempts made per tick while a new maze is being built
    pub build_attempts_per_tick: u32,

    // === Spatial index ===
    /// Branch factor of the static (walls and doors) tree
    pub static_branch_factor: usize,
    /// Leaf capacity of the static tree
    pub static_leaf_capacity: usize,
    /// Branch factor of the per-tick light tree
    pub dynamic_branch_factor: usize,
    /// Leaf capacity of the per-tick light tree
    pub dynamic_leaf_capacity: usize,

    // === Viewport ===
    /// Visible area in world units, centered on the player
    pub view_width: f32,
    pub view_height: f32,
    /// Extra margin around the view for objects (fraction of view size, per side)
    pub clip_margin: f32,
    /// Extra margin around the view for lights (fraction of view size, per side)
    pub light_margin: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5eed,

            initial_maze_size: 5,
            maze_growth: 2,
            max_build_attempts: 10_000,
            build_attempts_per_tick: 25,

            static_branch_factor: 2,
            static_leaf_capacity: 16,
            dynamic_branch_factor: 2,
            dynamic_leaf_capacity: 64,

            // 1280x720 at 1.6x zoom
            view_width: 800.0,
            view_height: 450.0,
            clip_margin: 0.3,
            light_margin: 1.0,
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a file, failing on any error
    pub fn load_strict(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings from a file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load_strict(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Could not load {}: {e}", path.display());
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> SettingsError {
            SettingsError::Invalid {
                field,
                reason: reason.into(),
            }
        }

        if self.initial_maze_size < 3 {
            // 2x2 mazes never produce a long enough path
            return Err(invalid("initial_maze_size", "must be at least 3"));
        }
        if self.max_build_attempts == 0 {
            return Err(invalid("max_build_attempts", "must be positive"));
        }
        if self.build_attempts_per_tick == 0 {
            return Err(invalid("build_attempts_per_tick", "must be positive"));
        }
        for (field, branch) in [
            ("static_branch_factor", self.static_branch_factor),
            ("dynamic_branch_factor", self.dynamic_branch_factor),
        ] {
            if branch < 2 {
                return Err(invalid(field, "must be at least 2"));
            }
        }
        if !(self.view_width > 0.0 && self.view_height > 0.0) {
            return Err(invalid("view_width", "view size must be positive"));
        }
        for (field, margin) in [
            ("clip_margin", self.clip_margin),
            ("light_margin", self.light_margin),
        ] {
            if !(margin >= 0.0 && margin.is_finite()) {
                return Err(invalid(field, format!("{margin} is not a valid margin")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        Settings::default().validate().unwrap();
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 42, "initial_maze_size": 7 }"#).unwrap();
        assert_eq!(settings.seed, 42);
        assert_eq!(settings.initial_maze_size, 7);
        assert_eq!(settings.static_leaf_capacity, 16);
        assert_eq!(settings.dynamic_leaf_capacity, 64);
    }

    #[test]
    fn test_json_roundtrip() {
        let settings = Settings {
            seed: 9,
            clip_margin: 0.5,
            ..Default::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_rejects_invalid_values() {
        let err = Settings::from_json(r#"{ "static_branch_factor": 1 }"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid {
                field: "static_branch_factor",
                ..
            }
        ));

        assert!(matches!(
            Settings::from_json(r#"{ "initial_maze_size": 2 }"#),
            Err(SettingsError::Invalid { .. })
        ));
        assert!(matches!(
            Settings::from_json("not json"),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let path = std::env::temp_dir().join("lumen-maze-no-such-settings.json");
        assert!(matches!(
            Settings::load_strict(&path),
            Err(SettingsError::Io(_))
        ));
        assert_eq!(Settings::load(&path), Settings::default());
    }
}
