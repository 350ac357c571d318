//! Run configuration and difficulty tuning
//!
//! Loaded from an optional JSON file; every field has a default, so a partial
//! file only overrides what it names.

use std::fmt;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "normal" | "easy" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Multiplier for the starting batch and the per-wave alien range
    pub fn alien_count_scale(&self) -> f32 {
        match self {
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 2.0,
        }
    }

    /// Multiplier for alien vertical drift
    pub fn alien_drift_scale(&self) -> f32 {
        match self {
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.5,
        }
    }

    /// Alien lasers allowed on the field at once
    pub fn max_alien_lasers(&self) -> u32 {
        match self {
            Difficulty::Normal => MAX_ALIEN_LASERS,
            Difficulty::Hard => MAX_ALIEN_LASERS * 2,
        }
    }

    /// Whether upgraded aliens may fire strong lasers
    pub fn strong_alien_lasers(&self) -> bool {
        matches!(self, Difficulty::Hard)
    }
}

/// Why a settings file could not be used
#[derive(Debug)]
pub enum SettingsError {
    Io {
        path: String,
        source: std::io::Error,
    },
    /// JSON that does not match the settings shape, either way
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read settings file {path}: {source}"),
            Self::Parse(err) => write!(f, "settings JSON: {err}"),
            Self::Invalid(reason) => write!(f, "invalid settings: {reason}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === World ===
    /// Playfield width in cells
    pub width: u16,
    /// Screen height in rows; the bottom row is reserved for the info line
    pub height: u16,

    // === Rules ===
    /// More aliens, faster descent, strong alien lasers
    pub hard_mode: bool,
    /// Alien lasers can destroy other aliens
    pub aliens_friendly_fire: bool,
    /// Enables detonating aliens
    pub special_feature: bool,
    /// Aliens in the opening batch (before the difficulty multiplier)
    pub starting_aliens: u32,

    // === Run ===
    /// Seed of the shared random stream
    pub seed: u64,
    /// Stop after this many ticks (headless and test runs)
    pub max_iterations: Option<u32>,
    /// Show the iteration/score/count line at the bottom
    pub display_info: bool,
    /// Pause the host inserts between ticks
    pub iteration_sleep_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 80,
            height: 29,

            hard_mode: false,
            aliens_friendly_fire: true,
            special_feature: false,
            starting_aliens: 20,

            seed: 1,
            max_iterations: None,
            display_info: true,
            iteration_sleep_ms: 50,
        }
    }
}

impl Settings {
    pub fn difficulty(&self) -> Difficulty {
        if self.hard_mode {
            Difficulty::Hard
        } else {
            Difficulty::Normal
        }
    }

    /// Playfield bounds: full width, height minus the info row
    pub fn world_bounds(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height.saturating_sub(1) as f32)
    }

    /// Starting alien batch after the difficulty multiplier
    pub fn effective_starting_aliens(&self) -> i32 {
        (self.starting_aliens as f32 * self.difficulty().alien_count_scale()) as i32
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.width == 0 {
            return Err(SettingsError::Invalid("width must be at least 1".into()));
        }
        if self.height < 2 {
            return Err(SettingsError::Invalid(format!(
                "height must be at least 2, got {}",
                self.height
            )));
        }
        if self.width > MAX_WORLD_SIDE || self.height > MAX_WORLD_SIDE {
            return Err(SettingsError::Invalid(format!(
                "world is {}x{}, sides are limited to {MAX_WORLD_SIDE}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json).map_err(SettingsError::Parse)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        serde_json::to_string_pretty(self).map_err(SettingsError::Parse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_classic_game() {
        let settings = Settings::default();
        assert_eq!(settings.world_bounds(), Vec2::new(80.0, 28.0));
        assert_eq!(settings.effective_starting_aliens(), 20);
        assert!(settings.aliens_friendly_fire);
        assert_eq!(settings.difficulty(), Difficulty::Normal);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "hard_mode": true, "seed": 7 }"#).unwrap();
        assert!(settings.hard_mode);
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.width, 80);
        assert_eq!(settings.effective_starting_aliens(), 40);
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            max_iterations: Some(123),
            special_feature: true,
            ..Default::default()
        };
        assert_eq!(Settings::from_json(&settings.to_json().unwrap()).unwrap(), settings);
    }

    #[test]
    fn test_rejects_degenerate_world() {
        let err = Settings::from_json(r#"{ "height": 1 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_oversized_world() {
        let settings = Settings {
            width: 65_535,
            height: 65_535,
            ..Default::default()
        };
        assert!(matches!(settings.validate(), Err(SettingsError::Invalid(_))));

        let largest = Settings {
            width: MAX_WORLD_SIDE,
            height: MAX_WORLD_SIDE,
            ..Default::default()
        };
        assert!(largest.validate().is_ok());
        let state = crate::sim::GameState::new(&largest);
        assert!(state.is_running());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = Settings::load(Path::new("/nonexistent/raiders.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/raiders.json"));
    }

    #[test]
    fn test_hard_difficulty_table() {
        let hard = Difficulty::from_str("HARD").unwrap();
        assert_eq!(hard.max_alien_lasers(), 20);
        assert!(hard.strong_alien_lasers());
        assert!(!Difficulty::Normal.strong_alien_lasers());
        assert_eq!(Difficulty::from_str("nightmare"), None);
        assert_eq!(hard.as_str(), "Hard");
    }
}
