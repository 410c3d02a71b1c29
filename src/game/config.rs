use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::action::GameMode;

/// Cells per side of the square board
pub const GRID_SIZE: usize = 20;
/// Tick period at the start of every game, in milliseconds
pub const INITIAL_SPEED_MS: u64 = 150;
/// Points awarded per food eaten
pub const SCORE_PER_FOOD: u32 = 10;
/// Tick period reduction applied at every speed step
pub const SPEED_STEP_MS: u64 = 10;
/// A speed step happens whenever the score reaches a multiple of this
pub const SPEED_STEP_SCORE: u32 = 50;
/// Fastest allowed tick period
pub const MIN_SPEED_MS: u64 = 50;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Boundary policy
    pub mode: GameMode,
    /// Width and height of the board
    pub grid_size: usize,

    // Pacing
    pub initial_speed_ms: u64,
    pub speed_step_ms: u64,
    pub speed_step_score: u32,
    pub min_speed_ms: u64,

    /// Points per food
    pub score_per_food: u32,

    /// Seed for food placement; a fresh entropy seed is used when absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::PassThrough,
            grid_size: GRID_SIZE,
            initial_speed_ms: INITIAL_SPEED_MS,
            speed_step_ms: SPEED_STEP_MS,
            speed_step_score: SPEED_STEP_SCORE,
            min_speed_ms: MIN_SPEED_MS,
            score_per_food: SCORE_PER_FOOD,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a default configuration for the given mode
    pub fn new(mode: GameMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Same configuration with a fixed food seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Load a configuration from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: GameConfig =
            serde_json::from_str(&json).context("Failed to parse game config")?;
        anyhow::ensure!(config.grid_size > 0, "grid_size must be positive");
        anyhow::ensure!(
            config.min_speed_ms > 0 && config.min_speed_ms <= config.initial_speed_ms,
            "min_speed_ms must be in 1..=initial_speed_ms"
        );
        Ok(config)
    }

    /// Total number of cells on the board
    pub fn cell_count(&self) -> usize {
        self.grid_size * self.grid_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.mode, GameMode::PassThrough);
        assert_eq!(config.grid_size, 20);
        assert_eq!(config.initial_speed_ms, 150);
        assert_eq!(config.min_speed_ms, 50);
        assert_eq!(config.score_per_food, 10);
        assert_eq!(config.cell_count(), 400);
    }

    #[test]
    fn test_walls_config_with_seed() {
        let config = GameConfig::new(GameMode::Walls).with_seed(7);
        assert_eq!(config.mode, GameMode::Walls);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_load_partial_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "mode": "walls", "seed": 42 }}"#).unwrap();

        let config = GameConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.mode, GameMode::Walls);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.grid_size, GRID_SIZE);
    }

    #[test]
    fn test_load_rejects_unknown_mode() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "mode": "portal" }}"#).unwrap();

        assert!(GameConfig::from_json_file(file.path()).is_err());
    }

    #[test]
    fn test_load_rejects_inverted_speeds() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "initial_speed_ms": 40, "min_speed_ms": 50 }}"#).unwrap();

        assert!(GameConfig::from_json_file(file.path()).is_err());
    }
}
