//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The engine is advanced by an external ticker and reports what happened through
//! returned events instead of callbacks.

pub mod action;
pub mod config;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use action::{Direction, GameMode, ParseDirectionError, ParseModeError};
pub use config::{
    GameConfig, GRID_SIZE, INITIAL_SPEED_MS, MIN_SPEED_MS, SCORE_PER_FOOD, SPEED_STEP_MS,
    SPEED_STEP_SCORE,
};
pub use engine::{EngineStatus, GameEvent, SnakeEngine, TickOutcome};
pub use state::{GameOverCause, GameState, Position, Snake};
