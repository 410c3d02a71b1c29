//! Tick Snake - a fixed-tick Snake game for the terminal
//!
//! This library provides:
//! - Core game engine (game module), free of I/O
//! - Keyboard mapping (input module)
//! - TUI rendering (render module)
//! - Session scoreboard (metrics module)
//! - The interactive loop and its re-armable ticker (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
