use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::game::GameMode;

/// Session scoreboard and game clock
///
/// Lives as long as the session that owns it; nothing is written to disk.
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub games_played: u32,
    pub last_score: Option<u32>,
    best_scores: HashMap<GameMode, u32>,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            games_played: 0,
            last_score: None,
            best_scores: HashMap::new(),
        }
    }

    /// Refresh the clock; frozen while `running` is false
    pub fn update(&mut self, running: bool) {
        if running {
            self.elapsed_time = self.start_time.elapsed();
        } else {
            // Shift the origin so the clock resumes where it stopped
            let now = Instant::now();
            self.start_time = now.checked_sub(self.elapsed_time).unwrap_or(now);
        }
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
    }

    /// Record a finished game
    ///
    /// Every game counts as played; only positive scores compete for best.
    pub fn on_game_over(&mut self, mode: GameMode, final_score: u32) {
        self.games_played += 1;
        self.last_score = Some(final_score);

        if final_score == 0 {
            return;
        }

        let best = self.best_scores.entry(mode).or_insert(0);
        if final_score > *best {
            *best = final_score;
        }
    }

    pub fn best_score(&self, mode: GameMode) -> Option<u32> {
        self.best_scores.get(&mode).copied()
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_formatting() {
        let mut metrics = GameMetrics::new();
        metrics.elapsed_time = Duration::from_secs(125);
        assert_eq!(metrics.format_time(), "02:05");

        metrics.elapsed_time = Duration::from_secs(0);
        assert_eq!(metrics.format_time(), "00:00");

        metrics.elapsed_time = Duration::from_secs(3661);
        assert_eq!(metrics.format_time(), "61:01");
    }

    #[test]
    fn test_best_score_per_mode() {
        let mut metrics = GameMetrics::new();

        metrics.on_game_over(GameMode::Walls, 30);
        assert_eq!(metrics.best_score(GameMode::Walls), Some(30));
        assert_eq!(metrics.best_score(GameMode::PassThrough), None);

        metrics.on_game_over(GameMode::Walls, 20);
        assert_eq!(metrics.best_score(GameMode::Walls), Some(30)); // Should not decrease

        metrics.on_game_over(GameMode::PassThrough, 50);
        assert_eq!(metrics.best_score(GameMode::PassThrough), Some(50));
        assert_eq!(metrics.games_played, 3);
        assert_eq!(metrics.last_score, Some(50));
    }

    #[test]
    fn test_zero_score_is_counted_but_not_ranked() {
        let mut metrics = GameMetrics::new();

        metrics.on_game_over(GameMode::Walls, 0);

        assert_eq!(metrics.games_played, 1);
        assert_eq!(metrics.last_score, Some(0));
        assert_eq!(metrics.best_score(GameMode::Walls), None);
    }

    #[test]
    fn test_game_start_resets_time() {
        let mut metrics = GameMetrics::new();
        std::thread::sleep(Duration::from_millis(50));
        metrics.update(true);

        assert!(metrics.elapsed_time.as_millis() >= 50);

        metrics.on_game_start();
        metrics.update(true);
        assert!(metrics.elapsed_time.as_millis() < 50);
    }

    #[test]
    fn test_clock_frozen_when_not_running() {
        let mut metrics = GameMetrics::new();
        metrics.elapsed_time = Duration::from_secs(10);

        metrics.update(false);
        std::thread::sleep(Duration::from_millis(20));
        metrics.update(false);

        assert_eq!(metrics.elapsed_time, Duration::from_secs(10));
    }
}
