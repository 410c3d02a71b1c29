use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stderr, Stderr};
use std::time::Duration;
use tokio::time::interval;
use tracing::info;

use super::ticker::Ticker;
use crate::game::{EngineStatus, GameConfig, SnakeEngine};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Interactive single-player session in the terminal
pub struct HumanMode {
    engine: SnakeEngine,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Self {
        Self {
            engine: SnakeEngine::new(config),
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        info!(mode = %self.engine.mode(), "game started");

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_timer = Ticker::new(self.current_period());

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        if let Some(period) = self.handle_event(event) {
                            tick_timer.rearm(period);
                        }
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    if let Some(period) = self.update_game() {
                        tick_timer.rearm(period);
                    }
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update(self.engine.status() == EngineStatus::Running);
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.engine, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Returns a new tick period when the ticker has to be re-armed
    fn handle_event(&mut self, event: Event) -> Option<Duration> {
        let Event::Key(key) = event else {
            return None;
        };

        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return None;
        }

        let action = self.input_handler.handle_key_event(key);
        self.apply_key_action(action)
    }

    fn apply_key_action(&mut self, action: KeyAction) -> Option<Duration> {
        let game_over = self.engine.status() == EngineStatus::GameOver;

        match action {
            // Steering and pausing are ignored once the game is over
            KeyAction::Turn(direction) if !game_over => {
                self.engine.change_direction(direction);
            }
            KeyAction::TogglePause if !game_over => {
                let paused = self.engine.toggle_pause();
                info!(paused, "pause toggled");
            }
            KeyAction::Restart => {
                return Some(self.reset_game());
            }
            KeyAction::Quit => {
                self.should_quit = true;
            }
            _ => {}
        }

        None
    }

    fn update_game(&mut self) -> Option<Duration> {
        let outcome = self.engine.tick();

        if let Some((final_score, cause)) = outcome.game_over() {
            info!(final_score, ?cause, mode = %self.engine.mode(), "game over");
            self.metrics.on_game_over(self.engine.mode(), final_score);
        }

        outcome.speed_changed().map(|speed_ms| {
            info!(speed_ms, "speed increased");
            Duration::from_millis(speed_ms)
        })
    }

    fn reset_game(&mut self) -> Duration {
        self.engine.reset_game();
        self.metrics.on_game_start();
        info!(mode = %self.engine.mode(), "game restarted");
        self.current_period()
    }

    fn current_period(&self) -> Duration {
        Duration::from_millis(self.engine.speed_ms())
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, GameMode, GameState, Position, Snake};

    fn mode_with(config: GameConfig, state: GameState) -> HumanMode {
        let mut mode = HumanMode::new(config.clone());
        mode.engine = SnakeEngine::from_state(config, state);
        mode
    }

    #[test]
    fn test_game_initialization() {
        let mode = HumanMode::new(GameConfig::default().with_seed(1));
        assert_eq!(mode.engine.status(), EngineStatus::Running);
        assert_eq!(mode.engine.state().score, 0);
        assert_eq!(mode.current_period(), Duration::from_millis(150));
    }

    #[test]
    fn test_game_over_is_recorded() {
        let config = GameConfig::new(GameMode::Walls).with_seed(1);
        let mut state = GameState::new(Snake::new(Position::new(19, 5)), Position::new(0, 0));
        state.score = 30;
        let mut mode = mode_with(config, state);

        assert_eq!(mode.update_game(), None);

        assert_eq!(mode.metrics.games_played, 1);
        assert_eq!(mode.metrics.best_score(GameMode::Walls), Some(30));

        // Further ticks do not count the same game again
        mode.update_game();
        assert_eq!(mode.metrics.games_played, 1);
    }

    #[test]
    fn test_speed_change_requests_rearm() {
        let config = GameConfig::new(GameMode::PassThrough).with_seed(1);
        let mut state = GameState::new(Snake::new(Position::new(4, 4)), Position::new(5, 4));
        state.score = 40;
        let mut mode = mode_with(config, state);

        assert_eq!(mode.update_game(), Some(Duration::from_millis(140)));
    }

    #[test]
    fn test_restart_resets_and_rearms() {
        let config = GameConfig::new(GameMode::PassThrough).with_seed(1);
        let mut state = GameState::new(Snake::new(Position::new(4, 4)), Position::new(5, 4));
        state.score = 40;
        let mut mode = mode_with(config, state);
        mode.update_game();

        let period = mode.apply_key_action(KeyAction::Restart);

        assert_eq!(period, Some(Duration::from_millis(150)));
        assert_eq!(mode.engine.state().score, 0);
        assert_eq!(mode.engine.state().snake.body, vec![Position::new(10, 10)]);
    }

    #[test]
    fn test_input_ignored_after_game_over() {
        let config = GameConfig::new(GameMode::Walls).with_seed(1);
        let state = GameState::new(Snake::new(Position::new(19, 5)), Position::new(0, 0));
        let mut mode = mode_with(config, state);
        mode.update_game();

        mode.apply_key_action(KeyAction::Turn(Direction::Up));
        mode.apply_key_action(KeyAction::TogglePause);

        assert_eq!(mode.engine.pending_direction(), Direction::Right);
        assert!(!mode.engine.state().is_paused);
    }

    #[test]
    fn test_pause_and_quit_keys() {
        let mut mode = HumanMode::new(GameConfig::default().with_seed(1));

        mode.apply_key_action(KeyAction::TogglePause);
        assert_eq!(mode.engine.status(), EngineStatus::Paused);

        mode.apply_key_action(KeyAction::Turn(Direction::Down));
        assert_eq!(mode.engine.pending_direction(), Direction::Down);

        mode.apply_key_action(KeyAction::Quit);
        assert!(mode.should_quit);
    }
}
