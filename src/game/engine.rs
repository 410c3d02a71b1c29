use super::{
    action::{Direction, GameMode},
    config::GameConfig,
    state::{GameOverCause, GameState, Position, Snake},
};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use tracing::debug;

/// Random draws tried before falling back to scanning the board for free cells
const MAX_SPAWN_ATTEMPTS: usize = 64;

/// Something that happened during a tick, for the caller to act on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Head landed on the food; `score` is the new total
    AteFood { score: u32 },
    /// Tick period changed; the ticker must be re-armed
    SpeedChanged { speed_ms: u64 },
    /// Game reached its terminal state; emitted once per game
    GameOver { final_score: u32, cause: GameOverCause },
}

/// Result of a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub events: Vec<GameEvent>,
}

impl TickOutcome {
    pub fn ate_food(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, GameEvent::AteFood { .. }))
    }

    pub fn speed_changed(&self) -> Option<u64> {
        self.events.iter().find_map(|e| match e {
            GameEvent::SpeedChanged { speed_ms } => Some(*speed_ms),
            _ => None,
        })
    }

    pub fn game_over(&self) -> Option<(u32, GameOverCause)> {
        self.events.iter().find_map(|e| match e {
            GameEvent::GameOver { final_score, cause } => Some((*final_score, *cause)),
            _ => None,
        })
    }
}

/// Coarse engine state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    Running,
    Paused,
    GameOver,
}

/// The game engine that handles all game logic
///
/// One engine per game session. It owns the state outright and has no timers
/// of its own: a caller-driven ticker calls [`SnakeEngine::tick`] every
/// [`SnakeEngine::speed_ms`] milliseconds.
pub struct SnakeEngine {
    config: GameConfig,
    state: GameState,
    /// Latest accepted direction request, applied on the next tick
    pending_direction: Direction,
    /// Direction applied on the last tick; reversal requests are checked against it
    last_direction: Direction,
    speed_ms: u64,
    rng: StdRng,
}

impl SnakeEngine {
    /// Create an engine with a fresh game in `config.mode`
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut engine = Self {
            speed_ms: config.initial_speed_ms,
            state: GameState::new(Snake::new(Position::new(0, 0)), Position::new(0, 0)),
            pending_direction: Direction::Right,
            last_direction: Direction::Right,
            config,
            rng,
        };
        engine.reset_game();
        engine
    }

    /// Build an engine around an existing state
    ///
    /// The state's direction is taken as both the last committed and the
    /// pending direction; speed starts at the configured initial speed.
    pub fn from_state(config: GameConfig, state: GameState) -> Self {
        let mut engine = Self::new(config);
        engine.pending_direction = state.direction;
        engine.last_direction = state.direction;
        engine.state = state;
        engine
    }

    /// Reset the game to its initial state, keeping the mode
    pub fn reset_game(&mut self) -> &GameState {
        let center = (self.config.grid_size / 2) as i32;
        let snake = Snake::new(Position::new(center, center));
        // A board with a single cell has nowhere to put food
        let food = spawn_food(&mut self.rng, self.config.grid_size, &snake)
            .unwrap_or_else(|| snake.head());

        self.state = GameState::new(snake, food);
        self.pending_direction = Direction::Right;
        self.last_direction = Direction::Right;
        self.speed_ms = self.config.initial_speed_ms;

        &self.state
    }

    /// Queue a direction for the next tick
    ///
    /// A reversal of the last committed direction is dropped silently.
    /// Anything else overwrites whatever was pending.
    pub fn change_direction(&mut self, requested: Direction) {
        if !requested.is_opposite(self.last_direction) {
            self.pending_direction = requested;
        }
    }

    /// Flip the paused flag and return the new value
    pub fn toggle_pause(&mut self) -> bool {
        self.state.is_paused = !self.state.is_paused;
        self.state.is_paused
    }

    /// Advance the simulation by one cell
    ///
    /// Does nothing while paused or after game over.
    pub fn tick(&mut self) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        if self.state.is_game_over || self.state.is_paused {
            return outcome;
        }

        let direction = self.pending_direction;
        self.last_direction = direction;

        let grid_size = self.config.grid_size;
        let mut head = self.state.snake.head().moved_in_direction(direction);

        match self.config.mode {
            GameMode::PassThrough => head = head.wrapped(grid_size),
            GameMode::Walls => {
                if !head.is_within(grid_size) {
                    self.end_game(GameOverCause::Wall, &mut outcome);
                    return outcome;
                }
            }
        }

        // Checked against the pre-move body, tail included
        if self.state.snake.occupies(head) {
            self.end_game(GameOverCause::SelfCollision, &mut outcome);
            return outcome;
        }

        self.state.snake.push_head(head);
        self.state.direction = direction;
        self.state.steps += 1;

        if head != self.state.food {
            self.state.snake.pop_tail();
            return outcome;
        }

        self.state.score += self.config.score_per_food;
        outcome.events.push(GameEvent::AteFood {
            score: self.state.score,
        });

        match spawn_food(&mut self.rng, grid_size, &self.state.snake) {
            Some(food) => self.state.food = food,
            None => {
                self.end_game(GameOverCause::BoardFilled, &mut outcome);
                return outcome;
            }
        }

        let step_score = self.config.speed_step_score;
        if step_score > 0 && self.state.score % step_score == 0 {
            let next = self
                .speed_ms
                .saturating_sub(self.config.speed_step_ms)
                .max(self.config.min_speed_ms);
            if next != self.speed_ms {
                debug!(from = self.speed_ms, to = next, "speed step");
                self.speed_ms = next;
                outcome.events.push(GameEvent::SpeedChanged { speed_ms: next });
            }
        }

        outcome
    }

    fn end_game(&mut self, cause: GameOverCause, outcome: &mut TickOutcome) {
        self.state.is_game_over = true;
        debug!(score = self.state.score, ?cause, "game over");
        outcome.events.push(GameEvent::GameOver {
            final_score: self.state.score,
            cause,
        });
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn mode(&self) -> GameMode {
        self.config.mode
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Current tick period in milliseconds
    pub fn speed_ms(&self) -> u64 {
        self.speed_ms
    }

    pub fn pending_direction(&self) -> Direction {
        self.pending_direction
    }

    pub fn status(&self) -> EngineStatus {
        if self.state.is_game_over {
            EngineStatus::GameOver
        } else if self.state.is_paused {
            EngineStatus::Paused
        } else {
            EngineStatus::Running
        }
    }
}

/// Pick a uniformly random cell not covered by `snake`
///
/// Tries rejection sampling first, then picks among the free cells of a full
/// scan. Returns `None` only when the snake covers the whole board.
fn spawn_food(rng: &mut StdRng, grid_size: usize, snake: &Snake) -> Option<Position> {
    if grid_size == 0 {
        return None;
    }

    for _ in 0..MAX_SPAWN_ATTEMPTS {
        let x = rng.gen_range(0..grid_size) as i32;
        let y = rng.gen_range(0..grid_size) as i32;
        let pos = Position::new(x, y);

        if !snake.occupies(pos) {
            return Some(pos);
        }
    }

    let free: Vec<Position> = (0..grid_size as i32)
        .flat_map(|y| (0..grid_size as i32).map(move |x| Position::new(x, y)))
        .filter(|pos| !snake.occupies(*pos))
        .collect();

    free.choose(rng).copied()
}
