use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use crate::game::{EngineStatus, GameState, Position, SnakeEngine};
use crate::metrics::GameMetrics;

/// What occupies a single board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Head,
    Body,
    Food,
    Empty,
}

impl Cell {
    pub fn at(state: &GameState, pos: Position) -> Cell {
        if pos == state.snake.head() {
            Cell::Head
        } else if state.snake.occupies(pos) {
            Cell::Body
        } else if pos == state.food {
            Cell::Food
        } else {
            Cell::Empty
        }
    }

    fn span(self) -> Span<'static> {
        match self {
            Cell::Head => Span::styled(
                "■ ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Cell::Body => Span::styled("□ ", Style::default().fg(Color::Green)),
            Cell::Food => Span::styled(
                "O ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Cell::Empty => Span::styled(". ", Style::default().fg(Color::DarkGray)),
        }
    }
}

/// Board as rows of cells, top row first
pub fn board_cells(state: &GameState, grid_size: usize) -> Vec<Vec<Cell>> {
    (0..grid_size)
        .map(|y| {
            (0..grid_size)
                .map(|x| Cell::at(state, Position::new(x as i32, y as i32)))
                .collect()
        })
        .collect()
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, engine: &SnakeEngine, metrics: &GameMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(engine, metrics);
        frame.render_widget(stats, chunks[0]);

        // Center the game grid horizontally
        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        match engine.status() {
            EngineStatus::GameOver => {
                let game_over = self.render_game_over(engine.state(), metrics);
                frame.render_widget(game_over, game_area);
            }
            status => {
                let grid = self.render_grid(engine);
                frame.render_widget(grid, game_area);

                if status == EngineStatus::Paused {
                    let banner_area = centered_row(game_area);
                    frame.render_widget(Clear, banner_area);
                    frame.render_widget(self.render_paused(), banner_area);
                }
            }
        }

        let controls = self.render_controls();
        frame.render_widget(controls, chunks[2]);
    }

    fn render_grid(&self, engine: &SnakeEngine) -> Paragraph<'static> {
        let lines: Vec<Line> = board_cells(engine.state(), engine.config().grid_size)
            .into_iter()
            .map(|row| Line::from(row.into_iter().map(Cell::span).collect::<Vec<_>>()))
            .collect();

        let title = format!(" Snake · {} ", engine.mode());

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, engine: &SnakeEngine, metrics: &GameMetrics) -> Paragraph<'static> {
        let best = metrics
            .best_score(engine.mode())
            .map(|score| score.to_string())
            .unwrap_or_else(|| "-".to_string());

        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                engine.state().score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Best: ", Style::default().fg(Color::Yellow)),
            Span::styled(best, Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Speed: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("{}ms", engine.speed_ms()),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_paused(&self) -> Paragraph<'static> {
        Paragraph::new(Line::from(vec![Span::styled(
            "PAUSED - press Space to resume",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )]))
        .alignment(Alignment::Center)
    }

    fn render_game_over(&self, state: &GameState, metrics: &GameMetrics) -> Paragraph<'static> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Games played: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    metrics.games_played.to_string(),
                    Style::default().fg(Color::White),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self) -> Paragraph<'static> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("Space", Style::default().fg(Color::Cyan)),
            Span::raw(" to pause | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" new game | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// One-line strip through the vertical middle of `area`
fn centered_row(area: Rect) -> Rect {
    Rect {
        x: area.x,
        y: area.y + area.height / 2,
        width: area.width,
        height: area.height.min(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameConfig, GameMode, Snake};
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_board_cells() {
        let snake = Snake::from_segments(vec![Position::new(2, 1), Position::new(1, 1)]).unwrap();
        let state = GameState::new(snake, Position::new(0, 3));

        let cells = board_cells(&state, 4);

        assert_eq!(cells.len(), 4);
        assert!(cells.iter().all(|row| row.len() == 4));
        assert_eq!(cells[1][2], Cell::Head);
        assert_eq!(cells[1][1], Cell::Body);
        assert_eq!(cells[3][0], Cell::Food);
        assert_eq!(cells[0][0], Cell::Empty);
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_render_running_and_paused() {
        let mut engine = SnakeEngine::new(GameConfig::new(GameMode::Walls).with_seed(2));
        let metrics = GameMetrics::new();
        let renderer = Renderer::new();
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();

        terminal
            .draw(|frame| renderer.render(frame, &engine, &metrics))
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Score: 0"));
        assert!(text.contains("150ms"));
        assert!(!text.contains("PAUSED"));

        engine.toggle_pause();
        terminal
            .draw(|frame| renderer.render(frame, &engine, &metrics))
            .unwrap();
        assert!(buffer_text(&terminal).contains("PAUSED"));
    }

    #[test]
    fn test_render_game_over() {
        let snake = Snake::new(Position::new(19, 4));
        let mut engine = SnakeEngine::from_state(
            GameConfig::new(GameMode::Walls).with_seed(2),
            GameState::new(snake, Position::new(0, 0)),
        );
        engine.tick();
        let renderer = Renderer::new();
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();

        terminal
            .draw(|frame| renderer.render(frame, &engine, &GameMetrics::new()))
            .unwrap();

        assert!(buffer_text(&terminal).contains("GAME OVER"));
    }
}
