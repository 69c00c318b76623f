use std::time::Duration;

use log::{debug, info};

use crate::collision::{collides, freeze};
use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::grid::{CellState, Grid};
use crate::piece::{Piece, PieceProvider, RandomPieceProvider};
use crate::scoring::{clear_lines, Stats};

// ============================================================================
// Types
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameState {
    Idle,
    Running,
    Paused,
    GameOver,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Start,
    TogglePause,
    MoveLeft,
    MoveRight,
    MoveDown,
    Rotate,
    HardDrop,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GameEvent {
    Started,
    PieceMoved,
    PieceRotated,
    PieceLocked,
    LinesCleared(u32),
    LevelUp(u32),
    StatsChanged,
    Paused,
    Resumed,
    GameOver,
}

// ============================================================================
// Game
// ============================================================================

/// One game session: the board, the falling and preview pieces, the counters
/// and the state machine that ties them together.
///
/// Player commands only act while [`GameState::Running`]; anywhere else they
/// are silently ignored. Everything that changes is reported through
/// [`take_events`](Game::take_events).
pub struct Game {
    config: GameConfig,
    grid: Grid,
    current: Option<Piece>,
    next: Option<Piece>,
    stats: Stats,
    state: GameState,
    provider: Box<dyn PieceProvider>,
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let provider = RandomPieceProvider::new(&config);
        Ok(Self::build(config, Box::new(provider)))
    }

    pub fn seeded(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let provider = RandomPieceProvider::seeded(&config, seed);
        Ok(Self::build(config, Box::new(provider)))
    }

    pub fn with_provider(
        config: GameConfig,
        provider: Box<dyn PieceProvider>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, provider))
    }

    /// A running game over a prepared board with `current_piece` already in
    /// play. The preview piece comes from `provider`.
    pub fn with_grid(grid: Grid, current_piece: Piece, provider: Box<dyn PieceProvider>) -> Self {
        let config = GameConfig {
            width: grid.width(),
            height: grid.height(),
            ..GameConfig::default()
        };
        let mut game = Self::build(config, provider);
        game.grid = grid;
        game.current = Some(current_piece);
        game.next = Some(game.generate_piece());
        game.state = GameState::Running;
        game
    }

    /// Replaces the counters, e.g. to resume from a known score.
    pub fn with_stats(mut self, stats: Stats) -> Self {
        self.stats = stats;
        self
    }

    fn build(config: GameConfig, provider: Box<dyn PieceProvider>) -> Self {
        Self {
            grid: Grid::new(config.width, config.height),
            config,
            current: None,
            next: None,
            stats: Stats::default(),
            state: GameState::Idle,
            provider,
            events: Vec::new(),
        }
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn current_piece(&self) -> Option<&Piece> {
        self.current.as_ref()
    }

    pub fn next_piece(&self) -> Option<&Piece> {
        self.next.as_ref()
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == GameState::Running
    }

    pub fn is_paused(&self) -> bool {
        self.state == GameState::Paused
    }

    pub fn is_game_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    /// Delay before the next gravity step: `base / level`, never below 1ms.
    pub fn tick_interval(&self) -> Duration {
        let ms = self.config.base_tick_ms / u64::from(self.stats.level.max(1));
        Duration::from_millis(ms.max(1))
    }

    /// Settled cells with the current piece painted on top.
    pub fn render_grid(&self) -> Vec<Vec<CellState>> {
        let mut visual_grid = self.grid.rows().to_vec();

        if let Some(piece) = &self.current {
            let width = self.grid.width() as i32;
            let height = self.grid.height() as i32;
            for (x, y) in piece.cells() {
                if (0..width).contains(&x) && (0..height).contains(&y) {
                    visual_grid[y as usize][x as usize] = CellState::Filled(piece.color);
                }
            }
        }

        visual_grid
    }

    /// Takes and clears all pending events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    pub fn handle(&mut self, command: Command) {
        match command {
            Command::Start => self.start(),
            Command::TogglePause => self.toggle_pause(),
            Command::MoveLeft => {
                self.move_left();
            }
            Command::MoveRight => {
                self.move_right();
            }
            Command::MoveDown => self.move_down(),
            Command::Rotate => {
                self.rotate();
            }
            Command::HardDrop => self.hard_drop(),
        }
    }

    pub fn start(&mut self) {
        match self.state {
            GameState::Running | GameState::Paused => return,
            GameState::GameOver => self.reset(),
            GameState::Idle => {}
        }

        info!("game started");
        self.state = GameState::Running;
        self.events.push(GameEvent::Started);
        self.spawn_next_piece();
    }

    pub fn toggle_pause(&mut self) {
        match self.state {
            GameState::Running => {
                self.state = GameState::Paused;
                self.events.push(GameEvent::Paused);
            }
            GameState::Paused => {
                self.state = GameState::Running;
                self.events.push(GameEvent::Resumed);
            }
            GameState::Idle | GameState::GameOver => {}
        }
    }

    pub fn move_left(&mut self) -> bool {
        self.try_move(-1, 0)
    }

    pub fn move_right(&mut self) -> bool {
        self.try_move(1, 0)
    }

    /// Manual soft drop. Behaves exactly like one gravity tick.
    pub fn move_down(&mut self) {
        self.tick();
    }

    pub fn rotate(&mut self) -> bool {
        if self.state != GameState::Running {
            return false;
        }
        let Some(piece) = &self.current else {
            return false;
        };

        let rotated = piece.rotated();
        if collides(&rotated, &self.grid) {
            return false;
        }
        self.current = Some(rotated);
        self.events.push(GameEvent::PieceRotated);
        true
    }

    pub fn hard_drop(&mut self) {
        if self.state != GameState::Running {
            return;
        }
        let Some(piece) = &self.current else {
            return;
        };

        let mut dropped = piece.clone();
        loop {
            let below = dropped.moved(0, 1);
            if collides(&below, &self.grid) {
                break;
            }
            dropped = below;
        }
        self.current = Some(dropped);
        self.lock_and_spawn();
    }

    /// One gravity step: fall a row, or lock in place if the row below is
    /// taken.
    pub fn tick(&mut self) {
        if self.state != GameState::Running {
            return;
        }

        if !self.try_move(0, 1) {
            self.lock_and_spawn();
        }
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn try_move(&mut self, dx: i32, dy: i32) -> bool {
        if self.state != GameState::Running {
            return false;
        }
        let Some(piece) = &self.current else {
            return false;
        };

        let moved = piece.moved(dx, dy);
        if collides(&moved, &self.grid) {
            return false;
        }
        self.current = Some(moved);
        self.events.push(GameEvent::PieceMoved);
        true
    }

    fn lock_and_spawn(&mut self) {
        let Some(piece) = self.current.take() else {
            return;
        };

        freeze(&piece, &mut self.grid);
        debug!("locked {:?} at ({}, {})", piece.kind, piece.x, piece.y);
        self.events.push(GameEvent::PieceLocked);

        let cleared = clear_lines(&mut self.grid);
        if cleared > 0 {
            let leveled_up = self.stats.record(cleared);
            self.events.push(GameEvent::LinesCleared(cleared));
            self.events.push(GameEvent::StatsChanged);
            if leveled_up {
                info!("level up: {}", self.stats.level);
                self.events.push(GameEvent::LevelUp(self.stats.level));
            }
        }

        self.spawn_next_piece();
    }

    fn spawn_next_piece(&mut self) {
        let current = self.next.take().unwrap_or_else(|| self.generate_piece());
        self.next = Some(self.generate_piece());
        debug!("spawned {:?}", current.kind);

        let blocked = collides(&current, &self.grid);
        self.current = Some(current);

        if blocked {
            info!("game over: score {}, lines {}", self.stats.score, self.stats.lines);
            self.state = GameState::GameOver;
            self.events.push(GameEvent::GameOver);
        }
    }

    fn generate_piece(&mut self) -> Piece {
        let (kind, color) = self.provider.next_piece();
        Piece::new_at(kind, color, self.config.spawn_x() as i32, 0)
    }

    fn reset(&mut self) {
        self.grid.clear();
        self.stats.reset();
        self.current = None;
        self.events.push(GameEvent::StatsChanged);
    }
}
