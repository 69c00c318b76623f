use crate::error::ConfigError;
use crate::piece::TetrominoType;

// ============================================================================
// Defaults
// ============================================================================

pub const GRID_WIDTH: usize = 10;
pub const GRID_HEIGHT: usize = 20;

// Timing (in milliseconds)
pub const BASE_TICK_MS: u64 = 1000;

// Scoring
pub const SCORE_PER_LINE: u32 = 100;
pub const LINES_PER_LEVEL: u32 = 10;

/// Opaque color token stored in settled cells.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

pub const PALETTE: [Color; 7] = [
    Color::rgb(0xFF, 0x0D, 0x72),
    Color::rgb(0x0D, 0xC2, 0xFF),
    Color::rgb(0x0D, 0xFF, 0x72),
    Color::rgb(0xF5, 0x38, 0xFF),
    Color::rgb(0xFF, 0x8E, 0x0D),
    Color::rgb(0xFF, 0xE1, 0x38),
    Color::rgb(0x38, 0x77, 0xFF),
];

// ============================================================================
// Game Configuration
// ============================================================================

/// Static parameters of one game session.
///
/// `Default` is the standard 10x20 board with all seven tetrominoes and the
/// seven-color palette. Anything built by hand goes through [`validate`].
///
/// [`validate`]: GameConfig::validate
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    pub shapes: Vec<TetrominoType>,
    pub palette: Vec<Color>,
    pub base_tick_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
            shapes: TetrominoType::ALL.to_vec(),
            palette: PALETTE.to_vec(),
            base_tick_ms: BASE_TICK_MS,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyBoard {
                width: self.width,
                height: self.height,
            });
        }
        if self.shapes.is_empty() {
            return Err(ConfigError::NoShapes);
        }
        if self.palette.is_empty() {
            return Err(ConfigError::NoColors);
        }
        if self.base_tick_ms == 0 {
            return Err(ConfigError::ZeroTickPeriod);
        }

        // Every shape must fit at the spawn column in both orientations.
        let spawn_x = self.spawn_x();
        for kind in &self.shapes {
            let shape = kind.shape();
            let longest = shape.rows().max(shape.cols());
            if spawn_x + longest > self.width || longest > self.height {
                return Err(ConfigError::BoardTooSmall {
                    width: self.width,
                    height: self.height,
                    cols: shape.cols(),
                    rows: shape.rows(),
                });
            }
        }
        Ok(())
    }

    /// Column where new pieces appear.
    pub fn spawn_x(&self) -> usize {
        (self.width / 2).saturating_sub(1)
    }
}
