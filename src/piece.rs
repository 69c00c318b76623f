use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{Color, GameConfig, PALETTE};

// ============================================================================
// Shapes
// ============================================================================

/// Rectangular occupancy bitmap, indexed `cells[y][x]`.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Shape {
    cells: Vec<Vec<bool>>,
}

impl Shape {
    pub fn from_bits(bits: &[&[u8]]) -> Self {
        Self {
            cells: bits
                .iter()
                .map(|row| row.iter().map(|&bit| bit != 0).collect())
                .collect(),
        }
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn cols(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    pub fn is_filled(&self, x: usize, y: usize) -> bool {
        self.cells[y][x]
    }

    /// Local `(x, y)` of every occupied cell, row by row.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, filled)| **filled)
                .map(move |(x, _)| (x, y))
        })
    }

    /// Clockwise quarter turn: `rotated[x][rows - 1 - y] = cells[y][x]`.
    ///
    /// The result is `cols x rows`. The turn pivots on the bitmap corner rather
    /// than the piece center, so pieces shift sideways as they rotate.
    pub fn rotate_cw(&self) -> Shape {
        let rows = self.rows();
        let cols = self.cols();
        let mut rotated = vec![vec![false; rows]; cols];

        for y in 0..rows {
            for x in 0..cols {
                rotated[x][rows - 1 - y] = self.cells[y][x];
            }
        }

        Shape { cells: rotated }
    }
}

const SHAPE_I: &[&[u8]] = &[&[1, 1, 1, 1]];
const SHAPE_O: &[&[u8]] = &[&[1, 1], &[1, 1]];
const SHAPE_T: &[&[u8]] = &[&[1, 1, 1], &[0, 1, 0]];
const SHAPE_L: &[&[u8]] = &[&[1, 1, 1], &[1, 0, 0]];
const SHAPE_J: &[&[u8]] = &[&[1, 1, 1], &[0, 0, 1]];
const SHAPE_S: &[&[u8]] = &[&[1, 1, 0], &[0, 1, 1]];
const SHAPE_Z: &[&[u8]] = &[&[0, 1, 1], &[1, 1, 0]];

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum TetrominoType {
    I,
    O,
    T,
    L,
    J,
    S,
    Z,
}

impl TetrominoType {
    pub const ALL: [TetrominoType; 7] = [
        TetrominoType::I,
        TetrominoType::O,
        TetrominoType::T,
        TetrominoType::L,
        TetrominoType::J,
        TetrominoType::S,
        TetrominoType::Z,
    ];

    /// Spawn orientation of this tetromino.
    pub fn shape(&self) -> Shape {
        let bits = match self {
            TetrominoType::I => SHAPE_I,
            TetrominoType::O => SHAPE_O,
            TetrominoType::T => SHAPE_T,
            TetrominoType::L => SHAPE_L,
            TetrominoType::J => SHAPE_J,
            TetrominoType::S => SHAPE_S,
            TetrominoType::Z => SHAPE_Z,
        };
        Shape::from_bits(bits)
    }

    /// Fixed color used by deterministic providers.
    pub fn default_color(&self) -> Color {
        PALETTE[*self as usize]
    }
}

// ============================================================================
// Random Selection
// ============================================================================

/// Uniform pick from `kinds`, independent of every earlier pick.
///
/// Panics if `kinds` is empty; [`GameConfig::validate`] rules that out.
pub fn random_shape<R: Rng + ?Sized>(rng: &mut R, kinds: &[TetrominoType]) -> TetrominoType {
    kinds[rng.gen_range(0..kinds.len())]
}

/// Uniform pick from `palette`, independent of the shape pick.
pub fn random_color<R: Rng + ?Sized>(rng: &mut R, palette: &[Color]) -> Color {
    palette[rng.gen_range(0..palette.len())]
}

// ============================================================================
// Placed Pieces
// ============================================================================

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Piece {
    pub kind: TetrominoType,
    pub shape: Shape,
    pub color: Color,
    pub x: i32,
    pub y: i32,
}

impl Piece {
    pub fn new_at(kind: TetrominoType, color: Color, x: i32, y: i32) -> Self {
        Self {
            kind,
            shape: kind.shape(),
            color,
            x,
            y,
        }
    }

    /// Board coordinates of every occupied cell. `y` may be negative while the
    /// piece pokes out above the board.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .occupied()
            .map(move |(lx, ly)| (self.x + lx as i32, self.y + ly as i32))
    }

    pub fn moved(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self.clone()
        }
    }

    pub fn rotated(&self) -> Self {
        Self {
            shape: self.shape.rotate_cw(),
            ..self.clone()
        }
    }
}

// ============================================================================
// Piece Provider Trait
// ============================================================================

/// Source of (shape, color) pairs for newly generated pieces.
pub trait PieceProvider {
    fn next_piece(&mut self) -> (TetrominoType, Color);
}

/// Independent uniform draws of shape and color. No bag, no history.
pub struct RandomPieceProvider {
    rng: StdRng,
    shapes: Vec<TetrominoType>,
    palette: Vec<Color>,
}

impl RandomPieceProvider {
    pub fn new(config: &GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn seeded(config: &GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &GameConfig, rng: StdRng) -> Self {
        Self {
            rng,
            shapes: config.shapes.clone(),
            palette: config.palette.clone(),
        }
    }
}

impl PieceProvider for RandomPieceProvider {
    fn next_piece(&mut self) -> (TetrominoType, Color) {
        let kind = random_shape(&mut self.rng, &self.shapes);
        let color = random_color(&mut self.rng, &self.palette);
        (kind, color)
    }
}

/// Cycles through a fixed list; each piece gets its type's default color.
pub struct SequencePieceProvider {
    pieces: Vec<TetrominoType>,
    index: usize,
}

impl SequencePieceProvider {
    pub fn new(pieces: Vec<TetrominoType>) -> Self {
        assert!(!pieces.is_empty(), "piece sequence must not be empty");
        Self { pieces, index: 0 }
    }
}

impl PieceProvider for SequencePieceProvider {
    fn next_piece(&mut self) -> (TetrominoType, Color) {
        let kind = self.pieces[self.index % self.pieces.len()];
        self.index += 1;
        (kind, kind.default_color())
    }
}
