use crate::config::Color;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum CellState {
    #[default]
    Empty,
    Filled(Color),
}

impl CellState {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellState::Empty)
    }
}

/// Settled blocks, indexed `rows[y][x]` with `y = 0` at the top.
///
/// The dimensions are fixed at construction. Reads and writes take coordinates
/// the caller has already bounds-checked; out of range indices panic.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    rows: Vec<Vec<CellState>>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rows: vec![vec![CellState::Empty; width]; height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rows(&self) -> &[Vec<CellState>] {
        &self.rows
    }

    pub fn cell_at(&self, x: usize, y: usize) -> CellState {
        self.rows[y][x]
    }

    pub fn set_cell(&mut self, x: usize, y: usize, color: Color) {
        self.rows[y][x] = CellState::Filled(color);
    }

    pub fn is_row_full(&self, y: usize) -> bool {
        self.rows[y].iter().all(|cell| !cell.is_empty())
    }

    /// Drops row `y` and pushes a fresh empty row in at the top. Rows above `y`
    /// slide down by one; rows below it stay where they are.
    pub fn remove_row(&mut self, y: usize) {
        self.rows.remove(y);
        self.rows.insert(0, vec![CellState::Empty; self.width]);
    }

    pub fn clear(&mut self) {
        for row in &mut self.rows {
            row.fill(CellState::Empty);
        }
    }

    pub fn filled_count_in_row(&self, y: usize) -> usize {
        self.rows[y].iter().filter(|cell| !cell.is_empty()).count()
    }

    pub fn filled_count(&self) -> usize {
        self.rows.iter().flatten().filter(|cell| !cell.is_empty()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.filled_count() == 0
    }
}
