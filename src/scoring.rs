use crate::config::{LINES_PER_LEVEL, SCORE_PER_LINE};
use crate::grid::Grid;

/// Score, level and line counters for one game.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Stats {
    pub score: u32,
    pub level: u32,
    pub lines: u32,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            score: 0,
            level: 1,
            lines: 0,
        }
    }
}

impl Stats {
    /// Credits `cleared` lines at the current level, then recomputes the level
    /// from the new line total. Returns true if the level went up.
    pub fn record(&mut self, cleared: u32) -> bool {
        if cleared == 0 {
            return false;
        }

        let previous = self.level;
        self.score += cleared * SCORE_PER_LINE * self.level;
        self.lines += cleared;
        self.level = self.lines / LINES_PER_LEVEL + 1;
        self.level > previous
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Removes every full row, compacting the board downwards, and returns how
/// many rows went.
///
/// Walks from the floor up. After a removal the row that slid into `y` has not
/// been checked yet, so `y` is examined again before moving on.
pub fn clear_lines(grid: &mut Grid) -> u32 {
    let mut cleared = 0;
    let mut y = grid.height();

    while y > 0 {
        if grid.is_row_full(y - 1) {
            grid.remove_row(y - 1);
            cleared += 1;
            // Don't decrement y - the row above has shifted into this position
        } else {
            y -= 1;
        }
    }

    cleared
}
