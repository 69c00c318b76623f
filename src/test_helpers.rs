use crate::config::{Color, GRID_HEIGHT, GRID_WIDTH};
use crate::grid::Grid;

pub const FILL: Color = Color::rgb(0x80, 0x80, 0x80);

pub fn empty_grid() -> Grid {
    Grid::new(GRID_WIDTH, GRID_HEIGHT)
}

pub fn fill_row(grid: &mut Grid, y: usize) {
    for x in 0..grid.width() {
        grid.set_cell(x, y, FILL);
    }
}

pub fn fill_row_with_gap(grid: &mut Grid, y: usize, gap_x: usize) {
    for x in 0..grid.width() {
        if x != gap_x {
            grid.set_cell(x, y, FILL);
        }
    }
}
