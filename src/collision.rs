use log::warn;

use crate::grid::Grid;
use crate::piece::Piece;

/// True if any occupied cell of `piece` is off the board sideways, below the
/// floor, or on top of a settled block.
///
/// Cells above the board (`y < 0`) only get the sideways check, which lets a
/// freshly spawned or rotated piece hang over the top edge.
pub fn collides(piece: &Piece, grid: &Grid) -> bool {
    let width = grid.width() as i32;
    let height = grid.height() as i32;

    piece.cells().any(|(x, y)| {
        x < 0
            || x >= width
            || y >= height
            || (y >= 0 && !grid.cell_at(x as usize, y as usize).is_empty())
    })
}

/// Writes the piece's color into every cell it covers on the board.
///
/// Cells still above the top edge are discarded. Returns how many were lost so
/// the caller can tell a clean lock from a partial one.
pub fn freeze(piece: &Piece, grid: &mut Grid) -> usize {
    let mut dropped = 0;

    for (x, y) in piece.cells() {
        if y < 0 {
            dropped += 1;
            continue;
        }
        grid.set_cell(x as usize, y as usize, piece.color);
    }

    if dropped > 0 {
        warn!(
            "froze {:?} at ({}, {}) with {} cell(s) above the board",
            piece.kind, piece.x, piece.y, dropped
        );
    }

    dropped
}
