use thiserror::Error;

/// Rejected [`GameConfig`](crate::config::GameConfig) values.
///
/// The simulation itself never fails: illegal moves are reverted and a blocked
/// spawn ends the game. Only construction can go wrong.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("board dimensions must be positive, got {width}x{height}")]
    EmptyBoard { width: usize, height: usize },
    #[error("shape table is empty")]
    NoShapes,
    #[error("color palette is empty")]
    NoColors,
    #[error("board {width}x{height} cannot hold a {cols}x{rows} piece")]
    BoardTooSmall {
        width: usize,
        height: usize,
        cols: usize,
        rows: usize,
    },
    #[error("base tick period must be at least 1ms")]
    ZeroTickPeriod,
}
