pub mod clock;
pub mod collision;
pub mod config;
pub mod driver;
pub mod error;
pub mod game;
pub mod grid;
pub mod piece;
pub mod scoring;
pub mod test_helpers;
