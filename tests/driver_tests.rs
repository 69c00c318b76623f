//! Tests for tick scheduling
//!
//! All timing runs on a `ManualClock`, so nothing here sleeps.

use std::time::Duration;

use blockfall::{
    clock::{Clock, ManualClock, MonotonicClock, Scheduler},
    config::{GameConfig, GRID_HEIGHT},
    driver::Driver,
    game::{Command, Game, GameEvent, GameState},
    piece::{Piece, SequencePieceProvider, TetrominoType},
    scoring::Stats,
    test_helpers::*,
};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn idle_driver(clock: &ManualClock) -> Driver<ManualClock> {
    let provider = SequencePieceProvider::new(vec![TetrominoType::O]);
    let game = Game::with_provider(GameConfig::default(), Box::new(provider)).unwrap();
    Driver::new(game, clock.clone())
}

fn piece_y<C: Clock>(driver: &Driver<C>) -> i32 {
    driver.game().current_piece().unwrap().y
}

// ============================================================================
// Scheduler Tests
// ============================================================================

mod scheduler {
    use super::*;

    #[test]
    fn nothing_is_due_before_the_deadline() {
        let mut scheduler = Scheduler::new();
        let handle = scheduler.schedule(ms(100));

        assert_eq!(scheduler.take_due(ms(99)), None);
        assert!(scheduler.is_live(handle));
        assert_eq!(scheduler.take_due(ms(100)), Some(handle));
        assert!(!scheduler.is_live(handle));
        assert_eq!(scheduler.deadline(), None);
    }

    #[test]
    fn cancel_invalidates_the_handle() {
        let mut scheduler = Scheduler::new();
        let handle = scheduler.schedule(ms(10));

        scheduler.cancel();

        assert!(!scheduler.is_live(handle));
        assert_eq!(scheduler.take_due(ms(1_000)), None);
    }

    #[test]
    fn rescheduling_replaces_the_pending_tick() {
        let mut scheduler = Scheduler::new();
        let first = scheduler.schedule(ms(10));
        let second = scheduler.schedule(ms(50));

        assert_ne!(first, second);
        assert!(!scheduler.is_live(first));
        assert_eq!(scheduler.deadline(), Some(ms(50)));
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let other = clock.clone();

        clock.advance(ms(250));
        assert_eq!(other.now(), ms(250));

        other.set(ms(10));
        assert_eq!(clock.now(), ms(10));
    }

    #[test]
    fn monotonic_clock_never_goes_back() {
        let clock = MonotonicClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}

// ============================================================================
// Driver Tests
// ============================================================================

mod driver {
    use super::*;

    #[test]
    fn idle_game_has_no_pending_tick() {
        let clock = ManualClock::new();
        let mut driver = idle_driver(&clock);

        assert_eq!(driver.time_until_tick(), None);
        clock.advance(ms(5_000));
        assert!(!driver.poll());
    }

    #[test]
    fn start_ticks_immediately_then_once_a_second() {
        let clock = ManualClock::new();
        let mut driver = idle_driver(&clock);

        driver.dispatch(Command::Start);
        assert_eq!(driver.time_until_tick(), Some(Duration::ZERO));
        assert!(driver.poll());
        assert_eq!(piece_y(&driver), 1);

        assert_eq!(driver.time_until_tick(), Some(ms(1_000)));
        clock.advance(ms(999));
        assert!(!driver.poll());
        assert_eq!(driver.time_until_tick(), Some(ms(1)));

        clock.advance(ms(1));
        assert!(driver.poll());
        assert_eq!(piece_y(&driver), 2);
    }

    #[test]
    fn late_poll_runs_a_single_tick() {
        let clock = ManualClock::new();
        let mut driver = idle_driver(&clock);
        driver.dispatch(Command::Start);
        driver.poll();

        clock.advance(ms(3_500));
        assert!(driver.poll());
        assert!(!driver.poll());
        assert_eq!(piece_y(&driver), 2);
        assert_eq!(driver.time_until_tick(), Some(ms(1_000)));
    }

    #[test]
    fn pause_cancels_the_pending_tick() {
        let clock = ManualClock::new();
        let mut driver = idle_driver(&clock);
        driver.dispatch(Command::Start);
        driver.poll();

        driver.dispatch(Command::TogglePause);
        assert_eq!(driver.time_until_tick(), None);

        clock.advance(ms(10_000));
        assert!(!driver.poll());
        assert_eq!(piece_y(&driver), 1);

        driver.dispatch(Command::TogglePause);
        assert_eq!(driver.time_until_tick(), Some(Duration::ZERO));
        assert!(driver.poll());
        assert_eq!(piece_y(&driver), 2);
    }

    #[test]
    fn player_moves_do_not_reset_the_timer() {
        let clock = ManualClock::new();
        let mut driver = idle_driver(&clock);
        driver.dispatch(Command::Start);
        driver.poll();

        clock.advance(ms(600));
        driver.dispatch(Command::MoveLeft);
        driver.dispatch(Command::MoveDown);

        assert_eq!(driver.time_until_tick(), Some(ms(400)));
    }

    #[test]
    fn level_up_shortens_the_next_interval() {
        let clock = ManualClock::new();
        let mut grid = empty_grid();
        fill_row_with_gap(&mut grid, GRID_HEIGHT - 1, 0);
        let vertical_i = Piece::new_at(TetrominoType::I, TetrominoType::I.default_color(), 0, 16)
            .rotated();
        let provider = SequencePieceProvider::new(vec![TetrominoType::O]);
        let game = Game::with_grid(grid, vertical_i, Box::new(provider)).with_stats(Stats {
            score: 0,
            level: 1,
            lines: 9,
        });
        let mut driver = Driver::new(game, clock.clone());

        // The piece already rests on the floor, so this tick locks it.
        assert!(driver.poll());

        assert_eq!(driver.game().stats().level, 2);
        assert_eq!(driver.time_until_tick(), Some(ms(500)));
        assert!(driver.take_events().contains(&GameEvent::LevelUp(2)));
    }

    #[test]
    fn game_over_stops_the_loop_until_restart() {
        let clock = ManualClock::new();
        let mut grid = empty_grid();
        grid.set_cell(4, 1, FILL);
        let current = Piece::new_at(TetrominoType::I, TetrominoType::I.default_color(), 0, 5);
        let provider = SequencePieceProvider::new(vec![TetrominoType::O]);
        let game = Game::with_grid(grid, current, Box::new(provider));
        let mut driver = Driver::new(game, clock.clone());

        driver.dispatch(Command::HardDrop);
        assert_eq!(driver.game().state(), GameState::GameOver);
        assert_eq!(driver.time_until_tick(), None);

        clock.advance(ms(5_000));
        assert!(!driver.poll());

        driver.dispatch(Command::Start);
        assert_eq!(driver.game().state(), GameState::Running);
        assert!(driver.game().grid().is_empty());
        assert_eq!(driver.time_until_tick(), Some(Duration::ZERO));
    }
}
