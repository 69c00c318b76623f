use std::time::Duration;

use crate::clock::{Clock, Scheduler, TimerHandle};
use crate::game::{Command, Game, GameEvent};

/// Single dispatch point for a [`Game`]: player commands and gravity ticks
/// both pass through here, one at a time.
///
/// The tick loop reschedules itself after each tick using the interval for
/// the level reached by that tick. Entering the running state (start or
/// resume) queues a tick for immediately; leaving it cancels the pending one.
pub struct Driver<C: Clock> {
    game: Game,
    clock: C,
    scheduler: Scheduler,
    timer: Option<TimerHandle>,
}

impl<C: Clock> Driver<C> {
    pub fn new(game: Game, clock: C) -> Self {
        let mut driver = Self {
            game,
            clock,
            scheduler: Scheduler::new(),
            timer: None,
        };
        driver.sync_timer(Duration::ZERO);
        driver
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn dispatch(&mut self, command: Command) {
        self.game.handle(command);
        self.sync_timer(Duration::ZERO);
    }

    /// Runs the pending tick if it is due. Returns whether one ran.
    pub fn poll(&mut self) -> bool {
        let now = self.clock.now();
        if self.scheduler.take_due(now).is_none() {
            return false;
        }

        self.timer = None;
        self.game.tick();
        self.sync_timer(self.game.tick_interval());
        true
    }

    /// How long until the pending tick is due, or `None` when nothing is
    /// scheduled (idle, paused or game over).
    pub fn time_until_tick(&self) -> Option<Duration> {
        self.scheduler
            .deadline()
            .map(|at| at.saturating_sub(self.clock.now()))
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        self.game.take_events()
    }

    fn sync_timer(&mut self, delay: Duration) {
        let live = self.timer.is_some_and(|t| self.scheduler.is_live(t));

        if !self.game.is_running() {
            self.scheduler.cancel();
            self.timer = None;
        } else if !live {
            let at = self.clock.now() + delay;
            self.timer = Some(self.scheduler.schedule(at));
        }
    }
}
