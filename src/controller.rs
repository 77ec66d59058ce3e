use std::time::Instant;

use rand::Rng;

use crate::grade::Grade;
use crate::runtime::Countdown;
use crate::samples::SamplePool;
use crate::session::{Phase, Session, Snapshot};

/// Drives one [`Session`] at a time: sample selection, the countdown and
/// user input all go through here.
#[derive(Debug)]
pub struct Controller<R: Rng> {
    pool: SamplePool,
    rng: R,
    session: Session,
    countdown: Countdown,
    generation: u64,
}

impl<R: Rng> Controller<R> {
    pub fn new(pool: SamplePool, mut rng: R) -> Self {
        let sample = pool.choose(&mut rng);
        tracing::debug!(pool = %pool.name, chars = sample.chars().count(), "initial sample chosen");

        Self {
            pool,
            rng,
            session: Session::new(sample, 0),
            countdown: Countdown::new(),
            generation: 0,
        }
    }

    pub fn with_countdown(mut self, countdown: Countdown) -> Self {
        self.countdown = countdown;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn snapshot(&self) -> Snapshot {
        self.session.snapshot()
    }

    pub fn grade(&self) -> Grade {
        self.session.grade()
    }

    /// Throw away the current session and start a fresh idle one.
    pub fn reset(&mut self) {
        self.countdown.cancel();
        self.generation += 1;

        let sample = self.pool.choose(&mut self.rng);
        tracing::info!(
            generation = self.generation,
            previous_phase = %self.session.phase(),
            "session reset"
        );
        self.session = Session::new(sample, self.generation);
    }

    /// Input is applied at `now`: any countdown seconds already due are
    /// ticked first, so keystrokes past the deadline hit a finished session.
    pub fn submit_input(&mut self, new_text: &str, now: Instant) {
        self.poll_timer(now);
        let started = self.session.submit_input(new_text);
        self.on_input_applied(started, now);
    }

    pub fn push_char(&mut self, c: char, now: Instant) {
        self.poll_timer(now);
        let started = self.session.push_char(c);
        self.on_input_applied(started, now);
    }

    pub fn backspace(&mut self, now: Instant) {
        self.poll_timer(now);
        let started = self.session.backspace();
        self.on_input_applied(started, now);
    }

    /// Feed every countdown second that has elapsed by `now` into the session.
    /// Returns true when the session finished during this poll.
    pub fn poll_timer(&mut self, now: Instant) -> bool {
        let due = self.countdown.due(self.session.generation(), now);
        for _ in 0..due {
            self.tick();
        }
        due > 0 && self.session.has_finished()
    }

    /// Advance the current session by one second.
    pub fn tick(&mut self) {
        if self.session.phase() != Phase::Running {
            return;
        }

        self.session.tick();

        if self.session.has_finished() {
            self.countdown.cancel();
            let m = self.session.metrics();
            tracing::info!(
                generation = self.generation,
                wpm = m.wpm,
                accuracy = m.accuracy,
                errors = m.error_count,
                grade = %self.session.grade(),
                "session finished"
            );
        }
    }

    fn on_input_applied(&mut self, started: bool, now: Instant) {
        if started {
            self.countdown.arm(self.session.generation(), now);
            tracing::info!(generation = self.generation, "session started");
        }
    }
}
