use crate::grade::Grade;
use crate::metrics::Metrics;

/// Length of every test, in seconds
pub const TEST_DURATION_SECS: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Idle,
    Running,
    Finished,
}

#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum Outcome {
    Pending,
    Correct,
    Incorrect,
}

/// Read-only view handed to the rendering layer
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub sample_text: String,
    pub typed_text: String,
    pub remaining_seconds: u32,
    pub phase: Phase,
    pub wpm: u32,
    pub accuracy: u32,
    pub error_count: usize,
    pub correct_count: usize,
    pub grade: Grade,
}

/// One sixty second test against a single sample text
#[derive(Debug, Clone)]
pub struct Session {
    sample_text: String,
    typed_text: String,
    remaining_seconds: u32,
    phase: Phase,
    metrics: Metrics,
    generation: u64,
}

impl Session {
    pub fn new(sample_text: String, generation: u64) -> Self {
        Self {
            sample_text,
            typed_text: String::new(),
            remaining_seconds: TEST_DURATION_SECS,
            phase: Phase::Idle,
            metrics: Metrics::default(),
            generation,
        }
    }

    pub fn sample_text(&self) -> &str {
        &self.sample_text
    }

    pub fn typed_text(&self) -> &str {
        &self.typed_text
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn elapsed_seconds(&self) -> u32 {
        TEST_DURATION_SECS - self.remaining_seconds
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn has_started(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn has_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Replace the typed text with the full current input.
    ///
    /// Ignored once finished. A single character typed while idle starts
    /// the clock. Returns true when this call moved the session to Running.
    pub fn submit_input(&mut self, new_text: &str) -> bool {
        if self.phase == Phase::Finished {
            return false;
        }

        let mut started = false;
        if self.phase == Phase::Idle && new_text.chars().count() == 1 {
            self.phase = Phase::Running;
            started = true;
        }

        self.typed_text = new_text.to_string();
        // elapsed is still 0 while idle, so wpm stays 0 there
        self.recompute();

        started
    }

    pub fn push_char(&mut self, c: char) -> bool {
        let mut next = self.typed_text.clone();
        next.push(c);
        self.submit_input(&next)
    }

    pub fn backspace(&mut self) -> bool {
        let mut next = self.typed_text.clone();
        if next.pop().is_none() {
            return false;
        }
        self.submit_input(&next)
    }

    /// Advance the clock by one second. Only honored while running.
    pub fn tick(&mut self) {
        if self.phase != Phase::Running {
            return;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        self.recompute();

        if self.remaining_seconds == 0 {
            self.phase = Phase::Finished;
        }
    }

    pub fn grade(&self) -> Grade {
        Grade::from_scores(self.metrics.wpm, self.metrics.accuracy)
    }

    /// Per sample position: whether it has been typed, and how
    pub fn char_outcomes(&self) -> Vec<Outcome> {
        let mut typed = self.typed_text.chars();
        self.sample_text
            .chars()
            .map(|expected| match typed.next() {
                None => Outcome::Pending,
                Some(c) if c == expected => Outcome::Correct,
                Some(_) => Outcome::Incorrect,
            })
            .collect()
    }

    /// Index of the next sample character to type
    pub fn cursor_pos(&self) -> usize {
        self.typed_text.chars().count()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            sample_text: self.sample_text.clone(),
            typed_text: self.typed_text.clone(),
            remaining_seconds: self.remaining_seconds,
            phase: self.phase,
            wpm: self.metrics.wpm,
            accuracy: self.metrics.accuracy,
            error_count: self.metrics.error_count,
            correct_count: self.metrics.correct_count,
            grade: self.grade(),
        }
    }

    fn recompute(&mut self) {
        self.metrics = Metrics::compute(
            &self.sample_text,
            &self.typed_text,
            self.elapsed_seconds(),
        );
    }
}
