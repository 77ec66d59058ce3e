use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// How often the UI loop wakes up when no input arrives
pub const TICK_RATE_MS: u64 = 100;

/// Period of the session countdown
pub const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);

/// Shortest period a countdown accepts; `due` steps by the period
pub const MIN_COUNTDOWN_PERIOD: Duration = Duration::from_millis(1);

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait AppEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let evt = match event::read() {
                // windows reports both press and release
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => AppEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => AppEvent::Resize,
                Ok(_) => continue,
                Err(err) => {
                    tracing::error!(%err, "terminal event reader stopped");
                    break;
                }
            };

            if tx.send(evt).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl AppEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for FixedTicker {
    fn default() -> Self {
        Self::new(Duration::from_millis(TICK_RATE_MS))
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<AppEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }
}

impl AppEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: AppEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: AppEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to tick interval and returns the next event, or Tick on timeout
    pub fn step(&self) -> AppEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => AppEvent::Tick,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Armed {
    generation: u64,
    next_fire: Instant,
}

/// Recurring one-second countdown owned by exactly one session generation.
///
/// Arming replaces whatever was armed before. Polling with any generation
/// other than the armed one yields nothing, so a countdown left over from a
/// previous session can never tick the current one.
#[derive(Debug, Clone, Default)]
pub struct Countdown {
    armed: Option<Armed>,
    period: Option<Duration>,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Periods shorter than [`MIN_COUNTDOWN_PERIOD`] are raised to it.
    pub fn with_period(period: Duration) -> Self {
        Self {
            armed: None,
            period: Some(period.max(MIN_COUNTDOWN_PERIOD)),
        }
    }

    fn period(&self) -> Duration {
        self.period.unwrap_or(COUNTDOWN_PERIOD)
    }

    pub fn arm(&mut self, generation: u64, now: Instant) {
        self.armed = Some(Armed {
            generation,
            next_fire: now + self.period(),
        });
    }

    pub fn cancel(&mut self) {
        self.armed = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    pub fn armed_generation(&self) -> Option<u64> {
        self.armed.map(|a| a.generation)
    }

    /// Number of whole periods elapsed since the last poll.
    pub fn due(&mut self, generation: u64, now: Instant) -> u32 {
        let period = self.period();
        let Some(armed) = self.armed.as_mut() else {
            return 0;
        };
        if armed.generation != generation {
            return 0;
        }

        let mut fired = 0;
        while armed.next_fire <= now {
            armed.next_fire += period;
            fired += 1;
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn step_returns_tick_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(1));
        let runner = Runner::new(es, ticker);

        // With no events available, step should yield Tick
        let ev = runner.step();
        match ev {
            AppEvent::Tick => {}
            _ => panic!("expected Tick on timeout"),
        }
    }

    #[test]
    fn step_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(AppEvent::Resize).unwrap();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(10));
        let runner = Runner::new(es, ticker);

        match runner.step() {
            AppEvent::Resize => {}
            _ => panic!("expected Resize event"),
        }
    }

    #[test]
    fn default_ticker_uses_tick_rate() {
        assert_eq!(
            FixedTicker::default().interval(),
            Duration::from_millis(TICK_RATE_MS)
        );
    }

    #[test]
    fn countdown_fires_once_per_second() {
        let start = Instant::now();
        let mut countdown = Countdown::new();
        countdown.arm(1, start);

        assert_eq!(countdown.due(1, start + Duration::from_millis(999)), 0);
        assert_eq!(countdown.due(1, start + Duration::from_secs(1)), 1);
        assert_eq!(countdown.due(1, start + Duration::from_millis(1500)), 0);
        assert_eq!(countdown.due(1, start + Duration::from_secs(2)), 1);
    }

    #[test]
    fn countdown_catches_up_after_stall() {
        let start = Instant::now();
        let mut countdown = Countdown::new();
        countdown.arm(1, start);

        assert_eq!(countdown.due(1, start + Duration::from_millis(3200)), 3);
        assert_eq!(countdown.due(1, start + Duration::from_millis(3900)), 0);
    }

    #[test]
    fn countdown_ignores_other_generations() {
        let start = Instant::now();
        let mut countdown = Countdown::new();
        countdown.arm(1, start);

        assert_eq!(countdown.due(2, start + Duration::from_secs(5)), 0);
        assert_eq!(countdown.armed_generation(), Some(1));
    }

    #[test]
    fn countdown_rearm_replaces_previous() {
        let start = Instant::now();
        let mut countdown = Countdown::new();
        countdown.arm(1, start);
        countdown.arm(2, start + Duration::from_secs(10));

        assert_eq!(countdown.due(1, start + Duration::from_secs(20)), 0);
        assert_eq!(countdown.due(2, start + Duration::from_secs(11)), 1);
    }

    #[test]
    fn countdown_cancel_stops_ticks() {
        let start = Instant::now();
        let mut countdown = Countdown::new();
        countdown.arm(1, start);
        countdown.cancel();

        assert!(!countdown.is_armed());
        assert_eq!(countdown.due(1, start + Duration::from_secs(5)), 0);
    }

    #[test]
    fn countdown_custom_period() {
        let start = Instant::now();
        let mut countdown = Countdown::with_period(Duration::from_millis(10));
        countdown.arm(0, start);

        assert_eq!(countdown.due(0, start + Duration::from_millis(35)), 3);
    }

    #[test]
    fn countdown_zero_period_is_clamped() {
        let start = Instant::now();
        let mut countdown = Countdown::with_period(Duration::ZERO);
        countdown.arm(0, start);

        assert_eq!(countdown.due(0, start + Duration::from_millis(1)), 1);
        assert_eq!(countdown.due(0, start + Duration::from_millis(5)), 4);
    }
}
