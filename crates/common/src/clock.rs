//! Wall-clock utilities for the live header clock.
//!
//! The clock shown next to the header is a `HH:MM:SS` string (zero-padded,
//! 24-hour, local time) recomputed once per second. This module provides:
//! - A [`Clock`] source abstraction so callers can be tested with fixed time
//! - [`ClockString`] formatting
//! - [`ClockTicker`], a per-view ticking task that stops when dropped

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Local, NaiveTime, TimeZone, Timelike};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Interval between clock recomputations.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// A source of wall-clock time.
pub trait Clock: Send + Sync {
    /// Current local time of day.
    fn now(&self) -> NaiveTime;
}

/// The system's local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveTime {
        Local::now().time()
    }
}

/// A clock frozen at a given time of day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveTime);

impl FixedClock {
    pub fn hms(hour: u32, minute: u32, second: u32) -> Self {
        Self(NaiveTime::from_hms_opt(hour, minute, second).unwrap_or(NaiveTime::MIN))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveTime {
        self.0
    }
}

/// A formatted `HH:MM:SS` clock reading.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClockString(String);

impl ClockString {
    /// Format a time of day.
    pub fn from_time(time: NaiveTime) -> Self {
        Self(format!(
            "{:02}:{:02}:{:02}",
            time.hour(),
            time.minute(),
            time.second()
        ))
    }

    /// Format a timezone-aware timestamp in its own offset.
    pub fn from_datetime<Tz: TimeZone>(at: &DateTime<Tz>) -> Self {
        Self::from_time(at.time())
    }

    /// Read the given clock.
    pub fn read(clock: &dyn Clock) -> Self {
        Self::from_time(clock.now())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether a string has the `HH:MM:SS` shape with valid ranges.
    pub fn is_well_formed(s: &str) -> bool {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 3 {
            return false;
        }
        let limits = [23u32, 59, 59];
        parts.iter().zip(limits).all(|(part, max)| {
            part.len() == 2
                && part.bytes().all(|b| b.is_ascii_digit())
                && part.parse::<u32>().is_ok_and(|v| v <= max)
        })
    }
}

impl fmt::Display for ClockString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A ticking clock scoped to the lifetime of one mounted view.
///
/// Publishes a fresh [`ClockString`] immediately and then once per
/// [`TICK_INTERVAL`]. The background task is aborted on [`ClockTicker::stop`]
/// or when the ticker is dropped.
pub struct ClockTicker {
    rx: watch::Receiver<ClockString>,
    task: Option<JoinHandle<()>>,
}

impl ClockTicker {
    /// Start ticking. Must be called from within a tokio runtime.
    pub fn start<C: Clock + 'static>(clock: C) -> Self {
        Self::with_interval(clock, TICK_INTERVAL)
    }

    /// Start ticking with a custom interval.
    pub fn with_interval<C: Clock + 'static>(clock: C, every: Duration) -> Self {
        let (tx, rx) = watch::channel(ClockString::read(&clock));

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if tx.send(ClockString::read(&clock)).is_err() {
                    break;
                }
            }
        });

        tracing::debug!(interval_ms = every.as_millis() as u64, "Clock ticker started");

        Self {
            rx,
            task: Some(task),
        }
    }

    /// Latest published reading.
    pub fn current(&self) -> ClockString {
        self.rx.borrow().clone()
    }

    /// A receiver for observing updates.
    pub fn subscribe(&self) -> watch::Receiver<ClockString> {
        self.rx.clone()
    }

    /// Whether the ticking task is still alive.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop ticking. Idempotent.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::debug!("Clock ticker stopped");
        }
    }
}

impl Drop for ClockTicker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    /// Advances one second per reading.
    struct SteppingClock(Arc<AtomicU32>);

    impl Clock for SteppingClock {
        fn now(&self) -> NaiveTime {
            let secs = self.0.fetch_add(1, Ordering::SeqCst);
            NaiveTime::from_num_seconds_from_midnight_opt(secs % 86_400, 0).unwrap()
        }
    }

    #[test]
    fn test_zero_padded_format() {
        assert_eq!(FixedClock::hms(7, 5, 3).now().hour(), 7);
        assert_eq!(ClockString::read(&FixedClock::hms(7, 5, 3)).as_str(), "07:05:03");
        assert_eq!(ClockString::read(&FixedClock::hms(23, 59, 59)).as_str(), "23:59:59");
        assert_eq!(ClockString::read(&FixedClock::hms(0, 0, 0)).as_str(), "00:00:00");
    }

    #[test]
    fn test_from_datetime_uses_local_offset() {
        let at = chrono::FixedOffset::west_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 2, 14, 18, 30, 9)
            .unwrap();
        assert_eq!(ClockString::from_datetime(&at).as_str(), "18:30:09");
    }

    #[test]
    fn test_well_formed_check() {
        assert!(ClockString::is_well_formed("00:00:00"));
        assert!(ClockString::is_well_formed("23:59:59"));
        assert!(!ClockString::is_well_formed("24:00:00"));
        assert!(!ClockString::is_well_formed("7:05:03"));
        assert!(!ClockString::is_well_formed("07:05:03 PST"));
        assert!(!ClockString::is_well_formed("07:5a:03"));
    }

    #[test]
    fn test_system_clock_is_well_formed() {
        let reading = ClockString::read(&SystemClock);
        assert!(ClockString::is_well_formed(reading.as_str()), "{reading}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_publishes_every_second() {
        let counter = Arc::new(AtomicU32::new(0));
        let ticker = ClockTicker::start(SteppingClock(counter.clone()));
        let mut rx = ticker.subscribe();

        // Initial reading is available before the first tick.
        assert_eq!(ticker.current().as_str(), "00:00:00");

        for _ in 0..3 {
            tokio::time::advance(TICK_INTERVAL).await;
            rx.changed().await.unwrap();
        }

        let latest = ticker.current();
        assert!(ClockString::is_well_formed(latest.as_str()));
        assert!(counter.load(Ordering::SeqCst) >= 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_halts_ticking() {
        let counter = Arc::new(AtomicU32::new(0));
        let mut ticker = ClockTicker::start(SteppingClock(counter.clone()));
        tokio::task::yield_now().await;

        ticker.stop();
        tokio::task::yield_now().await;
        let before = counter.load(Ordering::SeqCst);

        tokio::time::advance(Duration::from_secs(5)).await;
        tokio::task::yield_now().await;

        assert_eq!(counter.load(Ordering::SeqCst), before);
        assert!(!ticker.is_running());
    }
}
