//! Real-time pacing between ticks.
//!
//! Pacing only affects wall-clock speed. The loop submits the same actions in
//! the same order whether or not it waits, so a [`Pacer`] can be swapped for
//! [`Pacer::unpaced`] in headless runs, or cancelled mid-wait.

use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cancellation flag shared between the loop and whoever may stop it.
///
/// Cancelling wakes any wait in progress. The flag never resets.
#[derive(Clone, Default)]
pub struct CancelToken {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        let (lock, cvar) = &*self.inner;
        *lock.lock() = true;
        cvar.notify_all();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.inner.0.lock()
    }

    /// Block until `deadline` or cancellation. Returns true if cancelled.
    #[must_use]
    pub fn wait_until(&self, deadline: Instant) -> bool {
        let (lock, cvar) = &*self.inner;
        let mut cancelled = lock.lock();
        while !*cancelled {
            if cvar.wait_until(&mut cancelled, deadline).timed_out() {
                break;
            }
        }
        *cancelled
    }
}

/// Keeps successive submissions one tick interval apart.
///
/// Deadlines advance by a fixed interval, so time spent computing an action
/// is absorbed instead of added. A pacer that falls behind resynchronises
/// rather than bursting to catch up.
pub struct Pacer {
    interval: Option<Duration>,
    next_deadline: Option<Instant>,
    cancel: CancelToken,
}

impl Pacer {
    /// One tick every `1 / ticrate` seconds.
    #[must_use]
    pub fn real_time(ticrate: u32) -> Self {
        let interval = engine::tick_interval(ticrate);
        Self { interval: Some(interval), next_deadline: None, cancel: CancelToken::new() }
    }

    /// Never waits.
    #[must_use]
    pub fn unpaced() -> Self {
        Self { interval: None, next_deadline: None, cancel: CancelToken::new() }
    }

    /// Share an existing token instead of the pacer's own.
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    #[must_use]
    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// Whether `pace` would currently block.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.interval.is_some() && !self.cancel.is_cancelled()
    }

    /// Start timing from now; called at the beginning of every episode.
    pub fn reset(&mut self) {
        self.next_deadline = self.interval.map(|i| Instant::now() + i);
    }

    /// Wait out the remainder of `tics` tick intervals since the last call.
    ///
    /// Returns true if the pacer actually slept.
    pub fn pace(&mut self, tics: u32) -> bool {
        let Some(interval) = self.interval else {
            return false;
        };
        if self.cancel.is_cancelled() {
            return false;
        }
        let now = Instant::now();
        let span = interval * tics.max(1);
        let Some(deadline) = self.next_deadline else {
            self.next_deadline = Some(now + span);
            return false;
        };
        // The deadline marks the end of the previous span; this one
        // covers `tics` intervals from there.
        let target = deadline + span - interval;
        if target <= now {
            self.next_deadline = Some(now + interval);
            return false;
        }
        if self.cancel.wait_until(target) {
            tracing::debug!("Pacing cancelled");
            return false;
        }
        self.next_deadline = Some(target + interval);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn real_time_interval_comes_from_the_ticrate() {
        assert_eq!(Pacer::real_time(35).interval(), Some(engine::tick_interval(35)));
        assert_eq!(Pacer::unpaced().interval(), None);
    }

    #[test]
    fn unpaced_never_sleeps() {
        let mut pacer = Pacer::unpaced();
        pacer.reset();
        let start = Instant::now();
        for _ in 0..100 {
            assert!(!pacer.pace(1));
        }
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[test]
    fn real_time_waits_about_one_interval() {
        let mut pacer = Pacer::real_time(50); // 20ms
        pacer.reset();
        let start = Instant::now();
        assert!(pacer.pace(1));
        assert!(pacer.pace(1));
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(35), "elapsed {elapsed:?}");
    }

    #[test]
    fn cancel_interrupts_a_long_wait() {
        let mut pacer = Pacer::real_time(1); // one second per tick
        let token = pacer.cancel_token();
        pacer.reset();
        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            token.cancel();
        });
        let start = Instant::now();
        assert!(!pacer.pace(1));
        assert!(start.elapsed() < Duration::from_millis(900));
        canceller.join().unwrap();
        assert!(!pacer.is_active());
        assert!(!pacer.pace(1));
    }

    #[test]
    fn behind_schedule_resynchronises() {
        let mut pacer = Pacer::real_time(1000); // 1ms
        pacer.reset();
        thread::sleep(Duration::from_millis(10));
        assert!(!pacer.pace(1));
    }
}
