//! Recurring interval timers on a millisecond clock.
//!
//! [`IntervalTimers`] plays the role of the host's `setInterval` /
//! `clearInterval` pair. The clock only moves when the owner polls it, so a
//! sprite's playback is fully deterministic and driven by whatever loop the
//! host runs.
//!
//! # Dispatch order
//!
//! [`IntervalTimers::poll`] yields one due timer at a time, earliest deadline
//! first, ties broken by scheduling order. The clock is moved to that
//! deadline before the timer is returned, so the caller observes the time the
//! tick was meant to happen at. A timer that is cancelled while the caller
//! handles an earlier tick is never returned again.

/// Opaque handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct IntervalTimer<T> {
    handle: TimerHandle,
    interval_ms: u64,
    next_due: u64,
    payload: T,
}

#[derive(Debug, Clone)]
pub struct IntervalTimers<T> {
    now: u64,
    next_id: u64,
    timers: Vec<IntervalTimer<T>>,
}

impl<T> Default for IntervalTimers<T> {
    fn default() -> Self {
        Self {
            now: 0,
            next_id: 0,
            timers: Vec::new(),
        }
    }
}

impl<T: Clone> IntervalTimers<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock time in milliseconds.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Schedule `payload` to fire every `interval_ms` milliseconds, the first
    /// time one interval from now. Intervals below 1 ms are clamped to 1.
    pub fn schedule(&mut self, interval_ms: u32, payload: T) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        let interval_ms = u64::from(interval_ms.max(1));
        self.timers.push(IntervalTimer {
            handle,
            interval_ms,
            next_due: self.now.saturating_add(interval_ms),
            payload,
        });
        handle
    }

    /// Cancel a timer. Returns false if it was not scheduled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.handle != handle);
        self.timers.len() != before
    }

    pub fn is_scheduled(&self, handle: TimerHandle) -> bool {
        self.timers.iter().any(|t| t.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }

    /// Take the earliest timer due at or before `until`.
    ///
    /// Moves the clock to that timer's deadline and re-arms the timer for its
    /// next period. Returns `None` once nothing else is due. A timer whose
    /// next period would pass the end of the clock fires one last time and is
    /// then dropped.
    pub fn poll(&mut self, until: u64) -> Option<(TimerHandle, T)> {
        let (index, _) = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.next_due <= until)
            .min_by_key(|(_, t)| (t.next_due, t.handle))?;
        let timer = &mut self.timers[index];
        self.now = self.now.max(timer.next_due);
        let fired = (timer.handle, timer.payload.clone());
        match timer.next_due.checked_add(timer.interval_ms) {
            Some(next_due) => timer.next_due = next_due,
            None => {
                self.timers.swap_remove(index);
            }
        }
        Some(fired)
    }

    /// Move the clock forward to `until` without firing anything.
    pub fn advance_to(&mut self, until: u64) {
        self.now = self.now.max(until);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(timers: &mut IntervalTimers<&'static str>, until: u64) -> Vec<(u64, &'static str)> {
        let mut fired = Vec::new();
        while let Some((_, payload)) = timers.poll(until) {
            fired.push((timers.now(), payload));
        }
        timers.advance_to(until);
        fired
    }

    #[test]
    fn test_first_tick_after_one_interval() {
        let mut timers = IntervalTimers::new();
        timers.schedule(100, "a");
        assert!(drain(&mut timers, 99).is_empty());
        assert_eq!(drain(&mut timers, 100), vec![(100, "a")]);
    }

    #[test]
    fn test_multiple_periods_in_one_advance() {
        let mut timers = IntervalTimers::new();
        timers.schedule(30, "a");
        assert_eq!(drain(&mut timers, 100), vec![(30, "a"), (60, "a"), (90, "a")]);
        assert_eq!(timers.now(), 100);
    }

    #[test]
    fn test_interleaves_by_deadline_then_schedule_order() {
        let mut timers = IntervalTimers::new();
        timers.schedule(20, "slow");
        timers.schedule(10, "fast");
        assert_eq!(
            drain(&mut timers, 40),
            vec![(10, "fast"), (20, "slow"), (20, "fast"), (30, "fast"), (40, "slow"), (40, "fast")]
        );
    }

    #[test]
    fn test_cancel_stops_future_ticks() {
        let mut timers = IntervalTimers::new();
        let handle = timers.schedule(10, "a");
        assert_eq!(drain(&mut timers, 10).len(), 1);
        assert!(timers.cancel(handle));
        assert!(!timers.cancel(handle));
        assert!(drain(&mut timers, 100).is_empty());
        assert!(timers.is_empty());
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let mut timers = IntervalTimers::new();
        timers.schedule(0, "a");
        assert_eq!(drain(&mut timers, 3).len(), 3);
    }

    #[test]
    fn test_schedule_relative_to_current_clock() {
        let mut timers = IntervalTimers::new();
        timers.advance_to(500);
        timers.schedule(50, "late");
        assert!(drain(&mut timers, 549).is_empty());
        assert_eq!(drain(&mut timers, 550), vec![(550, "late")]);
    }

    #[test]
    fn test_end_of_clock_drops_timer() {
        let mut timers = IntervalTimers::new();
        timers.advance_to(u64::MAX - 15);
        let handle = timers.schedule(10, "a");
        assert_eq!(drain(&mut timers, u64::MAX), vec![(u64::MAX - 5, "a")]);
        assert!(!timers.is_scheduled(handle));
        assert_eq!(timers.now(), u64::MAX);
    }
}
