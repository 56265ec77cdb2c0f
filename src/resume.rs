//! Resume-after-navigation scheduling.
//!
//! A route change in the host can suspend the audio output or re-arm the
//! platform's autoplay policy. Every route change opens a new
//! [`NavigationEpoch`] and, when playback was running, schedules a bounded
//! series of [`ResumeAttempt`]s. Each attempt carries the epoch it was
//! scheduled under; the session drops any attempt whose epoch is no longer
//! current, so two overlapping sequences never fight over the engine handle.

use std::time::{Duration, Instant};

pub const DEFAULT_RESUME_DELAYS_MS: [u64; 4] = [0, 100, 500, 1000];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NavigationEpoch(u64);

impl NavigationEpoch {
    pub fn value(self) -> u64 {
        self.0
    }

    fn bump(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResumeAttempt {
    pub epoch: NavigationEpoch,
    /// Zero-based position within the sequence.
    pub attempt: usize,
    pub of: usize,
    /// Elapsed seconds captured before the route change.
    pub position: f64,
}

impl ResumeAttempt {
    pub fn is_last(&self) -> bool {
        self.attempt + 1 >= self.of
    }
}

#[derive(Debug, Clone)]
struct Pending {
    due: Instant,
    attempt: ResumeAttempt,
}

#[derive(Debug, Clone)]
pub struct ResumeScheduler {
    delays: Vec<Duration>,
    epoch: NavigationEpoch,
    pending: Vec<Pending>,
}

impl ResumeScheduler {
    pub fn new(delays: Vec<Duration>) -> Self {
        let delays = if delays.is_empty() {
            DEFAULT_RESUME_DELAYS_MS
                .iter()
                .map(|ms| Duration::from_millis(*ms))
                .collect()
        } else {
            delays
        };
        Self {
            delays,
            epoch: NavigationEpoch::default(),
            pending: Vec::new(),
        }
    }

    pub fn from_millis(delays_ms: &[u64]) -> Self {
        Self::new(delays_ms.iter().map(|ms| Duration::from_millis(*ms)).collect())
    }

    pub fn epoch(&self) -> NavigationEpoch {
        self.epoch
    }

    pub fn is_current(&self, attempt: &ResumeAttempt) -> bool {
        attempt.epoch == self.epoch
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Opens a new epoch. Attempts from older epochs are discarded, and a new
    /// sequence is scheduled only when playback should come back.
    pub fn on_navigate(
        &mut self,
        now: Instant,
        was_playing: bool,
        position: f64,
        consent_granted: bool,
    ) -> NavigationEpoch {
        self.epoch = self.epoch.bump();
        self.pending.clear();

        if !(was_playing && consent_granted) {
            return self.epoch;
        }

        let of = self.delays.len();
        for (attempt, delay) in self.delays.iter().enumerate() {
            self.pending.push(Pending {
                due: now + *delay,
                attempt: ResumeAttempt {
                    epoch: self.epoch,
                    attempt,
                    of,
                    position,
                },
            });
        }
        self.pending.sort_by_key(|pending| pending.due);
        self.epoch
    }

    /// Pops the earliest attempt that is due at `now`.
    pub fn next_due(&mut self, now: Instant) -> Option<ResumeAttempt> {
        let first = self.pending.first()?;
        if first.due > now {
            return None;
        }
        Some(self.pending.remove(0).attempt)
    }

    pub fn settle(&mut self, epoch: NavigationEpoch) {
        self.pending.retain(|pending| pending.attempt.epoch != epoch);
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }
}

impl Default for ResumeScheduler {
    fn default() -> Self {
        Self::from_millis(&DEFAULT_RESUME_DELAYS_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_is_scheduled_when_paused() {
        let mut scheduler = ResumeScheduler::default();
        let epoch = scheduler.on_navigate(Instant::now(), false, 12.0, true);
        assert_eq!(epoch.value(), 1);
        assert!(!scheduler.has_pending());
    }

    #[test]
    fn nothing_is_scheduled_without_consent() {
        let mut scheduler = ResumeScheduler::default();
        scheduler.on_navigate(Instant::now(), true, 12.0, false);
        assert!(!scheduler.has_pending());
    }

    #[test]
    fn attempts_fire_in_cadence_order() {
        let mut scheduler = ResumeScheduler::from_millis(&[0, 100, 300]);
        let start = Instant::now();
        scheduler.on_navigate(start, true, 30.5, true);

        let first = scheduler.next_due(start).expect("immediate attempt");
        assert_eq!(first.attempt, 0);
        assert_eq!(first.position, 30.5);
        assert!(scheduler.next_due(start).is_none());

        let second = scheduler
            .next_due(start + Duration::from_millis(150))
            .expect("second attempt");
        assert_eq!(second.attempt, 1);
        assert!(!second.is_last());

        let third = scheduler
            .next_due(start + Duration::from_millis(300))
            .expect("third attempt");
        assert!(third.is_last());
        assert!(!scheduler.has_pending());
    }

    #[test]
    fn new_navigation_supersedes_older_attempts() {
        let mut scheduler = ResumeScheduler::from_millis(&[0, 100]);
        let start = Instant::now();
        let first_epoch = scheduler.on_navigate(start, true, 5.0, true);
        let stale = scheduler.next_due(start).expect("attempt");

        let second_epoch = scheduler.on_navigate(start, true, 6.0, true);
        assert!(second_epoch > first_epoch);
        assert!(!scheduler.is_current(&stale));
        assert_eq!(scheduler.pending_len(), 2);

        let fresh = scheduler.next_due(start).expect("fresh attempt");
        assert_eq!(fresh.epoch, second_epoch);
        assert_eq!(fresh.position, 6.0);
    }

    #[test]
    fn settle_drops_remaining_attempts() {
        let mut scheduler = ResumeScheduler::default();
        let epoch = scheduler.on_navigate(Instant::now(), true, 0.0, true);
        scheduler.settle(epoch);
        assert!(!scheduler.has_pending());
    }

    #[test]
    fn empty_cadence_falls_back_to_default() {
        let mut scheduler = ResumeScheduler::new(Vec::new());
        scheduler.on_navigate(Instant::now(), true, 0.0, true);
        assert_eq!(scheduler.pending_len(), DEFAULT_RESUME_DELAYS_MS.len());
    }
}
