use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Monotonic millisecond time source.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Wall clock measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Clock that only moves when told to. Clones share the same time, so a test
/// can keep one handle while a session owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now_ms
            .fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn set(&self, ms: u64) {
        self.now_ms.store(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

/// Fixed-period timer polled against a [`Clock`].
#[derive(Debug, Clone)]
pub struct Metronome {
    period_ms: u64,
    next_due_ms: Option<u64>,
}

impl Metronome {
    pub fn new(period: Duration) -> Self {
        Self {
            period_ms: (period.as_millis() as u64).max(1),
            next_due_ms: None,
        }
    }

    pub fn every_second() -> Self {
        Self::new(Duration::from_secs(1))
    }

    pub fn arm(&mut self, now_ms: u64) {
        self.next_due_ms = Some(now_ms + self.period_ms);
    }

    /// Stop firing. Cancelling a stopped metronome does nothing.
    pub fn cancel(&mut self) {
        self.next_due_ms = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due_ms.is_some()
    }

    /// Consume one due beat, if any. Call repeatedly to catch up after a
    /// stall.
    pub fn take_due(&mut self, now_ms: u64) -> bool {
        match self.next_due_ms {
            Some(due) if now_ms >= due => {
                self.next_due_ms = Some(due + self.period_ms);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let handle = clock.clone();

        handle.advance(Duration::from_millis(1500));
        assert_eq!(clock.now_ms(), 1500);

        handle.set(10);
        assert_eq!(clock.now_ms(), 10);
    }

    #[test]
    fn metronome_fires_once_per_period() {
        let mut m = Metronome::every_second();
        assert!(!m.take_due(5000));

        m.arm(0);
        assert!(!m.take_due(999));
        assert!(m.take_due(1000));
        assert!(!m.take_due(1500));
        assert!(m.take_due(2000));
    }

    #[test]
    fn metronome_catches_up_after_stall() {
        let mut m = Metronome::every_second();
        m.arm(0);

        let beats = std::iter::from_fn(|| m.take_due(3200).then_some(())).count();
        assert_eq!(beats, 3);
    }

    #[test]
    fn metronome_cancel_is_idempotent() {
        let mut m = Metronome::every_second();
        m.arm(0);
        m.cancel();
        m.cancel();

        assert!(!m.is_armed());
        assert!(!m.take_due(10_000));
    }
}
