/// Characters that make up one "word" for WPM purposes.
pub const CHARS_PER_WORD: f64 = 5.0;

/// Lower bound on elapsed minutes. Keeps the first tick of a run from
/// dividing by a near-zero duration.
pub const MIN_ELAPSED_MINUTES: f64 = 0.01;

/// Snapshot of the numbers shown while a run is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveStats {
    pub remaining_seconds: u64,
    pub net_wpm: u64,
    pub accuracy_percent: u64,
    pub total_keystrokes: u64,
}

/// Consumer of live statistics, e.g. a status line.
pub trait StatsSink {
    fn display(&mut self, stats: &LiveStats);
}

pub fn elapsed_minutes(elapsed_ms: u64) -> f64 {
    (elapsed_ms as f64 / 60_000.0).max(MIN_ELAPSED_MINUTES)
}

/// Net WPM counts only correct keystrokes.
pub fn net_wpm(correct_keystrokes: u64, elapsed_ms: u64) -> u64 {
    let wpm = (correct_keystrokes as f64 / CHARS_PER_WORD) / elapsed_minutes(elapsed_ms);
    wpm.round().max(0.0) as u64
}

/// Accuracy in whole percent; 100 when nothing has been typed.
pub fn accuracy_percent(correct_keystrokes: u64, total_keystrokes: u64) -> u64 {
    if total_keystrokes == 0 {
        return 100;
    }
    let pct = (correct_keystrokes as f64 / total_keystrokes as f64) * 100.0;
    pct.round().clamp(0.0, 100.0) as u64
}
