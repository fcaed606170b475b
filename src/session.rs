use log::{debug, info};

use crate::clock::{Clock, Metronome};
use crate::config::{Config, ConfigError};
use crate::stats::{self, LiveStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum FinishReason {
    #[strum(serialize = "time")]
    Time,
    #[strum(serialize = "completed")]
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickResult {
    pub remaining_seconds: u64,
    pub finished: bool,
    /// Set when this tick ran the clock out.
    pub summary: Option<SessionSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub net_wpm: u64,
    pub accuracy_percent: u64,
    pub total_keystrokes: u64,
    pub correct_keystrokes: u64,
    pub reason: FinishReason,
}

/// Lifecycle, countdown and keystroke counters of one timed run.
#[derive(Debug)]
pub struct Session<C: Clock> {
    clock: C,
    timer: Metronome,
    state: SessionState,
    duration_secs: u64,
    started_at_ms: Option<u64>,
    remaining_seconds: u64,
    total_keystrokes: u64,
    correct_keystrokes: u64,
    live: LiveStats,
    summary: Option<SessionSummary>,
}

impl<C: Clock> Session<C> {
    pub fn new(config: &Config, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;
        let duration_secs = config.duration_secs;
        Ok(Self {
            clock,
            timer: Metronome::every_second(),
            state: SessionState::Idle,
            duration_secs,
            started_at_ms: None,
            remaining_seconds: duration_secs,
            total_keystrokes: 0,
            correct_keystrokes: 0,
            live: LiveStats {
                remaining_seconds: duration_secs,
                net_wpm: 0,
                accuracy_percent: 100,
                total_keystrokes: 0,
            },
            summary: None,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    pub fn is_finished(&self) -> bool {
        self.state == SessionState::Finished
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn started_at_ms(&self) -> Option<u64> {
        self.started_at_ms
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn total_keystrokes(&self) -> u64 {
        self.total_keystrokes
    }

    pub fn correct_keystrokes(&self) -> u64 {
        self.correct_keystrokes
    }

    pub fn live_stats(&self) -> LiveStats {
        self.live
    }

    pub fn summary(&self) -> Option<SessionSummary> {
        self.summary
    }

    pub fn is_timer_armed(&self) -> bool {
        self.timer.is_armed()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn start(&mut self) {
        if self.state != SessionState::Idle {
            return;
        }
        let now = self.clock.now_ms();
        self.state = SessionState::Running;
        self.started_at_ms = Some(now);
        self.timer.arm(now);
        info!("session started, {}s on the clock", self.duration_secs);
    }

    /// One second of countdown.
    pub fn tick(&mut self) -> TickResult {
        if self.state != SessionState::Running {
            return TickResult {
                remaining_seconds: self.remaining_seconds,
                finished: self.is_finished(),
                summary: None,
            };
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        debug!("tick: {}s remaining", self.remaining_seconds);

        if self.remaining_seconds == 0 {
            let summary = self.finish(FinishReason::Time);
            return TickResult {
                remaining_seconds: 0,
                finished: true,
                summary: Some(summary),
            };
        }

        self.refresh_live_stats();
        TickResult {
            remaining_seconds: self.remaining_seconds,
            finished: false,
            summary: None,
        }
    }

    /// Run every tick that has come due on the clock since the last poll.
    pub fn poll_timer(&mut self) -> Option<TickResult> {
        let mut last = None;
        while self.is_running() && self.timer.take_due(self.clock.now_ms()) {
            last = Some(self.tick());
        }
        last
    }

    pub fn record_keystroke(&mut self, matched: bool) {
        if self.is_finished() {
            return;
        }
        self.total_keystrokes += 1;
        if matched {
            self.correct_keystrokes += 1;
        }
    }

    pub fn undo_keystroke(&mut self, was_correct: bool) {
        if self.is_finished() {
            return;
        }
        self.total_keystrokes = self.total_keystrokes.saturating_sub(1);
        if was_correct {
            self.correct_keystrokes = self.correct_keystrokes.saturating_sub(1);
        }
    }

    /// Force the run to end. Later calls return the frozen summary.
    pub fn finish(&mut self, reason: FinishReason) -> SessionSummary {
        if let Some(summary) = self.summary {
            return summary;
        }

        self.state = SessionState::Finished;
        self.timer.cancel();
        self.refresh_live_stats();

        let summary = SessionSummary {
            net_wpm: self.live.net_wpm,
            accuracy_percent: self.live.accuracy_percent,
            total_keystrokes: self.total_keystrokes,
            correct_keystrokes: self.correct_keystrokes,
            reason,
        };
        self.summary = Some(summary);
        info!(
            "session finished ({}): {} wpm, {}% acc, {} keystrokes",
            reason, summary.net_wpm, summary.accuracy_percent, summary.total_keystrokes
        );
        summary
    }

    /// Recompute WPM and accuracy from the counters and the clock.
    pub fn refresh_live_stats(&mut self) -> LiveStats {
        if self.summary.is_some() {
            return self.live;
        }
        let elapsed_ms = self
            .started_at_ms
            .map_or(0, |start| self.clock.now_ms().saturating_sub(start));

        self.live = LiveStats {
            remaining_seconds: self.remaining_seconds,
            net_wpm: stats::net_wpm(self.correct_keystrokes, elapsed_ms),
            accuracy_percent: stats::accuracy_percent(
                self.correct_keystrokes,
                self.total_keystrokes,
            ),
            total_keystrokes: self.total_keystrokes,
        };
        self.live
    }
}
