use log::{debug, info};

use crate::clock::Clock;
use crate::config::{Config, ConfigError};
use crate::engine::{BackspaceResult, TextMatchEngine};
use crate::session::{FinishReason, Session, SessionSummary, TickResult};
use crate::stats::{LiveStats, StatsSink};

/// A discrete input, independent of where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Char(char),
    WordBoundary,
    Backspace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// The run is over; the input was dropped.
    Rejected,
    /// Nothing to compare against (e.g. extra characters past a word's end).
    Ignored,
    Accepted,
    Finished(SessionSummary),
}

/// One run of the typing test: the word board and its timed session.
#[derive(Debug)]
pub struct Game<C: Clock> {
    config: Config,
    engine: TextMatchEngine,
    session: Session<C>,
}

impl<C: Clock> Game<C> {
    pub fn new<I, S>(config: Config, words: I, clock: C) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let session = Session::new(&config, clock)?;
        let engine = TextMatchEngine::with_words(words);
        debug!(
            "new game: {} words, {}s, mode {}",
            engine.word_count(),
            config.duration_secs,
            config.mode
        );
        Ok(Self {
            config,
            engine,
            session,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn engine(&self) -> &TextMatchEngine {
        &self.engine
    }

    pub fn session(&self) -> &Session<C> {
        &self.session
    }

    pub fn live_stats(&self) -> LiveStats {
        self.session.live_stats()
    }

    pub fn has_started(&self) -> bool {
        self.session.started_at_ms().is_some()
    }

    pub fn has_finished(&self) -> bool {
        self.session.is_finished()
    }

    pub fn start(&mut self) {
        self.session.start();
    }

    pub fn handle(&mut self, event: InputEvent) -> InputOutcome {
        if self.session.is_finished() {
            return InputOutcome::Rejected;
        }

        let outcome = match event {
            InputEvent::Char(' ') | InputEvent::WordBoundary => self.on_word_boundary(),
            InputEvent::Char(ch) => self.on_char(ch),
            InputEvent::Backspace => self.on_backspace(),
        };

        if !matches!(outcome, InputOutcome::Finished(_)) {
            self.session.refresh_live_stats();
        }
        outcome
    }

    fn on_char(&mut self, ch: char) -> InputOutcome {
        if self.engine.is_complete() {
            return InputOutcome::Finished(self.session.finish(FinishReason::Completed));
        }
        self.session.start();

        match self.engine.submit_character(ch) {
            Some(result) => {
                self.session.record_keystroke(result.matched);
                InputOutcome::Accepted
            }
            None => InputOutcome::Ignored,
        }
    }

    fn on_word_boundary(&mut self) -> InputOutcome {
        if self.engine.is_complete() {
            return InputOutcome::Finished(self.session.finish(FinishReason::Completed));
        }
        self.session.start();

        match self.engine.submit_word_boundary() {
            Some(result) if result.completed => {
                InputOutcome::Finished(self.session.finish(FinishReason::Completed))
            }
            Some(_) => InputOutcome::Accepted,
            None => InputOutcome::Ignored,
        }
    }

    fn on_backspace(&mut self) -> InputOutcome {
        match self.engine.submit_backspace() {
            BackspaceResult::NoOp => InputOutcome::Ignored,
            BackspaceResult::Moved => InputOutcome::Accepted,
            BackspaceResult::Cleared {
                was_correct,
                counted,
            } => {
                if counted {
                    self.session.undo_keystroke(was_correct);
                }
                InputOutcome::Accepted
            }
        }
    }

    pub fn poll_timer(&mut self) -> Option<TickResult> {
        self.session.poll_timer()
    }

    pub fn finish(&mut self, reason: FinishReason) -> SessionSummary {
        self.session.finish(reason)
    }

    pub fn publish(&self, sink: &mut dyn StatsSink) {
        sink.display(&self.session.live_stats());
    }
}

impl<C: Clock + Clone> Game<C> {
    /// Fresh board and session with the same configuration.
    pub fn reset<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let clock = self.session.clock().clone();
        // The config was validated when this game was built.
        if let Ok(session) = Session::new(&self.config, clock) {
            self.session = session;
        }
        self.engine.load_words(words);
        info!("game reset with {} words", self.engine.word_count());
    }

    /// Switch duration or word set. Refused while a run is in progress.
    pub fn reconfigure<I, S>(&mut self, config: Config, words: I) -> Result<bool, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.session.is_running() {
            return Ok(false);
        }
        let session = Session::new(&config, self.session.clock().clone())?;
        debug!("reconfigured: {:?}", config);
        self.config = config;
        self.session = session;
        self.engine.load_words(words);
        Ok(true)
    }
}
