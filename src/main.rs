mod ui;

use anyhow::{Context, Result};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use directories::ProjectDirs;
use env_logger::{Env, Target};
use log::{info, warn};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::PathBuf,
};

use typeflow::{
    clock::SystemClock,
    config::{Config, ConfigStore, FileConfigStore},
    runtime::{input_from_key, AppEvent, CrosstermEventSource, FixedTicker, Runner},
    stats::{LiveStats, StatsSink},
    word_source::{WordSource, WordSourceMode},
    Game,
};

/// minimal typing speed test with live wpm and accuracy
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A minimal typing speed test: type the words on the board, space moves to the next word, backspace corrects. Live net WPM and accuracy over a fixed time window."
)]
pub struct Cli {
    /// number of seconds to run the test
    #[clap(short = 'd', long)]
    duration: Option<u64>,

    /// where the words come from
    #[clap(short = 'm', long, value_enum)]
    mode: Option<WordSourceMode>,

    /// number of random words on the board
    #[clap(short = 'w', long)]
    number_of_words: Option<usize>,

    /// config file to read and save preferences (defaults to the platform config dir)
    #[clap(long)]
    config: Option<PathBuf>,

    /// seed for word selection, for reproducible boards
    #[clap(long)]
    seed: Option<u64>,
}

impl Cli {
    /// Command-line flags take precedence over stored preferences.
    fn apply(&self, stored: Config) -> Config {
        Config {
            duration_secs: self.duration.unwrap_or(stored.duration_secs),
            mode: self.mode.unwrap_or(stored.mode),
            number_of_words: self.number_of_words.unwrap_or(stored.number_of_words),
        }
    }

    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }
}

/// Latest live statistics as handed over by the game.
#[derive(Debug, Clone, Copy)]
pub struct Scoreboard {
    pub stats: LiveStats,
}

impl Default for Scoreboard {
    fn default() -> Self {
        Self {
            stats: LiveStats {
                remaining_seconds: Config::default().duration_secs,
                net_wpm: 0,
                accuracy_percent: 100,
                total_keystrokes: 0,
            },
        }
    }
}

impl StatsSink for Scoreboard {
    fn display(&mut self, stats: &LiveStats) {
        self.stats = *stats;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyAction {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct App {
    pub game: Game<SystemClock>,
    pub scoreboard: Scoreboard,
    source: WordSource,
    rng: StdRng,
    store: Option<FileConfigStore>,
}

impl App {
    pub fn new(config: Config, store: Option<FileConfigStore>, seed: Option<u64>) -> Result<Self> {
        config.validate()?;
        let source = WordSource::embedded()?;
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let words = source.select(config.mode, config.number_of_words, &mut rng);
        let game = Game::new(config, words, SystemClock::new())?;

        let mut app = Self {
            game,
            scoreboard: Scoreboard::default(),
            source,
            rng,
            store,
        };
        app.refresh_scoreboard();
        Ok(app)
    }

    /// App with a fixed board, no config persistence.
    #[cfg(test)]
    pub fn with_words(config: Config, words: &[&str]) -> Result<Self> {
        let mut app = Self::new(config.clone(), None, Some(0))?;
        app.game = Game::new(config, words.iter().copied(), SystemClock::new())?;
        app.refresh_scoreboard();
        Ok(app)
    }

    pub fn refresh_scoreboard(&mut self) {
        self.game.publish(&mut self.scoreboard);
    }

    fn deal(&mut self, config: &Config) -> Vec<String> {
        self.source
            .select(config.mode, config.number_of_words, &mut self.rng)
    }

    /// New words, same settings.
    pub fn reset(&mut self) {
        let config = self.game.config().clone();
        let words = self.deal(&config);
        self.game.reset(words);
        self.refresh_scoreboard();
    }

    /// Apply new preferences; only honoured before the first keystroke.
    fn change_config(&mut self, config: Config) -> Result<()> {
        if self.game.has_started() {
            return Ok(());
        }
        let words = self.deal(&config);
        if self.game.reconfigure(config.clone(), words)? {
            if let Some(store) = &self.store {
                if let Err(e) = store.save(&config) {
                    warn!("failed to save config to {:?}: {}", store.path(), e);
                }
            }
        }
        self.refresh_scoreboard();
        Ok(())
    }

    fn on_key(&mut self, key: KeyEvent) -> Result<KeyAction> {
        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
        {
            return Ok(KeyAction::Quit);
        }

        let started = self.game.has_started();
        let finished = self.game.has_finished();
        let config = self.game.config().clone();

        match key.code {
            KeyCode::Left => self.reset(),
            KeyCode::Right if finished => self.reset(),
            KeyCode::Right if !started => self.change_config(Config {
                mode: config.mode.toggled(),
                ..config
            })?,
            KeyCode::Up if !started => self.change_config(Config {
                duration_secs: config.next_duration(),
                ..config
            })?,
            KeyCode::Down if !started => self.change_config(Config {
                duration_secs: config.prev_duration(),
                ..config
            })?,
            _ => {
                if let Some(input) = input_from_key(&key) {
                    self.game.handle(input);
                    self.refresh_scoreboard();
                }
            }
        }
        Ok(KeyAction::Continue)
    }

    fn on_tick(&mut self) {
        if self.game.poll_timer().is_some() {
            self.refresh_scoreboard();
        }
    }
}

fn init_logging() {
    let Some(dir) = ProjectDirs::from("", "", "typeflow").map(|pd| pd.data_local_dir().to_path_buf())
    else {
        return;
    };
    if fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("typeflow.log"))
    else {
        return;
    };

    // The terminal is in the alternate screen, so logs go to a file.
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging();

    let store = cli.config_store();
    let config = cli.apply(store.load());
    let mut app = App::new(config, Some(store), cli.seed).context("failed to set up typing test")?;
    info!("starting with {:?}", app.game.config());

    enable_raw_mode().context("failed to enable raw mode")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    // Always try to restore terminal state.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    loop {
        terminal.draw(|f| ui(app, f))?;

        match runner.step() {
            AppEvent::Tick => app.on_tick(),
            AppEvent::Resize => {}
            AppEvent::Key(key) => {
                if app.on_key(key)? == KeyAction::Quit {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}
