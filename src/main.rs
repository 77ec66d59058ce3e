mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use cybertype::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    controller::Controller,
    logging,
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    samples::SamplePool,
};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Instant,
};

/// sixty second typing speed test with live wpm, accuracy and a letter grade
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type the passage on screen as fast and as accurately as you can. The clock starts on your first keystroke and runs for sixty seconds; you get words per minute, accuracy and a grade from S to D."
)]
pub struct Cli {
    /// seed for picking the sample text (random when omitted)
    #[clap(long)]
    seed: Option<u64>,

    /// hide wpm and accuracy while typing
    #[clap(long)]
    hide_live_stats: bool,

    /// path to the config file (defaults to the platform config dir)
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// log filter, e.g. "debug" or "cybertype=trace" (overrides config)
    #[clap(long)]
    log_level: Option<String>,
}

impl Cli {
    fn config_store(&self) -> FileConfigStore {
        self.config
            .as_ref()
            .map(FileConfigStore::with_path)
            .unwrap_or_default()
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppState {
    Typing,
    Results,
}

#[derive(Debug)]
pub struct App {
    pub controller: Controller<StdRng>,
    pub state: AppState,
    pub show_live_stats: bool,
}

impl App {
    pub fn new(controller: Controller<StdRng>, show_live_stats: bool) -> Self {
        Self {
            controller,
            state: AppState::Typing,
            show_live_stats,
        }
    }

    pub fn reset(&mut self) {
        self.controller.reset();
        self.state = AppState::Typing;
    }

    /// Advance the countdown. Returns true when the screen needs a redraw.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        let was_running = self.controller.countdown().is_armed();
        self.controller.poll_timer(now);
        self.sync_state();
        was_running
    }

    /// Returns false when the user asked to quit.
    ///
    /// A steady key stream never lets the runner time out into a Tick, so
    /// every key first brings the clock up to `now`. The key is still
    /// dispatched against the screen it was typed on.
    pub fn on_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if self.state == AppState::Typing {
            self.controller.poll_timer(now);
        }

        match key.code {
            KeyCode::Esc => return false,
            KeyCode::Char('c') if ctrl => return false,
            KeyCode::Char('r') if ctrl => self.reset(),
            _ => match self.state {
                AppState::Typing => match key.code {
                    KeyCode::Char(c) if !ctrl => self.controller.push_char(c, now),
                    KeyCode::Backspace => self.controller.backspace(now),
                    _ => {}
                },
                AppState::Results => {
                    if key.code == KeyCode::Char('r') {
                        self.reset();
                    }
                }
            },
        }

        self.sync_state();
        true
    }

    fn sync_state(&mut self) {
        if self.controller.session().has_finished() {
            self.state = AppState::Results;
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = cli.config_store();
    let config = load_or_create_config(&store);

    let level = cli.log_level.clone().unwrap_or(config.log_level.clone());
    let _log_guard = match logging::init(&level, &AppDirs::log_dir()) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("logging disabled: {err}");
            None
        }
    };

    let pool = SamplePool::embedded()?;
    tracing::info!(pool = %pool.name, texts = pool.len(), seed = ?cli.seed, "starting");
    let controller = Controller::new(pool, cli.rng());
    let mut app = App::new(controller, config.show_live_stats && !cli.hide_live_stats);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        tracing::error!(%err, "ui loop failed");
    }
    result
}

fn load_or_create_config(store: &FileConfigStore) -> Config {
    let config = store.load();
    if !store.path().exists() {
        // write defaults so there is a file to edit
        if let Err(err) = store.save(&config) {
            eprintln!("unable to write default config: {err}");
        }
    }
    config
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    terminal.draw(|f| ui(app, f))?;

    loop {
        match runner.step() {
            AppEvent::Tick => {
                if app.on_tick(Instant::now()) {
                    terminal.draw(|f| ui(app, f))?;
                }
            }
            AppEvent::Resize => {
                app.on_tick(Instant::now());
                terminal.draw(|f| ui(app, f))?;
            }
            AppEvent::Key(key) => {
                if !app.on_key(key, Instant::now()) {
                    break;
                }
                terminal.draw(|f| ui(app, f))?;
            }
        }
    }

    Ok(())
}

fn ui(app: &mut App, f: &mut Frame) {
    ui::screen::current_screen(&app.state).render(app, f);
}
