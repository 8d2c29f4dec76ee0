pub mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use repflow::{
    celebration::Celebration,
    config::{Config, ConfigStore, FileConfigStore},
    plan::{self, CsvPlanProvider, PlanProvider, PlanSource, SqlitePlanStore},
    rest_timer::{RestTimer, TickScheduler},
    runtime::{
        CrosstermEventSource, FixedTicker, Runner, RuntimeEvent, RuntimeEventSource,
        ThreadTickScheduler, Ticker,
    },
    session::{SessionEngine, SessionPhase, SessionSignal},
    SessionQueue,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{info, warn};
use webbrowser::Browser;

const TICK_RATE_MS: u64 = 100;

/// guided workout sessions in the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Walks you through a workout plan one exercise at a time: tick off sets, rest between them, and watch the session progress."
)]
pub struct Cli {
    /// plan to run (defaults to the configured plan)
    #[clap(short = 'p', long)]
    plan: Option<String>,

    /// where plans come from
    #[clap(short = 'S', long, value_enum)]
    source: Option<PlanSource>,

    /// plan file: the CSV sheet for --source csv, the library database for --source sqlite
    #[clap(short = 'f', long)]
    file: Option<PathBuf>,

    /// seconds of rest after each completed set
    #[clap(short = 'r', long)]
    rest_secs: Option<u64>,

    /// list available plans and exit
    #[clap(short = 'l', long)]
    list: bool,

    /// import every plan in a CSV sheet into the plan library and exit
    #[clap(long, value_name = "CSV")]
    import_csv: Option<PathBuf>,

    /// write the effective settings back to the config file
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Layer command line overrides on top of the stored config
    fn apply_to(&self, mut config: Config) -> Config {
        if let Some(plan) = &self.plan {
            config.default_plan = plan.clone();
        }
        if let Some(source) = self.source {
            config.plan_source = source;
        }
        if let Some(file) = &self.file {
            config.plan_file = Some(file.clone());
        }
        if let Some(rest) = self.rest_secs {
            config.rest_secs = rest;
        }
        config
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Workout,
    Finished,
    Empty,
}

impl From<SessionPhase> for AppState {
    fn from(phase: SessionPhase) -> Self {
        match phase {
            SessionPhase::Active => AppState::Workout,
            SessionPhase::Finished => AppState::Finished,
            SessionPhase::Empty => AppState::Empty,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyOutcome {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct App {
    pub config: Config,
    pub plan_id: String,
    pub plan_title: String,
    pub engine: SessionEngine,
    pub celebration: Celebration,
    /// set when a rest ran out, cleared by the next key press
    pub rest_over: bool,
    pub viewport: (u16, u16),
}

impl App {
    pub fn new(
        config: Config,
        plan_title: String,
        queue: SessionQueue,
        scheduler: Box<dyn TickScheduler>,
    ) -> Self {
        let timer = RestTimer::with_interval(scheduler, config.tick_interval());
        let engine = SessionEngine::new(queue, config.session_config(), timer);

        Self {
            plan_id: config.default_plan.clone(),
            plan_title,
            config,
            engine,
            celebration: Celebration::new(),
            rest_over: false,
            viewport: (80, 24),
        }
    }

    pub fn state(&self) -> AppState {
        self.engine.phase().into()
    }

    pub fn restart(&mut self) {
        self.engine.restart();
        self.celebration.stop();
        self.rest_over = false;
    }

    fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyOutcome::Quit;
        }

        self.rest_over = false;
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return KeyOutcome::Quit,
            KeyCode::Char('r') => self.restart(),
            _ if self.state() == AppState::Workout => self.handle_workout_key(key.code),
            _ => {}
        }

        self.process_signals();
        KeyOutcome::Continue
    }

    fn handle_workout_key(&mut self, code: KeyCode) {
        let step = self.config.extend_step_secs as i64;
        match code {
            KeyCode::Char(c @ '1'..='9') => {
                let set = c as usize - '1' as usize;
                if set < self.engine.set_vector().len() {
                    self.engine.toggle_set(set);
                }
            }
            KeyCode::Char('n') | KeyCode::Enter => {
                self.engine.advance();
            }
            KeyCode::Char('s') => self.engine.skip_rest(),
            KeyCode::Char('+') | KeyCode::Char('=') => self.engine.extend_rest(step),
            KeyCode::Char('-') => self.engine.extend_rest(-step),
            KeyCode::Char('m') => self.open_media(),
            _ => {}
        }
    }

    fn open_media(&self) {
        let Some(media) = self.engine.current_exercise().and_then(|e| e.media.as_deref()) else {
            return;
        };
        if Browser::is_available() {
            if let Err(e) = webbrowser::open(media) {
                warn!(%media, error = %e, "could not open demonstration");
            }
        }
    }

    fn on_rest_tick(&mut self, generation: u64) {
        self.engine.on_rest_tick(generation);
        self.process_signals();
    }

    fn on_tick(&mut self) {
        self.celebration.update(TICK_RATE_MS as f64 / 1000.0);
    }

    fn process_signals(&mut self) {
        for signal in self.engine.take_signals() {
            match signal {
                SessionSignal::RestExpired => self.rest_over = true,
                SessionSignal::SessionComplete => {
                    let (width, height) = self.viewport;
                    self.celebration.start(width, height);
                }
            }
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    repflow::logging::init();

    let store = FileConfigStore::new();
    let config = cli.apply_to(store.load());
    if cli.save_config {
        store.save(&config)?;
        info!(path = %store.path().display(), "config saved");
    }

    if let Some(csv_path) = &cli.import_csv {
        return import_csv(csv_path, cli.file.as_deref());
    }

    let provider = plan::open_provider(config.plan_source, config.plan_file.as_deref())?;

    if cli.list {
        for summary in provider.list_plans()? {
            println!(
                "{:<16} {:<28} {} exercises, {} sets",
                summary.id, summary.title, summary.exercise_count, summary.total_sets
            );
        }
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let queue = provider.load_queue(&config.default_plan)?;
    let plan_title = provider
        .find_plan(&config.default_plan)?
        .map(|p| p.title)
        .unwrap_or_else(|| config.default_plan.clone());
    info!(plan = %config.default_plan, source = %config.plan_source, "starting session");

    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    let scheduler = ThreadTickScheduler::new(runner.sender());

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, plan_title, queue, Box::new(scheduler));
    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    result
}

fn import_csv(csv_path: &Path, library: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let plans = CsvPlanProvider::new(csv_path).read_plans()?;
    let mut store = match library {
        Some(path) => SqlitePlanStore::open(path)?,
        None => SqlitePlanStore::open_default()?,
    };
    for plan in &plans {
        store.import_plan(plan)?;
        println!("imported {} ({} exercises)", plan.id, plan.exercises.len());
    }
    Ok(())
}

fn start_tui<B: Backend, E: RuntimeEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    let size = terminal.size()?;
    app.viewport = (size.width, size.height);
    terminal.draw(|f| ui(app, f))?;

    loop {
        match runner.step() {
            RuntimeEvent::Tick => {
                app.on_tick();
                if app.celebration.is_active {
                    terminal.draw(|f| ui(app, f))?;
                }
            }
            RuntimeEvent::RestTick(generation) => {
                app.on_rest_tick(generation);
                terminal.draw(|f| ui(app, f))?;
            }
            RuntimeEvent::Resize => {
                let size = terminal.size()?;
                app.viewport = (size.width, size.height);
                terminal.draw(|f| ui(app, f))?;
            }
            RuntimeEvent::Key(key) => {
                if app.handle_key(key) == KeyOutcome::Quit {
                    break;
                }
                terminal.draw(|f| ui(app, f))?;
            }
        }
    }

    Ok(())
}

fn ui(app: &mut App, f: &mut Frame) {
    ui::screen::current_screen(app.state()).render(app, f);
}
