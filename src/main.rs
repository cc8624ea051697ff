mod ui;

use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::{Path, PathBuf},
    time::Instant,
};

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyModifiers, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use env_logger::{Env, Target};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Rect, Size},
    Frame, Terminal,
};

use numtap::{
    app_dirs::AppDirs,
    celebration::Celebration,
    config::{Config, ConfigStore, FileConfigStore},
    device::DeviceClass,
    placement::SeededShuffler,
    runtime::{CrosstermEventSource, FixedTicker, GameEvent, Runner},
    scores::FileKeyValueStore,
    Difficulty, GameController, GameScreen, TapOutcome, MODES,
};

/// tap the numbers in order as fast as you can
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A reaction game for the terminal: numbers are scattered over a board and you tap them in ascending order with the mouse (or the number keys) while the clock runs. Best times are kept per mode."
)]
pub struct Cli {
    /// treat the terminal as touch-primary: mouse taps only, digit keys are ignored
    #[clap(long)]
    touch: bool,

    /// refresh interval of the timer readout in milliseconds
    #[clap(long)]
    tick_ms: Option<u64>,

    /// how long the "wrong number" flash stays up, in milliseconds
    #[clap(long)]
    feedback_ms: Option<u64>,

    /// seed the board shuffle so layouts are reproducible
    #[clap(long)]
    seed: Option<u64>,

    /// directory for the score file and the log (default: ~/.local/state/numtap)
    #[clap(long)]
    data_dir: Option<PathBuf>,

    /// save the effective settings to the config file before starting
    #[clap(long)]
    write_config: bool,
}

impl Cli {
    /// Layer the command line flags over settings read from disk
    fn apply(&self, mut config: Config) -> Config {
        if self.touch {
            config.touch = true;
        }
        if let Some(ms) = self.tick_ms {
            config.tick_ms = ms;
        }
        if let Some(ms) = self.feedback_ms {
            config.feedback_ms = ms;
        }
        config
    }
}

/// What the event loop should do after handling an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

pub struct App {
    pub game: GameController,
    pub device: DeviceClass,
    /// Highlighted row on the menu
    pub menu_index: usize,
    pub celebration: Celebration,
    pub terminal_size: Size,
}

impl App {
    pub fn new(game: GameController, device: DeviceClass) -> Self {
        Self {
            game,
            device,
            menu_index: 0,
            celebration: Celebration::new(),
            terminal_size: Size::new(80, 24),
        }
    }

    pub fn on_resize(&mut self, width: u16, height: u16) {
        self.terminal_size = Size::new(width, height);
    }

    /// Advance timers and animation by `dt` seconds. True when a redraw is due.
    pub fn on_tick(&mut self, dt: f64) -> bool {
        let mut redraw = self.game.on_tick();
        if self.celebration.is_active {
            self.celebration.update(dt);
            redraw = true;
        }
        redraw
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Control {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Control::Quit;
        }

        match self.game.screen() {
            GameScreen::Menu => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => return Control::Quit,
                KeyCode::Up | KeyCode::Char('k') => {
                    self.menu_index = self.menu_index.checked_sub(1).unwrap_or(MODES.len() - 1);
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.menu_index = (self.menu_index + 1) % MODES.len();
                }
                KeyCode::Enter | KeyCode::Char(' ') => {
                    self.game.select_mode(MODES[self.menu_index]);
                }
                KeyCode::Char(c @ '1'..='9') => {
                    let idx = (c as u8 - b'1') as usize;
                    if let Some(mode) = MODES.get(idx) {
                        self.menu_index = idx;
                        self.game.select_mode(*mode);
                    }
                }
                _ => {}
            },
            GameScreen::Difficulty(_) => match key.code {
                KeyCode::Char('1') | KeyCode::Left => {
                    self.game.choose_difficulty(Difficulty::Small);
                }
                KeyCode::Char('2') | KeyCode::Right => {
                    self.game.choose_difficulty(Difficulty::Large);
                }
                KeyCode::Esc | KeyCode::Char('b') | KeyCode::Backspace => {
                    self.game.menu();
                }
                _ => {}
            },
            GameScreen::Playing => match key.code {
                KeyCode::Esc => {
                    self.game.menu();
                }
                KeyCode::Char(c) if c.is_ascii_digit() && self.device.accepts_keyboard_taps() => {
                    let outcome = self.game.tap(c as u32 - '0' as u32);
                    self.after_tap(outcome);
                }
                KeyCode::Enter | KeyCode::Char(' ') if self.device.accepts_keyboard_taps() => {
                    let outcome = self.game.confirm();
                    self.after_tap(outcome);
                }
                _ => {}
            },
            GameScreen::Finished => match key.code {
                KeyCode::Char('q') => return Control::Quit,
                KeyCode::Char('r') | KeyCode::Enter => {
                    self.celebration.stop();
                    self.game.replay();
                }
                KeyCode::Char('m') | KeyCode::Esc => {
                    self.celebration.stop();
                    self.game.menu();
                }
                _ => {}
            },
        }

        Control::Continue
    }

    /// Left clicks on the board are taps on whatever target sits under them
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        if self.game.screen() != GameScreen::Playing {
            return;
        }
        let Some(session) = self.game.session() else {
            return;
        };

        let area = Rect::new(0, 0, self.terminal_size.width, self.terminal_size.height);
        let board = ui::layout::play_area(area);
        if let Some(value) =
            ui::layout::target_at(board, &session.targets, mouse.column, mouse.row)
        {
            let outcome = self.game.tap(value);
            self.after_tap(outcome);
        }
    }

    fn after_tap(&mut self, outcome: TapOutcome) {
        if let TapOutcome::Completed(done) = outcome {
            if done.is_new_record {
                self.celebration
                    .start(self.terminal_size.width, self.terminal_size.height);
            }
        }
    }
}

fn init_logging(data_dir: &Path) -> io::Result<()> {
    fs::create_dir_all(data_dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(AppDirs::log_path(data_dir))?;

    // stderr belongs to the TUI
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .try_init()
        .map_err(io::Error::other)
}

/// Pixel width of the terminal window, when the terminal reports one
fn viewport_width() -> u32 {
    match terminal::window_size() {
        Ok(size) if size.width > 0 => size.width as u32,
        _ => u32::MAX,
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let data_dir = AppDirs::data_dir(cli.data_dir.as_deref());
    if let Err(e) = init_logging(&data_dir) {
        eprintln!("logging disabled: {}", e);
    }

    let config_store = FileConfigStore::new();
    let config = cli.apply(config_store.load());
    if cli.write_config {
        config_store.save(&config)?;
        log::info!("config written to {}", config_store.path().display());
    }

    let mut game = GameController::new(Box::new(FileKeyValueStore::new(&data_dir)), &config);
    if let Some(seed) = cli.seed {
        game = game.with_shuffler(SeededShuffler::new(seed));
    }
    let device = DeviceClass::detect(viewport_width(), config.touch);
    log::info!("starting with {:?} input, data in {}", device, data_dir.display());

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(game, device);
    app.terminal_size = terminal.size()?;
    let result = start_tui(&mut terminal, &mut app, &config);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    config: &Config,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(config.tick_interval()),
    );
    let mut last_tick = Instant::now();

    terminal.draw(|f| ui(app, f))?;

    loop {
        let redraw = match runner.step() {
            GameEvent::Tick => {
                let now = Instant::now();
                let dt = now.duration_since(last_tick).as_secs_f64();
                last_tick = now;
                app.on_tick(dt)
            }
            GameEvent::Resize(width, height) => {
                app.on_resize(width, height);
                true
            }
            GameEvent::Key(key) => {
                if app.handle_key(key) == Control::Quit {
                    break;
                }
                true
            }
            GameEvent::Mouse(mouse) => {
                app.handle_mouse(mouse);
                true
            }
        };

        if redraw {
            terminal.draw(|f| ui(app, f))?;
        }
    }

    log::info!("quit");
    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}
