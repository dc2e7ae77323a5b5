//! # focus-tab CLI Entry Point
//!
//! A calm start page for the terminal: a wallpaper, a slowly typed maxim and
//! a search box that opens results in the browser.
//!
//! ## Usage
//!
//! ```bash
//! # Start with the search box active
//! focus-tab
//!
//! # Start on the quote orb, searching with DuckDuckGo
//! focus-tab --idle --engine duckduckgo
//!
//! # No network, print search URLs on exit instead of opening them
//! focus-tab --offline --dry-run
//! ```
//!
//! ## Key Bindings
//!
//! ### Idle (quote orb)
//! - `Enter` / `/` / `Space` - Activate the search box
//! - `r` - Load a new wallpaper
//! - `q` - Quit
//!
//! ### Search box
//! - Type to edit the query, `Backspace` to delete
//! - `Up` / `Down` - Move through suggestions
//! - `Enter` - Search the query or the selected suggestion
//! - `Tab` - Open the engine menu (`Up` / `Down` / `Enter` inside it)
//! - `Esc` - Close the menu, or return to the quote orb
//!
//! `Ctrl+C` quits from anywhere.

use focus_tab::logging::{init_logging, LogConfig};
use focus_tab::quotes::{builtin_quotes, Typewriter, TypewriterTiming};
use focus_tab::remote::RemoteClient;
use focus_tab::runtime::Runtime;
use focus_tab::search::{
    BrowserNavigator, EngineId, EngineMenu, Navigator, RecordingNavigator, SearchBox,
};
use focus_tab::ui;
use focus_tab::ui::config::{Config, ConfigStore, MemoryStore, PreferenceStore};
use focus_tab::ui::theme::Theme;
use focus_tab::ui::App;
use focus_tab::wallpaper::WallpaperController;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io;
use std::panic;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Upper bound on how long the loop sleeps, so fetch results and the cursor
/// blink are picked up promptly.
const MAX_POLL: Duration = Duration::from_millis(100);

/// Trait for reading terminal events (allows dependency injection for testing)
trait EventReader {
    fn read_event(&mut self, timeout: Duration) -> Result<Option<Event>>;
}

/// Production event reader that uses crossterm's event polling + read
struct CrosstermEventReader;

impl EventReader for CrosstermEventReader {
    fn read_event(&mut self, timeout: Duration) -> Result<Option<Event>> {
        if event::poll(timeout).context("Failed to poll for events")? {
            Ok(Some(event::read().context("Failed to read terminal event")?))
        } else {
            Ok(None)
        }
    }
}

/// focus-tab - a quiet new-tab page for the terminal
#[derive(Parser, Debug)]
#[command(name = "focus-tab")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A calm terminal start page with quotes, wallpaper and web search", long_about = None)]
struct Args {
    /// Path to the config file (defaults to the platform config directory)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Search engine for this session, without changing the saved preference
    #[arg(short, long, value_name = "ID")]
    engine: Option<EngineId>,

    /// Start on the quote orb instead of the search box
    #[arg(long)]
    idle: bool,

    /// Do not contact quote, suggestion or wallpaper services
    #[arg(long)]
    offline: bool,

    /// Write logs to this file (defaults to the platform data directory)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Print search URLs on exit instead of opening a browser
    #[arg(long)]
    dry_run: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up panic hook to ensure terminal is restored on panic
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let result = run_application(args).await;

    // Restore panic hook
    let _ = panic::take_hook();

    result
}

/// Everything the event loop needs, assembled from config and flags.
struct Session {
    app: App,
    runtime: Runtime,
    start_focused: bool,
}

fn build_session(args: &Args, now: Instant) -> Result<Session> {
    let config_path = match &args.config {
        Some(path) => Some(path.clone()),
        None => match Config::default_path() {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!("no config directory, preferences will not persist: {e:#}");
                None
            }
        },
    };

    let config = match &config_path {
        Some(path) => Config::load_from(path)?,
        None => Config::default(),
    };
    let store: Box<dyn PreferenceStore> = match config_path {
        Some(path) => Box::new(ConfigStore::new(path, &config)),
        None => Box::new(MemoryStore::new()),
    };

    let theme = Theme::resolve(&config.theme);
    let search_box = SearchBox::new(EngineMenu::new(store, args.engine));

    let timing = TypewriterTiming {
        refresh_interval: Duration::from_secs(config.quote_refresh_secs),
        ..TypewriterTiming::default()
    };
    let typewriter =
        Typewriter::with_random_quote(builtin_quotes(), timing, StdRng::from_entropy(), now);

    let wallpaper = WallpaperController::new(config.endpoints.wallpaper.clone());

    let client = if args.offline {
        tracing::info!("offline mode, remote services disabled");
        None
    } else {
        match RemoteClient::new(config.endpoints.clone()) {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!("remote services unavailable: {e}");
                None
            }
        }
    };

    Ok(Session {
        app: App::new(theme, typewriter, search_box, wallpaper, now),
        runtime: Runtime::new(client),
        start_focused: config.start_focused && !args.idle,
    })
}

async fn run_application(args: Args) -> Result<()> {
    let log_config = LogConfig::from_verbosity(args.verbose)
        .with_log_file(args.log_file.clone().or_else(LogConfig::default_log_path));
    if let Err(e) = init_logging(&log_config) {
        eprintln!("Warning: Could not initialize logging: {e:#}");
    }

    let Session {
        mut app,
        mut runtime,
        start_focused,
    } = build_session(&args, Instant::now())?;

    let mut browser = BrowserNavigator;
    let mut recorder = RecordingNavigator::default();
    let navigator: &mut dyn Navigator = if args.dry_run {
        &mut recorder
    } else {
        &mut browser
    };

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode for terminal")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to setup terminal")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    app.start(start_focused, Instant::now());

    // Run the app and ensure cleanup happens even on error
    let mut event_reader = CrosstermEventReader;
    let run_result = run_app(
        &mut terminal,
        &mut app,
        &mut runtime,
        &mut event_reader,
        navigator,
    )
    .await;

    // Restore terminal (always runs, even if run_app failed)
    let cleanup_result = cleanup_terminal(&mut terminal);

    run_result?;
    cleanup_result?;

    for url in &recorder.opened {
        println!("{url}");
    }

    Ok(())
}

/// Clean up terminal state
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;

    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to restore terminal")?;

    terminal.show_cursor().context("Failed to show cursor")?;

    Ok(())
}

/// How long to wait for input before the next timer is due.
fn poll_timeout(next_wake: Option<Instant>, now: Instant) -> Duration {
    next_wake
        .map(|at| at.saturating_duration_since(now))
        .unwrap_or(MAX_POLL)
        .min(MAX_POLL)
}

async fn run_app<B>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runtime: &mut Runtime,
    event_reader: &mut dyn EventReader,
    navigator: &mut dyn Navigator,
) -> Result<()>
where
    B: Backend,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    loop {
        app.tick(Instant::now());
        runtime.dispatch_all(app.take_effects());
        for fetched in runtime.drain() {
            app.apply(fetched);
        }

        terminal
            .draw(|f| {
                app.prepare_frame(f.area());
                ui::render(f, app);
            })
            .context("Failed to draw terminal UI")?;

        let timeout = poll_timeout(app.next_wake(), Instant::now());
        let Some(event) = event_reader.read_event(timeout)? else {
            // Yield so spawned fetches make progress between frames.
            tokio::task::yield_now().await;
            continue;
        };

        let now = Instant::now();
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                app.on_key(key, now, navigator);
            }
            Event::Mouse(mouse) => app.on_mouse(mouse, now, navigator),
            Event::Resize(width, height) => app.on_resize(width, height),
            _ => {}
        }

        runtime.dispatch_all(app.take_effects());

        if app.should_quit {
            tracing::info!("quit requested");
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;
    use std::collections::VecDeque;

    /// Mock event reader for testing that returns a predetermined sequence of events
    struct MockEventReader {
        events: VecDeque<Event>,
    }

    impl MockEventReader {
        fn new(events: Vec<Event>) -> Self {
            Self {
                events: VecDeque::from(events),
            }
        }
    }

    impl EventReader for MockEventReader {
        fn read_event(&mut self, _timeout: Duration) -> Result<Option<Event>> {
            // Quit once the script runs out so a test can never spin forever.
            Ok(Some(self.events.pop_front().unwrap_or_else(|| {
                Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
            })))
        }
    }

    /// Helper to create a key event
    fn key_event(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::empty()))
    }

    fn offline_args(config: PathBuf) -> Args {
        Args::parse_from([
            "focus-tab",
            "--offline",
            "--config",
            config.to_str().expect("utf-8 path"),
        ])
    }

    #[test]
    fn test_mock_event_reader() {
        let mut reader = MockEventReader::new(vec![
            key_event(KeyCode::Char('a')),
            key_event(KeyCode::Enter),
        ]);

        assert!(matches!(
            reader.read_event(Duration::from_millis(10)).expect("event"),
            Some(Event::Key(KeyEvent {
                code: KeyCode::Char('a'),
                ..
            }))
        ));
        assert!(matches!(
            reader.read_event(Duration::from_millis(10)).expect("event"),
            Some(Event::Key(KeyEvent {
                code: KeyCode::Enter,
                ..
            }))
        ));
        // Exhausted script turns into Ctrl+C
        assert!(matches!(
            reader.read_event(Duration::from_millis(10)).expect("event"),
            Some(Event::Key(KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            }))
        ));
    }

    #[test]
    fn test_crossterm_event_reader_type() {
        let _reader: Box<dyn EventReader> = Box::new(CrosstermEventReader);
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["focus-tab"]);
        assert!(args.config.is_none());
        assert!(args.engine.is_none());
        assert!(!args.idle);
        assert!(!args.offline);
        assert!(!args.dry_run);
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn test_args_parsing_with_engine_and_flags() {
        let args = Args::parse_from([
            "focus-tab",
            "--engine",
            "bing",
            "--idle",
            "--dry-run",
            "-vv",
        ]);
        assert_eq!(args.engine, Some(EngineId::Bing));
        assert!(args.idle);
        assert!(args.dry_run);
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_args_rejects_unknown_engine() {
        assert!(Args::try_parse_from(["focus-tab", "--engine", "altavista"]).is_err());
    }

    #[test]
    fn test_poll_timeout_is_capped() {
        let now = Instant::now();
        assert_eq!(poll_timeout(None, now), MAX_POLL);
        assert_eq!(
            poll_timeout(Some(now + Duration::from_secs(5)), now),
            MAX_POLL
        );
        assert_eq!(
            poll_timeout(Some(now + Duration::from_millis(20)), now),
            Duration::from_millis(20)
        );
        assert_eq!(poll_timeout(Some(now), now + Duration::from_secs(1)), Duration::ZERO);
    }

    #[test]
    fn test_build_session_reads_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        let config = Config {
            start_focused: false,
            theme: "Nord".to_string(),
            ..Config::default()
        };
        config.save_to(&path).expect("save config");

        let session = build_session(&offline_args(path), Instant::now()).expect("session");
        assert!(!session.start_focused);
        assert_eq!(session.app.theme.name, "Nord");
        assert!(session.runtime.is_offline());
    }

    #[test]
    fn test_build_session_idle_flag_wins() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        let mut args = offline_args(path);
        args.idle = true;

        let session = build_session(&args, Instant::now()).expect("session");
        assert!(!session.start_focused);
    }

    #[test]
    fn test_build_session_rejects_broken_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").expect("write");

        assert!(build_session(&offline_args(path), Instant::now()).is_err());
    }

    #[tokio::test]
    async fn test_run_app_searches_and_quits() {
        let dir = tempfile::tempdir().expect("tempdir");
        let session = build_session(
            &offline_args(dir.path().join("config.json")),
            Instant::now(),
        )
        .expect("session");
        let Session {
            mut app,
            mut runtime,
            ..
        } = session;
        // Skip the focus settle so typed keys land in the input.
        app.start(true, Instant::now() - Duration::from_secs(1));

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).expect("terminal");
        let mut reader = MockEventReader::new(vec![
            key_event(KeyCode::Char('r')),
            key_event(KeyCode::Char('s')),
            key_event(KeyCode::Enter),
        ]);
        let mut navigator = RecordingNavigator::default();

        run_app(
            &mut terminal,
            &mut app,
            &mut runtime,
            &mut reader,
            &mut navigator,
        )
        .await
        .expect("run");

        assert!(app.should_quit);
        assert_eq!(navigator.opened.len(), 1);
        assert!(navigator.opened[0].contains("rs"));
    }

    #[tokio::test]
    async fn test_run_app_idle_quit_key() {
        let dir = tempfile::tempdir().expect("tempdir");
        let Session {
            mut app,
            mut runtime,
            ..
        } = build_session(
            &offline_args(dir.path().join("config.json")),
            Instant::now(),
        )
        .expect("session");
        app.start(false, Instant::now());

        let mut terminal = Terminal::new(TestBackend::new(60, 20)).expect("terminal");
        let mut reader = MockEventReader::new(vec![
            Event::Resize(60, 20),
            key_event(KeyCode::Char('x')),
            key_event(KeyCode::Char('q')),
        ]);
        let mut navigator = RecordingNavigator::default();

        run_app(
            &mut terminal,
            &mut app,
            &mut runtime,
            &mut reader,
            &mut navigator,
        )
        .await
        .expect("run");

        assert!(app.should_quit);
        assert!(!app.focus_mode);
        assert!(navigator.opened.is_empty());
    }
}
