use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::runtime::Runtime;
use tracing::info;

use healwatch::{
    channel, events, ui, App, Dispatcher, ReportingClient, Scheduler, Settings, TargetClient,
};

#[derive(Parser, Debug)]
#[command(name = "healwatch")]
#[command(about = "Telemetry console for a self-healing service demonstration")]
#[command(version)]
struct Args {
    /// Config file (TOML, JSON or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the reporting API
    #[arg(long)]
    api_url: Option<String>,

    /// Base URL of the observed target
    #[arg(long)]
    target_url: Option<String>,

    /// Telemetry poll interval in milliseconds
    #[arg(long)]
    poll_interval: Option<u64>,

    /// Target health probe interval in milliseconds
    #[arg(long)]
    probe_interval: Option<u64>,

    /// Per-request timeout in milliseconds (default: none)
    #[arg(long)]
    timeout: Option<u64>,

    /// Write diagnostics to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    /// Layer command-line flags over the loaded settings.
    fn apply(self, settings: &mut Settings) {
        if let Some(url) = self.api_url {
            settings.api_url = url;
        }
        if let Some(url) = self.target_url {
            settings.target_url = url;
        }
        if let Some(ms) = self.poll_interval {
            settings.poll_interval_ms = ms;
        }
        if let Some(ms) = self.probe_interval {
            settings.probe_interval_ms = ms;
        }
        if let Some(ms) = self.timeout {
            settings.request_timeout_ms = Some(ms);
        }
        if let Some(path) = self.log_file {
            settings.log_file = Some(path);
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    args.apply(&mut settings);
    settings.validate()?;

    if let Some(ref path) = settings.log_file {
        init_logging(path)?;
    }
    info!(
        version = env!("CARGO_PKG_VERSION"),
        api = %settings.api_url,
        target_url = %settings.target_url,
        "Starting healwatch"
    );

    // The TUI runs on the main thread while the runtime drives the network
    let rt = Runtime::new()?;
    run_tui(&rt, &settings)
}

/// Send tracing output to `path`. The terminal belongs to the UI.
fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("healwatch=info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Run the TUI against the configured endpoints
fn run_tui(rt: &Runtime, settings: &Settings) -> Result<()> {
    let timeout = settings.request_timeout();
    let reporting = ReportingClient::new(&settings.api_url, timeout)?;
    let target = TargetClient::new(&settings.target_url, timeout)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    // Background work starts with the dashboard and stops with it
    let (tx, rx) = channel();
    let scheduler = Scheduler::start(
        rt.handle(),
        reporting.clone(),
        target.clone(),
        settings.cadence(),
        tx.clone(),
    );
    let dispatcher = Dispatcher::new(reporting, target, rt.handle().clone(), tx);
    let mut app = App::new(
        dispatcher,
        scheduler.trigger(),
        rx,
        &settings.api_url,
        &settings.target_url,
        ui::Theme::auto_detect(),
    );

    // Run the main loop
    let result = run_app(&mut terminal, &mut app);

    drop(scheduler);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while app.running {
        app.drain_updates();

        // Draw UI
        terminal.draw(|frame| ui::render(frame, app))?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse),
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }
    }

    info!("Shutting down");
    Ok(())
}
