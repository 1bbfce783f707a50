use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use voipwatch::data::duration::parse_duration;
use voipwatch::ui::{self, boundary, Theme};
use voipwatch::{events, App, CallLogEntry, HttpFetcher, PollingSource, QosMetric, Settings};

/// How often the UI redraws when no input arrives.
const TICK: Duration = Duration::from_millis(100);

#[derive(Parser, Debug)]
#[command(name = "voipwatch")]
#[command(about = "Terminal dashboard for monitoring live VoIP calls and QoS metrics")]
struct Args {
    /// Base URL of the VoIP backend (e.g. http://localhost:8000)
    #[arg(short, long, env = "VOIPWATCH_BACKEND_URL")]
    backend_url: Option<String>,

    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Call log polling interval (e.g., "3s", "500ms")
    #[arg(long)]
    calls_interval: Option<String>,

    /// QoS metrics polling interval (e.g., "5s")
    #[arg(long)]
    qos_interval: Option<String>,

    /// Per-request timeout (e.g., "5s")
    #[arg(short, long)]
    timeout: Option<String>,

    /// Number of call log rows to show
    #[arg(short, long)]
    rows: Option<usize>,

    /// Write logs to this file (the terminal is reserved for the dashboard)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let settings = resolve_settings(&args)?;

    if let Some(ref path) = args.log_file {
        init_logging(path)?;
    }

    // Polling runs on the runtime while the TUI owns the main thread
    let rt = tokio::runtime::Runtime::new()?;
    let _guard = rt.enter();

    let fetcher = HttpFetcher::new(settings.backend_url.clone(), settings.request_timeout())?;
    let calls = PollingSource::<CallLogEntry>::start(
        fetcher.clone(),
        settings.calls.path.clone(),
        settings.calls.interval(),
    );
    let qos = PollingSource::<QosMetric>::start(
        fetcher,
        settings.qos.path.clone(),
        settings.qos.interval(),
    );
    info!(backend = %settings.backend_url, "dashboard started");

    let app = App::new(Box::new(calls), Box::new(qos))
        .with_backend_url(settings.backend_url.clone())
        .with_table_rows(settings.table_rows)
        .with_theme(Theme::auto_detect());

    run_tui(app)
}

/// Load layered settings, then apply command-line overrides.
fn resolve_settings(args: &Args) -> Result<Settings> {
    let mut settings = Settings::load(args.config.as_deref())?;

    if let Some(ref url) = args.backend_url {
        settings.backend_url = url.clone();
    }
    if let Some(ref interval) = args.calls_interval {
        settings.calls.interval_ms = millis(interval, "--calls-interval")?;
    }
    if let Some(ref interval) = args.qos_interval {
        settings.qos.interval_ms = millis(interval, "--qos-interval")?;
    }
    if let Some(ref timeout) = args.timeout {
        settings.request_timeout_ms = millis(timeout, "--timeout")?;
    }
    if let Some(rows) = args.rows {
        settings.table_rows = rows;
    }

    settings.validate()?;
    Ok(settings)
}

fn millis(value: &str, flag: &str) -> Result<u64> {
    let duration = parse_duration(value).with_context(|| format!("invalid {}", flag))?;
    Ok(duration.as_millis() as u64)
}

fn init_logging(path: &Path) -> Result<()> {
    use tracing_subscriber::EnvFilter;

    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Run the TUI until the user quits
fn run_tui(mut app: App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Restore the terminal on panics the render boundary does not catch
    boundary::install_panic_hook(restore_terminal);

    let result = run_app(&mut terminal, &mut app);

    // Stop polling before the runtime goes away
    app.quit();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while app.running {
        app.refresh();
        terminal.draw(|frame| ui::render(frame, app))?;

        if let Some(Event::Key(key)) = events::poll_event(TICK)? {
            events::handle_key_event(app, key);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_settings() {
        let args = Args::parse_from([
            "voipwatch",
            "--backend-url",
            "http://pbx:9000",
            "--calls-interval",
            "1s",
            "--timeout",
            "750ms",
            "--rows",
            "8",
        ]);
        let settings = resolve_settings(&args).unwrap();
        assert_eq!(settings.backend_url, "http://pbx:9000");
        assert_eq!(settings.calls.interval_ms, 1000);
        assert_eq!(settings.request_timeout_ms, 750);
        assert_eq!(settings.table_rows, 8);
    }

    #[test]
    fn test_bad_interval_rejected() {
        let args = Args::parse_from(["voipwatch", "--qos-interval", "soon"]);
        assert!(resolve_settings(&args).is_err());

        let args = Args::parse_from(["voipwatch", "--rows", "0"]);
        assert!(resolve_settings(&args).is_err());
    }
}
