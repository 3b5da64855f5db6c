//! tubetui - terminal audio player for a video catalog
//!
//! # Usage
//!
//! ```bash
//! # Launch interactive TUI
//! tubetui
//!
//! # CLI mode (for automation)
//! tubetui search "lofi hip hop"
//! tubetui resolve dQw4w9WgXcQ --json
//! ```

use std::io::{stdout, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use tracing::{error, info};

use tubetui::app::{App, Settings};
use tubetui::cli::{Cli, Command, ExitCode, Output};
use tubetui::config::Config;
use tubetui::stream::{MpvEngine, MpvOptions};
use tubetui::worker::Workers;
use tubetui::{commands, logging, ui, HttpThumbnailFetcher, YtDlpClient};

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };

    // logging is best effort; the app works without a writable cache dir
    let guard = logging::init_logging(config.log_filter.as_deref()).ok();

    if cli.is_cli_mode() {
        // CLI mode: execute command and exit
        let exit_code = run_cli(cli, config).await;
        drop(guard);
        std::process::exit(exit_code.into());
    } else {
        // TUI mode: launch interactive interface
        let result = run_tui(config).await;
        if let Err(e) = &result {
            error!(error = %e, "tui exited with error");
        }
        result
    }
}

/// Run CLI command and return exit code
async fn run_cli(cli: Cli, config: Config) -> ExitCode {
    let output = Output::new(&cli);
    let catalog = YtDlpClient::new(config.ytdlp_path());

    match cli.command {
        Some(Command::Search(cmd)) => commands::search_cmd(cmd, &catalog, &config, &output).await,

        Some(Command::Resolve(cmd)) => commands::resolve_cmd(cmd, &catalog, &output).await,

        Some(Command::Config(cmd)) => {
            commands::config_cmd(cmd, &config, cli.config.as_deref(), &output)
        }

        None => ExitCode::Success,
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run interactive TUI
async fn run_tui(config: Config) -> Result<()> {
    // Start the engine before taking over the terminal so failures print normally
    let engine = MpvEngine::spawn(&MpvOptions {
        binary: config.mpv_path(),
        initial_volume: config.initial_volume(),
    })
    .await
    .context("starting mpv")?;

    let catalog = Arc::new(YtDlpClient::new(config.ytdlp_path()));
    let fetcher = Arc::new(HttpThumbnailFetcher::new());
    let (workers, events) = Workers::new(catalog, fetcher);

    let mut app = App::new(
        Box::new(engine),
        workers,
        events,
        Settings::from_config(&config),
    );
    info!("tui started");

    let mut terminal = init_terminal()?;

    let result = run_event_loop(&mut terminal, &mut app).await;

    // Always restore terminal, even on error
    restore_terminal(&mut terminal)?;

    result
}

/// Main event loop - handles input, drains worker results, ticks progress
async fn run_event_loop(terminal: &mut Tui, app: &mut App) -> Result<()> {
    const INPUT_POLL: Duration = Duration::from_millis(50);

    while app.running {
        let size = terminal.size()?;
        app.prefetch_visible(ui::visible_result_rows(Rect::new(0, 0, size.width, size.height)));

        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(INPUT_POLL)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (ignore releases on Windows)
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        app.drain_worker_events();
        app.on_tick(Instant::now());
    }

    info!("tui stopped");
    Ok(())
}
