//! WiseHire console - a keyboard-driven terminal client for the WiseHire
//! HR management backend.
//!
//! Without a subcommand the full-screen interface starts. The subcommands
//! cover the session and report downloads for scripted use.

mod app;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use wisehire_core::api::endpoints::REPORTS;
use wisehire_core::api::ApiError;
use wisehire_core::auth::Credentials;
use wisehire_core::{ApiClient, Config, SessionStore};

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file written inside the cache directory
const LOG_FILE: &str = "wisehire.log";

#[derive(Parser)]
#[command(name = "wisehire", version, about = "Terminal console for WiseHire HR management")]
struct Cli {
    /// Backend base URL, overriding WISEHIRE_API_URL and the config file
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and store the access token
    Login {
        #[arg(long)]
        email: Option<String>,
    },
    /// Forget the stored access token
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Download a completed report
    DownloadReport {
        id: i64,
        /// Directory to save into (defaults to the current directory)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Initialize the tracing subscriber, writing to a log file so the
/// terminal UI stays clean. Use RUST_LOG to control the level.
fn init_tracing(config: &Config) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let log_dir = config.cache_dir().ok()?;
    std::fs::create_dir_all(&log_dir).ok()?;
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(log_dir, LOG_FILE));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();
    Some(guard)
}

/// Render an API failure the way the interface would alert it.
fn user_error(error: ApiError) -> anyhow::Error {
    anyhow::anyhow!(error.alerts().join("\n"))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = Config::load()?;
    let _log_guard = init_tracing(&config);
    info!("WiseHire console starting");

    let base_url = cli.api_url.clone().unwrap_or_else(|| config.base_url());

    match cli.command {
        Some(command) => run_command(command, config, &base_url).await,
        None => run_tui(config, &base_url).await,
    }
}

async fn run_command(command: Command, mut config: Config, base_url: &str) -> Result<()> {
    let credentials = Credentials::restore(config.credential_store()?);
    let session = SessionStore::new(ApiClient::new(base_url, credentials)?);

    match command {
        Command::Login { email } => {
            let email = match email
                .or_else(|| std::env::var("WISEHIRE_EMAIL").ok())
                .or_else(|| config.last_email.clone())
            {
                Some(email) => email,
                None => prompt("Email: ")?,
            };
            let password = match std::env::var("WISEHIRE_PASSWORD") {
                Ok(password) => password,
                Err(_) => rpassword::prompt_password("Password: ")?,
            };

            let principal = session.login(&email, &password).await.map_err(user_error)?;
            config.last_email = Some(email);
            config.save()?;
            println!("Logged in as {} ({})", principal.display_name(), principal.role_label());
        }
        Command::Logout => {
            session.logout();
            println!("Logged out");
        }
        Command::Whoami => match session.resolve().await.map_err(user_error)? {
            Some(principal) => {
                println!("{} <{}>", principal.display_name(), principal.email);
                println!("Role: {}", principal.role_label());
                if let Some(company) = principal.hr_company_name.as_deref() {
                    println!("HR company: {}", company);
                }
                if !principal.authorized_companies_list.is_empty() {
                    println!("Companies: {}", principal.authorized_companies_list.join(", "));
                }
            }
            None => println!("Not logged in"),
        },
        Command::DownloadReport { id, output } => {
            let api = session.api();
            let report = api.retrieve(&REPORTS, id).await.map_err(user_error)?;
            if !report.is_downloadable() {
                anyhow::bail!("Report #{} is {}", id, report.status.label().to_lowercase());
            }
            let download = api.download_report(&report).await.map_err(user_error)?;
            let dir = output.unwrap_or_else(|| PathBuf::from("."));
            let path = download
                .save_to(&dir, &report.fallback_filename())
                .with_context(|| format!("Failed to save report into {}", dir.display()))?;
            println!("Saved {}", path.display());
        }
    }
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    use std::io::Write;

    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

async fn run_tui(config: Config, base_url: &str) -> Result<()> {
    // Create app before touching the terminal so setup errors print normally
    let mut app = App::new(config, base_url)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    app.start();
    app.navigate(app.route);

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("WiseHire console shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                if handle_input(app, key).await? {
                    return Ok(());
                }
            }
        }

        // Check for completed background tasks
        app.check_background_tasks();

        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
