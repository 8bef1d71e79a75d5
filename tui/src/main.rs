//! kak-surface Entry Point
//!
//! Runs Kakoune in JSON UI mode and draws it in the terminal.
//!
//! # Usage
//!
//! ```bash
//! # New anonymous session
//! kak-surface
//!
//! # Join a running session
//! kak-surface -c main
//!
//! # Create a named session
//! kak-surface -s work
//!
//! # Verbose logging (logs go to a file, the terminal is busy)
//! RUST_LOG=debug kak-surface --log-file /tmp/kak-surface.log
//! ```

use std::fs::{self, File};
use std::io;
use std::panic;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;

use bridge_core::{default_config_path, load_config_from_path, ConfigOverrides, SurfaceConfig};
use kak_surface_tui::App;

/// Terminal front-end for Kakoune's JSON UI
#[derive(Parser, Debug)]
#[command(name = "kak-surface")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Join an existing editor session
    #[arg(short = 'c', long = "connect", value_name = "SESSION")]
    connect: Option<String>,

    /// Create a named editor session (wins over --connect)
    #[arg(short = 's', long = "session", value_name = "SESSION")]
    create: Option<String>,

    /// Editor binary
    #[arg(long = "kak", value_name = "PATH")]
    kak: Option<String>,

    /// Configuration file path
    #[arg(long, env = "KAK_SURFACE_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Put the status bar on the first row
    #[arg(long)]
    status_on_top: bool,

    /// Log file path
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides::new();
        if let Some(kak) = &self.kak {
            overrides = overrides.with_editor_command(kak.clone());
        }
        if let Some(session) = &self.connect {
            overrides = overrides.with_connect(session.clone());
        }
        if let Some(session) = &self.create {
            overrides = overrides.with_create(session.clone());
        }
        if self.status_on_top {
            overrides = overrides.with_status_on_top(true);
        }
        if let Some(path) = &self.log_file {
            overrides = overrides.with_log_file(path.clone());
        }
        overrides
    }
}

/// Initialize logging into a file
///
/// `RUST_LOG` wins over the configured level.
fn init_logging(config: &SurfaceConfig) -> Result<()> {
    let Some(path) = config.log_path() else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {parent:?}"))?;
    }
    let file =
        File::create(&path).with_context(|| format!("Failed to create log file: {path:?}"))?;

    let level = &config.log_level;
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "kak_surface={level},kak_surface_tui={level},bridge_core={level},kak={level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().or_else(default_config_path);
    let mut config = load_config_from_path(config_path)?;
    args.overrides().apply(&mut config);
    config.validate()?;

    init_logging(&config)?;
    info!(source = %config.source(), "kak-surface starting");

    // Check if we have a TTY before attempting initialization
    use std::io::IsTerminal;
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        anyhow::bail!("kak-surface requires a terminal (TTY)");
    }

    // Single-threaded: the session is owned by one loop
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build runtime")?;

    runtime.block_on(run(&config))
}

async fn run(config: &SurfaceConfig) -> Result<()> {
    let mut app = App::new(config)?;

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal before printing panic
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the app
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.shutdown().await?;
    info!("kak-surface exiting");

    // Propagate any errors
    result
}
