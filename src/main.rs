use anyhow::{Context, Result};
use clap::Parser;
use genframe::app::App;
use genframe::cli::Cli;
use genframe::config::Config;
use genframe::styles::{init_theme, ThemeType};
use genframe::utils::get_log_dir;
use tracing_appender::non_blocking::WorkerGuard;

/// Set up panic hook to restore terminal state on panic
fn setup_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal state before handling panic
        // This ensures the terminal is usable after a panic
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::event::DisableMouseCapture
        );
        // Call the original panic hook to show the panic message
        original_hook(panic_info);
    }));
}

/// File logging; stdout belongs to the terminal UI.
fn init_logging() -> Result<WorkerGuard> {
    let log_dir = get_log_dir();
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory: {:?}", log_dir))?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let file_appender = tracing_appender::rolling::never(&log_dir, "genframe.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(non_blocking)
        .with_ansi(false) // Disable ANSI colors in file
        .init();

    Ok(guard)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let guard = init_logging()?;

    if !cli.launches_ui() {
        let result = cli.execute();
        drop(guard);
        return result;
    }

    // Set up panic hook to restore terminal on panic
    setup_panic_hook();

    let config_path = cli.config_path();
    let config = Config::load_or_create(&config_path).context("Failed to load configuration")?;

    let theme_type = if cli.no_colors || std::env::var_os("NO_COLOR").is_some() {
        ThemeType::NoColor
    } else {
        config.theme_type()
    };
    init_theme(theme_type);

    let mut app = App::new(config)?;
    let result = app.run();

    // Restore terminal state on normal exit
    // (panic hook handles panics)
    drop(guard);

    result
}
