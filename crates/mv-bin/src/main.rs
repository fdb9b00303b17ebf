//! minivim entrypoint.
use anyhow::Result;
use clap::Parser;
use core_config::load_from;
use core_input::CrosstermInput;
use core_model::{EditorSession, InitError, SessionOptions};
use core_terminal::{CrosstermBackend, TerminalBackend};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "minivim.log";
const DEFAULT_LOG_FILTER: &str = "info";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "minivim", version, about = "Read-only terminal file viewer")]
struct Args {
    /// File to view. Missing files open as an empty buffer.
    pub path: Option<PathBuf>,
    /// Configuration file (overrides discovery of `minivim.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Start with the line-number gutter hidden.
    #[arg(long = "no-line-numbers")]
    pub no_line_numbers: bool,
}

impl Args {
    fn session_options(&self, config: &core_config::Config) -> SessionOptions {
        SessionOptions {
            line_numbers: config.line_numbers() && !self.no_line_numbers,
            scroll_lines: config.scroll_lines(),
        }
    }
}

fn configure_logging(filter: Option<&str>) -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join(LOG_FILE);
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter.unwrap_or(DEFAULT_LOG_FILTER)));
    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(nb_writer)
        .with_ansi(false)
        .try_init()
        .ok()
        .map(|_| guard)
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn main() -> Result<()> {
    let args = Args::parse();
    // Config is read before the subscriber exists so `[log] filter` can apply.
    let config = load_from(args.config.clone())?;
    let _log_guard = configure_logging(config.log_filter());
    install_panic_hook();
    info!(target: "runtime", "startup");
    config.log_deferred();

    let mut backend = CrosstermBackend::new();
    let (cols, rows) = backend
        .size()
        .map_err(|e| InitError::Terminal(e.to_string()))?;
    let options = args.session_options(&config);
    info!(
        target: "runtime",
        cols,
        rows,
        line_numbers = options.line_numbers,
        scroll_lines = options.scroll_lines,
        "bootstrap_complete"
    );
    let mut session =
        EditorSession::open_path(args.path.as_deref(), rows as usize, cols as usize, options)?;

    backend.set_title("minivim")?;
    let mut guard = backend.enter_guard()?;
    let mut input = CrosstermInput::new();
    let result = session.run(&mut input, &mut *guard);
    drop(guard);
    info!(target: "runtime", frames = session.metrics().frames, "shutdown");
    result
}
