//! Dustman entry point.
//!
//! Exit status: 0 when every eligible package was removed, 1 on a fatal
//! error (bad input, bad config), 2 on bad usage, 3 when at least one
//! removal failed.

mod app;
mod config;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use dustman_help_client::Credentials;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

const PARTIAL_FAILURE: u8 = 3;

/// Removes Steam license packages whose titles are all hidden in the library.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Library visibility config (userdata/<id>/7/remote/sharedconfig.vdf).
    category_file: PathBuf,

    /// Output of the Steam console `licenses_print` command.
    licenses_file: PathBuf,

    /// `sessionid` cookie of a logged-in help.steampowered.com session.
    sessionid: String,

    /// `steamLogin` cookie.
    steam_login: String,

    /// `steamLoginSecure` cookie.
    steam_login_secure: String,

    /// Configuration file (TOML).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log file, appended to (overrides the config).
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Decide and log, but send no removal requests.
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let mut config = config::Config::load(args.config.as_deref())?;
    if let Some(log_file) = args.log_file.clone() {
        config.log_file = log_file;
    }

    let _guard = init_logging(&config.log_file);

    tracing::info!("==============================================");
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        dry_run = args.dry_run,
        "starting"
    );

    let request = app::RunRequest {
        category_file: args.category_file,
        licenses_file: args.licenses_file,
        credentials: Credentials {
            session_id: args.sessionid,
            steam_login: args.steam_login,
            steam_login_secure: args.steam_login_secure,
        },
        dry_run: args.dry_run,
    };

    // Removals run one at a time; a single thread is enough.
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let summary = match rt.block_on(app::run(&request, &config)) {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!("run aborted: {e:#}");
            return Err(e);
        }
    };

    if summary.has_failures() {
        tracing::warn!(failed = summary.failed.len(), "some packages were not removed");
        return Ok(ExitCode::from(PARTIAL_FAILURE));
    }
    Ok(ExitCode::SUCCESS)
}

/// Sends all events to the append-only log file and warnings to stderr.
fn init_logging(log_file: &Path) -> WorkerGuard {
    let dir = match log_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let name = log_file
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("dustman.log"));

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(LevelFilter::WARN),
        )
        .init();

    guard
}
