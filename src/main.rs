use anyhow::{Context, Result};
use clap::Parser;
use directories::BaseDirs;
use flexloop::{Args, Counter};
use flexloop_tui::config::{RuntimeConfig, ScreenMode};
use flexloop_tui::{CrosstermInput, FullscreenBackend, InlineBackend, Runtime};
use std::env;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.load_config()?;

    // stdout belongs to the UI, so logs go to a file
    if let Some(path) = log_path(&config) {
        init_logging(&config, path)?;
    }
    info!("{}", config.summary().replace('\n', "; "));

    let runtime = Runtime::new(config.clone());
    let counter = match config.terminal.mode {
        ScreenMode::Fullscreen => {
            runtime
                .run(Counter::new(), FullscreenBackend::stdout(), CrosstermInput)
                .await?
        }
        ScreenMode::Inline => {
            let backend = InlineBackend::stdout();
            let printer = backend.printer();
            let app = Counter::new().with_echo(move |line| {
                if let Err(err) = printer.println(line) {
                    warn!(error = %err, "failed to print above the live region");
                }
            });
            runtime.run(app, backend, CrosstermInput).await?
        }
    };

    println!("final count: {}", counter.count());
    Ok(())
}

fn log_path(config: &RuntimeConfig) -> Option<PathBuf> {
    config.logging.file.clone().or_else(|| {
        BaseDirs::new().map(|base| base.cache_dir().join("flexloop").join("flexloop.log"))
    })
}

fn init_logging(config: &RuntimeConfig, path: PathBuf) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let level = config.logging.level.to_lowercase();
    let default_directive = format!("flexloop={level},flexloop_tui={level}");
    let env_override = env::var("RUST_LOG").unwrap_or_default();
    let combined_filter = if env_override.trim().is_empty() {
        default_directive
    } else if env_override.contains("flexloop") {
        env_override
    } else {
        format!("{},{}", env_override, default_directive)
    };

    tracing_subscriber::fmt()
        .with_env_filter(combined_filter)
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
