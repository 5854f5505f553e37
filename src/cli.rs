//! Command-line arguments and configuration discovery for the demo binary

use anyhow::{Context, Result};
use clap::Parser;
use directories::BaseDirs;
use flexloop_tui::config::{RuntimeConfig, ScreenMode, CONFIG_FILE_NAME, DEFAULT_CONFIG};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "FLEXLOOP_CONFIG";

#[derive(Debug, Default, Parser)]
#[command(name = "flexloop", version, about = "Counter demo for the flexloop runtime")]
pub struct Args {
    /// Configuration file; created with defaults if missing
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Render below the prompt instead of taking over the screen
    #[arg(long)]
    pub inline: bool,

    /// Frames per second
    #[arg(long, value_name = "FPS")]
    pub fps: Option<u32>,

    /// Leave mouse tracking off
    #[arg(long)]
    pub no_mouse: bool,

    /// Write logs here instead of the configured file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Resolve the effective configuration
    ///
    /// Precedence, lowest first: config file, `FLEXLOOP_*` environment
    /// variables, command-line flags.
    pub fn load_config(&self) -> Result<RuntimeConfig> {
        let mut config = match &self.config {
            Some(path) => RuntimeConfig::load_from_file(path)?,
            None => discover()?,
        };
        config.apply_env_overrides();
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    pub fn apply(&self, config: &mut RuntimeConfig) {
        if self.inline {
            config.terminal.mode = ScreenMode::Inline;
        }
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        if self.no_mouse {
            config.terminal.mouse = false;
        }
        if let Some(path) = &self.log_file {
            config.logging.file = Some(path.clone());
        }
    }
}

/// Find a configuration without an explicit `--config`
///
/// Looks in the working directory, then `~/.flexloop/`, then the file named
/// by `FLEXLOOP_CONFIG`. Falls back to the embedded defaults.
pub fn discover() -> Result<RuntimeConfig> {
    let mut candidates = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(base_dirs) = BaseDirs::new() {
        candidates.push(base_dirs.home_dir().join(".flexloop").join(CONFIG_FILE_NAME));
    }
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        if !path.is_empty() {
            candidates.push(PathBuf::from(path));
        }
    }

    for candidate in &candidates {
        if let Some(config) = read_if_present(candidate)? {
            debug!(path = %candidate.display(), "loaded configuration");
            return Ok(config);
        }
    }

    debug!("no configuration file found, using defaults");
    RuntimeConfig::from_toml_str(DEFAULT_CONFIG)
}

fn read_if_present(path: &Path) -> Result<Option<RuntimeConfig>> {
    match std::fs::read_to_string(path) {
        Ok(content) => RuntimeConfig::from_toml_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
            .map(Some),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}
