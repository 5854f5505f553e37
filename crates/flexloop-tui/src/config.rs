//! Runtime configuration
//!
//! Every section has serde defaults, so a partial TOML file (or none at all)
//! yields a usable configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Embedded default configuration file
pub const DEFAULT_CONFIG: &str = include_str!("../flexloop.config.toml");

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "flexloop.config.toml";

const MAX_FPS: u32 = 240;

/// Top-level runtime configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Frames per second the renderer is paced to
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Capacity of the event queue
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
    /// Capacity of the command queue
    #[serde(default = "default_command_capacity")]
    pub command_capacity: usize,
    /// Window in which `\` followed by Enter becomes Shift+Enter
    #[serde(default = "default_shift_enter_timeout")]
    pub shift_enter_timeout_ms: u64,
    #[serde(default)]
    pub terminal: TerminalConfig,
    #[serde(default)]
    pub gestures: GestureConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_fps() -> u32 {
    60
}

fn default_event_capacity() -> usize {
    256
}

fn default_command_capacity() -> usize {
    64
}

fn default_shift_enter_timeout() -> u64 {
    30
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            event_capacity: default_event_capacity(),
            command_capacity: default_command_capacity(),
            shift_enter_timeout_ms: default_shift_enter_timeout(),
            terminal: TerminalConfig::default(),
            gestures: GestureConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl RuntimeConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse runtime configuration")
    }

    /// Load configuration from a specific file path
    /// If the file doesn't exist, creates it with default settings
    pub fn load_from_file(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                anyhow::anyhow!("Failed to parse config file {}: {}", path.display(), e)
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "config file not found, writing defaults");

                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)
                        .context(format!("Failed to create directory {}", parent.display()))?;
                }
                std::fs::write(path, DEFAULT_CONFIG).context(format!(
                    "Failed to create config file at {}",
                    path.display()
                ))?;

                toml::from_str(DEFAULT_CONFIG)
                    .map_err(|e| anyhow::anyhow!("Failed to parse embedded default config: {}", e))
            }
            Err(e) => Err(anyhow::anyhow!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            )),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.fps == 0 || self.fps > MAX_FPS {
            return Err(anyhow::anyhow!(
                "fps must be between 1 and {}, got {}",
                MAX_FPS,
                self.fps
            ));
        }
        if self.event_capacity == 0 {
            return Err(anyhow::anyhow!("event_capacity must be at least 1"));
        }
        if self.command_capacity == 0 {
            return Err(anyhow::anyhow!("command_capacity must be at least 1"));
        }
        if self.terminal.width == Some(0) {
            return Err(anyhow::anyhow!("terminal width must be at least 1 column"));
        }
        if self.gestures.multi_click_interval_ms == 0 {
            return Err(anyhow::anyhow!("multi_click_interval_ms must be non-zero"));
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => return Err(anyhow::anyhow!("Invalid log level: {}", self.logging.level)),
        }

        Ok(())
    }

    /// Apply `FLEXLOOP_*` environment variable overrides
    ///
    /// Values that fail to parse are ignored.
    pub fn apply_env_overrides(&mut self) {
        fn var(name: &str) -> Option<String> {
            std::env::var(name).ok().filter(|v| !v.is_empty())
        }

        if let Some(fps) = var("FLEXLOOP_FPS").and_then(|v| v.parse().ok()) {
            self.fps = fps;
        }
        if let Some(mode) = var("FLEXLOOP_MODE").and_then(|v| ScreenMode::parse(&v)) {
            self.terminal.mode = mode;
        }
        if let Some(mouse) = var("FLEXLOOP_MOUSE").and_then(|v| parse_bool(&v)) {
            self.terminal.mouse = mouse;
        }
        if let Some(paste) = var("FLEXLOOP_BRACKETED_PASTE").and_then(|v| parse_bool(&v)) {
            self.terminal.bracketed_paste = paste;
        }
        if let Some(width) = var("FLEXLOOP_WIDTH").and_then(|v| v.parse().ok()) {
            self.terminal.width = Some(width);
        }
        if let Some(level) = var("FLEXLOOP_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(file) = var("FLEXLOOP_LOG_FILE") {
            self.logging.file = Some(PathBuf::from(file));
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }

    pub fn shift_enter_timeout(&self) -> Duration {
        Duration::from_millis(self.shift_enter_timeout_ms)
    }

    pub fn summary(&self) -> String {
        let mut summary = String::new();
        summary.push_str("Runtime configuration:\n");
        summary.push_str(&format!("Mode: {}\n", self.terminal.mode.as_str()));
        summary.push_str(&format!("FPS: {}\n", self.fps));
        summary.push_str(&format!("Mouse: {}\n", self.terminal.mouse));
        summary.push_str(&format!("Bracketed paste: {}\n", self.terminal.bracketed_paste));
        if let Some(width) = self.terminal.width {
            summary.push_str(&format!("Width: {}\n", width));
        }
        summary.push_str(&format!(
            "Queues: {} events / {} commands\n",
            self.event_capacity, self.command_capacity
        ));
        summary.push_str(&format!("Logging Level: {}\n", self.logging.level));
        summary
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// How the UI shares the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenMode {
    /// Alternate screen, the UI owns every cell
    #[default]
    Fullscreen,
    /// A live region pinned under the normal scrollback
    Inline,
}

impl ScreenMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "fullscreen" => Some(ScreenMode::Fullscreen),
            "inline" => Some(ScreenMode::Inline),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScreenMode::Fullscreen => "fullscreen",
            ScreenMode::Inline => "inline",
        }
    }
}

/// Terminal features switched on while the runtime runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalConfig {
    #[serde(default)]
    pub mode: ScreenMode,
    #[serde(default = "default_true")]
    pub mouse: bool,
    #[serde(default = "default_true")]
    pub bracketed_paste: bool,
    /// Columns to render in, capped at the terminal width; the full width when unset
    #[serde(default)]
    pub width: Option<u16>,
}

fn default_true() -> bool {
    true
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            mode: ScreenMode::default(),
            mouse: true,
            bracketed_paste: true,
            width: None,
        }
    }
}

/// Thresholds for gesture synthesis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Synthesize clicks and drags from raw mouse input
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Largest press-to-release displacement, in cells, that still clicks
    #[serde(default = "default_click_move_threshold")]
    pub click_move_threshold: u16,
    /// Displacement, in cells, past which a held press becomes a drag
    #[serde(default = "default_drag_threshold")]
    pub drag_threshold: u16,
    #[serde(default = "default_multi_click_interval")]
    pub multi_click_interval_ms: u64,
}

fn default_click_move_threshold() -> u16 {
    1
}

fn default_drag_threshold() -> u16 {
    1
}

fn default_multi_click_interval() -> u64 {
    500
}

impl GestureConfig {
    pub fn multi_click_interval(&self) -> Duration {
        Duration::from_millis(self.multi_click_interval_ms)
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            click_move_threshold: default_click_move_threshold(),
            drag_threshold: default_drag_threshold(),
            multi_click_interval_ms: default_multi_click_interval(),
        }
    }
}

/// Logging configuration, consumed by the binary that installs the subscriber
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log file; stdout belongs to the UI
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
