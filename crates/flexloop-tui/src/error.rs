//! Runtime errors

use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("runtime is already running")]
    AlreadyRunning,

    #[error("application init failed: {0:#}")]
    Init(anyhow::Error),

    #[error("terminal setup failed: {0}")]
    Terminal(#[source] io::Error),

    #[error("render failed: {0}")]
    Render(#[source] io::Error),

    #[error("runtime worker panicked: {0}")]
    WorkerPanicked(String),

    #[error("event queue is full")]
    QueueFull,

    #[error("runtime queues are closed")]
    QueueClosed,
}

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_error_keeps_context_chain() {
        let err = RuntimeError::Init(anyhow::anyhow!("missing file").context("loading state"));
        assert_eq!(err.to_string(), "application init failed: loading state: missing file");
    }

    #[test]
    fn test_terminal_error_source() {
        let err = RuntimeError::Terminal(io::Error::new(io::ErrorKind::Other, "not a tty"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
