//! RAII guard for terminal modes

use crossterm::{
    cursor::{Hide, Show},
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, stdout, Write};
use tracing::debug;

use crate::config::TerminalConfig;

/// Terminal modes switched on for the lifetime of a run
///
/// Only the modes that were actually enabled are undone. If the guard is
/// dropped without [`TerminalGuard::release`], e.g. while unwinding from a
/// panic, it restores the terminal through stdout on a best-effort basis.
#[derive(Debug)]
pub struct TerminalGuard {
    raw: bool,
    alternate_screen: bool,
    mouse: bool,
    bracketed_paste: bool,
    cursor_hidden: bool,
}

impl TerminalGuard {
    /// Enable raw mode plus the configured features, writing escapes to `out`
    ///
    /// A failure part-way leaves whatever was enabled to the returned error
    /// path: the partially built guard is dropped and restores it.
    pub fn acquire<W: Write>(out: &mut W, config: &TerminalConfig, alternate_screen: bool) -> io::Result<Self> {
        let mut guard = Self {
            raw: false,
            alternate_screen: false,
            mouse: false,
            bracketed_paste: false,
            cursor_hidden: false,
        };

        enable_raw_mode()?;
        guard.raw = true;

        if alternate_screen {
            execute!(out, EnterAlternateScreen)?;
            guard.alternate_screen = true;
        }
        execute!(out, Hide)?;
        guard.cursor_hidden = true;

        if config.mouse {
            execute!(out, EnableMouseCapture)?;
            guard.mouse = true;
        }
        if config.bracketed_paste {
            execute!(out, EnableBracketedPaste)?;
            guard.bracketed_paste = true;
        }

        debug!(
            alternate_screen,
            mouse = guard.mouse,
            bracketed_paste = guard.bracketed_paste,
            "terminal modes enabled"
        );
        Ok(guard)
    }

    /// Restore the terminal, reporting the first failure
    ///
    /// Every step is attempted even if an earlier one fails.
    pub fn release<W: Write>(mut self, out: &mut W) -> io::Result<()> {
        let result = self.restore(out);
        self.disarm();
        result
    }

    fn restore<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let mut first_error = None;
        let mut record = |result: io::Result<()>| {
            if let Err(err) = result {
                first_error.get_or_insert(err);
            }
        };

        if self.bracketed_paste {
            record(execute!(out, DisableBracketedPaste));
        }
        if self.mouse {
            record(execute!(out, DisableMouseCapture));
        }
        if self.alternate_screen {
            record(execute!(out, LeaveAlternateScreen));
        }
        if self.cursor_hidden {
            record(execute!(out, Show));
        }
        if self.raw {
            record(disable_raw_mode());
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn disarm(&mut self) {
        self.raw = false;
        self.alternate_screen = false;
        self.mouse = false;
        self.bracketed_paste = false;
        self.cursor_hidden = false;
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Best effort cleanup - ignore errors during drop
        let _ = self.restore(&mut stdout());
    }
}
