//! Local terminal control via `crossterm`.

use std::io::IsTerminal;

use anyhow::{Context, Result};
use crossterm::terminal;

use crate::application::ports::TerminalControl;

/// The process's own controlling terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct CrosstermTerminal;

impl TerminalControl for CrosstermTerminal {
    fn stdin_is_terminal(&self) -> bool {
        std::io::stdin().is_terminal()
    }

    fn size(&self) -> Result<(u16, u16)> {
        terminal::size().context("cannot query terminal size")
    }

    fn enter_raw_mode(&self) -> Result<()> {
        terminal::enable_raw_mode().context("cannot switch terminal to raw mode")
    }

    fn restore(&self) -> Result<()> {
        terminal::disable_raw_mode().context("cannot restore terminal mode")
    }
}
