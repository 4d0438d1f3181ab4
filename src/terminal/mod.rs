pub(crate) mod frame;
pub(crate) mod layout;
pub(crate) mod surface;

use crate::commands::pointer::CellSize;
use crossterm::{
    cursor,
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    terminal::{self, window_size},
    QueueableCommand,
};
use std::io::{self, Write};

/// The size of the terminal window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    pub rows: u16,
    pub columns: u16,
    pub width: u16,
    pub height: u16,
}

impl WindowSize {
    pub fn current() -> io::Result<Self> {
        let size = window_size()?;
        Ok(size.into())
    }

    /// The size of a single cell, if the terminal reported its size in pixels.
    pub(crate) fn cell_size(&self) -> Option<CellSize> {
        if self.width == 0 || self.height == 0 || self.columns == 0 || self.rows == 0 {
            return None;
        }
        Some(CellSize {
            width: self.width as f64 / self.columns as f64,
            height: self.height as f64 / self.rows as f64,
        })
    }
}

impl From<crossterm::terminal::WindowSize> for WindowSize {
    fn from(size: crossterm::terminal::WindowSize) -> Self {
        Self { rows: size.rows, columns: size.columns, width: size.width, height: size.height }
    }
}

/// A handle that can be put into presentation mode and back.
pub trait TerminalWrite: io::Write {
    fn init(&mut self) -> io::Result<()>;
    fn deinit(&mut self);
}

impl TerminalWrite for io::Stdout {
    fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        self.queue(cursor::Hide)?;
        self.queue(terminal::EnterAlternateScreen)?;
        self.queue(EnableMouseCapture)?;
        self.queue(EnableFocusChange)?;
        self.flush()?;
        Ok(())
    }

    fn deinit(&mut self) {
        let _ = self.queue(DisableFocusChange);
        let _ = self.queue(DisableMouseCapture);
        let _ = self.queue(terminal::LeaveAlternateScreen);
        let _ = self.queue(cursor::Show);
        let _ = self.flush();
        let _ = terminal::disable_raw_mode();
    }
}
