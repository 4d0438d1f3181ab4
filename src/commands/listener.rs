use super::keyboard::{CommandKeyBindings, KeyBindingsValidationError};
use crate::config::KeyBindingsConfig;
use crossterm::event::{poll, read, Event, MouseButton, MouseEventKind};
use std::{io, time::Duration};
use strum::EnumDiscriminants;

/// A command listener that turns terminal events into input events.
pub struct CommandListener {
    bindings: CommandKeyBindings,
}

impl CommandListener {
    /// Create a new command listener using the given key bindings.
    pub fn new(config: KeyBindingsConfig) -> Result<Self, KeyBindingsValidationError> {
        let bindings = CommandKeyBindings::try_from(config)?;
        Ok(Self { bindings })
    }

    /// Try to get the next input event.
    ///
    /// This waits up to `timeout` for an event and returns `Ok(None)` if none shows up or the
    /// event is one we don't care about.
    pub(crate) fn try_next_event(&mut self, timeout: Duration) -> io::Result<Option<InputEvent>> {
        if !poll(timeout)? {
            return Ok(None);
        }
        let event = match read()? {
            Event::Key(event) => self.bindings.apply(&event).map(InputEvent::Command),
            Event::Resize(..) => Some(InputEvent::Command(Command::Redraw)),
            Event::FocusLost => Some(InputEvent::FocusLost),
            Event::FocusGained => Some(InputEvent::FocusGained),
            Event::Mouse(event) => {
                let position = CellPosition { column: event.column, row: event.row };
                match event.kind {
                    MouseEventKind::Down(MouseButton::Left) => Some(InputEvent::PointerDown(position)),
                    MouseEventKind::Up(MouseButton::Left) => Some(InputEvent::PointerUp(position)),
                    _ => None,
                }
            }
            _ => None,
        };
        Ok(event)
    }
}

/// A position in the terminal grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellPosition {
    pub column: u16,
    pub row: u16,
}

/// An input event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum InputEvent {
    /// A key was mapped to a command.
    Command(Command),

    /// The primary pointer button went down.
    PointerDown(CellPosition),

    /// The primary pointer button went up.
    PointerUp(CellPosition),

    /// The terminal stopped being visible to the user.
    FocusLost,

    /// The terminal is in front of the user again.
    FocusGained,
}

/// A command.
#[derive(Clone, Debug, PartialEq, Eq, EnumDiscriminants)]
#[strum_discriminants(derive(Hash))]
pub(crate) enum Command {
    /// Redraw the presentation.
    ///
    /// This can happen on terminal resize.
    Redraw,

    /// Move forward in the presentation.
    Next,

    /// Move backwards in the presentation.
    Previous,

    /// Go to the first slide.
    FirstSlide,

    /// Go to the last slide.
    LastSlide,

    /// Go to one particular slide.
    GoToSlide(u32),

    /// Switch between the light and dark themes.
    ToggleTheme,

    /// Toggle the key bindings help overlay.
    ToggleHelp,

    /// Toggle fullscreen mode, which hides the navigation chrome.
    ToggleFullscreen,

    /// Hide the currently open modal, if any.
    CloseModal,

    /// Exit the presentation.
    Exit,
}

impl Command {
    /// Whether this command moves between slides and is therefore subject to the navigation guard.
    pub(crate) fn is_navigation(&self) -> bool {
        matches!(self, Self::Next | Self::Previous | Self::FirstSlide | Self::LastSlide | Self::GoToSlide(_))
    }
}
