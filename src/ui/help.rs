use crate::{commands::keyboard::KeyBinding, config::KeyBindingsConfig};
use std::time::Instant;

/// The keyboard shortcuts overlay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HelpOverlay {
    lines: Vec<String>,
}

impl HelpOverlay {
    /// Build the overlay's contents out of the configured bindings.
    pub fn new(bindings: &KeyBindingsConfig) -> Self {
        let rows: [(&str, &[KeyBinding]); 9] = [
            ("Previous slide", &bindings.previous),
            ("Next slide", &bindings.next),
            ("First slide", &bindings.first_slide),
            ("Last slide", &bindings.last_slide),
            ("Toggle light/dark theme", &bindings.toggle_theme),
            ("Toggle fullscreen", &bindings.toggle_fullscreen),
            ("Show these shortcuts", &bindings.toggle_help),
            ("Close this window", &bindings.close_modal),
            ("Exit", &bindings.exit),
        ];
        let width = rows
            .iter()
            .map(|(_, keys)| keys.iter().map(|key| key.to_string()).collect::<Vec<_>>().join(" ").len())
            .max()
            .unwrap_or(0);
        let mut lines = vec!["KEYBOARD SHORTCUTS".to_string(), String::new()];
        for (description, keys) in rows {
            let keys = keys.iter().map(|key| key.to_string()).collect::<Vec<_>>().join(" ");
            lines.push(format!("{keys:<width$} : {description}"));
        }
        lines.extend([
            String::new(),
            "Click an indicator to jump to its slide".to_string(),
            "Drag sideways to swipe between slides".to_string(),
        ]);
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

/// Tracks whether the help overlay is open and when it should close on its own.
#[derive(Debug, Default)]
pub(crate) struct HelpState {
    closes_at: Option<Instant>,
}

impl HelpState {
    pub(crate) fn is_open(&self) -> bool {
        self.closes_at.is_some()
    }

    pub(crate) fn open(&mut self, closes_at: Instant) {
        self.closes_at = Some(closes_at);
    }

    pub(crate) fn close(&mut self) -> bool {
        self.closes_at.take().is_some()
    }

    /// Close the overlay if it's been open for long enough, returning whether it was closed.
    pub(crate) fn expire(&mut self, now: Instant) -> bool {
        match self.closes_at {
            Some(deadline) if deadline <= now => self.close(),
            _ => false,
        }
    }
}
