use super::listener::{Command, CommandDiscriminants};
use crate::config::KeyBindingsConfig;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use serde::Deserialize;
use std::{collections::HashMap, fmt, iter, str::FromStr};

/// Named keys and every alias they can be written as.
const NAMED_KEYS: &[(KeyCode, &[&str])] = &[
    (KeyCode::Left, &["Left", "left"]),
    (KeyCode::Right, &["Right", "right"]),
    (KeyCode::Up, &["Up", "up"]),
    (KeyCode::Down, &["Down", "down"]),
    (KeyCode::PageUp, &["PageUp", "page_up"]),
    (KeyCode::PageDown, &["PageDown", "page_down"]),
    (KeyCode::Home, &["Home", "home"]),
    (KeyCode::End, &["End", "end"]),
    (KeyCode::Enter, &["Enter", "enter", "CR", "cr"]),
    (KeyCode::Esc, &["Esc", "esc"]),
    (KeyCode::Tab, &["Tab", "tab"]),
    (KeyCode::Backspace, &["Backspace", "backspace"]),
    (KeyCode::Char(' '), &["Space", "space"]),
];

/// Maps key presses into commands.
#[derive(Debug)]
pub struct CommandKeyBindings {
    bindings: HashMap<KeyBinding, CommandDiscriminants>,
}

impl CommandKeyBindings {
    /// Find the command bound to a key event, if any.
    pub(crate) fn apply(&self, event: &KeyEvent) -> Option<Command> {
        // Ignore release events
        if event.kind == KeyEventKind::Release {
            return None;
        }
        let binding = KeyBinding::from(event);
        let command = match self.bindings.get(&binding)? {
            CommandDiscriminants::Next => Command::Next,
            CommandDiscriminants::Previous => Command::Previous,
            CommandDiscriminants::FirstSlide => Command::FirstSlide,
            CommandDiscriminants::LastSlide => Command::LastSlide,
            CommandDiscriminants::ToggleTheme => Command::ToggleTheme,
            CommandDiscriminants::ToggleHelp => Command::ToggleHelp,
            CommandDiscriminants::ToggleFullscreen => Command::ToggleFullscreen,
            CommandDiscriminants::CloseModal => Command::CloseModal,
            CommandDiscriminants::Exit => Command::Exit,
            // These can't be bound to keys.
            CommandDiscriminants::GoToSlide | CommandDiscriminants::Redraw => return None,
        };
        Some(command)
    }
}

impl TryFrom<KeyBindingsConfig> for CommandKeyBindings {
    type Error = KeyBindingsValidationError;

    fn try_from(config: KeyBindingsConfig) -> Result<Self, Self::Error> {
        let zip = |discriminant, bindings: Vec<KeyBinding>| bindings.into_iter().zip(iter::repeat(discriminant));
        let all = iter::empty()
            .chain(zip(CommandDiscriminants::Next, config.next))
            .chain(zip(CommandDiscriminants::Previous, config.previous))
            .chain(zip(CommandDiscriminants::FirstSlide, config.first_slide))
            .chain(zip(CommandDiscriminants::LastSlide, config.last_slide))
            .chain(zip(CommandDiscriminants::ToggleTheme, config.toggle_theme))
            .chain(zip(CommandDiscriminants::ToggleHelp, config.toggle_help))
            .chain(zip(CommandDiscriminants::ToggleFullscreen, config.toggle_fullscreen))
            .chain(zip(CommandDiscriminants::CloseModal, config.close_modal))
            .chain(zip(CommandDiscriminants::Exit, config.exit));
        let mut bindings = HashMap::new();
        for (binding, command) in all {
            if bindings.insert(binding.clone(), command).is_some() {
                return Err(KeyBindingsValidationError::Conflict(binding));
            }
        }
        Ok(Self { bindings })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum KeyBindingsValidationError {
    #[error("key {0} is bound more than once")]
    Conflict(KeyBinding),
}

/// A single key, optionally pressed along with control.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct KeyBinding {
    key: KeyCode,
    control: bool,
}

impl KeyBinding {
    fn parse_named(name: &str) -> Option<KeyCode> {
        if let Some(number) = name.strip_prefix(['F', 'f']) {
            return match number.parse::<u8>() {
                Ok(number @ 1..=12) => Some(KeyCode::F(number)),
                _ => None,
            };
        }
        NAMED_KEYS.iter().find(|(_, aliases)| aliases.contains(&name)).map(|(key, _)| *key)
    }

    fn parse_key(input: &str) -> Result<KeyCode, KeyBindingParseError> {
        let mut chars = input.chars();
        let first = chars.next().ok_or(KeyBindingParseError::NoInput)?;
        if chars.next().is_some() {
            return Err(KeyBindingParseError::TooManyKeys(input.to_string()));
        }
        // don't allow these as they create ambiguity
        if first == '<' || first == '>' {
            return Err(KeyBindingParseError::InvalidKey(first));
        }
        if first.is_alphanumeric() || first.is_ascii_punctuation() || first == ' ' {
            Ok(KeyCode::Char(first))
        } else {
            Err(KeyBindingParseError::InvalidKey(first))
        }
    }
}

impl From<&KeyEvent> for KeyBinding {
    fn from(event: &KeyEvent) -> Self {
        Self { key: event.code, control: event.modifiers.contains(KeyModifiers::CONTROL) }
    }
}

impl FromStr for KeyBinding {
    type Err = KeyBindingParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let Some(inner) = input.strip_prefix('<').and_then(|input| input.strip_suffix('>')) else {
            return Ok(Self { key: Self::parse_key(input)?, control: false });
        };
        if let Some(key) = inner.strip_prefix("c-").or_else(|| inner.strip_prefix("C-")) {
            let key = Self::parse_named(key).map(Ok).unwrap_or_else(|| Self::parse_key(key))?;
            return Ok(Self { key, control: true });
        }
        match Self::parse_named(inner) {
            Some(key) => Ok(Self { key, control: false }),
            None => Err(KeyBindingParseError::UnknownKey(inner.to_string())),
        }
    }
}

impl TryFrom<String> for KeyBinding {
    type Error = KeyBindingParseError;

    fn try_from(input: String) -> Result<Self, Self::Error> {
        input.parse()
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = NAMED_KEYS.iter().find(|(key, _)| *key == self.key).map(|(_, aliases)| aliases[0]);
        match (self.key, name, self.control) {
            (_, Some(name), false) => write!(f, "<{name}>"),
            (_, Some(name), true) => write!(f, "<c-{name}>"),
            (KeyCode::F(number), _, false) => write!(f, "<F{number}>"),
            (KeyCode::F(number), _, true) => write!(f, "<c-F{number}>"),
            (KeyCode::Char(c), _, false) => write!(f, "{c}"),
            (KeyCode::Char(c), _, true) => write!(f, "<c-{c}>"),
            (other, _, _) => write!(f, "<{other:?}>"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum KeyBindingParseError {
    #[error("no input")]
    NoInput,

    #[error("not a valid key: {0}")]
    InvalidKey(char),

    #[error("unknown key name: <{0}>")]
    UnknownKey(String),

    #[error("a binding is a single key, got '{0}'")]
    TooManyKeys(String),
}
