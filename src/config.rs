use crate::{
    commands::{gesture::SwipeOptions, keyboard::KeyBinding, pointer::CellSize},
    navigation::TransitionOptions,
};
use serde::Deserialize;
use std::{fs, io, path::Path, time::Duration};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// The timing of slide transitions.
    #[serde(default)]
    pub transition: TransitionConfig,

    /// How swipe gestures are recognized.
    #[serde(default)]
    pub swipe: SwipeConfig,

    #[serde(default)]
    pub theme: ThemeConfig,

    #[serde(default)]
    pub help: HelpConfig,

    /// Terminal specific options.
    #[serde(default)]
    pub terminal: TerminalConfig,

    /// The key bindings.
    #[serde(default)]
    pub bindings: KeyBindingsConfig,
}

impl Config {
    /// Load the config from a path.
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(ConfigLoadError::NotFound),
            Err(e) => return Err(e.into()),
        };
        let config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("config file not found")]
    NotFound,

    #[error("invalid configuration: {0}")]
    Invalid(#[from] serde_yaml::Error),
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransitionConfig {
    /// The time between the outgoing slide starting to leave and the incoming one being revealed.
    #[serde(default = "default_enter_delay")]
    pub enter_delay_ms: u64,

    /// The time after which the outgoing slide is deactivated.
    #[serde(default = "default_exit_cleanup")]
    pub exit_cleanup_ms: u64,

    /// The time after which the transition is considered complete and new ones are accepted.
    #[serde(default = "default_completion_delay")]
    pub completion_delay_ms: u64,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            enter_delay_ms: default_enter_delay(),
            exit_cleanup_ms: default_exit_cleanup(),
            completion_delay_ms: default_completion_delay(),
        }
    }
}

impl From<&TransitionConfig> for TransitionOptions {
    fn from(config: &TransitionConfig) -> Self {
        Self {
            enter_delay: Duration::from_millis(config.enter_delay_ms),
            exit_cleanup: Duration::from_millis(config.exit_cleanup_ms),
            completion_delay: Duration::from_millis(config.completion_delay_ms),
        }
    }
}

fn default_enter_delay() -> u64 {
    100
}

fn default_exit_cleanup() -> u64 {
    300
}

fn default_completion_delay() -> u64 {
    500
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SwipeConfig {
    /// Touches that take this long or longer are not swipes.
    #[serde(default = "default_swipe_max_duration")]
    pub max_duration_ms: u64,

    /// The horizontal distance a touch needs to travel to be a swipe, in pixels.
    #[serde(default = "default_swipe_min_distance")]
    pub min_distance: u32,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self { max_duration_ms: default_swipe_max_duration(), min_distance: default_swipe_min_distance() }
    }
}

impl From<&SwipeConfig> for SwipeOptions {
    fn from(config: &SwipeConfig) -> Self {
        Self { max_duration: Duration::from_millis(config.max_duration_ms), min_distance: config.min_distance as f64 }
    }
}

fn default_swipe_max_duration() -> u64 {
    300
}

fn default_swipe_min_distance() -> u32 {
    50
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThemeConfig {
    /// How long after a theme change subscribers get notified.
    #[serde(default = "default_notification_delay")]
    pub notification_delay_ms: u64,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self { notification_delay_ms: default_notification_delay() }
    }
}

fn default_notification_delay() -> u64 {
    100
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HelpConfig {
    /// Close the help overlay automatically after this long.
    #[serde(default = "default_help_auto_close")]
    pub auto_close_ms: u64,
}

impl Default for HelpConfig {
    fn default() -> Self {
        Self { auto_close_ms: default_help_auto_close() }
    }
}

fn default_help_auto_close() -> u64 {
    10_000
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TerminalConfig {
    /// How often animations are stepped while any are running.
    #[serde(default = "default_frame_interval")]
    pub frame_interval_ms: u64,

    /// The width of a cell in pixels, used when the terminal doesn't report its size.
    #[serde(default = "default_cell_width")]
    pub cell_width: u16,

    /// The height of a cell in pixels, used when the terminal doesn't report its size.
    #[serde(default = "default_cell_height")]
    pub cell_height: u16,
}

impl TerminalConfig {
    pub(crate) fn fallback_cell_size(&self) -> CellSize {
        CellSize { width: self.cell_width.max(1) as f64, height: self.cell_height.max(1) as f64 }
    }
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: default_frame_interval(),
            cell_width: default_cell_width(),
            cell_height: default_cell_height(),
        }
    }
}

fn default_frame_interval() -> u64 {
    16
}

fn default_cell_width() -> u16 {
    8
}

fn default_cell_height() -> u16 {
    16
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeyBindingsConfig {
    /// The keys that move to the next slide.
    #[serde(default = "default_next_bindings")]
    pub(crate) next: Vec<KeyBinding>,

    /// The keys that move to the previous slide.
    #[serde(default = "default_previous_bindings")]
    pub(crate) previous: Vec<KeyBinding>,

    /// The keys that jump to the first slide.
    #[serde(default = "default_first_slide_bindings")]
    pub(crate) first_slide: Vec<KeyBinding>,

    /// The keys that jump to the last slide.
    #[serde(default = "default_last_slide_bindings")]
    pub(crate) last_slide: Vec<KeyBinding>,

    /// The keys that switch between the light and dark themes.
    #[serde(default = "default_toggle_theme_bindings")]
    pub(crate) toggle_theme: Vec<KeyBinding>,

    /// The keys that toggle the help overlay.
    #[serde(default = "default_toggle_help_bindings")]
    pub(crate) toggle_help: Vec<KeyBinding>,

    /// The keys that toggle fullscreen mode.
    #[serde(default = "default_toggle_fullscreen_bindings")]
    pub(crate) toggle_fullscreen: Vec<KeyBinding>,

    /// The key binding to close the currently open modal.
    #[serde(default = "default_close_modal_bindings")]
    pub(crate) close_modal: Vec<KeyBinding>,

    /// The key binding to close the application.
    #[serde(default = "default_exit_bindings")]
    pub(crate) exit: Vec<KeyBinding>,
}

impl Default for KeyBindingsConfig {
    fn default() -> Self {
        Self {
            next: default_next_bindings(),
            previous: default_previous_bindings(),
            first_slide: default_first_slide_bindings(),
            last_slide: default_last_slide_bindings(),
            toggle_theme: default_toggle_theme_bindings(),
            toggle_help: default_toggle_help_bindings(),
            toggle_fullscreen: default_toggle_fullscreen_bindings(),
            close_modal: default_close_modal_bindings(),
            exit: default_exit_bindings(),
        }
    }
}

fn make_keybindings<const N: usize>(raw_bindings: [&str; N]) -> Vec<KeyBinding> {
    let mut bindings = Vec::new();
    for binding in raw_bindings {
        bindings.push(binding.parse().expect("invalid binding"));
    }
    bindings
}

fn default_next_bindings() -> Vec<KeyBinding> {
    make_keybindings(["<right>", "<down>", "<page_down>", " "])
}

fn default_previous_bindings() -> Vec<KeyBinding> {
    make_keybindings(["<left>", "<up>", "<page_up>"])
}

fn default_first_slide_bindings() -> Vec<KeyBinding> {
    make_keybindings(["<home>"])
}

fn default_last_slide_bindings() -> Vec<KeyBinding> {
    make_keybindings(["<end>"])
}

fn default_toggle_theme_bindings() -> Vec<KeyBinding> {
    make_keybindings(["t", "T"])
}

fn default_toggle_help_bindings() -> Vec<KeyBinding> {
    make_keybindings(["h", "H"])
}

fn default_toggle_fullscreen_bindings() -> Vec<KeyBinding> {
    make_keybindings(["f", "F"])
}

fn default_close_modal_bindings() -> Vec<KeyBinding> {
    make_keybindings(["<esc>"])
}

fn default_exit_bindings() -> Vec<KeyBinding> {
    make_keybindings(["q", "<c-c>"])
}
