pub(crate) mod store;

use crate::{
    surface::DisplaySurface,
    timer::{Clock, TimerRegistry},
};
use serde::{Deserialize, Serialize};
use std::{rc::Rc, str::FromStr, time::Duration};
use store::PreferenceStore;

/// The key the theme preference is persisted under.
pub const THEME_KEY: &str = "presentationTheme";

/// The light/dark visual mode.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
}

impl ThemePreference {
    /// The opposite theme.
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Something that wants to know when the theme changes, e.g. to recompute themed colors.
pub trait ThemeSubscriber {
    fn theme_changed(&mut self, theme: ThemePreference);
}

impl<F: FnMut(ThemePreference)> ThemeSubscriber for F {
    fn theme_changed(&mut self, theme: ThemePreference) {
        self(theme)
    }
}

/// Holds the current theme and keeps it in sync with a preference store.
pub struct ThemeStore {
    current: ThemePreference,
    store: Box<dyn PreferenceStore>,
    subscribers: Vec<Box<dyn ThemeSubscriber>>,
    notifications: TimerRegistry<ThemePreference>,
    notification_delay: Duration,
    clock: Rc<dyn Clock>,
}

impl ThemeStore {
    /// Construct a theme store, reading the persisted theme once.
    pub fn new(store: Box<dyn PreferenceStore>, clock: Rc<dyn Clock>, notification_delay: Duration) -> Self {
        let current = Self::read_theme(store.as_ref());
        Self { current, store, subscribers: Vec::new(), notifications: Default::default(), notification_delay, clock }
    }

    /// The persisted theme, or [ThemePreference::Light] if there's none or it can't be read.
    pub fn get_theme(&self) -> ThemePreference {
        Self::read_theme(self.store.as_ref())
    }

    /// The theme currently applied.
    pub fn current(&self) -> ThemePreference {
        self.current
    }

    /// Use a theme for this session only, without persisting it.
    pub fn override_theme(&mut self, theme: ThemePreference) {
        self.current = theme;
    }

    /// Apply the current theme to a surface without persisting it.
    pub fn apply<S: DisplaySurface + ?Sized>(&self, surface: &mut S) {
        surface.apply_theme(self.current);
    }

    /// Switch to a theme.
    ///
    /// The surface is updated right away, the choice is persisted if possible and subscribers are
    /// notified shortly after.
    pub fn set_theme<S: DisplaySurface + ?Sized>(&mut self, theme: ThemePreference, surface: &mut S) {
        tracing::debug!(%theme, "changing theme");
        self.current = theme;
        surface.apply_theme(theme);
        if let Err(e) = self.store.set(THEME_KEY, &theme.to_string()) {
            tracing::debug!("could not persist theme preference: {e}");
        }
        self.notifications.schedule_after(self.clock.now(), self.notification_delay, theme);
    }

    /// Flip between light and dark, returning the new theme.
    pub fn toggle_theme<S: DisplaySurface + ?Sized>(&mut self, surface: &mut S) -> ThemePreference {
        let theme = self.current.toggled();
        self.set_theme(theme, surface);
        theme
    }

    pub fn subscribe<T: ThemeSubscriber + 'static>(&mut self, subscriber: T) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Deliver any notifications that are due, returning how many were delivered.
    pub fn poll_notifications(&mut self) -> usize {
        let due = self.notifications.take_due(self.clock.now());
        for theme in &due {
            for subscriber in &mut self.subscribers {
                subscriber.theme_changed(*theme);
            }
        }
        due.len()
    }

    pub fn has_pending_notifications(&self) -> bool {
        !self.notifications.is_empty()
    }

    fn read_theme(store: &dyn PreferenceStore) -> ThemePreference {
        store.get(THEME_KEY).and_then(|value| ThemePreference::from_str(&value).ok()).unwrap_or_default()
    }
}
