//! Slidedeck: a slide deck presentation controller.
//!
//! The core is a navigation state machine that sequences slide transitions, keeps the
//! presentation's chrome in sync and schedules per slide animations. The terminal host drives it
//! with keyboard and mouse input.

pub(crate) mod animation;
pub(crate) mod commands;
pub(crate) mod config;
pub(crate) mod deck;
pub(crate) mod logging;
pub(crate) mod navigation;
pub(crate) mod presenter;
pub(crate) mod slide;
pub(crate) mod surface;
pub(crate) mod terminal;
pub(crate) mod theme;
pub(crate) mod timer;
pub(crate) mod ui;

pub use crate::{
    animation::{AnimationPlan, CountUp},
    commands::{keyboard::KeyBindingsValidationError, listener::CommandListener},
    config::{Config, ConfigLoadError, KeyBindingsConfig},
    deck::{Deck, DeckLoadError},
    logging::{init_logging, LogConfig},
    navigation::{NavigationState, Navigator, TransitionOptions},
    presenter::{PresentationError, Presenter, PresenterOptions},
    slide::{ArrivalHook, EmptyRegistry, NoAnimation, SlideBuilder, SlideIndex, SlideRegistry},
    surface::{DisplaySurface, Element, ElementUpdate, Layer, NavButton, SlideStyle, SurfaceError, SurfaceResult},
    terminal::{TerminalWrite, WindowSize},
    theme::{
        store::{
            FilePreferenceStore, MemoryPreferenceStore, PreferenceStore, PreferenceStoreError, UnavailablePreferenceStore,
        },
        ThemePreference, ThemeStore, ThemeSubscriber,
    },
    timer::{Clock, SystemClock, TimerHandle, TimerRegistry},
    ui::{
        help::HelpOverlay,
        sync::{ButtonState, Counter, Progress, UiSnapshot},
    },
};
