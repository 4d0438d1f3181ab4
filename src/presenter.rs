use crate::{
    commands::{
        gesture::SwipeOptions,
        listener::{CellPosition, Command, CommandListener, InputEvent},
        pointer::{CellSize, ClickTarget, PointerRouter},
    },
    config::Config,
    deck::{Deck, DeckLoadError},
    navigation::Navigator,
    surface::DisplaySurface,
    terminal::{surface::TerminalSurface, TerminalWrite, WindowSize},
    theme::ThemeStore,
    timer::Clock,
    ui::help::{HelpOverlay, HelpState},
};
use std::{
    io::{self, Stdout},
    rc::Rc,
    time::Duration,
};

/// How long to wait for input when nothing is animating.
const IDLE_POLL: Duration = Duration::from_millis(100);

pub struct PresenterOptions {
    pub help_auto_close: Duration,
    pub frame_interval: Duration,
    pub swipe: SwipeOptions,
    pub cell_size_fallback: CellSize,
}

impl Default for PresenterOptions {
    fn default() -> Self {
        Self {
            help_auto_close: Duration::from_secs(10),
            frame_interval: Duration::from_millis(16),
            swipe: Default::default(),
            cell_size_fallback: Default::default(),
        }
    }
}

impl From<&Config> for PresenterOptions {
    fn from(config: &Config) -> Self {
        Self {
            help_auto_close: Duration::from_millis(config.help.auto_close_ms),
            frame_interval: Duration::from_millis(config.terminal.frame_interval_ms),
            swipe: (&config.swipe).into(),
            cell_size_fallback: config.terminal.fallback_cell_size(),
        }
    }
}

/// A slide deck presenter.
///
/// This type puts everything else together: it routes input into the navigator, the theme store
/// and the help overlay, drives time forward and draws whenever something changed.
pub struct Presenter<W: TerminalWrite = Stdout> {
    navigator: Navigator<TerminalSurface<W>>,
    theme: ThemeStore,
    pointer: PointerRouter,
    help: HelpState,
    clock: Rc<dyn Clock>,
    options: PresenterOptions,
}

impl Presenter<Stdout> {
    /// Take over the terminal to present a deck.
    pub fn open(deck: Deck, config: &Config, theme: ThemeStore, clock: Rc<dyn Clock>) -> Result<Self, PresentationError> {
        let slides = deck.slide_registry()?;
        let help = HelpOverlay::new(&config.bindings);
        let size = WindowSize::current()?;
        let surface = TerminalSurface::new(io::stdout(), deck, help, size)?;
        let navigator = Navigator::new(slides, surface, clock.clone(), (&config.transition).into());
        Ok(Self::new(navigator, theme, clock, config.into()))
    }
}

impl<W: TerminalWrite> Presenter<W> {
    /// Construct a new presenter.
    pub(crate) fn new(
        navigator: Navigator<TerminalSurface<W>>,
        theme: ThemeStore,
        clock: Rc<dyn Clock>,
        options: PresenterOptions,
    ) -> Self {
        let cell_size = navigator.display().size().cell_size().unwrap_or(options.cell_size_fallback);
        let pointer = PointerRouter::new(options.swipe.clone(), cell_size);
        Self { navigator, theme, pointer, help: HelpState::default(), clock, options }
    }

    /// Run the presentation until the user exits.
    pub fn present(mut self, mut commands: CommandListener) -> Result<(), PresentationError> {
        self.start();
        loop {
            self.update();
            self.render()?;

            let Some(event) = commands.try_next_event(self.poll_timeout())? else {
                continue;
            };
            match self.handle_event(event) {
                CommandSideEffect::Exit => return Ok(()),
                CommandSideEffect::Redraw => {
                    let size = WindowSize::current()?;
                    self.resize(size);
                }
                CommandSideEffect::None => (),
            };
        }
    }

    fn start(&mut self) {
        self.theme.apply(self.navigator.display_mut());
        self.navigator.start();
    }

    /// Run everything that's due: help overlay expiry, transition follow ups, animations and
    /// theme notifications.
    fn update(&mut self) {
        if self.help.expire(self.clock.now()) {
            tracing::debug!("closing help overlay");
            self.navigator.display_mut().set_help_open(false);
        }
        self.navigator.tick();
        self.theme.poll_notifications();
    }

    fn render(&mut self) -> io::Result<()> {
        let display = self.navigator.display_mut();
        if display.is_dirty() { display.render() } else { Ok(()) }
    }

    fn poll_timeout(&self) -> Duration {
        let animating = self.navigator.running_animations() > 0 && !self.navigator.animations_paused();
        let busy = animating || self.navigator.pending_timers() > 0 || self.theme.has_pending_notifications();
        if busy { self.options.frame_interval } else { IDLE_POLL }
    }

    fn resize(&mut self, size: WindowSize) {
        tracing::debug!(columns = size.columns, rows = size.rows, "terminal resized");
        self.pointer.set_cell_size(size.cell_size().unwrap_or(self.options.cell_size_fallback));
        self.navigator.display_mut().resize(size);
    }

    fn handle_event(&mut self, event: InputEvent) -> CommandSideEffect {
        match event {
            InputEvent::Command(command) => self.apply_command(command),
            InputEvent::PointerDown(position) => {
                self.pointer_down(position);
                CommandSideEffect::None
            }
            InputEvent::PointerUp(position) => {
                let target = self.navigator.display().layout().hit_test(position);
                match self.pointer.pointer_up(position, target, self.clock.now()) {
                    Some(command) => self.apply_command(command),
                    None => CommandSideEffect::None,
                }
            }
            InputEvent::FocusLost => {
                self.navigator.pause_animations();
                CommandSideEffect::None
            }
            InputEvent::FocusGained => {
                self.navigator.resume_animations();
                CommandSideEffect::None
            }
        }
    }

    fn pointer_down(&mut self, position: CellPosition) {
        let now = self.clock.now();
        let target = self.navigator.display().layout().hit_test(position);
        if self.help.is_open() {
            // The overlay captures every press while open, and pressing outside of it closes it.
            if target != Some(ClickTarget::HelpOverlay) {
                self.close_help();
            }
            self.pointer.pointer_down(position, Some(ClickTarget::HelpOverlay), now);
            return;
        }
        self.pointer.pointer_down(position, target, now);
    }

    fn apply_command(&mut self, command: Command) -> CommandSideEffect {
        if command.is_navigation() && self.navigator.is_transitioning() {
            tracing::trace!(?command, "ignoring navigation while transitioning");
            return CommandSideEffect::None;
        }
        match command {
            Command::Exit => return CommandSideEffect::Exit,
            Command::Redraw => return CommandSideEffect::Redraw,
            Command::Next => {
                self.navigator.next();
            }
            Command::Previous => {
                self.navigator.previous();
            }
            Command::FirstSlide => {
                self.navigator.first();
            }
            Command::LastSlide => {
                self.navigator.last();
            }
            Command::GoToSlide(number) => {
                self.navigator.go_to_slide(number);
            }
            Command::ToggleTheme => {
                self.theme.toggle_theme(self.navigator.display_mut());
            }
            Command::ToggleHelp => {
                if self.help.is_open() {
                    self.close_help();
                } else {
                    self.help.open(self.clock.now() + self.options.help_auto_close);
                    self.navigator.display_mut().set_help_open(true);
                }
            }
            Command::CloseModal => self.close_help(),
            Command::ToggleFullscreen => {
                let display = self.navigator.display_mut();
                let enabled = !display.is_fullscreen();
                display.set_fullscreen(enabled);
            }
        };
        CommandSideEffect::None
    }

    fn close_help(&mut self) {
        if self.help.close() {
            self.navigator.display_mut().set_help_open(false);
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum CommandSideEffect {
    Exit,
    Redraw,
    None,
}

/// An error when presenting.
#[derive(thiserror::Error, Debug)]
pub enum PresentationError {
    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Deck(#[from] DeckLoadError),
}
