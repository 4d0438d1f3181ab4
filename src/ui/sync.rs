use crate::{
    slide::SlideIndex,
    surface::{DisplaySurface, NavButton, SurfaceResult},
};

/// Whether a navigation button can be pressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonState {
    Enabled,
    Disabled,
}

impl ButtonState {
    pub fn is_disabled(self) -> bool {
        matches!(self, Self::Disabled)
    }
}

/// The "current of total" slide counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Counter {
    pub current: u32,
    pub total: u32,
}

impl Counter {
    pub fn current_text(&self) -> String {
        self.current.to_string()
    }

    pub fn total_text(&self) -> String {
        self.total.to_string()
    }
}

/// How far along the deck we are, counting the current slide as seen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    pub current: u32,
    pub total: u32,
}

impl Progress {
    /// The fill fraction in `(0, 1]`.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.current as f64 / self.total as f64
    }

    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.current as f64 * 100.0 / self.total as f64
    }
}

/// A snapshot of everything the navigation chrome shows, derived from the current slide.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UiSnapshot {
    current: SlideIndex,
    total: u32,
}

impl UiSnapshot {
    pub fn new(current: SlideIndex, total: u32) -> Self {
        Self { current, total }
    }

    /// Every indicator along with whether it's the active one.
    pub fn indicators(&self) -> impl Iterator<Item = (SlideIndex, bool)> + '_ {
        (1..=self.total).filter_map(SlideIndex::new).map(|position| (position, position == self.current))
    }

    pub fn counter(&self) -> Counter {
        Counter { current: self.current.get(), total: self.total }
    }

    pub fn button(&self, button: NavButton) -> ButtonState {
        let disabled = match button {
            NavButton::Previous => self.current.get() == 1,
            NavButton::Next => self.current.get() == self.total,
        };
        if disabled { ButtonState::Disabled } else { ButtonState::Enabled }
    }

    pub fn progress(&self) -> Progress {
        Progress { current: self.current.get(), total: self.total }
    }

    /// Write this snapshot into a surface.
    ///
    /// Each step runs regardless of whether the previous ones found their elements. Returns the
    /// number of steps that had to be skipped.
    pub fn apply<S: DisplaySurface + ?Sized>(&self, surface: &mut S) -> usize {
        let steps: [(&str, SurfaceResult); 5] = [
            ("indicators", self.apply_indicators(surface)),
            ("counter", surface.set_counter(&self.counter())),
            ("previous button", surface.set_nav_button(NavButton::Previous, self.button(NavButton::Previous))),
            ("next button", surface.set_nav_button(NavButton::Next, self.button(NavButton::Next))),
            ("progress bar", surface.set_progress(self.progress())),
        ];
        let mut skipped = 0;
        for (step, result) in steps {
            if let Err(e) = result {
                tracing::debug!(step, "skipping ui sync step: {e}");
                skipped += 1;
            }
        }
        skipped
    }

    fn apply_indicators<S: DisplaySurface + ?Sized>(&self, surface: &mut S) -> SurfaceResult {
        for (position, active) in self.indicators() {
            surface.set_indicator(position, active)?;
        }
        Ok(())
    }
}
