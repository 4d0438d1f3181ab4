use crate::{
    slide::SlideIndex,
    theme::ThemePreference,
    ui::sync::{ButtonState, Counter, Progress},
};

/// The stacking layer a slide is drawn in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    Back,
    Front,
}

/// How a slide element should be presented.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlideStyle {
    /// Whether the slide takes part in the layout at all.
    pub active: bool,
    pub opacity: f32,

    /// Horizontal displacement from the resting position, in pixels.
    pub offset_x: i16,
    pub scale: f32,
    pub layer: Layer,
}

impl SlideStyle {
    /// A slide that's fully visible and at rest.
    pub const SHOWN: Self = Self { active: true, opacity: 1.0, offset_x: 0, scale: 1.0, layer: Layer::Front };

    /// A slide waiting off to the right.
    pub const HIDDEN: Self = Self { active: false, opacity: 0.0, offset_x: 100, scale: 0.95, layer: Layer::Back };

    /// A slide that's leaving towards the left.
    pub const EXITING: Self = Self { active: true, opacity: 0.0, offset_x: -100, scale: 0.95, layer: Layer::Back };

    /// A slide that's about to slide in from the right.
    pub const ENTERING: Self = Self { active: true, opacity: 0.0, offset_x: 100, scale: 0.95, layer: Layer::Front };

    /// Whether anything of this slide would be visible.
    pub fn is_visible(&self) -> bool {
        self.active && self.opacity > 0.0
    }
}

/// One of the navigation buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NavButton {
    Previous,
    Next,
}

/// An addressable part of the display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Element {
    Slide(SlideIndex),
    SlideElement { slide: SlideIndex, element: usize },
    Indicators,
    Counter,
    Button(NavButton),
    ProgressBar,
}

/// An update to an animated element within a slide.
#[derive(Clone, Debug, PartialEq)]
pub enum ElementUpdate {
    Hide,
    Reveal,
    Text(String),
    Ring { degrees: f64 },
    Fill { fraction: f64 },
}

#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("display element not found: {0:?}")]
    MissingElement(Element),
}

pub type SurfaceResult = Result<(), SurfaceError>;

/// The visual surface slides and navigation chrome are drawn on.
///
/// Every write is independent: a surface that lacks some element reports
/// [SurfaceError::MissingElement] for it and callers carry on with the rest.
pub trait DisplaySurface {
    fn present_slide(&mut self, slide: SlideIndex, style: SlideStyle) -> SurfaceResult;

    fn set_indicator(&mut self, position: SlideIndex, active: bool) -> SurfaceResult;

    fn set_counter(&mut self, counter: &Counter) -> SurfaceResult;

    fn set_nav_button(&mut self, button: NavButton, state: ButtonState) -> SurfaceResult;

    fn set_progress(&mut self, progress: Progress) -> SurfaceResult;

    fn update_element(&mut self, slide: SlideIndex, element: usize, update: ElementUpdate) -> SurfaceResult;

    fn apply_theme(&mut self, theme: ThemePreference);

    fn set_fullscreen(&mut self, enabled: bool);
}
