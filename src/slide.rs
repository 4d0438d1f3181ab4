use crate::animation::AnimationPlan;
use std::{fmt, num::NonZeroU32};

/// A 1-based slide position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlideIndex(NonZeroU32);

impl SlideIndex {
    pub const FIRST: Self = Self(NonZeroU32::MIN);

    /// Construct an index, returning `None` for 0.
    pub fn new(number: u32) -> Option<Self> {
        NonZeroU32::new(number).map(Self)
    }

    /// The 1-based slide number.
    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// The 0-based position of this slide within its registry.
    pub(crate) fn position(self) -> usize {
        self.0.get() as usize - 1
    }
}

impl fmt::Display for SlideIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Slide specific entrance choreography, invoked once every time a slide is arrived at.
pub trait ArrivalHook: fmt::Debug {
    fn on_arrival(&self, slide: SlideIndex, plan: &mut AnimationPlan);
}

/// A hook that doesn't animate anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoAnimation;

impl ArrivalHook for NoAnimation {
    fn on_arrival(&self, _slide: SlideIndex, _plan: &mut AnimationPlan) {}
}

/// The description of a single slide.
#[derive(Debug)]
pub struct SlideDescriptor {
    index: SlideIndex,
    title: Option<String>,
    hook: Box<dyn ArrivalHook>,
}

impl SlideDescriptor {
    pub fn index(&self) -> SlideIndex {
        self.index
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub(crate) fn hook(&self) -> &dyn ArrivalHook {
        self.hook.as_ref()
    }
}

/// A slide builder.
#[derive(Debug)]
pub struct SlideBuilder {
    title: Option<String>,
    hook: Box<dyn ArrivalHook>,
}

impl Default for SlideBuilder {
    fn default() -> Self {
        Self { title: None, hook: Box::new(NoAnimation) }
    }
}

impl SlideBuilder {
    pub fn title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn hook<H: ArrivalHook + 'static>(mut self, hook: H) -> Self {
        self.hook = Box::new(hook);
        self
    }
}

/// The ordered, immutable set of slides in a deck.
#[derive(Debug)]
pub struct SlideRegistry {
    slides: Vec<SlideDescriptor>,
}

impl SlideRegistry {
    /// Build a registry, assigning indexes in order starting at 1.
    pub fn new(slides: Vec<SlideBuilder>) -> Result<Self, EmptyRegistry> {
        if slides.is_empty() {
            return Err(EmptyRegistry);
        }
        let slides = slides
            .into_iter()
            .zip(1..)
            .filter_map(|(builder, number)| {
                let index = SlideIndex::new(number)?;
                Some(SlideDescriptor { index, title: builder.title, hook: builder.hook })
            })
            .collect();
        Ok(Self { slides })
    }

    /// The number of slides. This never changes after construction.
    pub fn total(&self) -> u32 {
        self.slides.len() as u32
    }

    /// The last slide in the deck.
    pub fn last(&self) -> SlideIndex {
        self.slides.last().map(|slide| slide.index).unwrap_or(SlideIndex::FIRST)
    }

    /// Resolve a 1-based slide number, returning `None` if it's out of range.
    pub fn resolve(&self, number: u32) -> Option<SlideIndex> {
        SlideIndex::new(number).filter(|index| index.get() <= self.total())
    }

    pub fn get(&self, index: SlideIndex) -> Option<&SlideDescriptor> {
        self.slides.get(index.position())
    }

    pub fn iter(&self) -> impl Iterator<Item = &SlideDescriptor> {
        self.slides.iter()
    }
}

#[derive(Debug, thiserror::Error)]
#[error("a deck needs at least one slide")]
pub struct EmptyRegistry;
