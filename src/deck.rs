//! Deck files.
//!
//! A deck is a YAML file listing the slides in presentation order. Every slide can carry a few
//! kinds of animated elements: body items that are revealed one after the other, statistics whose
//! numbers count up inside a progress ring, progress bars and a closing remark.

use crate::{
    animation::{AnimationPlan, CountUp},
    slide::{ArrivalHook, EmptyRegistry, SlideBuilder, SlideIndex, SlideRegistry},
};
use serde::Deserialize;
use std::{fs, io, path::Path, time::Duration};

const STATS_DELAY: Duration = Duration::from_millis(300);
const STATS_STAGGER: Duration = Duration::from_millis(150);
const COUNT_DURATION: Duration = Duration::from_millis(1500);
const LONG_COUNT_DURATION: Duration = Duration::from_millis(2000);
const RING_DURATION: Duration = Duration::from_millis(2000);
const BARS_DELAY: Duration = Duration::from_millis(600);
const CLOSING_DELAY: Duration = Duration::from_millis(300);

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Deck {
    /// The deck's title, shown in the chrome.
    #[serde(default)]
    pub title: Option<String>,

    pub slides: Vec<SlideContent>,
}

impl Deck {
    /// Load a deck from a path.
    pub fn load(path: &Path) -> Result<Self, DeckLoadError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(DeckLoadError::NotFound),
            Err(e) => return Err(e.into()),
        };
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, DeckLoadError> {
        let deck: Self = serde_yaml::from_str(contents)?;
        if deck.slides.is_empty() {
            return Err(EmptyRegistry.into());
        }
        Ok(deck)
    }

    /// Build the slide registry for this deck, with every slide animating its own elements on
    /// arrival.
    pub fn slide_registry(&self) -> Result<SlideRegistry, DeckLoadError> {
        let builders = self
            .slides
            .iter()
            .map(|slide| {
                let builder = SlideBuilder::default().hook(ContentAnimation::from(slide));
                match &slide.title {
                    Some(title) => builder.title(title),
                    None => builder,
                }
            })
            .collect();
        Ok(SlideRegistry::new(builders)?)
    }

    pub fn slide(&self, index: SlideIndex) -> Option<&SlideContent> {
        self.slides.get(index.position())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DeckLoadError {
    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("deck file not found")]
    NotFound,

    #[error("invalid deck: {0}")]
    Invalid(#[from] serde_yaml::Error),

    #[error(transparent)]
    Empty(#[from] EmptyRegistry),
}

/// The contents of a single slide.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlideContent {
    #[serde(default)]
    pub title: Option<String>,

    /// Body items, revealed one after the other.
    #[serde(default)]
    pub items: Vec<String>,

    /// Statistics shown as a counter inside a progress ring.
    #[serde(default)]
    pub stats: Vec<Stat>,

    /// Labeled progress bars.
    #[serde(default)]
    pub bars: Vec<Bar>,

    /// A remark revealed after every item.
    #[serde(default)]
    pub closing: Option<String>,

    /// The time between consecutive items being revealed.
    #[serde(default = "default_stagger")]
    pub stagger_ms: u64,
}

impl SlideContent {
    /// The total number of animated elements in this slide.
    pub fn element_count(&self) -> usize {
        self.items.len() + self.stats.len() + self.bars.len() + usize::from(self.closing.is_some())
    }

    /// Find out what a slide element index refers to.
    pub fn element(&self, index: usize) -> Option<SlideElement> {
        let mut offset = index;
        if offset < self.items.len() {
            return Some(SlideElement::Item(offset));
        }
        offset -= self.items.len();
        if offset < self.stats.len() {
            return Some(SlideElement::Stat(offset));
        }
        offset -= self.stats.len();
        if offset < self.bars.len() {
            return Some(SlideElement::Bar(offset));
        }
        offset -= self.bars.len();
        if offset == 0 && self.closing.is_some() { Some(SlideElement::Closing) } else { None }
    }

    fn stat_element(&self, stat: usize) -> usize {
        self.items.len() + stat
    }

    fn bar_element(&self, bar: usize) -> usize {
        self.items.len() + self.stats.len() + bar
    }

    fn closing_element(&self) -> usize {
        self.items.len() + self.stats.len() + self.bars.len()
    }
}

fn default_stagger() -> u64 {
    100
}

/// A statistic shown as a counter inside a progress ring.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Stat {
    pub label: String,

    /// The value to count up to. The ring fills up to at most 100.
    pub percent: u32,
}

/// A labeled progress bar.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Bar {
    pub label: String,
    pub percent: u8,
}

/// What a slide element index points to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlideElement {
    Item(usize),
    Stat(usize),
    Bar(usize),
    Closing,
}

/// Animates a slide's elements based on its contents.
#[derive(Clone, Debug)]
struct ContentAnimation {
    items: Vec<usize>,
    stats: Vec<(usize, u32)>,
    bars: Vec<(usize, u8)>,
    closing: Option<usize>,
    stagger: Duration,
}

impl From<&SlideContent> for ContentAnimation {
    fn from(slide: &SlideContent) -> Self {
        Self {
            items: (0..slide.items.len()).collect(),
            stats: slide.stats.iter().enumerate().map(|(i, stat)| (slide.stat_element(i), stat.percent)).collect(),
            bars: slide.bars.iter().enumerate().map(|(i, bar)| (slide.bar_element(i), bar.percent)).collect(),
            closing: slide.closing.as_ref().map(|_| slide.closing_element()),
            stagger: Duration::from_millis(slide.stagger_ms),
        }
    }
}

impl ArrivalHook for ContentAnimation {
    fn on_arrival(&self, _slide: SlideIndex, plan: &mut AnimationPlan) {
        for (position, element) in self.items.iter().enumerate() {
            plan.hide(*element);
            plan.reveal(*element, self.stagger * position as u32);
        }
        for (position, (element, percent)) in self.stats.iter().enumerate() {
            let delay = STATS_DELAY + STATS_STAGGER * position as u32;
            let duration = if *percent > 100 { LONG_COUNT_DURATION } else { COUNT_DURATION };
            let count = CountUp { from: 0, to: *percent as i64, duration, suffix: "%".into() };
            plan.ring(*element, (*percent).min(100) as f64, RING_DURATION, delay);
            plan.count(*element, count, delay);
        }
        for (position, (element, percent)) in self.bars.iter().enumerate() {
            plan.fill(*element, 0.0, Duration::ZERO);
            let fraction = (*percent).min(100) as f64 / 100.0;
            plan.fill(*element, fraction, BARS_DELAY + self.stagger * position as u32);
        }
        if let Some(element) = self.closing {
            plan.hide(element);
            plan.reveal(element, self.stagger * self.items.len() as u32 + CLOSING_DELAY);
        }
    }
}
