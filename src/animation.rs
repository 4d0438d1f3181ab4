//! Time-stepped element animations.
//!
//! Slide hooks describe what should happen to a slide's elements through an [AnimationPlan].
//! The plan becomes a set of [Animations] that are stepped once per frame until every one of
//! them finishes, or until they're cancelled because a new transition started. While paused,
//! nothing moves and every animation resumes where it left off.

use crate::{
    slide::SlideIndex,
    surface::{DisplaySurface, ElementUpdate},
};
use std::time::{Duration, Instant};

/// Cubic ease-out: fast at the start, slow at the end.
pub(crate) fn ease_out_cubic(progress: f64) -> f64 {
    1.0 - (1.0 - progress).powi(3)
}

/// A numeric counter going from one value to another.
#[derive(Clone, Debug, PartialEq)]
pub struct CountUp {
    pub from: i64,
    pub to: i64,
    pub duration: Duration,
    pub suffix: String,
}

impl CountUp {
    fn value_at(&self, progress: f64) -> i64 {
        let range = (self.to - self.from) as f64;
        (self.from as f64 + range * ease_out_cubic(progress)).round() as i64
    }
}

#[derive(Clone, Debug, PartialEq)]
enum AnimationKind {
    Hide,
    Reveal,
    Count(CountUp),
    Ring { percent: f64, duration: Duration },
    Fill { fraction: f64 },
}

/// A single animation on one element of a slide.
#[derive(Clone, Debug, PartialEq)]
struct ElementAnimation {
    element: usize,
    starts_at: Instant,
    kind: AnimationKind,
}

impl ElementAnimation {
    /// Compute this animation's update at `now`, along with whether it's finished.
    ///
    /// Returns `None` if the animation hasn't started yet.
    fn step(&self, now: Instant) -> Option<(ElementUpdate, bool)> {
        if now < self.starts_at {
            return None;
        }
        let elapsed = now - self.starts_at;
        let update = match &self.kind {
            AnimationKind::Hide => (ElementUpdate::Hide, true),
            AnimationKind::Reveal => (ElementUpdate::Reveal, true),
            AnimationKind::Fill { fraction } => (ElementUpdate::Fill { fraction: *fraction }, true),
            AnimationKind::Count(count) => {
                let progress = Self::progress(elapsed, count.duration);
                let text = format!("{}{}", count.value_at(progress), count.suffix);
                (ElementUpdate::Text(text), progress >= 1.0)
            }
            AnimationKind::Ring { percent, duration } => {
                let progress = Self::progress(elapsed, *duration);
                let degrees = percent.clamp(0.0, 100.0) * ease_out_cubic(progress) / 100.0 * 360.0;
                (ElementUpdate::Ring { degrees }, progress >= 1.0)
            }
        };
        Some(update)
    }

    fn progress(elapsed: Duration, duration: Duration) -> f64 {
        if duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / duration.as_secs_f64()).min(1.0)
    }
}

/// The animations a slide hook wants to run on arrival.
///
/// Delays are relative to the moment the hook runs.
#[derive(Debug)]
pub struct AnimationPlan {
    now: Instant,
    animations: Vec<ElementAnimation>,
}

impl AnimationPlan {
    pub(crate) fn new(now: Instant) -> Self {
        Self { now, animations: Vec::new() }
    }

    /// Hide an element right away.
    pub fn hide(&mut self, element: usize) {
        self.push(element, Duration::ZERO, AnimationKind::Hide);
    }

    /// Reveal an element after a delay.
    pub fn reveal(&mut self, element: usize, delay: Duration) {
        self.push(element, delay, AnimationKind::Reveal);
    }

    /// Count an element's text up after a delay.
    pub fn count(&mut self, element: usize, count: CountUp, delay: Duration) {
        self.push(element, delay, AnimationKind::Count(count));
    }

    /// Sweep a progress ring up to `percent` after a delay.
    pub fn ring(&mut self, element: usize, percent: f64, duration: Duration, delay: Duration) {
        self.push(element, delay, AnimationKind::Ring { percent, duration });
    }

    /// Set a bar's fill after a delay.
    pub fn fill(&mut self, element: usize, fraction: f64, delay: Duration) {
        self.push(element, delay, AnimationKind::Fill { fraction });
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    fn push(&mut self, element: usize, delay: Duration, kind: AnimationKind) {
        self.animations.push(ElementAnimation { element, starts_at: self.now + delay, kind });
    }
}

/// The animations currently running on a slide.
#[derive(Debug, Default)]
pub struct Animations {
    slide: Option<SlideIndex>,
    running: Vec<ElementAnimation>,
    paused_at: Option<Instant>,
}

impl Animations {
    /// Start running a plan on a slide, replacing anything that was running.
    pub fn start(&mut self, slide: SlideIndex, plan: AnimationPlan) {
        self.slide = Some(slide);
        self.running = plan.animations;
        if let Some(paused_at) = self.paused_at {
            // Resuming shifts everything by the whole pause, but this plan only waited since it was made.
            let offset = plan.now.saturating_duration_since(paused_at);
            for animation in &mut self.running {
                animation.starts_at = animation.starts_at.checked_sub(offset).unwrap_or(animation.starts_at);
            }
        }
    }

    /// Freeze every animation at `now`.
    pub fn pause(&mut self, now: Instant) {
        if self.paused_at.is_none() {
            self.paused_at = Some(now);
        }
    }

    /// Pick up where [Animations::pause] left off.
    pub fn resume(&mut self, now: Instant) {
        let Some(paused_at) = self.paused_at.take() else {
            return;
        };
        let paused_for = now.saturating_duration_since(paused_at);
        for animation in &mut self.running {
            animation.starts_at += paused_for;
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Drop every running animation, returning how many there were.
    pub fn cancel(&mut self) -> usize {
        self.slide = None;
        let count = self.running.len();
        self.running.clear();
        count
    }

    /// Step every running animation, writing updates into the surface.
    ///
    /// Returns whether anything was written.
    pub fn step<S: DisplaySurface + ?Sized>(&mut self, now: Instant, surface: &mut S) -> bool {
        let Some(slide) = self.slide else {
            return false;
        };
        if self.is_paused() {
            return false;
        }
        let mut updated = false;
        self.running.retain(|animation| {
            let Some((update, finished)) = animation.step(now) else {
                return true;
            };
            updated = true;
            if let Err(e) = surface.update_element(slide, animation.element, update) {
                tracing::trace!("dropping animation: {e}");
                return false;
            }
            !finished
        });
        updated
    }

    pub fn len(&self) -> usize {
        self.running.len()
    }

    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }
}
