use crate::{
    animation::{AnimationPlan, Animations},
    slide::{SlideIndex, SlideRegistry},
    surface::{DisplaySurface, SlideStyle},
    timer::{Clock, TimerHandle, TimerRegistry},
    ui::sync::UiSnapshot,
};
use std::{
    rc::Rc,
    time::{Duration, Instant},
};

/// The timing of a slide transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionOptions {
    /// How long after a transition starts the incoming slide is revealed.
    pub enter_delay: Duration,

    /// How long after a transition starts the outgoing slide is deactivated.
    pub exit_cleanup: Duration,

    /// How long after a transition starts it's considered complete.
    pub completion_delay: Duration,
}

impl Default for TransitionOptions {
    fn default() -> Self {
        Self {
            enter_delay: Duration::from_millis(100),
            exit_cleanup: Duration::from_millis(300),
            completion_delay: Duration::from_millis(500),
        }
    }
}

/// A read only view of where the navigation is at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavigationState {
    pub current_slide: SlideIndex,
    pub is_transitioning: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Transitioning { from: SlideIndex, to: SlideIndex, completion: TimerHandle },
}

/// Work scheduled by an accepted transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FollowUp {
    /// Bring the incoming slide to rest.
    Reveal(SlideIndex),

    /// Take the outgoing slide out of the layout.
    Deactivate(SlideIndex),

    /// Finish the transition and run the arrival hook.
    Complete(SlideIndex),
}

/// The slide navigation state machine.
///
/// Owns the current slide and whether a transition is in flight. A transition is accepted only
/// while idle and moves the current slide right away, then completes once its completion delay
/// elapses. Every request made in between is dropped. Nothing happens on its own: the owner must
/// call [Navigator::tick] regularly so scheduled work runs.
pub struct Navigator<D: DisplaySurface> {
    slides: SlideRegistry,
    display: D,
    timers: TimerRegistry<FollowUp>,
    animations: Animations,
    clock: Rc<dyn Clock>,
    options: TransitionOptions,
    current: SlideIndex,
    phase: Phase,
}

impl<D: DisplaySurface> Navigator<D> {
    pub fn new(slides: SlideRegistry, display: D, clock: Rc<dyn Clock>, options: TransitionOptions) -> Self {
        Self {
            slides,
            display,
            timers: Default::default(),
            animations: Default::default(),
            clock,
            options,
            current: SlideIndex::FIRST,
            phase: Phase::Idle,
        }
    }

    pub fn state(&self) -> NavigationState {
        NavigationState { current_slide: self.current, is_transitioning: self.is_transitioning() }
    }

    pub fn current_slide(&self) -> SlideIndex {
        self.current
    }

    pub fn total_slides(&self) -> u32 {
        self.slides.total()
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.phase, Phase::Transitioning { .. })
    }

    /// The number of follow up tasks still waiting to run.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn running_animations(&self) -> usize {
        self.animations.len()
    }

    pub fn animations_paused(&self) -> bool {
        self.animations.is_paused()
    }

    /// Freeze slide animations. Transitions keep going.
    pub fn pause_animations(&mut self) {
        tracing::debug!(running = self.animations.len(), "pausing animations");
        self.animations.pause(self.clock.now());
    }

    pub fn resume_animations(&mut self) {
        tracing::debug!(running = self.animations.len(), "resuming animations");
        self.animations.resume(self.clock.now());
    }

    pub fn slides(&self) -> &SlideRegistry {
        &self.slides
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Lay out the initial scene and run the first slide's arrival hook.
    pub fn start(&mut self) {
        for slide in self.slides.iter() {
            let style = if slide.index() == self.current { SlideStyle::SHOWN } else { SlideStyle::HIDDEN };
            Self::present(&mut self.display, slide.index(), style);
        }
        self.sync_ui();
        self.arrive(self.current, self.clock.now());
    }

    /// Move to a slide.
    ///
    /// Returns whether the request was accepted. Targets that are out of range, the current slide
    /// or anything requested while a transition is in flight are silently ignored.
    pub fn go_to_slide(&mut self, target: u32) -> bool {
        let Some(target) = self.slides.resolve(target) else {
            tracing::trace!(target, total = self.slides.total(), "ignoring out of range slide");
            return false;
        };
        if target == self.current {
            tracing::trace!(%target, "already at slide");
            return false;
        }
        if let Phase::Transitioning { from, to, .. } = self.phase {
            tracing::trace!(%target, %from, %to, "ignoring navigation while transitioning");
            return false;
        }

        let cancelled_timers = self.timers.cancel_all();
        // A slide whose cleanup hadn't run yet must not stay active.
        for follow_up in &cancelled_timers {
            if let FollowUp::Deactivate(slide) = follow_up {
                Self::present(&mut self.display, *slide, SlideStyle::HIDDEN);
            }
        }
        let cancelled_animations = self.animations.cancel();
        let previous = self.current;
        self.current = target;
        tracing::debug!(
            %previous,
            %target,
            cancelled_timers = cancelled_timers.len(),
            cancelled_animations,
            "starting transition"
        );

        let now = self.clock.now();
        Self::present(&mut self.display, previous, SlideStyle::EXITING);
        self.timers.schedule_after(now, self.options.exit_cleanup, FollowUp::Deactivate(previous));
        Self::present(&mut self.display, target, SlideStyle::ENTERING);
        self.timers.schedule_after(now, self.options.enter_delay, FollowUp::Reveal(target));
        self.sync_ui();

        let completion = self.timers.schedule_after(now, self.options.completion_delay, FollowUp::Complete(target));
        self.phase = Phase::Transitioning { from: previous, to: target, completion };
        true
    }

    pub fn next(&mut self) -> bool {
        self.go_to_slide(self.current.get().saturating_add(1))
    }

    pub fn previous(&mut self) -> bool {
        self.go_to_slide(self.current.get() - 1)
    }

    pub fn first(&mut self) -> bool {
        self.go_to_slide(SlideIndex::FIRST.get())
    }

    pub fn last(&mut self) -> bool {
        self.go_to_slide(self.slides.last().get())
    }

    /// Run every follow up that's due and step running animations.
    ///
    /// Returns whether anything was written to the display.
    pub fn tick(&mut self) -> bool {
        let now = self.clock.now();
        let due = self.timers.take_due(now);
        let mut updated = !due.is_empty();
        for follow_up in due {
            match follow_up {
                FollowUp::Reveal(slide) => Self::present(&mut self.display, slide, SlideStyle::SHOWN),
                FollowUp::Deactivate(slide) => Self::present(&mut self.display, slide, SlideStyle::HIDDEN),
                FollowUp::Complete(slide) => self.complete(slide, now),
            }
        }
        if !self.animations.is_empty() {
            updated |= self.animations.step(now, &mut self.display);
        }
        updated
    }

    /// The next time [Navigator::tick] has work to do because of a scheduled follow up.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Write the navigation chrome for the current slide into the display.
    pub fn sync_ui(&mut self) {
        UiSnapshot::new(self.current, self.slides.total()).apply(&mut self.display);
    }

    fn complete(&mut self, slide: SlideIndex, now: Instant) {
        match self.phase {
            Phase::Transitioning { to, completion, .. } if to == slide => {
                tracing::debug!(%slide, %completion, "transition complete");
                self.phase = Phase::Idle;
                self.arrive(slide, now);
            }
            _ => tracing::warn!(%slide, "completion for a transition that's not in flight"),
        }
    }

    fn arrive(&mut self, slide: SlideIndex, now: Instant) {
        let Some(descriptor) = self.slides.get(slide) else {
            return;
        };
        let mut plan = AnimationPlan::new(now);
        descriptor.hook().on_arrival(slide, &mut plan);
        let title = descriptor.title().unwrap_or_default();
        tracing::debug!(%slide, title, animations = plan.len(), "arrived at slide");
        self.animations.start(slide, plan);
        // Run anything scheduled for right away.
        self.animations.step(now, &mut self.display);
    }

    fn present(display: &mut D, slide: SlideIndex, style: SlideStyle) {
        if let Err(e) = display.present_slide(slide, style) {
            tracing::debug!(%slide, "could not present slide: {e}");
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        slide::{ArrivalHook, SlideBuilder},
        surface::{recording::RecordingSurface, Element, NavButton},
        timer::ManualClock,
        ui::sync::ButtonState,
    };
    use rstest::rstest;
    use std::cell::RefCell;

    /// Records every arrival and optionally schedules a reveal far in the future.
    #[derive(Debug, Clone, Default)]
    struct RecordingHook {
        arrivals: Rc<RefCell<Vec<u32>>>,
        slow_reveal: bool,
    }

    impl ArrivalHook for RecordingHook {
        fn on_arrival(&self, slide: SlideIndex, plan: &mut AnimationPlan) {
            self.arrivals.borrow_mut().push(slide.get());
            plan.hide(0);
            if self.slow_reveal {
                plan.reveal(0, Duration::from_secs(10));
            }
        }
    }

    struct Fixture {
        navigator: Navigator<RecordingSurface>,
        clock: ManualClock,
        arrivals: Rc<RefCell<Vec<u32>>>,
    }

    impl Fixture {
        fn new(total: usize) -> Self {
            Self::build(total, RecordingSurface::default(), TransitionOptions::default(), false)
        }

        fn build(total: usize, surface: RecordingSurface, options: TransitionOptions, slow_reveal: bool) -> Self {
            let hook = RecordingHook { slow_reveal, ..Default::default() };
            let arrivals = hook.arrivals.clone();
            let slides = (0..total).map(|_| SlideBuilder::default().hook(hook.clone())).collect();
            let slides = SlideRegistry::new(slides).expect("empty registry");
            let clock = ManualClock::new();
            let navigator = Navigator::new(slides, surface, Rc::new(clock.clone()), options);
            Self { navigator, clock, arrivals }
        }

        fn started(total: usize) -> Self {
            let mut fixture = Self::new(total);
            fixture.navigator.start();
            fixture
        }

        fn wait(&mut self, millis: u64) {
            self.clock.advance_millis(millis);
            self.navigator.tick();
        }

        fn current(&self) -> u32 {
            self.navigator.current_slide().get()
        }

        fn style(&self, slide: u32) -> SlideStyle {
            self.navigator.display().slides[&slide]
        }

        fn arrivals(&self) -> Vec<u32> {
            self.arrivals.borrow().clone()
        }
    }

    #[test]
    fn initial_state() {
        let fixture = Fixture::new(8);
        let state = fixture.navigator.state();
        assert_eq!(state, NavigationState { current_slide: SlideIndex::FIRST, is_transitioning: false });
        assert_eq!(fixture.navigator.total_slides(), 8);
    }

    #[test]
    fn start_lays_out_scene() {
        let fixture = Fixture::started(4);
        let display = fixture.navigator.display();
        assert_eq!(display.slides[&1], SlideStyle::SHOWN);
        for slide in 2..=4 {
            assert_eq!(display.slides[&slide], SlideStyle::HIDDEN);
        }
        assert_eq!(display.active_indicators(), &[1]);
        assert_eq!(display.counter, Some(("1".into(), "4".into())));
        assert_eq!(fixture.arrivals(), &[1]);
        assert!(!fixture.navigator.is_transitioning());
    }

    #[rstest]
    #[case::zero(0)]
    #[case::past_end(9)]
    #[case::huge(u32::MAX)]
    fn out_of_range(#[case] target: u32) {
        let mut fixture = Fixture::started(8);
        let before = fixture.navigator.state();
        assert!(!fixture.navigator.go_to_slide(target));
        assert_eq!(fixture.navigator.state(), before);
        assert_eq!(fixture.navigator.pending_timers(), 0);
    }

    #[test]
    fn same_slide() {
        let mut fixture = Fixture::started(8);
        assert!(fixture.navigator.go_to_slide(3));
        fixture.wait(500);
        let writes = fixture.navigator.display().writes;

        assert!(!fixture.navigator.go_to_slide(3));
        assert_eq!(fixture.current(), 3);
        assert!(!fixture.navigator.is_transitioning());
        assert_eq!(fixture.navigator.pending_timers(), 0);
        assert_eq!(fixture.navigator.display().writes, writes);
    }

    #[test]
    fn accepted_transition() {
        let mut fixture = Fixture::started(8);
        assert!(fixture.navigator.go_to_slide(4));

        // Current slide moves right away and the chrome is already in sync.
        assert_eq!(fixture.current(), 4);
        assert!(fixture.navigator.is_transitioning());
        let display = fixture.navigator.display();
        assert_eq!(display.active_indicators(), &[4]);
        assert_eq!(display.counter, Some(("4".into(), "8".into())));
        assert_eq!(display.progress.map(|p| p.percent()), Some(50.0));
        assert_eq!(fixture.style(1), SlideStyle::EXITING);
        assert_eq!(fixture.style(4), SlideStyle::ENTERING);
        assert_eq!(fixture.navigator.pending_timers(), 3);

        // The hook only runs on completion.
        assert_eq!(fixture.arrivals(), &[1]);
    }

    #[test]
    fn follow_ups_run_in_order() {
        let mut fixture = Fixture::started(8);
        fixture.navigator.go_to_slide(2);

        fixture.wait(99);
        assert_eq!(fixture.style(2), SlideStyle::ENTERING);
        fixture.wait(1);
        assert_eq!(fixture.style(2), SlideStyle::SHOWN);
        assert_eq!(fixture.style(1), SlideStyle::EXITING);

        fixture.wait(200);
        assert_eq!(fixture.style(1), SlideStyle::HIDDEN);
        assert!(fixture.navigator.is_transitioning());

        fixture.wait(199);
        assert!(fixture.navigator.is_transitioning());
        fixture.wait(1);
        assert!(!fixture.navigator.is_transitioning());
        assert_eq!(fixture.navigator.pending_timers(), 0);
        assert_eq!(fixture.arrivals(), &[1, 2]);
    }

    #[rstest]
    #[case::go_to(|n: &mut Navigator<RecordingSurface>| n.go_to_slide(5))]
    #[case::next(|n: &mut Navigator<RecordingSurface>| n.next())]
    #[case::previous(|n: &mut Navigator<RecordingSurface>| n.previous())]
    #[case::first(|n: &mut Navigator<RecordingSurface>| n.first())]
    #[case::last(|n: &mut Navigator<RecordingSurface>| n.last())]
    fn rejected_while_transitioning(#[case] request: fn(&mut Navigator<RecordingSurface>) -> bool) {
        let mut fixture = Fixture::started(8);
        fixture.navigator.go_to_slide(3);
        fixture.wait(250);

        assert!(!request(&mut fixture.navigator));
        assert_eq!(fixture.current(), 3);
        assert!(fixture.navigator.is_transitioning());

        fixture.wait(250);
        assert!(!fixture.navigator.is_transitioning());
        assert_eq!(fixture.current(), 3);
        assert_eq!(fixture.arrivals(), &[1, 3]);
    }

    #[test]
    fn boundaries() {
        let mut fixture = Fixture::started(3);
        assert!(!fixture.navigator.previous());
        assert_eq!(fixture.current(), 1);

        assert!(fixture.navigator.last());
        fixture.wait(500);
        assert_eq!(fixture.current(), 3);
        assert!(!fixture.navigator.next());
        assert_eq!(fixture.current(), 3);
        assert!(!fixture.navigator.is_transitioning());

        assert!(fixture.navigator.first());
        fixture.wait(500);
        assert_eq!(fixture.current(), 1);
    }

    #[test]
    fn five_steps_forward() {
        let mut fixture = Fixture::started(8);
        for _ in 0..5 {
            assert!(fixture.navigator.next());
            fixture.wait(500);
        }
        assert_eq!(fixture.current(), 6);
        let display = fixture.navigator.display();
        assert_eq!(display.progress.map(|p| p.percent()), Some(75.0));
        assert_eq!(display.active_indicators(), &[6]);
        assert_eq!(fixture.arrivals(), &[1, 2, 3, 4, 5, 6]);
    }

    #[rstest]
    #[case::first(1, ButtonState::Disabled, ButtonState::Enabled)]
    #[case::middle(4, ButtonState::Enabled, ButtonState::Enabled)]
    #[case::last(8, ButtonState::Enabled, ButtonState::Disabled)]
    fn buttons(#[case] slide: u32, #[case] previous: ButtonState, #[case] next: ButtonState) {
        let mut fixture = Fixture::started(8);
        fixture.navigator.go_to_slide(slide);
        let buttons = &fixture.navigator.display().buttons;
        assert_eq!(buttons[&NavButton::Previous], previous);
        assert_eq!(buttons[&NavButton::Next], next);
    }

    #[test]
    fn hook_runs_once_per_arrival() {
        let mut fixture = Fixture::started(8);
        fixture.navigator.go_to_slide(2);
        fixture.wait(500);
        // Extra ticks don't fire it again.
        fixture.wait(500);
        fixture.wait(5000);
        fixture.navigator.go_to_slide(1);
        fixture.wait(500);
        assert_eq!(fixture.arrivals(), &[1, 2, 1]);
    }

    #[test]
    fn animations_cancelled_on_transition() {
        let mut fixture = Fixture::build(4, RecordingSurface::default(), TransitionOptions::default(), true);
        fixture.navigator.start();
        // The hide ran right away, the reveal is still waiting.
        assert_eq!(fixture.navigator.running_animations(), 1);

        fixture.navigator.next();
        assert_eq!(fixture.navigator.running_animations(), 0);
        fixture.wait(500);
        assert_eq!(fixture.navigator.running_animations(), 1);

        // Slide 1's reveal never made it.
        fixture.wait(20_000);
        let elements = &fixture.navigator.display().elements;
        assert_eq!(elements.get(&(1, 0)), Some(&crate::surface::ElementUpdate::Hide));
    }

    #[test]
    fn paused_animations_let_transitions_finish() {
        let mut fixture = Fixture::build(4, RecordingSurface::default(), TransitionOptions::default(), true);
        fixture.navigator.start();
        fixture.navigator.pause_animations();

        fixture.navigator.next();
        fixture.wait(500);
        assert!(!fixture.navigator.is_transitioning());
        assert_eq!(fixture.style(2), SlideStyle::SHOWN);
        assert_eq!(fixture.arrivals(), &[1, 2]);
        // Slide 2's hide is waiting for the resume.
        assert!(!fixture.navigator.display().elements.contains_key(&(2, 0)));

        fixture.wait(60_000);
        fixture.navigator.resume_animations();
        fixture.wait(0);
        let elements = &fixture.navigator.display().elements;
        assert_eq!(elements.get(&(2, 0)), Some(&crate::surface::ElementUpdate::Hide));
        assert_eq!(fixture.navigator.running_animations(), 1);
        fixture.wait(10_000);
        let elements = &fixture.navigator.display().elements;
        assert_eq!(elements.get(&(2, 0)), Some(&crate::surface::ElementUpdate::Reveal));
    }

    #[test]
    fn timers_cancelled_on_acceptance() {
        let options = TransitionOptions { exit_cleanup: Duration::from_millis(1000), ..Default::default() };
        let mut fixture = Fixture::build(4, RecordingSurface::default(), options, false);
        fixture.navigator.start();
        fixture.navigator.go_to_slide(2);
        fixture.wait(500);
        assert!(!fixture.navigator.is_transitioning());
        // Slide 1's deactivation is still pending.
        assert_eq!(fixture.navigator.pending_timers(), 1);

        fixture.navigator.go_to_slide(3);
        assert_eq!(fixture.navigator.pending_timers(), 3);
        // Its cleanup was cancelled so it's taken out of the layout right away.
        assert_eq!(fixture.style(1), SlideStyle::HIDDEN);
        fixture.wait(5000);
        assert_eq!(fixture.style(1), SlideStyle::HIDDEN);
        assert_eq!(fixture.style(2), SlideStyle::HIDDEN);
        assert_eq!(fixture.style(3), SlideStyle::SHOWN);
    }

    #[test]
    fn long_cleanup_leaves_one_active_slide() {
        let options = TransitionOptions { exit_cleanup: Duration::from_millis(800), ..Default::default() };
        let mut fixture = Fixture::build(4, RecordingSurface::default(), options, false);
        fixture.navigator.start();
        fixture.navigator.go_to_slide(2);
        fixture.wait(500);
        fixture.navigator.go_to_slide(3);
        fixture.wait(60_000);

        let display = fixture.navigator.display();
        let active: Vec<_> = display.slides.iter().filter(|(_, style)| style.active).map(|(slide, _)| *slide).collect();
        assert_eq!(active, &[3]);
    }

    #[test]
    fn missing_elements_dont_block_navigation() {
        let surface = RecordingSurface::without(&[Element::Counter, Element::Slide(SlideIndex::FIRST)]);
        let mut fixture = Fixture::build(3, surface, TransitionOptions::default(), false);
        fixture.navigator.start();
        assert!(fixture.navigator.next());
        fixture.wait(500);
        assert_eq!(fixture.current(), 2);
        let display = fixture.navigator.display();
        assert_eq!(display.counter, None);
        assert_eq!(display.active_indicators(), &[2]);
        assert_eq!(display.progress.map(|p| p.current), Some(2));
    }

    #[test]
    fn next_deadline() {
        let mut fixture = Fixture::started(3);
        assert_eq!(fixture.navigator.next_deadline(), None);
        let now = fixture.clock.now();
        fixture.navigator.next();
        assert_eq!(fixture.navigator.next_deadline(), Some(now + Duration::from_millis(100)));
    }
}
