use super::{
    gesture::{SwipeDetector, SwipeOptions, TouchPoint},
    listener::{CellPosition, Command},
};
use crate::slide::SlideIndex;
use std::time::Instant;

/// Something on screen that reacts to clicks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickTarget {
    Indicator(SlideIndex),
    PreviousButton,
    NextButton,
    ThemeToggle,
    HelpOverlay,
}

impl ClickTarget {
    /// The command a click on this target triggers, if any.
    pub(crate) fn command(self) -> Option<Command> {
        match self {
            Self::Indicator(slide) => Some(Command::GoToSlide(slide.get())),
            Self::PreviousButton => Some(Command::Previous),
            Self::NextButton => Some(Command::Next),
            Self::ThemeToggle => Some(Command::ToggleTheme),
            Self::HelpOverlay => None,
        }
    }
}

/// The size of a single terminal cell, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellSize {
    pub width: f64,
    pub height: f64,
}

impl Default for CellSize {
    fn default() -> Self {
        Self { width: 8.0, height: 16.0 }
    }
}

/// Routes pointer presses and releases to click targets or, failing that, the swipe detector.
#[derive(Debug, Default)]
pub struct PointerRouter {
    swipe: SwipeDetector,
    cell_size: CellSize,
    pressed: Option<ClickTarget>,
}

impl PointerRouter {
    pub fn new(options: SwipeOptions, cell_size: CellSize) -> Self {
        Self { swipe: SwipeDetector::new(options), cell_size, pressed: None }
    }

    pub fn set_cell_size(&mut self, cell_size: CellSize) {
        self.cell_size = cell_size;
    }

    /// Handle a press over the given target, if any.
    ///
    /// Presses on a target never reach the swipe detector.
    pub(crate) fn pointer_down(&mut self, position: CellPosition, target: Option<ClickTarget>, now: Instant) {
        self.pressed = target;
        match target {
            Some(_) => self.swipe.cancel(),
            None => self.swipe.touch_start(self.touch_point(position, now)),
        }
    }

    /// Handle a release over the given target, returning the command it results in.
    ///
    /// A click only counts if the pointer is released over the same target it was pressed on.
    pub(crate) fn pointer_up(
        &mut self,
        position: CellPosition,
        target: Option<ClickTarget>,
        now: Instant,
    ) -> Option<Command> {
        if let Some(pressed) = self.pressed.take() {
            return if target == Some(pressed) { pressed.command() } else { None };
        }
        self.swipe.touch_end(self.touch_point(position, now)).map(|direction| direction.command())
    }

    fn touch_point(&self, position: CellPosition, at: Instant) -> TouchPoint {
        // use the center of the cell
        let x = (position.column as f64 + 0.5) * self.cell_size.width;
        let y = (position.row as f64 + 0.5) * self.cell_size.height;
        TouchPoint { x, y, at }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;
    use std::time::Duration;

    fn at(column: u16, row: u16) -> CellPosition {
        CellPosition { column, row }
    }

    #[rstest]
    #[case::indicator(ClickTarget::Indicator(SlideIndex::new(4).unwrap()), Some(Command::GoToSlide(4)))]
    #[case::previous(ClickTarget::PreviousButton, Some(Command::Previous))]
    #[case::next(ClickTarget::NextButton, Some(Command::Next))]
    #[case::theme(ClickTarget::ThemeToggle, Some(Command::ToggleTheme))]
    #[case::overlay(ClickTarget::HelpOverlay, None)]
    fn click(#[case] target: ClickTarget, #[case] expected: Option<Command>) {
        let now = Instant::now();
        let mut router = PointerRouter::default();
        router.pointer_down(at(10, 10), Some(target), now);
        assert_eq!(router.pointer_up(at(10, 10), Some(target), now), expected);
    }

    #[test]
    fn click_does_not_swipe() {
        let now = Instant::now();
        let mut router = PointerRouter::default();
        // Press on a button and drag far enough to swipe.
        router.pointer_down(at(40, 10), Some(ClickTarget::NextButton), now);
        assert_eq!(router.pointer_up(at(0, 10), None, now + Duration::from_millis(100)), None);
    }

    #[test]
    fn release_on_another_target() {
        let now = Instant::now();
        let mut router = PointerRouter::default();
        router.pointer_down(at(75, 22), Some(ClickTarget::NextButton), now);
        assert_eq!(router.pointer_up(at(3, 22), Some(ClickTarget::PreviousButton), now), None);
    }

    #[test]
    fn swipe_left_is_next() {
        let now = Instant::now();
        let mut router = PointerRouter::default();
        router.pointer_down(at(30, 10), None, now);
        // 20 cells of 8 pixels each
        let command = router.pointer_up(at(10, 10), None, now + Duration::from_millis(200));
        assert_eq!(command, Some(Command::Next));
    }

    #[test]
    fn short_drag_is_ignored() {
        let now = Instant::now();
        let mut router = PointerRouter::default();
        router.pointer_down(at(15, 10), None, now);
        // 5 cells of 8 pixels each
        assert_eq!(router.pointer_up(at(10, 10), None, now + Duration::from_millis(200)), None);
    }

    #[test]
    fn cell_size_is_used() {
        let now = Instant::now();
        let mut router = PointerRouter::default();
        router.set_cell_size(CellSize { width: 20.0, height: 40.0 });
        router.pointer_down(at(10, 10), None, now);
        // 5 cells of 20 pixels each
        let command = router.pointer_up(at(15, 10), None, now + Duration::from_millis(200));
        assert_eq!(command, Some(Command::Previous));
    }
}
