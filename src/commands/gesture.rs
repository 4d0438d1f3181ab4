use super::listener::Command;
use std::time::{Duration, Instant};

/// A point where a touch started or ended, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchPoint {
    pub x: f64,
    pub y: f64,
    pub at: Instant,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SwipeOptions {
    /// Swipes must finish within this long.
    pub max_duration: Duration,

    /// The minimum horizontal distance, in pixels.
    pub min_distance: f64,
}

impl Default for SwipeOptions {
    fn default() -> Self {
        Self { max_duration: Duration::from_millis(300), min_distance: 50.0 }
    }
}

/// The direction the finger moved in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,
    Right,
}

impl SwipeDirection {
    /// Swiping left reveals the next slide, swiping right the previous one.
    pub(crate) fn command(self) -> Command {
        match self {
            Self::Left => Command::Next,
            Self::Right => Command::Previous,
        }
    }
}

/// Recognizes horizontal swipes out of touch start/end pairs.
#[derive(Debug, Default)]
pub struct SwipeDetector {
    options: SwipeOptions,
    start: Option<TouchPoint>,
}

impl SwipeDetector {
    pub fn new(options: SwipeOptions) -> Self {
        Self { options, start: None }
    }

    pub fn touch_start(&mut self, point: TouchPoint) {
        self.start = Some(point);
    }

    /// Forget about the touch in progress, if any.
    pub fn cancel(&mut self) {
        self.start = None;
    }

    /// Finish a touch, returning the swipe it made if it qualifies as one.
    pub fn touch_end(&mut self, end: TouchPoint) -> Option<SwipeDirection> {
        let start = self.start.take()?;
        let elapsed = end.at.saturating_duration_since(start.at);
        let dx = start.x - end.x;
        let dy = start.y - end.y;
        if elapsed >= self.options.max_duration || dx.abs() <= self.options.min_distance || dx.abs() <= dy.abs() {
            tracing::trace!(?elapsed, dx, dy, "ignoring touch");
            return None;
        }
        if dx > 0.0 { Some(SwipeDirection::Left) } else { Some(SwipeDirection::Right) }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    fn swipe(dx: f64, dy: f64, millis: u64) -> Option<SwipeDirection> {
        let now = Instant::now();
        let mut detector = SwipeDetector::default();
        detector.touch_start(TouchPoint { x: 200.0, y: 200.0, at: now });
        detector.touch_end(TouchPoint { x: 200.0 - dx, y: 200.0 - dy, at: now + Duration::from_millis(millis) })
    }

    #[rstest]
    #[case::next(80.0, 0.0, 200, Some(SwipeDirection::Left))]
    #[case::previous(-80.0, 0.0, 200, Some(SwipeDirection::Right))]
    #[case::too_short(40.0, 0.0, 200, None)]
    #[case::exactly_minimum(50.0, 0.0, 100, None)]
    #[case::too_slow(80.0, 0.0, 300, None)]
    #[case::vertical(80.0, 120.0, 100, None)]
    #[case::diagonal(80.0, 60.0, 100, Some(SwipeDirection::Left))]
    fn recognition(#[case] dx: f64, #[case] dy: f64, #[case] millis: u64, #[case] expected: Option<SwipeDirection>) {
        assert_eq!(swipe(dx, dy, millis), expected);
    }

    #[test]
    fn end_without_start() {
        let mut detector = SwipeDetector::default();
        let point = TouchPoint { x: 0.0, y: 0.0, at: Instant::now() };
        assert_eq!(detector.touch_end(point), None);
    }

    #[test]
    fn cancelled() {
        let now = Instant::now();
        let mut detector = SwipeDetector::default();
        detector.touch_start(TouchPoint { x: 200.0, y: 0.0, at: now });
        detector.cancel();
        assert_eq!(detector.touch_end(TouchPoint { x: 0.0, y: 0.0, at: now }), None);
    }

    #[test]
    fn commands() {
        assert_eq!(SwipeDirection::Left.command(), Command::Next);
        assert_eq!(SwipeDirection::Right.command(), Command::Previous);
    }
}
