use super::WindowSize;
use crate::{
    commands::{listener::CellPosition, pointer::ClickTarget},
    slide::SlideIndex,
};

pub(crate) const PREVIOUS_BUTTON: &str = "[◀ Prev]";
pub(crate) const NEXT_BUTTON: &str = "[Next ▶]";
pub(crate) const THEME_TOGGLE_WIDTH: u16 = 3;

/// A rectangle in the terminal grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Rect {
    pub(crate) column: u16,
    pub(crate) row: u16,
    pub(crate) width: u16,
    pub(crate) height: u16,
}

impl Rect {
    pub(crate) fn contains(&self, position: CellPosition) -> bool {
        position.column >= self.column
            && position.column < self.column.saturating_add(self.width)
            && position.row >= self.row
            && position.row < self.row.saturating_add(self.height)
    }
}

/// Where every part of the screen goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Layout {
    pub(crate) header: Option<Rect>,
    pub(crate) theme_toggle: Option<Rect>,
    pub(crate) content: Rect,
    pub(crate) previous: Option<Rect>,
    pub(crate) next: Option<Rect>,
    pub(crate) counter_end: Option<CellPosition>,
    pub(crate) indicators: Vec<(SlideIndex, Rect)>,
    pub(crate) progress: Option<Rect>,
    pub(crate) help: Option<Rect>,
}

impl Layout {
    /// Compute the layout for a window.
    ///
    /// `help` is the size of the help overlay's contents, if it's open.
    pub(crate) fn new(size: &WindowSize, total_slides: u32, fullscreen: bool, help: Option<(u16, u16)>) -> Self {
        let WindowSize { rows, columns, .. } = *size;
        let help = help.map(|(width, height)| Self::centered(size, width + 4, height + 2));
        // Chrome takes a header row, a navigation row and a progress row.
        if fullscreen || rows < 6 {
            let content = Rect { column: 0, row: 0, width: columns, height: rows };
            return Self {
                header: None,
                theme_toggle: None,
                content,
                previous: None,
                next: None,
                counter_end: None,
                indicators: Vec::new(),
                progress: None,
                help,
            };
        }
        let header = Rect { column: 0, row: 0, width: columns, height: 1 };
        let theme_toggle = Rect {
            column: columns.saturating_sub(THEME_TOGGLE_WIDTH + 1),
            row: 0,
            width: THEME_TOGGLE_WIDTH,
            height: 1,
        };
        let content = Rect { column: 2, row: 2, width: columns.saturating_sub(4), height: rows - 5 };
        let nav_row = rows - 2;
        let button_width = |label: &str| unicode_width::UnicodeWidthStr::width(label) as u16;
        let previous = Rect { column: 1, row: nav_row, width: button_width(PREVIOUS_BUTTON), height: 1 };
        let next_width = button_width(NEXT_BUTTON);
        let next = Rect { column: columns.saturating_sub(next_width + 1), row: nav_row, width: next_width, height: 1 };
        let counter_end = CellPosition { column: next.column.saturating_sub(2), row: nav_row };

        // Indicators are one cell wide with one cell in between, centered.
        let needed = (total_slides as u16).saturating_mul(2).saturating_sub(1);
        let start = columns.saturating_sub(needed) / 2;
        let indicators = (1..=total_slides)
            .filter_map(SlideIndex::new)
            .map(|index| {
                let column = start.saturating_add((index.position() as u16).saturating_mul(2));
                (index, Rect { column, row: nav_row, width: 1, height: 1 })
            })
            .filter(|(_, rect)| rect.column < columns)
            .collect();
        let progress = Rect { column: 0, row: rows - 1, width: columns, height: 1 };
        Self {
            header: Some(header),
            theme_toggle: Some(theme_toggle),
            content,
            previous: Some(previous),
            next: Some(next),
            counter_end: Some(counter_end),
            indicators,
            progress: Some(progress),
            help,
        }
    }

    /// Find what's under a position.
    pub(crate) fn hit_test(&self, position: CellPosition) -> Option<ClickTarget> {
        if self.help.is_some_and(|rect| rect.contains(position)) {
            return Some(ClickTarget::HelpOverlay);
        }
        let targets = [
            (self.theme_toggle, ClickTarget::ThemeToggle),
            (self.previous, ClickTarget::PreviousButton),
            (self.next, ClickTarget::NextButton),
        ];
        for (rect, target) in targets {
            if rect.is_some_and(|rect| rect.contains(position)) {
                return Some(target);
            }
        }
        self.indicators.iter().find(|(_, rect)| rect.contains(position)).map(|(index, _)| ClickTarget::Indicator(*index))
    }

    fn centered(size: &WindowSize, width: u16, height: u16) -> Rect {
        let width = width.min(size.columns);
        let height = height.min(size.rows);
        Rect { column: (size.columns - width) / 2, row: (size.rows - height) / 2, width, height }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    fn window(columns: u16, rows: u16) -> WindowSize {
        WindowSize { rows, columns, width: 0, height: 0 }
    }

    fn at(column: u16, row: u16) -> CellPosition {
        CellPosition { column, row }
    }

    #[test]
    fn chrome() {
        let layout = Layout::new(&window(80, 24), 8, false, None);
        assert_eq!(layout.content, Rect { column: 2, row: 2, width: 76, height: 19 });
        assert_eq!(layout.previous, Some(Rect { column: 1, row: 22, width: 8, height: 1 }));
        assert_eq!(layout.next, Some(Rect { column: 71, row: 22, width: 8, height: 1 }));
        assert_eq!(layout.progress, Some(Rect { column: 0, row: 23, width: 80, height: 1 }));
        // 15 cells wide centered in 80
        let columns: Vec<_> = layout.indicators.iter().map(|(_, rect)| rect.column).collect();
        assert_eq!(columns, &[32, 34, 36, 38, 40, 42, 44, 46]);
    }

    #[test]
    fn fullscreen_has_no_chrome() {
        let layout = Layout::new(&window(80, 24), 8, true, None);
        assert_eq!(layout.content, Rect { column: 0, row: 0, width: 80, height: 24 });
        assert!(layout.indicators.is_empty());
        assert_eq!(layout.hit_test(at(75, 22)), None);
    }

    #[rstest]
    #[case::previous(at(3, 22), Some(ClickTarget::PreviousButton))]
    #[case::next(at(75, 22), Some(ClickTarget::NextButton))]
    #[case::theme(at(77, 0), Some(ClickTarget::ThemeToggle))]
    #[case::indicator(at(36, 22), Some(ClickTarget::Indicator(SlideIndex::new(3).unwrap())))]
    #[case::between_indicators(at(37, 22), None)]
    #[case::content(at(40, 10), None)]
    fn hits(#[case] position: CellPosition, #[case] expected: Option<ClickTarget>) {
        let layout = Layout::new(&window(80, 24), 8, false, None);
        assert_eq!(layout.hit_test(position), expected);
    }

    #[test]
    fn help_overlay_is_on_top() {
        let layout = Layout::new(&window(80, 24), 8, false, Some((40, 20)));
        assert_eq!(layout.help, Some(Rect { column: 18, row: 1, width: 44, height: 22 }));
        assert_eq!(layout.hit_test(at(36, 22)), Some(ClickTarget::HelpOverlay));
        assert_eq!(layout.hit_test(at(3, 22)), Some(ClickTarget::PreviousButton));
    }
}
