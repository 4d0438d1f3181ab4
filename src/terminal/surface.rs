use super::{
    frame::{CellStyle, Frame},
    layout::{Layout, Rect, NEXT_BUTTON, PREVIOUS_BUTTON},
    TerminalWrite, WindowSize,
};
use crate::{
    deck::{Deck, SlideContent, SlideElement},
    slide::SlideIndex,
    surface::{DisplaySurface, Element, ElementUpdate, Layer, NavButton, SlideStyle, SurfaceError, SurfaceResult},
    theme::ThemePreference,
    ui::{
        help::HelpOverlay,
        sync::{ButtonState, Counter, Progress},
    },
};
use crossterm::style::Color;
use std::{collections::HashMap, io};
use unicode_width::UnicodeWidthStr;

const GAUGE_WIDTH: u16 = 20;

/// The colors used to draw everything.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Palette {
    background: Color,
    foreground: Color,
    muted: Color,
    accent: Color,
    track: Color,
}

impl From<ThemePreference> for Palette {
    fn from(theme: ThemePreference) -> Self {
        match theme {
            ThemePreference::Light => Self {
                background: Color::Rgb { r: 252, g: 252, b: 249 },
                foreground: Color::Rgb { r: 19, g: 52, b: 59 },
                muted: Color::Rgb { r: 98, g: 108, b: 113 },
                accent: Color::Rgb { r: 33, g: 128, b: 141 },
                track: Color::Rgb { r: 230, g: 232, b: 232 },
            },
            ThemePreference::Dark => Self {
                background: Color::Rgb { r: 31, g: 33, b: 33 },
                foreground: Color::Rgb { r: 245, g: 245, b: 245 },
                muted: Color::Rgb { r: 167, g: 169, b: 169 },
                accent: Color::Rgb { r: 50, g: 184, b: 198 },
                track: Color::Rgb { r: 60, g: 64, b: 64 },
            },
        }
    }
}

impl Palette {
    fn text(&self) -> CellStyle {
        CellStyle::new(self.foreground, self.background)
    }

    fn muted(&self) -> CellStyle {
        CellStyle::new(self.muted, self.background)
    }

    fn accent(&self) -> CellStyle {
        CellStyle::new(self.accent, self.background)
    }
}

/// The animated state of a single slide element.
#[derive(Clone, Debug, Default, PartialEq)]
struct ElementState {
    hidden: bool,
    text: Option<String>,
    ring: Option<f64>,
    fill: Option<f64>,
}

/// A display surface that draws the deck in a terminal.
///
/// Writes only update the surface's state; nothing is drawn until [TerminalSurface::render] is
/// called.
pub(crate) struct TerminalSurface<W: TerminalWrite> {
    writer: W,
    deck: Deck,
    help: HelpOverlay,
    size: WindowSize,
    palette: Palette,
    theme: ThemePreference,
    fullscreen: bool,
    help_open: bool,
    slides: Vec<SlideStyle>,
    indicators: Vec<bool>,
    counter: Option<Counter>,
    buttons: HashMap<NavButton, ButtonState>,
    progress: Option<Progress>,
    elements: HashMap<(SlideIndex, usize), ElementState>,
    dirty: bool,
}

impl<W: TerminalWrite> TerminalSurface<W> {
    pub(crate) fn new(mut writer: W, deck: Deck, help: HelpOverlay, size: WindowSize) -> io::Result<Self> {
        writer.init()?;
        let total = deck.slides.len();
        Ok(Self {
            writer,
            deck,
            help,
            size,
            palette: ThemePreference::default().into(),
            theme: ThemePreference::default(),
            fullscreen: false,
            help_open: false,
            slides: vec![SlideStyle::HIDDEN; total],
            indicators: vec![false; total],
            counter: None,
            buttons: HashMap::new(),
            progress: None,
            elements: HashMap::new(),
            dirty: true,
        })
    }

    pub(crate) fn resize(&mut self, size: WindowSize) {
        self.size = size;
        self.dirty = true;
    }

    pub(crate) fn size(&self) -> &WindowSize {
        &self.size
    }

    pub(crate) fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub(crate) fn set_help_open(&mut self, open: bool) {
        if self.help_open != open {
            self.help_open = open;
            self.dirty = true;
        }
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn layout(&self) -> Layout {
        let help = self.help_open.then(|| {
            let lines = self.help.lines();
            let width = lines.iter().map(|line| line.width()).max().unwrap_or(0) as u16;
            (width, lines.len() as u16)
        });
        Layout::new(&self.size, self.deck.slides.len() as u32, self.fullscreen, help)
    }

    /// Draw everything into the terminal.
    pub(crate) fn render(&mut self) -> io::Result<()> {
        let frame = self.frame();
        frame.write_to(&mut self.writer)?;
        self.dirty = false;
        Ok(())
    }

    fn frame(&self) -> Frame {
        let layout = self.layout();
        let mut frame = Frame::new(self.size.columns, self.size.rows, self.palette.text());
        self.draw_header(&mut frame, &layout);
        self.draw_slides(&mut frame, &layout);
        self.draw_navigation(&mut frame, &layout);
        self.draw_progress(&mut frame, &layout);
        if let Some(rect) = layout.help {
            self.draw_help(&mut frame, rect);
        }
        frame
    }

    fn draw_header(&self, frame: &mut Frame, layout: &Layout) {
        let Some(header) = layout.header else {
            return;
        };
        if let Some(title) = &self.deck.title {
            frame.print(header.column + 1, header.row, title, self.palette.muted().bold());
        }
        if let Some(toggle) = layout.theme_toggle {
            let icon = match self.theme {
                ThemePreference::Light => "[☾]",
                ThemePreference::Dark => "[☀]",
            };
            frame.print(toggle.column, toggle.row, icon, self.palette.accent());
        }
    }

    fn draw_slides(&self, frame: &mut Frame, layout: &Layout) {
        // Back layer first so the front one ends up on top.
        for layer in [Layer::Back, Layer::Front] {
            for (position, style) in self.slides.iter().enumerate() {
                if style.layer != layer || !style.is_visible() {
                    continue;
                }
                let Some(index) = SlideIndex::new(position as u32 + 1) else {
                    continue;
                };
                if let Some(content) = self.deck.slide(index) {
                    self.draw_slide(frame, layout.content, index, content, style);
                }
            }
        }
    }

    fn draw_slide(&self, frame: &mut Frame, area: Rect, index: SlideIndex, content: &SlideContent, style: &SlideStyle) {
        let faded = style.opacity < 1.0;
        let text = if faded { self.palette.muted() } else { self.palette.text() };
        let accent = if faded { self.palette.muted() } else { self.palette.accent() };
        let bottom = area.row.saturating_add(area.height);
        let mut row = area.row;
        if let Some(title) = &content.title {
            frame.print(area.column, row, title, accent.bold());
            row += 2;
        }
        for element in 0..content.element_count() {
            if row >= bottom {
                break;
            }
            let state = self.elements.get(&(index, element)).cloned().unwrap_or_default();
            if state.hidden {
                row += 1;
                continue;
            }
            match content.element(element) {
                Some(SlideElement::Item(item)) => {
                    let column = frame.print(area.column, row, "• ", accent);
                    frame.print(column, row, &content.items[item], text);
                }
                Some(SlideElement::Stat(stat)) => {
                    let stat = &content.stats[stat];
                    let column = frame.print(area.column, row, &stat.label, text);
                    let fraction = state.ring.unwrap_or(0.0) / 360.0;
                    let column = Self::draw_gauge(frame, column + 2, row, fraction, accent, self.palette.track);
                    let value = state.text.as_deref().unwrap_or("0%");
                    frame.print(column + 1, row, value, accent.bold());
                }
                Some(SlideElement::Bar(bar)) => {
                    let bar = &content.bars[bar];
                    let column = frame.print(area.column, row, &bar.label, text);
                    let fraction = state.fill.unwrap_or(0.0);
                    let column = Self::draw_gauge(frame, column + 2, row, fraction, accent, self.palette.track);
                    frame.print(column + 1, row, &format!("{}%", bar.percent), text);
                }
                Some(SlideElement::Closing) => {
                    if let Some(closing) = &content.closing {
                        row += 1;
                        frame.print(area.column, row, closing, accent.bold());
                    }
                }
                None => (),
            }
            row += 1;
        }
    }

    fn draw_gauge(frame: &mut Frame, column: u16, row: u16, fraction: f64, style: CellStyle, track: Color) -> u16 {
        let filled = (fraction.clamp(0.0, 1.0) * GAUGE_WIDTH as f64).round() as u16;
        let column = frame.print(column, row, &"█".repeat(filled as usize), style);
        let empty = GAUGE_WIDTH - filled;
        frame.print(column, row, &"█".repeat(empty as usize), CellStyle { foreground: track, ..style })
    }

    fn draw_navigation(&self, frame: &mut Frame, layout: &Layout) {
        let buttons = [(NavButton::Previous, layout.previous, PREVIOUS_BUTTON), (NavButton::Next, layout.next, NEXT_BUTTON)];
        for (button, rect, label) in buttons {
            let Some(rect) = rect else {
                continue;
            };
            let state = self.buttons.get(&button).copied().unwrap_or(ButtonState::Enabled);
            let style = if state.is_disabled() { self.palette.muted() } else { self.palette.accent().bold() };
            frame.print(rect.column, rect.row, label, style);
        }
        for (index, rect) in &layout.indicators {
            let active = self.indicators.get(index.position()).copied().unwrap_or(false);
            let (symbol, style) = if active { ("●", self.palette.accent()) } else { ("○", self.palette.muted()) };
            frame.print(rect.column, rect.row, symbol, style);
        }
        if let (Some(end), Some(counter)) = (layout.counter_end, &self.counter) {
            let text = format!("{} / {}", counter.current_text(), counter.total_text());
            let column = end.column.saturating_sub(text.width() as u16);
            frame.print(column, end.row, &text, self.palette.muted());
        }
    }

    fn draw_progress(&self, frame: &mut Frame, layout: &Layout) {
        let (Some(rect), Some(progress)) = (layout.progress, &self.progress) else {
            return;
        };
        let filled = (progress.fraction() * rect.width as f64).round() as u16;
        frame.paint(rect.column, rect.row, rect.width, CellStyle::new(self.palette.track, self.palette.track));
        frame.paint(rect.column, rect.row, filled, CellStyle::new(self.palette.accent, self.palette.accent));
    }

    fn draw_help(&self, frame: &mut Frame, rect: Rect) {
        let border = self.palette.accent();
        let inner = rect.width.saturating_sub(2) as usize;
        let bottom = rect.row + rect.height.saturating_sub(1);
        frame.print(rect.column, rect.row, &format!("┌{}┐", "─".repeat(inner)), border);
        for row in rect.row + 1..bottom {
            frame.print(rect.column, row, &format!("│{}│", " ".repeat(inner)), border);
        }
        frame.print(rect.column, bottom, &format!("└{}┘", "─".repeat(inner)), border);
        for (offset, line) in self.help.lines().iter().enumerate() {
            let row = rect.row + 1 + offset as u16;
            if row >= bottom {
                break;
            }
            let style = if offset == 0 { self.palette.accent().bold() } else { self.palette.text() };
            frame.print(rect.column + 2, row, line, style);
        }
    }

    fn slide_exists(&self, slide: SlideIndex) -> bool {
        slide.position() < self.slides.len()
    }
}

impl<W: TerminalWrite> DisplaySurface for TerminalSurface<W> {
    fn present_slide(&mut self, slide: SlideIndex, style: SlideStyle) -> SurfaceResult {
        let current = self.slides.get_mut(slide.position()).ok_or(SurfaceError::MissingElement(Element::Slide(slide)))?;
        *current = style;
        self.dirty = true;
        Ok(())
    }

    fn set_indicator(&mut self, position: SlideIndex, active: bool) -> SurfaceResult {
        let indicator =
            self.indicators.get_mut(position.position()).ok_or(SurfaceError::MissingElement(Element::Indicators))?;
        *indicator = active;
        self.dirty = true;
        Ok(())
    }

    fn set_counter(&mut self, counter: &Counter) -> SurfaceResult {
        self.counter = Some(*counter);
        self.dirty = true;
        Ok(())
    }

    fn set_nav_button(&mut self, button: NavButton, state: ButtonState) -> SurfaceResult {
        self.buttons.insert(button, state);
        self.dirty = true;
        Ok(())
    }

    fn set_progress(&mut self, progress: Progress) -> SurfaceResult {
        self.progress = Some(progress);
        self.dirty = true;
        Ok(())
    }

    fn update_element(&mut self, slide: SlideIndex, element: usize, update: ElementUpdate) -> SurfaceResult {
        let exists = self.slide_exists(slide)
            && self.deck.slide(slide).is_some_and(|content| element < content.element_count());
        if !exists {
            return Err(SurfaceError::MissingElement(Element::SlideElement { slide, element }));
        }
        let state = self.elements.entry((slide, element)).or_default();
        match update {
            ElementUpdate::Hide => state.hidden = true,
            ElementUpdate::Reveal => state.hidden = false,
            ElementUpdate::Text(text) => state.text = Some(text),
            ElementUpdate::Ring { degrees } => state.ring = Some(degrees),
            ElementUpdate::Fill { fraction } => state.fill = Some(fraction),
        };
        self.dirty = true;
        Ok(())
    }

    fn apply_theme(&mut self, theme: ThemePreference) {
        self.theme = theme;
        self.palette = theme.into();
        self.dirty = true;
    }

    fn set_fullscreen(&mut self, enabled: bool) {
        self.fullscreen = enabled;
        self.dirty = true;
    }
}

impl<W: TerminalWrite> Drop for TerminalSurface<W> {
    fn drop(&mut self) {
        self.writer.deinit();
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use crate::config::KeyBindingsConfig;

    impl TerminalWrite for Vec<u8> {
        fn init(&mut self) -> io::Result<()> {
            Ok(())
        }

        fn deinit(&mut self) {}
    }

    const DECK: &str = r#"
title: Quality
slides:
  - title: Welcome
    items: [First, Second]
  - title: Numbers
    stats:
      - label: Coverage
        percent: 75
"#;

    pub(crate) fn make_surface() -> TerminalSurface<Vec<u8>> {
        let deck = Deck::parse(DECK).expect("invalid deck");
        let help = HelpOverlay::new(&KeyBindingsConfig::default());
        let size = WindowSize { rows: 24, columns: 80, width: 0, height: 0 };
        TerminalSurface::new(Vec::new(), deck, help, size).expect("init failed")
    }

    fn screen(surface: &TerminalSurface<Vec<u8>>) -> Vec<String> {
        let frame = surface.frame();
        (0..frame.rows()).map(|row| frame.row_text(row)).collect()
    }

    fn show(surface: &mut TerminalSurface<Vec<u8>>, slide: u32) {
        let index = SlideIndex::new(slide).expect("zero");
        surface.present_slide(index, SlideStyle::SHOWN).expect("no slide");
    }

    #[test]
    fn draws_slide_and_chrome() {
        let mut surface = make_surface();
        show(&mut surface, 1);
        surface.set_indicator(SlideIndex::FIRST, true).expect("no indicator");
        surface.set_counter(&Counter { current: 1, total: 2 }).expect("no counter");
        let screen = screen(&surface);
        assert!(screen[0].contains("Quality"), "{screen:?}");
        assert!(screen[0].ends_with("[☾]"), "{screen:?}");
        assert_eq!(screen[2].trim(), "Welcome");
        assert_eq!(screen[4].trim(), "• First");
        assert_eq!(screen[5].trim(), "• Second");
        assert!(screen[22].contains("●"), "{screen:?}");
        assert!(screen[22].contains("1 / 2"), "{screen:?}");
        assert!(screen[22].starts_with(" [◀ Prev]"), "{screen:?}");
    }

    #[test]
    fn hidden_items_keep_their_row() {
        let mut surface = make_surface();
        show(&mut surface, 1);
        surface.update_element(SlideIndex::FIRST, 0, ElementUpdate::Hide).expect("no element");
        let screen = screen(&surface);
        assert_eq!(screen[4], "");
        assert_eq!(screen[5].trim(), "• Second");
    }

    #[test]
    fn invisible_slides_are_not_drawn() {
        let mut surface = make_surface();
        let index = SlideIndex::FIRST;
        surface.present_slide(index, SlideStyle::ENTERING).expect("no slide");
        assert_eq!(screen(&surface)[2], "");
        surface.present_slide(index, SlideStyle::SHOWN).expect("no slide");
        assert_eq!(screen(&surface)[2].trim(), "Welcome");
    }

    #[test]
    fn stats() {
        let mut surface = make_surface();
        show(&mut surface, 2);
        let index = SlideIndex::new(2).expect("zero");
        surface.update_element(index, 0, ElementUpdate::Ring { degrees: 180.0 }).expect("no element");
        surface.update_element(index, 0, ElementUpdate::Text("37%".into())).expect("no element");
        let line = screen(&surface)[4].clone();
        assert!(line.contains("Coverage"), "{line}");
        assert!(line.ends_with("37%"), "{line}");
    }

    #[test]
    fn missing_elements() {
        let mut surface = make_surface();
        let third = SlideIndex::new(3).expect("zero");
        assert!(surface.present_slide(third, SlideStyle::SHOWN).is_err());
        assert!(surface.set_indicator(third, true).is_err());
        assert!(surface.update_element(SlideIndex::FIRST, 2, ElementUpdate::Reveal).is_err());
        assert!(surface.update_element(third, 0, ElementUpdate::Reveal).is_err());
    }

    #[test]
    fn fullscreen_hides_chrome() {
        let mut surface = make_surface();
        show(&mut surface, 1);
        surface.set_counter(&Counter { current: 1, total: 2 }).expect("no counter");
        surface.set_fullscreen(true);
        let screen = screen(&surface);
        assert_eq!(screen[0].trim(), "Welcome");
        assert!(!screen.iter().any(|line| line.contains("1 / 2")), "{screen:?}");
    }

    #[test]
    fn dark_theme_icon() {
        let mut surface = make_surface();
        surface.apply_theme(ThemePreference::Dark);
        assert!(screen(&surface)[0].ends_with("[☀]"));
    }

    #[test]
    fn help_overlay() {
        let mut surface = make_surface();
        surface.set_help_open(true);
        let screen = screen(&surface).join("\n");
        assert!(screen.contains("KEYBOARD SHORTCUTS"), "{screen}");
        assert!(screen.contains("┌"), "{screen}");
    }

    #[test]
    fn render_clears_dirty_flag() {
        let mut surface = make_surface();
        assert!(surface.is_dirty());
        surface.render().expect("render failed");
        assert!(!surface.is_dirty());
        surface.resize(WindowSize { rows: 30, columns: 100, width: 0, height: 0 });
        assert!(surface.is_dirty());
        assert_eq!(surface.size().columns, 100);
    }
}
