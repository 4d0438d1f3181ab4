use crossterm::{
    cursor,
    style::{self, Attribute, Color, Colors},
    terminal, QueueableCommand,
};
use std::io::{self, Write};
use unicode_width::UnicodeWidthChar;

/// The style a cell is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct CellStyle {
    pub(crate) foreground: Color,
    pub(crate) background: Color,
    pub(crate) bold: bool,
}

impl CellStyle {
    pub(crate) fn new(foreground: Color, background: Color) -> Self {
        Self { foreground, background, bold: false }
    }

    pub(crate) fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Cell {
    // `None` for the trailing half of a double width character.
    symbol: Option<char>,
    style: CellStyle,
}

/// An in memory picture of the whole terminal that's written out in one go.
#[derive(Clone, Debug)]
pub(crate) struct Frame {
    columns: u16,
    rows: u16,
    cells: Vec<Cell>,
}

impl Frame {
    pub(crate) fn new(columns: u16, rows: u16, style: CellStyle) -> Self {
        let cells = vec![Cell { symbol: Some(' '), style }; columns as usize * rows as usize];
        Self { columns, rows, cells }
    }

    #[cfg(test)]
    pub(crate) fn rows(&self) -> u16 {
        self.rows
    }

    /// Print text starting at a position, clipping anything that goes past the right edge.
    ///
    /// Returns the column right after the last printed character.
    pub(crate) fn print(&mut self, column: u16, row: u16, text: &str, style: CellStyle) -> u16 {
        if row >= self.rows {
            return column;
        }
        let mut column = column;
        for symbol in text.chars() {
            let width = symbol.width().unwrap_or(0) as u16;
            if width == 0 {
                continue;
            }
            if column + width > self.columns {
                break;
            }
            self.set(column, row, Cell { symbol: Some(symbol), style });
            if width == 2 {
                self.set(column + 1, row, Cell { symbol: None, style });
            }
            column += width;
        }
        column
    }

    /// Fill `width` cells starting at a position with the given style, keeping their symbols.
    pub(crate) fn paint(&mut self, column: u16, row: u16, width: u16, style: CellStyle) {
        for column in column..column.saturating_add(width).min(self.columns) {
            if let Some(cell) = self.cell_mut(column, row) {
                cell.style = style;
            }
        }
    }

    /// The text in a row, with trailing whitespace removed.
    #[cfg(test)]
    pub(crate) fn row_text(&self, row: u16) -> String {
        let start = row as usize * self.columns as usize;
        let Some(cells) = self.cells.get(start..start + self.columns as usize) else {
            return String::new();
        };
        let text: String = cells.iter().filter_map(|cell| cell.symbol).collect();
        text.trim_end().to_string()
    }

    #[cfg(test)]
    pub(crate) fn style_at(&self, column: u16, row: u16) -> Option<CellStyle> {
        self.cells.get(self.offset(column, row)?).map(|cell| cell.style)
    }

    /// Write this frame out to a terminal.
    pub(crate) fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.queue(terminal::BeginSynchronizedUpdate)?;
        let mut current: Option<CellStyle> = None;
        for row in 0..self.rows {
            writer.queue(cursor::MoveTo(0, row))?;
            let start = row as usize * self.columns as usize;
            for cell in &self.cells[start..start + self.columns as usize] {
                let Some(symbol) = cell.symbol else {
                    continue;
                };
                if current != Some(cell.style) {
                    writer.queue(style::SetAttribute(Attribute::Reset))?;
                    writer.queue(style::SetColors(Colors::new(cell.style.foreground, cell.style.background)))?;
                    if cell.style.bold {
                        writer.queue(style::SetAttribute(Attribute::Bold))?;
                    }
                    current = Some(cell.style);
                }
                writer.queue(style::Print(symbol))?;
            }
        }
        writer.queue(style::SetAttribute(Attribute::Reset))?;
        writer.queue(terminal::EndSynchronizedUpdate)?;
        writer.flush()
    }

    fn offset(&self, column: u16, row: u16) -> Option<usize> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        Some(row as usize * self.columns as usize + column as usize)
    }

    fn cell_mut(&mut self, column: u16, row: u16) -> Option<&mut Cell> {
        let offset = self.offset(column, row)?;
        self.cells.get_mut(offset)
    }

    fn set(&mut self, column: u16, row: u16, cell: Cell) {
        if let Some(target) = self.cell_mut(column, row) {
            *target = cell;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn style() -> CellStyle {
        CellStyle::new(Color::White, Color::Black)
    }

    #[test]
    fn print_and_clip() {
        let mut frame = Frame::new(10, 2, style());
        let end = frame.print(2, 0, "hello world", style());
        assert_eq!(end, 10);
        assert_eq!(frame.row_text(0), "  hello wo");
        assert_eq!(frame.row_text(1), "");
    }

    #[test]
    fn wide_characters() {
        let mut frame = Frame::new(6, 1, style());
        let end = frame.print(0, 0, "日本語", style());
        assert_eq!(end, 6);
        assert_eq!(frame.row_text(0), "日本語");

        // No room for half a character.
        let mut frame = Frame::new(5, 1, style());
        assert_eq!(frame.print(0, 0, "日本語", style()), 4);
    }

    #[test]
    fn out_of_bounds() {
        let mut frame = Frame::new(4, 1, style());
        assert_eq!(frame.print(0, 3, "hi", style()), 0);
        frame.paint(2, 0, 10, style().bold());
        assert_eq!(frame.style_at(3, 0), Some(style().bold()));
        assert_eq!(frame.style_at(1, 0), Some(style()));
    }

    #[test]
    fn write() {
        let mut frame = Frame::new(3, 1, style());
        frame.print(0, 0, "abc", style());
        let mut output = Vec::new();
        frame.write_to(&mut output).expect("write failed");
        let output = String::from_utf8(output).expect("not utf8");
        assert!(output.contains("abc"), "{output:?}");
    }
}
