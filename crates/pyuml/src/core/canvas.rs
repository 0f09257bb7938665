//! Character grid for the terminal rendition
//!
//! Layout coordinates are character cells, so the text renderer draws
//! straight onto this grid; the raster renderer maps the same cells to pixels.
//! Double-width characters take two cells, like they do in a terminal.

use unicode_width::UnicodeWidthChar;

/// Second cell of a double-width character; never printed
const WIDE_TAIL: char = '\0';

/// A growable grid of characters
#[derive(Debug, Clone)]
pub struct CharGrid {
    pub width: usize,
    pub height: usize,
    rows: Vec<Vec<char>>,
}

impl CharGrid {
    /// Create a blank grid with the specified dimensions
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rows: vec![vec![' '; width.max(1)]; height.max(1)],
        }
    }

    /// Grow the grid so that it covers at least the given size
    pub fn ensure_size(&mut self, min_width: usize, min_height: usize) {
        if min_width > self.width {
            for row in &mut self.rows {
                row.resize(min_width, ' ');
            }
            self.width = min_width;
        }
        if min_height > self.height {
            let width = self.width;
            self.rows
                .resize_with(min_height, || vec![' '; width.max(1)]);
            self.height = min_height;
        }
    }

    pub fn set(&mut self, x: usize, y: usize, c: char) {
        self.ensure_size(x + 1, y + 1);
        self.rows[y][x] = c;
    }

    pub fn get(&self, x: usize, y: usize) -> char {
        self.rows
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(' ')
    }

    /// Draw text left-aligned starting at `(x, y)`
    ///
    /// Each character advances by its display width. Zero-width and control
    /// characters have no cell of their own and are dropped.
    pub fn draw_text(&mut self, x: usize, y: usize, text: &str) {
        let mut column = x;
        for c in text.chars() {
            let width = c.width().unwrap_or(0);
            if width == 0 {
                continue;
            }
            self.set(column, y, c);
            for tail in 1..width {
                self.set(column + tail, y, WIDE_TAIL);
            }
            column += width;
        }
    }

    /// Draw text centered within `width` cells starting at `x`
    pub fn draw_text_centered(&mut self, x: usize, y: usize, width: usize, text: &str) {
        let text_width = super::display_width(text);
        let padding = width.saturating_sub(text_width) / 2;
        self.draw_text(x + padding, y, text);
    }

    pub fn draw_horizontal(&mut self, x: usize, y: usize, len: usize, c: char) {
        for i in 0..len {
            self.set(x + i, y, c);
        }
    }
}

impl std::fmt::Display for CharGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut lines: Vec<String> = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .filter(|c| **c != WIDE_TAIL)
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect();

        // Margins only matter for the raster; drop blank rows at both ends
        while lines.first().is_some_and(|line| line.is_empty()) {
            lines.remove(0);
        }
        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }

        let indent = lines
            .iter()
            .filter(|line| !line.is_empty())
            .map(|line| line.chars().take_while(|c| *c == ' ').count())
            .min()
            .unwrap_or(0);

        let body: Vec<String> = lines
            .into_iter()
            .map(|line| line.chars().skip(indent).collect())
            .collect();

        write!(f, "{}", body.join("\n"))
    }
}
