//! Character screen buffer

use core::fmt::{self, Write};

use heapless::String;

use crate::traits::{CharDisplay, DisplayError, DISPLAY_COLS, DISPLAY_ROWS};

/// Characters per screen line
pub const LINE_LEN: usize = DISPLAY_COLS as usize;

const ROWS: usize = DISPLAY_ROWS as usize;

/// A full 20x4 frame plus the blinking caret position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    lines: [String<LINE_LEN>; ROWS],
    /// Caret as (row, col), hidden when `None`
    cursor: Option<(u8, u8)>,
}

impl Screen {
    /// Create a blank screen
    pub const fn new() -> Self {
        Self {
            lines: [String::new(), String::new(), String::new(), String::new()],
            cursor: None,
        }
    }

    /// Blank every line and hide the caret
    pub fn clear(&mut self) {
        for line in &mut self.lines {
            line.clear();
        }
        self.cursor = None;
    }

    /// Replace a line, dropping anything past the last column
    pub fn set_line(&mut self, row: u8, text: &str) {
        if let Some(line) = self.lines.get_mut(row as usize) {
            line.clear();
            for c in text.chars() {
                if line.push(c).is_err() {
                    break;
                }
            }
        }
    }

    /// Replace a line with formatted text
    pub fn write_line(&mut self, row: u8, args: fmt::Arguments<'_>) {
        let mut text = Truncating::default();
        let _ = text.write_fmt(args);
        self.set_line(row, &text.0);
    }

    /// Text of a line (empty for rows off the grid)
    pub fn line(&self, row: u8) -> &str {
        self.lines
            .get(row as usize)
            .map(|l| l.as_str())
            .unwrap_or("")
    }

    /// Park the caret
    pub fn set_cursor(&mut self, row: u8, col: u8) {
        if row < DISPLAY_ROWS && col < DISPLAY_COLS {
            self.cursor = Some((row, col));
        }
    }

    pub fn cursor(&self) -> Option<(u8, u8)> {
        self.cursor
    }

    /// Push the whole frame to a display
    pub fn draw<D: CharDisplay>(&self, display: &mut D) -> Result<(), DisplayError> {
        display.clear()?;
        for (row, line) in self.lines.iter().enumerate() {
            if !line.is_empty() {
                display.write_at(row as u8, 0, line)?;
            }
        }
        match self.cursor {
            Some((row, col)) => display.show_cursor(row, col),
            None => display.hide_cursor(),
        }
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

/// Formatting sink that silently stops at the line width
#[derive(Default)]
struct Truncating(String<LINE_LEN>);

impl Write for Truncating {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}
