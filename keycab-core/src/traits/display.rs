//! Character display trait

/// Number of character rows on the panel display
pub const DISPLAY_ROWS: u8 = 4;

/// Number of character columns on the panel display
pub const DISPLAY_COLS: u8 = 20;

/// Errors that can occur writing to the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Bus transaction failed
    Communication,
    /// Row or column outside the grid
    InvalidCoordinates,
}

/// Fixed-size character grid with a blinking caret
///
/// The controller always redraws the whole screen, so implementations
/// need no partial-update logic.
pub trait CharDisplay {
    /// Blank the grid and home the cursor
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Print ASCII text starting at a position
    ///
    /// - `row`: Row number (0-3)
    /// - `col`: Column number (0-19)
    ///
    /// Text running past the last column is dropped.
    fn write_at(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError>;

    /// Park a blinking caret at a position
    fn show_cursor(&mut self, row: u8, col: u8) -> Result<(), DisplayError>;

    /// Stop blinking the caret
    fn hide_cursor(&mut self) -> Result<(), DisplayError>;

    /// Grid size as (columns, rows)
    fn dimensions(&self) -> (u8, u8) {
        (DISPLAY_COLS, DISPLAY_ROWS)
    }
}
