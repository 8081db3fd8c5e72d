//! Row/column matrix keypad
//!
//! Rows are outputs, idle high. Columns are inputs with pull-ups. A scan
//! drives one row low at a time and reads which columns follow it down.
//! A key is reported once it has been seen on `debounce_scans`
//! consecutive scans, and not again until every key is released.

use embedded_hal::digital::{InputPin, OutputPin};
use keycab_core::traits::Keypad;
use keycab_protocol::Key;

/// Matrix keypad scanner
pub struct MatrixKeypad<R, C, const ROWS: usize, const COLS: usize> {
    rows: [R; ROWS],
    cols: [C; COLS],
    keymap: [[char; COLS]; ROWS],
    debounce_scans: u8,
    /// Position seen on the last scan
    candidate: Option<(usize, usize)>,
    /// Consecutive scans `candidate` has been seen on
    count: u8,
    reported: bool,
}

impl<R, C, const ROWS: usize, const COLS: usize> MatrixKeypad<R, C, ROWS, COLS>
where
    R: OutputPin,
    C: InputPin,
{
    /// Create a scanner
    ///
    /// - `keymap`: Legend character at each (row, column)
    /// - `debounce_scans`: Scans a key must be held before it counts
    pub fn new(
        rows: [R; ROWS],
        cols: [C; COLS],
        keymap: [[char; COLS]; ROWS],
        debounce_scans: u8,
    ) -> Self {
        let mut keypad = Self {
            rows,
            cols,
            keymap,
            debounce_scans: debounce_scans.max(1),
            candidate: None,
            count: 0,
            reported: false,
        };
        for row in keypad.rows.iter_mut() {
            let _ = row.set_high();
        }
        keypad
    }

    /// Find the first pressed position, if any
    fn scan(&mut self) -> Option<(usize, usize)> {
        let mut found = None;
        for r in 0..ROWS {
            if self.rows[r].set_low().is_err() {
                continue;
            }
            if found.is_none() {
                found = self
                    .cols
                    .iter_mut()
                    .position(|col| col.is_low().unwrap_or(false))
                    .map(|c| (r, c));
            }
            let _ = self.rows[r].set_high();
        }
        found
    }
}

impl<R, C, const ROWS: usize, const COLS: usize> Keypad for MatrixKeypad<R, C, ROWS, COLS>
where
    R: OutputPin,
    C: InputPin,
{
    fn poll(&mut self) -> Option<Key> {
        let Some(pos) = self.scan() else {
            self.candidate = None;
            self.count = 0;
            self.reported = false;
            return None;
        };

        if self.candidate == Some(pos) {
            self.count = self.count.saturating_add(1);
        } else {
            self.candidate = Some(pos);
            self.count = 1;
            self.reported = false;
        }

        if self.reported || self.count < self.debounce_scans {
            return None;
        }
        self.reported = true;

        let (r, c) = pos;
        match Key::from_char(self.keymap[r][c]) {
            Some(key) => Some(key),
            None => {
                #[cfg(feature = "defmt")]
                defmt::warn!("No key for legend at row {} col {}", r, c);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;
    use embedded_hal::digital::{ErrorKind, ErrorType};
    use keycab_protocol::{DEFAULT_KEYMAP, KEYMAP_COLS, KEYMAP_ROWS};
    use std::rc::Rc;

    /// Shared wiring between row and column mocks
    #[derive(Default)]
    struct Matrix {
        driven_low: [bool; KEYMAP_ROWS],
        pressed: [[bool; KEYMAP_COLS]; KEYMAP_ROWS],
    }

    struct RowPin {
        index: usize,
        matrix: Rc<RefCell<Matrix>>,
    }

    struct ColPin {
        index: usize,
        matrix: Rc<RefCell<Matrix>>,
    }

    impl ErrorType for RowPin {
        type Error = ErrorKind;
    }

    impl OutputPin for RowPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.matrix.borrow_mut().driven_low[self.index] = true;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.matrix.borrow_mut().driven_low[self.index] = false;
            Ok(())
        }
    }

    impl ErrorType for ColPin {
        type Error = ErrorKind;
    }

    impl InputPin for ColPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            self.is_low().map(|low| !low)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            let m = self.matrix.borrow();
            Ok((0..KEYMAP_ROWS).any(|r| m.driven_low[r] && m.pressed[r][self.index]))
        }
    }

    type TestKeypad = MatrixKeypad<RowPin, ColPin, KEYMAP_ROWS, KEYMAP_COLS>;

    fn keypad(debounce: u8) -> (TestKeypad, Rc<RefCell<Matrix>>) {
        let matrix = Rc::new(RefCell::new(Matrix::default()));
        let rows = core::array::from_fn(|index| RowPin {
            index,
            matrix: matrix.clone(),
        });
        let cols = core::array::from_fn(|index| ColPin {
            index,
            matrix: matrix.clone(),
        });
        (
            MatrixKeypad::new(rows, cols, DEFAULT_KEYMAP, debounce),
            matrix,
        )
    }

    fn hold(matrix: &Rc<RefCell<Matrix>>, row: usize, col: usize, down: bool) {
        matrix.borrow_mut().pressed[row][col] = down;
    }

    #[test]
    fn test_idle() {
        let (mut keypad, _) = keypad(2);
        assert_eq!(keypad.poll(), None);
    }

    #[test]
    fn test_debounce_then_single_report() {
        let (mut keypad, matrix) = keypad(3);
        hold(&matrix, 4, 3, true);
        assert_eq!(keypad.poll(), None);
        assert_eq!(keypad.poll(), None);
        assert_eq!(keypad.poll(), Some(Key::Enter));
        assert_eq!(keypad.poll(), None);
        assert_eq!(keypad.poll(), None);

        hold(&matrix, 4, 3, false);
        assert_eq!(keypad.poll(), None);
        hold(&matrix, 4, 3, true);
        keypad.poll();
        keypad.poll();
        assert_eq!(keypad.poll(), Some(Key::Enter));
    }

    #[test]
    fn test_bounce_restarts_count() {
        let (mut keypad, matrix) = keypad(2);
        hold(&matrix, 1, 0, true);
        assert_eq!(keypad.poll(), None);
        hold(&matrix, 1, 0, false);
        assert_eq!(keypad.poll(), None);
        hold(&matrix, 1, 0, true);
        assert_eq!(keypad.poll(), None);
        assert_eq!(keypad.poll(), Some(Key::Digit(1)));
    }

    #[test]
    fn test_legend_positions() {
        let (mut keypad, matrix) = keypad(1);
        let cases = [
            (0, 0, Key::ModeToggle),
            (0, 1, Key::Program),
            (0, 2, Key::PowerOff),
            (0, 3, Key::PowerOn),
            (3, 3, Key::Escape),
            (4, 0, Key::Left),
            (4, 1, Key::Digit(0)),
            (4, 2, Key::Right),
        ];
        for (r, c, key) in cases {
            hold(&matrix, r, c, true);
            assert_eq!(keypad.poll(), Some(key));
            hold(&matrix, r, c, false);
            assert_eq!(keypad.poll(), None);
        }
    }

    #[test]
    fn test_rows_left_high() {
        let (mut keypad, matrix) = keypad(1);
        hold(&matrix, 2, 2, true);
        keypad.poll();
        assert!(matrix.borrow().driven_low.iter().all(|low| !low));
    }

    #[test]
    fn test_unknown_legend_is_swallowed() {
        let (mut keypad, matrix) = keypad(1);
        keypad.keymap[0][0] = '?';
        hold(&matrix, 0, 0, true);
        assert_eq!(keypad.poll(), None);
    }
}
