//! (mode, key) transition table
//!
//! [`Session::apply`] updates the session for one key press and tells the
//! caller which side effect to perform. It never touches hardware, so the
//! whole table can be exercised without collaborators. CV exchanges are
//! split in two: `apply` requests them, and the caller reports the
//! station's answer back through [`Session::finish_read`] or
//! [`Session::finish_write`].

use keycab_protocol::{Direction, Key};

use crate::entry::{digit_count, pop_digit, push_digit};
use crate::functions::FunctionGroupId;
use crate::session::{Mode, Notice, Session, CV_RESET, CV_VALUE_RESET};
use crate::traits::CvError;

/// Side effect requested by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Nothing beyond a redraw
    None,
    /// Enable both track outputs and tell the station
    PowerOn,
    /// Disable both track outputs and tell the station
    PowerOff,
    /// Send the current speed and direction
    Throttle,
    /// Re-send one function group byte
    Functions(FunctionGroupId),
    /// Read the active CV, then call [`Session::finish_read`]
    ReadCv,
    /// Write the active CV value, then call [`Session::finish_write`]
    WriteCv,
}

impl Session {
    /// Apply one key press
    ///
    /// Any pending notice is dropped first; it was shown by the render
    /// that followed the failed exchange.
    pub fn apply(&mut self, key: Key) -> Action {
        self.notice = None;

        let action = match (self.mode, key) {
            (_, Key::PowerOn) => {
                self.mode = Mode::Run;
                Action::PowerOn
            }
            (Mode::Halt, _) => Action::None,

            (_, Key::PowerOff) => {
                self.mode = Mode::Halt;
                Action::PowerOff
            }
            (_, Key::Program) => {
                self.mode = Mode::ProgRead;
                self.entry_len = 0;
                Action::None
            }
            (Mode::Run, Key::ModeToggle) => {
                self.mode = Mode::LocoSelect;
                self.entry_len = 0;
                Action::None
            }
            (_, Key::ModeToggle) => {
                self.mode = Mode::Run;
                Action::None
            }

            (Mode::Run, key) => self.apply_run(key),
            (Mode::LocoSelect, key) => self.apply_loco_select(key),
            (Mode::ProgRead, key) => self.apply_prog_read(key),
            (Mode::ProgWrite, key) => self.apply_prog_write(key),
        };

        // An address or CV of 0 may only exist while it is being typed
        if self.mode != Mode::LocoSelect && self.address == 0 {
            self.address = self.default_address;
        }
        if self.mode != Mode::ProgRead && self.cv == 0 {
            self.cv = CV_RESET;
        }
        action
    }

    fn apply_run(&mut self, key: Key) -> Action {
        match key {
            Key::Right => {
                self.direction = Direction::Forward;
                Action::Throttle
            }
            Key::Left => {
                self.direction = Direction::Reverse;
                Action::Throttle
            }
            Key::Digit(n) => match self.functions.toggle(n) {
                Some(group) => Action::Functions(group),
                None => Action::None,
            },
            _ => Action::None,
        }
    }

    fn apply_loco_select(&mut self, key: Key) -> Action {
        match key {
            Key::Digit(d) => {
                push_digit(&mut self.address, &mut self.entry_len, d, self.default_address);
            }
            Key::Enter if self.address > 0 => {
                self.mode = Mode::Run;
                self.entry_len = 0;
            }
            _ => {}
        }
        Action::None
    }

    fn apply_prog_read(&mut self, key: Key) -> Action {
        match key {
            Key::Digit(d) => {
                push_digit(&mut self.cv, &mut self.entry_len, d, CV_RESET);
            }
            Key::Up => self.cv = self.cv.saturating_add(1).max(CV_RESET),
            Key::Down => self.cv = self.cv.saturating_sub(1).max(CV_RESET),
            Key::Escape => {
                self.cv = CV_RESET;
                self.entry_len = 0;
            }
            Key::Left => pop_digit(&mut self.cv, &mut self.entry_len),
            Key::Right if self.cv > 0 => {
                self.mode = Mode::ProgWrite;
                self.entry_len = digit_count(self.cv_value);
            }
            Key::Enter if self.cv > 0 => return Action::ReadCv,
            _ => {}
        }
        Action::None
    }

    fn apply_prog_write(&mut self, key: Key) -> Action {
        match key {
            Key::Digit(d) => {
                push_digit(&mut self.cv_value, &mut self.entry_len, d, CV_VALUE_RESET);
            }
            Key::Up => self.cv_value = self.cv_value.saturating_add(1),
            Key::Down => self.cv_value = self.cv_value.saturating_sub(1),
            Key::Escape => {
                self.cv_value = 0;
                self.entry_len = 0;
            }
            Key::Left if self.entry_len == 0 => {
                self.mode = Mode::ProgRead;
                self.entry_len = digit_count(self.cv);
            }
            Key::Left => pop_digit(&mut self.cv_value, &mut self.entry_len),
            Key::Enter if self.cv_value > 0 => return Action::WriteCv,
            _ => {}
        }
        Action::None
    }

    /// Record the outcome of a CV read
    ///
    /// A positive value read from CV1 also becomes the locomotive address.
    pub fn finish_read(&mut self, result: Result<u8, CvError>) {
        match result {
            Ok(value) => {
                self.cv_value = value;
                if self.cv == 1 && value > 0 {
                    self.address = value;
                }
            }
            Err(_) => {
                self.cv_value = 0;
                self.entry_len = 0;
                self.notice = Some(Notice::ReadFailed);
            }
        }
    }

    /// Record the outcome of a CV write
    ///
    /// On failure the value must be typed again; the mode does not change.
    pub fn finish_write(&mut self, result: Result<u8, CvError>) {
        match result {
            Ok(value) => self.cv_value = value,
            Err(_) => {
                self.cv_value = 0;
                self.entry_len = 0;
                self.notice = Some(Notice::WriteFailed);
            }
        }
    }
}
