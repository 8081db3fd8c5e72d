//! Session state
//!
//! Everything the panel remembers between key presses. One instance
//! lives for the lifetime of the firmware and is only changed by the
//! controller.

use keycab_protocol::Direction;

use crate::config::ControllerConfig;
use crate::functions::Functions;

/// Highest throttle speed step
pub const MAX_SPEED: u8 = 126;

/// Value a CV index falls back to on overflow or escape
pub const CV_RESET: u8 = 1;

/// Value a CV value falls back to on entry overflow
pub const CV_VALUE_RESET: u8 = 1;

/// Interaction modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Track power off; only the power-on key is accepted
    Halt,
    /// Typing a new locomotive address
    LocoSelect,
    /// Driving the selected locomotive
    Run,
    /// Choosing and reading a CV on the programming track
    ProgRead,
    /// Editing the value to write to the active CV
    ProgWrite,
}

impl Mode {
    /// Check if this mode edits CVs
    pub fn is_programming(&self) -> bool {
        matches!(self, Mode::ProgRead | Mode::ProgWrite)
    }

    /// Check if the track is powered in this mode
    pub fn is_powered(&self) -> bool {
        !matches!(self, Mode::Halt)
    }
}

/// One-shot message shown on the next render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Notice {
    /// The last CV read failed
    ReadFailed,
    /// The last CV write failed
    WriteFailed,
}

/// Controller session state
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Session {
    pub(crate) mode: Mode,
    /// CV index under edit (0 only while typing)
    pub(crate) cv: u8,
    /// Value read from or to be written to `cv`
    pub(crate) cv_value: u8,
    /// Digits typed into the value currently under edit
    pub(crate) entry_len: u8,
    /// Locomotive address (0 only while typing)
    pub(crate) address: u8,
    /// Address an overflowing entry falls back to
    pub(crate) default_address: u8,
    pub(crate) speed: u8,
    pub(crate) direction: Direction,
    pub(crate) functions: Functions,
    /// Timestamp of the last speed knob sample (ms)
    pub(crate) last_poll_ms: u32,
    pub(crate) notice: Option<Notice>,
}

impl Session {
    /// Create the power-on session
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            mode: Mode::Halt,
            cv: config.default_cv,
            cv_value: config.default_cv_value,
            entry_len: 0,
            address: config.default_address,
            default_address: config.default_address,
            speed: 0,
            direction: Direction::Forward,
            functions: Functions::new(),
            last_poll_ms: 0,
            notice: None,
        }
    }

    /// Current mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Active CV index
    pub fn cv(&self) -> u8 {
        self.cv
    }

    /// Active CV value
    pub fn cv_value(&self) -> u8 {
        self.cv_value
    }

    /// Digits typed into the value under edit
    pub fn entry_len(&self) -> u8 {
        self.entry_len
    }

    /// Controlled locomotive address
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Throttle speed step (0-126)
    pub fn speed(&self) -> u8 {
        self.speed
    }

    /// Travel direction
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Function flags
    pub fn functions(&self) -> &Functions {
        &self.functions
    }

    /// Pending one-shot notice
    pub fn notice(&self) -> Option<Notice> {
        self.notice
    }

    /// Store a new speed step, returning true if it changed
    pub fn set_speed(&mut self, speed: u8) -> bool {
        let speed = speed.min(MAX_SPEED);
        if speed == self.speed {
            return false;
        }
        self.speed = speed;
        true
    }

    /// Check whether the speed knob is due for a sample
    ///
    /// The knob is only sampled while driving.
    pub fn speed_poll_due(&self, now_ms: u32, interval_ms: u32) -> bool {
        self.mode == Mode::Run && now_ms.wrapping_sub(self.last_poll_ms) >= interval_ms
    }
}
