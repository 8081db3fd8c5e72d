//! Controller configuration
//!
//! Every tunable the panel uses, with defaults matching the stock
//! keypad/LCD add-on. With the `serde` feature the whole configuration
//! can be encoded as postcard binary data.

pub mod labels;

pub use labels::{CvLabel, CvLabels, MAX_CV_LABELS, MAX_CV_LABEL_LEN};

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::traits::{DISPLAY_COLS, DISPLAY_ROWS};

/// Characters in one splash line
pub const SPLASH_LINE_LEN: usize = DISPLAY_COLS as usize;

/// Lines on the splash screen
pub const SPLASH_LINES: usize = DISPLAY_ROWS as usize;

/// Upper bound on an encoded configuration
pub const MAX_CONFIG_SIZE: usize = 512;

const DEFAULT_SPLASH: [&str; SPLASH_LINES] = [
    "DCC++ Keycab",
    "RP2040 / L298 Shield",
    concat!("Ver. ", env!("CARGO_PKG_VERSION")),
    "Link: SERIAL",
];

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Label longer than a display row allows
    LabelTooLong,
    /// No free slot in the label table
    TableFull,
    /// Encoding failed (usually a short buffer)
    Serialize,
    /// Bytes are not a valid configuration
    Deserialize,
}

/// Controller configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControllerConfig {
    /// Speed knob sampling period in Run mode (ms)
    pub poll_interval_ms: u32,
    /// Raw reading at full knob travel
    pub sensor_full_scale: u16,
    /// Locomotive address at power-on and after an overflowing entry
    pub default_address: u8,
    /// CV selected at power-on
    pub default_cv: u8,
    /// CV value shown at power-on
    pub default_cv_value: u8,
    /// Base station register used for throttle commands
    pub throttle_register: u8,
    /// Callback pair echoed in CV read replies
    pub read_callback: (u16, u16),
    /// Callback pair echoed in CV write replies
    pub write_callback: (u16, u16),
    /// Boot screen text
    pub splash: [String<SPLASH_LINE_LEN>; SPLASH_LINES],
    pub cv_labels: CvLabels,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
            sensor_full_scale: 1023,
            default_address: 3,
            default_cv: 1,
            default_cv_value: 3,
            throttle_register: 1,
            read_callback: (100, 101),
            write_callback: (102, 103),
            splash: DEFAULT_SPLASH.map(splash_line),
            cv_labels: CvLabels::default(),
        }
    }
}

impl ControllerConfig {
    /// Replace one splash line, cutting it to the display width
    pub fn set_splash_line(&mut self, row: usize, text: &str) {
        if let Some(line) = self.splash.get_mut(row) {
            *line = splash_line(text);
        }
    }

    /// Encode into `buf`, returning the used prefix
    #[cfg(feature = "serde")]
    pub fn to_bytes<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Serialize)
    }

    /// Decode a configuration produced by [`ControllerConfig::to_bytes`]
    #[cfg(feature = "serde")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)
    }
}

fn splash_line(text: &str) -> String<SPLASH_LINE_LEN> {
    let mut line = String::new();
    for c in text.chars() {
        if line.push(c).is_err() {
            break;
        }
    }
    line
}
