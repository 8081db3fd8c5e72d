//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in keycab-core, written against `embedded-hal` 1.0 and `embedded-io`:
//!
//! - Track power enable lines on two GPIO outputs
//! - HD44780 20x4 character LCD behind a PCF8574 I2C backpack
//! - Debounced row/column matrix keypad
//! - Serial link to a DCC++ base station

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod keypad;
pub mod lcd;
pub mod power;
pub mod station;

pub use keypad::MatrixKeypad;
pub use lcd::{Hd44780I2c, LcdError};
pub use power::GpioTrackPower;
pub use station::SerialStation;
