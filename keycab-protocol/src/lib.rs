//! Keycab wire vocabulary
//!
//! This crate defines what travels in and out of the operator panel:
//!
//! - [`Key`]: the keypad's key codes and the legend characters printed
//!   on the caps (the same characters the keypad scanner reports)
//! - [`Command`]: DCC++ text commands sent to the base station
//! - [`Reply`]: DCC++ text replies read back from the base station
//!
//! # Text protocol
//!
//! Every message is a single ASCII line bracketed by `<` and `>`:
//! ```text
//! <t 1 3 64 1>        throttle: register 1, loco 3, speed 64, forward
//! <f 3 144>           function group byte 144 for loco 3
//! <R 29 100 101>      read CV 29, callback 100/101
//! <r100|101|29 6>     reply: CV 29 holds 6
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod keys;
pub mod reply;

pub use command::{Command, Direction, FunctionGroup, ReadCv, Throttle, WriteCv, MAX_COMMAND_LEN};
pub use keys::{Key, DEFAULT_KEYMAP, KEYMAP_COLS, KEYMAP_ROWS};
pub use reply::{Reply, ReplyError, CV_NO_ACK};
