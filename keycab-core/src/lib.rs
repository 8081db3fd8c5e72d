//! Board-agnostic core logic for the Keycab operator panel
//!
//! This crate contains everything that does not depend on a particular
//! board:
//!
//! - Collaborator traits (keypad, speed knob, command station, track
//!   power, character display)
//! - Session state and the (mode, key) transition table
//! - Numeric entry and function-group encoding
//! - Screen rendering for the 20x4 character display
//! - The dispatch controller that ties them together
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod config;
pub mod controller;
pub mod entry;
pub mod error;
pub mod functions;
pub mod render;
pub mod session;
pub mod traits;
pub mod transition;

pub use config::ControllerConfig;
pub use controller::{Controller, Peripherals};
pub use error::Error;
pub use session::{Mode, Notice, Session};
pub use transition::Action;

pub use keycab_protocol::{Direction, Key};
