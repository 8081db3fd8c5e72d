//! Collaborator traits
//!
//! These traits define the interface between the controller and the
//! hardware (or the test doubles standing in for it).

pub mod display;
pub mod input;
pub mod power;
pub mod station;

pub use display::{CharDisplay, DisplayError, DISPLAY_COLS, DISPLAY_ROWS};
pub use input::{Keypad, SensorError, SpeedSensor};
pub use power::{PowerError, TrackPower};
pub use station::{CommandStation, CvError};
