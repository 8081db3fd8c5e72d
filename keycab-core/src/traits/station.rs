//! Command station backend
//!
//! The base station owns the DCC signal generation and the programming
//! track. The panel only hands it requests.

use keycab_protocol::{FunctionGroup, ReadCv, Throttle, WriteCv};

/// Errors from a programming track exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CvError {
    /// The decoder did not acknowledge
    NoAck,
    /// No reply before the station's deadline
    Timeout,
    /// Link to the station failed
    Io,
    /// The station answered with something unexpected
    Malformed,
}

/// Requests the controller makes of the base station
///
/// All calls are synchronous. CV reads and writes block until the
/// programming track exchange finishes or the implementation gives up.
pub trait CommandStation {
    /// Report a track power change
    fn set_power(&mut self, on: bool);

    /// Send a speed/direction update
    fn set_throttle(&mut self, throttle: &Throttle);

    /// Send one function group byte
    fn set_function_group(&mut self, group: &FunctionGroup);

    /// Read a CV on the programming track
    fn read_cv(&mut self, request: &ReadCv) -> Result<u8, CvError>;

    /// Write a CV on the programming track, returning the verified value
    fn write_cv(&mut self, request: &WriteCv) -> Result<u8, CvError>;
}
