//! Controller error type
//!
//! Almost every failure the panel meets is handled as a local state
//! change (an ignored key, a reset field, an on-screen notice). Only a
//! display that stops accepting writes is reported to the caller.

use crate::traits::DisplayError;

/// Errors returned by [`Controller::poll`](crate::Controller::poll)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The character display rejected a write
    Display(DisplayError),
}

impl From<DisplayError> for Error {
    fn from(e: DisplayError) -> Self {
        Error::Display(e)
    }
}
