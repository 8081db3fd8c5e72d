//! GPIO track power
//!
//! The motor shield has one enable input per track. Driving it high
//! lets the DCC signal through to the rails.

use embedded_hal::digital::{OutputPin, PinState};
use keycab_core::traits::{PowerError, TrackPower};

/// Main and programming track enable lines
pub struct GpioTrackPower<M, P> {
    main: M,
    prog: P,
    main_on: bool,
    prog_on: bool,
}

impl<M: OutputPin, P: OutputPin> GpioTrackPower<M, P> {
    /// Take both enable pins, driving them low
    pub fn new(main: M, prog: P) -> Self {
        let mut power = Self {
            main,
            prog,
            main_on: false,
            prog_on: false,
        };
        // Ensure the rails start dead
        let _ = power.set_both(false);
        power
    }

    /// Check whether the main track is enabled
    pub fn is_main_on(&self) -> bool {
        self.main_on
    }

    /// Check whether the programming track is enabled
    pub fn is_prog_on(&self) -> bool {
        self.prog_on
    }

    /// Release the pins
    pub fn release(self) -> (M, P) {
        (self.main, self.prog)
    }
}

impl<M: OutputPin, P: OutputPin> TrackPower for GpioTrackPower<M, P> {
    fn set_main(&mut self, on: bool) -> Result<(), PowerError> {
        self.main
            .set_state(PinState::from(on))
            .map_err(|_| PowerError::Pin)?;
        self.main_on = on;
        Ok(())
    }

    fn set_prog(&mut self, on: bool) -> Result<(), PowerError> {
        self.prog
            .set_state(PinState::from(on))
            .map_err(|_| PowerError::Pin)?;
        self.prog_on = on;
        Ok(())
    }
}
