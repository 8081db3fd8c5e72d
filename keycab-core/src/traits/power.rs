//! Track power enable lines

/// Errors driving an enable line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerError {
    /// The output pin rejected the write
    Pin,
}

/// The two motor-shield enable lines
pub trait TrackPower {
    /// Drive the main track enable line
    fn set_main(&mut self, on: bool) -> Result<(), PowerError>;

    /// Drive the programming track enable line
    fn set_prog(&mut self, on: bool) -> Result<(), PowerError>;

    /// Drive both lines, programming track first
    ///
    /// Both writes are attempted even if the first fails.
    fn set_both(&mut self, on: bool) -> Result<(), PowerError> {
        let prog = self.set_prog(on);
        let main = self.set_main(on);
        prog.and(main)
    }
}
