//! Operator inputs: keypad and speed knob

use keycab_protocol::Key;

/// Debounced single-key event source
pub trait Keypad {
    /// Return the key pressed since the last poll, if any
    ///
    /// At most one key is reported per call.
    fn poll(&mut self) -> Option<Key>;
}

/// Errors reading the speed knob
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Conversion did not complete
    ConversionFailed,
    /// Sensor not available
    NotReady,
}

/// Analog speed source (usually a potentiometer on an ADC pin)
pub trait SpeedSensor {
    /// Read the raw conversion result, 0 up to the configured full scale
    fn read_raw(&mut self) -> Result<u16, SensorError>;
}
