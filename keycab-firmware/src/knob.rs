//! Speed knob on an ADC input

use embassy_rp::adc::{Adc, Blocking, Channel};
use keycab_core::traits::{SensorError, SpeedSensor};

/// Potentiometer wiper on one ADC channel
pub struct AdcKnob<'d> {
    adc: Adc<'d, Blocking>,
    channel: Channel<'d>,
}

impl<'d> AdcKnob<'d> {
    pub fn new(adc: Adc<'d, Blocking>, channel: Channel<'d>) -> Self {
        Self { adc, channel }
    }
}

impl SpeedSensor for AdcKnob<'_> {
    fn read_raw(&mut self) -> Result<u16, SensorError> {
        self.adc
            .blocking_read(&mut self.channel)
            .map_err(|_| SensorError::ConversionFailed)
    }
}
