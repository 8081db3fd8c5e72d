//! Dispatch controller
//!
//! The controller owns the session and the collaborators. The host calls
//! [`Controller::poll`] over and over; each call:
//! - Samples the speed knob if driving and the poll interval has passed
//! - Polls the keypad for at most one key
//! - Runs the key through the transition table
//! - Performs the requested side effect on the station or power lines
//! - Redraws the display

use keycab_protocol::Key;

use crate::command;
use crate::config::ControllerConfig;
use crate::error::Error;
use crate::render::{Renderer, Screen};
use crate::session::{Mode, Session};
use crate::traits::{CharDisplay, CommandStation, Keypad, SpeedSensor, TrackPower};
use crate::transition::Action;

/// Hardware the controller drives
pub struct Peripherals<K, S, C, P, D> {
    pub keypad: K,
    pub sensor: S,
    pub station: C,
    pub power: P,
    pub display: D,
}

/// Operator panel controller
pub struct Controller<K, S, C, P, D> {
    config: ControllerConfig,
    session: Session,
    renderer: Renderer,
    io: Peripherals<K, S, C, P, D>,
}

impl<K, S, C, P, D> Controller<K, S, C, P, D>
where
    K: Keypad,
    S: SpeedSensor,
    C: CommandStation,
    P: TrackPower,
    D: CharDisplay,
{
    /// Create a controller in Halt mode
    pub fn new(config: ControllerConfig, io: Peripherals<K, S, C, P, D>) -> Self {
        Self {
            session: Session::new(&config),
            config,
            renderer: Renderer::new(),
            io,
        }
    }

    /// Show the boot screen
    ///
    /// It stays up until the first key press.
    pub fn start(&mut self) -> Result<(), Error> {
        let screen = self.renderer.render_splash(&self.config);
        screen.draw(&mut self.io.display)?;

        #[cfg(feature = "defmt")]
        defmt::info!("Panel ready, address {}", self.session.address());

        Ok(())
    }

    /// Run one dispatch cycle
    ///
    /// - `now_ms`: Monotonic milliseconds, allowed to wrap
    ///
    /// Returns the key that was handled, if any. Only display failures
    /// are reported; everything else is handled as a state change.
    pub fn poll(&mut self, now_ms: u32) -> Result<Option<Key>, Error> {
        if self
            .session
            .speed_poll_due(now_ms, self.config.poll_interval_ms)
        {
            self.session.last_poll_ms = now_ms;
            if self.sample_speed() {
                self.send_throttle();
                self.redraw()?;
            }
        }

        let Some(key) = self.io.keypad.poll() else {
            return Ok(None);
        };

        #[cfg(feature = "defmt")]
        defmt::debug!("Key {} in {}", key, self.session.mode());

        #[cfg(feature = "defmt")]
        let before = self.session.mode();
        let action = self.session.apply(key);
        #[cfg(feature = "defmt")]
        {
            if self.session.mode() != before {
                defmt::info!("Mode {} -> {}", before, self.session.mode());
            }
        }

        self.perform(action);
        self.redraw()?;
        Ok(Some(key))
    }

    /// Session state
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Active configuration
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Last frame sent to the display
    pub fn screen(&self) -> &Screen {
        self.renderer.screen()
    }

    /// Borrow the hardware
    pub fn peripherals(&self) -> &Peripherals<K, S, C, P, D> {
        &self.io
    }

    /// Borrow the hardware mutably
    pub fn peripherals_mut(&mut self) -> &mut Peripherals<K, S, C, P, D> {
        &mut self.io
    }

    /// Tear down, handing the hardware back
    pub fn into_peripherals(self) -> Peripherals<K, S, C, P, D> {
        self.io
    }

    /// Read the knob, returning true if the speed step changed
    fn sample_speed(&mut self) -> bool {
        match self.io.sensor.read_raw() {
            Ok(raw) => {
                let step = command::speed_step(raw, self.config.sensor_full_scale);
                self.session.set_speed(step)
            }
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Speed knob read failed: {}", _e);
                false
            }
        }
    }

    fn perform(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::PowerOn => self.set_power(true),
            Action::PowerOff => self.set_power(false),
            Action::Throttle => self.send_throttle(),
            Action::Functions(group) => {
                let request = command::function_group(&self.session, group);
                #[cfg(feature = "defmt")]
                defmt::debug!("Function group {}", request);
                self.io.station.set_function_group(&request);
            }
            Action::ReadCv => {
                let request = command::read_cv(&self.session, &self.config);
                #[cfg(feature = "defmt")]
                defmt::debug!("{}", request);
                let result = self.io.station.read_cv(&request);
                if let Err(_e) = result {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("CV{} read failed: {}", request.cv, _e);
                }
                self.session.finish_read(result);
            }
            Action::WriteCv => {
                let request = command::write_cv(&self.session, &self.config);
                #[cfg(feature = "defmt")]
                defmt::debug!("{}", request);
                let result = self.io.station.write_cv(&request);
                if let Err(_e) = result {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("CV{} write failed: {}", request.cv, _e);
                }
                self.session.finish_write(result);
            }
        }
    }

    fn set_power(&mut self, on: bool) {
        if let Err(_e) = self.io.power.set_both(on) {
            #[cfg(feature = "defmt")]
            defmt::warn!("Track enable lines failed: {}", _e);
        }
        self.io.station.set_power(on);

        #[cfg(feature = "defmt")]
        defmt::info!("Track power {}", if on { "on" } else { "off" });
    }

    fn send_throttle(&mut self) {
        let request = command::throttle(&self.session, &self.config);
        #[cfg(feature = "defmt")]
        defmt::debug!("{}", request);
        self.io.station.set_throttle(&request);
    }

    fn redraw(&mut self) -> Result<(), Error> {
        let screen = self.renderer.render(&self.session, &self.config);
        screen.draw(&mut self.io.display)?;
        Ok(())
    }
}

impl<K, S, C, P, D> Controller<K, S, C, P, D> {
    /// Current mode
    pub fn mode(&self) -> Mode {
        self.session.mode()
    }
}
