//! Station request builders
//!
//! Pure functions from the session and configuration to the typed
//! requests handed to the [`CommandStation`](crate::traits::CommandStation).

use keycab_protocol::{FunctionGroup, ReadCv, Throttle, WriteCv};

use crate::config::ControllerConfig;
use crate::functions::FunctionGroupId;
use crate::session::{Session, MAX_SPEED};

/// Throttle request for the current address, speed and direction
pub fn throttle(session: &Session, config: &ControllerConfig) -> Throttle {
    Throttle {
        register: config.throttle_register,
        address: session.address(),
        speed: session.speed(),
        direction: session.direction(),
    }
}

/// Function group request carrying the group's full byte
pub fn function_group(session: &Session, group: FunctionGroupId) -> FunctionGroup {
    FunctionGroup {
        address: session.address(),
        byte: session.functions().encode(group),
    }
}

/// Read request for the active CV
pub fn read_cv(session: &Session, config: &ControllerConfig) -> ReadCv {
    let (callback, sub) = config.read_callback;
    ReadCv {
        cv: session.cv(),
        callback,
        sub,
    }
}

/// Write request for the active CV and value
pub fn write_cv(session: &Session, config: &ControllerConfig) -> WriteCv {
    let (callback, sub) = config.write_callback;
    WriteCv {
        cv: session.cv(),
        value: session.cv_value(),
        callback,
        sub,
    }
}

/// Map a raw knob reading linearly onto speed steps 0-126
///
/// Readings above full scale count as full scale. The division
/// truncates, so only the top of the travel gives step 126.
pub fn speed_step(raw: u16, full_scale: u16) -> u8 {
    if full_scale == 0 {
        return 0;
    }
    let raw = u32::from(raw.min(full_scale));
    let step = raw * u32::from(MAX_SPEED) / u32::from(full_scale);
    step as u8
}
