//! DCC++ text commands
//!
//! Commands sent from the panel to the base station. Each request type
//! converts into a [`Command`], which renders to its bracketed text form.

use core::fmt::{self, Write};

use heapless::String;

/// Longest rendered command (`<W 255 255 65535 65535>` plus slack)
pub const MAX_COMMAND_LEN: usize = 32;

/// Locomotive travel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Reverse (wire value 0)
    Reverse,
    /// Forward (wire value 1)
    #[default]
    Forward,
}

impl Direction {
    /// Wire value used by the throttle command
    pub fn to_wire(self) -> u8 {
        match self {
            Direction::Reverse => 0,
            Direction::Forward => 1,
        }
    }

    /// Parse the wire value
    pub fn from_wire(value: u8) -> Option<Self> {
        match value {
            0 => Some(Direction::Reverse),
            1 => Some(Direction::Forward),
            _ => None,
        }
    }
}

/// Throttle request for one locomotive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Throttle {
    /// Base station register slot
    pub register: u8,
    /// Short locomotive address
    pub address: u8,
    /// Speed step 0-126
    pub speed: u8,
    pub direction: Direction,
}

/// One encoded function group byte for one locomotive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FunctionGroup {
    pub address: u8,
    /// Group instruction byte (128/176/160 base plus flag bits)
    pub byte: u8,
}

/// Programming track CV read request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReadCv {
    pub cv: u8,
    /// Callback number echoed in the reply
    pub callback: u16,
    /// Callback sub-number echoed in the reply
    pub sub: u16,
}

/// Programming track CV write request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WriteCv {
    pub cv: u8,
    pub value: u8,
    /// Callback number echoed in the reply
    pub callback: u16,
    /// Callback sub-number echoed in the reply
    pub sub: u16,
}

/// A command for the base station
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Track power on/off
    Power(bool),
    Throttle(Throttle),
    Function(FunctionGroup),
    ReadCv(ReadCv),
    WriteCv(WriteCv),
}

impl Command {
    /// Write the bracketed text form into `out`
    pub fn write_text<W: Write>(&self, out: &mut W) -> fmt::Result {
        match self {
            Command::Power(on) => write!(out, "<{}>", u8::from(*on)),
            Command::Throttle(t) => write!(
                out,
                "<t {} {} {} {}>",
                t.register,
                t.address,
                t.speed,
                t.direction.to_wire()
            ),
            Command::Function(f) => write!(out, "<f {} {}>", f.address, f.byte),
            Command::ReadCv(r) => write!(out, "<R {} {} {}>", r.cv, r.callback, r.sub),
            Command::WriteCv(w) => {
                write!(out, "<W {} {} {} {}>", w.cv, w.value, w.callback, w.sub)
            }
        }
    }

    /// Render the command into a fixed-capacity string
    pub fn to_text(&self) -> String<MAX_COMMAND_LEN> {
        let mut text = String::new();
        // Every command fits in MAX_COMMAND_LEN
        let _ = self.write_text(&mut text);
        text
    }
}

impl From<Throttle> for Command {
    fn from(t: Throttle) -> Self {
        Command::Throttle(t)
    }
}

impl From<FunctionGroup> for Command {
    fn from(f: FunctionGroup) -> Self {
        Command::Function(f)
    }
}

impl From<ReadCv> for Command {
    fn from(r: ReadCv) -> Self {
        Command::ReadCv(r)
    }
}

impl From<WriteCv> for Command {
    fn from(w: WriteCv) -> Self {
        Command::WriteCv(w)
    }
}
