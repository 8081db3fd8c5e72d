//! Decoder function flags F0-F9
//!
//! Flags travel to the decoder in groups, one instruction byte per group:
//!
//! | Group | Flags  | Byte                                   |
//! |-------|--------|----------------------------------------|
//! | 1     | F0-F4  | 128 + F1 + 2·F2 + 4·F3 + 8·F4 + 16·F0  |
//! | 2     | F5-F8  | 176 + F5 + 2·F6 + 4·F7 + 8·F8          |
//! | 3     | F9     | 160 + F9                               |
//!
//! F0 (the headlight) is the high bit of group 1 even though it is
//! numbered first. A toggle always re-sends the whole group byte.

/// Number of function flags the panel controls
pub const FUNCTION_COUNT: usize = 10;

const GROUP1_BASE: u8 = 128;
const GROUP2_BASE: u8 = 176;
const GROUP3_BASE: u8 = 160;

/// Function group identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FunctionGroupId {
    /// F0-F4
    Group1,
    /// F5-F8
    Group2,
    /// F9
    Group3,
}

impl FunctionGroupId {
    /// Group a function number belongs to
    pub fn of(function: u8) -> Option<Self> {
        match function {
            0..=4 => Some(FunctionGroupId::Group1),
            5..=8 => Some(FunctionGroupId::Group2),
            9 => Some(FunctionGroupId::Group3),
            _ => None,
        }
    }
}

/// On/off state of F0-F9
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Functions {
    flags: [bool; FUNCTION_COUNT],
}

impl Functions {
    /// All functions off
    pub const fn new() -> Self {
        Self {
            flags: [false; FUNCTION_COUNT],
        }
    }

    /// Check whether a function is on
    pub fn is_on(&self, function: u8) -> bool {
        self.flags.get(function as usize).copied().unwrap_or(false)
    }

    /// Flip one function, returning the group that must be re-sent
    pub fn toggle(&mut self, function: u8) -> Option<FunctionGroupId> {
        let group = FunctionGroupId::of(function)?;
        let flag = &mut self.flags[function as usize];
        *flag = !*flag;
        Some(group)
    }

    /// All flags in F0..F9 order
    pub fn flags(&self) -> &[bool; FUNCTION_COUNT] {
        &self.flags
    }

    /// Encode one group's instruction byte
    pub fn encode(&self, group: FunctionGroupId) -> u8 {
        let bit = |function: usize, weight: u8| if self.flags[function] { weight } else { 0 };
        match group {
            FunctionGroupId::Group1 => {
                GROUP1_BASE | bit(1, 1) | bit(2, 2) | bit(3, 4) | bit(4, 8) | bit(0, 16)
            }
            FunctionGroupId::Group2 => GROUP2_BASE | bit(5, 1) | bit(6, 2) | bit(7, 4) | bit(8, 8),
            FunctionGroupId::Group3 => GROUP3_BASE | bit(9, 1),
        }
    }
}
