//! Keypad key codes
//!
//! The panel uses a 20-key matrix. Each cap carries a legend character
//! that doubles as the code the scanner reports.

/// Number of rows in the keypad matrix
pub const KEYMAP_ROWS: usize = 5;

/// Number of columns in the keypad matrix
pub const KEYMAP_COLS: usize = 4;

/// Legend of the 5x4 keypad, row by row
///
/// ```text
/// F G # *
/// 1 2 3 U
/// 4 5 6 D
/// 7 8 9 S
/// L 0 R E
/// ```
pub const DEFAULT_KEYMAP: [[char; KEYMAP_COLS]; KEYMAP_ROWS] = [
    ['F', 'G', '#', '*'],
    ['1', '2', '3', 'U'],
    ['4', '5', '6', 'D'],
    ['7', '8', '9', 'S'],
    ['L', '0', 'R', 'E'],
];

/// A key press reported by the keypad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Key {
    /// Enable track power (`*`)
    PowerOn,
    /// Disable track power (`#`)
    PowerOff,
    /// Toggle between driving and locomotive selection (`F`)
    ModeToggle,
    /// Enter programming mode (`G`)
    Program,
    /// Reset the value under edit (`S`)
    Escape,
    /// Confirm (`E`)
    Enter,
    /// Right arrow (`R`)
    Right,
    /// Left arrow (`L`)
    Left,
    /// Up arrow (`U`)
    Up,
    /// Down arrow (`D`)
    Down,
    /// Numeric key, always 0-9
    Digit(u8),
}

impl Key {
    /// Parse a key from its legend character
    pub fn from_char(c: char) -> Option<Self> {
        let key = match c {
            '*' => Key::PowerOn,
            '#' => Key::PowerOff,
            'F' => Key::ModeToggle,
            'G' => Key::Program,
            'S' => Key::Escape,
            'E' => Key::Enter,
            'R' => Key::Right,
            'L' => Key::Left,
            'U' => Key::Up,
            'D' => Key::Down,
            '0'..='9' => Key::Digit(c as u8 - b'0'),
            _ => return None,
        };
        Some(key)
    }

    /// Legend character for this key
    pub fn to_char(self) -> char {
        match self {
            Key::PowerOn => '*',
            Key::PowerOff => '#',
            Key::ModeToggle => 'F',
            Key::Program => 'G',
            Key::Escape => 'S',
            Key::Enter => 'E',
            Key::Right => 'R',
            Key::Left => 'L',
            Key::Up => 'U',
            Key::Down => 'D',
            Key::Digit(d) => (b'0' + d.min(9)) as char,
        }
    }

    /// Numeric value of a digit key
    pub fn digit(self) -> Option<u8> {
        match self {
            Key::Digit(d) if d <= 9 => Some(d),
            _ => None,
        }
    }

    /// Returns true for the arrow keys
    pub fn is_arrow(&self) -> bool {
        matches!(self, Key::Right | Key::Left | Key::Up | Key::Down)
    }
}
