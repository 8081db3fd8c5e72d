//! Board wiring
//!
//! Pin map of the reference panel (Raspberry Pi Pico):
//!
//! | Function              | Pin          |
//! |-----------------------|--------------|
//! | Station UART0 TX / RX | GPIO0 / GPIO1 |
//! | LCD I2C0 SDA / SCL    | GPIO4 / GPIO5 |
//! | Keypad rows 0-4       | GPIO6-GPIO10 |
//! | Keypad columns 0-3    | GPIO11-GPIO14 |
//! | Main track enable     | GPIO15       |
//! | Prog track enable     | GPIO16       |
//! | Speed knob (ADC0)     | GPIO26       |

/// PCF8574 backpack address
pub const LCD_ADDRESS: u8 = 0x27;

/// LCD bus clock
pub const I2C_FREQUENCY_HZ: u32 = 100_000;

/// Base station serial speed
pub const STATION_BAUD: u32 = 115_200;

/// Longest wait for a CV reply (ms)
pub const REPLY_TIMEOUT_MS: u32 = 3_000;

/// Full-scale reading of the 12-bit ADC
pub const ADC_FULL_SCALE: u16 = 4095;

/// Scans a key must be held before it counts
pub const DEBOUNCE_SCANS: u8 = 4;

/// Dispatch loop period (ms)
pub const POLL_PERIOD_MS: u64 = 5;
