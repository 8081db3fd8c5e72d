//! HD44780 character LCD over a PCF8574 I2C backpack
//!
//! The common "I2C LCD" modules wire the expander like this:
//!
//! | PCF8574 | P0 | P1 | P2 | P3        | P4-P7  |
//! |---------|----|----|----|-----------|--------|
//! | LCD     | RS | RW | EN | backlight | D4-D7  |
//!
//! so the controller runs in 4-bit mode and every nibble is latched with
//! an EN pulse. RW is tied low; the busy flag is never read, fixed delays
//! cover the execution times instead.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use keycab_core::traits::{CharDisplay, DisplayError, DISPLAY_COLS, DISPLAY_ROWS};

/// Usual backpack address (0x3F on PCF8574A boards)
pub const DEFAULT_ADDRESS: u8 = 0x27;

/// DDRAM address of the first cell of each row on a 20x4 panel
const ROW_OFFSETS: [u8; 4] = [0x00, 0x40, 0x14, 0x54];

/// Expander bits
mod pin {
    pub const RS: u8 = 0x01;
    pub const EN: u8 = 0x04;
    pub const BACKLIGHT: u8 = 0x08;
}

/// HD44780 instructions
#[allow(dead_code)]
mod cmd {
    pub const CLEAR: u8 = 0x01;
    pub const HOME: u8 = 0x02;
    pub const ENTRY_MODE: u8 = 0x04;
    pub const ENTRY_INCREMENT: u8 = 0x02;
    pub const DISPLAY_CONTROL: u8 = 0x08;
    pub const DISPLAY_ON: u8 = 0x04;
    pub const CURSOR_ON: u8 = 0x02;
    pub const BLINK_ON: u8 = 0x01;
    pub const FUNCTION_SET: u8 = 0x20;
    pub const TWO_LINES: u8 = 0x08;
    pub const SET_DDRAM: u8 = 0x80;
}

/// LCD errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LcdError<E> {
    /// I2C transfer failed
    I2c(E),
    /// Row or column outside the panel
    OutOfRange,
}

impl<E> From<LcdError<E>> for DisplayError {
    fn from(e: LcdError<E>) -> Self {
        match e {
            LcdError::I2c(_) => DisplayError::Communication,
            LcdError::OutOfRange => DisplayError::InvalidCoordinates,
        }
    }
}

/// 20x4 HD44780 LCD on a PCF8574 expander
pub struct Hd44780I2c<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    backlight: bool,
    blink: bool,
}

impl<I2C, D> Hd44780I2c<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Create a new driver; call [`Hd44780I2c::init`] before use
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
            backlight: true,
            blink: false,
        }
    }

    /// Run the 4-bit initialisation sequence and clear the panel
    pub fn init(&mut self) -> Result<(), LcdError<I2C::Error>> {
        // Power-on settling time
        self.delay.delay_ms(50);

        // Force 8-bit mode three times, then switch to 4-bit
        self.write_nibble(0x30, 0)?;
        self.delay.delay_us(4500);
        self.write_nibble(0x30, 0)?;
        self.delay.delay_us(4500);
        self.write_nibble(0x30, 0)?;
        self.delay.delay_us(150);
        self.write_nibble(0x20, 0)?;

        self.command(cmd::FUNCTION_SET | cmd::TWO_LINES)?;
        self.update_display_control()?;
        self.clear_panel()?;
        self.command(cmd::ENTRY_MODE | cmd::ENTRY_INCREMENT)?;
        Ok(())
    }

    /// Switch the backlight
    pub fn set_backlight(&mut self, on: bool) -> Result<(), LcdError<I2C::Error>> {
        self.backlight = on;
        let bits = self.backlight_bit();
        self.i2c
            .write(self.address, &[bits])
            .map_err(LcdError::I2c)
    }

    /// Release the bus and delay
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    fn clear_panel(&mut self) -> Result<(), LcdError<I2C::Error>> {
        self.command(cmd::CLEAR)?;
        // Clear takes 1.52 ms
        self.delay.delay_ms(2);
        Ok(())
    }

    fn set_position(&mut self, row: u8, col: u8) -> Result<(), LcdError<I2C::Error>> {
        if row >= DISPLAY_ROWS || col >= DISPLAY_COLS {
            return Err(LcdError::OutOfRange);
        }
        self.command(cmd::SET_DDRAM | (ROW_OFFSETS[row as usize] + col))
    }

    fn update_display_control(&mut self) -> Result<(), LcdError<I2C::Error>> {
        let blink = if self.blink { cmd::BLINK_ON } else { 0 };
        self.command(cmd::DISPLAY_CONTROL | cmd::DISPLAY_ON | blink)
    }

    fn command(&mut self, value: u8) -> Result<(), LcdError<I2C::Error>> {
        self.write_byte(value, 0)
    }

    fn data(&mut self, value: u8) -> Result<(), LcdError<I2C::Error>> {
        self.write_byte(value, pin::RS)
    }

    fn write_byte(&mut self, value: u8, mode: u8) -> Result<(), LcdError<I2C::Error>> {
        self.write_nibble(value & 0xF0, mode)?;
        self.write_nibble(value << 4, mode)
    }

    /// Latch the high nibble of `bits` with one EN pulse
    fn write_nibble(&mut self, bits: u8, mode: u8) -> Result<(), LcdError<I2C::Error>> {
        let frame = (bits & 0xF0) | mode | self.backlight_bit();
        self.i2c
            .write(self.address, &[frame | pin::EN, frame])
            .map_err(LcdError::I2c)?;
        // Most instructions need 37 us
        self.delay.delay_us(50);
        Ok(())
    }

    fn backlight_bit(&self) -> u8 {
        if self.backlight {
            pin::BACKLIGHT
        } else {
            0
        }
    }
}

impl<I2C, D> CharDisplay for Hd44780I2c<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    fn clear(&mut self) -> Result<(), DisplayError> {
        Ok(self.clear_panel()?)
    }

    fn write_at(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError> {
        self.set_position(row, col)?;
        let room = usize::from(DISPLAY_COLS - col);
        for c in text.chars().take(room) {
            let byte = if c.is_ascii() { c as u8 } else { b'?' };
            self.data(byte)?;
        }
        Ok(())
    }

    fn show_cursor(&mut self, row: u8, col: u8) -> Result<(), DisplayError> {
        self.set_position(row, col)?;
        self.blink = true;
        Ok(self.update_display_control()?)
    }

    fn hide_cursor(&mut self) -> Result<(), DisplayError> {
        self.blink = false;
        Ok(self.update_display_control()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};

    /// Mock I2C bus recording every written byte
    #[derive(Default)]
    struct MockBus {
        address: Option<u8>,
        bytes: Vec<u8>,
        fail: bool,
    }

    impl ErrorType for MockBus {
        type Error = ErrorKind;
    }

    impl I2c for MockBus {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if self.fail {
                return Err(ErrorKind::Other);
            }
            self.address = Some(address);
            for op in operations {
                if let Operation::Write(bytes) = op {
                    self.bytes.extend_from_slice(bytes);
                }
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockDelay {
        total_ns: u64,
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += u64::from(ns);
        }
    }

    fn lcd() -> Hd44780I2c<MockBus, MockDelay> {
        let mut lcd = Hd44780I2c::new(MockBus::default(), MockDelay::default(), DEFAULT_ADDRESS);
        lcd.init().unwrap();
        lcd.i2c.bytes.clear();
        lcd
    }

    /// Rebuild (rs, byte) pairs from EN-high frames
    fn decode(bytes: &[u8]) -> Vec<(bool, u8)> {
        let strobes: Vec<u8> = bytes.iter().copied().filter(|b| b & pin::EN != 0).collect();
        strobes
            .chunks(2)
            .map(|pair| (pair[0] & pin::RS != 0, (pair[0] & 0xF0) | (pair[1] >> 4)))
            .collect()
    }

    #[test]
    fn test_init_sequence() {
        let mut lcd = Hd44780I2c::new(MockBus::default(), MockDelay::default(), 0x3F);
        lcd.init().unwrap();
        assert_eq!(lcd.i2c.address, Some(0x3F));

        let strobes: Vec<u8> = lcd
            .i2c
            .bytes
            .iter()
            .copied()
            .filter(|b| b & pin::EN != 0)
            .collect();
        let nibbles: Vec<u8> = strobes[..4].iter().map(|b| b & 0xF0).collect();
        assert_eq!(nibbles, [0x30, 0x30, 0x30, 0x20]);

        let commands = decode(&lcd.i2c.bytes[8..]);
        assert_eq!(
            commands,
            [(false, 0x28), (false, 0x0C), (false, 0x01), (false, 0x06)]
        );
        assert!(lcd.delay.total_ns >= 50_000_000);
        assert!(lcd.i2c.bytes.iter().all(|b| b & pin::BACKLIGHT != 0));
    }

    #[test]
    fn test_write_at_row_offsets() {
        let mut lcd = lcd();
        lcd.write_at(2, 3, "Hi").unwrap();
        assert_eq!(
            decode(&lcd.i2c.bytes),
            [(false, 0x80 | (0x14 + 3)), (true, b'H'), (true, b'i')]
        );

        lcd.i2c.bytes.clear();
        lcd.write_at(3, 0, "").unwrap();
        assert_eq!(decode(&lcd.i2c.bytes), [(false, 0x80 | 0x54)]);
    }

    #[test]
    fn test_write_at_clips_to_width() {
        let mut lcd = lcd();
        lcd.write_at(1, 18, "abcd").unwrap();
        let written: Vec<(bool, u8)> = decode(&lcd.i2c.bytes);
        assert_eq!(written.len(), 3);
        assert_eq!(written[2], (true, b'b'));
    }

    #[test]
    fn test_non_ascii_replaced() {
        let mut lcd = lcd();
        lcd.write_at(0, 0, "é").unwrap();
        assert_eq!(decode(&lcd.i2c.bytes)[1], (true, b'?'));
    }

    #[test]
    fn test_out_of_range() {
        let mut lcd = lcd();
        assert_eq!(
            lcd.write_at(4, 0, "x"),
            Err(DisplayError::InvalidCoordinates)
        );
        assert_eq!(
            lcd.show_cursor(0, 20),
            Err(DisplayError::InvalidCoordinates)
        );
        assert!(lcd.i2c.bytes.is_empty());
    }

    #[test]
    fn test_cursor_blink() {
        let mut lcd = lcd();
        lcd.show_cursor(1, 4).unwrap();
        assert_eq!(
            decode(&lcd.i2c.bytes),
            [(false, 0x80 | 0x44), (false, 0x0D)]
        );

        lcd.i2c.bytes.clear();
        lcd.hide_cursor().unwrap();
        assert_eq!(decode(&lcd.i2c.bytes), [(false, 0x0C)]);
    }

    #[test]
    fn test_backlight_off() {
        let mut lcd = lcd();
        lcd.set_backlight(false).unwrap();
        lcd.clear().unwrap();
        assert!(lcd.i2c.bytes.iter().all(|b| b & pin::BACKLIGHT == 0));
    }

    #[test]
    fn test_bus_error() {
        let mut lcd = lcd();
        lcd.i2c.fail = true;
        assert_eq!(lcd.clear(), Err(DisplayError::Communication));
    }
}
