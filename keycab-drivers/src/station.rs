//! Serial DCC++ base station client
//!
//! Commands are written as text over a UART. Throttle, function and
//! power commands are fire-and-forget. CV reads and writes block until
//! the station answers with the matching `<r CALLBACK|SUB|CV VALUE>`
//! reply or the timeout runs out.

use embedded_hal::delay::DelayNs;
use embedded_io::{Read, ReadReady, Write};
use heapless::Vec;
use keycab_core::traits::{CommandStation, CvError};
use keycab_protocol::{
    Command, FunctionGroup, ReadCv, Reply, Throttle, WriteCv, CV_NO_ACK,
};

/// Default wait for a CV reply (ms)
///
/// A programming track exchange with retries can take a couple of
/// seconds on the base station side.
pub const DEFAULT_REPLY_TIMEOUT_MS: u32 = 3000;

/// Longest reply kept while looking for the closing `>`
const MAX_REPLY_LEN: usize = 64;

/// Base station reached over a serial link
pub struct SerialStation<U, D> {
    uart: U,
    delay: D,
    timeout_ms: u32,
    line: Vec<u8, MAX_REPLY_LEN>,
}

impl<U, D> SerialStation<U, D>
where
    U: Read + Write + ReadReady,
    D: DelayNs,
{
    /// Create a client with the default reply timeout
    pub fn new(uart: U, delay: D) -> Self {
        Self::with_timeout(uart, delay, DEFAULT_REPLY_TIMEOUT_MS)
    }

    /// Create a client with a custom reply timeout
    pub fn with_timeout(uart: U, delay: D, timeout_ms: u32) -> Self {
        Self {
            uart,
            delay,
            timeout_ms,
            line: Vec::new(),
        }
    }

    /// Release the UART and delay
    pub fn release(self) -> (U, D) {
        (self.uart, self.delay)
    }

    fn send(&mut self, command: Command) -> Result<(), CvError> {
        let text = command.to_text();
        #[cfg(feature = "defmt")]
        defmt::debug!("-> {}", text.as_str());
        self.uart
            .write_all(text.as_bytes())
            .map_err(|_| CvError::Io)?;
        self.uart.flush().map_err(|_| CvError::Io)
    }

    /// Send without waiting for an answer
    fn send_only(&mut self, command: Command) {
        if let Err(_e) = self.send(command) {
            #[cfg(feature = "defmt")]
            defmt::warn!("Station write failed: {}", _e);
        }
    }

    /// Send a CV request and wait for its reply
    ///
    /// Replies for another CV or callback pair, such as the late answer
    /// to an earlier timed-out request, are skipped.
    fn exchange(
        &mut self,
        command: Command,
        callback: u16,
        sub: u16,
        cv: u8,
    ) -> Result<u8, CvError> {
        self.line.clear();
        self.send(command)?;

        let mut waited_ms = 0;
        let mut buf = [0u8; 16];
        loop {
            if self.uart.read_ready().map_err(|_| CvError::Io)? {
                let n = self.uart.read(&mut buf).map_err(|_| CvError::Io)?;
                for &byte in &buf[..n] {
                    if let Some(reply) = self.push_byte(byte) {
                        if reply.answers(callback, sub, u16::from(cv)) {
                            return cv_value(reply);
                        }
                    }
                }
            } else if waited_ms >= self.timeout_ms {
                #[cfg(feature = "defmt")]
                defmt::warn!("No reply for CV{} (callback {}/{})", cv, callback, sub);
                return Err(CvError::Timeout);
            } else {
                self.delay.delay_ms(1);
                waited_ms += 1;
            }
        }
    }

    /// Feed one received byte, returning a reply once one is complete
    ///
    /// Text outside brackets is dropped. Replies that do not parse are
    /// skipped.
    fn push_byte(&mut self, byte: u8) -> Option<Reply> {
        match byte {
            b'<' => {
                self.line.clear();
                let _ = self.line.push(byte);
                None
            }
            _ if self.line.is_empty() => None,
            b'>' => {
                let _ = self.line.push(byte);
                let reply = Reply::parse(&self.line).ok();
                self.line.clear();
                reply
            }
            _ => {
                if self.line.push(byte).is_err() {
                    self.line.clear();
                }
                None
            }
        }
    }
}

fn cv_value(reply: Reply) -> Result<u8, CvError> {
    match reply {
        Reply::Cv { value: CV_NO_ACK, .. } => Err(CvError::NoAck),
        Reply::Cv { value, .. } => u8::try_from(value).map_err(|_| CvError::Malformed),
        _ => Err(CvError::Malformed),
    }
}

impl<U, D> CommandStation for SerialStation<U, D>
where
    U: Read + Write + ReadReady,
    D: DelayNs,
{
    fn set_power(&mut self, on: bool) {
        self.send_only(Command::Power(on));
    }

    fn set_throttle(&mut self, throttle: &Throttle) {
        self.send_only((*throttle).into());
    }

    fn set_function_group(&mut self, group: &FunctionGroup) {
        self.send_only((*group).into());
    }

    fn read_cv(&mut self, request: &ReadCv) -> Result<u8, CvError> {
        self.exchange((*request).into(), request.callback, request.sub, request.cv)
    }

    fn write_cv(&mut self, request: &WriteCv) -> Result<u8, CvError> {
        self.exchange((*request).into(), request.callback, request.sub, request.cv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_io::{ErrorKind, ErrorType};
    use keycab_protocol::Direction;
    use std::collections::VecDeque;

    /// Loopback-free mock UART: bytes written go to `tx`, reads drain `rx`
    #[derive(Default)]
    struct MockUart {
        tx: std::vec::Vec<u8>,
        rx: VecDeque<u8>,
        broken: bool,
    }

    impl MockUart {
        fn with_rx(text: &str) -> Self {
            Self {
                rx: text.bytes().collect(),
                ..Self::default()
            }
        }

        fn sent(&self) -> &str {
            core::str::from_utf8(&self.tx).unwrap()
        }
    }

    impl ErrorType for MockUart {
        type Error = ErrorKind;
    }

    impl Read for MockUart {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            // hand out a few bytes at a time like a real FIFO
            let n = buf.len().min(self.rx.len()).min(5);
            for slot in buf.iter_mut().take(n) {
                *slot = self.rx.pop_front().unwrap_or(0);
            }
            Ok(n)
        }
    }

    impl ReadReady for MockUart {
        fn read_ready(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.rx.is_empty())
        }
    }

    impl Write for MockUart {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            if self.broken {
                return Err(ErrorKind::Other);
            }
            self.tx.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockDelay {
        ms: u32,
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.ms += ns / 1_000_000;
        }

        fn delay_ms(&mut self, ms: u32) {
            self.ms += ms;
        }
    }

    fn station(rx: &str) -> SerialStation<MockUart, MockDelay> {
        SerialStation::with_timeout(MockUart::with_rx(rx), MockDelay::default(), 100)
    }

    const READ_29: ReadCv = ReadCv {
        cv: 29,
        callback: 100,
        sub: 101,
    };

    #[test]
    fn test_fire_and_forget_commands() {
        let mut s = station("");
        s.set_power(true);
        s.set_throttle(&Throttle {
            register: 1,
            address: 3,
            speed: 64,
            direction: Direction::Forward,
        });
        s.set_function_group(&FunctionGroup {
            address: 3,
            byte: 133,
        });
        s.set_power(false);
        let (uart, delay) = s.release();
        assert_eq!(uart.sent(), "<1><t 1 3 64 1><f 3 133><0>");
        assert_eq!(delay.ms, 0);
    }

    #[test]
    fn test_read_cv() {
        let mut s = station("<r100|101|29 6>");
        assert_eq!(s.read_cv(&READ_29), Ok(6));
        assert_eq!(s.uart.sent(), "<R 29 100 101>");
    }

    #[test]
    fn test_read_skips_noise_and_other_replies() {
        let mut s = station("<iDCC++ BASE>\r\n<p1>junk<r102|103|1 5><T1 0 1>\n<r100|101|29 128>");
        assert_eq!(s.read_cv(&READ_29), Ok(128));
    }

    #[test]
    fn test_read_skips_late_reply_for_other_cv() {
        // CV29 answered after its read timed out
        let mut s = station("<r100|101|29 6><r100|101|1 44>");
        let request = ReadCv {
            cv: 1,
            callback: 100,
            sub: 101,
        };
        assert_eq!(s.read_cv(&request), Ok(44));
    }

    #[test]
    fn test_read_times_out_on_other_cv_reply() {
        let mut s = station("<r100|101|29 6>");
        let request = ReadCv {
            cv: 1,
            callback: 100,
            sub: 101,
        };
        assert_eq!(s.read_cv(&request), Err(CvError::Timeout));
    }

    #[test]
    fn test_read_no_ack() {
        let mut s = station("<r100|101|29 -1>");
        assert_eq!(s.read_cv(&READ_29), Err(CvError::NoAck));
    }

    #[test]
    fn test_out_of_range_value() {
        let mut s = station("<r100|101|29 300>");
        assert_eq!(s.read_cv(&READ_29), Err(CvError::Malformed));
    }

    #[test]
    fn test_timeout() {
        let mut s = station("<r100|101|2");
        assert_eq!(s.read_cv(&READ_29), Err(CvError::Timeout));
        assert_eq!(s.delay.ms, 100);
    }

    #[test]
    fn test_write_cv() {
        let mut s = station("<r102|103|1 5>");
        let request = WriteCv {
            cv: 1,
            value: 5,
            callback: 102,
            sub: 103,
        };
        assert_eq!(s.write_cv(&request), Ok(5));
        assert_eq!(s.uart.sent(), "<W 1 5 102 103>");
    }

    #[test]
    fn test_write_failure() {
        let mut s = station("<r102|103|1 -1>");
        let request = WriteCv {
            cv: 1,
            value: 5,
            callback: 102,
            sub: 103,
        };
        assert_eq!(s.write_cv(&request), Err(CvError::NoAck));
    }

    #[test]
    fn test_broken_link() {
        let mut s = station("<r100|101|29 6>");
        s.uart.broken = true;
        assert_eq!(s.read_cv(&READ_29), Err(CvError::Io));
        // fire-and-forget swallows the error
        s.set_power(true);
    }

    #[test]
    fn test_overlong_reply_is_dropped() {
        let long = "<".to_string() + &"x".repeat(100) + "><r100|101|29 7>";
        let mut s = station(&long);
        assert_eq!(s.read_cv(&READ_29), Ok(7));
    }
}
