//! DCC++ text replies
//!
//! Only the replies the panel acts on are decoded; everything else the
//! base station prints is reported as [`ReplyError::Unknown`] and skipped.

use core::str::{self, FromStr};

/// CV value reported when the decoder did not acknowledge
pub const CV_NO_ACK: i16 = -1;

/// Reply parse errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReplyError {
    /// Not bracketed, not ASCII, or a field failed to parse
    Malformed,
    /// Well-formed but not a reply the panel understands
    Unknown,
}

/// A reply from the base station
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reply {
    /// `<p1>` / `<p0>`
    Power(bool),
    /// `<T REG SPEED DIR>`
    Throttle { register: u8, speed: u8, direction: u8 },
    /// `<r CALLBACK|SUB|CV VALUE>`
    Cv {
        callback: u16,
        sub: u16,
        cv: u16,
        /// Value read or written, [`CV_NO_ACK`] on failure
        value: i16,
    },
}

impl Reply {
    /// Parse one bracketed reply, surrounding whitespace allowed
    pub fn parse(bytes: &[u8]) -> Result<Self, ReplyError> {
        let text = str::from_utf8(bytes).map_err(|_| ReplyError::Malformed)?;
        let body = text
            .trim()
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .ok_or(ReplyError::Malformed)?;

        let mut chars = body.chars();
        let tag = chars.next().ok_or(ReplyError::Malformed)?;
        let rest = chars.as_str().trim();

        match tag {
            'p' => match rest {
                "1" => Ok(Reply::Power(true)),
                "0" => Ok(Reply::Power(false)),
                _ => Err(ReplyError::Malformed),
            },
            'T' => {
                let mut fields = rest.split_whitespace();
                let register = field(fields.next())?;
                let speed = field(fields.next())?;
                let direction = field(fields.next())?;
                Ok(Reply::Throttle {
                    register,
                    speed,
                    direction,
                })
            }
            'r' => {
                let mut parts = rest.split('|');
                let callback = field(parts.next())?;
                let sub = field(parts.next())?;
                let mut tail = parts.next().ok_or(ReplyError::Malformed)?.split_whitespace();
                let cv = field(tail.next())?;
                let value = field(tail.next())?;
                Ok(Reply::Cv {
                    callback,
                    sub,
                    cv,
                    value,
                })
            }
            _ => Err(ReplyError::Unknown),
        }
    }

    /// Returns true if this CV reply answers a request for `want_cv`
    /// tagged with the given callback pair
    pub fn answers(&self, want_callback: u16, want_sub: u16, want_cv: u16) -> bool {
        matches!(
            self,
            Reply::Cv { callback, sub, cv, .. }
                if *callback == want_callback && *sub == want_sub && *cv == want_cv
        )
    }
}

fn field<T: FromStr>(text: Option<&str>) -> Result<T, ReplyError> {
    text.ok_or(ReplyError::Malformed)?
        .trim()
        .parse()
        .map_err(|_| ReplyError::Malformed)
}
