//! TOML date and time values (RFC 3339 plus TOML's local forms).

use std::fmt::{self, Display};

use crate::combinator::{Cursor, at_least, attempt, exactly, opt, preceded, recognize};
use crate::error::ValueReason;
use crate::grammar::RawValue;
use crate::scalar::{byte, byte_if, is_digit};
use crate::span::Span;

#[cfg(test)]
#[path = "./time_tests.rs"]
mod tests;

/// A calendar date, `1979-05-27`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Date {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

/// A time of day, `07:32:00.999`.
///
/// `second` may be 60 to represent a leap second; local times are not checked
/// against any calendar.
#[derive(Clone, Copy, Debug)]
pub struct Time {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub nanosecond: u32,
    precision: u8,
}

impl Time {
    /// Creates a time without fractional seconds.
    pub fn new(hour: u8, minute: u8, second: u8) -> Time {
        Time {
            hour,
            minute,
            second,
            nanosecond: 0,
            precision: 0,
        }
    }

    /// Sets the fractional seconds, shown with `precision` digits (at most 9).
    pub fn with_fraction(mut self, nanosecond: u32, precision: u8) -> Time {
        self.nanosecond = nanosecond;
        self.precision = precision.min(9);
        self
    }

    /// Number of digits in the original fractional seconds, 0 if there were
    /// none. At most 9, extra digits are truncated when parsing.
    pub fn subsecond_precision(&self) -> u8 {
        self.precision
    }
}

impl PartialEq for Time {
    fn eq(&self, other: &Time) -> bool {
        self.hour == other.hour
            && self.minute == other.minute
            && self.second == other.second
            && self.nanosecond == other.nanosecond
    }
}

impl Eq for Time {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeOffset {
    /// UTC, written `Z` or `z`.
    Z,
    /// A numeric offset from UTC, `+00:00` included.
    Custom { minutes: i16 },
}

impl TimeOffset {
    /// Offset from UTC in minutes, `Z` is zero.
    pub fn minutes(&self) -> i16 {
        match self {
            TimeOffset::Z => 0,
            TimeOffset::Custom { minutes } => *minutes,
        }
    }
}

/// A date and time without an offset, not tied to any time zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LocalDateTime {
    pub date: Date,
    pub time: Time,
}

/// A date and time with an offset from UTC.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OffsetDateTime {
    pub date: Date,
    pub time: Time,
    pub offset: TimeOffset,
}

pub(crate) fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub(crate) fn days_in_month(year: u16, month: u8) -> u8 {
    const DAYS: [u8; 13] = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    if month == 2 && is_leap_year(year) {
        29
    } else {
        DAYS.get(month as usize).copied().unwrap_or(0)
    }
}

impl Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)?;
        if self.precision > 0 {
            let digits = format!("{:09}", self.nanosecond);
            let shown = digits.get(..self.precision as usize).unwrap_or(&digits);
            write!(f, ".{shown}")?;
        }
        Ok(())
    }
}

impl Display for TimeOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeOffset::Z => f.write_str("Z"),
            TimeOffset::Custom { minutes } => {
                let sign = if *minutes < 0 { '-' } else { '+' };
                let abs = minutes.unsigned_abs();
                write!(f, "{sign}{:02}:{:02}", abs / 60, abs % 60)
            }
        }
    }
}

impl Display for LocalDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}T{}", self.date, self.time)
    }
}

impl Display for OffsetDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}T{}{}", self.date, self.time, self.offset)
    }
}

/// Exactly `len` decimal digits as a number.
fn fixed_digits(c: &mut Cursor<'_>, len: usize) -> Option<u32> {
    let text = recognize(exactly(len, byte_if(is_digit)))(c)?;
    text.parse().ok()
}

/// `YYYY-MM-DD`. A match of that shape with out of range fields yields the
/// span of the whole date.
pub(crate) fn local_date(c: &mut Cursor<'_>) -> Option<Result<Date, Span>> {
    attempt(c, |c| {
        let start = c.pos();
        let year = fixed_digits(c, 4)?;
        byte(b'-')(c)?;
        let month = fixed_digits(c, 2)?;
        byte(b'-')(c)?;
        let day = fixed_digits(c, 2)?;

        let year = year as u16;
        let month = month as u8;
        let day = day as u8;
        let valid = (1..=9999).contains(&year)
            && (1..=12).contains(&month)
            && day >= 1
            && day <= days_in_month(year, month);
        if valid {
            Some(Ok(Date { year, month, day }))
        } else {
            Some(Err(c.span_from(start)))
        }
    })
}

/// `HH:MM:SS` with optional fractional seconds.
pub(crate) fn local_time(c: &mut Cursor<'_>) -> Option<Result<Time, Span>> {
    attempt(c, |c| {
        let start = c.pos();
        let hour = fixed_digits(c, 2)?;
        byte(b':')(c)?;
        let minute = fixed_digits(c, 2)?;
        byte(b':')(c)?;
        let second = fixed_digits(c, 2)?;
        let fraction = opt(preceded(
            byte(b'.'),
            recognize(at_least(1, byte_if(is_digit))),
        ))(c)?;

        if hour > 23 || minute > 59 || second > 60 {
            return Some(Err(c.span_from(start)));
        }
        let mut time = Time::new(hour as u8, minute as u8, second as u8);
        if let Some(fraction) = fraction {
            let kept = &fraction[..fraction.len().min(9)];
            let mut nanos = 0u32;
            for b in kept.bytes() {
                nanos = nanos * 10 + (b - b'0') as u32;
            }
            for _ in kept.len()..9 {
                nanos *= 10;
            }
            time.nanosecond = nanos;
            time.precision = kept.len() as u8;
        }
        Some(Ok(time))
    })
}

/// `Z`, `z` or `±HH:MM`.
pub(crate) fn time_offset(c: &mut Cursor<'_>) -> Option<Result<TimeOffset, Span>> {
    if c.eat(b'Z') || c.eat(b'z') {
        return Some(Ok(TimeOffset::Z));
    }
    attempt(c, |c| {
        let start = c.pos();
        let sign: i16 = match c.peek()? {
            b'+' => 1,
            b'-' => -1,
            _ => return None,
        };
        c.advance(1);
        let hour = fixed_digits(c, 2)?;
        byte(b':')(c)?;
        let minute = fixed_digits(c, 2)?;
        if hour > 23 || minute > 59 {
            return Some(Err(c.span_from(start)));
        }
        let minutes = sign * (hour as i16 * 60 + minute as i16);
        Some(Ok(TimeOffset::Custom { minutes }))
    })
}

/// Any of the four temporal literals. Errors point at the component that is
/// out of range rather than the whole literal.
pub(crate) fn date_time(c: &mut Cursor<'_>) -> Option<RawValue> {
    let date = match local_date(c) {
        Some(Ok(date)) => date,
        Some(Err(span)) => return Some(RawValue::Error(span, ValueReason::InvalidDate)),
        None => {
            return match local_time(c)? {
                Ok(time) => Some(RawValue::LocalTime(time)),
                Err(span) => Some(RawValue::Error(span, ValueReason::InvalidTime)),
            };
        }
    };

    let time = attempt(c, |c| {
        match c.peek()? {
            b'T' | b't' | b' ' => c.advance(1),
            _ => return None,
        }
        local_time(c)
    });
    let time = match time {
        None => return Some(RawValue::LocalDate(date)),
        Some(Ok(time)) => time,
        Some(Err(span)) => return Some(RawValue::Error(span, ValueReason::InvalidTime)),
    };

    match time_offset(c) {
        None => Some(RawValue::LocalDateTime(LocalDateTime { date, time })),
        Some(Ok(offset)) => Some(RawValue::OffsetDateTime(OffsetDateTime {
            date,
            time,
            offset,
        })),
        Some(Err(span)) => Some(RawValue::Error(span, ValueReason::InvalidTimeOffset)),
    }
}
