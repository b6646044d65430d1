//! Fixed-width ASCII rendering of a [`TimeRecord`].
//!
//! Times render as `hh:mm:ss`, or `hh:mm:ss AM` / `hh:mm:ss PM` when the record
//! is in 12-hour mode. Dates render as `mm/dd/yy`. Every field keeps its
//! leading zero so the output width only depends on the mode.

use core::fmt::{self, Write};

use heapless::String;

use crate::bcd::bcd_to_ascii;
use crate::calendar::day_name;
use crate::TimeRecord;

/// Capacity of a rendered time, wide enough for `hh:mm:ss PM`.
pub const TIME_STRING_LEN: usize = 11;
/// Capacity of a rendered date (`mm/dd/yy`).
pub const DATE_STRING_LEN: usize = 8;

pub type TimeString = String<TIME_STRING_LEN>;
pub type DateString = String<DATE_STRING_LEN>;

fn write_bcd(f: &mut impl Write, value: u8) -> fmt::Result {
    let [tens, ones] = bcd_to_ascii(value);
    f.write_char(char::from(tens))?;
    f.write_char(char::from(ones))
}

/// [`Display`](fmt::Display) adapter for the time of a record.
#[derive(Debug, Copy, Clone)]
pub struct TimeDisplay<'a>(&'a TimeRecord);

impl fmt::Display for TimeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.0.hours();
        if hours.is_twelve_hour() {
            write_bcd(f, hours.twelve_hour_bcd())?;
        } else {
            write_bcd(f, hours.twenty_four_hour_bcd())?;
        }
        f.write_char(':')?;
        write_bcd(f, self.0.minutes().into())?;
        f.write_char(':')?;
        write_bcd(f, self.0.seconds().into())?;
        if hours.is_twelve_hour() {
            f.write_str(if hours.pm_flag() { " PM" } else { " AM" })?;
        }
        Ok(())
    }
}

/// [`Display`](fmt::Display) adapter for the date of a record.
#[derive(Debug, Copy, Clone)]
pub struct DateDisplay<'a>(&'a TimeRecord);

impl fmt::Display for DateDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_bcd(f, self.0.month().into())?;
        f.write_char('/')?;
        write_bcd(f, self.0.date().into())?;
        f.write_char('/')?;
        write_bcd(f, self.0.year().into())
    }
}

impl TimeRecord {
    /// Returns a [`Display`](fmt::Display) adapter for the time of day.
    #[must_use]
    pub fn time_display(&self) -> TimeDisplay<'_> {
        TimeDisplay(self)
    }

    /// Returns a [`Display`](fmt::Display) adapter for the date.
    #[must_use]
    pub fn date_display(&self) -> DateDisplay<'_> {
        DateDisplay(self)
    }

    /// Renders the time as `hh:mm:ss` or `hh:mm:ss AM`/`PM`.
    #[must_use]
    pub fn time_to_string(&self) -> TimeString {
        let mut out = TimeString::new();
        // the widest output is exactly TIME_STRING_LEN characters
        let _ = write!(out, "{}", self.time_display());
        out
    }

    /// Renders the date as `mm/dd/yy`.
    #[must_use]
    pub fn date_to_string(&self) -> DateString {
        let mut out = DateString::new();
        let _ = write!(out, "{}", self.date_display());
        out
    }

    /// Returns the three letter name of the day of week (`"Sun"` .. `"Sat"`),
    /// or `None` if the day register is not 1-7.
    #[must_use]
    pub fn day_of_week_to_str(&self) -> Option<&'static str> {
        day_name(self.day().decimal())
    }
}
