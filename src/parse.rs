//! ASCII parsing of times and dates into a [`TimeRecord`].
//!
//! Input is a run of numeric groups separated by any non-digit character:
//!
//! - times: `"h:m:s"`, with an optional `A` or `P` right after the seconds to
//!   select 12-hour mode (`"7:05:00P"`)
//! - dates and times: `"m/d/y h:m:s"`, with the same optional `A`/`P` suffix
//!
//! Leading zeroes are allowed but not required. Each group holds at most
//! [`MAX_GROUP_DIGITS`] digits; a longer group is rejected. Every non-digit
//! character ends the current group, including the end of the input or a NUL
//! byte, so two delimiters in a row produce an empty (zero) group.

use core::str::FromStr;

use crate::bcd::decimal_to_bcd;
use crate::calendar::day_of_week;
use crate::datetime::RECORD_LEN;
use crate::{Day, Hours, TimeRecord, TimeRepresentation};

/// Maximum number of digits in one numeric group.
pub const MAX_GROUP_DIGITS: u8 = 2;

// Record slots in source order: month, day, year, hour, minute, second. Time
// only parses use the last three.
const SLOT_ORDER: [usize; 6] = [5, 4, 6, 2, 1, 0];
const HOURS_SLOT: usize = 2;

const TIME_GROUPS: u8 = 3;
const DATETIME_GROUPS: u8 = 6;

/// Errors reported by the parser.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// The input ended before all groups were read
    Incomplete {
        /// Number of groups the format needs
        expected: u8,
        /// Number of groups actually read
        found: u8,
    },
    /// A group had more than [`MAX_GROUP_DIGITS`] digits
    GroupTooLong {
        /// 1-based position of the offending group
        group: u8,
    },
}

/// Reads up to `groups` numeric groups from `src` into their record slots.
///
/// Digits are accumulated in decimal and converted to BCD when the group is
/// committed. Returns the number of groups committed.
fn scan(src: &[u8], raw: &mut [u8; RECORD_LEN], groups: u8) -> Result<u8, ParseError> {
    let slots = &SLOT_ORDER[SLOT_ORDER.len() - usize::from(groups)..];
    let mut value = 0u8;
    let mut digits = 0u8;
    let mut committed = 0u8;

    let input = src
        .iter()
        .copied()
        .take_while(|&c| c != 0)
        .chain(core::iter::once(0));

    for c in input {
        if c.is_ascii_digit() {
            digits += 1;
            if digits > MAX_GROUP_DIGITS {
                return Err(ParseError::GroupTooLong {
                    group: committed + 1,
                });
            }
            value = value * 10 + (c - b'0');
            continue;
        }

        raw[slots[usize::from(committed)]] = decimal_to_bcd(value);
        committed += 1;
        if committed == groups {
            if c == b'A' || c == b'P' {
                let mut hours = Hours::from(raw[HOURS_SLOT]);
                hours.set_time_representation(TimeRepresentation::TwelveHour);
                if c == b'P' {
                    hours.set_pm_flag(true);
                }
                raw[HOURS_SLOT] = hours.into();
            }
            break;
        }
        value = 0;
        digits = 0;
    }

    debug!("scan: committed {} of {} groups", committed, groups);
    Ok(committed)
}

fn scan_exact(src: &str, raw: &mut [u8; RECORD_LEN], groups: u8) -> Result<(), ParseError> {
    let found = scan(src.as_bytes(), raw, groups)?;
    if found == groups {
        Ok(())
    } else {
        Err(ParseError::Incomplete {
            expected: groups,
            found,
        })
    }
}

/// Parses a `"h:m:s"` time, optionally suffixed with `A` or `P`, into the
/// seconds, minutes and hours of `record`.
///
/// The date fields of `record` are kept. On error `record` is not modified.
///
/// # Errors
///
/// Returns [`ParseError::Incomplete`] if fewer than three groups were found
/// and [`ParseError::GroupTooLong`] if a group has more than two digits.
pub fn parse_time_into(src: &str, record: &mut TimeRecord) -> Result<(), ParseError> {
    let mut raw: [u8; RECORD_LEN] = (&*record).into();
    scan_exact(src, &mut raw, TIME_GROUPS)?;
    *record = TimeRecord::from(raw);
    Ok(())
}

/// Parses a `"h:m:s"` time, optionally suffixed with `A` or `P`.
///
/// The date fields of the returned record are zero.
///
/// # Errors
///
/// See [`parse_time_into`].
pub fn parse_time(src: &str) -> Result<TimeRecord, ParseError> {
    let mut record = TimeRecord::default();
    parse_time_into(src, &mut record)?;
    Ok(record)
}

/// Parses a `"m/d/y h:m:s"` date and time, optionally suffixed with `A` or
/// `P`, and fills in the day of week.
///
/// # Errors
///
/// Returns [`ParseError::Incomplete`] if fewer than six groups were found and
/// [`ParseError::GroupTooLong`] if a group has more than two digits.
pub fn parse_datetime(src: &str) -> Result<TimeRecord, ParseError> {
    let mut raw = [0u8; RECORD_LEN];
    scan_exact(src, &mut raw, DATETIME_GROUPS)?;
    let mut record = TimeRecord::from(raw);
    let day = day_of_week(
        record.month().decimal(),
        record.date().decimal(),
        record.year().decimal(),
    );
    record.set_day(Day::from_decimal(day));
    Ok(record)
}

impl FromStr for TimeRecord {
    type Err = ParseError;

    /// Parses a full `"m/d/y h:m:s"` date and time, see [`parse_datetime`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_datetime(s)
    }
}
