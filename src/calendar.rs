//! Day-of-week calculation for the 2000-2099 century.

/// Three letter day names indexed by `day_of_week - 1` (1 = Sunday).
pub const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thr", "Fri", "Sat"];

const CENTURY: u32 = 20;

/// Computes the day of week (1 = Sunday .. 7 = Saturday) for a decimal
/// month, day of month and two digit year.
///
/// This is Zeller's congruence with the century fixed at 20, so it is only
/// defined for dates between 2000 and 2099. January and February are not
/// shifted to months 13 and 14 of the previous year; the result is the raw
/// congruence plus one, which is what devices set by older firmware hold in
/// their day register. Values outside the century still return a number in
/// 1..=7 but it has no meaning.
#[must_use]
pub fn day_of_week(month: u8, day: u8, year: u8) -> u8 {
    let month = u32::from(month);
    let day = u32::from(day);
    let year = u32::from(year);
    let dow = (day + 13 * (month + 1) / 5 + year + year / 4 + CENTURY / 4 + 5 * CENTURY) % 7 + 1;
    // always 1..=7
    dow as u8
}

/// Returns the three letter name for a day of week (1 = Sunday).
#[must_use]
pub fn day_name(day_of_week: u8) -> Option<&'static str> {
    let index = usize::from(day_of_week).checked_sub(1)?;
    DAY_NAMES.get(index).copied()
}
