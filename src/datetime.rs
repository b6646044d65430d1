//! The packed DS3231 time record.
//!
//! [`TimeRecord`] mirrors the device's 7 consecutive time registers:
//! seconds, minutes, hours, day of week, date, month and year, each stored as
//! BCD. The hours register carries the 12/24-hour mode flag and the PM flag,
//! so a record always knows how it should be displayed.
//!
//! # Operations
//!
//! - [`TimeRecord::set_time_mode`] converts between 24-hour and 12-hour modes in place
//! - [`TimeRecord::seconds_since_midnight`] and [`TimeRecord::add_seconds`] do time arithmetic
//!   with wraparound at midnight
//! - [`TimeRecord::from_datetime`] and [`TimeRecord::into_datetime`] convert to and from chrono
//!
//! Parsing and formatting live in [`crate::parse`] and [`crate::format`].
//!
//! # Error Handling
//!
//! Only the chrono conversions can fail; errors are reported via [`DS3231DateTimeError`].

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::calendar::day_of_week;
use crate::{Date, Day, Hours, Minutes, Month, Seconds, TimeRepresentation, Year};

/// Number of registers in a time record.
pub const RECORD_LEN: usize = 7;

const SECONDS_PER_DAY: u32 = 86_400;

/// The 7 BCD time registers of the DS3231.
///
/// Values are not range checked: a record holds whatever was parsed or read
/// from the device, and every operation on it is defined (if meaningless) for
/// out-of-range fields.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeRecord {
    seconds: Seconds,
    minutes: Minutes,
    hours: Hours,
    day: Day,
    date: Date,
    month: Month,
    year: Year,
}

impl TimeRecord {
    /// Creates a 24-hour record for a time of day with the date fields zeroed.
    #[must_use]
    pub fn from_hms(hour: u8, minute: u8, second: u8) -> Self {
        Self {
            seconds: Seconds::from_decimal(second),
            minutes: Minutes::from_decimal(minute),
            hours: Hours::twenty_four_hour(hour),
            ..Self::default()
        }
    }

    /// Returns a copy with the date set from a decimal month, day of month and
    /// two digit year. The day of week is computed with
    /// [`day_of_week`](crate::calendar::day_of_week).
    #[must_use]
    pub fn with_date(mut self, month: u8, date: u8, year: u8) -> Self {
        self.month = Month::from_decimal(month);
        self.date = Date::from_decimal(date);
        self.year = Year::from_decimal(year);
        self.day = Day::from_decimal(day_of_week(month, date, year));
        self
    }

    pub fn seconds(&self) -> Seconds {
        self.seconds
    }

    pub fn set_seconds(&mut self, seconds: Seconds) {
        self.seconds = seconds;
    }

    pub fn minutes(&self) -> Minutes {
        self.minutes
    }

    pub fn set_minutes(&mut self, minutes: Minutes) {
        self.minutes = minutes;
    }

    pub fn hours(&self) -> Hours {
        self.hours
    }

    pub fn set_hours(&mut self, hours: Hours) {
        self.hours = hours;
    }

    /// Day of week (1 = Sunday).
    pub fn day(&self) -> Day {
        self.day
    }

    pub fn set_day(&mut self, day: Day) {
        self.day = day;
    }

    /// Day of month.
    pub fn date(&self) -> Date {
        self.date
    }

    pub fn set_date(&mut self, date: Date) {
        self.date = date;
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn set_month(&mut self, month: Month) {
        self.month = month;
    }

    /// Year within the 2000s (0-99).
    pub fn year(&self) -> Year {
        self.year
    }

    pub fn set_year(&mut self, year: Year) {
        self.year = year;
    }

    /// Switches the record between 24-hour and 12-hour (AM/PM) display.
    ///
    /// Does nothing if the record is already in the requested mode. Only the
    /// hours register changes.
    pub fn set_time_mode(&mut self, representation: TimeRepresentation) {
        self.hours = self.hours.to_representation(representation);
        debug!(
            "set_time_mode: hours={} twelve_hour={} pm={}",
            self.hours.hour(),
            self.hours.is_twelve_hour(),
            self.hours.is_pm()
        );
    }

    /// Seconds elapsed since midnight (0-86399 for a valid record).
    #[must_use]
    pub fn seconds_since_midnight(&self) -> u32 {
        u32::from(self.hours.hour_of_day()) * 3600
            + u32::from(self.minutes.decimal()) * 60
            + u32::from(self.seconds.decimal())
    }

    /// Advances the time of day by `seconds`, wrapping at midnight.
    ///
    /// Returns `true` if the addition rolled over into a new day. The date
    /// fields are left alone; advancing them is up to the caller. The hours
    /// register keeps its 12/24-hour mode and the PM flag follows the new
    /// hour.
    pub fn add_seconds(&mut self, seconds: u32) -> bool {
        let total = u64::from(self.seconds_since_midnight()) + u64::from(seconds);
        let wrapped = total >= u64::from(SECONDS_PER_DAY);
        // < 86400 after the reduction, fits in u32
        let total = (total % u64::from(SECONDS_PER_DAY)) as u32;

        // all three quotients are below 60 or 24
        self.seconds = Seconds::from_decimal((total % 60) as u8);
        self.minutes = Minutes::from_decimal(((total % 3600) / 60) as u8);
        self.hours =
            Hours::from_hour_of_day((total / 3600) as u8, self.hours.time_representation());
        debug!("add_seconds: total={} wrapped={}", total, wrapped);
        wrapped
    }

    /// Builds a record from a chrono date and time.
    ///
    /// The day of week is the real calendar weekday taken from chrono
    /// (1 = Sunday).
    ///
    /// # Errors
    ///
    /// Returns an error if the year is outside 2000-2099.
    pub fn from_datetime(
        datetime: &NaiveDateTime,
        time_representation: TimeRepresentation,
    ) -> Result<Self, DS3231DateTimeError> {
        let year = datetime.year();
        if year > 2099 {
            error!("Year {} is too late! must be before 2100", year);
            return Err(DS3231DateTimeError::YearNotBefore2100);
        }
        if year < 2000 {
            error!("Year {} is too early! must be greater than 1999", year);
            return Err(DS3231DateTimeError::YearNotAfter1999);
        }
        let year = u8::try_from(year - 2000).map_err(|_| DS3231DateTimeError::InvalidDateTime)?;
        let month =
            u8::try_from(datetime.month()).map_err(|_| DS3231DateTimeError::InvalidDateTime)?;
        let date = u8::try_from(datetime.day()).map_err(|_| DS3231DateTimeError::InvalidDateTime)?;
        let hour =
            u8::try_from(datetime.hour()).map_err(|_| DS3231DateTimeError::InvalidDateTime)?;
        let minute =
            u8::try_from(datetime.minute()).map_err(|_| DS3231DateTimeError::InvalidDateTime)?;
        let second =
            u8::try_from(datetime.second()).map_err(|_| DS3231DateTimeError::InvalidDateTime)?;

        let mut raw = Self::from_hms(hour, minute, second).with_date(month, date, year);
        // number_from_sunday is 1..=7
        raw.set_day(Day::from_decimal(datetime.weekday().number_from_sunday() as u8));
        raw.set_time_mode(time_representation);
        Ok(raw)
    }

    /// Converts the record into a chrono date and time in the year 2000-2099.
    ///
    /// # Errors
    ///
    /// Returns [`DS3231DateTimeError::InvalidDateTime`] if any field is out of
    /// range or the date does not exist.
    pub fn into_datetime(self) -> Result<NaiveDateTime, DS3231DateTimeError> {
        let hours = u32::from(self.hours.hour_of_day());
        let minutes = u32::from(self.minutes.decimal());
        let seconds = u32::from(self.seconds.decimal());
        let year = 2000_i32 + i32::from(self.year.decimal());
        let month = u32::from(self.month.decimal());
        let date = u32::from(self.date.decimal());

        NaiveDate::from_ymd_opt(year, month, date)
            .and_then(|d| d.and_hms_opt(hours, minutes, seconds))
            .ok_or(DS3231DateTimeError::InvalidDateTime)
    }
}

impl From<[u8; RECORD_LEN]> for TimeRecord {
    fn from(data: [u8; RECORD_LEN]) -> Self {
        TimeRecord {
            seconds: Seconds::from(data[0]),
            minutes: Minutes::from(data[1]),
            hours: Hours::from(data[2]),
            day: Day::from(data[3]),
            date: Date::from(data[4]),
            month: Month::from(data[5]),
            year: Year::from(data[6]),
        }
    }
}

impl From<&TimeRecord> for [u8; RECORD_LEN] {
    fn from(dt: &TimeRecord) -> [u8; RECORD_LEN] {
        [
            dt.seconds.into(),
            dt.minutes.into(),
            dt.hours.into(),
            dt.day.into(),
            dt.date.into(),
            dt.month.into(),
            dt.year.into(),
        ]
    }
}

impl From<TimeRecord> for [u8; RECORD_LEN] {
    fn from(dt: TimeRecord) -> [u8; RECORD_LEN] {
        (&dt).into()
    }
}

#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Errors that can occur converting between a [`TimeRecord`] and chrono.
pub enum DS3231DateTimeError {
    /// The provided or decoded date/time is invalid (e.g., out of range, not representable)
    InvalidDateTime,
    /// The year is not before 2100
    YearNotBefore2100,
    /// The year is not after 1999
    YearNotAfter1999,
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWELVE: TimeRepresentation = TimeRepresentation::TwelveHour;
    const TWENTY_FOUR: TimeRepresentation = TimeRepresentation::TwentyFourHour;

    fn hms(record: &TimeRecord) -> (u8, u8, u8) {
        (
            record.hours().hour(),
            record.minutes().decimal(),
            record.seconds().decimal(),
        )
    }

    #[test]
    fn test_from_and_into_bcd_array() {
        let arr = [0x45, 0x30, 0x15, 0x05, 0x14, 0x03, 0x24];
        let record = TimeRecord::from(arr);
        assert_eq!(record.seconds().decimal(), 45);
        assert_eq!(record.minutes().decimal(), 30);
        assert_eq!(record.hours().hour(), 15);
        assert_eq!(record.day().decimal(), 5);
        assert_eq!(record.date().decimal(), 14);
        assert_eq!(record.month().decimal(), 3);
        assert_eq!(record.year().decimal(), 24);
        let back: [u8; RECORD_LEN] = record.into();
        assert_eq!(back, arr);
    }

    #[test]
    fn test_from_hms_with_date() {
        let record = TimeRecord::from_hms(9, 5, 3).with_date(1, 1, 0);
        let arr: [u8; RECORD_LEN] = record.into();
        assert_eq!(arr, [0x03, 0x05, 0x09, 0x07, 0x01, 0x01, 0x00]);
    }

    #[test]
    fn test_set_time_mode_twenty_four_to_twelve() {
        let cases = [
            (0, 12, false),
            (1, 1, false),
            (11, 11, false),
            (12, 12, true),
            (13, 1, true),
            (23, 11, true),
        ];
        for (hour24, hour12, pm) in cases {
            let mut record = TimeRecord::from_hms(hour24, 15, 0);
            record.set_time_mode(TWELVE);
            assert!(record.hours().is_twelve_hour());
            assert_eq!(record.hours().hour(), hour12, "hour {}", hour24);
            assert_eq!(record.hours().is_pm(), pm, "hour {}", hour24);
            assert_eq!(record.minutes().decimal(), 15);
        }
    }

    #[test]
    fn test_set_time_mode_twelve_to_twenty_four() {
        let mut record = TimeRecord::from([0x00, 0x00, 0x52, 0, 0, 0, 0]); // 12 AM
        record.set_time_mode(TWENTY_FOUR);
        assert_eq!(u8::from(record.hours()), 0x00);

        let mut record = TimeRecord::from([0x00, 0x00, 0x72, 0, 0, 0, 0]); // 12 PM
        record.set_time_mode(TWENTY_FOUR);
        assert_eq!(u8::from(record.hours()), 0x12);

        let mut record = TimeRecord::from([0x00, 0x00, 0x69, 0, 0, 0, 0]); // 9 PM
        record.set_time_mode(TWENTY_FOUR);
        assert_eq!(u8::from(record.hours()), 0x21);
    }

    #[test]
    fn test_set_time_mode_same_mode_is_noop() {
        let mut record = TimeRecord::from([0x00, 0x00, 0x69, 0, 0, 0, 0]);
        record.set_time_mode(TWELVE);
        assert_eq!(u8::from(record.hours()), 0x69);

        let mut record = TimeRecord::from_hms(18, 0, 0);
        record.set_time_mode(TWENTY_FOUR);
        assert_eq!(u8::from(record.hours()), 0x18);
    }

    #[test]
    fn test_set_time_mode_round_trip_every_hour() {
        for hour in 0..24 {
            let original = TimeRecord::from_hms(hour, 0, 0);
            let mut record = original;
            record.set_time_mode(TWELVE);
            record.set_time_mode(TWENTY_FOUR);
            assert_eq!(record, original, "hour {}", hour);
        }
    }

    #[test]
    fn test_seconds_since_midnight() {
        assert_eq!(TimeRecord::from_hms(0, 0, 0).seconds_since_midnight(), 0);
        assert_eq!(
            TimeRecord::from_hms(23, 59, 59).seconds_since_midnight(),
            86_399
        );
        assert_eq!(
            TimeRecord::from_hms(12, 30, 15).seconds_since_midnight(),
            45_015
        );

        // 12:10:00 AM
        let record = TimeRecord::from([0x00, 0x10, 0x52, 0, 0, 0, 0]);
        assert_eq!(record.seconds_since_midnight(), 600);
        // 12:10:00 PM
        let record = TimeRecord::from([0x00, 0x10, 0x72, 0, 0, 0, 0]);
        assert_eq!(record.seconds_since_midnight(), 43_800);
        // 1:00:00 PM
        let record = TimeRecord::from([0x00, 0x00, 0x61, 0, 0, 0, 0]);
        assert_eq!(record.seconds_since_midnight(), 46_800);
    }

    #[test]
    fn test_add_seconds_wraps_at_midnight() {
        let mut record = TimeRecord::from_hms(23, 59, 59);
        assert!(record.add_seconds(1));
        assert_eq!(hms(&record), (0, 0, 0));
    }

    #[test]
    fn test_add_seconds_within_day() {
        let mut record = TimeRecord::from_hms(12, 0, 0);
        assert!(!record.add_seconds(3600));
        assert_eq!(hms(&record), (13, 0, 0));

        let mut record = TimeRecord::from_hms(10, 59, 30);
        assert!(!record.add_seconds(45));
        assert_eq!(hms(&record), (11, 0, 15));
    }

    #[test]
    fn test_add_seconds_leaves_date_alone() {
        let mut record = TimeRecord::from_hms(23, 0, 0).with_date(12, 31, 24);
        assert!(record.add_seconds(2 * 3600));
        assert_eq!(hms(&record), (1, 0, 0));
        assert_eq!(record.date().decimal(), 31);
        assert_eq!(record.month().decimal(), 12);
        assert_eq!(record.year().decimal(), 24);
    }

    #[test]
    fn test_add_seconds_large_delta() {
        let mut record = TimeRecord::from_hms(0, 0, 0);
        assert!(record.add_seconds(3 * 86_400 + 61));
        assert_eq!(hms(&record), (0, 1, 1));

        let mut record = TimeRecord::from_hms(23, 59, 59);
        assert!(record.add_seconds(u32::MAX));
    }

    #[test]
    fn test_add_seconds_keeps_twelve_hour_mode() {
        // 11:59:59 AM + 1s = 12:00:00 PM
        let mut record = TimeRecord::from([0x59, 0x59, 0x51, 0, 0, 0, 0]);
        assert!(!record.add_seconds(1));
        assert_eq!(u8::from(record.hours()), 0x72);
        assert_eq!(hms(&record), (12, 0, 0));

        // 11:30:00 PM + 1h = 12:30:00 AM next day
        let mut record = TimeRecord::from([0x00, 0x30, 0x71, 0, 0, 0, 0]);
        assert!(record.add_seconds(3600));
        assert_eq!(u8::from(record.hours()), 0x52);
        assert!(!record.hours().is_pm());
        assert_eq!(hms(&record), (12, 30, 0));
    }

    #[test]
    fn test_from_datetime_and_into_datetime_roundtrip() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 14)
            .unwrap()
            .and_hms_opt(15, 30, 0)
            .unwrap();
        let raw = TimeRecord::from_datetime(&dt, TWENTY_FOUR).unwrap();
        assert_eq!(raw.into_datetime().unwrap(), dt);

        let raw = TimeRecord::from_datetime(&dt, TWELVE).unwrap();
        assert!(raw.hours().is_pm());
        assert_eq!(raw.hours().hour(), 3);
        assert_eq!(raw.into_datetime().unwrap(), dt);
    }

    #[test]
    fn test_from_datetime_uses_real_weekday() {
        // 2024-03-14 was a Thursday
        let dt = NaiveDate::from_ymd_opt(2024, 3, 14)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let raw = TimeRecord::from_datetime(&dt, TWENTY_FOUR).unwrap();
        assert_eq!(raw.day().decimal(), 5);
        assert_eq!(raw.day_of_week_to_str(), Some("Thr"));

        // 2018-01-01 was a Monday
        let dt = NaiveDate::from_ymd_opt(2018, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let raw = TimeRecord::from_datetime(&dt, TWENTY_FOUR).unwrap();
        assert_eq!(raw.day().decimal(), 2);

        // 2024-12-21 was a Saturday
        let dt = NaiveDate::from_ymd_opt(2024, 12, 21)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let raw = TimeRecord::from_datetime(&dt, TWENTY_FOUR).unwrap();
        assert_eq!(raw.day().decimal(), 7);
    }

    #[test]
    fn test_from_datetime_year_out_of_range() {
        let dt = NaiveDate::from_ymd_opt(1999, 12, 31)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        assert_eq!(
            TimeRecord::from_datetime(&dt, TWENTY_FOUR),
            Err(DS3231DateTimeError::YearNotAfter1999)
        );

        let dt = NaiveDate::from_ymd_opt(2100, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(
            TimeRecord::from_datetime(&dt, TWENTY_FOUR),
            Err(DS3231DateTimeError::YearNotBefore2100)
        );
    }

    #[test]
    fn test_invalid_bcd_to_datetime() {
        // Month 0x13 does not exist
        let raw = TimeRecord::from([0x00, 0x00, 0x00, 0x01, 0x01, 0x13, 0x24]);
        assert_eq!(
            raw.into_datetime(),
            Err(DS3231DateTimeError::InvalidDateTime)
        );

        // 30th of February
        let raw = TimeRecord::from([0x00, 0x00, 0x00, 0x01, 0x30, 0x02, 0x24]);
        assert!(raw.into_datetime().is_err());

        // Seconds 0x6A
        let raw = TimeRecord::from([0x6A, 0x00, 0x00, 0x01, 0x01, 0x01, 0x24]);
        assert!(raw.into_datetime().is_err());
    }

    #[test]
    fn test_leap_year_handling() {
        let leap = NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let raw = TimeRecord::from_datetime(&leap, TWENTY_FOUR).unwrap();
        assert_eq!(raw.into_datetime().unwrap(), leap);
    }
}
