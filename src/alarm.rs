//! Alarm encoding and decoding for the DS3231 RTC.
//!
//! The DS3231 has two alarm channels. Alarm 1 has seconds, minutes, hours and
//! day/date registers; Alarm 2 has no seconds register and fires at 00 seconds
//! of the matching minute. Bit 7 of each alarm register is a mask bit: when
//! set, that field is ignored by the comparison, so the set of clear mask bits
//! decides how often the alarm fires.
//!
//! An alarm is described by an [`AlarmType`], whose raw value is a selector
//! byte laid out as [`AlarmSelector`]:
//!
//! - bit 7: channel (0 = Alarm 1, 1 = Alarm 2)
//! - bit 4: match the day of week instead of the day of month
//! - bits 3-0: mask bits for the date, hours, minutes and seconds
//!
//! # Alarm Types
//!
//! ## Alarm 1
//! - `Alarm1EverySecond` (0x0F) - Triggers every second
//! - `Alarm1AtSeconds` (0x0E) - Triggers when seconds match
//! - `Alarm1AtMinutesSeconds` (0x0C) - Triggers when minutes:seconds match
//! - `Alarm1AtTime` (0x08) - Triggers when hours:minutes:seconds match (daily)
//! - `Alarm1AtTimeOnDate` (0x00) - Triggers at a time on a date of the month
//! - `Alarm1AtTimeOnDay` (0x10) - Triggers at a time on a day of the week
//!
//! ## Alarm 2
//! - `Alarm2EveryMinute` (0x8E) - Triggers every minute
//! - `Alarm2AtMinutes` (0x8C) - Triggers when minutes match
//! - `Alarm2AtTime` (0x88) - Triggers when hours:minutes match (daily)
//! - `Alarm2AtTimeOnDate` (0x80) - Triggers at a time on a date of the month
//! - `Alarm2AtTimeOnDay` (0x90) - Triggers at a time on a day of the week
//!
//! The alarm hours register is compared including its 12/24-hour flag, so the
//! record used to set an alarm must be in the same mode as the clock.

use bitfield::bitfield;

use crate::{
    AlarmDayDate, AlarmHours, AlarmMinutes, AlarmSeconds, DayDateSelect, RegAddr, Seconds,
    TimeRecord,
};

/// Error type for alarm encoding and decoding.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmError {
    /// The selector byte is not one of the [`AlarmType`] values
    InvalidSelector(u8),
    /// Too few alarm registers were supplied for the channel
    RegisterCount {
        /// Registers the channel needs
        expected: usize,
        /// Registers supplied
        found: usize,
    },
}

/// One of the two alarm channels.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmChannel {
    /// Alarm 1, with seconds resolution
    Alarm1 = 0,
    /// Alarm 2, with minutes resolution
    Alarm2 = 1,
}

impl From<u8> for AlarmChannel {
    /// Creates an `AlarmChannel` from the selector's channel bit.
    ///
    /// # Panics
    /// Panics if the value is not 0 or 1.
    fn from(v: u8) -> Self {
        match v {
            0 => AlarmChannel::Alarm1,
            1 => AlarmChannel::Alarm2,
            _ => panic!("Invalid value for AlarmChannel: {}", v),
        }
    }
}

impl From<AlarmChannel> for u8 {
    fn from(v: AlarmChannel) -> Self {
        v as u8
    }
}

impl AlarmChannel {
    /// First register of the channel.
    #[must_use]
    pub fn start_register(self) -> RegAddr {
        match self {
            AlarmChannel::Alarm1 => RegAddr::Alarm1Seconds,
            AlarmChannel::Alarm2 => RegAddr::Alarm2Minutes,
        }
    }

    /// Number of registers written when the alarm is set, day/date included.
    #[must_use]
    pub fn register_count(self) -> usize {
        match self {
            AlarmChannel::Alarm1 => 4,
            AlarmChannel::Alarm2 => 3,
        }
    }

    /// Number of registers read back by [`decode_alarm`]; the day/date
    /// register is not part of the decoded time.
    #[must_use]
    pub fn time_register_count(self) -> usize {
        self.register_count() - 1
    }
}

bitfield! {
    /// Alarm selector byte.
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct AlarmSelector(u8);
    impl Debug;
    /// Alarm channel
    pub from into AlarmChannel, channel, set_channel: 7, 7;
    /// Match the day of week (set) or the day of month (clear)
    pub match_day_of_week, set_match_day_of_week: 4;
    /// Ignore the day/date field
    pub date_masked, set_date_masked: 3;
    /// Ignore the hours field
    pub hours_masked, set_hours_masked: 2;
    /// Ignore the minutes field
    pub minutes_masked, set_minutes_masked: 1;
    /// Ignore the seconds field (Alarm 1 only)
    pub seconds_masked, set_seconds_masked: 0;
}

/// The supported alarm configurations. The discriminant is the selector byte.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum AlarmType {
    /// Alarm 1 fires every second
    Alarm1EverySecond = 0x0F,
    /// Alarm 1 fires when the seconds match
    Alarm1AtSeconds = 0x0E,
    /// Alarm 1 fires when minutes and seconds match
    Alarm1AtMinutesSeconds = 0x0C,
    /// Alarm 1 fires when hours, minutes and seconds match
    Alarm1AtTime = 0x08,
    /// Alarm 1 fires when the date of month, hours, minutes and seconds match
    Alarm1AtTimeOnDate = 0x00,
    /// Alarm 1 fires when the day of week, hours, minutes and seconds match
    Alarm1AtTimeOnDay = 0x10,
    /// Alarm 2 fires every minute
    Alarm2EveryMinute = 0x8E,
    /// Alarm 2 fires when the minutes match
    Alarm2AtMinutes = 0x8C,
    /// Alarm 2 fires when hours and minutes match
    Alarm2AtTime = 0x88,
    /// Alarm 2 fires when the date of month, hours and minutes match
    Alarm2AtTimeOnDate = 0x80,
    /// Alarm 2 fires when the day of week, hours and minutes match
    Alarm2AtTimeOnDay = 0x90,
}

impl AlarmType {
    /// The selector byte for this alarm type.
    #[must_use]
    pub fn selector(self) -> AlarmSelector {
        AlarmSelector(self as u8)
    }

    /// The channel this alarm type programs.
    #[must_use]
    pub fn channel(self) -> AlarmChannel {
        self.selector().channel()
    }
}

impl From<AlarmType> for u8 {
    fn from(v: AlarmType) -> Self {
        v as u8
    }
}

impl TryFrom<u8> for AlarmType {
    type Error = AlarmError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0x0F => Ok(AlarmType::Alarm1EverySecond),
            0x0E => Ok(AlarmType::Alarm1AtSeconds),
            0x0C => Ok(AlarmType::Alarm1AtMinutesSeconds),
            0x08 => Ok(AlarmType::Alarm1AtTime),
            0x00 => Ok(AlarmType::Alarm1AtTimeOnDate),
            0x10 => Ok(AlarmType::Alarm1AtTimeOnDay),
            0x8E => Ok(AlarmType::Alarm2EveryMinute),
            0x8C => Ok(AlarmType::Alarm2AtMinutes),
            0x88 => Ok(AlarmType::Alarm2AtTime),
            0x80 => Ok(AlarmType::Alarm2AtTimeOnDate),
            0x90 => Ok(AlarmType::Alarm2AtTimeOnDay),
            _ => Err(AlarmError::InvalidSelector(v)),
        }
    }
}

bitfield! {
    /// Alarm enable and fired bits, laid out like the low bits of the
    /// control and status registers.
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct Alarms(u8);
    impl Debug;
    /// Alarm 2
    pub alarm2, set_alarm2: 1;
    /// Alarm 1
    pub alarm1, set_alarm1: 0;
}

impl Alarms {
    /// No alarm.
    pub const NONE: Alarms = Alarms(0b00);
    /// Alarm 1 only.
    pub const ALARM1: Alarms = Alarms(0b01);
    /// Alarm 2 only.
    pub const ALARM2: Alarms = Alarms(0b10);
    /// Both alarms.
    pub const BOTH: Alarms = Alarms(0b11);

    /// Returns `true` if neither alarm is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0 & 0b11 == 0
    }

    #[must_use]
    pub fn bits(&self) -> u8 {
        self.0 & 0b11
    }

    #[must_use]
    pub fn from_bits(bits: u8) -> Self {
        Alarms(bits & 0b11)
    }

    /// Returns `true` if `channel` is set.
    #[must_use]
    pub fn contains(&self, channel: AlarmChannel) -> bool {
        match channel {
            AlarmChannel::Alarm1 => self.alarm1(),
            AlarmChannel::Alarm2 => self.alarm2(),
        }
    }
}

impl From<AlarmChannel> for Alarms {
    fn from(channel: AlarmChannel) -> Self {
        match channel {
            AlarmChannel::Alarm1 => Alarms::ALARM1,
            AlarmChannel::Alarm2 => Alarms::ALARM2,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for AlarmSelector {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "AlarmSelector({=u8:#x})", self.0);
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Alarms {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Alarms(1={}, 2={})", self.alarm1(), self.alarm2());
    }
}

/// Alarm register contents ready to be written starting at
/// [`AlarmChannel::start_register`].
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncodedAlarm {
    channel: AlarmChannel,
    data: [u8; 4],
    len: usize,
}

impl EncodedAlarm {
    #[must_use]
    pub fn channel(&self) -> AlarmChannel {
        self.channel
    }

    /// First register to write.
    #[must_use]
    pub fn start_register(&self) -> RegAddr {
        self.channel.start_register()
    }

    /// The register bytes: seconds (Alarm 1 only), minutes, hours, day/date.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }
}

/// Encodes the alarm fields of `record` for `alarm`.
///
/// Seconds (Alarm 1 only), minutes and hours are copied from the record with
/// their mask bits taken from the selector. The last register holds either
/// the day of week with the DY/DT bit set, or the day of month.
#[must_use]
pub fn encode_alarm(record: &TimeRecord, alarm: AlarmType) -> EncodedAlarm {
    let selector = alarm.selector();
    let channel = selector.channel();
    let mut data = [0u8; 4];
    let mut len = 0;

    if channel == AlarmChannel::Alarm1 {
        let mut seconds = AlarmSeconds::default();
        seconds.set_seconds(record.seconds());
        seconds.set_alarm_mask1(selector.seconds_masked());
        data[len] = seconds.into();
        len += 1;
    }

    let mut minutes = AlarmMinutes::default();
    minutes.set_minutes(record.minutes());
    minutes.set_alarm_mask2(selector.minutes_masked());
    data[len] = minutes.into();
    len += 1;

    let mut hours = AlarmHours::default();
    hours.set_hours(record.hours());
    hours.set_alarm_mask3(selector.hours_masked());
    data[len] = hours.into();
    len += 1;

    let mut day_date = AlarmDayDate::default();
    if selector.match_day_of_week() {
        day_date.set_day_date_select(DayDateSelect::Day);
        day_date.set_day_or_date(record.day().into());
    } else {
        day_date.set_day_date_select(DayDateSelect::Date);
        day_date.set_day_or_date(record.date().into());
    }
    day_date.set_alarm_mask4(selector.date_masked());
    data[len] = day_date.into();
    len += 1;

    debug!(
        "encode_alarm: selector={} channel={} registers={}",
        u8::from(alarm),
        u8::from(channel),
        len
    );
    EncodedAlarm { channel, data, len }
}

/// Which fields a decoded alarm compares against the clock.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmMatch {
    /// Seconds participate. Always `true` for Alarm 2, which fires at 00 seconds.
    pub seconds: bool,
    pub minutes: bool,
    pub hours: bool,
}

/// An alarm time read back from the alarm registers.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmTime {
    /// Seconds, minutes and hours of the alarm with the mask bits removed.
    /// The date fields are zero.
    pub time: TimeRecord,
    /// Fields whose mask bit was clear.
    pub matches: AlarmMatch,
}

/// Decodes the seconds, minutes and hours of an alarm channel.
///
/// `registers` starts at [`AlarmChannel::start_register`]: seconds, minutes,
/// hours for Alarm 1 and minutes, hours for Alarm 2. Anything past that (the
/// day/date register) is ignored, the day/date is not decoded.
///
/// # Errors
///
/// Returns [`AlarmError::RegisterCount`] if `registers` is too short.
pub fn decode_alarm(channel: AlarmChannel, registers: &[u8]) -> Result<AlarmTime, AlarmError> {
    let expected = channel.time_register_count();
    if registers.len() < expected {
        return Err(AlarmError::RegisterCount {
            expected,
            found: registers.len(),
        });
    }

    let (seconds, rest) = match channel {
        AlarmChannel::Alarm1 => (Some(AlarmSeconds::from(registers[0])), &registers[1..]),
        AlarmChannel::Alarm2 => (None, registers),
    };
    let minutes = AlarmMinutes::from(rest[0]);
    let hours = AlarmHours::from(rest[1]);

    let mut time = TimeRecord::default();
    time.set_seconds(seconds.map_or(Seconds::default(), |s| s.seconds()));
    time.set_minutes(minutes.minutes());
    time.set_hours(hours.hours());

    let matches = AlarmMatch {
        seconds: seconds.is_none_or(|s| !s.alarm_mask1()),
        minutes: !minutes.alarm_mask2(),
        hours: !hours.alarm_mask3(),
    };
    Ok(AlarmTime { time, matches })
}
