//! # DS3231 time and alarm engine
//!
//! A `no_std` library for the DS3231 real-time clock built around the
//! device's own packed time format: seven BCD registers with the 12/24-hour
//! mode and PM flags stored in the hours register.
//!
//! ## Features
//!
//! - [`TimeRecord`]: the 7 register time record with 12/24-hour conversion and
//!   time arithmetic that wraps at midnight
//! - ASCII parsing (`"m/d/y h:m:sP"`) in [`parse`] and fixed-width formatting
//!   (`"hh:mm:ss PM"`, `"mm/dd/yy"`) in [`format`]
//! - Day of week calculation for 2000-2099 in [`calendar`]
//! - Alarm register encoding and decoding for both alarm channels in [`alarm`]
//! - A blocking driver over `embedded-hal` I2C ([`DS3231`]) and, with the
//!   `async` feature, an async driver in [`asynch`]
//! - Optional logging through `log` or `defmt`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ds3231_clock::{AlarmType, Alarms, DS3231, DEFAULT_ADDRESS};
//! use ds3231_clock::parse::parse_datetime;
//!
//! let mut rtc = DS3231::new(i2c, DEFAULT_ADDRESS);
//!
//! rtc.set_datetime(&parse_datetime("12/20/24 2:30:00P")?)?;
//!
//! // Fire alarm 1 ten minutes from now, every day
//! let mut alarm = rtc.datetime()?;
//! alarm.add_seconds(10 * 60);
//! rtc.set_alarm(&alarm, AlarmType::Alarm1AtTime)?;
//! rtc.enable_alarm_interrupt(Alarms::ALARM1, true)?;
//!
//! let now = rtc.datetime()?;
//! let (time, date) = (now.time_to_string(), now.date_to_string());
//! ```
//!
//! ## Feature flags
//!
//! - `async`: async driver using `embedded-hal-async`
//! - `log`: debug logging through the `log` crate
//! - `defmt`: debug logging and `defmt::Format` impls through `defmt`

#![no_std]

#[cfg(feature = "log")]
macro_rules! debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}
#[cfg(all(feature = "defmt", not(feature = "log")))]
macro_rules! debug {
    ($($arg:tt)*) => { defmt::debug!($($arg)*) };
}
#[cfg(not(any(feature = "log", feature = "defmt")))]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "log")]
macro_rules! error {
    ($($arg:tt)*) => { log::error!($($arg)*) };
}
#[cfg(all(feature = "defmt", not(feature = "log")))]
macro_rules! error {
    ($($arg:tt)*) => { defmt::error!($($arg)*) };
}
#[cfg(not(any(feature = "log", feature = "defmt")))]
macro_rules! error {
    ($($arg:tt)*) => {};
}

pub mod alarm;
#[cfg(feature = "async")]
pub mod asynch;
pub mod bcd;
pub mod calendar;
mod datetime;
pub mod format;
pub mod parse;
mod registers;

use chrono::NaiveDateTime;
use embedded_hal::i2c::I2c;
use paste::paste;

pub use alarm::{
    decode_alarm, encode_alarm, AlarmChannel, AlarmError, AlarmMatch, AlarmSelector, AlarmTime,
    AlarmType, Alarms, EncodedAlarm,
};
pub use datetime::{DS3231DateTimeError, TimeRecord, RECORD_LEN};
pub use parse::ParseError;
pub use registers::*;

/// The DS3231's fixed I2C address.
pub const DEFAULT_ADDRESS: u8 = 0x68;

/// Configuration applied by [`DS3231::configure`].
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Display mode of the clock's hours register
    pub time_representation: TimeRepresentation,
    /// Frequency of the square wave output
    pub square_wave_frequency: SquareWaveFrequency,
    /// Square wave or alarm interrupt on the INT/SQW pin
    pub interrupt_control: InterruptControl,
    /// Keep the square wave running on battery power
    pub battery_backed_square_wave: bool,
    /// Oscillator on battery power
    pub oscillator_enable: Oscillator,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            time_representation: TimeRepresentation::TwentyFourHour,
            square_wave_frequency: SquareWaveFrequency::Hz1,
            interrupt_control: InterruptControl::Interrupt,
            battery_backed_square_wave: false,
            oscillator_enable: Oscillator::Enabled,
        }
    }
}

/// Errors returned by the drivers.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DS3231Error<I2CE> {
    /// The I2C transfer failed
    I2c(I2CE),
    /// The time registers do not hold a valid chrono date and time
    DateTime(DS3231DateTimeError),
    /// The alarm registers could not be decoded
    Alarm(AlarmError),
}

impl<I2CE> From<I2CE> for DS3231Error<I2CE> {
    fn from(e: I2CE) -> Self {
        DS3231Error::I2c(e)
    }
}

/// Builds a record from the raw time registers. Bit 7 is dropped from every
/// byte, which clears the oscillator and century flags.
pub(crate) fn record_from_registers(mut data: [u8; RECORD_LEN]) -> TimeRecord {
    for byte in &mut data {
        *byte &= 0x7F;
    }
    TimeRecord::from(data)
}

pub(crate) fn apply_config(mut control: Control, config: &Config) -> Control {
    control.set_oscillator_enable(config.oscillator_enable);
    control.set_battery_backed_square_wave(config.battery_backed_square_wave);
    control.set_square_wave_frequency(config.square_wave_frequency);
    control.set_interrupt_control(config.interrupt_control);
    control
}

/// Sets or clears the interrupt enable bits for `alarms`. The INT/SQW pin is
/// always switched to interrupt output.
pub(crate) fn apply_alarm_enable(mut control: Control, alarms: Alarms, enable: bool) -> Control {
    if alarms.alarm1() {
        control.set_alarm1_interrupt_enable(enable);
    }
    if alarms.alarm2() {
        control.set_alarm2_interrupt_enable(enable);
    }
    control.set_interrupt_control(InterruptControl::Interrupt);
    control
}

/// Sets EN32kHz. The write-to-clear flags are set so writing the result back
/// only changes EN32kHz.
pub(crate) fn apply_32khz_output(mut status: Status, enable: bool) -> Status {
    status.set_enable_32khz_output(enable);
    status.set_oscillator_stop_flag(true);
    status.set_alarm1_flag(true);
    status.set_alarm2_flag(true);
    status
}

pub(crate) fn fired_alarms(control: Control, status: Status) -> Alarms {
    let mut alarms = Alarms::NONE;
    alarms.set_alarm1(status.alarm1_flag() && control.alarm1_interrupt_enable());
    alarms.set_alarm2(status.alarm2_flag() && control.alarm2_interrupt_enable());
    alarms
}

/// DS3231 Real-Time Clock driver.
///
/// Every method is one or two register transactions on the bus; nothing is
/// cached between calls except the time representation set by
/// [`configure`](DS3231::configure), which is used when writing chrono times.
pub struct DS3231<I2C: I2c> {
    i2c: I2C,
    address: u8,
    time_representation: TimeRepresentation,
}

impl<I2C: I2c> DS3231<I2C> {
    /// Creates a new DS3231 driver instance.
    ///
    /// # Arguments
    /// * `i2c` - The I2C bus implementation
    /// * `address` - The I2C address of the device (normally [`DEFAULT_ADDRESS`])
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            time_representation: TimeRepresentation::TwentyFourHour,
        }
    }

    /// Releases the I2C bus.
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Applies `config` to the control register and switches the clock's
    /// hours register to the configured representation, converting the
    /// current hour.
    ///
    /// # Errors
    /// Returns `DS3231Error::I2c` if a transfer fails.
    pub fn configure(&mut self, config: &Config) -> Result<(), DS3231Error<I2C::Error>> {
        debug!("DS3231: reading control register");
        let control = apply_config(self.control()?, config);
        debug!("DS3231: writing control: {}", u8::from(control));
        self.set_control(control)?;

        let hours = self.hour()?.to_representation(config.time_representation);
        self.set_hour(hours)?;
        self.time_representation = config.time_representation;
        Ok(())
    }

    fn read_registers(&mut self, start: RegAddr, data: &mut [u8]) -> Result<(), I2C::Error> {
        self.i2c.write_read(self.address, &[start as u8], data)
    }

    // data is at most one time record long
    fn write_registers(&mut self, start: RegAddr, data: &[u8]) -> Result<(), I2C::Error> {
        let mut buf = [0u8; RECORD_LEN + 1];
        buf[0] = start as u8;
        buf[1..=data.len()].copy_from_slice(data);
        self.i2c.write(self.address, &buf[..=data.len()])
    }

    /// Reads the current time record.
    ///
    /// # Errors
    /// Returns `DS3231Error::I2c` if the transfer fails.
    pub fn datetime(&mut self) -> Result<TimeRecord, DS3231Error<I2C::Error>> {
        let mut data = [0; RECORD_LEN];
        self.read_registers(RegAddr::Seconds, &mut data)?;
        Ok(record_from_registers(data))
    }

    /// Writes all 7 time registers in one transaction.
    ///
    /// # Errors
    /// Returns `DS3231Error::I2c` if the transfer fails.
    pub fn set_datetime(&mut self, record: &TimeRecord) -> Result<(), DS3231Error<I2C::Error>> {
        let data: [u8; RECORD_LEN] = record.into();
        self.write_registers(RegAddr::Seconds, &data)?;
        Ok(())
    }

    /// Reads the current time as a chrono date and time.
    ///
    /// # Errors
    /// Returns `DS3231Error::I2c` if the transfer fails or
    /// `DS3231Error::DateTime` if the registers do not hold a valid date.
    pub fn naive_datetime(&mut self) -> Result<NaiveDateTime, DS3231Error<I2C::Error>> {
        self.datetime()?
            .into_datetime()
            .map_err(DS3231Error::DateTime)
    }

    /// Sets the time from a chrono date and time, using the configured time
    /// representation.
    ///
    /// # Errors
    /// Returns `DS3231Error::DateTime` if the year is outside 2000-2099 or
    /// `DS3231Error::I2c` if the transfer fails.
    pub fn set_naive_datetime(
        &mut self,
        datetime: &NaiveDateTime,
    ) -> Result<(), DS3231Error<I2C::Error>> {
        let record = TimeRecord::from_datetime(datetime, self.time_representation)
            .map_err(DS3231Error::DateTime)?;
        self.set_datetime(&record)
    }

    /// Programs an alarm channel from the fields of `record`.
    ///
    /// The hours register of `record` must use the same 12/24-hour mode as the
    /// clock or the alarm never fires.
    ///
    /// # Errors
    /// Returns `DS3231Error::I2c` if the transfer fails.
    pub fn set_alarm(
        &mut self,
        record: &TimeRecord,
        alarm: AlarmType,
    ) -> Result<(), DS3231Error<I2C::Error>> {
        let encoded = encode_alarm(record, alarm);
        self.write_registers(encoded.start_register(), encoded.as_bytes())?;
        Ok(())
    }

    /// Reads back the seconds, minutes and hours of an alarm channel.
    ///
    /// # Errors
    /// Returns `DS3231Error::I2c` if the transfer fails.
    pub fn alarm_time(
        &mut self,
        channel: AlarmChannel,
    ) -> Result<AlarmTime, DS3231Error<I2C::Error>> {
        let mut data = [0u8; 3];
        let data = &mut data[..channel.time_register_count()];
        self.read_registers(channel.start_register(), data)?;
        decode_alarm(channel, data).map_err(DS3231Error::Alarm)
    }

    /// Enables or disables the interrupt of one or both alarms. The INT/SQW
    /// pin is switched to interrupt output either way.
    ///
    /// # Errors
    /// Returns `DS3231Error::I2c` if a transfer fails.
    pub fn enable_alarm_interrupt(
        &mut self,
        alarms: Alarms,
        enable: bool,
    ) -> Result<(), DS3231Error<I2C::Error>> {
        let control = apply_alarm_enable(self.control()?, alarms, enable);
        debug!("DS3231: writing control: {}", u8::from(control));
        self.set_control(control)
    }

    /// Clears the fired flags of both alarms, releasing the interrupt line.
    ///
    /// # Errors
    /// Returns `DS3231Error::I2c` if a transfer fails.
    pub fn clear_alarms(&mut self) -> Result<(), DS3231Error<I2C::Error>> {
        let mut status = self.status()?;
        status.set_alarm1_flag(false);
        status.set_alarm2_flag(false);
        self.set_status(status)
    }

    /// Returns the alarms that have fired and have their interrupt enabled.
    ///
    /// # Errors
    /// Returns `DS3231Error::I2c` if a transfer fails.
    pub fn alarms(&mut self) -> Result<Alarms, DS3231Error<I2C::Error>> {
        let status = self.status()?;
        let control = self.control()?;
        Ok(fired_alarms(control, status))
    }

    /// Enables or disables the 32kHz output pin.
    ///
    /// The oscillator stop and alarm flags are written as 1, which leaves
    /// them unchanged, so an alarm firing between the read and the write is
    /// not lost.
    ///
    /// # Errors
    /// Returns `DS3231Error::I2c` if a transfer fails.
    pub fn enable_32khz_output(&mut self, enable: bool) -> Result<(), DS3231Error<I2C::Error>> {
        let status = apply_32khz_output(self.status()?, enable);
        self.set_status(status)
    }
}

// Single register access
macro_rules! impl_register_access {
    ($(($name:ident, $regaddr:expr, $typ:ident)),+) => {
        impl<I2C: I2c> DS3231<I2C> {
            $(
                paste! {
                    #[doc = concat!("Gets the value of the ", stringify!($name), " register.")]
                    #[doc = "\n\n# Errors"]
                    #[doc = "Returns `DS3231Error::I2c` if the transfer fails."]
                    pub fn $name(&mut self) -> Result<$typ, DS3231Error<I2C::Error>> {
                        let mut data = [0];
                        self.read_registers($regaddr, &mut data)?;
                        Ok($typ::from(data[0]))
                    }

                    #[doc = concat!("Sets the value of the ", stringify!($name), " register.")]
                    #[doc = "\n\n# Errors"]
                    #[doc = "Returns `DS3231Error::I2c` if the transfer fails."]
                    pub fn [<set_ $name>](&mut self, value: $typ) -> Result<(), DS3231Error<I2C::Error>> {
                        self.write_registers($regaddr, &[value.into()])?;
                        Ok(())
                    }
                }
            )+
        }
    }
}

impl_register_access!(
    (second, RegAddr::Seconds, Seconds),
    (minute, RegAddr::Minutes, Minutes),
    (hour, RegAddr::Hours, Hours),
    (day, RegAddr::Day, Day),
    (date, RegAddr::Date, Date),
    (month, RegAddr::Month, Month),
    (year, RegAddr::Year, Year),
    (alarm1_second, RegAddr::Alarm1Seconds, AlarmSeconds),
    (alarm1_minute, RegAddr::Alarm1Minutes, AlarmMinutes),
    (alarm1_hour, RegAddr::Alarm1Hours, AlarmHours),
    (alarm1_day_date, RegAddr::Alarm1DayDate, AlarmDayDate),
    (alarm2_minute, RegAddr::Alarm2Minutes, AlarmMinutes),
    (alarm2_hour, RegAddr::Alarm2Hours, AlarmHours),
    (alarm2_day_date, RegAddr::Alarm2DayDate, AlarmDayDate),
    (control, RegAddr::Control, Control),
    (status, RegAddr::ControlStatus, Status)
);
