//! Register definitions and bitfield structures for the DS3231 RTC.
//!
//! This module contains the register addresses and bitfield views used by the
//! time record, the alarm codec and the drivers. Every time and alarm field is
//! BCD encoded; the hours registers additionally carry the 12/24-hour mode
//! flag and the PM flag in bits 6 and 5.

use bitfield::bitfield;

use crate::bcd::{bcd_to_decimal, decimal_to_bcd};

/// Register addresses for the DS3231 RTC.
#[allow(unused)]
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegAddr {
    /// Seconds register (0-59)
    Seconds = 0x00,
    /// Minutes register (0-59)
    Minutes = 0x01,
    /// Hours register (1-12 + AM/PM or 0-23)
    Hours = 0x02,
    /// Day register (1-7)
    Day = 0x03,
    /// Date register (1-31)
    Date = 0x04,
    /// Month register (1-12)
    Month = 0x05,
    /// Year register (0-99)
    Year = 0x06,
    /// Alarm 1 seconds register
    Alarm1Seconds = 0x07,
    /// Alarm 1 minutes register
    Alarm1Minutes = 0x08,
    /// Alarm 1 hours register
    Alarm1Hours = 0x09,
    /// Alarm 1 day/date register
    Alarm1DayDate = 0x0A,
    /// Alarm 2 minutes register
    Alarm2Minutes = 0x0B,
    /// Alarm 2 hours register
    Alarm2Hours = 0x0C,
    /// Alarm 2 day/date register
    Alarm2DayDate = 0x0D,
    /// Control register
    Control = 0x0E,
    /// Control/Status register
    ControlStatus = 0x0F,
}

// Enums for fields that live in one or two bits of a register. The `From<u8>`
// impl panics on a value the field cannot hold.
macro_rules! register_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $value:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq)]
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        pub enum $name {
            $($(#[$vmeta])* $variant = $value,)+
        }

        impl From<u8> for $name {
            #[doc = concat!("Creates a `", stringify!($name), "` from a raw field value.")]
            ///
            /// # Panics
            /// Panics if the value does not name a variant.
            fn from(v: u8) -> Self {
                match v {
                    $($value => $name::$variant,)+
                    _ => panic!(concat!("Invalid value for ", stringify!($name), ": {}"), v),
                }
            }
        }

        impl From<$name> for u8 {
            fn from(v: $name) -> Self {
                v as u8
            }
        }
    };
}

register_enum! {
    /// Display mode of an hours register (bit 6).
    TimeRepresentation {
        /// 24-hour clock, hours 0-23
        TwentyFourHour = 0,
        /// 12-hour clock, hours 1-12 with the PM flag
        TwelveHour = 1,
    }
}

register_enum! {
    /// Oscillator on battery power (EOSC, active low).
    Oscillator {
        /// Keeps running on battery
        Enabled = 0,
        /// Stops when running on battery
        Disabled = 1,
    }
}

register_enum! {
    /// Function of the INT/SQW pin (INTCN).
    InterruptControl {
        /// Square wave output
        SquareWave = 0,
        /// Active-low alarm interrupt
        Interrupt = 1,
    }
}

register_enum! {
    /// Square wave output frequency (RS2:RS1).
    SquareWaveFrequency {
        /// 1 Hz
        Hz1 = 0b00,
        /// 1.024 kHz
        Hz1024 = 0b01,
        /// 4.096 kHz
        Hz4096 = 0b10,
        /// 8.192 kHz
        Hz8192 = 0b11,
    }
}

register_enum! {
    /// DY/DT bit of an alarm day/date register.
    DayDateSelect {
        /// Compare against the day of month (1-31)
        Date = 0,
        /// Compare against the day of week (1-7, 1 = Sunday)
        Day = 1,
    }
}

// This macro generates the From<u8> and Into<u8> implementations for the
// register type
macro_rules! from_register_u8 {
    ($typ:ty) => {
        impl From<u8> for $typ {
            fn from(v: u8) -> Self {
                paste::paste!([< $typ >](v))
            }
        }
        impl From<$typ> for u8 {
            fn from(v: $typ) -> Self {
                v.0
            }
        }
    };
}

// Decimal accessors for the plain BCD time registers. The whole byte is
// treated as BCD, the drivers strip bit 7 before building a record.
macro_rules! bcd_register {
    ($typ:ident) => {
        impl $typ {
            #[doc = concat!("Creates a `", stringify!($typ), "` register from a decimal value (0-99).")]
            #[must_use]
            pub const fn from_decimal(value: u8) -> Self {
                $typ(decimal_to_bcd(value))
            }

            /// Returns the decimal value held by the register.
            #[must_use]
            pub const fn decimal(&self) -> u8 {
                bcd_to_decimal(self.0)
            }
        }

        #[cfg(feature = "defmt")]
        impl defmt::Format for $typ {
            fn format(&self, f: defmt::Formatter) {
                defmt::write!(f, "{=str}({})", stringify!($typ), self.decimal());
            }
        }
    };
}

bitfield! {
    /// Seconds register (0-59) with BCD encoding.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Seconds(u8);
    impl Debug;
    /// Tens place of seconds (0-5)
    pub ten_seconds, set_ten_seconds: 6, 4;
    /// Ones place of seconds (0-9)
    pub seconds, set_seconds: 3, 0;
}
from_register_u8!(Seconds);
bcd_register!(Seconds);

bitfield! {
    /// Minutes register (0-59) with BCD encoding.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Minutes(u8);
    impl Debug;
    /// Tens place of minutes (0-5)
    pub ten_minutes, set_ten_minutes: 6, 4;
    /// Ones place of minutes (0-9)
    pub minutes, set_minutes: 3, 0;
}
from_register_u8!(Minutes);
bcd_register!(Minutes);

bitfield! {
    /// Hours register with the 12/24-hour mode flag, PM flag and BCD hour.
    ///
    /// Bits 6 and 5 are the only place the display mode lives. In 12-hour
    /// mode bits 4-0 hold the BCD hour (1-12) and bit 5 is the PM flag; in
    /// 24-hour mode bits 5-0 hold the BCD hour (0-23).
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Hours(u8);
    impl Debug;
    /// Time representation format (12/24 hour)
    pub from into TimeRepresentation, time_representation, set_time_representation: 6, 6;
    /// PM flag, only meaningful in 12-hour mode
    pub pm_flag, set_pm_flag: 5;
    /// BCD hour in 12-hour mode (1-12)
    pub twelve_hour_bcd, set_twelve_hour_bcd: 4, 0;
    /// BCD hour in 24-hour mode (0-23)
    pub twenty_four_hour_bcd, set_twenty_four_hour_bcd: 5, 0;
}
from_register_u8!(Hours);

impl Hours {
    /// Builds a 24-hour mode hours register from a decimal hour (0-23).
    #[must_use]
    pub fn twenty_four_hour(hour: u8) -> Self {
        Hours(decimal_to_bcd(hour) & 0x3F)
    }

    /// Builds a 12-hour mode hours register from a decimal hour (1-12).
    #[must_use]
    pub fn twelve_hour(hour: u8, pm: bool) -> Self {
        let mut value = Hours(decimal_to_bcd(hour) & 0x1F);
        value.set_time_representation(TimeRepresentation::TwelveHour);
        value.set_pm_flag(pm);
        value
    }

    /// Builds an hours register for an hour of the day (0-23) in the given
    /// representation. In 12-hour mode hour 0 becomes 12 AM.
    #[must_use]
    pub fn from_hour_of_day(hour: u8, representation: TimeRepresentation) -> Self {
        match representation {
            TimeRepresentation::TwentyFourHour => Self::twenty_four_hour(hour),
            TimeRepresentation::TwelveHour => {
                let pm = hour >= 12;
                let hour = if pm { hour - 12 } else { hour };
                Self::twelve_hour(if hour == 0 { 12 } else { hour }, pm)
            }
        }
    }

    /// Returns the same time of day in another representation. Returns `self`
    /// unchanged when it already uses `representation`.
    #[must_use]
    pub fn to_representation(self, representation: TimeRepresentation) -> Self {
        if self.time_representation() == representation {
            return self;
        }
        Self::from_hour_of_day(self.hour_of_day(), representation)
    }

    /// Returns `true` when the register is in 12-hour (AM/PM) mode.
    #[must_use]
    pub fn is_twelve_hour(&self) -> bool {
        self.time_representation() == TimeRepresentation::TwelveHour
    }

    /// Returns `true` for a PM time in 12-hour mode. Always `false` in
    /// 24-hour mode.
    #[must_use]
    pub fn is_pm(&self) -> bool {
        self.is_twelve_hour() && self.pm_flag()
    }

    /// The stored hour as displayed: 1-12 in 12-hour mode, 0-23 otherwise.
    #[must_use]
    pub fn hour(&self) -> u8 {
        match self.time_representation() {
            TimeRepresentation::TwelveHour => bcd_to_decimal(self.twelve_hour_bcd()),
            TimeRepresentation::TwentyFourHour => bcd_to_decimal(self.twenty_four_hour_bcd()),
        }
    }

    /// The stored hour on a 24-hour clock regardless of mode. 12 AM maps to 0
    /// and 12 PM to 12.
    #[must_use]
    pub fn hour_of_day(&self) -> u8 {
        if self.is_twelve_hour() {
            let hour = self.hour() % 12;
            if self.pm_flag() {
                hour + 12
            } else {
                hour
            }
        } else {
            self.hour()
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Hours {
    fn format(&self, f: defmt::Formatter) {
        match self.time_representation() {
            TimeRepresentation::TwentyFourHour => {
                defmt::write!(f, "Hours({}h 24h)", self.hour());
            }
            TimeRepresentation::TwelveHour => {
                let is_pm = self.pm_flag();
                defmt::write!(f, "Hours({}h {})", self.hour(), if is_pm { "PM" } else { "AM" });
            }
        }
    }
}

bitfield! {
    /// Day of week register (1-7, 1 = Sunday).
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Day(u8);
    impl Debug;
    /// Day of week (1-7)
    pub day, set_day: 2, 0;
}
from_register_u8!(Day);
bcd_register!(Day);

bitfield! {
    /// Date register (1-31) with BCD encoding.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Date(u8);
    impl Debug;
    /// Tens place of date (0-3)
    pub ten_date, set_ten_date: 5, 4;
    /// Ones place of date (0-9)
    pub date, set_date: 3, 0;
}
from_register_u8!(Date);
bcd_register!(Date);

bitfield! {
    /// Month register (1-12) with century flag and BCD encoding.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Month(u8);
    impl Debug;
    /// Century flag, set by the device when the year rolls over from 99
    pub century, set_century: 7;
    /// Tens place of month (0-1)
    pub ten_month, set_ten_month: 4, 4;
    /// Ones place of month (0-9)
    pub month, set_month: 3, 0;
}
from_register_u8!(Month);
bcd_register!(Month);

bitfield! {
    /// Year register (0-99) with BCD encoding.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Year(u8);
    impl Debug;
    /// Tens place of year (0-9)
    pub ten_year, set_ten_year: 7, 4;
    /// Ones place of year (0-9)
    pub year, set_year: 3, 0;
}
from_register_u8!(Year);
bcd_register!(Year);

bitfield! {
    /// Control register for device configuration.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Control(u8);
    impl Debug;
    /// Oscillator enable/disable control
    pub from into Oscillator, oscillator_enable, set_oscillator_enable: 7, 7;
    /// Enable square wave output on battery power
    pub battery_backed_square_wave, set_battery_backed_square_wave: 6;
    /// Force temperature conversion
    pub convert_temperature, set_convert_temperature: 5;
    /// Square wave output frequency selection
    pub from into SquareWaveFrequency, square_wave_frequency, set_square_wave_frequency: 4, 3;
    /// INT/SQW pin function control
    pub from into InterruptControl, interrupt_control, set_interrupt_control: 2, 2;
    /// Enable alarm 2 interrupt
    pub alarm2_interrupt_enable, set_alarm2_interrupt_enable: 1;
    /// Enable alarm 1 interrupt
    pub alarm1_interrupt_enable, set_alarm1_interrupt_enable: 0;
}
from_register_u8!(Control);

#[cfg(feature = "defmt")]
impl defmt::Format for Control {
    fn format(&self, f: defmt::Formatter) {
        match self.oscillator_enable() {
            Oscillator::Enabled => defmt::write!(f, "Oscillator enabled"),
            Oscillator::Disabled => defmt::write!(f, "Oscillator disabled"),
        }
        match self.interrupt_control() {
            InterruptControl::SquareWave => defmt::write!(f, ", Square wave output"),
            InterruptControl::Interrupt => defmt::write!(f, ", Interrupt output"),
        }
        if self.alarm2_interrupt_enable() {
            defmt::write!(f, ", Alarm 2 interrupt enabled");
        }
        if self.alarm1_interrupt_enable() {
            defmt::write!(f, ", Alarm 1 interrupt enabled");
        }
    }
}

bitfield! {
    /// Status register for device state and flags.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Status(u8);
    impl Debug;
    /// Oscillator stop flag
    pub oscillator_stop_flag, set_oscillator_stop_flag: 7;
    /// Enable 32kHz output
    pub enable_32khz_output, set_enable_32khz_output: 3;
    /// Device busy flag
    pub busy, set_busy: 2;
    /// Alarm 2 triggered flag
    pub alarm2_flag, set_alarm2_flag: 1;
    /// Alarm 1 triggered flag
    pub alarm1_flag, set_alarm1_flag: 0;
}
from_register_u8!(Status);

#[cfg(feature = "defmt")]
impl defmt::Format for Status {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Status(OSF={}, EN32kHz={}, A2F={}, A1F={})",
            self.oscillator_stop_flag(),
            self.enable_32khz_output(),
            self.alarm2_flag(),
            self.alarm1_flag()
        );
    }
}

// Alarm register types. Bit 7 of each is the mask bit: set means the field
// is ignored when the device compares the alarm against the current time.

bitfield! {
    /// Alarm Seconds register with mask bit (only used by Alarm 1).
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct AlarmSeconds(u8);
    impl Debug;
    /// Alarm mask bit 1 (A1M1)
    pub alarm_mask1, set_alarm_mask1: 7;
    /// Seconds register value (BCD)
    pub from into Seconds, seconds, set_seconds: 6, 0;
}
from_register_u8!(AlarmSeconds);

#[cfg(feature = "defmt")]
impl defmt::Format for AlarmSeconds {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "AlarmSeconds({}, masked={})", self.seconds(), self.alarm_mask1());
    }
}

bitfield! {
    /// Alarm Minutes register with mask bit (used by both Alarm 1 and Alarm 2).
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct AlarmMinutes(u8);
    impl Debug;
    /// Alarm mask bit 2 (A1M2/A2M2)
    pub alarm_mask2, set_alarm_mask2: 7;
    /// Minutes register value (BCD)
    pub from into Minutes, minutes, set_minutes: 6, 0;
}
from_register_u8!(AlarmMinutes);

#[cfg(feature = "defmt")]
impl defmt::Format for AlarmMinutes {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "AlarmMinutes({}, masked={})", self.minutes(), self.alarm_mask2());
    }
}

bitfield! {
    /// Alarm Hours register with mask bit (used by both Alarm 1 and Alarm 2).
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct AlarmHours(u8);
    impl Debug;
    /// Alarm mask bit 3 (A1M3/A2M3)
    pub alarm_mask3, set_alarm_mask3: 7;
    /// Hours register value including the 12/24-hour and PM flags
    pub from into Hours, hours, set_hours: 6, 0;
}
from_register_u8!(AlarmHours);

#[cfg(feature = "defmt")]
impl defmt::Format for AlarmHours {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "AlarmHours({}, masked={})", self.hours(), self.alarm_mask3());
    }
}

bitfield! {
    /// Alarm Day/Date register with mask bit and DY/DT control (used by both Alarm 1 and Alarm 2).
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct AlarmDayDate(u8);
    impl Debug;
    /// Alarm mask bit 4 (A1M4/A2M4)
    pub alarm_mask4, set_alarm_mask4: 7;
    /// Day/Date select (1=day of week, 0=date of month)
    pub from into DayDateSelect, day_date_select, set_day_date_select: 6, 6;
    /// Day of week (1-7) when DY/DT=1, or BCD date (1-31) when DY/DT=0
    pub day_or_date, set_day_or_date: 5, 0;
}
from_register_u8!(AlarmDayDate);

#[cfg(feature = "defmt")]
impl defmt::Format for AlarmDayDate {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "AlarmDayDate({} {}, masked={})",
            self.day_date_select(),
            self.day_or_date(),
            self.alarm_mask4()
        );
    }
}
