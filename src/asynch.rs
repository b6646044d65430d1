//! Async implementation of the DS3231 driver.
//!
//! Same operations as the blocking [`crate::DS3231`], over the
//! `embedded-hal-async` I2C traits. Only available with the `async` feature.
//!
//! # Example
//!
//! ```rust,ignore
//! use ds3231_clock::asynch::DS3231;
//! use ds3231_clock::{AlarmType, Alarms, DEFAULT_ADDRESS};
//!
//! let mut rtc = DS3231::new(i2c, DEFAULT_ADDRESS);
//! rtc.configure(&config).await?;
//!
//! let mut alarm = rtc.datetime().await?;
//! alarm.add_seconds(60);
//! rtc.set_alarm(&alarm, AlarmType::Alarm1AtTime).await?;
//! rtc.enable_alarm_interrupt(Alarms::ALARM1, true).await?;
//! ```

use chrono::NaiveDateTime;
use embedded_hal_async::i2c::I2c;
use paste::paste;

use crate::{
    apply_32khz_output, apply_alarm_enable, apply_config, decode_alarm, encode_alarm, fired_alarms,
    record_from_registers, AlarmChannel, AlarmDayDate, AlarmHours, AlarmMinutes, AlarmSeconds,
    AlarmTime, AlarmType, Alarms, Config, Control, DS3231Error, Date, Day, Hours, Minutes, Month,
    RegAddr, Seconds, Status, TimeRecord, TimeRepresentation, Year, RECORD_LEN,
};

/// DS3231 Real-Time Clock async driver.
pub struct DS3231<I2C: I2c> {
    i2c: I2C,
    address: u8,
    time_representation: TimeRepresentation,
}

impl<I2C: I2c> DS3231<I2C> {
    /// Creates a new DS3231 async driver instance.
    ///
    /// # Arguments
    /// * `i2c` - The async I2C bus implementation
    /// * `address` - The I2C address of the device (normally [`crate::DEFAULT_ADDRESS`])
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

    /// Applies `config` to the control register and converts the clock's
    /// hours register to the configured representation.
    pub async fn configure(&mut self, config: &Config) -> Result<(), DS3231Error<I2C::Error>> {
        debug!("DS3231: reading control register");
        let control = apply_config(self.control().await?, config);
        debug!("DS3231: writing control: {}", u8::from(control));
        self.set_control(control).await?;

        let hours = self
            .hour()
            .await?
            .to_representation(config.time_representation);
        self.set_hour(hours).await?;
        self.time_representation = config.time_representation;
        Ok(())
    }

    async fn read_registers(&mut self, start: RegAddr, data: &mut [u8]) -> Result<(), I2C::Error> {
        self.i2c.write_read(self.address, &[start as u8], data).await
    }

    // data is at most one time record long
    async fn write_registers(&mut self, start: RegAddr, data: &[u8]) -> Result<(), I2C::Error> {
        let mut buf = [0u8; RECORD_LEN + 1];
        buf[0] = start as u8;
        buf[1..=data.len()].copy_from_slice(data);
        self.i2c.write(self.address, &buf[..=data.len()]).await
    }

    /// Reads the current time record.
    pub async fn datetime(&mut self) -> Result<TimeRecord, DS3231Error<I2C::Error>> {
        let mut data = [0; RECORD_LEN];
        self.read_registers(RegAddr::Seconds, &mut data).await?;
        Ok(record_from_registers(data))
    }

    /// Writes all 7 time registers in one transaction.
    pub async fn set_datetime(
        &mut self,
        record: &TimeRecord,
    ) -> Result<(), DS3231Error<I2C::Error>> {
        let data: [u8; RECORD_LEN] = record.into();
        self.write_registers(RegAddr::Seconds, &data).await?;
        Ok(())
    }

    /// Reads the current time as a chrono date and time.
    pub async fn naive_datetime(&mut self) -> Result<NaiveDateTime, DS3231Error<I2C::Error>> {
        self.datetime()
            .await?
            .into_datetime()
            .map_err(DS3231Error::DateTime)
    }

    /// Sets the time from a chrono date and time, using the configured time
    /// representation.
    pub async fn set_naive_datetime(
        &mut self,
        datetime: &NaiveDateTime,
    ) -> Result<(), DS3231Error<I2C::Error>> {
        let record = TimeRecord::from_datetime(datetime, self.time_representation)
            .map_err(DS3231Error::DateTime)?;
        self.set_datetime(&record).await
    }

    /// Programs an alarm channel from the fields of `record`.
    pub async fn set_alarm(
        &mut self,
        record: &TimeRecord,
        alarm: AlarmType,
    ) -> Result<(), DS3231Error<I2C::Error>> {
        let encoded = encode_alarm(record, alarm);
        self.write_registers(encoded.start_register(), encoded.as_bytes())
            .await?;
        Ok(())
    }

    /// Reads back the seconds, minutes and hours of an alarm channel.
    pub async fn alarm_time(
        &mut self,
        channel: AlarmChannel,
    ) -> Result<AlarmTime, DS3231Error<I2C::Error>> {
        let mut data = [0u8; 3];
        let data = &mut data[..channel.time_register_count()];
        self.read_registers(channel.start_register(), data).await?;
        decode_alarm(channel, data).map_err(DS3231Error::Alarm)
    }

    /// Enables or disables the interrupt of one or both alarms and switches
    /// the INT/SQW pin to interrupt output.
    pub async fn enable_alarm_interrupt(
        &mut self,
        alarms: Alarms,
        enable: bool,
    ) -> Result<(), DS3231Error<I2C::Error>> {
        let control = apply_alarm_enable(self.control().await?, alarms, enable);
        debug!("DS3231: writing control: {}", u8::from(control));
        self.set_control(control).await
    }

    /// Clears the fired flags of both alarms.
    pub async fn clear_alarms(&mut self) -> Result<(), DS3231Error<I2C::Error>> {
        let mut status = self.status().await?;
        status.set_alarm1_flag(false);
        status.set_alarm2_flag(false);
        self.set_status(status).await
    }

    /// Returns the alarms that have fired and have their interrupt enabled.
    pub async fn alarms(&mut self) -> Result<Alarms, DS3231Error<I2C::Error>> {
        let status = self.status().await?;
        let control = self.control().await?;
        Ok(fired_alarms(control, status))
    }

    /// Enables or disables the 32kHz output pin without touching the
    /// write-to-clear flags.
    pub async fn enable_32khz_output(
        &mut self,
        enable: bool,
    ) -> Result<(), DS3231Error<I2C::Error>> {
        let status = apply_32khz_output(self.status().await?, enable);
        self.set_status(status).await
    }
}

macro_rules! impl_register_access {
    ($(($name:ident, $regaddr:expr, $typ:ident)),+) => {
        impl<I2C: I2c> DS3231<I2C> {
            $(
                paste! {
                    #[doc = concat!("Gets the value of the ", stringify!($name), " register.")]
                    pub async fn $name(&mut self) -> Result<$typ, DS3231Error<I2C::Error>> {
                        let mut data = [0];
                        self.read_registers($regaddr, &mut data).await?;
                        Ok($typ::from(data[0]))
                    }

                    #[doc = concat!("Sets the value of the ", stringify!($name), " register.")]
                    pub async fn [<set_ $name>](&mut self, value: $typ) -> Result<(), DS3231Error<I2C::Error>> {
                        self.write_registers($regaddr, &[value.into()]).await?;
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

#[cfg(test)]
mod tests {
    extern crate alloc;
    use super::*;
    use crate::{InterruptControl, Oscillator, SquareWaveFrequency};
    use alloc::vec;
    use chrono::{Datelike, NaiveDate, Timelike};
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};

    const DEVICE_ADDRESS: u8 = 0x68;

    fn setup(expectations: &[I2cTrans]) -> DS3231<I2cMock> {
        DS3231::new(I2cMock::new(expectations), DEVICE_ADDRESS)
    }

    #[tokio::test]
    async fn test_async_configure_square_wave() {
        let config = Config {
            time_representation: TimeRepresentation::TwentyFourHour,
            square_wave_frequency: SquareWaveFrequency::Hz4096,
            interrupt_control: InterruptControl::SquareWave,
            battery_backed_square_wave: true,
            oscillator_enable: Oscillator::Enabled,
        };
        let mut dev = setup(&[
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Control as u8], vec![0x1C]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Control as u8, 0x50]),
            // 9 PM
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Hours as u8], vec![0x69]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Hours as u8, 0x21]),
        ]);

        dev.configure(&config).await.unwrap();
        dev.i2c.done();
    }

    #[tokio::test]
    async fn test_async_read_datetime() {
        let mut dev = setup(&[I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![RegAddr::Seconds as u8],
            vec![0x00, 0x30, 0x15, 0x05, 0x14, 0x83, 0x24],
        )]);

        let record = dev.datetime().await.unwrap();
        assert_eq!(record.time_to_string().as_str(), "15:30:00");
        assert_eq!(record.date_to_string().as_str(), "03/14/24");
        dev.i2c.done();
    }

    #[tokio::test]
    async fn test_async_naive_datetime_round_trip() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 14)
            .unwrap()
            .and_hms_opt(15, 30, 0)
            .unwrap();
        // Thursday
        let day = 0x05;
        let mut dev = setup(&[
            I2cTrans::write(
                DEVICE_ADDRESS,
                vec![RegAddr::Seconds as u8, 0x00, 0x30, 0x15, day, 0x14, 0x03, 0x24],
            ),
            I2cTrans::write_read(
                DEVICE_ADDRESS,
                vec![RegAddr::Seconds as u8],
                vec![0x00, 0x30, 0x15, day, 0x14, 0x03, 0x24],
            ),
        ]);

        dev.set_naive_datetime(&dt).await.unwrap();
        let read = dev.naive_datetime().await.unwrap();
        assert_eq!(read.hour(), 15);
        assert_eq!(read.day(), 14);
        assert_eq!(read, dt);
        dev.i2c.done();
    }

    #[tokio::test]
    async fn test_async_set_alarm_on_day() {
        let record = crate::parse::parse_time("7:30:00A").unwrap();
        let mut record = record.with_date(3, 14, 24);
        record.set_day(Day::from_decimal(2));
        let mut dev = setup(&[I2cTrans::write(
            DEVICE_ADDRESS,
            vec![RegAddr::Alarm2Minutes as u8, 0x30, 0x47, 0x42],
        )]);

        dev.set_alarm(&record, AlarmType::Alarm2AtTimeOnDay)
            .await
            .unwrap();
        dev.i2c.done();
    }

    #[tokio::test]
    async fn test_async_alarm_time() {
        let mut dev = setup(&[I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![RegAddr::Alarm1Seconds as u8],
            vec![0x80, 0x15, 0xE7],
        )]);

        let alarm = dev.alarm_time(AlarmChannel::Alarm1).await.unwrap();
        assert_eq!(alarm.time.time_to_string().as_str(), "07:15:00 PM");
        assert!(!alarm.matches.seconds);
        assert!(alarm.matches.minutes);
        assert!(!alarm.matches.hours);
        dev.i2c.done();
    }

    #[tokio::test]
    async fn test_async_alarm_interrupts() {
        let mut dev = setup(&[
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Control as u8], vec![0x00]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Control as u8, 0x07]),
            I2cTrans::write_read(
                DEVICE_ADDRESS,
                vec![RegAddr::ControlStatus as u8],
                vec![0x01],
            ),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Control as u8], vec![0x07]),
            I2cTrans::write_read(
                DEVICE_ADDRESS,
                vec![RegAddr::ControlStatus as u8],
                vec![0x01],
            ),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8, 0x00]),
        ]);

        dev.enable_alarm_interrupt(Alarms::BOTH, true).await.unwrap();
        assert_eq!(dev.alarms().await.unwrap(), Alarms::ALARM1);
        dev.clear_alarms().await.unwrap();
        dev.i2c.done();
    }

    #[tokio::test]
    async fn test_async_enable_32khz_output() {
        let mut dev = setup(&[
            I2cTrans::write_read(
                DEVICE_ADDRESS,
                vec![RegAddr::ControlStatus as u8],
                vec![0x08],
            ),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8, 0x83]),
        ]);

        dev.enable_32khz_output(false).await.unwrap();
        dev.i2c.done();
    }

    #[tokio::test]
    async fn test_async_register_operations() {
        let mut dev = setup(&[
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Seconds as u8], vec![0x45]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Seconds as u8, 0x30]),
            I2cTrans::write_read(
                DEVICE_ADDRESS,
                vec![RegAddr::Alarm1DayDate as u8],
                vec![0xC3],
            ),
        ]);

        let seconds = dev.second().await.unwrap();
        assert_eq!(seconds.decimal(), 45);
        dev.set_second(Seconds::from_decimal(30)).await.unwrap();

        let day_date = dev.alarm1_day_date().await.unwrap();
        assert!(day_date.alarm_mask4());
        assert_eq!(day_date.day_or_date(), 3);
        dev.i2c.done();
    }

    #[tokio::test]
    async fn test_async_transport_error() {
        let mut dev = setup(&[I2cTrans::write(
            DEVICE_ADDRESS,
            vec![RegAddr::Alarm2Minutes as u8, 0x00, 0x00, 0x80],
        )
        .with_error(ErrorKind::Other)]);

        let result = dev
            .set_alarm(&TimeRecord::default(), AlarmType::Alarm2AtTime)
            .await;
        assert!(matches!(result, Err(DS3231Error::I2c(ErrorKind::Other))));
        dev.i2c.done();
    }
}
