//! # Display Text Formatting
//!
//! Turns clock and battery readings into the strings shown on the face. All
//! output lands in [`TextBuffer`]s, so an oversized value is cut short instead of
//! overflowing its region.
//!
//! Capacities follow the longest value each field can take:
//! - time: `12:34` (5) with headroom
//! - battery: `Battery:100%` (12)
//! - date: `2024 Sep 30` (11); weekday: `Wednesday` (9)
//! - scatter line: time, weekday, date and battery joined with spaces (30)

use crate::config::Variant;
use crate::text::TextBuffer;
use crate::{BatteryReading, ClockReading, DisplayPhase};

pub const TIME_CAPACITY: usize = 8;
pub const BATTERY_CAPACITY: usize = 16;
pub const DATE_CAPACITY: usize = 20;
pub const WEEKDAY_CAPACITY: usize = 20;
pub const LINE_CAPACITY: usize = 70;

pub type TimeText = TextBuffer<TIME_CAPACITY>;
pub type BatteryText = TextBuffer<BATTERY_CAPACITY>;
pub type DateText = TextBuffer<DATE_CAPACITY>;
pub type WeekdayText = TextBuffer<WEEKDAY_CAPACITY>;
pub type LineText = TextBuffer<LINE_CAPACITY>;

/// Number of lines on the scatter face
pub const SCATTER_LINES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStyle {
    /// `2024 Jun 15`
    YearMonthDay,
    /// `Jun 15`
    MonthDay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryStyle {
    /// `Battery:57%`
    Labeled,
    /// `57%`
    Bare,
}

/// Formatting rules for one face variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Formatter {
    pub date_style: DateStyle,
    pub battery_style: BatteryStyle,
}

impl Formatter {
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::HourBand | Variant::Rotation => Self {
                date_style: DateStyle::YearMonthDay,
                battery_style: BatteryStyle::Labeled,
            },
            Variant::Scatter => Self {
                date_style: DateStyle::MonthDay,
                battery_style: BatteryStyle::Bare,
            },
        }
    }

    /// `HH:MM` in 24-hour style, `hh:MM` otherwise.
    pub fn time(&self, reading: &ClockReading, is_24h: bool) -> TimeText {
        let pattern = if is_24h { "%H:%M" } else { "%I:%M" };
        TextBuffer::from_fmt(format_args!("{}", reading.local.format(pattern)))
    }

    pub fn date(&self, reading: &ClockReading) -> DateText {
        let pattern = match self.date_style {
            DateStyle::YearMonthDay => "%Y %b %d",
            DateStyle::MonthDay => "%b %d",
        };
        TextBuffer::from_fmt(format_args!("{}", reading.local.format(pattern)))
    }

    /// Full weekday name.
    pub fn weekday(&self, reading: &ClockReading) -> WeekdayText {
        TextBuffer::from_fmt(format_args!("{}", reading.local.format("%A")))
    }

    pub fn battery(&self, battery: &BatteryReading) -> BatteryText {
        match self.battery_style {
            BatteryStyle::Labeled => {
                TextBuffer::from_fmt(format_args!("Battery:{}%", battery.charge_percent))
            }
            BatteryStyle::Bare => TextBuffer::from_fmt(format_args!("{}%", battery.charge_percent)),
        }
    }

    /// Text for the secondary region in a given phase.
    ///
    /// The battery text is passed in already formatted so that a face caching it
    /// between battery events and a face sampling it every tick share this path.
    pub fn secondary(
        &self,
        phase: DisplayPhase,
        reading: &ClockReading,
        battery_text: &BatteryText,
        is_24h: bool,
    ) -> LineText {
        match phase {
            DisplayPhase::TimeOnly => {
                TextBuffer::from_fmt(format_args!("{}", self.time(reading, is_24h)))
            }
            DisplayPhase::Date => TextBuffer::from_fmt(format_args!("{}", self.date(reading))),
            DisplayPhase::Weekday => {
                TextBuffer::from_fmt(format_args!("{}", self.weekday(reading)))
            }
            DisplayPhase::Battery => TextBuffer::from_fmt(format_args!("{}", battery_text)),
        }
    }

    /// The four scatter lines: every rotation of `[time, weekday, date, battery]`.
    pub fn scatter_lines(
        &self,
        reading: &ClockReading,
        battery: &BatteryReading,
        is_24h: bool,
    ) -> [LineText; SCATTER_LINES] {
        let time = self.time(reading, is_24h);
        let weekday = self.weekday(reading);
        let date = self.date(reading);
        let battery = self.battery(battery);
        let fields: [&str; SCATTER_LINES] = [
            time.as_str(),
            weekday.as_str(),
            date.as_str(),
            battery.as_str(),
        ];

        std::array::from_fn(|line| {
            TextBuffer::from_fmt(format_args!(
                "{} {} {} {}",
                fields[line % SCATTER_LINES],
                fields[(line + 1) % SCATTER_LINES],
                fields[(line + 2) % SCATTER_LINES],
                fields[(line + 3) % SCATTER_LINES],
            ))
        })
    }
}
