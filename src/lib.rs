//! # Silicon Sampler Core Library
//!
//! This library provides the data structures and the refresh logic for a minimal
//! watch face: the current time in a large region, plus one piece of secondary
//! information (date, weekday or battery level) chosen anew every minute.
//!
//! ## Design Philosophy
//!
//! ### Snapshots, not state
//! - **Clock readings** are taken once per tick and never mutated
//! - **Battery readings** are clamped to 0-100 on construction
//! - **Rendered strings** live in fixed-capacity buffers owned by the face and are
//!   rebuilt every tick
//!
//! ### Variants
//! Three faces share one code path:
//! - **Hour band** (A): date around commute and evening hours, battery at night,
//!   rotation during the rest of the day
//! - **Rotation** (B): date, weekday and battery in strict minute rotation
//! - **Scatter** (C): every field at once in four overlapping lines whose vertical
//!   positions are reshuffled every minute
//!
//! ### Data Flow
//! 1. **Tick**: the event loop wakes on a whole-minute boundary
//! 2. **Select**: [`phase`] maps the clock reading to a [`DisplayPhase`]
//! 3. **Format**: [`format`] turns the phase into text buffers
//! 4. **Push**: [`driver`] writes the text into the regions of a [`platform::Surface`]
//!
//! ## Core Types
//!
//! - [`ClockReading`]: local wall-clock snapshot with its epoch seconds
//! - [`BatteryReading`]: battery charge percentage
//! - [`DisplayPhase`]: which secondary content a minute shows

use chrono::{DateTime, Datelike, NaiveDateTime, TimeZone, Timelike, Weekday};
use serde::{Deserialize, Serialize};

// Module declarations
pub mod app;
pub mod config;
pub mod driver;
pub mod error;
pub mod events;
pub mod format;
pub mod layout;
pub mod phase;
pub mod platform;
pub mod screen;
pub mod text;

pub use error::FaceError;

/// An immutable wall-clock snapshot.
///
/// `local` is the calendar decomposition in the user's time zone; `epoch_seconds`
/// is the matching UNIX timestamp. The rotation policy keys off the latter so
/// that it keeps rotating across time zone changes.
///
/// # Example
/// ```
/// use chrono::{TimeZone, Utc};
/// use sampler_face_lib::ClockReading;
///
/// let now = Utc.with_ymd_and_hms(2024, 6, 15, 14, 32, 0).unwrap();
/// let reading = ClockReading::from_datetime(&now);
///
/// assert_eq!(reading.hour(), 14);
/// assert_eq!(reading.minute(), 32);
/// assert_eq!(reading.epoch_seconds, 1_718_461_920);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockReading {
    /// Local calendar date and time
    pub local: NaiveDateTime,
    /// Seconds since the UNIX epoch
    pub epoch_seconds: i64,
}

impl ClockReading {
    /// Snapshot any zoned time.
    pub fn from_datetime<Tz: TimeZone>(time: &DateTime<Tz>) -> Self {
        Self {
            local: time.naive_local(),
            epoch_seconds: time.timestamp(),
        }
    }

    /// Hour of day, 0-23.
    pub fn hour(&self) -> u32 {
        self.local.hour()
    }

    /// Minute of hour, 0-59.
    pub fn minute(&self) -> u32 {
        self.local.minute()
    }

    pub fn weekday(&self) -> Weekday {
        self.local.weekday()
    }

    /// Whole minutes since the UNIX epoch.
    pub fn epoch_minutes(&self) -> i64 {
        self.epoch_seconds.div_euclid(60)
    }
}

/// Battery charge snapshot.
///
/// # Example
/// ```
/// use sampler_face_lib::BatteryReading;
///
/// assert_eq!(BatteryReading::new(57).charge_percent, 57);
/// assert_eq!(BatteryReading::new(140).charge_percent, 100);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatteryReading {
    /// Charge in percent (0-100)
    pub charge_percent: u8,
}

impl BatteryReading {
    pub fn new(charge_percent: u8) -> Self {
        Self {
            charge_percent: charge_percent.min(100),
        }
    }
}

/// The category of secondary information shown during a minute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayPhase {
    /// Nothing beyond the time itself
    TimeOnly,
    Date,
    Weekday,
    Battery,
}
