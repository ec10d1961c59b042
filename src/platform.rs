//! # Platform Capabilities
//!
//! The face never talks to hardware directly. It reads the clock and battery
//! through [`ClockSource`] and [`BatterySource`] and draws through a
//! [`Surface`]: a root window that owns fonts and text regions.
//!
//! Host implementations live here too:
//! - [`SystemClock`]: chrono's local time, with the 12h/24h preference taken from
//!   config or, when deferred to the platform, from the `LC_TIME`/`LANG` locale
//! - [`SysfsBattery`]: Linux `/sys/class/power_supply/*/capacity`
//! - [`FixedClock`] / [`FixedBattery`]: constant sources for tests and demos
//!
//! The drawing surface for the host is [`crate::screen::Screen`].

use crate::config::ClockStyle;
use crate::error::FaceError;
use crate::layout::Rect;
use crate::{BatteryReading, ClockReading};
use chrono::Local;
use std::cell::Cell;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Wall-clock time and the user's hour notation.
pub trait ClockSource {
    fn now(&self) -> ClockReading;

    /// Queried on every tick; the preference may change while the face runs.
    fn is_24h_style(&self) -> bool;
}

/// Battery level on demand.
pub trait BatterySource {
    fn peek(&self) -> BatteryReading;
}

/// Fonts the face knows how to ask for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontId {
    /// Tall condensed digits for the time
    Large,
    /// Small text for secondary lines
    Small,
}

/// A loaded font, valid until unloaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontHandle(pub u32);

/// A text region attached to the root window, valid until destroyed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Black,
    White,
    Clear,
}

/// Static styling applied when a region is created. Text is always
/// horizontally centered in the region's frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegionStyle {
    pub font: FontHandle,
    /// `Clear` text is not drawn
    pub text_color: Color,
    pub background: Color,
}

impl RegionStyle {
    /// Black centered text on a clear background.
    pub fn centered(font: FontHandle) -> Self {
        Self {
            font,
            text_color: Color::Black,
            background: Color::Clear,
        }
    }
}

/// The root window and its child text regions.
pub trait Surface {
    /// Size of the root layer.
    fn bounds(&self) -> Rect;

    fn set_background(&mut self, color: Color);

    /// Make the window visible.
    fn push(&mut self);

    fn load_font(&mut self, font: FontId) -> Result<FontHandle, FaceError>;

    fn unload_font(&mut self, handle: FontHandle) -> Result<(), FaceError>;

    /// Create a region with a zero frame and attach it to the root layer.
    fn create_region(&mut self, style: RegionStyle) -> Result<RegionId, FaceError>;

    fn set_text(&mut self, region: RegionId, text: &str) -> Result<(), FaceError>;

    fn set_frame(&mut self, region: RegionId, frame: Rect) -> Result<(), FaceError>;

    fn destroy_region(&mut self, region: RegionId) -> Result<(), FaceError>;
}

/// Local time from the operating system.
#[derive(Debug, Clone)]
pub struct SystemClock {
    style: ClockStyle,
}

impl SystemClock {
    pub fn new(style: ClockStyle) -> Self {
        Self { style }
    }
}

impl ClockSource for SystemClock {
    fn now(&self) -> ClockReading {
        ClockReading::from_datetime(&Local::now())
    }

    fn is_24h_style(&self) -> bool {
        match self.style {
            ClockStyle::TwentyFourHour => true,
            ClockStyle::TwelveHour => false,
            ClockStyle::Platform => {
                let locale = env::var("LC_TIME")
                    .or_else(|_| env::var("LANG"))
                    .unwrap_or_default();
                locale_prefers_24h(&locale)
            }
        }
    }
}

/// Locales whose conventional clock is 12-hour
const TWELVE_HOUR_LOCALES: [&str; 8] = [
    "en_US", "en_AU", "en_CA", "en_NZ", "en_PH", "en_IN", "es_MX", "ar_EG",
];

fn locale_prefers_24h(locale: &str) -> bool {
    !TWELVE_HOUR_LOCALES
        .iter()
        .any(|prefix| locale.starts_with(prefix))
}

/// A clock frozen at one reading.
#[derive(Debug, Clone)]
pub struct FixedClock {
    pub reading: ClockReading,
    pub is_24h: bool,
}

impl ClockSource for FixedClock {
    fn now(&self) -> ClockReading {
        self.reading
    }

    fn is_24h_style(&self) -> bool {
        self.is_24h
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedBattery(pub BatteryReading);

impl BatterySource for FixedBattery {
    fn peek(&self) -> BatteryReading {
        self.0
    }
}

/// Sysfs power-supply directory on Linux
const POWER_SUPPLY_DIR: &str = "/sys/class/power_supply";

/// Battery level read from sysfs.
///
/// A failed read keeps reporting the last good value (initially 100%), since a
/// watch face has nothing better to show.
#[derive(Debug)]
pub struct SysfsBattery {
    capacity_file: Option<PathBuf>,
    last: Cell<BatteryReading>,
}

impl SysfsBattery {
    /// Find the first supply of type `Battery`.
    pub fn discover() -> Self {
        Self::discover_in(POWER_SUPPLY_DIR)
    }

    pub fn discover_in<P: AsRef<Path>>(dir: P) -> Self {
        let capacity_file = fs::read_dir(dir.as_ref()).ok().and_then(|entries| {
            entries.flatten().map(|entry| entry.path()).find(|supply| {
                fs::read_to_string(supply.join("type"))
                    .map(|kind| kind.trim() == "Battery")
                    .unwrap_or(false)
            })
        });
        match &capacity_file {
            Some(supply) => log::info!("Reading battery level from {}", supply.display()),
            None => log::warn!("No battery found under {}, reporting 100%", dir.as_ref().display()),
        }
        Self::with_capacity_file(capacity_file.map(|supply| supply.join("capacity")))
    }

    pub fn with_capacity_file(capacity_file: Option<PathBuf>) -> Self {
        Self {
            capacity_file,
            last: Cell::new(BatteryReading::new(100)),
        }
    }

    fn read(&self) -> Option<BatteryReading> {
        let path = self.capacity_file.as_ref()?;
        let raw = fs::read_to_string(path).ok()?;
        let percent = raw.trim().parse::<u8>().ok()?;
        Some(BatteryReading::new(percent))
    }
}

impl BatterySource for SysfsBattery {
    fn peek(&self) -> BatteryReading {
        match self.read() {
            Some(reading) => {
                self.last.set(reading);
                reading
            }
            None => self.last.get(),
        }
    }
}
