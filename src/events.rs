//! # Event Subscriptions
//!
//! The face reacts to two kinds of events: the minute tick and, for faces that
//! cache the battery text, a battery-change notification. Handlers are
//! registered in a [`Subscriptions`] registry at startup and removed at
//! teardown. The event loop asks the registry before delivering anything, so
//! nothing reaches the face after it has unsubscribed.

use crate::BatteryReading;
use chrono::{DateTime, TimeZone, Timelike};
use std::time::Duration;

/// Tick granularity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeUnit {
    Second,
    Minute,
}

/// Something the event loop can deliver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// A whole `TimeUnit` boundary passed
    Tick(TimeUnit),
    /// The charge level changed
    BatteryChanged(BatteryReading),
}

/// What the face is currently listening to.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Subscriptions {
    tick: Option<TimeUnit>,
    battery: bool,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe_tick(&mut self, unit: TimeUnit) {
        log::debug!("Subscribed to {:?} ticks", unit);
        self.tick = Some(unit);
    }

    pub fn unsubscribe_tick(&mut self) {
        self.tick = None;
    }

    pub fn subscribe_battery(&mut self) {
        log::debug!("Subscribed to battery changes");
        self.battery = true;
    }

    pub fn unsubscribe_battery(&mut self) {
        self.battery = false;
    }

    pub fn tick_unit(&self) -> Option<TimeUnit> {
        self.tick
    }

    pub fn battery_subscribed(&self) -> bool {
        self.battery
    }

    /// True if a handler is registered for this event.
    pub fn accepts(&self, event: &Event) -> bool {
        match event {
            Event::Tick(unit) => self.tick == Some(*unit),
            Event::BatteryChanged(_) => self.battery,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tick.is_none() && !self.battery
    }
}

/// Turns periodic battery samples into change events.
#[derive(Debug, Clone)]
pub struct BatteryMonitor {
    last: BatteryReading,
}

impl BatteryMonitor {
    pub fn new(initial: BatteryReading) -> Self {
        Self { last: initial }
    }

    /// Record a sample; returns an event only when the level moved.
    pub fn observe(&mut self, reading: BatteryReading) -> Option<Event> {
        if reading == self.last {
            return None;
        }
        log::debug!(
            "Battery changed: {}% -> {}%",
            self.last.charge_percent,
            reading.charge_percent
        );
        self.last = reading;
        Some(Event::BatteryChanged(reading))
    }
}

/// Time left until the next boundary of `unit`.
pub fn until_next_boundary<Tz: TimeZone>(now: &DateTime<Tz>, unit: TimeUnit) -> Duration {
    let nanos_into_second = u64::from(now.nanosecond().min(999_999_999));
    let into_unit = match unit {
        TimeUnit::Second => nanos_into_second,
        TimeUnit::Minute => u64::from(now.second()) * 1_000_000_000 + nanos_into_second,
    };
    let unit_nanos = match unit {
        TimeUnit::Second => 1_000_000_000,
        TimeUnit::Minute => 60_000_000_000,
    };
    Duration::from_nanos(unit_nanos - into_unit)
}
