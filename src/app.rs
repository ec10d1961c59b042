//! Application lifecycle: window setup, event dispatch and teardown.

use crate::config::Config;
use crate::driver::WatchFace;
use crate::error::FaceError;
use crate::events::{BatteryMonitor, Event, Subscriptions, TimeUnit};
use crate::platform::{BatterySource, ClockSource, Color, Surface};

/// A watch face bound to its platform.
#[derive(Debug)]
pub struct App<C, B, S> {
    clock: C,
    battery: B,
    surface: S,
    face: WatchFace,
    subscriptions: Subscriptions,
}

impl<C, B, S> App<C, B, S>
where
    C: ClockSource,
    B: BatterySource,
    S: Surface,
{
    pub fn new(config: &Config, clock: C, battery: B, surface: S) -> Self {
        Self {
            clock,
            battery,
            surface,
            face: WatchFace::new(config.face.variant),
            subscriptions: Subscriptions::new(),
        }
    }

    /// Show the window, load the face and register for events.
    pub fn init(&mut self) -> Result<(), FaceError> {
        self.surface.set_background(Color::White);
        self.surface.push();
        self.face
            .load(&mut self.surface, &self.clock, &self.battery)?;

        self.subscriptions.subscribe_tick(TimeUnit::Minute);
        if self.face.variant().caches_battery() {
            self.subscriptions.subscribe_battery();
        }
        Ok(())
    }

    /// Deliver one event. Returns false if nothing was subscribed to it.
    pub fn handle(&mut self, event: Event) -> Result<bool, FaceError> {
        if !self.subscriptions.accepts(&event) {
            log::trace!("Dropped unsubscribed event {:?}", event);
            return Ok(false);
        }
        match event {
            Event::Tick(_) => self
                .face
                .tick(&mut self.surface, &self.clock, &self.battery)?,
            Event::BatteryChanged(reading) => {
                self.face.battery_changed(&mut self.surface, reading)?
            }
        }
        Ok(true)
    }

    /// Unregister every handler, then release the face's resources.
    pub fn deinit(&mut self) -> Result<(), FaceError> {
        self.subscriptions.unsubscribe_battery();
        self.subscriptions.unsubscribe_tick();
        self.face.unload(&mut self.surface)
    }

    /// Change detector seeded with the level the face last rendered, so a
    /// change between `init` and the first poll still produces an event.
    pub fn battery_monitor(&self) -> BatteryMonitor {
        let baseline = self
            .face
            .cached_battery()
            .unwrap_or_else(|| self.battery.peek());
        BatteryMonitor::new(baseline)
    }

    pub fn face(&self) -> &WatchFace {
        &self.face
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn battery(&self) -> &B {
        &self.battery
    }

    pub fn subscriptions(&self) -> &Subscriptions {
        &self.subscriptions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Variant;
    use crate::platform::{FixedBattery, FixedClock, SysfsBattery};
    use crate::screen::Screen;
    use crate::{BatteryReading, ClockReading};
    use chrono::{TimeZone, Utc};

    fn app(variant: Variant) -> App<FixedClock, FixedBattery, Screen> {
        let mut config = Config::default();
        config.face.variant = variant;
        let time = Utc.with_ymd_and_hms(2024, 6, 15, 23, 10, 0).unwrap();
        let clock = FixedClock {
            reading: ClockReading::from_datetime(&time),
            is_24h: true,
        };
        App::new(&config, clock, FixedBattery(BatteryReading::new(57)), Screen::new(144, 168))
    }

    #[test]
    fn test_init_shows_window_and_subscribes() {
        let mut app = app(Variant::HourBand);
        app.init().unwrap();
        assert!(app.surface().is_visible());
        assert_eq!(app.surface().background(), Color::White);
        assert_eq!(app.subscriptions().tick_unit(), Some(TimeUnit::Minute));
        assert!(app.subscriptions().battery_subscribed());
    }

    #[test]
    fn test_sampling_faces_skip_battery_events() {
        let mut app = app(Variant::Rotation);
        app.init().unwrap();
        assert!(!app.subscriptions().battery_subscribed());
        let handled = app
            .handle(Event::BatteryChanged(BatteryReading::new(3)))
            .unwrap();
        assert!(!handled);
    }

    #[test]
    fn test_events_dispatch_to_face() {
        let mut app = app(Variant::HourBand);
        app.init().unwrap();
        assert!(app.handle(Event::Tick(TimeUnit::Minute)).unwrap());
        assert!(!app.handle(Event::Tick(TimeUnit::Second)).unwrap());
        assert!(app
            .handle(Event::BatteryChanged(BatteryReading::new(12)))
            .unwrap());
        let secondary = app.face().regions()[1];
        assert_eq!(app.surface().text(secondary), Some("Battery:12%"));
    }

    #[test]
    fn test_battery_monitor_starts_from_rendered_level() {
        let dir = tempfile::TempDir::new().unwrap();
        let capacity = dir.path().join("capacity");
        std::fs::write(&capacity, "57\n").unwrap();

        let time = Utc.with_ymd_and_hms(2024, 6, 15, 23, 10, 0).unwrap();
        let clock = FixedClock {
            reading: ClockReading::from_datetime(&time),
            is_24h: true,
        };
        let battery = SysfsBattery::with_capacity_file(Some(capacity.clone()));
        let mut app = App::new(&Config::default(), clock, battery, Screen::new(144, 168));
        app.init().unwrap();

        // Level moves after load but before the poll loop starts
        std::fs::write(&capacity, "40\n").unwrap();
        let mut monitor = app.battery_monitor();
        let event = monitor.observe(app.battery().peek()).unwrap();
        assert_eq!(event, Event::BatteryChanged(BatteryReading::new(40)));

        app.handle(event).unwrap();
        let secondary = app.face().regions()[1];
        assert_eq!(app.surface().text(secondary), Some("Battery:40%"));
    }

    #[test]
    fn test_no_events_after_deinit() {
        let mut app = app(Variant::HourBand);
        app.init().unwrap();
        app.deinit().unwrap();

        assert!(app.subscriptions().is_empty());
        assert!(!app.handle(Event::Tick(TimeUnit::Minute)).unwrap());
        assert!(!app
            .handle(Event::BatteryChanged(BatteryReading::new(12)))
            .unwrap());
        assert_eq!(app.surface().live_regions(), 0);
        assert_eq!(app.surface().loaded_fonts(), 0);
    }
}
