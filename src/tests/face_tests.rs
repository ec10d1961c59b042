//! # End-to-End Watch Face Tests
//!
//! Drives complete apps through init, a day of minute ticks and teardown on
//! the host screen, checking what ends up in each region and on the pixels.

use chrono::{DateTime, Duration, TimeZone, Utc};
use sampler_face_lib::{
    app::App,
    config::{Config, Variant},
    events::{BatteryMonitor, Event, TimeUnit},
    layout::Rect,
    platform::{FixedBattery, FixedClock},
    screen::Screen,
    BatteryReading, ClockReading, DisplayPhase,
};

use crate::describe_frame;

fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 14, 32, 0).unwrap()
}

fn host_app(variant: Variant, time: DateTime<Utc>) -> App<FixedClock, FixedBattery, Screen> {
    let mut config = Config::default();
    config.face.variant = variant;
    let clock = FixedClock {
        reading: ClockReading::from_datetime(&time),
        is_24h: true,
    };
    let screen = Screen::new(config.display.width, config.display.height);
    App::new(&config, clock, FixedBattery(BatteryReading::new(57)), screen)
}

/// The reference afternoon: 14:32 with 57% battery lands on the battery phase.
#[test]
fn reference_afternoon_shows_battery() {
    let mut app = host_app(Variant::HourBand, reference_time());
    app.init().unwrap();

    assert_eq!(app.face().phase(), Some(DisplayPhase::Battery));
    let frame = describe_frame(app.surface());
    assert_eq!(frame, r#"[y=34 "14:32"] [y=112 "Battery:57%"]"#);
}

/// Both stacked regions put ink on the screen, and only inside their frames.
#[test]
fn rendered_frame_has_ink_in_both_regions() {
    let mut app = host_app(Variant::HourBand, reference_time());
    app.init().unwrap();

    let buffer = app.surface().render();
    let primary = Rect::new(0, 34, 144, 76);
    let secondary = Rect::new(0, 112, 144, 18);
    assert!(buffer.ink_in(primary) > 0, "time region is blank");
    assert!(buffer.ink_in(secondary) > 0, "secondary region is blank");
    assert_eq!(buffer.ink_count(), buffer.ink_in(primary) + buffer.ink_in(secondary));

    let ascii = buffer.to_ascii();
    assert_eq!(ascii.lines().count(), 84);
}

/// Over a whole day the hour-band face shows only the date at commute and
/// evening hours and only the battery overnight.
#[test]
fn hour_band_day_schedule() {
    let midnight = Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap();
    for minute in 0..(24 * 60) {
        let time = midnight + Duration::minutes(minute);
        let mut app = host_app(Variant::HourBand, time);
        app.init().unwrap();

        let hour = minute / 60;
        let phase = app.face().phase().unwrap();
        match hour {
            7 | 12 | 18..=21 => assert_eq!(phase, DisplayPhase::Date, "at minute {minute}"),
            0..=6 | 22 | 23 => assert_eq!(phase, DisplayPhase::Battery, "at minute {minute}"),
            _ => assert_ne!(phase, DisplayPhase::TimeOnly),
        }
    }
}

/// A battery that drains overnight updates the display through change events
/// without waiting for the next minute.
#[test]
fn overnight_battery_drain_is_pushed_by_events() {
    let night = Utc.with_ymd_and_hms(2024, 6, 15, 2, 0, 0).unwrap();
    let mut app = host_app(Variant::HourBand, night);
    app.init().unwrap();

    let mut monitor = BatteryMonitor::new(BatteryReading::new(57));
    let secondary = app.face().regions()[1];
    for percent in [57, 56, 56, 55] {
        if let Some(event) = monitor.observe(BatteryReading::new(percent)) {
            assert!(app.handle(event).unwrap());
        }
        assert_eq!(
            app.surface().text(secondary),
            Some(format!("Battery:{percent}%").as_str())
        );
    }

    // The fixed source still says 57%, but the cache keeps the last event
    app.handle(Event::Tick(TimeUnit::Minute)).unwrap();
    assert_eq!(app.surface().text(secondary), Some("Battery:55%"));
}

/// The scatter face puts all four lines on screen and tears down cleanly.
#[test]
fn scatter_face_lifecycle() {
    let mut app = host_app(Variant::Scatter, reference_time());
    app.init().unwrap();

    let texts: Vec<String> = app
        .surface()
        .region_texts()
        .iter()
        .map(|(_, text)| text.to_string())
        .collect();
    assert_eq!(texts.len(), 4);
    for text in &texts {
        for field in ["14:32", "Saturday", "Jun 15", "57%"] {
            assert!(text.contains(field), "{text:?} is missing {field:?}");
        }
    }
    assert!(app.surface().render().ink_count() > 0);

    app.deinit().unwrap();
    assert_eq!(app.surface().live_regions(), 0);
    assert_eq!(app.surface().loaded_fonts(), 0);
    assert!(!app.handle(Event::Tick(TimeUnit::Minute)).unwrap());
}
