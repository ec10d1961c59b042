//! # Silicon Sampler Entry Point
//!
//! This binary crate runs the watch face on a desktop host: it loads the
//! configuration, binds the face to the system clock, the sysfs battery and an
//! off-screen screen, then drives it from a single-threaded event loop that
//! wakes on every whole minute. It supports a one-shot mode (`--once`) and an
//! ASCII preview mode (`--stdout`).

// Test modules
#[cfg(test)]
mod tests;

use anyhow::Context;
use chrono::Local;
use sampler_face_lib::{
    app::App,
    config::{Config, Variant},
    events::{until_next_boundary, Event, TimeUnit},
    platform::{BatterySource, SysfsBattery, SystemClock},
    screen::Screen,
};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Slack added to the minute sleep so the wake-up lands after the boundary
const TICK_SLACK: Duration = Duration::from_millis(20);

type HostApp = App<SystemClock, SysfsBattery, Screen>;

/// Command-line options
#[derive(Debug, Default, PartialEq)]
pub struct Options {
    /// Render one frame and exit
    pub once: bool,
    /// Print frames as ASCII art instead of logging region text
    pub stdout: bool,
    /// Overrides the configured variant
    pub variant: Option<Variant>,
    /// Config file to read instead of sampler-config.toml
    pub config_path: Option<PathBuf>,
}

impl Options {
    /// Parse arguments, skipping the program name.
    pub fn parse<I, A>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        let mut options = Options::default();
        let mut args = args.into_iter().map(Into::into).skip(1);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--once" => options.once = true,
                "--stdout" => options.stdout = true,
                "--variant" => {
                    let value = args.next().context("--variant needs a value")?;
                    let variant = Variant::from_arg(&value).with_context(|| {
                        format!("unknown variant {value:?} (expected hour-band, rotation or scatter)")
                    })?;
                    options.variant = Some(variant);
                }
                "--config" => {
                    let value = args.next().context("--config needs a path")?;
                    options.config_path = Some(PathBuf::from(value));
                }
                other => anyhow::bail!("unknown argument {other:?}"),
            }
        }

        Ok(options)
    }
}

/// Apply command-line overrides to the loaded configuration.
pub fn resolve_config(options: &Options) -> Config {
    let mut config = match &options.config_path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };
    if let Some(variant) = options.variant {
        config.face.variant = variant;
    }
    config
}

/// One line per region, for the log.
pub fn describe_frame(screen: &Screen) -> String {
    screen
        .region_texts()
        .iter()
        .map(|(frame, text)| format!("[y={} {:?}]", frame.y, text))
        .collect::<Vec<_>>()
        .join(" ")
}

fn show_frame(app: &HostApp, stdout: bool) {
    if stdout {
        println!("{}", app.surface().render().to_ascii());
    } else {
        log::info!("{}", describe_frame(app.surface()));
    }
}

async fn run(app: &mut HostApp, config: &Config, stdout: bool) -> anyhow::Result<()> {
    let mut monitor = app.battery_monitor();
    let poll_every = Duration::from_secs(config.face.battery_poll_seconds.max(1));
    let mut battery_poll = tokio::time::interval(poll_every);
    battery_poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let until_tick = until_next_boundary(&Local::now(), TimeUnit::Minute) + TICK_SLACK;

        let event = tokio::select! {
            _ = tokio::time::sleep(until_tick) => Event::Tick(TimeUnit::Minute),
            _ = battery_poll.tick(), if app.subscriptions().battery_subscribed() => {
                match monitor.observe(app.battery().peek()) {
                    Some(event) => event,
                    None => continue,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                log::info!("Interrupted, shutting down");
                break;
            }
        };

        if app.handle(event)? {
            show_frame(app, stdout);
        }
    }

    Ok(())
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let options = Options::parse(env::args())?;
    let config = resolve_config(&options);

    let clock = SystemClock::new(config.face.clock_style);
    let battery = SysfsBattery::discover();
    let screen = Screen::new(config.display.width, config.display.height);

    let mut app = App::new(&config, clock, battery, screen);
    app.init().context("loading watch face")?;
    show_frame(&app, options.stdout);

    if !options.once {
        // One thread: ticks and battery events never overlap
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let outcome = rt.block_on(run(&mut app, &config, options.stdout));
        if let Err(error) = &outcome {
            log::error!("Event loop failed: {:#}", error);
        }
        app.deinit().context("unloading watch face")?;
        return outcome;
    }

    app.deinit().context("unloading watch face")?;
    Ok(())
}
