//! # Refresh Driver
//!
//! [`WatchFace`] owns every handle and buffer the face needs and moves through
//! two states:
//!
//! ```text
//!   Uninitialized --load--> Displayed --tick--> Displayed
//!         ^                     |
//!         +-------unload--------+
//! ```
//!
//! `load` acquires fonts and regions, renders once and lays the regions out.
//! Each `tick` takes fresh readings, picks a phase, formats and replaces the
//! region text; the scatter face also reshuffles its frames. `unload` releases
//! exactly what `load` acquired.

use crate::config::Variant;
use crate::error::FaceError;
use crate::format::{BatteryText, Formatter, TimeText};
use crate::layout::{scatter_frames, stacked_frames};
use crate::phase::{selector_for, PhaseSelector};
use crate::platform::{BatterySource, ClockSource, FontHandle, FontId, RegionId, RegionStyle, Surface};
use crate::{BatteryReading, DisplayPhase};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    Uninitialized,
    Displayed,
}

/// Handles acquired in `load`, released in `unload`
#[derive(Debug, Default)]
struct Resources {
    fonts: Vec<FontHandle>,
    regions: Vec<RegionId>,
}

/// The watch face and everything it renders.
pub struct WatchFace {
    variant: Variant,
    formatter: Formatter,
    selector: Option<Box<dyn PhaseSelector>>,
    state: DriverState,
    resources: Resources,
    time_text: TimeText,
    /// Cached between battery events on faces that do not sample every tick
    battery_text: BatteryText,
    /// Reading behind `battery_text`, set only on faces that cache it
    battery: Option<BatteryReading>,
    phase: Option<DisplayPhase>,
}

impl WatchFace {
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            formatter: Formatter::for_variant(variant),
            selector: selector_for(variant),
            state: DriverState::Uninitialized,
            resources: Resources::default(),
            time_text: TimeText::new(),
            battery_text: BatteryText::new(),
            battery: None,
            phase: None,
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Phase shown by the most recent refresh, if any.
    pub fn phase(&self) -> Option<DisplayPhase> {
        self.phase
    }

    /// The battery reading the cached text was built from.
    pub fn cached_battery(&self) -> Option<BatteryReading> {
        self.battery
    }

    /// Regions in creation order: time then secondary, or the four scatter lines.
    pub fn regions(&self) -> &[RegionId] {
        &self.resources.regions
    }

    /// Acquire resources, render once and lay out.
    pub fn load<S, C, B>(&mut self, surface: &mut S, clock: &C, battery: &B) -> Result<(), FaceError>
    where
        S: Surface,
        C: ClockSource,
        B: BatterySource,
    {
        if self.state == DriverState::Displayed {
            log::warn!("Watch face already loaded, ignoring load");
            return Ok(());
        }

        if let Err(error) = self.acquire_and_show(surface, clock, battery) {
            log::warn!("Loading {:?} face failed: {}", self.variant, error);
            if let Err(cleanup) = self.release(surface) {
                log::warn!("Rolling back {:?} face: {}", self.variant, cleanup);
            }
            self.state = DriverState::Uninitialized;
            self.phase = None;
            return Err(error);
        }
        Ok(())
    }

    fn acquire_and_show<S, C, B>(&mut self, surface: &mut S, clock: &C, battery: &B) -> Result<(), FaceError>
    where
        S: Surface,
        C: ClockSource,
        B: BatterySource,
    {
        match self.variant {
            Variant::HourBand | Variant::Rotation => {
                let large = self.acquire_font(surface, FontId::Large)?;
                let small = self.acquire_font(surface, FontId::Small)?;
                self.acquire_region(surface, large)?;
                self.acquire_region(surface, small)?;
            }
            Variant::Scatter => {
                let small = self.acquire_font(surface, FontId::Small)?;
                for _ in 0..crate::format::SCATTER_LINES {
                    self.acquire_region(surface, small)?;
                }
            }
        }

        if self.variant.caches_battery() {
            let reading = battery.peek();
            self.battery_text = self.formatter.battery(&reading);
            self.battery = Some(reading);
        }

        self.state = DriverState::Displayed;
        log::info!("Loaded {:?} face", self.variant);
        self.refresh(surface, clock, battery)?;
        if self.variant != Variant::Scatter {
            self.layout_stacked(surface)?;
        }
        Ok(())
    }

    /// The once-per-minute refresh.
    pub fn tick<S, C, B>(&mut self, surface: &mut S, clock: &C, battery: &B) -> Result<(), FaceError>
    where
        S: Surface,
        C: ClockSource,
        B: BatterySource,
    {
        if self.state != DriverState::Displayed {
            return Err(FaceError::NotDisplayed);
        }
        self.refresh(surface, clock, battery)
    }

    /// Rewrite the cached battery text.
    ///
    /// If the secondary region is showing the battery right now it is updated
    /// immediately; otherwise the new text shows up on the next battery minute.
    pub fn battery_changed<S: Surface>(
        &mut self,
        surface: &mut S,
        reading: BatteryReading,
    ) -> Result<(), FaceError> {
        self.battery_text = self.formatter.battery(&reading);
        self.battery = Some(reading);
        if self.state == DriverState::Displayed && self.phase == Some(DisplayPhase::Battery) {
            if let Some(&secondary) = self.resources.regions.get(1) {
                surface.set_text(secondary, self.battery_text.as_str())?;
            }
        }
        Ok(())
    }

    /// Release every region and font acquired in `load`.
    ///
    /// Every handle is released even if some fail; the first failure is returned
    /// and the face ends up `Uninitialized` either way.
    pub fn unload<S: Surface>(&mut self, surface: &mut S) -> Result<(), FaceError> {
        let result = self.release(surface);
        if self.state == DriverState::Displayed {
            log::info!("Unloaded {:?} face", self.variant);
        }
        self.state = DriverState::Uninitialized;
        self.phase = None;
        result
    }

    fn release<S: Surface>(&mut self, surface: &mut S) -> Result<(), FaceError> {
        let mut first_error = None;
        for region in self.resources.regions.drain(..) {
            if let Err(e) = surface.destroy_region(region) {
                log::warn!("Failed to destroy region {:?}: {}", region, e);
                first_error.get_or_insert(e);
            }
        }
        for font in self.resources.fonts.drain(..) {
            if let Err(e) = surface.unload_font(font) {
                log::warn!("Failed to unload font {:?}: {}", font, e);
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn acquire_font<S: Surface>(&mut self, surface: &mut S, font: FontId) -> Result<FontHandle, FaceError> {
        let handle = surface.load_font(font)?;
        self.resources.fonts.push(handle);
        Ok(handle)
    }

    fn acquire_region<S: Surface>(&mut self, surface: &mut S, font: FontHandle) -> Result<RegionId, FaceError> {
        let region = surface.create_region(RegionStyle::centered(font))?;
        self.resources.regions.push(region);
        Ok(region)
    }

    fn layout_stacked<S: Surface>(&self, surface: &mut S) -> Result<(), FaceError> {
        let (primary, secondary) = stacked_frames(surface.bounds());
        surface.set_frame(self.resources.regions[0], primary)?;
        surface.set_frame(self.resources.regions[1], secondary)?;
        Ok(())
    }

    fn refresh<S, C, B>(&mut self, surface: &mut S, clock: &C, battery: &B) -> Result<(), FaceError>
    where
        S: Surface,
        C: ClockSource,
        B: BatterySource,
    {
        let reading = clock.now();
        let is_24h = clock.is_24h_style();

        let Some(selector) = &self.selector else {
            let lines = self.formatter.scatter_lines(&reading, &battery.peek(), is_24h);
            let frames = scatter_frames(surface.bounds(), reading.epoch_seconds as u64);
            for ((region, line), frame) in self.resources.regions.iter().zip(&lines).zip(frames) {
                surface.set_text(*region, line.as_str())?;
                surface.set_frame(*region, frame)?;
            }
            log::debug!("Scatter refresh at {}", reading.local);
            return Ok(());
        };

        if !self.variant.caches_battery() {
            self.battery_text = self.formatter.battery(&battery.peek());
        }

        let phase = selector.select(&reading);
        self.time_text = self.formatter.time(&reading, is_24h);
        let secondary = self
            .formatter
            .secondary(phase, &reading, &self.battery_text, is_24h);

        surface.set_text(self.resources.regions[0], self.time_text.as_str())?;
        surface.set_text(self.resources.regions[1], secondary.as_str())?;
        self.phase = Some(phase);
        log::debug!("Refresh at {}: {:?} -> {:?}", reading.local, phase, secondary.as_str());
        Ok(())
    }
}

impl std::fmt::Debug for WatchFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchFace")
            .field("variant", &self.variant)
            .field("state", &self.state)
            .field("phase", &self.phase)
            .field("regions", &self.resources.regions)
            .finish()
    }
}
