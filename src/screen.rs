//! # Host Screen
//!
//! An off-screen [`Surface`] for running the face on a desktop. Regions and
//! fonts are plain bookkeeping until [`Screen::render`] draws them into a 1-bit
//! [`FrameBuffer`] with embedded-graphics. The frame buffer prints as ASCII art
//! for the `--stdout` development mode.
//!
//! Font and region counts are exposed so tests can check that a load/unload
//! cycle releases everything it acquired.

use crate::error::FaceError;
use crate::layout::Rect;
use crate::platform::{Color, FontHandle, FontId, RegionId, RegionStyle, Surface};
use embedded_graphics::{
    mono_font::{
        ascii::{FONT_10X20, FONT_6X10},
        MonoFont, MonoTextStyle,
    },
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};
use std::collections::BTreeMap;

/// A text region as the screen tracks it
#[derive(Debug, Clone)]
struct Region {
    style: RegionStyle,
    frame: Rect,
    text: String,
}

/// Off-screen root window.
#[derive(Debug)]
pub struct Screen {
    width: u32,
    height: u32,
    background: Color,
    visible: bool,
    next_handle: u32,
    fonts: BTreeMap<FontHandle, FontId>,
    /// Keyed by creation order, which is also paint order
    regions: BTreeMap<RegionId, Region>,
}

impl Screen {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: Color::White,
            visible: false,
            next_handle: 1,
            fonts: BTreeMap::new(),
            regions: BTreeMap::new(),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn live_regions(&self) -> usize {
        self.regions.len()
    }

    pub fn loaded_fonts(&self) -> usize {
        self.fonts.len()
    }

    pub fn text(&self, region: RegionId) -> Option<&str> {
        self.regions.get(&region).map(|r| r.text.as_str())
    }

    pub fn frame(&self, region: RegionId) -> Option<Rect> {
        self.regions.get(&region).map(|r| r.frame)
    }

    /// Frame and text of every region, in paint order.
    pub fn region_texts(&self) -> Vec<(Rect, &str)> {
        self.regions
            .values()
            .map(|r| (r.frame, r.text.as_str()))
            .collect()
    }

    fn allocate(&mut self) -> u32 {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }

    fn region_mut(&mut self, region: RegionId) -> Result<&mut Region, FaceError> {
        self.regions
            .get_mut(&region)
            .ok_or(FaceError::UnknownRegion(region))
    }

    /// Render all regions into a fresh frame buffer.
    pub fn render(&self) -> FrameBuffer {
        let mut buffer = FrameBuffer::new(self.width, self.height);
        match self.draw(&mut buffer) {
            Ok(()) => buffer,
            Err(never) => match never {},
        }
    }

    /// Paint the background and every region onto any binary draw target.
    pub fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        if let Some(color) = ink(self.background) {
            target.clear(color)?;
        }

        for region in self.regions.values() {
            let area = Rectangle::new(
                Point::new(region.frame.x, region.frame.y),
                Size::new(region.frame.width, region.frame.height),
            );
            let mut clipped = target.clipped(&area);

            if let Some(fill) = ink(region.style.background) {
                area.into_styled(PrimitiveStyle::with_fill(fill))
                    .draw(&mut clipped)?;
            }

            let (Some(text_color), Some(font)) =
                (ink(region.style.text_color), self.fonts.get(&region.style.font))
            else {
                continue;
            };
            let character_style = MonoTextStyle::new(mono_font(*font), text_color);
            let anchor_x = region.frame.x + region.frame.width as i32 / 2;
            let text_style = TextStyleBuilder::new()
                .alignment(Alignment::Center)
                .baseline(Baseline::Top)
                .build();

            Text::with_text_style(
                &region.text,
                Point::new(anchor_x, region.frame.y),
                character_style,
                text_style,
            )
            .draw(&mut clipped)?;
        }

        Ok(())
    }
}

/// Built-in mono fonts standing in for the face's custom fonts
fn mono_font(font: FontId) -> &'static MonoFont<'static> {
    match font {
        FontId::Large => &FONT_10X20,
        FontId::Small => &FONT_6X10,
    }
}

fn ink(color: Color) -> Option<BinaryColor> {
    match color {
        Color::Black => Some(BinaryColor::On),
        Color::White => Some(BinaryColor::Off),
        Color::Clear => None,
    }
}

impl Surface for Screen {
    fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    fn push(&mut self) {
        self.visible = true;
    }

    fn load_font(&mut self, font: FontId) -> Result<FontHandle, FaceError> {
        let handle = FontHandle(self.allocate());
        self.fonts.insert(handle, font);
        log::debug!("Loaded font {:?} as {:?}", font, handle);
        Ok(handle)
    }

    fn unload_font(&mut self, handle: FontHandle) -> Result<(), FaceError> {
        self.fonts
            .remove(&handle)
            .map(|_| ())
            .ok_or(FaceError::UnknownFont(handle))
    }

    fn create_region(&mut self, style: RegionStyle) -> Result<RegionId, FaceError> {
        if !self.fonts.contains_key(&style.font) {
            return Err(FaceError::UnknownFont(style.font));
        }
        let region = RegionId(self.allocate());
        self.regions.insert(
            region,
            Region {
                style,
                frame: Rect::ZERO,
                text: String::new(),
            },
        );
        Ok(region)
    }

    fn set_text(&mut self, region: RegionId, text: &str) -> Result<(), FaceError> {
        let region = self.region_mut(region)?;
        region.text.clear();
        region.text.push_str(text);
        Ok(())
    }

    fn set_frame(&mut self, region: RegionId, frame: Rect) -> Result<(), FaceError> {
        self.region_mut(region)?.frame = frame;
        log::debug!(
            "Frame {:?} {} {} {} {}",
            region,
            frame.x,
            frame.y,
            frame.width,
            frame.height
        );
        Ok(())
    }

    fn destroy_region(&mut self, region: RegionId) -> Result<(), FaceError> {
        self.regions
            .remove(&region)
            .map(|_| ())
            .ok_or(FaceError::UnknownRegion(region))
    }
}

/// 1-bit frame buffer; `true` is ink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<bool>,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![false; width as usize * height as usize],
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.pixels[self.index(x, y)]
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn ink_count(&self) -> usize {
        self.pixels.iter().filter(|&&p| p).count()
    }

    /// Ink pixels inside a rectangle.
    pub fn ink_in(&self, area: Rect) -> usize {
        let mut count = 0;
        for y in area.y.max(0)..area.max_y().max(0) {
            for x in area.x.max(0)..(area.x + area.width as i32).max(0) {
                if self.pixel(x as u32, y as u32) {
                    count += 1;
                }
            }
        }
        count
    }

    /// Two pixel rows per text line using half-block characters.
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width as usize + 1) * self.height.div_ceil(2) as usize);
        for row in (0..self.height).step_by(2) {
            for x in 0..self.width {
                let top = self.pixel(x, row);
                let bottom = self.pixel(x, row + 1);
                out.push(match (top, bottom) {
                    (true, true) => '█',
                    (true, false) => '▀',
                    (false, true) => '▄',
                    (false, false) => ' ',
                });
            }
            out.push('\n');
        }
        out
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0
                && point.y >= 0
                && (point.x as u32) < self.width
                && (point.y as u32) < self.height
            {
                let index = self.index(point.x as u32, point.y as u32);
                self.pixels[index] = color.is_on();
            }
        }
        Ok(())
    }
}
