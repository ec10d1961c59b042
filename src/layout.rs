//! Region frame arithmetic.
//!
//! The two-region faces stack a tall time region just above the vertical
//! center with a thin secondary strip under it. The scatter face drops four
//! full-width strips at random heights, reseeded from the clock every tick.

use crate::format::SCATTER_LINES;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Height of the large time region
pub const PRIMARY_HEIGHT: i32 = 76;
/// Distance of the time region's top edge above the screen center
pub const PRIMARY_RISE: i32 = 50;
/// Height of a secondary or scatter strip
pub const STRIP_HEIGHT: i32 = 18;
/// Gap between the time region and the secondary strip
pub const STRIP_GAP: i32 = 2;

/// An on-screen rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bottom edge (exclusive).
    pub fn max_y(&self) -> i32 {
        self.y + self.height as i32
    }

    /// True if `other` lies entirely inside `self`.
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.x + other.width as i32 <= self.x + self.width as i32
            && other.max_y() <= self.max_y()
    }
}

/// Frames for the time region and the secondary strip.
pub fn stacked_frames(bounds: Rect) -> (Rect, Rect) {
    let primary = Rect::new(
        0,
        bounds.height as i32 / 2 - PRIMARY_RISE,
        bounds.width,
        PRIMARY_HEIGHT as u32,
    );
    let secondary = Rect::new(
        0,
        primary.max_y() + STRIP_GAP,
        bounds.width,
        STRIP_HEIGHT as u32,
    );
    (primary, secondary)
}

/// Four full-width strips at random heights.
///
/// The same seed always yields the same frames; strips never leave the screen
/// but may overlap each other.
pub fn scatter_frames(bounds: Rect, seed: u64) -> [Rect; SCATTER_LINES] {
    let mut rng = StdRng::seed_from_u64(seed);
    let lowest_top = (bounds.height as i32 - STRIP_HEIGHT).max(0);

    std::array::from_fn(|_| {
        let y = rng.gen_range(0..=lowest_top);
        Rect::new(0, y, bounds.width, STRIP_HEIGHT as u32)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Rect = Rect::new(0, 0, 144, 168);

    #[test]
    fn test_stacked_frames_on_default_screen() {
        let (primary, secondary) = stacked_frames(SCREEN);
        assert_eq!(primary, Rect::new(0, 34, 144, 76));
        assert_eq!(secondary, Rect::new(0, 112, 144, 18));
        assert!(SCREEN.contains(&primary));
        assert!(SCREEN.contains(&secondary));
    }

    #[test]
    fn test_secondary_sits_below_primary() {
        let bounds = Rect::new(0, 0, 200, 228);
        let (primary, secondary) = stacked_frames(bounds);
        assert_eq!(secondary.y, primary.max_y() + STRIP_GAP);
        assert_eq!(primary.width, 200);
    }

    #[test]
    fn test_scatter_is_deterministic_per_seed() {
        assert_eq!(scatter_frames(SCREEN, 1_718_461_920), scatter_frames(SCREEN, 1_718_461_920));
    }

    #[test]
    fn test_scatter_moves_between_ticks() {
        let frames: Vec<_> = (0..10u64)
            .map(|minute| scatter_frames(SCREEN, 1_718_461_920 + minute * 60))
            .collect();
        assert!(frames.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn test_scatter_stays_on_screen() {
        for seed in 0..200 {
            for frame in scatter_frames(SCREEN, seed) {
                assert!(SCREEN.contains(&frame), "{frame:?} escaped for seed {seed}");
                assert_eq!(frame.height, STRIP_HEIGHT as u32);
            }
        }
    }

    #[test]
    fn test_scatter_on_tiny_screen() {
        let tiny = Rect::new(0, 0, 20, 10);
        for frame in scatter_frames(tiny, 7) {
            assert_eq!(frame.y, 0);
        }
    }
}
