use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Alpha at or above this value still counts as covered.
pub const HALF_OPAQUE: u8 = 128;

const OPAQUE: u8 = u8::MAX;
const TRANSPARENT: u8 = 0;

/// Look of the wrapping paper painted over a tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoverStyle {
    Crimson,
    Pine,
}

impl CoverStyle {
    /// Even values get crimson paper, odd values get pine.
    pub const fn for_value(value: TileValue) -> Self {
        if value % 2 == 0 {
            Self::Crimson
        } else {
            Self::Pine
        }
    }
}

/// Per-pixel alpha buffer over a tile, indexed `[row, column]`.
#[derive(Clone, Debug, PartialEq)]
pub struct ScratchMask {
    alpha: Array2<u8>,
    erased: usize,
}

impl ScratchMask {
    pub fn new(width: Px, height: Px) -> Self {
        Self {
            alpha: Array2::from_elem((height as usize, width as usize), OPAQUE),
            erased: 0,
        }
    }

    /// Restores a fully opaque cover without reallocating.
    pub fn fill(&mut self) {
        self.alpha.fill(OPAQUE);
        self.erased = 0;
    }

    pub fn width(&self) -> Px {
        self.alpha.ncols() as Px
    }

    pub fn height(&self) -> Px {
        self.alpha.nrows() as Px
    }

    pub fn total_pixels(&self) -> usize {
        self.alpha.len()
    }

    pub fn alpha_at(&self, x: Px, y: Px) -> Option<u8> {
        self.alpha.get((y as usize, x as usize)).copied()
    }

    /// Punches a fully transparent disc into the cover. A pixel is cleared
    /// when its center lies within `radius` of `(cx, cy)`.
    ///
    /// Returns how many pixels went from covered to erased.
    pub fn erase(&mut self, (cx, cy): Point, radius: f64) -> usize {
        if !(radius > 0.0) || !cx.is_finite() || !cy.is_finite() {
            return 0;
        }

        let Some(cols) = pixel_span(cx, radius, self.alpha.ncols()) else {
            return 0;
        };
        let Some(rows) = pixel_span(cy, radius, self.alpha.nrows()) else {
            return 0;
        };

        let radius_sq = radius * radius;
        let mut newly_erased = 0;

        for row in rows {
            let dy = row as f64 + 0.5 - cy;
            for col in cols.clone() {
                let dx = col as f64 + 0.5 - cx;
                if dx * dx + dy * dy > radius_sq {
                    continue;
                }

                let pixel = &mut self.alpha[(row, col)];
                if *pixel >= HALF_OPAQUE {
                    newly_erased += 1;
                }
                *pixel = TRANSPARENT;
            }
        }

        self.erased += newly_erased;
        newly_erased
    }

    /// Exact coverage from a full scan of the buffer.
    pub fn sample_coverage(&self) -> Percent {
        let erased = self
            .alpha
            .iter()
            .filter(|&&alpha| alpha < HALF_OPAQUE)
            .count();
        percent_of(erased, self.total_pixels())
    }

    /// Coverage from the running erased-pixel count, without scanning.
    pub fn erased_percent(&self) -> Percent {
        percent_of(self.erased, self.total_pixels())
    }
}

/// Inclusive range of pixel indices whose centers may fall within `radius`
/// of `center`, clamped to `0..len`.
fn pixel_span(center: f64, radius: f64, len: usize) -> Option<core::ops::Range<usize>> {
    let start = (center - radius - 0.5).floor().max(0.0);
    let end = (center + radius - 0.5).ceil() + 1.0;
    let end = end.min(len as f64);
    if end <= start {
        None
    } else {
        Some(start as usize..end as usize)
    }
}
