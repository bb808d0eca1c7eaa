/// Stable index of a tile inside the grid.
pub type TileId = usize;

/// Hidden prize number printed under a tile's cover.
pub type TileValue = u16;

/// Count type used for tile totals and revealed counters.
pub type TileCount = u16;

/// Pixel dimension of a mask or drawing surface.
pub type Px = u32;

/// Point in surface-local logical pixels.
pub type Point = (f64, f64);

/// Width and height of a drawing surface.
pub type Size = (f64, f64);

/// Percentage in the `0.0..=100.0` range.
pub type Percent = f64;

pub(crate) fn percent_of(part: usize, total: usize) -> Percent {
    if total == 0 {
        0.0
    } else {
        (part as f64 * 100.0) / total as f64
    }
}
