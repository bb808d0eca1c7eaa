use serde::{Deserialize, Serialize};

pub use error::*;
pub use generator::*;
pub use grid::*;
pub use mask::*;
pub use particles::*;
pub use surface::*;
pub use tile::*;
pub use types::*;

mod error;
mod generator;
mod grid;
mod mask;
mod particles;
mod surface;
mod tile;
mod types;

/// Number of tiles in a standard game.
pub const DEFAULT_TILE_COUNT: TileCount = 17;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub tile_count: TileCount,
}

impl GameConfig {
    pub const fn new_unchecked(tile_count: TileCount) -> Self {
        Self { tile_count }
    }

    pub fn new(tile_count: TileCount) -> Self {
        Self::new_unchecked(tile_count.max(1))
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(DEFAULT_TILE_COUNT)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum LockOutcome {
    Granted,
    Denied,
}

impl LockOutcome {
    pub const fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            Won => true,
        }
    }
}

/// What a single input sample did to a scratch surface.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ScratchOutcome {
    Ignored,
    Erased,
    Revealed,
}

impl ScratchOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::Ignored)
    }

    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed)
    }
}
