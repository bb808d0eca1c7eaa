use serde::{Deserialize, Serialize};

use crate::{TileId, TileValue};

/// One scratch card in the grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub value: TileValue,
    pub revealed: bool,
}

impl Tile {
    pub const fn new(id: TileId, value: TileValue) -> Self {
        Self {
            id,
            value,
            revealed: false,
        }
    }

    pub const fn is_covered(self) -> bool {
        !self.revealed
    }
}
