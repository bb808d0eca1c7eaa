use crate::*;
pub use shuffle::*;

mod shuffle;

pub trait ValueGenerator {
    /// Produces one hidden value per tile, indexed by tile id.
    fn generate(self, config: GameConfig) -> Vec<TileValue>;
}
