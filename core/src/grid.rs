use serde::{Deserialize, Serialize};

use crate::*;

/// Owns the tiles of one game and the single-tile scratch lock.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileGrid {
    config: GameConfig,
    tiles: Vec<Tile>,
    revealed_count: TileCount,
    won: bool,
    active_tile: Option<TileId>,
    last_revealed: Option<Tile>,
}

impl TileGrid {
    pub fn new(config: GameConfig, generator: impl ValueGenerator) -> Self {
        let mut grid = Self {
            config,
            tiles: Vec::new(),
            revealed_count: 0,
            won: false,
            active_tile: None,
            last_revealed: None,
        };
        grid.start_new_game(generator);
        grid
    }

    /// Deals fresh values and clears every counter, flag, and lock.
    pub fn start_new_game(&mut self, generator: impl ValueGenerator) {
        let values = generator.generate(self.config);
        debug_assert_eq!(values.len(), usize::from(self.config.tile_count));

        self.tiles = values
            .into_iter()
            .enumerate()
            .map(|(id, value)| Tile::new(id, value))
            .collect();
        self.revealed_count = 0;
        self.won = false;
        self.active_tile = None;
        self.last_revealed = None;
        log::debug!("new game with {} tiles", self.tiles.len());
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, id: TileId) -> Result<Tile> {
        self.tiles.get(id).copied().ok_or(GameError::InvalidTile)
    }

    pub fn tile_count(&self) -> TileCount {
        self.config.tile_count
    }

    pub fn revealed_count(&self) -> TileCount {
        self.revealed_count
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    pub fn active_tile(&self) -> Option<TileId> {
        self.active_tile
    }

    pub fn last_revealed(&self) -> Option<Tile> {
        self.last_revealed
    }

    /// Whether some other tile currently holds the scratch lock.
    pub fn is_locked_out(&self, id: TileId) -> bool {
        matches!(self.active_tile, Some(active) if active != id)
    }

    pub fn request_start_scratch(&mut self, id: TileId) -> Result<LockOutcome> {
        let tile = self.tile(id)?;

        if tile.revealed || self.is_locked_out(id) {
            log::trace!("scratch lock denied for tile {}", id);
            return Ok(LockOutcome::Denied);
        }

        if self.active_tile.replace(id).is_none() {
            log::debug!("scratch lock granted to tile {}", id);
        }
        self.last_revealed = None;
        Ok(LockOutcome::Granted)
    }

    pub fn reveal(&mut self, id: TileId) -> Result<RevealOutcome> {
        let tile = self.tiles.get_mut(id).ok_or(GameError::InvalidTile)?;

        if tile.revealed {
            return Ok(RevealOutcome::NoChange);
        }
        tile.revealed = true;
        let tile = *tile;

        self.revealed_count = self
            .tiles
            .iter()
            .filter(|tile| tile.revealed)
            .count()
            .try_into()
            .unwrap_or(TileCount::MAX);
        self.last_revealed = Some(tile);
        self.active_tile = None;
        self.won = self.revealed_count == self.config.tile_count;

        log::debug!(
            "revealed tile {} ({}), {}/{}",
            tile.id,
            tile.value,
            self.revealed_count,
            self.config.tile_count
        );

        Ok(if self.won {
            RevealOutcome::Won
        } else {
            RevealOutcome::Revealed
        })
    }

    pub fn dismiss_last_revealed(&mut self) -> bool {
        self.last_revealed.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(seed: u64) -> TileGrid {
        TileGrid::new(GameConfig::default(), ShuffledValues::new(seed))
    }

    #[test]
    fn new_game_deals_seventeen_unique_values() {
        let grid = grid(11);

        let mut values: Vec<_> = grid.tiles().iter().map(|tile| tile.value).collect();
        values.sort_unstable();

        assert_eq!(grid.tiles().len(), 17);
        assert_eq!(values, (1..=17).collect::<Vec<_>>());
        assert!(grid.tiles().iter().enumerate().all(|(i, tile)| tile.id == i));
        assert_eq!(grid.revealed_count(), 0);
        assert!(!grid.is_won());
    }

    #[test]
    fn reveal_scenario_runs_to_a_win() {
        let mut grid = grid(5);

        assert_eq!(grid.reveal(3).unwrap(), RevealOutcome::Revealed);
        assert_eq!(grid.revealed_count(), 1);
        assert_eq!(grid.last_revealed().map(|tile| tile.id), Some(3));
        assert!(!grid.is_won());

        let rest: Vec<_> = (0..17).filter(|&id| id != 3).collect();
        for (n, &id) in rest.iter().enumerate() {
            let outcome = grid.reveal(id).unwrap();
            if n + 1 == rest.len() {
                assert_eq!(outcome, RevealOutcome::Won);
            } else {
                assert_eq!(outcome, RevealOutcome::Revealed);
                assert!(!grid.is_won());
            }
        }

        assert_eq!(grid.revealed_count(), 17);
        assert!(grid.is_won());
    }

    #[test]
    fn reveal_is_idempotent() {
        let mut grid = grid(1);

        grid.reveal(8).unwrap();
        assert_eq!(grid.reveal(8).unwrap(), RevealOutcome::NoChange);
        assert_eq!(grid.revealed_count(), 1);
    }

    #[test]
    fn reveal_rejects_unknown_tile() {
        let mut grid = grid(1);

        assert_eq!(grid.reveal(17), Err(GameError::InvalidTile));
        assert_eq!(grid.request_start_scratch(99), Err(GameError::InvalidTile));
    }

    #[test]
    fn new_game_resets_everything() {
        let mut grid = grid(2);
        for id in 0..17 {
            grid.reveal(id).unwrap();
        }
        grid.request_start_scratch(0).unwrap();
        assert!(grid.is_won());

        grid.start_new_game(ShuffledValues::new(3));

        assert_eq!(grid.revealed_count(), 0);
        assert!(!grid.is_won());
        assert!(grid.tiles().iter().all(|tile| tile.is_covered()));
        assert_eq!(grid.active_tile(), None);
        assert_eq!(grid.last_revealed(), None);
    }

    #[test]
    fn lock_holder_keeps_lock_until_revealed() {
        let mut grid = grid(4);

        assert_eq!(grid.request_start_scratch(2).unwrap(), LockOutcome::Granted);
        assert_eq!(grid.request_start_scratch(9).unwrap(), LockOutcome::Denied);
        assert_eq!(grid.active_tile(), Some(2));
        assert!(grid.is_locked_out(9));
        assert!(!grid.is_locked_out(2));

        // a second gesture on the same tile is fine
        assert_eq!(grid.request_start_scratch(2).unwrap(), LockOutcome::Granted);

        grid.reveal(2).unwrap();
        assert_eq!(grid.active_tile(), None);
        assert_eq!(grid.request_start_scratch(9).unwrap(), LockOutcome::Granted);
    }

    #[test]
    fn revealed_tile_cannot_take_the_lock() {
        let mut grid = grid(4);

        grid.reveal(5).unwrap();
        assert_eq!(grid.request_start_scratch(5).unwrap(), LockOutcome::Denied);
        assert_eq!(grid.active_tile(), None);
    }

    #[test]
    fn starting_a_scratch_dismisses_the_popup() {
        let mut grid = grid(6);

        grid.reveal(0).unwrap();
        assert!(grid.last_revealed().is_some());

        grid.request_start_scratch(1).unwrap();
        assert_eq!(grid.last_revealed(), None);
    }

    #[test]
    fn dismissing_the_popup_is_one_shot() {
        let mut grid = grid(6);

        grid.reveal(7).unwrap();

        assert_eq!(grid.last_revealed().map(|tile| tile.id), Some(7));
        assert!(grid.dismiss_last_revealed());
        assert!(!grid.dismiss_last_revealed());
        assert_eq!(grid.revealed_count(), 1);
    }
}
