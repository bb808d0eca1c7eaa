use super::*;

/// Deals the values `1..=tile_count` in a uniformly random order.
#[derive(Clone, Debug, PartialEq)]
pub struct ShuffledValues {
    seed: u64,
}

impl ShuffledValues {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl ValueGenerator for ShuffledValues {
    fn generate(self, config: GameConfig) -> Vec<TileValue> {
        use rand::prelude::*;

        let mut values: Vec<TileValue> = (1..=config.tile_count).collect();
        let mut rng = SmallRng::seed_from_u64(self.seed);

        // Fisher-Yates, walking down from the last slot
        for i in (1..values.len()).rev() {
            let j = rng.random_range(0..=i);
            values.swap(i, j);
        }

        log::trace!("dealt values {:?} from seed {}", values, self.seed);
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut values: Vec<TileValue>) -> Vec<TileValue> {
        values.sort_unstable();
        values
    }

    #[test]
    fn every_seed_deals_a_permutation() {
        let expected: Vec<TileValue> = (1..=17).collect();
        for seed in 0..200 {
            let values = ShuffledValues::new(seed).generate(GameConfig::default());
            assert_eq!(sorted(values), expected, "seed {seed}");
        }
    }

    #[test]
    fn same_seed_deals_same_order() {
        let a = ShuffledValues::new(7).generate(GameConfig::default());
        let b = ShuffledValues::new(7).generate(GameConfig::default());
        assert_eq!(a, b);
    }

    #[test]
    fn shuffle_actually_moves_values() {
        let identity: Vec<TileValue> = (1..=17).collect();
        let moved = (0..20)
            .map(|seed| ShuffledValues::new(seed).generate(GameConfig::default()))
            .filter(|values| *values != identity)
            .count();
        assert!(moved > 0);
    }

    #[test]
    fn single_tile_config_deals_one() {
        let values = ShuffledValues::new(3).generate(GameConfig::new(0));
        assert_eq!(values, vec![1]);
    }
}
