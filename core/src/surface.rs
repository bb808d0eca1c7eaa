use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

/// Coverage above which a tile counts as revealed.
pub const DEFAULT_REVEAL_THRESHOLD: Percent = 40.0;

/// Chance that a single erase triggers a full coverage scan.
pub const DEFAULT_SAMPLE_RATE: f64 = 0.1;

pub const DEFAULT_BRUSH_RADIUS: f64 = 20.0;

/// When coverage gets measured while a gesture is in progress.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CoverageCheck {
    /// Full scan after a random fraction of erases.
    Sampled { rate: f64 },
    /// Running erased-pixel count after every erase.
    Incremental,
}

impl Default for CoverageCheck {
    fn default() -> Self {
        Self::Sampled {
            rate: DEFAULT_SAMPLE_RATE,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RevealPolicy {
    pub threshold: Percent,
    pub brush_radius: f64,
    pub check: CoverageCheck,
}

impl RevealPolicy {
    pub const fn is_past_threshold(&self, coverage: Percent) -> bool {
        coverage > self.threshold
    }
}

impl Default for RevealPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_REVEAL_THRESHOLD,
            brush_radius: DEFAULT_BRUSH_RADIUS,
            check: Default::default(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceState {
    Covered,
    Scratching,
    /// A gesture ended before enough was erased; the mask is kept.
    Released,
    Revealed,
}

impl SurfaceState {
    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed)
    }

    pub const fn is_scratching(self) -> bool {
        matches!(self, Self::Scratching)
    }
}

impl Default for SurfaceState {
    fn default() -> Self {
        Self::Covered
    }
}

/// The erasable cover of one tile and the logic deciding when it is gone.
#[derive(Clone, Debug)]
pub struct ScratchSurface {
    mask: ScratchMask,
    value: TileValue,
    policy: RevealPolicy,
    state: SurfaceState,
    rng: SmallRng,
}

impl ScratchSurface {
    pub fn new(width: Px, height: Px, value: TileValue, policy: RevealPolicy, seed: u64) -> Self {
        Self {
            mask: ScratchMask::new(width, height),
            value,
            policy,
            state: Default::default(),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Puts a fresh cover over `value`, whatever state the surface was in,
    /// and reseeds the sampler.
    pub fn reset(&mut self, value: TileValue, seed: u64) {
        self.mask.fill();
        self.value = value;
        self.state = SurfaceState::Covered;
        self.rng = SmallRng::seed_from_u64(seed);
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    pub fn value(&self) -> TileValue {
        self.value
    }

    pub fn policy(&self) -> &RevealPolicy {
        &self.policy
    }

    pub fn cover_style(&self) -> CoverStyle {
        CoverStyle::for_value(self.value)
    }

    pub fn mask(&self) -> &ScratchMask {
        &self.mask
    }

    pub fn sample_coverage(&self) -> Percent {
        self.mask.sample_coverage()
    }

    /// Starts a gesture. Returns false once the surface is revealed.
    pub fn begin_gesture(&mut self) -> bool {
        if self.state.is_revealed() {
            return false;
        }
        self.state = SurfaceState::Scratching;
        true
    }

    /// Erases one brush stamp at `point` and maybe checks coverage.
    pub fn erase(&mut self, point: Point) -> ScratchOutcome {
        if !self.state.is_scratching() {
            return ScratchOutcome::Ignored;
        }

        self.mask.erase(point, self.policy.brush_radius);

        let coverage = match self.policy.check {
            CoverageCheck::Sampled { rate } => {
                // NaN never samples; release still runs the full check
                let rate = if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 1.0) };
                if self.rng.random_bool(rate) {
                    Some(self.mask.sample_coverage())
                } else {
                    None
                }
            }
            CoverageCheck::Incremental => Some(self.mask.erased_percent()),
        };

        match coverage {
            Some(coverage) if self.policy.is_past_threshold(coverage) => self.mark_revealed(coverage),
            _ => ScratchOutcome::Erased,
        }
    }

    /// Ends a gesture (release or leave) with a check that never skips.
    pub fn end_gesture(&mut self) -> ScratchOutcome {
        match self.state {
            SurfaceState::Scratching | SurfaceState::Released => {
                self.state = SurfaceState::Released;
                let coverage = self.mask.sample_coverage();
                if self.policy.is_past_threshold(coverage) {
                    self.mark_revealed(coverage)
                } else {
                    log::trace!("gesture ended at {:.1}% coverage", coverage);
                    ScratchOutcome::Ignored
                }
            }
            SurfaceState::Covered | SurfaceState::Revealed => ScratchOutcome::Ignored,
        }
    }

    /// Syncs with a tile that was revealed elsewhere. Returns true if the
    /// surface was still covered.
    pub fn force_reveal(&mut self) -> bool {
        if self.state.is_revealed() {
            return false;
        }
        self.state = SurfaceState::Revealed;
        true
    }

    fn mark_revealed(&mut self, coverage: Percent) -> ScratchOutcome {
        log::debug!("tile {} revealed at {:.1}% coverage", self.value, coverage);
        self.state = SurfaceState::Revealed;
        ScratchOutcome::Revealed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: Px = 100;
    const BAND: f64 = 10.0;

    fn surface(check: CoverageCheck, seed: u64) -> ScratchSurface {
        let policy = RevealPolicy {
            brush_radius: BAND,
            check,
            ..Default::default()
        };
        ScratchSurface::new(SIZE, SIZE, 4, policy, seed)
    }

    /// Sweeps a 20 row band centered at `y`, 20% of a 100x100 surface, and
    /// returns the outcome of every stamp.
    fn sweep(surface: &mut ScratchSurface, y: f64) -> Vec<ScratchOutcome> {
        (0..=SIZE)
            .map(|x| surface.erase((x as f64, y)))
            .collect()
    }

    fn first_reveal(outcomes: &[ScratchOutcome]) -> Option<usize> {
        outcomes.iter().position(|outcome| outcome.is_revealed())
    }

    #[test]
    fn erase_outside_gesture_is_ignored() {
        let mut surface = surface(CoverageCheck::Incremental, 0);

        assert_eq!(surface.erase((50.0, 50.0)), ScratchOutcome::Ignored);
        assert_eq!(surface.sample_coverage(), 0.0);
        assert_eq!(surface.end_gesture(), ScratchOutcome::Ignored);
        assert_eq!(surface.state(), SurfaceState::Covered);
    }

    #[test]
    fn forty_percent_is_not_enough() {
        let mut surface = surface(CoverageCheck::Sampled { rate: 1.0 }, 0);

        assert!(surface.begin_gesture());
        sweep(&mut surface, 10.0);
        let outcomes = sweep(&mut surface, 30.0);

        assert_eq!(surface.sample_coverage(), 40.0);
        assert_eq!(first_reveal(&outcomes), None);
        assert_eq!(surface.end_gesture(), ScratchOutcome::Ignored);
        assert_eq!(surface.state(), SurfaceState::Released);
    }

    #[test]
    fn crossing_the_threshold_reveals_once() {
        let mut surface = surface(CoverageCheck::Sampled { rate: 1.0 }, 0);

        surface.begin_gesture();
        sweep(&mut surface, 10.0);
        sweep(&mut surface, 30.0);
        let outcomes = sweep(&mut surface, 50.0);

        assert_eq!(first_reveal(&outcomes), Some(0));
        assert!(outcomes[1..].iter().all(|outcome| *outcome == ScratchOutcome::Ignored));
        assert!(surface.state().is_revealed());
        assert_eq!(surface.end_gesture(), ScratchOutcome::Ignored);
        assert!(!surface.begin_gesture());
    }

    /// One gesture sweeping the whole surface band by band.
    fn scratch_all(surface: &mut ScratchSurface) -> Option<usize> {
        surface.begin_gesture();
        let outcomes: Vec<_> = [10.0, 30.0, 50.0, 70.0, 90.0]
            .into_iter()
            .flat_map(|y| sweep(surface, y))
            .collect();
        first_reveal(&outcomes)
    }

    #[test]
    fn sampled_reveal_is_reproducible() {
        let run = |seed| scratch_all(&mut surface(CoverageCheck::default(), seed));

        let first = run(42);
        assert!(first.is_some());
        assert_eq!(first, run(42));
    }

    #[test]
    fn reset_surface_samples_like_a_fresh_one() {
        let mut reused = surface(CoverageCheck::default(), 42);
        let first_game = scratch_all(&mut reused);
        assert!(first_game.is_some());

        reused.reset(4, 42);
        let fresh = scratch_all(&mut surface(CoverageCheck::default(), 42));

        assert_eq!(scratch_all(&mut reused), fresh);
        assert_eq!(fresh, first_game);
    }

    #[test]
    fn nan_sample_rate_never_samples() {
        let mut surface = surface(CoverageCheck::Sampled { rate: f64::NAN }, 0);

        surface.begin_gesture();
        sweep(&mut surface, 10.0);
        sweep(&mut surface, 30.0);
        let outcomes = sweep(&mut surface, 50.0);

        assert_eq!(first_reveal(&outcomes), None);
        assert_eq!(surface.end_gesture(), ScratchOutcome::Revealed);
    }

    #[test]
    fn release_catches_what_sampling_missed() {
        let mut surface = surface(CoverageCheck::Sampled { rate: 0.0 }, 0);

        surface.begin_gesture();
        sweep(&mut surface, 10.0);
        sweep(&mut surface, 30.0);
        let outcomes = sweep(&mut surface, 50.0);

        assert!(surface.sample_coverage() > 40.0);
        assert_eq!(first_reveal(&outcomes), None);
        assert_eq!(surface.end_gesture(), ScratchOutcome::Revealed);
        assert!(surface.state().is_revealed());
    }

    #[test]
    fn release_just_past_threshold_reveals() {
        let mut surface = surface(CoverageCheck::Sampled { rate: 0.0 }, 0);

        surface.begin_gesture();
        sweep(&mut surface, 10.0);
        sweep(&mut surface, 30.0);
        surface.erase((50.0, 50.0));

        let coverage = surface.sample_coverage();
        assert!(coverage > 40.0 && coverage < 45.0, "coverage {coverage}");
        assert_eq!(surface.end_gesture(), ScratchOutcome::Revealed);
    }

    #[test]
    fn mask_survives_between_gestures() {
        let mut surface = surface(CoverageCheck::Sampled { rate: 0.0 }, 0);

        surface.begin_gesture();
        sweep(&mut surface, 10.0);
        sweep(&mut surface, 30.0);
        assert_eq!(surface.end_gesture(), ScratchOutcome::Ignored);

        // moving without a new gesture does nothing
        assert_eq!(surface.erase((50.0, 50.0)), ScratchOutcome::Ignored);

        surface.begin_gesture();
        surface.erase((50.0, 50.0));
        assert_eq!(surface.end_gesture(), ScratchOutcome::Revealed);
    }

    #[test]
    fn incremental_check_reveals_on_the_crossing_stamp() {
        let mut surface = surface(CoverageCheck::Incremental, 0);

        surface.begin_gesture();
        sweep(&mut surface, 10.0);
        sweep(&mut surface, 30.0);
        assert!(!surface.state().is_revealed());

        assert_eq!(surface.erase((50.0, 50.0)), ScratchOutcome::Revealed);
    }

    #[test]
    fn reset_returns_to_covered() {
        let mut surface = surface(CoverageCheck::Incremental, 0);
        surface.begin_gesture();
        for y in [10.0, 30.0, 50.0] {
            sweep(&mut surface, y);
        }
        assert!(surface.state().is_revealed());

        surface.reset(9, 0);

        assert_eq!(surface.state(), SurfaceState::Covered);
        assert_eq!(surface.sample_coverage(), 0.0);
        assert_eq!(surface.value(), 9);
        assert_eq!(surface.cover_style(), CoverStyle::Pine);
        assert!(surface.begin_gesture());
    }

    #[test]
    fn force_reveal_is_one_shot() {
        let mut surface = surface(CoverageCheck::Incremental, 0);

        assert!(surface.force_reveal());
        assert!(!surface.force_reveal());
        surface.begin_gesture();
        assert_eq!(surface.erase((1.0, 1.0)), ScratchOutcome::Ignored);
    }
}
