use std::collections::VecDeque;

use rand::Rng;

/// Source of the two kinds of draws the protocol makes.
pub trait RandomSource {
    /// Uniform draw in `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// Uniform integer in `[0, bound)`. `bound` must be non-zero.
    fn below(&mut self, bound: u32) -> u32;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn unit(&mut self) -> f64 {
        self.random::<f64>()
    }

    fn below(&mut self, bound: u32) -> u32 {
        self.random_range(0..bound)
    }
}

/// Replays a fixed sequence of draws, for reproducing a trace exactly.
///
/// Integer draws are clamped into `[0, bound)`. Once a queue runs dry it keeps
/// returning 0.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    units: VecDeque<f64>,
    integers: VecDeque<u32>,
}

impl ScriptedSource {
    pub fn new(units: Vec<f64>, integers: Vec<u32>) -> Self {
        Self {
            units: units.into(),
            integers: integers.into(),
        }
    }

    pub fn push_integer(&mut self, n: u32) {
        self.integers.push_back(n);
    }

    pub fn is_exhausted(&self) -> bool {
        self.units.is_empty() && self.integers.is_empty()
    }
}

impl RandomSource for ScriptedSource {
    fn unit(&mut self) -> f64 {
        self.units
            .pop_front()
            .map(|r| r.clamp(0.0, 1.0 - f64::EPSILON))
            .unwrap_or(0.0)
    }

    fn below(&mut self, bound: u32) -> u32 {
        let n = self.integers.pop_front().unwrap_or(0);
        n.min(bound.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_rng_draws_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let r = rng.unit();
            assert!((0.0..1.0).contains(&r));
            assert!(rng.below(10) < 10);
        }
    }

    #[test]
    fn test_scripted_replay() {
        let mut source = ScriptedSource::new(vec![0.5, 0.1], vec![3, 42]);
        assert_eq!(source.unit(), 0.5);
        assert_eq!(source.below(10), 3);
        assert_eq!(source.below(10), 9); // clamped
        assert_eq!(source.unit(), 0.1);
        assert!(source.is_exhausted());
        assert_eq!(source.unit(), 0.0);
        assert_eq!(source.below(10), 0);
    }
}
