//! The pluggable random weight source used by `Network::new`.
//!
//! Modelled as a single-method capability trait rather than an inheritance
//! hierarchy (spec.md §9 design notes): any type that can hand back a
//! nonnegative `f64` on demand qualifies.
use rand::distributions::{Distribution, Uniform};
use rand::rngs::ThreadRng;

pub trait WeightSource {
    /// Returns the next capacity draw. Called exactly once per input edge,
    /// regardless of whether the construction is bidirectional.
    fn next_weight(&mut self) -> f64;
}

/// Default weight source: draws uniformly from `[low, high]` using the
/// thread-local RNG, in the same spirit as the teacher's
/// `gc-random` binary (`rand::thread_rng()` + `Rng::gen`), but producing
/// capacities rather than vertex identifiers.
pub struct UniformWeightSource {
    dist: Uniform<f64>,
    rng: ThreadRng,
}

impl UniformWeightSource {
    pub fn new(low: f64, high: f64) -> UniformWeightSource {
        UniformWeightSource {
            dist: Uniform::new_inclusive(low, high),
            rng: rand::thread_rng(),
        }
    }
}

impl WeightSource for UniformWeightSource {
    fn next_weight(&mut self) -> f64 {
        self.dist.sample(&mut self.rng)
    }
}

/// A deterministic weight source replaying a fixed sequence, one draw per
/// call. Exists for tests and for callers who want reproducible topologies.
pub struct ConstantWeightSource {
    values: Vec<f64>,
    next: usize,
    calls: usize,
}

impl ConstantWeightSource {
    pub fn new(values: Vec<f64>) -> ConstantWeightSource {
        ConstantWeightSource {
            values,
            next: 0,
            calls: 0,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl WeightSource for ConstantWeightSource {
    fn next_weight(&mut self) -> f64 {
        self.calls += 1;
        let v = self.values[self.next % self.values.len()];
        self.next += 1;
        v
    }
}
