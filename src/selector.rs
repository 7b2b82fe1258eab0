//! Random pick over ban-filtered candidates
//!
//! [`select`] does not touch the network or any session state, so it can be
//! checked directly against literal slices. Randomness is injected through
//! [`RandomSource`]; production code uses [`ThreadRandom`], tests use
//! [`SequenceRandom`] or a closure.

use rand::RngExt;

/// Source of uniform floats in `[0, 1)`
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;
}

/// Non-seeded thread-local generator
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_f64(&mut self) -> f64 {
        rand::rng().random::<f64>()
    }
}

/// Replays a fixed sequence of values, wrapping around at the end
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    values: Vec<f64>,
    position: usize,
}

impl SequenceRandom {
    /// An empty sequence always yields `0.0`.
    #[must_use]
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            position: 0,
        }
    }
}

impl RandomSource for SequenceRandom {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.position % self.values.len()];
        self.position += 1;
        value
    }
}

impl<F> RandomSource for F
where
    F: FnMut() -> f64,
{
    fn next_f64(&mut self) -> f64 {
        self()
    }
}

/// Maps a float in `[0, 1)` onto `[0, len)`. Out-of-range input is clamped.
fn scale_index(value: f64, len: usize) -> usize {
    let index = (value * len as f64).floor();
    if index.is_nan() || index < 0.0 {
        0
    } else {
        (index as usize).min(len - 1)
    }
}

/// Pick one candidate uniformly among those for which `is_banned` is false.
///
/// Returns `None` when nothing survives the filter.
pub fn select<'a, T, F, R>(candidates: &'a [T], is_banned: F, rng: &mut R) -> Option<&'a T>
where
    F: Fn(&T) -> bool,
    R: RandomSource + ?Sized,
{
    let survivors: Vec<&T> = candidates.iter().filter(|c| !is_banned(*c)).collect();
    if survivors.is_empty() {
        return None;
    }
    let index = scale_index(rng.next_f64(), survivors.len());
    Some(survivors[index])
}
