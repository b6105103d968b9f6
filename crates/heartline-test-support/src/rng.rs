//! Test RNG: deterministic `DeterministicRng` implementations for tests.

use heartline_core::rng::DeterministicRng;

/// An RNG that always returns `min` from `next_u32_range`. Suitable for
/// tests that do not depend on specific random values.
#[derive(Debug)]
pub struct MockRng;

impl DeterministicRng for MockRng {
    fn next_u32_range(&mut self, min: u32, _max: u32) -> u32 {
        min
    }
}

/// An RNG that replays a predetermined sequence, ignoring the requested
/// range. Panics if the sequence is exhausted. Used in tests that pin which
/// scene is picked or how a queue is shuffled.
#[derive(Debug)]
pub struct SequenceRng {
    values: Vec<u32>,
    index: usize,
}

impl SequenceRng {
    /// Create a new `SequenceRng` with the given values.
    #[must_use]
    pub fn new(values: Vec<u32>) -> Self {
        Self { values, index: 0 }
    }
}

impl DeterministicRng for SequenceRng {
    fn next_u32_range(&mut self, _min: u32, _max: u32) -> u32 {
        let val = self.values[self.index];
        self.index += 1;
        val
    }
}
