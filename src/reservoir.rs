//! Single-pass reservoir sampling (Algorithm R)
//!
//! Decides, online and without knowing the stream length in advance, which
//! arrival occupies which of `capacity` reservoir slots. At every point in
//! the stream each arrival seen so far has had equal probability of
//! occupying any given slot.
//!
//! # Decision Table
//!
//! | Phase | Condition | Outcome |
//! |-------|-----------|---------|
//! | Fill | `seen < capacity` | `Some(seen)` — sequential slot assignment |
//! | Steady, replace | `k < capacity` for uniform `k` in `[0, seen]` | `Some(k)` |
//! | Steady, discard | `k >= capacity` | `None` |
//!
//! The steady-state draw gives the `seen`-th arrival (1-indexed after the
//! increment) a replacement probability of `capacity / seen`, the invariant
//! that makes the final reservoir a uniform sample of the whole stream.
//!
//! # Reference
//!
//! Vitter, J. S. (1985). "Random Sampling with a Reservoir."
//! ACM Transactions on Mathematical Software, 11(1).

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Reservoir slot allocator over an unbounded arrival stream
///
/// Holds no samples itself — it only hands out slot indices. Not safe for
/// unsynchronized concurrent use: callers that share one sampler across
/// threads must serialize `next_slot` (the recorder wraps it in a mutex).
pub struct ReservoirSampler {
    /// Number of reservoir slots (fixed at construction)
    capacity: usize,
    /// Total arrivals observed, including discards
    seen: u64,
    /// Randomness source for the steady-state draw (injectable for tests)
    rng: Box<dyn RngCore + Send>,
}

impl ReservoirSampler {
    /// Create a sampler with entropy-seeded randomness
    ///
    /// # Panics
    ///
    /// Panics if capacity is 0.
    pub fn new(capacity: usize) -> Self {
        Self::with_rng(capacity, Box::new(StdRng::from_entropy()))
    }

    /// Create a sampler with a deterministic seed (test support)
    pub fn with_seed(capacity: usize, seed: u64) -> Self {
        Self::with_rng(capacity, Box::new(StdRng::seed_from_u64(seed)))
    }

    /// Create a sampler with an explicit randomness source
    ///
    /// # Panics
    ///
    /// Panics if capacity is 0.
    pub fn with_rng(capacity: usize, rng: Box<dyn RngCore + Send>) -> Self {
        assert!(capacity > 0, "Reservoir capacity must be > 0");
        ReservoirSampler {
            capacity,
            seen: 0,
            rng,
        }
    }

    /// Get the reservoir capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get the number of arrivals observed so far
    pub fn seen(&self) -> u64 {
        self.seen
    }

    /// Decide the slot for the next arrival
    ///
    /// # Returns
    ///
    /// `Some(slot)` if this arrival should be kept (write into `slot`,
    /// replacing whatever was there), `None` if it should be discarded.
    /// Every returned index lies in `[0, capacity)`.
    ///
    /// # Algorithm
    ///
    /// 1. Fill phase: the first `capacity` arrivals take slots `0..capacity`
    ///    in order — no discards while the reservoir is filling.
    /// 2. Steady state: draw `k` uniformly from `[0, seen]` inclusive; keep
    ///    the arrival in slot `k` when `k < capacity`, discard otherwise.
    ///
    /// The arrival counter advances on every call regardless of outcome.
    pub fn next_slot(&mut self) -> Option<usize> {
        let arrival = self.seen;
        self.seen += 1;

        // Fill phase: sequential assignment
        if arrival < self.capacity as u64 {
            return Some(arrival as usize);
        }

        // Steady state: replace with probability capacity / (arrival + 1)
        let k = self.rng.gen_range(0..=arrival);
        if k < self.capacity as u64 {
            Some(k as usize)
        } else {
            None
        }
    }
}

impl std::fmt::Debug for ReservoirSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReservoirSampler")
            .field("capacity", &self.capacity)
            .field("seen", &self.seen)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test 1: Fill phase returns sequential slots with no discards
    #[test]
    fn test_fill_phase_determinism() {
        let mut sampler = ReservoirSampler::with_seed(8, 42);
        for expected in 0..8 {
            assert_eq!(sampler.next_slot(), Some(expected));
        }
        assert_eq!(sampler.seen(), 8);
    }

    // Test 2: Post-fill results stay within [0, capacity)
    #[test]
    fn test_post_fill_bounds() {
        let mut sampler = ReservoirSampler::with_seed(4, 7);
        for _ in 0..4 {
            sampler.next_slot();
        }
        for _ in 0..10_000 {
            if let Some(slot) = sampler.next_slot() {
                assert!(slot < 4, "slot {} out of range", slot);
            }
        }
    }

    // Test 3: Arrival counter advances on every call, discard or not
    #[test]
    fn test_counter_counts_discards() {
        let mut sampler = ReservoirSampler::with_seed(2, 99);
        for _ in 0..500 {
            sampler.next_slot();
        }
        assert_eq!(sampler.seen(), 500);
    }

    // Test 4: Identical seeds produce identical decision sequences
    #[test]
    fn test_seeded_determinism() {
        let mut a = ReservoirSampler::with_seed(5, 1234);
        let mut b = ReservoirSampler::with_seed(5, 1234);
        for _ in 0..1000 {
            assert_eq!(a.next_slot(), b.next_slot());
        }
    }

    // Test 5: Capacity accessor
    #[test]
    fn test_capacity() {
        let sampler = ReservoirSampler::with_seed(32, 0);
        assert_eq!(sampler.capacity(), 32);
        assert_eq!(sampler.seen(), 0);
    }

    // Test 6: Zero capacity is a construction error
    #[test]
    #[should_panic(expected = "capacity must be > 0")]
    fn test_zero_capacity_panics() {
        let _ = ReservoirSampler::with_seed(0, 0);
    }

    // Test 7: Steady state discards do happen for long streams
    #[test]
    fn test_discards_occur() {
        let mut sampler = ReservoirSampler::with_seed(2, 5);
        let mut discards = 0;
        for _ in 0..1000 {
            if sampler.next_slot().is_none() {
                discards += 1;
            }
        }
        assert!(discards > 0, "expected discards in a long stream");
    }
}
