//! Deterministic random number generation.
//!
//! Every pass draws from its own named stream derived from one master seed,
//! so reordering draws inside one pass never perturbs another pass, and a
//! fixed seed reproduces the exact same grid.

use std::collections::HashMap;

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub struct RngManager {
    master: ChaCha8Rng,
    streams: HashMap<String, ChaCha8Rng>,
}

impl RngManager {
    pub fn new(seed: u64) -> Self {
        Self {
            master: ChaCha8Rng::seed_from_u64(seed),
            streams: HashMap::new(),
        }
    }

    /// Get or lazily derive the stream for a named pass.
    pub fn stream(&mut self, name: &str) -> SystemRng<'_> {
        let master = &mut self.master;
        let entry = self.streams.entry(name.to_string()).or_insert_with(|| {
            let mut seed_bytes = [0u8; 32];
            master.fill_bytes(&mut seed_bytes);
            let mut seed_u64 = [0u8; 8];
            seed_u64.copy_from_slice(&seed_bytes[..8]);
            ChaCha8Rng::seed_from_u64(u64::from_le_bytes(seed_u64))
        });
        SystemRng { inner: entry }
    }
}

pub struct SystemRng<'a> {
    inner: &'a mut ChaCha8Rng,
}

impl<'a> RngCore for SystemRng<'a> {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}

/// Helpers for the draw shapes the growth heuristics use everywhere.
pub trait RngExt {
    /// Uniform integer in `[0, bound)`; returns 0 when `bound` is 0.
    fn draw(&mut self, bound: u32) -> u32;
    /// True with the given probability.
    fn chance(&mut self, probability: f32) -> bool;
}

impl<R: Rng> RngExt for R {
    fn draw(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            0
        } else {
            self.gen_range(0..bound)
        }
    }

    fn chance(&mut self, probability: f32) -> bool {
        self.gen::<f32>() < probability
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream_values() {
        let mut a = RngManager::new(42);
        let mut b = RngManager::new(42);

        let va: f32 = a.stream("growth").gen();
        let vb: f32 = b.stream("growth").gen();
        assert_eq!(va, vb, "same seed should produce same values");
    }

    #[test]
    fn different_streams_are_independent() {
        let mut manager = RngManager::new(42);

        let v1: f32 = manager.stream("growth").gen();
        let v2: f32 = manager.stream("decorate").gen();
        assert_ne!(v1, v2);

        // draining one stream must not disturb the other
        let mut a = RngManager::new(7);
        let mut b = RngManager::new(7);
        let _ = a.stream("growth");
        let _ = b.stream("growth");
        for _ in 0..100 {
            let _: u64 = b.stream("growth").gen();
        }
        let va: f32 = a.stream("decorate").gen();
        let vb: f32 = b.stream("decorate").gen();
        assert_eq!(va, vb);
    }

    #[test]
    fn draw_handles_zero_bound() {
        let mut manager = RngManager::new(1);
        let mut stream = manager.stream("seed");
        assert_eq!(stream.draw(0), 0);
        for _ in 0..50 {
            assert!(stream.draw(5) < 5);
        }
    }
}
