//! Deterministic random number generation for demo data.
//!
//! RULE: seeding never calls a platform RNG. Each kind of record draws from
//! its own stream derived from (seed XOR stream index). Adding a stream
//! never changes the data produced by the existing ones.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// Stable stream assignments. Append only, never reorder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum SeedStream {
    Agents   = 0,
    Clients  = 1,
    Products = 2,
}

pub struct SeedRng {
    inner: Pcg64Mcg,
}

impl SeedRng {
    pub fn new(seed: u64, stream: SeedStream) -> Self {
        let derived = seed ^ (stream as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15);
        Self { inner: Pcg64Mcg::seed_from_u64(derived) }
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a usize in [0, n). `n` must be non-zero.
    pub fn below(&mut self, n: usize) -> usize {
        assert!(n > 0, "n must be > 0");
        (self.inner.next_u64() % n as u64) as usize
    }

    /// Uniform float in [lo, hi).
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len())]
    }

    /// A v4-shaped UUID drawn from this stream, so ids are reproducible.
    pub fn uuid(&mut self) -> uuid::Uuid {
        let mut bytes = [0u8; 16];
        self.inner.fill_bytes(&mut bytes);
        uuid::Builder::from_random_bytes(bytes).into_uuid()
    }
}
