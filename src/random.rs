//! Random Module
//!
//! Minimal-standard Lehmer generator (Park–Miller). Fast and reproducible,
//! good enough for skiplist heights and test workloads. Not cryptographic.

/// 2^31 - 1
const M: u32 = 2_147_483_647;
const A: u64 = 16_807;

/// Pseudo-random generator over `[1, 2^31 - 2]`
#[derive(Debug, Clone)]
pub struct Random {
    seed: u32,
}

impl Random {
    /// Create a generator. Seeds that would make the sequence degenerate
    /// (0 and 2^31 - 1 after masking) are replaced with 1.
    pub fn new(seed: u32) -> Self {
        let mut seed = seed & M;
        if seed == 0 || seed == M {
            seed = 1;
        }
        Self { seed }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> u32 {
        // seed = (seed * A) % M, using ((x >> 31) + (x & M)) to avoid division
        let product = u64::from(self.seed) * A;
        let mut seed = ((product >> 31) + (product & u64::from(M))) as u32;
        if seed > M {
            seed -= M;
        }
        self.seed = seed;
        seed
    }

    /// Uniform value in `[0, n - 1]`. Requires `n > 0`.
    pub fn uniform(&mut self, n: u32) -> u32 {
        debug_assert!(n > 0);
        self.next() % n
    }

    /// True roughly once every `n` calls. Requires `n > 0`.
    pub fn one_in(&mut self, n: u32) -> bool {
        debug_assert!(n > 0);
        self.next() % n == 0
    }

    /// Pick a base in `[0, max_log]`, then a value in `[0, 2^base - 1]`.
    /// Favours small numbers exponentially.
    pub fn skewed(&mut self, max_log: u32) -> u32 {
        debug_assert!(max_log < 32);
        let base = self.uniform(max_log + 1);
        self.uniform(1 << base)
    }
}
