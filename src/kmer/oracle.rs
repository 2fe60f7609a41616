// src/kmer/oracle.rs
use ahash::AHashMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::AssemblyConfig;
use crate::kmer::counts::count_shared_kmers;
use crate::simulate::{mutate_sequence, random_genome};

/// Monte-Carlo estimate of how many k-mers two truly overlapping sequences of
/// `length` symbols share when one of them carries errors at `error_rate`.
///
/// Every call draws a fresh random pair, so the result is stochastic.
pub fn expected_shared_kmers(rng: &mut impl Rng, length: usize, error_rate: f64, k: usize) -> usize {
    let original = random_genome(rng, length);
    let mutated = mutate_sequence(rng, &original, error_rate);
    count_shared_kmers(&original, &mutated, k)
}

/// True iff `a` and `b` share at least `confidence` times the expected number of
/// k-mers for a sequence of `a`'s length. Zero shared k-mers is never an overlap.
pub fn is_plausible_overlap(
    rng: &mut impl Rng,
    a: &str,
    b: &str,
    k: usize,
    error_rate: f64,
    confidence: f64,
) -> bool {
    let shared = count_shared_kmers(a, b, k);
    if shared == 0 {
        return false;
    }
    shared as f64 >= confidence * expected_shared_kmers(rng, a.len(), error_rate, k) as f64
}

/// Stateful oracle: owns its RNG and, optionally, a per-length baseline cache.
#[derive(Debug, Clone)]
pub struct SimilarityOracle {
    k: usize,
    error_rate: f64,
    seed: u64,
    rng: StdRng,
    baselines: Option<AHashMap<usize, usize>>,
}

impl SimilarityOracle {
    pub fn new(k: usize, error_rate: f64, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(rand::random);
        Self {
            k,
            error_rate,
            seed,
            rng: StdRng::seed_from_u64(seed),
            baselines: None,
        }
    }

    pub fn from_config(config: &AssemblyConfig) -> Self {
        let oracle = Self::new(config.k, config.error_rate, config.seed);
        if config.cache_baseline {
            oracle.with_cached_baseline()
        } else {
            oracle
        }
    }

    /// Compute each length's baseline once and reuse it for later queries.
    pub fn with_cached_baseline(mut self) -> Self {
        self.baselines.get_or_insert_with(AHashMap::new);
        self
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn error_rate(&self) -> f64 {
        self.error_rate
    }

    /// Independent oracle for worker `stream`; cached baselines are shared.
    pub fn fork(&self, stream: u64) -> Self {
        let seed = self
            .seed
            .wrapping_add(stream.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
        Self {
            k: self.k,
            error_rate: self.error_rate,
            seed,
            rng: StdRng::seed_from_u64(seed),
            baselines: self.baselines.clone(),
        }
    }

    pub fn expected_shared(&mut self, length: usize) -> usize {
        let (k, error_rate) = (self.k, self.error_rate);
        match self.baselines.as_mut() {
            Some(cache) => {
                if let Some(&expected) = cache.get(&length) {
                    return expected;
                }
                let expected = expected_shared_kmers(&mut self.rng, length, error_rate, k);
                cache.insert(length, expected);
                expected
            }
            None => expected_shared_kmers(&mut self.rng, length, error_rate, k),
        }
    }

    pub fn is_plausible(&mut self, a: &str, b: &str, confidence: f64) -> bool {
        let shared = count_shared_kmers(a, b, self.k);
        self.accepts_shared(shared, a.len(), confidence)
    }

    /// Decide on an already counted number of shared k-mers between a window of
    /// `length` symbols and its candidate partner.
    pub fn accepts_shared(&mut self, shared: usize, length: usize, confidence: f64) -> bool {
        if shared == 0 {
            return false;
        }
        shared as f64 >= confidence * self.expected_shared(length) as f64
    }
}
