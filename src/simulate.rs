// src/simulate.rs
//! Synthetic genomes and reads for baselines, tests and the `simulate` command.

use ahash::AHashSet;
use rand::distributions::Uniform;
use rand::Rng;

pub const DNA_SYMBOLS: [u8; 4] = [b'A', b'C', b'G', b'T'];

/// Draw one symbol from {A, C, G, T} with equal probability.
pub fn random_symbol(rng: &mut impl Rng) -> u8 {
    DNA_SYMBOLS[rng.sample(Uniform::from(0..4usize))]
}

/// Random DNA string of the given length.
pub fn random_genome(rng: &mut impl Rng, length: usize) -> String {
    let dist = Uniform::from(0..4usize);
    (0..length)
        .map(|_| DNA_SYMBOLS[rng.sample(dist)] as char)
        .collect()
}

/// Mutate a symbol with probability `error_rate`. A mutated symbol is always
/// different from the original, chosen uniformly among the other three.
pub fn mutate_symbol(rng: &mut impl Rng, symbol: u8, error_rate: f64) -> u8 {
    if rng.gen::<f64>() >= error_rate {
        return symbol;
    }
    match DNA_SYMBOLS.iter().position(|&s| s == symbol) {
        Some(idx) => DNA_SYMBOLS[(idx + rng.gen_range(1..4)) % 4],
        None => random_symbol(rng),
    }
}

pub fn mutate_sequence(rng: &mut impl Rng, sequence: &str, error_rate: f64) -> String {
    sequence
        .bytes()
        .map(|b| mutate_symbol(rng, b, error_rate) as char)
        .collect()
}

/// All length-`k` substrings of `genome`, in positional order.
pub fn kmer_composition(genome: &str, k: usize) -> Vec<String> {
    if k == 0 || genome.len() < k {
        return Vec::new();
    }
    (0..=genome.len() - k)
        .map(|i| genome[i..i + k].to_string())
        .collect()
}

/// Sample reads of length `min_len..=max_len` from random positions of `genome`.
///
/// The number of draws is `coverage * genome_len / average_read_len`; reads that
/// are sampled more than once are kept only once, in first-seen order.
pub fn simulate_reads(
    rng: &mut impl Rng,
    genome: &str,
    min_len: usize,
    max_len: usize,
    coverage: usize,
) -> Vec<String> {
    let n = genome.len();
    let max_len = max_len.min(n);
    if min_len == 0 || min_len > max_len {
        return Vec::new();
    }

    let average = (min_len + max_len) / 2;
    let trials = (coverage as f64 * n as f64 / average as f64) as usize;

    let mut seen = AHashSet::with_capacity(trials);
    let mut reads = Vec::new();
    for _ in 0..trials {
        let read_len = rng.gen_range(min_len..=max_len);
        let start = rng.gen_range(0..=n - read_len);
        let read = &genome[start..start + read_len];
        if seen.insert(read) {
            reads.push(read.to_string());
        }
    }
    reads
}
