// src/kmer/counts.rs
use ahash::AHashMap;

/// Occurrence count of every length-k substring of one sequence.
pub type KmerCounts<'a> = AHashMap<&'a str, u32>;

/// Number of k-mers in a sequence of length `len`, zero when `k` does not fit.
pub fn total_kmers(len: usize, k: usize) -> usize {
    if k == 0 || len < k {
        0
    } else {
        len - k + 1
    }
}

/// Build the k-mer frequency map of `seq`. Empty when `k` is zero or longer than `seq`.
pub fn frequency_map(seq: &str, k: usize) -> KmerCounts<'_> {
    let n = total_kmers(seq.len(), k);
    let mut counts = AHashMap::with_capacity(n);
    for i in 0..n {
        *counts.entry(&seq[i..i + k]).or_insert(0) += 1;
    }
    counts
}

/// Size of the multiset intersection of the k-mers of `a` and `b`.
pub fn count_shared_kmers(a: &str, b: &str, k: usize) -> usize {
    let counts_a = frequency_map(a, k);
    count_shared_kmers_with(&counts_a, b, k)
}

/// Same as [`count_shared_kmers`] with the first frequency map already built.
pub fn count_shared_kmers_with(counts_a: &KmerCounts<'_>, b: &str, k: usize) -> usize {
    if counts_a.is_empty() {
        return 0;
    }
    count_shared_between(counts_a, &frequency_map(b, k))
}

/// Multiset intersection size of two prebuilt frequency maps.
pub fn count_shared_between(counts_a: &KmerCounts<'_>, counts_b: &KmerCounts<'_>) -> usize {
    counts_a
        .iter()
        .map(|(kmer, &count_a)| count_a.min(counts_b.get(kmer).copied().unwrap_or(0)) as usize)
        .sum()
}
