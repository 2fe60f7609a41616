// src/graph/assembler.rs
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{AssemblyConfig, BucketRemoval};
use crate::error::{AssemblyError, Result};
use crate::index::{IndexSide, OverlapIndex};
use crate::io::fasta::validate_alphabet;
use crate::kmer::SimilarityOracle;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contig {
    pub id: usize,
    pub sequence: String,
    /// Ids of the merged reads, left to right.
    pub read_path: Vec<usize>,
}

impl Contig {
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// How a candidate overlap found through the index is verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtensionMode {
    /// The overlapping regions must be identical.
    Exact,
    /// The overlapping regions must pass the similarity oracle.
    #[default]
    Inexact,
}

struct OverlapCheck {
    mode: ExtensionMode,
    confidence: f64,
    oracle: SimilarityOracle,
}

impl OverlapCheck {
    fn accepts(&mut self, ours: &str, theirs: &str) -> bool {
        match self.mode {
            ExtensionMode::Exact => ours == theirs,
            ExtensionMode::Inexact => self.oracle.is_plausible(ours, theirs, self.confidence),
        }
    }
}

/// Result of a full greedy run over every seed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GreedyAssembly {
    pub contigs: Vec<Contig>,
    pub seeds_used: usize,
    pub discarded: usize,
}

/// Greedy seed-and-extend assembler over a prefix and a suffix index.
///
/// Reads are consumed from both indices as they are merged, so each run of
/// [`GreedyExtender::assemble`] drains the indices.
pub struct GreedyExtender<'r> {
    reads: &'r [String],
    prefix_index: OverlapIndex<'r>,
    suffix_index: OverlapIndex<'r>,
    min_match_length: usize,
    key_len: usize,
    removal: BucketRemoval,
    check: OverlapCheck,
}

impl<'r> GreedyExtender<'r> {
    /// Validate the inputs and build both indices.
    pub fn new(reads: &'r [String], config: &AssemblyConfig, mode: ExtensionMode) -> Result<Self> {
        if reads.is_empty() {
            return Err(AssemblyError::EmptyInput);
        }
        config.validate()?;
        validate_alphabet(reads)?;

        let prefix_index = OverlapIndex::build_prefix(reads, config.index_key_length)?;
        let suffix_index = OverlapIndex::build_suffix(reads, config.index_key_length)?;

        Ok(Self {
            reads,
            prefix_index,
            suffix_index,
            min_match_length: config.min_match_length,
            key_len: config.index_key_length,
            removal: config.bucket_removal,
            check: OverlapCheck {
                mode,
                confidence: config.extension_confidence,
                oracle: SimilarityOracle::from_config(config),
            },
        })
    }

    pub fn prefix_index(&self) -> &OverlapIndex<'r> {
        &self.prefix_index
    }

    pub fn suffix_index(&self) -> &OverlapIndex<'r> {
        &self.suffix_index
    }

    fn consume(&mut self, id: usize) {
        let read = self.reads[id].as_str();
        let prefix = IndexSide::Prefix.key_of(read, self.key_len);
        let suffix = IndexSide::Suffix.key_of(read, self.key_len);
        self.prefix_index.consume(prefix, id, self.removal);
        self.suffix_index.consume(suffix, id, self.removal);
    }

    /// Extend `seed` to the right through the prefix index.
    /// The returned sequence starts with the seed.
    pub fn extend_right(&mut self, seed: usize) -> (String, Vec<usize>) {
        let reads = self.reads;
        let mut tails: Vec<&'r str> = Vec::new();
        let mut path = vec![seed];
        let mut current = seed;

        'extending: loop {
            let read = reads[current].as_str();
            let n = read.len();
            for j in 1..=n.saturating_sub(self.min_match_length) {
                let overlap = n - j;
                let key = &read[j..j + self.key_len];
                let found = self.prefix_index.lookup(key).iter().copied().find(|&id| {
                    let candidate = reads[id].as_str();
                    candidate.len() > overlap && self.check.accepts(&read[j..], &candidate[..overlap])
                });

                if let Some(next) = found {
                    tails.push(&reads[next][overlap..]);
                    path.push(next);
                    self.consume(next);
                    current = next;
                    continue 'extending;
                }
            }
            break;
        }

        let mut contig = reads[seed].clone();
        for tail in tails {
            contig.push_str(tail);
        }
        debug!("Right extension of read {} merged {} reads", seed, path.len() - 1);
        (contig, path)
    }

    /// Extend `seed` to the left through the suffix index.
    /// The returned sequence ends with the seed.
    pub fn extend_left(&mut self, seed: usize) -> (String, Vec<usize>) {
        let reads = self.reads;
        let mut heads: Vec<&'r str> = Vec::new();
        let mut path = vec![seed];
        let mut current = seed;

        'extending: loop {
            let read = reads[current].as_str();
            let n = read.len();
            for j in 1..=n.saturating_sub(self.min_match_length) {
                let overlap = n - j;
                let key = &read[overlap - self.key_len..overlap];
                let found = self.suffix_index.lookup(key).iter().copied().find(|&id| {
                    let candidate = reads[id].as_str();
                    candidate.len() > overlap
                        && self.check.accepts(&read[..overlap], &candidate[candidate.len() - overlap..])
                });

                if let Some(prev) = found {
                    let candidate = reads[prev].as_str();
                    heads.push(&candidate[..candidate.len() - overlap]);
                    path.push(prev);
                    self.consume(prev);
                    current = prev;
                    continue 'extending;
                }
            }
            break;
        }

        let total: usize = heads.iter().map(|h| h.len()).sum::<usize>() + reads[seed].len();
        let mut contig = String::with_capacity(total);
        for head in heads.iter().rev() {
            contig.push_str(head);
        }
        contig.push_str(&reads[seed]);
        path.reverse();
        debug!("Left extension of read {} merged {} reads", seed, path.len() - 1);
        (contig, path)
    }

    /// Build one contig around `seed`, consuming the seed and every merged read.
    pub fn build_contig(&mut self, seed: usize) -> (String, Vec<usize>) {
        self.consume(seed);
        let seed_len = self.reads[seed].len();

        let (right, right_path) = self.extend_right(seed);
        let (mut contig, mut path) = self.extend_left(seed);

        contig.push_str(&right[seed_len..]);
        path.extend_from_slice(&right_path[1..]);
        (contig, path)
    }

    /// Next read, in id order from `cursor`, that is still in the prefix index.
    fn next_seed(&self, cursor: &mut usize) -> Option<usize> {
        while *cursor < self.reads.len() {
            let id = *cursor;
            *cursor += 1;
            let key = IndexSide::Prefix.key_of(&self.reads[id], self.key_len);
            if self.prefix_index.contains(key, id) {
                return Some(id);
            }
        }
        None
    }

    /// Seed contigs until the prefix index is empty, keeping those of at least
    /// `min_contig_length` symbols.
    pub fn assemble(&mut self, min_contig_length: usize) -> GreedyAssembly {
        let mut result = GreedyAssembly::default();
        let mut cursor = 0;

        while !self.prefix_index.is_empty() {
            let Some(seed) = self.next_seed(&mut cursor) else {
                break;
            };
            result.seeds_used += 1;

            let (sequence, read_path) = self.build_contig(seed);
            if sequence.len() >= min_contig_length {
                result.contigs.push(Contig {
                    id: result.contigs.len(),
                    sequence,
                    read_path,
                });
                info!(
                    "We have generated {} contigs; prefix index is down to {} keys",
                    result.contigs.len(),
                    self.prefix_index.len()
                );
            } else {
                result.discarded += 1;
                debug!(
                    "Discarding contig of length {} seeded at read {} (min {})",
                    sequence.len(),
                    seed,
                    min_contig_length
                );
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulate::{kmer_composition, random_genome};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn exact_config(min_match_length: usize, index_key_length: usize) -> AssemblyConfig {
        AssemblyConfig {
            min_match_length,
            index_key_length,
            min_contig_length: 0,
            seed: Some(1),
            ..AssemblyConfig::default()
        }
    }

    #[test]
    fn test_right_extension_merges_chain() {
        let reads: Vec<String> = ["ACGTACGGTTCA", "TACGGTTCAGGA", "GTTCAGGATCCA"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let config = exact_config(6, 4);
        let mut extender = GreedyExtender::new(&reads, &config, ExtensionMode::Exact).unwrap();

        let (contig, path) = extender.build_contig(0);
        assert_eq!(contig, "ACGTACGGTTCAGGATCCA");
        assert_eq!(path, vec![0, 1, 2]);
        assert!(extender.prefix_index().is_empty());
    }

    #[test]
    fn test_left_extension_merges_chain() {
        let reads: Vec<String> = ["GTTCAGGATCCA", "TACGGTTCAGGA", "ACGTACGGTTCA"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let config = exact_config(6, 4);
        let mut extender = GreedyExtender::new(&reads, &config, ExtensionMode::Exact).unwrap();

        let (contig, path) = extender.build_contig(0);
        assert_eq!(contig, "ACGTACGGTTCAGGATCCA");
        assert_eq!(path, vec![2, 1, 0]);
    }

    #[test]
    fn test_perfect_kmer_coverage_rebuilds_genome() {
        let mut rng = StdRng::seed_from_u64(2024);
        let genome = random_genome(&mut rng, 1_000);
        let reads = kmer_composition(&genome, 50);
        let config = exact_config(40, 20);

        let mut extender = GreedyExtender::new(&reads, &config, ExtensionMode::Exact).unwrap();
        let result = extender.assemble(100);

        assert_eq!(result.contigs.len(), 1);
        assert_eq!(result.contigs[0].sequence, genome);
        assert_eq!(result.contigs[0].read_path.len(), reads.len());
    }

    #[test]
    fn test_short_contigs_are_discarded() {
        let reads: Vec<String> = ["AAAACCCCGGGG", "TTTTGGGGCCCC"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let config = exact_config(6, 4);
        let mut extender = GreedyExtender::new(&reads, &config, ExtensionMode::Exact).unwrap();
        let result = extender.assemble(13);

        assert!(result.contigs.is_empty());
        assert_eq!(result.seeds_used, 2);
        assert_eq!(result.discarded, 2);
    }

    #[test]
    fn test_invalid_configuration_is_rejected_before_indexing() {
        let reads = vec!["ACG".to_string()];
        let config = exact_config(10, 10);
        match GreedyExtender::new(&reads, &config, ExtensionMode::Exact) {
            Err(AssemblyError::InvalidConfiguration { .. }) => {}
            Err(e) => panic!("unexpected error {}", e),
            Ok(_) => panic!("expected an error"),
        }
    }

    #[test]
    fn test_bucket_policy_decides_fate_of_key_siblings() {
        // reads 1 and 2 share the prefix key "TACG"; only read 1 extends read 0
        let reads: Vec<String> = ["ACGTACGGTTCA", "TACGGTTCAGGA", "TACGCCCCCCCC"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let whole = AssemblyConfig {
            bucket_removal: BucketRemoval::WholeBucket,
            ..exact_config(6, 4)
        };
        let result = GreedyExtender::new(&reads, &whole, ExtensionMode::Exact)
            .unwrap()
            .assemble(0);
        assert_eq!(result.seeds_used, 1);
        assert_eq!(result.contigs.len(), 1);
        assert_eq!(result.contigs[0].sequence, "ACGTACGGTTCAGGA");
        assert_eq!(result.contigs[0].read_path, vec![0, 1]);

        let single = AssemblyConfig {
            bucket_removal: BucketRemoval::SingleRead,
            ..exact_config(6, 4)
        };
        let result = GreedyExtender::new(&reads, &single, ExtensionMode::Exact)
            .unwrap()
            .assemble(0);
        assert_eq!(result.seeds_used, 2);
        assert_eq!(result.contigs.len(), 2);
        assert_eq!(result.contigs[0].sequence, "ACGTACGGTTCAGGA");
        assert_eq!(result.contigs[1].sequence, reads[2]);
        assert_eq!(result.contigs[1].read_path, vec![2]);
    }

    #[test]
    fn test_multibyte_read_fails_instead_of_panicking() {
        let reads = vec!["ÅCGTACGTACGTACGTACGTAC".to_string()];
        assert!(matches!(
            GreedyExtender::new(&reads, &exact_config(8, 4), ExtensionMode::Exact),
            Err(AssemblyError::InvalidRead { .. })
        ));
    }

    #[test]
    fn test_empty_input() {
        let reads: Vec<String> = Vec::new();
        assert!(matches!(
            GreedyExtender::new(&reads, &AssemblyConfig::default(), ExtensionMode::Exact),
            Err(AssemblyError::EmptyInput)
        ));
    }

    #[test]
    fn test_inexact_extension_tolerates_errors() {
        let mut rng = StdRng::seed_from_u64(77);
        let genome = random_genome(&mut rng, 400);
        let first = genome[..300].to_string();
        let mut second: Vec<u8> = genome[100..].as_bytes().to_vec();
        // one substitution in the overlap, outside the index key at offset 100
        second[150] = if second[150] == b'A' { b'C' } else { b'A' };
        let second = String::from_utf8(second).unwrap();

        let reads = vec![first, second];
        let config = AssemblyConfig {
            min_match_length: 150,
            index_key_length: 12,
            k: 7,
            error_rate: 0.01,
            min_contig_length: 0,
            cache_baseline: true,
            seed: Some(5),
            ..AssemblyConfig::default()
        };

        let mut exact = GreedyExtender::new(&reads, &config, ExtensionMode::Exact).unwrap();
        assert_eq!(exact.build_contig(0).1, vec![0]);

        let mut inexact = GreedyExtender::new(&reads, &config, ExtensionMode::Inexact).unwrap();
        let (contig, path) = inexact.build_contig(0);
        assert_eq!(path, vec![0, 1]);
        assert_eq!(contig.len(), 400);
    }
}
