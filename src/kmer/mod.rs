//! K-mer counting and the similarity oracle used to accept inexact overlaps.

pub mod counts;
pub mod oracle;

pub use counts::{
    count_shared_between, count_shared_kmers, count_shared_kmers_with, frequency_map, KmerCounts,
};
pub use oracle::{expected_shared_kmers, is_plausible_overlap, SimilarityOracle};
