// src/config.rs
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AssemblyError, Result};

/// What happens to an index bucket when one of its reads is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BucketRemoval {
    /// Drop the whole bucket, including reads that were never used.
    #[default]
    WholeBucket,
    /// Drop only the consumed read; the bucket is deleted once it is empty.
    SingleRead,
}

/// How the read-overlap graph discovers its edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GraphStrategy {
    /// Oracle comparison of every suffix window against every prefix window.
    #[default]
    AllPairs,
    /// Exact boundary-key lookups, no oracle verification.
    Indexed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyConfig {
    /// Minimum overlap span accepted between two reads.
    pub min_match_length: usize,
    /// Length of the prefix/suffix keys used by the greedy extender.
    pub index_key_length: usize,
    /// K-mer size for similarity estimates.
    pub k: usize,
    /// Per-symbol sequencing error rate assumed by the oracle.
    pub error_rate: f64,
    /// Confidence factor used while extending contigs inexactly.
    pub extension_confidence: f64,
    /// Confidence factor used by the all-pairs graph builder.
    pub graph_confidence: f64,
    /// Contigs shorter than this are discarded.
    pub min_contig_length: usize,
    pub bucket_removal: BucketRemoval,
    pub graph_strategy: GraphStrategy,
    /// Reuse one Monte-Carlo baseline per overlap length instead of resampling.
    pub cache_baseline: bool,
    /// Upper bound on enumerated paths per component during longest-path search.
    pub max_paths_per_component: usize,
    pub seed: Option<u64>,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            min_match_length: 300,
            index_key_length: 15,
            k: 7,
            error_rate: 0.21,
            extension_confidence: 0.9,
            graph_confidence: 0.5,
            min_contig_length: 1000,
            bucket_removal: BucketRemoval::WholeBucket,
            graph_strategy: GraphStrategy::AllPairs,
            cache_baseline: false,
            max_paths_per_component: 100_000,
            seed: None,
        }
    }
}

impl AssemblyConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let config: AssemblyConfig = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    /// Check the scalar parameters before any indexing work starts.
    pub fn validate(&self) -> Result<()> {
        if self.index_key_length == 0 {
            return Err(AssemblyError::invalid_config("index key length must be positive"));
        }
        if self.min_match_length <= self.index_key_length {
            return Err(AssemblyError::invalid_config(format!(
                "min match length ({}) must be bigger than index key length ({})",
                self.min_match_length, self.index_key_length
            )));
        }
        if self.k == 0 {
            return Err(AssemblyError::invalid_config("k-mer size must be positive"));
        }
        if !(0.0..1.0).contains(&self.error_rate) {
            return Err(AssemblyError::invalid_config(format!(
                "error rate {} is outside [0, 1)",
                self.error_rate
            )));
        }
        for (name, value) in [
            ("extension confidence", self.extension_confidence),
            ("graph confidence", self.graph_confidence),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(AssemblyError::invalid_config(format!(
                    "{} {} is outside (0, 1]",
                    name, value
                )));
            }
        }
        if self.max_paths_per_component == 0 {
            return Err(AssemblyError::invalid_config("max paths per component must be positive"));
        }
        Ok(())
    }
}
