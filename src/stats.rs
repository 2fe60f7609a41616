use serde::Serialize;
use tracing::info;

/// Length statistics over a collection of reads or contigs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SequenceStats {
    pub count: usize,
    pub min_length: usize,
    pub max_length: usize,
    pub total_length: usize,
    pub average_length: f64,
    pub n50: usize,
}

impl SequenceStats {
    pub fn from_sequences<I, S>(sequences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lengths: Vec<usize> = sequences.into_iter().map(|s| s.as_ref().len()).collect();
        if lengths.is_empty() {
            return Self::default();
        }
        lengths.sort_unstable();

        let total: usize = lengths.iter().sum();
        let count = lengths.len();

        // Calculate N50
        let mut acc = 0;
        let half_total = total / 2;
        let n50 = lengths
            .iter()
            .rev()
            .find(|&&len| {
                acc += len;
                acc >= half_total
            })
            .copied()
            .unwrap_or(0);

        SequenceStats {
            count,
            min_length: lengths[0],
            max_length: lengths[count - 1],
            total_length: total,
            average_length: total as f64 / count as f64,
            n50,
        }
    }
}

/// Drop reads shorter than `min_read_length`, keeping the rest in order.
pub fn discard_short_reads(mut reads: Vec<String>, min_read_length: usize) -> Vec<String> {
    let before = reads.len();
    reads.retain(|r| r.len() >= min_read_length);
    if reads.len() < before {
        info!(
            "Discarded {} reads shorter than {}",
            before - reads.len(),
            min_read_length
        );
    }
    reads
}
