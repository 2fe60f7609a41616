use std::time::Instant;

use tracing::info;

use crate::config::AssemblyConfig;
use crate::error::Result;
use crate::graph::assembler::{ExtensionMode, GreedyAssembly, GreedyExtender};
use crate::stats::SequenceStats;

/// Run the greedy seed-and-extend assembler over `reads`.
///
/// Configuration and read lengths are checked before any index is built.
pub fn assemble_greedy(reads: &[String], config: &AssemblyConfig, mode: ExtensionMode) -> Result<GreedyAssembly> {
    let start = Instant::now();
    info!("Starting {:?} greedy assembly of {} reads", mode, reads.len());

    let mut extender = GreedyExtender::new(reads, config, mode)?;
    let assembly = extender.assemble(config.min_contig_length);

    let stats = SequenceStats::from_sequences(assembly.contigs.iter().map(|c| c.sequence.as_str()));
    info!(
        "Greedy assembly finished in {:.2}s: {} contigs from {} seeds (N50 {}, longest {})",
        start.elapsed().as_secs_f32(),
        assembly.contigs.len(),
        assembly.seeds_used,
        stats.n50,
        stats.max_length
    );
    Ok(assembly)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AssemblyError;
    use crate::simulate::{kmer_composition, random_genome};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_exact_pipeline_rebuilds_genome() {
        let mut rng = StdRng::seed_from_u64(101);
        let genome = random_genome(&mut rng, 600);
        let reads = kmer_composition(&genome, 60);
        let config = AssemblyConfig {
            min_match_length: 50,
            index_key_length: 20,
            min_contig_length: 100,
            ..AssemblyConfig::default()
        };

        let assembly = assemble_greedy(&reads, &config, ExtensionMode::Exact).unwrap();
        assert_eq!(assembly.contigs.len(), 1);
        assert_eq!(assembly.contigs[0].sequence, genome);
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let config = AssemblyConfig::default();
        assert!(matches!(
            assemble_greedy(&[], &config, ExtensionMode::Inexact),
            Err(AssemblyError::EmptyInput)
        ));
    }
}
