use rand::rngs::StdRng;
use rand::SeedableRng;
use readweaver::config::{AssemblyConfig, GraphStrategy};
use readweaver::error::AssemblyError;
use readweaver::graph::assembler::{ExtensionMode, GreedyExtender};
use readweaver::io::fasta::{read_fasta_reads, write_contigs};
use readweaver::io::write_overlap_graph;
use readweaver::pipeline::{assemble_graph, assemble_greedy};
use readweaver::simulate::{kmer_composition, random_genome};
use tempfile::tempdir;

#[test]
fn test_greedy_reconstructs_genome_from_perfect_coverage() {
    let mut rng = StdRng::seed_from_u64(2024);
    let genome = random_genome(&mut rng, 1000);
    let reads = kmer_composition(&genome, 50);
    let config = AssemblyConfig {
        min_match_length: 40,
        index_key_length: 20,
        min_contig_length: 500,
        ..AssemblyConfig::default()
    };

    let assembly = assemble_greedy(&reads, &config, ExtensionMode::Exact).unwrap();
    assert_eq!(assembly.contigs.len(), 1);
    assert_eq!(assembly.contigs[0].sequence, genome);
    assert_eq!(assembly.contigs[0].read_path.len(), reads.len());
}

#[test]
fn test_invalid_configuration_builds_no_index() {
    let reads = vec!["ACGTACGTACGTACGTACGT".to_string()];
    let config = AssemblyConfig {
        min_match_length: 8,
        index_key_length: 8,
        ..AssemblyConfig::default()
    };
    assert!(matches!(
        GreedyExtender::new(&reads, &config, ExtensionMode::Inexact),
        Err(AssemblyError::InvalidConfiguration { .. })
    ));
}

#[test]
fn test_read_shorter_than_key_is_rejected() {
    let reads = vec!["ACGTACGTACGT".to_string(), "ACG".to_string()];
    let config = AssemblyConfig {
        min_match_length: 8,
        index_key_length: 5,
        ..AssemblyConfig::default()
    };
    assert!(matches!(
        assemble_greedy(&reads, &config, ExtensionMode::Exact),
        Err(AssemblyError::InputTooShort { read_id: 1, length: 3, required: 5 })
    ));
}

#[test]
fn test_reads_outside_dna_alphabet_fail_in_both_pipelines() {
    let config = AssemblyConfig {
        min_match_length: 8,
        index_key_length: 4,
        ..AssemblyConfig::default()
    };
    let multibyte = vec!["ÅCGTACGTACGTACGTACGTAC".to_string()];
    let with_n = vec!["ACGTACGTACGT".to_string(), "ACGTNCGTACGT".to_string()];

    for reads in [&multibyte, &with_n] {
        for mode in [ExtensionMode::Exact, ExtensionMode::Inexact] {
            assert!(matches!(
                assemble_greedy(reads, &config, mode),
                Err(AssemblyError::InvalidRead { .. })
            ));
        }
        for strategy in [GraphStrategy::AllPairs, GraphStrategy::Indexed] {
            let config = AssemblyConfig { graph_strategy: strategy, ..config.clone() };
            assert!(matches!(
                assemble_graph(reads, &config),
                Err(AssemblyError::InvalidRead { .. })
            ));
        }
    }
}

#[test]
fn test_graph_pipeline_end_to_end() {
    let dir = tempdir().unwrap();
    let mut rng = StdRng::seed_from_u64(99);
    let genome = random_genome(&mut rng, 2_000);
    let reads: Vec<String> = (0..19).map(|i| genome[i * 100..i * 100 + 200].to_string()).collect();

    let config = AssemblyConfig {
        min_match_length: 100,
        index_key_length: 15,
        min_contig_length: 1_000,
        graph_strategy: GraphStrategy::Indexed,
        ..AssemblyConfig::default()
    };
    let assembly = assemble_graph(&reads, &config).unwrap();
    assert_eq!(assembly.contigs.len(), 1);
    assert_eq!(assembly.contigs[0].sequence, genome);

    let contigs_path = dir.path().join("contigs.fa");
    let gfa_path = dir.path().join("graph.gfa");
    write_contigs(&contigs_path, &assembly.contigs).unwrap();
    write_overlap_graph(&gfa_path, &assembly.graph, &assembly.longest_paths).unwrap();

    let reloaded = read_fasta_reads(&contigs_path, None).unwrap();
    assert_eq!(reloaded, vec![genome]);
    let gfa = std::fs::read_to_string(&gfa_path).unwrap();
    assert_eq!(gfa.lines().filter(|l| l.starts_with("P\t")).count(), 1);
}

#[test]
fn test_all_pairs_graph_is_seeded_and_reproducible() {
    let mut rng = StdRng::seed_from_u64(5);
    let genome = random_genome(&mut rng, 1_500);
    let reads: Vec<String> = (0..4).map(|i| genome[i * 300..i * 300 + 600].to_string()).collect();
    let config = AssemblyConfig {
        min_match_length: 300,
        index_key_length: 15,
        error_rate: 0.01,
        min_contig_length: 0,
        seed: Some(17),
        ..AssemblyConfig::default()
    };

    let first = assemble_graph(&reads, &config).unwrap();
    let second = assemble_graph(&reads, &config).unwrap();
    let edges = |a: &readweaver::GraphAssembly<'_>| a.graph.edges().collect::<Vec<_>>();
    assert_eq!(edges(&first), edges(&second));
    for i in 0..reads.len() - 1 {
        assert!(first.graph.has_edge(i, i + 1));
    }
    assert_eq!(first.longest_paths[0].nodes, vec![0, 1, 2, 3]);
}
