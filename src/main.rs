mod cli_main;

use std::process;
use std::time::Instant;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::ThreadPoolBuilder;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use cli_main::{AssemblyArgs, Cli, Commands};
use readweaver::error::Result;
use readweaver::graph::assembler::ExtensionMode;
use readweaver::io::fasta::{read_fasta_reads, write_contigs, write_sequences};
use readweaver::io::{write_json, write_overlap_graph};
use readweaver::pipeline::{assemble_graph, assemble_greedy};
use readweaver::simulate::{mutate_sequence, random_genome, simulate_reads};
use readweaver::stats::{discard_short_reads, SequenceStats};

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else if cli.quiet {
        tracing::Level::WARN
    } else {
        tracing::Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Setting tracing default failed: {}", e);
    }

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_threads(threads: usize) {
    if let Err(e) = ThreadPoolBuilder::new().num_threads(threads).build_global() {
        warn!("Could not configure {} threads: {}", threads, e);
    }
}

/// Load reads and apply the length filter shared by the assembly commands.
fn load_reads(input: &str, args: &AssemblyArgs) -> Result<Vec<String>> {
    let reads = read_fasta_reads(input, args.max_reads)?;
    Ok(match args.min_read_len {
        Some(min) => discard_short_reads(reads, min),
        None => reads,
    })
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Assemble { input, output, exact, summary, assembly } => {
            init_threads(assembly.threads);
            let config = assembly.to_config()?;
            let start = Instant::now();

            let reads = load_reads(&input, &assembly)?;
            let mode = if exact { ExtensionMode::Exact } else { ExtensionMode::Inexact };
            let result = assemble_greedy(&reads, &config, mode)?;
            write_contigs(&output, &result.contigs)?;

            if let Some(path) = summary {
                write_json(&path, &result)?;
            }
            info!("Assembly completed in {:.2}s", start.elapsed().as_secs_f32());
        }

        Commands::Graph { input, output, strategy, gfa, summary, assembly } => {
            init_threads(assembly.threads);
            let mut config = assembly.to_config()?;
            if let Some(strategy) = strategy {
                config.graph_strategy = strategy.into();
            }
            let start = Instant::now();

            let reads = load_reads(&input, &assembly)?;
            let result = assemble_graph(&reads, &config)?;
            write_contigs(&output, &result.contigs)?;

            if let Some(path) = gfa {
                write_overlap_graph(&path, &result.graph, &result.longest_paths)?;
            }
            let stats = result.stats();
            info!(
                "Graph: {} nodes, {} edges, {} components, longest path {} reads",
                stats.nodes, stats.edges, stats.components, stats.longest_path_reads
            );
            if let Some(path) = summary {
                write_json(&path, &stats)?;
            }
            info!("Graph assembly completed in {:.2}s", start.elapsed().as_secs_f32());
        }

        Commands::Simulate { output, genome_len, read_min, read_max, coverage, error_rate, seed } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let genome = random_genome(&mut rng, genome_len);
            let reads: Vec<String> = simulate_reads(&mut rng, &genome, read_min, read_max, coverage)
                .iter()
                .map(|read| mutate_sequence(&mut rng, read, error_rate))
                .collect();

            let genome_path = format!("{}.genome.fa", output);
            let reads_path = format!("{}.reads.fa", output);
            write_sequences(&genome_path, "genome", &[genome])?;
            write_sequences(&reads_path, "read", &reads)?;
            info!(
                "Simulated {} reads over a {} bp genome into {} and {}",
                reads.len(),
                genome_len,
                genome_path,
                reads_path
            );
        }

        Commands::Stats { input, min_read_len, max_reads } => {
            let mut reads = read_fasta_reads(&input, max_reads)?;
            if let Some(min) = min_read_len {
                reads = discard_short_reads(reads, min);
            }
            let stats = SequenceStats::from_sequences(&reads);
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}
