use clap::{Args, Parser, Subcommand, ValueEnum};

use readweaver::config::{AssemblyConfig, GraphStrategy};
use readweaver::error::Result;

#[derive(Parser, Debug)]
#[command(name = "readweaver", version, about = "Approximate-overlap de novo read assembler", long_about = None)]
pub struct Cli {
    /// Log debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Greedy seed-and-extend assembly
    Assemble {
        /// Input FASTA(.gz) file
        #[arg(short, long)]
        input: String,

        /// Output contig FASTA(.gz) file
        #[arg(short, long)]
        output: String,

        /// Require identical overlaps instead of the k-mer similarity test
        #[arg(long)]
        exact: bool,

        /// Optional path to write the run summary as JSON
        #[arg(long)]
        summary: Option<String>,

        #[command(flatten)]
        assembly: AssemblyArgs,
    },

    /// Overlap-graph assembly: components and their longest paths
    Graph {
        /// Input FASTA(.gz) file
        #[arg(short, long)]
        input: String,

        /// Output contig FASTA(.gz) file
        #[arg(short, long)]
        output: String,

        /// Edge discovery strategy
        #[arg(long, value_enum)]
        strategy: Option<StrategyArg>,

        /// Optional path to write the overlap graph as GFA
        #[arg(long)]
        gfa: Option<String>,

        /// Optional path to write graph statistics as JSON
        #[arg(long)]
        summary: Option<String>,

        #[command(flatten)]
        assembly: AssemblyArgs,
    },

    /// Generate a random genome and sample reads from it
    Simulate {
        /// Output prefix; writes <prefix>.genome.fa and <prefix>.reads.fa
        #[arg(short, long)]
        output: String,

        /// Genome length
        #[arg(long, default_value_t = 10_000)]
        genome_len: usize,

        /// Shortest sampled read
        #[arg(long, default_value_t = 800)]
        read_min: usize,

        /// Longest sampled read
        #[arg(long, default_value_t = 1_200)]
        read_max: usize,

        /// Average coverage of the genome
        #[arg(long, default_value_t = 10)]
        coverage: usize,

        /// Per-symbol substitution rate applied to sampled reads
        #[arg(long, default_value_t = 0.0)]
        error_rate: f64,

        /// Seed for the random generator
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print read length statistics as JSON
    Stats {
        /// Input FASTA(.gz) file
        #[arg(short, long)]
        input: String,

        /// Drop reads shorter than this first
        #[arg(long)]
        min_read_len: Option<usize>,

        /// Stop after this many valid reads
        #[arg(long)]
        max_reads: Option<usize>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    AllPairs,
    Indexed,
}

impl From<StrategyArg> for GraphStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::AllPairs => GraphStrategy::AllPairs,
            StrategyArg::Indexed => GraphStrategy::Indexed,
        }
    }
}

/// Options shared by both assembly commands. Anything left unset falls back to
/// the JSON config file, then to the built-in defaults.
#[derive(Args, Debug, Clone)]
pub struct AssemblyArgs {
    /// JSON file with an assembly configuration
    #[arg(long)]
    pub config: Option<String>,

    /// Minimum overlap length between two reads
    #[arg(long)]
    pub min_match: Option<usize>,

    /// Length of the prefix/suffix index keys
    #[arg(long)]
    pub key_len: Option<usize>,

    /// K-mer size of the similarity test
    #[arg(short, long)]
    pub k: Option<usize>,

    /// Expected per-symbol error rate of the reads
    #[arg(long)]
    pub error_rate: Option<f64>,

    /// Minimum contig length to report
    #[arg(long)]
    pub min_contig_len: Option<usize>,

    /// Drop reads shorter than this before assembly
    #[arg(long)]
    pub min_read_len: Option<usize>,

    /// Stop after this many valid reads
    #[arg(long)]
    pub max_reads: Option<usize>,

    /// Seed for the Monte-Carlo baselines
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of threads
    #[arg(long, default_value_t = num_cpus::get())]
    pub threads: usize,
}

impl AssemblyArgs {
    /// Resolve the effective configuration and check it.
    pub fn to_config(&self) -> Result<AssemblyConfig> {
        let mut config = match &self.config {
            Some(path) => AssemblyConfig::from_json_file(path)?,
            None => AssemblyConfig::default(),
        };
        if let Some(v) = self.min_match {
            config.min_match_length = v;
        }
        if let Some(v) = self.key_len {
            config.index_key_length = v;
        }
        if let Some(v) = self.k {
            config.k = v;
        }
        if let Some(v) = self.error_rate {
            config.error_rate = v;
        }
        if let Some(v) = self.min_contig_len {
            config.min_contig_length = v;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config.validate()?;
        Ok(config)
    }
}
