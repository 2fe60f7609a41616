//! Approximate-overlap de novo assembly of DNA reads.
//!
//! Two pipelines share one set of building blocks: a greedy seed-and-extend
//! assembler driven by prefix/suffix indices, and an overlap-graph assembler
//! that resolves one longest path per connected component. Inexact overlaps
//! are accepted through a shared k-mer test calibrated by simulation.

pub mod config;
pub mod error;
pub mod graph;
pub mod index;
pub mod io;
pub mod kmer;
pub mod pipeline;
pub mod simulate;
pub mod stats;

pub use config::{AssemblyConfig, BucketRemoval, GraphStrategy};
pub use error::{AssemblyError, Result};
pub use graph::assembler::{Contig, ExtensionMode, GreedyAssembly, GreedyExtender};
pub use graph::overlap::{Overlap, OverlapGraph};
pub use kmer::SimilarityOracle;
pub use pipeline::{assemble_graph, assemble_greedy, GraphAssembly};
