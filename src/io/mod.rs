//! FASTA input/output, GFA export and JSON summaries.

pub mod fasta;
pub mod gfa;
pub mod summary;

pub use fasta::{read_fasta_reads, write_contigs};
pub use gfa::write_overlap_graph;
pub use summary::write_json;
