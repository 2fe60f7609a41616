//! Pipeline module - end-to-end assembly runs

pub mod assemble;
pub mod graph;

pub use assemble::assemble_greedy;
pub use graph::{assemble_graph, GraphAssembly};
