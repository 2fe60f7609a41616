pub mod assembler;
pub mod overlap;
pub mod partition;
pub mod stats;
pub mod traverser;
