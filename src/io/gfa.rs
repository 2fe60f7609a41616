// src/io/gfa.rs
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::graph::overlap::OverlapGraph;
use crate::graph::traverser::LongestPath;

fn segment_name(id: usize) -> String {
    format!("read_{}", id)
}

pub struct GfaWriter<W: Write> {
    writer: W,
}

impl GfaWriter<BufWriter<File>> {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> GfaWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_header(&mut self) -> Result<()> {
        writeln!(self.writer, "H\tVN:Z:1.0")?;
        Ok(())
    }

    /// One segment per read.
    pub fn write_segments(&mut self, graph: &OverlapGraph<'_>) -> Result<()> {
        for (id, read) in graph.reads().iter().enumerate() {
            writeln!(self.writer, "S\t{}\t{}", segment_name(id), read)?;
        }
        Ok(())
    }

    /// One forward-strand link per overlap edge.
    pub fn write_links(&mut self, graph: &OverlapGraph<'_>) -> Result<()> {
        for (from, to, overlap) in graph.edges() {
            writeln!(
                self.writer,
                "L\t{}\t+\t{}\t+\t{}M",
                segment_name(from),
                segment_name(to),
                overlap.length
            )?;
        }
        Ok(())
    }

    /// One path line per longest path; overlaps are listed per step.
    pub fn write_paths(&mut self, graph: &OverlapGraph<'_>, paths: &[LongestPath]) -> Result<()> {
        for (i, path) in paths.iter().enumerate().filter(|(_, p)| !p.nodes.is_empty()) {
            let segments = path
                .nodes
                .iter()
                .map(|&id| format!("{}+", segment_name(id)))
                .collect::<Vec<_>>()
                .join(",");
            let overlaps = if path.nodes.len() < 2 {
                "*".to_string()
            } else {
                path.nodes
                    .windows(2)
                    .map(|w| match graph.edge(w[0], w[1]) {
                        Some(o) => format!("{}M", o.length),
                        None => "*".to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(",")
            };
            writeln!(self.writer, "P\tpath_{}\t{}\t{}", i + 1, segments, overlaps)?;
        }
        Ok(())
    }

    pub fn into_inner(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Export the overlap graph and its longest paths as GFA 1.0.
pub fn write_overlap_graph<P: AsRef<Path>>(
    path: P,
    graph: &OverlapGraph<'_>,
    paths: &[LongestPath],
) -> Result<()> {
    let mut gfa = GfaWriter::create(path.as_ref())?;
    gfa.write_header()?;
    gfa.write_segments(graph)?;
    gfa.write_links(graph)?;
    gfa.write_paths(graph, paths)?;
    gfa.into_inner()?;
    info!(
        "Wrote GFA with {} segments and {} links to {}",
        graph.node_count(),
        graph.edge_count(),
        path.as_ref().display()
    );
    Ok(())
}
