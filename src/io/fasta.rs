// src/io/fasta.rs
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use ahash::AHashSet;
use bio::io::fasta;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use tracing::{debug, info};

use crate::error::{AssemblyError, Result};
use crate::graph::assembler::Contig;

fn is_gzip(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

/// Open a FASTA file for reading, handles gzipped files automatically
pub fn open_fasta<P: AsRef<Path>>(path: P) -> Result<Box<dyn BufRead>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    if is_gzip(path) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// True iff `sequence` is non-empty and made only of uppercase A, C, G, T.
pub fn is_valid_dna(sequence: &[u8]) -> bool {
    !sequence.is_empty() && sequence.iter().all(|b| matches!(b, b'A' | b'C' | b'G' | b'T'))
}

/// Fail with `InvalidRead` on the first read that is not a DNA string over
/// {A, C, G, T}. Runs before any index is built.
pub fn validate_alphabet(reads: &[String]) -> Result<()> {
    let Some(id) = reads.iter().position(|r| !is_valid_dna(r.as_bytes())) else {
        return Ok(());
    };
    let reason = match reads[id].chars().find(|c| !matches!(c, 'A' | 'C' | 'G' | 'T')) {
        Some(symbol) => format!("symbol {:?} is outside ACGT", symbol),
        None => "empty sequence".to_string(),
    };
    Err(AssemblyError::InvalidRead {
        record: format!("read {}", id),
        reason,
    })
}

/// Collect distinct reads from a FASTA file, in file order.
///
/// Records containing anything other than A, C, G, T are skipped. Reading stops
/// once `max_reads` valid records have been seen.
pub fn read_fasta_reads<P: AsRef<Path>>(path: P, max_reads: Option<usize>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let reader = fasta::Reader::from_bufread(open_fasta(path)?);

    let mut seen = AHashSet::new();
    let mut reads = Vec::new();
    let mut accepted = 0usize;
    let mut skipped = 0usize;

    for record in reader.records() {
        if max_reads.is_some_and(|max| accepted >= max) {
            break;
        }
        let record = record?;
        let seq = record.seq();
        if !is_valid_dna(seq) {
            skipped += 1;
            debug!("Skipping record {}: not a DNA string over ACGT", record.id());
            continue;
        }

        accepted += 1;
        if accepted % 20_000 == 0 {
            info!("Processed {} reads", accepted);
        }
        let read: String = seq.iter().map(|&b| char::from(b)).collect();
        if seen.insert(read.clone()) {
            reads.push(read);
        }
    }

    info!(
        "Loaded {} distinct reads from {} ({} records skipped)",
        reads.len(),
        path.display(),
        skipped
    );
    Ok(reads)
}

pub enum FastaWriter {
    Plain(BufWriter<File>),
    Compressed(BufWriter<GzEncoder<File>>),
}

impl FastaWriter {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)?;
        if is_gzip(path) {
            let encoder = GzEncoder::new(file, Compression::default());
            Ok(FastaWriter::Compressed(BufWriter::new(encoder)))
        } else {
            Ok(FastaWriter::Plain(BufWriter::new(file)))
        }
    }

    fn inner(&mut self) -> &mut dyn Write {
        match self {
            FastaWriter::Plain(writer) => writer,
            FastaWriter::Compressed(writer) => writer,
        }
    }

    pub fn write_record(&mut self, header: &str, sequence: &str) -> Result<()> {
        let writer = self.inner();
        writeln!(writer, ">{}", header)?;
        writeln!(writer, "{}", sequence)?;
        Ok(())
    }

    pub fn write_contig(&mut self, contig: &Contig) -> Result<()> {
        let header = format!("contig_{} len={}", contig.id + 1, contig.len());
        self.write_record(&header, &contig.sequence)
    }

    /// Flush buffered output and, for gzip, write the trailer.
    pub fn finish(self) -> Result<()> {
        match self {
            FastaWriter::Plain(mut writer) => writer.flush()?,
            FastaWriter::Compressed(writer) => {
                let encoder = writer.into_inner().map_err(|e| e.into_error())?;
                encoder.finish()?;
            }
        }
        Ok(())
    }
}

/// Write contigs as `>contig_<n> len=<len>` records, numbered from 1.
pub fn write_contigs<P: AsRef<Path>>(path: P, contigs: &[Contig]) -> Result<()> {
    let mut writer = FastaWriter::create(path.as_ref())?;
    for contig in contigs {
        writer.write_contig(contig)?;
    }
    writer.finish()?;
    info!("Wrote {} contigs to {}", contigs.len(), path.as_ref().display());
    Ok(())
}

/// Write plain sequences with generated headers `<prefix>_<n>`, numbered from 1.
pub fn write_sequences<P: AsRef<Path>>(path: P, prefix: &str, sequences: &[String]) -> Result<()> {
    let mut writer = FastaWriter::create(path)?;
    for (i, seq) in sequences.iter().enumerate() {
        writer.write_record(&format!("{}_{}", prefix, i + 1), seq)?;
    }
    writer.finish()
}
