use std::io::{BufRead, Write};
use std::path::Path;

use fxhash::FxHashMap as HashMap;
use log::debug;
use ribodep_core::utils::get_dynamic_reader;
use seq_io::fasta::{Reader, Record};

use crate::errors::GuideError;

/// One FASTA record: name (first token of the header) and sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    pub name: String,
    pub sequence: String,
}

///
/// Read every record of a FASTA file (optionally gzipped), in file order.
///
/// Sequences must be ASCII.
///
pub fn read_fasta(path: &Path) -> Result<Vec<FastaRecord>, GuideError> {
    let reader = get_dynamic_reader(path).map_err(|e| GuideError::FileRead(format!("{:#}", e)))?;
    read_fasta_from(reader)
}

pub fn read_fasta_from<R: BufRead>(reader: R) -> Result<Vec<FastaRecord>, GuideError> {
    let mut fasta_reader = Reader::new(reader);
    let mut records = Vec::new();

    while let Some(record) = fasta_reader.next() {
        let record = record.map_err(|e| GuideError::Fasta(e.to_string()))?;
        let head =
            std::str::from_utf8(record.head()).map_err(|e| GuideError::Fasta(e.to_string()))?;
        let name = head.split_whitespace().next().unwrap_or_default().to_string();

        let mut sequence = Vec::new();
        for line in record.seq_lines() {
            sequence.extend_from_slice(line);
        }
        if !sequence.is_ascii() {
            return Err(GuideError::Fasta(format!(
                "record '{}' has non-ASCII bases",
                name
            )));
        }
        let sequence =
            String::from_utf8(sequence).map_err(|e| GuideError::Fasta(e.to_string()))?;

        records.push(FastaRecord { name, sequence });
    }

    Ok(records)
}

/// Write `>id\nsequence\n` for every pair.
pub fn write_fasta<'a, W, I>(writer: &mut W, records: I) -> std::io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    for (id, seq) in records {
        writeln!(writer, ">{}\n{}", id, seq)?;
    }
    Ok(())
}

///
/// Reference sequences keyed by chromosome, uppercased.
///
/// Record order of the source file is kept for callers that walk the genome.
///
#[derive(Debug, Clone, Default)]
pub struct Genome {
    names: Vec<String>,
    sequences: HashMap<String, String>,
}

impl Genome {
    pub fn from_fasta(path: &Path) -> Result<Self, GuideError> {
        let genome = Genome::from_records(read_fasta(path)?);
        debug!(
            "Loaded {} sequences from {}",
            genome.names.len(),
            path.display()
        );
        Ok(genome)
    }

    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = FastaRecord>,
    {
        let mut genome = Genome::default();
        for record in records {
            genome.insert(&record.name, &record.sequence);
        }
        genome
    }

    /// Add or replace a sequence.
    pub fn insert(&mut self, name: &str, sequence: &str) {
        if self
            .sequences
            .insert(name.to_string(), sequence.to_uppercase())
            .is_none()
        {
            self.names.push(name.to_string());
        }
    }

    pub fn get(&self, chrom: &str) -> Option<&str> {
        self.sequences.get(chrom).map(|s| s.as_str())
    }

    ///
    /// Bases `[start, end)` of a chromosome.
    ///
    /// `None` for unknown chromosomes or windows that do not lie entirely
    /// within the sequence.
    ///
    pub fn slice(&self, chrom: &str, start: usize, end: usize) -> Option<&str> {
        self.get(chrom).and_then(|s| s.get(start..end))
    }

    ///
    /// Like [`Genome::slice`] but clamps the window to the sequence.
    ///
    /// `None` for unknown chromosomes or a window that splits a multi-byte
    /// character of a sequence inserted directly.
    ///
    pub fn slice_clamped(&self, chrom: &str, start: usize, end: usize) -> Option<&str> {
        self.get(chrom).and_then(|s| {
            let end = end.min(s.len());
            let start = start.min(end);
            s.get(start..end)
        })
    }

    /// `(name, sequence)` in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names
            .iter()
            .filter_map(|n| self.sequences.get(n).map(|s| (n.as_str(), s.as_str())))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
