use std::collections::HashMap;
use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::LazyLock;

use anyhow::Context;
use log::{debug, info};
use regex::Regex;
use ribodep_core::models::Interval;
use ribodep_core::utils::get_dynamic_reader;
use ribodep_overlaprs::{IntervalIndex, PointLookup};

use crate::consts::DEFAULT_FREQUENCY_CUTOFF;
use crate::errors::SnpParseError;

const SNP_FIELDS: usize = 5;

/// `<copies><bases>`, e.g. `2AT`, as written for multi-allelic repeats.
pub(crate) static MULTI_ALLELE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)([ATCG]+)").expect("static pattern"));

/// One allele observed at a position.
#[derive(Debug, Clone, PartialEq)]
pub struct SnpInfo {
    pub reference: String,
    pub alt: String,
    pub freq: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnpRecord {
    pub chrom: String,
    pub pos: u32,
    pub info: SnpInfo,
}

/// True when the alt allele repeats a motif more than once.
pub fn is_ambiguous_alt(alt: &str) -> bool {
    match MULTI_ALLELE.captures(alt) {
        Some(caps) => caps[1].parse::<u64>().map_or(true, |copies| copies > 1),
        None => false,
    }
}

///
/// Parse one `chrom pos ref alt freq` line (whitespace separated).
///
pub fn parse_snp_line(line: &str, line_number: usize) -> Result<SnpRecord, SnpParseError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < SNP_FIELDS {
        return Err(SnpParseError::MissingField {
            line: line_number,
            expected: SNP_FIELDS,
            found: fields.len(),
        });
    }

    let pos = fields[1]
        .parse::<u32>()
        .map_err(|_| SnpParseError::InvalidPosition {
            line: line_number,
            value: fields[1].to_string(),
        })?;
    let freq = fields[4]
        .parse::<f64>()
        .map_err(|_| SnpParseError::InvalidFrequency {
            line: line_number,
            value: fields[4].to_string(),
        })?;

    Ok(SnpRecord {
        chrom: fields[0].to_string(),
        pos,
        info: SnpInfo {
            reference: fields[2].to_string(),
            alt: fields[3].to_string(),
            freq,
        },
    })
}

///
/// Copy SNP lines usable for simulation from `reader` to `writer`.
///
/// A line is kept when its allele frequency lies within `[cutoff, 1 - cutoff]`,
/// its alt allele is not an ambiguous repeat and its position falls strictly
/// inside an interval (see [`PointLookup::contains_point`]). Kept lines are
/// written unchanged. Returns the number of kept lines.
///
pub fn filter_snps<R, W, L>(
    reader: R,
    writer: &mut W,
    intervals: &L,
    cutoff: f64,
) -> Result<usize, SnpParseError>
where
    R: BufRead,
    W: Write,
    L: PointLookup + ?Sized,
{
    let mut kept = 0;
    let mut total = 0;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        total += 1;

        let record = parse_snp_line(&line, idx + 1)?;
        let freq = record.info.freq;
        if freq < cutoff || freq > 1.0 - cutoff {
            continue;
        }
        if is_ambiguous_alt(&record.info.alt) {
            continue;
        }
        if intervals.contains_point(&record.chrom, record.pos) {
            writeln!(writer, "{}", line)?;
            kept += 1;
        }
    }

    info!("Kept {} of {} SNPs", kept, total);
    Ok(kept)
}

/// [`filter_snps`] with the default frequency cutoff.
pub fn filter_snps_default<R, W, L>(
    reader: R,
    writer: &mut W,
    intervals: &L,
) -> Result<usize, SnpParseError>
where
    R: BufRead,
    W: Write,
    L: PointLookup + ?Sized,
{
    filter_snps(reader, writer, intervals, DEFAULT_FREQUENCY_CUTOFF)
}

///
/// SNP alleles keyed by position, with a point index for window lookups.
///
#[derive(Debug, Default)]
pub struct SnpDb {
    alleles: HashMap<(String, u32), Vec<SnpInfo>>,
    positions: IntervalIndex,
}

impl SnpDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: SnpRecord) {
        self.positions
            .insert_interval(&record.chrom, Interval::point(record.pos));
        self.alleles
            .entry((record.chrom, record.pos))
            .or_default()
            .push(record.info);
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, SnpParseError> {
        let mut db = SnpDb::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            db.insert(parse_snp_line(&line, idx + 1)?);
        }
        Ok(db)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let reader = get_dynamic_reader(path)?;
        let db = SnpDb::from_reader(reader)
            .with_context(|| format!("Failed to load SNPs from {}", path.display()))?;
        debug!("Loaded {} SNP positions from {}", db.len(), path.display());
        Ok(db)
    }

    /// Number of distinct positions.
    pub fn len(&self) -> usize {
        self.alleles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alleles.is_empty()
    }

    ///
    /// Positions strictly between `start` and `end`, in order. A position listed
    /// on several lines is returned once per line.
    ///
    pub fn snps_in_region(&self, chrom: &str, start: u32, end: u32) -> Vec<u32> {
        self.positions
            .overlapping(chrom, start, end)
            .into_iter()
            .map(|iv| iv.start)
            .collect()
    }

    pub fn alleles(&self, chrom: &str, pos: u32) -> &[SnpInfo] {
        self.alleles
            .get(&(chrom.to_string(), pos))
            .map(|v| v.as_slice())
            .unwrap_or_default()
    }
}
