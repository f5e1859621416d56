use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use noodles::bam;
use noodles::bgzf;
use noodles::sam;
use ribodep_core::models::Bin;

use crate::blocks::{CigarOp, extract_blocks, is_excessively_clipped, overlaps_sufficiently};
use crate::errors::ScanError;

/// Reference start (0-based) and alignment operations of one mapped read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedRead {
    pub start: u32,
    pub ops: Vec<CigarOp>,
}

/// Anything that can list the mapped reads touching a window.
pub trait ReadSource {
    fn reads_in(&mut self, bin: &Bin) -> Result<Vec<AlignedRead>, ScanError>;
}

///
/// Indexed BAM reader. Each worker opens its own handle.
///
/// Unmapped records and records without a start are skipped. A window on a
/// reference missing from the BAM header yields no reads; any other query
/// failure is an error.
///
pub struct BamReadSource {
    path: PathBuf,
    reader: bam::io::IndexedReader<bgzf::Reader<File>>,
    header: sam::Header,
}

impl BamReadSource {
    pub fn open(path: &Path) -> Result<Self, ScanError> {
        let open_err = |source| ScanError::OpenBam {
            path: path.display().to_string(),
            source,
        };

        let mut reader = bam::io::indexed_reader::Builder::default()
            .build_from_path(path)
            .map_err(open_err)?;
        let header = reader.read_header().map_err(open_err)?;

        Ok(BamReadSource {
            path: path.to_path_buf(),
            reader,
            header,
        })
    }
}

impl ReadSource for BamReadSource {
    fn reads_in(&mut self, bin: &Bin) -> Result<Vec<AlignedRead>, ScanError> {
        let region_str = format!("{}:{}-{}", bin.chr, bin.start + 1, bin.end);
        let region: noodles::core::Region = region_str
            .parse()
            .map_err(|_| ScanError::InvalidRegion(region_str.clone()))?;

        let known = self
            .header
            .reference_sequences()
            .contains_key(bin.chr.as_bytes());
        let header = &self.header;
        let reader = &mut self.reader;

        let Some(query) = query_known_reference(known, &region_str, move || {
            reader.query(header, &region)
        })?
        else {
            debug!(
                "Reference {} not in {}, skipping {}",
                bin.chr,
                self.path.display(),
                region_str
            );
            return Ok(Vec::new());
        };

        let mut reads = Vec::new();
        for result in query {
            let record = result.map_err(ScanError::MalformedRecord)?;

            if record.flags().is_unmapped() {
                continue;
            }

            let start = match record.alignment_start() {
                Some(Ok(pos)) => (pos.get() - 1) as u32,
                Some(Err(err)) => return Err(ScanError::MalformedRecord(err)),
                None => continue,
            };

            let mut ops = Vec::new();
            for op in record.cigar().iter() {
                let op = op.map_err(ScanError::MalformedRecord)?;
                ops.push(CigarOp::new(op.kind().into(), op.len() as u32));
            }

            reads.push(AlignedRead { start, ops });
        }

        Ok(reads)
    }
}

///
/// Run `query` only for a reference the header knows.
///
/// `Ok(None)` when the reference is unknown. Errors from the query itself
/// (stale index, failed seek) are reported against `region`.
///
fn query_known_reference<T, F>(known: bool, region: &str, query: F) -> Result<Option<T>, ScanError>
where
    F: FnOnce() -> io::Result<T>,
{
    if !known {
        return Ok(None);
    }
    query().map(Some).map_err(|source| ScanError::Query {
        region: region.to_string(),
        source,
    })
}

///
/// Count the reads that genuinely cover a window.
///
/// A read is rejected when any of its soft clips is longer than `max_soft_clip`;
/// otherwise it counts when its blocks pass [`overlaps_sufficiently`].
///
pub fn count_valid_reads<S: ReadSource + ?Sized>(
    source: &mut S,
    bin: &Bin,
    max_soft_clip: u32,
    min_fraction: f64,
) -> Result<u64, ScanError> {
    let mut n = 0u64;

    for read in source.reads_in(bin)? {
        let (blocks, soft_clips) = extract_blocks(read.start, &read.ops);
        if is_excessively_clipped(&soft_clips, max_soft_clip) {
            continue;
        }
        if overlaps_sufficiently(bin, &blocks, min_fraction) {
            n += 1;
        }
    }

    Ok(n)
}

/// Number of records in a BAM file, mapped or not.
pub fn total_reads(path: &Path) -> Result<u64, ScanError> {
    let mut reader = bam::io::reader::Builder::default()
        .build_from_path(path)
        .map_err(|source| ScanError::OpenBam {
            path: path.display().to_string(),
            source,
        })?;
    reader.read_header()?;

    let mut n = 0u64;
    for result in reader.records() {
        result.map_err(ScanError::MalformedRecord)?;
        n += 1;
    }

    debug!("{} reads in total in {}", n, path.display());

    Ok(n)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::blocks::CigarOpKind;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::collections::HashMap;

    /// Reads keyed by chromosome; every read on the chromosome is returned for any window.
    #[derive(Default)]
    pub(crate) struct MemoryReadSource {
        pub reads: HashMap<String, Vec<AlignedRead>>,
    }

    impl MemoryReadSource {
        pub(crate) fn with_read(mut self, chrom: &str, start: u32, ops: Vec<CigarOp>) -> Self {
            self.reads
                .entry(chrom.to_string())
                .or_default()
                .push(AlignedRead { start, ops });
            self
        }
    }

    impl ReadSource for MemoryReadSource {
        fn reads_in(&mut self, bin: &Bin) -> Result<Vec<AlignedRead>, ScanError> {
            Ok(self.reads.get(&bin.chr).cloned().unwrap_or_default())
        }
    }

    fn m(len: u32) -> CigarOp {
        CigarOp::new(CigarOpKind::Match, len)
    }

    #[rstest]
    fn test_count_valid_reads() {
        let mut source = MemoryReadSource::default()
            // covers 60% of the window
            .with_read("chr1", 140, vec![m(100)])
            // covers 30%
            .with_read("chr1", 170, vec![m(100)])
            // would pass, but clipped too much
            .with_read(
                "chr1",
                100,
                vec![CigarOp::new(CigarOpKind::SoftClip, 51), m(90)],
            )
            // clip at the limit is fine
            .with_read(
                "chr1",
                100,
                vec![CigarOp::new(CigarOpKind::SoftClip, 50), m(90)],
            );

        let bin = Bin::new("chr1", 100, 200).unwrap();
        assert_eq!(count_valid_reads(&mut source, &bin, 50, 0.5).unwrap(), 2);
    }

    #[rstest]
    fn test_count_on_unknown_chromosome() {
        let mut source = MemoryReadSource::default().with_read("chr1", 100, vec![m(100)]);
        let bin = Bin::new("chr9", 100, 200).unwrap();
        assert_eq!(count_valid_reads(&mut source, &bin, 50, 0.5).unwrap(), 0);
    }

    #[rstest]
    fn test_unknown_reference_is_not_queried() {
        let res: Result<Option<()>, ScanError> =
            query_known_reference(false, "chrUn:1-100", || Err(io::Error::other("unreachable")));
        assert!(matches!(res, Ok(None)));
    }

    #[rstest]
    fn test_query_failure_on_known_reference_is_error() {
        let res: Result<Option<()>, ScanError> = query_known_reference(true, "chr1:1-100", || {
            Err(io::Error::new(io::ErrorKind::UnexpectedEof, "seek past end"))
        });
        match res {
            Err(ScanError::Query { region, source }) => {
                assert_eq!(region, "chr1:1-100");
                assert_eq!(source.kind(), io::ErrorKind::UnexpectedEof);
            }
            other => panic!("expected query error, got {:?}", other),
        }

        let res = query_known_reference(true, "chr1:1-100", || Ok(7));
        assert!(matches!(res, Ok(Some(7))));
    }

    #[rstest]
    fn test_missing_bam_is_open_error() {
        let res = BamReadSource::open(Path::new("/no/such/file.bam"));
        assert!(matches!(res, Err(ScanError::OpenBam { .. })));
    }
}
