use std::io::BufRead;
use std::path::Path;

use ribodep_core::models::{Interval, Strand};
use ribodep_core::utils::get_dynamic_reader;
use ribodep_overlaprs::IntervalIndex;

use crate::errors::GuideError;
use crate::genome::Genome;
use crate::sequence::revcomp;

const MIN_FIELDS: usize = 6;

/// A region the guides are meant to target, e.g. one rRNA gene copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntendedRegion {
    pub chrom: String,
    pub start: u32,
    pub end: u32,
    pub strand: Strand,
    pub name: String,
}

impl IntendedRegion {
    /// Sense-strand bases of the region.
    pub fn sequence(&self, genome: &Genome) -> Result<String, GuideError> {
        let bases = genome
            .slice_clamped(&self.chrom, self.start as usize, self.end as usize)
            .ok_or_else(|| GuideError::UnknownChromosome(self.chrom.clone()))?;

        match self.strand {
            Strand::Forward => Ok(bases.to_string()),
            Strand::Reverse => revcomp(bases),
        }
    }
}

fn parse_coordinate(value: &str, line: usize) -> Result<u32, GuideError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| GuideError::MalformedRegion {
            line,
            reason: format!("invalid coordinate '{}'", value),
        })
}

///
/// Parse an intended-regions table.
///
/// The first line is a header. Remaining lines are tab separated
/// `chrom start end strand . name`; lines starting with `#` are ignored and
/// records whose strand is neither `+` nor `-` are skipped.
///
pub fn parse_intended_regions<R: BufRead>(reader: R) -> Result<Vec<IntendedRegion>, GuideError> {
    let mut regions = Vec::new();

    for (idx, line) in reader.lines().enumerate().skip(1) {
        let line = line?;
        let line_number = idx + 1;
        if line.starts_with('#') || line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < MIN_FIELDS {
            return Err(GuideError::MalformedRegion {
                line: line_number,
                reason: format!(
                    "expected at least {} fields, found {}",
                    MIN_FIELDS,
                    fields.len()
                ),
            });
        }

        let strand = match fields[3].trim() {
            "+" => Strand::Forward,
            "-" => Strand::Reverse,
            _ => continue,
        };

        let start = parse_coordinate(fields[1], line_number)?;
        let end = parse_coordinate(fields[2], line_number)?;
        if end < start {
            return Err(GuideError::MalformedRegion {
                line: line_number,
                reason: format!("end ({}) is before start ({})", end, start),
            });
        }

        regions.push(IntendedRegion {
            chrom: fields[0].to_string(),
            start,
            end,
            strand,
            name: fields[5].trim().to_string(),
        });
    }

    Ok(regions)
}

pub fn read_intended_regions(path: &Path) -> Result<Vec<IntendedRegion>, GuideError> {
    let reader = get_dynamic_reader(path).map_err(|e| GuideError::FileRead(format!("{:#}", e)))?;
    parse_intended_regions(reader)
}

/// Index of the intended regions, for off-target classification.
pub fn intended_index(regions: &[IntendedRegion]) -> IntervalIndex {
    let mut index = IntervalIndex::new();
    for region in regions {
        index.insert_interval(
            &region.chrom,
            Interval {
                start: region.start,
                end: region.end,
            },
        );
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ribodep_overlaprs::PointLookup;
    use rstest::*;
    use std::io::Cursor;

    const TABLE: &str = "chrom\tstart\tend\tstrand\t.\tname\n\
chr1\t2\t8\t+\t.\tSSU\n\
# comment\n\
chr1\t0\t4\t-\t.\tLSU\n\
chr1\t10\t20\t.\t.\t5S\n";

    #[rstest]
    fn test_parse_regions_skips_header_and_unstranded() {
        let regions = parse_intended_regions(Cursor::new(TABLE)).unwrap();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].name, "SSU");
        assert_eq!(regions[1].strand, Strand::Reverse);
    }

    #[rstest]
    fn test_region_sequences() {
        let mut genome = Genome::default();
        genome.insert("chr1", "AACCGGTTAA");
        let regions = parse_intended_regions(Cursor::new(TABLE)).unwrap();

        assert_eq!(regions[0].sequence(&genome).unwrap(), "CCGGTT");
        // AACC reverse complemented
        assert_eq!(regions[1].sequence(&genome).unwrap(), "GGTT");
    }

    #[rstest]
    fn test_unknown_chromosome() {
        let genome = Genome::default();
        let regions = parse_intended_regions(Cursor::new(TABLE)).unwrap();
        assert!(matches!(
            regions[0].sequence(&genome),
            Err(GuideError::UnknownChromosome(_))
        ));
    }

    #[rstest]
    fn test_malformed_line_reports_number() {
        let table = "header\nchr1\tx\t8\t+\t.\tSSU\n";
        let err = parse_intended_regions(Cursor::new(table)).unwrap_err();
        assert!(matches!(err, GuideError::MalformedRegion { line: 2, .. }));
    }

    #[rstest]
    fn test_intended_index() {
        let regions = parse_intended_regions(Cursor::new(TABLE)).unwrap();
        let index = intended_index(&regions);
        assert!(index.covers_closed("chr1", 8));
        assert!(!index.covers_closed("chr1", 9));
    }
}
