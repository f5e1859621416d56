use std::io::BufRead;
use std::path::Path;
use std::str::FromStr;

use ribodep_core::models::Strand;
use ribodep_core::utils::get_dynamic_reader;

use crate::errors::{GuideError, HitParseError};

const HIT_FIELDS: usize = 4;

/// One alignment of a candidate guide against the genome, as reported by the aligner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitRecord {
    pub candidate_id: String,
    pub strand: Strand,
    pub chrom: String,
    /// 0-based leftmost base of the aligned spacer.
    pub position: u32,
}

fn parse_hit_line(line: &str, line_number: usize) -> Result<HitRecord, HitParseError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < HIT_FIELDS {
        return Err(HitParseError::MissingField {
            line: line_number,
            expected: HIT_FIELDS,
            found: fields.len(),
        });
    }

    let strand = Strand::from_str(fields[1]).map_err(|reason| HitParseError::InvalidStrand {
        line: line_number,
        reason,
    })?;

    let position = fields[3]
        .parse::<u32>()
        .map_err(|_| HitParseError::InvalidPosition {
            line: line_number,
            value: fields[3].to_string(),
        })?;

    Ok(HitRecord {
        candidate_id: fields[0].to_string(),
        strand,
        chrom: fields[2].to_string(),
        position,
    })
}

///
/// Parse a hit table: whitespace separated `candidate_id strand chrom position`,
/// one hit per line. Blank lines are skipped; extra columns are ignored.
///
pub fn parse_hits<R: BufRead>(reader: R) -> Result<Vec<HitRecord>, HitParseError> {
    let mut hits = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        hits.push(parse_hit_line(&line, idx + 1)?);
    }
    Ok(hits)
}

pub fn read_hits(path: &Path) -> anyhow::Result<Vec<HitRecord>> {
    let reader = get_dynamic_reader(path).map_err(|e| GuideError::FileRead(format!("{:#}", e)))?;
    Ok(parse_hits(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::io::Cursor;

    #[rstest]
    fn test_parse_hits() {
        let table = "SSU_1\t+\tchr1\t120\nSSU_1 - chr2 5 extra\n\nLSU_2\t+\tchr1\t0\n";
        let hits = parse_hits(Cursor::new(table)).unwrap();
        assert_eq!(hits.len(), 3);
        assert_eq!(
            hits[1],
            HitRecord {
                candidate_id: "SSU_1".to_string(),
                strand: Strand::Reverse,
                chrom: "chr2".to_string(),
                position: 5,
            }
        );
    }

    #[rstest]
    #[case("SSU_1\t+\tchr1\n", "MissingField")]
    #[case("SSU_1\t+\tchr1\t-3\n", "InvalidPosition")]
    #[case("SSU_1\t.\tchr1\t3\n", "InvalidStrand")]
    fn test_malformed_hits(#[case] table: &str, #[case] kind: &str) {
        let err = parse_hits(Cursor::new(table)).unwrap_err();
        let found = match err {
            HitParseError::MissingField { line: 1, .. } => "MissingField",
            HitParseError::InvalidPosition { line: 1, .. } => "InvalidPosition",
            HitParseError::InvalidStrand { line: 1, .. } => "InvalidStrand",
            _ => "other",
        };
        assert_eq!(found, kind);
    }
}
