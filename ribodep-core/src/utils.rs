use std::ffi::OsStr;
use std::fs::File;
use std::io::prelude::*;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;

use crate::consts::{COMMENT_PREFIXES, GZ_EXTENSION};
use crate::errors::AnnotationError;
use crate::models::Region;

///
/// Column layout of an annotation file.
///
/// `Bed` reads `chrom start end` from columns 1-3, `Gtf` reads `chrom` from
/// column 1 and `start`/`end` from columns 4 and 5.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnnotationLayout {
    #[default]
    Bed,
    Gtf,
}

impl AnnotationLayout {
    fn columns(&self) -> (usize, usize, usize) {
        match self {
            AnnotationLayout::Bed => (0, 1, 2),
            AnnotationLayout::Gtf => (0, 3, 4),
        }
    }
}

impl FromStr for AnnotationLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bed" => Ok(AnnotationLayout::Bed),
            "gtf" | "gff" => Ok(AnnotationLayout::Gtf),
            _ => Err(format!("Unknown annotation layout: {}", s)),
        }
    }
}

///
/// Guess the layout from the file name, ignoring a trailing `.gz`.
///
pub fn layout_from_path(path: &Path) -> AnnotationLayout {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let name = name
        .strip_suffix(&format!(".{}", GZ_EXTENSION))
        .unwrap_or(name);

    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .and_then(|e| e.parse().ok())
        .unwrap_or_default()
}

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    let is_gzipped = path.extension() == Some(OsStr::new(GZ_EXTENSION));
    let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    let reader = BufReader::new(file);

    Ok(reader)
}

/// True for blank lines and header/comment lines.
pub fn is_skippable_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || COMMENT_PREFIXES.iter().any(|p| trimmed.starts_with(p))
}

fn parse_coordinate(value: &str, line: usize) -> Result<u32, AnnotationError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| AnnotationError::InvalidCoordinate {
            line,
            value: value.to_string(),
        })
}

///
/// Parse a single annotation line into a [`Region`].
///
/// Fields are separated by any run of whitespace, so tab- and space-delimited
/// records parse alike.
///
/// # Arguments
///
/// - line: the raw line, without the trailing newline
/// - line_number: 1-based line number, reported in errors
/// - layout: which columns hold the coordinates
///
pub fn parse_annotation_line(
    line: &str,
    line_number: usize,
    layout: AnnotationLayout,
) -> Result<Region, AnnotationError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let (chr_col, start_col, end_col) = layout.columns();

    if fields.len() <= end_col {
        return Err(AnnotationError::MissingField {
            line: line_number,
            expected: end_col + 1,
            found: fields.len(),
        });
    }

    let start = parse_coordinate(fields[start_col], line_number)?;
    let end = parse_coordinate(fields[end_col], line_number)?;

    Region::new(fields[chr_col].trim(), start, end).map_err(|source| {
        AnnotationError::InvalidInterval {
            line: line_number,
            source,
        }
    })
}

///
/// Read every record of an annotation file (BED-like or GTF, optionally gzipped).
///
/// Any malformed line fails the whole load.
///
pub fn read_annotation_file(
    path: &Path,
    layout: AnnotationLayout,
) -> Result<Vec<Region>, AnnotationError> {
    let reader =
        get_dynamic_reader(path).map_err(|e| AnnotationError::FileRead(format!("{:#}", e)))?;
    read_annotation_lines(reader, layout)
}

/// Same as [`read_annotation_file`] but over any buffered reader.
pub fn read_annotation_lines<R: BufRead>(
    reader: R,
    layout: AnnotationLayout,
) -> Result<Vec<Region>, AnnotationError> {
    let mut regions = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if is_skippable_line(&line) {
            continue;
        }
        regions.push(parse_annotation_line(&line, idx + 1, layout)?);
    }

    Ok(regions)
}
