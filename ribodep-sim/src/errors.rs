use std::io;

use thiserror::Error;

/// Malformed lines in a SNP table.
#[derive(Error, Debug)]
pub enum SnpParseError {
    #[error("Line {line}: expected at least {expected} fields, found {found}")]
    MissingField {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Line {line}: invalid position '{value}'")]
    InvalidPosition { line: usize, value: String },

    #[error("Line {line}: invalid allele frequency '{value}'")]
    InvalidFrequency { line: usize, value: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Error, Debug, PartialEq)]
pub enum MockConfigError {
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
