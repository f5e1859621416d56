use std::io;

use thiserror::Error;

use crate::pipeline::Stage;

#[derive(Error, Debug)]
pub enum GuideError {
    #[error("Can't read file: {0}")]
    FileRead(String),

    #[error("Invalid base '{0}'")]
    InvalidBase(char),

    #[error("Invalid PAM pattern '{0}'")]
    InvalidPam(String),

    #[error("Malformed FASTA input: {0}")]
    Fasta(String),

    #[error("Line {line}: {reason}")]
    MalformedRegion { line: usize, reason: String },

    #[error("Chromosome '{0}' is not in the genome")]
    UnknownChromosome(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Malformed lines in the aligner's hit table.
#[derive(Error, Debug)]
pub enum HitParseError {
    #[error("Line {line}: expected at least {expected} fields, found {found}")]
    MissingField {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Line {line}: invalid position '{value}'")]
    InvalidPosition { line: usize, value: String },

    #[error("Line {line}: {reason}")]
    InvalidStrand { line: usize, reason: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PipelineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Duplicate candidate id '{0}'")]
    DuplicateCandidate(String),

    #[error("Pipeline is at stage {found:?}, expected {expected:?}")]
    OutOfOrder { expected: Stage, found: Stage },
}
