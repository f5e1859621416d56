use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Failed to open BAM file {path}: {source}")]
    OpenBam {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Invalid query region '{0}'")]
    InvalidRegion(String),

    #[error("Failed to query region {region}: {source}")]
    Query {
        region: String,
        #[source]
        source: io::Error,
    },

    #[error("Malformed alignment record: {0}")]
    MalformedRecord(#[source] io::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Error, Debug, PartialEq)]
pub enum ScanConfigError {
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
