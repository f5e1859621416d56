use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum IntervalError {
    #[error("Interval end ({end}) is before its start ({start})")]
    InvertedInterval { start: u32, end: u32 },
}

/// Errors raised while loading annotation records.
///
/// Any of these aborts the load: downstream queries assume the index is complete.
#[derive(Error, Debug)]
pub enum AnnotationError {
    #[error("Can't read file: {0}")]
    FileRead(String),

    #[error("Line {line}: expected at least {expected} fields, found {found}")]
    MissingField {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Line {line}: invalid coordinate '{value}'")]
    InvalidCoordinate { line: usize, value: String },

    #[error("Line {line}: {source}")]
    InvalidInterval {
        line: usize,
        #[source]
        source: IntervalError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
