use ribodep_core::errors::AnnotationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BinError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Annotation(#[from] AnnotationError),
}

/// Failure of an ordered fan-out run. Partial results are never returned.
#[derive(Error, Debug)]
pub enum DispatchError<E> {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error("No result received for chunk {0}")]
    MissingResult(usize),

    #[error("Worker for chunk {chunk} failed: {source}")]
    Worker {
        chunk: usize,
        #[source]
        source: E,
    },
}
