// Error handling utilities
// Author: Gabriel Demetrios Lafis

use std::error::Error;
use std::fmt;

/// Pipeline error type
///
/// Construction errors are raised eagerly for obvious shape problems;
/// everything else surfaces lazily from the terminal call that drives
/// the pipeline.
#[derive(Debug)]
pub enum PipelineError {
    InvalidArgument(String),
    UnknownColumn(String),
    DuplicateIndex(String),
    EmptySequence(String),
    TypeMismatch(String),
    ProducerShape(String),
    IoError(std::io::Error),
    ParseError(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PipelineError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            PipelineError::UnknownColumn(name) => write!(f, "Unknown column: {}", name),
            PipelineError::DuplicateIndex(msg) => write!(f, "Duplicate index: {}", msg),
            PipelineError::EmptySequence(msg) => write!(f, "Empty sequence: {}", msg),
            PipelineError::TypeMismatch(msg) => write!(f, "Type mismatch: {}", msg),
            PipelineError::ProducerShape(msg) => write!(f, "Producer shape: {}", msg),
            PipelineError::IoError(err) => write!(f, "IO error: {}", err),
            PipelineError::ParseError(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl Error for PipelineError {}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::IoError(err)
    }
}

/// Result type alias for PipelineError
pub type PipelineResult<T> = Result<T, PipelineError>;
