use nanopub_core::StatementError;
use thiserror::Error;

use crate::reader::FIELD_COUNT;

#[derive(Error, Debug)]
pub enum TsvError {
    /// A non-empty line had fewer than four tab-separated fields.
    #[error("line {line}: expected {} tab-separated fields but found {found}", FIELD_COUNT)]
    MalformedLine { line: usize, found: usize },

    /// The statement parser rejected the statement field.
    #[error("line {line}: invalid statement: {source}")]
    Statement {
        line: usize,
        #[source]
        source: StatementError,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TsvError {
    /// 1-based input line the error refers to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            TsvError::MalformedLine { line, .. } | TsvError::Statement { line, .. } => Some(*line),
            TsvError::Csv(_) | TsvError::Io(_) => None,
        }
    }
}
