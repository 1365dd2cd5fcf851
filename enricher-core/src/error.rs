use enricher_scanner::ScanError;
use std::path::PathBuf;
use thiserror::Error;

/// Failure reported by one of the collaborators an enrichment step calls.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("CSV error: {0}")]
    Csv(csv::Error),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("No columns to parse from file")]
    EmptyCsv,

    #[error("Expected {expected} fields in line {line}, saw {found}")]
    RowLength {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
}

impl From<csv::Error> for SourceError {
    fn from(err: csv::Error) -> Self {
        if let csv::ErrorKind::Utf8 { pos, err: utf8 } = err.kind() {
            let line = pos.as_ref().map(|p| p.line()).unwrap_or(0);
            return SourceError::Encoding(format!("invalid UTF-8 in line {}: {}", line, utf8));
        }
        SourceError::Csv(err)
    }
}

/// Error an enrichment step hands back to its caller instead of defaulting.
#[derive(Error, Debug)]
pub enum EnrichError {
    #[error("Failed to extract text from PDF {}: {source}", .path.display())]
    Pdf {
        path: PathBuf,
        #[source]
        source: SourceError,
    },
}

pub type Result<T> = std::result::Result<T, SourceError>;
