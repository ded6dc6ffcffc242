use csv::Error as CsvError;
use std::{fmt, io};

#[derive(Debug)]
pub enum ReadError {
    Io(io::Error),
    Csv(CsvError),
    /// A row that could not be deserialized into the expected record,
    /// usually because a required column is missing.
    Malformed { line: u64, reason: String },
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::Io(err) => write!(f, "I/O error: {}", err),
            ReadError::Csv(err) => write!(f, "CSV error: {}", err),
            ReadError::Malformed { line, reason } => {
                write!(f, "malformed row at line {}: {}", line, reason)
            }
        }
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReadError::Io(err) => Some(err),
            ReadError::Csv(err) => Some(err),
            ReadError::Malformed { .. } => None,
        }
    }
}

impl From<io::Error> for ReadError {
    fn from(err: io::Error) -> Self {
        ReadError::Io(err)
    }
}

impl From<CsvError> for ReadError {
    fn from(err: CsvError) -> Self {
        ReadError::Csv(err)
    }
}
