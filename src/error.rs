use crate::parsers::parser::ReadError;
use csv::Error as CsvError;
use std::{fmt, io};

#[derive(Debug)]
pub enum FlowTagError {
    /// A reference-table row lacks a required column.
    MalformedReferenceRow {
        table: &'static str,
        line: u64,
        reason: String,
    },
    /// A flow record names a protocol number absent from the protocol table.
    /// `line` is unknown when the lookup happens outside a flow-log pass.
    UnknownProtocolNumber {
        line: Option<u64>,
        protocol_number: String,
    },
    /// A flow-log line with fewer than eight whitespace-separated fields.
    MalformedFlowRecord { line: u64, fields: usize },
    InvalidExtension {
        path: String,
        expected: &'static str,
    },
    Read(ReadError),
}

impl FlowTagError {
    /// Maps a reference-table read failure, attributing malformed rows to `table`.
    pub fn reference(table: &'static str, err: ReadError) -> Self {
        match err {
            ReadError::Malformed { line, reason } => FlowTagError::MalformedReferenceRow {
                table,
                line,
                reason,
            },
            other => FlowTagError::Read(other),
        }
    }

    /// Attaches the flow-log line number to an unknown protocol error.
    pub fn at_line(self, line_number: u64) -> Self {
        match self {
            FlowTagError::UnknownProtocolNumber {
                line: None,
                protocol_number,
            } => FlowTagError::UnknownProtocolNumber {
                line: Some(line_number),
                protocol_number,
            },
            other => other,
        }
    }

    /// True for failures that concern a single flow-log line and can be
    /// skipped without invalidating the rest of the pass.
    pub fn is_record_error(&self) -> bool {
        matches!(
            self,
            FlowTagError::UnknownProtocolNumber { .. } | FlowTagError::MalformedFlowRecord { .. }
        )
    }
}

impl fmt::Display for FlowTagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowTagError::MalformedReferenceRow {
                table,
                line,
                reason,
            } => write!(f, "malformed row in {} at line {}: {}", table, line, reason),
            FlowTagError::UnknownProtocolNumber {
                line: Some(line),
                protocol_number,
            } => write!(
                f,
                "unknown protocol number {:?} at flow log line {}",
                protocol_number, line
            ),
            FlowTagError::UnknownProtocolNumber {
                line: None,
                protocol_number,
            } => write!(f, "unknown protocol number {:?}", protocol_number),
            FlowTagError::MalformedFlowRecord { line, fields } => write!(
                f,
                "malformed flow record at line {}: expected at least 8 fields, found {}",
                line, fields
            ),
            FlowTagError::InvalidExtension { path, expected } => {
                write!(f, "{} must end with {}", path, expected)
            }
            FlowTagError::Read(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for FlowTagError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FlowTagError::Read(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ReadError> for FlowTagError {
    fn from(err: ReadError) -> Self {
        FlowTagError::Read(err)
    }
}

impl From<io::Error> for FlowTagError {
    fn from(err: io::Error) -> Self {
        FlowTagError::Read(ReadError::Io(err))
    }
}

impl From<CsvError> for FlowTagError {
    fn from(err: CsvError) -> Self {
        FlowTagError::Read(ReadError::Csv(err))
    }
}
