use super::parser::ReadError;
use csv::{ErrorKind, ReaderBuilder, StringRecord, Trim};
use log::debug;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::io::Read;

/// A deserialized reference-table row and the 1-based line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow<T> {
    pub line: u64,
    pub record: T,
}

impl<T> CsvRow<T> {
    pub fn new(line: u64, record: T) -> Self {
        Self { line, record }
    }
}

pub struct CsvParser;

/// Trims the header names and keeps only the first column for each name.
///
/// Returns the cleaned header row together with the indices of the columns
/// that survived.
fn preprocess_headers(headers: &StringRecord) -> (StringRecord, HashSet<usize>) {
    let mut unique_headers = StringRecord::new();
    let mut seen = HashSet::new();
    let mut indices = HashSet::new();

    for (index, header) in headers.iter().enumerate() {
        let trimmed_header = header.trim();
        if seen.insert(trimmed_header) {
            unique_headers.push_field(trimmed_header);
            indices.insert(index);
        }
    }

    (unique_headers, indices)
}

fn filter_record(record: &StringRecord, indices: &HashSet<usize>) -> StringRecord {
    let mut filtered = StringRecord::new();
    for (index, field) in record.iter().enumerate() {
        if indices.contains(&index) {
            filtered.push_field(field);
        }
    }
    filtered.set_position(record.position().cloned());
    filtered
}

impl CsvParser {
    /// Streams the rows of a headered CSV source as typed records.
    ///
    /// Rows may be shorter than the header. A row that stops before a column
    /// the record requires is reported as [`ReadError::Malformed`] with its
    /// line number.
    pub fn parse<T, R>(
        &self,
        reader: R,
    ) -> Result<impl Iterator<Item = Result<CsvRow<T>, ReadError>>, ReadError>
    where
        T: DeserializeOwned,
        R: Read,
    {
        let mut rdr = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let (unique_headers, indices) = preprocess_headers(&headers);
        debug!("CSV headers: {:?}", unique_headers);

        rdr.set_headers(unique_headers.clone());

        let iter = rdr.into_records().map(move |result| -> Result<CsvRow<T>, ReadError> {
            let record = result?;
            let line = record.position().map_or(0, |pos| pos.line());
            let filtered_record = filter_record(&record, &indices);
            // Columns past the end of a short row are absent, not empty.
            let row_headers: StringRecord = unique_headers
                .iter()
                .take(filtered_record.len())
                .collect();

            filtered_record
                .deserialize::<T>(Some(&row_headers))
                .map(|value| CsvRow::new(line, value))
                .map_err(|err| {
                    if let ErrorKind::Deserialize { err: de_err, .. } = err.kind() {
                        return ReadError::Malformed {
                            line,
                            reason: de_err.to_string(),
                        };
                    }
                    ReadError::Csv(err)
                })
        });

        Ok(iter)
    }
}
