use std::{collections::HashMap, fs::File, io::Read, path::Path};

use log::debug;

use crate::{
    error::FlowTagError,
    parsers::{
        csv_parser::{CsvParser, CsvRow},
        parser::ReadError,
    },
    records::protocol_record::ProtocolRecord,
};

/// Name given to protocol numbers whose keyword column is empty.
pub const UNASSIGNED: &str = "unassigned";

const TABLE_NAME: &str = "protocol table";

/// Maps IANA protocol numbers, kept as text, to lowercase protocol names.
#[derive(Debug, Clone, Default)]
pub struct ProtocolNameResolver {
    names: HashMap<String, String>,
}

impl ProtocolNameResolver {
    /// Builds the resolver from reference rows. A later row with the same
    /// decimal value replaces an earlier one.
    pub fn build<I>(rows: I) -> Result<Self, FlowTagError>
    where
        I: IntoIterator<Item = Result<CsvRow<ProtocolRecord>, ReadError>>,
    {
        let mut names = HashMap::new();

        for row in rows {
            let row = row.map_err(|e| FlowTagError::reference(TABLE_NAME, e))?;
            let keyword = row.record.keyword.trim();
            let name = if keyword.is_empty() {
                UNASSIGNED.to_string()
            } else {
                keyword.to_lowercase()
            };
            names.insert(row.record.decimal.trim().to_string(), name);
        }

        debug!("Loaded {} protocol numbers", names.len());
        Ok(Self { names })
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, FlowTagError> {
        let rows = CsvParser
            .parse::<ProtocolRecord, _>(reader)
            .map_err(|e| FlowTagError::reference(TABLE_NAME, e))?;
        Self::build(rows)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, FlowTagError> {
        debug!("Opening protocol table: {:?}", path.as_ref());
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Returns the lowercase name registered for `protocol_number`.
    pub fn resolve(&self, protocol_number: &str) -> Result<&str, FlowTagError> {
        let protocol_number = protocol_number.trim();
        self.names
            .get(protocol_number)
            .map(String::as_str)
            .ok_or_else(|| FlowTagError::UnknownProtocolNumber {
                line: None,
                protocol_number: protocol_number.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
