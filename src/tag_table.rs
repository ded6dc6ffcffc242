use std::{collections::HashMap, fmt, fs::File, io::Read, path::Path};

use log::debug;

use crate::{
    error::FlowTagError,
    parsers::{
        csv_parser::{CsvParser, CsvRow},
        parser::ReadError,
    },
    records::tag_record::TagRecord,
};

/// Tag reported for flows that have no entry in the lookup table.
pub const UNTAGGED: &str = "Untagged";

const TABLE_NAME: &str = "tag lookup table";

/// Destination port and protocol name, the join key between flow records
/// and the tag lookup table.
///
/// Ordering is by port, then protocol, both compared as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortProtocol {
    pub port: String,
    pub protocol: String,
}

impl PortProtocol {
    /// Trims both parts and lowercases the protocol name.
    pub fn new(port: &str, protocol: &str) -> Self {
        Self {
            port: port.trim().to_string(),
            protocol: protocol.trim().to_lowercase(),
        }
    }
}

impl fmt::Display for PortProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.port, self.protocol)
    }
}

/// Maps (destination port, protocol name) pairs to tags.
#[derive(Debug, Clone, Default)]
pub struct TagLookupTable {
    tags: HashMap<PortProtocol, String>,
}

impl TagLookupTable {
    /// Builds the table from reference rows. A later row with the same
    /// port and protocol replaces an earlier one.
    pub fn build<I>(rows: I) -> Result<Self, FlowTagError>
    where
        I: IntoIterator<Item = Result<CsvRow<TagRecord>, ReadError>>,
    {
        let mut tags = HashMap::new();

        for row in rows {
            let row = row.map_err(|e| FlowTagError::reference(TABLE_NAME, e))?;
            let key = PortProtocol::new(&row.record.dst_port, &row.record.protocol);
            tags.insert(key, row.record.tag.trim().to_string());
        }

        debug!("Loaded {} tag mappings", tags.len());
        Ok(Self { tags })
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, FlowTagError> {
        let rows = CsvParser
            .parse::<TagRecord, _>(reader)
            .map_err(|e| FlowTagError::reference(TABLE_NAME, e))?;
        Self::build(rows)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, FlowTagError> {
        debug!("Opening tag lookup table: {:?}", path.as_ref());
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Returns the tag for `port`/`protocol`, or [`UNTAGGED`] when there is none.
    pub fn lookup(&self, port: &str, protocol: &str) -> &str {
        self.get(&PortProtocol::new(port, protocol))
    }

    /// Same as [`TagLookupTable::lookup`] for an already normalised key.
    pub fn get(&self, key: &PortProtocol) -> &str {
        self.tags.get(key).map_or(UNTAGGED, String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
