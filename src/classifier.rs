use std::{
    collections::HashMap,
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use log::{debug, warn};

use crate::{
    args::RecordPolicy,
    error::FlowTagError,
    protocols::ProtocolNameResolver,
    records::flow_record::FlowRecord,
    tag_table::{PortProtocol, TagLookupTable},
};

/// The outcome of a classification pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub tag_counts: HashMap<String, u64>,
    pub port_protocol_counts: HashMap<PortProtocol, u64>,
    /// Lines that were classified and counted.
    pub records: u64,
    /// Lines dropped under [`RecordPolicy::Lenient`].
    pub skipped: u64,
}

impl Classification {
    fn add(&mut self, key: PortProtocol, tag: &str) {
        *self.port_protocol_counts.entry(key).or_insert(0) += 1;
        *self.tag_counts.entry(tag.to_string()).or_insert(0) += 1;
        self.records += 1;
    }

    pub fn tag_total(&self) -> u64 {
        self.tag_counts.values().sum()
    }

    pub fn port_protocol_total(&self) -> u64 {
        self.port_protocol_counts.values().sum()
    }
}

/// Joins flow-log lines against the protocol and tag tables and counts the
/// results.
pub struct FlowClassifier<'a> {
    protocols: &'a ProtocolNameResolver,
    tags: &'a TagLookupTable,
    policy: RecordPolicy,
}

impl<'a> FlowClassifier<'a> {
    pub fn new(
        protocols: &'a ProtocolNameResolver,
        tags: &'a TagLookupTable,
        policy: RecordPolicy,
    ) -> Self {
        Self {
            protocols,
            tags,
            policy,
        }
    }

    pub fn classify_path<P: AsRef<Path>>(&self, path: P) -> Result<Classification, FlowTagError> {
        debug!("Opening flow log: {:?}", path.as_ref());
        let file = File::open(path)?;
        self.classify(BufReader::new(file))
    }

    pub fn classify<R: BufRead>(&self, reader: R) -> Result<Classification, FlowTagError> {
        self.classify_lines(reader.lines())
    }

    /// Runs a single pass over `lines`, in order.
    ///
    /// Nothing is returned until the whole stream has been consumed. A read
    /// failure always aborts the pass; per-line failures abort it only under
    /// [`RecordPolicy::Strict`].
    pub fn classify_lines<I>(&self, lines: I) -> Result<Classification, FlowTagError>
    where
        I: IntoIterator<Item = io::Result<String>>,
    {
        let mut classification = Classification::default();

        for (index, line) in lines.into_iter().enumerate() {
            let line_number = index as u64 + 1;
            let line = line?;

            match self.classify_line(&line, line_number) {
                Ok((key, tag)) => classification.add(key, tag),
                Err(err) if err.is_record_error() && self.policy == RecordPolicy::Lenient => {
                    warn!("Skipping flow record: {}", err);
                    classification.skipped += 1;
                }
                Err(err) => return Err(err),
            }
        }

        debug_assert_eq!(classification.tag_total(), classification.records);
        debug_assert_eq!(classification.port_protocol_total(), classification.records);
        debug!(
            "Classified {} flow records ({} skipped)",
            classification.records, classification.skipped
        );
        Ok(classification)
    }

    fn classify_line(
        &self,
        line: &str,
        line_number: u64,
    ) -> Result<(PortProtocol, &'a str), FlowTagError> {
        let record = FlowRecord::parse(line, line_number)?;
        let protocol = self
            .protocols
            .resolve(record.protocol_number)
            .map_err(|e| e.at_line(line_number))?;

        let tag = self.tags.lookup(record.dst_port, protocol);
        Ok((PortProtocol::new(record.dst_port, protocol), tag))
    }
}
