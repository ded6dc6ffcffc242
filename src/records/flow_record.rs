use crate::error::FlowTagError;

/// Position of the destination port in a whitespace-split flow-log line.
pub const DST_PORT_INDEX: usize = 6;
/// Position of the IANA protocol number in a whitespace-split flow-log line.
pub const PROTOCOL_NUMBER_INDEX: usize = 7;
/// Lines with fewer fields than this cannot be classified.
pub const MIN_FIELDS: usize = PROTOCOL_NUMBER_INDEX + 1;

/// The two fields of a flow-log line that take part in classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowRecord<'a> {
    pub dst_port: &'a str,
    pub protocol_number: &'a str,
}

impl<'a> FlowRecord<'a> {
    /// Splits `line` on whitespace and picks out the destination port and
    /// protocol number. `line_number` is only used for error reporting.
    pub fn parse(line: &'a str, line_number: u64) -> Result<Self, FlowTagError> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < MIN_FIELDS {
            return Err(FlowTagError::MalformedFlowRecord {
                line: line_number,
                fields: fields.len(),
            });
        }

        Ok(FlowRecord {
            dst_port: fields[DST_PORT_INDEX].trim(),
            protocol_number: fields[PROTOCOL_NUMBER_INDEX].trim(),
        })
    }
}
