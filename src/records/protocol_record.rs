use serde::Deserialize;

/// One row of the IANA protocol-numbers table. Only the columns the
/// resolver needs are deserialized, the rest of the row is ignored.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ProtocolRecord {
    #[serde(rename = "Decimal")]
    pub decimal: String,
    #[serde(rename = "Keyword")]
    pub keyword: String,
}
