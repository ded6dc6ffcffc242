use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TagRecord {
    #[serde(rename = "dstport")]
    pub dst_port: String,
    #[serde(rename = "protocol")]
    pub protocol: String,
    #[serde(rename = "tag")]
    pub tag: String,
}
