use clap::{Args, Parser};
use serde::{Deserialize, Serialize};

use crate::error::FlowTagError;

pub const DEFAULT_PROTOCOL_TABLE: &str = "protocol_numbers.csv";
pub const DEFAULT_TAG_TABLE: &str = "lookup_table.csv";
pub const DEFAULT_FLOW_LOG: &str = "flowlogs.txt";
pub const DEFAULT_EXPORT_PATH: &str = "output.txt";

#[derive(Debug, Parser)]
#[clap(author, version, about)]
pub struct Cli {
    /// Load the configuration from a TOML file, ignoring the other options
    #[clap(long)]
    pub config_file: Option<String>,

    /// Input files
    #[clap(flatten)]
    pub input: PipelineConfig,

    /// Output method
    #[clap(flatten)]
    pub output: OutputConfig,

    /// How to treat flow-log lines that cannot be classified
    #[clap(long, value_enum, default_value_t = RecordPolicy::Strict)]
    pub policy: RecordPolicy,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub input: PipelineConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub policy: RecordPolicy,
}

impl From<Cli> for ConfigFile {
    fn from(cli: Cli) -> Self {
        ConfigFile {
            input: cli.input,
            output: cli.output,
            policy: cli.policy,
        }
    }
}

#[derive(Args, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Protocol numbers table (CSV with Decimal and Keyword columns)
    #[clap(long = "protocols", default_value = DEFAULT_PROTOCOL_TABLE)]
    pub protocol_table_path: String,

    /// Tag lookup table (CSV with dstport, protocol and tag columns)
    #[clap(long = "lookup", default_value = DEFAULT_TAG_TABLE)]
    pub tag_table_path: String,

    /// Flow log file, one whitespace-separated record per line
    #[clap(long = "flow-logs", default_value = DEFAULT_FLOW_LOG)]
    pub flow_log_path: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            protocol_table_path: DEFAULT_PROTOCOL_TABLE.to_string(),
            tag_table_path: DEFAULT_TAG_TABLE.to_string(),
            flow_log_path: DEFAULT_FLOW_LOG.to_string(),
        }
    }
}

impl PipelineConfig {
    /// Checks the file extensions of the three inputs.
    pub fn validate(&self) -> Result<(), FlowTagError> {
        check_extension(&self.flow_log_path, ".txt")?;
        check_extension(&self.tag_table_path, ".csv")?;
        check_extension(&self.protocol_table_path, ".csv")
    }
}

fn check_extension(path: &str, expected: &'static str) -> Result<(), FlowTagError> {
    if path.ends_with(expected) {
        Ok(())
    } else {
        Err(FlowTagError::InvalidExtension {
            path: path.to_string(),
            expected,
        })
    }
}

#[derive(Args, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Output method
    #[clap(short, long, value_enum, default_value_t = ExportMethodType::File)]
    pub output: ExportMethodType,

    /// File path for output (used if method is File)
    #[clap(long, default_value = DEFAULT_EXPORT_PATH)]
    pub export_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            output: ExportMethodType::File,
            export_path: DEFAULT_EXPORT_PATH.to_string(),
        }
    }
}

#[derive(clap::ValueEnum, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExportMethodType {
    /// The report will be printed to the console
    Print,

    /// The report will be written to a file
    File,
}

#[derive(clap::ValueEnum, Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecordPolicy {
    /// Abort on the first line that cannot be classified
    #[default]
    Strict,

    /// Skip and count lines that cannot be classified
    Lenient,
}
