use std::{
    fs::File,
    io::{self, BufWriter, Write},
};

use log::debug;

use crate::{args::ExportMethodType, classifier::Classification};

pub const TAG_SECTION: &str = "Tag Counts:";
pub const TAG_HEADER: &str = "Tag,Count";
pub const PORT_PROTOCOL_SECTION: &str = "Port/Protocol Combination Counts:";
pub const PORT_PROTOCOL_HEADER: &str = "Port,Protocol,Count";

/// Renders both frequency tables as the two-section text report. Rows are
/// sorted ascending by tag and by (port, protocol) respectively.
pub fn render_report(classification: &Classification) -> String {
    let mut tags: Vec<_> = classification.tag_counts.iter().collect();
    tags.sort();

    let mut combinations: Vec<_> = classification.port_protocol_counts.iter().collect();
    combinations.sort();

    let mut lines = vec![TAG_SECTION.to_string(), TAG_HEADER.to_string()];
    lines.extend(tags.into_iter().map(|(tag, count)| format!("{},{}", tag, count)));
    lines.push(String::new());
    lines.push(PORT_PROTOCOL_SECTION.to_string());
    lines.push(PORT_PROTOCOL_HEADER.to_string());
    lines.extend(
        combinations
            .into_iter()
            .map(|(key, count)| format!("{},{}", key, count)),
    );

    let mut report = lines.join("\n");
    report.push('\n');
    report
}

pub struct OutputWriter {
    writer: BufWriter<Box<dyn Write>>,
}

impl OutputWriter {
    pub fn new(export_type: ExportMethodType, file_path: &str) -> io::Result<Self> {
        let writer: Box<dyn Write> = match export_type {
            ExportMethodType::File => {
                debug!("Creating output file: {}", file_path);
                Box::new(File::create(file_path)?)
            }
            ExportMethodType::Print => Box::new(io::stdout()),
        };

        Ok(Self::from_writer(writer))
    }

    pub fn from_writer(writer: Box<dyn Write>) -> Self {
        OutputWriter {
            writer: BufWriter::new(writer),
        }
    }

    pub fn write_report(&mut self, report: &str) -> io::Result<()> {
        debug!("Writing report to output");
        self.writer.write_all(report.as_bytes())
    }

    /// Flushes the writer. Called explicitly so that a failed flush is
    /// reported instead of being swallowed on drop.
    pub fn flush_and_close(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
