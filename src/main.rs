mod args;
mod classifier;
mod error;
mod parsers;
mod protocols;
mod records;
mod report;
mod tag_table;
mod tests;

use anyhow::Context;
use args::{Cli, ConfigFile};
use clap::Parser;
use classifier::FlowClassifier;
use log::{debug, error, info, warn};
use protocols::ProtocolNameResolver;
use report::{render_report, OutputWriter};
use std::time::Instant;
use tag_table::TagLookupTable;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    // If a config file is provided, it replaces the command line options
    let config: ConfigFile = if let Some(config_path) = cli.config_file.clone() {
        match confy::load_path::<ConfigFile>(&config_path) {
            Ok(cfg_file) => cfg_file,
            Err(e) => {
                error!("Error loading configuration file: {:?}", e);
                std::process::exit(1);
            }
        }
    } else {
        ConfigFile::from(cli)
    };

    if let Err(err) = run(&config) {
        error!("Error: {:?}", err);
        std::process::exit(1);
    }
}

fn run(config: &ConfigFile) -> anyhow::Result<()> {
    debug!("Running with configuration: {:?}", config);
    config.input.validate()?;

    let start = Instant::now();

    let protocols = ProtocolNameResolver::from_path(&config.input.protocol_table_path)
        .with_context(|| {
            format!(
                "Failed to load protocol table {}",
                config.input.protocol_table_path
            )
        })?;
    let tags = TagLookupTable::from_path(&config.input.tag_table_path).with_context(|| {
        format!(
            "Failed to load tag lookup table {}",
            config.input.tag_table_path
        )
    })?;

    debug!(
        "Loaded {} protocol numbers and {} tag mappings",
        protocols.len(),
        tags.len()
    );
    if protocols.is_empty() {
        warn!("Protocol table is empty, every flow record will be rejected");
    }
    if tags.is_empty() {
        warn!("Tag lookup table is empty, every flow record will be Untagged");
    }

    let classification = FlowClassifier::new(&protocols, &tags, config.policy)
        .classify_path(&config.input.flow_log_path)
        .with_context(|| format!("Failed to classify {}", config.input.flow_log_path))?;

    info!(
        "Classified {} flow records into {} tags and {} port/protocol combinations",
        classification.records,
        classification.tag_counts.len(),
        classification.port_protocol_counts.len()
    );
    if classification.skipped > 0 {
        info!("Skipped {} flow records", classification.skipped);
    }

    let report = render_report(&classification);
    let mut output_writer = OutputWriter::new(config.output.output, &config.output.export_path)
        .with_context(|| format!("Failed to open output {}", config.output.export_path))?;
    output_writer.write_report(&report)?;
    output_writer.flush_and_close()?;

    info!(
        "Duration: {:.4} seconds",
        Instant::now().duration_since(start).as_secs_f64()
    );
    Ok(())
}
