#![warn(clippy::all)]

//! Command-line harness for the classification engine.
//!
//! Stands in for the platform interception host during manual testing:
//! builds a classifier from flags or a TOML config file, feeds it one
//! synthetic flow with an optional payload, and prints the verdict and
//! the resulting text.

use clap::Parser;
use log::debug;
use quill::network::modules::rewrite::segment_text;
use quill::prelude::*;
use quill::settings::block::DEFAULT_BLOCK_PORT;
use quill::settings::rewrite::DEFAULT_REWRITE_PORT;
use quill::utils::log_statistics;
use std::net::Ipv4Addr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "quill", version, about = "Classify a synthetic packet and rewrite its payload")]
struct Cli {
    /// Remote (destination) port of the synthetic flow
    #[arg(long, default_value_t = DEFAULT_REWRITE_PORT)]
    remote_port: u16,

    /// Local (source) port of the synthetic flow
    #[arg(long, default_value_t = 50000)]
    local_port: u16,

    /// Payload text; omit for a metadata-only classification
    #[arg(long)]
    text: Option<String>,

    /// TOML configuration file overriding the built-in settings
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => SettingsBuilder::new()
            .block(DEFAULT_BLOCK_PORT)
            .rewrite(cli.remote_port)
            .build(),
    };
    let classifier = Classifier::from_settings(&settings)?;

    let flow = FlowTuple::new(
        u32::from(Ipv4Addr::new(10, 0, 0, 1)),
        u32::from(Ipv4Addr::new(10, 0, 0, 2)),
        cli.local_port,
        cli.remote_port,
    );

    let verdict = match cli.text {
        Some(ref text) => {
            let mut chain = PacketBufferChain::from_segments(vec![MemorySegment::from_text(
                text,
                REWRITE_CAPACITY,
            )]);
            debug!("payload dump before classification:");
            chain.dump();

            let verdict = classifier.classify(&flow, Some(&mut chain));

            if let Some(segment) = chain.segments().next() {
                println!("payload: {}", segment_text(segment));
            }
            verdict
        }
        None => classifier.classify(&flow, None),
    };

    println!("{} => {}", flow, verdict);

    let stats = classifier.statistics();
    log_statistics(stats.permitted(), stats.blocked(), stats.rewritten());

    Ok(())
}
