//! # Event Grid Topic Emulator
//!
//! Entry point: parse flags, initialize logging, run until Ctrl+C.

use anyhow::Result;
use clap::Parser;

use topic_runtime::{telemetry, Args, TopicRuntime};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    telemetry::init_logging(&args.log_level, args.json_logs)?;

    // Create and run the emulator
    let runtime = TopicRuntime::new(args.to_config())?;
    runtime.run().await?;

    Ok(())
}
