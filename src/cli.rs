use clap::{Parser, Subcommand};
use mpdforge_common::DeliveryType;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mpdforge")]
#[command(author, version, about = "DASH manifest generator for OTF, post-live and progressive streams")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a DASH manifest for a streaming URL
    Generate {
        /// Base streaming URL
        #[arg(required = true)]
        url: String,

        /// Delivery type of the stream (otf, live, progressive)
        #[arg(short, long)]
        delivery: DeliveryType,

        /// JSON file holding the stream descriptor
        #[arg(long)]
        descriptor: PathBuf,

        /// Duration in seconds used when the stream does not report one
        #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
        fallback_duration: i64,

        /// Target segment duration in seconds (live streams)
        #[arg(long)]
        target_duration: Option<i32>,

        /// Write the manifest to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
