use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "wavbatch")]
#[command(
    author,
    version,
    about = "Batch-convert audio/video files to WAV and merge them per directory"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Input and output roots, overriding the config file
#[derive(Args, Debug, Default)]
pub struct PathArgs {
    /// Root folder of the source files
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Root folder for WAV files
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert every source to WAV, then merge each output folder
    Run {
        #[command(flatten)]
        paths: PathArgs,

        /// Only convert; leave the WAV files unmerged
        #[arg(long)]
        no_merge: bool,

        /// Maximum number of concurrent ffmpeg processes
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Kill any single encode or merge after this many seconds
        #[arg(long, value_name = "SECS")]
        task_timeout: Option<u64>,
    },

    /// List the output groups that would be produced, without converting
    Plan {
        #[command(flatten)]
        paths: PathArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that required external tools are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
