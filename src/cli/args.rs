use anyhow::Result;
use clap::Parser;
use log::{debug, info};
use std::path::PathBuf;

use crate::display::OutputFormat;

/// Bounded producer/consumer handoff demonstration
#[derive(Parser, Debug)]
#[command(name = "handoff")]
#[command(about = "Transfers a sequence from a producer thread to a consumer thread through a bounded blocking queue and verifies the result")]
#[command(version)]
pub struct Args {
    /// Queue capacity (defaults to the config file value, then 3)
    #[arg(short = 'c', long = "capacity", value_name = "N")]
    pub capacity: Option<usize>,

    /// Number of source items, transferred as 0..N
    #[arg(short = 'n', long = "count", value_name = "N", default_value_t = 10)]
    pub count: usize,

    /// Explicit source items (comma-separated), overrides --count
    #[arg(long = "items", value_name = "LIST")]
    pub items: Option<String>,

    /// Producer put timeout in milliseconds (blocks indefinitely when unset)
    #[arg(long = "put-timeout-ms", value_name = "MS")]
    pub put_timeout_ms: Option<u64>,

    /// Consumer get timeout in milliseconds (blocks indefinitely when unset)
    #[arg(long = "get-timeout-ms", value_name = "MS")]
    pub get_timeout_ms: Option<u64>,

    /// Timed attempts before a producer or consumer gives up
    #[arg(long = "max-retries", value_name = "N")]
    pub max_retries: Option<u32>,

    /// Summary format: text, compact or json
    #[arg(long = "format", value_name = "FORMAT", default_value = "text")]
    pub format: String,

    /// Disable coloured output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Verbose output (debug level logging)
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet output (error level logging only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Debug output (trace level logging)
    #[arg(long)]
    pub debug: bool,

    /// Log format: text or json (defaults to the config file value, then text)
    #[arg(long, value_name = "FORMAT")]
    pub log_format: Option<String>,

    /// Log file path for file output
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log level for file output (independent of console level)
    #[arg(long, value_name = "LEVEL")]
    pub log_file_level: Option<String>,

    /// Configuration file path
    #[arg(long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Configuration section name
    #[arg(long, value_name = "SECTION")]
    pub config_name: Option<String>,
}

impl Args {
    /// The sequence the producer will transfer
    pub fn source_items(&self) -> SourceItems {
        match &self.items {
            Some(list) => SourceItems::Explicit(parse_items(list)),
            None => SourceItems::Range((0..self.count).collect()),
        }
    }

    /// Parsed summary format, after `validate_args` has accepted it
    pub fn output_format(&self) -> Result<OutputFormat> {
        self.format.parse::<OutputFormat>().map_err(|e| anyhow::anyhow!(e))
    }
}

/// Source sequence selected on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceItems {
    /// `0..count` from --count
    Range(Vec<usize>),
    /// Values given with --items
    Explicit(Vec<String>),
}

/// Split a comma-separated item list, dropping blank entries
pub fn parse_items(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

/// Parse command line arguments
pub fn parse_args() -> Args {
    let args = Args::parse();
    debug!("Parsed CLI arguments: {:?}", args);
    args
}

/// Validate CLI argument combinations
pub fn validate_args(args: &Args) -> Result<()> {
    debug!("Validating CLI argument combinations");

    let log_flags_count = [args.verbose, args.quiet, args.debug]
        .iter()
        .filter(|&&flag| flag)
        .count();

    if log_flags_count > 1 {
        return Err(anyhow::anyhow!(
            "Conflicting log level flags: only one of --verbose, --quiet, or --debug may be specified"
        ));
    }

    if let Some(ref format) = args.log_format {
        match format.to_lowercase().as_str() {
            "text" | "json" => {}
            _ => {
                return Err(anyhow::anyhow!(
                    "Invalid log format '{}'. Valid options: text, json",
                    format
                ))
            }
        }
    }

    args.output_format()?;

    if let Some(ref level) = args.log_file_level {
        match level.to_lowercase().as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => {}
            _ => {
                return Err(anyhow::anyhow!(
                    "Invalid log file level '{}'. Valid levels: error, warn, info, debug, trace",
                    level
                ))
            }
        }
    }

    if args.log_file_level.is_some() && args.log_file.is_none() {
        return Err(anyhow::anyhow!(
            "--log-file-level requires --log-file to be specified"
        ));
    }

    if args.capacity == Some(0) {
        return Err(anyhow::anyhow!("--capacity must be at least 1"));
    }

    if args.put_timeout_ms == Some(0) || args.get_timeout_ms == Some(0) {
        return Err(anyhow::anyhow!(
            "Timeouts must be greater than zero; omit them to block indefinitely"
        ));
    }

    if args.max_retries == Some(0) {
        return Err(anyhow::anyhow!("--max-retries must be at least 1"));
    }

    if let Some(ref list) = args.items {
        if parse_items(list).is_empty() && !list.trim().is_empty() {
            return Err(anyhow::anyhow!("--items contains no usable values: '{}'", list));
        }
    }

    info!("CLI arguments validated successfully");
    Ok(())
}
