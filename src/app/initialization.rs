//! Application initialization and configuration

use anyhow::{Context, Result};
use log::{debug, error};
use log::LevelFilter;
use std::str::FromStr;

use crate::pipeline::PipelineConfig;
use crate::{cli, config, display, logging};

pub fn load_configuration(args: &cli::Args) -> Result<config::ConfigManager> {
    let mut manager = if let Some(config_file) = &args.config_file {
        debug!("Loading configuration from explicit file: {}", config_file.display());
        config::ConfigManager::load_from_file(config_file.clone())?
    } else {
        config::ConfigManager::load()?
    };

    if let Some(section_name) = &args.config_name {
        manager.select_section(section_name.clone());
    }

    Ok(manager)
}

pub fn configure_logging(args: &cli::Args, config: &config::ConfigManager) -> Result<logging::LogConfig> {
    let console_level = if args.debug {
        LevelFilter::Trace
    } else if args.verbose {
        LevelFilter::Debug
    } else if args.quiet {
        LevelFilter::Error
    } else {
        match config.get_log_level("base", "console-level") {
            Ok(Some(level)) => level,
            Ok(None) => LevelFilter::Warn,
            Err(e) => {
                eprintln!("Ignoring invalid console-level in config: {}", e);
                LevelFilter::Warn
            }
        }
    };

    let format = match (&args.log_format, config.get_value_root("log-format")) {
        (Some(format_str), _) => logging::LogFormat::from_str(format_str).map_err(|e| anyhow::anyhow!(e))?,
        (None, Some(format_str)) => logging::LogFormat::from_str(format_str).unwrap_or(logging::LogFormat::Text),
        (None, None) => logging::LogFormat::Text,
    };

    let log_file_path = args
        .log_file
        .clone()
        .or_else(|| config.get_path("base", "log-file"));

    let file_log_level = match &args.log_file_level {
        Some(level_str) => Some(logging::parse_log_level(level_str)?),
        None => config.get_log_level("base", "file-log-level").unwrap_or(None),
    };

    let (destination, file_level) = match (log_file_path, file_log_level) {
        (Some(file_path), Some(level)) => (logging::LogDestination::Both(file_path), Some(level)),
        (Some(file_path), None) => (logging::LogDestination::Both(file_path), Some(console_level)),
        (None, None) => (logging::LogDestination::Console, None),
        (None, Some(_)) => {
            error!("Log file level specified without log file");
            return Err(anyhow::anyhow!("Log file level specified without log file"));
        }
    };

    Ok(logging::LogConfig {
        console_level,
        file_level,
        format,
        destination,
    })
}

/// Merge pipeline settings: CLI flags over the config file over defaults
pub fn resolve_pipeline_config(args: &cli::Args, config: &config::ConfigManager) -> Result<PipelineConfig> {
    let mut pipeline = config.get_pipeline_config()?;

    if let Some(capacity) = args.capacity {
        pipeline.capacity = capacity;
    }
    if let Some(timeout) = args.put_timeout_ms {
        pipeline.producer.put_timeout_ms = Some(timeout);
    }
    if let Some(timeout) = args.get_timeout_ms {
        pipeline.consumer.get_timeout_ms = Some(timeout);
    }
    if let Some(retries) = args.max_retries {
        pipeline.producer.max_retries = retries;
        pipeline.consumer.max_idle_retries = retries;
    }

    pipeline
        .validate()
        .context("Invalid pipeline settings from command line")?;

    debug!("Resolved pipeline configuration: {:?}", pipeline);
    Ok(pipeline)
}

/// Create a ColourManager from CLI arguments and configuration file
pub fn create_colour_manager(args: &cli::Args, config: &config::ConfigManager) -> display::ColourManager {
    match config.get_bool("base", "color") {
        Ok(Some(false)) => display::ColourManager::with_colours(false),
        _ => display::ColourManager::from_args(args.no_color),
    }
}
