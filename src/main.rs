use anyhow::Result;
use handoff::{app, cli, logging};
use log::{error, info};
use std::process;

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            error!("Application error: {:#}", e);
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

/// Returns whether the transfer verified correctly
fn run() -> Result<bool> {
    let args = cli::parse_args();

    cli::validate_args(&args)?;

    let config_manager = app::load_configuration(&args)?;

    let log_config = app::configure_logging(&args, &config_manager)?;
    logging::init_logger(log_config)?;

    let pipeline_config = app::resolve_pipeline_config(&args, &config_manager)?;
    let colours = app::create_colour_manager(&args, &config_manager);
    let format = args.output_format()?;

    let correct = match args.source_items() {
        cli::SourceItems::Range(source) => app::run_transfer(&source, &pipeline_config, format, &colours)?,
        cli::SourceItems::Explicit(source) => app::run_transfer(&source, &pipeline_config, format, &colours)?,
    };
    info!("Transfer complete, correct: {}", correct);

    Ok(correct)
}
