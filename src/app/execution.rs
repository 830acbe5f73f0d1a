//! Transfer execution and summary rendering

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::fmt;

use crate::display::{ColourManager, CompactFormat, OutputFormat};
use crate::pipeline::{self, PipelineConfig, TransferReport};

/// Run one transfer of `source` and print the summary.
///
/// Returns whether the transfer was correct; pipeline failures are errors.
pub fn run_transfer<T>(
    source: &[T],
    config: &PipelineConfig,
    format: OutputFormat,
    colours: &ColourManager,
) -> Result<bool>
where
    T: Clone + PartialEq + fmt::Debug + serde::Serialize + Send + Sync + 'static,
{
    info!(
        "Transferring {} items with capacity {}",
        source.len(),
        config.capacity
    );

    let report = pipeline::run_with_config(source, config).context("Transfer failed")?;

    if !report.is_success() {
        warn!(
            "Transfer verification failed: produced {}, consumed {}, correct {}",
            report.produced, report.consumed, report.transfer_correct
        );
    }

    println!("{}", render_report(&report, format, colours)?);
    debug!("Channel statistics: {:?}", report.channel);

    Ok(report.is_success())
}

/// Render a report in the requested output format
pub fn render_report<T>(report: &TransferReport<T>, format: OutputFormat, colours: &ColourManager) -> Result<String>
where
    T: fmt::Debug + serde::Serialize,
{
    match format {
        OutputFormat::Text => Ok(render_text(report, colours)),
        OutputFormat::Compact => Ok(report.to_compact_format()),
        OutputFormat::Json => {
            serde_json::to_string_pretty(report).context("Failed to serialize transfer report")
        }
    }
}

fn render_text<T: fmt::Debug>(report: &TransferReport<T>, colours: &ColourManager) -> String {
    let rule = TransferReport::<T>::rule();
    let mut lines = vec![
        rule.clone(),
        colours.highlight(TransferReport::<T>::title()).to_string(),
        rule.clone(),
    ];

    for (label, value) in report.summary_rows() {
        let value = if label == "Transfer correct:" {
            colours.verdict(report.transfer_correct).to_string()
        } else {
            value
        };
        lines.push(format!("{:<21}{}", label, value));
    }

    lines.push(rule);
    lines.join("\n")
}
