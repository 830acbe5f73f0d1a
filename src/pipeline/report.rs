//! Transfer Report
//!
//! Summary of one producer/consumer session, used to verify that every
//! source item reached the destination exactly once and in order.

use crate::display::CompactFormat;
use crate::queue::ChannelStatistics;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Width of the banner rules in the text summary
const RULE_WIDTH: usize = 60;

/// Result of a completed transfer
#[derive(Debug, Clone, Serialize)]
pub struct TransferReport<T> {
    /// Session the sentinel belonged to
    pub session: Uuid,
    pub capacity: usize,
    pub source_len: usize,
    pub destination_len: usize,
    pub produced: usize,
    pub consumed: usize,
    /// Destination equals source element-wise
    pub transfer_correct: bool,
    pub source: Vec<T>,
    pub destination: Vec<T>,
    #[serde(serialize_with = "serialize_millis", rename = "elapsed_ms")]
    pub elapsed: Duration,
    /// Channel counters at the end of the run
    pub channel: ChannelStatistics,
}

fn serialize_millis<S: serde::Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_micros() as f64 / 1000.0)
}

impl<T: PartialEq> TransferReport<T> {
    /// Assemble a report, deriving lengths and the correctness verdict
    pub fn new(
        session: Uuid,
        capacity: usize,
        source: Vec<T>,
        destination: Vec<T>,
        produced: usize,
        consumed: usize,
        elapsed: Duration,
        channel: ChannelStatistics,
    ) -> Self {
        let transfer_correct = source == destination;
        Self {
            session,
            capacity,
            source_len: source.len(),
            destination_len: destination.len(),
            produced,
            consumed,
            transfer_correct,
            source,
            destination,
            elapsed,
            channel,
        }
    }
}

impl<T> TransferReport<T> {
    /// produced == consumed == number of source items
    pub fn counts_consistent(&self) -> bool {
        self.produced == self.consumed && self.consumed == self.source_len
    }

    /// Correct ordering and matching counts
    pub fn is_success(&self) -> bool {
        self.transfer_correct && self.counts_consistent()
    }
}

impl<T: fmt::Debug> TransferReport<T> {
    /// Label/value rows of the text summary
    pub fn summary_rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Queue capacity:", self.capacity.to_string()),
            ("Source items:", format!("{:?}", self.source)),
            ("Destination items:", format!("{:?}", self.destination)),
            ("Items produced:", self.produced.to_string()),
            ("Items consumed:", self.consumed.to_string()),
            ("Transfer correct:", self.transfer_correct.to_string()),
        ]
    }

    /// Horizontal rule framing the summary
    pub fn rule() -> String {
        "=".repeat(RULE_WIDTH)
    }

    pub fn title() -> &'static str {
        "Bounded handoff between producer and consumer threads"
    }
}

impl<T: fmt::Debug> fmt::Display for TransferReport<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = Self::rule();
        writeln!(f, "{}", rule)?;
        writeln!(f, "{}", Self::title())?;
        writeln!(f, "{}", rule)?;
        for (label, value) in self.summary_rows() {
            writeln!(f, "{:<21}{}", label, value)?;
        }
        write!(f, "{}", rule)
    }
}

impl<T> CompactFormat for TransferReport<T> {
    fn to_compact_format(&self) -> String {
        format!(
            "Capacity: {} | Source: {} | Destination: {} | Produced: {} | Consumed: {} | Correct: {}",
            self.capacity,
            self.source_len,
            self.destination_len,
            self.produced,
            self.consumed,
            self.transfer_correct
        )
    }
}
