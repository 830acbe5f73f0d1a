//! Producer/Consumer Pipeline
//!
//! Sentinel-terminated transfer of a fixed sequence of items from a producer
//! thread to a consumer thread through a `BoundedChannel`.
//!
//! # Architecture
//!
//! - **SourceFeed**: immutable snapshot the producer reads from
//! - **Producer**: puts each item, then the session `Sentinel`
//! - **Envelope**: `Item(T)` or `End(Sentinel)`, the channel payload
//! - **Consumer**: gets until it matches `End`, appending to a `SinkCollector`
//! - **run / run_with_config**: spawn both tasks and build a `TransferReport`
//!
//! # Usage
//!
//! ```rust
//! let source: Vec<u32> = (0..10).collect();
//! let report = handoff::pipeline::run(&source, 3).unwrap();
//!
//! assert_eq!(report.destination, source);
//! assert_eq!(report.produced, 10);
//! assert_eq!(report.consumed, 10);
//! assert!(report.transfer_correct);
//! ```

pub mod config;
pub mod consumer;
pub mod error;
pub mod orchestrator;
pub mod producer;
pub mod report;
pub mod sentinel;
pub mod sink;
pub mod source;
pub mod state;

pub use config::{ConsumerConfig, PipelineConfig, ProducerConfig, DEFAULT_CAPACITY};
pub use consumer::{Consumer, ConsumerReport};
pub use error::{PipelineError, PipelineResult};
pub use orchestrator::{run, run_with_config};
pub use producer::{Producer, ProducerReport};
pub use report::TransferReport;
pub use sentinel::{Envelope, Sentinel};
pub use sink::SinkCollector;
pub use source::SourceFeed;
pub use state::{TaskRole, TaskState, TaskStatus};
