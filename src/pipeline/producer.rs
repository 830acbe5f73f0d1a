//! Producer Task
//!
//! Moves every item of a `SourceFeed` into the channel in order, then
//! enqueues the session sentinel so the consumer knows the stream is over.

use crate::pipeline::config::ProducerConfig;
use crate::pipeline::error::{PipelineError, PipelineResult};
use crate::pipeline::sentinel::{Envelope, Sentinel};
use crate::pipeline::source::SourceFeed;
use crate::pipeline::state::{TaskRole, TaskState, TaskStatus};
use crate::queue::{BoundedChannel, PutError};
use log::{debug, trace, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Outcome of a completed producer
#[derive(Debug, Clone, PartialEq)]
pub struct ProducerReport {
    pub name: String,
    pub produced: usize,
    pub elapsed: Duration,
}

/// Producer side of a transfer
pub struct Producer<T> {
    name: String,
    source: SourceFeed<T>,
    channel: Arc<BoundedChannel<Envelope<T>>>,
    sentinel: Option<Sentinel>,
    config: ProducerConfig,
    status: TaskStatus,
}

impl<T: Clone> Producer<T> {
    /// Create a producer that blocks indefinitely on a full channel
    pub fn new(
        source: SourceFeed<T>,
        channel: Arc<BoundedChannel<Envelope<T>>>,
        sentinel: Sentinel,
    ) -> Self {
        Self::with_config(source, channel, sentinel, ProducerConfig::default())
    }

    /// Create a producer with custom put behaviour
    pub fn with_config(
        source: SourceFeed<T>,
        channel: Arc<BoundedChannel<Envelope<T>>>,
        sentinel: Sentinel,
        config: ProducerConfig,
    ) -> Self {
        Self {
            name: TaskRole::Producer.thread_name().to_string(),
            source,
            channel,
            sentinel: Some(sentinel),
            config,
            status: TaskStatus::new(TaskRole::Producer),
        }
    }

    /// Name used in log lines and reports
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Handle for observing the lifecycle from another thread
    pub fn status(&self) -> TaskStatus {
        self.status.clone()
    }

    /// Produce every source item followed by the sentinel
    pub fn run(mut self) -> PipelineResult<ProducerReport> {
        self.config.validate()?;
        self.status.transition(TaskState::Running)?;
        let start = Instant::now();
        debug!(
            "{} starting: {} items to produce",
            self.name,
            self.source.len()
        );

        match self.produce() {
            Ok(produced) => {
                self.status.transition(TaskState::Completed)?;
                let elapsed = start.elapsed();
                debug!("{} completed: {} items in {:?}", self.name, produced, elapsed);
                Ok(ProducerReport {
                    name: self.name,
                    produced,
                    elapsed,
                })
            }
            Err(e) => {
                self.status.transition(TaskState::Failed)?;
                Err(e)
            }
        }
    }

    fn produce(&mut self) -> PipelineResult<usize> {
        let mut produced = 0;

        for item in self.source.iter() {
            self.enqueue(Envelope::Item(item.clone()), produced)?;
            produced += 1;
            trace!("{} produced item {}", self.name, produced);
        }

        // The end marker always uses a blocking put so the consumer is
        // guaranteed to see it; only a closed channel can stop it.
        let sentinel = self
            .sentinel
            .take()
            .ok_or_else(|| PipelineError::InvalidTransition {
                role: TaskRole::Producer,
                from: TaskState::Completed,
                to: TaskState::Running,
            })?;
        self.channel
            .put(Envelope::End(sentinel))
            .map_err(|_| PipelineError::ChannelClosed {
                role: TaskRole::Producer,
            })?;
        trace!("{} enqueued sentinel", self.name);

        Ok(produced)
    }

    fn enqueue(&self, envelope: Envelope<T>, produced: usize) -> PipelineResult<()> {
        let timeout = match self.config.put_timeout() {
            Some(timeout) => timeout,
            None => {
                return self
                    .channel
                    .put(envelope)
                    .map_err(|_| PipelineError::ChannelClosed {
                        role: TaskRole::Producer,
                    })
            }
        };

        let mut pending = envelope;
        for attempt in 1..=self.config.max_retries {
            match self.channel.put_timeout(pending, timeout) {
                Ok(()) => return Ok(()),
                Err(PutError::Timeout(returned)) => {
                    warn!(
                        "{} put timed out after {:?} (attempt {}/{})",
                        self.name, timeout, attempt, self.config.max_retries
                    );
                    pending = returned;
                }
                Err(PutError::Closed(_)) => {
                    return Err(PipelineError::ChannelClosed {
                        role: TaskRole::Producer,
                    })
                }
            }
        }

        Err(PipelineError::ProducerTimedOut {
            produced,
            attempts: self.config.max_retries,
        })
    }
}
