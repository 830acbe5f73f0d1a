//! Consumer Task
//!
//! Drains the channel into a `SinkCollector` until the session sentinel
//! arrives.

use crate::pipeline::config::ConsumerConfig;
use crate::pipeline::error::{PipelineError, PipelineResult};
use crate::pipeline::sentinel::Envelope;
use crate::pipeline::sink::SinkCollector;
use crate::pipeline::state::{TaskRole, TaskState, TaskStatus};
use crate::queue::{BoundedChannel, GetError};
use log::{debug, error, trace, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Outcome of a completed consumer
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumerReport {
    pub name: String,
    pub consumed: usize,
    pub elapsed: Duration,
}

/// Consumer side of a transfer
pub struct Consumer<T> {
    name: String,
    channel: Arc<BoundedChannel<Envelope<T>>>,
    sink: Arc<SinkCollector<T>>,
    session: Uuid,
    config: ConsumerConfig,
    status: TaskStatus,
}

impl<T> Consumer<T> {
    /// Create a consumer that blocks indefinitely on an empty channel.
    ///
    /// `session` is the id of the sentinel this consumer waits for.
    pub fn new(
        channel: Arc<BoundedChannel<Envelope<T>>>,
        sink: Arc<SinkCollector<T>>,
        session: Uuid,
    ) -> Self {
        Self::with_config(channel, sink, session, ConsumerConfig::default())
    }

    /// Create a consumer with custom get behaviour
    pub fn with_config(
        channel: Arc<BoundedChannel<Envelope<T>>>,
        sink: Arc<SinkCollector<T>>,
        session: Uuid,
        config: ConsumerConfig,
    ) -> Self {
        Self {
            name: TaskRole::Consumer.thread_name().to_string(),
            channel,
            sink,
            session,
            config,
            status: TaskStatus::new(TaskRole::Consumer),
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

    /// Consume items until the sentinel is received
    pub fn run(self) -> PipelineResult<ConsumerReport> {
        self.config.validate()?;
        self.status.transition(TaskState::Running)?;
        let start = Instant::now();
        debug!("{} starting", self.name);

        match self.consume() {
            Ok(consumed) => {
                self.status.transition(TaskState::Completed)?;
                let elapsed = start.elapsed();
                debug!("{} completed: {} items in {:?}", self.name, consumed, elapsed);
                Ok(ConsumerReport {
                    name: self.name,
                    consumed,
                    elapsed,
                })
            }
            Err(e) => {
                self.status.transition(TaskState::Failed)?;
                Err(e)
            }
        }
    }

    fn consume(&self) -> PipelineResult<usize> {
        let mut consumed = 0;

        loop {
            match self.dequeue(consumed)? {
                Envelope::Item(item) => {
                    self.sink.append(item);
                    consumed += 1;
                    trace!("{} consumed item {}", self.name, consumed);
                }
                Envelope::End(sentinel) => {
                    if sentinel.session() != self.session {
                        error!(
                            "{} received sentinel for session {} while serving session {}",
                            self.name,
                            sentinel.session(),
                            self.session
                        );
                        return Err(PipelineError::SentinelMismatch {
                            expected: self.session,
                            found: sentinel.session(),
                        });
                    }

                    if self.config.propagate_sentinel {
                        // Siblings on a closed channel stop on their own
                        if self.channel.put(Envelope::End(sentinel)).is_err() {
                            debug!("{} could not propagate sentinel: channel closed", self.name);
                        }
                    }
                    trace!("{} received sentinel", self.name);
                    return Ok(consumed);
                }
            }
        }
    }

    fn dequeue(&self, consumed: usize) -> PipelineResult<Envelope<T>> {
        let closed = |_: GetError| PipelineError::ChannelClosed {
            role: TaskRole::Consumer,
        };

        let timeout = match self.config.get_timeout() {
            Some(timeout) => timeout,
            None => return self.channel.get().map_err(closed),
        };

        for attempt in 1..=self.config.max_idle_retries {
            match self.channel.get_timeout(timeout) {
                Ok(envelope) => return Ok(envelope),
                Err(GetError::Timeout) => {
                    warn!(
                        "{} get timed out after {:?} (attempt {}/{})",
                        self.name, timeout, attempt, self.config.max_idle_retries
                    );
                }
                Err(e @ GetError::Closed) => return Err(closed(e)),
            }
        }

        Err(PipelineError::ConsumerTimedOut {
            consumed,
            attempts: self.config.max_idle_retries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::sentinel::Sentinel;

    fn setup(capacity: usize) -> (Arc<BoundedChannel<Envelope<i32>>>, Arc<SinkCollector<i32>>) {
        (
            Arc::new(BoundedChannel::new(capacity).unwrap()),
            Arc::new(SinkCollector::new()),
        )
    }

    #[test]
    fn test_consumes_until_sentinel() {
        let (channel, sink) = setup(5);
        let sentinel = Sentinel::new();
        let session = sentinel.session();

        channel.put(Envelope::Item(10)).unwrap();
        channel.put(Envelope::Item(20)).unwrap();
        channel.put(Envelope::End(sentinel)).unwrap();
        channel.put(Envelope::Item(30)).unwrap();

        let consumer = Consumer::new(Arc::clone(&channel), Arc::clone(&sink), session);
        let status = consumer.status();
        let report = consumer.run().unwrap();

        assert_eq!(report.consumed, 2);
        assert_eq!(sink.snapshot(), vec![10, 20]);
        assert_eq!(status.get(), TaskState::Completed);
        // Nothing after the sentinel is touched
        assert_eq!(channel.get().unwrap(), Envelope::Item(30));
    }

    #[test]
    fn test_rejects_foreign_sentinel() {
        let (channel, sink) = setup(2);
        let foreign = Sentinel::new();
        let found = foreign.session();
        channel.put(Envelope::End(foreign)).unwrap();

        let expected = Uuid::new_v4();
        let error = Consumer::new(channel, sink, expected).run().unwrap_err();
        match error {
            PipelineError::SentinelMismatch {
                expected: e,
                found: f,
            } => {
                assert_eq!(e, expected);
                assert_eq!(f, found);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_propagates_sentinel_when_configured() {
        let (channel, sink) = setup(2);
        let sentinel = Sentinel::new();
        let session = sentinel.session();
        channel.put(Envelope::End(sentinel)).unwrap();

        let config = ConsumerConfig {
            propagate_sentinel: true,
            ..Default::default()
        };
        Consumer::with_config(Arc::clone(&channel), sink, session, config)
            .run()
            .unwrap();

        match channel.get().unwrap() {
            Envelope::End(sentinel) => assert_eq!(sentinel.session(), session),
            other => panic!("expected the sentinel to be re-queued, got {:?}", other),
        }
    }

    #[test]
    fn test_gives_up_after_idle_retries() {
        let (channel, sink) = setup(1);
        channel.put(Envelope::Item(1)).unwrap();

        let config = ConsumerConfig {
            get_timeout_ms: Some(20),
            max_idle_retries: 2,
            propagate_sentinel: false,
        };
        let error = Consumer::with_config(channel, Arc::clone(&sink), Uuid::new_v4(), config)
            .run()
            .unwrap_err();

        assert!(matches!(
            error,
            PipelineError::ConsumerTimedOut {
                consumed: 1,
                attempts: 2
            }
        ));
        assert_eq!(sink.snapshot(), vec![1]);
    }

    #[test]
    fn test_closed_channel_without_sentinel_fails() {
        let (channel, sink) = setup(2);
        channel.put(Envelope::Item(7)).unwrap();
        channel.close();

        let error = Consumer::new(channel, Arc::clone(&sink), Uuid::new_v4())
            .run()
            .unwrap_err();
        assert!(matches!(
            error,
            PipelineError::ChannelClosed {
                role: TaskRole::Consumer
            }
        ));
        // Buffered items are still delivered before the failure
        assert_eq!(sink.snapshot(), vec![7]);
    }

    #[test]
    fn test_zero_idle_retries_with_timeout_is_rejected() {
        let (channel, sink) = setup(2);
        channel.put(Envelope::Item(3)).unwrap();

        let config = ConsumerConfig {
            get_timeout_ms: Some(20),
            max_idle_retries: 0,
            propagate_sentinel: false,
        };
        let consumer = Consumer::with_config(Arc::clone(&channel), Arc::clone(&sink), Uuid::new_v4(), config);
        let status = consumer.status();

        let error = consumer.run().unwrap_err();
        assert!(matches!(error, PipelineError::InvalidConfiguration(_)));
        assert_eq!(status.get(), TaskState::NotStarted);
        assert!(sink.is_empty());
        assert_eq!(channel.size(), 1);
    }
}
