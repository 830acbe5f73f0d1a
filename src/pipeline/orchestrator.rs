//! Transfer Orchestration
//!
//! Wires a source feed, a bounded channel and a sink together, runs the
//! producer and consumer on their own threads and collects their counts.
//!
//! Each task reports its outcome over a `crossbeam_channel` as soon as it
//! finishes, including a caught panic. The first failure closes the bounded
//! channel, which releases a counterpart blocked in `put` or `get`, so a
//! failed run always terminates instead of leaving the other thread parked.

use crate::pipeline::config::PipelineConfig;
use crate::pipeline::consumer::{Consumer, ConsumerReport};
use crate::pipeline::error::{PipelineError, PipelineResult};
use crate::pipeline::producer::{Producer, ProducerReport};
use crate::pipeline::report::TransferReport;
use crate::pipeline::sentinel::{Envelope, Sentinel};
use crate::pipeline::sink::SinkCollector;
use crate::pipeline::source::SourceFeed;
use crate::pipeline::state::TaskRole;
use crate::queue::BoundedChannel;
use crossbeam_channel::{Receiver, Sender};
use log::{debug, error, info};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// Completion message sent by a task thread
enum TaskReport {
    Producer(ProducerReport),
    Consumer(ConsumerReport),
}

type TaskOutcome = (TaskRole, PipelineResult<TaskReport>);

/// Transfer `source` through a channel of `capacity` slots with blocking
/// puts and gets.
pub fn run<T>(source: &[T], capacity: usize) -> PipelineResult<TransferReport<T>>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    run_with_config(source, &PipelineConfig::with_capacity(capacity))
}

/// Transfer `source` using the capacity and timeout settings in `config`
pub fn run_with_config<T>(source: &[T], config: &PipelineConfig) -> PipelineResult<TransferReport<T>>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    config.validate()?;
    let start = Instant::now();

    let feed = SourceFeed::snapshot(source);
    let channel: Arc<BoundedChannel<Envelope<T>>> = Arc::new(BoundedChannel::new(config.capacity)?);
    let sink = Arc::new(SinkCollector::with_capacity(feed.len()));
    let sentinel = Sentinel::new();
    let session = sentinel.session();

    info!(
        "Starting transfer session {}: {} items through capacity {}",
        session,
        feed.len(),
        config.capacity
    );

    let producer = Producer::with_config(
        feed.clone(),
        Arc::clone(&channel),
        sentinel,
        config.producer.clone(),
    );
    let consumer = Consumer::with_config(
        Arc::clone(&channel),
        Arc::clone(&sink),
        session,
        config.consumer.clone(),
    );

    let (outcome_tx, outcome_rx) = crossbeam_channel::bounded::<TaskOutcome>(2);

    let consumer_handle = spawn_task(TaskRole::Consumer, outcome_tx.clone(), move || {
        consumer.run().map(TaskReport::Consumer)
    })?;
    let producer_handle = match spawn_task(TaskRole::Producer, outcome_tx, move || {
        producer.run().map(TaskReport::Producer)
    }) {
        Ok(handle) => handle,
        Err(e) => {
            // The consumer is already waiting; release it before bailing out
            channel.close();
            let _ = consumer_handle.join();
            return Err(e);
        }
    };

    let outcomes = collect_outcomes(&outcome_rx, &channel);
    let producer_joined = join_task(TaskRole::Producer, producer_handle);
    let consumer_joined = join_task(TaskRole::Consumer, consumer_handle);
    let (producer_report, consumer_report) = outcomes?;
    producer_joined?;
    consumer_joined?;

    let destination = match Arc::try_unwrap(sink) {
        Ok(sink) => sink.into_inner(),
        Err(shared) => shared.snapshot(),
    };

    let report = TransferReport::new(
        session,
        config.capacity,
        feed.as_slice().to_vec(),
        destination,
        producer_report.produced,
        consumer_report.consumed,
        start.elapsed(),
        channel.statistics(),
    );

    info!(
        "Finished transfer session {}: produced {}, consumed {}, correct: {}",
        session, report.produced, report.consumed, report.transfer_correct
    );
    Ok(report)
}

/// Wait for both tasks, closing the channel on the first failure
fn collect_outcomes<T>(
    outcomes: &Receiver<TaskOutcome>,
    channel: &BoundedChannel<Envelope<T>>,
) -> PipelineResult<(ProducerReport, ConsumerReport)> {
    let mut producer_report = None;
    let mut consumer_report = None;
    let mut first_failure = None;

    for _ in 0..2 {
        // Every task thread sends exactly one outcome before exiting
        let (role, outcome) = match outcomes.recv() {
            Ok(received) => received,
            Err(_) => break,
        };

        match outcome {
            Ok(TaskReport::Producer(report)) => producer_report = Some(report),
            Ok(TaskReport::Consumer(report)) => consumer_report = Some(report),
            Err(e) => {
                error!("The {} task failed: {}", role, e);
                channel.close();
                first_failure.get_or_insert(e);
            }
        }
    }

    if let Some(e) = first_failure {
        return Err(e);
    }

    match (producer_report, consumer_report) {
        (Some(producer), Some(consumer)) => Ok((producer, consumer)),
        (None, _) => Err(PipelineError::TaskPanicked {
            role: TaskRole::Producer,
            message: "exited without reporting".to_string(),
        }),
        (_, None) => Err(PipelineError::TaskPanicked {
            role: TaskRole::Consumer,
            message: "exited without reporting".to_string(),
        }),
    }
}

/// Start a named task thread that always sends one outcome
fn spawn_task<F>(
    role: TaskRole,
    outcomes: Sender<TaskOutcome>,
    body: F,
) -> PipelineResult<JoinHandle<()>>
where
    F: FnOnce() -> PipelineResult<TaskReport> + Send + 'static,
{
    debug!("Spawning {} thread", role);
    thread::Builder::new()
        .name(role.thread_name().to_string())
        .spawn(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(body)).unwrap_or_else(|payload| {
                Err(PipelineError::TaskPanicked {
                    role,
                    message: panic_message(payload.as_ref()),
                })
            });
            // The receiver only disappears if the orchestrator already gave up
            let _ = outcomes.send((role, outcome));
        })
        .map_err(|source| PipelineError::Spawn { role, source })
}

fn join_task(role: TaskRole, handle: JoinHandle<()>) -> PipelineResult<()> {
    handle.join().map_err(|payload| PipelineError::TaskPanicked {
        role,
        message: panic_message(payload.as_ref()),
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
