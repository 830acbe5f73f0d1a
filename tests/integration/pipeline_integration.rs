//! End-to-end pipeline tests
//!
//! Exercises the library entry points with real producer and consumer
//! threads, and the `handoff` binary through its command line.

use handoff::pipeline::{
    self, Consumer, ConsumerConfig, Envelope, PipelineConfig, PipelineError, Producer,
    ProducerConfig, Sentinel, SinkCollector, SourceFeed, TaskRole, TaskState,
};
use handoff::queue::BoundedChannel;
use proptest::prelude::*;
use std::fs;
use std::process::Command;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;

fn handoff_bin() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_handoff"));
    // Keep the run independent of any user configuration
    command.env("HANDOFF_CONFIG", "/nonexistent/handoff.toml");
    command.env("NO_COLOR", "1");
    command
}

#[test]
fn test_sample_transfer() {
    let source: Vec<u32> = (0..10).collect();
    let report = pipeline::run(&source, 3).unwrap();

    assert_eq!(report.capacity, 3);
    assert_eq!(report.destination, source);
    assert_eq!(report.produced, 10);
    assert_eq!(report.consumed, 10);
    assert!(report.transfer_correct);
    assert!(report.channel.high_water_mark <= 3);
    assert_eq!(report.channel.total_put, 11);
    assert_eq!(report.channel.total_get, 11);
}

#[test]
fn test_transfer_of_owned_non_copy_items() {
    let source: Vec<String> = ["alpha", "beta", "gamma", "delta"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let report = pipeline::run(&source, 1).unwrap();
    assert_eq!(report.destination, source);
    assert!(report.is_success());
}

#[test]
fn test_capacity_larger_than_source() {
    let source = vec![1u8, 2, 3];
    let report = pipeline::run(&source, 64).unwrap();
    assert_eq!(report.destination, source);
    assert!(report.channel.high_water_mark <= 4);
}

#[test]
fn test_repeated_runs_use_fresh_sessions() {
    let first = pipeline::run(&[1, 2], 2).unwrap();
    let second = pipeline::run(&[1, 2], 2).unwrap();
    assert_ne!(first.session, second.session);
}

#[test]
fn test_config_driven_run_with_timeouts() {
    let config = PipelineConfig {
        capacity: 2,
        producer: ProducerConfig {
            put_timeout_ms: Some(500),
            max_retries: 10,
        },
        consumer: ConsumerConfig {
            get_timeout_ms: Some(500),
            max_idle_retries: 10,
            propagate_sentinel: false,
        },
    };
    let source: Vec<i64> = (-50..50).collect();
    let report = pipeline::run_with_config(&source, &config).unwrap();
    assert_eq!(report.destination, source);
    assert!(report.is_success());
}

#[test]
fn test_foreign_sentinel_is_rejected() {
    let channel: Arc<BoundedChannel<Envelope<u32>>> = Arc::new(BoundedChannel::new(4).unwrap());
    let sink = Arc::new(SinkCollector::new());
    let expected = Sentinel::new();

    channel.put(Envelope::Item(7)).unwrap();
    channel.put(Envelope::End(Sentinel::new())).unwrap();

    let consumer = Consumer::new(Arc::clone(&channel), Arc::clone(&sink), expected.session());
    let status = consumer.status();
    let error = consumer.run().unwrap_err();

    assert!(matches!(error, PipelineError::SentinelMismatch { .. }));
    assert_eq!(status.get(), TaskState::Failed);
    assert_eq!(sink.snapshot(), vec![7]);
}

#[test]
fn test_multiple_consumers_with_sentinel_propagation() {
    let source: Vec<u32> = (0..300).collect();
    let channel: Arc<BoundedChannel<Envelope<u32>>> = Arc::new(BoundedChannel::new(3).unwrap());
    let sink = Arc::new(SinkCollector::with_capacity(source.len()));
    let sentinel = Sentinel::new();
    let session = sentinel.session();

    let consumer_config = ConsumerConfig {
        propagate_sentinel: true,
        ..ConsumerConfig::default()
    };

    let consumers: Vec<_> = (0..3)
        .map(|i| {
            let consumer = Consumer::with_config(
                Arc::clone(&channel),
                Arc::clone(&sink),
                session,
                consumer_config.clone(),
            )
            .with_name(format!("consumer-{}", i));
            thread::spawn(move || consumer.run())
        })
        .collect();

    let producer = Producer::new(SourceFeed::snapshot(&source), Arc::clone(&channel), sentinel);
    let produced = producer.run().unwrap().produced;

    let consumed: usize = consumers
        .into_iter()
        .map(|handle| handle.join().unwrap().unwrap().consumed)
        .sum();

    assert_eq!(produced, source.len());
    assert_eq!(consumed, source.len());

    // Interleaving across consumers is arbitrary; the multiset is not
    let mut received = sink.snapshot();
    received.sort_unstable();
    assert_eq!(received, source);

    // The last consumer leaves the re-posted sentinel behind
    assert!(matches!(channel.get(), Ok(Envelope::End(_))));
    assert!(channel.is_empty());
}

#[test]
fn test_task_status_lifecycle() {
    let channel: Arc<BoundedChannel<Envelope<char>>> = Arc::new(BoundedChannel::new(2).unwrap());
    let sink = Arc::new(SinkCollector::new());
    let sentinel = Sentinel::new();

    let consumer = Consumer::new(Arc::clone(&channel), Arc::clone(&sink), sentinel.session());
    let producer = Producer::new(SourceFeed::from(vec!['x', 'y']), Arc::clone(&channel), sentinel);
    let producer_status = producer.status();
    let consumer_status = consumer.status();

    assert_eq!(producer_status.get(), TaskState::NotStarted);
    assert_eq!(consumer_status.get(), TaskState::NotStarted);

    let handle = thread::spawn(move || consumer.run());
    producer.run().unwrap();
    handle.join().unwrap().unwrap();

    assert_eq!(producer_status.get(), TaskState::Completed);
    assert_eq!(consumer_status.get(), TaskState::Completed);
    assert_eq!(sink.snapshot(), vec!['x', 'y']);
}

/// Item whose clone panics on the producer thread once `poisoned` is reached
#[derive(Debug, PartialEq)]
struct Fragile {
    value: u32,
    poisoned: bool,
}

impl Clone for Fragile {
    fn clone(&self) -> Self {
        if self.poisoned && thread::current().name() == Some("producer") {
            panic!("cannot clone item {}", self.value);
        }
        Fragile {
            value: self.value,
            poisoned: self.poisoned,
        }
    }
}

#[test]
fn test_producer_panic_fails_run_without_hanging() {
    let source: Vec<Fragile> = (0..8)
        .map(|value| Fragile {
            value,
            poisoned: value == 5,
        })
        .collect();

    let start = Instant::now();
    let error = pipeline::run(&source, 2).unwrap_err();

    assert!(start.elapsed() < Duration::from_secs(10));
    match error {
        PipelineError::TaskPanicked { role, message } => {
            assert_eq!(role, TaskRole::Producer);
            assert!(message.contains("cannot clone item 5"));
        }
        other => panic!("expected a producer panic, got {:?}", other),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_destination_equals_source(
        source in proptest::collection::vec(any::<i32>(), 0..200),
        capacity in 1usize..16,
    ) {
        let report = pipeline::run(&source, capacity).unwrap();
        prop_assert_eq!(&report.destination, &source);
        prop_assert_eq!(report.produced, source.len());
        prop_assert_eq!(report.consumed, source.len());
        prop_assert!(report.channel.high_water_mark <= capacity);
        prop_assert_eq!(report.channel.size, 0);
    }
}

#[test]
fn test_binary_default_run() {
    let output = handoff_bin().output().expect("Failed to run handoff binary");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(&"=".repeat(60)));
    assert!(stdout.contains("Queue capacity:      3"));
    assert!(stdout.contains("Source items:        [0, 1, 2, 3, 4, 5, 6, 7, 8, 9]"));
    assert!(stdout.contains("Destination items:   [0, 1, 2, 3, 4, 5, 6, 7, 8, 9]"));
    assert!(stdout.contains("Items produced:      10"));
    assert!(stdout.contains("Items consumed:      10"));
    assert!(stdout.contains("Transfer correct:    true"));
}

#[test]
fn test_binary_compact_and_items() {
    let output = handoff_bin()
        .args(["--items", "a,b,c", "--capacity", "1", "--format", "compact"])
        .output()
        .expect("Failed to run handoff binary");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(
        stdout.trim(),
        "Capacity: 1 | Source: 3 | Destination: 3 | Produced: 3 | Consumed: 3 | Correct: true"
    );
}

#[test]
fn test_binary_json_output() {
    let output = handoff_bin()
        .args(["--count", "5", "--format", "json"])
        .output()
        .expect("Failed to run handoff binary");
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["source_len"], 5);
    assert_eq!(report["destination_len"], 5);
    assert_eq!(report["transfer_correct"], true);
}

#[test]
fn test_binary_rejects_zero_capacity() {
    let output = handoff_bin()
        .args(["--capacity", "0"])
        .output()
        .expect("Failed to run handoff binary");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("capacity"));
}

#[test]
fn test_binary_reads_config_file() {
    let config_file = NamedTempFile::new().unwrap();
    fs::write(&config_file, "[pipeline]\ncapacity = 6\n\n[small]\ncapacity = 2\n").unwrap();

    let output = handoff_bin()
        .arg("--config-file")
        .arg(config_file.path())
        .args(["--format", "compact"])
        .output()
        .expect("Failed to run handoff binary");
    assert!(output.status.success());
    assert!(String::from_utf8(output.stdout).unwrap().starts_with("Capacity: 6 |"));

    let output = handoff_bin()
        .arg("--config-file")
        .arg(config_file.path())
        .args(["--config-name", "small", "--format", "compact"])
        .output()
        .expect("Failed to run handoff binary");
    assert!(output.status.success());
    assert!(String::from_utf8(output.stdout).unwrap().starts_with("Capacity: 2 |"));

    // Command line wins over the file
    let output = handoff_bin()
        .arg("--config-file")
        .arg(config_file.path())
        .args(["-c", "4", "--format", "compact"])
        .output()
        .expect("Failed to run handoff binary");
    assert!(String::from_utf8(output.stdout).unwrap().starts_with("Capacity: 4 |"));
}

#[test]
fn test_binary_writes_log_file() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("handoff.log");

    let output = handoff_bin()
        .args(["--quiet", "--count", "3", "--log-file-level", "debug", "--log-file"])
        .arg(&log_path)
        .output()
        .expect("Failed to run handoff binary");
    assert!(output.status.success());

    let log = fs::read_to_string(&log_path).unwrap();
    assert!(log.contains("(producer)"));
    assert!(log.contains("(consumer)"));
    assert!(log.contains("[DEBUG]"));
}
