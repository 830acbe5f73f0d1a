//! Stress tests for long transfers through small channels

use handoff::pipeline::{self, ConsumerConfig, PipelineConfig, ProducerConfig};
use std::time::{Duration, Instant};

#[test]
fn test_capacity_one_long_sequence() {
    let source: Vec<u64> = (0..10_000).collect();
    let start = Instant::now();

    let report = pipeline::run(&source, 1).unwrap();

    assert!(start.elapsed() < Duration::from_secs(30));
    assert!(report.transfer_correct);
    assert_eq!(report.consumed, 10_000);
    assert_eq!(report.channel.high_water_mark, 1);
}

#[test]
fn test_many_sessions_back_to_back() {
    for capacity in 1..=8 {
        let source: Vec<usize> = (0..500).map(|i| i * capacity).collect();
        let report = pipeline::run(&source, capacity).unwrap();
        assert_eq!(report.destination, source, "capacity {}", capacity);
        assert!(report.channel.high_water_mark <= capacity);
    }
}

#[test]
fn test_long_sequence_with_bounded_waits() {
    let config = PipelineConfig {
        capacity: 4,
        producer: ProducerConfig {
            put_timeout_ms: Some(2_000),
            max_retries: 5,
        },
        consumer: ConsumerConfig {
            get_timeout_ms: Some(2_000),
            max_idle_retries: 5,
            propagate_sentinel: false,
        },
    };
    let source: Vec<String> = (0..5_000).map(|i| format!("item-{}", i)).collect();

    let report = pipeline::run_with_config(&source, &config).unwrap();
    assert!(report.is_success());
    assert_eq!(report.channel.put_timeouts, 0);
    assert_eq!(report.channel.get_timeouts, 0);
}
