//! Pipeline Configuration
//!
//! Channel capacity and the optional bounded-wait behaviour of each task.
//! Without timeouts both tasks block indefinitely, which is the default.

use crate::pipeline::error::{PipelineError, PipelineResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default channel capacity
pub const DEFAULT_CAPACITY: usize = 3;

/// Main pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Channel capacity (number of items)
    pub capacity: usize,

    /// Producer configuration
    pub producer: ProducerConfig,

    /// Consumer configuration
    pub consumer: ConsumerConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            producer: ProducerConfig::default(),
            consumer: ConsumerConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Default configuration with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Default::default()
        }
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> PipelineResult<()> {
        if self.capacity == 0 {
            return Err(PipelineError::InvalidConfiguration(
                "Capacity must be greater than 0".to_string(),
            ));
        }
        self.producer.validate()?;
        self.consumer.validate()
    }
}

/// Producer put behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProducerConfig {
    /// Bound on each put attempt; `None` blocks until space is available
    pub put_timeout_ms: Option<u64>,

    /// Attempts per item before the producer gives up
    pub max_retries: u32,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            put_timeout_ms: None,
            max_retries: 3,
        }
    }
}

impl ProducerConfig {
    pub fn put_timeout(&self) -> Option<Duration> {
        self.put_timeout_ms.map(Duration::from_millis)
    }

    pub(crate) fn validate(&self) -> PipelineResult<()> {
        if self.put_timeout_ms == Some(0) {
            return Err(PipelineError::InvalidConfiguration(
                "Put timeout must be greater than 0".to_string(),
            ));
        }
        if self.put_timeout_ms.is_some() && self.max_retries == 0 {
            return Err(PipelineError::InvalidConfiguration(
                "Max retries must be greater than 0 when a put timeout is set".to_string(),
            ));
        }
        Ok(())
    }
}

/// Consumer get behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsumerConfig {
    /// Bound on each get attempt; `None` blocks until an item arrives
    pub get_timeout_ms: Option<u64>,

    /// Consecutive empty waits tolerated before the consumer gives up
    pub max_idle_retries: u32,

    /// Put the sentinel back after seeing it so other consumers sharing the
    /// channel also stop
    pub propagate_sentinel: bool,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            get_timeout_ms: None,
            max_idle_retries: 3,
            propagate_sentinel: false,
        }
    }
}

impl ConsumerConfig {
    pub fn get_timeout(&self) -> Option<Duration> {
        self.get_timeout_ms.map(Duration::from_millis)
    }

    pub(crate) fn validate(&self) -> PipelineResult<()> {
        if self.get_timeout_ms == Some(0) {
            return Err(PipelineError::InvalidConfiguration(
                "Get timeout must be greater than 0".to_string(),
            ));
        }
        if self.get_timeout_ms.is_some() && self.max_idle_retries == 0 {
            return Err(PipelineError::InvalidConfiguration(
                "Max idle retries must be greater than 0 when a get timeout is set".to_string(),
            ));
        }
        Ok(())
    }
}
