//! Bounded Handoff Queue
//!
//! This module provides the blocking channel that sits between a producer
//! thread and a consumer thread. It is independent of the pipeline protocol
//! built on top of it and carries any `T`.
//!
//! # Architecture
//!
//! - **BoundedChannel**: mutex-guarded FIFO with separate "not full" and
//!   "not empty" condition variables
//! - **PutError / GetError**: outcomes of waits that did not complete
//! - **ChannelStatistics**: counters kept under the same guard
//!
//! # Usage
//!
//! ```rust
//! use handoff::queue::BoundedChannel;
//! use std::sync::Arc;
//! use std::thread;
//! use std::time::Duration;
//!
//! let channel = Arc::new(BoundedChannel::new(2).unwrap());
//!
//! let producer = {
//!     let channel = Arc::clone(&channel);
//!     thread::spawn(move || {
//!         for i in 0..5 {
//!             channel.put(i).unwrap();
//!         }
//!     })
//! };
//!
//! let received: Vec<i32> = (0..5).map(|_| channel.get().unwrap()).collect();
//! producer.join().unwrap();
//! assert_eq!(received, vec![0, 1, 2, 3, 4]);
//!
//! // Nothing left: a bounded wait reports a timeout instead of blocking
//! assert!(channel.get_timeout(Duration::from_millis(10)).is_err());
//! ```

pub mod channel;
pub mod error;
pub mod statistics;

pub use channel::BoundedChannel;
pub use error::{GetError, PutError, QueueError, QueueResult};
pub use statistics::ChannelStatistics;

#[cfg(test)]
mod tests;
