//! Bounded Blocking Channel
//!
//! A fixed-capacity FIFO shared between producer and consumer threads. All
//! state lives behind a single mutex; two condition variables separate the
//! "space available" and "item available" wakeups so a notification only
//! reaches a thread whose predicate can now hold.
//!
//! Waiting always happens inside `Condvar::wait`, which releases the mutex
//! while the thread is parked, so no thread ever holds the guard while
//! blocked.

use crate::queue::error::{GetError, PutError, QueueError, QueueResult};
use crate::queue::statistics::ChannelStatistics;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

/// Everything guarded by the channel mutex
struct ChannelState<T> {
    items: VecDeque<T>,
    closed: bool,
    high_water_mark: usize,
    total_put: u64,
    total_get: u64,
    put_timeouts: u64,
    get_timeouts: u64,
}

/// Fixed-capacity blocking FIFO
pub struct BoundedChannel<T> {
    capacity: usize,
    state: Mutex<ChannelState<T>>,
    not_full: Condvar,
    not_empty: Condvar,
}

impl<T> BoundedChannel<T> {
    /// Create a channel holding at most `capacity` items
    pub fn new(capacity: usize) -> QueueResult<Self> {
        if capacity == 0 {
            return Err(QueueError::InvalidCapacity { capacity });
        }

        Ok(Self {
            capacity,
            state: Mutex::new(ChannelState {
                items: VecDeque::with_capacity(capacity),
                closed: false,
                high_water_mark: 0,
                total_put: 0,
                total_get: 0,
                put_timeouts: 0,
                get_timeouts: 0,
            }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
        })
    }

    /// Append an item, blocking for as long as the channel is full.
    ///
    /// Only fails if the channel is closed, in which case the item is
    /// returned inside the error.
    pub fn put(&self, item: T) -> Result<(), PutError<T>> {
        self.put_until(item, None)
    }

    /// Append an item, giving up once `timeout` has elapsed with no free slot.
    ///
    /// A timed-out put leaves the channel untouched. A timeout too large to
    /// represent as a deadline waits without one.
    pub fn put_timeout(&self, item: T, timeout: Duration) -> Result<(), PutError<T>> {
        self.put_until(item, deadline_after(timeout))
    }

    /// Remove the oldest item, blocking for as long as the channel is empty.
    ///
    /// Returns `GetError::Closed` only once the channel is closed and drained.
    pub fn get(&self) -> Result<T, GetError> {
        self.get_until(None)
    }

    /// Remove the oldest item, giving up once `timeout` has elapsed.
    pub fn get_timeout(&self, timeout: Duration) -> Result<T, GetError> {
        self.get_until(deadline_after(timeout))
    }

    fn put_until(&self, item: T, deadline: Option<Instant>) -> Result<(), PutError<T>> {
        let mut state = self.state.lock();

        loop {
            if state.closed {
                return Err(PutError::Closed(item));
            }
            if state.items.len() < self.capacity {
                break;
            }

            match deadline {
                Some(deadline) => {
                    let timed_out = self.not_full.wait_until(&mut state, deadline).timed_out();
                    // The slot may have opened right at the deadline
                    if timed_out && !state.closed && state.items.len() >= self.capacity {
                        state.put_timeouts += 1;
                        log::trace!("put timed out with {} items buffered", state.items.len());
                        return Err(PutError::Timeout(item));
                    }
                }
                None => self.not_full.wait(&mut state),
            }
        }

        state.items.push_back(item);
        state.total_put += 1;
        let size = state.items.len();
        debug_assert!(size <= self.capacity, "channel exceeded its capacity");
        if size > state.high_water_mark {
            state.high_water_mark = size;
        }

        self.not_empty.notify_one();
        Ok(())
    }

    fn get_until(&self, deadline: Option<Instant>) -> Result<T, GetError> {
        let mut state = self.state.lock();

        loop {
            if let Some(item) = state.items.pop_front() {
                state.total_get += 1;
                self.not_full.notify_one();
                return Ok(item);
            }
            if state.closed {
                return Err(GetError::Closed);
            }

            match deadline {
                Some(deadline) => {
                    let timed_out = self.not_empty.wait_until(&mut state, deadline).timed_out();
                    if timed_out && !state.closed && state.items.is_empty() {
                        state.get_timeouts += 1;
                        log::trace!("get timed out on empty channel");
                        return Err(GetError::Timeout);
                    }
                }
                None => self.not_empty.wait(&mut state),
            }
        }
    }

    /// Close the channel and wake every waiter.
    ///
    /// Further puts are rejected. Buffered items can still be taken; once
    /// they are gone `get` reports `GetError::Closed`. Closing twice is a
    /// no-op.
    pub fn close(&self) {
        let mut state = self.state.lock();
        if state.closed {
            return;
        }
        state.closed = true;
        log::debug!("channel closed with {} items buffered", state.items.len());
        self.not_full.notify_all();
        self.not_empty.notify_all();
    }

    /// Whether `close` has been called
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Number of buffered items
    pub fn size(&self) -> usize {
        self.state.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.state.lock().items.len() >= self.capacity
    }

    /// Fixed capacity chosen at construction
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Snapshot of the channel counters
    pub fn statistics(&self) -> ChannelStatistics {
        let state = self.state.lock();
        ChannelStatistics {
            capacity: self.capacity,
            size: state.items.len(),
            high_water_mark: state.high_water_mark,
            total_put: state.total_put,
            total_get: state.total_get,
            put_timeouts: state.put_timeouts,
            get_timeouts: state.get_timeouts,
            closed: state.closed,
        }
    }
}

impl<T> fmt::Debug for BoundedChannel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("BoundedChannel")
            .field("capacity", &self.capacity)
            .field("size", &state.items.len())
            .field("closed", &state.closed)
            .finish()
    }
}

/// `None` when the deadline would overflow `Instant`
fn deadline_after(timeout: Duration) -> Option<Instant> {
    Instant::now().checked_add(timeout)
}
