//! End-of-stream marker
//!
//! Items and the end marker travel through the channel as an `Envelope`, so
//! the consumer stops on a pattern match and no payload value can ever be
//! mistaken for the marker.

use std::fmt;
use uuid::Uuid;

/// Marks the end of one producer's stream.
///
/// Each sentinel carries the id of the transfer session it was created for.
/// It is deliberately not `Clone`: a producer owns exactly one and gives it
/// up when it enqueues it.
#[derive(PartialEq, Eq)]
pub struct Sentinel {
    session: Uuid,
}

impl Sentinel {
    /// Create the sentinel for a new session
    pub fn new() -> Self {
        Self {
            session: Uuid::new_v4(),
        }
    }

    /// Session this sentinel terminates
    pub fn session(&self) -> Uuid {
        self.session
    }
}

impl Default for Sentinel {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Sentinel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sentinel({})", self.session)
    }
}

/// What travels through the pipeline channel
#[derive(Debug, PartialEq, Eq)]
pub enum Envelope<T> {
    /// A payload item
    Item(T),
    /// No more items will follow
    End(Sentinel),
}

impl<T> Envelope<T> {
    pub fn is_end(&self) -> bool {
        matches!(self, Envelope::End(_))
    }

    /// The payload, if this is an item
    pub fn into_item(self) -> Option<T> {
        match self {
            Envelope::Item(item) => Some(item),
            Envelope::End(_) => None,
        }
    }
}

impl<T> From<Sentinel> for Envelope<T> {
    fn from(sentinel: Sentinel) -> Self {
        Envelope::End(sentinel)
    }
}
