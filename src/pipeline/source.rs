//! Source Feed
//!
//! An immutable snapshot of the items to transfer. The snapshot is taken at
//! construction, so later changes to the caller's collection are never seen.

use std::fmt;
use std::sync::Arc;

/// Read-only, shareable snapshot of input items
pub struct SourceFeed<T> {
    items: Arc<[T]>,
}

impl<T: Clone> SourceFeed<T> {
    /// Copy `items` into a new feed
    pub fn snapshot(items: &[T]) -> Self {
        Self {
            items: items.to_vec().into(),
        }
    }
}

impl<T> SourceFeed<T> {
    /// Iterate from the first item. Every call starts afresh.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T> From<Vec<T>> for SourceFeed<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            items: items.into(),
        }
    }
}

impl<T> Clone for SourceFeed<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

impl<'a, T> IntoIterator for &'a SourceFeed<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for SourceFeed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceFeed").field("items", &&*self.items).finish()
    }
}
