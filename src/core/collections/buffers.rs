//! Reusable index buffers.
//!
//! Beyond-vertex sets are cleared and refilled thousands of times during a single
//! hull computation, so they are kept in a dedicated type whose `clear` keeps the
//! allocation and which the object pool can hand out again.

use serde::{Deserialize, Serialize};

use super::{MAX_PRACTICAL_DIMENSION_SIZE, SmallBuffer};

/// Append-only, stack-capable list of point indices.
///
/// # Examples
///
/// ```rust
/// use hyperhull::core::collections::IndexBuffer;
///
/// let mut buffer = IndexBuffer::with_capacity(4);
/// buffer.push(3);
/// buffer.push(5);
/// assert_eq!(buffer.pop(), Some(5));
///
/// let capacity = buffer.capacity();
/// buffer.clear();
/// assert!(buffer.is_empty());
/// assert_eq!(buffer.capacity(), capacity);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexBuffer {
    items: Vec<usize>,
}

impl IndexBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Creates an empty buffer able to hold `capacity` indices without reallocating.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Appends an index.
    #[inline]
    pub fn push(&mut self, index: usize) {
        self.items.push(index);
    }

    /// Removes and returns the most recently pushed index.
    #[inline]
    pub fn pop(&mut self) -> Option<usize> {
        self.items.pop()
    }

    /// Returns the most recently pushed index without removing it.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<usize> {
        self.items.last().copied()
    }

    /// Removes every index but keeps the allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Number of stored indices.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the buffer holds no index.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Allocated capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// The stored indices in insertion order.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.items
    }

    /// Iterates over the stored indices in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = usize> + '_ {
        self.items.iter().copied()
    }

    /// Keeps only the indices for which `keep` returns `true`.
    pub fn retain(&mut self, keep: impl FnMut(&usize) -> bool) {
        self.items.retain(keep);
    }
}

impl Extend<usize> for IndexBuffer {
    fn extend<I: IntoIterator<Item = usize>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl FromIterator<usize> for IndexBuffer {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a IndexBuffer {
    type Item = &'a usize;
    type IntoIter = std::slice::Iter<'a, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Buffer sized for the simplex vertices of the initial hull (`dimension + 1` points).
pub type SimplexVertexBuffer = SmallBuffer<usize, { MAX_PRACTICAL_DIMENSION_SIZE + 1 }>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_buffer_stack_behaviour() {
        let mut buffer: IndexBuffer = (0..5).collect();
        assert_eq!(buffer.len(), 5);
        assert_eq!(buffer.last(), Some(4));
        assert_eq!(buffer.pop(), Some(4));
        assert_eq!(buffer.pop(), Some(3));
        assert_eq!(buffer.as_slice(), &[0, 1, 2]);
    }

    #[test]
    fn test_index_buffer_clear_keeps_allocation() {
        let mut buffer = IndexBuffer::with_capacity(64);
        buffer.extend(0..64);
        let capacity = buffer.capacity();

        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), capacity);

        buffer.push(9);
        assert_eq!(buffer.iter().collect::<Vec<_>>(), vec![9]);
    }

    #[test]
    fn test_index_buffer_retain() {
        let mut buffer: IndexBuffer = (0..10).collect();
        buffer.retain(|&i| i % 3 == 0);
        assert_eq!(buffer.as_slice(), &[0, 3, 6, 9]);
    }
}
