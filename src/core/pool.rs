//! Object pool for faces and beyond-vertex buffers.
//!
//! One pool belongs to one hull computation and is dropped with it. Faces are
//! stored in a slot map; removing a face frees its slot for the next face. Beyond
//! buffers are kept on a free list and handed out again with their allocation.

use serde::{Deserialize, Serialize};

use crate::core::collections::{IndexBuffer, StorageMap};
use crate::core::face::{FaceKey, HullFace};

/// Allocation counters of a pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStatistics {
    /// Faces created over the whole computation.
    pub faces_created: usize,
    /// Faces returned to the pool.
    pub faces_recycled: usize,
    /// Beyond buffers allocated fresh.
    pub buffers_created: usize,
    /// Beyond buffers handed out again from the free list.
    pub buffers_reused: usize,
}

/// Arena of faces plus a free list of beyond buffers.
#[derive(Debug)]
pub struct ObjectPool {
    dimension: usize,
    /// The face arena.
    pub faces: StorageMap<FaceKey, HullFace>,
    buffers: Vec<IndexBuffer>,
    statistics: PoolStatistics,
}

impl ObjectPool {
    /// Creates a pool for faces of a `dimension`-dimensional hull.
    #[must_use]
    pub fn new(dimension: usize, expected_faces: usize) -> Self {
        Self {
            dimension,
            faces: StorageMap::with_capacity_and_key(expected_faces),
            buffers: Vec::new(),
            statistics: PoolStatistics::default(),
        }
    }

    /// A fresh face with `dimension` empty adjacency slots and an empty beyond buffer.
    pub fn get_face(&mut self) -> FaceKey {
        let buffer = self.take_buffer();
        let mut face = HullFace::default();
        face.reset(self.dimension, buffer);
        self.statistics.faces_created += 1;
        self.faces.insert(face)
    }

    /// Removes `key` from the arena and recycles its beyond buffer.
    pub fn deposit_face(&mut self, key: FaceKey) {
        if let Some(face) = self.faces.remove(key) {
            self.statistics.faces_recycled += 1;
            self.deposit_buffer(face.vertices_beyond);
        }
    }

    /// An empty beyond buffer, reused when possible.
    pub fn take_buffer(&mut self) -> IndexBuffer {
        if let Some(buffer) = self.buffers.pop() {
            self.statistics.buffers_reused += 1;
            buffer
        } else {
            self.statistics.buffers_created += 1;
            IndexBuffer::new()
        }
    }

    /// Returns a buffer to the free list.
    pub fn deposit_buffer(&mut self, mut buffer: IndexBuffer) {
        buffer.clear();
        self.buffers.push(buffer);
    }

    /// Dimension of the faces handed out.
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    /// Allocation counters so far.
    #[must_use]
    pub const fn statistics(&self) -> PoolStatistics {
        self.statistics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deposited_face_key_goes_stale() {
        let mut pool = ObjectPool::new(3, 4);
        let a = pool.get_face();
        assert_eq!(pool.faces[a].adjacent.len(), 3);

        pool.deposit_face(a);
        let b = pool.get_face();
        assert!(pool.faces.get(a).is_none(), "Recycled keys must not resolve");
        assert!(pool.faces.get(b).is_some());

        let stats = pool.statistics();
        assert_eq!(stats.faces_created, 2);
        assert_eq!(stats.faces_recycled, 1);
    }

    #[test]
    fn test_beyond_buffers_are_reused_with_capacity() {
        let mut pool = ObjectPool::new(2, 0);
        let a = pool.get_face();
        pool.faces[a].vertices_beyond.extend(0..100);
        let capacity = pool.faces[a].vertices_beyond.capacity();

        pool.deposit_face(a);
        let b = pool.get_face();
        assert!(pool.faces[b].vertices_beyond.is_empty());
        assert_eq!(pool.faces[b].vertices_beyond.capacity(), capacity);
        assert_eq!(pool.statistics().buffers_reused, 1);
        assert_eq!(pool.statistics().buffers_created, 1);
    }
}
