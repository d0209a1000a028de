//! Internal face records of the incremental hull.
//!
//! Faces live in a generation-tagged slot map owned by the
//! [`ObjectPool`](crate::core::pool::ObjectPool), and refer to each other through
//! [`FaceKey`]s. A key whose face was recycled no longer resolves, so stale
//! references show up as `None` instead of aliasing a reused slot.

use slotmap::new_key_type;

use crate::core::collections::{
    FaceVertexBuffer, IndexBuffer, MAX_PRACTICAL_DIMENSION_SIZE, NormalBuffer, SmallBuffer,
};

new_key_type! {
    /// Key of a face in the hull's face arena.
    pub struct FaceKey;
}

/// Neighbor slots of a face; slot `i` is opposite `vertices[i]`.
pub type FaceAdjacency = SmallBuffer<Option<FaceKey>, MAX_PRACTICAL_DIMENSION_SIZE>;

/// A (d-1)-simplex on the boundary of the hull under construction.
#[derive(Clone, Debug, Default)]
pub struct HullFace {
    /// The `d` vertex indices, sorted ascending.
    pub vertices: FaceVertexBuffer,
    /// `adjacent[i]` shares every vertex but `vertices[i]`.
    pub adjacent: FaceAdjacency,
    /// Unit normal pointing away from the hull interior.
    pub normal: NormalBuffer,
    /// Plane offset, `normal · x + offset = 0` on the face.
    pub offset: f64,
    /// Whether the generalized cross product of `vertices` points inward.
    pub is_normal_flipped: bool,
    /// Unprocessed points at distance `>= tolerance` above the face.
    pub vertices_beyond: IndexBuffer,
    /// Beyond vertex of maximum distance.
    pub furthest_vertex: Option<usize>,
    /// Tag used while collecting the faces visible from the current vertex.
    pub affected: bool,
    /// Whether the face is in the final hull.
    pub in_hull: bool,
    pub(crate) in_list: bool,
    pub(crate) previous: Option<FaceKey>,
    pub(crate) next: Option<FaceKey>,
}

impl HullFace {
    /// Resets every field for reuse in a hull of the given dimension, keeping the
    /// allocations of the inline buffers.
    pub fn reset(&mut self, dimension: usize, vertices_beyond: IndexBuffer) {
        self.vertices.clear();
        self.adjacent.clear();
        self.adjacent.resize(dimension, None);
        self.normal.clear();
        self.offset = 0.0;
        self.is_normal_flipped = false;
        self.vertices_beyond = vertices_beyond;
        self.furthest_vertex = None;
        self.affected = false;
        self.in_hull = false;
        self.in_list = false;
        self.previous = None;
        self.next = None;
    }

    /// Slot of `vertex` in this face, if present.
    #[must_use]
    pub fn vertex_slot(&self, vertex: usize) -> Option<usize> {
        self.vertices.binary_search(&vertex).ok()
    }

    /// Slot of `neighbor` in the adjacency of this face, if present.
    #[must_use]
    pub fn adjacency_slot(&self, neighbor: FaceKey) -> Option<usize> {
        self.adjacent.iter().position(|a| *a == Some(neighbor))
    }
}

/// A new cone face waiting to be committed.
///
/// Created for every horizon ridge: the ridge is shared by an `old_face` that is being
/// replaced and a `pivot` face that survives.
#[derive(Clone, Copy, Debug)]
pub struct DeferredFace {
    /// The new face (already holding vertices and plane).
    pub face: FaceKey,
    /// The surviving neighbor across the horizon ridge.
    pub pivot: FaceKey,
    /// Slot of the new face's adjacency that points to `pivot`.
    pub face_index: usize,
    /// Slot of the pivot's adjacency that pointed to `old_face`.
    pub pivot_index: usize,
    /// The affected face being replaced across this ridge.
    pub old_face: FaceKey,
}

/// Inserts `vertex` into the sorted vertex list of a face, in place of
/// `vertices[removed_slot]`, keeping the list sorted; returns the slot it ends up in.
///
/// ```text
/// [1, 4, 7, 9], replace slot 1 with 8  →  [1, 7, 8, 9], returns 2
/// ```
pub fn replace_sorted(vertices: &mut [usize], removed_slot: usize, vertex: usize) -> usize {
    let mut slot = removed_slot;
    while slot + 1 < vertices.len() && vertices[slot + 1] < vertex {
        vertices[slot] = vertices[slot + 1];
        slot += 1;
    }
    while slot > 0 && vertices[slot - 1] > vertex {
        vertices[slot] = vertices[slot - 1];
        slot -= 1;
    }
    vertices[slot] = vertex;
    slot
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_sorted_moves_in_both_directions() {
        let mut v = [1, 4, 7, 9];
        assert_eq!(replace_sorted(&mut v, 1, 8), 2);
        assert_eq!(v, [1, 7, 8, 9]);

        let mut v = [1, 4, 7, 9];
        assert_eq!(replace_sorted(&mut v, 3, 0), 0);
        assert_eq!(v, [0, 1, 4, 7]);

        let mut v = [1, 4, 7, 9];
        assert_eq!(replace_sorted(&mut v, 2, 5), 2);
        assert_eq!(v, [1, 4, 5, 9]);
    }

    #[test]
    fn test_reset_sizes_adjacency() {
        let mut face = HullFace::default();
        face.vertices.extend([3, 4, 5]);
        face.in_hull = true;
        face.reset(4, IndexBuffer::new());
        assert!(face.vertices.is_empty());
        assert_eq!(face.adjacent.len(), 4);
        assert!(face.adjacent.iter().all(Option::is_none));
        assert!(!face.in_hull);
    }

    #[test]
    fn test_slots() {
        let mut face = HullFace::default();
        face.reset(3, IndexBuffer::new());
        face.vertices.extend([2, 5, 8]);
        assert_eq!(face.vertex_slot(5), Some(1));
        assert_eq!(face.vertex_slot(6), None);

        let mut arena = slotmap::SlotMap::<FaceKey, ()>::with_key();
        let key = arena.insert(());
        face.adjacent[2] = Some(key);
        assert_eq!(face.adjacency_slot(key), Some(2));
    }
}
