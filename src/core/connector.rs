//! Gluing new cone faces to each other.
//!
//! Every new face of a cone has one ridge on the horizon (linked directly to the
//! surviving neighbor) and `d - 1` open ridges that contain the apex and are shared
//! with sibling cone faces. Each open ridge becomes a [`FaceConnector`]; two
//! connectors with the same vertices are the two sides of one ridge.

use crate::core::collections::{FastHashMap, FaceVertexBuffer, SmallBuffer, StorageMap};
use crate::core::face::{FaceKey, HullFace};
use crate::core::util::stable_hash_indices;

/// One open ridge of a new face.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaceConnector {
    /// The face owning the ridge.
    pub face: FaceKey,
    /// Adjacency slot of `face` across the ridge (the slot of the vertex left out).
    pub edge_index: usize,
    /// The ridge's `d - 1` vertex indices, sorted ascending.
    pub vertices: FaceVertexBuffer,
    /// Stable hash of `vertices`.
    pub hash: u64,
}

impl FaceConnector {
    /// Connector for the ridge of `face` opposite its vertex slot `edge_index`.
    #[must_use]
    pub fn new(face_key: FaceKey, face: &HullFace, edge_index: usize) -> Self {
        let vertices: FaceVertexBuffer = face
            .vertices
            .iter()
            .enumerate()
            .filter(|&(slot, _)| slot != edge_index)
            .map(|(_, &v)| v)
            .collect();
        let hash = stable_hash_indices(&vertices);
        Self {
            face: face_key,
            edge_index,
            vertices,
            hash,
        }
    }

    /// Links both faces of a matched pair to each other.
    pub fn link(&self, other: &Self, faces: &mut StorageMap<FaceKey, HullFace>) {
        faces[self.face].adjacent[self.edge_index] = Some(other.face);
        faces[other.face].adjacent[other.edge_index] = Some(self.face);
    }
}

/// Open connectors keyed by ridge hash.
#[derive(Clone, Debug, Default)]
pub struct ConnectorTable {
    buckets: FastHashMap<u64, SmallBuffer<FaceConnector, 2>>,
    open: usize,
}

impl ConnectorTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Offers `connector`; if its other side is already waiting, both faces are linked
    /// and the waiting connector is released, otherwise `connector` is stored.
    ///
    /// Returns `true` when a pair was linked.
    pub fn connect(
        &mut self,
        connector: FaceConnector,
        faces: &mut StorageMap<FaceKey, HullFace>,
    ) -> bool {
        let bucket = self.buckets.entry(connector.hash).or_default();
        if let Some(position) = bucket
            .iter()
            .position(|waiting| waiting.vertices == connector.vertices)
        {
            let waiting = bucket.swap_remove(position);
            if bucket.is_empty() {
                self.buckets.remove(&connector.hash);
            }
            self.open -= 1;
            waiting.link(&connector, faces);
            return true;
        }

        bucket.push(connector);
        self.open += 1;
        false
    }

    /// Number of connectors still waiting for their other side.
    #[must_use]
    pub const fn open_connectors(&self) -> usize {
        self.open
    }

    /// Drops every waiting connector, keeping the table's allocation.
    pub fn clear(&mut self) {
        self.buckets.clear();
        self.open = 0;
    }
}
