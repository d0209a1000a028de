//! Incremental horizon/cone convex hull in arbitrary dimension.
//!
//! The hull starts as a simplex of `d + 1` well-separated points. Every face keeps
//! the unprocessed points lying above it (its *beyond set*). Each step takes the
//! point furthest above the head face of the unprocessed list, collects the faces it
//! sees, and replaces them with a cone of new faces joining the point to the horizon:
//!
//! ```text
//! head face ──► furthest vertex v
//!     │
//!     ├─ tag:    depth-first search over adjacency for faces with dist(v) >= tol
//!     ├─ absorb: stars of horizon vertices that v makes redundant
//!     ├─ cone:   one new face per horizon ridge (ridge vertices + v)
//!     ├─ commit: link to the horizon, connect siblings, split the beyond sets
//!     └─ recycle the tagged faces
//! ```
//!
//! A horizon vertex `w` is redundant when `v` lies above or within the tolerance of
//! every face around `w`: `w` then sits on the boundary of the hull of its
//! neighbors and `v` without being a corner of it. Tagging the whole star of `w`
//! drops `w` from the cone. If that cone turns out degenerate the step is retried
//! with the strictly visible faces alone.
//!
//! A cone face whose normal cannot be computed makes the step *singular*: the cone
//! is discarded, the tagged faces are frozen into the result and every point beyond
//! them is set aside. Construction never fails after the initial simplex.

use std::mem;

use tracing::{debug, trace};

use crate::core::algorithms::initial_simplex::find_initial_simplex;
use crate::core::collections::{FastHashMap, IndexBuffer, fast_hash_map_with_capacity};
use crate::core::connector::{ConnectorTable, FaceConnector};
use crate::core::face::{DeferredFace, FaceKey, HullFace, replace_sorted};
use crate::core::face_list::FaceList;
use crate::core::point_set::PointSet;
use crate::core::pool::ObjectPool;
use crate::geometry::algorithms::convex_hull::{
    ComputedHull, ConvexFace, ConvexHullConstructionError, HullStatistics,
};
use crate::geometry::plane::{SimplexPoints, normalize, orient_plane, raw_normal, signed_distance};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum VertexState {
    Unprocessed,
    OnHull,
    Singular,
}

/// Computes the hull faces of `points` with the incremental algorithm.
///
/// `seed` drives the sampling that pads the initial simplex candidates.
pub(crate) fn compute_hull(
    points: &PointSet,
    tolerance: f64,
    seed: u64,
) -> Result<ComputedHull, ConvexHullConstructionError> {
    debug!(
        dimension = points.dimension(),
        points = points.len(),
        tolerance,
        "building incremental convex hull"
    );

    let simplex = find_initial_simplex(points, tolerance, seed)?;
    let mut hull = IncrementalHull::new(points, tolerance);
    hull.initialize(&simplex)?;
    hull.run();
    let computed = hull.extract();

    debug!(
        faces = computed.faces.len(),
        singular = computed.singular_vertices.len(),
        statistics = ?computed.statistics,
        "incremental convex hull complete"
    );
    Ok(computed)
}

/// Computes the unit normal and oriented offset of `face` against `center`.
///
/// Returns `false` when the face is degenerate.
fn compute_plane(points: &PointSet, center: &[f64], face: &mut HullFace) -> bool {
    let vertices: SimplexPoints<'_> = face.vertices.iter().map(|&v| points.point(v)).collect();
    raw_normal(&vertices, &mut face.normal);
    if !normalize(&mut face.normal) {
        return false;
    }
    let plane = orient_plane(&mut face.normal, vertices[0], center);
    face.offset = plane.offset;
    face.is_normal_flipped = plane.flipped;
    true
}

/// Keeps `furthest` at the vertex of greatest distance; distances within
/// `tolerance` of each other go to the lexicographically greater point, and
/// identical points to the lower index.
fn update_furthest(
    points: &PointSet,
    furthest: &mut Option<(usize, f64)>,
    vertex: usize,
    distance: f64,
    tolerance: f64,
) {
    let better = furthest.is_none_or(|(best, best_distance)| {
        distance > best_distance + tolerance
            || (distance >= best_distance - tolerance
                && points
                    .lexicographic_cmp(vertex, best)
                    .then_with(|| best.cmp(&vertex))
                    .is_gt())
    });
    if better {
        *furthest = Some((vertex, distance));
    }
}

struct IncrementalHull<'a> {
    points: &'a PointSet,
    dimension: usize,
    tolerance: f64,
    pool: ObjectPool,
    unprocessed: FaceList,
    /// Faces frozen into the result; keys recycled later no longer resolve.
    convex_faces: Vec<FaceKey>,
    connectors: ConnectorTable,
    affected: Vec<FaceKey>,
    traverse_stack: Vec<FaceKey>,
    /// Faces around the vertex under test for redundancy.
    star: Vec<FaceKey>,
    /// Set when tagging met a face within the tolerance of the current vertex.
    coplanar_neighbor: bool,
    cone: Vec<DeferredFace>,
    center: Vec<f64>,
    center_backup: Vec<f64>,
    center_count: usize,
    states: Vec<VertexState>,
    /// Per-vertex visit marks, valid for one epoch.
    marks: Vec<u32>,
    epoch: u32,
    statistics: HullStatistics,
}

impl<'a> IncrementalHull<'a> {
    fn new(points: &'a PointSet, tolerance: f64) -> Self {
        let dimension = points.dimension();
        Self {
            points,
            dimension,
            tolerance,
            pool: ObjectPool::new(dimension, 16 * (dimension + 1)),
            unprocessed: FaceList::new(),
            convex_faces: Vec::new(),
            connectors: ConnectorTable::new(),
            affected: Vec::new(),
            traverse_stack: Vec::new(),
            star: Vec::new(),
            coplanar_neighbor: false,
            cone: Vec::new(),
            center: vec![0.0; dimension],
            center_backup: vec![0.0; dimension],
            center_count: 0,
            states: vec![VertexState::Unprocessed; points.len()],
            marks: vec![0; points.len()],
            epoch: 0,
            statistics: HullStatistics::default(),
        }
    }

    // =========================================================================
    // INITIALIZATION
    // =========================================================================

    fn initialize(&mut self, simplex: &[usize]) -> Result<(), ConvexHullConstructionError> {
        let mut sorted = simplex.to_vec();
        sorted.sort_unstable();

        for &v in &sorted {
            self.states[v] = VertexState::OnHull;
            for (c, x) in self.center.iter_mut().zip(self.points.point(v)) {
                *c += x;
            }
        }
        self.center_count = sorted.len();
        let count = self.center_count as f64;
        for c in &mut self.center {
            *c /= count;
        }

        // Face i leaves out sorted[i]
        let keys: Vec<FaceKey> = (0..sorted.len())
            .map(|excluded| {
                let key = self.pool.get_face();
                let face = &mut self.pool.faces[key];
                face.vertices.extend(
                    sorted
                        .iter()
                        .enumerate()
                        .filter(|&(i, _)| i != excluded)
                        .map(|(_, &v)| v),
                );
                key
            })
            .collect();

        for (i, &key) in keys.iter().enumerate() {
            for (j, &other) in keys.iter().enumerate() {
                if i == j {
                    continue;
                }
                let face = &mut self.pool.faces[key];
                if let Some(slot) = face.vertex_slot(sorted[j]) {
                    face.adjacent[slot] = Some(other);
                }
            }
        }

        for &key in &keys {
            if !compute_plane(self.points, &self.center, &mut self.pool.faces[key]) {
                return Err(ConvexHullConstructionError::GeometricDegeneracy {
                    message: "initial simplex has a degenerate face".to_string(),
                });
            }
        }

        for &key in &keys {
            let face = &mut self.pool.faces[key];
            let mut furthest = None;
            for (v, point) in self.points.iter().enumerate() {
                if self.states[v] != VertexState::Unprocessed {
                    continue;
                }
                let distance = signed_distance(&face.normal, face.offset, point);
                if distance >= self.tolerance {
                    face.vertices_beyond.push(v);
                    update_furthest(self.points, &mut furthest, v, distance, self.tolerance);
                }
            }
            face.furthest_vertex = furthest.map(|(v, _)| v);
            self.settle(key);
        }
        Ok(())
    }

    /// Files a face with a fresh beyond set: into the unprocessed list, or into the
    /// result when the set is empty.
    fn settle(&mut self, key: FaceKey) {
        if self.pool.faces[key].vertices_beyond.is_empty() {
            self.pool.faces[key].in_hull = true;
            self.convex_faces.push(key);
        } else {
            self.unprocessed.add(&mut self.pool.faces, key);
        }
    }

    // =========================================================================
    // MAIN LOOP
    // =========================================================================

    fn run(&mut self) {
        while let Some(head) = self.unprocessed.first() {
            let current = self.pool.faces[head].furthest_vertex;
            let Some(current) = current.filter(|&v| self.states[v] == VertexState::Unprocessed)
            else {
                self.purge_stale(head);
                continue;
            };

            self.tag_affected_faces(head, current);
            let visible = self.affected.len();
            let absorbed = self.coplanar_neighbor && self.absorb_redundant_vertices(current);
            self.update_center(current);

            let mut built = self.create_cone(current);
            if !built && absorbed {
                self.release_absorbed(visible);
                built = self.create_cone(current);
            }
            if built {
                self.commit_cone(current);
            } else {
                self.rollback_center();
                self.handle_singular(current);
            }
        }
    }

    /// Drops processed and singular vertices from the beyond set of `key`.
    fn purge_stale(&mut self, key: FaceKey) {
        let states = &self.states;
        let face = &mut self.pool.faces[key];
        face.vertices_beyond
            .retain(|&v| states[v] == VertexState::Unprocessed);

        let mut furthest = None;
        for &v in &face.vertices_beyond {
            let distance = signed_distance(&face.normal, face.offset, self.points.point(v));
            update_furthest(self.points, &mut furthest, v, distance, self.tolerance);
        }
        face.furthest_vertex = furthest.map(|(v, _)| v);

        if face.vertices_beyond.is_empty() {
            self.unprocessed.remove(&mut self.pool.faces, key);
            self.settle(key);
        }
    }

    /// Collects every face `current` is beyond, starting from `start`.
    fn tag_affected_faces(&mut self, start: FaceKey, current: usize) {
        let point = self.points.point(current);
        self.affected.clear();
        self.traverse_stack.clear();
        self.coplanar_neighbor = false;

        self.pool.faces[start].affected = true;
        self.affected.push(start);
        self.traverse_stack.push(start);

        while let Some(key) = self.traverse_stack.pop() {
            for slot in 0..self.dimension {
                let Some(neighbor) = self.pool.faces[key].adjacent[slot] else {
                    continue;
                };
                let face = &mut self.pool.faces[neighbor];
                if face.affected {
                    continue;
                }
                let distance = signed_distance(&face.normal, face.offset, point);
                if distance >= self.tolerance {
                    face.affected = true;
                    self.affected.push(neighbor);
                    self.traverse_stack.push(neighbor);
                } else if distance > -self.tolerance {
                    self.coplanar_neighbor = true;
                }
            }
        }
    }

    /// Adds to the affected faces the stars of the vertices `current` makes
    /// redundant. Returns whether any face was added.
    fn absorb_redundant_vertices(&mut self, current: usize) -> bool {
        let points = self.points;
        let point = points.point(current);
        let epoch = self.next_epoch();
        let visible = self.affected.len();

        let mut i = 0;
        while i < self.affected.len() {
            let key = self.affected[i];
            i += 1;
            for slot in 0..self.dimension {
                let vertex = self.pool.faces[key].vertices[slot];
                if self.marks[vertex] == epoch {
                    continue;
                }
                self.marks[vertex] = epoch;
                if !self.collect_star(key, vertex, point) {
                    continue;
                }
                for &face in &self.star {
                    let face_ref = &mut self.pool.faces[face];
                    if !face_ref.affected {
                        face_ref.affected = true;
                        self.affected.push(face);
                    }
                }
            }
        }

        let absorbed = self.affected.len() - visible;
        if absorbed > 0 {
            trace!(vertex = current, absorbed, "absorbed stars of redundant vertices");
        }
        absorbed > 0
    }

    /// Collects the faces around `vertex` into `self.star`, walking from `start`
    /// across the ridges that contain `vertex`. Returns `false` as soon as `point`
    /// lies below one of them by the tolerance or more.
    fn collect_star(&mut self, start: FaceKey, vertex: usize, point: &[f64]) -> bool {
        self.star.clear();
        self.traverse_stack.clear();
        self.star.push(start);
        self.traverse_stack.push(start);

        while let Some(key) = self.traverse_stack.pop() {
            let face = &self.pool.faces[key];
            if !face.affected
                && signed_distance(&face.normal, face.offset, point) <= -self.tolerance
            {
                return false;
            }
            for slot in 0..self.dimension {
                if face.vertices[slot] == vertex {
                    continue;
                }
                let Some(neighbor) = face.adjacent[slot] else {
                    continue;
                };
                if !self.star.contains(&neighbor) {
                    self.star.push(neighbor);
                    self.traverse_stack.push(neighbor);
                }
            }
        }
        true
    }

    /// Untags the faces added after the first `visible` affected faces.
    fn release_absorbed(&mut self, visible: usize) {
        for key in self.affected.drain(visible..) {
            self.pool.faces[key].affected = false;
        }
    }
    fn update_center(&mut self, current: usize) {
        self.center_backup.clone_from(&self.center);
        let count = self.center_count as f64;
        for (c, x) in self.center.iter_mut().zip(self.points.point(current)) {
            *c = c.mul_add(count, *x) / (count + 1.0);
        }
        self.center_count += 1;
    }

    fn rollback_center(&mut self) {
        mem::swap(&mut self.center, &mut self.center_backup);
        self.center_count -= 1;
    }

    /// Builds one new face per horizon ridge. Returns `false`, with every new face
    /// recycled, when one of them is degenerate.
    fn create_cone(&mut self, current: usize) -> bool {
        self.cone.clear();
        for &old in &self.affected {
            for slot in 0..self.dimension {
                let Some(pivot) = self.pool.faces[old].adjacent[slot] else {
                    continue;
                };
                if self.pool.faces[pivot].affected {
                    continue;
                }
                let pivot_index = self.pool.faces[pivot].adjacency_slot(old);

                let face = self.pool.get_face();
                let mut vertices = self.pool.faces[old].vertices.clone();
                let face_index = replace_sorted(&mut vertices, slot, current);
                self.pool.faces[face].vertices = vertices;

                let planar = compute_plane(self.points, &self.center, &mut self.pool.faces[face]);
                let Some(pivot_index) = pivot_index.filter(|_| planar) else {
                    self.pool.deposit_face(face);
                    for deferred in self.cone.drain(..) {
                        self.pool.deposit_face(deferred.face);
                    }
                    return false;
                };
                self.cone.push(DeferredFace {
                    face,
                    pivot,
                    face_index,
                    pivot_index,
                    old_face: old,
                });
            }
        }
        !self.cone.is_empty()
    }

    /// Freezes the affected faces and sets aside every point beyond them.
    fn handle_singular(&mut self, current: usize) {
        self.statistics.singular_events += 1;
        let mut demoted = 0;
        for &key in &self.affected {
            let face = &mut self.pool.faces[key];
            face.affected = false;
            for &v in &face.vertices_beyond {
                if self.states[v] == VertexState::Unprocessed {
                    self.states[v] = VertexState::Singular;
                    demoted += 1;
                }
            }
            face.vertices_beyond.clear();
            face.furthest_vertex = None;
            self.unprocessed.remove(&mut self.pool.faces, key);
            if !self.pool.faces[key].in_hull {
                self.pool.faces[key].in_hull = true;
                self.convex_faces.push(key);
            }
        }
        if self.states[current] == VertexState::Unprocessed {
            self.states[current] = VertexState::Singular;
            demoted += 1;
        }
        self.statistics.singular_vertices += demoted;
        debug!(
            vertex = current,
            faces = self.affected.len(),
            demoted,
            "degenerate cone; vertices set aside as singular"
        );
    }

    fn commit_cone(&mut self, current: usize) {
        self.connectors.clear();
        for i in 0..self.cone.len() {
            let deferred = self.cone[i];
            let faces = &mut self.pool.faces;
            faces[deferred.face].adjacent[deferred.face_index] = Some(deferred.pivot);
            faces[deferred.pivot].adjacent[deferred.pivot_index] = Some(deferred.face);

            for slot in 0..self.dimension {
                if slot == deferred.face_index {
                    continue;
                }
                let connector = FaceConnector::new(deferred.face, &faces[deferred.face], slot);
                self.connectors.connect(connector, faces);
            }

            self.fill_beyond(deferred, current);
        }
        self.adopt_orphans(current);
        for i in 0..self.cone.len() {
            let face = self.cone[i].face;
            self.settle(face);
        }

        for i in 0..self.affected.len() {
            let key = self.affected[i];
            self.unprocessed.remove(&mut self.pool.faces, key);
            self.pool.deposit_face(key);
        }

        self.states[current] = VertexState::OnHull;
        self.statistics.processed_vertices += 1;
        self.statistics.cones_committed += 1;
        trace!(
            vertex = current,
            replaced = self.affected.len(),
            created = self.cone.len(),
            open_connectors = self.connectors.open_connectors(),
            "committed cone"
        );
    }

    /// Distributes the beyond sets of the replaced face and of the horizon neighbor
    /// onto the new face.
    fn fill_beyond(&mut self, deferred: DeferredFace, current: usize) {
        let epoch = self.next_epoch();

        let mut beyond: IndexBuffer = mem::take(&mut self.pool.faces[deferred.face].vertices_beyond);
        let faces = &self.pool.faces;
        let new_face = &faces[deferred.face];
        let old_set = &faces[deferred.old_face].vertices_beyond;
        let pivot_set = &faces[deferred.pivot].vertices_beyond;

        // Smaller set first; an empty (final) pivot contributes nothing
        let sources: [&IndexBuffer; 2] = if !pivot_set.is_empty() && pivot_set.len() < old_set.len() {
            [pivot_set, old_set]
        } else {
            [old_set, pivot_set]
        };

        let mut furthest = None;
        for source in sources {
            for &v in source {
                if v == current
                    || self.marks[v] == epoch
                    || self.states[v] != VertexState::Unprocessed
                {
                    continue;
                }
                self.marks[v] = epoch;
                let distance =
                    signed_distance(&new_face.normal, new_face.offset, self.points.point(v));
                if distance >= self.tolerance {
                    beyond.push(v);
                    update_furthest(self.points, &mut furthest, v, distance, self.tolerance);
                }
            }
        }

        let face = &mut self.pool.faces[deferred.face];
        face.vertices_beyond = beyond;
        face.furthest_vertex = furthest.map(|(v, _)| v);
    }

    /// Gives every beyond vertex of a replaced face that no cone face took over to
    /// the first cone face it lies beyond.
    fn adopt_orphans(&mut self, current: usize) {
        let points = self.points;
        let epoch = self.next_epoch();
        for deferred in &self.cone {
            for &v in &self.pool.faces[deferred.face].vertices_beyond {
                self.marks[v] = epoch;
            }
        }

        for i in 0..self.affected.len() {
            let old = self.affected[i];
            let mut j = 0;
            while j < self.pool.faces[old].vertices_beyond.len() {
                let v = self.pool.faces[old].vertices_beyond.as_slice()[j];
                j += 1;
                if v == current
                    || self.marks[v] == epoch
                    || self.states[v] != VertexState::Unprocessed
                {
                    continue;
                }
                self.marks[v] = epoch;

                let point = points.point(v);
                for c in 0..self.cone.len() {
                    let key = self.cone[c].face;
                    let face = &mut self.pool.faces[key];
                    let distance = signed_distance(&face.normal, face.offset, point);
                    if distance < self.tolerance {
                        continue;
                    }
                    let mut furthest = face.furthest_vertex.map(|f| {
                        (f, signed_distance(&face.normal, face.offset, points.point(f)))
                    });
                    update_furthest(points, &mut furthest, v, distance, self.tolerance);
                    face.vertices_beyond.push(v);
                    face.furthest_vertex = furthest.map(|(f, _)| f);
                    break;
                }
            }
        }
    }

    /// Starts a new marking epoch, clearing the marks when the counter wraps.
    fn next_epoch(&mut self) -> u32 {
        if self.epoch == u32::MAX {
            self.marks.fill(0);
            self.epoch = 0;
        }
        self.epoch += 1;
        self.epoch
    }

    // =========================================================================
    // EXTRACTION
    // =========================================================================

    fn extract(self) -> ComputedHull {
        let faces = &self.pool.faces;
        let mut index: FastHashMap<FaceKey, usize> =
            fast_hash_map_with_capacity(self.convex_faces.len());
        let mut keys = Vec::with_capacity(self.convex_faces.len());
        for &key in &self.convex_faces {
            if faces.get(key).is_some_and(|face| face.in_hull) && !index.contains_key(&key) {
                index.insert(key, keys.len());
                keys.push(key);
            }
        }

        let dimension = self.dimension;
        let result: Vec<ConvexFace> = keys
            .iter()
            .enumerate()
            .map(|(position, &key)| {
                let face = &faces[key];
                let mut vertices = face.vertices.to_vec();
                let mut adjacency: Vec<usize> = face
                    .adjacent
                    .iter()
                    .map(|neighbor| {
                        neighbor
                            .and_then(|k| index.get(&k).copied())
                            .unwrap_or(position)
                    })
                    .collect();
                if face.is_normal_flipped && dimension >= 2 {
                    vertices.swap(0, dimension - 1);
                    adjacency.swap(0, dimension - 1);
                }
                ConvexFace::new(vertices, adjacency, face.normal.to_vec(), face.offset)
            })
            .collect();

        let singular_vertices = self
            .states
            .iter()
            .enumerate()
            .filter(|&(_, &state)| state == VertexState::Singular)
            .map(|(v, _)| v)
            .collect();

        let pool = self.pool.statistics();
        let statistics = HullStatistics {
            faces_created: pool.faces_created,
            faces_recycled: pool.faces_recycled,
            buffers_created: pool.buffers_created,
            buffers_reused: pool.buffers_reused,
            ..self.statistics
        };

        ComputedHull {
            faces: result,
            singular_vertices,
            statistics,
        }
    }
}
