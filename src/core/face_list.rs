//! Intrusive list of faces that still have beyond vertices.
//!
//! The links live in the faces themselves ([`HullFace`]'s `previous`/`next`), so
//! membership changes never allocate. The head is the next face to process.

use crate::core::collections::StorageMap;
use crate::core::face::{FaceKey, HullFace};

/// Doubly linked list of unprocessed faces.
#[derive(Clone, Debug, Default)]
pub struct FaceList {
    first: Option<FaceKey>,
    last: Option<FaceKey>,
    len: usize,
}

impl FaceList {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            first: None,
            last: None,
            len: 0,
        }
    }

    /// The head of the list.
    #[must_use]
    pub const fn first(&self) -> Option<FaceKey> {
        self.first
    }

    /// Number of faces in the list.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the list is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Adds `key` to the list.
    ///
    /// A face with more beyond vertices than the current head goes to the front, any
    /// other new face to the back. A face already in the list is moved to the front
    /// when it now beats the head.
    pub fn add(&mut self, faces: &mut StorageMap<FaceKey, HullFace>, key: FaceKey) {
        let beyond = faces[key].vertices_beyond.len();
        let beats_head = self
            .first
            .is_some_and(|head| head != key && beyond > faces[head].vertices_beyond.len());

        if faces[key].in_list {
            if beats_head {
                self.unlink(faces, key);
                self.push_front(faces, key);
            }
            return;
        }

        faces[key].in_list = true;
        self.len += 1;
        if beats_head {
            self.push_front(faces, key);
        } else {
            self.push_back(faces, key);
        }
    }

    /// Removes `key` from the list; does nothing if it is not a member.
    pub fn remove(&mut self, faces: &mut StorageMap<FaceKey, HullFace>, key: FaceKey) {
        if !faces[key].in_list {
            return;
        }
        self.unlink(faces, key);
        faces[key].in_list = false;
        self.len -= 1;
    }

    fn push_front(&mut self, faces: &mut StorageMap<FaceKey, HullFace>, key: FaceKey) {
        faces[key].previous = None;
        faces[key].next = self.first;
        match self.first {
            Some(head) => faces[head].previous = Some(key),
            None => self.last = Some(key),
        }
        self.first = Some(key);
    }

    fn push_back(&mut self, faces: &mut StorageMap<FaceKey, HullFace>, key: FaceKey) {
        faces[key].next = None;
        faces[key].previous = self.last;
        match self.last {
            Some(tail) => faces[tail].next = Some(key),
            None => self.first = Some(key),
        }
        self.last = Some(key);
    }

    fn unlink(&mut self, faces: &mut StorageMap<FaceKey, HullFace>, key: FaceKey) {
        let (previous, next) = (faces[key].previous, faces[key].next);
        match previous {
            Some(p) => faces[p].next = next,
            None => self.first = next,
        }
        match next {
            Some(n) => faces[n].previous = previous,
            None => self.last = previous,
        }
        faces[key].previous = None;
        faces[key].next = None;
    }

    /// Iterates over the keys from head to tail.
    pub fn iter<'a>(
        &self,
        faces: &'a StorageMap<FaceKey, HullFace>,
    ) -> impl Iterator<Item = FaceKey> + 'a {
        std::iter::successors(self.first, move |&key| faces[key].next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face_with_beyond(faces: &mut StorageMap<FaceKey, HullFace>, count: usize) -> FaceKey {
        let mut face = HullFace::default();
        face.vertices_beyond.extend(0..count);
        faces.insert(face)
    }

    #[test]
    fn test_add_orders_by_beyond_count_against_head() {
        let mut faces = StorageMap::with_key();
        let mut list = FaceList::new();
        let a = face_with_beyond(&mut faces, 3);
        let b = face_with_beyond(&mut faces, 1);
        let c = face_with_beyond(&mut faces, 5);

        list.add(&mut faces, a);
        list.add(&mut faces, b);
        list.add(&mut faces, c);

        assert_eq!(list.len(), 3);
        assert_eq!(list.iter(&faces).collect::<Vec<_>>(), vec![c, a, b]);
    }

    #[test]
    fn test_add_existing_moves_to_front_only_when_beating_head() {
        let mut faces = StorageMap::with_key();
        let mut list = FaceList::new();
        let a = face_with_beyond(&mut faces, 4);
        let b = face_with_beyond(&mut faces, 2);
        list.add(&mut faces, a);
        list.add(&mut faces, b);

        list.add(&mut faces, b);
        assert_eq!(list.iter(&faces).collect::<Vec<_>>(), vec![a, b]);

        faces[b].vertices_beyond.extend(10..20);
        list.add(&mut faces, b);
        assert_eq!(list.iter(&faces).collect::<Vec<_>>(), vec![b, a]);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_remove_head_middle_and_tail() {
        let mut faces = StorageMap::with_key();
        let mut list = FaceList::new();
        let keys: Vec<_> = (0..4).map(|_| face_with_beyond(&mut faces, 1)).collect();
        for &k in &keys {
            list.add(&mut faces, k);
        }

        list.remove(&mut faces, keys[1]);
        list.remove(&mut faces, keys[0]);
        list.remove(&mut faces, keys[3]);
        assert_eq!(list.first(), Some(keys[2]));
        assert_eq!(list.iter(&faces).collect::<Vec<_>>(), vec![keys[2]]);

        list.remove(&mut faces, keys[2]);
        list.remove(&mut faces, keys[2]);
        assert!(list.is_empty());
        assert_eq!(list.first(), None);
    }
}
