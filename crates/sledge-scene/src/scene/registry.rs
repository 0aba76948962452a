//! Per-solid registry of scene objects.

use crate::{Aabb, FaceId, SolidId};

use super::face::{BoundingBox, RenderableFace};

/// Key of an entry in a [`SceneMapObject`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneKey {
    /// The renderable form of one face.
    Face(FaceId),
    /// An object describing the whole solid, such as its selection box.
    Solid(SolidId),
}

impl SceneKey {
    #[inline]
    pub fn is_face(&self) -> bool {
        matches!(self, Self::Face(_))
    }
}

/// A renderable stored in the registry.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneObject {
    Face(RenderableFace),
    Bounds(BoundingBox),
}

impl SceneObject {
    pub fn as_face(&self) -> Option<&RenderableFace> {
        match self {
            Self::Face(face) => Some(face),
            Self::Bounds(_) => None,
        }
    }

    pub fn as_face_mut(&mut self) -> Option<&mut RenderableFace> {
        match self {
            Self::Face(face) => Some(face),
            Self::Bounds(_) => None,
        }
    }

    /// Returns the region the object occupies, `None` for an empty face.
    pub fn bounds(&self) -> Option<Aabb> {
        match self {
            Self::Face(face) => face.bounds(),
            Self::Bounds(b) => Some(b.aabb),
        }
    }
}

/// The scene objects produced for one solid.
///
/// Keys are unique. Entries keep insertion order, which is the order faces
/// were converted in; incremental updates rely on it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneMapObject {
    entries: Vec<(SceneKey, SceneObject)>,
}

impl SceneMapObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry. An existing entry with the same key is replaced in
    /// place and its value returned.
    pub fn insert(&mut self, key: SceneKey, object: SceneObject) -> Option<SceneObject> {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, object)),
            None => {
                self.entries.push((key, object));
                None
            }
        }
    }

    /// Like [`SceneMapObject::insert`], but a new entry goes ahead of every
    /// other entry.
    pub(crate) fn insert_first(&mut self, key: SceneKey, object: SceneObject) -> Option<SceneObject> {
        match self.get_mut(&key) {
            Some(existing) => Some(std::mem::replace(existing, object)),
            None => {
                self.entries.insert(0, (key, object));
                None
            }
        }
    }

    pub fn get(&self, key: &SceneKey) -> Option<&SceneObject> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &SceneKey) -> Option<&mut SceneObject> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    #[inline]
    pub fn contains_key(&self, key: &SceneKey) -> bool {
        self.get(key).is_some()
    }

    /// Removes an entry, preserving the order of the rest.
    pub fn remove(&mut self, key: &SceneKey) -> Option<SceneObject> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &SceneKey> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SceneKey, &SceneObject)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Iterates the renderable faces in conversion order.
    pub fn faces(&self) -> impl Iterator<Item = (FaceId, &RenderableFace)> {
        self.entries.iter().filter_map(|(k, v)| match (k, v) {
            (SceneKey::Face(id), SceneObject::Face(face)) => Some((*id, face)),
            _ => None,
        })
    }

    /// Number of entries keyed by a face.
    pub fn face_count(&self) -> usize {
        self.entries.iter().filter(|(k, _)| k.is_face()).count()
    }

    /// Values of face-keyed entries in order, for in-place updates.
    pub(crate) fn face_entries_mut(&mut self) -> impl Iterator<Item = &mut SceneObject> {
        self.entries
            .iter_mut()
            .filter(|(k, _)| k.is_face())
            .map(|(_, v)| v)
    }

    /// Re-keys face entries positionally. Surplus ids are ignored.
    pub(crate) fn rekey_faces<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = FaceId>,
    {
        let slots = self.entries.iter_mut().filter(|(k, _)| k.is_face());
        for ((key, _), id) in slots.zip(ids) {
            *key = SceneKey::Face(id);
        }
    }

    /// Returns the union of every entry's bounds.
    pub fn bounds(&self) -> Option<Aabb> {
        self.entries
            .iter()
            .filter_map(|(_, v)| v.bounds())
            .reduce(|a, b| a.union(&b))
    }
}
