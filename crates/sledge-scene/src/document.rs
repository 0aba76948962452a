//! The map document: solid storage plus the state conversion reads.

use slotmap::SlotMap;
use thiserror::Error;

use crate::{DisplaySettings, IdGenerator, MapSolid, SolidId, TextureCollection};

/// Errors from document lookups and scene refreshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// The handle was never issued by this document or its solid was removed.
    #[error("solid {0:?} does not exist in the document")]
    UnknownSolid(SolidId),
    /// A converter refused to convert the solid. The solid has no scene
    /// objects until a later refresh succeeds.
    #[error("solid {0:?} could not be converted")]
    ConversionFailed(SolidId),
}

/// Owns every solid of a map along with its display settings and textures.
#[derive(Debug, Default)]
pub struct MapDocument {
    solids: SlotMap<SolidId, MapSolid>,
    /// Face id source for solids built for this document.
    pub ids: IdGenerator,
    /// Display options read by conversion.
    pub settings: DisplaySettings,
    /// Textures available to material derivation.
    pub textures: TextureCollection,
}

impl MapDocument {
    /// Creates an empty document with default settings and no textures.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(mut self, settings: DisplaySettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_textures(mut self, textures: TextureCollection) -> Self {
        self.textures = textures;
        self
    }

    /// Stores a solid and points its faces back at the new handle.
    pub fn add_solid(&mut self, solid: MapSolid) -> SolidId {
        let id = self.solids.insert(solid);
        if let Some(stored) = self.solids.get_mut(id) {
            stored.attach_faces(id);
        }
        id
    }

    /// Removes a solid, returning it with its faces detached.
    pub fn remove_solid(&mut self, id: SolidId) -> Result<MapSolid, DocumentError> {
        let mut solid = self
            .solids
            .remove(id)
            .ok_or(DocumentError::UnknownSolid(id))?;
        for face in solid.faces_mut() {
            face.set_parent(None);
        }
        Ok(solid)
    }

    pub fn solid(&self, id: SolidId) -> Result<&MapSolid, DocumentError> {
        self.solids.get(id).ok_or(DocumentError::UnknownSolid(id))
    }

    /// Mutable access to a solid. Faces pushed through this borrow have no
    /// parent handle until [`MapDocument::reattach`] is called.
    pub fn solid_mut(&mut self, id: SolidId) -> Result<&mut MapSolid, DocumentError> {
        self.solids
            .get_mut(id)
            .ok_or(DocumentError::UnknownSolid(id))
    }

    /// Re-stamps the parent handle on every face of a solid.
    pub fn reattach(&mut self, id: SolidId) -> Result<(), DocumentError> {
        self.solid_mut(id)?.attach_faces(id);
        Ok(())
    }

    pub fn contains(&self, id: SolidId) -> bool {
        self.solids.contains_key(id)
    }

    /// Iterates over all solids in storage order.
    pub fn solids(&self) -> impl Iterator<Item = (SolidId, &MapSolid)> {
        self.solids.iter()
    }

    pub fn solid_ids(&self) -> impl Iterator<Item = SolidId> + '_ {
        self.solids.keys()
    }

    pub fn len(&self) -> usize {
        self.solids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solids.is_empty()
    }
}
