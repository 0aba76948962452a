//! Conversion of map solids into an indexed, render-ready scene.
//!
//! # Architecture
//!
//! - [`policy`]: Whether a face is shown and which material it gets
//! - [`converters`]: The [`ConverterChain`] and the converters it runs
//! - [`SceneMapObject`]: The ordered objects produced for one solid
//! - [`Scene`]: Every solid's objects plus an [`Octree`] over them
//!
//! # Example
//!
//! ```ignore
//! use sledge_scene::{MapDocument, MapSolid, Scene};
//!
//! let mut document = MapDocument::new();
//! let id = document.add_solid(solid);
//!
//! let mut scene = Scene::new();
//! scene.refresh(&document, id)?;
//!
//! document.solid_mut(id)?.set_selected(true);
//! scene.refresh(&document, id)?; // patched in place
//! ```

pub mod converters;
mod face;
pub mod policy;
mod registry;

use std::collections::HashMap;

use crate::{Aabb, DocumentError, Frustum, MapDocument, Octree, Ray, SolidId, Spatial};

pub use converters::{
    ConversionContext, ConverterChain, ConverterPriority, DefaultSolidConverter,
    SceneConverter, SelectionBoundsConverter,
};
pub use face::{BoundingBox, Material, RenderFlags, RenderableFace, Vertex};
pub use registry::{SceneKey, SceneMapObject, SceneObject};

/// Octree entry pointing at one object of the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneHandle {
    pub solid: SolidId,
    pub key: SceneKey,
    pub bounds: Aabb,
}

impl Spatial for SceneHandle {
    type Id = (SolidId, SceneKey);

    fn id(&self) -> Self::Id {
        (self.solid, self.key)
    }

    fn bounds(&self) -> Aabb {
        self.bounds
    }
}

/// What [`Scene::refresh`] did to a solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// First conversion of the solid.
    Converted,
    /// Existing objects were patched in place.
    Updated,
    /// The update was refused and the solid was converted from scratch.
    Rebuilt,
}

/// Totals from [`Scene::refresh_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    pub converted: usize,
    pub updated: usize,
    pub rebuilt: usize,
    pub removed: usize,
}

/// Every solid's scene objects, kept in sync with an octree.
#[derive(Debug, Default)]
pub struct Scene {
    objects: HashMap<SolidId, SceneMapObject>,
    chain: ConverterChain,
    index: Octree<SceneHandle>,
}

impl Scene {
    /// Creates an empty scene with the default converters and world bounds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty scene that runs a custom converter chain.
    pub fn with_chain(chain: ConverterChain) -> Self {
        Self {
            chain,
            ..Self::default()
        }
    }

    /// Replaces the octree. Existing objects are re-indexed.
    pub fn with_index(mut self, index: Octree<SceneHandle>) -> Self {
        self.index = index;
        self.index.clear();
        let handles: Vec<_> = self
            .objects
            .iter()
            .flat_map(|(id, registry)| handles(*id, registry))
            .collect();
        self.index.add(handles);
        self
    }

    /// Brings the scene objects of one solid up to date with the document.
    ///
    /// Solids seen before are updated in place when possible and rebuilt
    /// otherwise. If conversion fails, the solid's objects are dropped and
    /// [`DocumentError::ConversionFailed`] is returned.
    pub fn refresh(&mut self, document: &MapDocument, id: SolidId) -> Result<Refresh, DocumentError> {
        let solid = document.solid(id)?;
        let ctx = ConversionContext::new(&document.settings, &document.textures);

        let (outcome, converted) = if let Some(registry) = self.objects.get_mut(&id) {
            self.index.remove_ids(registry.keys().map(|key| (id, *key)));
            if self.chain.update(registry, &ctx, id, solid) {
                (Refresh::Updated, true)
            } else {
                log::debug!("solid {id:?} cannot be updated in place, rebuilding");
                registry.clear();
                (Refresh::Rebuilt, self.chain.convert(registry, &ctx, id, solid))
            }
        } else {
            let mut registry = SceneMapObject::new();
            let converted = self.chain.convert(&mut registry, &ctx, id, solid);
            self.objects.insert(id, registry);
            (Refresh::Converted, converted)
        };

        if !converted {
            self.objects.remove(&id);
            return Err(DocumentError::ConversionFailed(id));
        }
        if let Some(registry) = self.objects.get(&id) {
            self.index.add(handles(id, registry));
        }
        Ok(outcome)
    }

    /// Refreshes every solid of the document and drops objects of solids
    /// that no longer exist.
    pub fn refresh_all(&mut self, document: &MapDocument) -> RefreshSummary {
        let mut summary = RefreshSummary::default();

        let stale: Vec<SolidId> = self
            .objects
            .keys()
            .copied()
            .filter(|id| !document.contains(*id))
            .collect();
        for id in stale {
            self.remove(id);
            summary.removed += 1;
        }

        for id in document.solid_ids() {
            match self.refresh(document, id) {
                Ok(Refresh::Converted) => summary.converted += 1,
                Ok(Refresh::Updated) => summary.updated += 1,
                Ok(Refresh::Rebuilt) => summary.rebuilt += 1,
                Err(err) => log::warn!("{err}"),
            }
        }

        log::debug!("refreshed scene: {summary:?}");
        summary
    }

    /// Drops the objects of a solid. Returns `false` if it had none.
    pub fn remove(&mut self, id: SolidId) -> bool {
        let Some(registry) = self.objects.remove(&id) else {
            return false;
        };
        self.index.remove_ids(registry.keys().map(|key| (id, *key)));
        true
    }

    /// Drops every object.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.index.clear();
    }

    pub fn object(&self, id: SolidId) -> Option<&SceneMapObject> {
        self.objects.get(&id)
    }

    /// Returns the number of solids with scene objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterates every scene object with the solid it belongs to.
    pub fn renderables(&self) -> impl Iterator<Item = (SolidId, &SceneKey, &SceneObject)> {
        self.objects
            .iter()
            .flat_map(|(id, registry)| registry.iter().map(move |(k, v)| (*id, k, v)))
    }

    /// Looks up the object an octree handle points at.
    pub fn resolve(&self, handle: &SceneHandle) -> Option<&SceneObject> {
        self.objects.get(&handle.solid)?.get(&handle.key)
    }

    pub fn index(&self) -> &Octree<SceneHandle> {
        &self.index
    }

    pub fn query_aabb(&self, aabb: &Aabb) -> Vec<&SceneHandle> {
        self.index.query_aabb(aabb)
    }

    pub fn query_frustum(&self, frustum: &Frustum) -> Vec<&SceneHandle> {
        self.index.query_frustum(frustum)
    }

    /// Returns the objects hit by a ray, nearest first.
    pub fn pick(&self, ray: &Ray) -> Vec<(f32, &SceneHandle)> {
        self.index.query_ray(ray)
    }
}

fn handles(id: SolidId, registry: &SceneMapObject) -> Vec<SceneHandle> {
    registry
        .iter()
        .filter_map(|(key, object)| {
            object.bounds().map(|bounds| SceneHandle {
                solid: id,
                key: *key,
                bounds,
            })
        })
        .collect()
}
