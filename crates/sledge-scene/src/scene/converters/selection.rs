//! Selection boxes around selected solids.

use crate::scene::face::BoundingBox;
use crate::scene::registry::{SceneKey, SceneMapObject, SceneObject};
use crate::{Aabb, Color, MapSolid, SolidId};

use super::{ConversionContext, ConverterPriority, SceneConverter};

/// Draws a box around selected solids, keyed by the solid itself.
#[derive(Debug, Clone, Copy)]
pub struct SelectionBoundsConverter {
    pub color: Color,
}

impl Default for SelectionBoundsConverter {
    fn default() -> Self {
        Self { color: Color::RED }
    }
}

impl SceneConverter for SelectionBoundsConverter {
    fn priority(&self) -> ConverterPriority {
        ConverterPriority::OverrideLow
    }

    fn supports(&self, _solid: &MapSolid) -> bool {
        true
    }

    fn should_stop_processing(&self, _registry: &SceneMapObject, _solid: &MapSolid) -> bool {
        false
    }

    fn convert(
        &self,
        registry: &mut SceneMapObject,
        _ctx: &ConversionContext<'_>,
        id: SolidId,
        solid: &MapSolid,
    ) -> bool {
        if let Some(aabb) = selected_bounds(solid) {
            let object = SceneObject::Bounds(BoundingBox {
                aabb,
                color: self.color,
            });
            registry.insert(SceneKey::Solid(id), object);
        }
        true
    }

    fn update(
        &self,
        registry: &mut SceneMapObject,
        _ctx: &ConversionContext<'_>,
        id: SolidId,
        solid: &MapSolid,
    ) -> bool {
        let key = SceneKey::Solid(id);
        match (selected_bounds(solid), registry.get_mut(&key)) {
            (Some(aabb), Some(SceneObject::Bounds(existing))) => {
                existing.aabb = aabb;
                existing.color = self.color;
            }
            // Something else owns the solid key.
            (_, Some(SceneObject::Face(_))) => return false,
            (Some(aabb), None) => {
                let object = SceneObject::Bounds(BoundingBox {
                    aabb,
                    color: self.color,
                });
                registry.insert_first(key, object);
            }
            (None, Some(SceneObject::Bounds(_))) => {
                registry.remove(&key);
            }
            (None, None) => {}
        }
        true
    }
}

fn selected_bounds(solid: &MapSolid) -> Option<Aabb> {
    if solid.is_selected() {
        solid.bounds()
    } else {
        None
    }
}
