//! The default converter: one renderable per visible face.

use crate::scene::policy::is_visible;
use crate::scene::registry::{SceneKey, SceneMapObject, SceneObject};
use crate::{MapFace, MapSolid, SolidId};

use super::face::{convert_face, update_face};
use super::{ConversionContext, ConverterPriority, SceneConverter};

/// Produces one renderable face per visible face of a solid.
///
/// Updates pair the currently visible faces with the existing face entries
/// by position, not by id. When the visible set changes size the update
/// fails and the solid is rebuilt. When it keeps its size but changes
/// membership, each entry is rewritten from the face now at its position
/// and re-keyed to that face's id.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSolidConverter;

impl SceneConverter for DefaultSolidConverter {
    fn priority(&self) -> ConverterPriority {
        ConverterPriority::DefaultLowest
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
        ctx: &ConversionContext<'_>,
        _id: SolidId,
        solid: &MapSolid,
    ) -> bool {
        for face in visible_faces(solid, ctx) {
            let renderable = convert_face(face, Some(solid), ctx);
            registry.insert(SceneKey::Face(face.id()), SceneObject::Face(renderable));
        }
        true
    }

    fn update(
        &self,
        registry: &mut SceneMapObject,
        ctx: &ConversionContext<'_>,
        _id: SolidId,
        solid: &MapSolid,
    ) -> bool {
        let faces: Vec<&MapFace> = visible_faces(solid, ctx).collect();
        let mut entries: Vec<&mut SceneObject> = registry.face_entries_mut().collect();
        if entries.len() != faces.len() {
            log::trace!(
                "visible face count changed from {} to {}",
                entries.len(),
                faces.len()
            );
            return false;
        }

        for (face, entry) in faces.iter().zip(entries.iter_mut()) {
            let Some(renderable) = entry.as_face_mut() else {
                return false;
            };
            if !update_face(face, Some(solid), renderable, ctx) {
                return false;
            }
        }

        registry.rekey_faces(faces.iter().map(|f| f.id()));
        true
    }
}

fn visible_faces<'s>(
    solid: &'s MapSolid,
    ctx: &ConversionContext<'_>,
) -> impl Iterator<Item = &'s MapFace> {
    let settings = ctx.settings;
    solid
        .faces()
        .iter()
        .filter(move |face| is_visible(face, Some(solid), settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::face::RenderFlags;
    use crate::{Color, DisplaySettings, IdGenerator, MapDocument, MapVertex, TextureCollection};
    use nalgebra::Point3;

    fn make_face(ids: &mut IdGenerator, texture: &str, z: f64) -> MapFace {
        let vertices = vec![
            MapVertex::new(Point3::new(0.0, 0.0, z), 0.0, 0.0),
            MapVertex::new(Point3::new(1.0, 0.0, z), 1.0, 0.0),
            MapVertex::new(Point3::new(1.0, 1.0, z), 1.0, 1.0),
            MapVertex::new(Point3::new(0.0, 1.0, z), 0.0, 1.0),
        ];
        MapFace::new(ids.next_face_id(), texture, vertices).with_color(Color::rgb(0, 128, 255))
    }

    fn convert(solid: &MapSolid, settings: &DisplaySettings) -> SceneMapObject {
        let textures = TextureCollection::new();
        let ctx = ConversionContext::new(settings, &textures);
        let mut registry = SceneMapObject::new();
        assert!(DefaultSolidConverter.convert(&mut registry, &ctx, SolidId::default(), solid));
        registry
    }

    fn update(registry: &mut SceneMapObject, solid: &MapSolid, settings: &DisplaySettings) -> bool {
        let textures = TextureCollection::new();
        let ctx = ConversionContext::new(settings, &textures);
        DefaultSolidConverter.update(registry, &ctx, SolidId::default(), solid)
    }

    fn face_keys(registry: &SceneMapObject) -> Vec<SceneKey> {
        registry.keys().copied().collect()
    }

    #[test]
    fn converts_visible_faces_in_order() {
        let mut ids = IdGenerator::new();
        let mut hidden = make_face(&mut ids, "brick", 3.0);
        hidden.set_hidden(true);
        let faces = vec![
            make_face(&mut ids, "brick", 0.0),
            make_face(&mut ids, "null", 1.0),
            make_face(&mut ids, "brick", 2.0),
            hidden,
        ];
        let solid = MapSolid::new(faces.clone());
        let settings = DisplaySettings::new().with_hide_null_textures(true);

        let registry = convert(&solid, &settings);
        assert_eq!(
            face_keys(&registry),
            vec![SceneKey::Face(faces[0].id()), SceneKey::Face(faces[2].id())]
        );
        for (_, renderable) in registry.faces() {
            assert!(!renderable.selected);
            assert_eq!(renderable.tint_color, Color::WHITE);
            assert_eq!(renderable.render_flags, RenderFlags::POLYGON | RenderFlags::WIREFRAME);
        }
    }

    #[test]
    fn update_with_same_faces_matches_convert() {
        let mut ids = IdGenerator::new();
        let mut solid = MapSolid::new(vec![
            make_face(&mut ids, "brick", 0.0),
            make_face(&mut ids, "brick", 1.0),
        ]);
        let settings = DisplaySettings::new();
        let mut registry = convert(&solid, &settings);

        solid.set_selected(true);
        solid.faces_mut()[1].set_texture("clip");
        assert!(update(&mut registry, &solid, &settings));
        assert_eq!(registry, convert(&solid, &settings));
    }

    #[test]
    fn count_change_fails_update() {
        let mut ids = IdGenerator::new();
        let mut solid = MapSolid::new(vec![
            make_face(&mut ids, "brick", 0.0),
            make_face(&mut ids, "brick", 1.0),
        ]);
        let settings = DisplaySettings::new();
        let mut registry = convert(&solid, &settings);

        solid.faces_mut()[0].set_hidden(true);
        assert!(!update(&mut registry, &solid, &settings));
    }

    #[test]
    fn reorder_pairs_by_position() {
        let mut ids = IdGenerator::new();
        let a = make_face(&mut ids, "brick", 0.0);
        let b = make_face(&mut ids, "brick", 1.0);
        let c = make_face(&mut ids, "brick", 2.0);
        let settings = DisplaySettings::new();
        let registry_before = convert(&MapSolid::new(vec![a.clone(), b.clone(), c.clone()]), &settings);

        let reordered = MapSolid::new(vec![a.clone(), c.clone(), b.clone()]);
        let mut registry = registry_before.clone();
        assert!(update(&mut registry, &reordered, &settings));

        assert_eq!(
            face_keys(&registry),
            vec![
                SceneKey::Face(a.id()),
                SceneKey::Face(c.id()),
                SceneKey::Face(b.id())
            ]
        );
        let c_face = registry.get(&SceneKey::Face(c.id())).and_then(SceneObject::as_face);
        assert_eq!(c_face.unwrap().vertices[0].position.z, 2.0);
        assert_eq!(registry, convert(&reordered, &settings));
    }

    #[test]
    fn membership_change_rekeys_entries() {
        let mut ids = IdGenerator::new();
        let a = make_face(&mut ids, "brick", 0.0);
        let b = make_face(&mut ids, "brick", 1.0);
        let c = make_face(&mut ids, "brick", 2.0);
        let settings = DisplaySettings::new();
        let mut registry = convert(&MapSolid::new(vec![a.clone(), b.clone()]), &settings);

        let swapped = MapSolid::new(vec![a.clone(), c.clone()]);
        assert!(update(&mut registry, &swapped, &settings));
        assert!(!registry.contains_key(&SceneKey::Face(b.id())));
        assert!(registry.contains_key(&SceneKey::Face(c.id())));
        assert_eq!(registry, convert(&swapped, &settings));
    }

    #[test]
    fn update_keeps_non_face_entries_first() {
        let mut document = MapDocument::new();
        let face = make_face(&mut document.ids, "brick", 0.0);
        let id = document.add_solid(MapSolid::new(vec![face.clone()]));
        let solid = document.solid(id).unwrap();

        let mut registry = SceneMapObject::new();
        let marker = SceneObject::Bounds(crate::scene::face::BoundingBox {
            aabb: solid.bounds().unwrap(),
            color: Color::RED,
        });
        registry.insert(SceneKey::Solid(id), marker.clone());
        let textures = TextureCollection::new();
        let ctx = ConversionContext::new(&document.settings, &textures);
        assert!(DefaultSolidConverter.convert(&mut registry, &ctx, id, solid));
        assert!(DefaultSolidConverter.update(&mut registry, &ctx, id, solid));

        assert_eq!(
            face_keys(&registry),
            vec![SceneKey::Solid(id), SceneKey::Face(face.id())]
        );
        assert_eq!(registry.get(&SceneKey::Solid(id)), Some(&marker));
    }
}
