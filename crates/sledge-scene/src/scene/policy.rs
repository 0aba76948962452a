//! Visibility and material rules for map faces.

use crate::{DisplaySettings, MapFace, MapSolid, TextureStore};

use super::face::Material;

/// Special textures below this opacity count as "null" textures.
pub const NULL_TEXTURE_OPACITY: f32 = 0.1;

/// Decides whether a face produces a renderable at all.
///
/// A face is hidden when null textures are hidden and its texture is one, or
/// when displacement solids are hidden and it is a plain face of a solid that
/// has a displacement face. Otherwise its own hidden flag decides.
pub fn is_visible(face: &MapFace, parent: Option<&MapSolid>, settings: &DisplaySettings) -> bool {
    if settings.hide_null_textures
        && settings.special_texture_opacity(face.texture()) < NULL_TEXTURE_OPACITY
    {
        return false;
    }

    if settings.hide_displacement_solids
        && !face.is_displacement()
        && parent.is_some_and(MapSolid::has_displacement)
    {
        return false;
    }

    !face.is_hidden()
}

/// Returns the opacity a face is drawn with.
///
/// Null textures are drawn opaque when they are not being hidden.
pub fn effective_opacity(face: &MapFace, settings: &DisplaySettings) -> f32 {
    let opacity = settings.special_texture_opacity(face.texture());
    if opacity < NULL_TEXTURE_OPACITY && !settings.hide_null_textures {
        1.0
    } else {
        opacity
    }
}

/// Derives the material of a face.
///
/// Faces whose texture is unknown fall back to their flat color with the
/// effective opacity in the alpha channel.
pub fn derive_material(
    face: &MapFace,
    settings: &DisplaySettings,
    textures: &dyn TextureStore,
) -> Material {
    let opacity = effective_opacity(face, settings);
    match textures.lookup(face.texture()) {
        None => Material::flat(face.color().with_opacity(opacity)),
        Some(texture) if opacity < 1.0 => Material::texture_with_opacity(texture.name(), opacity),
        Some(texture) => Material::texture(texture.name(), texture.is_transparent()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, FaceKind, IdGenerator, MapVertex, TextureCollection, TextureFlags, TextureItem};
    use nalgebra::Point3;

    fn make_face(ids: &mut IdGenerator, texture: &str) -> MapFace {
        let vertices = vec![
            MapVertex::new(Point3::new(0.0, 0.0, 0.0), 0.0, 0.0),
            MapVertex::new(Point3::new(1.0, 0.0, 0.0), 1.0, 0.0),
            MapVertex::new(Point3::new(1.0, 1.0, 0.0), 1.0, 1.0),
        ];
        MapFace::new(ids.next_face_id(), texture, vertices).with_color(Color::rgb(10, 20, 30))
    }

    fn make_textures() -> TextureCollection {
        TextureCollection::new()
            .with(TextureItem::new("brick", TextureFlags::empty()))
            .with(TextureItem::new("glass", TextureFlags::TRANSPARENT))
            .with(TextureItem::new("clip", TextureFlags::empty()))
            .with(TextureItem::new("null", TextureFlags::empty()))
    }

    #[test]
    fn null_texture_hidden_only_when_enabled() {
        let mut ids = IdGenerator::new();
        let face = make_face(&mut ids, "null");

        let hiding = DisplaySettings::new().with_hide_null_textures(true);
        let showing = DisplaySettings::new().with_hide_null_textures(false);
        assert!(!is_visible(&face, None, &hiding));
        assert!(is_visible(&face, None, &showing));
    }

    #[test]
    fn hidden_flag_hides() {
        let mut ids = IdGenerator::new();
        let mut face = make_face(&mut ids, "brick");
        face.set_hidden(true);
        assert!(!is_visible(&face, None, &DisplaySettings::new()));
    }

    #[test]
    fn displacement_solid_hides_plain_faces() {
        let mut ids = IdGenerator::new();
        let plain = make_face(&mut ids, "brick");
        let disp = make_face(&mut ids, "brick").with_kind(FaceKind::Displacement);
        let solid = MapSolid::new(vec![plain.clone(), disp.clone()]);
        let settings = DisplaySettings::new().with_hide_displacement_solids(true);

        assert!(!is_visible(&plain, Some(&solid), &settings));
        assert!(is_visible(&disp, Some(&solid), &settings));
        assert!(is_visible(&plain, None, &settings));

        let plain_solid = MapSolid::new(vec![plain.clone()]);
        assert!(is_visible(&plain, Some(&plain_solid), &settings));
    }

    #[test]
    fn hiding_null_textures_only_removes_faces() {
        let mut ids = IdGenerator::new();
        let faces: Vec<_> = ["brick", "null", "clip", "skip", "glass"]
            .iter()
            .map(|t| make_face(&mut ids, t))
            .collect();
        let off = DisplaySettings::new().with_hide_null_textures(false);
        let on = DisplaySettings::new().with_hide_null_textures(true);

        for face in &faces {
            if is_visible(face, None, &on) {
                assert!(is_visible(face, None, &off));
            }
        }
    }

    #[test]
    fn unknown_texture_is_flat() {
        let mut ids = IdGenerator::new();
        let face = make_face(&mut ids, "missing");
        let material = derive_material(&face, &DisplaySettings::new(), &make_textures());
        assert_eq!(material, Material::flat(Color::rgba(10, 20, 30, 255)));
    }

    #[test]
    fn null_texture_opaque_when_not_hidden() {
        let mut ids = IdGenerator::new();
        let face = make_face(&mut ids, "null");
        let settings = DisplaySettings::new().with_hide_null_textures(false);

        assert_eq!(effective_opacity(&face, &settings), 1.0);
        assert_eq!(
            derive_material(&face, &settings, &make_textures()),
            Material::texture("null", false)
        );

        let flat = make_face(&mut ids, "skip");
        match derive_material(&flat, &settings, &TextureCollection::new()) {
            Material::Flat { color } => assert_eq!(color.a, 255),
            other => panic!("expected flat material, got {other:?}"),
        }
    }

    #[test]
    fn partial_opacity_texture() {
        let mut ids = IdGenerator::new();
        let face = make_face(&mut ids, "clip");
        let material = derive_material(&face, &DisplaySettings::new(), &make_textures());
        assert_eq!(material, Material::texture_with_opacity("clip", 0.5));

        let flat = derive_material(&face, &DisplaySettings::new(), &TextureCollection::new());
        assert_eq!(flat, Material::flat(Color::rgba(10, 20, 30, 127)));
    }

    #[test]
    fn opaque_texture_keeps_transparency_flag() {
        let mut ids = IdGenerator::new();
        let settings = DisplaySettings::new();
        let textures = make_textures();

        let glass = make_face(&mut ids, "glass");
        assert_eq!(derive_material(&glass, &settings, &textures), Material::texture("glass", true));
        let brick = make_face(&mut ids, "BRICK");
        assert_eq!(derive_material(&brick, &settings, &textures), Material::texture("brick", false));
    }

    #[test]
    fn custom_threshold_boundary() {
        let mut ids = IdGenerator::new();
        let face = make_face(&mut ids, "thin");
        let table = crate::SpecialTextureOpacities::empty().with("thin", NULL_TEXTURE_OPACITY);
        let settings = DisplaySettings::new()
            .with_hide_null_textures(true)
            .with_special_textures(table);

        assert!(is_visible(&face, None, &settings));
        assert_eq!(effective_opacity(&face, &settings), NULL_TEXTURE_OPACITY);
    }
}
