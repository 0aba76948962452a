//! Renderable form of a single map face.

use crate::scene::face::{RenderFlags, RenderableFace, Vertex};
use crate::scene::policy::derive_material;
use crate::{Color, DisplaySettings, MapFace, MapSolid};

use super::ConversionContext;

/// Builds the renderable form of a face.
pub fn convert_face(
    face: &MapFace,
    parent: Option<&MapSolid>,
    ctx: &ConversionContext<'_>,
) -> RenderableFace {
    let material = derive_material(face, ctx.settings, ctx.textures);
    let mut renderable = RenderableFace::new(material, render_vertices(face));
    apply_emphasis(face, parent, ctx.settings, &mut renderable);
    renderable
}

/// Rewrites an existing renderable from the current face state. The result
/// is indistinguishable from a fresh [`convert_face`].
pub fn update_face(
    face: &MapFace,
    parent: Option<&MapSolid>,
    existing: &mut RenderableFace,
    ctx: &ConversionContext<'_>,
) -> bool {
    existing.material = derive_material(face, ctx.settings, ctx.textures);
    existing.vertices = render_vertices(face);
    existing.render_flags = RenderFlags::POLYGON | RenderFlags::WIREFRAME;
    apply_emphasis(face, parent, ctx.settings, existing);
    true
}

fn render_vertices(face: &MapFace) -> Vec<Vertex> {
    face.vertices()
        .iter()
        .map(|v| Vertex::new(v.position.cast(), v.texture_u as f32, v.texture_v as f32))
        .collect()
}

fn apply_emphasis(
    face: &MapFace,
    parent: Option<&MapSolid>,
    settings: &DisplaySettings,
    renderable: &mut RenderableFace,
) {
    let selected = face.is_selected() || parent.is_some_and(MapSolid::is_selected);

    if selected {
        renderable.accent_color = Color::RED;
        renderable.point_color = Color::RED;
        renderable.tint_color = Color::RED.with_alpha(128);
        renderable.forced_render_flags = RenderFlags::WIREFRAME;
    } else {
        renderable.accent_color = face.color();
        renderable.point_color = settings.vertex_color_override.unwrap_or(face.color());
        renderable.tint_color = Color::WHITE;
        renderable.forced_render_flags = RenderFlags::empty();
    }
    renderable.selected = selected;

    if settings.draw_2d_vertices {
        renderable.render_flags |= RenderFlags::POINT;
    }

    // Face selection mode draws selected faces with a yellow outline only.
    if settings.hide_face_mask && face.is_selected() {
        renderable.tint_color = Color::WHITE;
        renderable.accent_color = Color::YELLOW;
    }
}
