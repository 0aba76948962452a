//! Render-ready objects produced by conversion.

use nalgebra::Point3;

use crate::{Aabb, Color};

bitflags::bitflags! {
    /// How a renderable is drawn.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct RenderFlags: u8 {
        /// Filled polygon in 3D views.
        const POLYGON   = 0b0000_0001;
        /// Outline in 2D views (and in 3D when forced).
        const WIREFRAME = 0b0000_0010;
        /// Vertex points in 2D views.
        const POINT     = 0b0000_0100;
    }
}

/// A face corner in render space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub texture_u: f32,
    pub texture_v: f32,
}

impl Vertex {
    pub fn new(position: Point3<f32>, texture_u: f32, texture_v: f32) -> Self {
        Self {
            position,
            texture_u,
            texture_v,
        }
    }
}

/// Surface appearance of a renderable face.
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    /// A single color; alpha carries the opacity.
    Flat { color: Color },
    /// A named texture.
    Texture {
        name: String,
        opacity: f32,
        transparent: bool,
    },
}

impl Material {
    pub fn flat(color: Color) -> Self {
        Self::Flat { color }
    }

    /// A fully opaque texture whose transparency follows the texture itself.
    pub fn texture(name: impl Into<String>, transparent: bool) -> Self {
        Self::Texture {
            name: name.into(),
            opacity: 1.0,
            transparent,
        }
    }

    /// A texture drawn at reduced opacity. Always blended.
    pub fn texture_with_opacity(name: impl Into<String>, opacity: f32) -> Self {
        Self::Texture {
            name: name.into(),
            opacity,
            transparent: true,
        }
    }

    /// Returns `true` if the material must be drawn with blending.
    pub fn is_transparent(&self) -> bool {
        match self {
            Self::Flat { color } => color.a < 255,
            Self::Texture { transparent, .. } => *transparent,
        }
    }

    /// Returns the base color: the flat color, or white at the texture's opacity.
    pub fn color(&self) -> Color {
        match self {
            Self::Flat { color } => *color,
            Self::Texture { opacity, .. } => Color::WHITE.with_opacity(*opacity),
        }
    }

    /// Returns the texture name, if textured.
    pub fn texture_name(&self) -> Option<&str> {
        match self {
            Self::Flat { .. } => None,
            Self::Texture { name, .. } => Some(name),
        }
    }
}

/// The render-ready form of a map face.
///
/// Created by conversion and rewritten in place by incremental updates.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderableFace {
    pub material: Material,
    pub vertices: Vec<Vertex>,
    /// Outline color.
    pub accent_color: Color,
    /// Color of vertex points.
    pub point_color: Color,
    /// Multiplied over the material; alpha below 255 overlays a tint.
    pub tint_color: Color,
    pub selected: bool,
    /// Flags chosen by the view.
    pub render_flags: RenderFlags,
    /// Flags drawn regardless of the view's choice.
    pub forced_render_flags: RenderFlags,
}

impl RenderableFace {
    /// Creates an unselected face drawn as polygon and wireframe.
    pub fn new(material: Material, vertices: Vec<Vertex>) -> Self {
        Self {
            material,
            vertices,
            accent_color: Color::WHITE,
            point_color: Color::WHITE,
            tint_color: Color::WHITE,
            selected: false,
            render_flags: RenderFlags::POLYGON | RenderFlags::WIREFRAME,
            forced_render_flags: RenderFlags::empty(),
        }
    }

    /// Returns the union of the view flags and the forced flags.
    #[inline]
    pub fn effective_flags(&self) -> RenderFlags {
        self.render_flags | self.forced_render_flags
    }

    /// Returns the bounds of the vertices, `None` for a face without any.
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.vertices.iter().map(|v| &v.position))
    }
}

/// A wire box drawn around a selected solid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub aabb: Aabb,
    pub color: Color,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_quad() -> Vec<Vertex> {
        vec![
            Vertex::new(Point3::new(0.0, 0.0, 0.0), 0.0, 0.0),
            Vertex::new(Point3::new(1.0, 0.0, 0.0), 1.0, 0.0),
            Vertex::new(Point3::new(1.0, 1.0, 0.0), 1.0, 1.0),
            Vertex::new(Point3::new(0.0, 1.0, 0.0), 0.0, 1.0),
        ]
    }

    #[test]
    fn new_face_defaults() {
        let face = RenderableFace::new(Material::flat(Color::WHITE), make_quad());
        assert_eq!(face.render_flags, RenderFlags::POLYGON | RenderFlags::WIREFRAME);
        assert!(face.forced_render_flags.is_empty());
        assert!(!face.selected);
        assert_eq!(face.tint_color, Color::WHITE);
    }

    #[test]
    fn effective_flags_include_forced() {
        let mut face = RenderableFace::new(Material::flat(Color::WHITE), make_quad());
        face.render_flags = RenderFlags::POLYGON;
        face.forced_render_flags = RenderFlags::WIREFRAME;
        assert_eq!(face.effective_flags(), RenderFlags::POLYGON | RenderFlags::WIREFRAME);
    }

    #[test]
    fn bounds_cover_vertices() {
        let face = RenderableFace::new(Material::flat(Color::WHITE), make_quad());
        let bounds = face.bounds().unwrap();
        assert_eq!(bounds.min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(bounds.max, Point3::new(1.0, 1.0, 0.0));

        let empty = RenderableFace::new(Material::flat(Color::WHITE), vec![]);
        assert!(empty.bounds().is_none());
    }

    #[test]
    fn material_transparency() {
        assert!(!Material::flat(Color::RED).is_transparent());
        assert!(Material::flat(Color::RED.with_alpha(10)).is_transparent());
        assert!(Material::texture("glass", true).is_transparent());
        assert!(!Material::texture("brick", false).is_transparent());
        assert!(Material::texture_with_opacity("brick", 0.5).is_transparent());
        assert_eq!(Material::texture_with_opacity("brick", 0.5).color().a, 127);
        assert_eq!(Material::texture("brick", false).texture_name(), Some("brick"));
    }
}
