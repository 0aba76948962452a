//! Display settings read by the visibility and material policy.

use std::collections::HashMap;

use crate::Color;

/// Opacity overrides for tool textures (`null`, `clip`, triggers...).
///
/// Names are matched case-insensitively. Textures without an entry have
/// opacity `1.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecialTextureOpacities {
    opacities: HashMap<String, f32>,
}

impl SpecialTextureOpacities {
    /// Creates a table with no special textures.
    pub fn empty() -> Self {
        Self {
            opacities: HashMap::new(),
        }
    }

    /// Sets the opacity of a special texture.
    pub fn set(&mut self, name: &str, opacity: f32) {
        self.opacities.insert(name.to_lowercase(), opacity);
    }

    /// Builder-style [`SpecialTextureOpacities::set`].
    pub fn with(mut self, name: &str, opacity: f32) -> Self {
        self.set(name, opacity);
        self
    }

    /// Returns the opacity for a texture name, `1.0` when it is not special.
    pub fn get(&self, name: &str) -> f32 {
        self.opacities
            .get(&name.to_lowercase())
            .copied()
            .unwrap_or(1.0)
    }
}

impl Default for SpecialTextureOpacities {
    fn default() -> Self {
        let hidden = [
            "null",
            "tools/toolsnodraw",
            "skip",
            "tools/toolsskip",
            "hint",
            "tools/toolshint",
        ];
        let translucent = [
            "aaatrigger",
            "tools/toolstrigger",
            "clip",
            "tools/toolsclip",
            "origin",
            "tools/toolsorigin",
        ];

        let mut table = Self::empty();
        for name in hidden {
            table.set(name, 0.0);
        }
        for name in translucent {
            table.set(name, 0.5);
        }
        table
    }
}

/// Document and view options that change how faces are converted.
///
/// Passed explicitly into every policy and conversion call; the core never
/// mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySettings {
    /// Hide faces whose special-texture opacity is below 0.1.
    pub hide_null_textures: bool,
    /// Show only the displacement faces of solids that have any.
    pub hide_displacement_solids: bool,
    /// Suppress the red tint overlay on individually selected faces.
    pub hide_face_mask: bool,
    /// Draw face vertices as points in 2D views.
    pub draw_2d_vertices: bool,
    /// Color used for unselected vertex points instead of the face color.
    pub vertex_color_override: Option<Color>,
    /// Opacity table for tool textures.
    pub special_textures: SpecialTextureOpacities,
}

impl DisplaySettings {
    /// Creates settings with everything off and the default special-texture table.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hide_null_textures(mut self, hide: bool) -> Self {
        self.hide_null_textures = hide;
        self
    }

    pub fn with_hide_displacement_solids(mut self, hide: bool) -> Self {
        self.hide_displacement_solids = hide;
        self
    }

    pub fn with_hide_face_mask(mut self, hide: bool) -> Self {
        self.hide_face_mask = hide;
        self
    }

    pub fn with_draw_2d_vertices(mut self, draw: bool) -> Self {
        self.draw_2d_vertices = draw;
        self
    }

    pub fn with_vertex_color_override(mut self, color: Option<Color>) -> Self {
        self.vertex_color_override = color;
        self
    }

    pub fn with_special_textures(mut self, table: SpecialTextureOpacities) -> Self {
        self.special_textures = table;
        self
    }

    /// Returns the special-texture opacity for a texture name.
    #[inline]
    pub fn special_texture_opacity(&self, name: &str) -> f32 {
        self.special_textures.get(name)
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            hide_null_textures: false,
            hide_displacement_solids: false,
            hide_face_mask: false,
            draw_2d_vertices: false,
            vertex_color_override: None,
            special_textures: SpecialTextureOpacities::default(),
        }
    }
}
