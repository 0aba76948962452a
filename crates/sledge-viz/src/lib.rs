//! Drawing helpers and a demo map for the scene viewer.

use std::hash::{Hash, Hasher};

use macroquad::camera::Camera;
use macroquad::models::{draw_mesh, Mesh, Vertex};
use macroquad::prelude::*;
use nalgebra::{Matrix4, Point3, Vector3};
use sledge_scene::{
    BoundingBox, FaceKind, Frustum, MapDocument, MapFace, MapSolid, MapVertex, Material, Ray,
    RenderFlags, RenderableFace, SceneObject, TextureCollection, TextureFlags, TextureItem,
};

pub mod navigator;
pub use navigator::OctreeNavigator;

/// Stands in for a texture image: a stable color derived from the name.
pub fn texture_color(name: &str) -> Color {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    name.to_lowercase().hash(&mut hasher);
    let hash = hasher.finish();

    let r = ((hash >> 16) & 0xFF) as u8;
    let g = ((hash >> 8) & 0xFF) as u8;
    let b = (hash & 0xFF) as u8;

    // Keep colors readable against the dark background
    Color::from_rgba(r.max(60), g.max(60), b.max(60), 255)
}

/// Converts a scene color into a macroquad color.
pub fn to_color(color: sledge_scene::Color) -> Color {
    let [r, g, b, a] = color.to_f32_array();
    Color::new(r, g, b, a)
}

fn to_vec3(p: &Point3<f32>) -> Vec3 {
    vec3(p.x, p.y, p.z)
}

/// Returns the color a face is filled with: its material, then its tint.
///
/// An opaque tint multiplies the material; a translucent tint is blended
/// over it.
pub fn fill_color(face: &RenderableFace) -> Color {
    let base = match &face.material {
        Material::Flat { color } => to_color(*color),
        Material::Texture { name, opacity, .. } => {
            let c = texture_color(name);
            Color::new(c.r, c.g, c.b, *opacity)
        }
    };

    let tint = to_color(face.tint_color);
    if face.tint_color.a == 255 {
        Color::new(base.r * tint.r, base.g * tint.g, base.b * tint.b, base.a)
    } else {
        let t = tint.a;
        Color::new(
            base.r + (tint.r - base.r) * t,
            base.g + (tint.g - base.g) * t,
            base.b + (tint.b - base.b) * t,
            base.a,
        )
    }
}

/// Draws a renderable face: fan-triangulated fill, then outline and points
/// as its flags request.
///
/// `wireframe` is the view's choice; forced wireframe is drawn regardless.
pub fn draw_face(face: &RenderableFace, wireframe: bool) {
    let verts = &face.vertices;
    if verts.len() < 3 {
        return;
    }

    if face.render_flags.contains(RenderFlags::POLYGON) {
        let color = fill_color(face);
        let mesh_vertices: Vec<Vertex> = verts
            .iter()
            .map(|v| Vertex::new2(to_vec3(&v.position), vec2(v.texture_u, v.texture_v), color))
            .collect();

        let mut indices: Vec<u16> = Vec::with_capacity((verts.len() - 2) * 3);
        for i in 1..verts.len() - 1 {
            indices.push(0);
            indices.push(i as u16);
            indices.push((i + 1) as u16);
        }

        draw_mesh(&Mesh {
            vertices: mesh_vertices,
            indices,
            texture: None,
        });
    }

    let outline = face.forced_render_flags.contains(RenderFlags::WIREFRAME)
        || (wireframe && face.render_flags.contains(RenderFlags::WIREFRAME));
    if outline {
        let accent = to_color(face.accent_color);
        for (i, v) in verts.iter().enumerate() {
            let next = &verts[(i + 1) % verts.len()];
            draw_line_3d(to_vec3(&v.position), to_vec3(&next.position), accent);
        }
    }

    if face.effective_flags().contains(RenderFlags::POINT) {
        let point = to_color(face.point_color);
        for v in verts {
            draw_cube(to_vec3(&v.position), vec3(1.5, 1.5, 1.5), None, point);
        }
    }
}

/// Draws a selection box as its twelve edges.
pub fn draw_bounds(bounds: &BoundingBox) {
    let corners = bounds.aabb.corners();
    let color = to_color(bounds.color);
    // Corners are indexed by axis bits; an edge joins two that differ in one bit
    for (i, corner) in corners.iter().enumerate() {
        for bit in [1, 2, 4] {
            if i & bit == 0 {
                draw_line_3d(to_vec3(corner), to_vec3(&corners[i | bit]), color);
            }
        }
    }
}

/// Draws any scene object.
pub fn draw_object(object: &SceneObject, wireframe: bool) {
    match object {
        SceneObject::Face(face) => draw_face(face, wireframe),
        SceneObject::Bounds(bounds) => draw_bounds(bounds),
    }
}

/// Returns `true` if the object must be drawn after opaque geometry.
pub fn is_translucent(object: &SceneObject) -> bool {
    match object {
        SceneObject::Face(face) => face.material.is_transparent() || face.tint_color.a < 255,
        SceneObject::Bounds(_) => false,
    }
}

/// Builds the demo map: a row of boxes covering every material case, a
/// floor, and a solid with a displacement face.
pub fn demo_document() -> MapDocument {
    let textures = TextureCollection::new()
        .with(TextureItem::new("brick", TextureFlags::empty()))
        .with(TextureItem::new("concrete", TextureFlags::empty()))
        .with(TextureItem::new("glass", TextureFlags::TRANSPARENT))
        .with(TextureItem::new("tools/toolsclip", TextureFlags::empty()))
        .with(TextureItem::new("tools/toolsnodraw", TextureFlags::empty()));
    let mut document = MapDocument::new().with_textures(textures);

    let boxes = [
        ("brick", sledge_scene::Color::rgb(180, 90, 60)),
        ("glass", sledge_scene::Color::rgb(120, 200, 230)),
        ("missing", sledge_scene::Color::rgb(200, 200, 80)),
        ("tools/toolsclip", sledge_scene::Color::rgb(160, 60, 200)),
        ("tools/toolsnodraw", sledge_scene::Color::rgb(230, 230, 60)),
    ];
    for (i, (texture, color)) in boxes.iter().enumerate() {
        let x = i as f64 * 96.0 - 224.0;
        let solid = MapSolid::cuboid(
            &mut document.ids,
            Point3::new(x, 0.0, -32.0),
            Point3::new(x + 64.0, 64.0, 32.0),
            texture,
            *color,
        );
        document.add_solid(solid);
    }

    let floor = MapSolid::cuboid(
        &mut document.ids,
        Point3::new(-256.0, -16.0, -160.0),
        Point3::new(256.0, 0.0, -64.0),
        "concrete",
        sledge_scene::Color::rgb(110, 110, 110),
    );
    document.add_solid(floor);

    let mut terrain = MapSolid::cuboid(
        &mut document.ids,
        Point3::new(-128.0, -16.0, 64.0),
        Point3::new(128.0, 0.0, 192.0),
        "concrete",
        sledge_scene::Color::rgb(90, 140, 90),
    );
    terrain.push_face(displacement(&mut document, 64.0, 192.0, 0.0));
    document.add_solid(terrain);

    document
}

/// A gently raised quad lying on top of a block, marked as a displacement.
fn displacement(document: &mut MapDocument, z0: f64, z1: f64, y: f64) -> MapFace {
    let corners = [
        Vector3::new(-128.0, y + 8.0, z1),
        Vector3::new(128.0, y + 2.0, z1),
        Vector3::new(128.0, y + 12.0, z0),
        Vector3::new(-128.0, y + 4.0, z0),
    ];
    let vertices = corners
        .iter()
        .map(|c| MapVertex::new(Point3::from(*c), c.x / 64.0, c.z / 64.0))
        .collect();
    MapFace::new(document.ids.next_face_id(), "concrete", vertices)
        .with_color(sledge_scene::Color::rgb(120, 180, 110))
        .with_kind(FaceKind::Displacement)
}

/// Simple orbit camera for 3D scene navigation.
pub struct OrbitCamera {
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub target: Vec3,
    /// Multiplier for scroll wheel zoom
    pub zoom_speed: f32,
    /// Minimum distance from target
    pub min_distance: f32,
    /// Maximum distance from target
    pub max_distance: f32,
}

impl OrbitCamera {
    /// Creates a new orbit camera with the given configuration.
    pub fn new(distance: f32, yaw: f32, pitch: f32) -> Self {
        Self {
            distance,
            yaw,
            pitch,
            target: vec3(0.0, 0.0, 0.0),
            zoom_speed: 40.0,
            min_distance: 64.0,
            max_distance: 4096.0,
        }
    }

    /// Sets the zoom configuration (speed and distance limits).
    pub fn with_zoom(mut self, speed: f32, min: f32, max: f32) -> Self {
        self.zoom_speed = speed;
        self.min_distance = min;
        self.max_distance = max;
        self
    }

    /// Sets the camera target point.
    pub fn with_target(mut self, target: Vec3) -> Self {
        self.target = target;
        self
    }

    /// Updates camera state from user input (mouse drag, scroll, arrow keys).
    pub fn update(&mut self) {
        if is_mouse_button_down(MouseButton::Left) {
            let delta = mouse_delta_position();
            self.yaw -= delta.x * 2.0;
            self.pitch -= delta.y * 2.0;
        }

        // Clamp pitch to avoid gimbal lock
        self.pitch = self.pitch.clamp(-1.5, 1.5);

        let scroll = mouse_wheel().1;
        self.distance -= scroll * self.zoom_speed;
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);

        if is_key_down(KeyCode::Left) {
            self.yaw += 0.02;
        }
        if is_key_down(KeyCode::Right) {
            self.yaw -= 0.02;
        }
        if is_key_down(KeyCode::Up) {
            self.pitch += 0.02;
        }
        if is_key_down(KeyCode::Down) {
            self.pitch -= 0.02;
        }
    }

    /// Returns the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + vec3(x, y, z)
    }

    /// Converts to macroquad's Camera3D for rendering.
    pub fn to_camera3d(&self) -> Camera3D {
        Camera3D {
            position: self.position(),
            up: vec3(0.0, 1.0, 0.0),
            target: self.target,
            ..Default::default()
        }
    }

    /// Returns the eye point as a nalgebra Point3.
    pub fn eye_point(&self) -> Point3<f32> {
        let pos = self.position();
        Point3::new(pos.x, pos.y, pos.z)
    }

    /// Returns the view frustum for the current screen.
    pub fn frustum(&self) -> Frustum {
        let m = self.to_camera3d().matrix();
        Frustum::from_view_projection(&Matrix4::from_column_slice(&m.to_cols_array()))
    }

    /// Returns the ray from the eye through the center of the screen.
    pub fn center_ray(&self) -> Ray {
        let eye = self.eye_point();
        let target = Point3::new(self.target.x, self.target.y, self.target.z);
        Ray::new(eye, target - eye)
    }
}
