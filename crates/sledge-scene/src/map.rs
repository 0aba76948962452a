//! Editable map geometry: solids and the faces they own.
//!
//! Map data lives in editor space (`f64`). Conversion casts positions into
//! render space (`f32`).

use nalgebra::{Point3, Vector3};

use crate::{Aabb, Color};

slotmap::new_key_type! {
    /// Generational handle to a solid stored in a [`MapDocument`](crate::MapDocument).
    pub struct SolidId;
}

/// Stable identifier of a face, unique within a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FaceId(u64);

impl FaceId {
    /// Returns the raw id value.
    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Hands out increasing [`FaceId`]s.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last_face: u64,
}

impl IdGenerator {
    /// Creates a generator whose first id is 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a fresh face id.
    pub fn next_face_id(&mut self) -> FaceId {
        self.last_face += 1;
        FaceId(self.last_face)
    }
}

/// Whether a face is a plain polygon or a sculpted displacement surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FaceKind {
    #[default]
    Plain,
    Displacement,
}

/// A face corner: position plus texture coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapVertex {
    pub position: Point3<f64>,
    pub texture_u: f64,
    pub texture_v: f64,
}

impl MapVertex {
    pub fn new(position: Point3<f64>, texture_u: f64, texture_v: f64) -> Self {
        Self {
            position,
            texture_u,
            texture_v,
        }
    }
}

/// A face of a solid.
///
/// The parent solid is a non-owning handle; it is `None` for transient faces
/// that were never added to a document.
#[derive(Debug, Clone, PartialEq)]
pub struct MapFace {
    id: FaceId,
    parent: Option<SolidId>,
    vertices: Vec<MapVertex>,
    texture: String,
    color: Color,
    hidden: bool,
    selected: bool,
    kind: FaceKind,
}

impl MapFace {
    /// Creates a visible, unselected, plain white face.
    pub fn new(id: FaceId, texture: impl Into<String>, vertices: Vec<MapVertex>) -> Self {
        Self {
            id,
            parent: None,
            vertices,
            texture: texture.into(),
            color: Color::WHITE,
            hidden: false,
            selected: false,
            kind: FaceKind::Plain,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_kind(mut self, kind: FaceKind) -> Self {
        self.kind = kind;
        self
    }

    #[inline]
    pub fn id(&self) -> FaceId {
        self.id
    }

    /// Returns the handle of the owning solid, if attached to one.
    #[inline]
    pub fn parent(&self) -> Option<SolidId> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<SolidId>) {
        self.parent = parent;
    }

    #[inline]
    pub fn vertices(&self) -> &[MapVertex] {
        &self.vertices
    }

    #[inline]
    pub fn vertices_mut(&mut self) -> &mut Vec<MapVertex> {
        &mut self.vertices
    }

    /// Returns the texture name.
    #[inline]
    pub fn texture(&self) -> &str {
        &self.texture
    }

    pub fn set_texture(&mut self, texture: impl Into<String>) {
        self.texture = texture.into();
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    #[inline]
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    #[inline]
    pub fn kind(&self) -> FaceKind {
        self.kind
    }

    #[inline]
    pub fn is_displacement(&self) -> bool {
        self.kind == FaceKind::Displacement
    }

    /// Returns the vertex positions cast to render space.
    pub fn render_positions(&self) -> impl Iterator<Item = Point3<f32>> + '_ {
        self.vertices.iter().map(|v| v.position.cast::<f32>())
    }

    /// Computes the render-space unit normal from the first three vertices.
    ///
    /// Returns `None` for faces with fewer than three vertices or collinear
    /// leading vertices.
    pub fn unit_normal(&self) -> Option<Vector3<f32>> {
        let mut positions = self.render_positions();
        let (a, b, c) = (positions.next()?, positions.next()?, positions.next()?);
        let n = (b - a).cross(&(c - a));
        let len = n.norm();
        if len > f32::EPSILON {
            Some(n / len)
        } else {
            None
        }
    }

    /// Returns the render-space bounds of the face.
    pub fn bounds(&self) -> Option<Aabb> {
        let positions: Vec<Point3<f32>> = self.render_positions().collect();
        Aabb::from_points(&positions)
    }
}

/// A convex solid. Owns its faces; selecting the solid emphasises all of them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MapSolid {
    faces: Vec<MapFace>,
    selected: bool,
}

impl MapSolid {
    /// Creates an unselected solid from its faces.
    pub fn new(faces: Vec<MapFace>) -> Self {
        Self {
            faces,
            selected: false,
        }
    }

    /// Creates an axis-aligned box with six quad faces wound counter-clockwise
    /// when viewed from outside.
    ///
    /// Texture coordinates are a planar projection onto each face's axes.
    pub fn cuboid(
        ids: &mut IdGenerator,
        min: Point3<f64>,
        max: Point3<f64>,
        texture: &str,
        color: Color,
    ) -> Self {
        let corners = [
            Point3::new(min.x, min.y, min.z), // 0: left-bottom-back
            Point3::new(max.x, min.y, min.z), // 1: right-bottom-back
            Point3::new(max.x, max.y, min.z), // 2: right-top-back
            Point3::new(min.x, max.y, min.z), // 3: left-top-back
            Point3::new(min.x, min.y, max.z), // 4: left-bottom-front
            Point3::new(max.x, min.y, max.z), // 5: right-bottom-front
            Point3::new(max.x, max.y, max.z), // 6: right-top-front
            Point3::new(min.x, max.y, max.z), // 7: left-top-front
        ];

        // (corner indices, axis of the face normal)
        let faces: [([usize; 4], usize); 6] = [
            ([4, 5, 6, 7], 2), // front (+Z)
            ([1, 0, 3, 2], 2), // back (-Z)
            ([0, 4, 7, 3], 0), // left (-X)
            ([5, 1, 2, 6], 0), // right (+X)
            ([7, 6, 2, 3], 1), // top (+Y)
            ([0, 1, 5, 4], 1), // bottom (-Y)
        ];

        let faces = faces
            .iter()
            .map(|(indices, normal_axis)| {
                let u_axis = (normal_axis + 1) % 3;
                let v_axis = (normal_axis + 2) % 3;
                let vertices = indices
                    .iter()
                    .map(|&i| {
                        let p = corners[i];
                        MapVertex::new(p, p[u_axis], p[v_axis])
                    })
                    .collect();
                MapFace::new(ids.next_face_id(), texture, vertices).with_color(color)
            })
            .collect();

        Self::new(faces)
    }

    #[inline]
    pub fn faces(&self) -> &[MapFace] {
        &self.faces
    }

    #[inline]
    pub fn faces_mut(&mut self) -> &mut [MapFace] {
        &mut self.faces
    }

    /// Appends a face. Its parent handle is set when the solid is stored in a document.
    pub fn push_face(&mut self, face: MapFace) {
        self.faces.push(face);
    }

    /// Finds a face by id.
    pub fn face(&self, id: FaceId) -> Option<&MapFace> {
        self.faces.iter().find(|f| f.id == id)
    }

    /// Finds a face by id, mutably.
    pub fn face_mut(&mut self, id: FaceId) -> Option<&mut MapFace> {
        self.faces.iter_mut().find(|f| f.id == id)
    }

    #[inline]
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    /// Returns `true` if any face is a displacement.
    pub fn has_displacement(&self) -> bool {
        self.faces.iter().any(MapFace::is_displacement)
    }

    /// Returns the render-space bounds of all faces.
    pub fn bounds(&self) -> Option<Aabb> {
        self.faces
            .iter()
            .filter_map(MapFace::bounds)
            .reduce(|a, b| a.union(&b))
    }

    pub(crate) fn attach_faces(&mut self, id: SolidId) {
        for face in &mut self.faces {
            face.set_parent(Some(id));
        }
    }
}
