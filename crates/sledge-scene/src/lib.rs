//! Scene conversion and octree indexing for map editor geometry.
//!
//! Editable solids in a [`MapDocument`] are converted into render-ready
//! [`RenderableFace`]s by a [`ConverterChain`], grouped per solid in a
//! [`SceneMapObject`], and indexed by an [`Octree`] for viewport queries.

mod aabb;
mod color;
mod document;
mod frustum;
mod map;
pub mod octree;
mod plane;
pub mod scene;
mod settings;
mod texture;

pub use aabb::Aabb;
pub use color::Color;
pub use document::{DocumentError, MapDocument};
pub use frustum::{Frustum, Ray};
pub use map::{FaceId, FaceKind, IdGenerator, MapFace, MapSolid, MapVertex, SolidId};
pub use octree::{MaxItems, NeverSplit, Octree, OctreeNode, SplitPolicy, Spatial, Volume};
pub use plane::{Classification, Plane3D, PLANE_EPSILON};
pub use scene::{
    BoundingBox, ConversionContext, ConverterChain, ConverterPriority, Material, Refresh,
    RefreshSummary, RenderFlags, RenderableFace, Scene, SceneConverter, SceneHandle, SceneKey,
    SceneMapObject, SceneObject, Vertex,
};
pub use settings::{DisplaySettings, SpecialTextureOpacities};
pub use texture::{TextureCollection, TextureFlags, TextureItem, TextureStore};
