//! Core-Domänentypen: Szenengraph, Ressourcen, Kamera, Geometrie und Domänen-Records.

pub mod camera;
pub mod floor;
pub mod geometry;
pub mod ids;
pub mod mesh;
pub mod path;
pub mod poi;
pub mod resources;
/// Szenengraph mit Entities, Pick-Layern und festen Gruppen
pub mod scene_graph;
pub mod train;
pub mod transform;

pub use camera::{Camera3D, CameraState, Projection};
pub use floor::{FloorHierarchyEntry, FloorInfo, FloorRegistry};
pub use geometry::{Aabb, Plane, Ray, Sphere};
pub use ids::IdSequence;
pub use mesh::MeshData;
pub use path::{PathData, PathDraft, PathMode, PathPoint, PathRecord, PathSegment};
pub use poi::{
    LabelData, LabelDraft, LabelRecord, MarkerDraft, PoiData, PoiRecord, PropertyBag,
};
pub use resources::{GpuResource, MaterialDesc, ResourceArena, ResourceHandle};
pub use scene_graph::{
    EntityId, EntityKind, PickLayer, PickShape, SceneGraph, SceneGroup, SceneNode,
};
pub use train::{TrainData, TrainDraft, TrainPhase, TrainRecord};
pub use transform::Transform;
