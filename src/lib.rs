//! Facility Scene Authoring Library.
//! Headless Engine zum Platzieren, Bearbeiten und Animieren von Markern,
//! Labels, Pfaden und Zügen auf hierarchischen Gebäudemodellen.

pub mod app;
pub mod asset;
pub mod core;
pub mod shared;

pub use app::{
    ActiveTool, AuthoringController, EngineCommand, EngineError, EngineEvent, EngineIntent,
    EngineState, EntityType, GizmoMode, HostEvent, SceneAuthoringContext,
};
pub use asset::{GltfFileLoader, MemoryModelLoader, ModelAsset, ModelLoader, ModelNodeDesc};
pub use core::{
    CameraState, EntityId, LabelData, LabelDraft, MarkerDraft, PathData, PathDraft, PathMode,
    PoiData, TrainData, TrainDraft, TrainPhase,
};
pub use shared::{EngineOptions, PointerButton, RenderScene};
