//! Application-Layer: Kontext, Controller, State, Events und Use-Cases.

pub mod animation;
pub mod context;
pub mod controller;
pub mod error;
pub mod events;
mod intent_mapping;
pub mod picking;
pub mod render_scene;
/// Engine State und Stores
///
/// Dieses Modul verwaltet den Zustand der Engine (Szene, Werkzeuge, Stores).
pub mod state;
pub mod subsystems;
pub mod tools;
pub mod use_cases;

pub use context::SceneAuthoringContext;
pub use controller::AuthoringController;
pub use error::EngineError;
pub use events::{EngineCommand, EngineEvent, EngineIntent, EntityType, HostEvent};
pub use render_scene::build as build_render_scene;
pub use state::{ActiveTool, EngineState};
pub use tools::GizmoMode;
