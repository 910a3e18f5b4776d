//! Engine-State: zentrale Datenhaltung aller Subsysteme.

mod editor;
mod engine_state;
mod stores;
mod view;

pub use editor::{ActiveTool, EditorState};
pub use engine_state::{EngineState, LoadedModel};
pub use stores::{LabelStore, MarkerStore, ModelLibrary, PathBuild, PathStore, TrainStore};
pub use view::{CameraDrag, OrbitState, OutlineState, PointerState};
