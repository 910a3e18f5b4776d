//! Laden hierarchischer Modell-Assets (glTF/GLB) inklusive Floor-Metadaten.

mod gltf_loader;
mod loader;
mod model;

pub use gltf_loader::{load_gltf_file, parse_gltf};
pub use loader::{GltfFileLoader, MemoryModelLoader, ModelLoader};
pub use model::{parse_floor_extras, FloorMeta, ModelAsset, ModelNodeDesc};
