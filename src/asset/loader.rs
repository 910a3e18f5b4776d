//! Lader-Abstraktion: URL → `ModelAsset`.
//!
//! Der Host entscheidet, woher Assets kommen. Die Engine kennt nur die URL.

use super::gltf_loader::{load_gltf_file, parse_gltf};
use super::model::ModelAsset;
use anyhow::anyhow;
use std::collections::HashMap;
use std::path::PathBuf;

/// Quelle für Modell-Assets.
pub trait ModelLoader {
    fn load(&mut self, url: &str) -> anyhow::Result<ModelAsset>;
}

/// Lädt glTF/GLB-Dateien relativ zu einem Basisverzeichnis.
#[derive(Debug, Clone)]
pub struct GltfFileLoader {
    base_dir: PathBuf,
}

impl GltfFileLoader {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }
}

impl ModelLoader for GltfFileLoader {
    fn load(&mut self, url: &str) -> anyhow::Result<ModelAsset> {
        let path = self.base_dir.join(url);
        let mut asset = load_gltf_file(&path)?;
        asset.url = url.to_string();
        Ok(asset)
    }
}

/// In-Memory-Lader: vorab registrierte Assets oder glTF-Bytes.
#[derive(Debug, Default, Clone)]
pub struct MemoryModelLoader {
    assets: HashMap<String, ModelAsset>,
    raw: HashMap<String, Vec<u8>>,
}

impl MemoryModelLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registriert ein fertiges Asset unter seiner URL.
    pub fn insert(&mut self, asset: ModelAsset) {
        self.assets.insert(asset.url.clone(), asset);
    }

    /// Registriert rohe glTF/GLB-Bytes, die beim Laden geparst werden.
    pub fn insert_bytes(&mut self, url: &str, bytes: Vec<u8>) {
        self.raw.insert(url.to_string(), bytes);
    }

    pub fn with(mut self, asset: ModelAsset) -> Self {
        self.insert(asset);
        self
    }
}

impl ModelLoader for MemoryModelLoader {
    fn load(&mut self, url: &str) -> anyhow::Result<ModelAsset> {
        if let Some(asset) = self.assets.get(url) {
            return Ok(asset.clone());
        }
        match self.raw.get(url) {
            Some(bytes) => parse_gltf(url, bytes, None),
            None => Err(anyhow!("Unbekannte Modell-URL: {}", url)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::ModelNodeDesc;

    #[test]
    fn test_memory_loader_returns_clone() {
        let mut loader = MemoryModelLoader::new().with(ModelAsset::new(
            "car.glb",
            vec![ModelNodeDesc::new("car")],
        ));
        let asset = loader.load("car.glb").expect("Asset registriert");
        assert_eq!(asset.node_count(), 1);
        assert!(loader.load("fehlt.glb").is_err());
    }

    #[test]
    fn test_file_loader_missing_file_is_error() {
        let mut loader = GltfFileLoader::new("/nonexistent");
        assert!(loader.load("station.glb").is_err());
    }
}
