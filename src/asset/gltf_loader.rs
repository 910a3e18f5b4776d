//! glTF/GLB-Import: Knotenbaum, Dreiecksnetze und Floor-Extras.

use super::model::{parse_floor_extras, ModelAsset, ModelNodeDesc};
use crate::core::{MeshData, Transform};
use anyhow::{anyhow, Context};
use glam::{Quat, Vec2, Vec3};
use std::path::Path;

/// Parst ein glTF-Dokument. Externe Buffer werden relativ zu `base_dir` gelesen.
pub fn parse_gltf(url: &str, bytes: &[u8], base_dir: Option<&Path>) -> anyhow::Result<ModelAsset> {
    let gltf = gltf::Gltf::from_slice(bytes)
        .with_context(|| format!("glTF '{}' konnte nicht geparst werden", url))?;

    let mut buffer_data: Vec<Vec<u8>> = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                let blob = gltf
                    .blob
                    .as_deref()
                    .ok_or_else(|| anyhow!("GLB-Binärblock fehlt in '{}'", url))?;
                buffer_data.push(blob.to_vec());
            }
            gltf::buffer::Source::Uri(uri) => {
                let dir = base_dir
                    .ok_or_else(|| anyhow!("Externer Buffer '{}' ohne Basisverzeichnis", uri))?;
                let bin = std::fs::read(dir.join(uri))
                    .with_context(|| format!("Buffer '{}' nicht lesbar", uri))?;
                buffer_data.push(bin);
            }
        }
    }

    let scene = gltf
        .default_scene()
        .or_else(|| gltf.scenes().next())
        .ok_or_else(|| anyhow!("glTF '{}' enthält keine Szene", url))?;

    let roots = scene
        .nodes()
        .map(|node| convert_node(&node, &buffer_data))
        .collect::<Vec<_>>();

    let asset = ModelAsset::new(url, roots);
    log::info!(
        "Modell '{}' geladen: {} Knoten, {} Floors",
        url,
        asset.node_count(),
        asset.floor_hierarchy().len()
    );
    Ok(asset)
}

/// Lädt eine glTF/GLB-Datei von der Platte.
pub fn load_gltf_file(path: &Path) -> anyhow::Result<ModelAsset> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Modell-Datei nicht lesbar: {}", path.display()))?;
    parse_gltf(&path.display().to_string(), &bytes, path.parent())
}

fn convert_node(node: &gltf::Node<'_>, buffers: &[Vec<u8>]) -> ModelNodeDesc {
    let name = node
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("node_{}", node.index()));

    let (t, r, s) = node.transform().decomposed();
    let transform = Transform::from_trs(
        Vec3::from_array(t),
        Quat::from_array(r).normalize(),
        Vec3::from_array(s),
    );

    let floor = node
        .extras()
        .as_ref()
        .and_then(|raw| parse_floor_extras(&name, raw.get()));

    let meshes = node
        .mesh()
        .map(|mesh| read_mesh(&mesh, buffers))
        .unwrap_or_default();

    let children = node
        .children()
        .map(|child| convert_node(&child, buffers))
        .collect();

    ModelNodeDesc {
        name,
        transform,
        meshes,
        floor,
        children,
    }
}

fn read_mesh(mesh: &gltf::Mesh<'_>, buffers: &[Vec<u8>]) -> Vec<MeshData> {
    let mut out = Vec::new();
    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            log::debug!("Primitive-Modus {:?} wird übersprungen", primitive.mode());
            continue;
        }
        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));
        let Some(positions) = reader.read_positions() else {
            continue;
        };
        let positions: Vec<Vec3> = positions.map(Vec3::from_array).collect();
        let indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..positions.len() as u32).collect(),
        };
        let normals = reader
            .read_normals()
            .map(|n| n.map(Vec3::from_array).collect())
            .unwrap_or_default();
        let uvs = reader
            .read_tex_coords(0)
            .map(|uv| uv.into_f32().map(Vec2::from_array).collect())
            .unwrap_or_default();
        out.push(MeshData {
            positions,
            normals,
            uvs,
            indices,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Dokument ohne Buffer, nur Knoten mit Floor-Extras.
    const FLOOR_ONLY_GLTF: &str = r#"{
        "asset": {"version": "2.0"},
        "scene": 0,
        "scenes": [{"nodes": [0]}],
        "nodes": [
            {"name": "Building", "children": [1, 2]},
            {"name": "Level_0", "translation": [0.0, 0.0, 0.0],
             "extras": {"type": "floor", "floorId": "F1", "sortingOrder": 0, "displayName": "EG"}},
            {"name": "Level_1", "translation": [0.0, 4.0, 0.0],
             "extras": {"type": "floor", "floorId": "F2", "sortingOrder": 1, "displayName": "OG"}}
        ]
    }"#;

    #[test]
    fn test_parse_gltf_reads_floor_extras() {
        let asset = parse_gltf("station.gltf", FLOOR_ONLY_GLTF.as_bytes(), None)
            .expect("glTF sollte geparst werden");
        assert_eq!(asset.node_count(), 3);
        let floors = asset.floor_hierarchy();
        assert_eq!(floors.len(), 2);
        assert_eq!(floors[1].object_name, "Level_1");
        assert_eq!(asset.roots[0].children[1].transform.translation.y, 4.0);
    }

    #[test]
    fn test_parse_gltf_rejects_garbage() {
        assert!(parse_gltf("kaputt.glb", b"not a gltf", None).is_err());
    }
}
