//! Hierarchisches Modell-Asset (geladen, aber noch nicht in der Szene).

use crate::core::{Aabb, FloorHierarchyEntry, MeshData, Transform};
use glam::Mat4;
use serde::Deserialize;

/// Stockwerks-Metadaten aus den Node-Extras (`{"type":"floor", ...}`).
#[derive(Debug, Clone, PartialEq)]
pub struct FloorMeta {
    pub floor_id: String,
    pub sorting_order: i32,
    pub display_name: String,
}

/// Ein Knoten des Asset-Baums.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelNodeDesc {
    pub name: String,
    pub transform: Transform,
    pub meshes: Vec<MeshData>,
    pub floor: Option<FloorMeta>,
    pub children: Vec<ModelNodeDesc>,
}

impl ModelNodeDesc {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            transform: Transform::IDENTITY,
            meshes: Vec::new(),
            floor: None,
            children: Vec::new(),
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_mesh(mut self, mesh: MeshData) -> Self {
        self.meshes.push(mesh);
        self
    }

    pub fn with_floor(mut self, floor_id: &str, sorting_order: i32, display_name: &str) -> Self {
        self.floor = Some(FloorMeta {
            floor_id: floor_id.to_string(),
            sorting_order,
            display_name: display_name.to_string(),
        });
        self
    }

    pub fn with_child(mut self, child: ModelNodeDesc) -> Self {
        self.children.push(child);
        self
    }
}

/// Geladenes Modell mit Quell-URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelAsset {
    pub url: String,
    pub roots: Vec<ModelNodeDesc>,
}

impl ModelAsset {
    pub fn new(url: &str, roots: Vec<ModelNodeDesc>) -> Self {
        Self {
            url: url.to_string(),
            roots,
        }
    }

    /// Anzahl aller Knoten.
    pub fn node_count(&self) -> usize {
        fn count(node: &ModelNodeDesc) -> usize {
            1 + node.children.iter().map(count).sum::<usize>()
        }
        self.roots.iter().map(count).sum()
    }

    /// Bounding-Box aller Meshes im Asset-Raum.
    pub fn bounds(&self) -> Option<Aabb> {
        fn walk(node: &ModelNodeDesc, parent: Mat4, acc: &mut Option<Aabb>) {
            let world = parent * node.transform.to_matrix();
            for mesh in &node.meshes {
                if let Some(b) = mesh.bounds() {
                    let b = b.transformed(&world);
                    *acc = Some(acc.map_or(b, |a| a.union(&b)));
                }
            }
            for child in &node.children {
                walk(child, world, acc);
            }
        }
        let mut acc = None;
        for root in &self.roots {
            walk(root, Mat4::IDENTITY, &mut acc);
        }
        acc
    }

    /// Floor-Liste für das Backoffice, sortiert nach Sortierreihenfolge und Objektname.
    pub fn floor_hierarchy(&self) -> Vec<FloorHierarchyEntry> {
        fn walk(node: &ModelNodeDesc, out: &mut Vec<FloorHierarchyEntry>) {
            if let Some(floor) = &node.floor {
                out.push(FloorHierarchyEntry {
                    object_name: node.name.clone(),
                    display_name: floor.display_name.clone(),
                    sorting_order: floor.sorting_order,
                    floor_id: floor.floor_id.clone(),
                });
            }
            for child in &node.children {
                walk(child, out);
            }
        }
        let mut out = Vec::new();
        for root in &self.roots {
            walk(root, &mut out);
        }
        out.sort_by(|a, b| {
            a.sorting_order
                .cmp(&b.sorting_order)
                .then_with(|| a.object_name.cmp(&b.object_name))
        });
        out
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFloorExtras {
    #[serde(rename = "type")]
    kind: Option<String>,
    floor_id: Option<serde_json::Value>,
    sorting_order: Option<serde_json::Value>,
    display_name: Option<String>,
}

/// Liest Floor-Metadaten aus einem Extras-JSON. `None`, wenn der Knoten kein Floor ist.
///
/// `floorId` und `sortingOrder` werden als Zahl oder String akzeptiert;
/// fehlt `floorId`, dient der Knotenname als ID.
pub fn parse_floor_extras(node_name: &str, extras_json: &str) -> Option<FloorMeta> {
    let raw: RawFloorExtras = match serde_json::from_str(extras_json) {
        Ok(raw) => raw,
        Err(e) => {
            log::debug!("Extras von '{}' nicht lesbar: {}", node_name, e);
            return None;
        }
    };
    if raw.kind.as_deref() != Some("floor") {
        return None;
    }
    let floor_id = match raw.floor_id {
        Some(serde_json::Value::String(s)) if !s.is_empty() => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => node_name.to_string(),
    };
    let sorting_order = match raw.sorting_order {
        Some(serde_json::Value::Number(n)) => n.as_i64().unwrap_or(0) as i32,
        Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    };
    Some(FloorMeta {
        floor_id,
        sorting_order,
        display_name: raw.display_name.unwrap_or_else(|| node_name.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_parse_floor_extras_variants() {
        let meta = parse_floor_extras(
            "Level_1",
            r#"{"type":"floor","floorId":"F1","sortingOrder":"2","displayName":"EG"}"#,
        )
        .expect("Floor erwartet");
        assert_eq!(meta.floor_id, "F1");
        assert_eq!(meta.sorting_order, 2);
        assert_eq!(meta.display_name, "EG");

        let fallback = parse_floor_extras("Level_2", r#"{"type":"floor"}"#).unwrap();
        assert_eq!(fallback.floor_id, "Level_2");
        assert_eq!(fallback.display_name, "Level_2");
    }

    #[test]
    fn test_non_floor_extras_ignored() {
        assert!(parse_floor_extras("Wall", r#"{"type":"wall"}"#).is_none());
        assert!(parse_floor_extras("Wall", "kein json").is_none());
    }

    #[test]
    fn test_floor_hierarchy_sorted() {
        let asset = ModelAsset::new(
            "station.glb",
            vec![ModelNodeDesc::new("Building")
                .with_child(ModelNodeDesc::new("B").with_floor("F2", 1, "OG"))
                .with_child(ModelNodeDesc::new("A").with_floor("F1", 0, "EG"))],
        );
        let entries = asset.floor_hierarchy();
        let ids: Vec<&str> = entries.iter().map(|e| e.floor_id.as_str()).collect();
        assert_eq!(ids, vec!["F1", "F2"]);
        assert_eq!(asset.node_count(), 3);
    }

    #[test]
    fn test_bounds_respect_transforms() {
        let asset = ModelAsset::new(
            "x",
            vec![ModelNodeDesc::new("n")
                .with_transform(Transform::from_translation(Vec3::new(0.0, 10.0, 0.0)))
                .with_mesh(MeshData::cuboid(Vec3::ONE))],
        );
        let b = asset.bounds().unwrap();
        assert_eq!(b.min.y, 9.0);
        assert_eq!(b.max.y, 11.0);
    }
}
