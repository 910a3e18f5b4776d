//! Stockwerks-Register: Floors des geladenen Modells nach ID indiziert.

use super::scene_graph::EntityId;
use glam::Vec3;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ein Stockwerk des geladenen Modells.
#[derive(Debug, Clone, PartialEq)]
pub struct FloorInfo {
    pub floor_id: String,
    pub object_name: String,
    pub display_name: String,
    pub sorting_order: i32,
    pub entity: EntityId,
    /// Lokale Position beim Laden (Ziel von Collapse)
    pub source_position: Vec3,
}

/// Eintrag der Modell-Hierarchie für das Backoffice-Formular.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorHierarchyEntry {
    pub object_name: String,
    pub display_name: String,
    pub sorting_order: i32,
    pub floor_id: String,
}

/// Floors nach ID, in Ladereihenfolge.
#[derive(Debug, Default)]
pub struct FloorRegistry {
    floors: IndexMap<String, FloorInfo>,
    /// `true` nach abgeschlossenem Expand
    pub expanded: bool,
}

impl FloorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registriert ein Floor. Doppelte IDs werden verworfen (erstes Vorkommen gewinnt).
    pub fn insert(&mut self, info: FloorInfo) -> bool {
        if self.floors.contains_key(&info.floor_id) {
            log::warn!(
                "Doppelte Floor-ID '{}' in '{}' ignoriert",
                info.floor_id,
                info.object_name
            );
            return false;
        }
        self.floors.insert(info.floor_id.clone(), info);
        true
    }

    pub fn get(&self, floor_id: &str) -> Option<&FloorInfo> {
        self.floors.get(floor_id)
    }

    pub fn entity_of(&self, floor_id: &str) -> Option<EntityId> {
        self.floors.get(floor_id).map(|f| f.entity)
    }

    /// Floor-ID zu einer Floor-Entity.
    pub fn floor_of_entity(&self, entity: EntityId) -> Option<&str> {
        self.floors
            .values()
            .find(|f| f.entity == entity)
            .map(|f| f.floor_id.as_str())
    }

    pub fn len(&self) -> usize {
        self.floors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.floors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FloorInfo> {
        self.floors.values()
    }

    /// Floors aufsteigend nach Sortierreihenfolge (stabil bezüglich Ladereihenfolge).
    pub fn sorted(&self) -> Vec<&FloorInfo> {
        let mut floors: Vec<&FloorInfo> = self.floors.values().collect();
        floors.sort_by_key(|f| f.sorting_order);
        floors
    }

    pub fn clear(&mut self) {
        self.floors.clear();
        self.expanded = false;
    }
}
