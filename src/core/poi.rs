//! Marker (POI) und Text-Labels: Domänen-Records und Exportformat.

use super::scene_graph::EntityId;
use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Frei definierbare Eigenschaften eines Markers/Labels.
pub type PropertyBag = Map<String, Value>;

/// Live-Marker in der Szene.
#[derive(Debug, Clone, PartialEq)]
pub struct PoiRecord {
    pub id: String,
    pub icon: String,
    pub model: Option<String>,
    pub text: String,
    pub properties: PropertyBag,
    pub floor_id: Option<String>,
    pub entity: EntityId,
}

/// Exportierte Marker-Daten (JSON-serialisierbar).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoiData {
    pub id: String,
    pub icon: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub properties: PropertyBag,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub floor_id: Option<String>,
}

/// Vorgaben für einen neuen Marker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerDraft {
    pub icon: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub properties: PropertyBag,
}

/// Live-Label in der Szene.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelRecord {
    pub id: String,
    pub text: String,
    pub properties: PropertyBag,
    pub floor_id: Option<String>,
    pub entity: EntityId,
    /// Billboard-Größe in Welteinheiten
    pub size: Vec2,
}

/// Exportierte Label-Daten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelData {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub properties: PropertyBag,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub floor_id: Option<String>,
}

/// Vorgaben für ein neues Label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelDraft {
    pub text: String,
    #[serde(default)]
    pub properties: PropertyBag,
}
