//! Züge entlang eines Pfads.

use super::scene_graph::EntityId;
use serde::{Deserialize, Serialize};

/// Vorgaben für einen neuen Zug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainDraft {
    pub head_model: String,
    pub body_model: String,
    pub tail_model: String,
    /// Anzahl Mittelwagen (wird auf das Minimum angehoben)
    pub car_count: u32,
    pub entrance_u: f32,
    pub stop_u: f32,
    pub exit_u: f32,
}

/// Zugphase für Animationen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrainPhase {
    Enter,
    Exit,
}

/// Live-Zug in der Szene.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainRecord {
    pub id: String,
    pub path_id: String,
    pub car_count: u32,
    pub head_model: String,
    pub body_model: String,
    pub tail_model: String,
    pub entrance_u: f32,
    pub stop_u: f32,
    pub exit_u: f32,
    /// Aktueller Pfadparameter der Zugspitze
    pub progress: f32,
    pub entity: EntityId,
    /// Kopf, Mittelwagen, Ende
    pub cars: Vec<EntityId>,
    /// Wagenabstand in Welteinheiten
    pub car_spacing: f32,
}

/// Exportierte Zug-Daten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainData {
    pub id: String,
    pub path_id: String,
    pub car_count: u32,
    pub head_model: String,
    pub body_model: String,
    pub tail_model: String,
    pub entrance_u: f32,
    pub stop_u: f32,
    pub exit_u: f32,
    #[serde(default)]
    pub progress: f32,
}

/// Hebt die Mittelwagenzahl auf `min` an.
pub fn clamp_car_count(requested: u32, min: u32) -> u32 {
    requested.max(min)
}

/// Bogenlängen-Offsets (hinter der Spitze) für Kopf, Mittelwagen und Ende.
pub fn car_offsets(car_count: u32, spacing: f32) -> Vec<f32> {
    (0..car_count as usize + 2)
        .map(|i| i as f32 * spacing)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_car_count_clamped() {
        assert_eq!(clamp_car_count(2, 4), 4);
        assert_eq!(clamp_car_count(7, 4), 7);
    }

    #[test]
    fn test_offsets_include_head_and_tail() {
        let offsets = car_offsets(4, 10.0);
        assert_eq!(offsets.len(), 6);
        assert_eq!(offsets[5], 50.0);
    }
}
