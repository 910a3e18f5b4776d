//! Pfade aus quadratischen Segmenten mit stockwerksrelativen Punkten.

use super::scene_graph::EntityId;
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Punkt relativ zu seinem Floor (oder Weltkoordinate ohne Floor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathPoint {
    pub position: Vec3,
    pub floor_id: Option<String>,
}

impl PathPoint {
    pub fn new(position: Vec3, floor_id: Option<String>) -> Self {
        Self { position, floor_id }
    }

    /// Weltposition anhand der aktuellen Floor-Weltmatrix.
    pub fn to_world(&self, floor_world: Option<Mat4>) -> Vec3 {
        match floor_world {
            Some(m) => m.transform_point3(self.position),
            None => self.position,
        }
    }
}

/// Quadratisches Segment Start → Control → End.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSegment {
    pub start: PathPoint,
    pub control: PathPoint,
    pub end: PathPoint,
}

/// Art der Segmentkonstruktion beim Zeichnen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PathMode {
    /// Steuerpunkt halbiert Start/Ende
    #[default]
    Straight,
    /// Steuerpunkt aus Drag-Handle gespiegelt
    Curved,
}

/// Vorgaben für einen neuen Pfad.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathDraft {
    pub mode: PathMode,
    /// Ribbon-Breite; `None` = Standard aus den Optionen
    pub width: Option<f32>,
}

impl Default for PathDraft {
    fn default() -> Self {
        Self {
            mode: PathMode::Straight,
            width: None,
        }
    }
}

/// Registrierter Pfad in der Szene.
#[derive(Debug, Clone, PartialEq)]
pub struct PathRecord {
    pub id: String,
    pub segments: Vec<PathSegment>,
    pub width: f32,
    /// Container-Entity in der Pfad-Gruppe
    pub entity: EntityId,
    /// Ein Ribbon pro Segment, gleiche Reihenfolge wie `segments`
    pub ribbons: Vec<EntityId>,
}

/// Exportierte Pfad-Daten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathData {
    pub id: String,
    pub width: f32,
    pub segments: Vec<PathSegment>,
}

/// Prüft die Kontinuität: Ende von Segment i == Start von Segment i+1.
pub fn is_continuous(segments: &[PathSegment]) -> bool {
    segments.windows(2).all(|w| {
        w[0].end.floor_id == w[1].start.floor_id
            && w[0].end.position.abs_diff_eq(w[1].start.position, 1e-4)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(a: Vec3, b: Vec3) -> PathSegment {
        PathSegment {
            start: PathPoint::new(a, Some("F1".into())),
            control: PathPoint::new((a + b) * 0.5, Some("F1".into())),
            end: PathPoint::new(b, Some("F1".into())),
        }
    }

    #[test]
    fn test_continuity_check() {
        let ok = vec![seg(Vec3::ZERO, Vec3::X), seg(Vec3::X, Vec3::X * 2.0)];
        assert!(is_continuous(&ok));
        let broken = vec![seg(Vec3::ZERO, Vec3::X), seg(Vec3::Y, Vec3::X * 2.0)];
        assert!(!is_continuous(&broken));
    }

    #[test]
    fn test_point_to_world_uses_floor_matrix() {
        let p = PathPoint::new(Vec3::new(1.0, 0.0, 0.0), Some("F2".into()));
        let world = p.to_world(Some(Mat4::from_translation(Vec3::new(0.0, 5.0, 0.0))));
        assert_eq!(world, Vec3::new(1.0, 5.0, 0.0));
    }
}
