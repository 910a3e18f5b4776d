//! Zeigergesteuerte Autorenwerkzeuge für Marker, Labels, Pfade und Züge.
//!
//! Werkzeuge sind reine Zustandsautomaten: sie bekommen bereits gepickte
//! Anker und liefern Aktionen als Daten zurück. Die Szenen-Mutation erfolgt
//! zentral in den Use-Cases.

/// Transform-Gizmo und Bearbeitungs-Session für Marker/Labels.
pub mod edit;
/// Pfad-Werkzeug mit Segmentaufbau und Ribbon-Geometrie.
pub mod path;
/// Platzierungs-Werkzeug für Marker und Labels.
pub mod placement;
/// Auswahl eines Pfads für einen neuen Zug.
pub mod train_select;

mod authoring_tool;

pub use authoring_tool::AuthoringTool;
pub use edit::{EditTarget, EditTool, GizmoAxis, GizmoMode};
pub use path::{PathAction, PathTool};
pub use placement::PlacementTool;
pub use train_select::TrainPathSelection;

use glam::{Mat4, Vec3};

/// Gepickter Ankerpunkt: Weltposition plus Lage relativ zum getroffenen Floor.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolAnchor {
    pub world: Vec3,
    /// Position im lokalen Raum des Floors (ohne Floor gleich `world`)
    pub local: Vec3,
    pub floor_id: Option<String>,
    /// Inverse Floor-Weltmatrix (Welt → Floor-lokal)
    pub floor_inverse: Mat4,
}

impl ToolAnchor {
    /// Anker ohne Floor-Bezug.
    pub fn free(world: Vec3) -> Self {
        Self {
            world,
            local: world,
            floor_id: None,
            floor_inverse: Mat4::IDENTITY,
        }
    }

    /// Anker auf einem Floor mit dessen Weltmatrix.
    pub fn on_floor(world: Vec3, floor_id: &str, floor_world: Mat4) -> Self {
        let floor_inverse = floor_world.inverse();
        Self {
            world,
            local: floor_inverse.transform_point3(world),
            floor_id: Some(floor_id.to_string()),
            floor_inverse,
        }
    }

    /// Rechnet einen weiteren Weltpunkt in den Floor-Raum dieses Ankers um.
    pub fn localize(&self, world: Vec3) -> Vec3 {
        self.floor_inverse.transform_point3(world)
    }
}
