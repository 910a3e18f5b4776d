use crate::core::{EntityId, Plane};
use crate::shared::{ButtonMapping, ClickTracker, PointerInfo};
use glam::{Vec2, Vec3};

/// Laufende Kamera-Geste (gegenseitig exklusiv).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CameraDrag {
    #[default]
    Idle,
    Rotating {
        pivot: Vec3,
    },
    /// Greifebene (Boden oder bildschirmparallel)
    Panning {
        plane: Plane,
    },
    DragZooming {
        target: Vec3,
    },
}

/// Zustand der Orbit-/Pan-/Zoom-Steuerung.
#[derive(Debug, Clone)]
pub struct OrbitState {
    /// Vom Host gesetzt (`SetEnabled`)
    pub enabled: bool,
    /// Von Werkzeugen während eines Gizmo-Drags ausgesetzt
    pub suspended: bool,
    pub buttons: ButtonMapping,
    /// Belegung vor der Pfad-Bearbeitung
    pub saved_buttons: Option<ButtonMapping>,
    pub drag: CameraDrag,
    /// Letzter Rotations-Pivot (für das Ausklingen nach dem Loslassen)
    pub pivot: Option<Vec3>,
    /// Ausstehende Rotation (Yaw, Pitch) in Radiant
    pub rotate_delta: Vec2,
    /// Ausstehende Verschiebung in Welteinheiten
    pub pan_delta: Vec3,
    pub last_screen: Option<Vec2>,
}

impl OrbitState {
    pub fn new(buttons: ButtonMapping) -> Self {
        Self {
            enabled: true,
            suspended: false,
            buttons,
            saved_buttons: None,
            drag: CameraDrag::Idle,
            pivot: None,
            rotate_delta: Vec2::ZERO,
            pan_delta: Vec3::ZERO,
            last_screen: None,
        }
    }

    /// Nimmt die Steuerung gerade Eingaben an?
    pub fn accepts_input(&self) -> bool {
        self.enabled && !self.suspended
    }

    /// Bricht Geste und Nachlauf ab.
    pub fn stop(&mut self) {
        self.drag = CameraDrag::Idle;
        self.rotate_delta = Vec2::ZERO;
        self.pan_delta = Vec3::ZERO;
        self.last_screen = None;
    }

    /// Aktueller Pivot, solange rotiert wird.
    pub fn active_pivot(&self) -> Option<Vec3> {
        match self.drag {
            CameraDrag::Rotating { pivot } => Some(pivot),
            _ => None,
        }
    }
}

/// Zeiger-Zustand zwischen Down und Up.
#[derive(Debug, Clone, Default)]
pub struct PointerState {
    pub tracker: ClickTracker,
    pub last: Option<PointerInfo>,
    /// Press wurde von einem Werkzeug übernommen (Kamera bleibt außen vor)
    pub claimed: bool,
}

/// Hover- und Selektions-Outline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutlineState {
    pub hovered: Option<EntityId>,
    pub selected: Vec<EntityId>,
}

impl OutlineState {
    pub fn clear(&mut self) {
        self.hovered = None;
        self.selected.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.hovered.is_none() && self.selected.is_empty()
    }

    /// Entfernt alle Einträge, für die `keep` `false` liefert.
    pub fn retain(&mut self, keep: impl Fn(EntityId) -> bool) {
        if self.hovered.is_some_and(|id| !keep(id)) {
            self.hovered = None;
        }
        self.selected.retain(|id| keep(*id));
    }
}
