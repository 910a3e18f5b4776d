//! State-Definitionen für das Bearbeitungs-Werkzeug.

use crate::core::{EntityId, Transform};
use crate::shared::ClickTracker;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Modus des Transform-Gizmos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GizmoMode {
    #[default]
    Translate,
    Rotate,
    Scale,
}

/// Welt-Achse eines Gizmo-Handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GizmoAxis {
    X,
    Y,
    Z,
}

impl GizmoAxis {
    pub const ALL: [GizmoAxis; 3] = [GizmoAxis::X, GizmoAxis::Y, GizmoAxis::Z];

    pub fn vector(self) -> Vec3 {
        match self {
            GizmoAxis::X => Vec3::X,
            GizmoAxis::Y => Vec3::Y,
            GizmoAxis::Z => Vec3::Z,
        }
    }

    pub fn index(self) -> usize {
        match self {
            GizmoAxis::X => 0,
            GizmoAxis::Y => 1,
            GizmoAxis::Z => 2,
        }
    }
}

/// Gerade bearbeitete Entity samt Vorschau und Gizmo.
#[derive(Debug, Clone, PartialEq)]
pub struct EditTarget {
    /// Domänen-ID (Marker- bzw. Label-ID)
    pub id: String,
    /// Original-Entity (während der Bearbeitung ausgeblendet)
    pub entity: EntityId,
    pub preview: EntityId,
    pub gizmo: EntityId,
}

/// Laufender Gizmo-Drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GizmoDrag {
    pub axis: GizmoAxis,
    pub start_screen: Vec2,
    /// Welt-Transform der Vorschau beim Drag-Start
    pub start: Transform,
}

/// Bearbeitungs-Werkzeug (eine Instanz pro Entity-Art)
#[derive(Debug, Clone)]
pub struct EditTool {
    pub(crate) tool_name: &'static str,
    pub(crate) active: bool,
    pub(crate) mode: GizmoMode,
    pub(crate) target: Option<EditTarget>,
    pub(crate) drag: Option<GizmoDrag>,
    /// IDs aller in dieser Session geänderten Entities (ohne Duplikate)
    pub(crate) edited: Vec<String>,
    pub(crate) tracker: ClickTracker,
}

impl EditTool {
    pub fn new(tool_name: &'static str) -> Self {
        Self {
            tool_name,
            active: false,
            mode: GizmoMode::Translate,
            target: None,
            drag: None,
            edited: Vec::new(),
            tracker: ClickTracker::default(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn mode(&self) -> GizmoMode {
        self.mode
    }

    pub fn target(&self) -> Option<&EditTarget> {
        self.target.as_ref()
    }

    pub fn drag(&self) -> Option<&GizmoDrag> {
        self.drag.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn edited(&self) -> &[String] {
        &self.edited
    }
}
