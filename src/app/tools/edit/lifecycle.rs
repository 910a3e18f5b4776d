//! Lifecycle-Methoden des EditTool (Session, Zielwechsel, Drag, Abschluss).

use super::super::AuthoringTool;
use super::state::{EditTarget, EditTool, GizmoAxis, GizmoDrag, GizmoMode};
use crate::core::Transform;
use glam::Vec2;

impl EditTool {
    /// Startet eine Bearbeitungs-Session im gegebenen Gizmo-Modus.
    pub fn begin(&mut self, mode: GizmoMode) {
        self.reset();
        self.active = true;
        self.mode = mode;
    }

    pub fn set_mode(&mut self, mode: GizmoMode) {
        self.mode = mode;
    }

    /// Setzt ein neues Ziel und liefert das vorherige (zum Aufräumen).
    pub fn retarget(&mut self, target: EditTarget) -> Option<EditTarget> {
        self.drag = None;
        self.target.replace(target)
    }

    pub fn press(&mut self, screen: Vec2) {
        if self.active {
            self.tracker.press(screen);
        }
    }

    /// Beendet den Press; `true` bei Klick unterhalb der Schwelle.
    pub fn release(&mut self, screen: Vec2, threshold_px: f32) -> bool {
        self.active && self.tracker.release(screen, threshold_px)
    }

    pub fn begin_drag(&mut self, axis: GizmoAxis, screen: Vec2, start: Transform) {
        if self.target.is_some() {
            self.tracker.reset();
            self.drag = Some(GizmoDrag {
                axis,
                start_screen: screen,
                start,
            });
        }
    }

    pub fn end_drag(&mut self) -> Option<GizmoDrag> {
        self.drag.take()
    }

    /// Merkt eine geänderte Entity (jede ID nur einmal).
    pub fn mark_edited(&mut self, id: &str) {
        if !self.edited.iter().any(|e| e == id) {
            self.edited.push(id.to_string());
        }
    }
}

impl AuthoringTool for EditTool {
    fn name(&self) -> &str {
        self.tool_name
    }

    fn status_text(&self) -> &str {
        match (self.active, &self.target, &self.drag) {
            (false, _, _) => "Inaktiv",
            (true, None, _) => "Objekt anklicken",
            (true, Some(_), None) => "Gizmo ziehen oder anderes Objekt wählen",
            (true, Some(_), Some(_)) => "Transformiere…",
        }
    }

    fn is_busy(&self) -> bool {
        self.active
    }

    fn reset(&mut self) {
        self.active = false;
        self.target = None;
        self.drag = None;
        self.edited.clear();
        self.tracker.reset();
    }
}
