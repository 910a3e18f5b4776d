//! Platzierungs-Automat: wartende Entity folgt dem Zeiger, ein Klick setzt sie ab.

use super::AuthoringTool;
use crate::core::EntityId;
use crate::shared::ClickTracker;
use glam::Vec2;

/// Zustand einer laufenden Platzierung (Marker oder Label).
#[derive(Debug, Clone)]
pub struct PlacementTool<D> {
    tool_name: &'static str,
    draft: Option<D>,
    /// Wartende Vorschau-Entity, die dem Zeiger folgt
    pending: Option<EntityId>,
    tracker: ClickTracker,
}

impl<D> PlacementTool<D> {
    pub fn new(tool_name: &'static str) -> Self {
        Self {
            tool_name,
            draft: None,
            pending: None,
            tracker: ClickTracker::default(),
        }
    }

    /// Startet eine Platzierung mit bereits erzeugter Vorschau-Entity.
    pub fn begin(&mut self, draft: D, pending: EntityId) {
        self.draft = Some(draft);
        self.pending = Some(pending);
        self.tracker.reset();
    }

    pub fn is_active(&self) -> bool {
        self.draft.is_some()
    }

    pub fn pending(&self) -> Option<EntityId> {
        self.pending
    }

    pub fn draft(&self) -> Option<&D> {
        self.draft.as_ref()
    }

    pub fn press(&mut self, screen: Vec2) {
        if self.is_active() {
            self.tracker.press(screen);
        }
    }

    /// Beendet den Press; `true` bei Klick unterhalb der Schwelle.
    pub fn release(&mut self, screen: Vec2, threshold_px: f32) -> bool {
        self.is_active() && self.tracker.release(screen, threshold_px)
    }

    /// Übergibt Vorgaben und Vorschau-Entity und beendet die Platzierung.
    pub fn complete(&mut self) -> Option<(D, EntityId)> {
        self.tracker.reset();
        let draft = self.draft.take()?;
        let pending = self.pending.take()?;
        Some((draft, pending))
    }

    /// Verwirft die Platzierung; liefert die zu entsorgende Vorschau-Entity.
    pub fn abort(&mut self) -> Option<EntityId> {
        self.draft = None;
        self.tracker.reset();
        self.pending.take()
    }
}

impl<D> AuthoringTool for PlacementTool<D> {
    fn name(&self) -> &str {
        self.tool_name
    }

    fn status_text(&self) -> &str {
        if self.is_active() {
            "Position klicken"
        } else {
            "Inaktiv"
        }
    }

    fn is_busy(&self) -> bool {
        self.is_active()
    }

    fn reset(&mut self) {
        self.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_completes_only_below_threshold() {
        let mut tool: PlacementTool<&str> = PlacementTool::new("Marker");
        tool.begin("exit", EntityId::from_raw(7));

        tool.press(Vec2::new(10.0, 10.0));
        assert!(!tool.release(Vec2::new(16.0, 10.0), 5.0));
        assert!(tool.is_active());

        tool.press(Vec2::new(10.0, 10.0));
        assert!(tool.release(Vec2::new(12.0, 11.0), 5.0));
        assert_eq!(tool.complete(), Some(("exit", EntityId::from_raw(7))));
        assert!(!tool.is_active());
    }

    #[test]
    fn test_inactive_tool_ignores_clicks() {
        let mut tool: PlacementTool<&str> = PlacementTool::new("Label");
        tool.press(Vec2::ZERO);
        assert!(!tool.release(Vec2::ZERO, 5.0));
        assert!(tool.abort().is_none());
    }
}
