//! Pfadauswahl für einen neuen Zug (Klick auf ein Pfad-Ribbon, dann Bestätigen).

use super::AuthoringTool;
use crate::core::TrainDraft;
use crate::shared::ClickTracker;
use glam::Vec2;

/// Zustand der Zug-Pfadauswahl.
#[derive(Debug, Clone, Default)]
pub struct TrainPathSelection {
    draft: Option<TrainDraft>,
    selected: Option<String>,
    tracker: ClickTracker,
}

impl TrainPathSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, draft: TrainDraft) {
        self.draft = Some(draft);
        self.selected = None;
        self.tracker.reset();
    }

    pub fn is_active(&self) -> bool {
        self.draft.is_some()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn press(&mut self, screen: Vec2) {
        if self.is_active() {
            self.tracker.press(screen);
        }
    }

    pub fn release(&mut self, screen: Vec2, threshold_px: f32) -> bool {
        self.is_active() && self.tracker.release(screen, threshold_px)
    }

    /// Merkt den angeklickten Pfad; `false`, wenn er bereits gewählt war.
    pub fn select(&mut self, path_id: &str) -> bool {
        if self.selected.as_deref() == Some(path_id) {
            return false;
        }
        self.selected = Some(path_id.to_string());
        true
    }

    /// Bestätigt die Auswahl und beendet das Werkzeug.
    pub fn confirm(&mut self) -> Option<(TrainDraft, String)> {
        let path_id = self.selected.take()?;
        let draft = self.draft.take()?;
        self.tracker.reset();
        Some((draft, path_id))
    }
}

impl AuthoringTool for TrainPathSelection {
    fn name(&self) -> &str {
        "Zug-Pfadauswahl"
    }

    fn status_text(&self) -> &str {
        match (&self.draft, &self.selected) {
            (None, _) => "Inaktiv",
            (Some(_), None) => "Pfad anklicken",
            (Some(_), Some(_)) => "Auswahl bestätigen",
        }
    }

    fn is_busy(&self) -> bool {
        self.is_active()
    }

    fn reset(&mut self) {
        self.draft = None;
        self.selected = None;
        self.tracker.reset();
    }
}
