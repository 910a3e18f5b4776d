//! Eingabe-Typen zwischen Host und Engine (Zeiger, Tasten-Modifikatoren, Button-Belegung).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Maustaste bzw. Zeiger-Button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Gehaltene Modifikator-Tasten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

/// Ein Zeiger-Ereignis in Screen-Pixeln (Ursprung oben links).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerInfo {
    pub screen: Vec2,
    pub button: PointerButton,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl PointerInfo {
    pub fn new(screen: Vec2, button: PointerButton) -> Self {
        Self {
            screen,
            button,
            modifiers: Modifiers::default(),
        }
    }
}

/// Zuordnung Button → Kamera-Aktion; `None` deaktiviert die Aktion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonMapping {
    pub rotate: Option<PointerButton>,
    pub pan: Option<PointerButton>,
    pub drag_zoom: Option<PointerButton>,
}

impl Default for ButtonMapping {
    fn default() -> Self {
        Self {
            rotate: Some(PointerButton::Primary),
            pan: Some(PointerButton::Secondary),
            drag_zoom: Some(PointerButton::Middle),
        }
    }
}

/// Unterscheidet Klick von Drag anhand der Screen-Verschiebung.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClickTracker {
    down: Option<Vec2>,
}

impl ClickTracker {
    pub fn press(&mut self, screen: Vec2) {
        self.down = Some(screen);
    }

    /// Beendet den Press und meldet, ob es ein Klick war (`< threshold_px`).
    pub fn release(&mut self, screen: Vec2, threshold_px: f32) -> bool {
        match self.down.take() {
            Some(down) => down.distance(screen) < threshold_px,
            None => false,
        }
    }

    pub fn reset(&mut self) {
        self.down = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_threshold_is_strict() {
        let mut tracker = ClickTracker::default();
        tracker.press(Vec2::ZERO);
        assert!(tracker.release(Vec2::new(4.99, 0.0), 5.0));

        tracker.press(Vec2::ZERO);
        assert!(!tracker.release(Vec2::new(5.0, 0.0), 5.0));

        tracker.press(Vec2::ZERO);
        assert!(!tracker.release(Vec2::new(3.0, 4.0), 5.0));
    }

    #[test]
    fn test_release_without_press_is_no_click() {
        let mut tracker = ClickTracker::default();
        assert!(!tracker.release(Vec2::ZERO, 5.0));
    }
}
