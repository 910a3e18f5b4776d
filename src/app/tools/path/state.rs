//! State-Definitionen und Konstruktor für das Pfad-Werkzeug.

use super::super::ToolAnchor;
use crate::core::{PathDraft, PathSegment};
use glam::{Vec2, Vec3};

/// Rückgabe der Zeiger-Handler; steuert die Szenen-Mutation im Use-Case.
#[derive(Debug, Clone, PartialEq)]
pub enum PathAction {
    /// Nichts zu tun
    None,
    /// Startpunkt des ersten Segments gesetzt
    SeedPlaced,
    /// Vorschau des entstehenden Segments (Welt: Start, Control, Ende)
    Preview([Vec3; 3]),
    /// Segment abgeschlossen und an den Pfad angehängt
    SegmentAdded {
        segment: PathSegment,
        world: [Vec3; 3],
    },
}

/// Druckzustand zwischen Pointer-Down und Pointer-Up.
#[derive(Debug, Clone)]
pub(crate) struct PressState {
    pub(crate) screen: Vec2,
    pub(crate) anchor: Option<ToolAnchor>,
}

/// Pfad-Werkzeug
#[derive(Debug, Clone, Default)]
pub struct PathTool {
    pub(crate) draft: Option<PathDraft>,
    /// Startpunkt des nächsten Segments (Ende des vorherigen)
    pub(crate) seed: Option<ToolAnchor>,
    pub(crate) press: Option<PressState>,
    /// Aktueller Drag-Anker bei gehaltenem Button
    pub(crate) handle: Option<ToolAnchor>,
    pub(crate) segments: Vec<PathSegment>,
}

impl PathTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.draft.is_some()
    }

    pub fn draft(&self) -> Option<&PathDraft> {
        self.draft.as_ref()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn seed(&self) -> Option<&ToolAnchor> {
        self.seed.as_ref()
    }

    /// Ist gerade ein Button gedrückt?
    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }
}
