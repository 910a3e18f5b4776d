//! Lifecycle-Methoden des PathTool (press, move, release, finish, reset).

use super::super::{AuthoringTool, ToolAnchor};
use super::state::{PathAction, PathTool, PressState};
use crate::core::{PathDraft, PathMode, PathPoint, PathSegment};
use glam::{Vec2, Vec3};

/// Segmente kürzer als das werden verworfen.
const MIN_SEGMENT_LENGTH: f32 = 1e-3;

impl PathTool {
    /// Startet einen neuen Pfad. Ein evtl. laufender Pfad wird verworfen.
    pub fn begin(&mut self, draft: PathDraft) {
        self.reset();
        self.draft = Some(draft);
    }

    pub fn on_press(&mut self, screen: Vec2, anchor: Option<ToolAnchor>) {
        if !self.is_active() {
            return;
        }
        self.press = Some(PressState { screen, anchor });
        self.handle = None;
    }

    /// Zeigerbewegung bei gehaltenem Button aktualisiert die Segment-Vorschau.
    pub fn on_move(&mut self, anchor: Option<ToolAnchor>) -> PathAction {
        let (Some(seed), Some(press)) = (self.seed.as_ref(), self.press.as_ref()) else {
            return PathAction::None;
        };
        let Some(anchor) = anchor else {
            return PathAction::None;
        };
        let mode = self.mode();
        let preview = match mode {
            PathMode::Straight => {
                let end = anchor.world;
                [seed.world, (seed.world + end) * 0.5, end]
            }
            PathMode::Curved => {
                let Some(end) = press.anchor.as_ref().map(|a| a.world) else {
                    return PathAction::None;
                };
                [seed.world, mirrored_control(end, anchor.world), end]
            }
        };
        self.handle = Some(anchor);
        PathAction::Preview(preview)
    }

    /// Pointer-Up: setzt den Startpunkt oder schließt ein Segment ab.
    pub fn on_release(
        &mut self,
        screen: Vec2,
        anchor: Option<ToolAnchor>,
        threshold_px: f32,
    ) -> PathAction {
        let Some(press) = self.press.take() else {
            return PathAction::None;
        };
        let handle = self.handle.take();
        let is_click = press.screen.distance(screen) < threshold_px;

        let Some(seed) = self.seed.clone() else {
            if !is_click {
                return PathAction::None;
            }
            return match anchor.or(press.anchor) {
                Some(start) => {
                    self.seed = Some(start);
                    PathAction::SeedPlaced
                }
                None => PathAction::None,
            };
        };

        let (end, control_world) = match self.mode() {
            PathMode::Straight => {
                let Some(end) = anchor.or(handle) else {
                    return PathAction::None;
                };
                let control = (seed.world + end.world) * 0.5;
                (end, control)
            }
            PathMode::Curved => {
                let Some(end) = press.anchor else {
                    return PathAction::None;
                };
                let drag_handle = anchor.or(handle);
                let control = match drag_handle {
                    Some(h) if !is_click => mirrored_control(end.world, h.world),
                    _ => (seed.world + end.world) * 0.5,
                };
                (end, control)
            }
        };

        if seed.world.distance(end.world) < MIN_SEGMENT_LENGTH {
            log::debug!("Pfadsegment ohne Länge verworfen");
            return PathAction::None;
        }

        let segment = PathSegment {
            start: PathPoint::new(seed.local, seed.floor_id.clone()),
            control: PathPoint::new(end.localize(control_world), end.floor_id.clone()),
            end: PathPoint::new(end.local, end.floor_id.clone()),
        };
        let world = [seed.world, control_world, end.world];
        self.segments.push(segment.clone());
        self.seed = Some(end);
        PathAction::SegmentAdded { segment, world }
    }

    /// Schließt den Pfad ab und übergibt Vorgaben und Segmente.
    pub fn finish(&mut self) -> Option<(PathDraft, Vec<PathSegment>)> {
        let draft = self.draft.take()?;
        let segments = std::mem::take(&mut self.segments);
        self.reset();
        Some((draft, segments))
    }

    fn mode(&self) -> PathMode {
        self.draft.map(|d| d.mode).unwrap_or_default()
    }
}

/// Steuerpunkt der Kurve: Drag-Handle `H` am Endpunkt `E` gespiegelt,
/// also `control = 2·E − H`. `E` ist der Pick beim Pointer-Down, `H` der aktuelle Pick.
pub(crate) fn mirrored_control(end: Vec3, handle: Vec3) -> Vec3 {
    end * 2.0 - handle
}

impl AuthoringTool for PathTool {
    fn name(&self) -> &str {
        "Pfad"
    }

    fn status_text(&self) -> &str {
        match (self.is_active(), &self.seed) {
            (false, _) => "Inaktiv",
            (true, None) => "Startpunkt klicken",
            (true, Some(_)) => match self.mode() {
                PathMode::Straight => "Endpunkt klicken oder ziehen",
                PathMode::Curved => "Endpunkt drücken und Kurve ziehen",
            },
        }
    }

    fn is_busy(&self) -> bool {
        self.is_active()
    }

    fn reset(&mut self) {
        self.draft = None;
        self.seed = None;
        self.press = None;
        self.handle = None;
        self.segments.clear();
    }
}
