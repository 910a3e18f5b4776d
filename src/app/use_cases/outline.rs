//! Hover-Outline und Klick-Meldungen für Marker und Labels.

use super::{labels, markers};
use crate::app::events::{EngineEvent, HostEvent, PointerContext};
use crate::app::picking;
use crate::app::state::EngineState;
use crate::app::subsystems::emit;
use crate::core::{EntityId, EntityKind, SceneNode};
use crate::shared::PointerInfo;
use glam::Vec2;

fn hoverable(node: &SceneNode) -> bool {
    matches!(
        node.kind,
        EntityKind::Marker { .. } | EntityKind::Label { .. } | EntityKind::PathRibbon { .. }
    )
}

/// Nächste hover-fähige Entity unter `screen`.
fn hover_target(state: &EngineState, screen: Vec2) -> Option<EntityId> {
    picking::pick_filtered(&state.scene, &state.resources, &state.camera, screen, hoverable)
        .map(|hit| hit.entity)
}

/// Aktualisiert die Hover-Entity.
pub fn update_hover(state: &mut EngineState, screen: Vec2) {
    let target = hover_target(state, screen);
    if target != state.outline.hovered {
        log::trace!("Hover: {:?} → {:?}", state.outline.hovered, target);
        state.outline.hovered = target;
    }
}

/// Klick ohne aktives Werkzeug: getroffene Marker/Labels an den Host melden.
pub fn click_entity(state: &mut EngineState, pointer: &PointerInfo) {
    let Some(entity) = hover_target(state, pointer.screen) else {
        return;
    };
    let context = PointerContext {
        pointer: *pointer,
        screen_position: state
            .camera
            .project_to_screen(state.scene.world_position(entity)),
    };
    let event = match state.scene.node(entity).map(|n| &n.kind) {
        Some(EntityKind::Marker { poi_id }) => markers::export_one(state, poi_id)
            .map(|data| HostEvent::PoiPointerUp { data, context }),
        Some(EntityKind::Label { label_id }) => labels::export_one(state, label_id)
            .map(|data| HostEvent::Label3DPointerUp { data, context }),
        _ => None,
    };
    if let Some(event) = event {
        emit(state, event);
    }
}

/// Bereinigt Hover/Selektion bei Werkzeugwechsel und Entsorgung.
pub fn on_engine_event(state: &mut EngineState, event: &EngineEvent) {
    match event {
        EngineEvent::CreateStarted { .. } => state.outline.clear(),
        EngineEvent::ActiveToolChanged { .. } => state.outline.hovered = None,
        EngineEvent::EntityDisposed { .. } => {
            state.outline.retain(|id| state.scene.contains(id));
        }
        _ => {}
    }
}
