//! Floor-Animator: Sichtbarkeit sowie Expand/Collapse der Stockwerke.
//!
//! Expand und Collapse teilen sich einen exklusiven Tween-Slot; eine
//! Anfrage während einer laufenden Bewegung wird verworfen.

use super::frame;
use crate::app::animation::{AnimationKey, FloorMove, Tween, TweenKind};
use crate::app::events::{EngineEvent, HostEvent};
use crate::app::state::EngineState;
use crate::app::subsystems::{emit, publish_internal, report_failure};
use crate::core::PickLayer;
use crate::shared::Easing;
use glam::Vec3;

/// Zeigt bzw. verbirgt ein Floor (`None` = alle Floors).
pub fn set_visibility(state: &mut EngineState, floor_id: Option<&str>, visible: bool) {
    let ids: Vec<String> = match floor_id {
        Some(id) => {
            if state.floors.get(id).is_none() {
                report_failure(state, "FloorVisibility", format!("Unbekannter Floor '{id}'"));
                return;
            }
            vec![id.to_string()]
        }
        None => state.floors.iter().map(|f| f.floor_id.clone()).collect(),
    };

    for floor_id in ids {
        let Some(entity) = state.floors.entity_of(&floor_id) else {
            continue;
        };
        state.scene.set_visible(entity, visible);
        state.scene.set_layer(
            entity,
            if visible {
                PickLayer::Pickable
            } else {
                PickLayer::Invisible
            },
        );
        publish_internal(state, EngineEvent::FloorVisibilityChanged { floor_id, visible });
    }
}

/// Fächert die Floors nach Sortierreihenfolge vertikal auf.
pub fn expand(state: &mut EngineState, duration: f32, interval: f32) {
    let moves: Vec<FloorMove> = state
        .floors
        .sorted()
        .iter()
        .enumerate()
        .map(|(i, floor)| FloorMove {
            floor_id: floor.floor_id.clone(),
            entity: floor.entity,
            from: current_position(state, floor.entity),
            to: floor.source_position + Vec3::Y * (i as f32 * interval),
        })
        .collect();
    start_move(state, "ExpandFloors", moves, true, duration);
}

/// Bringt alle Floors an ihre Ladeposition zurück.
pub fn collapse(state: &mut EngineState, duration: f32) {
    let moves: Vec<FloorMove> = state
        .floors
        .iter()
        .map(|floor| FloorMove {
            floor_id: floor.floor_id.clone(),
            entity: floor.entity,
            from: current_position(state, floor.entity),
            to: floor.source_position,
        })
        .collect();
    start_move(state, "CollapseFloors", moves, false, duration);
}

fn current_position(state: &EngineState, entity: crate::core::EntityId) -> Vec3 {
    state
        .scene
        .node(entity)
        .map_or(Vec3::ZERO, |node| node.local.translation)
}

fn start_move(
    state: &mut EngineState,
    operation: &str,
    moves: Vec<FloorMove>,
    expanded: bool,
    duration: f32,
) {
    if moves.is_empty() {
        report_failure(state, operation, "Keine Floors geladen");
        return;
    }
    if state.animations.is_active(&AnimationKey::Floors) {
        report_failure(state, operation, "Floor-Bewegung läuft bereits");
        return;
    }

    publish_internal(state, EngineEvent::FloorsBeforeMove);
    let tween = Tween::new(
        TweenKind::Floors { moves, expanded },
        duration.max(0.0),
        Easing::QuarticInOut,
    );
    state.animations.start_exclusive(AnimationKey::Floors, tween);
    if duration <= 0.0 {
        frame::step_animations(state, 0.0);
    }
}

/// Setzt die lokalen Floor-Positionen für einen Tween-Frame.
pub fn apply_frame(state: &mut EngineState, moves: &[FloorMove], eased: f32, finished: bool) {
    for m in moves {
        let position = if finished {
            m.to
        } else {
            m.from.lerp(m.to, eased)
        };
        if let Some(node) = state.scene.node_mut(m.entity) {
            node.local.translation = position;
        }
    }
}

/// Abschluss einer Floor-Bewegung.
pub fn finish_move(state: &mut EngineState, expanded: bool) {
    state.floors.expanded = expanded;
    log::debug!(
        "Floor-Bewegung abgeschlossen ({})",
        if expanded { "expandiert" } else { "kollabiert" }
    );
    publish_internal(state, EngineEvent::FloorsAfterMove { expanded });
    emit(state, HostEvent::FloorsMoveFinished { expanded });
}

/// Bricht eine laufende Floor-Bewegung ab; abhängige Subsysteme werden wieder angehängt.
pub fn abort_move(state: &mut EngineState) {
    if state.animations.cancel(&AnimationKey::Floors).is_some() {
        let expanded = state.floors.expanded;
        publish_internal(state, EngineEvent::FloorsAfterMove { expanded });
    }
}
