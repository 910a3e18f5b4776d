//! Zeiger-Routing: aktives Werkzeug zuerst, danach die Kamera.
//!
//! Nur Pfad-Werkzeug (Primärtaste) und Bearbeitungs-Gizmo übernehmen einen
//! Press exklusiv. Platzierung und Zug-Pfadauswahl werten lediglich Klicks
//! aus, die Kamera darf parallel gezogen werden.

use super::{camera, edit, labels, markers, outline, paths, trains};
use crate::app::events::EntityType;
use crate::app::state::{ActiveTool, CameraDrag, EngineState};
use crate::shared::PointerInfo;

/// Pointer-Down.
pub fn pointer_down(state: &mut EngineState, pointer: PointerInfo) {
    state.pointer.tracker.press(pointer.screen);
    state.pointer.last = Some(pointer);

    let claimed = match state.editor.active {
        ActiveTool::None => false,
        ActiveTool::PlacingMarker => {
            state.editor.marker_placement.press(pointer.screen);
            false
        }
        ActiveTool::PlacingLabel => {
            state.editor.label_placement.press(pointer.screen);
            false
        }
        ActiveTool::PlacingPath => paths::on_pointer_down(state, &pointer),
        ActiveTool::EditingMarker => edit::on_pointer_down(state, EntityType::Marker, &pointer),
        ActiveTool::EditingLabel => edit::on_pointer_down(state, EntityType::Label, &pointer),
        ActiveTool::SelectingTrainPath => {
            state.editor.train_select.press(pointer.screen);
            false
        }
    };
    state.pointer.claimed = claimed;
    if !claimed {
        camera::begin_drag(state, &pointer);
    }
}

/// Pointer-Move (mit oder ohne gedrückten Button).
pub fn pointer_move(state: &mut EngineState, pointer: PointerInfo) {
    state.pointer.last = Some(pointer);

    if state.pointer.claimed {
        match state.editor.active {
            ActiveTool::PlacingPath => paths::on_pointer_move(state, &pointer),
            ActiveTool::EditingMarker => edit::on_drag(state, EntityType::Marker, &pointer),
            ActiveTool::EditingLabel => edit::on_drag(state, EntityType::Label, &pointer),
            _ => {}
        }
        return;
    }

    camera::drag_move(state, pointer.screen);
    match state.editor.active {
        ActiveTool::PlacingMarker => markers::follow_pointer(state, pointer.screen),
        ActiveTool::PlacingLabel => labels::follow_pointer(state, pointer.screen),
        ActiveTool::None if state.orbit.drag == CameraDrag::Idle => {
            outline::update_hover(state, pointer.screen)
        }
        _ => {}
    }
}

/// Pointer-Up: Klick-Auswertung (Schwelle aus den Optionen) und Geste beenden.
pub fn pointer_up(state: &mut EngineState, pointer: PointerInfo) {
    let claimed = std::mem::take(&mut state.pointer.claimed);
    let threshold = state.options.click_threshold_px;
    let is_click = state.pointer.tracker.release(pointer.screen, threshold);
    state.pointer.last = Some(pointer);
    camera::end_drag(state);

    match state.editor.active {
        ActiveTool::None => {
            if is_click {
                outline::click_entity(state, &pointer);
            }
        }
        ActiveTool::PlacingMarker => {
            if state.editor.marker_placement.release(pointer.screen, threshold) {
                markers::place(state, pointer.screen);
            }
        }
        ActiveTool::PlacingLabel => {
            if state.editor.label_placement.release(pointer.screen, threshold) {
                labels::place(state, pointer.screen);
            }
        }
        ActiveTool::PlacingPath => {
            if claimed {
                paths::on_pointer_up(state, &pointer);
            }
        }
        ActiveTool::EditingMarker => edit::on_pointer_up(state, EntityType::Marker, &pointer),
        ActiveTool::EditingLabel => edit::on_pointer_up(state, EntityType::Label, &pointer),
        ActiveTool::SelectingTrainPath => {
            if state.editor.train_select.release(pointer.screen, threshold) {
                trains::select_path_at(state, pointer.screen);
            }
        }
    }
}
