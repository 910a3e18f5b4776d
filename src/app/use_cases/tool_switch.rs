//! Einziger Setter für das aktive Werkzeug.
//!
//! Das vorherige Werkzeug wird vollständig deaktiviert (wartende Entities
//! entsorgt, Kamera-Belegung wiederhergestellt), bevor das neue aktiv wird.

use super::{edit, entities, paths, trains};
use crate::app::events::{EngineEvent, EntityType};
use crate::app::state::{ActiveTool, EngineState};
use crate::app::subsystems::publish_internal;
use crate::app::tools::AuthoringTool;
use crate::shared::{ButtonMapping, PointerButton};

/// Kamera-Belegung während der Pfad-Bearbeitung (Primärtaste gehört dem Werkzeug).
pub const PATH_AUTHORING_BUTTONS: ButtonMapping = ButtonMapping {
    rotate: Some(PointerButton::Secondary),
    pan: Some(PointerButton::Middle),
    drag_zoom: None,
};

/// Wechselt das aktive Werkzeug und meldet den Wechsel intern.
pub fn set_active_tool(state: &mut EngineState, next: ActiveTool) {
    let previous = state.editor.active;
    if previous == ActiveTool::None && next == ActiveTool::None {
        return;
    }
    deactivate(state, previous);
    state.editor.active = next;

    if next == ActiveTool::PlacingPath {
        state.orbit.saved_buttons = Some(state.orbit.buttons);
        state.orbit.buttons = PATH_AUTHORING_BUTTONS;
        state.orbit.stop();
    }
    log::debug!("Werkzeug: {:?} → {:?}", previous, next);
    publish_internal(
        state,
        EngineEvent::ActiveToolChanged {
            from: previous,
            to: next,
        },
    );
}

/// Bricht Platzierung bzw. Bearbeitung der Art ab; andere Werkzeuge bleiben aktiv.
pub fn cancel(state: &mut EngineState, kind: EntityType) {
    let owns = match state.editor.active {
        ActiveTool::PlacingMarker | ActiveTool::EditingMarker => kind == EntityType::Marker,
        ActiveTool::PlacingLabel | ActiveTool::EditingLabel => kind == EntityType::Label,
        ActiveTool::PlacingPath => kind == EntityType::Path,
        ActiveTool::SelectingTrainPath => kind == EntityType::Train,
        ActiveTool::None => false,
    };
    if owns {
        log::info!("{}-Werkzeug abgebrochen", kind.name());
        set_active_tool(state, ActiveTool::None);
    } else {
        log::debug!("Abbruch {}: kein passendes Werkzeug aktiv", kind.name());
    }
}

fn deactivate(state: &mut EngineState, tool: ActiveTool) {
    match tool {
        ActiveTool::None => {}
        ActiveTool::PlacingMarker => {
            if let Some(pending) = state.editor.marker_placement.abort() {
                entities::dispose_entity(state, pending);
            }
        }
        ActiveTool::PlacingLabel => {
            if let Some(pending) = state.editor.label_placement.abort() {
                entities::dispose_entity(state, pending);
            }
        }
        ActiveTool::PlacingPath => {
            state.editor.path.reset();
            paths::discard_building(state);
            if let Some(saved) = state.orbit.saved_buttons.take() {
                state.orbit.buttons = saved;
            }
            state.orbit.stop();
        }
        ActiveTool::EditingMarker => edit::close_session(state, EntityType::Marker),
        ActiveTool::EditingLabel => edit::close_session(state, EntityType::Label),
        ActiveTool::SelectingTrainPath => trains::close_selection(state),
    }
    state.orbit.suspended = false;
    state.pointer.claimed = false;
}
